//! Reference rewriting: replace original asset paths in HTML with hashed ones.
//!
//! A manifest key only matches as a standalone path token, and a key with a
//! directory in front only matches below the class output directory:
//!
//! ```text
//! href="app.css"            → href="app.1a2b3c4d.css"
//! src=css/app.css>          → src=css/app.1a2b3c4d.css>
//! href="/css/app.css"       → href="/css/app.1a2b3c4d.css"
//! url(app.css?v=2)          → url(app.1a2b3c4d.css?v=2)
//! myapp.css                 (unchanged)
//! assets/app.css            (unchanged, other directory)
//! https://cdn.x/app.css     (unchanged)
//! ```

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::asset::list_html;
use crate::config::SiteConfig;
use crate::core::AssetClass;
use crate::pipeline::BuildError;
use crate::pipeline::manifest::{Manifest, manifest_path};
use crate::utils::path::to_slash;

/// Outcome of one rewrite pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// HTML files whose text changed.
    pub files: usize,
    /// References replaced across all files.
    pub references: usize,
}

/// Replaces manifest keys in text.
pub struct Rewriter<'a> {
    manifest: &'a Manifest,
    /// Class output directory relative to the output root, `/`-separated.
    class_dir: String,
    /// Keys, longest first.
    keys: Vec<&'a str>,
    /// Alternation of all keys, used to jump to candidates.
    finder: Option<Regex>,
}

impl<'a> Rewriter<'a> {
    pub fn new(manifest: &'a Manifest, class_dir: &str) -> Result<Self, regex::Error> {
        let mut keys: Vec<&str> = manifest.keys().filter(|k| !k.is_empty()).collect();
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let finder = if keys.is_empty() {
            None
        } else {
            let pattern = keys
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&pattern)?)
        };

        Ok(Self {
            manifest,
            class_dir: class_dir.trim_matches('/').to_string(),
            keys,
            finder,
        })
    }

    /// Rewrite every standalone occurrence of a key.
    ///
    /// Returns the text (borrowed when nothing matched) and the number of
    /// replacements.
    pub fn rewrite<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        let Some(finder) = &self.finder else {
            return (Cow::Borrowed(text), 0);
        };

        let mut out = String::new();
        let mut copied = 0;
        let mut count = 0;
        let mut pos = 0;

        while let Some(m) = finder.find_at(text, pos) {
            let start = m.start();
            match self.match_at(text, start) {
                Some(key) => {
                    out.push_str(&text[copied..start]);
                    out.push_str(self.manifest.get(key).unwrap_or(key));
                    copied = start + key.len();
                    pos = copied;
                    count += 1;
                }
                None => {
                    pos = start + text[start..].chars().next().map_or(1, char::len_utf8);
                }
            }
        }

        if count == 0 {
            return (Cow::Borrowed(text), 0);
        }
        out.push_str(&text[copied..]);
        (Cow::Owned(out), count)
    }

    /// Longest key standing alone at `start`.
    fn match_at(&self, text: &str, start: usize) -> Option<&'a str> {
        let head = &text[..start];
        let before = head.chars().next_back();
        if !before.is_none_or(is_leading_boundary) {
            return None;
        }
        if before == Some('/') && !self.is_class_prefix(path_prefix(head)) {
            return None;
        }

        let rest = &text[start..];
        self.keys.iter().copied().find(|key| {
            rest.starts_with(key) && rest[key.len()..].chars().next().is_none_or(is_trailing_boundary)
        })
    }

    /// `css/`, `/css/` or `./css/` for a class directory `css`.
    fn is_class_prefix(&self, prefix: &str) -> bool {
        let dir = prefix
            .strip_prefix("./")
            .or_else(|| prefix.strip_prefix('/'))
            .unwrap_or(prefix);
        dir.strip_suffix('/')
            .is_some_and(|dir| !self.class_dir.is_empty() && dir == self.class_dir)
    }
}

/// The part of the path token that ends `head`.
fn path_prefix(head: &str) -> &str {
    let start = head
        .char_indices()
        .rev()
        .find(|&(_, c)| c != '/' && is_leading_boundary(c))
        .map_or(0, |(i, c)| i + c.len_utf8());
    &head[start..]
}

#[inline]
fn is_leading_boundary(c: char) -> bool {
    matches!(c, '/' | '"' | '\'' | '(' | '=' | ',') || c.is_whitespace()
}

#[inline]
fn is_trailing_boundary(c: char) -> bool {
    matches!(c, '"' | '\'' | '?' | '#' | ')' | ',' | '>' | ';') || c.is_whitespace()
}

/// Every manifest value must name a file in the class output directory.
pub fn verify_manifest(
    manifest: &Manifest,
    class_dir: &Path,
    manifest_file: &Path,
) -> Result<(), BuildError> {
    for (_, hashed) in manifest.iter() {
        let path = class_dir.join(hashed);
        if !path.is_file() {
            return Err(BuildError::MissingAsset {
                manifest: manifest_file.to_path_buf(),
                path,
            });
        }
    }
    Ok(())
}

/// Run the rewrite pass of one class over the HTML in the output root.
pub fn rewrite_class(config: &SiteConfig, class: AssetClass) -> Result<RewriteStats, BuildError> {
    let manifest_file = manifest_path(config, class);
    let manifest = Manifest::load(&manifest_file)?;
    verify_manifest(&manifest, &config.paths.output.class_dir(class), &manifest_file)?;

    let class_dir = to_slash(config.paths.output.subdir(class));
    let rewriter = Rewriter::new(&manifest, &class_dir)
        .map_err(|e| BuildError::malformed(&manifest_file, e.to_string()))?;

    let mut stats = RewriteStats::default();
    for page in list_html(&config.paths.output.root)? {
        let text = fs::read_to_string(&page).map_err(|err| BuildError::io(&page, err))?;
        let (rewritten, count) = rewriter.rewrite(&text);
        if let Cow::Owned(new_text) = rewritten
            && new_text != text
        {
            fs::write(&page, new_text).map_err(|err| BuildError::io(&page, err))?;
            stats.files += 1;
        }
        stats.references += count;
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(entries: &[(&str, &str)]) -> Manifest {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn rewrite_in(class_dir: &str, entries: &[(&str, &str)], text: &str) -> String {
        let manifest = manifest(entries);
        Rewriter::new(&manifest, class_dir)
            .unwrap()
            .rewrite(text)
            .0
            .into_owned()
    }

    fn rewrite(entries: &[(&str, &str)], text: &str) -> String {
        rewrite_in("css", entries, text)
    }

    #[test]
    fn test_link_href() {
        assert_eq!(
            rewrite(&[("app.css", "app.a1b2c3.css")], r#"<link href="app.css">"#),
            r#"<link href="app.a1b2c3.css">"#
        );
    }

    #[test]
    fn test_unknown_reference_unchanged() {
        let html = r#"<script src="vendor.js"></script>"#;
        assert_eq!(rewrite_in("js", &[("app.js", "app.1a2b3c4d.js")], html), html);
    }

    #[test]
    fn test_boundaries() {
        let entries = [("app.css", "app.h.css")];
        assert_eq!(rewrite(&entries, "css/app.css"), "css/app.h.css");
        assert_eq!(rewrite(&entries, "<link href=app.css>"), "<link href=app.h.css>");
        assert_eq!(rewrite(&entries, "url(app.css?v=2)"), "url(app.h.css?v=2)");
        assert_eq!(rewrite(&entries, "'app.css#x'"), "'app.h.css#x'");
        assert_eq!(rewrite(&entries, "myapp.css"), "myapp.css");
        assert_eq!(rewrite(&entries, "app.css.map"), "app.css.map");
        assert_eq!(rewrite(&entries, "app.css"), "app.h.css");
    }

    #[test]
    fn test_class_directory_prefixes() {
        let entries = [("app.css", "app.h.css")];
        assert_eq!(rewrite(&entries, r#"href="/css/app.css""#), r#"href="/css/app.h.css""#);
        assert_eq!(rewrite(&entries, r#"href="./css/app.css""#), r#"href="./css/app.h.css""#);
        assert_eq!(rewrite(&entries, r#"href="/app.css""#), r#"href="/app.css""#);
        assert_eq!(rewrite(&entries, r#"href="static/css/app.css""#), r#"href="static/css/app.css""#);
        assert_eq!(
            rewrite_in("static/css", &entries, r#"href="static/css/app.css""#),
            r#"href="static/css/app.h.css""#
        );
    }

    #[test]
    fn test_other_directory_unchanged() {
        let entries = [("app.js", "app.2e3e37ff.js")];
        let html = r#"<img src="assets/app.js"><script src="js/app.js"></script>"#;
        assert_eq!(
            rewrite_in("js", &entries, html),
            r#"<img src="assets/app.js"><script src="js/app.2e3e37ff.js"></script>"#
        );
    }

    #[test]
    fn test_external_url_unchanged() {
        let entries = [("app.js", "app.1.js")];
        let html = r#"<script src="https://cdn.example.com/lib/app.js"></script>"#;
        assert_eq!(rewrite_in("js", &entries, html), html);
        let html = r#"<script src="https://cdn.example.com/js/app.js"></script>"#;
        assert_eq!(rewrite_in("js", &entries, html), html);
    }

    #[test]
    fn test_longest_key_wins() {
        let entries = [("x.js", "x.1.js"), ("lib/x.js", "lib/x.2.js")];
        assert_eq!(rewrite_in("js", &entries, r#"src="js/lib/x.js""#), r#"src="js/lib/x.2.js""#);
        assert_eq!(rewrite_in("js", &entries, r#"src="js/x.js""#), r#"src="js/x.1.js""#);
        assert_eq!(rewrite_in("js", &entries, r#"src="lib/x.js""#), r#"src="lib/x.2.js""#);
    }

    #[test]
    fn test_failed_boundary_retries_later() {
        let entries = [("a.png", "a.1.png")];
        assert_eq!(
            rewrite_in("assets", &entries, r#"<img src="ba.png"><img src="a.png">"#),
            r#"<img src="ba.png"><img src="a.1.png">"#
        );
    }

    #[test]
    fn test_idempotent() {
        let entries = [("app.css", "app.1a2b3c4d.css"), ("theme.css", "theme.9f8e7d6c.css")];
        let html = r#"<link href="css/app.css"><link href="/css/theme.css" title="theme.css">"#;
        let once = rewrite(&entries, html);
        assert_eq!(rewrite(&entries, &once), once);
        assert!(!once.contains("\"css/app.css\""));
    }

    #[test]
    fn test_count_and_borrow() {
        let manifest = manifest(&[("a.js", "a.1.js")]);
        let rewriter = Rewriter::new(&manifest, "js").unwrap();

        let (text, count) = rewriter.rewrite("a.js js/a.js");
        assert_eq!((text.as_ref(), count), ("a.1.js js/a.1.js", 2));

        let (text, count) = rewriter.rewrite("nothing here");
        assert!(matches!(text, Cow::Borrowed(_)));
        assert_eq!(count, 0);
    }

    #[test]
    fn test_path_prefix() {
        assert_eq!(path_prefix(r#"<a href="/css/"#), "/css/");
        assert_eq!(path_prefix("url(css/"), "css/");
        assert_eq!(path_prefix("https://cdn.x/"), "https://cdn.x/");
        assert_eq!(path_prefix(""), "");
    }

    #[test]
    fn test_empty_manifest() {
        assert_eq!(rewrite(&[], "<p>app.css</p>"), "<p>app.css</p>");
    }
}
