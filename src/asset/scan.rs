//! Asset scanning functions (pure, no side effects).

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SourcePaths;
use crate::core::AssetClass;
use crate::pipeline::BuildError;
use crate::utils::path::to_slash;

use super::{AssetKind, AssetRoute};

/// Scan the sources of one asset class.
///
/// ```text
/// src/css/
/// ├── app.scss            -> app.css
/// ├── _vars.scss          -> (partial, skipped)
/// └── plugins/
///     └── normalize.css   -> normalize.css (verbatim)
/// ```
///
/// Only files directly in the class directory are sources. A missing class
/// directory is an error, a missing plugins directory is not. Routes are
/// sorted by output name.
///
/// # Errors
///
/// `Io` when the class directory cannot be read, `DuplicateOutput` when two
/// sources map to the same output name.
pub fn scan_class(paths: &SourcePaths, class: AssetClass) -> Result<Vec<AssetRoute>, BuildError> {
    let dir = paths.class_dir(class);
    let mut routes = Vec::new();

    for source in list_files(dir)? {
        if let Some(rel) = source_output_name(class, &source) {
            routes.push(AssetRoute::new(source, rel, AssetKind::Source));
        }
    }

    if let Some(plugins) = paths.plugins_dir(class).filter(|d| d.is_dir()) {
        for source in list_files(&plugins)? {
            if has_extension(&source, plugin_extension(class)) {
                let rel = file_name(&source);
                routes.push(AssetRoute::new(source, rel, AssetKind::Plugin));
            }
        }
    }

    check_duplicates(class, &routes)?;
    routes.sort_by(|a, b| a.rel.cmp(&b.rel));
    Ok(routes)
}

/// Newest modification time among the Sass partials of `dir`.
///
/// Partials are never emitted, so the dev build compares outputs against
/// them separately.
pub fn newest_partial(dir: &Path) -> Option<std::time::SystemTime> {
    list_files(dir)
        .ok()?
        .into_iter()
        .filter(|p| is_partial(p))
        .filter_map(|p| p.metadata().and_then(|m| m.modified()).ok())
        .max()
}

/// List HTML files directly in `dir`.
pub fn list_html(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    Ok(list_files(dir)?
        .into_iter()
        .filter(|p| has_extension(p, "html"))
        .collect())
}

/// Regular files directly in `dir`, sorted.
fn list_files(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let entries = fs::read_dir(dir).map_err(|err| BuildError::io(dir, err))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| BuildError::io(dir, err))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Output name of a regular source, `None` when the file is not a source.
fn source_output_name(class: AssetClass, path: &Path) -> Option<String> {
    match class {
        AssetClass::Html if has_extension(path, "html") => Some(file_name(path)),
        AssetClass::Css if has_extension(path, "scss") && !is_partial(path) => {
            let out = path.with_extension("css");
            Some(file_name(&out))
        }
        AssetClass::Js if has_extension(path, "js") => Some(file_name(path)),
        AssetClass::Image => Some(file_name(path)),
        _ => None,
    }
}

fn plugin_extension(class: AssetClass) -> &'static str {
    match class {
        AssetClass::Css => "css",
        _ => "js",
    }
}

fn check_duplicates(class: AssetClass, routes: &[AssetRoute]) -> Result<(), BuildError> {
    let mut seen = HashSet::new();
    for route in routes {
        if !seen.insert(route.rel.as_str()) {
            return Err(BuildError::DuplicateOutput {
                class,
                path: route.rel.clone(),
            });
        }
    }
    Ok(())
}

fn is_partial(path: &Path) -> bool {
    has_extension(path, "scss")
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('_'))
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| to_slash(Path::new(n)))
        .unwrap_or_default()
}
