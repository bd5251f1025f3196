//! HTML minification with minify-html.

use crate::config::HtmlConfig;

pub struct HtmlTransform {
    cfg: minify_html::Cfg,
}

impl HtmlTransform {
    pub fn new(config: &HtmlConfig) -> Self {
        let mut cfg = minify_html::Cfg::new();
        cfg.keep_comments = config.keep_comments;
        cfg.minify_css = config.minify_css;
        cfg.minify_js = config.minify_js;
        cfg.keep_closing_tags = true;
        cfg.keep_html_and_head_opening_tags = true;
        Self { cfg }
    }

    pub fn apply(&self, bytes: &[u8]) -> Vec<u8> {
        minify_html::minify(bytes, &self.cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_comments_and_whitespace() {
        let html = b"<!doctype html>\n<html>\n  <head>\n    <!-- note -->\n    <link rel=\"stylesheet\" href=\"css/app.css\">\n  </head>\n</html>\n";
        let out = HtmlTransform::new(&HtmlConfig::default()).apply(html);
        let out = String::from_utf8(out).unwrap();
        assert!(!out.contains("note"));
        assert!(out.contains("css/app.css"));
        assert!(out.len() < html.len());
    }

    #[test]
    fn test_keep_comments() {
        let config = HtmlConfig {
            keep_comments: true,
            ..HtmlConfig::default()
        };
        let out = HtmlTransform::new(&config).apply(b"<p>a</p><!-- note -->");
        assert!(String::from_utf8(out).unwrap().contains("note"));
    }
}
