use std::sync::LazyLock;

use kuchiki::iter::NodeIterator as _;
use kuchiki::traits::TendrilSink as _;
use regex::Regex;

use crate::script::{BOOTSTRAP_MARKER, TOGGLE_BUTTON_ID};

// `url(...)` or `@import` pointing at another origin, quoted or not.
static REMOTE_CSS_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:url\(\s*["']?|@import\s+["']?)\s*(?:https?:)?//"#)
        .expect("remote css reference regex")
});

/// Checks the rendered page keeps the pre-paint theme contract and loads nothing remote.
///
/// `css` is the stylesheet shipped with the page, inline or linked.
pub fn assert_page_contract(html: &str, css: &str) -> anyhow::Result<()> {
    assert_css_strict(css)?;
    let doc = kuchiki::parse_html().one(html);
    assert_bootstrap_first(&doc)?;
    assert_no_remote_autoload(&doc)?;

    if doc.select_first(&format!("#{TOGGLE_BUTTON_ID}")).is_err() {
        anyhow::bail!("page contract check failed: theme toggle button #{TOGGLE_BUTTON_ID} missing");
    }
    Ok(())
}

fn assert_bootstrap_first(doc: &kuchiki::NodeRef) -> anyhow::Result<()> {
    let Ok(head) = doc.select_first("head") else {
        anyhow::bail!("page contract check failed: no <head>");
    };

    let mut seen_bootstrap = false;
    for node in head.as_node().children().elements() {
        let name = node.name.local.as_ref().to_ascii_lowercase();
        let attrs = node.attributes.borrow();

        if name == "script" && attrs.contains(BOOTSTRAP_MARKER) {
            for blocking in ["src", "defer", "async"] {
                if attrs.contains(blocking) {
                    anyhow::bail!(
                        "page contract check failed: theme bootstrap script must be inline and blocking, found `{blocking}`"
                    );
                }
            }
            if attrs.get("type").is_some_and(|t| t.eq_ignore_ascii_case("module")) {
                anyhow::bail!("page contract check failed: theme bootstrap script must not be a module");
            }
            seen_bootstrap = true;
            break;
        }

        let is_stylesheet = name == "style"
            || (name == "link"
                && attrs
                    .get("rel")
                    .is_some_and(|r| r.to_ascii_lowercase().contains("stylesheet")));
        if is_stylesheet {
            anyhow::bail!("page contract check failed: stylesheet precedes theme bootstrap script");
        }
    }

    if !seen_bootstrap {
        anyhow::bail!("page contract check failed: theme bootstrap script missing from <head>");
    }
    Ok(())
}

fn assert_no_remote_autoload(doc: &kuchiki::NodeRef) -> anyhow::Result<()> {
    for (selector, attr) in [
        ("script[src]", "src"),
        ("link[rel~=stylesheet]", "href"),
        ("link[rel~=icon]", "href"),
        ("img[src]", "src"),
        ("iframe[src]", "src"),
    ] {
        if let Ok(nodes) = doc.select(selector) {
            for node in nodes {
                let attrs = node.attributes.borrow();
                if let Some(v) = attrs.get(attr) {
                    if is_remote_auto_load(v) {
                        anyhow::bail!(
                            "page contract check failed: <{} {}=\"{}\"> is not local",
                            node.name.local.as_ref(),
                            attr,
                            v
                        );
                    }
                }
            }
        }
    }

    if let Ok(nodes) = doc.select("style") {
        for node in nodes {
            if REMOTE_CSS_REF.is_match(&node.text_contents()) {
                anyhow::bail!("page contract check failed: <style> references remote resources");
            }
        }
    }
    if let Ok(nodes) = doc.select("[style]") {
        for node in nodes {
            if let Some(style) = node.attributes.borrow().get("style") {
                if REMOTE_CSS_REF.is_match(style) {
                    anyhow::bail!(
                        "page contract check failed: style attribute references remote resources"
                    );
                }
            }
        }
    }
    Ok(())
}

fn assert_css_strict(css: &str) -> anyhow::Result<()> {
    if let Some(m) = REMOTE_CSS_REF.find(css) {
        anyhow::bail!(
            "page contract check failed: stylesheet references a remote resource near `{}`",
            m.as_str()
        );
    }
    Ok(())
}

fn is_remote_auto_load(v: &str) -> bool {
    let s = v.trim().to_ascii_lowercase();
    s.starts_with("http://") || s.starts_with("https://") || s.starts_with("//")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUTTON: &str = r#"<button id="theme-toggle"></button>"#;

    fn page(head: &str, body: &str) -> String {
        format!("<!DOCTYPE html><html><head>{head}</head><body>{body}</body></html>")
    }

    #[test]
    fn accepts_inline_bootstrap_before_styles() {
        let html = page(
            r#"<meta charset="utf-8"><script data-theme-bootstrap>1</script><style>a{}</style>"#,
            BUTTON,
        );
        assert_page_contract(&html, "").unwrap();
    }

    #[test]
    fn rejects_missing_bootstrap() {
        let html = page("<style>a{}</style>", BUTTON);
        assert!(assert_page_contract(&html, "").is_err());
    }

    #[test]
    fn rejects_stylesheet_before_bootstrap() {
        let html = page(
            r#"<link rel="stylesheet" href="assets/css/site.css"><script data-theme-bootstrap>1</script>"#,
            BUTTON,
        );
        let err = assert_page_contract(&html, "").unwrap_err();
        assert!(err.to_string().contains("precedes"));
    }

    #[test]
    fn rejects_deferred_bootstrap() {
        let html = page(r#"<script data-theme-bootstrap defer>1</script>"#, BUTTON);
        assert!(assert_page_contract(&html, "").is_err());
    }

    #[test]
    fn rejects_remote_stylesheet() {
        let html = page(
            r#"<script data-theme-bootstrap>1</script><link rel="stylesheet" href="https://cdn.example.com/a.css">"#,
            BUTTON,
        );
        assert!(assert_page_contract(&html, "").is_err());
    }

    #[test]
    fn canonical_link_may_be_absolute() {
        let html = page(
            r#"<script data-theme-bootstrap>1</script><link rel="canonical" href="https://cv.example.com/">"#,
            BUTTON,
        );
        assert_page_contract(&html, "").unwrap();
    }

    #[test]
    fn rejects_remote_urls_in_stylesheet() {
        let html = page(r#"<script data-theme-bootstrap>1</script>"#, BUTTON);
        for css in [
            "body { background: url(https://cdn.example.com/bg.png); }",
            r#"body { background: url("https://cdn.example.com/bg.png"); }"#,
            "body { background: url( 'http://cdn.example.com/bg.png' ); }",
            "body { background: url('//cdn.example.com/bg.png'); }",
            r#"@import "https://fonts.example.com/a.css";"#,
            "@import url(https://fonts.example.com/a.css);",
            r#"@IMPORT URL("HTTPS://fonts.example.com/a.css");"#,
        ] {
            let err = assert_page_contract(&html, css).unwrap_err();
            assert!(err.to_string().contains("stylesheet"), "{css}: {err}");
        }
    }

    #[test]
    fn accepts_local_urls_in_stylesheet() {
        let html = page(r#"<script data-theme-bootstrap>1</script>"#, BUTTON);
        let css = r#"a { background: url("img/bg.png"); } b { background: url(/logos/x.png); } c { background: url(data:image/png;base64,AAAA); } @import "print.css";"#;
        assert_page_contract(&html, css).unwrap();
    }

    #[test]
    fn rejects_quoted_remote_url_in_inline_style() {
        let html = page(
            r#"<script data-theme-bootstrap>1</script><style>body { background: url("https://cdn.example.com/bg.png"); }</style>"#,
            BUTTON,
        );
        assert!(assert_page_contract(&html, "").is_err());

        let html = page(
            r#"<script data-theme-bootstrap>1</script>"#,
            r#"<button id="theme-toggle" style="background:url('//cdn.example.com/x.png')"></button>"#,
        );
        assert!(assert_page_contract(&html, "").is_err());
    }

    #[test]
    fn rejects_missing_toggle() {
        let html = page(r#"<script data-theme-bootstrap>1</script>"#, "");
        assert!(assert_page_contract(&html, "").is_err());
    }
}
