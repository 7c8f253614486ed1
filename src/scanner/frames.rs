//! Embedded frame discovery over a fetched HTML body

use crate::reporting::model::{IframeFinding, Observed};
use scraper::{Html, Selector};

const FRAME_SELECTOR: &str = "iframe, frame";

/// Extract every `<iframe>`/`<frame>` element in document order.
///
/// html5ever recovers from malformed markup, so this never fails; an
/// unparseable document simply yields no frames.
pub fn inspect_frames(body: &str) -> Vec<IframeFinding> {
    if body.trim().is_empty() {
        return Vec::new();
    }

    let selector = match Selector::parse(FRAME_SELECTOR) {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let document = Html::parse_document(body);

    document
        .select(&selector)
        .map(|el| {
            let attr = |name: &str| Observed::from(el.value().attr(name));
            IframeFinding {
                src: attr("src"),
                width: attr("width"),
                height: attr("height"),
                frameborder: attr("frameborder"),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_frames_is_empty() {
        assert!(inspect_frames("<html><body><p>hi</p></body></html>").is_empty());
        assert!(inspect_frames("").is_empty());
    }

    #[test]
    fn test_attributes_and_order() {
        let body = r#"<html><body>
            <iframe src="https://a.test/" width="300" height="200" frameborder="0"></iframe>
            <div><iframe src="/b"></iframe></div>
        </body></html>"#;

        let frames = inspect_frames(body);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].src, Observed::Value("https://a.test/".into()));
        assert_eq!(frames[0].width, Observed::Value("300".into()));
        assert_eq!(frames[0].frameborder, Observed::Value("0".into()));
        assert_eq!(frames[1].src, Observed::Value("/b".into()));
        assert_eq!(frames[1].height, Observed::Missing);
        assert_eq!(frames[1].frameborder, Observed::Missing);
    }

    #[test]
    fn test_frameset_frames_found() {
        let body = r#"<html><frameset cols="50%,50%"><frame src="left.html"><frame src="right.html"></frameset></html>"#;
        let frames = inspect_frames(body);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].src, Observed::Value("right.html".into()));
    }

    #[test]
    fn test_malformed_html_does_not_fail() {
        let body = "<html><body><div><iframe src='x.html' width=10<p>unterminated <b";
        let frames = inspect_frames(body);
        assert!(frames.len() <= 1);
    }
}
