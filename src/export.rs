// Turns the vector overlay into a standalone SVG document for the host.

use crate::compositor::VectorOverlay;
use base64::{engine::general_purpose::STANDARD, Engine as _};

pub const SVG_MIME: &str = "image/svg+xml";

/// What the host receives on finish.
#[derive(Clone, Debug, PartialEq)]
pub struct Export {
    /// Self-contained reference to the same bytes (`data:` URL).
    pub url: String,
    /// The full serialized document.
    pub content: String,
}

pub struct ExportBuilder;

impl ExportBuilder {
    /// Wrap the overlay in an `<svg>` root whose viewBox is the canvas. Never fails;
    /// an empty overlay gives an empty but valid document.
    pub fn build(overlay: &VectorOverlay) -> Export {
        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}">{}</svg>"#,
            overlay.width,
            overlay.height,
            overlay.to_markup(),
        );
        let url = format!("data:{SVG_MIME};base64,{}", STANDARD.encode(content.as_bytes()));
        Export { url, content }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{StyleParams, TextRun};
    use base64::Engine as _;

    #[test]
    fn empty_overlay_is_a_valid_document() {
        let export = ExportBuilder::build(&VectorOverlay::empty(600, 800));
        assert_eq!(
            export.content,
            r#"<?xml version="1.0" encoding="UTF-8"?><svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 600 800"></svg>"#
        );
    }

    #[test]
    fn one_text_element_per_run() {
        let runs = vec![
            TextRun { text: "Ho ho ".into(), x: 0.0, y: 0.0 },
            TextRun { text: "ho! ".into(), x: 333.0, y: 15.0 },
        ];
        let overlay = VectorOverlay::from_runs(&runs, &StyleParams::default(), 600, 800);
        let export = ExportBuilder::build(&overlay);

        assert!(export.content.contains(r#"viewBox="0 0 600 800""#));
        assert_eq!(export.content.matches("<text ").count(), runs.len());
        assert!(export
            .content
            .contains(r#"<text x="333" y="30" font-family="serif" font-size="15""#));
        assert!(export.content.contains(">Ho ho </text>"));
    }

    #[test]
    fn url_carries_the_same_bytes() {
        let export = ExportBuilder::build(&VectorOverlay::empty(10, 20));
        let encoded = export.url.strip_prefix("data:image/svg+xml;base64,").unwrap();
        let decoded = STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, export.content.as_bytes());
    }
}
