// Host configuration: the five settings the widget reacts to, and the CLI that feeds them.

use crate::error::Error;
use clap::Parser;
use std::path::PathBuf;

/// One changed setting. Every change triggers a re-layout; `Source` also
/// restarts the session with a fresh mask.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigChange {
    Source(String),
    FontSize(f32),
    FontFamily(String),
    LineWidth(f32),
    Text(String),
}

impl ConfigChange {
    /// Attribute names understood by `parse`.
    pub const ATTRIBUTES: [&'static str; 5] =
        ["source", "fontsize", "fontfamily", "linewidth", "text"];

    /// Map a host attribute (`name="value"`) to a change.
    pub fn parse(name: &str, value: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidAttribute {
            name: name.to_string(),
            value: value.to_string(),
        };
        match name {
            "source" => Ok(Self::Source(value.to_string())),
            "fontsize" => parse_length(value).map(Self::FontSize).map_err(|_| invalid()),
            "fontfamily" => Ok(Self::FontFamily(value.to_string())),
            "linewidth" => parse_length(value).map(Self::LineWidth).map_err(|_| invalid()),
            "text" => Ok(Self::Text(value.to_string())),
            _ => Err(invalid()),
        }
    }
}

/// Positive pixel length, optionally suffixed with `px`.
pub fn parse_length(value: &str) -> Result<f32, String> {
    let v = value.trim();
    let v = v.strip_suffix("px").unwrap_or(v).trim_end();
    match v.parse::<f32>() {
        Ok(n) if n.is_finite() && n > 0.0 => Ok(n),
        Ok(n) => Err(format!("expected a positive length, got {n}")),
        Err(e) => Err(format!("{value:?}: {e}")),
    }
}

/// Paint a mask over a picture and pack repeating text around it.
///
/// Left mouse paints, right mouse erases, F/Enter exports, C clears the mask,
/// M tints the mask, Esc quits.
#[derive(Parser, Debug)]
#[command(name = "cutout", version)]
pub struct Args {
    /// Picture to cut the text out of (path or file:// URL)
    pub source: String,

    /// Font size in pixels [default: 15]
    #[arg(long, value_parser = parse_length)]
    pub font_size: Option<f32>,

    /// Font family written into the export [default: serif]
    #[arg(long)]
    pub font_family: Option<String>,

    /// Brush diameter in pixels [default: 60]
    #[arg(long, value_parser = parse_length)]
    pub line_width: Option<f32>,

    /// Text repeated over the open area [default: "Ho ho ho!"]
    #[arg(long)]
    pub text: Option<String>,

    /// Where the exported SVG is written
    #[arg(short, long, default_value = "cutout.svg")]
    pub out: PathBuf,
}

impl Args {
    /// The flags as changes, in the order a host would set them.
    pub fn changes(&self) -> Vec<ConfigChange> {
        let mut changes = vec![ConfigChange::Source(self.source.clone())];
        if let Some(size) = self.font_size {
            changes.push(ConfigChange::FontSize(size));
        }
        if let Some(family) = &self.font_family {
            changes.push(ConfigChange::FontFamily(family.clone()));
        }
        if let Some(width) = self.line_width {
            changes.push(ConfigChange::LineWidth(width));
        }
        if let Some(text) = &self.text {
            changes.push(ConfigChange::Text(text.clone()));
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_attribute() {
        assert_eq!(
            ConfigChange::parse("source", "a.png").unwrap(),
            ConfigChange::Source("a.png".into())
        );
        assert_eq!(ConfigChange::parse("fontsize", "20").unwrap(), ConfigChange::FontSize(20.0));
        assert_eq!(
            ConfigChange::parse("fontsize", " 12px ").unwrap(),
            ConfigChange::FontSize(12.0)
        );
        assert_eq!(
            ConfigChange::parse("fontfamily", "Georgia").unwrap(),
            ConfigChange::FontFamily("Georgia".into())
        );
        assert_eq!(ConfigChange::parse("linewidth", "7.5").unwrap(), ConfigChange::LineWidth(7.5));
        assert_eq!(ConfigChange::parse("text", " Hi ").unwrap(), ConfigChange::Text(" Hi ".into()));
        for name in ConfigChange::ATTRIBUTES {
            assert!(ConfigChange::parse(name, "1").is_ok());
        }
    }

    #[test]
    fn rejects_unknown_names_and_bad_numbers() {
        for (name, value) in [
            ("color", "red"),
            ("linewidth", "wide"),
            ("fontsize", "0"),
            ("fontsize", "-3"),
            ("fontsize", "inf"),
        ] {
            assert!(
                matches!(ConfigChange::parse(name, value), Err(Error::InvalidAttribute { .. })),
                "{name}={value} should be rejected"
            );
        }
    }

    #[test]
    fn cli_flags_become_changes() {
        let args = Args::try_parse_from([
            "cutout", "pic.png", "--font-size", "20", "--text", "Yo", "-o", "out.svg",
        ])
        .unwrap();
        assert_eq!(
            args.changes(),
            vec![
                ConfigChange::Source("pic.png".into()),
                ConfigChange::FontSize(20.0),
                ConfigChange::Text("Yo".into()),
            ]
        );
        assert_eq!(args.out, PathBuf::from("out.svg"));

        assert!(Args::try_parse_from(["cutout", "pic.png", "--line-width", "-1"]).is_err());
    }
}
