//! Output formats offered at export time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::EncodeError;

/// Encoding selected for exported files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
    Webp,
    Avif,
    /// PNG raster wrapped in a minimal SVG document.
    Svg,
}

impl OutputFormat {
    /// Every format, in the order a format picker lists them.
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Jpeg,
        OutputFormat::Png,
        OutputFormat::Webp,
        OutputFormat::Avif,
        OutputFormat::Svg,
    ];

    /// MIME type of the encoded output.
    pub fn mime(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::Webp => "image/webp",
            OutputFormat::Avif => "image/avif",
            OutputFormat::Svg => "image/svg+xml",
        }
    }

    /// File extension: the MIME subtype with jpeg→jpg and svg+xml→svg.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
            OutputFormat::Avif => "avif",
            OutputFormat::Svg => "svg",
        }
    }

    /// Parse from a MIME type (`image/png`) or a short name (`png`, `jpg`).
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        let name = value.strip_prefix("image/").unwrap_or(&value);
        match name {
            "jpeg" | "jpg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "webp" => Some(OutputFormat::Webp),
            "avif" => Some(OutputFormat::Avif),
            "svg" | "svg+xml" => Some(OutputFormat::Svg),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

impl FromStr for OutputFormat {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::parse(s).ok_or_else(|| EncodeError::UnknownFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_mapping() {
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Svg.extension(), "svg");
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::Webp.extension(), "webp");
        assert_eq!(OutputFormat::Avif.extension(), "avif");
    }

    #[test]
    fn test_extension_matches_mime_subtype() {
        for format in OutputFormat::ALL {
            let subtype = format.mime().trim_start_matches("image/");
            let mapped = subtype.replace("jpeg", "jpg").replace("svg+xml", "svg");
            assert_eq!(format.extension(), mapped);
        }
    }

    #[test]
    fn test_parse_mime_and_short_names() {
        assert_eq!(OutputFormat::parse("image/jpeg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::parse("JPG"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::parse("image/svg+xml"), Some(OutputFormat::Svg));
        assert_eq!(OutputFormat::parse("svg"), Some(OutputFormat::Svg));
        assert_eq!(OutputFormat::parse("image/gif"), None);
    }

    #[test]
    fn test_from_str_error() {
        let err = "tiff".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, EncodeError::UnknownFormat(_)));
    }

    #[test]
    fn test_default_is_jpeg() {
        assert_eq!(OutputFormat::default(), OutputFormat::Jpeg);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&OutputFormat::Webp).unwrap();
        assert_eq!(json, "\"webp\"");
    }
}
