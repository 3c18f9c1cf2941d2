//! HEIC/HEIF input handling.
//!
//! Camera formats of the HEIF family cannot be decoded directly. They are
//! handed to a [`HeifConverter`] which produces a JPEG-equivalent blob that
//! the regular reader understands. The conversion itself lives outside this
//! crate (heic2any in the browser, for instance).

use thiserror::Error;

/// How a source file has to be treated before decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Decodable as-is.
    Direct,
    /// HEIC/HEIF: needs a converter first.
    Heif,
}

impl SourceKind {
    /// Detect the kind from a file name. Only the extension is looked at and
    /// unknown extensions are never rejected.
    pub fn from_file_name(name: &str) -> Self {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("heic") | Some("heif") => SourceKind::Heif,
            _ => SourceKind::Direct,
        }
    }
}

/// Errors reported by a HEIF converter.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// No converter is wired in.
    #[error("no HEIC/HEIF converter available")]
    Unavailable,

    /// The converter ran but returned nothing usable.
    #[error("converter returned no images")]
    EmptyResult,

    /// The converter itself failed.
    #[error("conversion failed: {0}")]
    Failed(String),
}

/// Converts HEIC/HEIF bytes into one or more JPEG-equivalent blobs.
pub trait HeifConverter {
    /// Convert a HEIF container. Multi-image containers may return several
    /// blobs; callers only use the first.
    fn convert(&self, bytes: &[u8]) -> Result<Vec<Vec<u8>>, ConversionError>;
}

/// Converter used when nothing better is available. Always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHeifConverter;

impl HeifConverter for NoHeifConverter {
    fn convert(&self, _bytes: &[u8]) -> Result<Vec<Vec<u8>>, ConversionError> {
        Err(ConversionError::Unavailable)
    }
}

impl<F> HeifConverter for F
where
    F: Fn(&[u8]) -> Result<Vec<Vec<u8>>, ConversionError>,
{
    fn convert(&self, bytes: &[u8]) -> Result<Vec<Vec<u8>>, ConversionError> {
        self(bytes)
    }
}

/// Run the converter and keep only the first result.
pub fn convert_first(
    converter: &dyn HeifConverter,
    bytes: &[u8],
) -> Result<Vec<u8>, ConversionError> {
    converter
        .convert(bytes)?
        .into_iter()
        .next()
        .ok_or(ConversionError::EmptyResult)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_detection() {
        assert_eq!(SourceKind::from_file_name("photo.heic"), SourceKind::Heif);
        assert_eq!(SourceKind::from_file_name("PHOTO.HEIF"), SourceKind::Heif);
        assert_eq!(SourceKind::from_file_name("photo.jpg"), SourceKind::Direct);
        assert_eq!(SourceKind::from_file_name("heic"), SourceKind::Direct);
        assert_eq!(SourceKind::from_file_name("archive.tar.heic"), SourceKind::Heif);
    }

    #[test]
    fn test_no_converter_fails() {
        let result = convert_first(&NoHeifConverter, &[1, 2, 3]);
        assert!(matches!(result, Err(ConversionError::Unavailable)));
    }

    #[test]
    fn test_convert_first_uses_first_result() {
        let converter = |_: &[u8]| -> Result<Vec<Vec<u8>>, ConversionError> {
            Ok(vec![vec![1u8], vec![2u8]])
        };
        assert_eq!(convert_first(&converter, &[]).unwrap(), vec![1u8]);
    }

    #[test]
    fn test_convert_first_empty_result() {
        let converter =
            |_: &[u8]| -> Result<Vec<Vec<u8>>, ConversionError> { Ok(Vec::new()) };
        let result = convert_first(&converter, &[]);
        assert!(matches!(result, Err(ConversionError::EmptyResult)));
    }
}
