//! Loaded assets and the loader that produces them.
//!
//! An asset is created once per successfully decoded input file and never
//! changes afterwards; edits live in the session's parameters, not in the
//! bitmap.

use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use crate::decode::{
    convert_first, decode_image, ConversionError, DecodeError, DecodedImage, HeifConverter,
    SourceKind,
};

/// Identifier of an asset, unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(u64);

impl AssetId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AssetId {
    /// Nine lowercase base-36 digits, zero padded.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
        let mut buf = [b'0'; 9];
        let mut n = self.0;
        for slot in buf.iter_mut().rev() {
            *slot = DIGITS[(n % 36) as usize];
            n /= 36;
        }
        // All bytes come from DIGITS.
        f.write_str(std::str::from_utf8(&buf).map_err(|_| fmt::Error)?)
    }
}

/// A raw input file: its name and its bytes.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// A decoded input image.
#[derive(Debug, Clone)]
pub struct Asset {
    id: AssetId,
    image: DecodedImage,
    name: String,
    ratio: f64,
}

impl Asset {
    /// Wrap a decoded bitmap. The bitmap must not be empty.
    pub fn new(id: AssetId, name: impl Into<String>, image: DecodedImage) -> Self {
        let ratio = image.aspect_ratio();
        Self {
            id,
            image,
            name: name.into(),
            ratio,
        }
    }

    pub fn id(&self) -> AssetId {
        self.id
    }

    /// Original file name, extension included.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> &DecodedImage {
        &self.image
    }

    /// Native width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width
    }

    /// Native height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height
    }

    /// Native width / native height.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }
}

/// Failure to load one input file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// HEIC/HEIF conversion failed.
    #[error("{name}: {source}")]
    Conversion {
        name: String,
        #[source]
        source: ConversionError,
    },

    /// The (possibly converted) bytes could not be decoded.
    #[error("{name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: DecodeError,
    },
}

impl LoadError {
    /// Name of the file that failed.
    pub fn file_name(&self) -> &str {
        match self {
            LoadError::Conversion { name, .. } | LoadError::Decode { name, .. } => name,
        }
    }
}

/// Result of loading a batch of files. Failures never abort the batch.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Successfully loaded assets, in input order.
    pub assets: Vec<Asset>,
    /// One entry per file that failed.
    pub failures: Vec<LoadError>,
}

impl LoadReport {
    /// The single user-visible message for this batch, if anything failed.
    pub fn error_message(&self) -> Option<String> {
        let first = self.failures.first()?;
        Some(match self.failures.len() {
            1 => format!("Error loading files. ({})", first.file_name()),
            n => format!(
                "Error loading files. ({} and {} more)",
                first.file_name(),
                n - 1
            ),
        })
    }
}

/// Load one file: convert HEIF inputs if needed, then decode.
pub fn load_file(
    file: &SourceFile,
    converter: &dyn HeifConverter,
    id: AssetId,
) -> Result<Asset, LoadError> {
    let converted;
    let bytes = match SourceKind::from_file_name(&file.name) {
        SourceKind::Direct => file.bytes.as_slice(),
        SourceKind::Heif => {
            debug!(name = %file.name, "converting HEIF input");
            converted =
                convert_first(converter, &file.bytes).map_err(|source| LoadError::Conversion {
                    name: file.name.clone(),
                    source,
                })?;
            converted.as_slice()
        }
    };

    let image = decode_image(bytes).map_err(|source| LoadError::Decode {
        name: file.name.clone(),
        source,
    })?;

    debug!(name = %file.name, width = image.width, height = image.height, "decoded asset");
    Ok(Asset::new(id, file.name.clone(), image))
}

/// Load a batch of files, collecting successes and failures separately.
///
/// `next_id` is called once per file; ids drawn for failed files go unused.
pub fn load_files(
    files: &[SourceFile],
    converter: &dyn HeifConverter,
    mut next_id: impl FnMut() -> AssetId,
) -> LoadReport {
    let mut report = LoadReport::default();
    for file in files {
        match load_file(file, converter, next_id()) {
            Ok(asset) => report.assets.push(asset),
            Err(err) => {
                warn!(error = %err, "failed to load file");
                report.failures.push(err);
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::NoHeifConverter;
    use crate::test_helpers::{encode_png, gradient_image};

    fn png_file(name: &str, width: u32, height: u32) -> SourceFile {
        SourceFile::new(name, encode_png(&gradient_image(width, height)))
    }

    #[test]
    fn test_asset_id_display() {
        assert_eq!(AssetId::new(0).to_string(), "000000000");
        assert_eq!(AssetId::new(35).to_string(), "00000000z");
        assert_eq!(AssetId::new(36).to_string(), "000000010");
    }

    #[test]
    fn test_asset_records_dimensions_and_ratio() {
        let asset = Asset::new(AssetId::new(1), "a.png", gradient_image(300, 200));
        assert_eq!(asset.width(), 300);
        assert_eq!(asset.height(), 200);
        assert_eq!(asset.ratio(), 1.5);
        assert_eq!(asset.name(), "a.png");
    }

    #[test]
    fn test_load_file_png() {
        let asset = load_file(&png_file("a.png", 40, 20), &NoHeifConverter, AssetId::new(7)).unwrap();
        assert_eq!(asset.id(), AssetId::new(7));
        assert_eq!((asset.width(), asset.height()), (40, 20));
    }

    #[test]
    fn test_unknown_extension_is_still_decoded() {
        let asset = load_file(&png_file("a.weird", 4, 4), &NoHeifConverter, AssetId::new(1));
        assert!(asset.is_ok());
    }

    #[test]
    fn test_heif_uses_converter_output() {
        let converted = encode_png(&gradient_image(10, 5));
        let converter = move |_: &[u8]| -> Result<Vec<Vec<u8>>, ConversionError> {
            Ok(vec![converted.clone()])
        };
        let file = SourceFile::new("photo.heic", vec![0, 1, 2]);

        let asset = load_file(&file, &converter, AssetId::new(1)).unwrap();
        assert_eq!(asset.name(), "photo.heic");
        assert_eq!((asset.width(), asset.height()), (10, 5));
    }

    #[test]
    fn test_heif_without_converter_fails() {
        let file = SourceFile::new("photo.HEIC", vec![0, 1, 2]);
        let err = load_file(&file, &NoHeifConverter, AssetId::new(1)).unwrap_err();
        assert!(matches!(err, LoadError::Conversion { .. }));
        assert_eq!(err.file_name(), "photo.HEIC");
    }

    #[test]
    fn test_batch_continues_after_failure() {
        let files = vec![
            png_file("a.png", 4, 4),
            SourceFile::new("broken.jpg", vec![0xFF, 0xD8, 0x00]),
            png_file("c.png", 8, 2),
        ];
        let mut counter = 0;
        let report = load_files(&files, &NoHeifConverter, || {
            counter += 1;
            AssetId::new(counter)
        });

        assert_eq!(report.assets.len(), 2);
        assert_eq!(report.assets[0].name(), "a.png");
        assert_eq!(report.assets[1].name(), "c.png");
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0], LoadError::Decode { .. }));
    }

    #[test]
    fn test_error_message() {
        let report = LoadReport::default();
        assert!(report.error_message().is_none());

        let files = vec![
            SourceFile::new("x.jpg", vec![1]),
            SourceFile::new("y.jpg", vec![2]),
        ];
        let report = load_files(&files, &NoHeifConverter, || AssetId::new(0));
        assert_eq!(
            report.error_message().unwrap(),
            "Error loading files. (x.jpg and 1 more)"
        );
    }
}
