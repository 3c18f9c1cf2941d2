//! SVG output: a PNG raster embedded in a minimal SVG document.
//!
//! This is not vector output. The rendered surface is PNG-encoded and
//! referenced as a base64 data URI from a single `<image>` element that
//! fills an SVG canvas of the render dimensions.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::raster::encode_png;
use super::EncodeError;

/// Encode RGBA pixel data as an SVG document wrapping a PNG raster.
pub fn encode_svg(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    let png = encode_png(pixels, width, height)?;
    Ok(svg_document(width, height, &png).into_bytes())
}

/// Build the wrapper document around already encoded PNG bytes.
pub fn svg_document(width: u32, height: u32, png: &[u8]) -> String {
    let data_url = format!("data:image/png;base64,{}", STANDARD.encode(png));
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}"><image width="100%" height="100%" href="{data_url}"/></svg>"#
    )
}
