//! Shared fixtures for unit tests.

use crate::asset::{Asset, AssetId};
use crate::decode::DecodedImage;

/// A deterministic RGBA gradient with opaque alpha.
pub fn gradient_image(width: u32, height: u32) -> DecodedImage {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.push(((x * 255) / width.max(1)) as u8);
            pixels.push(((y * 255) / height.max(1)) as u8);
            pixels.push(128);
            pixels.push(255);
        }
    }
    DecodedImage::new(width, height, pixels)
}

/// PNG bytes for an image, as a file on disk would hold them.
pub fn encode_png(image: &DecodedImage) -> Vec<u8> {
    crate::encode::encode_png(&image.pixels, image.width, image.height)
        .expect("fixture image should encode")
}

/// An asset wrapping a gradient of the given size.
pub fn gradient_asset(id: u64, name: &str, width: u32, height: u32) -> Asset {
    Asset::new(AssetId::new(id), name, gradient_image(width, height))
}
