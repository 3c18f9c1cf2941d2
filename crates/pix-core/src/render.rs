//! Render pipeline: scale an asset and apply the fine-tune filter chain.
//!
//! Preview and export go through the same [`Renderer::draw`] call with
//! parameters produced by [`RenderParams::resolve`], so an exported file is
//! exactly what the preview showed.

use thiserror::Error;
use tracing::debug;

use crate::adjustments::apply_fine_tune;
use crate::asset::Asset;
use crate::decode::{resize, DecodeError, DecodedImage, FilterType};
use crate::session::EditParams;
use crate::FineTune;

/// Largest width or height a surface may have, the canvas limit most
/// browsers share.
pub const MAX_DIMENSION: u32 = 16_384;

/// Largest surface area in pixels. 256 MiB of RGBA, which still fits the
/// 32-bit wasm address space next to the source bitmaps.
pub const MAX_PIXELS: u64 = 64 * 1024 * 1024;

/// Errors produced while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A render dimension is zero.
    #[error("Invalid render dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The surface would exceed [`MAX_DIMENSION`] or [`MAX_PIXELS`].
    #[error("Render dimensions too large: {width}x{height}")]
    TooLarge { width: u32, height: u32 },

    /// Scaling the bitmap failed.
    #[error("Scaling failed: {0}")]
    Scale(#[from] DecodeError),
}

/// Fully resolved parameters for rendering one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderParams {
    pub width: u32,
    pub height: u32,
    pub fine_tune: FineTune,
    pub filter: FilterType,
}

impl RenderParams {
    /// Resolve the effective parameters for `asset`.
    ///
    /// With resizing disabled the asset's native dimensions win over the
    /// stored target dimensions.
    pub fn resolve(params: &EditParams, asset: &Asset) -> Self {
        let (width, height) = if params.resize_enabled {
            (params.target_width, params.target_height)
        } else {
            (asset.width(), asset.height())
        };
        Self {
            width,
            height,
            fine_tune: params.fine_tune,
            filter: FilterType::Bilinear,
        }
    }
}

/// Check that a `width x height` surface can be allocated.
///
/// # Errors
///
/// Returns `RenderError::InvalidDimensions` for a zero dimension and
/// `RenderError::TooLarge` past the surface limits.
pub fn check_dimensions(width: u32, height: u32) -> Result<(), RenderError> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }
    let fits = width <= MAX_DIMENSION
        && height <= MAX_DIMENSION
        && u64::from(width)
            .checked_mul(u64::from(height))
            .is_some_and(|pixels| pixels <= MAX_PIXELS);
    if !fits {
        return Err(RenderError::TooLarge { width, height });
    }
    Ok(())
}

/// Owns the drawing surface shared by preview and export.
///
/// Each draw replaces the surface contents; the previous render is gone.
#[derive(Debug, Default)]
pub struct Renderer {
    surface: Option<DecodedImage>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw `asset` onto the surface and return it.
    ///
    /// The surface ends up exactly `params.width x params.height` pixels,
    /// holding the asset stretched to that size with brightness, contrast,
    /// and saturation applied once, in that order.
    pub fn draw(
        &mut self,
        asset: &Asset,
        params: &RenderParams,
    ) -> Result<&DecodedImage, RenderError> {
        check_dimensions(params.width, params.height)?;

        let mut scaled = resize(asset.image(), params.width, params.height, params.filter)?;
        apply_fine_tune(&mut scaled.pixels, &params.fine_tune);

        debug!(
            asset = %asset.id(),
            width = params.width,
            height = params.height,
            filter = %params.fine_tune.filter_string(),
            "rendered asset"
        );
        Ok(self.surface.insert(scaled))
    }

    /// The most recent render, if any.
    pub fn surface(&self) -> Option<&DecodedImage> {
        self.surface.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::gradient_asset;

    fn edit_params(width: u32, height: u32) -> EditParams {
        EditParams {
            target_width: width,
            target_height: height,
            ..EditParams::default()
        }
    }

    #[test]
    fn test_resolve_uses_targets_when_resizing() {
        let asset = gradient_asset(1, "a.png", 300, 200);
        let params = RenderParams::resolve(&edit_params(150, 90), &asset);
        assert_eq!((params.width, params.height), (150, 90));
    }

    #[test]
    fn test_resolve_uses_native_when_resize_disabled() {
        let asset = gradient_asset(1, "a.png", 300, 200);
        let mut edit = edit_params(150, 90);
        edit.resize_enabled = false;

        let params = RenderParams::resolve(&edit, &asset);
        assert_eq!((params.width, params.height), (300, 200));
    }

    #[test]
    fn test_draw_produces_exact_dimensions() {
        let asset = gradient_asset(1, "a.png", 64, 32);
        let params = RenderParams::resolve(&edit_params(20, 50), &asset);

        let mut renderer = Renderer::new();
        let surface = renderer.draw(&asset, &params).unwrap();
        assert_eq!((surface.width, surface.height), (20, 50));
        assert_eq!(surface.pixels.len(), 20 * 50 * 4);
    }

    #[test]
    fn test_draw_zero_dimension_fails() {
        let asset = gradient_asset(1, "a.png", 64, 32);
        let params = RenderParams::resolve(&edit_params(0, 10), &asset);

        let result = Renderer::new().draw(&asset, &params).map(|_| ());
        assert!(matches!(result, Err(RenderError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_draw_huge_dimensions_fails() {
        let asset = gradient_asset(1, "a.png", 2, 2);
        let params = RenderParams::resolve(&edit_params(u32::MAX, u32::MAX), &asset);

        let mut renderer = Renderer::new();
        let result = renderer.draw(&asset, &params).map(|_| ());
        assert!(matches!(
            result,
            Err(RenderError::TooLarge {
                width: u32::MAX,
                height: u32::MAX
            })
        ));
        assert!(renderer.surface().is_none());
    }

    #[test]
    fn test_check_dimensions_limits() {
        assert!(check_dimensions(MAX_DIMENSION, 4096).is_ok());
        assert!(matches!(
            check_dimensions(MAX_DIMENSION + 1, 1),
            Err(RenderError::TooLarge { .. })
        ));
        assert!(matches!(
            check_dimensions(1, MAX_DIMENSION + 1),
            Err(RenderError::TooLarge { .. })
        ));
        // Both sides in range, area over the limit.
        assert!(matches!(
            check_dimensions(MAX_DIMENSION, MAX_DIMENSION),
            Err(RenderError::TooLarge { .. })
        ));
        assert!(matches!(
            check_dimensions(0, 0),
            Err(RenderError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_draw_applies_fine_tune() {
        let asset = gradient_asset(1, "a.png", 8, 8);
        let mut edit = edit_params(8, 8);
        edit.fine_tune = FineTune::new(0, 100, 100);

        let mut renderer = Renderer::new();
        let surface = renderer
            .draw(&asset, &RenderParams::resolve(&edit, &asset))
            .unwrap();
        assert!(surface
            .pixels
            .chunks_exact(4)
            .all(|px| px[..3] == [0, 0, 0] && px[3] == 255));
    }

    #[test]
    fn test_surface_is_reused() {
        let a = gradient_asset(1, "a.png", 10, 10);
        let b = gradient_asset(2, "b.png", 30, 30);
        let mut renderer = Renderer::new();
        assert!(renderer.surface().is_none());

        renderer
            .draw(&a, &RenderParams::resolve(&edit_params(5, 5), &a))
            .unwrap();
        renderer
            .draw(&b, &RenderParams::resolve(&edit_params(7, 3), &b))
            .unwrap();

        let surface = renderer.surface().unwrap();
        assert_eq!((surface.width, surface.height), (7, 3));
    }
}
