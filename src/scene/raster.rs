use std::{path::Path, sync::Arc};

use crate::foundation::error::{VisError, VisResult};

/// Straight-alpha RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RasterImage {
    pub fn save_png(&self, path: &Path) -> VisResult<()> {
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| VisError::render(format!("write png '{}': {e}", path.display())))
    }
}

/// Parse options for scene documents. Relative image hrefs resolve against `resources_dir`.
pub fn svg_options(resources_dir: Option<&Path>, system_fonts: bool) -> usvg::Options<'static> {
    let mut db = usvg::fontdb::Database::new();
    if system_fonts {
        db.load_system_fonts();
    }
    usvg::Options {
        resources_dir: resources_dir.map(Path::to_path_buf),
        fontdb: Arc::new(db),
        ..Default::default()
    }
}

/// Rasterize an SVG document at `scale` times its intrinsic size.
#[tracing::instrument(skip_all, fields(bytes = svg.len(), scale))]
pub fn rasterize_svg(svg: &str, opts: &usvg::Options<'_>, scale: f32) -> VisResult<RasterImage> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(VisError::validation("raster scale must be finite and > 0"));
    }
    let tree = usvg::Tree::from_str(svg, opts)
        .map_err(|e| VisError::render(format!("parse svg tree: {e}")))?;

    let size = tree.size();
    let width = (size.width() * scale).ceil().max(1.0) as u32;
    let height = (size.height() * scale).ceil().max(1.0) as u32;

    const MAX_DIM: u32 = 16_384;
    if width > MAX_DIM || height > MAX_DIM {
        return Err(VisError::render(format!(
            "raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| VisError::render("failed to allocate pixmap"))?;
    let xform = resvg::tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    let data = pixmap
        .pixels()
        .iter()
        .flat_map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    tracing::debug!(width, height, "scene rasterized");

    Ok(RasterImage {
        width,
        height,
        data,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/scene/raster.rs"]
mod tests;
