//! PNG export of the grid
//!
//! The grid is rasterized the way it appears on screen (padded white panel,
//! gapped square cells with a thin border) and encoded as a PNG.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::ExportError;
use crate::grid::PixelBuffer;

/// File name offered to the browser download
pub const EXPORT_FILENAME: &str = "pixel-art.png";

/// Geometry and colors of the exported image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportStyle {
    /// Cell edge in pixels
    pub cell: u32,
    /// Space between cells
    pub gap: u32,
    /// Margin around the grid
    pub padding: u32,
    pub background: [u8; 3],
    /// Fill for cells with no color
    pub empty: [u8; 3],
    /// 1px cell outline, `None` to disable
    pub border: Option<[u8; 3]>,
}

impl Default for ExportStyle {
    fn default() -> Self {
        Self {
            cell: 32,
            gap: 4,
            padding: 8,
            background: [0xff, 0xff, 0xff],
            empty: [0xff, 0xff, 0xff],
            border: Some([0xd1, 0xd5, 0xdb]),
        }
    }
}

impl ExportStyle {
    /// Edge length of the square output image for a grid of `dim` cells
    pub fn image_extent(&self, dim: u32) -> u32 {
        2 * self.padding + dim * self.cell + dim.saturating_sub(1) * self.gap
    }

    /// Top-left pixel of the cell at `(row, col)`
    pub fn cell_origin(&self, row: u32, col: u32) -> (u32, u32) {
        let stride = self.cell + self.gap;
        (self.padding + col * stride, self.padding + row * stride)
    }
}

fn rgba([r, g, b]: [u8; 3]) -> Rgba<u8> {
    Rgba([r, g, b, 0xff])
}

/// Draw `pixels` into an RGBA image
pub fn rasterize(pixels: &PixelBuffer, style: &ExportStyle) -> RgbaImage {
    let dim = pixels.size().dim() as u32;
    let extent = style.image_extent(dim);
    let mut image = RgbaImage::from_pixel(extent, extent, rgba(style.background));

    for (row, cells) in pixels.rows().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            // Non-hex colors render as empty
            let fill = cell
                .as_ref()
                .and_then(|c| c.to_rgb())
                .unwrap_or(style.empty);
            let (x0, y0) = style.cell_origin(row as u32, col as u32);
            for dy in 0..style.cell {
                for dx in 0..style.cell {
                    let on_edge = dx == 0 || dy == 0 || dx == style.cell - 1 || dy == style.cell - 1;
                    let color = match style.border {
                        Some(border) if on_edge => border,
                        _ => fill,
                    };
                    image.put_pixel(x0 + dx, y0 + dy, rgba(color));
                }
            }
        }
    }

    image
}

/// Rasterize and encode as PNG bytes
pub fn encode_png(pixels: &PixelBuffer, style: &ExportStyle) -> Result<Vec<u8>, ExportError> {
    let image = rasterize(pixels, style);
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

/// Offer PNG bytes as a browser download
#[cfg(target_arch = "wasm32")]
pub fn download_png(bytes: &[u8], filename: &str) -> Result<(), ExportError> {
    use wasm_bindgen::{JsCast, JsValue};

    let fail = |e: JsValue| ExportError::Download(e.as_string().unwrap_or_else(|| format!("{e:?}")));

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ExportError::Download("no document".into()))?;

    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("image/png");
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(fail)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(fail)?;

    let link: web_sys::HtmlAnchorElement = document
        .create_element("a")
        .map_err(fail)?
        .dyn_into()
        .map_err(|_| ExportError::Download("not an anchor".into()))?;
    link.set_href(&url);
    link.set_download(filename);
    link.click();

    web_sys::Url::revoke_object_url(&url).map_err(fail)?;
    log::info!("Exported {} ({} bytes)", filename, bytes.len());
    Ok(())
}
