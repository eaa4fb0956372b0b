//! Rasterize a frame into an RGBA image.
//!
//! One grid cell becomes one image pixel. Empty cells are fully transparent;
//! scaling for display is left to the caller.

use crate::floating::FloatingLayer;
use crate::frame::{Frame, Layer};
use crate::grid::Cell;
use image::{Rgba, RgbaImage};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Composite a frame to an `N x N` image.
///
/// Overlay cells sit above base cells. When `floating` is given, its cells
/// replace the cells of the layer it was lifted from.
pub fn composite_image(frame: &Frame, floating: Option<(&FloatingLayer, Layer)>) -> RgbaImage {
    let size = frame.size();
    let side = size.side() as u32;

    let layer_cell = |layer: Layer, index: usize| -> Cell {
        let buffer = frame.buffer(layer);
        match floating {
            Some((float, lifted_from)) if lifted_from == layer => float.composite(buffer, index),
            _ => buffer.get(index),
        }
    };

    RgbaImage::from_fn(side, side, |x, y| {
        let index = size.to_index(x as usize, y as usize);
        layer_cell(Layer::Overlay, index)
            .or_else(|| layer_cell(Layer::Base, index))
            .map_or(TRANSPARENT, |color| color.to_rgba())
    })
}
