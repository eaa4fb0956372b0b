//! Frame serialization format used for import and export.
//!
//! ```json
//! { "width": 16, "height": 16, "pixels": ["#FF0000", null, ...] }
//! ```
//!
//! `pixels` holds exactly `width * height` entries in row-major order, each
//! either `null` or a `#RRGGBB` string. Import validates the whole payload
//! before anything is written, so a rejected payload never leaves a frame
//! half-updated.

use crate::animation::AnimationSet;
use crate::color::{parse_color, ColorError};
use crate::frame::{FrameId, Layer};
use crate::grid::{Cell, GridBuffer, GridSize};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Reasons an import payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// The payload is not JSON, or not a JSON object
    #[error("invalid JSON: {0}")]
    Json(String),
    /// `pixels` is absent
    #[error("missing 'pixels' field")]
    MissingPixels,
    /// `pixels` is present but not an array
    #[error("'pixels' must be an array")]
    PixelsNotArray,
    /// `pixels` has the wrong number of entries
    #[error("expected {expected} pixels, found {actual}")]
    PixelCount { expected: usize, actual: usize },
    /// An entry is neither null nor a valid `#RRGGBB` string
    #[error("invalid pixel at index {index}: {value} ({reason})")]
    InvalidPixel { index: usize, value: String, reason: String },
    /// `width`/`height` disagree with the editor grid
    #[error("payload is {width}x{height}, editor grid is {side}x{side}")]
    Dimensions { width: u64, height: u64, side: usize },
    /// `width` or `height` is present but not a non-negative integer
    #[error("'{field}' must be a non-negative integer, found {value}")]
    InvalidDimension { field: &'static str, value: String },
}

/// Serialized form of one frame's base buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramePayload {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Option<String>>,
}

impl FramePayload {
    /// Serialize a buffer. Colors are written as uppercase `#RRGGBB`.
    pub fn from_buffer(buffer: &GridBuffer) -> Self {
        let side = buffer.size().side();
        Self {
            width: side,
            height: side,
            pixels: buffer.cells().iter().map(|c| c.map(|color| color.to_hex())).collect(),
        }
    }

    pub fn to_json(&self) -> String {
        // A struct of integers and optional strings always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Export a buffer as a JSON payload string.
pub fn export_frame(buffer: &GridBuffer) -> String {
    FramePayload::from_buffer(buffer).to_json()
}

/// Parse and fully validate a JSON payload into a buffer of the given size.
pub fn parse_payload(json: &str, size: GridSize) -> Result<GridBuffer, PayloadError> {
    let value: Value = serde_json::from_str(json).map_err(|e| PayloadError::Json(e.to_string()))?;
    let object = value.as_object().ok_or_else(|| PayloadError::Json("expected an object".into()))?;

    check_dimension(object.get("width"), object.get("height"), size)?;

    let pixels = object.get("pixels").ok_or(PayloadError::MissingPixels)?;
    let cells = validate_pixels(pixels, size)?;

    // Length was checked by validate_pixels.
    GridBuffer::from_cells(size, cells)
        .ok_or(PayloadError::PixelCount { expected: size.cell_count(), actual: 0 })
}

/// Validate a `pixels` array, reporting the first offending entry.
pub fn validate_pixels(pixels: &Value, size: GridSize) -> Result<Vec<Cell>, PayloadError> {
    let entries = pixels.as_array().ok_or(PayloadError::PixelsNotArray)?;
    if entries.len() != size.cell_count() {
        return Err(PayloadError::PixelCount { expected: size.cell_count(), actual: entries.len() });
    }

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::Null => Ok(None),
            Value::String(s) => parse_color(s).map(Some).map_err(|e| invalid(index, entry, e)),
            other => Err(PayloadError::InvalidPixel {
                index,
                value: other.to_string(),
                reason: "expected null or a #RRGGBB string".to_string(),
            }),
        })
        .collect()
}

fn invalid(index: usize, entry: &Value, err: ColorError) -> PayloadError {
    PayloadError::InvalidPixel { index, value: entry.to_string(), reason: err.to_string() }
}

/// `width` and `height` are optional, but when present must match the grid.
fn check_dimension(width: Option<&Value>, height: Option<&Value>, size: GridSize) -> Result<(), PayloadError> {
    let side = size.side() as u64;
    let w = read_dimension("width", width)?.unwrap_or(side);
    let h = read_dimension("height", height)?.unwrap_or(side);
    if w != side || h != side {
        return Err(PayloadError::Dimensions { width: w, height: h, side: size.side() });
    }
    Ok(())
}

fn read_dimension(field: &'static str, value: Option<&Value>) -> Result<Option<u64>, PayloadError> {
    match value {
        None => Ok(None),
        Some(v) => v
            .as_u64()
            .map(Some)
            .ok_or_else(|| PayloadError::InvalidDimension { field, value: v.to_string() }),
    }
}

/// Outcome of a multi-file import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchImportReport {
    /// The active frame was blank and took the first valid payload
    pub replaced_active: bool,
    /// Frames appended, in order
    pub added: Vec<FrameId>,
    /// Payloads not imported because the frame limit was reached
    pub skipped: usize,
    /// Payloads that failed validation, by position in the batch
    pub rejected: Vec<(usize, PayloadError)>,
}

impl BatchImportReport {
    pub fn imported(&self) -> usize {
        self.added.len() + usize::from(self.replaced_active)
    }
}

/// Import several payloads into an animation.
///
/// If the active frame is completely empty (both layers), the first valid
/// payload replaces it in place. Every other valid payload is appended as a
/// new frame until the frame limit is hit; the remainder is counted as
/// skipped. Invalid payloads are reported and skipped. The first imported
/// frame ends up active.
pub fn import_batch<S: AsRef<str>>(animation: &mut AnimationSet, payloads: &[S]) -> BatchImportReport {
    let size = animation.size();
    let mut report = BatchImportReport::default();
    let mut replace_active = animation.active().is_empty();
    let mut first_imported: Option<FrameId> = None;

    for (position, json) in payloads.iter().enumerate() {
        let buffer = match parse_payload(json.as_ref(), size) {
            Ok(buffer) => buffer,
            Err(e) => {
                log::warn!("rejected payload {}: {}", position, e);
                report.rejected.push((position, e));
                continue;
            }
        };

        if replace_active {
            replace_active = false;
            let frame = animation.active_mut();
            frame.replace(Layer::Base, buffer);
            first_imported.get_or_insert(frame.id());
            report.replaced_active = true;
            continue;
        }

        match animation.add_frame() {
            Ok(id) => {
                if let Some(frame) = animation.frame_mut(id) {
                    frame.replace(Layer::Base, buffer);
                }
                first_imported.get_or_insert(id);
                report.added.push(id);
            }
            Err(_) => {
                report.skipped = payloads.len() - position;
                log::warn!("frame limit reached, skipped {} payloads", report.skipped);
                break;
            }
        }
    }

    if let Some(id) = first_imported {
        if let Err(e) = animation.set_active(id) {
            log::warn!("could not activate imported {}: {}", id, e);
        }
    }
    log::info!("imported {} frames", report.imported());
    report
}
