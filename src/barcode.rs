//! Boundary with the PDF417 symbol encoder and the image renderer.
//!
//! Neither is implemented here: the record is handed over as opaque bytes
//! and the produced matrix and image are never inspected.
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::AnsiDocument;

/// Parameters of the PDF417 symbol and of its rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeConfig {
    /// Number of data columns.
    #[serde(default = "BarcodeConfig::columns_default")]
    pub columns: u8,

    /// Error correction level, 0 to 8.
    #[serde(default = "BarcodeConfig::error_correction_level_default")]
    pub error_correction_level: u8,

    /// Pixels per module.
    #[serde(default = "BarcodeConfig::scale_default")]
    pub scale: u8,

    /// Height of a row, in module widths.
    #[serde(default = "BarcodeConfig::aspect_ratio_default")]
    pub aspect_ratio: u8,

    /// Blank margin around the symbol, in pixels.
    #[serde(default = "BarcodeConfig::quiet_zone_default")]
    pub quiet_zone: u16,
}

impl Default for BarcodeConfig {
    fn default() -> Self {
        Self {
            columns: Self::columns_default(),
            error_correction_level: Self::error_correction_level_default(),
            scale: Self::scale_default(),
            aspect_ratio: Self::aspect_ratio_default(),
            quiet_zone: Self::quiet_zone_default(),
        }
    }
}

impl BarcodeConfig {
    pub const MAX_COLUMNS: u8 = 30;

    pub const MAX_ERROR_CORRECTION_LEVEL: u8 = 8;

    fn columns_default() -> u8 {
        14
    }

    fn error_correction_level_default() -> u8 {
        5
    }

    fn scale_default() -> u8 {
        4
    }

    fn aspect_ratio_default() -> u8 {
        3
    }

    fn quiet_zone_default() -> u16 {
        15
    }

    /// Returns a description of the first out of range parameter.
    pub fn check(&self) -> Result<(), String> {
        if !(1..=Self::MAX_COLUMNS).contains(&self.columns) {
            return Err(format!(
                "columns must be between 1 and {}, found {}",
                Self::MAX_COLUMNS,
                self.columns
            ));
        }

        if self.error_correction_level > Self::MAX_ERROR_CORRECTION_LEVEL {
            return Err(format!(
                "error correction level must be at most {}, found {}",
                Self::MAX_ERROR_CORRECTION_LEVEL,
                self.error_correction_level
            ));
        }

        if self.scale == 0 || self.aspect_ratio == 0 {
            return Err("scale and aspect ratio must be positive".to_owned());
        }

        Ok(())
    }
}

/// Builds the PDF417 module matrix of a byte payload.
pub trait SymbolEncoder {
    type Matrix;
    type Error: std::error::Error;

    fn encode(&self, data: &[u8], config: &BarcodeConfig) -> Result<Self::Matrix, Self::Error>;
}

/// Renders a module matrix to an encoded image.
pub trait ImageRenderer<M> {
    type Image;
    type Error: std::error::Error;

    fn render(&self, matrix: &M, config: &BarcodeConfig) -> Result<Self::Image, Self::Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum BarcodeError<E, R> {
    #[error("symbol encoding failed: {0}")]
    Encode(E),

    #[error("rendering failed: {0}")]
    Render(R),
}

/// Encodes `document` as a PDF417 symbol and renders it.
pub fn render_barcode<E, R>(
    document: &AnsiDocument,
    encoder: &E,
    renderer: &R,
    config: &BarcodeConfig,
) -> Result<R::Image, BarcodeError<E::Error, R::Error>>
where
    E: SymbolEncoder,
    R: ImageRenderer<E::Matrix>,
{
    debug!(
        bytes = document.as_bytes().len(),
        columns = config.columns,
        error_correction_level = config.error_correction_level,
        "encoding barcode"
    );
    let matrix = encoder
        .encode(document.as_bytes(), config)
        .map_err(BarcodeError::Encode)?;
    renderer
        .render(&matrix, config)
        .map_err(BarcodeError::Render)
}
