use crate::{
    foundation::core::Rect,
    model::barcode::{Barcode, BarcodeFormat},
    render::config::RenderConfig,
};

/// Minimum symbol size of an encoded barcode, in device pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SymbolSize {
    pub width: u32,
    pub height: u32,
}

impl SymbolSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Barcode symbol generation, reduced to what layout needs.
pub trait BarcodeEncoder {
    /// Minimum symbol size for `barcode`, or `None` if it cannot be encoded.
    fn symbol_size(&self, barcode: &Barcode) -> Option<SymbolSize>;
}

/// Fixed minimum sizes per symbology, independent of the message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NominalBarcodeEncoder;

impl BarcodeEncoder for NominalBarcodeEncoder {
    fn symbol_size(&self, barcode: &Barcode) -> Option<SymbolSize> {
        if barcode.message.is_empty() {
            return None;
        }
        match barcode.format {
            BarcodeFormat::Qr => Some(SymbolSize::new(29, 29)),
            BarcodeFormat::Aztec => Some(SymbolSize::new(19, 19)),
            BarcodeFormat::Pdf417 => Some(SymbolSize::new(103, 27)),
            BarcodeFormat::Code128 => Some(SymbolSize::new(90, 20)),
            BarcodeFormat::Other(_) => None,
        }
    }
}

/// Hit region for the barcode, anchored to the bottom margin.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BarcodeRegion {
    pub rect: Rect,
    pub symbol: SymbolSize,
    pub format: BarcodeFormat,
    pub message: String,
    pub alt_text: Option<String>,
}

/// Box size for a symbol: integer multiples of its minimum size.
///
/// Square symbols scale up to the height budget; wide ones to the content width,
/// capped by the height budget; tall ones get the fixed tall box.
pub fn barcode_box(symbol: SymbolSize, cfg: &RenderConfig) -> Option<(u32, u32)> {
    let SymbolSize { width, height } = symbol;
    if width == 0 || height == 0 {
        return None;
    }
    let budget = cfg.barcode_height_budget;

    if width == height {
        let k = budget / height;
        Some((k * width, k * height))
    } else if width > height {
        let content = cfg.content_width().max(0.0) as u32;
        let mut k = content / width;
        if k * height > budget {
            k = budget / height;
        }
        Some((k * width, k * height))
    } else {
        Some((cfg.tall_barcode_box, cfg.tall_barcode_box))
    }
}

/// Region for the first barcode `encoder` can handle.
pub fn barcode_region<'b, E: BarcodeEncoder + ?Sized>(
    candidates: impl IntoIterator<Item = &'b Barcode>,
    encoder: &E,
    cfg: &RenderConfig,
) -> Option<BarcodeRegion> {
    let (barcode, symbol) = candidates
        .into_iter()
        .find_map(|b| encoder.symbol_size(b).map(|s| (b, s)))?;
    let (w, h) = barcode_box(symbol, cfg)?;
    let (w, h) = (f64::from(w), f64::from(h));

    let x = cfg.width / 2.0 - w / 2.0;
    let y = cfg.height - cfg.margin - h;
    Some(BarcodeRegion {
        rect: Rect::new(x, y, x + w, y + h),
        symbol,
        format: barcode.format.clone(),
        message: barcode.message.clone(),
        alt_text: barcode.alt_text.clone(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/barcode.rs"]
mod tests;
