use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{PassError, PassResult};

/// Font size and weight used to measure a text block.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FontSpec {
    pub size_px: f32,
    #[serde(default = "FontSpec::regular_weight")]
    pub weight: f32,
}

impl FontSpec {
    pub const REGULAR: f32 = 400.0;

    pub const fn new(size_px: f32, weight: f32) -> Self {
        Self { size_px, weight }
    }

    pub const fn regular(size_px: f32) -> Self {
        Self::new(size_px, Self::REGULAR)
    }

    fn regular_weight() -> f32 {
        Self::REGULAR
    }

    pub fn is_valid(&self) -> bool {
        self.size_px.is_finite()
            && self.size_px > 0.0
            && self.weight.is_finite()
            && self.weight > 0.0
    }
}

/// Pixel extent of a measured text block.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct TextExtent {
    pub width: f64,
    pub height: f64,
}

/// Measures text for layout.
///
/// `wrap_width` breaks lines at that width; `None` lays the text out on its
/// natural lines. Empty text measures as zero.
pub trait TextMeasurer {
    fn measure(&mut self, text: &str, font: &FontSpec, wrap_width: Option<f64>) -> TextExtent;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &mut T {
    fn measure(&mut self, text: &str, font: &FontSpec, wrap_width: Option<f64>) -> TextExtent {
        (**self).measure(text, font, wrap_width)
    }
}

/// Text measurement through Parley using a single registered font family.
pub struct ParleyMeasurer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family: String,
}

impl std::fmt::Debug for ParleyMeasurer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyMeasurer")
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

impl ParleyMeasurer {
    /// Register `font_bytes` and measure everything with its first family.
    pub fn from_font_bytes(font_bytes: Vec<u8>) -> PassResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| PassError::config("no font families registered from font bytes"))?;

        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PassError::config("registered font family has no name"))?
            .to_string();

        tracing::debug!(%family, "registered measurement font");
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> PassResult<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read font file '{}'", path.display()))?;
        Self::from_font_bytes(bytes)
    }

    pub fn family(&self) -> &str {
        &self.family
    }
}

impl TextMeasurer for ParleyMeasurer {
    fn measure(&mut self, text: &str, font: &FontSpec, wrap_width: Option<f64>) -> TextExtent {
        if text.is_empty() {
            return TextExtent::default();
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(font.weight),
        ));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(wrap_width.map(|w| w as f32));

        let mut width = 0.0f64;
        let mut height = 0.0f64;
        for line in layout.lines() {
            let m = line.metrics();
            width = width.max(f64::from(m.advance));
            height += f64::from(m.ascent + m.descent + m.leading);
        }
        TextExtent { width, height }
    }
}

/// Deterministic fixed-advance measurer.
///
/// Every character advances `advance_ratio * size`; lines are
/// `line_height * size` tall. Wrapping breaks at character boundaries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMeasurer {
    pub advance_ratio: f64,
    pub line_height: f64,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self {
            advance_ratio: 0.6,
            line_height: 1.2,
        }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&mut self, text: &str, font: &FontSpec, wrap_width: Option<f64>) -> TextExtent {
        if text.is_empty() {
            return TextExtent::default();
        }

        let size = f64::from(font.size_px);
        let advance = self.advance_ratio * size;
        // Tolerance keeps a box re-measured at its own width on the same lines.
        let per_line = wrap_width
            .filter(|w| advance > 0.0 && *w > 0.0)
            .map(|w| ((w / advance) + 1e-6).floor().max(1.0) as usize);

        let mut lines = 0usize;
        let mut widest = 0usize;
        for paragraph in text.split('\n') {
            let chars = paragraph.chars().count();
            match per_line {
                Some(cap) if chars > cap => {
                    lines += chars.div_ceil(cap);
                    widest = widest.max(cap);
                }
                _ => {
                    lines += 1;
                    widest = widest.max(chars);
                }
            }
        }

        TextExtent {
            width: widest as f64 * advance,
            height: lines as f64 * size * self.line_height,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/text.rs"]
mod tests;
