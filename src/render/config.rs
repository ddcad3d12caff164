use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::core::Rgb8,
    foundation::error::{PassError, PassResult},
    layout::fields::RowAdvance,
    layout::text::FontSpec,
    model::style::StyleKind,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Geometry, fonts and per-style strategies for rendering a pass front.
///
/// Every field has a default, so a JSON override only needs the keys it changes.
pub struct RenderConfig {
    pub width: f64,
    pub height: f64,
    /// Outer margin and horizontal gap between fields.
    pub margin: f64,
    pub header_height: f64,
    /// Vertical gap between packed rows.
    pub row_gap: f64,
    pub background_blur_radius: f64,
    /// Maximum barcode box height.
    pub barcode_height_budget: u32,
    /// Side of the box used for barcodes taller than wide.
    pub tall_barcode_box: u32,
    pub fonts: PassFonts,
    pub colors: DefaultColors,
    pub row_advance: RowAdvance,
    pub profiles: StyleProfiles,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 320.0,
            height: 420.0,
            margin: 12.0,
            header_height: 32.0,
            row_gap: 6.0,
            background_blur_radius: 30.0,
            barcode_height_budget: 140,
            tall_barcode_box: 177,
            fonts: PassFonts::default(),
            colors: DefaultColors::default(),
            row_advance: RowAdvance::default(),
            profiles: StyleProfiles::default(),
        }
    }
}

impl RenderConfig {
    pub fn from_json_str(s: &str) -> PassResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| PassError::config(format!("parse render config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> PassResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read render config '{}'", path.display()))
            .map_err(|e| PassError::config(format!("{e:#}")))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> PassResult<()> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(PassError::config(format!("{name} must be finite and > 0")))
            }
        };
        let non_negative = |name: &str, v: f64| {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(PassError::config(format!("{name} must be finite and >= 0")))
            }
        };

        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("header_height", self.header_height)?;
        non_negative("margin", self.margin)?;
        non_negative("row_gap", self.row_gap)?;
        non_negative("background_blur_radius", self.background_blur_radius)?;
        if 2.0 * self.margin >= self.width {
            return Err(PassError::config("margins leave no room for content"));
        }
        for (name, font) in self.fonts.iter() {
            if !font.is_valid() {
                return Err(PassError::config(format!(
                    "font '{name}' must have a finite size and weight > 0"
                )));
            }
        }
        for kind in StyleKind::PRIORITY {
            if let PrimaryLayout::StripAndLead { strip_max_height } =
                self.profiles.get(kind).primary
            {
                non_negative("strip_max_height", strip_max_height)?;
            }
        }
        Ok(())
    }

    /// Width available to a row of fields.
    pub fn content_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    pub fn profile(&self, kind: StyleKind) -> &StyleProfile {
        self.profiles.get(kind)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PassFonts {
    pub label: FontSpec,
    pub value: FontSpec,
    pub big_value: FontSpec,
    pub biggest_value: FontSpec,
}

impl Default for PassFonts {
    fn default() -> Self {
        Self {
            label: FontSpec::new(9.0, 600.0),
            value: FontSpec::regular(11.0),
            big_value: FontSpec::regular(17.0),
            biggest_value: FontSpec::regular(24.0),
        }
    }
}

impl PassFonts {
    pub fn get(&self, role: FontRole) -> FontSpec {
        match role {
            FontRole::Label => self.label,
            FontRole::Value => self.value,
            FontRole::BigValue => self.big_value,
            FontRole::BiggestValue => self.biggest_value,
        }
    }

    fn iter(&self) -> impl Iterator<Item = (&'static str, FontSpec)> {
        [
            ("label", self.label),
            ("value", self.value),
            ("big_value", self.big_value),
            ("biggest_value", self.biggest_value),
        ]
        .into_iter()
    }
}

/// Named entry of [`PassFonts`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontRole {
    Label,
    Value,
    BigValue,
    BiggestValue,
}

/// Colors used when the descriptor has none (or an unparsable one).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DefaultColors {
    pub background: Rgb8,
    pub foreground: Rgb8,
    pub label: Rgb8,
}

impl Default for DefaultColors {
    fn default() -> Self {
        Self {
            background: Rgb8::WHITE,
            foreground: Rgb8::BLACK,
            label: Rgb8::BLACK,
        }
    }
}

/// How the primary group is drawn.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrimaryLayout {
    /// Exactly two fields side by side; fewer is a layout error.
    OriginDestination,
    /// Strip image clipped to `strip_max_height`, then the first field.
    StripAndLead { strip_max_height: f64 },
    /// The first field only.
    Lead,
}

/// How the secondary and auxiliary groups are packed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryLayout {
    /// Auxiliary block, then secondary block.
    AuxiliaryThenSecondary,
    /// Secondary followed by auxiliary, packed as one block.
    Combined,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StyleProfile {
    pub primary: PrimaryLayout,
    pub primary_value_font: FontRole,
    pub secondary: SecondaryLayout,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleProfiles {
    pub boarding_pass: StyleProfile,
    pub coupon: StyleProfile,
    pub event_ticket: StyleProfile,
    pub generic: StyleProfile,
    pub store_card: StyleProfile,
}

impl Default for StyleProfiles {
    fn default() -> Self {
        let strip = |strip_max_height: f64, font: FontRole| StyleProfile {
            primary: PrimaryLayout::StripAndLead { strip_max_height },
            primary_value_font: font,
            secondary: SecondaryLayout::Combined,
        };
        Self {
            boarding_pass: StyleProfile {
                primary: PrimaryLayout::OriginDestination,
                primary_value_font: FontRole::BiggestValue,
                secondary: SecondaryLayout::AuxiliaryThenSecondary,
            },
            coupon: strip(144.0, FontRole::BiggestValue),
            event_ticket: strip(98.0, FontRole::BigValue),
            generic: StyleProfile {
                primary: PrimaryLayout::Lead,
                primary_value_font: FontRole::BigValue,
                secondary: SecondaryLayout::Combined,
            },
            store_card: strip(144.0, FontRole::BiggestValue),
        }
    }
}

impl StyleProfiles {
    pub fn get(&self, kind: StyleKind) -> &StyleProfile {
        match kind {
            StyleKind::BoardingPass => &self.boarding_pass,
            StyleKind::Coupon => &self.coupon,
            StyleKind::EventTicket => &self.event_ticket,
            StyleKind::Generic => &self.generic,
            StyleKind::StoreCard => &self.store_card,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/config.rs"]
mod tests;
