use crate::{
    foundation::core::{Rect, Rgb8, TextAlign},
    layout::text::FontSpec,
};

/// One draw primitive, in pass coordinates (origin top-left, y down).
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Rgb8,
    },
    /// Blit the archive image `name` scaled into `rect`.
    Image {
        name: String,
        rect: Rect,
        #[serde(skip_serializing_if = "Option::is_none")]
        clip: Option<Rect>,
        #[serde(skip_serializing_if = "Option::is_none")]
        blur_radius: Option<f64>,
    },
    /// A measured text block; `rect` is its layout box.
    Text {
        rect: Rect,
        text: String,
        font: FontSpec,
        color: Rgb8,
        align: TextAlign,
    },
}

impl DrawCommand {
    pub fn rect(&self) -> Rect {
        match self {
            Self::FillRect { rect, .. } | Self::Image { rect, .. } | Self::Text { rect, .. } => {
                *rect
            }
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn image_name(&self) -> Option<&str> {
        match self {
            Self::Image { name, .. } => Some(name),
            _ => None,
        }
    }
}
