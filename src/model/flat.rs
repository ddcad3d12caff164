use crate::{
    foundation::core::Rgb8,
    model::barcode::Barcode,
    model::field::{Field, FieldGroup},
    model::pass::ImageRef,
};

/// A pass from a non-container format.
///
/// These passes have no style, strip or primary/secondary split: an accent
/// colored header with the icon, then a flat run of fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlatPass<'a> {
    pub accent_color: Option<Rgb8>,
    pub icon: Option<ImageRef<'a>>,
    pub fields: FieldGroup,
    pub barcode: Option<Barcode>,
}

impl<'a> FlatPass<'a> {
    pub fn new(fields: impl IntoIterator<Item = Field>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_accent_color(mut self, color: Rgb8) -> Self {
        self.accent_color = Some(color);
        self
    }

    pub fn with_icon(mut self, icon: ImageRef<'a>) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_barcode(mut self, barcode: Barcode) -> Self {
        self.barcode = Some(barcode);
        self
    }
}
