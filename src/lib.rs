//! passview decodes digital wallet passes and lays out their front side.
//!
//! The pipeline is synchronous and has two stages:
//!
//! - [`decode_archive`] turns container bytes into an immutable [`PassArchive`]
//! - [`Pass::new`] (or [`PassArchive::load_pass`]) builds the localized [`Pass`] view
//! - [`render`] turns a [`PassSource`] into an ordered list of [`DrawCommand`]s
//!
//! Text metrics and barcode symbol sizes come from the [`TextMeasurer`] and
//! [`BarcodeEncoder`] seams.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod archive;
pub(crate) mod layout;
pub(crate) mod model;
pub(crate) mod render;

pub use crate::foundation::core::{Point, Rect, Rgb8, Size, TextAlign};
pub use crate::foundation::error::{PassError, PassResult};

pub use crate::archive::decode::{MemberKind, PassArchive, decode_archive, locale_for_member};
pub use crate::archive::images::{DecodedImage, decode_png};
pub use crate::archive::locale::{
    LocaleSelection, preferred_locales_from, preferred_locales_from_env, select_locale,
};
pub use crate::archive::strings::TranslationTable;

pub use crate::model::barcode::{Barcode, BarcodeFormat};
pub use crate::model::color::parse_rgb;
pub use crate::model::field::{Field, FieldGroup, FieldGroupKind};
pub use crate::model::flat::FlatPass;
pub use crate::model::pass::{ImageRef, Location, Pass};
pub use crate::model::style::{Style, StyleKind, TransitType};

pub use crate::layout::fields::{
    FieldLayout, FieldRow, PackedRows, RowAdvance, layout_rows, pack_rows, row_alignment,
};
pub use crate::layout::text::{
    FontSpec, MonospaceMeasurer, ParleyMeasurer, TextExtent, TextMeasurer,
};

pub use crate::render::barcode::{
    BarcodeEncoder, BarcodeRegion, NominalBarcodeEncoder, SymbolSize, barcode_box, barcode_region,
};
pub use crate::render::command::DrawCommand;
pub use crate::render::config::{
    DefaultColors, FontRole, PassFonts, PrimaryLayout, RenderConfig, SecondaryLayout, StyleProfile,
    StyleProfiles,
};
pub use crate::render::plotter::{PassSource, RenderedPass, render};
