pub(crate) mod barcode;
pub(crate) mod color;
pub(crate) mod field;
pub(crate) mod flat;
pub(crate) mod pass;
pub(crate) mod style;
