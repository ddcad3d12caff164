pub(crate) mod barcode;
pub(crate) mod command;
pub(crate) mod config;
pub(crate) mod plotter;
