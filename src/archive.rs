pub(crate) mod decode;
pub(crate) mod images;
pub(crate) mod locale;
pub(crate) mod strings;
