use serde_json::Value;

use crate::foundation::error::{PassError, PassResult};

/// Symbology named by a barcode dictionary.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum BarcodeFormat {
    Qr,
    Pdf417,
    Aztec,
    Code128,
    /// A format string this crate does not know; kept verbatim.
    Other(String),
}

impl BarcodeFormat {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "PKBarcodeFormatQR" => Self::Qr,
            "PKBarcodeFormatPDF417" => Self::Pdf417,
            "PKBarcodeFormatAztec" => Self::Aztec,
            "PKBarcodeFormatCode128" => Self::Code128,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Qr => "PKBarcodeFormatQR",
            Self::Pdf417 => "PKBarcodeFormatPDF417",
            Self::Aztec => "PKBarcodeFormatAztec",
            Self::Code128 => "PKBarcodeFormatCode128",
            Self::Other(s) => s,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Barcode {
    pub format: BarcodeFormat,
    pub message: String,
    pub message_encoding: String,
    pub alt_text: Option<String>,
}

impl Barcode {
    pub(crate) fn from_json(raw: &Value, path: &str) -> PassResult<Self> {
        let obj = raw
            .as_object()
            .ok_or_else(|| PassError::descriptor_invalid(format!("{path} is not an object")))?;

        let mandatory = |key: &str| -> PassResult<String> {
            match obj.get(key) {
                Some(Value::String(s)) => Ok(s.clone()),
                Some(Value::Null) | None => Err(PassError::field_missing(format!("{path}.{key}"))),
                Some(_) => Err(PassError::descriptor_invalid(format!(
                    "{path}.{key} is not a string"
                ))),
            }
        };

        Ok(Self {
            format: BarcodeFormat::parse(&mandatory("format")?),
            message: mandatory("message")?,
            message_encoding: mandatory("messageEncoding")?,
            alt_text: obj
                .get("altText")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}
