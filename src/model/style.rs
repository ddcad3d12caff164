use serde_json::{Map, Value};

use crate::foundation::error::{PassError, PassResult};

/// The five mutually exclusive pass layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleKind {
    BoardingPass,
    Coupon,
    EventTicket,
    Generic,
    StoreCard,
}

impl StyleKind {
    /// Detection order; the first key present in the descriptor wins.
    pub const PRIORITY: [Self; 5] = [
        Self::BoardingPass,
        Self::Coupon,
        Self::EventTicket,
        Self::Generic,
        Self::StoreCard,
    ];

    /// Top-level descriptor key holding this style's object.
    pub fn json_key(self) -> &'static str {
        match self {
            Self::BoardingPass => "boardingPass",
            Self::Coupon => "coupon",
            Self::EventTicket => "eventTicket",
            Self::Generic => "generic",
            Self::StoreCard => "storeCard",
        }
    }

    pub fn supports_strip(self) -> bool {
        matches!(self, Self::Coupon | Self::EventTicket | Self::StoreCard)
    }

    pub fn supports_background(self) -> bool {
        matches!(self, Self::EventTicket)
    }

    pub fn supports_thumbnail(self) -> bool {
        matches!(self, Self::EventTicket | Self::Generic)
    }

    pub fn supports_footer(self) -> bool {
        matches!(self, Self::BoardingPass)
    }

    pub fn supports_grouping(self) -> bool {
        matches!(self, Self::BoardingPass | Self::EventTicket)
    }
}

/// Mode of transport shown on a boarding pass.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub enum TransitType {
    Air,
    Boat,
    Bus,
    Generic,
    Train,
    Other(String),
}

impl TransitType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "PKTransitTypeAir" => Self::Air,
            "PKTransitTypeBoat" => Self::Boat,
            "PKTransitTypeBus" => Self::Bus,
            "PKTransitTypeGeneric" => Self::Generic,
            "PKTransitTypeTrain" => Self::Train,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Detected style together with the data only that style carries.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "style", rename_all = "camelCase")]
pub enum Style {
    BoardingPass {
        transit_type: Option<TransitType>,
        grouping_identifier: Option<String>,
    },
    Coupon,
    EventTicket {
        grouping_identifier: Option<String>,
    },
    Generic,
    StoreCard,
}

impl Style {
    pub fn kind(&self) -> StyleKind {
        match self {
            Self::BoardingPass { .. } => StyleKind::BoardingPass,
            Self::Coupon => StyleKind::Coupon,
            Self::EventTicket { .. } => StyleKind::EventTicket,
            Self::Generic => StyleKind::Generic,
            Self::StoreCard => StyleKind::StoreCard,
        }
    }

    pub fn transit_type(&self) -> Option<&TransitType> {
        match self {
            Self::BoardingPass { transit_type, .. } => transit_type.as_ref(),
            _ => None,
        }
    }

    pub fn grouping_identifier(&self) -> Option<&str> {
        match self {
            Self::BoardingPass {
                grouping_identifier,
                ..
            }
            | Self::EventTicket {
                grouping_identifier,
            } => grouping_identifier.as_deref(),
            _ => None,
        }
    }
}

/// Find the style key of `root` and return it with the style object.
///
/// With several style keys present the earliest in [`StyleKind::PRIORITY`]
/// is honored.
pub(crate) fn detect_style(
    root: &Map<String, Value>,
) -> PassResult<(StyleKind, &Map<String, Value>)> {
    let mut present = StyleKind::PRIORITY
        .into_iter()
        .filter(|kind| root.contains_key(kind.json_key()));

    let kind = present
        .next()
        .ok_or_else(|| PassError::descriptor_invalid("descriptor has no pass style key"))?;

    let ignored: Vec<_> = present.map(StyleKind::json_key).collect();
    if !ignored.is_empty() {
        tracing::warn!(chosen = kind.json_key(), ?ignored, "descriptor has several style keys");
    }

    let obj = root
        .get(kind.json_key())
        .and_then(Value::as_object)
        .ok_or_else(|| {
            PassError::descriptor_invalid(format!("'{}' is not an object", kind.json_key()))
        })?;

    Ok((kind, obj))
}

#[cfg(test)]
#[path = "../../tests/unit/model/style.rs"]
mod tests;
