use serde_json::Value;

use crate::{
    archive::strings::TranslationTable,
    foundation::error::{PassError, PassResult},
};

/// Positional region a field group occupies on the pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldGroupKind {
    Header,
    Primary,
    Secondary,
    Auxiliary,
    Back,
}

impl FieldGroupKind {
    pub const ALL: [Self; 5] = [
        Self::Header,
        Self::Primary,
        Self::Secondary,
        Self::Auxiliary,
        Self::Back,
    ];

    /// Key of the group's array inside the style object.
    pub fn json_key(self) -> &'static str {
        match self {
            Self::Header => "headerFields",
            Self::Primary => "primaryFields",
            Self::Secondary => "secondaryFields",
            Self::Auxiliary => "auxiliaryFields",
            Self::Back => "backFields",
        }
    }
}

/// A label/value pair shown on the pass.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Field {
    pub key: String,
    pub label: Option<String>,
    pub value: String,
}

/// Ordered fields of one group.
pub type FieldGroup = Vec<Field>;

impl Field {
    pub fn new(key: impl Into<String>, label: Option<&str>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.map(str::to_string),
            value: value.into(),
        }
    }

    /// Build a field from its descriptor dictionary, substituting `value` and
    /// `label` through `translation` by whole-string match.
    ///
    /// `path` names the entry in error messages (`primaryFields[0]`).
    pub(crate) fn from_json(
        raw: &Value,
        translation: Option<&TranslationTable>,
        path: &str,
    ) -> PassResult<Self> {
        let obj = raw
            .as_object()
            .ok_or_else(|| PassError::descriptor_invalid(format!("{path} is not an object")))?;

        let key = match obj.get("key") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => return Err(PassError::field_missing(format!("{path}.key"))),
            Some(_) => {
                return Err(PassError::descriptor_invalid(format!(
                    "{path}.key is not a string"
                )));
            }
        };

        let translate = |s: &str| match translation {
            Some(t) => t.lookup(s).to_string(),
            None => s.to_string(),
        };

        let value = match obj.get("value") {
            Some(Value::String(s)) => translate(s),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
            Some(Value::Null) | None => {
                return Err(PassError::field_missing(format!("{path}.value")));
            }
            Some(_) => {
                return Err(PassError::descriptor_invalid(format!(
                    "{path}.value must be a string or number"
                )));
            }
        };

        let label = obj.get("label").and_then(Value::as_str).map(translate);

        Ok(Self { key, label, value })
    }
}

/// Build the named group from `style_obj`; a missing array is an empty group.
pub(crate) fn field_group(
    style_obj: &serde_json::Map<String, Value>,
    kind: FieldGroupKind,
    translation: Option<&TranslationTable>,
) -> PassResult<FieldGroup> {
    let name = kind.json_key();
    let Some(raw) = style_obj.get(name) else {
        return Ok(Vec::new());
    };
    let entries = match raw {
        Value::Array(entries) => entries,
        Value::Null => return Ok(Vec::new()),
        _ => {
            return Err(PassError::descriptor_invalid(format!(
                "{name} is not an array"
            )));
        }
    };

    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| Field::from_json(entry, translation, &format!("{name}[{idx}]")))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/model/field.rs"]
mod tests;
