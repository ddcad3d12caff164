use serde_json::{Map, Value};

use crate::{
    archive::decode::PassArchive,
    archive::images::DecodedImage,
    archive::strings::TranslationTable,
    foundation::core::Rgb8,
    foundation::error::{PassError, PassResult},
    model::barcode::Barcode,
    model::color::parse_rgb,
    model::field::{FieldGroup, FieldGroupKind, field_group},
    model::style::{Style, StyleKind, TransitType, detect_style},
};

/// An image borrowed from the [`PassArchive`] together with its member name.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageRef<'a> {
    pub name: &'a str,
    pub image: &'a DecodedImage,
}

/// A location where the pass is relevant.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: Option<f64>,
    #[serde(default)]
    pub relevant_text: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
/// Normalized, read-only view of a decoded pass.
///
/// Built once by [`Pass::new`] from a [`PassArchive`]; translated strings are
/// owned, images are borrowed from the archive. A different locale means
/// building a new `Pass` from the same archive.
pub struct Pass<'a> {
    /// Descriptor schema version.
    pub format_version: i64,
    pub pass_type_identifier: String,
    pub serial_number: String,
    pub team_identifier: String,
    pub organization_name: String,
    pub description: String,

    /// W3C date string, kept verbatim.
    pub expiration_date: Option<String>,
    pub voided: Option<bool>,
    pub locations: Vec<Location>,
    /// Meters.
    pub max_distance: Option<f64>,
    pub relevant_date: Option<String>,
    pub logo_text: Option<String>,

    /// Detected style and the data only that style carries.
    pub style: Style,

    pub header_fields: FieldGroup,
    pub primary_fields: FieldGroup,
    pub secondary_fields: FieldGroup,
    pub auxiliary_fields: FieldGroup,
    pub back_fields: FieldGroup,

    /// Legacy single barcode dictionary.
    pub barcode: Option<Barcode>,
    pub barcodes: Vec<Barcode>,

    background_color: Option<String>,
    foreground_color: Option<String>,
    label_color: Option<String>,

    pub icon: Option<ImageRef<'a>>,
    pub logo: Option<ImageRef<'a>>,
    /// Only for styles that support a background image.
    pub background: Option<ImageRef<'a>>,
    /// Only for styles that support a strip image.
    pub strip: Option<ImageRef<'a>>,
    pub thumbnail: Option<ImageRef<'a>>,
    pub footer: Option<ImageRef<'a>>,

    /// Locale whose translation table was applied, if any.
    pub locale: Option<String>,
}

impl<'a> Pass<'a> {
    /// Build the pass view, applying the translation table of `locale`.
    ///
    /// `locale` should be a key of [`PassArchive::translations`]; an unknown
    /// locale builds the pass without substitution.
    #[tracing::instrument(skip(archive))]
    pub fn new(archive: &'a PassArchive, locale: Option<&str>) -> PassResult<Self> {
        let root = archive
            .descriptor()
            .as_object()
            .ok_or_else(|| PassError::descriptor_invalid("pass.json root is not an object"))?;

        let (locale, translation) = match locale {
            Some(code) => match archive.translation(code) {
                Some(table) => (Some(code.to_string()), Some(table)),
                None => {
                    tracing::warn!(locale = code, "pass has no translations for locale");
                    (None, None)
                }
            },
            None => (None, None),
        };

        let (kind, style_obj) = detect_style(root)?;
        let style = build_style(kind, root, style_obj);

        let groups = |kind: FieldGroupKind| field_group(style_obj, kind, translation);
        let (barcode, barcodes) = barcodes(root, style_obj)?;

        let image = |base: &str| find_image(archive, base, locale.as_deref());
        let icon = image("icon");
        let logo = image("logo");
        let background = kind
            .supports_background()
            .then(|| image("background"))
            .flatten();
        let strip = kind.supports_strip().then(|| image("strip")).flatten();
        let thumbnail = kind.supports_thumbnail().then(|| image("thumbnail")).flatten();
        let footer = kind.supports_footer().then(|| image("footer")).flatten();

        Ok(Self {
            format_version: mandatory_i64(root, "formatVersion")?,
            pass_type_identifier: mandatory_str(root, "passTypeIdentifier")?,
            serial_number: mandatory_str(root, "serialNumber")?,
            team_identifier: mandatory_str(root, "teamIdentifier")?,
            organization_name: mandatory_str(root, "organizationName")?,
            description: mandatory_str(root, "description")?,

            expiration_date: optional_str(root, "expirationDate"),
            voided: optional_bool(root, "voided"),
            locations: locations(root),
            max_distance: optional_f64(root, "maxDistance"),
            relevant_date: optional_str(root, "relevantDate"),
            logo_text: optional_str(root, "logoText").map(|s| translate(translation, s)),

            style,

            header_fields: groups(FieldGroupKind::Header)?,
            primary_fields: groups(FieldGroupKind::Primary)?,
            secondary_fields: groups(FieldGroupKind::Secondary)?,
            auxiliary_fields: groups(FieldGroupKind::Auxiliary)?,
            back_fields: groups(FieldGroupKind::Back)?,

            barcode,
            barcodes,

            background_color: optional_str_scoped(root, style_obj, "backgroundColor"),
            foreground_color: optional_str_scoped(root, style_obj, "foregroundColor"),
            label_color: optional_str_scoped(root, style_obj, "labelColor"),

            icon,
            logo,
            background,
            strip,
            thumbnail,
            footer,

            locale,
        })
    }

    pub fn style_kind(&self) -> StyleKind {
        self.style.kind()
    }

    pub fn transit_type(&self) -> Option<&TransitType> {
        self.style.transit_type()
    }

    pub fn grouping_identifier(&self) -> Option<&str> {
        self.style.grouping_identifier()
    }

    pub fn background_color(&self) -> Option<Rgb8> {
        self.background_color.as_deref().and_then(parse_rgb)
    }

    pub fn foreground_color(&self) -> Option<Rgb8> {
        self.foreground_color.as_deref().and_then(parse_rgb)
    }

    pub fn label_color(&self) -> Option<Rgb8> {
        self.label_color.as_deref().and_then(parse_rgb)
    }

    /// Raw `backgroundColor` string as authored.
    pub fn background_color_raw(&self) -> Option<&str> {
        self.background_color.as_deref()
    }

    /// Barcodes in preference order: the `barcodes` array, then the legacy entry.
    pub fn barcode_candidates(&self) -> impl Iterator<Item = &Barcode> {
        self.barcodes.iter().chain(self.barcode.iter())
    }
}

fn build_style(
    kind: StyleKind,
    root: &Map<String, Value>,
    style_obj: &Map<String, Value>,
) -> Style {
    let grouping_identifier = || {
        kind.supports_grouping()
            .then(|| optional_str(root, "groupingIdentifier"))
            .flatten()
    };

    match kind {
        StyleKind::BoardingPass => Style::BoardingPass {
            transit_type: optional_str(style_obj, "transitType").map(|s| TransitType::parse(&s)),
            grouping_identifier: grouping_identifier(),
        },
        StyleKind::Coupon => Style::Coupon,
        StyleKind::EventTicket => Style::EventTicket {
            grouping_identifier: grouping_identifier(),
        },
        StyleKind::Generic => Style::Generic,
        StyleKind::StoreCard => Style::StoreCard,
    }
}

fn translate(translation: Option<&TranslationTable>, s: String) -> String {
    match translation {
        Some(t) => t.lookup(&s).to_string(),
        None => s,
    }
}

fn barcodes(
    root: &Map<String, Value>,
    style_obj: &Map<String, Value>,
) -> PassResult<(Option<Barcode>, Vec<Barcode>)> {
    let scoped = |key: &str| root.get(key).or_else(|| style_obj.get(key));

    let barcode = match scoped("barcode") {
        Some(Value::Null) | None => None,
        Some(raw) => Some(Barcode::from_json(raw, "barcode")?),
    };

    let barcodes = match scoped("barcodes") {
        Some(Value::Array(entries)) => entries
            .iter()
            .enumerate()
            .map(|(idx, raw)| Barcode::from_json(raw, &format!("barcodes[{idx}]")))
            .collect::<PassResult<Vec<_>>>()?,
        Some(Value::Null) | None => Vec::new(),
        Some(_) => return Err(PassError::descriptor_invalid("barcodes is not an array")),
    };

    Ok((barcode, barcodes))
}

fn locations(root: &Map<String, Value>) -> Vec<Location> {
    let Some(raw) = root.get("locations") else {
        return Vec::new();
    };
    match serde_json::from_value::<Vec<Location>>(raw.clone()) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring malformed locations");
            Vec::new()
        }
    }
}

// Lookup order: localized, plain, then high-density variants.
fn find_image<'a>(
    archive: &'a PassArchive,
    base: &str,
    locale: Option<&str>,
) -> Option<ImageRef<'a>> {
    let mut candidates = Vec::with_capacity(4);
    if let Some(locale) = locale {
        candidates.push(format!("{locale}.lproj/{base}.png"));
    }
    candidates.push(format!("{base}.png"));
    candidates.push(format!("{base}@2x.png"));
    candidates.push(format!("{base}@3x.png"));

    candidates.iter().find_map(|name| {
        archive
            .images()
            .get_key_value(name.as_str())
            .map(|(name, image)| ImageRef {
                name: name.as_str(),
                image,
            })
    })
}

fn mandatory<'j>(root: &'j Map<String, Value>, key: &str) -> PassResult<&'j Value> {
    match root.get(key) {
        Some(Value::Null) | None => Err(PassError::field_missing(key)),
        Some(v) => Ok(v),
    }
}

fn mandatory_str(root: &Map<String, Value>, key: &str) -> PassResult<String> {
    mandatory(root, key)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| PassError::descriptor_invalid(format!("'{key}' is not a string")))
}

fn mandatory_i64(root: &Map<String, Value>, key: &str) -> PassResult<i64> {
    mandatory(root, key)?
        .as_i64()
        .ok_or_else(|| PassError::descriptor_invalid(format!("'{key}' is not an integer")))
}

fn optional<'j, T>(
    map: &'j Map<String, Value>,
    key: &str,
    convert: impl FnOnce(&'j Value) -> Option<T>,
) -> Option<T> {
    match map.get(key) {
        Some(Value::Null) | None => None,
        Some(v) => {
            let out = convert(v);
            if out.is_none() {
                tracing::warn!(key, "ignoring optional field with unexpected type");
            }
            out
        }
    }
}

fn optional_str(map: &Map<String, Value>, key: &str) -> Option<String> {
    optional(map, key, |v| v.as_str().map(str::to_string))
}

fn optional_bool(map: &Map<String, Value>, key: &str) -> Option<bool> {
    optional(map, key, Value::as_bool)
}

fn optional_f64(map: &Map<String, Value>, key: &str) -> Option<f64> {
    optional(map, key, Value::as_f64)
}

fn optional_str_scoped(
    root: &Map<String, Value>,
    style_obj: &Map<String, Value>,
    key: &str,
) -> Option<String> {
    optional_str(root, key).or_else(|| optional_str(style_obj, key))
}

#[cfg(test)]
#[path = "../../tests/unit/model/pass.rs"]
mod tests;
