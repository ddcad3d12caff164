use std::{
    collections::BTreeMap,
    io::{Cursor, Read},
    path::Path,
};

use anyhow::Context;

use crate::{
    archive::images::{DecodedImage, decode_png},
    archive::locale::{LocaleSelection, select_locale},
    archive::strings::TranslationTable,
    foundation::error::{PassError, PassResult},
    model::pass::Pass,
};

const MANIFEST: &str = "manifest.json";

/// How a manifest entry is routed during decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberKind {
    Image,
    Strings,
    Descriptor,
}

impl MemberKind {
    /// Classify a member name by suffix; `None` means the member is ignored.
    pub fn classify(name: &str) -> Option<Self> {
        if name.ends_with(".png") {
            Some(Self::Image)
        } else if name.ends_with("pass.strings") {
            Some(Self::Strings)
        } else if name.ends_with("pass.json") {
            Some(Self::Descriptor)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Immutable decoded contents of a pass container.
///
/// Built once by [`decode_archive`]; the container handle is released before the
/// archive is returned. Images live here and are borrowed by [`Pass`].
pub struct PassArchive {
    descriptor: serde_json::Value,
    translations: BTreeMap<String, TranslationTable>,
    images: BTreeMap<String, DecodedImage>,
}

impl PassArchive {
    #[cfg(test)]
    pub(crate) fn from_parts(
        descriptor: serde_json::Value,
        translations: BTreeMap<String, TranslationTable>,
        images: BTreeMap<String, DecodedImage>,
    ) -> Self {
        Self {
            descriptor,
            translations,
            images,
        }
    }

    /// Read a container from disk and decode it.
    pub fn from_path(path: impl AsRef<Path>) -> PassResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read pass archive '{}'", path.display()))?;
        decode_archive(&bytes)
    }

    /// Parsed `pass.json` tree.
    pub fn descriptor(&self) -> &serde_json::Value {
        &self.descriptor
    }

    /// Translation tables keyed by locale code (`en`, `zh-Hans`, ...).
    pub fn translations(&self) -> &BTreeMap<String, TranslationTable> {
        &self.translations
    }

    pub fn translation(&self, locale: &str) -> Option<&TranslationTable> {
        self.translations.get(locale)
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.translations.keys().map(String::as_str)
    }

    /// Successfully decoded images keyed by member name.
    pub fn images(&self) -> &BTreeMap<String, DecodedImage> {
        &self.images
    }

    pub fn image(&self, name: &str) -> Option<&DecodedImage> {
        self.images.get(name)
    }

    /// Match `preferences` against the shipped locales.
    pub fn select_locale<S: AsRef<str>>(&self, preferences: &[S]) -> LocaleSelection {
        select_locale(&self.translations, preferences)
    }

    /// Select a locale for `preferences` and build the [`Pass`] view.
    ///
    /// When no locale resolves, the pass is built without substitution; callers
    /// that want to ask the user should use [`PassArchive::select_locale`] and
    /// [`Pass::new`] directly.
    pub fn load_pass<S: AsRef<str>>(&self, preferences: &[S]) -> PassResult<Pass<'_>> {
        let selection = self.select_locale(preferences);
        if let LocaleSelection::NeedsChoice(available) = &selection {
            tracing::warn!(?available, "no preferred locale matched; using untranslated values");
        }
        Pass::new(self, selection.resolved())
    }
}

/// Decode a pass container from raw bytes.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_archive(bytes: &[u8]) -> PassResult<PassArchive> {
    let mut zip = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| PassError::archive_corrupt(format!("cannot open container: {e}")))?;

    let manifest_bytes = read_member(&mut zip, MANIFEST)
        .map_err(|e| PassError::archive_corrupt(format!("{MANIFEST}: {e}")))?;
    let manifest: serde_json::Value = serde_json::from_slice(&manifest_bytes)
        .map_err(|e| PassError::archive_corrupt(format!("{MANIFEST} is not JSON: {e}")))?;
    let entries = manifest
        .as_object()
        .ok_or_else(|| PassError::archive_corrupt(format!("{MANIFEST} is not an object")))?;

    let mut descriptor = None;
    let mut translations = BTreeMap::new();
    let mut images = BTreeMap::new();

    for name in entries.keys() {
        let Some(kind) = MemberKind::classify(name) else {
            tracing::debug!(member = %name, "ignoring unrecognized member");
            continue;
        };

        match kind {
            MemberKind::Image => {
                let decoded = read_member(&mut zip, name).and_then(|b| decode_png(&b));
                match decoded {
                    Ok(image) => {
                        images.insert(name.clone(), image);
                    }
                    Err(e) => tracing::warn!(member = %name, error = %e, "image unavailable"),
                }
            }
            MemberKind::Strings => match read_member(&mut zip, name) {
                Ok(b) => {
                    let locale = locale_for_member(name);
                    let table = TranslationTable::parse(&b);
                    tracing::debug!(
                        member = %name,
                        %locale,
                        entries = table.len(),
                        "loaded translations"
                    );
                    translations.insert(locale, table);
                }
                Err(e) => tracing::warn!(member = %name, error = %e, "translations unavailable"),
            },
            MemberKind::Descriptor => {
                let b = read_member(&mut zip, name)
                    .map_err(|e| PassError::descriptor_invalid(format!("{name}: {e}")))?;
                let tree = serde_json::from_slice(&b).map_err(|e| {
                    PassError::descriptor_invalid(format!("{name} is not valid JSON: {e}"))
                })?;
                descriptor = Some(tree);
            }
        }
    }
    drop(zip);

    let descriptor = descriptor
        .ok_or_else(|| PassError::descriptor_invalid("manifest does not list pass.json"))?;

    Ok(PassArchive {
        descriptor,
        translations,
        images,
    })
}

/// Locale code of a `pass.strings` member: the name up to its first `.`.
pub fn locale_for_member(name: &str) -> String {
    name.split('.').next().unwrap_or_default().to_string()
}

fn read_member(zip: &mut zip::ZipArchive<Cursor<&[u8]>>, name: &str) -> PassResult<Vec<u8>> {
    let mut file = zip
        .by_name(name)
        .with_context(|| format!("member '{name}' not found in container"))?;
    let mut out = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
    file.read_to_end(&mut out)
        .with_context(|| format!("read member '{name}'"))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/archive/decode.rs"]
mod tests;
