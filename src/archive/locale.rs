use std::collections::BTreeMap;

use crate::archive::strings::TranslationTable;

/// Outcome of matching user locale preferences against the locales a pass ships.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocaleSelection {
    /// A locale code present in the archive matched a preference.
    Resolved(String),
    /// Translations exist but none matched; the caller has to pick one.
    NeedsChoice(Vec<String>),
    /// The archive carries no translations; values are used verbatim.
    NoTranslations,
}

impl LocaleSelection {
    pub fn resolved(&self) -> Option<&str> {
        match self {
            Self::Resolved(code) => Some(code),
            _ => None,
        }
    }
}

/// Match prioritized locale `preferences` against the archive's locale codes.
///
/// A code matches a preference when it equals it or is a `-`-delimited prefix
/// of it (`en` matches `en-GB`, not `eng`). Preferences are tried in order; for
/// one preference the longest matching code wins.
pub fn select_locale<S: AsRef<str>>(
    translations: &BTreeMap<String, TranslationTable>,
    preferences: &[S],
) -> LocaleSelection {
    if translations.is_empty() {
        return LocaleSelection::NoTranslations;
    }

    for pref in preferences {
        let Some(pref) = normalize_tag(pref.as_ref()) else {
            continue;
        };
        let best = translations
            .keys()
            .filter(|code| tag_matches(&normalize_code(code), &pref))
            .max_by_key(|code| code.len());
        if let Some(code) = best {
            tracing::debug!(locale = %code, preference = %pref, "resolved pass locale");
            return LocaleSelection::Resolved(code.clone());
        }
    }

    LocaleSelection::NeedsChoice(translations.keys().cloned().collect())
}

/// Read the user's locale preferences from the conventional environment variables.
///
/// `LANGUAGE` may hold a colon-separated list and takes priority, followed by
/// `LC_ALL`, `LC_MESSAGES` and `LANG`. `C` and `POSIX` carry no language.
pub fn preferred_locales_from_env() -> Vec<String> {
    preferred_locales_from(|var| std::env::var(var).ok())
}

/// [`preferred_locales_from_env`] over an arbitrary variable lookup.
pub fn preferred_locales_from(lookup: impl Fn(&str) -> Option<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for var in ["LANGUAGE", "LC_ALL", "LC_MESSAGES", "LANG"] {
        let Some(value) = lookup(var) else {
            continue;
        };
        for tag in value.split(':') {
            let tag = tag.trim();
            if tag.is_empty() || tag == "C" || tag == "POSIX" || tag.starts_with("C.") {
                continue;
            }
            if !out.iter().any(|t| t == tag) {
                out.push(tag.to_string());
            }
        }
    }
    out
}

// `en_US.UTF-8@euro` -> `en-us`
fn normalize_tag(tag: &str) -> Option<String> {
    let tag = tag.split(['.', '@']).next().unwrap_or_default().trim();
    if tag.is_empty() {
        return None;
    }
    Some(normalize_code(tag))
}

fn normalize_code(code: &str) -> String {
    code.replace('_', "-").to_ascii_lowercase()
}

fn tag_matches(code: &str, pref: &str) -> bool {
    match pref.strip_prefix(code) {
        Some(rest) => rest.is_empty() || rest.starts_with('-'),
        None => false,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/archive/locale.rs"]
mod tests;
