use std::collections::BTreeMap;

/// Localized strings for a single locale, parsed from a `pass.strings` member.
///
/// Entries are line-oriented `"key" = "value"` pairs. Anything else on a line
/// (comments, blank lines, broken quoting) is skipped without failing.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct TranslationTable {
    entries: BTreeMap<String, String>,
}

impl TranslationTable {
    /// Parse raw member bytes, honoring UTF-8 and UTF-16 byte order marks.
    pub fn parse(bytes: &[u8]) -> Self {
        Self::from_text(&decode_text(bytes))
    }

    pub fn from_text(text: &str) -> Self {
        let mut entries = BTreeMap::new();
        for line in text.split('\n') {
            match parse_entry(line) {
                Some((key, value)) => {
                    entries.insert(key, value);
                }
                None => {
                    if !line.trim().is_empty() {
                        tracing::trace!(line, "skipping malformed translation line");
                    }
                }
            }
        }
        Self { entries }
    }

    /// Translated string for `source`, or `source` itself when there is none.
    pub fn lookup<'s>(&'s self, source: &'s str) -> &'s str {
        self.entries.get(source).map(String::as_str).unwrap_or(source)
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries.get(source).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn decode_text(bytes: &[u8]) -> String {
    match bytes {
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8_lossy(rest).into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

const SEPARATOR: &str = "\" = \"";

// Greedy on both sides: the key runs to the last separator that still has a
// closing quote after it, the value runs to the last quote on the line.
fn parse_entry(line: &str) -> Option<(String, String)> {
    let start = line.find('"')?;
    let rest = &line[start + 1..];

    for (sep, _) in rest.rmatch_indices(SEPARATOR) {
        let after = &rest[sep + SEPARATOR.len()..];
        if let Some(end) = after.rfind('"') {
            return Some((unescape(&rest[..sep]), unescape(&after[..end])));
        }
    }
    None
}

fn unescape(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/archive/strings.rs"]
mod tests;
