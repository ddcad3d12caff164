use crate::foundation::core::Rgb8;

/// Parse a descriptor color of the form `rgb(r, g, b)`.
///
/// Whitespace is allowed around each component; components must be plain
/// decimal integers in `0..=255`. Hex, named and `rgba(...)` colors are not
/// accepted and yield `None`, as does anything malformed.
pub fn parse_rgb(text: &str) -> Option<Rgb8> {
    let inner = text.trim().strip_prefix("rgb(")?.strip_suffix(')')?;

    let mut parts = inner.split(',');
    let r = component(parts.next()?)?;
    let g = component(parts.next()?)?;
    let b = component(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some(Rgb8::new(r, g, b))
}

fn component(raw: &str) -> Option<u8> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
