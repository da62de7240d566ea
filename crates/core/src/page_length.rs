//! Page-length codec for the film-industry eighths unit.
//!
//! One script page is eight eighths; lengths display as `"1 2/8"`-style
//! strings on stripboards and one-liners.

use crate::error::CoreError;

/// Eighths in a full script page.
pub const EIGHTHS_PER_PAGE: u32 = 8;

/// Format a page length in eighths as the conventional display string.
///
/// `0` → `"0"`, whole pages only → `"3"`, a fraction only → `"5/8"`,
/// both → `"1 2/8"`.
pub fn format_eighths(eighths: u32) -> String {
    if eighths == 0 {
        return "0".to_string();
    }
    let whole = eighths / EIGHTHS_PER_PAGE;
    let rem = eighths % EIGHTHS_PER_PAGE;
    match (whole, rem) {
        (_, 0) => whole.to_string(),
        (0, _) => format!("{rem}/8"),
        _ => format!("{whole} {rem}/8"),
    }
}

/// Parse a display string produced by [`format_eighths`] back into eighths.
///
/// Accepts `"0"`, `"3"`, `"5/8"`, and `"1 2/8"` forms. Anything else is a
/// parse error.
pub fn parse_eighths(text: &str) -> Result<u32, CoreError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CoreError::Parse("empty page length".to_string()));
    }

    let (whole_part, frac_part) = match text.split_once(' ') {
        Some((whole, frac)) => (Some(whole), Some(frac)),
        None if text.contains('/') => (None, Some(text)),
        None => (Some(text), None),
    };

    let mut eighths = 0u32;

    if let Some(whole) = whole_part {
        let pages: u32 = whole
            .parse()
            .map_err(|_| CoreError::Parse(format!("invalid page count: {whole:?}")))?;
        eighths += pages * EIGHTHS_PER_PAGE;
    }

    if let Some(frac) = frac_part {
        let rem = frac
            .strip_suffix("/8")
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n < EIGHTHS_PER_PAGE)
            .ok_or_else(|| CoreError::Parse(format!("invalid eighths fraction: {frac:?}")))?;
        eighths += rem;
    }

    Ok(eighths)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
