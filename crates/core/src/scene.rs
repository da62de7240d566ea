//! Scene model and scene-heading parser.
//!
//! Headings follow screenplay convention (`INT. KITCHEN - DAY`). The parser
//! splits a free-text heading into an interior/exterior code, a set
//! description, and an optional time-of-day, using a fixed prefix/suffix
//! table with no fuzzy matching. Headings that match no known prefix keep
//! the whole (suffix-stripped) text as the set description.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// One scene in shoot order.
///
/// The order of the slice a scene lives in *is* the shoot sequence; the
/// schedule builder never sorts. Day-break and off-day markers are flags on
/// the scene itself, interpreted by caller-supplied predicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Scene number as printed in the script (e.g. `"14A"`). Scenes with a
    /// blank number are skipped by the schedule builder.
    pub number: String,
    /// Free-text slugline, e.g. `"INT. KITCHEN - DAY"`.
    pub heading: String,
    /// Page length in eighths of a page.
    pub page_eighths: u32,
    /// Cast IDs appearing in the scene, in billing order.
    pub cast_ids: Vec<String>,
    /// Shoot location display string.
    pub location: String,
    /// Optional scheduling notes.
    pub notes: Option<String>,
    /// Marks the boundary between two shoot days.
    pub day_break: bool,
    /// Marks a calendar day with no shooting (weekend, travel).
    pub off_day: bool,
}

impl Scene {
    /// Create a regular scene with the given number, heading, and length.
    pub fn new(number: impl Into<String>, heading: impl Into<String>, page_eighths: u32) -> Self {
        Self {
            number: number.into(),
            heading: heading.into(),
            page_eighths,
            cast_ids: Vec::new(),
            location: String::new(),
            notes: None,
            day_break: false,
            off_day: false,
        }
    }

    /// Create a day-break marker. Carries no scene content.
    pub fn day_break_marker() -> Self {
        let mut scene = Self::new("", "", 0);
        scene.day_break = true;
        scene
    }

    /// Create an off-day marker. Advances the calendar without shooting.
    pub fn off_day_marker() -> Self {
        let mut scene = Self::new("", "", 0);
        scene.off_day = true;
        scene
    }
}

// ---------------------------------------------------------------------------
// IntExt
// ---------------------------------------------------------------------------

/// Interior/exterior code parsed from a scene heading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntExt {
    Int,
    Ext,
    IntExt,
    #[default]
    None,
}

impl IntExt {
    /// Industry display code (`"INT"`, `"EXT"`, `"I/E"`, or empty).
    pub fn code(self) -> &'static str {
        match self {
            Self::Int => "INT",
            Self::Ext => "EXT",
            Self::IntExt => "I/E",
            Self::None => "",
        }
    }
}

// ---------------------------------------------------------------------------
// Heading parser
// ---------------------------------------------------------------------------

/// Recognized heading prefixes, longest first so `INT./EXT.` wins over `INT.`.
const INT_EXT_PREFIXES: &[(&str, IntExt)] = &[
    ("INT./EXT.", IntExt::IntExt),
    ("INT/EXT", IntExt::IntExt),
    ("I/E", IntExt::IntExt),
    ("INT.", IntExt::Int),
    ("INT ", IntExt::Int),
    ("EXT.", IntExt::Ext),
    ("EXT ", IntExt::Ext),
];

/// Recognized trailing time-of-day suffixes, longest first.
const TIME_OF_DAY_SUFFIXES: &[&str] = &[
    " - MOMENTS LATER",
    " - CONTINUOUS",
    " - NIGHT",
    " - DAWN",
    " - DUSK",
    " - LATER",
    " - DAY",
];

/// Result of parsing a free-text scene heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedHeading {
    pub int_ext: IntExt,
    /// Set description with prefix/suffix removed. May be empty; display
    /// layers substitute `"Untitled Scene"`.
    pub set: String,
    /// Time-of-day captured from the stripped suffix (`"DAY"`, `"NIGHT"`, ...).
    pub time_of_day: Option<String>,
}

/// Parse a scene heading into interior/exterior code, set description, and
/// time-of-day.
///
/// Matching is case-insensitive and whitespace-trimmed. One trailing
/// time-of-day suffix and one leading `-`/`.` are stripped from the set
/// description after prefix removal.
pub fn parse_heading(heading: &str) -> ParsedHeading {
    let trimmed = heading.trim();
    let upper = trimmed.to_ascii_uppercase();

    let (int_ext, rest) = INT_EXT_PREFIXES
        .iter()
        .find(|(prefix, _)| upper.starts_with(prefix))
        .map(|(prefix, code)| (*code, trimmed[prefix.len()..].trim()))
        .unwrap_or((IntExt::None, trimmed));

    let mut set = rest;
    let mut time_of_day = None;
    let upper_rest = rest.to_ascii_uppercase();
    for suffix in TIME_OF_DAY_SUFFIXES {
        if upper_rest.ends_with(suffix) {
            time_of_day = Some(suffix.trim_start_matches(" - ").to_string());
            set = rest[..rest.len() - suffix.len()].trim_end();
            break;
        }
    }

    if let Some(stripped) = set.strip_prefix(['-', '.']) {
        set = stripped;
    }

    ParsedHeading {
        int_ext,
        set: set.trim().to_string(),
        time_of_day,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(heading: &str) -> (IntExt, String) {
        let parsed = parse_heading(heading);
        (parsed.int_ext, parsed.set)
    }

    // -- prefix table --

    #[test]
    fn interior_with_day() {
        assert_eq!(parse("INT. KITCHEN - DAY"), (IntExt::Int, "KITCHEN".into()));
    }

    #[test]
    fn exterior_with_night() {
        assert_eq!(parse("EXT. ALLEY - NIGHT"), (IntExt::Ext, "ALLEY".into()));
    }

    #[test]
    fn int_ext_slash_form() {
        assert_eq!(parse("I/E CAR - DAY"), (IntExt::IntExt, "CAR".into()));
    }

    #[test]
    fn int_ext_dotted_form() {
        assert_eq!(
            parse("INT./EXT. TRAIN - NIGHT"),
            (IntExt::IntExt, "TRAIN".into())
        );
    }

    #[test]
    fn int_ext_undotted_form() {
        assert_eq!(parse("INT/EXT GARAGE"), (IntExt::IntExt, "GARAGE".into()));
    }

    #[test]
    fn interior_space_form() {
        assert_eq!(parse("INT HALLWAY"), (IntExt::Int, "HALLWAY".into()));
    }

    #[test]
    fn bare_location_has_no_code() {
        assert_eq!(parse("KITCHEN"), (IntExt::None, "KITCHEN".into()));
    }

    #[test]
    fn lowercase_heading_matches() {
        assert_eq!(
            parse("int. kitchen - day"),
            (IntExt::Int, "kitchen".into())
        );
    }

    #[test]
    fn surrounding_whitespace_trimmed() {
        assert_eq!(parse("  EXT. BEACH  "), (IntExt::Ext, "BEACH".into()));
    }

    // -- suffix stripping --

    #[test]
    fn moments_later_stripped_whole() {
        let parsed = parse_heading("INT. OFFICE - MOMENTS LATER");
        assert_eq!(parsed.set, "OFFICE");
        assert_eq!(parsed.time_of_day.as_deref(), Some("MOMENTS LATER"));
    }

    #[test]
    fn continuous_stripped() {
        let parsed = parse_heading("INT. STAIRWELL - CONTINUOUS");
        assert_eq!(parsed.set, "STAIRWELL");
        assert_eq!(parsed.time_of_day.as_deref(), Some("CONTINUOUS"));
    }

    #[test]
    fn time_of_day_captured() {
        let parsed = parse_heading("EXT. ALLEY - NIGHT");
        assert_eq!(parsed.time_of_day.as_deref(), Some("NIGHT"));
    }

    #[test]
    fn unknown_suffix_left_in_place() {
        assert_eq!(
            parse("INT. BAR - CHRISTMAS EVE"),
            (IntExt::Int, "BAR - CHRISTMAS EVE".into())
        );
    }

    #[test]
    fn no_time_of_day_on_bare_location() {
        assert_eq!(parse_heading("KITCHEN").time_of_day, None);
    }

    // -- leading separator stripping --

    #[test]
    fn leading_dash_after_prefix_removed() {
        assert_eq!(parse("INT. - KITCHEN - DAY"), (IntExt::Int, "KITCHEN".into()));
    }

    // -- degenerate input --

    #[test]
    fn empty_heading() {
        assert_eq!(parse(""), (IntExt::None, String::new()));
    }

    #[test]
    fn prefix_only_heading_yields_empty_set() {
        assert_eq!(parse("INT."), (IntExt::Int, String::new()));
    }

    // -- IntExt codes --

    #[test]
    fn int_ext_codes() {
        assert_eq!(IntExt::Int.code(), "INT");
        assert_eq!(IntExt::Ext.code(), "EXT");
        assert_eq!(IntExt::IntExt.code(), "I/E");
        assert_eq!(IntExt::None.code(), "");
    }

    // -- markers --

    #[test]
    fn day_break_marker_flags() {
        let marker = Scene::day_break_marker();
        assert!(marker.day_break);
        assert!(!marker.off_day);
    }

    #[test]
    fn off_day_marker_flags() {
        let marker = Scene::off_day_marker();
        assert!(marker.off_day);
        assert!(!marker.day_break);
    }
}
