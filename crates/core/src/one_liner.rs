//! One-Liner schedule builder.
//!
//! Walks an ordered scene list, grouping scenes into shoot days at day-break
//! markers and advancing the calendar over off-days. The schedule is rebuilt
//! from scratch on every run; days and items are immutable snapshots, never
//! incrementally updated.
//!
//! Scene order is a precondition: the input slice is the shoot sequence and
//! the builder performs no sorting.

use chrono::Days;
use serde::{Deserialize, Serialize};

use crate::page_length::format_eighths;
use crate::scene::{parse_heading, IntExt, Scene};
use crate::types::{CalendarDate, Timestamp};

/// Set description shown when a heading parses to an empty location.
pub const UNTITLED_SCENE: &str = "Untitled Scene";

// ---------------------------------------------------------------------------
// OneLinerItem
// ---------------------------------------------------------------------------

/// Immutable display snapshot of one scheduled scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneLinerItem {
    pub scene_number: String,
    /// `"INT"`, `"EXT"`, `"I/E"`, or empty.
    pub int_ext: IntExt,
    pub set_description: String,
    /// `"DAY"`, `"NIGHT"`, ... or empty when the heading carries none.
    pub day_night: String,
    /// Formatted page length, e.g. `"1 2/8"`.
    pub page_length: String,
    /// Raw page length in eighths.
    pub page_eighths: u32,
    /// Comma-joined cast IDs in billing order.
    pub cast: String,
    pub location: String,
    pub notes: Option<String>,
}

impl OneLinerItem {
    /// Snapshot a scene for display.
    pub fn from_scene(scene: &Scene) -> Self {
        let parsed = parse_heading(&scene.heading);
        let set_description = if parsed.set.is_empty() {
            UNTITLED_SCENE.to_string()
        } else {
            parsed.set
        };
        Self {
            scene_number: scene.number.clone(),
            int_ext: parsed.int_ext,
            set_description,
            day_night: parsed.time_of_day.unwrap_or_default(),
            page_length: format_eighths(scene.page_eighths),
            page_eighths: scene.page_eighths,
            cast: scene.cast_ids.join(", "),
            location: scene.location.clone(),
            notes: scene.notes.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// OneLinerDay
// ---------------------------------------------------------------------------

/// One shoot day of the schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneLinerDay {
    /// 1-based shoot day number, dense across the schedule.
    pub day_number: u32,
    pub date: CalendarDate,
    pub items: Vec<OneLinerItem>,
}

impl OneLinerDay {
    /// Total page length of the day in eighths.
    pub fn total_eighths(&self) -> u32 {
        self.items.iter().map(|item| item.page_eighths).sum()
    }

    pub fn scene_count(&self) -> usize {
        self.items.len()
    }
}

// ---------------------------------------------------------------------------
// OneLinerSchedule
// ---------------------------------------------------------------------------

/// A complete One-Liner schedule, rebuilt wholesale on every generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneLinerSchedule {
    pub production_name: String,
    pub days: Vec<OneLinerDay>,
    pub generated_at: Timestamp,
}

impl OneLinerSchedule {
    pub fn total_scenes(&self) -> usize {
        self.days.iter().map(OneLinerDay::scene_count).sum()
    }

    pub fn total_eighths(&self) -> u32 {
        self.days.iter().map(OneLinerDay::total_eighths).sum()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Build a One-Liner schedule from an ordered scene list.
///
/// Single forward pass. Day-break and off-day detection is injected so the
/// scheduling module can change how markers are modeled without touching the
/// builder:
///
/// - day-break: the accumulated scenes flush into a new day (empty days are
///   never emitted) and the calendar advances one day;
/// - off-day: the calendar advances one day, nothing is emitted;
/// - anything else: snapshot into an [`OneLinerItem`], silently skipping
///   scenes with a blank scene number.
///
/// Date advances accumulate in the cursor and are committed to a day at its
/// flush. Scenes after the last day-break flush as a final day, so a
/// schedule with no markers at all is a single day 1.
pub fn build_one_liner(
    scenes: &[Scene],
    start_date: CalendarDate,
    production_name: impl Into<String>,
    is_day_break: impl Fn(&Scene) -> bool,
    is_off_day: impl Fn(&Scene) -> bool,
) -> OneLinerSchedule {
    let mut days = Vec::new();
    let mut day_number = 0u32;
    let mut current_items: Vec<OneLinerItem> = Vec::new();
    let mut current_date = start_date;

    for scene in scenes {
        if is_day_break(scene) {
            if !current_items.is_empty() {
                day_number += 1;
                days.push(OneLinerDay {
                    day_number,
                    date: current_date,
                    items: std::mem::take(&mut current_items),
                });
            }
            current_date = next_day(current_date);
        } else if is_off_day(scene) {
            current_date = next_day(current_date);
        } else if !scene.number.trim().is_empty() {
            current_items.push(OneLinerItem::from_scene(scene));
        }
    }

    if !current_items.is_empty() {
        day_number += 1;
        days.push(OneLinerDay {
            day_number,
            date: current_date,
            items: current_items,
        });
    }

    OneLinerSchedule {
        production_name: production_name.into(),
        days,
        generated_at: chrono::Utc::now(),
    }
}

/// Advance a calendar date by one day, saturating at `NaiveDate`'s upper
/// bound (year ~262000).
fn next_day(date: CalendarDate) -> CalendarDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn start() -> CalendarDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn build(scenes: &[Scene]) -> OneLinerSchedule {
        build_one_liner(scenes, start(), "Test Production", |s| s.day_break, |s| s.off_day)
    }

    fn scene(number: &str) -> Scene {
        Scene::new(number, format!("INT. SET {number} - DAY"), 4)
    }

    // -- day grouping --

    #[test]
    fn no_markers_yields_single_day_one() {
        let schedule = build(&[scene("1"), scene("2")]);
        assert_eq!(schedule.days.len(), 1);
        assert_eq!(schedule.days[0].day_number, 1);
        assert_eq!(schedule.days[0].date, start());
        assert_eq!(schedule.days[0].scene_count(), 2);
    }

    #[test]
    fn day_break_splits_days() {
        let schedule = build(&[scene("1"), Scene::day_break_marker(), scene("2")]);
        assert_eq!(schedule.days.len(), 2);
        assert_eq!(schedule.days[0].day_number, 1);
        assert_eq!(schedule.days[1].day_number, 2);
        assert_eq!(schedule.days[0].date, start());
        assert_eq!(
            schedule.days[1].date,
            NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()
        );
    }

    #[test]
    fn empty_day_breaks_are_suppressed() {
        // [break, A, break, break, B] must produce exactly days 1 and 2.
        let schedule = build(&[
            Scene::day_break_marker(),
            scene("A"),
            Scene::day_break_marker(),
            Scene::day_break_marker(),
            scene("B"),
        ]);
        assert_eq!(schedule.days.len(), 2);
        assert_eq!(schedule.days[0].day_number, 1);
        assert_eq!(schedule.days[0].items[0].scene_number, "A");
        assert_eq!(schedule.days[1].day_number, 2);
        assert_eq!(schedule.days[1].items[0].scene_number, "B");
    }

    #[test]
    fn leading_break_still_advances_date() {
        let schedule = build(&[Scene::day_break_marker(), scene("A")]);
        assert_eq!(schedule.days.len(), 1);
        assert_eq!(schedule.days[0].day_number, 1);
        assert_eq!(
            schedule.days[0].date,
            NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()
        );
    }

    #[test]
    fn trailing_break_emits_no_empty_day() {
        let schedule = build(&[scene("1"), Scene::day_break_marker()]);
        assert_eq!(schedule.days.len(), 1);
    }

    // -- off-days --

    #[test]
    fn off_day_advances_date_without_content() {
        // [A, off, B] with no break: one day holding both scenes, its date
        // committed from the advanced cursor at the final flush.
        let schedule = build(&[scene("A"), Scene::off_day_marker(), scene("B")]);
        assert_eq!(schedule.days.len(), 1);
        assert_eq!(schedule.days[0].scene_count(), 2);
        assert_eq!(
            schedule.days[0].date,
            NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()
        );
    }

    #[test]
    fn off_day_pushes_following_day_later() {
        let schedule = build(&[
            scene("A"),
            Scene::day_break_marker(),
            Scene::off_day_marker(),
            scene("B"),
        ]);
        assert_eq!(schedule.days.len(), 2);
        assert_eq!(schedule.days[0].date, start());
        // Break advanced one day, off-day another.
        assert_eq!(
            schedule.days[1].date,
            NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()
        );
    }

    // -- item snapshotting --

    #[test]
    fn blank_scene_numbers_are_skipped() {
        let schedule = build(&[scene("1"), Scene::new("  ", "INT. VOID - DAY", 2)]);
        assert_eq!(schedule.days[0].scene_count(), 1);
    }

    #[test]
    fn item_snapshot_fields() {
        let mut s = Scene::new("14A", "EXT. ALLEY - NIGHT", 10);
        s.cast_ids = vec!["1".into(), "4".into()];
        s.location = "Downtown lot".into();
        s.notes = Some("stunt rigging".into());

        let schedule = build(&[s]);
        let item = &schedule.days[0].items[0];
        assert_eq!(item.scene_number, "14A");
        assert_eq!(item.int_ext, IntExt::Ext);
        assert_eq!(item.set_description, "ALLEY");
        assert_eq!(item.day_night, "NIGHT");
        assert_eq!(item.page_length, "1 2/8");
        assert_eq!(item.page_eighths, 10);
        assert_eq!(item.cast, "1, 4");
        assert_eq!(item.location, "Downtown lot");
        assert_eq!(item.notes.as_deref(), Some("stunt rigging"));
    }

    #[test]
    fn empty_set_description_becomes_untitled() {
        let schedule = build(&[Scene::new("3", "", 1)]);
        assert_eq!(schedule.days[0].items[0].set_description, UNTITLED_SCENE);
    }

    // -- totals --

    #[test]
    fn day_and_schedule_totals() {
        let schedule = build(&[
            scene("1"),
            scene("2"),
            Scene::day_break_marker(),
            scene("3"),
        ]);
        assert_eq!(schedule.days[0].total_eighths(), 8);
        assert_eq!(schedule.days[1].total_eighths(), 4);
        assert_eq!(schedule.total_eighths(), 12);
        assert_eq!(schedule.total_scenes(), 3);
    }

    #[test]
    fn empty_input_yields_empty_schedule() {
        let schedule = build(&[]);
        assert!(schedule.days.is_empty());
        assert_eq!(schedule.total_scenes(), 0);
        assert_eq!(schedule.production_name, "Test Production");
    }
}
