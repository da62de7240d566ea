//! Day-Out-of-Days status model and report data.
//!
//! [`DoodStatus`] is a closed enumeration of the industry status codes with
//! fixed display attributes (the screen palette; PDF rendering keeps its own
//! table outside this crate). [`DoodReportData`] holds the cast-by-day status
//! grid plus per-cast work/hold statistics, and validates its dimensions at
//! construction.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{CalendarDate, EntityId, Timestamp};

// ---------------------------------------------------------------------------
// DoodStatus
// ---------------------------------------------------------------------------

/// Cast status for one shoot day on the Day-Out-of-Days grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoodStatus {
    Start,
    Work,
    Finish,
    StartFinish,
    Hold,
    Travel,
    Rehearsal,
    Fitting,
    Holiday,
    Drop,
    Pickup,
    #[default]
    None,
}

impl DoodStatus {
    /// Industry grid abbreviation printed in the cell.
    pub fn code(self) -> &'static str {
        match self {
            Self::Start => "SW",
            Self::Work => "W",
            Self::Finish => "WF",
            Self::StartFinish => "SWF",
            Self::Hold => "H",
            Self::Travel => "T",
            Self::Rehearsal => "R",
            Self::Fitting => "F",
            Self::Holiday => "HOL",
            Self::Drop => "D",
            Self::Pickup => "PU",
            Self::None => "",
        }
    }

    /// Display name for legends and tooltips.
    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Work => "Work",
            Self::Finish => "Finish",
            Self::StartFinish => "Start/Finish",
            Self::Hold => "Hold",
            Self::Travel => "Travel",
            Self::Rehearsal => "Rehearsal",
            Self::Fitting => "Fitting",
            Self::Holiday => "Holiday",
            Self::Drop => "Drop",
            Self::Pickup => "Pickup",
            Self::None => "",
        }
    }

    /// Screen cell color as a hex string.
    pub fn color(self) -> &'static str {
        match self {
            Self::Start => "#2e7d32",
            Self::Work => "#1565c0",
            Self::Finish => "#6a1b9a",
            Self::StartFinish => "#00695c",
            Self::Hold => "#f9a825",
            Self::Travel => "#ef6c00",
            Self::Rehearsal => "#5d4037",
            Self::Fitting => "#ad1457",
            Self::Holiday => "#9e9e9e",
            Self::Drop => "#c62828",
            Self::Pickup => "#00838f",
            Self::None => "#ffffff",
        }
    }

    /// Whether the cast member is on set shooting this day.
    pub fn is_work_day(self) -> bool {
        matches!(
            self,
            Self::Start | Self::Work | Self::Finish | Self::StartFinish
        )
    }
}

// ---------------------------------------------------------------------------
// Report inputs
// ---------------------------------------------------------------------------

/// One cast member row on the report. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoodCastMember {
    pub id: EntityId,
    pub name: String,
    pub role: String,
}

/// One shoot day column on the report. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoodShootDay {
    /// 1-based shoot day number.
    pub day_number: u32,
    pub date: CalendarDate,
}

/// Per-cast aggregate statistics derived from a grid row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DoodCastStats {
    /// Days with any status assigned.
    pub total_days: usize,
    /// Start and Start/Finish days.
    pub start_days: usize,
    /// Days actually shooting (Start, Work, Finish, Start/Finish).
    pub work_days: usize,
    /// Hold days.
    pub hold_days: usize,
}

// ---------------------------------------------------------------------------
// DoodReportData
// ---------------------------------------------------------------------------

/// A generated Day-Out-of-Days report: cast rows, shoot day columns, and the
/// status grid indexed `[cast][day]`.
#[derive(Debug, Clone, Serialize)]
pub struct DoodReportData {
    pub production_name: String,
    pub cast: Vec<DoodCastMember>,
    pub days: Vec<DoodShootDay>,
    grid: Vec<Vec<DoodStatus>>,
    pub generated_at: Timestamp,
}

impl DoodReportData {
    /// Assemble a report, rejecting a grid whose dimensions do not match the
    /// cast and day lists.
    pub fn new(
        production_name: impl Into<String>,
        cast: Vec<DoodCastMember>,
        days: Vec<DoodShootDay>,
        grid: Vec<Vec<DoodStatus>>,
    ) -> Result<Self, CoreError> {
        if grid.len() != cast.len() {
            return Err(CoreError::Validation(format!(
                "status grid has {} rows for {} cast members",
                grid.len(),
                cast.len()
            )));
        }
        for (row_idx, row) in grid.iter().enumerate() {
            if row.len() != days.len() {
                return Err(CoreError::Validation(format!(
                    "status grid row {row_idx} has {} columns for {} shoot days",
                    row.len(),
                    days.len()
                )));
            }
        }

        Ok(Self {
            production_name: production_name.into(),
            cast,
            days,
            grid,
            generated_at: chrono::Utc::now(),
        })
    }

    /// Status cell for a cast member on a shoot day.
    pub fn status_at(&self, cast_idx: usize, day_idx: usize) -> DoodStatus {
        self.grid
            .get(cast_idx)
            .and_then(|row| row.get(day_idx))
            .copied()
            .unwrap_or(DoodStatus::None)
    }

    /// Aggregate work/hold statistics for one cast member.
    pub fn cast_stats(&self, cast_idx: usize) -> DoodCastStats {
        let Some(row) = self.grid.get(cast_idx) else {
            return DoodCastStats::default();
        };

        let mut stats = DoodCastStats::default();
        for status in row {
            if *status != DoodStatus::None {
                stats.total_days += 1;
            }
            if matches!(status, DoodStatus::Start | DoodStatus::StartFinish) {
                stats.start_days += 1;
            }
            if status.is_work_day() {
                stats.work_days += 1;
            }
            if *status == DoodStatus::Hold {
                stats.hold_days += 1;
            }
        }
        stats
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
