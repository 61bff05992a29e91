use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==============================================================================
// CORE SCHEDULING MODELS
// ==============================================================================

/// Half-open time-of-day range during which appointment slots can start.
///
/// Only the validating constructors can build one, so a window in hand is
/// always forward (start before end) and inside the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl WorkingWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ScheduleError> {
        if start >= end {
            return Err(ScheduleError::InvalidWindow(format!(
                "window start {} is not before end {}",
                start, end
            )));
        }

        Ok(Self { start, end })
    }

    /// Build a window from minutes since midnight, e.g. `(9 * 60, 14 * 60)`.
    pub fn from_minutes(start: u32, end: u32) -> Result<Self, ScheduleError> {
        let start = minutes_to_time(start)?;
        let end = minutes_to_time(end)?;
        Self::new(start, end)
    }

    /// The clinic's standard morning block, 09:00-14:00.
    pub fn standard_morning() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        }
    }

    /// The clinic's standard afternoon block, 16:00-18:00.
    pub fn standard_afternoon() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        }
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn span_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn overlaps(&self, other: &WorkingWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

fn minutes_to_time(minutes: u32) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).ok_or_else(|| {
        ScheduleError::InvalidWindow(format!("{} minutes since midnight is outside the day", minutes))
    })
}

/// Working windows for each weekday, indexed 0 = Sunday through 6 = Saturday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySchedule {
    days: [Vec<WorkingWindow>; 7],
}

impl WeeklySchedule {
    /// The clinic-wide template: morning and afternoon blocks every day.
    pub fn standard() -> Self {
        Self {
            days: std::array::from_fn(|_| {
                vec![
                    WorkingWindow::standard_morning(),
                    WorkingWindow::standard_afternoon(),
                ]
            }),
        }
    }

    /// A week with no working windows at all.
    pub fn empty() -> Self {
        Self {
            days: std::array::from_fn(|_| Vec::new()),
        }
    }

    /// Build a week from backend availability rows. Rows say which standard
    /// blocks a doctor works on a weekday; a day without a row stays closed.
    pub fn from_day_records(records: &[DayAvailabilityRecord]) -> Result<Self, ScheduleError> {
        let mut week = Self::empty();

        for record in records {
            if !(0..=6).contains(&record.day_of_week) {
                return Err(ScheduleError::MalformedPayload(format!(
                    "day_of_week {} is outside 0 (Sunday) to 6 (Saturday)",
                    record.day_of_week
                )));
            }

            let mut windows = Vec::new();
            if record.morning_enabled {
                windows.push(WorkingWindow::standard_morning());
            }
            if record.afternoon_enabled {
                windows.push(WorkingWindow::standard_afternoon());
            }

            week.days[record.day_of_week as usize] = windows;
        }

        Ok(week)
    }

    pub fn windows_for(&self, weekday: Weekday) -> &[WorkingWindow] {
        &self.days[Self::day_index(weekday)]
    }

    /// Map chrono's weekday to the backend's day index (0 = Sunday).
    pub fn day_index(weekday: Weekday) -> usize {
        match weekday {
            Weekday::Sun => 0,
            Weekday::Mon => 1,
            Weekday::Tue => 2,
            Weekday::Wed => 3,
            Weekday::Thu => 4,
            Weekday::Fri => 5,
            Weekday::Sat => 6,
        }
    }
}

/// A bookable appointment candidate for one doctor and date. Rebuilt fresh on
/// every query, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_minutes: i32,
    pub available: bool,
}

/// Availability-marked schedule for one doctor on one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySlots {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
}

impl DaySlots {
    pub fn open_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.available).count()
    }
}

/// Scheduling constants expressed as data so they can vary per deployment.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    pub slot_minutes: i32,
    pub week: WeeklySchedule,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            slot_minutes: 30,
            week: WeeklySchedule::standard(),
        }
    }
}

// ==============================================================================
// WIRE MODELS
// ==============================================================================

/// Appointment row as returned by the Vitalia backend. The status arrives as
/// a free-form token and is normalized exactly once at fetch time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub status: String,
    pub notes: Option<String>,
}

/// Weekly availability row: which standard blocks a doctor works on one
/// weekday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAvailabilityRecord {
    pub doctor_id: Uuid,
    pub day_of_week: i32, // 0 = Sunday, 1 = Monday, etc.
    pub morning_enabled: bool,
    pub afternoon_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSlotRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub notes: Option<String>,
}

/// Parse a `YYYY-MM-DD` date from an outer surface (CLI arguments, query
/// strings).
pub fn parse_schedule_date(raw: &str) -> Result<NaiveDate, ScheduleError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| ScheduleError::InvalidDate(format!("{}: {}", raw, e)))
}

/// Parse an RFC 3339 instant from an outer surface.
pub fn parse_schedule_instant(raw: &str) -> Result<DateTime<Utc>, ScheduleError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|e| ScheduleError::InvalidDate(format!("{}: {}", raw, e)))
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum ScheduleError {
    #[error("Invalid working window: {0}")]
    InvalidWindow(String),

    #[error("Working windows overlap: {0}")]
    OverlappingWindows(String),

    #[error("Invalid slot length: {0} minutes")]
    InvalidSlotLength(i32),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Requested time {0} is not a bookable slot")]
    SlotNotFound(NaiveTime),

    #[error("Slot {0} is already taken")]
    SlotTaken(NaiveTime),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Malformed backend payload: {0}")]
    MalformedPayload(String),
}
