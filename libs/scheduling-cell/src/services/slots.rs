use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use std::collections::HashSet;
use tracing::debug;

use crate::models::{ScheduleError, Slot, WorkingWindow};

/// Deterministic slot arithmetic. Holds no state and talks to no backend, so
/// every outcome is a pure function of its arguments.
pub struct SlotEngine;

impl SlotEngine {
    pub fn new() -> Self {
        Self
    }

    /// Generate the bookable slots for one date from the day's working
    /// windows.
    ///
    /// Each window is tiled from its start in `slot_minutes` steps; a slot
    /// whose end would spill past the window is dropped along with any
    /// remainder. Past dates yield no slots, and on the current date slots
    /// starting at or before `now` are filtered out. The result is sorted by
    /// start time across all windows.
    pub fn generate_slots(
        &self,
        date: NaiveDate,
        windows: &[WorkingWindow],
        slot_minutes: i32,
        now: DateTime<Utc>,
    ) -> Result<Vec<Slot>, ScheduleError> {
        if slot_minutes <= 0 {
            return Err(ScheduleError::InvalidSlotLength(slot_minutes));
        }
        validate_windows(windows)?;

        if date < now.date_naive() {
            debug!("Skipping slot generation for past date {}", date);
            return Ok(Vec::new());
        }

        let cutoff = if date == now.date_naive() {
            Some(now.time())
        } else {
            None
        };

        let step = Duration::minutes(slot_minutes as i64);
        let mut slots = Vec::new();

        for window in windows {
            let mut current = date.and_time(window.start()).and_utc();
            let window_end = date.and_time(window.end()).and_utc();

            while current + step <= window_end {
                let slot_end = current + step;

                if cutoff.map_or(true, |time| current.time() > time) {
                    slots.push(Slot {
                        start_time: current.time(),
                        end_time: slot_end.time(),
                        duration_minutes: slot_minutes,
                        available: true,
                    });
                }

                current = slot_end;
            }
        }

        slots.sort_by(|a, b| a.start_time.cmp(&b.start_time));

        Ok(slots)
    }

    /// Flag each slot whose start coincides exactly with a booked start as
    /// unavailable. Booked times that fall between slot boundaries belong to
    /// no slot and are ignored. Order and cardinality are preserved.
    pub fn mark_availability(&self, slots: Vec<Slot>, booked: &[NaiveTime]) -> Vec<Slot> {
        let taken: HashSet<NaiveTime> = booked.iter().copied().collect();

        slots
            .into_iter()
            .map(|slot| Slot {
                available: !taken.contains(&slot.start_time),
                ..slot
            })
            .collect()
    }
}

impl Default for SlotEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Windows may touch but never overlap; a shared boundary minute would put
/// one start time in two windows.
fn validate_windows(windows: &[WorkingWindow]) -> Result<(), ScheduleError> {
    let mut ordered: Vec<&WorkingWindow> = windows.iter().collect();
    ordered.sort_by(|a, b| a.start().cmp(&b.start()));

    for pair in ordered.windows(2) {
        if pair[0].overlaps(pair[1]) {
            return Err(ScheduleError::OverlappingWindows(format!(
                "{}-{} and {}-{}",
                pair[0].start(),
                pair[0].end(),
                pair[1].start(),
                pair[1].end()
            )));
        }
    }

    Ok(())
}
