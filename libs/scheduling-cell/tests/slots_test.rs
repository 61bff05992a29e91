use assert_matches::assert_matches;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use uuid::Uuid;

use scheduling_cell::{
    parse_schedule_date, parse_schedule_instant, DayAvailabilityRecord, ScheduleError, SlotEngine,
    WeeklySchedule, WorkingWindow,
};

#[test]
fn full_day_produces_the_standard_grid() {
    let engine = SlotEngine::new();
    let slots = engine
        .generate_slots(
            date(2030, 6, 12),
            &standard_windows(),
            30,
            instant("2026-01-01T12:00:00Z"),
        )
        .unwrap();

    assert_eq!(slots.len(), 14);
    assert_eq!(slots[0].start_time, time(9, 0));
    assert_eq!(slots[0].end_time, time(9, 30));
    assert_eq!(slots[13].start_time, time(17, 30));
    assert_eq!(slots[13].end_time, time(18, 0));
    assert!(slots.iter().all(|slot| slot.available));
    assert!(slots.iter().all(|slot| slot.duration_minutes == 30));
}

#[test]
fn slot_count_follows_the_window_spans() {
    let engine = SlotEngine::new();
    let windows = standard_windows();
    let slots = engine
        .generate_slots(date(2030, 6, 12), &windows, 30, instant("2026-01-01T12:00:00Z"))
        .unwrap();

    let expected: i64 = windows.iter().map(|w| w.span_minutes() / 30).sum();
    assert_eq!(slots.len() as i64, expected);
}

#[test]
fn trailing_remainder_is_dropped_not_reported() {
    let engine = SlotEngine::new();
    let window = WorkingWindow::new(time(9, 0), time(10, 15)).unwrap();
    let slots = engine
        .generate_slots(date(2030, 6, 12), &[window], 30, instant("2026-01-01T12:00:00Z"))
        .unwrap();

    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].start_time, time(9, 0));
    assert_eq!(slots[1].start_time, time(9, 30));
    assert_eq!(slots[1].end_time, time(10, 0));
}

#[test]
fn todays_elapsed_slots_are_excluded() {
    let engine = SlotEngine::new();
    let slots = engine
        .generate_slots(
            date(2026, 3, 18),
            &standard_windows(),
            30,
            instant("2026-03-18T09:15:00Z"),
        )
        .unwrap();

    assert_eq!(slots.len(), 13);
    assert_eq!(slots[0].start_time, time(9, 30));
}

#[test]
fn slot_starting_exactly_now_is_excluded() {
    let engine = SlotEngine::new();
    let slots = engine
        .generate_slots(
            date(2026, 3, 18),
            &standard_windows(),
            30,
            instant("2026-03-18T09:30:00Z"),
        )
        .unwrap();

    assert_eq!(slots[0].start_time, time(10, 0));
    assert_eq!(slots.len(), 12);
}

#[test]
fn past_dates_yield_no_slots() {
    let engine = SlotEngine::new();
    let slots = engine
        .generate_slots(
            date(2020, 1, 1),
            &standard_windows(),
            30,
            instant("2026-03-18T09:15:00Z"),
        )
        .unwrap();

    assert!(slots.is_empty());
}

#[test]
fn future_dates_ignore_the_time_of_day() {
    let engine = SlotEngine::new();
    let slots = engine
        .generate_slots(
            date(2026, 3, 19),
            &standard_windows(),
            30,
            instant("2026-03-18T17:45:00Z"),
        )
        .unwrap();

    assert_eq!(slots.len(), 14);
    assert_eq!(slots[0].start_time, time(9, 0));
}

#[test]
fn no_windows_means_no_slots() {
    let engine = SlotEngine::new();
    let slots = engine
        .generate_slots(date(2030, 6, 12), &[], 30, instant("2026-01-01T12:00:00Z"))
        .unwrap();

    assert!(slots.is_empty());
}

#[test]
fn slots_from_multiple_windows_come_out_sorted() {
    let engine = SlotEngine::new();
    let windows = vec![
        WorkingWindow::standard_afternoon(),
        WorkingWindow::standard_morning(),
    ];
    let slots = engine
        .generate_slots(date(2030, 6, 12), &windows, 30, instant("2026-01-01T12:00:00Z"))
        .unwrap();

    assert_eq!(slots[0].start_time, time(9, 0));
    assert_eq!(slots[13].start_time, time(17, 30));
    assert!(slots
        .windows(2)
        .all(|pair| pair[0].start_time <= pair[1].start_time));
}

#[test]
fn overlapping_windows_are_rejected() {
    let engine = SlotEngine::new();
    let windows = vec![
        WorkingWindow::new(time(9, 0), time(14, 0)).unwrap(),
        WorkingWindow::new(time(13, 0), time(15, 0)).unwrap(),
    ];
    let result = engine.generate_slots(
        date(2030, 6, 12),
        &windows,
        30,
        instant("2026-01-01T12:00:00Z"),
    );

    assert_matches!(result, Err(ScheduleError::OverlappingWindows(_)));
}

#[test]
fn touching_windows_are_allowed() {
    let engine = SlotEngine::new();
    let windows = vec![
        WorkingWindow::new(time(9, 0), time(12, 0)).unwrap(),
        WorkingWindow::new(time(12, 0), time(14, 0)).unwrap(),
    ];
    let slots = engine
        .generate_slots(date(2030, 6, 12), &windows, 30, instant("2026-01-01T12:00:00Z"))
        .unwrap();

    assert_eq!(slots.len(), 10);
}

#[test]
fn zero_or_negative_slot_length_is_rejected() {
    let engine = SlotEngine::new();
    let now = instant("2026-01-01T12:00:00Z");

    let zero = engine.generate_slots(date(2030, 6, 12), &standard_windows(), 0, now);
    assert_matches!(zero, Err(ScheduleError::InvalidSlotLength(0)));

    let negative = engine.generate_slots(date(2030, 6, 12), &standard_windows(), -30, now);
    assert_matches!(negative, Err(ScheduleError::InvalidSlotLength(-30)));
}

#[test]
fn window_constructors_reject_inverted_ranges() {
    assert_matches!(
        WorkingWindow::new(time(14, 0), time(9, 0)),
        Err(ScheduleError::InvalidWindow(_))
    );
    assert_matches!(
        WorkingWindow::new(time(9, 0), time(9, 0)),
        Err(ScheduleError::InvalidWindow(_))
    );
    assert_matches!(
        WorkingWindow::from_minutes(9 * 60, 25 * 60),
        Err(ScheduleError::InvalidWindow(_))
    );
}

#[test]
fn generation_is_deterministic_for_a_frozen_clock() {
    let engine = SlotEngine::new();
    let now = instant("2026-03-18T09:15:00Z");

    let first = engine
        .generate_slots(date(2026, 3, 18), &standard_windows(), 30, now)
        .unwrap();
    let second = engine
        .generate_slots(date(2026, 3, 18), &standard_windows(), 30, now)
        .unwrap();

    assert_eq!(first, second);
}

#[test]
fn booked_start_marks_exactly_one_slot() {
    let engine = SlotEngine::new();
    let slots = engine
        .generate_slots(
            date(2030, 6, 12),
            &standard_windows(),
            30,
            instant("2026-01-01T12:00:00Z"),
        )
        .unwrap();

    let marked = engine.mark_availability(slots, &[time(10, 0)]);

    assert_eq!(marked.len(), 14);
    for slot in &marked {
        assert_eq!(slot.available, slot.start_time != time(10, 0));
    }
}

#[test]
fn misaligned_booked_times_are_ignored() {
    let engine = SlotEngine::new();
    let slots = engine
        .generate_slots(
            date(2030, 6, 12),
            &standard_windows(),
            30,
            instant("2026-01-01T12:00:00Z"),
        )
        .unwrap();

    let marked = engine.mark_availability(slots, &[time(10, 7), time(8, 0)]);

    assert_eq!(marked.len(), 14);
    assert!(marked.iter().all(|slot| slot.available));
}

#[test]
fn marking_preserves_order_and_cardinality() {
    let engine = SlotEngine::new();
    let slots = engine
        .generate_slots(
            date(2030, 6, 12),
            &standard_windows(),
            30,
            instant("2026-01-01T12:00:00Z"),
        )
        .unwrap();
    let original_starts: Vec<NaiveTime> = slots.iter().map(|slot| slot.start_time).collect();

    let marked = engine.mark_availability(slots, &[time(9, 0), time(16, 30)]);
    let marked_starts: Vec<NaiveTime> = marked.iter().map(|slot| slot.start_time).collect();

    assert_eq!(original_starts, marked_starts);
}

#[test]
fn parses_dates_and_instants_from_text() {
    assert_eq!(parse_schedule_date("2026-03-18").unwrap(), date(2026, 3, 18));
    assert_matches!(
        parse_schedule_date("18/03/2026"),
        Err(ScheduleError::InvalidDate(_))
    );

    assert_eq!(
        parse_schedule_instant("2026-03-18T09:15:00Z").unwrap(),
        instant("2026-03-18T09:15:00Z")
    );
    assert_matches!(
        parse_schedule_instant("not-a-timestamp"),
        Err(ScheduleError::InvalidDate(_))
    );
}

#[test]
fn week_is_built_from_backend_rows() {
    let records = vec![DayAvailabilityRecord {
        doctor_id: Uuid::new_v4(),
        day_of_week: 2,
        morning_enabled: true,
        afternoon_enabled: false,
    }];
    let week = WeeklySchedule::from_day_records(&records).unwrap();

    assert_eq!(
        week.windows_for(Weekday::Tue).to_vec(),
        vec![WorkingWindow::standard_morning()]
    );
    assert!(week.windows_for(Weekday::Mon).is_empty());
}

#[test]
fn week_rejects_out_of_range_day_indexes() {
    let records = vec![DayAvailabilityRecord {
        doctor_id: Uuid::new_v4(),
        day_of_week: 9,
        morning_enabled: true,
        afternoon_enabled: true,
    }];

    assert_matches!(
        WeeklySchedule::from_day_records(&records),
        Err(ScheduleError::MalformedPayload(_))
    );
}

#[test]
fn no_rows_yield_a_closed_week() {
    let week = WeeklySchedule::from_day_records(&[]).unwrap();

    for weekday in [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ] {
        assert!(week.windows_for(weekday).is_empty());
    }
}

#[test]
fn standard_week_has_both_blocks_every_day() {
    let week = WeeklySchedule::standard();
    let windows = week.windows_for(Weekday::Wed);

    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0].span_minutes(), 300);
    assert_eq!(windows[1].span_minutes(), 120);
}

/// Helper function to create a time of day
fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// Helper function to create a calendar date
fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Helper function to parse a frozen clock instant
fn instant(raw: &str) -> DateTime<Utc> {
    raw.parse().unwrap()
}

/// Helper function to build the clinic's standard day
fn standard_windows() -> Vec<WorkingWindow> {
    vec![
        WorkingWindow::standard_morning(),
        WorkingWindow::standard_afternoon(),
    ]
}
