use anyhow::Result;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, SecondsFormat, Utc};
use reqwest::Method;
use serde_json::Value;
use shared_backend::VitaliaClient;
use shared_config::AppConfig;
use shared_models::normalize_status;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::models::{
    AppointmentRecord, DayAvailabilityRecord, DaySlots, ScheduleConfig, ScheduleError,
    WeeklySchedule,
};
use crate::services::slots::SlotEngine;

/// Computes a doctor's bookable slots for a date by combining their weekly
/// availability and the day's appointments from the Vitalia backend.
pub struct AvailabilityService {
    backend: Arc<VitaliaClient>,
    engine: SlotEngine,
    schedule: ScheduleConfig,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        let schedule = ScheduleConfig {
            slot_minutes: config.slot_minutes,
            ..ScheduleConfig::default()
        };
        Self::with_schedule(config, schedule)
    }

    /// Use a custom slot length or week template instead of the clinic
    /// defaults.
    pub fn with_schedule(config: &AppConfig, schedule: ScheduleConfig) -> Self {
        Self::with_client(Arc::new(VitaliaClient::new(config)), schedule)
    }

    pub(crate) fn with_client(backend: Arc<VitaliaClient>, schedule: ScheduleConfig) -> Self {
        Self {
            backend,
            engine: SlotEngine::new(),
            schedule,
        }
    }

    /// Compute the availability-marked slots for a doctor on a date, against
    /// the wall clock.
    pub async fn day_slots(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        auth_token: Option<&str>,
    ) -> Result<DaySlots, ScheduleError> {
        self.day_slots_at(doctor_id, date, Utc::now(), auth_token)
            .await
    }

    /// Same as `day_slots` but against an explicit instant, which makes the
    /// result reproducible in tests and batch jobs.
    pub async fn day_slots_at(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        now: DateTime<Utc>,
        auth_token: Option<&str>,
    ) -> Result<DaySlots, ScheduleError> {
        debug!("Computing slots for doctor {} on {}", doctor_id, date);

        let week = self.doctor_week(doctor_id, auth_token).await?;
        let windows = week.windows_for(date.weekday());
        let booked = self.booked_starts(doctor_id, date, auth_token).await?;

        let slots =
            self.engine
                .generate_slots(date, windows, self.schedule.slot_minutes, now)?;
        let slots = self.engine.mark_availability(slots, &booked);

        let day = DaySlots {
            doctor_id,
            date,
            slots,
        };
        debug!(
            "Doctor {} has {} open of {} slots on {}",
            doctor_id,
            day.open_count(),
            day.slots.len(),
            date
        );

        Ok(day)
    }

    /// Fetch the doctor's weekly availability rows and fold them into a week.
    /// Doctors without rows fall back to the configured week template.
    pub async fn doctor_week(
        &self,
        doctor_id: Uuid,
        auth_token: Option<&str>,
    ) -> Result<WeeklySchedule, ScheduleError> {
        let path = format!("/api/doctor-availability/doctor/{}", doctor_id);

        let rows: Vec<Value> = self
            .backend
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| ScheduleError::Backend(e.to_string()))?;

        if rows.is_empty() {
            debug!(
                "Doctor {} has no availability rows, using the configured week",
                doctor_id
            );
            return Ok(self.schedule.week.clone());
        }

        let records: Vec<DayAvailabilityRecord> = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<_, _>>()
            .map_err(|e| ScheduleError::MalformedPayload(e.to_string()))?;

        WeeklySchedule::from_day_records(&records)
    }

    /// Start times of appointments that hold a slot on the given date.
    /// Statuses are normalized once here; a cancelled appointment does not
    /// hold its slot.
    async fn booked_starts(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        auth_token: Option<&str>,
    ) -> Result<Vec<NaiveTime>, ScheduleError> {
        let day_start = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let day_end = date.and_hms_opt(23, 59, 59).unwrap().and_utc();

        let path = format!(
            "/api/appointments/doctor/{}/range?start={}&end={}",
            doctor_id,
            day_start.to_rfc3339_opts(SecondsFormat::Secs, true),
            day_end.to_rfc3339_opts(SecondsFormat::Secs, true)
        );

        let rows: Vec<Value> = self
            .backend
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| ScheduleError::Backend(e.to_string()))?;

        let records: Vec<AppointmentRecord> = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<_, _>>()
            .map_err(|e| ScheduleError::MalformedPayload(e.to_string()))?;

        let mut booked = Vec::new();
        for record in records {
            let status = normalize_status(&record.status);
            if !status.blocks_slot() {
                debug!("Appointment {} is {}, its slot stays open", record.id, status);
                continue;
            }
            booked.push(record.start_time.time());
        }

        Ok(booked)
    }
}
