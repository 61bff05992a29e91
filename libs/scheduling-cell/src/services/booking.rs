use anyhow::Result;
use chrono::SecondsFormat;
use reqwest::Method;
use serde_json::{json, Value};
use shared_backend::VitaliaClient;
use shared_config::AppConfig;
use shared_models::{normalize_status, CanonicalStatus};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{AppointmentRecord, BookSlotRequest, ScheduleConfig, ScheduleError};
use crate::services::availability::AvailabilityService;

/// Books and cancels appointments through the Vitalia backend, re-deriving
/// the day's availability right before every booking.
pub struct BookingService {
    backend: Arc<VitaliaClient>,
    availability: AvailabilityService,
}

impl BookingService {
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
        let backend = Arc::new(VitaliaClient::new(config));
        let availability = AvailabilityService::with_client(Arc::clone(&backend), schedule);
        Self {
            backend,
            availability,
        }
    }

    /// Book a slot for a patient. The day's slots are recomputed from the
    /// backend immediately before booking, so a stale client view cannot
    /// turn into a double booking.
    pub async fn book_slot(
        &self,
        request: &BookSlotRequest,
        auth_token: Option<&str>,
    ) -> Result<AppointmentRecord, ScheduleError> {
        info!(
            "Booking request for doctor {} on {} at {}",
            request.doctor_id, request.date, request.start_time
        );

        let day = self
            .availability
            .day_slots(request.doctor_id, request.date, auth_token)
            .await?;

        let slot = day
            .slots
            .iter()
            .find(|slot| slot.start_time == request.start_time)
            .ok_or_else(|| ScheduleError::SlotNotFound(request.start_time))?;

        if !slot.available {
            warn!(
                "Slot {} on {} for doctor {} is already taken",
                request.start_time, request.date, request.doctor_id
            );
            return Err(ScheduleError::SlotTaken(request.start_time));
        }

        let start_time = request
            .date
            .and_time(request.start_time)
            .and_utc()
            .to_rfc3339_opts(SecondsFormat::Secs, true);

        let body = json!({
            "doctor_id": request.doctor_id,
            "patient_id": request.patient_id,
            "start_time": start_time,
            "notes": request.notes,
        });

        let row: Value = self
            .backend
            .request(Method::POST, "/api/appointments", auth_token, Some(body))
            .await
            .map_err(|e| ScheduleError::Backend(e.to_string()))?;

        let record: AppointmentRecord =
            serde_json::from_value(row).map_err(|e| ScheduleError::MalformedPayload(e.to_string()))?;

        let status = normalize_status(&record.status);
        if !matches!(status, CanonicalStatus::Confirmed | CanonicalStatus::Pending) {
            return Err(ScheduleError::Backend(format!(
                "appointment {} was created in unexpected state {}",
                record.id, status
            )));
        }

        info!(
            "Booked appointment {} for patient {} with doctor {}",
            record.id, record.patient_id, record.doctor_id
        );

        Ok(record)
    }

    /// Cancel an appointment, releasing its slot for other patients.
    pub async fn cancel_appointment(
        &self,
        appointment_id: Uuid,
        auth_token: Option<&str>,
    ) -> Result<AppointmentRecord, ScheduleError> {
        info!("Cancelling appointment {}", appointment_id);

        let path = format!("/api/appointments/{}/cancel", appointment_id);
        let row: Value = self
            .backend
            .request(Method::PATCH, &path, auth_token, None)
            .await
            .map_err(|e| ScheduleError::Backend(e.to_string()))?;

        serde_json::from_value(row).map_err(|e| ScheduleError::MalformedPayload(e.to_string()))
    }
}
