pub mod models;
pub mod services;

// Re-export all models and services for external use
pub use models::*;
pub use services::*;

// Specifically re-export the scheduling types consumers reach for most
pub use models::{
    AppointmentRecord, BookSlotRequest, DayAvailabilityRecord, DaySlots,
    ScheduleConfig, ScheduleError, Slot, WeeklySchedule, WorkingWindow,
};
