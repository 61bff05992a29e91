use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Canonical appointment status vocabulary.
///
/// Backend rows and the legacy UI disagree on status spelling: English and
/// Spanish variants, mixed case, mixed separators. Every raw token folds into
/// exactly one of these values at the fetch boundary, and only this enum is
/// compared anywhere downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CanonicalStatus {
    Confirmed,
    Pending,
    Completed,
    Cancelled,
    CheckedIn,
    Unknown,
}

impl CanonicalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalStatus::Confirmed => "CONFIRMED",
            CanonicalStatus::Pending => "PENDING",
            CanonicalStatus::Completed => "COMPLETED",
            CanonicalStatus::Cancelled => "CANCELLED",
            CanonicalStatus::CheckedIn => "CHECKED_IN",
            CanonicalStatus::Unknown => "UNKNOWN",
        }
    }

    /// Whether an appointment in this status still occupies its slot.
    /// Everything except a cancellation keeps the slot blocked.
    pub fn blocks_slot(&self) -> bool {
        !matches!(self, CanonicalStatus::Cancelled)
    }
}

impl fmt::Display for CanonicalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Map a raw backend status token to its canonical value.
///
/// Comparison is case-insensitive, and whitespace and hyphens are treated as
/// underscores, so "Confirmada", "EN CONSULTA" and "checked-in" all resolve.
/// The mapping is total: unrecognized tokens become `Unknown` instead of an
/// error, so one malformed record never blocks rendering a whole listing.
/// A non-empty token that lands on `Unknown` is reported through `tracing`
/// to surface backend contract drift.
pub fn normalize_status(raw: &str) -> CanonicalStatus {
    let folded: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || c == '-' {
                '_'
            } else {
                c.to_ascii_uppercase()
            }
        })
        .collect();

    let status = match folded.as_str() {
        "CONFIRMADA" | "CONFIRMADO" | "CONFIRMED" => CanonicalStatus::Confirmed,
        "PENDIENTE" | "PENDING" => CanonicalStatus::Pending,
        "COMPLETADA" | "COMPLETADO" | "COMPLETED" => CanonicalStatus::Completed,
        "CANCELADA" | "CANCELADO" | "CANCELLED" => CanonicalStatus::Cancelled,
        "EN_CONSULTA" | "ENCONSULTA" | "CHECKED_IN" | "CHECKEDIN" => CanonicalStatus::CheckedIn,
        _ => CanonicalStatus::Unknown,
    };

    if status == CanonicalStatus::Unknown && !folded.is_empty() {
        warn!("Unrecognized appointment status token: {:?}", raw);
    }

    status
}
