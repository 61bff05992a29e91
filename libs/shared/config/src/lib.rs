use std::env;
use tracing::warn;

/// Slot length used when VITALIA_SLOT_MINUTES is not set.
pub const DEFAULT_SLOT_MINUTES: i32 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_url: String,
    pub slot_minutes: i32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            backend_url: env::var("VITALIA_BACKEND_URL")
                .unwrap_or_else(|_| {
                    warn!("VITALIA_BACKEND_URL not set, using empty value");
                    String::new()
                }),
            slot_minutes: env::var("VITALIA_SLOT_MINUTES")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or_else(|| {
                    warn!("VITALIA_SLOT_MINUTES not set or not a number, using default");
                    DEFAULT_SLOT_MINUTES
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.backend_url.is_empty()
    }
}
