pub mod status;

pub use status::{normalize_status, CanonicalStatus};
