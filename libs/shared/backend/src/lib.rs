pub mod vitalia;

pub use vitalia::VitaliaClient;
