pub mod availability;
pub mod directory;
pub mod appointment;

pub use availability::{AvailabilityProvider, MockAvailabilityProvider};
pub use directory::ClinicDirectoryService;
pub use appointment::AppointmentService;
