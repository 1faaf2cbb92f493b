pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::DirectoryError;
pub use router::{patient_routes, provider_routes};
pub use services::directory::{PatientService, ProviderService};
pub use services::schedule::ScheduleService;
