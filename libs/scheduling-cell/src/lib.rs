pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::SchedulingError;
pub use router::appointment_routes;
pub use services::availability::SlotService;
pub use services::booking::BookingService;
pub use services::lifecycle::LifecycleService;
