pub mod error;
pub mod models;
pub mod services;
pub mod view;
pub mod screen;
pub mod html;
pub mod handlers;
pub mod router;

pub use error::*;
pub use models::*;
pub use services::*;
pub use view::{SchedulerView, SchedulerState, CreateOutcome};
pub use screen::{render, SchedulerScreen, MISSING_FIELDS_ALERT};
pub use router::scheduler_routes;
