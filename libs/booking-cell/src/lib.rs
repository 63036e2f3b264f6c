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
pub use view::{BookingView, BookingServices, BookingState, BookingOutcome};
pub use screen::{render, BookingScreen};
pub use router::booking_routes;
