use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers::*;
use crate::view::BookingView;

pub fn booking_routes(view: Arc<BookingView>) -> Router {
    Router::new()
        .route("/", get(booking_page))
        .route("/screen", get(booking_screen))
        .route("/intake", post(submit_intake))
        .route("/slot", post(select_slot))
        .route("/vet", post(select_vet))
        .route("/book", post(submit_booking))
        .route("/logout", post(logout))
        .with_state(view)
}
