use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers::*;
use crate::view::SchedulerView;

pub fn scheduler_routes(view: Arc<SchedulerView>) -> Router {
    Router::new()
        .route("/", get(scheduler_page))
        .route("/screen", get(scheduler_screen))
        .route("/title", post(set_title))
        .route("/range", post(select_range))
        .route("/create", post(create_appointment))
        .route("/reload", post(reload))
        .with_state(view)
}
