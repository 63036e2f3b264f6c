use std::sync::Arc;

use axum::{
    Router,
    response::Html,
    routing::get,
};

use booking_cell::{booking_routes, BookingView};
use scheduler_cell::{scheduler_routes, SchedulerView};
use shared_utils::html::page;

async fn index() -> Html<String> {
    Html(page(
        "Vet Clinic",
        "<h1>Vet Clinic</h1>\n<ul>\n<li><a href=\"/booking\">Book an Appointment</a></li>\n<li><a href=\"/scheduler\">Appointment Scheduler</a></li>\n</ul>",
    ))
}

pub fn create_router(booking: Arc<BookingView>, scheduler: Arc<SchedulerView>) -> Router {
    Router::new()
        .route("/", get(index))
        .nest("/booking", booking_routes(booking))
        .nest("/scheduler", scheduler_routes(scheduler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{body::Body, http::{Request, StatusCode}};
    use tower::ServiceExt;

    use auth_cell::AuthService;
    use booking_cell::BookingServices;
    use scheduler_cell::SchedulerApiClient;
    use shared_utils::test_utils::TestConfig;

    #[tokio::test]
    async fn test_index_and_nested_views() {
        let config = TestConfig::with_urls("http://127.0.0.1:9", "http://127.0.0.1:9").to_app_config();
        let auth = Arc::new(AuthService::new(&config));
        let booking = Arc::new(BookingView::mount(BookingServices::new(&config, auth)).await);
        let scheduler = Arc::new(SchedulerView::new(SchedulerApiClient::new(&config)));
        let app = create_router(booking, scheduler);

        let response = app.clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.clone()
            .oneshot(Request::builder().uri("/booking").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8(body.to_vec()).unwrap().contains("<h1>Login</h1>"));

        let response = app
            .oneshot(Request::builder().uri("/scheduler").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
