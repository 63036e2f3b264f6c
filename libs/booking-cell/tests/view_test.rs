use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use serde_json::json;
use tokio::time::{sleep, Duration, Instant};
use uuid::Uuid;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};

use auth_cell::{Access, AuthService};
use booking_cell::{
    BookingError, BookingOutcome, BookingScreen, BookingServices, BookingState, BookingView,
    IntakeField, MockAvailabilityProvider,
};
use shared_config::AppConfig;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig, TestUser};

fn test_config(mock_server: &MockServer) -> AppConfig {
    TestConfig::with_urls(mock_server.uri(), "http://localhost:3001").to_app_config()
}

async fn mount_role(mock_server: &MockServer, user: &TestUser, role: &str) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/owners"))
        .and(query_param("id", format!("eq.{}", user.id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockSupabaseResponses::owner_role_response(role)))
        .mount(mock_server)
        .await;
}

async fn mount_vets(mock_server: &MockServer, vets: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/veterinarians"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vets))
        .mount(mock_server)
        .await;
}

async fn mount_treatments(mock_server: &MockServer, treatments: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/treatments"))
        .and(query_param("order", "treatment_date.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(treatments))
        .mount(mock_server)
        .await;
}

async fn signed_in_auth(config: &AppConfig, user: &TestUser) -> Arc<AuthService> {
    let auth = Arc::new(AuthService::new(config));
    auth.set_session(user.to_session()).await;
    auth
}

async fn mount_view(config: &AppConfig, auth: Arc<AuthService>) -> BookingView {
    BookingView::mount(BookingServices::new(config, auth)).await
}

async fn wait_for_state<F>(view: &BookingView, predicate: F) -> BookingState
where
    F: Fn(&BookingState) -> bool,
{
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let state = view.state().await;
        if predicate(&state) {
            return state;
        }
        if Instant::now() > deadline {
            panic!("booking view never reached the expected state: {:?}", state);
        }
        sleep(Duration::from_millis(20)).await;
    }
}

async fn fill_intake(view: &BookingView) {
    view.update_intake(IntakeField::Name, "Rex").await.unwrap();
    view.update_intake(IntakeField::Species, "dog").await.unwrap();
    view.update_intake(IntakeField::Breed, "Lab").await.unwrap();
    view.update_intake(IntakeField::ReasonForVisit, "checkup").await.unwrap();
}

fn fixed_slots() -> Vec<chrono::DateTime<Utc>> {
    vec![
        Utc.with_ymd_and_hms(2024, 9, 26, 9, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 9, 26, 10, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 9, 26, 11, 0, 0).unwrap(),
    ]
}

#[tokio::test]
async fn test_without_session_only_login_is_rendered() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);
    let auth = Arc::new(AuthService::new(&config));

    let view = mount_view(&config, auth.clone()).await;

    assert_eq!(view.screen().await, BookingScreen::Login);
    assert_eq!(view.submit_intake().await, Err(BookingError::NoSession));
    assert_eq!(view.submit_booking().await, BookingOutcome::NotReady);

    // No backend traffic without a session
    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.is_empty());

    view.teardown().await;
}

#[tokio::test]
async fn test_teardown_releases_session_subscription() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);
    let auth = Arc::new(AuthService::new(&config));

    let view = mount_view(&config, auth.clone()).await;
    assert_eq!(auth.subscriber_count(), 1);

    view.teardown().await;
    assert_eq!(auth.subscriber_count(), 0);
}

#[tokio::test]
async fn test_admin_sees_admin_panel_only() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);
    let user = TestUser::admin("admin@example.com");

    mount_role(&mock_server, &user, "admin").await;
    mount_vets(&mock_server, json!([MockSupabaseResponses::veterinarian(Uuid::new_v4(), "Dr. Hale")])).await;
    mount_treatments(&mock_server, json!([
        MockSupabaseResponses::treatment("2024-09-01T10:00:00Z", "Rex", "Vaccination")
    ])).await;

    let auth = signed_in_auth(&config, &user).await;
    let view = mount_view(&config, auth).await;

    match view.screen().await {
        BookingScreen::Dashboard(dashboard) => {
            assert_eq!(dashboard.title, "Admin Dashboard");
            assert!(dashboard.admin_panel);
            assert!(dashboard.intake.is_none());
            assert!(dashboard.slots.is_none());
            assert!(dashboard.vet_picker.is_none());
            assert_eq!(dashboard.treatments.len(), 1);
        }
        other => panic!("expected admin dashboard, got {:?}", other),
    }

    view.teardown().await;
}

#[tokio::test]
async fn test_complete_intake_yields_three_fixed_slots() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);
    let user = TestUser::owner("owner@example.com");

    mount_role(&mock_server, &user, "owner").await;
    mount_vets(&mock_server, json!([])).await;
    mount_treatments(&mock_server, json!([])).await;

    let auth = signed_in_auth(&config, &user).await;
    let view = mount_view(&config, auth).await;
    assert_eq!(view.state().await.access, Access::Owner);

    fill_intake(&view).await;
    let slots = view.submit_intake().await.unwrap();

    assert_eq!(slots, fixed_slots());
    assert_eq!(view.state().await.available_slots, fixed_slots());

    view.teardown().await;
}

#[tokio::test]
async fn test_incomplete_intake_is_rejected() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);
    let user = TestUser::owner("owner@example.com");

    mount_role(&mock_server, &user, "owner").await;
    mount_vets(&mock_server, json!([])).await;
    mount_treatments(&mock_server, json!([])).await;

    let auth = signed_in_auth(&config, &user).await;
    let view = mount_view(&config, auth).await;

    view.update_intake(IntakeField::Name, "Rex").await.unwrap();
    assert_matches!(
        view.update_intake(IntakeField::Species, "parrot").await,
        Err(BookingError::InvalidSpecies(_))
    );

    let result = view.submit_intake().await;
    assert_eq!(result, Err(BookingError::MissingFields(vec!["species", "reason_for_visit"])));
    assert!(view.state().await.available_slots.is_empty());

    view.teardown().await;
}

#[tokio::test]
async fn test_booking_requires_slot_and_vet() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);
    let user = TestUser::owner("owner@example.com");
    let vet_id = Uuid::new_v4();

    mount_role(&mock_server, &user, "owner").await;
    mount_vets(&mock_server, json!([MockSupabaseResponses::veterinarian(vet_id, "Dr. Hale")])).await;
    mount_treatments(&mock_server, json!([])).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let auth = signed_in_auth(&config, &user).await;
    let view = mount_view(&config, auth).await;

    assert_eq!(view.submit_booking().await, BookingOutcome::NotReady);

    fill_intake(&view).await;
    view.submit_intake().await.unwrap();
    view.select_slot(fixed_slots()[0]).await.unwrap();
    assert_eq!(view.submit_booking().await, BookingOutcome::NotReady);

    view.teardown().await;
}

#[tokio::test]
async fn test_booking_issues_one_insert_and_refreshes_history() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);
    let user = TestUser::owner("owner@example.com");
    let vet_id = Uuid::new_v4();
    let slot = fixed_slots()[1];

    mount_role(&mock_server, &user, "owner").await;
    mount_vets(&mock_server, json!([
        MockSupabaseResponses::veterinarian(Uuid::new_v4(), "Dr. Hale"),
        MockSupabaseResponses::veterinarian(vet_id, "Dr. Moreau"),
    ])).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/treatments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(header("Authorization", format!("Bearer {}", user.access_token())))
        .and(body_partial_json(json!({
            "pet_id": "PLACEHOLDER_PET_ID",
            "vet_id": vet_id,
            "appointment_datetime": "2024-09-26T10:00:00Z",
            "reason_for_visit": "checkup"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockSupabaseResponses::appointment_response("PLACEHOLDER_PET_ID", vet_id, "2024-09-26T10:00:00+00:00")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = signed_in_auth(&config, &user).await;
    let view = mount_view(&config, auth).await;

    fill_intake(&view).await;
    view.submit_intake().await.unwrap();
    view.select_slot(slot).await.unwrap();
    view.select_vet(Some(vet_id)).await.unwrap();

    assert_eq!(view.submit_booking().await, BookingOutcome::Booked { vet_id, slot });

    let state = view.state().await;
    assert_eq!(state.selected_slot, Some(slot));
    assert_eq!(state.selected_vet, Some(vet_id));

    view.teardown().await;
}

#[tokio::test]
async fn test_failed_booking_keeps_selections() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);
    let user = TestUser::owner("owner@example.com");
    let vet_id = Uuid::new_v4();

    mount_role(&mock_server, &user, "owner").await;
    mount_vets(&mock_server, json!([MockSupabaseResponses::veterinarian(vet_id, "Dr. Hale")])).await;
    mount_treatments(&mock_server, json!([])).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(409).set_body_json(
            MockSupabaseResponses::error_response("duplicate key value", "23505"),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = signed_in_auth(&config, &user).await;
    let view = mount_view(&config, auth).await;

    fill_intake(&view).await;
    view.submit_intake().await.unwrap();
    view.select_slot(fixed_slots()[0]).await.unwrap();
    view.select_vet(Some(vet_id)).await.unwrap();

    assert_eq!(view.submit_booking().await, BookingOutcome::Failed);

    let state = view.state().await;
    assert_eq!(state.selected_slot, Some(fixed_slots()[0]));
    assert_eq!(state.selected_vet, Some(vet_id));
    assert!(state.can_book());

    view.teardown().await;
}

#[tokio::test]
async fn test_selection_must_come_from_offered_lists() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);
    let user = TestUser::owner("owner@example.com");
    let vet_id = Uuid::new_v4();

    mount_role(&mock_server, &user, "owner").await;
    mount_vets(&mock_server, json!([MockSupabaseResponses::veterinarian(vet_id, "Dr. Hale")])).await;
    mount_treatments(&mock_server, json!([])).await;

    let auth = signed_in_auth(&config, &user).await;
    let view = mount_view(&config, auth).await;

    let stray = Utc.with_ymd_and_hms(2030, 1, 1, 8, 0, 0).unwrap();
    assert_eq!(view.select_slot(stray).await, Err(BookingError::UnknownSlot(stray)));

    let stranger = Uuid::new_v4();
    assert_eq!(view.select_vet(Some(stranger)).await, Err(BookingError::UnknownVet(stranger)));

    view.select_vet(Some(vet_id)).await.unwrap();
    view.select_vet(None).await.unwrap();
    assert_eq!(view.state().await.selected_vet, None);

    view.teardown().await;
}

#[tokio::test]
async fn test_role_lookup_failure_falls_back_to_owner() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);
    let user = TestUser::admin("admin@example.com");

    Mock::given(method("GET"))
        .and(path("/rest/v1/owners"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&mock_server)
        .await;
    mount_vets(&mock_server, json!([])).await;
    mount_treatments(&mock_server, json!([])).await;

    let auth = signed_in_auth(&config, &user).await;
    let view = mount_view(&config, auth).await;

    assert_eq!(view.state().await.access, Access::Owner);
    assert_matches!(view.screen().await, BookingScreen::Dashboard(ref d) if d.intake.is_some());

    view.teardown().await;
}

#[tokio::test]
async fn test_reference_data_failures_are_independent() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);
    let user = TestUser::owner("owner@example.com");

    mount_role(&mock_server, &user, "owner").await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/veterinarians"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&mock_server)
        .await;
    mount_treatments(&mock_server, json!([
        MockSupabaseResponses::treatment("2024-08-01T10:00:00Z", "Milo", "Checkup")
    ])).await;

    let auth = signed_in_auth(&config, &user).await;
    let view = mount_view(&config, auth).await;

    let state = view.state().await;
    assert!(state.vets.is_empty());
    assert_eq!(state.treatments.len(), 1);

    view.teardown().await;
}

#[tokio::test]
async fn test_treatment_history_is_newest_first_with_pet_names() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);
    let user = TestUser::owner("owner@example.com");

    mount_role(&mock_server, &user, "owner").await;
    mount_vets(&mock_server, json!([])).await;
    mount_treatments(&mock_server, json!([
        MockSupabaseResponses::treatment("2024-03-10T09:00:00Z", "Milo", "Dental cleaning"),
        MockSupabaseResponses::treatment("2024-09-01T10:00:00Z", "Rex", "Vaccination"),
        MockSupabaseResponses::treatment("2024-06-15T14:30:00Z", "Luna", "Skin allergy"),
    ])).await;

    let auth = signed_in_auth(&config, &user).await;
    let view = mount_view(&config, auth).await;

    let dashboard = match view.screen().await {
        BookingScreen::Dashboard(dashboard) => dashboard,
        other => panic!("expected dashboard, got {:?}", other),
    };

    let pets: Vec<_> = dashboard.treatments.iter().map(|t| t.pet_name.clone().unwrap()).collect();
    assert_eq!(pets, vec!["Rex", "Luna", "Milo"]);
    assert_eq!(
        dashboard.treatments[0].appointment_datetime,
        Some(Utc.with_ymd_and_hms(2024, 9, 1, 10, 0, 0).unwrap())
    );

    view.teardown().await;
}

#[tokio::test]
async fn test_session_changes_drive_the_view() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);
    let user = TestUser::owner("owner@example.com");

    mount_role(&mock_server, &user, "owner").await;
    mount_vets(&mock_server, json!([MockSupabaseResponses::veterinarian(Uuid::new_v4(), "Dr. Hale")])).await;
    mount_treatments(&mock_server, json!([])).await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = Arc::new(AuthService::new(&config));
    let view = mount_view(&config, auth.clone()).await;
    assert_eq!(view.screen().await, BookingScreen::Login);

    auth.set_session(user.to_session()).await;
    let state = wait_for_state(&view, |state| state.access == Access::Owner && !state.vets.is_empty()).await;
    assert!(state.session.is_some());

    view.logout().await;
    assert_eq!(view.screen().await, BookingScreen::Login);
    assert!(auth.get_session().await.is_none());

    view.teardown().await;
}

#[tokio::test]
async fn test_failed_logout_keeps_dashboard() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);
    let user = TestUser::owner("owner@example.com");

    mount_role(&mock_server, &user, "owner").await;
    mount_vets(&mock_server, json!([])).await;
    mount_treatments(&mock_server, json!([])).await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let auth = signed_in_auth(&config, &user).await;
    let view = mount_view(&config, auth).await;

    view.logout().await;
    assert_matches!(view.screen().await, BookingScreen::Dashboard(_));

    view.teardown().await;
}

#[tokio::test]
async fn test_custom_availability_provider_is_used() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);
    let user = TestUser::owner("owner@example.com");

    mount_role(&mock_server, &user, "owner").await;
    mount_vets(&mock_server, json!([])).await;
    mount_treatments(&mock_server, json!([])).await;

    let late = Utc.with_ymd_and_hms(2024, 10, 2, 16, 0, 0).unwrap();
    let early = Utc.with_ymd_and_hms(2024, 10, 1, 8, 30, 0).unwrap();
    let provider = Arc::new(MockAvailabilityProvider::with_slots(vec![late, early, late]));

    let auth = signed_in_auth(&config, &user).await;
    let services = BookingServices::new(&config, auth).with_availability(provider);
    let view = BookingView::mount(services).await;

    fill_intake(&view).await;
    assert_eq!(view.submit_intake().await.unwrap(), vec![early, late]);

    view.teardown().await;
}

#[tokio::test]
async fn test_booking_succeeds_on_empty_created_response() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);
    let user = TestUser::owner("owner@example.com");
    let vet_id = Uuid::new_v4();
    let slot = Utc.with_ymd_and_hms(2024, 9, 26, 9, 0, 0).unwrap();

    mount_role(&mock_server, &user, "owner").await;
    mount_vets(&mock_server, json!([MockSupabaseResponses::veterinarian(vet_id, "Dr. Hale")])).await;
    mount_treatments(&mock_server, json!([])).await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = signed_in_auth(&config, &user).await;
    let view = mount_view(&config, auth).await;

    fill_intake(&view).await;
    view.submit_intake().await.unwrap();
    view.select_slot(slot).await.unwrap();
    view.select_vet(Some(vet_id)).await.unwrap();

    assert_eq!(view.submit_booking().await, BookingOutcome::Booked { vet_id, slot });

    view.teardown().await;
}

#[tokio::test]
async fn test_switching_user_drops_previous_user_state() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);
    let first = TestUser::owner("a@example.com");
    let second = TestUser::owner("b@example.com");

    mount_role(&mock_server, &first, "owner").await;
    mount_role(&mock_server, &second, "owner").await;
    mount_vets(&mock_server, json!([])).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/treatments"))
        .and(header("Authorization", format!("Bearer {}", first.access_token())))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::treatment("2024-09-01T10:00:00Z", "Biscuit", "Vaccination")
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/treatments"))
        .and(header("Authorization", format!("Bearer {}", second.access_token())))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&mock_server)
        .await;

    let auth = signed_in_auth(&config, &first).await;
    let view = mount_view(&config, auth.clone()).await;
    assert_eq!(view.state().await.treatments.len(), 1);

    fill_intake(&view).await;
    view.submit_intake().await.unwrap();

    auth.set_session(second.to_session()).await;
    let state = wait_for_state(&view, |state| {
        state.session.as_ref().map(|s| s.user_id()) == Some(second.id.as_str())
            && state.access == Access::Owner
    })
    .await;

    assert!(state.treatments.is_empty());
    assert_eq!(state.intake.name, "");
    assert!(state.available_slots.is_empty());
    assert!(state.selected_slot.is_none());

    view.teardown().await;
}

#[tokio::test]
async fn test_token_refresh_keeps_draft_and_rederives_access() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);
    let user = TestUser::owner("owner@example.com");

    mount_role(&mock_server, &user, "admin").await;
    mount_vets(&mock_server, json!([])).await;
    mount_treatments(&mock_server, json!([])).await;

    let auth = signed_in_auth(&config, &user).await;
    let view = mount_view(&config, auth.clone()).await;
    assert_eq!(view.state().await.access, Access::Admin);

    view.update_intake(IntakeField::Name, "Rex").await.unwrap();

    let mut refreshed = user.to_session();
    refreshed.access_token = "refreshed-token".to_string();
    auth.refresh_session(refreshed).await;

    let state = wait_for_state(&view, |state| {
        state.session.as_ref().map(|s| s.access_token.as_str()) == Some("refreshed-token")
            && state.access == Access::Admin
    })
    .await;

    assert_eq!(state.intake.name, "Rex");

    let role_lookups = mock_server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|request| request.url.path() == "/rest/v1/owners")
        .count();
    assert_eq!(role_lookups, 2);

    view.teardown().await;
}
