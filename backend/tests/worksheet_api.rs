//! End-to-end HTTP behaviour over the in-memory store.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{DateTime, TimeDelta, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use worksheets::domain::{WorksheetCommandService, WorksheetQueryService};
use worksheets::inbound::http::health::{HealthState, live, ready};
use worksheets::inbound::http::state::HttpState;
use worksheets::inbound::http::worksheets::configure;
use worksheets::outbound::memory::InMemoryWorksheetRepository;
use worksheets::test_support::SteppingClock;

struct Api {
    clock: Arc<SteppingClock>,
    state: HttpState,
}

#[fixture]
fn api() -> Api {
    let clock = Arc::new(SteppingClock::default());
    let repo = Arc::new(InMemoryWorksheetRepository::new(clock.clone()));
    let state = HttpState::new(
        Arc::new(WorksheetQueryService::new(repo.clone())),
        Arc::new(WorksheetCommandService::new(repo, clock.clone())),
    );
    Api { clock, state }
}

fn timestamp(value: &Value) -> DateTime<Utc> {
    value
        .as_str()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|at| at.with_timezone(&Utc))
        .expect("RFC 3339 timestamp")
}

macro_rules! init_app {
    ($state:expr) => {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .app_data(web::Data::new(HealthState::new()))
                .service(web::scope("/api/v1").configure(configure))
                .service(ready)
                .service(live),
        )
        .await
    };
}

#[rstest]
#[actix_web::test]
async fn worksheet_lifecycle_through_the_api(api: Api) {
    let app = init_app!(api.state.clone());

    let created: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/worksheets")
            .set_json(json!({
                "clientName": "PT Maju",
                "type": "PPN",
                "period": "Juli 2025",
            }))
            .to_request(),
    )
    .await;
    let id = created["id"].as_str().expect("id").to_owned();
    assert_eq!(created["statusBadge"]["variant"], "outline");

    let listing: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/worksheets?type=PPN")
            .to_request(),
    )
    .await;
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["worksheets"][0]["id"], id.as_str());

    api.clock.advance(TimeDelta::minutes(5));
    let updated: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/worksheets/{id}"))
            .set_json(json!({ "status": "Selesai", "amount": 2500000 }))
            .to_request(),
    )
    .await;
    assert_eq!(updated["status"], "Selesai");
    assert_eq!(updated["amountDisplay"], "Rp 2.500.000,00");
    assert!(timestamp(&updated["updatedAt"]) > timestamp(&created["updatedAt"]));

    let summaries: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/worksheets")
            .to_request(),
    )
    .await;
    let ppn = summaries["summaries"]
        .as_array()
        .and_then(|cards| cards.iter().find(|card| card["taxType"] == "PPN"))
        .expect("PPN card");
    assert_eq!(ppn["completed"], 1);
    assert_eq!(ppn["completionPercentage"], 100.0);

    let deleted = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/worksheets/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/worksheets/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn empty_store_reports_no_worksheets(api: Api) {
    let app = init_app!(api.state);

    let listing: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/worksheets")
            .to_request(),
    )
    .await;

    assert_eq!(listing["emptyState"], "no_worksheets");
    assert_eq!(listing["partitions"]["all"], 0);
    assert_eq!(listing["summaries"].as_array().map(Vec::len), Some(5));
}

#[rstest]
#[actix_web::test]
async fn health_checks_are_served_alongside_the_api(api: Api) {
    let app = init_app!(api.state);

    let liveness = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/health/live").to_request(),
    )
    .await;
    let readiness = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/health/ready").to_request(),
    )
    .await;

    assert_eq!(liveness.status(), StatusCode::OK);
    assert_eq!(readiness.status(), StatusCode::SERVICE_UNAVAILABLE);
}
