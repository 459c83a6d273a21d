//! End-to-end callback request lifecycle over the HTTP adapter.
//!
//! Handlers run against the real service and the in-memory store, wrapped in
//! the tracing middleware so failure envelopes carry trace identifiers.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use callback_desk::Trace;
use callback_desk::domain::{CallbackRequestService, RequestIdGenerator, TRACE_ID_HEADER};
use callback_desk::inbound::http::api_scope;
use callback_desk::inbound::http::state::HttpState;
use callback_desk::outbound::memory::InMemoryInteractionRepository;
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::{Value, json};

fn http_state() -> web::Data<HttpState> {
    let service = CallbackRequestService::new(
        Arc::new(InMemoryInteractionRepository::new()),
        RequestIdGenerator::random(),
        Arc::new(DefaultClock),
    );
    web::Data::new(HttpState::for_service(Arc::new(service)))
}

async fn app(
    state: web::Data<HttpState>,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(App::new().app_data(state).wrap(Trace).service(api_scope())).await
}

async fn send<S>(app: &S, req: test::TestRequest) -> (u16, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status().as_u16();
    let body: Value = test::read_body_json(res).await;
    (status, body)
}

fn create(items: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/callback_request")
        .set_json(items)
}

fn track(request_id: &str) -> test::TestRequest {
    test::TestRequest::get().uri(&format!("/api/track?request_id={request_id}"))
}

fn code_of(body: &Value) -> String {
    body["request_id"]
        .as_str()
        .expect("request_id string")
        .to_owned()
}

#[rstest]
#[actix_web::test]
async fn created_requests_are_pending_when_tracked() {
    let app = app(http_state()).await;

    let (status, created) = send(
        &app,
        create(json!([{
            "customer_name": "Asha",
            "phone_number": "9876543210",
            "request_type": "service",
            "preferred_time": "2024-05-01T10:00:00Z"
        }])),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(created["status"], "Success");
    assert_eq!(created["message"], "Callback request created");
    let code = code_of(&created);
    assert_eq!(code.len(), 4);
    assert!(code.chars().all(|c| c.is_ascii_digit()));

    let (status, tracked) = send(&app, track(&code)).await;
    assert_eq!(status, 200);
    assert_eq!(tracked["data"]["request_id"], code.as_str());
    assert_eq!(tracked["data"]["customer_status"], "Pending");
    assert_eq!(tracked["data"]["preferred_time"], "2024-05-01T10:00:00+00:00");
    assert_eq!(tracked["data"]["dealer_name"], Value::Null);
}

#[rstest]
#[actix_web::test]
async fn batch_items_receive_distinct_codes() {
    let app = app(http_state()).await;
    let item = json!({ "customer_name": "A", "phone_number": "1", "request_type": "demo" });

    let (status, created) = send(&app, create(json!([item.clone(), item.clone(), item]))).await;
    assert_eq!(status, 200);
    let codes: Vec<&str> = created["request_ids"]
        .as_array()
        .expect("codes array")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(codes.len(), 3);
    assert_ne!(codes[0], codes[1]);
    assert_ne!(codes[1], codes[2]);
    assert_ne!(codes[0], codes[2]);
    assert_eq!(created["request_id"], codes[2]);
}

#[rstest]
#[actix_web::test]
async fn care_agent_update_moves_request_to_processing() {
    let app = app(http_state()).await;
    let (_, created) = send(
        &app,
        create(json!([{ "customer_name": "Asha", "phone_number": "1", "request_type": "service" }])),
    )
    .await;
    let code = code_of(&created);

    let (status, updated) = send(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/callback_request/{code}"))
            .set_json(json!({
                "customer_name": "Asha",
                "additional_info": "Prefers mornings",
                "dealer_name": "North Motors",
                "dealer_phone_number": "5550100"
            })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(updated["message"], "Callback request updated successfully");

    let (_, tracked) = send(&app, track(&code)).await;
    assert_eq!(tracked["data"]["customer_status"], "Processing");
    assert_eq!(tracked["data"]["dealer_name"], "North Motors");
    assert_eq!(tracked["data"]["additional_info"], "Prefers mornings");
}

#[rstest]
#[actix_web::test]
async fn name_mismatch_leaves_request_untouched() {
    let app = app(http_state()).await;
    let (_, created) = send(
        &app,
        create(json!([{ "customer_name": "Asha", "phone_number": "1", "request_type": "service" }])),
    )
    .await;
    let code = code_of(&created);

    let (status, failed) = send(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/callback_request/{code}"))
            .set_json(json!({ "customer_name": "Someone Else", "dealer_name": "North Motors" })),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(failed["status"], "Failed");
    assert_eq!(
        failed["message"],
        "customer_name associated with request_id not matched with name in payload"
    );

    let (_, tracked) = send(&app, track(&code)).await;
    assert_eq!(tracked["data"]["customer_status"], "Pending");
    assert_eq!(tracked["data"]["dealer_name"], Value::Null);
}

#[rstest]
#[actix_web::test]
async fn dealers_see_only_their_customers() {
    let app = app(http_state()).await;
    let (_, created) = send(
        &app,
        create(json!([
            { "customer_name": "A", "phone_number": "1", "request_type": "service" },
            { "customer_name": "B", "phone_number": "2", "request_type": "demo" },
            { "customer_name": "C", "phone_number": "3", "request_type": "service" }
        ])),
    )
    .await;
    let codes: Vec<String> = created["request_ids"]
        .as_array()
        .expect("codes array")
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_owned)
        .collect();

    for (code, name, dealer) in [
        (&codes[0], "A", "North Motors"),
        (&codes[1], "B", "South Motors"),
        (&codes[2], "C", "North Motors"),
    ] {
        let (status, _) = send(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/callback_request/{code}"))
                .set_json(json!({ "customer_name": name, "dealer_name": dealer })),
        )
        .await;
        assert_eq!(status, 200);
    }

    let (status, listed) = send(
        &app,
        test::TestRequest::get().uri("/api/dealers/customer_info?dealer_name=North%20Motors"),
    )
    .await;
    assert_eq!(status, 200);
    let names: Vec<&str> = listed["data"]
        .as_array()
        .expect("data array")
        .iter()
        .filter_map(|entry| entry["customer_name"].as_str())
        .collect();
    assert_eq!(names, ["A", "C"]);
    assert!(listed["data"][0].get("request_id").is_none());
}

#[rstest]
#[case("/api/dealers/customer_info?dealer_name=Nobody", "No records found under this dealer name")]
#[case("/api/dealers/customer_info?dealer_name=", "Dealer name should not be empty field")]
#[case("/api/track?request_id=123", "Request ID was wrong, check once again!")]
#[case("/api/track?request_id=1234", "Request ID not found, check once!")]
#[actix_web::test]
async fn lookups_fail_with_envelopes(#[case] uri: &str, #[case] message: &str) {
    let app = app(http_state()).await;
    let (status, body) = send(&app, test::TestRequest::get().uri(uri)).await;
    assert_eq!(status, 400);
    assert_eq!(body["status"], "Failed");
    assert_eq!(body["message"], message);
}

#[rstest]
#[actix_web::test]
async fn empty_payload_is_rejected() {
    let app = app(http_state()).await;
    let (status, body) = send(&app, create(json!([]))).await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "No payload data");
}

#[rstest]
#[actix_web::test]
async fn malformed_json_yields_failure_envelope_with_trace_id() {
    let app = app(http_state()).await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/callback_request")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;
    assert_eq!(res.status().as_u16(), 400);
    let header = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["status"], "Failed");
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["trace_id"], header.as_str());
}
