//! Tests for the callback request lifecycle service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockInteractionRepository;
use crate::domain::request_id_generator::test_support::SequenceRequestIdSource;
use crate::domain::{CustomerStatus, ErrorCode};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn make_service(
    repo: MockInteractionRepository,
    draws: impl IntoIterator<Item = u16>,
    now: DateTime<Utc>,
) -> CallbackRequestService<MockInteractionRepository> {
    CallbackRequestService::new(
        Arc::new(repo),
        RequestIdGenerator::new(Arc::new(SequenceRequestIdSource::new(draws)), 8),
        Arc::new(FixtureClock { utc_now: now }),
    )
}

fn item(name: &str) -> CallbackRequestItem {
    CallbackRequestItem::new(name, "555", "repair", None).expect("valid item")
}

fn code(raw: &str) -> RequestId {
    RequestId::new(raw).expect("valid code")
}

fn stored(raw: &str, name: &str, dealer: Option<&str>, now: DateTime<Utc>) -> CustomerInteraction {
    let mut record = CustomerInteraction::from_new(
        1,
        NewCustomerInteraction::pending(code(raw), &item(name), now),
    );
    record.dealer_name = dealer.map(str::to_owned);
    record
}

fn committed(records: &[NewCustomerInteraction]) -> Vec<CustomerInteraction> {
    records
        .iter()
        .cloned()
        .zip(1..)
        .map(|(record, id)| CustomerInteraction::from_new(id, record))
        .collect()
}

fn update_for(raw: &str, name: &str) -> CareAgentUpdate {
    CareAgentUpdate {
        request_id: code(raw),
        customer_name: name.to_owned(),
        additional_info: Some("call after lunch".to_owned()),
        dealer_name: Some("Acme".to_owned()),
        dealer_phone_number: Some("777".to_owned()),
    }
}

#[rstest]
#[tokio::test]
async fn create_rejects_empty_payload_without_touching_the_store(now: DateTime<Utc>) {
    let mut repo = MockInteractionRepository::new();
    repo.expect_request_id_exists().times(0);
    repo.expect_insert_batch().times(0);

    let err = make_service(repo, [1234], now)
        .create(Vec::new())
        .await
        .expect_err("empty payload");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "No payload data");
}

#[rstest]
#[tokio::test]
async fn create_allocates_distinct_codes_per_item(now: DateTime<Utc>) {
    let mut repo = MockInteractionRepository::new();
    repo.expect_request_id_exists().returning(|_| Ok(false));
    repo.expect_insert_batch()
        .times(1)
        .withf(move |records| {
            records.len() == 3
                && records.iter().all(|record| {
                    record.customer_status == CustomerStatus::Pending
                        && record.created_at == now
                        && record.updated_at == now
                })
        })
        .returning(|records| Ok(committed(records)));

    let created = make_service(repo, [1111, 1111, 2222, 3333], now)
        .create(vec![item("A"), item("B"), item("C")])
        .await
        .expect("batch created");

    let codes: Vec<&str> = created.request_ids().iter().map(RequestId::as_str).collect();
    assert_eq!(codes, ["1111", "2222", "3333"]);
    assert_eq!(created.last_request_id().as_str(), "3333");
}

#[rstest]
#[tokio::test]
async fn create_reallocates_after_commit_collision(now: DateTime<Utc>) {
    let mut repo = MockInteractionRepository::new();
    let mut seq = mockall::Sequence::new();
    repo.expect_request_id_exists().returning(|_| Ok(false));
    repo.expect_insert_batch()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Err(InteractionRepositoryError::duplicate_request_id("4444")));
    repo.expect_insert_batch()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|records| Ok(committed(records)));

    let created = make_service(repo, [4444, 5555], now)
        .create(vec![item("Jo")])
        .await
        .expect("second commit succeeds");
    assert_eq!(created.last_request_id().as_str(), "5555");
}

#[rstest]
#[tokio::test]
async fn create_reports_conflict_after_repeated_collisions(now: DateTime<Utc>) {
    let mut repo = MockInteractionRepository::new();
    repo.expect_request_id_exists().returning(|_| Ok(false));
    repo.expect_insert_batch()
        .times(MAX_COMMIT_ATTEMPTS as usize)
        .returning(|_| Err(InteractionRepositoryError::duplicate_request_id("4444")));

    let err = make_service(repo, [4444], now)
        .create(vec![item("Jo")])
        .await
        .expect_err("collisions persist");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn create_reports_exhausted_code_space(now: DateTime<Utc>) {
    let mut repo = MockInteractionRepository::new();
    repo.expect_request_id_exists().returning(|_| Ok(true));
    repo.expect_insert_batch().times(0);

    let err = make_service(repo, [6666], now)
        .create(vec![item("Jo")])
        .await
        .expect_err("no free codes");
    assert_eq!(err.code(), ErrorCode::IdSpaceExhausted);
}

#[rstest]
#[case(InteractionRepositoryError::connection("pool closed"), ErrorCode::ServiceUnavailable)]
#[case(InteractionRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn create_maps_store_failures(
    now: DateTime<Utc>,
    #[case] failure: InteractionRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockInteractionRepository::new();
    repo.expect_request_id_exists().returning(|_| Ok(false));
    repo.expect_insert_batch()
        .times(1)
        .return_once(move |_| Err(failure));

    let err = make_service(repo, [1234], now)
        .create(vec![item("Jo")])
        .await
        .expect_err("store failure");
    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn update_moves_matching_request_to_processing(now: DateTime<Utc>) {
    let mut repo = MockInteractionRepository::new();
    let existing = stored("1234", "Jo", None, now);
    repo.expect_find_by_request_id()
        .with(eq(code("1234")))
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_update()
        .times(1)
        .withf(|record| {
            record.customer_status == CustomerStatus::Processing
                && record.dealer_name.as_deref() == Some("Acme")
        })
        .return_once(|_| Ok(()));

    let record = make_service(repo, [1234], now)
        .update_by_care_agent(update_for("1234", "Jo"))
        .await
        .expect("update applied");
    assert_eq!(record.customer_status, CustomerStatus::Processing);
    assert_eq!(record.dealer_phone_number.as_deref(), Some("777"));
}

#[rstest]
#[tokio::test]
async fn update_with_mismatched_name_never_writes(now: DateTime<Utc>) {
    let mut repo = MockInteractionRepository::new();
    let existing = stored("1234", "Jo", None, now);
    repo.expect_find_by_request_id()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_update().times(0);

    let err = make_service(repo, [1234], now)
        .update_by_care_agent(update_for("1234", "jo"))
        .await
        .expect_err("names differ by case");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn update_of_unknown_request_is_not_found(now: DateTime<Utc>) {
    let mut repo = MockInteractionRepository::new();
    repo.expect_find_by_request_id()
        .times(1)
        .return_once(|_| Ok(None));
    repo.expect_update().times(0);

    let err = make_service(repo, [1234], now)
        .update_by_care_agent(update_for("9999", "Jo"))
        .await
        .expect_err("unknown code");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_rejects_overlong_dealer_name_before_lookup(now: DateTime<Utc>) {
    let mut repo = MockInteractionRepository::new();
    repo.expect_find_by_request_id().times(0);
    let mut update = update_for("1234", "Jo");
    update.dealer_name = Some("D".repeat(101));

    let err = make_service(repo, [1234], now)
        .update_by_care_agent(update)
        .await
        .expect_err("dealer name too long");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case("")]
#[case("123")]
#[case("12345")]
#[tokio::test]
async fn track_with_wrong_length_never_queries_the_store(now: DateTime<Utc>, #[case] raw: &str) {
    let mut repo = MockInteractionRepository::new();
    repo.expect_find_by_request_id().times(0);

    let err = make_service(repo, [1234], now)
        .track(raw)
        .await
        .expect_err("wrong length");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "Request ID was wrong, check once again!");
}

#[rstest]
#[tokio::test]
async fn track_rejects_non_numeric_codes(now: DateTime<Utc>) {
    let mut repo = MockInteractionRepository::new();
    repo.expect_find_by_request_id().times(0);

    let err = make_service(repo, [1234], now)
        .track("12a4")
        .await
        .expect_err("non numeric");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn track_returns_stored_record(now: DateTime<Utc>) {
    let mut repo = MockInteractionRepository::new();
    let existing = stored("4821", "Jo", None, now);
    repo.expect_find_by_request_id()
        .with(eq(code("4821")))
        .times(1)
        .return_once(move |_| Ok(Some(existing)));

    let record = make_service(repo, [1234], now)
        .track("4821")
        .await
        .expect("record found");
    assert_eq!(record.customer_status, CustomerStatus::Pending);
}

#[rstest]
#[tokio::test]
async fn track_of_unknown_code_is_not_found(now: DateTime<Utc>) {
    let mut repo = MockInteractionRepository::new();
    repo.expect_find_by_request_id()
        .times(1)
        .return_once(|_| Ok(None));

    let err = make_service(repo, [1234], now)
        .track("4821")
        .await
        .expect_err("unknown code");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Request ID not found, check once!");
}

#[rstest]
#[case("")]
#[case("   ")]
#[tokio::test]
async fn listing_requires_a_dealer_name(now: DateTime<Utc>, #[case] dealer: &str) {
    let mut repo = MockInteractionRepository::new();
    repo.expect_find_all_by_dealer().times(0);

    let err = make_service(repo, [1234], now)
        .list_by_dealer(dealer)
        .await
        .expect_err("blank dealer");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "Dealer name should not be empty field");
}

#[rstest]
#[tokio::test]
async fn listing_projects_dealer_records(now: DateTime<Utc>) {
    let mut repo = MockInteractionRepository::new();
    let rows = vec![
        stored("1111", "Ann", Some("Acme"), now),
        stored("2222", "Bob", Some("Acme"), now),
    ];
    repo.expect_find_all_by_dealer()
        .with(eq("Acme"))
        .times(1)
        .return_once(move |_| Ok(rows));

    let customers = make_service(repo, [1234], now)
        .list_by_dealer("Acme")
        .await
        .expect("dealer has customers");
    let names: Vec<&str> = customers
        .iter()
        .map(|info| info.customer_name.as_str())
        .collect();
    assert_eq!(names, ["Ann", "Bob"]);
}

#[rstest]
#[tokio::test]
async fn listing_with_no_matches_is_not_found(now: DateTime<Utc>) {
    let mut repo = MockInteractionRepository::new();
    repo.expect_find_all_by_dealer()
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    let err = make_service(repo, [1234], now)
        .list_by_dealer("Nobody")
        .await
        .expect_err("no records");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "No records found under this dealer name");
}
