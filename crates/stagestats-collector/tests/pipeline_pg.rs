//! Database-backed pipeline tests.
//!
//! These use `#[sqlx::test]`, which provisions an isolated database per test
//! from the `DATABASE_URL` environment variable.

use chrono::NaiveDate;
use sqlx::PgPool;
use stagestats_collector::collector::Collector;
use stagestats_collector::model::{DateRange, Period, StageResult};
use stagestats_collector::publisher::PlatformPublisher;
use stagestats_collector::repository::{StatsRepository, StatsSource};
use stagestats_collector::CollectorError;
use std::collections::BTreeSet;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn create_stats_table(pool: &PgPool) {
    sqlx::query(
        "CREATE TABLE pp_data (
            event_time DATE NOT NULL,
            period VARCHAR(20) NOT NULL,
            channel VARCHAR(250) NOT NULL,
            event_count INTEGER NOT NULL
        )",
    )
    .execute(pool)
    .await
    .expect("failed to create pp_data");
}

async fn insert_row(pool: &PgPool, date: &str, period: &str, channel: &str, count: i32) {
    sqlx::query("INSERT INTO pp_data (event_time, period, channel, event_count) VALUES ($1, $2, $3, $4)")
        .bind(date.parse::<NaiveDate>().unwrap())
        .bind(period)
        .bind(channel)
        .bind(count)
        .execute(pool)
        .await
        .expect("failed to insert row");
}

async fn seed_day(pool: &PgPool, date: &str) {
    insert_row(pool, date, "day", "DIGITAL", 5).await;
    insert_row(pool, date, "day", "PAPER", 8).await;
    insert_row(pool, date, "week", "DIGITAL", 13).await;
    insert_row(pool, date, "week", "PAPER", 21).await;
}

fn range(start: &str, end: &str) -> DateRange {
    DateRange::new(start.parse().unwrap(), end.parse().unwrap())
}

async fn collect_against_stub(pool: PgPool, collected: DateRange) -> Vec<wiremock::Request> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let publisher = PlatformPublisher::new(reqwest::Client::new(), format!("{}/data", server.uri()));
    let collector = Collector::new(StatsRepository::new(pool), publisher);

    collector.collect(&collected).await.unwrap();

    server.received_requests().await.unwrap()
}

fn distinct_ids(requests: &[wiremock::Request]) -> BTreeSet<String> {
    requests
        .iter()
        .map(|request| {
            let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
            body["_id"].as_str().unwrap().to_string()
        })
        .collect()
}

#[sqlx::test]
async fn repository_maps_rows_faithfully(pool: PgPool) {
    create_stats_table(&pool).await;
    insert_row(&pool, "2014-01-22", "day", "DIGITAL", 5).await;

    let repository = StatsRepository::new(pool);
    let results = repository
        .find_stats_between(&range("2014-01-22", "2014-01-22"))
        .await
        .unwrap();

    let expected = StageResult::new("2014-01-22".parse().unwrap(), Period::Day, "DIGITAL", 5);
    assert_eq!(results, vec![expected]);
}

#[sqlx::test]
async fn range_bounds_are_inclusive(pool: PgPool) {
    create_stats_table(&pool).await;
    insert_row(&pool, "2014-01-21", "day", "DIGITAL", 1).await;
    insert_row(&pool, "2014-01-22", "day", "DIGITAL", 2).await;
    insert_row(&pool, "2014-01-23", "day", "DIGITAL", 3).await;
    insert_row(&pool, "2014-01-24", "day", "DIGITAL", 4).await;

    let repository = StatsRepository::new(pool);
    let results = repository
        .find_stats_between(&range("2014-01-22", "2014-01-23"))
        .await
        .unwrap();

    let dates: Vec<NaiveDate> = results.iter().map(|r| r.timestamp()).collect();
    assert_eq!(
        dates,
        vec![
            "2014-01-22".parse::<NaiveDate>().unwrap(),
            "2014-01-23".parse::<NaiveDate>().unwrap(),
        ]
    );
}

#[sqlx::test]
async fn unknown_period_value_is_a_data_access_failure(pool: PgPool) {
    create_stats_table(&pool).await;
    insert_row(&pool, "2014-01-22", "fortnight", "DIGITAL", 5).await;

    let repository = StatsRepository::new(pool);
    let err = repository
        .find_stats_between(&range("2014-01-22", "2014-01-22"))
        .await
        .unwrap_err();

    assert!(matches!(err, CollectorError::DataAccess(_)));
    assert!(err.to_string().contains("period"));
}

#[sqlx::test]
async fn negative_count_is_a_data_access_failure(pool: PgPool) {
    create_stats_table(&pool).await;
    insert_row(&pool, "2014-01-22", "day", "DIGITAL", -5).await;

    let repository = StatsRepository::new(pool);
    let err = repository
        .find_stats_between(&range("2014-01-22", "2014-01-22"))
        .await
        .unwrap_err();

    assert!(matches!(err, CollectorError::DataAccess(_)));
}

#[sqlx::test]
async fn single_day_fixture_publishes_four_distinct_records(pool: PgPool) {
    create_stats_table(&pool).await;
    seed_day(&pool, "2014-01-22").await;

    let requests = collect_against_stub(pool, range("2014-01-22", "2014-01-22")).await;

    assert_eq!(requests.len(), 4);
    assert_eq!(distinct_ids(&requests).len(), 4);
}

#[sqlx::test]
async fn two_day_fixture_publishes_eight_records(pool: PgPool) {
    create_stats_table(&pool).await;
    seed_day(&pool, "2014-01-22").await;
    seed_day(&pool, "2014-01-23").await;

    let requests = collect_against_stub(pool, range("2014-01-22", "2014-01-23")).await;

    assert_eq!(requests.len(), 8);
    assert_eq!(distinct_ids(&requests).len(), 8);
}

#[sqlx::test]
async fn rows_outside_the_range_are_never_published(pool: PgPool) {
    create_stats_table(&pool).await;
    seed_day(&pool, "2014-01-22").await;
    seed_day(&pool, "2014-02-01").await;

    let requests = collect_against_stub(pool, range("2014-01-22", "2014-01-23")).await;

    assert_eq!(requests.len(), 4);
    for request in &requests {
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(body["_timestamp"], "2014-01-22T00:00:00Z");
    }
}
