//! End-to-end query tests over an in-process transport and the real memory cache.

mod common;

use std::sync::Arc;
use std::time::Duration;

use cbrf_rates::{NoCache, Rate, RatesError};
use chrono::NaiveDate;
use common::*;
use rust_decimal_macros::dec;

// =============================================================================
// Snapshot reads
// =============================================================================

#[tokio::test]
async fn test_all_returns_unit_values_in_feed_order() {
    let transport = Arc::new(standard_transport());
    let rates = client_with(transport.clone());

    let table = rates.query().with_date("2021-01-01").unwrap().all().await.unwrap();

    let codes: Vec<&str> = table.codes().collect();
    assert_eq!(codes, vec!["AUD", "USD", "EUR", "CNY", "JPY"]);
    assert_eq!(table.get("USD").unwrap().value(), dec!(75.50));
    assert_eq!(table.get("CNY").unwrap().value(), dec!(11.3079));
    assert_eq!(table.get("JPY").unwrap().value(), dec!(0.714092));
    assert_eq!(table.published_on(), NaiveDate::from_ymd_opt(2021, 1, 1));
    assert_eq!(transport.calls(), vec![daily_url("01/01/2021")]);
}

#[tokio::test]
async fn test_full_mode_returns_records() {
    let rates = client_with(Arc::new(standard_transport()));

    let usd = rates
        .query()
        .with_date("01.01.2021")
        .unwrap()
        .one("usd")
        .await
        .unwrap();

    assert_eq!(usd.code(), "USD");
    assert!(usd.dynamic().is_none());
    let record = usd.rate().record().expect("full record");
    assert_eq!(record.code, "USD");
    assert_eq!(record.name, "US Dollar");
    assert_eq!(record.numeric_code, "840");
    assert_eq!(record.nominal, 1);
    assert_eq!(record.id, "R01235");
}

#[tokio::test]
async fn test_short_mode_returns_values() {
    let rates = client_with(Arc::new(standard_transport()));

    let table = rates
        .query()
        .with_date("2021-01-01")
        .unwrap()
        .with_short_mode()
        .all()
        .await
        .unwrap();

    assert!(table.all().values().all(|rate| matches!(rate, Rate::Short(_))));
    assert_eq!(table.one("EUR").unwrap(), &Rate::Short(dec!(90.6824)));
}

#[tokio::test]
async fn test_without_date_requests_latest_table() {
    let transport = Arc::new(standard_transport());
    let rates = client_with(transport.clone());

    let usd = rates.query().with_short_mode().one("USD").await.unwrap();

    assert_eq!(usd.rate(), &Rate::Short(dec!(73.5264)));
    assert_eq!(transport.calls(), vec![DAILY_URL.to_string()]);
}

#[tokio::test]
async fn test_timestamp_date_builds_same_request() {
    let transport = Arc::new(standard_transport());
    let rates = client_with(transport.clone());

    // 2021-01-01T09:00:00Z
    rates
        .query()
        .with_date(1_609_491_600i64)
        .unwrap()
        .all()
        .await
        .unwrap();

    assert_eq!(transport.calls(), vec![daily_url("01/01/2021")]);
}

#[tokio::test]
async fn test_invalid_date_is_rejected_before_fetching() {
    let transport = Arc::new(standard_transport());
    let rates = client_with(transport.clone());

    let result = rates.query().with_date("yesterday-ish");

    assert!(matches!(result, Err(RatesError::InvalidQuery(_))));
    assert_eq!(transport.call_count(), 0);
}

// =============================================================================
// Filtering and the default currency
// =============================================================================

#[tokio::test]
async fn test_filter_is_intersection() {
    let rates = client_with(Arc::new(standard_transport()));

    let table = rates
        .query()
        .with_date("2021-01-01")
        .unwrap()
        .with_currencies(" eur, usd ,GBP,, ")
        .unwrap()
        .all()
        .await
        .unwrap();

    // Feed order is kept and the unknown GBP is silently absent
    let codes: Vec<&str> = table.codes().collect();
    assert_eq!(codes, vec!["USD", "EUR"]);
}

#[tokio::test]
async fn test_filter_accepts_lists() {
    let rates = client_with(Arc::new(standard_transport()));

    let table = rates
        .query()
        .with_date("2021-01-01")
        .unwrap()
        .with_currencies(vec!["jpy", "CNY,aud"])
        .unwrap()
        .all()
        .await
        .unwrap();

    assert_eq!(table.len(), 3);
    assert!(table.contains("AUD") && table.contains("CNY") && table.contains("JPY"));
}

#[tokio::test]
async fn test_invalid_currency_code_is_rejected() {
    let rates = client_with(Arc::new(standard_transport()));
    assert!(matches!(
        rates.query().with_currencies("USD,€UR"),
        Err(RatesError::InvalidQuery(_))
    ));
}

#[tokio::test]
async fn test_one_default_uses_configured_currency() {
    let rates = client_with(Arc::new(standard_transport()));

    let rate = rates
        .query()
        .with_date("2021-01-01")
        .unwrap()
        .with_short_mode()
        .one("default")
        .await
        .unwrap();

    assert_eq!(rate.code(), "USD");
    assert_eq!(rate.rate(), &Rate::Short(dec!(75.50)));
}

#[tokio::test]
async fn test_one_default_falls_back_to_first_filtered_entry() {
    // The default (USD) is filtered out, so the first remaining entry wins.
    let rates = client_with(Arc::new(standard_transport()));

    let rate = rates
        .query()
        .with_date("2021-01-01")
        .unwrap()
        .with_currencies("JPY,EUR")
        .unwrap()
        .with_short_mode()
        .one("default")
        .await
        .unwrap();

    assert_eq!(rate.code(), "EUR");
    assert_eq!(rate.rate(), &Rate::Short(dec!(90.6824)));
}

#[tokio::test]
async fn test_one_unknown_code_is_not_found() {
    let rates = client_with(Arc::new(standard_transport()));

    let result = rates
        .query()
        .with_date("2021-01-01")
        .unwrap()
        .one("GBP")
        .await;

    assert!(matches!(result, Err(RatesError::NotFound(code)) if code == "GBP"));
}

#[tokio::test]
async fn test_one_filtered_out_code_is_not_found() {
    let rates = client_with(Arc::new(standard_transport()));

    let result = rates
        .query()
        .with_date("2021-01-01")
        .unwrap()
        .with_currencies("EUR")
        .unwrap()
        .one("USD")
        .await;

    assert!(matches!(result, Err(RatesError::NotFound(_))));
}

// =============================================================================
// Caching
// =============================================================================

#[tokio::test]
async fn test_repeated_reads_fetch_once_within_ttl() {
    let transport = Arc::new(standard_transport());
    let rates = client_with(transport.clone());

    let query = rates.query().with_date("2021-01-01").unwrap();
    query.all().await.unwrap();
    query.all().await.unwrap();
    query.one("USD").await.unwrap();

    assert_eq!(transport.calls_to(&daily_url("01/01/2021")), 1);
}

#[tokio::test]
async fn test_filter_and_mode_share_cache_entry() {
    let transport = Arc::new(standard_transport());
    let rates = client_with(transport.clone());

    let base = rates.query().with_date("2021-01-01").unwrap();
    base.clone().all().await.unwrap();
    base.clone()
        .with_currencies("USD")
        .unwrap()
        .with_short_mode()
        .all()
        .await
        .unwrap();

    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_different_dates_fetch_separately() {
    let transport = Arc::new(standard_transport());
    let rates = client_with(transport.clone());

    rates.query().with_date("2021-01-01").unwrap().all().await.unwrap();
    rates.query().all().await.unwrap();

    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn test_expired_cache_refetches() {
    let transport = Arc::new(standard_transport());
    let rates = client_with(transport.clone()).enable_cache(Duration::from_millis(20));

    let query = rates.query().with_date("2021-01-01").unwrap();
    query.all().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    query.all().await.unwrap();

    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn test_disabled_cache_always_fetches() {
    let transport = Arc::new(standard_transport());
    let rates = client_with(transport.clone()).disable_cache();

    let query = rates.query().with_date("2021-01-01").unwrap();
    query.all().await.unwrap();
    query.all().await.unwrap();

    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn test_no_cache_store_always_fetches() {
    let transport = Arc::new(standard_transport());
    let rates = client_with_cache(transport.clone(), Arc::new(NoCache));

    rates.query().all().await.unwrap();
    rates.query().all().await.unwrap();

    assert_eq!(transport.call_count(), 2);
}

// =============================================================================
// Historical series
// =============================================================================

#[tokio::test]
async fn test_dynamic_attaches_series_per_matched_currency() {
    let transport = Arc::new(standard_transport());
    let rates = client_with(transport.clone());

    let table = rates
        .query()
        .with_date("2021-01-01")
        .unwrap()
        .with_currencies("EUR,USD")
        .unwrap()
        .with_dynamic_range("2021-01-12", "2021-01-14")
        .unwrap()
        .all()
        .await
        .unwrap();

    let usd = table.dynamic("usd").expect("USD series");
    assert_eq!(usd.len(), 3);
    assert_eq!(usd.latest().unwrap().value, dec!(73.5081));

    let eur = table.dynamic("EUR").expect("EUR series");
    assert_eq!(eur.len(), 2);

    // Series are attached in table order, not completion order
    let codes: Vec<&String> = table.dynamics().keys().collect();
    assert_eq!(codes, vec!["USD", "EUR"]);

    // One snapshot fetch plus one per matched currency
    assert_eq!(transport.call_count(), 3);
    assert_eq!(
        transport.calls_to(&dynamic_url("12/01/2021", "14/01/2021", "R01235")),
        1
    );
}

#[tokio::test]
async fn test_one_in_dynamic_mode_fetches_only_its_series() {
    // AUD has no series route; looking up USD must not touch it.
    let transport = Arc::new(standard_transport());
    let rates = client_with(transport.clone());

    let usd = rates
        .query()
        .with_date("2021-01-01")
        .unwrap()
        .with_dynamic_range("2021-01-12", "2021-01-14")
        .unwrap()
        .one("USD")
        .await
        .unwrap();

    assert_eq!(usd.value(), dec!(75.50));
    let series = usd.dynamic().expect("USD series");
    assert_eq!(series.len(), 3);
    assert_eq!(series.latest().unwrap().value, dec!(73.5081));

    assert_eq!(
        transport.calls(),
        vec![
            daily_url("01/01/2021"),
            dynamic_url("12/01/2021", "14/01/2021", "R01235"),
        ]
    );
}

#[tokio::test]
async fn test_one_default_in_dynamic_mode_uses_resolved_currency() {
    let transport = Arc::new(standard_transport());
    let rates = client_with(transport.clone());

    let entry = rates
        .query()
        .with_date("2021-01-01")
        .unwrap()
        .with_currencies("EUR,JPY")
        .unwrap()
        .with_short_mode()
        .with_dynamic_range("2021-01-12", "2021-01-14")
        .unwrap()
        .one("default")
        .await
        .unwrap();

    assert_eq!(entry.code(), "EUR");
    assert_eq!(entry.dynamic().map(|series| series.len()), Some(2));
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn test_dynamic_read_without_flag() {
    let rates = client_with(Arc::new(standard_transport()));

    let series = rates
        .query()
        .with_date("2021-01-01")
        .unwrap()
        .with_currencies("USD")
        .unwrap()
        .with_dynamic_range(
            NaiveDate::from_ymd_opt(2021, 1, 12).unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 14).unwrap(),
        )
        .unwrap()
        .dynamic()
        .await
        .unwrap();

    assert_eq!(series.len(), 1);
    let dates: Vec<String> = series["USD"]
        .iter()
        .map(|point| point.date.format("%d.%m.%Y").to_string())
        .collect();
    assert_eq!(dates, vec!["12.01.2021", "13.01.2021", "14.01.2021"]);
}

#[tokio::test]
async fn test_dynamic_default_range_ends_today() {
    let transport = Arc::new(standard_transport());
    let rates = client_with(transport.clone());

    // No route for today's range: the series fetch fails and the error propagates
    let result = rates
        .query()
        .with_date("2021-01-01")
        .unwrap()
        .with_currencies("USD")
        .unwrap()
        .with_dynamic()
        .all()
        .await;
    assert!(matches!(result, Err(RatesError::Transport { .. })));

    let today = chrono::Utc::now().date_naive();
    let from = today - chrono::Duration::days(6);
    let expected = dynamic_url(
        &from.format("%d/%m/%Y").to_string(),
        &today.format("%d/%m/%Y").to_string(),
        "R01235",
    );
    assert!(transport.calls().contains(&expected));
}

#[tokio::test]
async fn test_inverted_dynamic_range_is_invalid() {
    let rates = client_with(Arc::new(standard_transport()));
    assert!(matches!(
        rates
            .query()
            .with_dynamic_range("2021-01-14", "2021-01-12"),
        Err(RatesError::InvalidQuery(_))
    ));
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_transport_failure_propagates() {
    let transport = Arc::new(FakeTransport::new());
    let rates = client_with(transport.clone());

    let result = rates.query().all().await;

    assert!(matches!(result, Err(RatesError::Transport { .. })));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_malformed_feed() {
    let transport = Arc::new(
        FakeTransport::new().route(DAILY_URL, "<html><body>Maintenance</body></html>"),
    );
    let rates = client_with(transport);

    assert!(matches!(
        rates.query().all().await,
        Err(RatesError::MalformedFeed(_))
    ));
}

#[tokio::test]
async fn test_malformed_body_is_not_cached() {
    let transport = Arc::new(
        FakeTransport::new().route(DAILY_URL, "<html><body>Maintenance</body></html>"),
    );
    let rates = client_with(transport.clone());

    assert!(matches!(
        rates.query().all().await,
        Err(RatesError::MalformedFeed(_))
    ));

    transport.serve(DAILY_URL, DAILY_LATEST);
    let table = rates.query().all().await.unwrap();
    assert_eq!(table.len(), 2);

    rates.query().all().await.unwrap();
    assert_eq!(transport.calls_to(DAILY_URL), 2);
}

#[tokio::test]
async fn test_empty_feed() {
    let transport = Arc::new(FakeTransport::new().route(
        DAILY_URL,
        r#"<?xml version="1.0" encoding="windows-1251"?><ValCurs Date="01.01.2021" name="Foreign Currency Market"></ValCurs>"#,
    ));
    let rates = client_with(transport);

    assert!(matches!(
        rates.query().all().await,
        Err(RatesError::EmptyResult)
    ));
}
