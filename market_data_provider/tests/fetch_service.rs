mod common;

use std::sync::Arc;

use chrono::Duration;
use common::{bars_from_closes, day, harness, provider};
use market_data_provider::{
    FetchError, FetchOutcome,
    models::{
        request::RequestError,
        summary::{QuoteSummary, SummarySource},
    },
};

fn quote() -> QuoteSummary {
    QuoteSummary {
        market_cap: Some(2.5e12),
        fifty_two_week_low: Some(90.0),
        fifty_two_week_high: Some(210.0),
    }
}

#[tokio::test]
async fn second_fetch_within_ttl_is_served_from_cache() {
    let h = harness(
        provider(bars_from_closes(&[100.0, 101.0, 102.0]), Some(quote())),
        Duration::hours(1),
    );

    let first = h.service.fetch("aapl", day(1, 1), day(3, 1)).await.unwrap();
    h.clock.advance(Duration::minutes(59));
    let second = h.service.fetch("AAPL", day(1, 1), day(3, 1)).await.unwrap();

    assert_eq!(first, second);
    let (a, b) = (first.snapshot().unwrap(), second.snapshot().unwrap());
    assert!(Arc::ptr_eq(a, b));
    assert_eq!(h.calls.bars(), 1);
    assert_eq!(h.calls.summary(), 1);
}

#[tokio::test]
async fn fetch_after_ttl_calls_provider_again() {
    let h = harness(
        provider(bars_from_closes(&[100.0, 101.0]), Some(quote())),
        Duration::hours(1),
    );

    h.service.fetch("MSFT", day(1, 1), day(2, 1)).await.unwrap();
    h.clock.advance(Duration::hours(1));
    h.service.fetch("MSFT", day(1, 1), day(2, 1)).await.unwrap();

    assert_eq!(h.calls.bars(), 2);
}

#[tokio::test]
async fn clear_forces_new_provider_call() {
    let h = harness(
        provider(bars_from_closes(&[100.0, 101.0]), Some(quote())),
        Duration::hours(1),
    );

    h.service.fetch("TSLA", day(1, 1), day(2, 1)).await.unwrap();
    h.service.clear_cache();
    h.service.clear_cache();
    assert!(h.service.cache().is_empty());

    h.service.fetch("TSLA", day(1, 1), day(2, 1)).await.unwrap();
    assert_eq!(h.calls.bars(), 2);
}

#[tokio::test]
async fn different_range_is_a_different_entry() {
    let h = harness(
        provider(bars_from_closes(&[100.0, 101.0]), Some(quote())),
        Duration::hours(1),
    );

    h.service.fetch("AMZN", day(1, 1), day(2, 1)).await.unwrap();
    h.service.fetch("AMZN", day(1, 1), day(2, 2)).await.unwrap();
    assert_eq!(h.calls.bars(), 2);
    assert_eq!(h.service.cache().len(), 2);
}

#[tokio::test]
async fn empty_history_is_no_data_and_not_cached() {
    let h = harness(provider(Vec::new(), Some(quote())), Duration::hours(1));

    let outcome = h.service.fetch("ZZZZ", day(1, 1), day(2, 1)).await.unwrap();
    assert_eq!(outcome, FetchOutcome::NoData);
    assert!(h.service.cache().is_empty());
    // no summary lookup for a symbol without history
    assert_eq!(h.calls.summary(), 0);

    h.service.fetch("ZZZZ", day(1, 1), day(2, 1)).await.unwrap();
    assert_eq!(h.calls.bars(), 2);
}

#[tokio::test]
async fn summary_failure_falls_back_to_series_range() {
    let h = harness(
        provider(bars_from_closes(&[100.0, 150.0, 120.0]), None),
        Duration::hours(1),
    );

    let outcome = h.service.fetch("META", day(1, 1), day(2, 1)).await.unwrap();
    let snap = outcome.snapshot().unwrap();

    assert_eq!(snap.summary.fifty_two_week_low, 99.0);
    assert_eq!(snap.summary.fifty_two_week_high, 151.0);
    assert_eq!(snap.summary.market_cap, None);
    assert_eq!(snap.summary.market_cap_or_zero(), 0.0);
    assert_eq!(snap.summary.source, SummarySource::SeriesFallback);
    // the fallback result is still cached
    assert_eq!(h.service.cache().len(), 1);
}

#[tokio::test]
async fn provider_summary_is_used_when_available() {
    let h = harness(
        provider(bars_from_closes(&[100.0, 101.0]), Some(quote())),
        Duration::hours(1),
    );

    let outcome = h.service.fetch("GOOGL", day(1, 1), day(2, 1)).await.unwrap();
    let snap = outcome.snapshot().unwrap();
    assert_eq!(snap.symbol, "GOOGL");
    assert_eq!(snap.summary.market_cap, Some(2.5e12));
    assert_eq!(snap.summary.fifty_two_week_low, 90.0);
    assert_eq!(snap.summary.fifty_two_week_high, 210.0);
    assert_eq!(snap.summary.source, SummarySource::Provider);
}

#[tokio::test]
async fn primary_failure_is_fetch_error_and_not_retried() {
    let mut p = provider(bars_from_closes(&[100.0]), Some(quote()));
    p.fail_bars = true;
    let h = harness(p, Duration::hours(1));

    let err = h.service.fetch("AAPL", day(1, 1), day(2, 1)).await.unwrap_err();
    match &err {
        FetchError::PriceHistory { symbol, .. } => assert_eq!(symbol, "AAPL"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("503"));
    assert_eq!(h.calls.bars(), 1);
    assert!(h.service.cache().is_empty());
}

#[tokio::test]
async fn invalid_requests_never_reach_provider() {
    let h = harness(provider(bars_from_closes(&[100.0]), None), Duration::hours(1));

    let err = h.service.fetch("  ", day(1, 1), day(2, 1)).await.unwrap_err();
    assert!(matches!(
        err,
        FetchError::InvalidRequest {
            source: RequestError::EmptySymbol,
            ..
        }
    ));

    let err = h.service.fetch("AAPL", day(3, 1), day(2, 1)).await.unwrap_err();
    assert!(matches!(
        err,
        FetchError::InvalidRequest {
            source: RequestError::InvertedRange { .. },
            ..
        }
    ));

    // the harness clock sits in January 2025
    let future = h.service.today() + Duration::days(1);
    let err = h.service.fetch("AAPL", day(1, 1), future).await.unwrap_err();
    assert!(matches!(
        err,
        FetchError::InvalidRequest {
            source: RequestError::AfterToday { .. },
            ..
        }
    ));

    assert_eq!(h.calls.bars(), 0);
}

#[tokio::test]
async fn bars_are_sorted_and_deduplicated() {
    let mut bars = bars_from_closes(&[10.0, 11.0, 12.0]);
    bars.reverse();
    bars.push(bars[0].clone());
    let h = harness(provider(bars, Some(quote())), Duration::hours(1));

    let outcome = h.service.fetch("AAPL", day(1, 1), day(2, 1)).await.unwrap();
    let series = &outcome.snapshot().unwrap().series;
    assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
}
