//! Unit tests for the revenue service.

use super::*;
use crate::bookings::{Booking, BookingRepositoryTrait};
use crate::errors::{DatabaseError, Error, Result};
use crate::fx::{ExchangeRate, FxRepositoryTrait, FxService};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Mock Implementations
// ============================================================================

#[derive(Default)]
struct MockBookingRepository {
    bookings: Mutex<Vec<Booking>>,
    fail_reads: AtomicBool,
}

impl MockBookingRepository {
    fn with(bookings: Vec<Booking>) -> Self {
        Self {
            bookings: Mutex::new(bookings),
            fail_reads: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl BookingRepositoryTrait for MockBookingRepository {
    fn list_bookings(&self) -> Result<Vec<Booking>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Database(DatabaseError::QueryFailed(
                "disk I/O error".to_string(),
            )));
        }
        Ok(self.bookings.lock().unwrap().clone())
    }

    async fn insert_new_bookings(&self, bookings: Vec<Booking>) -> Result<usize> {
        let count = bookings.len();
        self.bookings.lock().unwrap().extend(bookings);
        Ok(count)
    }
}

#[derive(Default)]
struct MockFxRepository {
    rates: Mutex<Vec<ExchangeRate>>,
}

#[async_trait]
impl FxRepositoryTrait for MockFxRepository {
    fn get_historical_exchange_rates(&self) -> Result<Vec<ExchangeRate>> {
        Ok(self.rates.lock().unwrap().clone())
    }

    async fn upsert_exchange_rates(&self, rates: Vec<ExchangeRate>) -> Result<usize> {
        let count = rates.len();
        self.rates.lock().unwrap().extend(rates);
        Ok(count)
    }
}

/// In-memory ledger keyed like the real table. A failing write leaves it untouched.
#[derive(Default)]
struct MockRevenueRepository {
    ledger: Mutex<BTreeMap<(NaiveDate, String), MonthlyRevenue>>,
    fail_writes: AtomicBool,
}

#[async_trait]
impl MonthlyRevenueRepositoryTrait for MockRevenueRepository {
    fn list_monthly_revenue(&self) -> Result<Vec<MonthlyRevenue>> {
        Ok(self.ledger.lock().unwrap().values().cloned().collect())
    }

    async fn upsert_monthly_revenue(&self, records: Vec<MonthlyRevenue>) -> Result<usize> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Database(DatabaseError::TransactionFailed(
                "database is locked".to_string(),
            )));
        }
        let mut ledger = self.ledger.lock().unwrap();
        let count = records.len();
        for record in records {
            ledger.insert((record.month, record.owner_company.clone()), record);
        }
        Ok(count)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn booking(id: &str, check_out: NaiveDate, owner: &str, currency: &str) -> Booking {
    let ts = check_out.and_hms_opt(10, 0, 0).unwrap();
    Booking {
        booking_id: id.to_string(),
        check_in_date: ts,
        check_out_date: ts,
        owner_company: owner.to_string(),
        owner_company_country: String::new(),
        currency: currency.to_string(),
    }
}

fn gbp_rate(from: &str, rate: Decimal, on: NaiveDate) -> ExchangeRate {
    ExchangeRate::new(from, "GBP", rate, on)
}

struct Fixture {
    bookings: Arc<MockBookingRepository>,
    rates: Arc<MockFxRepository>,
    ledger: Arc<MockRevenueRepository>,
    service: RevenueService,
}

fn fixture(bookings: Vec<Booking>, rates: Vec<ExchangeRate>, policy: FeePolicy) -> Fixture {
    let booking_repo = Arc::new(MockBookingRepository::with(bookings));
    let fx_repo = Arc::new(MockFxRepository {
        rates: Mutex::new(rates),
    });
    let ledger = Arc::new(MockRevenueRepository::default());
    let service = RevenueService::new(
        booking_repo.clone(),
        Arc::new(FxService::new(fx_repo.clone())),
        ledger.clone(),
        policy,
    );
    Fixture {
        bookings: booking_repo,
        rates: fx_repo,
        ledger,
        service,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_single_usd_booking_is_floored_and_converted() {
    let f = fixture(
        vec![booking("b1", date(2024, 4, 18), "Acme", "USD")],
        vec![gbp_rate("USD", dec!(0.79), date(2024, 4, 1))],
        FeePolicy::default(),
    );

    let report = f.service.compute_monthly_revenue().await.unwrap();

    assert_eq!(report.records_written, 1);
    assert!(!report.has_anomalies());
    assert_eq!(
        f.service.get_monthly_revenue().unwrap(),
        vec![MonthlyRevenue {
            month: date(2024, 4, 1),
            owner_company: "Acme".to_string(),
            original_currency: "USD".to_string(),
            revenue: dec!(140),
            revenue_base: dec!(110.60),
            base_currency: "GBP".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_bucket_without_rate_is_skipped_not_fatal() {
    let f = fixture(
        vec![
            booking("b1", date(2024, 4, 18), "Acme", "USD"),
            booking("b2", date(2024, 4, 20), "Globex", "EUR"),
        ],
        vec![
            gbp_rate("USD", dec!(0.79), date(2024, 4, 1)),
            // Dated after the bucket month, so never used for April.
            gbp_rate("EUR", dec!(0.85), date(2024, 4, 2)),
        ],
        FeePolicy::default(),
    );

    let report = f.service.compute_monthly_revenue().await.unwrap();

    assert_eq!(report.records_written, 1);
    assert_eq!(report.skipped_missing_rate.len(), 1);
    assert_eq!(report.skipped_missing_rate[0].key.owner_company, "Globex");
    assert_eq!(report.skipped_missing_rate[0].floored_total, dec!(120));
    let ledger = f.ledger.list_monthly_revenue().unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].owner_company, "Acme");
}

#[tokio::test]
async fn test_rerun_on_unchanged_input_is_idempotent() {
    let f = fixture(
        vec![
            booking("b1", date(2024, 4, 18), "Acme", "USD"),
            booking("b2", date(2024, 4, 19), "Acme", "USD"),
            booking("b3", date(2024, 5, 2), "Globex", "GBP"),
        ],
        vec![gbp_rate("USD", dec!(0.79), date(2024, 4, 1))],
        FeePolicy::default(),
    );

    f.service.compute_monthly_revenue().await.unwrap();
    let first = f.ledger.list_monthly_revenue().unwrap();
    f.service.compute_monthly_revenue().await.unwrap();
    let second = f.ledger.list_monthly_revenue().unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[tokio::test]
async fn test_later_run_fully_overwrites_record() {
    let f = fixture(
        vec![booking("b1", date(2024, 4, 18), "Acme", "USD")],
        vec![
            gbp_rate("USD", dec!(0.79), date(2024, 4, 1)),
            gbp_rate("EUR", dec!(0.85), date(2024, 3, 1)),
        ],
        FeePolicy::default(),
    );
    f.service.compute_monthly_revenue().await.unwrap();

    // Upstream correction: the owner is now billed in EUR.
    *f.bookings.bookings.lock().unwrap() =
        vec![booking("b1", date(2024, 4, 18), "Acme", "EUR")];
    f.service.compute_monthly_revenue().await.unwrap();

    let ledger = f.ledger.list_monthly_revenue().unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].original_currency, "EUR");
    assert_eq!(ledger[0].revenue, dec!(120));
    assert_eq!(ledger[0].revenue_base, dec!(102.00));
}

#[tokio::test]
async fn test_new_rates_resolve_previously_skipped_bucket() {
    let f = fixture(
        vec![booking("b1", date(2024, 4, 18), "Acme", "USD")],
        Vec::new(),
        FeePolicy::default(),
    );
    let report = f.service.compute_monthly_revenue().await.unwrap();
    assert_eq!(report.records_written, 0);
    assert_eq!(report.skipped_missing_rate.len(), 1);

    f.rates
        .upsert_exchange_rates(vec![gbp_rate("USD", dec!(0.80), date(2023, 12, 29))])
        .await
        .unwrap();
    let report = f.service.compute_monthly_revenue().await.unwrap();

    assert_eq!(report.records_written, 1);
    assert_eq!(f.ledger.list_monthly_revenue().unwrap()[0].revenue_base, dec!(112));
}

#[tokio::test]
async fn test_booking_read_failure_aborts_before_write() {
    let f = fixture(
        vec![booking("b1", date(2024, 4, 18), "Acme", "GBP")],
        Vec::new(),
        FeePolicy::default(),
    );
    f.bookings.fail_reads.store(true, Ordering::SeqCst);

    let result = f.service.compute_monthly_revenue().await;

    assert!(matches!(result, Err(Error::Database(_))));
    assert!(f.ledger.list_monthly_revenue().unwrap().is_empty());
}

#[tokio::test]
async fn test_write_failure_is_surfaced_and_ledger_unchanged() {
    let f = fixture(
        vec![booking("b1", date(2024, 4, 18), "Acme", "GBP")],
        Vec::new(),
        FeePolicy::default(),
    );
    f.service.compute_monthly_revenue().await.unwrap();
    let before = f.ledger.list_monthly_revenue().unwrap();

    f.bookings
        .insert_new_bookings(vec![booking("b2", date(2024, 5, 1), "Globex", "GBP")])
        .await
        .unwrap();
    f.ledger.fail_writes.store(true, Ordering::SeqCst);
    let result = f.service.compute_monthly_revenue().await;

    assert!(matches!(
        result,
        Err(Error::Database(DatabaseError::TransactionFailed(_)))
    ));
    assert_eq!(f.ledger.list_monthly_revenue().unwrap(), before);
}

#[tokio::test]
async fn test_unknown_currency_is_reported_and_charged_zero() {
    let f = fixture(
        vec![booking("b1", date(2024, 4, 18), "Acme", "JPY")],
        vec![gbp_rate("JPY", dec!(0.0052), date(2024, 1, 1))],
        FeePolicy::default(),
    );

    let report = f.service.compute_monthly_revenue().await.unwrap();

    assert_eq!(report.unknown_currencies.get("JPY"), Some(&1));
    assert!(report.currencies_without_floor.contains("JPY"));
    let ledger = f.ledger.list_monthly_revenue().unwrap();
    assert_eq!(ledger[0].revenue, Decimal::ZERO);
    assert_eq!(ledger[0].revenue_base, Decimal::ZERO);
}

#[tokio::test]
async fn test_mixed_currency_owner_follows_dominant_policy() {
    let f = fixture(
        vec![
            booking("b1", date(2024, 4, 2), "Acme", "GBP"),
            booking("b2", date(2024, 4, 3), "Acme", "USD"),
        ],
        vec![gbp_rate("USD", dec!(0.79), date(2024, 4, 1))],
        FeePolicy::default(),
    );

    let report = f.service.compute_monthly_revenue().await.unwrap();

    // USD 140 * 0.79 = 110.60 beats GBP 100.
    let ledger = f.ledger.list_monthly_revenue().unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].original_currency, "USD");
    assert_eq!(report.collapsed.len(), 1);
    assert_eq!(report.collapsed[0].bucket.key.currency, "GBP");
}

#[tokio::test]
async fn test_mixed_currency_owner_rejected_by_policy() {
    let policy = FeePolicy {
        multi_currency_policy: MultiCurrencyPolicy::Reject,
        ..FeePolicy::default()
    };
    let f = fixture(
        vec![
            booking("b1", date(2024, 4, 2), "Acme", "GBP"),
            booking("b2", date(2024, 4, 3), "Acme", "USD"),
            booking("b3", date(2024, 4, 3), "Globex", "GBP"),
        ],
        vec![gbp_rate("USD", dec!(0.79), date(2024, 4, 1))],
        policy,
    );

    let report = f.service.compute_monthly_revenue().await.unwrap();

    assert_eq!(report.records_written, 1);
    assert_eq!(report.collapsed.len(), 2);
    assert_eq!(
        f.ledger.list_monthly_revenue().unwrap()[0].owner_company,
        "Globex"
    );
}

#[test]
fn test_preview_does_not_write() {
    let f = fixture(
        vec![booking("b1", date(2024, 4, 18), "Acme", "GBP")],
        Vec::new(),
        FeePolicy::default(),
    );

    let (records, report) = f.service.preview_monthly_revenue().unwrap();

    assert!(report.dry_run);
    assert_eq!(report.records_written, 0);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].revenue_base, dec!(100));
    assert!(f.ledger.list_monthly_revenue().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_rate_history_is_reported_as_anomaly() {
    let f = fixture(
        vec![booking("b1", date(2024, 4, 18), "Acme", "USD")],
        vec![
            gbp_rate("USD", dec!(0.80), date(2024, 1, 1)),
            gbp_rate("USD", dec!(0), date(2024, 4, 1)),
        ],
        FeePolicy::default(),
    );

    let report = f.service.compute_monthly_revenue().await.unwrap();

    // The zero rate is refused, so April falls back to the January rate.
    assert_eq!(report.records_written, 1);
    assert_eq!(f.ledger.list_monthly_revenue().unwrap()[0].revenue_base, dec!(112.00));
    assert_eq!(report.invalid_rates.len(), 1);
    assert_eq!(report.invalid_rates[0].entry.rate, dec!(0));
    assert_eq!(report.invalid_rates[0].entry.rate_date, date(2024, 4, 1));
    assert!(report.has_anomalies());
}

#[tokio::test]
async fn test_overflowing_bucket_is_reported_and_not_written() {
    let mut policy = FeePolicy::default();
    policy.fees.insert("USD".to_string(), Decimal::MAX);
    let f = fixture(
        vec![
            booking("b1", date(2024, 4, 18), "Acme", "USD"),
            booking("b2", date(2024, 4, 19), "Acme", "USD"),
            booking("b3", date(2024, 4, 20), "Globex", "GBP"),
        ],
        vec![gbp_rate("USD", dec!(0.79), date(2024, 4, 1))],
        policy,
    );

    let report = f.service.compute_monthly_revenue().await.unwrap();

    assert_eq!(report.records_written, 1);
    assert_eq!(report.overflowed.len(), 1);
    assert_eq!(report.overflowed[0].owner_company, "Acme");
    assert!(report.has_anomalies());
    let ledger = f.ledger.list_monthly_revenue().unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].owner_company, "Globex");
}
