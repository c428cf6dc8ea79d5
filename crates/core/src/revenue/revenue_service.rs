use crate::bookings::BookingRepositoryTrait;
use crate::constants::{MAX_REPORTED_EXAMPLES, MONTH_FORMAT};
use crate::errors::Result;
use crate::fx::FxServiceTrait;
use crate::revenue::fee_policy::FeePolicy;
use crate::revenue::revenue_converter::plan_monthly_revenue;
use crate::revenue::revenue_model::{MonthlyRevenue, RevenuePlan, RevenueRunReport};
use crate::revenue::revenue_traits::{MonthlyRevenueRepositoryTrait, RevenueServiceTrait};
use async_trait::async_trait;
use log::{debug, error, info, warn};
use std::sync::Arc;

/// Batch job turning the stored booking snapshot and FX history into the
/// monthly revenue ledger.
///
/// Runs are expected not to overlap; the caller schedules them.
pub struct RevenueService {
    booking_repository: Arc<dyn BookingRepositoryTrait>,
    fx_service: Arc<dyn FxServiceTrait>,
    revenue_repository: Arc<dyn MonthlyRevenueRepositoryTrait>,
    policy: FeePolicy,
}

impl RevenueService {
    pub fn new(
        booking_repository: Arc<dyn BookingRepositoryTrait>,
        fx_service: Arc<dyn FxServiceTrait>,
        revenue_repository: Arc<dyn MonthlyRevenueRepositoryTrait>,
        policy: FeePolicy,
    ) -> Self {
        RevenueService {
            booking_repository,
            fx_service,
            revenue_repository,
            policy,
        }
    }

    pub fn policy(&self) -> &FeePolicy {
        &self.policy
    }

    fn plan(&self) -> Result<(RevenuePlan, RevenueRunReport)> {
        let bookings = self.booking_repository.list_bookings().map_err(|e| {
            error!("Failed to read bookings: {}", e);
            e
        })?;
        let index = self.fx_service.build_rate_index().map_err(|e| {
            error!("Failed to read currency rates: {}", e);
            e
        })?;
        info!(
            "Total bookings fetched: {}, currency pairs with history: {}",
            bookings.len(),
            index.pair_count()
        );

        let plan = plan_monthly_revenue(&bookings, &index, &self.policy);
        debug!(
            "{} buckets aggregated into {} ledger records",
            plan.bucket_count,
            plan.records.len()
        );

        let report = RevenueRunReport {
            base_currency: self.policy.base_currency.clone(),
            bookings_read: bookings.len(),
            rate_pairs: index.pair_count(),
            buckets: plan.bucket_count,
            records_written: 0,
            dry_run: false,
            skipped_missing_rate: plan.skipped_missing_rate.clone(),
            collapsed: plan.collapsed.clone(),
            unknown_currencies: plan.unknown_currencies.clone(),
            currencies_without_floor: plan.currencies_without_floor.clone(),
            invalid_rates: plan.invalid_rates.clone(),
            overflowed: plan.overflowed.clone(),
        };
        Ok((plan, report))
    }
}

#[async_trait]
impl RevenueServiceTrait for RevenueService {
    async fn compute_monthly_revenue(&self) -> Result<RevenueRunReport> {
        let (plan, mut report) = self.plan()?;

        let written = self
            .revenue_repository
            .upsert_monthly_revenue(plan.records)
            .await
            .map_err(|e| {
                error!("Error storing monthly revenue, ledger left unchanged: {}", e);
                e
            })?;
        report.records_written = written;

        log_run_summary(&report);
        Ok(report)
    }

    fn preview_monthly_revenue(&self) -> Result<(Vec<MonthlyRevenue>, RevenueRunReport)> {
        let (plan, mut report) = self.plan()?;
        report.dry_run = true;
        log_run_summary(&report);
        Ok((plan.records, report))
    }

    fn get_monthly_revenue(&self) -> Result<Vec<MonthlyRevenue>> {
        self.revenue_repository.list_monthly_revenue()
    }
}

/// Logs run totals, then counts and a few examples for each anomaly kind.
fn log_run_summary(report: &RevenueRunReport) {
    if report.dry_run {
        info!(
            "Monthly revenue preview: {} bookings, {} buckets, nothing written",
            report.bookings_read, report.buckets
        );
    } else {
        info!(
            "Monthly revenue computed and stored: {} bookings, {} buckets, {} records written",
            report.bookings_read, report.buckets, report.records_written
        );
    }

    if !report.skipped_missing_rate.is_empty() {
        let examples: Vec<String> = report
            .skipped_missing_rate
            .iter()
            .take(MAX_REPORTED_EXAMPLES)
            .map(|s| {
                format!(
                    "{} {} {}",
                    s.key.month.format(MONTH_FORMAT),
                    s.key.owner_company,
                    s.key.currency
                )
            })
            .collect();
        warn!(
            "{} buckets skipped for lack of a {} rate, e.g. [{}]",
            report.skipped_missing_rate.len(),
            report.base_currency,
            examples.join("; ")
        );
    }

    if !report.collapsed.is_empty() {
        let examples: Vec<String> = report
            .collapsed
            .iter()
            .take(MAX_REPORTED_EXAMPLES)
            .map(|c| {
                format!(
                    "{} {} {} -> {}",
                    c.bucket.key.month.format(MONTH_FORMAT),
                    c.bucket.key.owner_company,
                    c.bucket.key.currency,
                    c.kept_currency.as_deref().unwrap_or("none")
                )
            })
            .collect();
        warn!(
            "{} buckets not written because their owner had several currencies in the month, e.g. [{}]",
            report.collapsed.len(),
            examples.join("; ")
        );
    }

    if !report.unknown_currencies.is_empty() {
        let counts: Vec<String> = report
            .unknown_currencies
            .iter()
            .map(|(currency, count)| format!("{} ({} bookings)", currency, count))
            .collect();
        warn!(
            "Currencies missing from the fee schedule were charged zero: {}",
            counts.join(", ")
        );
    }

    if !report.currencies_without_floor.is_empty() {
        let currencies: Vec<&str> = report
            .currencies_without_floor
            .iter()
            .map(String::as_str)
            .collect();
        warn!(
            "Currencies without a minimum fee: {}",
            currencies.join(", ")
        );
    }

    if !report.invalid_rates.is_empty() {
        let examples: Vec<String> = report
            .invalid_rates
            .iter()
            .take(MAX_REPORTED_EXAMPLES)
            .map(|r| {
                format!(
                    "{}->{} {} {}",
                    r.entry.from_currency, r.entry.to_currency, r.entry.rate_date, r.entry.rate
                )
            })
            .collect();
        warn!(
            "{} FX history entries ignored as invalid, e.g. [{}]",
            report.invalid_rates.len(),
            examples.join("; ")
        );
    }

    if !report.overflowed.is_empty() {
        let examples: Vec<String> = report
            .overflowed
            .iter()
            .take(MAX_REPORTED_EXAMPLES)
            .map(|k| {
                format!(
                    "{} {} {}",
                    k.month.format(MONTH_FORMAT),
                    k.owner_company,
                    k.currency
                )
            })
            .collect();
        warn!(
            "{} buckets dropped because their amount overflowed, e.g. [{}]",
            report.overflowed.len(),
            examples.join("; ")
        );
    }
}
