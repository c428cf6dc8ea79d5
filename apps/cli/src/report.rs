//! Plain-text rendering of the ledger and of run reports.

use std::fmt::Write;

use feeledger_core::constants::{DISPLAY_DECIMAL_PRECISION, MAX_REPORTED_EXAMPLES, MONTH_FORMAT};
use feeledger_core::revenue::{MonthlyRevenue, RevenueRunReport};
use rust_decimal::Decimal;

fn amount(value: Decimal) -> String {
    let precision = DISPLAY_DECIMAL_PRECISION as usize;
    format!("{:.*}", precision, value.round_dp(DISPLAY_DECIMAL_PRECISION))
}

/// Fixed-width ledger table, one row per record in the order given.
///
/// The base column is headed by the records' base currency. Records computed
/// under different bases get a plain header and carry their code in each cell.
/// `default_base` heads the column when there are no records.
pub fn render_revenue_table(records: &[MonthlyRevenue], default_base: &str) -> String {
    let mut bases = records.iter().map(|r| r.base_currency.as_str());
    let shared_base = match bases.next() {
        None => Some(default_base),
        Some(first) => bases.all(|b| b == first).then_some(first),
    };
    let base_header = match shared_base {
        Some(base) => format!("Revenue {}", base),
        None => "Revenue Base".to_string(),
    };
    let headers = ["Month", "Owner Company", "Currency", "Revenue", base_header.as_str()];

    let rows: Vec<[String; 5]> = records
        .iter()
        .map(|r| {
            [
                r.month.format(MONTH_FORMAT).to_string(),
                r.owner_company.clone(),
                r.original_currency.clone(),
                amount(r.revenue),
                match shared_base {
                    Some(_) => amount(r.revenue_base),
                    None => format!("{} {}", amount(r.revenue_base), r.base_currency),
                },
            ]
        })
        .collect();

    let mut widths: [usize; 5] = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<w0$} | {:<w1$} | {:<w2$} | {:>w3$} | {:>w4$}",
        headers[0],
        headers[1],
        headers[2],
        headers[3],
        headers[4],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3],
        w4 = widths[4],
    );
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in rows {
        let _ = writeln!(
            out,
            "{:<w0$} | {:<w1$} | {:<w2$} | {:>w3$} | {:>w4$}",
            row[0],
            row[1],
            row[2],
            row[3],
            row[4],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
            w4 = widths[4],
        );
    }
    out
}

/// Short human summary of a computation run.
pub fn render_run_report(report: &RevenueRunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Bookings read: {}, rate pairs: {}, buckets: {}",
        report.bookings_read, report.rate_pairs, report.buckets
    );
    if report.dry_run {
        let _ = writeln!(out, "Dry run: nothing written");
    } else {
        let _ = writeln!(out, "Ledger records written: {}", report.records_written);
    }

    if !report.skipped_missing_rate.is_empty() {
        let _ = writeln!(
            out,
            "Skipped, no {} rate: {}",
            report.base_currency,
            report.skipped_missing_rate.len()
        );
        for skipped in report.skipped_missing_rate.iter().take(MAX_REPORTED_EXAMPLES) {
            let _ = writeln!(
                out,
                "  {} {} {} {}",
                skipped.key.month.format(MONTH_FORMAT),
                skipped.key.owner_company,
                skipped.key.currency,
                amount(skipped.floored_total)
            );
        }
    }
    if !report.collapsed.is_empty() {
        let _ = writeln!(
            out,
            "Not written, owner billed in several currencies: {}",
            report.collapsed.len()
        );
        for collapsed in report.collapsed.iter().take(MAX_REPORTED_EXAMPLES) {
            let key = &collapsed.bucket.key;
            let _ = writeln!(
                out,
                "  {} {} {} (kept: {})",
                key.month.format(MONTH_FORMAT),
                key.owner_company,
                key.currency,
                collapsed.kept_currency.as_deref().unwrap_or("none")
            );
        }
    }
    for (currency, count) in &report.unknown_currencies {
        let _ = writeln!(
            out,
            "No fee configured for {}: {} bookings charged zero",
            currency, count
        );
    }
    if !report.currencies_without_floor.is_empty() {
        let currencies: Vec<&str> = report
            .currencies_without_floor
            .iter()
            .map(String::as_str)
            .collect();
        let _ = writeln!(out, "No minimum fee for: {}", currencies.join(", "));
    }
    if !report.invalid_rates.is_empty() {
        let _ = writeln!(
            out,
            "Ignored invalid FX history entries: {}",
            report.invalid_rates.len()
        );
        for rejected in report.invalid_rates.iter().take(MAX_REPORTED_EXAMPLES) {
            let _ = writeln!(
                out,
                "  {} {}->{} {} ({})",
                rejected.entry.rate_date,
                rejected.entry.from_currency,
                rejected.entry.to_currency,
                rejected.entry.rate,
                rejected.reason
            );
        }
    }
    if !report.overflowed.is_empty() {
        let _ = writeln!(
            out,
            "Not written, amount overflowed: {}",
            report.overflowed.len()
        );
        for key in report.overflowed.iter().take(MAX_REPORTED_EXAMPLES) {
            let _ = writeln!(
                out,
                "  {} {} {}",
                key.month.format(MONTH_FORMAT),
                key.owner_company,
                key.currency
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use feeledger_core::fx::{ExchangeRate, RejectedRate};
    use feeledger_core::revenue::{BucketKey, SkippedBucket};
    use rust_decimal_macros::dec;

    fn record(m: u32, owner: &str, currency: &str, revenue: Decimal, base: Decimal) -> MonthlyRevenue {
        MonthlyRevenue {
            month: NaiveDate::from_ymd_opt(2024, m, 1).unwrap(),
            owner_company: owner.to_string(),
            original_currency: currency.to_string(),
            revenue,
            revenue_base: base,
            base_currency: "GBP".to_string(),
        }
    }

    #[test]
    fn test_table_formats_months_and_amounts() {
        let table = render_revenue_table(
            &[
                record(4, "Acme", "USD", dec!(140), dec!(110.6)),
                record(5, "Globex Corporation", "GBP", dec!(100), dec!(100)),
            ],
            "GBP",
        );

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "Month   | Owner Company      | Currency | Revenue | Revenue GBP"
        );
        assert_eq!(
            lines[2],
            "2024-04 | Acme               | USD      |  140.00 |      110.60"
        );
        assert_eq!(
            lines[3],
            "2024-05 | Globex Corporation | GBP      |  100.00 |      100.00"
        );
    }

    #[test]
    fn test_amounts_round_to_two_places() {
        assert_eq!(amount(dec!(6.419400000001)), "6.42");
        assert_eq!(amount(dec!(102)), "102.00");
    }

    #[test]
    fn test_run_report_lists_skipped_buckets() {
        let report = RevenueRunReport {
            base_currency: "GBP".to_string(),
            bookings_read: 2,
            buckets: 2,
            records_written: 1,
            skipped_missing_rate: vec![SkippedBucket {
                key: BucketKey::new(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(), "Globex", "EUR"),
                floored_total: dec!(120),
            }],
            ..RevenueRunReport::default()
        };

        let text = render_run_report(&report);

        assert!(text.contains("Ledger records written: 1"));
        assert!(text.contains("Skipped, no GBP rate: 1"));
        assert!(text.contains("  2024-04 Globex EUR 120.00"));
    }

    #[test]
    fn test_header_follows_stored_base_not_policy() {
        let mut eur = record(4, "Acme", "USD", dec!(140), dec!(129.5));
        eur.base_currency = "EUR".to_string();

        let table = render_revenue_table(&[eur], "GBP");

        assert!(table.lines().next().unwrap().ends_with("| Revenue EUR"));
    }

    #[test]
    fn test_mixed_bases_are_labelled_per_row() {
        let mut eur = record(4, "Acme", "USD", dec!(140), dec!(129.5));
        eur.base_currency = "EUR".to_string();
        let gbp = record(5, "Acme", "USD", dec!(140), dec!(110.6));

        let table = render_revenue_table(&[eur, gbp], "GBP");

        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].ends_with("| Revenue Base"));
        assert!(lines[2].ends_with("|   129.50 EUR"));
        assert!(lines[3].ends_with("|   110.60 GBP"));
    }

    #[test]
    fn test_run_report_lists_invalid_rates_and_overflows() {
        let april = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let report = RevenueRunReport {
            base_currency: "GBP".to_string(),
            invalid_rates: vec![RejectedRate {
                entry: ExchangeRate::new("USD", "GBP", dec!(0), april),
                reason: "non-positive rate".to_string(),
            }],
            overflowed: vec![BucketKey::new(april, "Acme", "USD")],
            ..RevenueRunReport::default()
        };

        let text = render_run_report(&report);

        assert!(text.contains("Ignored invalid FX history entries: 1"));
        assert!(text.contains("  2024-04-01 USD->GBP 0 (non-positive rate)"));
        assert!(text.contains("Not written, amount overflowed: 1"));
        assert!(text.contains("  2024-04 Acme USD"));
    }
}
