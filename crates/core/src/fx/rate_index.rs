use crate::fx::fx_errors::FxError;
use crate::fx::fx_model::{ExchangeRate, RejectedRate};
use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// In-memory index over the full FX history, answering lookback queries.
///
/// Rates are stored as an independent time series per direct pair. No inverse
/// rates are derived and no path through a third currency is ever searched:
/// a pair is either present in the history or unresolved.
#[derive(Debug, Default, Clone)]
pub struct RateIndex {
    /// Key: (From_Currency, To_Currency)
    /// Value: BTreeMap<Date, Rate>, giving O(log N) lookback per query.
    rates: HashMap<(String, String), BTreeMap<NaiveDate, Decimal>>,
    /// History entries refused at build time, in input order.
    rejected: Vec<RejectedRate>,
}

impl RateIndex {
    /// Builds the index from the full rate history.
    ///
    /// Entries with a non-positive rate or a malformed currency code are left out
    /// of the index and kept in [`RateIndex::rejected`] so the run can report them.
    /// When two entries share a pair and a date, the one appearing later in
    /// `history` wins.
    pub fn build(history: Vec<ExchangeRate>) -> Self {
        let mut index = RateIndex::default();
        for rate in history {
            match rate.clone().validated() {
                Ok(rate) => {
                    index
                        .rates
                        .entry(rate.pair())
                        .or_default()
                        .insert(rate.rate_date, rate.rate);
                }
                Err(e) => {
                    warn!("Ignoring FX history entry: {}", e);
                    index.rejected.push(RejectedRate {
                        entry: rate,
                        reason: e.to_string(),
                    });
                }
            }
        }
        index
    }

    /// Latest rate for `from -> to` dated on or before `date`.
    pub fn lookup(&self, from: &str, to: &str, date: NaiveDate) -> Option<Decimal> {
        self.rates
            .get(&(from.to_string(), to.to_string()))
            .and_then(|history| history.range(..=date).next_back())
            .map(|(_, rate)| *rate)
    }

    /// Like [`RateIndex::lookup`], with a typed error when nothing resolves.
    /// A same-currency pair with no stored entry converts at one.
    pub fn rate_on_or_before(
        &self,
        from: &str,
        to: &str,
        date: NaiveDate,
    ) -> Result<Decimal, FxError> {
        match self.lookup(from, to, date) {
            Some(rate) => Ok(rate),
            None if from == to => Ok(Decimal::ONE),
            None => Err(FxError::RateNotFound {
                from: from.to_string(),
                to: to.to_string(),
                date,
            }),
        }
    }

    /// Entries for one pair, most recent first.
    pub fn entries(&self, from: &str, to: &str) -> Vec<(NaiveDate, Decimal)> {
        self.rates
            .get(&(from.to_string(), to.to_string()))
            .map(|history| history.iter().rev().map(|(d, r)| (*d, *r)).collect())
            .unwrap_or_default()
    }

    pub fn pair_count(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// History entries left out of the index, with the reason each was refused.
    pub fn rejected(&self) -> &[RejectedRate] {
        &self.rejected
    }
}
