use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use diesel::upsert::excluded;
use log::error;
use std::sync::Arc;

use feeledger_core::fx::{ExchangeRate, FxRepositoryTrait};
use feeledger_core::Result;

use super::model::CurrencyRateDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::currency_rates;

#[derive(Clone)]
pub struct FxRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl FxRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl FxRepositoryTrait for FxRepository {
    /// Full rate history ordered by pair, then date.
    ///
    /// A row whose stored rate cannot be decoded fails the whole read.
    fn get_historical_exchange_rates(&self) -> Result<Vec<ExchangeRate>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = currency_rates::table
            .select(CurrencyRateDB::as_select())
            .order((
                currency_rates::from_currency.asc(),
                currency_rates::to_currency.asc(),
                currency_rates::rate_date.asc(),
            ))
            .load::<CurrencyRateDB>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter()
            .map(|row| {
                ExchangeRate::try_from(row).map_err(|e| {
                    error!("Failed to decode stored currency rate: {}", e);
                    feeledger_core::Error::from(e)
                })
            })
            .collect()
    }

    async fn upsert_exchange_rates(&self, rates: Vec<ExchangeRate>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut affected_rows = 0;
                for rate in rates {
                    let rate_db: CurrencyRateDB = rate.into();
                    affected_rows += diesel::insert_into(currency_rates::table)
                        .values(&rate_db)
                        .on_conflict((
                            currency_rates::from_currency,
                            currency_rates::to_currency,
                            currency_rates::rate_date,
                        ))
                        .do_update()
                        .set(currency_rates::rate.eq(excluded(currency_rates::rate)))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(affected_rows)
            })
            .await
    }
}
