use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::upsert::excluded;
use diesel::SqliteConnection;
use std::sync::Arc;

use feeledger_core::revenue::{MonthlyRevenue, MonthlyRevenueRepositoryTrait};
use feeledger_core::Result;

use super::model::MonthlyRevenueDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::monthly_revenue;

pub struct MonthlyRevenueRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl MonthlyRevenueRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        MonthlyRevenueRepository { pool, writer }
    }
}

/// Upserts ledger rows on (month, owner_company), replacing currencies and amounts.
fn upsert_records(conn: &mut SqliteConnection, records: Vec<MonthlyRevenue>) -> Result<usize> {
    let mut affected_rows = 0;
    for record in records {
        let record_db: MonthlyRevenueDB = record.into();
        affected_rows += diesel::insert_into(monthly_revenue::table)
            .values(&record_db)
            .on_conflict((monthly_revenue::month, monthly_revenue::owner_company))
            .do_update()
            .set((
                monthly_revenue::original_currency.eq(excluded(monthly_revenue::original_currency)),
                monthly_revenue::revenue.eq(excluded(monthly_revenue::revenue)),
                monthly_revenue::revenue_base.eq(excluded(monthly_revenue::revenue_base)),
                monthly_revenue::base_currency.eq(excluded(monthly_revenue::base_currency)),
            ))
            .execute(conn)
            .map_err(StorageError::from)?;
    }
    Ok(affected_rows)
}

#[async_trait]
impl MonthlyRevenueRepositoryTrait for MonthlyRevenueRepository {
    fn list_monthly_revenue(&self) -> Result<Vec<MonthlyRevenue>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = monthly_revenue::table
            .select(MonthlyRevenueDB::as_select())
            .order((monthly_revenue::month.asc(), monthly_revenue::owner_company.asc()))
            .load::<MonthlyRevenueDB>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter()
            .map(|row| MonthlyRevenue::try_from(row).map_err(Into::into))
            .collect()
    }

    /// All records go through one writer job, so the whole run commits or rolls back.
    async fn upsert_monthly_revenue(&self, records: Vec<MonthlyRevenue>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                upsert_records(conn, records)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestDb;
    use chrono::NaiveDate;
    use feeledger_core::errors::{DatabaseError, Error};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn record(y: i32, m: u32, owner: &str, currency: &str, revenue: Decimal, base: Decimal) -> MonthlyRevenue {
        MonthlyRevenue {
            month: NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
            owner_company: owner.to_string(),
            original_currency: currency.to_string(),
            revenue,
            revenue_base: base,
            base_currency: "GBP".to_string(),
        }
    }

    #[tokio::test]
    async fn test_upsert_replaces_currency_and_amounts() {
        let db = TestDb::new();
        let repo = MonthlyRevenueRepository::new(db.pool.clone(), db.writer.clone());

        repo.upsert_monthly_revenue(vec![record(2024, 4, "Acme", "USD", dec!(140), dec!(110.60))])
            .await
            .unwrap();
        repo.upsert_monthly_revenue(vec![record(2024, 4, "Acme", "EUR", dec!(120), dec!(102.00))])
            .await
            .unwrap();

        assert_eq!(
            repo.list_monthly_revenue().unwrap(),
            vec![record(2024, 4, "Acme", "EUR", dec!(120), dec!(102))]
        );
    }

    #[tokio::test]
    async fn test_list_orders_by_month_then_owner() {
        let db = TestDb::new();
        let repo = MonthlyRevenueRepository::new(db.pool.clone(), db.writer.clone());

        repo.upsert_monthly_revenue(vec![
            record(2024, 5, "Acme", "GBP", dec!(100), dec!(100)),
            record(2024, 4, "Globex", "GBP", dec!(100), dec!(100)),
            record(2024, 4, "Acme", "GBP", dec!(100), dec!(100)),
        ])
        .await
        .unwrap();

        let keys: Vec<(u32, String)> = repo
            .list_monthly_revenue()
            .unwrap()
            .into_iter()
            .map(|r| (chrono::Datelike::month(&r.month), r.owner_company))
            .collect();
        assert_eq!(
            keys,
            vec![
                (4, "Acme".to_string()),
                (4, "Globex".to_string()),
                (5, "Acme".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_amounts_keep_full_precision() {
        let db = TestDb::new();
        let repo = MonthlyRevenueRepository::new(db.pool.clone(), db.writer.clone());

        repo.upsert_monthly_revenue(vec![record(
            2024,
            4,
            "Acme",
            "JPY",
            dec!(1234.5),
            dec!(6.419400000001),
        )])
        .await
        .unwrap();

        let stored = repo.list_monthly_revenue().unwrap();
        assert_eq!(stored[0].revenue_base, dec!(6.419400000001));
    }

    #[tokio::test]
    async fn test_failed_job_rolls_back_every_record() {
        let db = TestDb::new();
        let repo = MonthlyRevenueRepository::new(db.pool.clone(), db.writer.clone());
        repo.upsert_monthly_revenue(vec![record(2024, 4, "Acme", "GBP", dec!(100), dec!(100))])
            .await
            .unwrap();

        let result = db
            .writer
            .exec(|conn: &mut SqliteConnection| -> Result<usize> {
                upsert_records(
                    conn,
                    vec![
                        record(2024, 4, "Acme", "USD", dec!(140), dec!(110.60)),
                        record(2024, 4, "Globex", "GBP", dec!(100), dec!(100)),
                    ],
                )?;
                Err(Error::Unexpected("interrupted".to_string()))
            })
            .await;

        assert!(matches!(
            result,
            Err(Error::Database(DatabaseError::TransactionFailed(_)))
        ));
        assert_eq!(
            repo.list_monthly_revenue().unwrap(),
            vec![record(2024, 4, "Acme", "GBP", dec!(100), dec!(100))]
        );
    }

    #[tokio::test]
    async fn test_base_currency_is_stored_per_row() {
        let db = TestDb::new();
        let repo = MonthlyRevenueRepository::new(db.pool.clone(), db.writer.clone());

        let mut april = record(2024, 4, "Acme", "USD", dec!(140), dec!(110.60));
        repo.upsert_monthly_revenue(vec![april.clone()]).await.unwrap();

        // A later run under a EUR base overwrites the row and its base.
        april.base_currency = "EUR".to_string();
        april.revenue_base = dec!(129.50);
        repo.upsert_monthly_revenue(vec![
            april.clone(),
            record(2024, 5, "Acme", "GBP", dec!(100), dec!(100)),
        ])
        .await
        .unwrap();

        let stored = repo.list_monthly_revenue().unwrap();
        assert_eq!(stored, vec![april, record(2024, 5, "Acme", "GBP", dec!(100), dec!(100))]);
        assert_eq!(stored[0].base_currency, "EUR");
        assert_eq!(stored[1].base_currency, "GBP");
    }
}
