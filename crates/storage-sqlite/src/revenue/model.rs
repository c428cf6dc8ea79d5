//! Database models for the monthly revenue ledger.

use chrono::NaiveDate;
use diesel::prelude::*;
use feeledger_core::revenue::MonthlyRevenue;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::StorageError;

/// Database model for one ledger row. Amounts are kept as decimal text.
#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::monthly_revenue)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MonthlyRevenueDB {
    pub month: NaiveDate,
    pub owner_company: String,
    pub original_currency: String,
    pub revenue: String,
    pub revenue_base: String,
    pub base_currency: String,
}

fn parse_amount(raw: &str, column: &str, db: &MonthlyRevenueDB) -> Result<Decimal, StorageError> {
    Decimal::from_str(raw).map_err(|e| {
        StorageError::Decode(format!(
            "{} '{}' for {} in {}: {}",
            column, raw, db.owner_company, db.month, e
        ))
    })
}

impl TryFrom<MonthlyRevenueDB> for MonthlyRevenue {
    type Error = StorageError;

    fn try_from(db: MonthlyRevenueDB) -> Result<Self, Self::Error> {
        let revenue = parse_amount(&db.revenue, "revenue", &db)?;
        let revenue_base = parse_amount(&db.revenue_base, "revenue_base", &db)?;
        Ok(MonthlyRevenue {
            month: db.month,
            owner_company: db.owner_company,
            original_currency: db.original_currency,
            revenue,
            revenue_base,
            base_currency: db.base_currency,
        })
    }
}

impl From<MonthlyRevenue> for MonthlyRevenueDB {
    fn from(domain: MonthlyRevenue) -> Self {
        Self {
            month: domain.month,
            owner_company: domain.owner_company,
            original_currency: domain.original_currency,
            revenue: domain.revenue.to_string(),
            revenue_base: domain.revenue_base.to_string(),
            base_currency: domain.base_currency,
        }
    }
}
