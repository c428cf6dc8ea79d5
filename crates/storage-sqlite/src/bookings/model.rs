//! Database models for bookings.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use feeledger_core::bookings::Booking;

/// Database model for bookings
#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::bookings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BookingDB {
    pub booking_id: String,
    pub check_in_date: NaiveDateTime,
    pub check_out_date: NaiveDateTime,
    pub owner_company: String,
    pub owner_company_country: String,
    pub currency: String,
}

impl From<BookingDB> for Booking {
    fn from(db: BookingDB) -> Self {
        Self {
            booking_id: db.booking_id,
            check_in_date: db.check_in_date,
            check_out_date: db.check_out_date,
            owner_company: db.owner_company,
            owner_company_country: db.owner_company_country,
            currency: db.currency,
        }
    }
}

impl From<Booking> for BookingDB {
    fn from(domain: Booking) -> Self {
        Self {
            booking_id: domain.booking_id,
            check_in_date: domain.check_in_date,
            check_out_date: domain.check_out_date,
            owner_company: domain.owner_company,
            owner_company_country: domain.owner_company_country,
            currency: domain.currency,
        }
    }
}
