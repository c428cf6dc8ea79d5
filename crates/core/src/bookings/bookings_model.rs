//! Booking domain models.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A stored booking, as read by the revenue engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_id: String,
    pub check_in_date: NaiveDateTime,
    pub check_out_date: NaiveDateTime,
    pub owner_company: String,
    pub owner_company_country: String,
    pub currency: String,
}

impl Booking {
    /// First day of the calendar month the booking checked out in.
    pub fn month(&self) -> NaiveDate {
        month_start(self.check_out_date.date())
    }
}

/// Truncates a date to the first day of its month.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// One booking as returned by the upstream bookings API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpstreamBooking {
    pub booking_id: String,
    pub check_in_date: NaiveDateTime,
    pub check_out_date: NaiveDateTime,
    pub owner_company: String,
    pub owner_company_country: String,
}

impl UpstreamBooking {
    pub fn into_booking(self, currency: String) -> Booking {
        Booking {
            booking_id: self.booking_id,
            check_in_date: self.check_in_date,
            check_out_date: self.check_out_date,
            owner_company: self.owner_company,
            owner_company_country: self.owner_company_country,
            currency,
        }
    }
}

/// A page of the upstream bookings API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingPage {
    pub results: Vec<UpstreamBooking>,
    pub total: u64,
}

/// Summary of an ingestion run.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IngestionSummary {
    pub pages_fetched: u32,
    pub bookings_received: usize,
    pub bookings_inserted: usize,
    pub bookings_skipped: usize,
}
