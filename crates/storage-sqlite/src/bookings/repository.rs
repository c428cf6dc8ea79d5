use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use feeledger_core::bookings::{Booking, BookingRepositoryTrait};
use feeledger_core::Result;

use super::model::BookingDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::bookings;

pub struct BookingRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl BookingRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        BookingRepository { pool, writer }
    }
}

#[async_trait]
impl BookingRepositoryTrait for BookingRepository {
    fn list_bookings(&self) -> Result<Vec<Booking>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = bookings::table
            .select(BookingDB::as_select())
            .order((bookings::check_out_date.asc(), bookings::booking_id.asc()))
            .load::<BookingDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }

    /// Inserts bookings whose id is not stored yet. Existing rows are left untouched.
    async fn insert_new_bookings(&self, new_bookings: Vec<Booking>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut inserted = 0;
                for booking in new_bookings {
                    let booking_db: BookingDB = booking.into();
                    inserted += diesel::insert_into(bookings::table)
                        .values(&booking_db)
                        .on_conflict(bookings::booking_id)
                        .do_nothing()
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(inserted)
            })
            .await
    }
}
