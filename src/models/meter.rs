//! Meter model.
//!
//! Meters belong to an account through its `OAuthID`. They are part of the
//! schema only; no route reads or writes them yet.

use crate::db::{schema::meters, DbConnection};
use chrono::NaiveDateTime;
use diesel::{
    prelude::Insertable, sqlite::Sqlite, QueryResult, Queryable, Selectable, SelectableHelper,
};
use diesel_async::RunQueryDsl;

/// A stored meter
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = meters)]
#[diesel(check_for_backend(Sqlite))]
pub struct Meter {
    /// Internal Database Identifier
    pub id: i64,
    /// `OAuthID` of the owning account
    pub oauth_id: Option<String>,
    /// Name of the meter
    pub metername: Option<String>,
    /// Address the meter is reachable at
    pub url: Option<String>,
    /// Globally unique identifier of the meter
    pub guid: Option<String>,
    /// Creation or update time
    pub datetime: Option<NaiveDateTime>,
}

/// A meter that wasn't added to the database yet
#[derive(Debug, Clone, Default, Insertable)]
#[diesel(table_name = meters)]
pub struct NewMeter {
    /// `OAuthID` of the owning account
    pub oauth_id: Option<String>,
    /// Name of the meter
    pub metername: Option<String>,
    /// Address the meter is reachable at
    pub url: Option<String>,
    /// Globally unique identifier of the meter
    pub guid: Option<String>,
    /// Creation or update time
    pub datetime: Option<NaiveDateTime>,
}

impl NewMeter {
    /// Insert this meter and return the stored row
    pub async fn insert(self, conn: &mut DbConnection) -> QueryResult<Meter> {
        diesel::insert_into(meters::table)
            .values(&self)
            .returning(Meter::as_returning())
            .get_result(conn)
            .await
    }
}
