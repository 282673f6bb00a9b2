//! Vote model. Schema only, like [`Meter`](super::meter::Meter).

use crate::db::{schema::votes, DbConnection};
use chrono::NaiveDateTime;
use diesel::{
    prelude::Insertable, sqlite::Sqlite, QueryResult, Queryable, Selectable, SelectableHelper,
};
use diesel_async::RunQueryDsl;

/// A vote cast on a meter
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = votes)]
#[diesel(check_for_backend(Sqlite))]
pub struct Vote {
    /// Internal Database Identifier
    pub id: i64,
    /// The meter voted on
    pub meter_id: Option<i64>,
    /// Vote value
    pub vote: Option<i32>,
    /// When the vote was cast
    pub datetime: Option<NaiveDateTime>,
}

/// A vote that wasn't added to the database yet
#[derive(Debug, Clone, Default, Insertable)]
#[diesel(table_name = votes)]
pub struct NewVote {
    /// The meter voted on
    pub meter_id: Option<i64>,
    /// Vote value
    pub vote: Option<i32>,
    /// When the vote was cast
    pub datetime: Option<NaiveDateTime>,
}

impl NewVote {
    /// Insert this vote and return the stored row
    pub async fn insert(self, conn: &mut DbConnection) -> QueryResult<Vote> {
        diesel::insert_into(votes::table)
            .values(&self)
            .returning(Vote::as_returning())
            .get_result(conn)
            .await
    }
}
