//! Account profile model

use crate::{
    common::AccountCreationRequest,
    db::{schema::account_profile, DbConnection},
};
use diesel::{
    prelude::Insertable, sqlite::Sqlite, OptionalExtension, QueryDsl, QueryResult, Queryable,
    Selectable, SelectableHelper,
};
use diesel_async::{scoped_futures::ScopedFutureExt, AsyncConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored account profile
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = account_profile)]
#[diesel(check_for_backend(Sqlite))]
pub struct AccountProfile {
    /// Internal Database Identifier
    pub id: i64,
    /// Subject identifier issued by the identity provider, unique
    #[serde(rename = "OAuthID")]
    pub oauth_id: String,
    /// Email address, unique
    pub email: String,
    /// Display name
    pub name: String,
}

/// An account profile that wasn't added to the database yet
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = account_profile)]
pub struct NewAccountProfile {
    /// Subject identifier issued by the identity provider
    pub oauth_id: String,
    /// Email address
    pub email: String,
    /// Display name
    pub name: String,
}

impl From<AccountCreationRequest> for NewAccountProfile {
    fn from(
        AccountCreationRequest {
            oauth_id,
            email,
            name,
        }: AccountCreationRequest,
    ) -> Self {
        Self {
            oauth_id,
            email,
            name,
        }
    }
}

impl NewAccountProfile {
    /// Insert the profile and commit.
    ///
    /// A failed insert (most likely a duplicate `OAuthID` or email) rolls the
    /// transaction back, leaving no partial row.
    pub async fn insert(self, conn: &mut DbConnection) -> QueryResult<AccountProfile> {
        tracing::debug!(oauth_id = %self.oauth_id, "Creating new account profile");

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(account_profile::table)
                    .values(&self)
                    .returning(AccountProfile::as_returning())
                    .get_result(conn)
                    .await
            }
            .scope_boxed()
        })
        .await
    }
}

impl AccountProfile {
    /// Look up a profile by primary key
    pub async fn find(conn: &mut DbConnection, id: i64) -> QueryResult<Option<Self>> {
        account_profile::table
            .find(id)
            .select(Self::as_select())
            .first(conn)
            .await
            .optional()
    }

    /// All profiles, in storage order
    pub async fn list(conn: &mut DbConnection) -> QueryResult<Vec<Self>> {
        account_profile::table
            .select(Self::as_select())
            .load(conn)
            .await
    }

    /// Delete a profile by primary key. Returns whether a row was removed.
    ///
    /// Meter rows referencing the account are left untouched.
    pub async fn delete(conn: &mut DbConnection, id: i64) -> QueryResult<bool> {
        let deleted = diesel::delete(account_profile::table.find(id))
            .execute(conn)
            .await?;

        Ok(deleted > 0)
    }
}
