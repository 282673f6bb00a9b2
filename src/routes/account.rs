//! Account Routes

use crate::{
    app_state::AppState,
    common::{AccountCreated, AccountCreationRequest, DetailResponse},
    db,
    error::{AppError, AppResult},
    extract::{json::ValidatedJson, path::PathParam},
    models::account::{AccountProfile, NewAccountProfile},
};
use axum::{self, extract::State, http::StatusCode, Json};

/// POST handler for creating a new account
#[utoipa::path(
    post,
    path = "/accounts/",
    request_body = AccountCreationRequest,
    responses(
        (status = 200, description = "Successfully created account", body = AccountCreated),
        (status = 400, description = "Account creation failed", body = AppError),
        (status = 415, description = "Body is not JSON", body = AppError),
        (status = 422, description = "Invalid request body", body = AppError),
    )
)]
pub async fn create_account(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AccountCreationRequest>,
) -> AppResult<(StatusCode, Json<AccountCreated>)> {
    let conn = &mut db::connect(&state.db_pool).await?;

    // Every commit failure looks the same to the caller; the cause only
    // goes to the log.
    let account = NewAccountProfile::from(request)
        .insert(conn)
        .await
        .map_err(|err| {
            tracing::error!(%err, "Account creation error");
            AppError::new(StatusCode::BAD_REQUEST, Some("Account creation failed"))
        })?;

    tracing::info!(id = account.id, "Created account");

    Ok((
        StatusCode::OK,
        Json(AccountCreated {
            id: account.id,
            email: account.email,
        }),
    ))
}

/// GET handler listing every account
#[utoipa::path(
    get,
    path = "/accounts/",
    responses(
        (status = 200, description = "All accounts", body = [AccountProfile]),
    )
)]
pub async fn list_accounts(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<Vec<AccountProfile>>)> {
    let conn = &mut db::connect(&state.db_pool).await?;

    let accounts = AccountProfile::list(conn).await?;

    Ok((StatusCode::OK, Json(accounts)))
}

/// GET handler to retrieve account details
#[utoipa::path(
    get,
    path = "/accounts/{account_id}",
    params(
        ("account_id" = i64, Path, description = "Account identifier"),
    ),
    responses(
        (status = 200, description = "Found account", body = AccountProfile),
        (status = 404, description = "Not found", body = AppError),
        (status = 422, description = "Account id is not an integer", body = AppError),
    )
)]
pub async fn get_account(
    State(state): State<AppState>,
    PathParam(account_id): PathParam<i64>,
) -> AppResult<(StatusCode, Json<AccountProfile>)> {
    let conn = &mut db::connect(&state.db_pool).await?;

    let account = AccountProfile::find(conn, account_id)
        .await?
        .ok_or_else(|| AppError::not_found("Account not found"))?;

    Ok((StatusCode::OK, Json(account)))
}

/// DELETE handler removing an account
#[utoipa::path(
    delete,
    path = "/accounts/{account_id}",
    params(
        ("account_id" = i64, Path, description = "Account identifier"),
    ),
    responses(
        (status = 200, description = "Deleted account", body = DetailResponse),
        (status = 404, description = "Not found", body = AppError),
        (status = 422, description = "Account id is not an integer", body = AppError),
    )
)]
pub async fn delete_account(
    State(state): State<AppState>,
    PathParam(account_id): PathParam<i64>,
) -> AppResult<(StatusCode, Json<DetailResponse>)> {
    let conn = &mut db::connect(&state.db_pool).await?;

    if !AccountProfile::delete(conn, account_id).await? {
        return Err(AppError::not_found("Account not found"));
    }

    tracing::info!(id = account_id, "Deleted account");

    Ok((
        StatusCode::OK,
        Json(DetailResponse {
            detail: "Account deleted".to_string(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::schema::meters,
        error::ErrorResponse,
        models::meter::{Meter, NewMeter},
        test_utils::{RouteBuilder, TestContext},
    };
    use anyhow::Result;
    use diesel::{QueryDsl, SelectableHelper};
    use diesel_async::RunQueryDsl;
    use assert_matches::assert_matches;
    use http::Method;
    use serde::de::DeserializeOwned;
    use serde_json::{json, Value};
    use testresult::TestResult;

    async fn create_account<T: DeserializeOwned>(
        oauth_id: &str,
        email: &str,
        name: &str,
        ctx: &TestContext,
    ) -> Result<(StatusCode, T)> {
        RouteBuilder::new(ctx.app(), Method::POST, "/accounts/")
            .with_json_body(json!({
                "OAuthID": oauth_id,
                "email": email,
                "name": name,
            }))?
            .into_json_response::<T>()
            .await
    }

    async fn get_account<T: DeserializeOwned>(
        id: i64,
        ctx: &TestContext,
    ) -> Result<(StatusCode, T)> {
        RouteBuilder::new(ctx.app(), Method::GET, format!("/accounts/{id}"))
            .into_json_response::<T>()
            .await
    }

    async fn list_accounts(ctx: &TestContext) -> Result<(StatusCode, Vec<AccountProfile>)> {
        RouteBuilder::new(ctx.app(), Method::GET, "/accounts/")
            .into_json_response()
            .await
    }

    async fn delete_account<T: DeserializeOwned>(
        id: i64,
        ctx: &TestContext,
    ) -> Result<(StatusCode, T)> {
        RouteBuilder::new(ctx.app(), Method::DELETE, format!("/accounts/{id}"))
            .into_json_response::<T>()
            .await
    }

    fn single_error(body: ErrorResponse) -> AppError {
        let mut errors = body.errors;
        assert_eq!(errors.len(), 1);
        errors.remove(0)
    }

    #[test_log::test(tokio::test)]
    async fn test_account_lifecycle() -> TestResult {
        let ctx = TestContext::new().await?;

        let (status, body) =
            create_account::<Value>("abc123", "test@example.com", "Test User", &ctx).await?;

        assert_eq!(status, StatusCode::OK);
        assert_json_diff::assert_json_eq!(body, json!({ "id": 1, "email": "test@example.com" }));

        let (status, body) = get_account::<Value>(1, &ctx).await?;

        assert_eq!(status, StatusCode::OK);
        assert_json_diff::assert_json_eq!(
            body,
            json!({
                "id": 1,
                "OAuthID": "abc123",
                "email": "test@example.com",
                "name": "Test User",
            })
        );

        let (status, body) = delete_account::<Value>(1, &ctx).await?;

        assert_eq!(status, StatusCode::OK);
        assert_json_diff::assert_json_eq!(body, json!({ "detail": "Account deleted" }));

        let (status, body) = delete_account::<ErrorResponse>(1, &ctx).await?;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            single_error(body).detail.as_deref(),
            Some("Account not found")
        );

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_create_then_get_round_trips() -> TestResult {
        let ctx = TestContext::new().await?;

        let (status, created) =
            create_account::<AccountCreated>("oedipa-1", "oedipa@trystero.com", "Oedipa Maas", &ctx)
                .await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(created.email, "oedipa@trystero.com");

        let (status, account) = get_account::<AccountProfile>(created.id, &ctx).await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            account,
            AccountProfile {
                id: created.id,
                oauth_id: "oedipa-1".to_string(),
                email: "oedipa@trystero.com".to_string(),
                name: "Oedipa Maas".to_string(),
            }
        );

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_create_account_same_oauth_id_fails() -> TestResult {
        let ctx = TestContext::new().await?;

        let (status, _) =
            create_account::<AccountCreated>("abc123", "first@example.com", "First", &ctx).await?;
        assert_eq!(status, StatusCode::OK);

        let (status, body) =
            create_account::<ErrorResponse>("abc123", "second@example.com", "Second", &ctx).await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            single_error(body).detail.as_deref(),
            Some("Account creation failed")
        );

        let (_, accounts) = list_accounts(&ctx).await?;
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].email, "first@example.com");

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_create_account_same_email_fails() -> TestResult {
        let ctx = TestContext::new().await?;

        let (status, _) =
            create_account::<AccountCreated>("first", "same@example.com", "First", &ctx).await?;
        assert_eq!(status, StatusCode::OK);

        let (status, body) =
            create_account::<ErrorResponse>("second", "same@example.com", "Second", &ctx).await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_matches!(
            body.errors.as_slice(),
            [AppError {
                status: StatusCode::BAD_REQUEST,
                ..
            }]
        );

        let (_, accounts) = list_accounts(&ctx).await?;
        assert_eq!(accounts.len(), 1);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_create_account_does_not_leak_database_error() -> TestResult {
        let ctx = TestContext::new().await?;

        create_account::<AccountCreated>("abc123", "test@example.com", "Test User", &ctx).await?;

        let (status, body) = RouteBuilder::new(ctx.app(), Method::POST, "/accounts/")
            .with_json_body(json!({
                "OAuthID": "abc123",
                "email": "test@example.com",
                "name": "Test User",
            }))?
            .into_raw_response()
            .await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body = String::from_utf8(body.to_vec())?;
        assert!(!body.contains("UNIQUE"));

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_create_account_invalid_email() -> TestResult {
        let ctx = TestContext::new().await?;

        let (status, body) =
            create_account::<ErrorResponse>("abc123", "not-an-email", "Test User", &ctx).await?;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_matches!(
            body.errors.as_slice(),
            [AppError {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                ..
            }]
        );

        let (_, accounts) = list_accounts(&ctx).await?;
        assert!(accounts.is_empty());

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_create_account_missing_field() -> TestResult {
        let ctx = TestContext::new().await?;

        let (status, _) = RouteBuilder::new(ctx.app(), Method::POST, "/accounts/")
            .with_json_body(json!({ "OAuthID": "abc123", "name": "Test User" }))?
            .into_json_response::<ErrorResponse>()
            .await?;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_get_missing_account() -> TestResult {
        let ctx = TestContext::new().await?;

        let (status, body) = get_account::<ErrorResponse>(42, &ctx).await?;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            single_error(body).detail.as_deref(),
            Some("Account not found")
        );

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_list_accounts_empty() -> TestResult {
        let ctx = TestContext::new().await?;

        let (status, accounts) = list_accounts(&ctx).await?;

        assert_eq!(status, StatusCode::OK);
        assert!(accounts.is_empty());

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_list_contains_each_account_once() -> TestResult {
        let ctx = TestContext::new().await?;

        let mut ids = Vec::new();
        for n in 0..3 {
            let (_, created) = create_account::<AccountCreated>(
                &format!("oauth-{n}"),
                &format!("user{n}@example.com"),
                "Same Name",
                &ctx,
            )
            .await?;
            ids.push(created.id);
        }

        let (status, accounts) = list_accounts(&ctx).await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(accounts.len(), 3);
        for id in ids {
            assert_eq!(accounts.iter().filter(|a| a.id == id).count(), 1);
        }

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_list_without_trailing_slash() -> TestResult {
        let ctx = TestContext::new().await?;

        create_account::<AccountCreated>("abc123", "test@example.com", "Test User", &ctx).await?;

        let (status, accounts) = RouteBuilder::new(ctx.app(), Method::GET, "/accounts")
            .into_json_response::<Vec<AccountProfile>>()
            .await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(accounts.len(), 1);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_delete_never_existing_account() -> TestResult {
        let ctx = TestContext::new().await?;

        let (status, _) = delete_account::<ErrorResponse>(7, &ctx).await?;

        assert_eq!(status, StatusCode::NOT_FOUND);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_deleted_id_is_not_reused() -> TestResult {
        let ctx = TestContext::new().await?;

        let (_, first) =
            create_account::<AccountCreated>("abc123", "test@example.com", "Test User", &ctx)
                .await?;
        delete_account::<DetailResponse>(first.id, &ctx).await?;

        let (status, second) =
            create_account::<AccountCreated>("abc123", "test@example.com", "Test User", &ctx)
                .await?;

        assert_eq!(status, StatusCode::OK);
        assert_ne!(first.id, second.id);

        let (status, _) = get_account::<ErrorResponse>(first.id, &ctx).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_non_numeric_account_id() -> TestResult {
        let ctx = TestContext::new().await?;

        for method in [Method::GET, Method::DELETE] {
            let (status, body) = RouteBuilder::new(ctx.app(), method, "/accounts/abc")
                .into_json_response::<ErrorResponse>()
                .await?;

            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(single_error(body).status, StatusCode::UNPROCESSABLE_ENTITY);
        }

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_account_id_beyond_i32_is_not_found() -> TestResult {
        let ctx = TestContext::new().await?;

        let (status, _) = get_account::<ErrorResponse>(99_999_999_999, &ctx).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = delete_account::<ErrorResponse>(99_999_999_999, &ctx).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);

        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn test_delete_account_owning_a_meter() -> TestResult {
        let ctx = TestContext::new().await?;

        let (_, created) =
            create_account::<AccountCreated>("abc123", "test@example.com", "Test User", &ctx)
                .await?;

        let meter = NewMeter {
            oauth_id: Some("abc123".to_string()),
            metername: Some("porch".to_string()),
            ..Default::default()
        }
        .insert(&mut *ctx.get_db_conn().await?)
        .await?;

        let (status, body) = delete_account::<Value>(created.id, &ctx).await?;

        assert_eq!(status, StatusCode::OK);
        assert_json_diff::assert_json_eq!(body, json!({ "detail": "Account deleted" }));

        let remaining: Vec<Meter> = meters::table
            .select(Meter::as_select())
            .load(&mut *ctx.get_db_conn().await?)
            .await?;

        assert_eq!(remaining, vec![meter]);

        Ok(())
    }
}
