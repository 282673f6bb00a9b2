//! Request and response bodies of the HTTP API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Account Request Struct (for creating new accounts)
#[derive(Deserialize, Serialize, Clone, Debug, ToSchema, Validate)]
pub struct AccountCreationRequest {
    /// Subject identifier issued by the identity provider
    #[serde(rename = "OAuthID")]
    pub oauth_id: String,
    /// Email address associated with the account
    #[validate(email)]
    pub email: String,
    /// Display name
    pub name: String,
}

/// Returned once an account has been stored
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct AccountCreated {
    /// Storage-assigned identifier
    pub id: i64,
    /// Email address of the new account
    pub email: String,
}

/// Confirmation carrying a human readable detail
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct DetailResponse {
    /// What happened
    pub detail: String,
}

/// Greeting returned by the root route
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct MessageResponse {
    /// The greeting
    pub message: String,
}

/// Liveness response
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq, ToSchema)]
pub struct StatusResponse {
    /// Always `ok` while the process serves requests
    pub status: String,
}
