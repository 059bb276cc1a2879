//! Identity client — the single point of entry for all identity-provider
//! calls in Compass.
//!
//! ARCHITECTURAL RULE: no other module may call the identity toolkit REST API
//! directly. Handlers and extractors go through `IdentityClient`, which owns
//! the HTTP surface, the error taxonomy, and the role-claim parsing.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::auth::role::Role;
use crate::errors::AppError;
use crate::models::user::AuthedUser;

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Identity API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Identity API returned no user for the supplied token")]
    MissingUser,
}

/// Session material returned by the provider on sign-up and sign-in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    pub local_id: String,
    #[serde(default)]
    pub email: String,
    pub id_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    users: Option<Vec<LookupUser>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    email: Option<String>,
    /// Stringified JSON blob of custom claims, as the provider returns it.
    custom_attributes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Thin REST client for the external identity toolkit. The base URL is
/// configurable so development can point at the local emulator.
#[derive(Clone)]
pub struct IdentityClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl IdentityClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post(
        &self,
        endpoint: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, IdentityError> {
        let url = format!("{}/accounts:{}?key={}", self.base_url, endpoint, self.api_key);
        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ApiError>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Creates a new account. The caller is responsible for assigning the
    /// initial role claim afterwards.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SessionTokens, IdentityError> {
        debug!("Identity sign-up for {email}");
        let value = self
            .post(
                "signUp",
                json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Password sign-in. Invalid credentials surface as an `Api` error that
    /// maps to `Unauthorized`.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionTokens, IdentityError> {
        debug!("Identity sign-in for {email}");
        let value = self
            .post(
                "signInWithPassword",
                json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Asks the provider to send a password-reset email.
    pub async fn send_password_reset(&self, email: &str) -> Result<(), IdentityError> {
        self.post(
            "sendOobCode",
            json!({ "requestType": "PASSWORD_RESET", "email": email }),
        )
        .await?;
        Ok(())
    }

    /// Resolves an ID token to the verified identity this service consumes:
    /// {uid, email, role claim}.
    pub async fn lookup(&self, id_token: &str) -> Result<AuthedUser, IdentityError> {
        let value = self.post("lookup", json!({ "idToken": id_token })).await?;
        let response: LookupResponse = serde_json::from_value(value)?;
        let user = response
            .users
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or(IdentityError::MissingUser)?;

        Ok(AuthedUser {
            uid: user.local_id,
            email: user.email.unwrap_or_default(),
            role: role_from_custom_attributes(user.custom_attributes.as_deref()),
        })
    }

    /// Writes the custom `role` claim on an account. Takes effect on the
    /// user's next token refresh.
    pub async fn set_role(&self, uid: &str, role: Role) -> Result<(), IdentityError> {
        let attributes = json!({ "role": role.as_str() }).to_string();
        self.post(
            "update",
            json!({ "localId": uid, "customAttributes": attributes }),
        )
        .await?;
        Ok(())
    }
}

/// Parses the `role` claim out of the provider's stringified custom-claims
/// blob. Anything malformed or absent resolves to the default role.
pub fn role_from_custom_attributes(raw: Option<&str>) -> Role {
    let claims: serde_json::Value = match raw.and_then(|s| serde_json::from_str(s).ok()) {
        Some(v) => v,
        None => return Role::Surveyor,
    };
    Role::from_claim(claims.get("role").and_then(|v| v.as_str()))
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match &err {
            IdentityError::Api { message, .. } => {
                // Provider error messages lead with a stable code, sometimes
                // followed by explanatory text ("WEAK_PASSWORD : ...").
                let code = message.split([' ', ':']).next().unwrap_or("");
                match code {
                    "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "USER_NOT_FOUND" | "USER_DISABLED"
                    | "INVALID_PASSWORD" | "EMAIL_NOT_FOUND" | "INVALID_LOGIN_CREDENTIALS" => {
                        AppError::Unauthorized
                    }
                    "EMAIL_EXISTS" | "INVALID_EMAIL" | "WEAK_PASSWORD" | "MISSING_PASSWORD"
                    | "MISSING_EMAIL" => AppError::Validation(message.clone()),
                    _ => AppError::Identity(err.to_string()),
                }
            }
            IdentityError::MissingUser => AppError::Unauthorized,
            _ => AppError::Identity(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsed_from_custom_attributes() {
        assert_eq!(
            role_from_custom_attributes(Some(r#"{"role":"admin"}"#)),
            Role::Admin
        );
        assert_eq!(
            role_from_custom_attributes(Some(r#"{"role":"analyst","other":1}"#)),
            Role::Analyst
        );
    }

    #[test]
    fn test_missing_or_malformed_claims_default_to_surveyor() {
        assert_eq!(role_from_custom_attributes(None), Role::Surveyor);
        assert_eq!(role_from_custom_attributes(Some("not json")), Role::Surveyor);
        assert_eq!(role_from_custom_attributes(Some("{}")), Role::Surveyor);
        assert_eq!(
            role_from_custom_attributes(Some(r#"{"role":"root"}"#)),
            Role::Surveyor
        );
    }

    #[test]
    fn test_credential_api_errors_map_to_unauthorized() {
        for code in ["INVALID_ID_TOKEN", "EMAIL_NOT_FOUND", "INVALID_LOGIN_CREDENTIALS"] {
            let err = IdentityError::Api {
                status: 400,
                message: code.to_string(),
            };
            assert!(matches!(AppError::from(err), AppError::Unauthorized));
        }
    }

    #[test]
    fn test_account_shape_errors_map_to_validation() {
        let err = IdentityError::Api {
            status: 400,
            message: "WEAK_PASSWORD : Password should be at least 6 characters".to_string(),
        };
        match AppError::from(err) {
            AppError::Validation(msg) => assert!(msg.starts_with("WEAK_PASSWORD")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_provider_failures_map_to_identity() {
        let err = IdentityError::Api {
            status: 500,
            message: "INTERNAL_ERROR".to_string(),
        };
        assert!(matches!(AppError::from(err), AppError::Identity(_)));
    }

    #[test]
    fn test_missing_user_maps_to_unauthorized() {
        assert!(matches!(
            AppError::from(IdentityError::MissingUser),
            AppError::Unauthorized
        ));
    }
}
