use super::client::ApiClient;
use crate::constants::{
    AUTH_CHANGE_PASSWORD, AUTH_LOGIN, AUTH_LOGOUT, AUTH_PREFERENCES, AUTH_REGISTER,
};
use crate::error::Result;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct Registration<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
struct PasswordChange<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

/// Body returned by login and register.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthSession {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiClient {
    /// Logs in and stores the returned token.
    #[instrument(skip(self, credentials), fields(email = credentials.email))]
    pub async fn login(&self, credentials: &Credentials<'_>) -> Result<AuthSession> {
        let session: AuthSession = self
            .send_json(Method::POST, AUTH_LOGIN, Some(credentials), "Login failed")
            .await?;
        self.remember(&session)?;
        Ok(session)
    }

    #[instrument(skip(self, registration), fields(email = registration.email))]
    pub async fn register(&self, registration: &Registration<'_>) -> Result<AuthSession> {
        let session: AuthSession = self
            .send_json(
                Method::POST,
                AUTH_REGISTER,
                Some(registration),
                "Registration failed",
            )
            .await?;
        self.remember(&session)?;
        Ok(session)
    }

    /// Ends the session. Local token state is cleared even when the server call fails;
    /// the server error is still returned.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        let server_result = self
            .send_json::<Value, Value>(Method::POST, AUTH_LOGOUT, None, "Logout failed")
            .await;

        self.tokens().clear()?;

        match server_result {
            Ok(_) => {
                info!("Logged out");
                Ok(())
            }
            Err(e) => {
                warn!("Server logout failed, local session cleared anyway: {}", e);
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn preferences(&self) -> Result<Value> {
        self.get_json(AUTH_PREFERENCES, &[], "Failed to fetch user preferences")
            .await
    }

    #[instrument(skip(self, preferences))]
    pub async fn update_preferences(&self, preferences: &Value) -> Result<Value> {
        self.send_json(
            Method::POST,
            AUTH_PREFERENCES,
            Some(preferences),
            "Failed to update user preferences",
        )
        .await
    }

    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<Value> {
        let body = PasswordChange {
            current_password,
            new_password,
        };
        self.send_json(
            Method::POST,
            AUTH_CHANGE_PASSWORD,
            Some(&body),
            "Failed to change password",
        )
        .await
    }

    fn remember(&self, session: &AuthSession) -> Result<()> {
        if let Some(token) = session.token.as_deref().filter(|t| !t.is_empty()) {
            self.tokens().set(token)?;
        }
        Ok(())
    }
}
