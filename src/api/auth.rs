//! Account endpoints under `/auth`.

use reqwest::Method;
use serde_json::json;
use tracing::{info, warn};

use super::{ApiClient, NO_BODY};
use crate::models::{
    AuthResponse, LoginRequest, MessageResponse, PasswordUpdate, ProfileUpdate, RegisterRequest,
    RegisterResponse, ResetPasswordRequest, User, VerifyOtpRequest,
};
use crate::{Error, Result};

impl ApiClient {
    pub async fn register(&self, data: &RegisterRequest) -> Result<RegisterResponse> {
        self.call(
            Method::POST,
            "/auth/register",
            "/auth/register",
            Some(data),
            "Registration failed",
        )
        .await
    }

    /// Sign in and persist the token to storage and cookie.
    pub async fn login(&self, data: &LoginRequest) -> Result<AuthResponse> {
        let response: AuthResponse = self
            .call(Method::POST, "/auth/login", "/auth/login", Some(data), "Login failed")
            .await?;

        if let Some(session) = self.session() {
            session.store_login(&response)?;
        }
        info!(user_id = response.user.id, "Logged in");
        Ok(response)
    }

    pub async fn verify_otp(&self, data: &VerifyOtpRequest) -> Result<MessageResponse> {
        self.call(
            Method::POST,
            "/auth/verify-otp",
            "/auth/verify-otp",
            Some(data),
            "OTP verification failed",
        )
        .await
    }

    pub async fn resend_otp(&self, email: &str) -> Result<MessageResponse> {
        // the endpoint reuses the login schema; password is ignored
        let body = json!({ "email": email, "password": "" });
        self.call(
            Method::POST,
            "/auth/resend-otp",
            "/auth/resend-otp",
            Some(&body),
            "Failed to resend OTP",
        )
        .await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse> {
        let body = json!({ "email": email });
        self.call(
            Method::POST,
            "/auth/forgot-password",
            "/auth/forgot-password",
            Some(&body),
            "Failed to send reset code",
        )
        .await
    }

    pub async fn reset_password(&self, data: &ResetPasswordRequest) -> Result<MessageResponse> {
        self.call(
            Method::POST,
            "/auth/reset-password",
            "/auth/reset-password",
            Some(data),
            "Failed to reset password",
        )
        .await
    }

    pub async fn me(&self) -> Result<User> {
        self.call(Method::GET, "/auth/me", "/auth/me", NO_BODY, "Not authenticated")
            .await
    }

    pub async fn update_profile(&self, data: &ProfileUpdate) -> Result<MessageResponse> {
        self.call(
            Method::PUT,
            "/auth/profile",
            "/auth/profile",
            Some(data),
            "Update failed",
        )
        .await
    }

    pub async fn update_password(&self, data: &PasswordUpdate) -> Result<MessageResponse> {
        self.call(
            Method::PUT,
            "/auth/password",
            "/auth/password",
            Some(data),
            "Password update failed",
        )
        .await
    }

    /// Delete the account; the local session is cleared only on success.
    pub async fn delete_account(&self) -> Result<MessageResponse> {
        let response: MessageResponse = self
            .call(
                Method::DELETE,
                "/auth/account",
                "/auth/account",
                NO_BODY,
                "Delete failed",
            )
            .await?;

        if let Some(session) = self.session() {
            session.clear()?;
        }
        Ok(response)
    }

    /// Tell the server to drop the token, then clear the local session no
    /// matter how the request went. The HTTP status is not checked; a
    /// transport failure is still reported after the session is cleared.
    pub async fn logout(&self) -> Result<()> {
        let sent = self
            .send(Method::POST, "/auth/logout", "/auth/logout", NO_BODY)
            .await;

        if let Some(session) = self.session() {
            session.clear()?;
        }

        match sent {
            Ok(response) => {
                if !response.status().is_success() {
                    warn!(status = response.status().as_u16(), "Logout request rejected");
                }
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Whether a token is stored locally. No request is made.
    pub fn is_logged_in(&self) -> Result<bool> {
        match self.session() {
            Some(session) => session.is_logged_in(),
            None => Ok(false),
        }
    }

    /// The user saved at login time, if any.
    pub fn stored_user(&self) -> Result<Option<User>> {
        match self.session() {
            Some(session) => session.stored_user(),
            None => Err(Error::NotAuthenticated),
        }
    }
}
