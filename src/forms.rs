//! Client-side form validation.
//!
//! These checks are advisory: they stop obviously bad submissions before a
//! request is made, the server stays the authority. Each form turns into
//! the request body it submits once `validate` passes.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::models::{
    AddAppRequest, AppUpdate, LoginRequest, PasswordUpdate, ProfileUpdate, RegisterRequest,
    ResetPasswordRequest, VerifyOtpRequest,
};

pub const OTP_LENGTH: usize = 6;
pub const MAX_SCRAPE_COUNT: u32 = 10_000;

pub const MSG_PASSWORD_MISMATCH: &str = "Passwords do not match";

static PLAY_STORE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"id=([a-zA-Z0-9_.]+)").expect("valid Play Store id regex")
});

fn required(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn required_email(value: &str) -> Result<String> {
    let email = required(value, "Email")?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(Error::Validation("Email address is invalid".to_string())),
    }
}

fn required_password(value: &str, field: &str) -> Result<String> {
    if value.is_empty() {
        return Err(Error::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

fn matching(password: &str, confirmation: &str) -> Result<()> {
    if password != confirmation {
        return Err(Error::Validation(MSG_PASSWORD_MISMATCH.to_string()));
    }
    Ok(())
}

fn otp_complete(otp: &str) -> bool {
    otp.chars().count() == OTP_LENGTH
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest> {
        Ok(LoginRequest {
            email: required_email(&self.email)?,
            password: required_password(&self.password, "Password")?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub fullname: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<RegisterRequest> {
        let fullname = required(&self.fullname, "Full name")?;
        let email = required_email(&self.email)?;
        let password = required_password(&self.password, "Password")?;
        matching(&self.password, &self.confirm_password)?;
        Ok(RegisterRequest {
            fullname,
            email,
            password,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct VerifyOtpForm {
    pub email: String,
    pub otp: String,
}

impl VerifyOtpForm {
    pub fn can_submit(&self) -> bool {
        otp_complete(self.otp.trim())
    }

    pub fn validate(&self) -> Result<VerifyOtpRequest> {
        let email = required_email(&self.email)?;
        if !self.can_submit() {
            return Err(Error::Validation(format!(
                "The code must have {} characters",
                OTP_LENGTH
            )));
        }
        Ok(VerifyOtpRequest {
            email,
            otp: self.otp.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResetPasswordForm {
    pub email: String,
    pub otp: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ResetPasswordForm {
    /// The submit control stays disabled until the code is complete.
    pub fn can_submit(&self) -> bool {
        otp_complete(&self.otp)
    }

    pub fn validate(&self) -> Result<ResetPasswordRequest> {
        if !self.can_submit() {
            return Err(Error::Validation(format!(
                "The code must have {} characters",
                OTP_LENGTH
            )));
        }
        matching(&self.new_password, &self.confirm_password)?;
        Ok(ResetPasswordRequest {
            email: required_email(&self.email)?,
            otp: self.otp.clone(),
            new_password: required_password(&self.new_password, "New password")?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub fullname: String,
    pub email: String,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<ProfileUpdate> {
        Ok(ProfileUpdate {
            fullname: required(&self.fullname, "Full name")?,
            email: required_email(&self.email)?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct PasswordChangeForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChangeForm {
    pub fn validate(&self) -> Result<PasswordUpdate> {
        let current_password = required_password(&self.current_password, "Current password")?;
        let new_password = required_password(&self.new_password, "New password")?;
        matching(&self.new_password, &self.confirm_password)?;
        Ok(PasswordUpdate {
            current_password,
            new_password,
        })
    }
}

/// Add-app form. The input may be an app name, a package id or a Play
/// Store URL; name resolution happens server-side.
#[derive(Debug, Clone)]
pub struct AddAppForm {
    pub input: String,
    pub country: String,
    pub count: u32,
}

impl AddAppForm {
    pub fn new(input: &str, country: &str, count: u32) -> Self {
        Self {
            input: input.to_string(),
            country: country.to_string(),
            count,
        }
    }

    pub fn validate(&self) -> Result<AddAppRequest> {
        let input = required(&self.input, "Application")?;
        if looks_like_url(&input) && package_from_input(&input).is_none() {
            return Err(Error::Validation(
                "URL must be a Google Play link containing id=<package>".to_string(),
            ));
        }
        if self.count == 0 || self.count > MAX_SCRAPE_COUNT {
            return Err(Error::Validation(format!(
                "Review count must be between 1 and {}",
                MAX_SCRAPE_COUNT
            )));
        }
        let country = required(&self.country, "Country")?.to_lowercase();
        Ok(AddAppRequest {
            app_id: input,
            country,
            count: self.count,
        })
    }
}

fn looks_like_url(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Package id a Play Store URL points at, or the input itself when it
/// already looks like a package id. `None` for free-text names.
pub fn package_from_input(input: &str) -> Option<String> {
    let input = input.trim();
    if input.contains("play.google.com") {
        return PLAY_STORE_ID
            .captures(input)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());
    }
    if looks_like_url(input) || input.contains(' ') || !input.contains('.') {
        return None;
    }
    Some(input.to_string())
}

#[derive(Debug, Clone, Default)]
pub struct AppEditForm {
    pub name: String,
    pub icon_url: String,
}

impl AppEditForm {
    pub fn validate(&self) -> Result<AppUpdate> {
        let name = Some(self.name.trim().to_string()).filter(|s| !s.is_empty());
        let icon_url = Some(self.icon_url.trim().to_string()).filter(|s| !s.is_empty());
        if name.is_none() && icon_url.is_none() {
            return Err(Error::Validation(
                "Provide a new name or icon URL".to_string(),
            ));
        }
        if let Some(ref url) = icon_url {
            if !looks_like_url(url) {
                return Err(Error::Validation("Icon URL must start with http(s)://".to_string()));
            }
        }
        Ok(AppUpdate { name, icon_url })
    }
}
