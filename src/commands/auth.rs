//! Account commands: sign-up, sign-in, OTP, password reset, settings.

use tracing::info;

use super::{confirm, Context};
use crate::forms::{
    LoginForm, PasswordChangeForm, ProfileForm, ResetPasswordForm, SignupForm, VerifyOtpForm,
};
use crate::models::{AuthResponse, RegisterResponse, User};
use crate::route_guard::{self, GuardDecision};
use crate::Result;

const SETTINGS_PAGE: &str = "/settings";

pub async fn register(ctx: &Context, form: &SignupForm) -> Result<RegisterResponse> {
    let request = form.validate()?;
    let response = ctx.client.register(&request).await?;
    println!("✅ {}", response.message);
    println!("📧 Check {} for the verification code, then run `feedly auth verify-otp`.", request.email);
    Ok(response)
}

pub async fn login(ctx: &Context, form: &LoginForm) -> Result<AuthResponse> {
    // The login page bounces signed-in users to the dashboard; signing in
    // again simply replaces the stored session.
    let token = ctx.client.bearer_token();
    if let GuardDecision::Redirect(location) = route_guard::evaluate("/login", token.as_deref()) {
        info!(location = %location, "Already signed in, replacing session");
    }

    let request = form.validate()?;
    let response = ctx.client.login(&request).await?;
    println!("👋 Welcome, {} <{}>", response.user.fullname, response.user.email);
    Ok(response)
}

pub async fn verify_otp(ctx: &Context, form: &VerifyOtpForm) -> Result<()> {
    let request = form.validate()?;
    let response = ctx.client.verify_otp(&request).await?;
    println!("✅ {}", non_empty_or(&response.message, "Account verified"));
    Ok(())
}

pub async fn resend_otp(ctx: &Context, email: &str) -> Result<()> {
    let response = ctx.client.resend_otp(email.trim()).await?;
    println!("📧 {}", non_empty_or(&response.message, "Code sent"));
    Ok(())
}

pub async fn forgot_password(ctx: &Context, email: &str) -> Result<()> {
    let response = ctx.client.forgot_password(email.trim()).await?;
    println!("📧 {}", non_empty_or(&response.message, "Reset code sent"));
    Ok(())
}

pub async fn reset_password(ctx: &Context, form: &ResetPasswordForm) -> Result<()> {
    let request = form.validate()?;
    let response = ctx.client.reset_password(&request).await?;
    println!("🔑 {}", non_empty_or(&response.message, "Password reset"));
    Ok(())
}

pub async fn me(ctx: &Context) -> Result<User> {
    ctx.require_page(SETTINGS_PAGE)?;
    let user = ctx.client.me().await?;
    println!("{}", render_user(&user));
    Ok(user)
}

pub async fn logout(ctx: &Context) -> Result<()> {
    ctx.client.logout().await?;
    println!("👋 Signed out");
    Ok(())
}

pub async fn update_profile(ctx: &Context, form: &ProfileForm) -> Result<()> {
    ctx.require_page(SETTINGS_PAGE)?;
    let request = form.validate()?;
    let response = ctx.client.update_profile(&request).await?;
    println!("✅ {}", non_empty_or(&response.message, "Profile updated"));
    Ok(())
}

pub async fn change_password(ctx: &Context, form: &PasswordChangeForm) -> Result<()> {
    ctx.require_page(SETTINGS_PAGE)?;
    let request = form.validate()?;
    let response = ctx.client.update_password(&request).await?;
    println!("🔑 {}", non_empty_or(&response.message, "Password updated"));
    Ok(())
}

/// Returns whether the account was deleted.
pub async fn delete_account(ctx: &Context, assume_yes: bool) -> Result<bool> {
    ctx.require_page(SETTINGS_PAGE)?;
    if !assume_yes && !confirm("Delete your account and all tracked applications?") {
        println!("Cancelled");
        return Ok(false);
    }
    let response = ctx.client.delete_account().await?;
    println!("🗑️ {}", non_empty_or(&response.message, "Account deleted"));
    Ok(true)
}

pub fn render_user(user: &User) -> String {
    format!("👤 {} <{}> (id {})", user.fullname, user.email, user.id)
}

fn non_empty_or<'a>(message: &'a str, fallback: &'a str) -> &'a str {
    if message.trim().is_empty() {
        fallback
    } else {
        message
    }
}
