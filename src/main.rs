//! Feedly CLI - main entry point
//!
//! One subcommand per dashboard action: account, apps, dashboard, chat,
//! AI helpers, route checks and review reports.

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use feedly::commands::route::TokenSource;
use feedly::commands::{self, Context};
use feedly::forms::{
    AppEditForm, LoginForm, PasswordChangeForm, ProfileForm, ResetPasswordForm, SignupForm,
    VerifyOtpForm,
};
use feedly::report::ReportFormat;
use feedly::{metrics, Config};
use tracing::warn;

#[derive(Parser)]
#[command(name = "feedly")]
#[command(about = "Feedly review monitoring client", long_about = None)]
#[command(version)]
struct Cli {
    /// API base URL (overrides FEEDLY_API_URL and feedly.yml)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory holding the stored session
    #[arg(long, global = true)]
    session_dir: Option<PathBuf>,

    /// Address to expose Prometheus metrics (e.g., 0.0.0.0:9898)
    #[arg(long, env = "METRICS_ADDR")]
    metrics_addr: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Account: sign-up, sign-in, password and profile
    #[command(subcommand)]
    Auth(AuthCommand),

    /// Tracked applications, their reviews and analytics
    #[command(subcommand)]
    Apps(AppsCommand),

    /// Global statistics and recent activity
    Dashboard,

    /// Conversations with the review assistant
    #[command(subcommand)]
    Chat(ChatCommand),

    /// Call the AI helpers directly
    #[command(subcommand)]
    Ai(AiCommand),

    /// Show what the route guard does with a path
    Route {
        /// Request path, e.g. /apps/42
        path: String,

        /// Raw Cookie header to read the token from
        #[arg(long, conflicts_with_all = ["token", "session"])]
        cookie: Option<String>,

        /// Token value
        #[arg(long, conflicts_with = "session")]
        token: Option<String>,

        /// Use the stored session cookie
        #[arg(long, default_value_t = false)]
        session: bool,
    },

    /// Export an application's reviews
    Report {
        /// Application id
        app_id: i64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: ReportFormat,

        /// Output file, extension added from the format when missing (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum number of reviews
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[derive(Args)]
struct Credentials {
    /// Account email
    #[arg(long, env = "FEEDLY_EMAIL")]
    email: String,

    /// Account password
    #[arg(long, env = "FEEDLY_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Subcommand)]
enum AuthCommand {
    /// Create an account; a verification code is emailed
    Register {
        #[arg(long)]
        fullname: String,
        #[command(flatten)]
        credentials: Credentials,
        /// Password confirmation (defaults to the password)
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Sign in and store the session
    Login {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Confirm the emailed code
    VerifyOtp {
        #[arg(long, env = "FEEDLY_EMAIL")]
        email: String,
        #[arg(long)]
        otp: String,
    },
    /// Email a new verification code
    ResendOtp {
        #[arg(long, env = "FEEDLY_EMAIL")]
        email: String,
    },
    /// Email a password reset code
    ForgotPassword {
        #[arg(long, env = "FEEDLY_EMAIL")]
        email: String,
    },
    /// Set a new password with the emailed code
    ResetPassword {
        #[arg(long, env = "FEEDLY_EMAIL")]
        email: String,
        #[arg(long)]
        otp: String,
        #[arg(long)]
        new_password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Show the signed-in user
    Me,
    /// Sign out and clear the stored session
    Logout,
    /// Change name and email
    UpdateProfile {
        #[arg(long)]
        fullname: String,
        #[arg(long)]
        email: String,
    },
    /// Change password
    ChangePassword {
        #[arg(long)]
        current_password: String,
        #[arg(long)]
        new_password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Delete the account
    DeleteAccount {
        /// Skip the confirmation prompt
        #[arg(short, long, default_value_t = false)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum AppsCommand {
    /// List tracked applications
    List,
    /// Application detail: analytics and latest reviews
    Show {
        id: i64,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Track an application by name, package id or Play Store URL
    Add {
        input: String,
        /// Store country
        #[arg(long)]
        country: Option<String>,
        /// Number of reviews to scrape
        #[arg(long)]
        count: Option<u32>,
    },
    /// Rename an application or change its icon
    Update {
        id: i64,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        icon_url: String,
    },
    /// Delete an application and its reviews
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long, default_value_t = false)]
        yes: bool,
    },
    /// Scrape an application again
    Sync { id: i64 },
    /// Latest reviews
    Reviews {
        id: i64,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Rating and sentiment breakdown
    Analytics { id: i64 },
}

#[derive(Subcommand)]
enum ChatCommand {
    /// List conversations
    List,
    /// Show a conversation transcript
    Show { id: i64 },
    /// Start a conversation about an application
    New { app_id: i64 },
    /// Send a message and print the reply
    Send { conversation_id: i64, text: String },
    /// Delete a conversation
    Delete {
        id: i64,
        #[arg(short, long, default_value_t = false)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum AiCommand {
    /// Score the sentiment of a text
    Sentiment { text: String },
    /// Free-form generation
    Generate { prompt: String },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Auth(cmd) => match cmd {
                AuthCommand::Register { .. } => "auth_register",
                AuthCommand::Login { .. } => "auth_login",
                AuthCommand::VerifyOtp { .. } => "auth_verify_otp",
                AuthCommand::ResendOtp { .. } => "auth_resend_otp",
                AuthCommand::ForgotPassword { .. } => "auth_forgot_password",
                AuthCommand::ResetPassword { .. } => "auth_reset_password",
                AuthCommand::Me => "auth_me",
                AuthCommand::Logout => "auth_logout",
                AuthCommand::UpdateProfile { .. } => "auth_update_profile",
                AuthCommand::ChangePassword { .. } => "auth_change_password",
                AuthCommand::DeleteAccount { .. } => "auth_delete_account",
            },
            Commands::Apps(cmd) => match cmd {
                AppsCommand::List => "apps_list",
                AppsCommand::Show { .. } => "apps_show",
                AppsCommand::Add { .. } => "apps_add",
                AppsCommand::Update { .. } => "apps_update",
                AppsCommand::Delete { .. } => "apps_delete",
                AppsCommand::Sync { .. } => "apps_sync",
                AppsCommand::Reviews { .. } => "apps_reviews",
                AppsCommand::Analytics { .. } => "apps_analytics",
            },
            Commands::Dashboard => "dashboard",
            Commands::Chat(cmd) => match cmd {
                ChatCommand::List => "chat_list",
                ChatCommand::Show { .. } => "chat_show",
                ChatCommand::New { .. } => "chat_new",
                ChatCommand::Send { .. } => "chat_send",
                ChatCommand::Delete { .. } => "chat_delete",
            },
            Commands::Ai(cmd) => match cmd {
                AiCommand::Sentiment { .. } => "ai_sentiment",
                AiCommand::Generate { .. } => "ai_generate",
            },
            Commands::Route { .. } => "route",
            Commands::Report { .. } => "report",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for local development
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("feedly=info".parse()?))
        .init();

    let cli = Cli::parse();

    if let Some(addr) = cli.metrics_addr.as_deref() {
        match addr.parse::<SocketAddr>() {
            Ok(socket) => metrics::spawn_metrics_server(socket),
            Err(err) => warn!(%addr, "Invalid metrics address: {}", err),
        }
    }

    let mut config = Config::new();
    if let Some(url) = cli.api_url.as_deref() {
        config = config.with_api_url(url);
    }
    if let Some(dir) = cli.session_dir {
        config = config.with_session_dir(dir);
    }
    let ctx = Context::new(config)?;

    let command_name = cli.command.name();
    let start = Instant::now();

    let result = execute_command(&ctx, cli.command).await;

    metrics::record_command_result(command_name, start.elapsed(), result.is_ok());

    result
}

async fn execute_command(ctx: &Context, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Auth(cmd) => execute_auth(ctx, cmd).await?,
        Commands::Apps(cmd) => execute_apps(ctx, cmd).await?,
        Commands::Dashboard => {
            commands::dashboard::run(ctx).await?;
        }
        Commands::Chat(cmd) => match cmd {
            ChatCommand::List => {
                commands::chat::list(ctx).await?;
            }
            ChatCommand::Show { id } => commands::chat::show(ctx, id).await?,
            ChatCommand::New { app_id } => {
                commands::chat::new(ctx, app_id).await?;
            }
            ChatCommand::Send {
                conversation_id,
                text,
            } => {
                commands::chat::send(ctx, conversation_id, &text).await?;
            }
            ChatCommand::Delete { id, yes } => {
                commands::chat::delete(ctx, id, yes).await?;
            }
        },
        Commands::Ai(cmd) => match cmd {
            AiCommand::Sentiment { text } => {
                commands::ai::sentiment(ctx, &text).await?;
            }
            AiCommand::Generate { prompt } => {
                commands::ai::generate(ctx, &prompt).await?;
            }
        },
        Commands::Route {
            path,
            cookie,
            token,
            session,
        } => {
            let source = match (cookie, token) {
                (Some(header), _) => TokenSource::CookieHeader(header),
                (None, Some(token)) => TokenSource::Token(token),
                (None, None) if session => TokenSource::Session,
                (None, None) => TokenSource::None,
            };
            commands::route::run(ctx, &path, &source)?;
        }
        Commands::Report {
            app_id,
            format,
            output,
            limit,
        } => {
            commands::report::run(ctx, app_id, format, output.as_deref(), limit).await?;
        }
    }
    Ok(())
}

async fn execute_auth(ctx: &Context, command: AuthCommand) -> anyhow::Result<()> {
    match command {
        AuthCommand::Register {
            fullname,
            credentials,
            confirm_password,
        } => {
            let form = SignupForm {
                fullname,
                email: credentials.email,
                confirm_password: confirm_password.unwrap_or_else(|| credentials.password.clone()),
                password: credentials.password,
            };
            commands::auth::register(ctx, &form).await?;
        }
        AuthCommand::Login { credentials } => {
            let form = LoginForm {
                email: credentials.email,
                password: credentials.password,
            };
            commands::auth::login(ctx, &form).await?;
        }
        AuthCommand::VerifyOtp { email, otp } => {
            commands::auth::verify_otp(ctx, &VerifyOtpForm { email, otp }).await?;
        }
        AuthCommand::ResendOtp { email } => commands::auth::resend_otp(ctx, &email).await?,
        AuthCommand::ForgotPassword { email } => {
            commands::auth::forgot_password(ctx, &email).await?
        }
        AuthCommand::ResetPassword {
            email,
            otp,
            new_password,
            confirm_password,
        } => {
            let form = ResetPasswordForm {
                email,
                otp,
                new_password,
                confirm_password,
            };
            commands::auth::reset_password(ctx, &form).await?;
        }
        AuthCommand::Me => {
            commands::auth::me(ctx).await?;
        }
        AuthCommand::Logout => commands::auth::logout(ctx).await?,
        AuthCommand::UpdateProfile { fullname, email } => {
            commands::auth::update_profile(ctx, &ProfileForm { fullname, email }).await?;
        }
        AuthCommand::ChangePassword {
            current_password,
            new_password,
            confirm_password,
        } => {
            let form = PasswordChangeForm {
                current_password,
                new_password,
                confirm_password,
            };
            commands::auth::change_password(ctx, &form).await?;
        }
        AuthCommand::DeleteAccount { yes } => {
            commands::auth::delete_account(ctx, yes).await?;
        }
    }
    Ok(())
}

async fn execute_apps(ctx: &Context, command: AppsCommand) -> anyhow::Result<()> {
    match command {
        AppsCommand::List => {
            commands::apps::list(ctx).await?;
        }
        AppsCommand::Show { id, limit } => {
            commands::apps::show(ctx, id, limit).await?;
        }
        AppsCommand::Add {
            input,
            country,
            count,
        } => {
            commands::apps::add(ctx, &input, country.as_deref(), count).await?;
        }
        AppsCommand::Update { id, name, icon_url } => {
            commands::apps::update(ctx, id, &AppEditForm { name, icon_url }).await?;
        }
        AppsCommand::Delete { id, yes } => {
            commands::apps::delete(ctx, id, yes).await?;
        }
        AppsCommand::Sync { id } => commands::apps::sync(ctx, id).await?,
        AppsCommand::Reviews { id, limit } => {
            commands::apps::reviews(ctx, id, limit).await?;
        }
        AppsCommand::Analytics { id } => {
            commands::apps::analytics(ctx, id).await?;
        }
    }
    Ok(())
}
