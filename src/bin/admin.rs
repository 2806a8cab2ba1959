//! CLI administration tool for ogp-shortener.
//!
//! Manages users and API tokens, shows statistics and runs database checks
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a user (page owner)
//! cargo run --bin admin -- user create --name "Ann" --email ann@example.com
//!
//! # Issue an API token for that user
//! cargo run --bin admin -- token create --email ann@example.com --name "Laptop"
//!
//! # List / revoke tokens
//! cargo run --bin admin -- token list
//! cargo run --bin admin -- token revoke "Laptop"
//!
//! # View statistics, optionally for one slug
//! cargo run --bin admin -- stats
//! cargo run --bin admin -- stats --slug abc123
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `TOKEN_SIGNING_SECRET` (required for `token create`): must match the server's

use ogp_shortener::application::services::hash_token;
use ogp_shortener::domain::repositories::{PageRepository, PageViewRepository, TokenRepository};
use ogp_shortener::infrastructure::persistence::{
    PgPageRepository, PgPageViewRepository, PgTokenRepository,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing ogp-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show statistics
    Stats {
        /// Count views for a single slug
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a user
    Create {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token for a user
    Create {
        /// Email of the owning user
        #[arg(short, long)]
        email: Option<String>,

        /// Token name (e.g., "Production API", "Laptop")
        #[arg(short, long)]
        name: Option<String>,

        /// Custom token value (optional, auto-generated if not provided)
        #[arg(short, long)]
        token: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token name or ID to revoke
        name_or_id: String,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;
    let pool = Arc::new(pool);

    match cli.command {
        Commands::User { action } => handle_user_action(action, pool).await?,
        Commands::Token { action } => handle_token_action(action, pool).await?,
        Commands::Stats { slug } => handle_stats(pool, slug).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, pool: Arc<PgPool>) -> Result<()> {
    let repo = PgTokenRepository::new(pool);

    match action {
        UserAction::Create { name, email } => {
            println!("{}", "Create user".bright_blue().bold());
            println!();

            let name = match name {
                Some(n) => n,
                None => Input::new().with_prompt("Name").interact_text()?,
            };
            let email = match email {
                Some(e) => e,
                None => Input::new().with_prompt("Email").interact_text()?,
            };

            let user = repo
                .create_user(&name, &email)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

            println!(
                "{} {} <{}> (id {})",
                "Created".green().bold(),
                user.name.cyan(),
                user.email,
                user.id.to_string().bright_black()
            );
        }
    }

    Ok(())
}

async fn handle_token_action(action: TokenAction, pool: Arc<PgPool>) -> Result<()> {
    let repo = PgTokenRepository::new(pool);

    match action {
        TokenAction::Create {
            email,
            name,
            token,
            yes,
        } => create_token(&repo, email, name, token, yes).await?,
        TokenAction::List => list_tokens(&repo).await?,
        TokenAction::Revoke { name_or_id } => revoke_token(&repo, name_or_id).await?,
    }

    Ok(())
}

/// Creates a new API token for a user with interactive prompts.
///
/// Only the HMAC-SHA256 hash (keyed by `TOKEN_SIGNING_SECRET`) is stored.
/// The raw token is printed once and cannot be retrieved later.
async fn create_token(
    repo: &PgTokenRepository,
    email: Option<String>,
    name: Option<String>,
    token: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "Create API token".bright_blue().bold());
    println!();

    let signing_secret = std::env::var("TOKEN_SIGNING_SECRET")
        .context("TOKEN_SIGNING_SECRET must be set to issue tokens")?;
    if signing_secret.is_empty() {
        anyhow::bail!("TOKEN_SIGNING_SECRET must not be empty");
    }

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Owner email").interact_text()?,
    };

    let user = repo
        .find_user_by_email(&email)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("No user with email {email}"))?;

    let token_name = match name {
        Some(n) => n,
        None => Input::new()
            .with_prompt("Token name")
            .with_initial_text("Production API")
            .interact_text()?,
    };

    let token_value = match token {
        Some(t) => {
            println!("{}", "Using provided token value".yellow());
            t
        }
        None => generate_token(),
    };

    println!();
    println!("{}", "Token details:".bright_white().bold());
    println!("  Owner: {} <{}>", user.name.cyan(), user.email);
    println!("  Name:  {}", token_name.cyan());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let token_hash = hash_token(&signing_secret, &token_value);

    repo.create_token(user.id, &token_name, &token_hash)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create token: {}", e))?;

    println!("{}", "Token created.".green().bold());
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" -d '{{\"url\":\"https://example.com\"}}' \\",
        token_value.bright_yellow()
    );
    println!("       -H 'Content-Type: application/json' http://localhost:3000/api/pages");
    println!();

    Ok(())
}

async fn list_tokens(repo: &PgTokenRepository) -> Result<()> {
    println!("{}", "API tokens".bright_blue().bold());
    println!();

    let tokens = repo
        .list_tokens()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tokens: {}", e))?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<6} {:<30} {:<20} {:<10}",
        "ID".bright_white().bold(),
        "User".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "-".repeat(75).bright_black());

    for token in &tokens {
        let status = if token.revoked_at.is_some() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };

        println!(
            "  {:<5} {:<6} {:<30} {:<20} {}",
            token.id.to_string().bright_black(),
            token.user_id.to_string().bright_black(),
            token.name.cyan(),
            token
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            status
        );
    }

    println!();
    println!("  Total: {}", tokens.len().to_string().bright_white().bold());

    Ok(())
}

/// Revokes a token by name or numeric id after confirmation.
async fn revoke_token(repo: &PgTokenRepository, name_or_id: String) -> Result<()> {
    let token = match name_or_id.parse::<i64>() {
        Ok(id) => repo.find_by_id(id).await,
        Err(_) => repo.find_by_name(&name_or_id).await,
    }
    .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
    .context("Token not found")?;

    if token.revoked_at.is_some() {
        println!("{}", "This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Token: {}", token.name.cyan());
    println!("  ID:    {}", token.id.to_string().bright_black());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "Cancelled".red());
        return Ok(());
    }

    repo.revoke_token(token.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke token: {}", e))?;

    println!("{}", "Token revoked.".green().bold());

    Ok(())
}

/// Shows page, page view and active token counts.
async fn handle_stats(pool: Arc<PgPool>, slug: Option<String>) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let pages = PgPageRepository::new(pool.clone());
    let views = PgPageViewRepository::new(pool.clone());

    let pages_count = pages
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count pages: {}", e))?;

    let views_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM page_views")
        .fetch_one(pool.as_ref())
        .await?;

    let tokens_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
            .fetch_one(pool.as_ref())
            .await?;

    println!("  Pages:         {}", pages_count.to_string().bright_green().bold());
    println!("  Page views:    {}", views_count.to_string().bright_green().bold());
    println!("  Active tokens: {}", tokens_count.to_string().bright_green().bold());

    if let Some(slug) = slug {
        let slug_views = views
            .count_by_slug(&slug)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to count views: {}", e))?;
        println!(
            "  Views of /{}: {}",
            slug.cyan(),
            slug_views.to_string().bright_green().bold()
        );
    }
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

/// Generates a random 48-character alphanumeric token (~286 bits of entropy).
fn generate_token() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const TOKEN_LEN: usize = 48;

    let mut rng = rand::rng();

    (0..TOKEN_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}
