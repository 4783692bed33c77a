//! Login, registration and profile management.

use std::path::Path;

use anyhow::Context as _;
use clap::Subcommand;
use petmap_app::Notice;
use petmap_client::{ApiClient, ClientError};

/// Sub-commands available under `profile`. All require `PETMAP_TOKEN`.
#[derive(Debug, Subcommand)]
pub enum ProfileCommands {
    /// Show the logged-in account
    Show,
    /// Change the display nickname
    Nickname { nickname: String },
    /// Change the account password
    Password {
        #[arg(long, env = "PETMAP_CURRENT_PASSWORD", hide_env_values = true)]
        current: String,
        #[arg(long, env = "PETMAP_NEW_PASSWORD", hide_env_values = true)]
        new: String,
    },
    /// Upload a profile picture
    Upload { path: std::path::PathBuf },
}

/// Turns an auth failure into the login prompt; other errors pass through.
fn login_hint(error: ClientError) -> anyhow::Error {
    if error.is_auth_failure() {
        anyhow::anyhow!("{} ({error})", Notice::AuthRequired.message())
    } else {
        error.into()
    }
}

pub(crate) async fn run_login(
    client: &ApiClient,
    username: &str,
    password: &str,
) -> anyhow::Result<()> {
    let token = client.login(username, password).await?;
    eprintln!("logged in as {username}; export PETMAP_TOKEN to stay logged in");
    println!("{token}");
    Ok(())
}

pub(crate) async fn run_register(
    client: &ApiClient,
    username: &str,
    password: &str,
) -> anyhow::Result<()> {
    let message = client.register(username, password).await?;
    println!("{message}");
    Ok(())
}

pub(crate) async fn run_profile(
    client: &ApiClient,
    command: ProfileCommands,
    json: bool,
) -> anyhow::Result<()> {
    match command {
        ProfileCommands::Show => {
            let profile = client.profile().await.map_err(login_hint)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                println!("username: {}", profile.username);
                println!("nickname: {}", profile.nickname.as_deref().unwrap_or("-"));
                if let Some(url) = &profile.profile_url {
                    println!("picture:  {url}");
                }
                println!("favorites: {}", profile.favorite_hospitals.len());
            }
        }
        ProfileCommands::Nickname { nickname } => {
            client.update_nickname(&nickname).await.map_err(login_hint)?;
            println!("nickname updated");
        }
        ProfileCommands::Password { current, new } => {
            client
                .change_password(&current, &new)
                .await
                .map_err(login_hint)?;
            println!("password changed");
        }
        ProfileCommands::Upload { path } => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("profile")
                .to_string();
            let response = client
                .upload_profile_picture(&file_name, bytes, mime_for(&path))
                .await
                .map_err(login_hint)?;
            match response.profile_url.or(response.message) {
                Some(text) => println!("{text}"),
                None => println!("uploaded"),
            }
        }
    }
    Ok(())
}

pub(crate) fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
