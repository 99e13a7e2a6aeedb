// src/cli/session.rs — login, callback, logout, status

use std::process::Command;

use crate::api::ShareTunesApi;
use crate::auth::callback::{handle_callback, CallbackOutcome, CallbackParams};

pub async fn run_login(api: &ShareTunesApi, open: bool) -> anyhow::Result<()> {
    let url = api.auth.spotify_auth_url().await?;
    println!("Sign in with Spotify:");
    println!("  {url}");
    println!();
    println!("After approving, run `sharetunes callback '<redirect URL>'` with the URL you land on.");
    if open {
        open_browser(&url);
    }
    Ok(())
}

pub fn run_callback(api: &ShareTunesApi, redirect: &str) -> anyhow::Result<()> {
    let params = if redirect.contains("://") {
        CallbackParams::from_url(redirect)?
    } else {
        CallbackParams::from_query(redirect)
    };

    let client = api.client();
    match handle_callback(&params, client.session(), client.base_url())? {
        CallbackOutcome::LoggedIn => {
            println!("Signed in. Try `sharetunes dashboard`.");
            Ok(())
        }
        CallbackOutcome::ExchangeCode { redirect } => {
            println!("The backend still has to exchange the authorization code.");
            println!("Open this URL, then run `sharetunes callback` again with the final URL:");
            println!("  {redirect}");
            Ok(())
        }
        CallbackOutcome::Denied(error) => anyhow::bail!("Authentication error: {error}"),
        CallbackOutcome::MissingParameters => {
            anyhow::bail!("The redirect carries none of the parameters needed to sign in")
        }
    }
}

pub async fn run_spotify_refresh(api: &ShareTunesApi) -> anyhow::Result<()> {
    let status = api.auth.refresh_spotify_token().await?;
    println!("{}", status.message.as_deref().unwrap_or("Spotify token refreshed"));
    if let Some(expires_at) = status.expires_at {
        println!("Valid until {}", expires_at.format("%Y-%m-%d %H:%M UTC"));
    }
    Ok(())
}

pub fn run_logout(api: &ShareTunesApi) -> anyhow::Result<()> {
    api.client().logout()?;
    println!("Signed out.");
    Ok(())
}

pub fn run_status(api: &ShareTunesApi) -> anyhow::Result<()> {
    let client = api.client();
    let session = client.session();
    println!("Backend:  {}", client.base_url());
    let state = match (session.access_token()?, session.refresh_token()?) {
        (Some(_), Some(_)) => "signed in",
        (Some(_), None) => "signed in (no refresh token; session ends when the token expires)",
        _ => "signed out",
    };
    println!("Session:  {state}");
    Ok(())
}

/// Open a URL in the user's browser. Prints a hint if that is not possible.
pub fn open_browser(url: &str) {
    let Some(mut command) = browser_command(url) else {
        eprintln!("  No known way to open a browser on this platform; open the URL above manually.");
        return;
    };
    if let Err(e) = command.spawn() {
        eprintln!("  Could not open browser automatically: {e}");
        eprintln!("  Please open the URL above manually.");
    }
}

/// Launcher for the desktop's default browser with `url` as a single argument.
fn browser_command(url: &str) -> Option<Command> {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        // `cmd /C start` would split the query string at every `&`.
        let mut command = Command::new("rundll32");
        command.arg("url.dll,FileProtocolHandler");
        command
    } else if cfg!(any(target_os = "linux", target_os = "freebsd", target_os = "openbsd")) {
        Command::new("xdg-open")
    } else {
        return None;
    };
    command.arg(url);
    Some(command)
}
