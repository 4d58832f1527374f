//! Sign in and out.

use secrecy::SecretString;
use tokio::io::{AsyncBufReadExt, BufReader};

use shopfront_storefront::api::Credentials;
use shopfront_storefront::state::AppState;

use super::CliError;
use crate::output;

const PASSWORD_VAR: &str = "SHOPFRONT_PASSWORD";

async fn read_password() -> Result<SecretString, CliError> {
    if let Ok(password) = std::env::var(PASSWORD_VAR) {
        return Ok(SecretString::from(password));
    }
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .map_err(|source| CliError::Read {
            what: "password from stdin".to_string(),
            source,
        })?;
    Ok(SecretString::from(line.trim_end_matches(['\r', '\n']).to_string()))
}

pub async fn login(state: &AppState, email: String, admin: bool) -> Result<(), CliError> {
    let credentials = Credentials {
        email,
        password: read_password().await?,
    };
    let profile = if admin {
        state.admin_login(&credentials).await?
    } else {
        state.login(&credentials).await?
    };
    output::message(&format!("Signed in as {}.", profile.display_name()));
    Ok(())
}

pub async fn logout(state: &AppState) -> Result<(), CliError> {
    match state.logout().await? {
        Some(profile) => output::message(&format!("Signed out {}.", profile.email)),
        None => output::message("Nobody was signed in."),
    }
    Ok(())
}
