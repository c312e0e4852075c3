//! OAuth2 authentication for Box.
//!
//! Implements the authorization-code flow:
//!   1. Build an authorization URL for the user.
//!   2. Exchange the code the user brings back for a token.
//!
//! Callers that already hold an access token can skip both steps with
//! [`BoxClient::set_access_token`]. Tokens are never refreshed here.

use chrono::{Duration, Utc};
use log::{debug, info};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::client::BoxClient;
use crate::error::{BoxError, BoxResult};
use crate::types::{BoxConfig, OAuthToken, TokenResponse};

/// Build the Box authorization URL that the user should open.
pub fn build_auth_url(config: &BoxConfig, state: Option<&str>) -> BoxResult<String> {
    let credentials = &config.credentials;
    if credentials.client_id.is_empty() {
        return Err(BoxError::invalid("client_id is required"));
    }

    let mut params = vec![
        ("response_type", "code"),
        ("client_id", credentials.client_id.as_str()),
    ];
    if let Some(ref redirect) = credentials.redirect_uri {
        params.push(("redirect_uri", redirect.as_str()));
    }
    if let Some(state) = state {
        params.push(("state", state));
    }

    let url = url::Url::parse_with_params(&config.auth_url, &params)
        .map_err(|e| BoxError::invalid(format!("Failed to build auth URL: {e}")))?;

    Ok(url.to_string())
}

/// Exchange an authorization code for a token.
pub async fn exchange_code(client: &BoxClient, code: &str) -> BoxResult<OAuthToken> {
    let code = code.trim();
    if code.is_empty() {
        return Err(BoxError::invalid("Authorization code is empty"));
    }

    let credentials = &client.config().credentials;
    if credentials.client_id.is_empty() || credentials.client_secret.is_empty() {
        return Err(BoxError::invalid(
            "client_id and client_secret are required to exchange a code",
        ));
    }

    debug!("Exchanging authorization code for tokens");
    let mut params = vec![
        ("grant_type", "authorization_code"),
        ("code", code),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
    ];
    if let Some(ref redirect) = credentials.redirect_uri {
        params.push(("redirect_uri", redirect.as_str()));
    }

    let resp: TokenResponse = client
        .post_form_unauthenticated(&client.config().token_url, &params)
        .await?;
    token_from_response(resp)
}

/// Interactive flow: print the authorization URL, read the code the user
/// pastes back, exchange it and install the token on `client`.
pub async fn authorize_interactive<R, W>(
    client: &mut BoxClient,
    input: &mut R,
    output: &mut W,
) -> BoxResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let url = build_auth_url(client.config(), None)?;
    output
        .write_all(format!("Please visit:\n{url}\nEnter the code: ").as_bytes())
        .await?;
    output.flush().await?;

    let mut line = String::new();
    input.read_line(&mut line).await?;

    let token = exchange_code(client, &line).await?;
    client.set_token(token);
    info!("Box authorization complete for '{}'", client.config().name);
    Ok(())
}

/// Convert the raw token response to our token type.
///
/// Box only issues bearer tokens; anything else cannot be sent in the
/// `Authorization: Bearer` header and is rejected. An `expires_in` that
/// does not fit a timestamp is treated as no expiry.
fn token_from_response(resp: TokenResponse) -> BoxResult<OAuthToken> {
    if let Some(ref kind) = resp.token_type {
        if !kind.eq_ignore_ascii_case("bearer") {
            return Err(BoxError::unexpected(format!(
                "Unsupported token type '{kind}'"
            )));
        }
    }
    let expires_at = resp
        .expires_in
        .and_then(Duration::try_seconds)
        .and_then(|d| Utc::now().checked_add_signed(d));
    Ok(OAuthToken {
        access_token: resp.access_token,
        refresh_token: resp.refresh_token,
        // Box answers "bearer"; the header needs "Bearer".
        token_type: "Bearer".into(),
        expires_at,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
