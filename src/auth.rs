//! OAuth2 authentication for the Gmail API

use google_gmail1::{hyper_rustls, hyper_util, yup_oauth2, Gmail};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{GmailError, Result};

/// Read-only scope; listing and fetching never modify the mailbox
pub const READONLY_SCOPES: &[&str] = &["https://www.googleapis.com/auth/gmail.readonly"];

/// Type alias for Gmail Hub to simplify type signatures
pub type GmailHub = Gmail<hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>>;

/// Pick the installed-app flow used when no cached token is available.
///
/// The console flow prints the authorization URL and reads the code from
/// stdin; the redirect flow catches the code on a local HTTP listener.
pub fn return_method(redirect_flow: bool) -> yup_oauth2::InstalledFlowReturnMethod {
    if redirect_flow {
        yup_oauth2::InstalledFlowReturnMethod::HTTPRedirect
    } else {
        yup_oauth2::InstalledFlowReturnMethod::Interactive
    }
}

/// Initialize Gmail API hub with OAuth2 authentication
///
/// A token cached at `token_cache_path` is reused (and refreshed by the
/// library when it expires). Otherwise the installed-app flow runs once and
/// the resulting token is written to the cache, readable only by the owner.
///
/// # Arguments
/// * `credentials_path` - Path to the OAuth2 client secret JSON file
/// * `token_cache_path` - Path where access tokens will be cached
/// * `redirect_flow` - Use the local redirect flow instead of the console flow
pub async fn initialize_gmail_hub(
    credentials_path: &Path,
    token_cache_path: &Path,
    redirect_flow: bool,
) -> Result<GmailHub> {
    let secret = yup_oauth2::read_application_secret(credentials_path)
        .await
        .map_err(|e| {
            GmailError::AuthError(format!(
                "Unable to read client secret file {:?}: {}",
                credentials_path, e
            ))
        })?;

    if discard_unreadable_token_cache(token_cache_path).await? {
        info!("Starting authorization flow to replace the unreadable token cache");
    } else if token_cache_path.exists() {
        debug!("Using cached token from {:?}", token_cache_path);
    } else {
        info!("No cached token at {:?}, starting authorization flow", token_cache_path);
    }

    let auth = yup_oauth2::InstalledFlowAuthenticator::builder(secret, return_method(redirect_flow))
        .persist_tokens_to_disk(token_cache_path)
        .build()
        .await
        .map_err(|e| GmailError::AuthError(format!("Failed to build authenticator: {}", e)))?;

    // Obtain the token now so the cache is written with the read-only scope
    auth.token(READONLY_SCOPES)
        .await
        .map_err(|e| GmailError::AuthError(format!("Unable to retrieve token: {}", e)))?;

    if token_cache_path.exists() {
        secure_token_file(token_cache_path).await?;
    }

    let client = hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new())
        .build(
            hyper_rustls::HttpsConnectorBuilder::new()
                .with_native_roots()
                .map_err(|e| {
                    GmailError::AuthError(format!("Failed to load TLS roots: {}", e))
                })?
                .https_or_http()
                .enable_http1()
                .build(),
        );

    Ok(Gmail::new(client, auth))
}

/// Remove a token cache that does not parse, so the installed flow can
/// write a fresh one instead of the authenticator failing on load.
///
/// Returns `true` when a file was removed.
pub async fn discard_unreadable_token_cache(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }

    let content = tokio::fs::read_to_string(path).await?;

    // yup-oauth2 stores a JSON array of scoped tokens
    match serde_json::from_str::<Vec<serde_json::Value>>(&content) {
        Ok(_) => Ok(false),
        Err(e) => {
            warn!(
                "Token cache {:?} is unreadable ({}), discarding it and re-authorizing",
                path, e
            );
            tokio::fs::remove_file(path).await?;
            Ok(true)
        }
    }
}

/// Restrict the token file to read/write for its owner (0600)
#[cfg(unix)]
pub async fn secure_token_file(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(0o600);
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

/// Windows relies on the user profile ACLs
#[cfg(windows)]
pub async fn secure_token_file(_path: &Path) -> Result<()> {
    Ok(())
}
