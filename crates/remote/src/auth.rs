//! Admin API credential storage and refresh.
//!
//! Reads/writes ~/.config/podsync/admin.json (0600 on Unix). Refresh is
//! the API's own exchange: POST /admin/refresh with the refresh token,
//! yielding a new access token.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::RemoteError;

/// Admin API credentials stored locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredentials {
    /// Bearer token for admin API requests.
    pub access_token: String,
    /// Token exchanged for a new access token on expiry.
    pub refresh_token: String,
    /// API base URL (e.g., "https://pickle.obigo.ai").
    pub api_base: String,
}

/// Returns the path to the credentials file.
pub fn credentials_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|c| c.join("podsync/admin.json"))
}

/// Load saved credentials from the default location.
/// Returns None if no credentials are saved or the file is invalid.
pub fn load_credentials() -> Option<AdminCredentials> {
    load_credentials_from(&credentials_file_path()?)
}

pub fn load_credentials_from(path: &Path) -> Option<AdminCredentials> {
    let contents = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Save credentials, creating the parent directory if needed.
/// Sets 0600 permissions on Unix.
pub fn save_credentials(creds: &AdminCredentials, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("failed to create config directory: {e}"))?;
    }

    let contents = serde_json::to_string_pretty(creds)
        .map_err(|e| format!("failed to serialize credentials: {e}"))?;

    std::fs::write(path, &contents)
        .map_err(|e| format!("failed to write credentials file: {e}"))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)
            .map_err(|e| format!("failed to set file permissions: {e}"))?;
    }

    Ok(())
}

/// Exchange the refresh token for a new access token.
///
/// A rejected refresh token is fatal — the operator has to log in again.
pub fn refresh_access_token(
    http: &reqwest::blocking::Client,
    creds: &AdminCredentials,
) -> Result<String, RemoteError> {
    let url = format!("{}/admin/refresh", creds.api_base);
    let resp = http
        .post(&url)
        .json(&serde_json::json!({ "refreshToken": creds.refresh_token }))
        .send()
        .map_err(|e| RemoteError::AuthFatal(format!("token refresh request failed: {e}")))?;

    let status = resp.status().as_u16();
    if status != 200 {
        let body = resp.text().unwrap_or_default();
        let snippet: String = body.chars().take(200).collect();
        return Err(RemoteError::AuthFatal(format!(
            "token refresh rejected ({status}): {snippet}"
        )));
    }

    let body: serde_json::Value = resp
        .json()
        .map_err(|e| RemoteError::AuthFatal(format!("token refresh response invalid: {e}")))?;

    body["data"]["accessToken"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| {
            RemoteError::AuthFatal("token refresh response missing accessToken".into())
        })
}
