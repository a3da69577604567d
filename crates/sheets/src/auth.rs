//! Workbook credential storage and refresh.
//!
//! Reads/writes ~/.config/podsync/sheets.json (0600 on Unix). The file
//! holds the bearer token pair plus the OAuth token endpoint used to
//! mint a new access token when the old one expires mid-sync.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SheetsError;

fn default_api_base() -> String {
    "https://graph.microsoft.com/v1.0".to_string()
}

/// Workbook API credentials stored locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsCredentials {
    /// Bearer token for workbook requests.
    pub access_token: String,
    /// Long-lived token exchanged for a new access token on expiry.
    pub refresh_token: String,
    /// OAuth client id presented on refresh.
    pub client_id: String,
    /// Token endpoint for the refresh-token grant.
    pub token_url: String,
    /// Workbook API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Drive item id of the fixed workbook.
    pub file_id: String,
}

/// Returns the path to the credentials file.
pub fn credentials_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|c| c.join("podsync/sheets.json"))
}

/// Load saved credentials from the default location.
/// Returns None if no credentials are saved or the file is invalid.
pub fn load_credentials() -> Option<SheetsCredentials> {
    load_credentials_from(&credentials_file_path()?)
}

pub fn load_credentials_from(path: &Path) -> Option<SheetsCredentials> {
    let contents = std::fs::read_to_string(path).ok()?;
    warn_if_world_readable(path);
    serde_json::from_str(&contents).ok()
}

/// Save credentials, creating the parent directory if needed.
/// Sets 0600 permissions on Unix.
pub fn save_credentials(creds: &SheetsCredentials, path: &Path) -> Result<(), String> {
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

#[cfg(unix)]
fn warn_if_world_readable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Ok(meta) = std::fs::metadata(path) {
        let mode = meta.permissions().mode();
        if mode & 0o077 != 0 {
            eprintln!(
                "warning: credentials file {} is accessible by others (mode {:o}), consider chmod 600",
                path.display(),
                mode & 0o777,
            );
        }
    }
}

#[cfg(not(unix))]
fn warn_if_world_readable(_path: &Path) {}

/// Exchange the refresh token for a new access token.
///
/// Returns the new access token plus the rotated refresh token when the
/// endpoint issues one. A rejected refresh token is fatal — there is no
/// further fallback.
pub fn refresh_access_token(
    http: &reqwest::blocking::Client,
    creds: &SheetsCredentials,
) -> Result<(String, Option<String>), SheetsError> {
    let resp = http
        .post(&creds.token_url)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(format!(
            "grant_type=refresh_token&client_id={}&refresh_token={}",
            creds.client_id, creds.refresh_token,
        ))
        .send()
        .map_err(|e| SheetsError::AuthFatal(format!("token refresh request failed: {e}")))?;

    let status = resp.status().as_u16();
    if status != 200 {
        let body: serde_json::Value = resp.json().unwrap_or(serde_json::Value::Null);
        let msg = body["error_description"]
            .as_str()
            .or_else(|| body["error"].as_str())
            .unwrap_or("unknown error");
        return Err(SheetsError::AuthFatal(format!(
            "token refresh rejected ({status}): {msg}"
        )));
    }

    let body: serde_json::Value = resp
        .json()
        .map_err(|e| SheetsError::AuthFatal(format!("token refresh response invalid: {e}")))?;

    let access = body["access_token"]
        .as_str()
        .ok_or_else(|| {
            SheetsError::AuthFatal("token refresh response missing access_token".into())
        })?
        .to_string();
    let rotated = body["refresh_token"].as_str().map(String::from);

    Ok((access, rotated))
}
