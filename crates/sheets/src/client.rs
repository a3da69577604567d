//! Workbook range client.
//!
//! All addressing is absolute: each variant occupies columns A through
//! its layout's end column, data starts at the header-offset row, and
//! the occupied length is always rediscovered by scanning column A from
//! the bottom — never taken from a stored counter. Every request runs
//! inside the single-retry refresh wrapper.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use serde_json::{json, Value};

use podsync_core::{
    codec, with_refresh, Category, Progress, Record, HEADER_OFFSET_ROW, MAX_SHEET_ROWS,
};

use crate::auth::{self, SheetsCredentials};
use crate::error::SheetsError;

// ── Constants ───────────────────────────────────────────────────────

/// Rows per range read. Independent of the remote reader's page size.
pub const READ_BATCH_ROWS: u32 = 10_000;

/// Rows per range write.
pub const WRITE_BATCH_ROWS: usize = 1_000;

/// Settle time after a range clear before the follow-up writes land.
const CLEAR_SETTLE_MS: u64 = 500;

const USER_AGENT: &str = concat!("podsync/", env!("CARGO_PKG_VERSION"));

// ── Client ──────────────────────────────────────────────────────────

/// Workbook API client (blocking).
pub struct SheetsClient {
    http: reqwest::blocking::Client,
    creds: SheetsCredentials,
    /// Where refreshed tokens are persisted; None keeps them in memory.
    creds_path: Option<PathBuf>,
}

impl SheetsClient {
    /// Create a client using saved credentials.
    pub fn from_saved_auth() -> Result<Self, SheetsError> {
        let path = auth::credentials_file_path().ok_or(SheetsError::NotAuthenticated)?;
        let creds = auth::load_credentials().ok_or(SheetsError::NotAuthenticated)?;
        let mut client = Self::new(creds);
        client.creds_path = Some(path);
        Ok(client)
    }

    /// Create a client with explicit credentials (not persisted).
    pub fn new(creds: SheetsCredentials) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build HTTP client");

        Self { http, creds, creds_path: None }
    }

    // ── Row store operations ────────────────────────────────────────

    /// Last occupied row of the sheet, by scanning column A upward from
    /// the theoretical maximum. Floored at the header-offset row, so an
    /// empty sheet reports row 4. Read failure is an error — a store
    /// that cannot be sized must never feed an overwrite.
    pub fn last_occupied_row(&mut self, sheet: &str) -> Result<u32, SheetsError> {
        let address = format!("A1:A{MAX_SHEET_ROWS}");
        let url = self.range_url(sheet, &address, true);
        let body = with_refresh(self, |c| c.get_json(&url), Self::refresh_credentials)?;

        let values = body["values"]
            .as_array()
            .ok_or_else(|| SheetsError::Parse("range response missing values".into()))?;

        Ok(last_data_row(values).max(HEADER_OFFSET_ROW))
    }

    /// Read the full occupied region in fixed-size row batches and
    /// decode it. Rows whose identity cell is empty are dropped.
    pub fn read_records(
        &mut self,
        sheet: &str,
        category: Category,
        progress: &mut Progress,
    ) -> Result<Vec<Record>, SheetsError> {
        let total = self.last_occupied_row(sheet)?;
        let batches = ((total + READ_BATCH_ROWS - 1) / READ_BATCH_ROWS) as usize;

        let mut raw: Vec<Vec<Value>> = Vec::new();
        for i in 0..batches {
            let start = i as u32 * READ_BATCH_ROWS + HEADER_OFFSET_ROW;
            if start > total {
                break;
            }
            let end = (start + READ_BATCH_ROWS - 1).min(total);
            let address = range_address(category, start, end);
            let url = self.range_url(sheet, &address, true);

            let body = with_refresh(self, |c| c.get_json(&url), Self::refresh_credentials)?;
            if let Some(rows) = body["values"].as_array() {
                for row in rows {
                    if let Some(cells) = row.as_array() {
                        raw.push(cells.clone());
                    }
                }
            }
            progress.update(i + 1, batches);
        }

        Ok(raw
            .iter()
            .filter_map(|row| codec::decode_row(category, row))
            .collect())
    }

    /// Encode and write records starting at `start_row`, one PATCH per
    /// row batch. Not transactional: a mid-batch failure leaves earlier
    /// batches committed. Returns the number of rows written.
    pub fn write_records(
        &mut self,
        sheet: &str,
        category: Category,
        start_row: u32,
        records: &[Record],
        progress: &mut Progress,
    ) -> Result<usize, SheetsError> {
        if records.is_empty() {
            return Ok(0);
        }

        let batches = (records.len() + WRITE_BATCH_ROWS - 1) / WRITE_BATCH_ROWS;
        for (i, chunk) in records.chunks(WRITE_BATCH_ROWS).enumerate() {
            let start = start_row + (i * WRITE_BATCH_ROWS) as u32;
            let end = start + chunk.len() as u32 - 1;
            let address = range_address(category, start, end);
            let url = self.range_url(sheet, &address, false);

            let values: Vec<Vec<Value>> = chunk.iter().map(codec::encode_row).collect();
            let body = json!({ "values": values });

            with_refresh(self, |c| c.patch_json(&url, &body), Self::refresh_credentials)?;
            progress.update(i + 1, batches);
        }

        Ok(records.len())
    }

    /// Blank the rectangular region `A{start_row}:{end_col}{end_row}`.
    pub fn clear_range(
        &mut self,
        sheet: &str,
        category: Category,
        start_row: u32,
        end_row: u32,
    ) -> Result<(), SheetsError> {
        let address = range_address(category, start_row, end_row);
        let url = format!("{}/clear", self.range_url(sheet, &address, false));

        with_refresh(self, |c| c.post_json(&url, &json!({})), Self::refresh_credentials)?;

        // The workbook session applies clears asynchronously; give it a
        // beat before the follow-up writes land on the same region.
        thread::sleep(Duration::from_millis(CLEAR_SETTLE_MS));
        Ok(())
    }

    /// Names of all worksheets in the workbook, for the caller's sheet
    /// selector.
    pub fn list_worksheets(&mut self) -> Result<Vec<String>, SheetsError> {
        let url = format!(
            "{}/me/drive/items/{}/workbook/worksheets",
            self.creds.api_base, self.creds.file_id,
        );
        let body = with_refresh(self, |c| c.get_json(&url), Self::refresh_credentials)?;

        let names = body["value"]
            .as_array()
            .ok_or_else(|| SheetsError::Parse("worksheet list missing value array".into()))?
            .iter()
            .filter_map(|w| w["name"].as_str().map(String::from))
            .collect();
        Ok(names)
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn range_url(&self, sheet: &str, address: &str, values_only: bool) -> String {
        let mut url = format!(
            "{}/me/drive/items/{}/workbook/worksheets('{}')/range(address='{}')",
            self.creds.api_base, self.creds.file_id, sheet, address,
        );
        if values_only {
            url.push_str("?valuesOnly=true");
        }
        url
    }

    fn refresh_credentials(&mut self) -> Result<(), SheetsError> {
        let (access, rotated) = auth::refresh_access_token(&self.http, &self.creds)?;
        self.creds.access_token = access;
        if let Some(rt) = rotated {
            self.creds.refresh_token = rt;
        }
        if let Some(ref path) = self.creds_path {
            if let Err(e) = auth::save_credentials(&self.creds, path) {
                eprintln!("warning: could not persist refreshed workbook token: {e}");
            }
        }
        Ok(())
    }

    fn get_json(&self, url: &str) -> Result<Value, SheetsError> {
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.creds.access_token)
            .send()
            .map_err(|e| SheetsError::Network(e.to_string()))?;
        Self::json_body(resp)
    }

    fn patch_json(&self, url: &str, body: &Value) -> Result<Value, SheetsError> {
        let resp = self
            .http
            .patch(url)
            .bearer_auth(&self.creds.access_token)
            .json(body)
            .send()
            .map_err(|e| SheetsError::Network(e.to_string()))?;
        Self::json_body(resp)
    }

    fn post_json(&self, url: &str, body: &Value) -> Result<Value, SheetsError> {
        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.creds.access_token)
            .json(body)
            .send()
            .map_err(|e| SheetsError::Network(e.to_string()))?;
        Self::json_body(resp)
    }

    fn json_body(resp: reqwest::blocking::Response) -> Result<Value, SheetsError> {
        let status = resp.status().as_u16();
        if status == 401 {
            let body = resp.text().unwrap_or_default();
            return Err(SheetsError::AuthExpired(truncate(&body)));
        }
        if !(200..300).contains(&status) {
            let body = resp.text().unwrap_or_default();
            return Err(SheetsError::Http(status, truncate(&body)));
        }
        if resp.content_length() == Some(0) {
            return Ok(Value::Null);
        }
        let text = resp
            .text()
            .map_err(|e| SheetsError::Network(format!("failed to read response body: {e}")))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| SheetsError::Parse(e.to_string()))
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(200).collect()
}

// ── Free helpers ────────────────────────────────────────────────────

/// Range address for a variant's full column span.
pub fn range_address(category: Category, start_row: u32, end_row: u32) -> String {
    format!("A{start_row}:{}{end_row}", category.layout().end_col)
}

/// Index (1-based row) of the last row whose first cell is non-empty.
/// Returns 0 when every scanned cell is empty.
fn last_data_row(values: &[Value]) -> u32 {
    for (i, row) in values.iter().enumerate().rev() {
        let first = row.as_array().and_then(|cells| cells.first());
        match first {
            Some(Value::Null) | None => continue,
            Some(Value::String(s)) if s.trim().is_empty() => continue,
            Some(_) => return (i + 1) as u32,
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_range_address_per_variant() {
        assert_eq!(range_address(Category::Episode, 4, 13), "A4:K13");
        assert_eq!(range_address(Category::Channel, 4, 4), "A4:L4");
        assert_eq!(range_address(Category::Curation, 10, 250), "A10:V250");
    }

    #[test]
    fn test_last_data_row_scans_from_bottom() {
        let values = vec![
            json!(["header"]),
            json!(["id"]),
            json!([""]),
            json!([17]),
            json!([""]),
            json!([null]),
        ];
        assert_eq!(last_data_row(&values), 4);
    }

    #[test]
    fn test_last_data_row_all_empty() {
        let values = vec![json!([""]), json!([null]), json!([])];
        assert_eq!(last_data_row(&values), 0);
    }

    #[test]
    fn test_last_data_row_number_cell_counts() {
        let values = vec![json!([0])];
        assert_eq!(last_data_row(&values), 1);
    }
}
