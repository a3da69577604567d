//! Paginated dataset reader.
//!
//! Page requests run strictly in sequence; the cancellation token is
//! checked at the top of every page iteration and nowhere else. A fetch
//! that fails for any non-auth reason yields an empty result set (the
//! caller observes zero new records) instead of an error — degraded but
//! safe, since the delta calculator treats an empty remote as "nothing
//! new" in every workflow.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;

use podsync_core::{
    codec, timestamp, with_refresh, CancelToken, Category, CurationEntry, Progress, Record,
};

use crate::auth::{self, AdminCredentials};
use crate::error::RemoteError;

// ── Constants ───────────────────────────────────────────────────────

/// Page size for episode and channel list requests.
pub const PAGE_SIZE: u32 = 1_000;

/// Page size for curation list requests (each row fans out into a
/// detail request, so pages are kept small).
pub const CURATION_PAGE_SIZE: u32 = 100;

const USER_AGENT: &str = concat!("podsync/", env!("CARGO_PKG_VERSION"));

// ── Client ──────────────────────────────────────────────────────────

/// Curation list rows are summaries; the full entry set comes from the
/// per-curation detail endpoint.
#[derive(Debug, Clone)]
struct CurationSummary {
    curation_id: i64,
    created_at: String,
}

/// Admin API client (blocking).
pub struct RemoteClient {
    http: reqwest::blocking::Client,
    creds: AdminCredentials,
    /// Where refreshed tokens are persisted; None keeps them in memory.
    creds_path: Option<PathBuf>,
}

impl RemoteClient {
    /// Create a client using saved credentials.
    pub fn from_saved_auth() -> Result<Self, RemoteError> {
        let path = auth::credentials_file_path().ok_or(RemoteError::NotAuthenticated)?;
        let creds = auth::load_credentials().ok_or(RemoteError::NotAuthenticated)?;
        let mut client = Self::new(creds);
        client.creds_path = Some(path);
        Ok(client)
    }

    /// Create a client with explicit credentials (not persisted).
    pub fn new(creds: AdminCredentials) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to build HTTP client");

        Self { http, creds, creds_path: None }
    }

    /// Fixed page size for a category's list requests.
    pub fn page_size(category: Category) -> u32 {
        match category {
            Category::Episode | Category::Channel => PAGE_SIZE,
            Category::Curation => CURATION_PAGE_SIZE,
        }
    }

    // ── Page-level contract ─────────────────────────────────────────

    /// Fetch one page of records plus the dataset's total count.
    ///
    /// Pages are 1-based. For curations this expands every summary on
    /// the page through the detail endpoint, so the returned records
    /// are full entries for all three categories.
    pub fn fetch_page(
        &mut self,
        category: Category,
        page: u32,
        size: u32,
    ) -> Result<(Vec<Record>, u64), RemoteError> {
        match category {
            Category::Episode | Category::Channel => {
                let (items, total) = self.fetch_list_page(category, page, size)?;
                let records = items
                    .iter()
                    .map(|item| Record::from_api(category, item))
                    .collect();
                Ok((records, total))
            }
            Category::Curation => {
                let (summaries, total) = self.fetch_curation_list(page, size)?;
                let mut records = Vec::new();
                for summary in &summaries {
                    let entries = self.fetch_curation_detail(summary.curation_id)?;
                    records.extend(entries.into_iter().map(Record::Curation));
                }
                Ok((records, total))
            }
        }
    }

    /// Fetch the entire dataset across sequential pages.
    ///
    /// Progress is reported after each page, proportional to the page
    /// count. Non-auth failures degrade to an empty result (logged).
    pub fn fetch_all(
        &mut self,
        category: Category,
        progress: &mut Progress,
        cancel: &CancelToken,
    ) -> Result<Vec<Record>, RemoteError> {
        match self.fetch_all_inner(category, progress, cancel) {
            Err(e) if e.is_degradable() => {
                eprintln!("warning: {category} fetch failed, treating as empty: {e}");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Fetch the dataset tail newer than `latest`.
    ///
    /// Only curations stop early — their list comes newest-first, so
    /// paging can stop once a page opens at or before `latest`. Episode
    /// and channel identities are ids, not times; their incremental
    /// path fetches everything and filters afterwards. The early stop
    /// is an optimization only: the delta calculator still filters by
    /// timestamp downstream.
    pub fn fetch_since(
        &mut self,
        category: Category,
        latest: Option<DateTime<Utc>>,
        progress: &mut Progress,
        cancel: &CancelToken,
    ) -> Result<Vec<Record>, RemoteError> {
        match category {
            Category::Episode | Category::Channel => self.fetch_all(category, progress, cancel),
            Category::Curation => {
                match self.fetch_curation_since_inner(latest, progress, cancel) {
                    Err(e) if e.is_degradable() => {
                        eprintln!("warning: curation fetch failed, treating as empty: {e}");
                        Ok(Vec::new())
                    }
                    other => other,
                }
            }
        }
    }

    /// Fetch one curation's detail and flatten it to entries, one per
    /// contained episode. Also serves as the post-sync status check.
    pub fn fetch_curation_detail(
        &mut self,
        curation_id: i64,
    ) -> Result<Vec<CurationEntry>, RemoteError> {
        let url = format!("{}/admin/curation/{curation_id}", self.creds.api_base);
        let body = with_refresh(self, |c| c.get_json(&url), Self::refresh_credentials)?;

        let detail = &body["data"];
        if detail.is_null() {
            return Err(RemoteError::Parse(format!(
                "curation {curation_id} detail missing data"
            )));
        }

        let entries = match detail["episodes"].as_array() {
            Some(episodes) => episodes
                .iter()
                .map(|episode| CurationEntry::from_detail(detail, episode))
                .collect(),
            None => Vec::new(),
        };
        Ok(entries)
    }

    // ── Internals ───────────────────────────────────────────────────

    fn fetch_all_inner(
        &mut self,
        category: Category,
        progress: &mut Progress,
        cancel: &CancelToken,
    ) -> Result<Vec<Record>, RemoteError> {
        let size = Self::page_size(category);
        let mut all: Vec<Record> = Vec::new();
        let mut page: u32 = 1;
        let mut total_pages: usize = 1;

        loop {
            if cancel.is_cancelled() {
                return Err(RemoteError::Cancelled);
            }

            let (records, total) = self.fetch_page(category, page, size)?;
            if page == 1 {
                if total == 0 {
                    break;
                }
                total_pages = div_ceil(total, u64::from(size)) as usize;
            }

            let page_len = records.len();
            all.extend(records);
            progress.update(page as usize, total_pages);

            if u64::from(page) * u64::from(size) >= total {
                break;
            }
            if page_len == 0 {
                // Upstream says more pages exist but returned nothing.
                eprintln!("warning: {category} page {page} was empty, stopping pagination");
                break;
            }
            page += 1;
        }

        Ok(all)
    }

    fn fetch_curation_since_inner(
        &mut self,
        latest: Option<DateTime<Utc>>,
        progress: &mut Progress,
        cancel: &CancelToken,
    ) -> Result<Vec<Record>, RemoteError> {
        let size = CURATION_PAGE_SIZE;
        let mut summaries: Vec<CurationSummary> = Vec::new();
        let mut page: u32 = 1;

        loop {
            if cancel.is_cancelled() {
                return Err(RemoteError::Cancelled);
            }

            let (page_summaries, total) = self.fetch_curation_list(page, size)?;
            let Some(first) = page_summaries.first() else {
                break;
            };

            // The list is newest-first: once a page opens at or before
            // the store's latest stamp, later pages hold nothing newer.
            let page_time = timestamp::decode(&first.created_at);
            summaries.extend(page_summaries);

            if let (Some(t), Some(latest)) = (page_time, latest) {
                if t <= latest {
                    break;
                }
            }
            if u64::from(page) * u64::from(size) >= total {
                break;
            }
            page += 1;
        }

        let mut entries: Vec<Record> = Vec::new();
        let total = summaries.len();
        for (i, summary) in summaries.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(RemoteError::Cancelled);
            }
            let detail = self.fetch_curation_detail(summary.curation_id)?;
            entries.extend(detail.into_iter().map(Record::Curation));
            progress.update(i + 1, total);
        }

        Ok(entries)
    }

    /// One raw list page: `dataList` items plus `pageInfo.totalCount`.
    fn fetch_list_page(
        &mut self,
        category: Category,
        page: u32,
        size: u32,
    ) -> Result<(Vec<Value>, u64), RemoteError> {
        let url = self.list_url(category, page, size)?;
        let body = with_refresh(self, |c| c.get_json(url.as_str()), Self::refresh_credentials)?;

        let data = &body["data"];
        let total = data["pageInfo"]["totalCount"].as_u64().ok_or_else(|| {
            RemoteError::Parse(format!("{category} page {page} missing pageInfo.totalCount"))
        })?;
        let items = data["dataList"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        Ok((items, total))
    }

    fn fetch_curation_list(
        &mut self,
        page: u32,
        size: u32,
    ) -> Result<(Vec<CurationSummary>, u64), RemoteError> {
        let (items, total) = self.fetch_list_page(Category::Curation, page, size)?;
        let summaries = items
            .iter()
            .map(|item| CurationSummary {
                curation_id: codec::value_i64(&item["curationId"]),
                created_at: codec::value_str(&item["createdAt"]),
            })
            .collect();
        Ok((summaries, total))
    }

    fn list_url(&self, category: Category, page: u32, size: u32) -> Result<url::Url, RemoteError> {
        let mut url = url::Url::parse(&format!("{}/admin/{category}", self.creds.api_base))
            .map_err(|e| RemoteError::Parse(format!("invalid API URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("size", &size.to_string());
        if category == Category::Curation {
            url.query_pairs_mut().append_pair("periodType", "ALL");
        }
        Ok(url)
    }

    fn refresh_credentials(&mut self) -> Result<(), RemoteError> {
        let access = auth::refresh_access_token(&self.http, &self.creds)?;
        self.creds.access_token = access;
        if let Some(ref path) = self.creds_path {
            if let Err(e) = auth::save_credentials(&self.creds, path) {
                eprintln!("warning: could not persist refreshed admin token: {e}");
            }
        }
        Ok(())
    }

    fn get_json(&self, url: &str) -> Result<Value, RemoteError> {
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.creds.access_token)
            .send()
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        if status == 401 {
            let body = resp.text().unwrap_or_default();
            return Err(RemoteError::AuthExpired(truncate(&body)));
        }
        if !(200..300).contains(&status) {
            let body = resp.text().unwrap_or_default();
            return Err(RemoteError::Http(status, truncate(&body)));
        }

        resp.json().map_err(|e| RemoteError::Parse(e.to_string()))
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(200).collect()
}

fn div_ceil(n: u64, d: u64) -> u64 {
    (n + d - 1) / d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_per_category() {
        assert_eq!(RemoteClient::page_size(Category::Episode), 1_000);
        assert_eq!(RemoteClient::page_size(Category::Channel), 1_000);
        assert_eq!(RemoteClient::page_size(Category::Curation), 100);
    }

    #[test]
    fn test_div_ceil() {
        assert_eq!(div_ceil(1, 1000), 1);
        assert_eq!(div_ceil(1000, 1000), 1);
        assert_eq!(div_ceil(1001, 1000), 2);
        assert_eq!(div_ceil(2500, 1000), 3);
    }

    #[test]
    fn test_list_url_shape() {
        let client = RemoteClient::new(AdminCredentials {
            access_token: "at".into(),
            refresh_token: "rt".into(),
            api_base: "https://pickle.example.com".into(),
        });
        let url = client.list_url(Category::Episode, 2, 1000).unwrap();
        assert_eq!(
            url.as_str(),
            "https://pickle.example.com/admin/episode?page=2&size=1000"
        );

        let url = client.list_url(Category::Curation, 1, 100).unwrap();
        assert_eq!(
            url.as_str(),
            "https://pickle.example.com/admin/curation?page=1&size=100&periodType=ALL"
        );
    }
}
