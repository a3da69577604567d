//! Record variants exchanged between the admin API and the workbook.
//!
//! Three variants share the replica: episodes, channels, and curation
//! entries (a curation flattened to one row per contained episode).
//! Each variant carries exactly the fields that occupy its sheet columns;
//! API payload fields with no column are dropped at the boundary.

use serde::Serialize;
use serde_json::Value;

use crate::codec::{value_i64, value_str};
use crate::timestamp;

/// Which replica a sync run targets. Doubles as the API path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Episode,
    Channel,
    Curation,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Episode => "episode",
            Self::Channel => "channel",
            Self::Curation => "curation",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value that must be unique within a reconciled collection.
///
/// Episodes and channels carry a monotonically increasing integer id;
/// curation entries are identified by their curation's creation
/// timestamp, compared in normalized form so that a sheet-serial cell
/// and an ISO API string for the same instant collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    Id(i64),
    Stamp(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Episode {
    pub episode_id: i64,
    pub usage_yn: String,
    pub channel_name: String,
    pub episode_name: String,
    pub disp_dtime: String,
    pub created_at: String,
    pub play_time: i64,
    pub like_cnt: i64,
    pub listen_cnt: i64,
    pub tags: String,
    pub tags_added: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Channel {
    pub channel_id: i64,
    pub usage_yn: String,
    pub channel_name: String,
    pub channel_type_name: String,
    pub category_name: String,
    pub vendor_name: String,
    pub disp_dtime: String,
    pub like_cnt: i64,
    pub listen_cnt: i64,
    pub created_at: String,
    pub interface_url: String,
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurationEntry {
    pub thumbnail_title: String,
    pub curation_type: String,
    pub curation_name: String,
    pub curation_desc: String,
    pub active_state: String,
    pub exhibition_state: String,
    pub field: String,
    pub section: i64,
    pub disp_start_dtime: String,
    pub disp_end_dtime: String,
    pub curation_created_at: String,
    pub channel_id: i64,
    pub episode_id: i64,
    pub usage_yn: String,
    pub channel_name: String,
    pub episode_name: String,
    pub disp_dtime: String,
    pub created_at: String,
    pub play_time: i64,
    pub like_cnt: i64,
    pub listen_cnt: i64,
    pub uploader: String,
}

impl Episode {
    /// Build from one `dataList` item of the admin API.
    pub fn from_api(v: &Value) -> Self {
        Self {
            episode_id: value_i64(&v["episodeId"]),
            usage_yn: value_str(&v["usageYn"]),
            channel_name: value_str(&v["channelName"]),
            episode_name: value_str(&v["episodeName"]),
            disp_dtime: value_str(&v["dispDtime"]),
            created_at: value_str(&v["createdAt"]),
            play_time: value_i64(&v["playTime"]),
            like_cnt: value_i64(&v["likeCnt"]),
            listen_cnt: value_i64(&v["listenCnt"]),
            tags: value_str(&v["tags"]),
            tags_added: value_str(&v["tagsAdded"]),
        }
    }
}

impl Channel {
    pub fn from_api(v: &Value) -> Self {
        Self {
            channel_id: value_i64(&v["channelId"]),
            usage_yn: value_str(&v["usageYn"]),
            channel_name: value_str(&v["channelName"]),
            channel_type_name: value_str(&v["channelTypeName"]),
            category_name: value_str(&v["categoryName"]),
            vendor_name: value_str(&v["vendorName"]),
            disp_dtime: value_str(&v["dispDtime"]),
            like_cnt: value_i64(&v["likeCnt"]),
            listen_cnt: value_i64(&v["listenCnt"]),
            created_at: value_str(&v["createdAt"]),
            interface_url: value_str(&v["interfaceUrl"]),
            thumbnail_url: value_str(&v["thumbnailUrl"]),
        }
    }
}

impl CurationEntry {
    /// Flatten one episode of a curation detail payload into a row.
    ///
    /// `detail` is the curation object (`data` of the detail response),
    /// `episode` one element of its `episodes` array. The curation's own
    /// `createdAt` becomes the identity-bearing `curation_created_at`.
    pub fn from_detail(detail: &Value, episode: &Value) -> Self {
        Self {
            thumbnail_title: value_str(&detail["thumbnailTitle"]),
            curation_type: value_str(&detail["curationType"]),
            curation_name: value_str(&detail["curationName"]),
            curation_desc: value_str(&detail["curationDesc"]),
            active_state: value_str(&detail["activeState"]),
            exhibition_state: value_str(&detail["exhibitionState"]),
            field: value_str(&detail["field"]),
            section: value_i64(&detail["section"]),
            disp_start_dtime: value_str(&detail["dispStartDtime"]),
            disp_end_dtime: value_str(&detail["dispEndDtime"]),
            curation_created_at: value_str(&detail["createdAt"]),
            channel_id: value_i64(&episode["channelId"]),
            episode_id: value_i64(&episode["episodeId"]),
            usage_yn: value_str(&episode["usageYn"]),
            channel_name: value_str(&episode["channelName"]),
            episode_name: value_str(&episode["episodeName"]),
            disp_dtime: value_str(&episode["dispDtime"]),
            created_at: value_str(&episode["createdAt"]),
            play_time: value_i64(&episode["playTime"]),
            like_cnt: value_i64(&episode["likeCnt"]),
            listen_cnt: value_i64(&episode["listenCnt"]),
            uploader: value_str(&episode["uploader"]),
        }
    }
}

/// One logical entity of the replica, polymorphic over the three variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Episode(Episode),
    Channel(Channel),
    Curation(CurationEntry),
}

impl Record {
    pub fn category(&self) -> Category {
        match self {
            Self::Episode(_) => Category::Episode,
            Self::Channel(_) => Category::Channel,
            Self::Curation(_) => Category::Curation,
        }
    }

    /// The per-variant identity value (see [`Identity`]).
    pub fn identity(&self) -> Identity {
        match self {
            Self::Episode(e) => Identity::Id(e.episode_id),
            Self::Channel(c) => Identity::Id(c.channel_id),
            Self::Curation(c) => {
                Identity::Stamp(timestamp::normalize(&c.curation_created_at))
            }
        }
    }

    /// Integer identity, for the max-identity delta strategy.
    pub fn numeric_id(&self) -> Option<i64> {
        match self {
            Self::Episode(e) => Some(e.episode_id),
            Self::Channel(c) => Some(c.channel_id),
            Self::Curation(_) => None,
        }
    }

    /// The creation timestamp driving the latest-timestamp strategy.
    pub fn created_at(&self) -> &str {
        match self {
            Self::Episode(e) => &e.created_at,
            Self::Channel(c) => &c.created_at,
            Self::Curation(c) => &c.curation_created_at,
        }
    }

    /// Parse one remote `dataList` item for the given category.
    ///
    /// Curation list items are summaries, not full entries; they are
    /// expanded through the detail endpoint instead (see podsync-remote).
    pub fn from_api(category: Category, v: &Value) -> Self {
        match category {
            Category::Episode => Self::Episode(Episode::from_api(v)),
            Category::Channel => Self::Channel(Channel::from_api(v)),
            Category::Curation => {
                Self::Curation(CurationEntry::from_detail(v, &Value::Null))
            }
        }
    }
}
