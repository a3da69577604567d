//! Positional row codec: record <-> one row of cells.
//!
//! Cells are `serde_json::Value` exactly as the workbook API exchanges
//! them. Decoding is lenient the way untouched sheet regions demand:
//! missing trailing cells read as null, numbers and numeric strings are
//! interchangeable, and a row whose identity cell is empty is not a
//! record at all (formatting artifact) and decodes to `None`.
//!
//! Encoding normalizes every timestamp-bearing field to the canonical
//! `YYYY-MM-DD HH:MM:SS` cell form, whatever encoding it arrived in.

use serde_json::Value;

use crate::record::{Category, Channel, CurationEntry, Episode, Record};
use crate::timestamp;

static NULL: Value = Value::Null;

/// String view of a cell. Null becomes the empty string.
pub fn value_str(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Integer view of a cell. Null, non-numeric, and absent all read as 0.
pub fn value_i64(v: &Value) -> i64 {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn is_empty_cell(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn cell<'a>(row: &'a [Value], idx: usize) -> &'a Value {
    row.get(idx).unwrap_or(&NULL)
}

/// Decode one sheet row into a record of the given category.
///
/// Returns `None` when the identity-bearing cell is empty.
pub fn decode_row(category: Category, row: &[Value]) -> Option<Record> {
    let layout = category.layout();
    if is_empty_cell(cell(row, layout.key_index)) {
        return None;
    }

    let record = match category {
        Category::Episode => Record::Episode(Episode {
            episode_id: value_i64(cell(row, 0)),
            usage_yn: value_str(cell(row, 1)),
            channel_name: value_str(cell(row, 2)),
            episode_name: value_str(cell(row, 3)),
            disp_dtime: value_str(cell(row, 4)),
            created_at: value_str(cell(row, 5)),
            play_time: value_i64(cell(row, 6)),
            like_cnt: value_i64(cell(row, 7)),
            listen_cnt: value_i64(cell(row, 8)),
            tags: value_str(cell(row, 9)),
            tags_added: value_str(cell(row, 10)),
        }),
        Category::Channel => Record::Channel(Channel {
            channel_id: value_i64(cell(row, 0)),
            usage_yn: value_str(cell(row, 1)),
            channel_name: value_str(cell(row, 2)),
            channel_type_name: value_str(cell(row, 3)),
            category_name: value_str(cell(row, 4)),
            vendor_name: value_str(cell(row, 5)),
            disp_dtime: value_str(cell(row, 6)),
            like_cnt: value_i64(cell(row, 7)),
            listen_cnt: value_i64(cell(row, 8)),
            created_at: value_str(cell(row, 9)),
            interface_url: value_str(cell(row, 10)),
            thumbnail_url: value_str(cell(row, 11)),
        }),
        Category::Curation => Record::Curation(CurationEntry {
            thumbnail_title: value_str(cell(row, 0)),
            curation_type: value_str(cell(row, 1)),
            curation_name: value_str(cell(row, 2)),
            curation_desc: value_str(cell(row, 3)),
            active_state: value_str(cell(row, 4)),
            exhibition_state: value_str(cell(row, 5)),
            field: value_str(cell(row, 6)),
            section: value_i64(cell(row, 7)),
            disp_start_dtime: value_str(cell(row, 8)),
            disp_end_dtime: value_str(cell(row, 9)),
            curation_created_at: value_str(cell(row, 10)),
            channel_id: value_i64(cell(row, 11)),
            episode_id: value_i64(cell(row, 12)),
            usage_yn: value_str(cell(row, 13)),
            channel_name: value_str(cell(row, 14)),
            episode_name: value_str(cell(row, 15)),
            disp_dtime: value_str(cell(row, 16)),
            created_at: value_str(cell(row, 17)),
            play_time: value_i64(cell(row, 18)),
            like_cnt: value_i64(cell(row, 19)),
            listen_cnt: value_i64(cell(row, 20)),
            uploader: value_str(cell(row, 21)),
        }),
    };

    Some(record)
}

/// Encode a record into one row of cells in layout order.
pub fn encode_row(record: &Record) -> Vec<Value> {
    let row = match record {
        Record::Episode(e) => vec![
            Value::from(e.episode_id),
            Value::from(e.usage_yn.clone()),
            Value::from(e.channel_name.clone()),
            Value::from(e.episode_name.clone()),
            Value::from(timestamp::normalize(&e.disp_dtime)),
            Value::from(timestamp::normalize(&e.created_at)),
            Value::from(e.play_time),
            Value::from(e.like_cnt),
            Value::from(e.listen_cnt),
            Value::from(e.tags.clone()),
            Value::from(e.tags_added.clone()),
        ],
        Record::Channel(c) => vec![
            Value::from(c.channel_id),
            Value::from(c.usage_yn.clone()),
            Value::from(c.channel_name.clone()),
            Value::from(c.channel_type_name.clone()),
            Value::from(c.category_name.clone()),
            Value::from(c.vendor_name.clone()),
            Value::from(timestamp::normalize(&c.disp_dtime)),
            Value::from(c.like_cnt),
            Value::from(c.listen_cnt),
            Value::from(timestamp::normalize(&c.created_at)),
            Value::from(c.interface_url.clone()),
            Value::from(c.thumbnail_url.clone()),
        ],
        Record::Curation(c) => vec![
            Value::from(c.thumbnail_title.clone()),
            Value::from(c.curation_type.clone()),
            Value::from(c.curation_name.clone()),
            Value::from(c.curation_desc.clone()),
            Value::from(c.active_state.clone()),
            Value::from(c.exhibition_state.clone()),
            Value::from(c.field.clone()),
            Value::from(c.section),
            Value::from(timestamp::normalize(&c.disp_start_dtime)),
            Value::from(timestamp::normalize(&c.disp_end_dtime)),
            Value::from(timestamp::normalize(&c.curation_created_at)),
            Value::from(c.channel_id),
            Value::from(c.episode_id),
            Value::from(c.usage_yn.clone()),
            Value::from(c.channel_name.clone()),
            Value::from(c.episode_name.clone()),
            Value::from(timestamp::normalize(&c.disp_dtime)),
            Value::from(timestamp::normalize(&c.created_at)),
            Value::from(c.play_time),
            Value::from(c.like_cnt),
            Value::from(c.listen_cnt),
            Value::from(c.uploader.clone()),
        ],
    };

    debug_assert_eq!(row.len(), record.category().layout().width());
    row
}
