//! Positional column layouts, one per record variant.
//!
//! The sheet is the wire format: each variant owns a fixed column span
//! starting at column A, data starts at the header-offset row, and the
//! codec reads/writes cells strictly by position. The tables below are
//! the single source of truth for field order, span, and the
//! identity-bearing column; the codec is asserted against them in tests.

use crate::record::Category;

/// First data row. Rows 1..=3 are the header block.
pub const HEADER_OFFSET_ROW: u32 = 4;

/// Theoretical maximum row scanned when sizing the occupied region.
pub const MAX_SHEET_ROWS: u32 = 300_000;

pub struct Layout {
    /// `(field name, column letter)` pairs in sheet order.
    pub fields: &'static [(&'static str, &'static str)],
    /// Index of the identity-bearing field within `fields`. A decoded
    /// row whose cell at this index is empty is discarded.
    pub key_index: usize,
    /// Last column letter of the span, for range addresses.
    pub end_col: &'static str,
}

impl Layout {
    pub fn width(&self) -> usize {
        self.fields.len()
    }
}

pub const EPISODE_LAYOUT: Layout = Layout {
    fields: &[
        ("episode_id", "A"),
        ("usage_yn", "B"),
        ("channel_name", "C"),
        ("episode_name", "D"),
        ("disp_dtime", "E"),
        ("created_at", "F"),
        ("play_time", "G"),
        ("like_cnt", "H"),
        ("listen_cnt", "I"),
        ("tags", "J"),
        ("tags_added", "K"),
    ],
    key_index: 0,
    end_col: "K",
};

pub const CHANNEL_LAYOUT: Layout = Layout {
    fields: &[
        ("channel_id", "A"),
        ("usage_yn", "B"),
        ("channel_name", "C"),
        ("channel_type_name", "D"),
        ("category_name", "E"),
        ("vendor_name", "F"),
        ("disp_dtime", "G"),
        ("like_cnt", "H"),
        ("listen_cnt", "I"),
        ("created_at", "J"),
        ("interface_url", "K"),
        ("thumbnail_url", "L"),
    ],
    key_index: 0,
    end_col: "L",
};

pub const CURATION_LAYOUT: Layout = Layout {
    fields: &[
        ("thumbnail_title", "A"),
        ("curation_type", "B"),
        ("curation_name", "C"),
        ("curation_desc", "D"),
        ("active_state", "E"),
        ("exhibition_state", "F"),
        ("field", "G"),
        ("section", "H"),
        ("disp_start_dtime", "I"),
        ("disp_end_dtime", "J"),
        ("curation_created_at", "K"),
        ("channel_id", "L"),
        ("episode_id", "M"),
        ("usage_yn", "N"),
        ("channel_name", "O"),
        ("episode_name", "P"),
        ("disp_dtime", "Q"),
        ("created_at", "R"),
        ("play_time", "S"),
        ("like_cnt", "T"),
        ("listen_cnt", "U"),
        ("uploader", "V"),
    ],
    key_index: 10,
    end_col: "V",
};

impl Category {
    pub fn layout(self) -> &'static Layout {
        match self {
            Self::Episode => &EPISODE_LAYOUT,
            Self::Channel => &CHANNEL_LAYOUT,
            Self::Curation => &CURATION_LAYOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans() {
        assert_eq!(EPISODE_LAYOUT.width(), 11);
        assert_eq!(CHANNEL_LAYOUT.width(), 12);
        assert_eq!(CURATION_LAYOUT.width(), 22);
    }

    #[test]
    fn test_end_cols_match_last_field() {
        for layout in [&EPISODE_LAYOUT, &CHANNEL_LAYOUT, &CURATION_LAYOUT] {
            assert_eq!(layout.fields.last().unwrap().1, layout.end_col);
        }
    }

    #[test]
    fn test_key_index_in_range() {
        for layout in [&EPISODE_LAYOUT, &CHANNEL_LAYOUT, &CURATION_LAYOUT] {
            assert!(layout.key_index < layout.width());
        }
    }

    #[test]
    fn test_curation_key_is_creation_stamp() {
        assert_eq!(
            CURATION_LAYOUT.fields[CURATION_LAYOUT.key_index].0,
            "curation_created_at"
        );
    }
}
