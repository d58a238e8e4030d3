use crate::channel::{audience_order, ChannelRecord};
use crate::marker::ChannelMarker;

/// One row of the channel list next to the map.
#[derive(Debug, Clone, PartialEq)]
pub struct SidebarEntry {
    pub title: String,
    pub logo_url: Option<String>,
    /// Zero is shown as a number; only a missing count is "no data".
    pub members_count: Option<u64>,
    pub messages_count: Option<u64>,
    pub link: Option<String>,
}

impl SidebarEntry {
    pub fn from_record(record: &ChannelRecord) -> Self {
        Self {
            title: record.name.clone(),
            logo_url: record
                .logo_url
                .clone()
                .filter(|url| !url.trim().is_empty()),
            members_count: record.members_count,
            messages_count: record.messages_count,
            link: record.channel_link(),
        }
    }
}

/// Entries ordered by members, then messages, largest first.
pub fn sidebar_entries<'a>(records: impl IntoIterator<Item = &'a ChannelRecord>) -> Vec<SidebarEntry> {
    let mut records: Vec<&ChannelRecord> = records.into_iter().collect();
    records.sort_by(|left, right| {
        audience_order(
            (left.members_count, left.messages_count),
            (right.members_count, right.messages_count),
        )
    });
    records.into_iter().map(SidebarEntry::from_record).collect()
}

/// First marker whose displayed name equals `title`.
pub fn find_marker_by_name(markers: &[ChannelMarker], title: &str) -> Option<usize> {
    let title = title.trim();
    markers.iter().position(|marker| marker.name() == title)
}
