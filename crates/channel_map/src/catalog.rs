//! Collected channel groups with a field-level change history.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::channel::{audience_order, circle_size, ChannelRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Io { path: String, message: String },
    Json(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io { path, message } => write!(f, "catalog io failed ({path}): {message}"),
            CatalogError::Json(message) => write!(f, "catalog json invalid: {message}"),
        }
    }
}

impl Error for CatalogError {}

impl From<serde_json::Error> for CatalogError {
    fn from(error: serde_json::Error) -> Self {
        CatalogError::Json(error.to_string())
    }
}

/// Snapshot of a channel as reported by the collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelGroup {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub members_count: Option<u64>,
    #[serde(default)]
    pub messages_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredGroup {
    pub group: ChannelGroup,
    #[serde(default)]
    pub photo_base64: Option<String>,
    pub time_added: u64,
    pub time_updated: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelField {
    Title,
    Username,
    MembersCount,
    MessagesCount,
    Photo,
}

/// A field that changed, carrying the value it had before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelChange {
    pub field: ChannelField,
    pub previous: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub channel_id: i64,
    pub time_created: u64,
    pub change: ChannelChange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated(Vec<ChannelChange>),
    Unchanged,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelCatalog {
    groups: BTreeMap<i64, StoredGroup>,
    #[serde(default)]
    history: Vec<HistoryEntry>,
}

impl ChannelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|err| CatalogError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|err| CatalogError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&StoredGroup> {
        self.groups.get(&id)
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Inserts a new group or diffs an existing one.
    ///
    /// The photo is only compared when a new one is supplied. Changes are
    /// stamped with the previous `time_updated`, which then moves to `now`.
    pub fn upsert(
        &mut self,
        group: ChannelGroup,
        photo_base64: Option<String>,
        now: u64,
    ) -> UpsertOutcome {
        let Some(stored) = self.groups.get_mut(&group.id) else {
            self.groups.insert(
                group.id,
                StoredGroup {
                    group,
                    photo_base64,
                    time_added: now,
                    time_updated: now,
                },
            );
            return UpsertOutcome::Inserted;
        };

        let mut changes = Vec::new();
        if stored.group.title != group.title {
            changes.push(ChannelChange {
                field: ChannelField::Title,
                previous: Some(stored.group.title.clone()),
            });
        }
        if stored.group.username != group.username {
            changes.push(ChannelChange {
                field: ChannelField::Username,
                previous: stored.group.username.clone(),
            });
        }
        if stored.group.members_count != group.members_count {
            changes.push(ChannelChange {
                field: ChannelField::MembersCount,
                previous: stored.group.members_count.map(|value| value.to_string()),
            });
        }
        if stored.group.messages_count != group.messages_count {
            changes.push(ChannelChange {
                field: ChannelField::MessagesCount,
                previous: stored.group.messages_count.map(|value| value.to_string()),
            });
        }
        let photo_changed = photo_base64.is_some() && photo_base64 != stored.photo_base64;
        if photo_changed {
            changes.push(ChannelChange {
                field: ChannelField::Photo,
                previous: stored.photo_base64.clone(),
            });
        }

        if changes.is_empty() {
            return UpsertOutcome::Unchanged;
        }

        let channel_id = group.id;
        for change in &changes {
            self.history.push(HistoryEntry {
                channel_id,
                time_created: stored.time_updated,
                change: change.clone(),
            });
        }
        stored.group = group;
        if photo_changed {
            stored.photo_base64 = photo_base64;
        }
        stored.time_updated = now;
        UpsertOutcome::Updated(changes)
    }

    /// Groups ordered by audience, largest first.
    pub fn ordered(&self) -> Vec<&StoredGroup> {
        let mut groups: Vec<_> = self.groups.values().collect();
        groups.sort_by(|left, right| {
            audience_order(
                (left.group.members_count, left.group.messages_count),
                (right.group.members_count, right.group.messages_count),
            )
        });
        groups
    }

    pub fn to_records(&self) -> Vec<ChannelRecord> {
        self.ordered().into_iter().map(record_from_stored).collect()
    }
}

fn record_from_stored(stored: &StoredGroup) -> ChannelRecord {
    let group = &stored.group;
    let username = group
        .username
        .clone()
        .filter(|name| !name.trim().is_empty());
    ChannelRecord {
        name: group.title.clone(),
        description: username.as_ref().map(|name| format!("@{name}")),
        members_count: group.members_count,
        messages_count: group.messages_count,
        logo_url: stored
            .photo_base64
            .as_ref()
            .filter(|photo| !photo.is_empty())
            .map(|photo| format!("data:image/jpeg;base64,{photo}")),
        username,
        size: circle_size(group.members_count),
    }
}
