use std::cmp::Ordering;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const MIN_CIRCLE_SIZE: f64 = 2.0;
pub const MAX_CIRCLE_SIZE: f64 = 8.0;
pub const CIRCLE_SIZE_MULTIPLIER: f64 = 1.5;

/// One input record per plotted channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub members_count: Option<u64>,
    #[serde(default)]
    pub messages_count: Option<u64>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default = "default_size")]
    pub size: f64,
}

fn default_size() -> f64 {
    MIN_CIRCLE_SIZE
}

impl ChannelRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            members_count: None,
            messages_count: None,
            logo_url: None,
            username: None,
            size: MIN_CIRCLE_SIZE,
        }
    }

    /// Display radius in pixels; non-finite or non-positive sizes fall back to the minimum.
    pub fn radius(&self) -> f64 {
        if self.size.is_finite() && self.size > 0.0 {
            self.size
        } else {
            MIN_CIRCLE_SIZE
        }
    }

    pub fn has_logo(&self) -> bool {
        self.logo_url
            .as_deref()
            .map(|url| !url.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn handle(&self) -> Option<&str> {
        self.username
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn channel_link(&self) -> Option<String> {
        self.handle().map(|handle| format!("https://t.me/{handle}"))
    }
}

/// `clamp(ln(members) * 1.5, 2, 8)`; unknown audiences get the smallest circle.
pub fn circle_size(members_count: Option<u64>) -> f64 {
    match members_count {
        Some(members) if members >= 1 => (members as f64).ln() * CIRCLE_SIZE_MULTIPLIER,
        _ => MIN_CIRCLE_SIZE,
    }
    .clamp(MIN_CIRCLE_SIZE, MAX_CIRCLE_SIZE)
}

/// Largest audience first, ties broken by message volume; absent counts rank as zero.
pub fn audience_order(
    left: (Option<u64>, Option<u64>),
    right: (Option<u64>, Option<u64>),
) -> Ordering {
    let key = |(members, messages): (Option<u64>, Option<u64>)| {
        (members.unwrap_or(0), messages.unwrap_or(0))
    };
    key(right).cmp(&key(left))
}

pub fn sort_by_audience(records: &mut [ChannelRecord]) {
    records.sort_by(|left, right| {
        audience_order(
            (left.members_count, left.messages_count),
            (right.members_count, right.messages_count),
        )
    });
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelLoadError {
    Io { path: String, message: String },
    Json(String),
}

impl fmt::Display for ChannelLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelLoadError::Io { path, message } => {
                write!(f, "read channels failed ({path}): {message}")
            }
            ChannelLoadError::Json(message) => write!(f, "channels json invalid: {message}"),
        }
    }
}

impl Error for ChannelLoadError {}

pub fn load_channel_records(path: &Path) -> Result<Vec<ChannelRecord>, ChannelLoadError> {
    let content = fs::read_to_string(path).map_err(|err| ChannelLoadError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    parse_channel_records(&content)
}

pub fn parse_channel_records(content: &str) -> Result<Vec<ChannelRecord>, ChannelLoadError> {
    serde_json::from_str(content).map_err(|err| ChannelLoadError::Json(err.to_string()))
}
