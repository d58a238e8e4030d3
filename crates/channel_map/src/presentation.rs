//! What a marker looks like and what its tooltip says.

use serde::{Deserialize, Serialize};

use crate::channel::ChannelRecord;
use crate::geometry::ScreenPoint;
use crate::transition::Millis;

pub const CIRCLE_FILL: &str = "#4CAF50";
pub const CIRCLE_FILL_RGB: [u8; 3] = [0x4c, 0xaf, 0x50];
pub const HOVER_SCALE: f64 = 1.2;
pub const HOVER_DURATION_MS: Millis = 300.0;
pub const FADE_IN_DURATION_MS: Millis = 1000.0;
pub const FADE_IN_MAX_DELAY_MS: Millis = 1000.0;
pub const FOCUS_DURATION_MS: Millis = 750.0;
pub const TOOLTIP_OFFSET: ScreenPoint = ScreenPoint { x: 10.0, y: -10.0 };

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerVisual {
    /// Logo clipped to a circle of `radius`.
    Image { href: String, radius: f64 },
    Circle { radius: f64, fill: String },
}

impl MarkerVisual {
    pub fn for_record(record: &ChannelRecord) -> Self {
        let radius = record.radius();
        match record.logo_url.as_deref().map(str::trim) {
            Some(href) if !href.is_empty() => MarkerVisual::Image {
                href: href.to_string(),
                radius,
            },
            _ => MarkerVisual::Circle {
                radius,
                fill: CIRCLE_FILL.to_string(),
            },
        }
    }

    pub fn radius(&self) -> f64 {
        match self {
            MarkerVisual::Image { radius, .. } | MarkerVisual::Circle { radius, .. } => *radius,
        }
    }

    pub fn appearance(&self) -> MarkerAppearance {
        match self {
            MarkerVisual::Image { .. } => MarkerAppearance {
                image_visible: true,
                circle_visible: false,
            },
            MarkerVisual::Circle { .. } => MarkerAppearance {
                image_visible: false,
                circle_visible: true,
            },
        }
    }
}

/// Which of the two marker elements is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerAppearance {
    pub image_visible: bool,
    pub circle_visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub anchor: ScreenPoint,
    pub name: String,
    pub description: Option<String>,
    /// `None` when the count is absent or zero.
    pub members_count: Option<u64>,
    pub messages_count: Option<u64>,
    pub link: Option<String>,
}

impl TooltipContent {
    pub fn for_record(record: &ChannelRecord, pointer: ScreenPoint) -> Self {
        Self {
            anchor: ScreenPoint::new(pointer.x + TOOLTIP_OFFSET.x, pointer.y + TOOLTIP_OFFSET.y),
            name: record.name.clone(),
            description: record.description.clone(),
            members_count: record.members_count.filter(|count| *count > 0),
            messages_count: record.messages_count.filter(|count| *count > 0),
            link: record.channel_link(),
        }
    }
}
