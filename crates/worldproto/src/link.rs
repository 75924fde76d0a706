use serde::{Deserialize, Serialize};

use crate::Entity;
use crate::ids::{AreaId, LinkId, empty_as_none};

/// A directed connection between two areas, possibly on different maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Link {
    #[serde(
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<LinkId>,
    #[serde(deserialize_with = "empty_as_none")]
    pub from_id: Option<AreaId>,
    #[serde(deserialize_with = "empty_as_none")]
    pub to_id: Option<AreaId>,
    pub from_description: String,
    pub to_description: String,
    pub local_from: LinkEnd,
    pub local_to: LinkEnd,
    pub flags: LinkFlags,
    pub closable: Option<LinkClosable>,
}

/// How one end of a link is drawn on its own map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkEnd {
    pub x: f64,
    pub y: f64,
    pub color: String,
    pub label: String,
    pub border_color: String,
    pub line_style: LineStyle,
}

impl Default for LinkEnd {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            color: "#000000".to_string(),
            label: String::new(),
            border_color: "#000000".to_string(),
            line_style: LineStyle::Solid,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkFlags {
    pub closable: bool,
    pub portal: bool,
    /// One-way: only traversable from `from_id` to `to_id`.
    pub direction: bool,
    /// Represented in-world by an object (door, ladder, rope).
    pub object: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkClosable {
    pub open: bool,
    pub locked: bool,
    pub owned: bool,
    /// Owner scope; `None` means the state is shared by every character.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_id: Option<String>,
}

impl Link {
    pub fn touches(&self, area: &AreaId) -> bool {
        self.from_id.as_ref() == Some(area) || self.to_id.as_ref() == Some(area)
    }

    /// The endpoint opposite `area`, if `area` is one of the two ends.
    pub fn other_end(&self, area: &AreaId) -> Option<&AreaId> {
        if self.from_id.as_ref() == Some(area) {
            self.to_id.as_ref()
        } else if self.to_id.as_ref() == Some(area) {
            self.from_id.as_ref()
        } else {
            None
        }
    }
}

impl Entity for Link {
    type Id = LinkId;

    const KIND: &'static str = "link";

    fn id(&self) -> Option<&LinkId> {
        self.id.as_ref()
    }

    fn sort_name(&self) -> &str {
        &self.from_description
    }
}
