use serde::{Deserialize, Serialize};

use crate::Entity;
use crate::ids::{AreaId, MapId, empty_as_none};
use crate::shop::Shop;

/// A room-like region drawn on exactly one map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<AreaId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub map_id: MapId,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "default_extent")]
    pub width: f64,
    #[serde(default = "default_extent")]
    pub height: f64,
    #[serde(default)]
    pub corner_radius: f64,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_border_color")]
    pub border_color: String,
    #[serde(default = "default_border_width")]
    pub border_width: f64,
    #[serde(default)]
    pub flags: AreaFlags,
    #[serde(default)]
    pub shops: Vec<Shop>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AreaFlags {
    pub bank: bool,
    pub permanently_explored: bool,
}

fn default_extent() -> f64 {
    20.0
}

fn default_color() -> String {
    "#ffffff".to_string()
}

fn default_border_color() -> String {
    "#000000".to_string()
}

fn default_border_width() -> f64 {
    1.0
}

impl Area {
    /// Fresh, unsaved area placed at `(x, y)` on `map_id`.
    pub fn new(map_id: MapId, x: f64, y: f64) -> Self {
        Self {
            id: None,
            name: String::new(),
            description: String::new(),
            map_id,
            x,
            y,
            width: default_extent(),
            height: default_extent(),
            corner_radius: 0.0,
            color: default_color(),
            border_color: default_border_color(),
            border_width: default_border_width(),
            flags: AreaFlags::default(),
            shops: Vec::new(),
        }
    }

    /// Center point, which is where links attach by default.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

impl Entity for Area {
    type Id = AreaId;

    const KIND: &'static str = "area";

    fn id(&self) -> Option<&AreaId> {
        self.id.as_ref()
    }

    fn sort_name(&self) -> &str {
        &self.name
    }
}
