use serde::{Deserialize, Serialize};

use crate::Entity;
use crate::ids::{ItemId, TemplateId, empty_as_none};

/// A base item plus whichever capabilities it has.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    #[serde(
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<ItemId>,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closable: Option<Closable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lockable: Option<Lockable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pocket: Option<Pocket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<ItemFlags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physics: Option<Physics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface: Option<Surface>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wearable: Option<Wearable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub furniture: Option<Furniture>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gem: Option<Gem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Closable {
    pub open: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lockable {
    pub locked: bool,
    #[serde(deserialize_with = "empty_as_none")]
    pub key_template_id: Option<TemplateId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pocket {
    pub capacity: u32,
    pub max_weight: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemFlags {
    pub takeable: bool,
    pub hidden: bool,
    pub unique: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    pub weight: u32,
    pub volume: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Surface {
    pub capacity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wearable {
    pub slot: WearSlot,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WearSlot {
    Head,
    #[default]
    Body,
    Arms,
    Hands,
    Legs,
    Feet,
    Neck,
    Finger,
}

impl WearSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            WearSlot::Head => "head",
            WearSlot::Body => "body",
            WearSlot::Arms => "arms",
            WearSlot::Hands => "hands",
            WearSlot::Legs => "legs",
            WearSlot::Feet => "feet",
            WearSlot::Neck => "neck",
            WearSlot::Finger => "finger",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "head" | "helm" | "helmet" => Some(WearSlot::Head),
            "body" | "torso" | "chest" => Some(WearSlot::Body),
            "arms" | "sleeves" => Some(WearSlot::Arms),
            "hands" | "gloves" => Some(WearSlot::Hands),
            "legs" | "pants" => Some(WearSlot::Legs),
            "feet" | "boots" => Some(WearSlot::Feet),
            "neck" | "amulet" => Some(WearSlot::Neck),
            "finger" | "ring" => Some(WearSlot::Finger),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Furniture {
    pub seats: u32,
    pub can_lie: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gem {
    pub cut: String,
    pub carats: u32,
}

impl Item {
    /// Names of the capabilities present on this item, in a fixed order.
    pub fn aspects(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.closable.is_some() {
            out.push("closable");
        }
        if self.lockable.is_some() {
            out.push("lockable");
        }
        if self.pocket.is_some() {
            out.push("pocket");
        }
        if self.flags.is_some() {
            out.push("flags");
        }
        if self.physics.is_some() {
            out.push("physics");
        }
        if self.surface.is_some() {
            out.push("surface");
        }
        if self.wearable.is_some() {
            out.push("wearable");
        }
        if self.furniture.is_some() {
            out.push("furniture");
        }
        if self.gem.is_some() {
            out.push("gem");
        }
        out
    }
}

impl Entity for Item {
    type Id = ItemId;

    const KIND: &'static str = "item";

    fn id(&self) -> Option<&ItemId> {
        self.id.as_ref()
    }

    fn sort_name(&self) -> &str {
        &self.name
    }
}

/// A reusable item prototype.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Template {
    #[serde(
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<TemplateId>,
    pub name: String,
    pub item: Item,
}

impl Template {
    /// A new, unsaved item shaped like this template.
    pub fn instantiate(&self) -> Item {
        Item {
            id: None,
            ..self.item.clone()
        }
    }
}

impl Entity for Template {
    type Id = TemplateId;

    const KIND: &'static str = "template";

    fn id(&self) -> Option<&TemplateId> {
        self.id.as_ref()
    }

    fn sort_name(&self) -> &str {
        &self.name
    }
}
