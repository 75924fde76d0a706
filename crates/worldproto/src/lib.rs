//! `worldproto`: entity shapes exchanged with the world-building API.
//!
//! Everything here is a plain record mirrored from the game server. Ids are
//! tagged optionals: an entity whose `id` is `None` has not been persisted yet.
//! The server may still send `""` for an unset id; decoders fold that into `None`.

pub mod area;
pub mod ids;
pub mod item;
pub mod link;
pub mod map;
pub mod shop;

pub use area::{Area, AreaFlags};
pub use ids::{AreaId, ItemId, LabelId, LinkId, MapId, ProductId, ShopId, TemplateId};
pub use item::{Item, Template};
pub use link::{LineStyle, Link, LinkClosable, LinkEnd, LinkFlags};
pub use map::{Map, MapLabel};
pub use shop::{Price, Shop, ShopProduct};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// An id was built from an empty (or all-whitespace) string.
    EmptyId(&'static str),
    /// The server answered with an entity that carries no id.
    MissingId(&'static str),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::EmptyId(kind) => write!(f, "empty {kind} id"),
            ModelError::MissingId(kind) => write!(f, "server returned {kind} without an id"),
        }
    }
}

impl std::error::Error for ModelError {}

/// Entities that live in an id-keyed cache.
pub trait Entity: Clone + std::fmt::Debug {
    type Id: Clone + Ord + std::hash::Hash + std::fmt::Display + std::fmt::Debug;

    const KIND: &'static str;

    fn id(&self) -> Option<&Self::Id>;

    /// Label used for ordering projections handed to the UI.
    fn sort_name(&self) -> &str;

    /// The id, or `MissingId` for entities that were never persisted.
    fn require_id(&self) -> Result<Self::Id, ModelError> {
        self.id().cloned().ok_or(ModelError::MissingId(Self::KIND))
    }

    fn is_new(&self) -> bool {
        self.id().is_none()
    }
}
