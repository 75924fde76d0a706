//! `worldbuild`: state coordinator for the "build world" editor.
//!
//! A [`WorldBuilder`] owns every piece of transient editor state: the
//! `(mode, view)` machine, id-keyed caches of maps/areas/links/shops/items/templates,
//! per-entity drafts, the link-editor side-cache and the map zoom level.
//! It talks to the game server only through the [`WorldApi`] seam and reports
//! failures only through the [`Alert`] seam, so tests can run many independent
//! instances against an in-memory API.
//!
//! Concurrency model: every operation takes `&self` and may be driven from
//! several tasks at once. State sits behind an async mutex that is never held
//! across a network call, so handlers interleave only at those awaits.

pub mod alert;
pub mod api;
pub mod builder;
pub mod cache;
pub mod http;
pub mod link_editor;
pub mod ui;
pub mod zoom;

#[cfg(test)]
mod fake;

pub use alert::{Alert, LogAlert};
pub use api::{MapData, WorldApi};
pub use builder::{BuilderConfig, WorldBuilder};
pub use cache::EntityCache;
pub use http::HttpWorldApi;
pub use link_editor::LinkEditorStatus;
pub use ui::{Mode, UiFlags, UiState, View};
pub use zoom::{DEFAULT_ZOOM_INDEX, ZOOM_LEVELS, Zoom};
