use tracing::warn;
use worldproto::{Area, AreaId, Link, LinkId, MapId};

use crate::cache::EntityCache;

/// Areas/links of the map holding the far end of a link being edited.
///
/// Every load takes a new generation; only the newest generation may commit,
/// so a slow response for a map the user already moved away from is dropped.
#[derive(Debug, Default)]
pub struct LinkEditorCache {
    map_id: Option<MapId>,
    areas: EntityCache<Area>,
    links: EntityCache<Link>,
    loading: bool,
    loaded: bool,
    generation: u64,
}

/// Read-only view for spinners and pickers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkEditorStatus {
    pub map_id: Option<MapId>,
    pub loading: bool,
    pub loaded: bool,
    pub areas: usize,
    pub links: usize,
}

impl LinkEditorCache {
    pub fn map_id(&self) -> Option<&MapId> {
        self.map_id.as_ref()
    }

    pub fn areas(&self) -> &EntityCache<Area> {
        &self.areas
    }

    pub fn links(&self) -> &EntityCache<Link> {
        &self.links
    }

    pub fn status(&self) -> LinkEditorStatus {
        LinkEditorStatus {
            map_id: self.map_id.clone(),
            loading: self.loading,
            loaded: self.loaded,
            areas: self.areas.len(),
            links: self.links.len(),
        }
    }

    /// Start a load and return its generation.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.loaded = false;
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Commit a finished load. `loaded` is raised before `loading` drops so
    /// observers never see neither.
    pub fn commit(
        &mut self,
        generation: u64,
        map_id: MapId,
        areas: EntityCache<Area>,
        links: EntityCache<Link>,
    ) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.map_id = Some(map_id);
        self.areas = areas;
        self.links = links;
        self.loaded = true;
        self.loading = false;
        true
    }

    /// A failed load leaves the previous contents in place.
    pub fn abort(&mut self, generation: u64) {
        if self.is_current(generation) {
            self.loading = false;
            self.loaded = self.map_id.is_some();
        }
    }

    pub fn upsert_area(&mut self, area: Area) {
        if self.map_id.as_ref() == Some(&area.map_id) {
            if let Err(e) = self.areas.upsert(area) {
                warn!(err = %e, "link editor: area not mirrored");
            }
        }
    }

    /// Mirror a saved link when either end lives on the side map.
    pub fn upsert_link(&mut self, link: Link) {
        let on_side = [link.from_id.as_ref(), link.to_id.as_ref()]
            .into_iter()
            .flatten()
            .any(|a| self.areas.contains(a));
        if on_side {
            if let Err(e) = self.links.upsert(link) {
                warn!(err = %e, "link editor: link not mirrored");
            }
        }
    }

    /// Drop an area and every link touching it.
    pub fn remove_area(&mut self, id: &AreaId) {
        self.areas.remove(id);
        self.links.retain(|l| !l.touches(id));
    }

    pub fn remove_link(&mut self, link: &LinkId) {
        self.links.remove(link);
    }

    /// Forget everything; in-flight loads become stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.map_id = None;
        self.areas.clear();
        self.links.clear();
        self.loading = false;
        self.loaded = false;
    }
}
