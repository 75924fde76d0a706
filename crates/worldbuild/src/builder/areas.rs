use tracing::{debug, info, warn};
use worldproto::{Area, Entity};

use super::{WorldBuilder, persisted};
use crate::ui::{Mode, View};

impl WorldBuilder {
    /// Select an area. What that means depends on `(mode, view)`:
    ///
    /// - `link/edit`: the area becomes an endpoint of the link draft (`to_id`
    ///   first, then `from_id`, then `to_id` again), loading the area's map
    ///   into the link-editor side-cache first when needed.
    /// - `map/details`, `area/details`: jump to the area, switching the primary
    ///   map (and reloading its data) when it lives elsewhere.
    /// - anything else: plain selection.
    ///
    /// The link selection is cleared in every case.
    pub async fn select_area(&self, area: &Area) -> bool {
        let Ok(id) = area.require_id() else {
            warn!("select_area on unsaved area");
            return false;
        };
        self.state().await.selected.link = None;

        let ui = self.ui();
        match (ui.mode, ui.view) {
            (Mode::Link, View::Edit) => self.pick_link_endpoint(area).await,
            (Mode::Map | Mode::Area, View::Details) => {
                let primary = self.state().await.is_primary(&area.map_id);
                if !primary {
                    debug!(area_id = %id, map_id = %area.map_id, "jumping to area on other map");
                    if !self.select_map(&area.map_id).await {
                        return false;
                    }
                }
                self.state().await.selected.area = Some(id);
                true
            }
            _ => {
                self.state().await.selected.area = Some(id);
                true
            }
        }
    }

    pub async fn clear_area_selection(&self) {
        self.state().await.selected.area = None;
    }

    /// Start a new area on the primary map at `(x, y)`.
    pub async fn new_area(&self, x: f64, y: f64) -> bool {
        let Some(map_id) = self.state().await.selected.map.clone() else {
            warn!("new area without a primary map");
            return false;
        };
        self.edit_area(Area::new(map_id, x, y)).await
    }

    /// Refused when the area's map is not loaded, since the editor draws it there.
    pub async fn edit_area(&self, area: Area) -> bool {
        let mut st = self.state().await;
        if !st.maps.contains(&area.map_id) {
            warn!(map_id = %area.map_id, "edit_area: map not loaded");
            return false;
        }
        st.drafts.area = Some(area);
        drop(st);
        self.enter(Mode::Area, View::Edit);
        true
    }

    pub async fn cancel_edit_area(&self) {
        self.state().await.drafts.area = None;
        self.set_view(View::Details);
    }

    pub async fn save_area(&self) -> Option<Area> {
        let draft = self.state().await.drafts.area.clone()?;
        let res = match draft.id.as_ref() {
            None => self.api.create_area(&draft).await,
            Some(id) => self.api.update_area(id, &draft).await,
        };
        let saved = self.surface("save area", persisted(res))?;

        let mut st = self.state().await;
        if st.is_primary(&saved.map_id) {
            let _ = st.areas.upsert(saved.clone());
        } else if let Some(id) = saved.id.as_ref() {
            // Moved to another map: no longer part of the primary dataset.
            st.areas.remove(id);
        }
        st.link_editor.upsert_area(saved.clone());
        st.drafts.area = None;
        drop(st);

        self.bump();
        self.set_view(View::Details);
        Some(saved)
    }

    /// Delete an area and drop every cached link that touches it. The server
    /// is expected to cascade the same way.
    pub async fn delete_area(&self, area: &Area) -> bool {
        let Ok(id) = area.require_id() else {
            return false;
        };
        if self
            .surface("delete area", self.api.delete_area(&id).await)
            .is_none()
        {
            return false;
        }

        let mut st = self.state().await;
        st.areas.remove(&id);
        let dropped = st.links.retain(|l| !l.touches(&id));
        st.link_editor.remove_area(&id);
        if st.selected.area.as_ref() == Some(&id) {
            st.selected.area = None;
        }
        if st
            .selected
            .link
            .as_ref()
            .is_some_and(|l| dropped.contains(l))
        {
            st.selected.link = None;
        }
        if let Some(d) = st.drafts.link.as_mut() {
            if d.from_id.as_ref() == Some(&id) {
                d.from_id = None;
            }
            if d.to_id.as_ref() == Some(&id) {
                d.to_id = None;
            }
        }
        if st.drafts.area.as_ref().and_then(|a| a.id.as_ref()) == Some(&id) {
            st.drafts.area = None;
        }
        drop(st);

        self.bump();
        info!(area_id = %id, links = dropped.len(), "area deleted");
        true
    }
}
