use tracing::{info, warn};
use worldproto::{Entity, LabelId, Map, MapId, MapLabel};

use super::{WorldBuilder, persisted};
use crate::ui::{Mode, View};

impl WorldBuilder {
    /// Replace the map listing with the server's.
    pub async fn load_maps(&self) -> bool {
        let Some(maps) = self.surface("load maps", self.api.list_maps().await) else {
            return false;
        };
        let mut st = self.state().await;
        let n = st.maps.replace_all(maps);
        if let Some(id) = st.selected.map.clone() {
            if !st.maps.contains(&id) {
                warn!(map_id = %id, "primary map vanished from listing");
            }
        }
        drop(st);
        self.bump();
        info!(maps = n, "maps loaded");
        true
    }

    pub async fn load_map(&self, id: &MapId) -> Option<Map> {
        let map = self.surface("load map", persisted(self.api.get_map(id).await))?;
        let mut st = self.state().await;
        let _ = st.maps.upsert(map.clone());
        drop(st);
        self.bump();
        Some(map)
    }

    /// Make `id` the primary map and pull its full dataset.
    ///
    /// Nothing is switched unless both the map and its areas/links arrive.
    pub async fn select_map(&self, id: &MapId) -> bool {
        let cached = self.state().await.maps.get(id).cloned();
        let map = match cached {
            Some(m) => m,
            None => match self.surface("load map", persisted(self.api.get_map(id).await)) {
                Some(m) => m,
                None => return false,
            },
        };
        let Some(data) = self.surface("load map data", self.api.map_data(id).await) else {
            return false;
        };

        let mut st = self.state().await;
        let _ = st.maps.upsert(map);
        st.selected.map = Some(id.clone());
        let areas = st.areas.replace_all(data.areas);
        let links = st.links.replace_all(data.links);
        st.selected.area = None;
        st.selected.link = None;
        st.link_editor.reset();
        self.reset_zoom(&mut st);
        drop(st);

        self.bump();
        info!(map_id = %id, areas, links, "primary map loaded");
        true
    }

    /// Re-pull the primary map's areas and links.
    pub async fn reload_map_data(&self) -> bool {
        let Some(id) = self.state().await.selected.map.clone() else {
            return false;
        };
        self.select_map(&id).await
    }

    pub async fn new_map(&self) {
        self.edit_map(Map::default()).await
    }

    pub async fn edit_map(&self, map: Map) {
        self.state().await.drafts.map = Some(map);
        self.enter(Mode::Map, View::Edit);
    }

    pub async fn cancel_edit_map(&self) {
        self.state().await.drafts.map = None;
        self.set_view(View::Details);
    }

    pub async fn save_map(&self) -> Option<Map> {
        let draft = self.state().await.drafts.map.clone()?;
        let res = match draft.id.as_ref() {
            None => self.api.create_map(&draft).await,
            Some(id) => self.api.update_map(id, &draft).await,
        };
        let saved = self.surface("save map", persisted(res))?;

        let mut st = self.state().await;
        let _ = st.maps.upsert(saved.clone());
        st.drafts.map = None;
        if saved.id.as_ref().is_some_and(|id| st.is_primary(id)) {
            st.zoom.update_bounds(Some(&saved));
        }
        drop(st);

        self.bump();
        self.set_view(View::Details);
        Some(saved)
    }

    pub async fn delete_map(&self, map: &Map) -> bool {
        let Ok(id) = map.require_id() else {
            return false;
        };
        if self
            .surface("delete map", self.api.delete_map(&id).await)
            .is_none()
        {
            return false;
        }

        let mut st = self.state().await;
        st.maps.remove(&id);
        if st.is_primary(&id) {
            st.selected.map = None;
            st.selected.area = None;
            st.selected.link = None;
            st.areas.clear();
            st.links.clear();
            st.link_editor.reset();
            self.reset_zoom(&mut st);
        } else if st.link_editor.map_id() == Some(&id) {
            st.link_editor.reset();
        }
        if st.drafts.map.as_ref().and_then(|m| m.id.as_ref()) == Some(&id) {
            st.drafts.map = None;
        }
        drop(st);

        self.bump();
        info!(map_id = %id, "map deleted");
        true
    }

    // ---- labels: stored inline, persisted by updating the owning map ----

    pub async fn new_label(&self, x: f64, y: f64) -> bool {
        self.edit_label(MapLabel {
            x,
            y,
            ..MapLabel::default()
        })
        .await
    }

    /// Labels can only be edited on the primary map.
    pub async fn edit_label(&self, label: MapLabel) -> bool {
        let mut st = self.state().await;
        if st.selected_map().is_none() {
            warn!("label edit without a primary map");
            return false;
        }
        st.drafts.label = Some(label);
        drop(st);
        self.enter(Mode::Map, View::Label);
        true
    }

    pub async fn cancel_edit_label(&self) {
        self.state().await.drafts.label = None;
        self.set_view(View::Details);
    }

    pub async fn save_label(&self) -> Option<Map> {
        let (id, mut map, label) = {
            let st = self.state().await;
            let label = st.drafts.label.clone()?;
            let map = st.selected_map()?.clone();
            (map.require_id().ok()?, map, label)
        };
        map.upsert_label(label);
        let saved = self.surface(
            "save label",
            persisted(self.api.update_map(&id, &map).await),
        )?;

        let mut st = self.state().await;
        let _ = st.maps.upsert(saved.clone());
        st.drafts.label = None;
        drop(st);

        self.bump();
        self.set_view(View::Details);
        Some(saved)
    }

    pub async fn delete_label(&self, label: &LabelId) -> bool {
        let Some(mut map) = self.selected_map().await else {
            return false;
        };
        let Ok(id) = map.require_id() else {
            return false;
        };
        if !map.remove_label(label) {
            return false;
        }
        let Some(saved) = self.surface(
            "delete label",
            persisted(self.api.update_map(&id, &map).await),
        ) else {
            return false;
        };

        let mut st = self.state().await;
        let _ = st.maps.upsert(saved);
        if st.drafts.label.as_ref().and_then(|l| l.id.as_ref()) == Some(label) {
            st.drafts.label = None;
        }
        drop(st);
        self.bump();
        true
    }
}
