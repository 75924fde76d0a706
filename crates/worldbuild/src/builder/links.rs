use tracing::{debug, info, warn};
use worldproto::{Area, AreaId, Entity, Link, MapId};

use super::{WorldBuilder, persisted};
use crate::cache::EntityCache;
use crate::ui::{Mode, View};

impl WorldBuilder {
    pub async fn select_link(&self, link: &Link) -> bool {
        let Ok(id) = link.require_id() else {
            return false;
        };
        self.state().await.selected.link = Some(id);
        true
    }

    pub async fn clear_link_selection(&self) {
        self.state().await.selected.link = None;
    }

    /// Start a link whose endpoints will be picked by selecting areas.
    pub async fn new_link(&self) {
        self.edit_link(Link::default()).await
    }

    /// Start a link leaving `from`.
    pub async fn new_link_from(&self, from: &Area) -> bool {
        let Ok(id) = from.require_id() else {
            return false;
        };
        self.edit_link(Link {
            from_id: Some(id),
            ..Link::default()
        })
        .await;
        true
    }

    pub async fn edit_link(&self, link: Link) {
        self.state().await.drafts.link = Some(link);
        self.enter(Mode::Link, View::Edit);
    }

    pub async fn cancel_edit_link(&self) {
        self.state().await.drafts.link = None;
        self.set_view(View::Details);
    }

    pub async fn save_link(&self) -> Option<Link> {
        let draft = self.state().await.drafts.link.clone()?;
        let res = match draft.id.as_ref() {
            None => self.api.create_link(&draft).await,
            Some(id) => self.api.update_link(id, &draft).await,
        };
        let saved = self.surface("save link", persisted(res))?;

        let mut st = self.state().await;
        let _ = st.links.upsert(saved.clone());
        st.link_editor.upsert_link(saved.clone());
        st.drafts.link = None;
        drop(st);

        self.bump();
        self.set_view(View::Details);
        Some(saved)
    }

    pub async fn delete_link(&self, link: &Link) -> bool {
        let Ok(id) = link.require_id() else {
            return false;
        };
        if self
            .surface("delete link", self.api.delete_link(&id).await)
            .is_none()
        {
            return false;
        }

        let mut st = self.state().await;
        st.links.remove(&id);
        st.link_editor.remove_link(&id);
        if st.selected.link.as_ref() == Some(&id) {
            st.selected.link = None;
        }
        if st.drafts.link.as_ref().and_then(|l| l.id.as_ref()) == Some(&id) {
            st.drafts.link = None;
        }
        drop(st);

        self.bump();
        info!(link_id = %id, "link deleted");
        true
    }

    /// `link/edit` branch of `select_area`.
    pub(super) async fn pick_link_endpoint(&self, area: &Area) -> bool {
        let Ok(id) = area.require_id() else {
            return false;
        };
        let needs_side_load = {
            let st = self.state().await;
            let Some(draft) = st.drafts.link.as_ref() else {
                warn!("link/edit without a link draft");
                return false;
            };
            if draft.touches(&id) {
                debug!(area_id = %id, "area is already an endpoint");
                return false;
            }
            st.link_editor.map_id() != Some(&area.map_id)
        };

        if needs_side_load && !self.load_data_for_link_editor(&area.map_id).await {
            return false;
        }

        let mut st = self.state().await;
        let Some(draft) = st.drafts.link.as_mut() else {
            return false;
        };
        assign_endpoint(draft, id);
        true
    }

    /// Fill the side-cache with `map_id`'s areas and links.
    ///
    /// The primary map is served from the primary caches without touching the
    /// network. Otherwise both listings are fetched; if another load started
    /// meanwhile, this one's result is discarded.
    pub async fn load_data_for_link_editor(&self, map_id: &MapId) -> bool {
        let generation = {
            let mut st = self.state().await;
            let generation = st.link_editor.begin();
            if st.is_primary(map_id) {
                let areas = st.areas.clone();
                let links = st.links.clone();
                st.link_editor
                    .commit(generation, map_id.clone(), areas, links);
                drop(st);
                self.bump();
                return true;
            }
            generation
        };

        let res = async {
            let areas = self.api.areas_for_map(map_id).await?;
            let links = self.api.links_for_map(map_id).await?;
            anyhow::Ok((areas, links))
        }
        .await;

        let mut st = self.state().await;
        let (areas, links) = match res {
            Ok(v) => v,
            Err(e) => {
                // A superseded load still reports its failure.
                st.link_editor.abort(generation);
                drop(st);
                let _ = self.surface::<()>("load link editor data", Err(e));
                return false;
            }
        };
        if !st.link_editor.is_current(generation) {
            debug!(map_id = %map_id, generation, "stale link editor load dropped");
            return false;
        }
        st.link_editor.commit(
            generation,
            map_id.clone(),
            EntityCache::from_vec(areas),
            EntityCache::from_vec(links),
        );
        drop(st);

        self.bump();
        debug!(map_id = %map_id, generation, "link editor data loaded");
        true
    }
}

/// `to_id` first, then `from_id`; with both set, the new pick replaces `to_id`.
fn assign_endpoint(draft: &mut Link, id: AreaId) {
    if draft.to_id.is_none() {
        draft.to_id = Some(id);
    } else if draft.from_id.is_none() {
        draft.from_id = Some(id);
    } else {
        draft.to_id = Some(id);
    }
}
