use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, watch};
use tracing::{debug, warn};
use worldproto::{
    Area, AreaId, Entity, Item, ItemId, Link, LinkId, Map, MapId, MapLabel, Shop, ShopId,
    ShopProduct, Template, TemplateId,
};

use crate::alert::Alert;
use crate::api::WorldApi;
use crate::cache::EntityCache;
use crate::link_editor::{LinkEditorCache, LinkEditorStatus};
use crate::ui::{Mode, UiFlags, UiState, View};
use crate::zoom::{DEFAULT_ZOOM_INDEX, Zoom};

mod areas;
mod items;
mod links;
mod maps;
mod shops;

/// `$get` returns a copy of the draft; `$update` edits it in place (form input).
/// Both are no-ops when nothing of that kind is being edited.
macro_rules! draft_accessors {
    ($($get:ident, $update:ident, $field:ident: $ty:ty;)*) => {
        impl WorldBuilder {
            $(
                pub async fn $get(&self) -> Option<$ty> {
                    self.state().await.drafts.$field.clone()
                }

                pub async fn $update(&self, f: impl FnOnce(&mut $ty) + Send) -> bool {
                    let mut st = self.state().await;
                    match st.drafts.$field.as_mut() {
                        Some(d) => {
                            f(d);
                            true
                        }
                        None => false,
                    }
                }
            )*
        }
    };
}

draft_accessors! {
    map_draft, update_map_draft, map: Map;
    label_draft, update_label_draft, label: MapLabel;
    area_draft, update_area_draft, area: Area;
    link_draft, update_link_draft, link: Link;
    shop_draft, update_shop_draft, shop: Shop;
    product_draft, update_product_draft, product: ShopProduct;
    item_draft, update_item_draft, item: Item;
    template_draft, update_template_draft, template: Template;
}

#[derive(Clone, Debug)]
pub struct BuilderConfig {
    /// Zoom index used whenever a map becomes primary.
    pub default_zoom_index: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            default_zoom_index: DEFAULT_ZOOM_INDEX,
        }
    }
}

/// Unsaved copies of whatever is being edited. Never aliased with a cache entry.
#[derive(Debug, Default)]
struct Drafts {
    map: Option<Map>,
    label: Option<MapLabel>,
    area: Option<Area>,
    link: Option<Link>,
    shop: Option<Shop>,
    product: Option<ShopProduct>,
    item: Option<Item>,
    template: Option<Template>,
}

#[derive(Debug, Default)]
struct Selection {
    map: Option<MapId>,
    area: Option<AreaId>,
    link: Option<LinkId>,
    shop: Option<ShopId>,
    item: Option<ItemId>,
    template: Option<TemplateId>,
}

#[derive(Debug, Default)]
struct BuildState {
    maps: EntityCache<Map>,
    areas: EntityCache<Area>,
    links: EntityCache<Link>,
    shops: EntityCache<Shop>,
    templates: EntityCache<Template>,
    items: EntityCache<Item>,
    selected: Selection,
    drafts: Drafts,
    link_editor: LinkEditorCache,
    zoom: Zoom,
}

impl BuildState {
    fn selected_map(&self) -> Option<&Map> {
        self.selected.map.as_ref().and_then(|id| self.maps.get(id))
    }

    fn is_primary(&self, map: &MapId) -> bool {
        self.selected.map.as_ref() == Some(map)
    }
}

/// The world-builder coordinator. See the crate docs for the concurrency model.
pub struct WorldBuilder {
    api: Arc<dyn WorldApi>,
    alert: Arc<dyn Alert>,
    cfg: BuilderConfig,
    st: Mutex<BuildState>,
    ui: watch::Sender<UiState>,
}

impl WorldBuilder {
    pub fn new(api: Arc<dyn WorldApi>, alert: Arc<dyn Alert>) -> Self {
        Self::with_config(api, alert, BuilderConfig::default())
    }

    pub fn with_config(api: Arc<dyn WorldApi>, alert: Arc<dyn Alert>, cfg: BuilderConfig) -> Self {
        let (ui, _) = watch::channel(UiState::default());
        let st = BuildState {
            zoom: Zoom::new(cfg.default_zoom_index, None),
            ..BuildState::default()
        };
        Self {
            api,
            alert,
            cfg,
            st: Mutex::new(st),
            ui,
        }
    }

    async fn state(&self) -> MutexGuard<'_, BuildState> {
        self.st.lock().await
    }

    /// Report a failed remote call to the user; `None` means "commit nothing".
    fn surface<T>(&self, what: &str, res: anyhow::Result<T>) -> Option<T> {
        match res {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(err = %format!("{e:#}"), "{what} failed");
                self.alert.alert(&format!("{what} failed: {e:#}"));
                None
            }
        }
    }

    // ---- (mode, view) ----

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.ui.subscribe()
    }

    pub fn ui(&self) -> UiState {
        *self.ui.borrow()
    }

    pub fn flags(&self) -> UiFlags {
        self.ui().flags()
    }

    pub fn mode(&self) -> Mode {
        self.ui().mode
    }

    pub fn view(&self) -> View {
        self.ui().view
    }

    pub fn set_mode(&self, mode: Mode) {
        self.ui.send_if_modified(|s| {
            let changed = s.mode != mode;
            s.mode = mode;
            changed
        });
    }

    pub fn set_view(&self, view: View) {
        self.ui.send_if_modified(|s| {
            let changed = s.view != view;
            s.view = view;
            changed
        });
    }

    fn enter(&self, mode: Mode, view: View) {
        self.ui.send_if_modified(|s| {
            let changed = s.mode != mode || s.view != view;
            s.mode = mode;
            s.view = view;
            changed
        });
    }

    /// Called after every cache commit.
    fn bump(&self) {
        self.ui.send_modify(|s| s.revision += 1);
    }

    // ---- projections ----

    pub async fn maps(&self) -> Vec<Map> {
        self.state().await.maps.snapshot()
    }

    pub async fn map(&self, id: &MapId) -> Option<Map> {
        self.state().await.maps.get(id).cloned()
    }

    pub async fn areas(&self) -> Vec<Area> {
        self.state().await.areas.snapshot()
    }

    pub async fn area(&self, id: &AreaId) -> Option<Area> {
        self.state().await.areas.get(id).cloned()
    }

    pub async fn links(&self) -> Vec<Link> {
        self.state().await.links.snapshot()
    }

    pub async fn link(&self, id: &LinkId) -> Option<Link> {
        self.state().await.links.get(id).cloned()
    }

    pub async fn shops(&self) -> Vec<Shop> {
        self.state().await.shops.snapshot()
    }

    pub async fn shop(&self, id: &ShopId) -> Option<Shop> {
        self.state().await.shops.get(id).cloned()
    }

    pub async fn templates(&self) -> Vec<Template> {
        self.state().await.templates.snapshot()
    }

    pub async fn items(&self) -> Vec<Item> {
        self.state().await.items.snapshot()
    }

    pub async fn link_editor_areas(&self) -> Vec<Area> {
        self.state().await.link_editor.areas().snapshot()
    }

    pub async fn link_editor_links(&self) -> Vec<Link> {
        self.state().await.link_editor.links().snapshot()
    }

    pub async fn link_editor_status(&self) -> LinkEditorStatus {
        self.state().await.link_editor.status()
    }

    pub async fn selected_map(&self) -> Option<Map> {
        self.state().await.selected_map().cloned()
    }

    pub async fn selected_area(&self) -> Option<Area> {
        let st = self.state().await;
        st.selected.area.as_ref().and_then(|id| st.areas.get(id)).cloned()
    }

    pub async fn selected_link(&self) -> Option<Link> {
        let st = self.state().await;
        st.selected.link.as_ref().and_then(|id| st.links.get(id)).cloned()
    }

    pub async fn selected_shop(&self) -> Option<Shop> {
        let st = self.state().await;
        st.selected.shop.as_ref().and_then(|id| st.shops.get(id)).cloned()
    }

    pub async fn selected_item(&self) -> Option<Item> {
        let st = self.state().await;
        st.selected.item.as_ref().and_then(|id| st.items.get(id)).cloned()
    }

    pub async fn selected_template(&self) -> Option<Template> {
        let st = self.state().await;
        st.selected
            .template
            .as_ref()
            .and_then(|id| st.templates.get(id))
            .cloned()
    }

    // ---- zoom ----

    pub async fn zoom(&self) -> Zoom {
        self.state().await.zoom
    }

    pub async fn zoom_map_in(&self) -> Zoom {
        let mut st = self.state().await;
        let map = st.selected_map().cloned();
        if !st.zoom.zoom_in(map.as_ref()) {
            debug!(index = st.zoom.index(), "already fully zoomed in");
        }
        st.zoom
    }

    pub async fn zoom_map_out(&self) -> Zoom {
        let mut st = self.state().await;
        let map = st.selected_map().cloned();
        if !st.zoom.zoom_out(map.as_ref()) {
            debug!(index = st.zoom.index(), "already fully zoomed out");
        }
        st.zoom
    }

    fn reset_zoom(&self, st: &mut BuildState) {
        let map = st.selected_map().cloned();
        st.zoom = Zoom::new(self.cfg.default_zoom_index, map.as_ref());
    }
}

/// Server replies to create/update must carry an id or they cannot be cached.
fn persisted<E: Entity>(res: anyhow::Result<E>) -> anyhow::Result<E> {
    let e = res?;
    e.require_id()?;
    Ok(e)
}
