//! In-memory `WorldApi` for unit tests: counts calls, can fail on demand and
//! can hold a map's listing until the test releases it.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;
use worldproto::{
    Area, AreaId, Item, ItemId, Link, LinkId, Map, MapId, ProductId, Shop, ShopId, ShopProduct,
    Template, TemplateId,
};

use crate::api::{MapData, WorldApi};

#[derive(Default)]
struct Store {
    maps: Vec<Map>,
    areas: Vec<Area>,
    links: Vec<Link>,
    shops: Vec<Shop>,
    templates: Vec<Template>,
    items: Vec<Item>,
    next_id: u64,
}

#[derive(Default)]
pub struct FakeApi {
    store: Mutex<Store>,
    calls: Mutex<Vec<String>>,
    fail: Mutex<Option<String>>,
    gates: Mutex<HashMap<MapId, oneshot::Receiver<()>>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_map(&self, map: Map) {
        self.store.lock().unwrap().maps.push(map);
    }

    /// Adds `area`, replacing a seeded area with the same id.
    pub fn seed_area(&self, area: Area) {
        let id = area.id.clone();
        put(&mut self.store.lock().unwrap().areas, area, |a| a.id == id);
    }

    pub fn seed_link(&self, link: Link) {
        self.store.lock().unwrap().links.push(link);
    }

    pub fn seed_shop(&self, shop: Shop) {
        self.store.lock().unwrap().shops.push(shop);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Every call fails with `msg` until `recover` is called.
    pub fn fail_with(&self, msg: &str) {
        *self.fail.lock().unwrap() = Some(msg.to_string());
    }

    pub fn recover(&self) {
        *self.fail.lock().unwrap() = None;
    }

    /// Hold `areas_for_map(map)` until the returned sender fires.
    pub fn gate(&self, map: &MapId) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(map.clone(), rx);
        tx
    }

    fn enter(&self, call: String) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.fail.lock().unwrap().as_ref() {
            Some(msg) => Err(anyhow::anyhow!("{msg}")),
            None => Ok(()),
        }
    }

    fn mint(&self, prefix: &str) -> String {
        let mut st = self.store.lock().unwrap();
        st.next_id += 1;
        format!("{prefix}{}", st.next_id)
    }
}

fn put<T: Clone>(xs: &mut Vec<T>, x: T, same: impl Fn(&T) -> bool) {
    match xs.iter().position(same) {
        Some(i) => xs[i] = x,
        None => xs.push(x),
    }
}

#[async_trait]
impl WorldApi for FakeApi {
    async fn list_maps(&self) -> anyhow::Result<Vec<Map>> {
        self.enter("GET /maps".into())?;
        Ok(self.store.lock().unwrap().maps.clone())
    }

    async fn get_map(&self, id: &MapId) -> anyhow::Result<Map> {
        self.enter(format!("GET /maps/{id}"))?;
        let st = self.store.lock().unwrap();
        st.maps
            .iter()
            .find(|m| m.id.as_ref() == Some(id))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("http=404"))
    }

    async fn map_data(&self, id: &MapId) -> anyhow::Result<MapData> {
        self.enter(format!("GET /maps/{id}/data"))?;
        let st = self.store.lock().unwrap();
        let areas = st
            .areas
            .iter()
            .filter(|a| &a.map_id == id)
            .cloned()
            .collect::<Vec<_>>();
        let links = st
            .links
            .iter()
            .filter(|l| {
                areas
                    .iter()
                    .any(|a| a.id.as_ref().is_some_and(|aid| l.touches(aid)))
            })
            .cloned()
            .collect();
        Ok(MapData { areas, links })
    }

    async fn create_map(&self, map: &Map) -> anyhow::Result<Map> {
        self.enter("POST /maps".into())?;
        let mut m = map.clone();
        m.id = Some(MapId::parse(&self.mint("map"))?);
        self.store.lock().unwrap().maps.push(m.clone());
        Ok(m)
    }

    async fn update_map(&self, id: &MapId, map: &Map) -> anyhow::Result<Map> {
        self.enter(format!("PATCH /maps/{id}"))?;
        let mut m = map.clone();
        for (i, l) in m.labels.iter_mut().enumerate() {
            if l.id.is_none() {
                l.id = Some(worldproto::LabelId::parse(&format!("label{i}"))?);
            }
        }
        put(&mut self.store.lock().unwrap().maps, m.clone(), |x| {
            x.id.as_ref() == Some(id)
        });
        Ok(m)
    }

    async fn delete_map(&self, id: &MapId) -> anyhow::Result<()> {
        self.enter(format!("DELETE /maps/{id}"))?;
        self.store
            .lock()
            .unwrap()
            .maps
            .retain(|m| m.id.as_ref() != Some(id));
        Ok(())
    }

    async fn areas_for_map(&self, map: &MapId) -> anyhow::Result<Vec<Area>> {
        self.enter(format!("GET /areas/map/{map}"))?;
        let gate = self.gates.lock().unwrap().remove(map);
        if let Some(rx) = gate {
            let _ = rx.await;
        }
        let st = self.store.lock().unwrap();
        Ok(st
            .areas
            .iter()
            .filter(|a| &a.map_id == map)
            .cloned()
            .collect())
    }

    async fn create_area(&self, area: &Area) -> anyhow::Result<Area> {
        self.enter("POST /areas".into())?;
        let mut a = area.clone();
        a.id = Some(AreaId::parse(&self.mint("area"))?);
        self.store.lock().unwrap().areas.push(a.clone());
        Ok(a)
    }

    async fn update_area(&self, id: &AreaId, area: &Area) -> anyhow::Result<Area> {
        self.enter(format!("PATCH /areas/{id}"))?;
        put(&mut self.store.lock().unwrap().areas, area.clone(), |x| {
            x.id.as_ref() == Some(id)
        });
        Ok(area.clone())
    }

    async fn delete_area(&self, id: &AreaId) -> anyhow::Result<()> {
        self.enter(format!("DELETE /areas/{id}"))?;
        let mut st = self.store.lock().unwrap();
        st.areas.retain(|a| a.id.as_ref() != Some(id));
        st.links.retain(|l| !l.touches(id));
        Ok(())
    }

    async fn links_for_map(&self, map: &MapId) -> anyhow::Result<Vec<Link>> {
        self.enter(format!("GET /links/map/{map}"))?;
        let st = self.store.lock().unwrap();
        let on_map = st
            .areas
            .iter()
            .filter(|a| &a.map_id == map)
            .filter_map(|a| a.id.clone())
            .collect::<Vec<_>>();
        Ok(st
            .links
            .iter()
            .filter(|l| on_map.iter().any(|a| l.touches(a)))
            .cloned()
            .collect())
    }

    async fn create_link(&self, link: &Link) -> anyhow::Result<Link> {
        self.enter("POST /links".into())?;
        let mut l = link.clone();
        l.id = Some(LinkId::parse(&self.mint("link"))?);
        self.store.lock().unwrap().links.push(l.clone());
        Ok(l)
    }

    async fn update_link(&self, id: &LinkId, link: &Link) -> anyhow::Result<Link> {
        self.enter(format!("PATCH /links/{id}"))?;
        put(&mut self.store.lock().unwrap().links, link.clone(), |x| {
            x.id.as_ref() == Some(id)
        });
        Ok(link.clone())
    }

    async fn delete_link(&self, id: &LinkId) -> anyhow::Result<()> {
        self.enter(format!("DELETE /links/{id}"))?;
        self.store
            .lock()
            .unwrap()
            .links
            .retain(|l| l.id.as_ref() != Some(id));
        Ok(())
    }

    async fn list_shops(&self) -> anyhow::Result<Vec<Shop>> {
        self.enter("GET /shops".into())?;
        Ok(self.store.lock().unwrap().shops.clone())
    }

    async fn create_shop(&self, shop: &Shop) -> anyhow::Result<Shop> {
        self.enter("POST /shops".into())?;
        let mut s = shop.clone();
        s.id = Some(ShopId::parse(&self.mint("shop"))?);
        self.store.lock().unwrap().shops.push(s.clone());
        Ok(s)
    }

    async fn update_shop(&self, id: &ShopId, shop: &Shop) -> anyhow::Result<Shop> {
        self.enter(format!("PATCH /shops/{id}"))?;
        put(&mut self.store.lock().unwrap().shops, shop.clone(), |x| {
            x.id.as_ref() == Some(id)
        });
        Ok(shop.clone())
    }

    async fn delete_shop(&self, id: &ShopId) -> anyhow::Result<()> {
        self.enter(format!("DELETE /shops/{id}"))?;
        self.store
            .lock()
            .unwrap()
            .shops
            .retain(|s| s.id.as_ref() != Some(id));
        Ok(())
    }

    async fn create_product(
        &self,
        shop: &ShopId,
        product: &ShopProduct,
    ) -> anyhow::Result<ShopProduct> {
        self.enter(format!("POST /shops/{shop}/products"))?;
        let mut p = product.clone();
        p.id = Some(ProductId::parse(&self.mint("product"))?);
        p.shop_id = Some(shop.clone());
        Ok(p)
    }

    async fn update_product(
        &self,
        shop: &ShopId,
        id: &ProductId,
        product: &ShopProduct,
    ) -> anyhow::Result<ShopProduct> {
        self.enter(format!("PATCH /shops/{shop}/products/{id}"))?;
        Ok(product.clone())
    }

    async fn delete_product(&self, shop: &ShopId, id: &ProductId) -> anyhow::Result<()> {
        self.enter(format!("DELETE /shops/{shop}/products/{id}"))?;
        Ok(())
    }

    async fn list_templates(&self) -> anyhow::Result<Vec<Template>> {
        self.enter("GET /templates".into())?;
        Ok(self.store.lock().unwrap().templates.clone())
    }

    async fn create_template(&self, template: &Template) -> anyhow::Result<Template> {
        self.enter("POST /templates".into())?;
        let mut t = template.clone();
        t.id = Some(TemplateId::parse(&self.mint("template"))?);
        self.store.lock().unwrap().templates.push(t.clone());
        Ok(t)
    }

    async fn update_template(
        &self,
        id: &TemplateId,
        template: &Template,
    ) -> anyhow::Result<Template> {
        self.enter(format!("PATCH /templates/{id}"))?;
        Ok(template.clone())
    }

    async fn delete_template(&self, id: &TemplateId) -> anyhow::Result<()> {
        self.enter(format!("DELETE /templates/{id}"))?;
        Ok(())
    }

    async fn list_items(&self) -> anyhow::Result<Vec<Item>> {
        self.enter("GET /items".into())?;
        Ok(self.store.lock().unwrap().items.clone())
    }

    async fn create_item(&self, item: &Item) -> anyhow::Result<Item> {
        self.enter("POST /items".into())?;
        let mut it = item.clone();
        it.id = Some(ItemId::parse(&self.mint("item"))?);
        self.store.lock().unwrap().items.push(it.clone());
        Ok(it)
    }

    async fn update_item(&self, id: &ItemId, item: &Item) -> anyhow::Result<Item> {
        self.enter(format!("PATCH /items/{id}"))?;
        Ok(item.clone())
    }

    async fn delete_item(&self, id: &ItemId) -> anyhow::Result<()> {
        self.enter(format!("DELETE /items/{id}"))?;
        Ok(())
    }
}
