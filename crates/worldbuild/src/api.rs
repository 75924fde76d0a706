use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use worldproto::{
    Area, AreaId, Item, ItemId, Link, LinkId, Map, MapId, ProductId, Shop, ShopId, ShopProduct,
    Template, TemplateId,
};

/// Body of `GET /maps/:id/data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapData {
    pub areas: Vec<Area>,
    pub links: Vec<Link>,
}

/// The remote CRUD surface the builder mirrors. Auth, CSRF and retries belong
/// to whoever implements this.
///
/// Create/update calls return the server's canonical copy of the entity.
#[async_trait]
pub trait WorldApi: Send + Sync {
    async fn list_maps(&self) -> anyhow::Result<Vec<Map>>;
    async fn get_map(&self, id: &MapId) -> anyhow::Result<Map>;
    async fn map_data(&self, id: &MapId) -> anyhow::Result<MapData>;
    async fn create_map(&self, map: &Map) -> anyhow::Result<Map>;
    async fn update_map(&self, id: &MapId, map: &Map) -> anyhow::Result<Map>;
    async fn delete_map(&self, id: &MapId) -> anyhow::Result<()>;

    async fn areas_for_map(&self, map: &MapId) -> anyhow::Result<Vec<Area>>;
    async fn create_area(&self, area: &Area) -> anyhow::Result<Area>;
    async fn update_area(&self, id: &AreaId, area: &Area) -> anyhow::Result<Area>;
    async fn delete_area(&self, id: &AreaId) -> anyhow::Result<()>;

    async fn links_for_map(&self, map: &MapId) -> anyhow::Result<Vec<Link>>;
    async fn create_link(&self, link: &Link) -> anyhow::Result<Link>;
    async fn update_link(&self, id: &LinkId, link: &Link) -> anyhow::Result<Link>;
    async fn delete_link(&self, id: &LinkId) -> anyhow::Result<()>;

    async fn list_shops(&self) -> anyhow::Result<Vec<Shop>>;
    async fn create_shop(&self, shop: &Shop) -> anyhow::Result<Shop>;
    async fn update_shop(&self, id: &ShopId, shop: &Shop) -> anyhow::Result<Shop>;
    async fn delete_shop(&self, id: &ShopId) -> anyhow::Result<()>;

    async fn create_product(
        &self,
        shop: &ShopId,
        product: &ShopProduct,
    ) -> anyhow::Result<ShopProduct>;
    async fn update_product(
        &self,
        shop: &ShopId,
        id: &ProductId,
        product: &ShopProduct,
    ) -> anyhow::Result<ShopProduct>;
    async fn delete_product(&self, shop: &ShopId, id: &ProductId) -> anyhow::Result<()>;

    async fn list_templates(&self) -> anyhow::Result<Vec<Template>>;
    async fn create_template(&self, template: &Template) -> anyhow::Result<Template>;
    async fn update_template(
        &self,
        id: &TemplateId,
        template: &Template,
    ) -> anyhow::Result<Template>;
    async fn delete_template(&self, id: &TemplateId) -> anyhow::Result<()>;

    async fn list_items(&self) -> anyhow::Result<Vec<Item>>;
    async fn create_item(&self, item: &Item) -> anyhow::Result<Item>;
    async fn update_item(&self, id: &ItemId, item: &Item) -> anyhow::Result<Item>;
    async fn delete_item(&self, id: &ItemId) -> anyhow::Result<()>;
}
