use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use worldproto::{
    Area, AreaId, Item, ItemId, Link, LinkId, Map, MapId, ProductId, Shop, ShopId, ShopProduct,
    Template, TemplateId,
};

use crate::api::{MapData, WorldApi};

/// `WorldApi` over the game server's REST endpoints.
///
/// Pass a preconfigured `reqwest::Client` (cookies, default headers, proxies)
/// to hook in whatever session/CSRF layer the host application uses.
#[derive(Clone, Debug)]
pub struct HttpWorldApi {
    client: reqwest::Client,
    base: String,
    token: Option<String>,
}

impl HttpWorldApi {
    pub fn new(base: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base)
    }

    pub fn with_client(client: reqwest::Client, base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            client,
            base,
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let t = token.into();
        self.token = if t.trim().is_empty() { None } else { Some(t) };
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.client.request(method, format!("{}{path}", self.base));
        match self.token.as_deref() {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }

    async fn send(&self, method: Method, path: &str, req: RequestBuilder) -> anyhow::Result<String> {
        debug!(%method, path, "world api request");
        let resp = req
            .send()
            .await
            .with_context(|| format!("{method} {path}"))?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            let body = body.trim();
            if body.is_empty() {
                anyhow::bail!("{method} {path}: http={}", status.as_u16());
            }
            anyhow::bail!("{method} {path}: http={}: {body}", status.as_u16());
        }
        Ok(body)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let req = self.request(Method::GET, path);
        let body = self.send(Method::GET, path, req).await?;
        serde_json::from_str(&body).with_context(|| format!("bad json from GET {path}"))
    }

    async fn write<B, T>(&self, method: Method, path: &str, body: &B) -> anyhow::Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let req = self.request(method.clone(), path).json(body);
        let text = self.send(method.clone(), path, req).await?;
        serde_json::from_str(&text).with_context(|| format!("bad json from {method} {path}"))
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> anyhow::Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        self.write(Method::POST, path, body).await
    }

    async fn patch<B, T>(&self, path: &str, body: &B) -> anyhow::Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        self.write(Method::PATCH, path, body).await
    }

    async fn delete(&self, path: &str) -> anyhow::Result<()> {
        let req = self.request(Method::DELETE, path);
        self.send(Method::DELETE, path, req).await?;
        Ok(())
    }
}

#[async_trait]
impl WorldApi for HttpWorldApi {
    async fn list_maps(&self) -> anyhow::Result<Vec<Map>> {
        self.get("/maps").await
    }

    async fn get_map(&self, id: &MapId) -> anyhow::Result<Map> {
        self.get(&format!("/maps/{id}")).await
    }

    async fn map_data(&self, id: &MapId) -> anyhow::Result<MapData> {
        self.get(&format!("/maps/{id}/data")).await
    }

    async fn create_map(&self, map: &Map) -> anyhow::Result<Map> {
        self.post("/maps", map).await
    }

    async fn update_map(&self, id: &MapId, map: &Map) -> anyhow::Result<Map> {
        self.patch(&format!("/maps/{id}"), map).await
    }

    async fn delete_map(&self, id: &MapId) -> anyhow::Result<()> {
        self.delete(&format!("/maps/{id}")).await
    }

    async fn areas_for_map(&self, map: &MapId) -> anyhow::Result<Vec<Area>> {
        self.get(&format!("/areas/map/{map}")).await
    }

    async fn create_area(&self, area: &Area) -> anyhow::Result<Area> {
        self.post("/areas", area).await
    }

    async fn update_area(&self, id: &AreaId, area: &Area) -> anyhow::Result<Area> {
        self.patch(&format!("/areas/{id}"), area).await
    }

    async fn delete_area(&self, id: &AreaId) -> anyhow::Result<()> {
        self.delete(&format!("/areas/{id}")).await
    }

    async fn links_for_map(&self, map: &MapId) -> anyhow::Result<Vec<Link>> {
        self.get(&format!("/links/map/{map}")).await
    }

    async fn create_link(&self, link: &Link) -> anyhow::Result<Link> {
        self.post("/links", link).await
    }

    async fn update_link(&self, id: &LinkId, link: &Link) -> anyhow::Result<Link> {
        self.patch(&format!("/links/{id}"), link).await
    }

    async fn delete_link(&self, id: &LinkId) -> anyhow::Result<()> {
        self.delete(&format!("/links/{id}")).await
    }

    async fn list_shops(&self) -> anyhow::Result<Vec<Shop>> {
        self.get("/shops").await
    }

    async fn create_shop(&self, shop: &Shop) -> anyhow::Result<Shop> {
        self.post("/shops", shop).await
    }

    async fn update_shop(&self, id: &ShopId, shop: &Shop) -> anyhow::Result<Shop> {
        self.patch(&format!("/shops/{id}"), shop).await
    }

    async fn delete_shop(&self, id: &ShopId) -> anyhow::Result<()> {
        self.delete(&format!("/shops/{id}")).await
    }

    async fn create_product(
        &self,
        shop: &ShopId,
        product: &ShopProduct,
    ) -> anyhow::Result<ShopProduct> {
        self.post(&format!("/shops/{shop}/products"), product).await
    }

    async fn update_product(
        &self,
        shop: &ShopId,
        id: &ProductId,
        product: &ShopProduct,
    ) -> anyhow::Result<ShopProduct> {
        self.patch(&format!("/shops/{shop}/products/{id}"), product)
            .await
    }

    async fn delete_product(&self, shop: &ShopId, id: &ProductId) -> anyhow::Result<()> {
        self.delete(&format!("/shops/{shop}/products/{id}")).await
    }

    async fn list_templates(&self) -> anyhow::Result<Vec<Template>> {
        self.get("/templates").await
    }

    async fn create_template(&self, template: &Template) -> anyhow::Result<Template> {
        self.post("/templates", template).await
    }

    async fn update_template(
        &self,
        id: &TemplateId,
        template: &Template,
    ) -> anyhow::Result<Template> {
        self.patch(&format!("/templates/{id}"), template).await
    }

    async fn delete_template(&self, id: &TemplateId) -> anyhow::Result<()> {
        self.delete(&format!("/templates/{id}")).await
    }

    async fn list_items(&self) -> anyhow::Result<Vec<Item>> {
        self.get("/items").await
    }

    async fn create_item(&self, item: &Item) -> anyhow::Result<Item> {
        self.post("/items", item).await
    }

    async fn update_item(&self, id: &ItemId, item: &Item) -> anyhow::Result<Item> {
        self.patch(&format!("/items/{id}"), item).await
    }

    async fn delete_item(&self, id: &ItemId) -> anyhow::Result<()> {
        self.delete(&format!("/items/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let api = HttpWorldApi::new("http://127.0.0.1:9000/api/");
        assert_eq!(api.base(), "http://127.0.0.1:9000/api");
    }

    #[test]
    fn blank_token_is_ignored() {
        let api = HttpWorldApi::new("http://x").with_token("  ");
        assert!(api.token.is_none());
        let api = HttpWorldApi::new("http://x").with_token("abc");
        assert_eq!(api.token.as_deref(), Some("abc"));
    }
}
