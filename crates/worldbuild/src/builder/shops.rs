use anyhow::Context;
use tracing::info;
use worldproto::{Area, Entity, ProductId, Shop, ShopId, ShopProduct};

use super::{BuildState, WorldBuilder, persisted};
use crate::ui::View;

impl WorldBuilder {
    pub async fn load_shops(&self) -> bool {
        let Some(shops) = self.surface("load shops", self.api.list_shops().await) else {
            return false;
        };
        let n = self.state().await.shops.replace_all(shops);
        self.bump();
        info!(shops = n, "shops loaded");
        true
    }

    pub async fn select_shop(&self, shop: &Shop) -> bool {
        let Ok(id) = shop.require_id() else {
            return false;
        };
        self.state().await.selected.shop = Some(id);
        true
    }

    /// Start a shop, attached to `area` when given.
    pub async fn new_shop(&self, area: Option<&Area>) {
        let area_id = area.and_then(|a| a.id.clone());
        self.edit_shop(Shop {
            area_id,
            ..Shop::default()
        })
        .await
    }

    pub async fn edit_shop(&self, shop: Shop) {
        self.state().await.drafts.shop = Some(shop);
        self.set_view(View::EditItem);
    }

    pub async fn cancel_edit_shop(&self) {
        self.state().await.drafts.shop = None;
        self.set_view(View::Details);
    }

    pub async fn save_shop(&self) -> Option<Shop> {
        let draft = self.state().await.drafts.shop.clone()?;
        let res = match draft.id.as_ref() {
            None => self.api.create_shop(&draft).await,
            Some(id) => self.api.update_shop(id, &draft).await,
        };
        let saved = self.surface("save shop", persisted(res))?;

        let mut st = self.state().await;
        let _ = st.shops.upsert(saved.clone());
        mirror_shop_into_areas(&mut st, &saved);
        st.drafts.shop = None;
        drop(st);

        self.bump();
        self.set_view(View::Details);
        Some(saved)
    }

    pub async fn delete_shop(&self, shop: &Shop) -> bool {
        let Ok(id) = shop.require_id() else {
            return false;
        };
        if self
            .surface("delete shop", self.api.delete_shop(&id).await)
            .is_none()
        {
            return false;
        }

        let mut st = self.state().await;
        st.shops.remove(&id);
        for a in st.areas.values_mut() {
            a.shops.retain(|s| s.id.as_ref() != Some(&id));
        }
        if st.selected.shop.as_ref() == Some(&id) {
            st.selected.shop = None;
        }
        drop(st);

        self.bump();
        info!(shop_id = %id, "shop deleted");
        true
    }

    // ---- products: persisted under their shop ----

    pub async fn new_product(&self, shop: &Shop) -> bool {
        let Ok(id) = shop.require_id() else {
            return false;
        };
        self.edit_product(ShopProduct {
            shop_id: Some(id),
            ..ShopProduct::default()
        })
        .await;
        true
    }

    pub async fn edit_product(&self, product: ShopProduct) {
        self.state().await.drafts.product = Some(product);
        self.set_view(View::EditItem);
    }

    pub async fn cancel_edit_product(&self) {
        self.state().await.drafts.product = None;
        self.set_view(View::Details);
    }

    pub async fn save_product(&self) -> Option<ShopProduct> {
        let draft = self.state().await.drafts.product.clone()?;
        let res = async {
            let shop = draft.shop_id.as_ref().context("shop product has no shop")?;
            let saved = match draft.id.as_ref() {
                None => self.api.create_product(shop, &draft).await?,
                Some(id) => self.api.update_product(shop, id, &draft).await?,
            };
            if saved.id.is_none() {
                anyhow::bail!("server returned shop product without an id");
            }
            anyhow::Ok((shop.clone(), saved))
        }
        .await;
        let (shop_id, saved) = self.surface("save shop product", res)?;

        let mut st = self.state().await;
        for_each_copy_of_shop(&mut st, &shop_id, |shop| shop.upsert_product(saved.clone()));
        st.drafts.product = None;
        drop(st);

        self.bump();
        self.set_view(View::Details);
        Some(saved)
    }

    pub async fn delete_product(&self, product: &ShopProduct) -> bool {
        let (Some(shop_id), Some(id)) = (product.shop_id.clone(), product.id.clone()) else {
            return false;
        };
        if self
            .surface(
                "delete shop product",
                self.api.delete_product(&shop_id, &id).await,
            )
            .is_none()
        {
            return false;
        }

        let mut st = self.state().await;
        for_each_copy_of_shop(&mut st, &shop_id, |shop| {
            shop.remove_product(&id);
        });
        clear_product_draft(&mut st, &id);
        drop(st);

        self.bump();
        true
    }
}

/// Keep the copy embedded in the owning area in step with the shop cache.
fn mirror_shop_into_areas(st: &mut BuildState, shop: &Shop) {
    let Some(id) = shop.id.as_ref() else {
        return;
    };
    for a in st.areas.values_mut() {
        let owns = shop.area_id.as_ref() == a.id.as_ref() && a.id.is_some();
        let pos = a.shops.iter().position(|s| s.id.as_ref() == Some(id));
        match (pos, owns) {
            (Some(i), true) => a.shops[i] = shop.clone(),
            (Some(i), false) => {
                a.shops.remove(i);
            }
            (None, true) => a.shops.push(shop.clone()),
            (None, false) => {}
        }
    }
}

/// Apply `f` to shop `id` wherever it is held. Areas from map data can embed
/// shops that were never listed on their own, so those copies are edited in
/// place when the shop cache has no entry.
fn for_each_copy_of_shop(st: &mut BuildState, id: &ShopId, f: impl Fn(&mut Shop)) {
    let cached = st.shops.get_mut(id).map(|shop| {
        f(shop);
        shop.clone()
    });
    if let Some(shop) = cached {
        mirror_shop_into_areas(st, &shop);
        return;
    }
    for a in st.areas.values_mut() {
        for shop in a.shops.iter_mut().filter(|s| s.id.as_ref() == Some(id)) {
            f(shop);
        }
    }
}

fn clear_product_draft(st: &mut BuildState, id: &ProductId) {
    if st.drafts.product.as_ref().and_then(|p| p.id.as_ref()) == Some(id) {
        st.drafts.product = None;
    }
}
