use serde::{Deserialize, Serialize};

use crate::Entity;
use crate::ids::{AreaId, ProductId, ShopId, TemplateId, empty_as_none};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shop {
    #[serde(
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<ShopId>,
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "empty_as_none")]
    pub area_id: Option<AreaId>,
    pub products: Vec<ShopProduct>,
}

impl Shop {
    pub fn upsert_product(&mut self, product: ShopProduct) {
        if let Some(id) = product.id.as_ref() {
            if let Some(slot) = self
                .products
                .iter_mut()
                .find(|p| p.id.as_ref() == Some(id))
            {
                *slot = product;
                return;
            }
        }
        self.products.push(product);
    }

    pub fn remove_product(&mut self, id: &ProductId) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p.id.as_ref() != Some(id));
        self.products.len() != before
    }
}

impl Entity for Shop {
    type Id = ShopId;

    const KIND: &'static str = "shop";

    fn id(&self) -> Option<&ShopId> {
        self.id.as_ref()
    }

    fn sort_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopProduct {
    #[serde(
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<ProductId>,
    #[serde(deserialize_with = "empty_as_none")]
    pub shop_id: Option<ShopId>,
    #[serde(deserialize_with = "empty_as_none")]
    pub template_id: Option<TemplateId>,
    pub description: String,
    pub price: Price,
}

/// Four-denomination price. Denominations are not normalized against each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Price {
    pub copper: u32,
    pub bronze: u32,
    pub silver: u32,
    pub gold: u32,
}

impl Price {
    pub fn is_free(&self) -> bool {
        self.copper == 0 && self.bronze == 0 && self.silver == 0 && self.gold == 0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_free() {
            return f.write_str("free");
        }
        let parts = [
            (self.gold, "g"),
            (self.silver, "s"),
            (self.bronze, "b"),
            (self.copper, "c"),
        ];
        let mut first = true;
        for (n, unit) in parts {
            if n == 0 {
                continue;
            }
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{n}{unit}")?;
            first = false;
        }
        Ok(())
    }
}
