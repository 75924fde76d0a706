use tracing::info;
use worldproto::{Entity, Item, Template};

use super::{WorldBuilder, persisted};
use crate::ui::View;

impl WorldBuilder {
    pub async fn load_items(&self) -> bool {
        let Some(items) = self.surface("load items", self.api.list_items().await) else {
            return false;
        };
        let n = self.state().await.items.replace_all(items);
        self.bump();
        info!(items = n, "items loaded");
        true
    }

    pub async fn select_item(&self, item: &Item) -> bool {
        let Ok(id) = item.require_id() else {
            return false;
        };
        self.state().await.selected.item = Some(id);
        true
    }

    pub async fn edit_item(&self, item: Item) {
        self.state().await.drafts.item = Some(item);
        self.set_view(View::EditItem);
    }

    /// Start a new item shaped like `template`.
    pub async fn new_item_from_template(&self, template: &Template) {
        self.edit_item(template.instantiate()).await
    }

    pub async fn cancel_edit_item(&self) {
        self.state().await.drafts.item = None;
        self.set_view(View::Details);
    }

    pub async fn save_item(&self) -> Option<Item> {
        let draft = self.state().await.drafts.item.clone()?;
        let res = match draft.id.as_ref() {
            None => self.api.create_item(&draft).await,
            Some(id) => self.api.update_item(id, &draft).await,
        };
        let saved = self.surface("save item", persisted(res))?;

        let mut st = self.state().await;
        let _ = st.items.upsert(saved.clone());
        st.drafts.item = None;
        drop(st);

        self.bump();
        self.set_view(View::Details);
        Some(saved)
    }

    pub async fn delete_item(&self, item: &Item) -> bool {
        let Ok(id) = item.require_id() else {
            return false;
        };
        if self
            .surface("delete item", self.api.delete_item(&id).await)
            .is_none()
        {
            return false;
        }

        let mut st = self.state().await;
        st.items.remove(&id);
        if st.selected.item.as_ref() == Some(&id) {
            st.selected.item = None;
        }
        drop(st);
        self.bump();
        true
    }

    pub async fn load_templates(&self) -> bool {
        let Some(templates) = self.surface("load templates", self.api.list_templates().await)
        else {
            return false;
        };
        let n = self.state().await.templates.replace_all(templates);
        self.bump();
        info!(templates = n, "templates loaded");
        true
    }

    pub async fn select_template(&self, template: &Template) -> bool {
        let Ok(id) = template.require_id() else {
            return false;
        };
        self.state().await.selected.template = Some(id);
        true
    }

    pub async fn edit_template(&self, template: Template) {
        self.state().await.drafts.template = Some(template);
        self.set_view(View::EditItem);
    }

    pub async fn cancel_edit_template(&self) {
        self.state().await.drafts.template = None;
        self.set_view(View::Details);
    }

    pub async fn save_template(&self) -> Option<Template> {
        let draft = self.state().await.drafts.template.clone()?;
        let res = match draft.id.as_ref() {
            None => self.api.create_template(&draft).await,
            Some(id) => self.api.update_template(id, &draft).await,
        };
        let saved = self.surface("save template", persisted(res))?;

        let mut st = self.state().await;
        let _ = st.templates.upsert(saved.clone());
        st.drafts.template = None;
        drop(st);

        self.bump();
        self.set_view(View::Details);
        Some(saved)
    }

    pub async fn delete_template(&self, template: &Template) -> bool {
        let Ok(id) = template.require_id() else {
            return false;
        };
        if self
            .surface("delete template", self.api.delete_template(&id).await)
            .is_none()
        {
            return false;
        }

        let mut st = self.state().await;
        st.templates.remove(&id);
        if st.selected.template.as_ref() == Some(&id) {
            st.selected.template = None;
        }
        drop(st);
        self.bump();
        true
    }
}
