use serde::{Deserialize, Serialize};

use crate::Entity;
use crate::ids::{LabelId, MapId, empty_as_none};

/// Highest index into the client's zoom sequence.
pub const MAX_ZOOM_INDEX: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Map {
    #[serde(
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<MapId>,
    pub name: String,
    pub description: String,
    pub width: u32,
    pub height: u32,
    pub minimum_zoom_index: usize,
    pub maximum_zoom_index: usize,
    pub labels: Vec<MapLabel>,
    pub explored: bool,
}

impl Default for Map {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: String::new(),
            width: 1000,
            height: 1000,
            minimum_zoom_index: 0,
            maximum_zoom_index: MAX_ZOOM_INDEX,
            labels: Vec::new(),
            explored: false,
        }
    }
}

impl Map {
    pub fn label(&self, id: &LabelId) -> Option<&MapLabel> {
        self.labels.iter().find(|l| l.id.as_ref() == Some(id))
    }

    /// Replace the label with the same id, or append it when it is new or unknown.
    pub fn upsert_label(&mut self, label: MapLabel) {
        if let Some(id) = label.id.as_ref() {
            if let Some(slot) = self.labels.iter_mut().find(|l| l.id.as_ref() == Some(id)) {
                *slot = label;
                return;
            }
        }
        self.labels.push(label);
    }

    pub fn remove_label(&mut self, id: &LabelId) -> bool {
        let before = self.labels.len();
        self.labels.retain(|l| l.id.as_ref() != Some(id));
        self.labels.len() != before
    }
}

impl Entity for Map {
    type Id = MapId;

    const KIND: &'static str = "map";

    fn id(&self) -> Option<&MapId> {
        self.id.as_ref()
    }

    fn sort_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapLabel {
    #[serde(
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<LabelId>,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub font_size: u32,
    pub font_color: String,
    pub font_family: String,
}

impl Default for MapLabel {
    fn default() -> Self {
        Self {
            id: None,
            text: String::new(),
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            font_size: 12,
            font_color: "#000000".to_string(),
            font_family: "sans-serif".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_sparse_map_with_defaults() {
        let m: Map = serde_json::from_str(
            r#"{"id":"mapA","name":"Harbor","labels":[{"id":"l1","text":"Docks"}]}"#,
        )
        .unwrap();
        assert_eq!(m.id.as_ref().map(MapId::as_str), Some("mapA"));
        assert_eq!(m.maximum_zoom_index, MAX_ZOOM_INDEX);
        assert_eq!(m.labels[0].font_size, 12);
        assert!(!m.explored);
    }

    #[test]
    fn new_map_serializes_without_id() {
        let v = serde_json::to_value(Map::default()).unwrap();
        assert!(v.get("id").is_none());
        assert!(v.get("minimumZoomIndex").is_some());
    }

    #[test]
    fn upsert_label_replaces_by_id_and_appends_new() {
        let mut m = Map::default();
        let id = LabelId::parse("l1").unwrap();
        m.upsert_label(MapLabel {
            id: Some(id.clone()),
            text: "old".into(),
            ..MapLabel::default()
        });
        m.upsert_label(MapLabel {
            id: Some(id.clone()),
            text: "new".into(),
            ..MapLabel::default()
        });
        m.upsert_label(MapLabel::default());
        assert_eq!(m.labels.len(), 2);
        assert_eq!(m.label(&id).map(|l| l.text.as_str()), Some("new"));
        assert!(m.remove_label(&id));
        assert!(!m.remove_label(&id));
    }
}
