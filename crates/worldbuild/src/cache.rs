use std::collections::BTreeMap;

use tracing::warn;
use worldproto::{Entity, ModelError};

/// Id-keyed mirror of one remote collection. The map is the only source of
/// truth; lists handed to the UI are projected from it on every call.
#[derive(Debug, Clone)]
pub struct EntityCache<E: Entity> {
    by_id: BTreeMap<E::Id, E>,
}

impl<E: Entity> Default for EntityCache<E> {
    fn default() -> Self {
        Self {
            by_id: BTreeMap::new(),
        }
    }
}

impl<E: Entity> EntityCache<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(xs: Vec<E>) -> Self {
        let mut c = Self::new();
        c.replace_all(xs);
        c
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn get(&self, id: &E::Id) -> Option<&E> {
        self.by_id.get(id)
    }

    pub fn get_mut(&mut self, id: &E::Id) -> Option<&mut E> {
        self.by_id.get_mut(id)
    }

    pub fn contains(&self, id: &E::Id) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn values(&self) -> impl Iterator<Item = &E> {
        self.by_id.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut E> {
        self.by_id.values_mut()
    }

    /// Ordered projection: by display name, ties broken by id.
    pub fn snapshot(&self) -> Vec<E> {
        let mut v = self.by_id.values().cloned().collect::<Vec<_>>();
        v.sort_by(|a, b| {
            a.sort_name()
                .cmp(b.sort_name())
                .then_with(|| a.id().cmp(&b.id()))
        });
        v
    }

    /// Swap in a fresh server listing. Entries without an id are dropped.
    pub fn replace_all(&mut self, xs: Vec<E>) -> usize {
        let mut m = BTreeMap::new();
        let mut skipped = 0usize;
        for x in xs {
            let Some(id) = x.id().cloned() else {
                skipped += 1;
                continue;
            };
            m.insert(id, x);
        }
        if skipped > 0 {
            warn!(kind = E::KIND, skipped, "dropped entities without id");
        }
        self.by_id = m;
        self.by_id.len()
    }

    /// Insert or replace by id; returns the previous entry.
    pub fn upsert(&mut self, x: E) -> Result<Option<E>, ModelError> {
        let id = x.require_id()?;
        Ok(self.by_id.insert(id, x))
    }

    pub fn remove(&mut self, id: &E::Id) -> Option<E> {
        self.by_id.remove(id)
    }

    /// Keep entries matching `keep`; returns the ids that were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&E) -> bool) -> Vec<E::Id> {
        let mut dropped = Vec::new();
        self.by_id.retain(|id, x| {
            if keep(x) {
                true
            } else {
                dropped.push(id.clone());
                false
            }
        });
        dropped
    }

    pub fn clear(&mut self) {
        self.by_id.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worldproto::{Map, MapId};

    fn map(id: &str, name: &str) -> Map {
        Map {
            id: Some(MapId::parse(id).unwrap()),
            name: name.to_string(),
            ..Map::default()
        }
    }

    #[test]
    fn snapshot_sorts_by_name_then_id() {
        let c = EntityCache::from_vec(vec![
            map("m3", "Beta"),
            map("m2", "Alpha"),
            map("m1", "Beta"),
        ]);
        let ids = c
            .snapshot()
            .into_iter()
            .map(|m| m.id.unwrap().to_string())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["m2", "m1", "m3"]);
    }

    #[test]
    fn upsert_requires_id_and_replaces() {
        let mut c = EntityCache::new();
        assert_eq!(c.upsert(Map::default()), Err(ModelError::MissingId("map")));
        assert!(c.upsert(map("m1", "old")).unwrap().is_none());
        let prev = c.upsert(map("m1", "new")).unwrap();
        assert_eq!(prev.map(|m| m.name), Some("old".to_string()));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn replace_all_drops_unsaved_and_retain_reports() {
        let mut c = EntityCache::new();
        assert_eq!(c.replace_all(vec![map("m1", "a"), Map::default(), map("m2", "b")]), 2);
        let dropped = c.retain(|m| m.name != "a");
        assert_eq!(dropped, vec![MapId::parse("m1").unwrap()]);
        assert!(c.contains(&MapId::parse("m2").unwrap()));
    }
}
