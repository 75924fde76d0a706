use serde::{Deserialize, Deserializer, Serialize};

use crate::ModelError;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub const KIND: &'static str = $kind;

            pub fn parse(s: &str) -> Result<Self, ModelError> {
                let s = s.trim();
                if s.is_empty() {
                    return Err(ModelError::EmptyId($kind));
                }
                Ok(Self(s.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ModelError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(&s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

entity_id!(MapId, "map");
entity_id!(AreaId, "area");
entity_id!(LinkId, "link");
entity_id!(ShopId, "shop");
entity_id!(ProductId, "shop product");
entity_id!(ItemId, "item");
entity_id!(TemplateId, "template");
entity_id!(
    /// Labels are stored inline in their map; ids are only unique per map.
    LabelId,
    "label"
);

/// Decode an optional id, treating `null`, a missing field and `""` alike.
pub fn empty_as_none<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<String, Error = ModelError>,
{
    let s: Option<String> = Option::deserialize(d)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => T::try_from(v.to_string())
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "empty_as_none")]
        id: Option<MapId>,
    }

    #[test]
    fn rejects_blank_ids() {
        assert_eq!(MapId::parse("  "), Err(ModelError::EmptyId("map")));
        assert_eq!(AreaId::parse(" a1 ").unwrap().as_str(), "a1");
    }

    #[test]
    fn empty_string_id_decodes_as_none() {
        let h: Holder = serde_json::from_str(r#"{"id":""}"#).unwrap();
        assert!(h.id.is_none());
        let h: Holder = serde_json::from_str(r#"{}"#).unwrap();
        assert!(h.id.is_none());
        let h: Holder = serde_json::from_str(r#"{"id":"mapA"}"#).unwrap();
        assert_eq!(h.id, Some(MapId::parse("mapA").unwrap()));
    }

    #[test]
    fn bare_id_refuses_empty_string() {
        assert!(serde_json::from_str::<MapId>(r#""""#).is_err());
        assert_eq!(
            serde_json::to_string(&LinkId::parse("l1").unwrap()).unwrap(),
            r#""l1""#
        );
    }
}
