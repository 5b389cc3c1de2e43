use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metadata describing a single map tile beyond the packed grid attributes.
///
/// Known fields are typed; anything else found in a persisted record lands in
/// `extra` and is written back verbatim, so newer editors can attach fields
/// older builds do not understand without losing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileMeta {
    #[serde(default = "default_true")]
    pub walkable: bool,
    #[serde(default = "default_true")]
    pub clickable: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for TileMeta {
    fn default() -> Self {
        Self {
            walkable: true,
            clickable: true,
            description: String::new(),
            tags: Vec::new(),
            extra: BTreeMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_walkable_and_clickable() {
        let m = TileMeta::default();
        assert!(m.walkable);
        assert!(m.clickable);
        assert!(m.tags.is_empty());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let m: TileMeta = serde_json::from_str(r#"{"description": "altar"}"#).unwrap();
        assert!(m.walkable);
        assert_eq!(m.description, "altar");
    }

    #[test]
    fn unknown_fields_roundtrip_verbatim() {
        let src = r#"{"walkable": false, "tags": ["water"], "depth": 3, "biome": "swamp"}"#;
        let m: TileMeta = serde_json::from_str(src).unwrap();
        assert!(!m.walkable);
        assert_eq!(m.extra["depth"], serde_json::json!(3));

        let back = serde_json::to_value(&m).unwrap();
        assert_eq!(back["biome"], "swamp");
        assert_eq!(back["depth"], 3);

        let again: TileMeta = serde_json::from_value(back).unwrap();
        assert_eq!(again, m);
    }
}
