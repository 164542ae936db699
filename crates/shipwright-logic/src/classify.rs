//! Player / non-player classification of blueprints.
//!
//! Player ships must carry a name and description; enemy ships may carry
//! per-system maximum levels. The builder is handed a classifier rather than
//! consulting any global registry.

use std::collections::BTreeSet;

/// Decides whether a blueprint describes a player ship.
pub trait PlayerShipClassifier {
    fn is_player_ship(&self, blueprint_name: &str) -> bool;
}

impl<F> PlayerShipClassifier for F
where
    F: Fn(&str) -> bool,
{
    fn is_player_ship(&self, blueprint_name: &str) -> bool {
        self(blueprint_name)
    }
}

/// Base blueprint names of the stock player ships.
const VANILLA_PLAYER_SHIPS: [&str; 10] = [
    "PLAYER_SHIP_HARD",
    "PLAYER_SHIP_CIRCLE",
    "PLAYER_SHIP_FED",
    "PLAYER_SHIP_ENERGY",
    "PLAYER_SHIP_MANTIS",
    "PLAYER_SHIP_JELLY",
    "PLAYER_SHIP_ROCK",
    "PLAYER_SHIP_STEALTH",
    "PLAYER_SHIP_CRYSTAL",
    "PLAYER_SHIP_ANAEROBIC",
];

/// A fixed set of player blueprint names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerShipRegistry {
    names: BTreeSet<String>,
}

impl PlayerShipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock player ships, each with its `_2` and `_3` variants.
    pub fn vanilla() -> Self {
        let names = VANILLA_PLAYER_SHIPS
            .iter()
            .flat_map(|base| ["", "_2", "_3"].map(|suffix| format!("{base}{suffix}")))
            .collect();
        Self { names }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl PlayerShipClassifier for PlayerShipRegistry {
    fn is_player_ship(&self, blueprint_name: &str) -> bool {
        self.names.contains(blueprint_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vanilla_roster_has_variants() {
        let registry = PlayerShipRegistry::vanilla();
        assert_eq!(registry.len(), 30);
        assert!(registry.is_player_ship("PLAYER_SHIP_HARD"));
        assert!(registry.is_player_ship("PLAYER_SHIP_ROCK_3"));
        assert!(!registry.is_player_ship("AUTO_BASIC"));
    }

    #[test]
    fn closures_classify() {
        let classifier = |name: &str| name.ends_with("_PLAYER");
        assert!(classifier.is_player_ship("CUSTOM_PLAYER"));
        assert!(!classifier.is_player_ship("CUSTOM"));
    }

    #[test]
    fn custom_registry() {
        let mut registry = PlayerShipRegistry::from_names(["MY_SHIP"]);
        registry.insert("OTHER");
        assert!(registry.is_player_ship("MY_SHIP"));
        assert!(registry.is_player_ship("OTHER"));
        assert!(!registry.is_player_ship("PLAYER_SHIP_HARD"));
    }
}
