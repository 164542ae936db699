//! Summary fields of a blueprint, without layout or system resolution.
//!
//! Used for listing ships quickly; the full builder reads the same fields
//! through the helpers here, in pipeline order.

use roxmltree::Node;
use serde::{Deserialize, Serialize};

use crate::catalog::BlueprintRecord;
use crate::classify::PlayerShipClassifier;
use crate::error::LoadError;
use crate::xml;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipMetadata {
    pub blueprint_name: String,
    pub is_player_ship: bool,
    /// Basename of the layout text (`layout` attribute).
    pub layout_ref: String,
    /// Basename of the appearance descriptor (`img` attribute).
    pub image_ref: String,
    pub ship_class: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Extract summary fields. `name`/`desc` are read, and required, only for
/// player ships.
pub fn extract_metadata(
    record: BlueprintRecord<'_, '_>,
    classifier: &dyn PlayerShipClassifier,
) -> Result<ShipMetadata, LoadError> {
    let node = record.node();
    let blueprint_name = blueprint_name(node)?;
    let is_player_ship = classifier.is_player_ship(&blueprint_name);
    let layout_ref = xml::required_attr(node, "layout")?.to_string();
    let image_ref = xml::required_attr(node, "img")?.to_string();
    let ship_class = ship_class(node)?;
    let (name, description) = player_text(node, is_player_ship)?;

    Ok(ShipMetadata {
        blueprint_name,
        is_player_ship,
        layout_ref,
        image_ref,
        ship_class,
        name,
        description,
    })
}

pub(crate) fn blueprint_name(node: Node<'_, '_>) -> Result<String, LoadError> {
    xml::required_attr(node, "name").map(str::to_string)
}

pub(crate) fn ship_class(node: Node<'_, '_>) -> Result<String, LoadError> {
    xml::required_child_text(node, "class")
}

/// `(name, description)` for player ships, `(None, None)` otherwise.
pub(crate) fn player_text(
    node: Node<'_, '_>,
    is_player: bool,
) -> Result<(Option<String>, Option<String>), LoadError> {
    if !is_player {
        return Ok((None, None));
    }
    let name = xml::required_child_text(node, "name")?;
    let description = xml::required_child_text(node, "desc")?;
    Ok((Some(name), Some(description)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogSource;

    const CATALOG: &str = r#"
<shipBlueprint name="PLAYER_SHIP_HARD" layout="kestral" img="kestral">
    <class>Kestrel Cruiser</class>
    <name>The Kestrel</name>
    <desc>This class of ship was decommissioned.</desc>
</shipBlueprint>
<shipBlueprint name="AUTO_BASIC" layout="auto_basic" img="auto_basic">
    <class>Auto-ship</class>
    <name>ignored</name>
</shipBlueprint>
<shipBlueprint name="PLAYER_SHIP_FED" layout="fed_cruiser" img="fed_cruiser">
    <class>Federation Cruiser</class>
    <name>The Osprey</name>
</shipBlueprint>
<shipBlueprint name="NO_IMG" layout="x"><class>X</class></shipBlueprint>
"#;

    fn is_player(name: &str) -> bool {
        name.starts_with("PLAYER_SHIP_")
    }

    #[test]
    fn player_metadata_has_name_and_description() {
        let source = CatalogSource::new(CATALOG);
        let catalog = source.parse().unwrap();
        let record = catalog.first_by_name("PLAYER_SHIP_HARD").unwrap();
        let meta = extract_metadata(record, &is_player).unwrap();
        assert!(meta.is_player_ship);
        assert_eq!(meta.layout_ref, "kestral");
        assert_eq!(meta.ship_class, "Kestrel Cruiser");
        assert_eq!(meta.name.as_deref(), Some("The Kestrel"));
        assert_eq!(
            meta.description.as_deref(),
            Some("This class of ship was decommissioned.")
        );
    }

    #[test]
    fn npc_metadata_skips_name() {
        let source = CatalogSource::new(CATALOG);
        let catalog = source.parse().unwrap();
        let meta = extract_metadata(catalog.first_by_name("AUTO_BASIC").unwrap(), &is_player).unwrap();
        assert!(!meta.is_player_ship);
        assert_eq!(meta.name, None);
        assert_eq!(meta.description, None);
    }

    #[test]
    fn player_missing_desc_fails() {
        let source = CatalogSource::new(CATALOG);
        let catalog = source.parse().unwrap();
        let err = extract_metadata(catalog.first_by_name("PLAYER_SHIP_FED").unwrap(), &is_player)
            .unwrap_err();
        assert!(matches!(err, LoadError::MissingChild { ref child, .. } if child == "desc"));
    }

    #[test]
    fn missing_img_fails() {
        let source = CatalogSource::new(CATALOG);
        let catalog = source.parse().unwrap();
        let err = extract_metadata(catalog.first_by_name("NO_IMG").unwrap(), &is_player).unwrap_err();
        assert!(matches!(err, LoadError::MissingAttribute { ref attribute, .. } if attribute == "img"));
    }
}
