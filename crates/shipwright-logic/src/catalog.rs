//! Blueprint catalog lookup.
//!
//! Game catalog files usually hold many top-level elements after an XML
//! declaration, which is not a well-formed document on its own. The source
//! text is therefore wrapped in a synthetic root before parsing. A file that
//! already has a single container element (e.g. `<blueprints>`) is searched
//! one level down.

use roxmltree::{Document, Node};

use crate::archive::{self, ArchiveStore};
use crate::error::LoadError;

/// Element name of a ship blueprint record.
pub const BLUEPRINT_TAG: &str = "shipBlueprint";

const WRAPPER_TAG: &str = "catalog";

/// Owned catalog text, ready to be parsed.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    text: String,
}

impl CatalogSource {
    pub fn new(raw: &str) -> Self {
        let body = raw.trim_start_matches('\u{feff}').trim_start();
        let body = match body.strip_prefix("<?xml") {
            Some(rest) => rest.split_once("?>").map_or("", |(_, after)| after),
            None => body,
        };
        Self {
            text: format!("<{WRAPPER_TAG}>{body}</{WRAPPER_TAG}>"),
        }
    }

    /// Read a catalog resource from an archive.
    pub fn from_archive(archive: &dyn ArchiveStore, path: &str) -> Result<Self, LoadError> {
        if !archive.contains(path) {
            return Err(LoadError::ResourceNotFound(path.to_string()));
        }
        Ok(Self::new(&archive::read_text(archive, path)?))
    }

    /// Parse into a searchable catalog. Fails if the text is not well-formed.
    pub fn parse(&self) -> Result<Catalog<'_>, LoadError> {
        Ok(Catalog {
            doc: Document::parse(&self.text)?,
        })
    }
}

/// A parsed catalog document.
pub struct Catalog<'input> {
    doc: Document<'input>,
}

impl<'input> Catalog<'input> {
    fn container(&self) -> Node<'_, 'input> {
        let wrapper = self.doc.root_element();
        let mut elements = wrapper.children().filter(|c| c.is_element());
        let has_records = wrapper.children().any(|c| c.has_tag_name(BLUEPRINT_TAG));
        match (elements.next(), elements.next()) {
            (Some(only), None) if !has_records => only,
            _ => wrapper,
        }
    }

    /// Every blueprint record, in document order.
    pub fn find_all(&self) -> Vec<BlueprintRecord<'_, 'input>> {
        self.container()
            .children()
            .filter(|c| c.is_element() && c.has_tag_name(BLUEPRINT_TAG))
            .map(|node| BlueprintRecord { node })
            .collect()
    }

    /// Every record whose `name` attribute equals `name`. Source data can
    /// contain duplicates; the caller picks which one to use.
    pub fn find_by_name(&self, name: &str) -> Vec<BlueprintRecord<'_, 'input>> {
        self.find_all()
            .into_iter()
            .filter(|r| r.name() == Some(name))
            .collect()
    }

    /// First record with this name.
    pub fn first_by_name(&self, name: &str) -> Option<BlueprintRecord<'_, 'input>> {
        let matches = self.find_by_name(name);
        if matches.len() > 1 {
            log::warn!("{} blueprints named {}, using the first", matches.len(), name);
        }
        matches.into_iter().next()
    }
}

/// One `<shipBlueprint>` element.
#[derive(Debug, Clone, Copy)]
pub struct BlueprintRecord<'a, 'input> {
    node: Node<'a, 'input>,
}

impl<'a, 'input> BlueprintRecord<'a, 'input> {
    /// The `name` attribute, if any.
    pub fn name(&self) -> Option<&'a str> {
        self.node.attribute("name")
    }

    pub(crate) fn node(&self) -> Node<'a, 'input> {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOOSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<blueprintList name="LIST"><name>X</name></blueprintList>
<shipBlueprint name="PLAYER_SHIP_HARD" layout="kestral" img="kestral"><class>Kestrel</class></shipBlueprint>
<shipBlueprint name="AUTO_BASIC" layout="auto_basic" img="auto_basic"><class>Auto</class></shipBlueprint>
<shipBlueprint name="AUTO_BASIC" layout="auto_assault" img="auto_assault"><class>Auto 2</class></shipBlueprint>
"#;

    #[test]
    fn loose_top_level_records_are_found() {
        let source = CatalogSource::new(LOOSE);
        let catalog = source.parse().unwrap();
        let names: Vec<_> = catalog.find_all().iter().filter_map(|r| r.name()).collect();
        assert_eq!(names, vec!["PLAYER_SHIP_HARD", "AUTO_BASIC", "AUTO_BASIC"]);
    }

    #[test]
    fn duplicates_are_all_returned() {
        let source = CatalogSource::new(LOOSE);
        let catalog = source.parse().unwrap();
        assert_eq!(catalog.find_by_name("AUTO_BASIC").len(), 2);
        assert!(catalog.find_by_name("MISSING").is_empty());
        let first = catalog.first_by_name("AUTO_BASIC").unwrap();
        assert_eq!(first.node().attribute("layout"), Some("auto_basic"));
    }

    #[test]
    fn single_container_root_is_searched() {
        let source = CatalogSource::new(
            "<blueprints><shipBlueprint name=\"A\"/><shipBlueprint name=\"B\"/></blueprints>",
        );
        let catalog = source.parse().unwrap();
        assert_eq!(catalog.find_all().len(), 2);
    }

    #[test]
    fn single_record_document() {
        let source = CatalogSource::new("<shipBlueprint name=\"ONLY\"/>");
        let catalog = source.parse().unwrap();
        assert_eq!(catalog.find_all().len(), 1);
    }

    #[test]
    fn malformed_document_fails() {
        let source = CatalogSource::new("<shipBlueprint name=\"A\">");
        assert!(matches!(source.parse(), Err(LoadError::Catalog(_))));
    }
}
