//! Ship graph assembly.
//!
//! # Pipeline
//!
//! 1. Read the blueprint name and classify it (player / non-player), once
//! 2. Fetch `data/<layout>.txt` and decode rooms, doors and offsets
//! 3. Check `data/<img>.xml` is present in the archive
//! 4. Read `class`, plus `name`/`desc` for player ships
//! 5. Assign every system listed in `<systemList>`
//! 6. Return the finished graph
//!
//! Any error aborts the whole build; nothing partial escapes.

use crate::archive::ArchiveStore;
use crate::catalog::BlueprintRecord;
use crate::classify::PlayerShipClassifier;
use crate::error::LoadError;
use crate::graph::ShipGraph;
use crate::layout::decode_layout;
use crate::metadata;
use crate::systems::assign_systems;
use crate::xml;

/// Archive path of a layout text basename.
pub fn layout_path(layout: &str) -> String {
    format!("data/{layout}.txt")
}

/// Archive path of an appearance descriptor basename.
pub fn appearance_path(img: &str) -> String {
    format!("data/{img}.xml")
}

/// Builds [`ShipGraph`]s from catalog records.
///
/// Holds no mutable state; one builder can serve any number of builds, and
/// builders sharing a `Sync` archive may run on separate threads.
pub struct ShipGraphBuilder<'a> {
    archive: &'a dyn ArchiveStore,
    classifier: &'a dyn PlayerShipClassifier,
}

impl<'a> ShipGraphBuilder<'a> {
    pub fn new(archive: &'a dyn ArchiveStore, classifier: &'a dyn PlayerShipClassifier) -> Self {
        Self {
            archive,
            classifier,
        }
    }

    pub fn build(&self, record: BlueprintRecord<'_, '_>) -> Result<ShipGraph, LoadError> {
        let node = record.node();

        let blueprint_name = metadata::blueprint_name(node)?;
        let is_player_ship = self.classifier.is_player_ship(&blueprint_name);

        let layout_path = layout_path(xml::required_attr(node, "layout")?);
        self.require(&layout_path)?;
        let layout = {
            let stream = self.archive.open_stream(&layout_path)?;
            decode_layout(stream, &layout_path)?
        };

        // Appearance decoding is not implemented; only presence is checked.
        let appearance_path = appearance_path(xml::required_attr(node, "img")?);
        self.require(&appearance_path)?;

        let ship_class = metadata::ship_class(node)?;
        let (name, description) = metadata::player_text(node, is_player_ship)?;

        let system_list = xml::required_child(node, "systemList")?;
        let systems = assign_systems(system_list, &layout, is_player_ship)?;

        let graph = ShipGraph {
            blueprint_name,
            is_player_ship,
            ship_class,
            name,
            description,
            layout_path,
            appearance_path,
            layout,
            systems,
        };
        log::debug!("built {}", graph.summary());
        Ok(graph)
    }

    fn require(&self, path: &str) -> Result<(), LoadError> {
        if self.archive.contains(path) {
            Ok(())
        } else {
            Err(LoadError::ResourceNotFound(path.to_string()))
        }
    }
}
