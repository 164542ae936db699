//! Ship blueprint decoding for Shipwright.
//!
//! This crate turns a game's ship blueprint data into validated in-memory
//! ship graphs. Inputs are a catalog document of `<shipBlueprint>` records
//! and, per blueprint, a line-oriented layout text and an appearance
//! descriptor fetched from a read-only archive. Everything is synchronous
//! and free of global state; any `build` either returns a complete graph or
//! the first error it hit.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`archive`] | Read-only resource store trait, in-memory and directory stores |
//! | [`builder`] | Build pipeline from catalog record to [`ShipGraph`] |
//! | [`catalog`] | Locate `<shipBlueprint>` records by name or in full |
//! | [`classify`] | Player / non-player classification (closures, registry) |
//! | [`error`] | [`LoadError`] taxonomy |
//! | [`graph`] | Ship graph, room arena, doors, system slots |
//! | [`layout`] | Layout text decoding (two-pass) and encoding |
//! | [`metadata`] | Summary fields without layout or system resolution |
//! | [`snapshot`] | Versioned bincode snapshots of built graphs |
//! | [`systems`] | System kinds, level caps, stations, `<systemList>` assignment |
//!
//! # Example
//!
//! ```
//! use shipwright_logic::prelude::*;
//!
//! let archive = MemoryArchive::new()
//!     .with("data/kestral.txt", "ROOM\n0 0 0 2 2\nROOM\n1 2 0 2 2\nDOOR\n2 0 0 1 0\n")
//!     .with("data/kestral.xml", "<img/>");
//! let source = CatalogSource::new(
//!     r#"<shipBlueprint name="PLAYER_SHIP_HARD" layout="kestral" img="kestral">
//!         <class>Kestrel Cruiser</class><name>The Kestrel</name><desc>Old.</desc>
//!         <systemList><pilot power="1" room="0"/></systemList>
//!     </shipBlueprint>"#,
//! );
//! let catalog = source.parse().unwrap();
//! let record = catalog.first_by_name("PLAYER_SHIP_HARD").unwrap();
//!
//! let registry = PlayerShipRegistry::vanilla();
//! let graph = ShipGraphBuilder::new(&archive, &registry).build(record).unwrap();
//! assert_eq!(graph.layout.doors().len(), 1);
//! assert_eq!(graph.system(SystemKind::Pilot).unwrap().level_max, 3);
//! ```

pub mod archive;
pub mod builder;
pub mod catalog;
pub mod classify;
pub mod error;
pub mod graph;
pub mod layout;
pub mod metadata;
pub mod snapshot;
pub mod systems;

mod xml;

pub use error::LoadError;
pub use graph::ShipGraph;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::archive::{ArchiveStore, DirArchive, MemoryArchive};
    pub use crate::builder::ShipGraphBuilder;
    pub use crate::catalog::{BlueprintRecord, Catalog, CatalogSource};
    pub use crate::classify::{PlayerShipClassifier, PlayerShipRegistry};
    pub use crate::error::LoadError;
    pub use crate::graph::{Door, Ellipse, Room, RoomIndex, ShipGraph, ShipLayout, SystemSlot};
    pub use crate::layout::{decode_layout, encode_layout};
    pub use crate::metadata::{extract_metadata, ShipMetadata};
    pub use crate::systems::{Direction, Station, SystemKind};
}
