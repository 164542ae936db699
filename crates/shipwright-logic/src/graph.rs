//! The assembled ship graph: layout arena plus installed systems.
//!
//! Rooms live in an index-stable arena in file order. Doors and system slots
//! refer to rooms through [`RoomIndex`] handles, which only the layout
//! decoder's resolution pass can mint, so every handle held by a graph
//! resolves to a room of that same graph. Deserializing a layout or graph
//! re-checks every handle against its own arena.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::systems::{Station, SystemKind};

/// Handle into a layout's room arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomIndex(usize);

impl RoomIndex {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the room in [`ShipLayout::rooms`].
    pub fn get(self) -> usize {
        self.0
    }
}

/// A rectangular room, in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: i32,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// A door joining two rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    pub x: i32,
    pub y: i32,
    pub horizontal: bool,
    pub left_room: RoomIndex,
    pub right_room: RoomIndex,
}

/// Hull shield ellipse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ellipse {
    pub width: i32,
    pub height: i32,
    pub x: i32,
    pub y: i32,
}

/// Decoded layout text: offsets, ellipse, rooms and resolved doors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShipLayout {
    pub x_offset: i32,
    pub y_offset: i32,
    pub horizontal: i32,
    pub vertical: i32,
    pub ellipse: Ellipse,
    rooms: Vec<Room>,
    doors: Vec<Door>,
}

impl ShipLayout {
    pub(crate) fn from_parts(
        x_offset: i32,
        y_offset: i32,
        horizontal: i32,
        vertical: i32,
        ellipse: Ellipse,
        rooms: Vec<Room>,
        doors: Vec<Door>,
    ) -> Self {
        Self {
            x_offset,
            y_offset,
            horizontal,
            vertical,
            ellipse,
            rooms,
            doors,
        }
    }

    /// Rooms in the order they were declared.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Doors in the order they were declared.
    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    /// Arena handle of the room with this id.
    pub fn index_of(&self, id: i32) -> Option<RoomIndex> {
        self.rooms.iter().position(|r| r.id == id).map(RoomIndex)
    }

    /// Room with this id.
    pub fn room(&self, id: i32) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// Room behind a handle minted by this layout.
    ///
    /// # Panics
    ///
    /// Panics if `index` was taken from a different layout with more rooms.
    pub fn room_at(&self, index: RoomIndex) -> &Room {
        &self.rooms[index.0]
    }

    /// The (left, right) rooms of a door of this layout.
    ///
    /// # Panics
    ///
    /// Panics on a door borrowed from another layout, see [`ShipLayout::room_at`].
    pub fn door_rooms(&self, door: &Door) -> (&Room, &Room) {
        (self.room_at(door.left_room), self.room_at(door.right_room))
    }

    /// Doors touching the room with this id, on either side.
    pub fn doors_of(&self, id: i32) -> impl Iterator<Item = &Door> + '_ {
        let index = self.index_of(id);
        self.doors.iter().filter(move |d| {
            index.is_some_and(|i| d.left_room == i || d.right_room == i)
        })
    }

    /// Whether every handle points inside the arena.
    pub(crate) fn handles_in_range(&self) -> bool {
        let len = self.rooms.len();
        self.doors
            .iter()
            .all(|d| d.left_room.0 < len && d.right_room.0 < len)
    }
}

#[derive(Deserialize)]
struct LayoutFields {
    x_offset: i32,
    y_offset: i32,
    horizontal: i32,
    vertical: i32,
    ellipse: Ellipse,
    rooms: Vec<Room>,
    doors: Vec<Door>,
}

impl<'de> Deserialize<'de> for ShipLayout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let f = LayoutFields::deserialize(deserializer)?;
        let layout = ShipLayout::from_parts(
            f.x_offset,
            f.y_offset,
            f.horizontal,
            f.vertical,
            f.ellipse,
            f.rooms,
            f.doors,
        );
        if !layout.handles_in_range() {
            return Err(de::Error::custom(format!(
                "door room handle outside a layout of {} rooms",
                layout.rooms.len()
            )));
        }
        Ok(layout)
    }
}

/// A system installed on a ship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSlot {
    pub level_start: u8,
    pub level_max: u8,
    pub room: RoomIndex,
    pub available: bool,
    /// Interior image namespace (`img` attribute), not yet used downstream.
    pub interior: Option<String>,
    /// Weapon blueprint, always present for artillery.
    pub weapon: Option<String>,
    pub station: Option<Station>,
}

/// One ship blueprint, fully cross-referenced and validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShipGraph {
    pub blueprint_name: String,
    pub is_player_ship: bool,
    pub ship_class: String,
    /// Present exactly when `is_player_ship`.
    pub name: Option<String>,
    /// Present exactly when `is_player_ship`.
    pub description: Option<String>,
    /// Archive path of the layout text.
    pub layout_path: String,
    /// Archive path of the appearance descriptor.
    pub appearance_path: String,
    pub layout: ShipLayout,
    pub systems: BTreeMap<SystemKind, SystemSlot>,
}

impl ShipGraph {
    pub fn room(&self, id: i32) -> Option<&Room> {
        self.layout.room(id)
    }

    pub fn system(&self, kind: SystemKind) -> Option<&SystemSlot> {
        self.systems.get(&kind)
    }

    /// Room a system is installed in.
    pub fn system_room(&self, kind: SystemKind) -> Option<&Room> {
        self.systems.get(&kind).map(|s| self.layout.room_at(s.room))
    }

    /// One-line description for logs and harness output.
    pub fn summary(&self) -> String {
        format!(
            "{} [{}] {}: {} rooms, {} doors, {} systems",
            self.blueprint_name,
            if self.is_player_ship { "player" } else { "npc" },
            self.ship_class,
            self.layout.rooms().len(),
            self.layout.doors().len(),
            self.systems.len()
        )
    }

    /// Whether every door and system handle resolves inside the room arena.
    pub(crate) fn handles_in_range(&self) -> bool {
        let len = self.layout.rooms().len();
        self.layout.handles_in_range() && self.systems.values().all(|s| s.room.0 < len)
    }
}

#[derive(Deserialize)]
struct GraphFields {
    blueprint_name: String,
    is_player_ship: bool,
    ship_class: String,
    name: Option<String>,
    description: Option<String>,
    layout_path: String,
    appearance_path: String,
    layout: ShipLayout,
    systems: BTreeMap<SystemKind, SystemSlot>,
}

impl<'de> Deserialize<'de> for ShipGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let f = GraphFields::deserialize(deserializer)?;
        let graph = ShipGraph {
            blueprint_name: f.blueprint_name,
            is_player_ship: f.is_player_ship,
            ship_class: f.ship_class,
            name: f.name,
            description: f.description,
            layout_path: f.layout_path,
            appearance_path: f.appearance_path,
            layout: f.layout,
            systems: f.systems,
        };
        if !graph.handles_in_range() {
            return Err(de::Error::custom(format!(
                "{} holds system room handles outside its layout",
                graph.blueprint_name
            )));
        }
        Ok(graph)
    }
}
