//! System kinds and assignment of a blueprint's `<systemList>`.
//!
//! The set of system kinds is closed. Each kind has a fixed level cap and
//! capability flags; [`SystemKind::spec`] is the single table holding them.

use roxmltree::Node;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::LoadError;
use crate::graph::{ShipLayout, SystemSlot};
use crate::xml;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemKind {
    Shields,
    Engines,
    Oxygen,
    Weapons,
    Drones,
    Medbay,
    Pilot,
    Sensors,
    Doors,
    Teleporter,
    Cloaking,
    Artillery,
    Battery,
    Clonebay,
    Mind,
    Hacking,
}

/// Static properties of a system kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemSpec {
    /// Element name inside `<systemList>`.
    pub element: &'static str,
    pub level_cap: u8,
    pub can_own_station: bool,
    pub requires_weapon: bool,
    /// Station used when the blueprint gives no `<slot>` override.
    pub default_station: Option<Station>,
}

impl SystemKind {
    pub fn spec(&self) -> SystemSpec {
        let station = |slot_id, direction| Some(Station { slot_id, direction });
        match self {
            Self::Shields => SystemSpec {
                element: "shields",
                level_cap: 8,
                can_own_station: true,
                requires_weapon: false,
                default_station: station(0, Direction::Left),
            },
            Self::Engines => SystemSpec {
                element: "engines",
                level_cap: 8,
                can_own_station: true,
                requires_weapon: false,
                default_station: station(1, Direction::Down),
            },
            Self::Oxygen => SystemSpec {
                element: "oxygen",
                level_cap: 3,
                can_own_station: false,
                requires_weapon: false,
                default_station: None,
            },
            Self::Weapons => SystemSpec {
                element: "weapons",
                level_cap: 8,
                can_own_station: true,
                requires_weapon: false,
                default_station: station(1, Direction::Up),
            },
            Self::Drones => SystemSpec {
                element: "drones",
                level_cap: 8,
                can_own_station: false,
                requires_weapon: false,
                default_station: None,
            },
            Self::Medbay => SystemSpec {
                element: "medbay",
                level_cap: 3,
                can_own_station: false,
                requires_weapon: false,
                default_station: None,
            },
            Self::Pilot => SystemSpec {
                element: "pilot",
                level_cap: 3,
                can_own_station: true,
                requires_weapon: false,
                default_station: station(0, Direction::Right),
            },
            Self::Sensors => SystemSpec {
                element: "sensors",
                level_cap: 3,
                can_own_station: true,
                requires_weapon: false,
                default_station: station(0, Direction::Up),
            },
            Self::Doors => SystemSpec {
                element: "doors",
                level_cap: 3,
                can_own_station: true,
                requires_weapon: false,
                default_station: station(0, Direction::Up),
            },
            Self::Teleporter => SystemSpec {
                element: "teleporter",
                level_cap: 3,
                can_own_station: false,
                requires_weapon: false,
                default_station: None,
            },
            Self::Cloaking => SystemSpec {
                element: "cloaking",
                level_cap: 3,
                can_own_station: false,
                requires_weapon: false,
                default_station: None,
            },
            Self::Artillery => SystemSpec {
                element: "artillery",
                level_cap: 4,
                can_own_station: false,
                requires_weapon: true,
                default_station: None,
            },
            Self::Battery => SystemSpec {
                element: "battery",
                level_cap: 2,
                can_own_station: false,
                requires_weapon: false,
                default_station: None,
            },
            Self::Clonebay => SystemSpec {
                element: "clonebay",
                level_cap: 3,
                can_own_station: false,
                requires_weapon: false,
                default_station: None,
            },
            Self::Mind => SystemSpec {
                element: "mind",
                level_cap: 3,
                can_own_station: false,
                requires_weapon: false,
                default_station: None,
            },
            Self::Hacking => SystemSpec {
                element: "hacking",
                level_cap: 3,
                can_own_station: false,
                requires_weapon: false,
                default_station: None,
            },
        }
    }

    /// Every kind, in assignment order.
    pub fn all() -> &'static [SystemKind] {
        &[
            Self::Shields,
            Self::Engines,
            Self::Oxygen,
            Self::Weapons,
            Self::Drones,
            Self::Medbay,
            Self::Pilot,
            Self::Sensors,
            Self::Doors,
            Self::Teleporter,
            Self::Cloaking,
            Self::Artillery,
            Self::Battery,
            Self::Clonebay,
            Self::Mind,
            Self::Hacking,
        ]
    }

    pub fn element_name(&self) -> &'static str {
        self.spec().element
    }

    pub fn level_cap(&self) -> u8 {
        self.spec().level_cap
    }

    pub fn from_element_name(name: &str) -> Option<SystemKind> {
        Self::all().iter().copied().find(|k| k.element_name() == name)
    }
}

impl fmt::Display for SystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_name())
    }
}

/// Facing of a crew station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl FromStr for Direction {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(LoadError::UnknownDirection(s.to_string())),
        }
    }
}

/// Crew position attached to a system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub slot_id: i32,
    pub direction: Direction,
}

/// Resolve every system present in `<systemList>` into a validated slot.
///
/// Kinds are visited in [`SystemKind::all`] order; elements whose name is not
/// a known kind are ignored.
pub fn assign_systems(
    system_list: Node<'_, '_>,
    layout: &ShipLayout,
    is_player: bool,
) -> Result<BTreeMap<SystemKind, SystemSlot>, LoadError> {
    let mut systems = BTreeMap::new();
    for &kind in SystemKind::all() {
        let mut elements = system_list
            .children()
            .filter(|c| c.is_element() && c.has_tag_name(kind.element_name()));
        let Some(element) = elements.next() else {
            continue;
        };
        if elements.next().is_some() {
            log::warn!("multiple <{}> entries, using the first", kind);
        }
        systems.insert(kind, assign_system(kind, element, layout, is_player)?);
    }
    Ok(systems)
}

fn assign_system(
    kind: SystemKind,
    element: Node<'_, '_>,
    layout: &ShipLayout,
    is_player: bool,
) -> Result<SystemSlot, LoadError> {
    let spec = kind.spec();

    let power = xml::required_attr(element, "power")?;
    let level_start: u8 = xml::parse_number(power, format!("{kind} 'power' attribute"))?;

    // Player ships are capped by the kind; enemy ships may carry their own max.
    let level_max = match (is_player, element.attribute("max")) {
        (false, Some(max)) => xml::parse_number(max, format!("{kind} 'max' attribute"))?,
        _ => spec.level_cap,
    };
    if level_start > level_max || level_max > spec.level_cap {
        return Err(LoadError::InvalidSystemLevel {
            kind,
            level_start,
            level_max,
            cap: spec.level_cap,
        });
    }

    let room_attr = xml::required_attr(element, "room")?;
    let room_id: i32 = xml::parse_number(room_attr, format!("{kind} 'room' attribute"))?;
    let room = layout
        .index_of(room_id)
        .ok_or(LoadError::UnresolvedSystemRoom { kind, room_id })?;

    let available = match element.attribute("start") {
        Some(start) => xml::parse_flag(start, format!("{kind} 'start' attribute"))?,
        None => true,
    };

    let interior = element.attribute("img").map(str::to_string);

    let weapon = if spec.requires_weapon {
        Some(xml::required_attr(element, "weapon")?.to_string())
    } else {
        None
    };

    let station = if spec.can_own_station {
        match xml::child(element, "slot") {
            Some(slot) => parse_station(kind, slot, spec.default_station)?,
            None => spec.default_station,
        }
    } else {
        None
    };

    Ok(SystemSlot {
        level_start,
        level_max,
        room,
        available,
        interior,
        weapon,
        station,
    })
}

/// Apply a `<slot>` element's optional `number`/`direction` over the default.
fn parse_station(
    kind: SystemKind,
    slot: Node<'_, '_>,
    default: Option<Station>,
) -> Result<Option<Station>, LoadError> {
    let mut station = default.unwrap_or(Station {
        slot_id: 0,
        direction: Direction::Up,
    });
    if let Some(number) = xml::child(slot, "number") {
        station.slot_id = xml::parse_number(&xml::text(number), format!("{kind} slot number"))?;
    }
    if let Some(direction) = xml::child(slot, "direction") {
        station.direction = xml::text(direction).parse()?;
    }
    Ok(Some(station))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::decode_layout;

    fn layout() -> ShipLayout {
        decode_layout("ROOM\n0 0 0 2 2\nROOM\n3 2 0 2 2\n".as_bytes(), "test").unwrap()
    }

    fn assign(xml_text: &str, is_player: bool) -> Result<BTreeMap<SystemKind, SystemSlot>, LoadError> {
        let doc = roxmltree::Document::parse(xml_text).unwrap();
        assign_systems(doc.root_element(), &layout(), is_player)
    }

    #[test]
    fn table_is_consistent() {
        for kind in SystemKind::all() {
            let spec = kind.spec();
            assert!(spec.level_cap > 0, "{kind} has no cap");
            assert_eq!(spec.can_own_station, spec.default_station.is_some());
            assert_eq!(SystemKind::from_element_name(spec.element), Some(*kind));
        }
        assert_eq!(SystemKind::all().len(), 16);
        assert!(SystemKind::Artillery.spec().requires_weapon);
    }

    #[test]
    fn npc_max_defaults_to_cap() {
        let systems = assign(r#"<systemList><shields power="2" room="0"/></systemList>"#, false).unwrap();
        let shields = &systems[&SystemKind::Shields];
        assert_eq!(shields.level_start, 2);
        assert_eq!(shields.level_max, 8);
        assert!(shields.available);
    }

    #[test]
    fn npc_explicit_max_is_kept() {
        let systems =
            assign(r#"<systemList><oxygen power="1" max="2" room="3" start="false"/></systemList>"#, false)
                .unwrap();
        let oxygen = &systems[&SystemKind::Oxygen];
        assert_eq!(oxygen.level_max, 2);
        assert!(!oxygen.available);
        assert_eq!(oxygen.room.get(), 1);
    }

    #[test]
    fn player_ignores_max() {
        let systems = assign(r#"<systemList><pilot power="1" max="2" room="0"/></systemList>"#, true).unwrap();
        assert_eq!(systems[&SystemKind::Pilot].level_max, 3);
    }

    #[test]
    fn levels_above_cap_are_rejected() {
        let err = assign(r#"<systemList><battery power="1" max="5" room="0"/></systemList>"#, false).unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidSystemLevel { kind: SystemKind::Battery, cap: 2, .. }
        ));
        let err = assign(r#"<systemList><medbay power="3" max="2" room="0"/></systemList>"#, false).unwrap_err();
        assert!(matches!(err, LoadError::InvalidSystemLevel { .. }));
    }

    #[test]
    fn unknown_room_fails() {
        let err = assign(r#"<systemList><engines power="2" room="7"/></systemList>"#, false).unwrap_err();
        assert!(matches!(
            err,
            LoadError::UnresolvedSystemRoom { kind: SystemKind::Engines, room_id: 7 }
        ));
    }

    #[test]
    fn artillery_requires_weapon() {
        let err = assign(r#"<systemList><artillery power="1" room="0"/></systemList>"#, false).unwrap_err();
        match err {
            LoadError::MissingAttribute { element, attribute } => {
                assert_eq!(element, "artillery");
                assert_eq!(attribute, "weapon");
            }
            other => panic!("unexpected: {other:?}"),
        }

        let systems = assign(
            r#"<systemList><artillery power="1" room="0" weapon="ARTILLERY_BOSS_1"/></systemList>"#,
            false,
        )
        .unwrap();
        assert_eq!(systems[&SystemKind::Artillery].weapon.as_deref(), Some("ARTILLERY_BOSS_1"));
    }

    #[test]
    fn station_defaults_and_overrides() {
        let systems = assign(
            r#"<systemList>
                <weapons power="3" room="0"/>
                <pilot power="1" room="3">
                    <slot><number>2</number><direction>LeFt</direction></slot>
                </pilot>
                <oxygen power="1" room="0"><slot><number>1</number></slot></oxygen>
            </systemList>"#,
            true,
        )
        .unwrap();
        assert_eq!(systems[&SystemKind::Weapons].station, SystemKind::Weapons.spec().default_station);
        assert_eq!(
            systems[&SystemKind::Pilot].station,
            Some(Station { slot_id: 2, direction: Direction::Left })
        );
        assert_eq!(systems[&SystemKind::Oxygen].station, None);
    }

    #[test]
    fn unknown_direction_fails() {
        let err = assign(
            r#"<systemList><sensors power="1" room="0"><slot><direction>north</direction></slot></sensors></systemList>"#,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::UnknownDirection(ref d) if d == "north"));
    }

    #[test]
    fn malformed_power_is_reported() {
        let err = assign(r#"<systemList><shields power="two" room="0"/></systemList>"#, false).unwrap_err();
        assert!(matches!(err, LoadError::MalformedNumber { ref token, .. } if token == "two"));
    }

    #[test]
    fn missing_room_is_reported() {
        let err = assign(r#"<systemList><doors power="1"/></systemList>"#, false).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingAttribute { ref element, ref attribute }
                if element == "doors" && attribute == "room"
        ));
    }

    #[test]
    fn malformed_room_is_reported() {
        let err = assign(r#"<systemList><engines power="1" room="aft"/></systemList>"#, false).unwrap_err();
        assert!(matches!(err, LoadError::MalformedNumber { ref token, .. } if token == "aft"));
    }
}
