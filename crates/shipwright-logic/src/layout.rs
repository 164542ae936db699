//! Layout text decoding and encoding.
//!
//! The layout format is a sequence of non-blank lines. Every line is either
//! a keyword (`X_OFFSET`, `Y_OFFSET`, `HORIZONTAL`, `VERTICAL`, `ELLIPSE`,
//! `ROOM`, `DOOR`) or one or more whitespace-separated integers that supply
//! the values of the most recent keyword. Values of a single keyword may be
//! spread over several lines.
//!
//! Decoding runs in two passes. The scan pass records rooms in an arena and
//! doors with raw room ids (a door may name a room declared further down).
//! The resolution pass then turns every door's ids into arena handles.
//!
//! ```
//! use shipwright_logic::layout::decode_layout;
//!
//! let text = "X_OFFSET\n5\nROOM\n0 0 0 2 2\nROOM\n1 2 0 2 2\nDOOR\n2 0 0 1 0\n";
//! let layout = decode_layout(text.as_bytes(), "kestral.txt").unwrap();
//! assert_eq!(layout.x_offset, 5);
//! let (left, right) = layout.door_rooms(&layout.doors()[0]);
//! assert_eq!((left.id, right.id), (0, 1));
//! assert!(layout.doors()[0].horizontal);
//! ```

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};

use crate::error::LoadError;
use crate::graph::{Door, Ellipse, Room, RoomIndex, ShipLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    XOffset,
    YOffset,
    Horizontal,
    Vertical,
    Ellipse,
    Room,
    Door,
}

impl Keyword {
    const ALL: [Keyword; 7] = [
        Keyword::XOffset,
        Keyword::YOffset,
        Keyword::Horizontal,
        Keyword::Vertical,
        Keyword::Ellipse,
        Keyword::Room,
        Keyword::Door,
    ];

    fn token(self) -> &'static str {
        match self {
            Keyword::XOffset => "X_OFFSET",
            Keyword::YOffset => "Y_OFFSET",
            Keyword::Horizontal => "HORIZONTAL",
            Keyword::Vertical => "VERTICAL",
            Keyword::Ellipse => "ELLIPSE",
            Keyword::Room => "ROOM",
            Keyword::Door => "DOOR",
        }
    }

    /// Number of integers that follow the keyword.
    fn arity(self) -> usize {
        match self {
            Keyword::XOffset | Keyword::YOffset | Keyword::Horizontal | Keyword::Vertical => 1,
            Keyword::Ellipse => 4,
            Keyword::Room | Keyword::Door => 5,
        }
    }

    fn from_token(token: &str) -> Option<Keyword> {
        Self::ALL.into_iter().find(|k| k.token() == token)
    }
}

/// What a non-blank line is.
#[derive(Debug, PartialEq)]
enum Line {
    Keyword(Keyword),
    Values(Vec<i32>),
}

fn is_integer_shaped(token: &str) -> bool {
    let digits = token.strip_prefix(&['-', '+'][..]).unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn classify(content: &str, line: usize) -> Result<Line, LoadError> {
    if let Some(keyword) = Keyword::from_token(content) {
        return Ok(Line::Keyword(keyword));
    }
    content
        .split_whitespace()
        .map(|token| {
            if !is_integer_shaped(token) {
                return Err(LoadError::UnknownLayoutToken {
                    token: token.to_string(),
                    line,
                });
            }
            token
                .parse()
                .map_err(|_| LoadError::malformed_number(token, format!("layout line {line}")))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Line::Values)
}

/// A keyword still collecting its values.
struct Pending {
    keyword: Keyword,
    line: usize,
    content: String,
    values: Vec<i32>,
}

impl Pending {
    fn shortfall(&self) -> String {
        format!(
            "{} on line {} expects {} values, found {}",
            self.keyword.token(),
            self.line,
            self.keyword.arity(),
            self.values.len()
        )
    }
}

/// A door whose rooms are still raw ids.
struct PendingDoor {
    x: i32,
    y: i32,
    left_id: i32,
    right_id: i32,
    horizontal: bool,
}

#[derive(Default)]
struct Scan {
    x_offset: i32,
    y_offset: i32,
    horizontal: i32,
    vertical: i32,
    ellipse: Ellipse,
    rooms: Vec<Room>,
    room_index: HashMap<i32, usize>,
    doors: Vec<PendingDoor>,
}

impl Scan {
    fn apply(&mut self, pending: Pending) -> Result<(), LoadError> {
        let v = &pending.values;
        match pending.keyword {
            Keyword::XOffset => self.x_offset = v[0],
            Keyword::YOffset => self.y_offset = v[0],
            Keyword::Horizontal => self.horizontal = v[0],
            Keyword::Vertical => self.vertical = v[0],
            Keyword::Ellipse => {
                self.ellipse = Ellipse {
                    width: v[0],
                    height: v[1],
                    x: v[2],
                    y: v[3],
                }
            }
            Keyword::Room => {
                let room = Room {
                    id: v[0],
                    x: v[1],
                    y: v[2],
                    width: v[3],
                    height: v[4],
                };
                if self.room_index.insert(room.id, self.rooms.len()).is_some() {
                    return Err(LoadError::MalformedLayout {
                        line: pending.line,
                        content: pending.content,
                        reason: format!("duplicate room id {}", room.id),
                    });
                }
                self.rooms.push(room);
            }
            Keyword::Door => self.doors.push(PendingDoor {
                x: v[0],
                y: v[1],
                left_id: v[2],
                right_id: v[3],
                horizontal: v[4] == 0,
            }),
        }
        Ok(())
    }

    /// Second pass: map every door's room ids onto arena handles.
    fn resolve(self) -> Result<ShipLayout, LoadError> {
        let lookup = |door_index: usize, room_id: i32| {
            self.room_index
                .get(&room_id)
                .map(|&i| RoomIndex::new(i))
                .ok_or(LoadError::UnresolvedDoorReference {
                    door_index,
                    room_id,
                })
        };
        let doors = self
            .doors
            .iter()
            .enumerate()
            .map(|(i, d)| -> Result<Door, LoadError> {
                Ok(Door {
                    x: d.x,
                    y: d.y,
                    horizontal: d.horizontal,
                    left_room: lookup(i, d.left_id)?,
                    right_room: lookup(i, d.right_id)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ShipLayout::from_parts(
            self.x_offset,
            self.y_offset,
            self.horizontal,
            self.vertical,
            self.ellipse,
            self.rooms,
            doors,
        ))
    }
}

/// Decode a layout stream. `source` names the stream in errors and logs.
pub fn decode_layout<R: Read>(reader: R, source: &str) -> Result<ShipLayout, LoadError> {
    let mut scan = Scan::default();
    let mut pending: Option<Pending> = None;

    for (i, line) in BufReader::new(reader).split(b'\n').enumerate() {
        let line_no = i + 1;
        let bytes = line.map_err(|source_err| LoadError::Io {
            path: source.to_string(),
            source: source_err,
        })?;
        let raw = String::from_utf8(bytes).map_err(|e| LoadError::MalformedLayout {
            line: line_no,
            content: String::from_utf8_lossy(e.as_bytes()).trim().to_string(),
            reason: "invalid UTF-8".to_string(),
        })?;
        let content = raw.trim();
        if content.is_empty() {
            continue;
        }

        match classify(content, line_no)? {
            Line::Keyword(keyword) => {
                if let Some(cut) = pending.take() {
                    return Err(LoadError::MalformedLayout {
                        line: line_no,
                        content: content.to_string(),
                        reason: cut.shortfall(),
                    });
                }
                pending = Some(Pending {
                    keyword,
                    line: line_no,
                    content: content.to_string(),
                    values: Vec::with_capacity(keyword.arity()),
                });
            }
            Line::Values(values) => {
                for value in values {
                    let Some(p) = pending.as_mut() else {
                        return Err(LoadError::MalformedLayout {
                            line: line_no,
                            content: content.to_string(),
                            reason: format!("value {value} has no preceding keyword"),
                        });
                    };
                    p.values.push(value);
                    if p.values.len() == p.keyword.arity() {
                        if let Some(done) = pending.take() {
                            scan.apply(done)?;
                        }
                    }
                }
            }
        }
    }

    if let Some(cut) = pending {
        return Err(LoadError::MalformedLayout {
            line: cut.line,
            content: cut.content.clone(),
            reason: format!("stream ended: {}", cut.shortfall()),
        });
    }

    let layout = scan.resolve()?;
    log::debug!(
        "decoded {}: {} rooms, {} doors",
        source,
        layout.rooms().len(),
        layout.doors().len()
    );
    Ok(layout)
}

/// Write a layout in the game's one-value-per-line style.
pub fn encode_layout<W: Write>(layout: &ShipLayout, mut writer: W) -> std::io::Result<()> {
    let mut entry = |keyword: Keyword, values: &[i32]| -> std::io::Result<()> {
        writeln!(writer, "{}", keyword.token())?;
        for value in values {
            writeln!(writer, "{value}")?;
        }
        Ok(())
    };

    entry(Keyword::XOffset, &[layout.x_offset])?;
    entry(Keyword::YOffset, &[layout.y_offset])?;
    entry(Keyword::Horizontal, &[layout.horizontal])?;
    entry(Keyword::Vertical, &[layout.vertical])?;
    let e = layout.ellipse;
    entry(Keyword::Ellipse, &[e.width, e.height, e.x, e.y])?;
    for r in layout.rooms() {
        entry(Keyword::Room, &[r.id, r.x, r.y, r.width, r.height])?;
    }
    for d in layout.doors() {
        let (left, right) = layout.door_rooms(d);
        let flag = if d.horizontal { 0 } else { 1 };
        entry(Keyword::Door, &[d.x, d.y, left.id, right.id, flag])?;
    }
    Ok(())
}

/// [`encode_layout`] into a string.
pub fn layout_to_text(layout: &ShipLayout) -> String {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = encode_layout(layout, &mut out);
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(text: &str) -> Result<ShipLayout, LoadError> {
        decode_layout(text.as_bytes(), "test.txt")
    }

    #[test]
    fn classify_is_deterministic() {
        assert_eq!(classify("ROOM", 1).unwrap(), Line::Keyword(Keyword::Room));
        assert_eq!(classify("1 -2 +3", 1).unwrap(), Line::Values(vec![1, -2, 3]));
        assert!(matches!(
            classify("room", 4),
            Err(LoadError::UnknownLayoutToken { ref token, line: 4 }) if token == "room"
        ));
        assert!(matches!(
            classify("99999999999", 2),
            Err(LoadError::MalformedNumber { .. })
        ));
        assert!(matches!(
            classify("1 2x", 3),
            Err(LoadError::UnknownLayoutToken { ref token, .. }) if token == "2x"
        ));
    }

    #[test]
    fn all_fields_are_read() {
        let layout = decode(
            "X_OFFSET\n1\nY_OFFSET\n2\nHORIZONTAL\n-30\nVERTICAL\n40\n\
             ELLIPSE\n200\n150\n10\n-5\n",
        )
        .unwrap();
        assert_eq!(
            (layout.x_offset, layout.y_offset, layout.horizontal, layout.vertical),
            (1, 2, -30, 40)
        );
        assert_eq!(
            layout.ellipse,
            Ellipse {
                width: 200,
                height: 150,
                x: 10,
                y: -5
            }
        );
    }

    #[test]
    fn values_may_span_lines_and_blank_lines_are_skipped() {
        let layout = decode("ROOM\n\n3\n1 2\n\n4\n5\n").unwrap();
        assert_eq!(
            layout.rooms(),
            &[Room {
                id: 3,
                x: 1,
                y: 2,
                width: 4,
                height: 5
            }]
        );
    }

    #[test]
    fn door_may_reference_later_room() {
        let layout = decode("DOOR\n1 0 0 1 1\nROOM\n0 0 0 1 1\nROOM\n1 1 0 1 1\n").unwrap();
        let door = &layout.doors()[0];
        assert!(!door.horizontal);
        let (left, right) = layout.door_rooms(door);
        assert_eq!((left.id, right.id), (0, 1));
    }

    #[test]
    fn unresolved_door_reference_fails() {
        let err = decode("ROOM\n0 0 0 1 1\nDOOR\n1 0 0 1 1\nDOOR\n0 1 0 5 0\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::UnresolvedDoorReference {
                door_index: 0,
                room_id: 1
            }
        ));
    }

    #[test]
    fn truncated_keyword_is_malformed() {
        match decode("ROOM\n0 0 0\nDOOR\n1 1 1 1 1\n").unwrap_err() {
            LoadError::MalformedLayout { line, content, .. } => {
                assert_eq!(line, 3);
                assert_eq!(content, "DOOR");
            }
            other => panic!("unexpected: {other:?}"),
        }
        match decode("X_OFFSET\n1\nELLIPSE\n1 2\n").unwrap_err() {
            LoadError::MalformedLayout { line, content, reason } => {
                assert_eq!(line, 3);
                assert_eq!(content, "ELLIPSE");
                assert!(reason.starts_with("stream ended"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn stray_values_are_malformed() {
        assert!(matches!(
            decode("5\n"),
            Err(LoadError::MalformedLayout { line: 1, .. })
        ));
        assert!(matches!(
            decode("X_OFFSET\n5 6\n"),
            Err(LoadError::MalformedLayout { line: 2, .. })
        ));
    }

    #[test]
    fn duplicate_room_id_is_rejected() {
        let err = decode("ROOM\n0 0 0 1 1\nROOM\n0 4 4 1 1\n").unwrap_err();
        assert!(matches!(err, LoadError::MalformedLayout { line: 3, ref reason, .. } if reason.contains("duplicate")));
    }

    #[test]
    fn unknown_keyword_fails() {
        let err = decode("X_OFFSET\n1\nWINDOW\n2\n").unwrap_err();
        assert!(matches!(err, LoadError::UnknownLayoutToken { line: 3, .. }));
    }

    #[test]
    fn invalid_utf8_line_is_malformed() {
        let bytes: &[u8] = b"X_OFFSET\n5\nROOM\n0 0 0 2 2\nR\xc9OM\n1 2 0 2 2\n";
        match decode_layout(bytes, "test.txt") {
            Err(LoadError::MalformedLayout { line, content, reason }) => {
                assert_eq!(line, 5);
                assert!(content.starts_with('R') && content.ends_with("OM"));
                assert_eq!(reason, "invalid UTF-8");
            }
            other => panic!("expected MalformedLayout, got {other:?}"),
        }
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let layout = decode("X_OFFSET\r\n7\r\nROOM\r\n0 0 0 1 1\r\n").unwrap();
        assert_eq!(layout.x_offset, 7);
        assert_eq!(layout.rooms().len(), 1);
    }

    #[test]
    fn encode_writes_game_style() {
        let layout = decode("ROOM\n0 0 0 2 2\nROOM\n1 2 0 2 2\nDOOR\n2 0 0 1 0\n").unwrap();
        let text = layout_to_text(&layout);
        assert!(text.starts_with("X_OFFSET\n0\nY_OFFSET\n0\n"));
        assert!(text.contains("ROOM\n1\n2\n0\n2\n2\n"));
        assert!(text.ends_with("DOOR\n2\n0\n0\n1\n0\n"));
        assert_eq!(decode(&text).unwrap(), layout);
    }
}
