//! Error taxonomy for blueprint loading.
//!
//! Every variant is terminal for the enclosing call: the first error aborts
//! the build and no partial graph is returned. Missing backing resources
//! (`ResourceNotFound`) are kept distinct from malformed content found after
//! a successful open.

use crate::systems::SystemKind;

/// Errors that can occur while locating, decoding or assembling a ship.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A required attribute is absent from an element.
    #[error("<{element}> is missing '{attribute}' attribute")]
    MissingAttribute { element: String, attribute: String },

    /// A required child element is absent.
    #[error("<{element}> is missing <{child}> child")]
    MissingChild { element: String, child: String },

    /// The archive holds no resource at this path.
    #[error("resource not found in archive: {0}")]
    ResourceNotFound(String),

    /// A token that should be an integer (or boolean) could not be parsed.
    #[error("malformed number '{token}' in {context}")]
    MalformedNumber { token: String, context: String },

    /// Structural problem in the layout text.
    #[error("layout line {line} ('{content}'): {reason}")]
    MalformedLayout {
        line: usize,
        content: String,
        reason: String,
    },

    /// A layout line that is neither a keyword nor integer values.
    #[error("unknown layout token '{token}' on line {line}")]
    UnknownLayoutToken { token: String, line: usize },

    /// A door references a room id that the layout never defines.
    #[error("door #{door_index} references unknown room {room_id}")]
    UnresolvedDoorReference { door_index: usize, room_id: i32 },

    /// A system is assigned to a room id that the layout never defines.
    #[error("{kind} is assigned to unknown room {room_id}")]
    UnresolvedSystemRoom { kind: SystemKind, room_id: i32 },

    /// Station direction outside the compass set.
    #[error("unknown station direction '{0}'")]
    UnknownDirection(String),

    /// `level_start <= level_max <= cap` does not hold.
    #[error("{kind} levels out of range: start {level_start}, max {level_max}, cap {cap}")]
    InvalidSystemLevel {
        kind: SystemKind,
        level_start: u8,
        level_max: u8,
        cap: u8,
    },

    /// The catalog document is not well-formed XML.
    #[error("catalog is not well-formed: {0}")]
    Catalog(#[from] roxmltree::Error),

    /// Reading an opened resource failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    pub(crate) fn missing_attribute(element: &str, attribute: &str) -> Self {
        LoadError::MissingAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        }
    }

    pub(crate) fn missing_child(element: &str, child: &str) -> Self {
        LoadError::MissingChild {
            element: element.to_string(),
            child: child.to_string(),
        }
    }

    pub(crate) fn malformed_number(token: &str, context: impl Into<String>) -> Self {
        LoadError::MalformedNumber {
            token: token.to_string(),
            context: context.into(),
        }
    }
}
