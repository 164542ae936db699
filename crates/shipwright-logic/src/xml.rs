//! Small accessors over catalog elements that report structured errors.

use roxmltree::Node;
use std::str::FromStr;

use crate::error::LoadError;

pub(crate) fn element_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

pub(crate) fn required_attr<'a>(node: Node<'a, '_>, attribute: &str) -> Result<&'a str, LoadError> {
    node.attribute(attribute)
        .ok_or_else(|| LoadError::missing_attribute(element_name(node), attribute))
}

pub(crate) fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|c| c.is_element() && c.has_tag_name(name))
}

pub(crate) fn required_child<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> Result<Node<'a, 'input>, LoadError> {
    child(node, name).ok_or_else(|| LoadError::missing_child(element_name(node), name))
}

/// Concatenated text content of an element, trimmed.
pub(crate) fn text(node: Node<'_, '_>) -> String {
    let raw: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    raw.trim().to_string()
}

pub(crate) fn required_child_text(node: Node<'_, '_>, name: &str) -> Result<String, LoadError> {
    required_child(node, name).map(text)
}

pub(crate) fn parse_number<T: FromStr>(token: &str, context: impl Into<String>) -> Result<T, LoadError> {
    token
        .trim()
        .parse()
        .map_err(|_| LoadError::malformed_number(token, context))
}

/// `true`/`false`, case-insensitive.
pub(crate) fn parse_flag(token: &str, context: impl Into<String>) -> Result<bool, LoadError> {
    let value = token.trim();
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(LoadError::malformed_number(token, context))
    }
}
