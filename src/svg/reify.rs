//! Rewrites SVG markup into a form React accepts.
//!
//! * `<style>` text becomes a string expression.
//! * `class` becomes `className`.
//! * inline `style` strings become object expressions with camel-cased keys.
//! * attribute names with `:` or `-` are camel-cased (`xlink:href` -> `xlinkHref`).
//!
//! The inline style parser is deliberately naive: declarations are split on
//! `;` and then on `:`, so a value that itself contains `:` (a URL, for
//! example) is rejected as malformed.

use super::tree::{AttrValue, Element, Node};
use crate::error::SvgError;
use serde_json::{Map, Value};

/// Inline style properties React does not understand.
const UNSUPPORTED_STYLE_PROPERTIES: &[&str] = &["enable-background"];

pub fn reify(root: &mut Element) -> Result<(), SvgError> {
    root.walk_mut(&mut |element| {
        reify_style_tag(element);
        reify_attributes(element)
    })
}

fn reify_style_tag(element: &mut Element) {
    if element.name != "style" {
        return;
    }
    if let Some(Node::Text(css)) = element.children.first() {
        let literal = Value::String(css.clone()).to_string();
        element.children[0] = Node::Expression(literal);
    }
}

fn reify_attributes(element: &mut Element) -> Result<(), SvgError> {
    let attributes = std::mem::take(&mut element.attributes);
    for mut attribute in attributes {
        if attribute.name == "style" {
            if let AttrValue::Text(css) = &attribute.value {
                attribute.value = AttrValue::Expression(style_object(css)?);
            }
        }
        let name = if attribute.name == "class" {
            "className".to_string()
        } else {
            camel_case_attribute(&attribute.name)
        };
        element.set_attr(name, attribute.value);
    }
    Ok(())
}

/// Serializes an inline CSS string as a JS object literal.
pub fn style_object(css: &str) -> Result<String, SvgError> {
    Ok(Value::Object(parse_css_declarations(css)?).to_string())
}

/// Splits `a: 1; b-c: 2;` into `{"a": "1", "bC": "2"}`.
pub fn parse_css_declarations(css: &str) -> Result<Map<String, Value>, SvgError> {
    let mut properties = Map::new();
    for declaration in css.split(';') {
        if declaration.trim().is_empty() {
            continue;
        }
        let mut parts = declaration.split(':');
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(SvgError::MalformedStyle(declaration.trim().to_string()));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(SvgError::MalformedStyle(declaration.trim().to_string()));
        }
        if UNSUPPORTED_STYLE_PROPERTIES.contains(&key) {
            continue;
        }
        properties.insert(camel_case_property(key), Value::String(value.trim().to_string()));
    }
    Ok(properties)
}

/// `stroke-width` -> `strokeWidth`. Only a dash followed by a lowercase letter
/// is folded; other dashes stay.
pub fn camel_case_property(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(next) if c == '-' && next.is_ascii_lowercase() => {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

/// `xlink:href` -> `xlinkHref`, `stroke-width` -> `strokeWidth`. Separators
/// not followed by a letter or a digit 1-9 are dropped.
pub fn camel_case_attribute(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        if c != ':' && c != '-' {
            out.push(c);
            continue;
        }
        if let Some(&next) = chars.peek() {
            if next.is_ascii_alphabetic() || ('1'..='9').contains(&next) {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
        }
    }
    out
}
