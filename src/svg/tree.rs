//! In-memory SVG document used by the optimize and reify passes.
//!
//! Attribute values and text can be either literal text or a JS expression.
//! Expressions are written inside `{}` without escaping, which is what lets
//! the reified `style` objects survive serialization untouched.

use crate::constants::{MARKUP_INDENT, TEXT_ELEMENTS};
use crate::error::SvgError;
use quick_xml::escape::{escape, partial_escape, resolve_predefined_entity};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Text(String),
    Expression(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Expression(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Literal text value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|a| a.name == name).and_then(|a| match &a.value {
            AttrValue::Text(text) => Some(text.as_str()),
            AttrValue::Expression(_) => None,
        })
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    /// Sets an attribute, keeping its position when it already exists.
    pub fn set_attr(&mut self, name: impl Into<String>, value: AttrValue) {
        let name = name.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<AttrValue> {
        let index = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(index).value)
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Calls `f` on this element and every descendant, parents first.
    pub fn walk_mut<E>(&mut self, f: &mut impl FnMut(&mut Element) -> Result<(), E>) -> Result<(), E> {
        f(self)?;
        for child in &mut self.children {
            if let Node::Element(element) = child {
                element.walk_mut(f)?;
            }
        }
        Ok(())
    }

    /// Infallible form of [`Element::walk_mut`].
    pub fn walk_each_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for child in &mut self.children {
            if let Node::Element(element) = child {
                element.walk_each_mut(f);
            }
        }
    }

    pub fn walk(&self, f: &mut impl FnMut(&Element)) {
        f(self);
        for element in self.child_elements() {
            element.walk(f);
        }
    }

    /// Pretty-prints the element as JSX-compatible markup, one element per line.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        write_element(&mut out, self, 0);
        out
    }
}

/// Parses SVG markup. Declarations, doctypes, processing instructions and
/// comments are not kept; entities declared in the doctype's internal subset
/// are expanded.
pub fn parse(input: &str) -> Result<Element, SvgError> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut entities: HashMap<String, String> = HashMap::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| SvgError::Xml(format!("{} at byte {}", e, reader.error_position())))?;

        match event {
            Event::DocType(doctype) => {
                let doctype = doctype.decode().map_err(|e| SvgError::Xml(e.to_string()))?;
                entities.extend(internal_entities(&doctype));
            }
            Event::Start(start) => stack.push(element_from(&start, &reader, &entities)?),
            Event::Empty(start) => {
                let element = element_from(&start, &reader, &entities)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(end) => {
                let element = stack.pop().ok_or_else(|| {
                    SvgError::UnbalancedMarkup(format!(
                        "unexpected closing tag </{}>",
                        String::from_utf8_lossy(end.name().as_ref())
                    ))
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text.decode().map_err(|e| SvgError::Xml(e.to_string()))?;
                push_text(&mut stack, &text);
            }
            Event::CData(data) => {
                let data = data.into_inner();
                push_text(&mut stack, &String::from_utf8_lossy(&data));
            }
            Event::GeneralRef(reference) => {
                let name = reference.decode().map_err(|e| SvgError::Xml(e.to_string()))?;
                push_text(&mut stack, &resolve_reference(&name, &entities));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(SvgError::UnbalancedMarkup(format!("<{}> is never closed", open.name)));
    }
    root.ok_or(SvgError::NoRootElement)
}

/// `<!ENTITY name "value">` pairs from a doctype body. Parameter and
/// external entities are skipped.
fn internal_entities(doctype: &str) -> HashMap<String, String> {
    let mut entities = HashMap::new();
    let mut rest = doctype;
    while let Some(start) = rest.find("<!ENTITY") {
        rest = rest[start + "<!ENTITY".len()..].trim_start();
        if rest.starts_with('%') {
            continue;
        }
        let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (name, after) = rest.split_at(name_end);
        let after = after.trim_start();
        let Some(quote) = after.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            rest = after;
            continue;
        };
        let body = &after[1..];
        let Some(end) = body.find(quote) else {
            break;
        };
        entities.insert(name.to_string(), body[..end].to_string());
        rest = &body[end + 1..];
    }
    entities
}

fn element_from(
    start: &BytesStart<'_>,
    reader: &Reader<&[u8]>,
    entities: &HashMap<String, String>,
) -> Result<Element, SvgError> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| SvgError::Xml(e.to_string()))?;
        let name = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .decode_and_unescape_value_with(reader.decoder(), |entity| {
                entities
                    .get(entity)
                    .map(String::as_str)
                    .or_else(|| resolve_predefined_entity(entity))
            })
            .map_err(|e| SvgError::Xml(e.to_string()))?;
        element.set_attr(name, AttrValue::Text(value.into_owned()));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<(), SvgError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(SvgError::UnbalancedMarkup(format!(
            "second root element <{}>",
            element.name
        )));
    }
    *root = Some(element);
    Ok(())
}

// Text split around entity references is merged back into one node.
fn push_text(stack: &mut [Element], text: &str) {
    let Some(parent) = stack.last_mut() else {
        return;
    };
    match parent.children.last_mut() {
        Some(Node::Text(existing)) => existing.push_str(text),
        _ => parent.children.push(Node::Text(text.to_string())),
    }
}

fn resolve_reference(name: &str, entities: &HashMap<String, String>) -> String {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => number.parse::<u32>().ok(),
        };
        if let Some(c) = code.and_then(char::from_u32) {
            return c.to_string();
        }
    } else if let Some(resolved) = entities.get(name) {
        return resolved.clone();
    } else if let Some(resolved) = resolve_predefined_entity(name) {
        return resolved.to_string();
    }
    format!("&{name};")
}

fn write_open_tag(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(&element.name);
    for attribute in &element.attributes {
        out.push(' ');
        out.push_str(&attribute.name);
        match &attribute.value {
            AttrValue::Text(text) => {
                out.push_str("=\"");
                out.push_str(&escape(text.as_str()));
                out.push('"');
            }
            AttrValue::Expression(expression) => {
                out.push_str("={");
                out.push_str(expression);
                out.push('}');
            }
        }
    }
}

fn write_close_tag(out: &mut String, element: &Element) {
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

// Line breaks inside text content would be trimmed away by JSX together with
// the spaces between words.
fn keeps_inline(element: &Element) -> bool {
    TEXT_ELEMENTS.contains(&element.name.as_str())
        || element.children.iter().any(|child| !matches!(child, Node::Element(_)))
}

fn write_element(out: &mut String, element: &Element, depth: usize) {
    let indent = " ".repeat(depth * MARKUP_INDENT);
    out.push_str(&indent);

    if element.children.is_empty() || keeps_inline(element) {
        write_inline_element(out, element);
        out.push('\n');
        return;
    }

    write_open_tag(out, element);
    out.push_str(">\n");
    for child in element.child_elements() {
        write_element(out, child, depth + 1);
    }
    out.push_str(&indent);
    write_close_tag(out, element);
    out.push('\n');
}

fn write_inline_element(out: &mut String, element: &Element) {
    write_open_tag(out, element);
    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in &element.children {
        write_inline(out, child);
    }
    write_close_tag(out, element);
}

fn write_inline(out: &mut String, node: &Node) {
    match node {
        // Braces would open a JSX expression, so such text goes in as a string literal.
        Node::Text(text) if text.contains(['{', '}']) => {
            out.push('{');
            out.push_str(&serde_json::Value::String(text.clone()).to_string());
            out.push('}');
        }
        Node::Text(text) => out.push_str(&partial_escape(text.as_str())),
        Node::Expression(expression) => {
            out.push('{');
            out.push_str(expression);
            out.push('}');
        }
        Node::Element(element) => write_inline_element(out, element),
    }
}
