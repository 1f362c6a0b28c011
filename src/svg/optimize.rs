//! Structural size reduction run before reification.
//!
//! A subset of the usual SVG optimizer defaults. `viewBox` and `id` attributes
//! are never touched: resizing needs the former and markers reference the latter.

use super::tree::{AttrValue, Element, Node};
use crate::constants::{CONDITIONAL_ATTRIBUTES, EDITOR_NAMESPACES, TEXT_ELEMENTS};
use std::collections::HashSet;

pub fn optimize(root: &mut Element) {
    remove_insignificant_whitespace(root, false);
    cleanup_attrs(root);
    remove_non_rendering(root);
    remove_editors_data(root);
    remove_empty_attrs(root);
    remove_unused_namespaces(root);
    remove_empty_containers(root);
}

fn remove_insignificant_whitespace(element: &mut Element, preserve: bool) {
    let preserve = preserve || TEXT_ELEMENTS.contains(&element.name.as_str());
    element.children.retain(|child| match child {
        Node::Text(text) => preserve || !text.trim().is_empty(),
        _ => true,
    });
    for child in &mut element.children {
        if let Node::Element(child) = child {
            remove_insignificant_whitespace(child, preserve);
        }
    }
}

fn cleanup_attrs(root: &mut Element) {
    root.walk_each_mut(&mut |element| {
        for attribute in &mut element.attributes {
            if let AttrValue::Text(value) = &mut attribute.value {
                *value = collapse_whitespace(value);
            }
        }
    });
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn remove_non_rendering(element: &mut Element) {
    element.children.retain(|child| match child {
        Node::Element(child) => !is_non_rendering(child),
        _ => true,
    });
    for child in &mut element.children {
        if let Node::Element(child) = child {
            remove_non_rendering(child);
        }
    }
}

fn is_non_rendering(element: &Element) -> bool {
    match element.name.as_str() {
        "metadata" | "title" => true,
        "desc" => {
            let text: String = element
                .children
                .iter()
                .filter_map(|child| match child {
                    Node::Text(text) => Some(text.as_str()),
                    _ => None,
                })
                .collect();
            let text = text.trim();
            text.is_empty() || text.starts_with("Created with") || text.starts_with("Created using")
        }
        _ => false,
    }
}

fn remove_editors_data(root: &mut Element) {
    let prefixes: Vec<String> = root
        .attributes
        .iter()
        .filter_map(|attribute| {
            let prefix = attribute.name.strip_prefix("xmlns:")?;
            match &attribute.value {
                AttrValue::Text(uri) if EDITOR_NAMESPACES.contains(&uri.as_str()) => Some(prefix.to_string()),
                _ => None,
            }
        })
        .collect();

    if prefixes.is_empty() {
        return;
    }

    root.attributes.retain(|attribute| {
        !attribute
            .name
            .strip_prefix("xmlns:")
            .is_some_and(|prefix| prefixes.iter().any(|p| p == prefix))
    });
    strip_prefixed(root, &prefixes);
}

fn strip_prefixed(element: &mut Element, prefixes: &[String]) {
    element
        .attributes
        .retain(|attribute| !has_prefix(&attribute.name, prefixes));
    element.children.retain(|child| match child {
        Node::Element(child) => !has_prefix(&child.name, prefixes),
        _ => true,
    });
    for child in &mut element.children {
        if let Node::Element(child) = child {
            strip_prefixed(child, prefixes);
        }
    }
}

fn has_prefix(name: &str, prefixes: &[String]) -> bool {
    name.split_once(':')
        .is_some_and(|(prefix, _)| prefixes.iter().any(|p| p == prefix))
}

fn remove_empty_attrs(root: &mut Element) {
    root.walk_each_mut(&mut |element| {
        element.attributes.retain(|attribute| match &attribute.value {
            AttrValue::Text(value) => {
                !value.is_empty() || CONDITIONAL_ATTRIBUTES.contains(&attribute.name.as_str())
            }
            AttrValue::Expression(_) => true,
        });
    });
}

fn remove_unused_namespaces(root: &mut Element) {
    let declared: Vec<String> = root
        .attributes
        .iter()
        .filter_map(|attribute| attribute.name.strip_prefix("xmlns:").map(str::to_string))
        .collect();
    if declared.is_empty() {
        return;
    }

    let mut used = HashSet::new();
    root.walk(&mut |element| {
        if let Some((prefix, _)) = element.name.split_once(':') {
            used.insert(prefix.to_string());
        }
        for attribute in &element.attributes {
            if attribute.name.starts_with("xmlns:") {
                continue;
            }
            if let Some((prefix, _)) = attribute.name.split_once(':') {
                used.insert(prefix.to_string());
            }
        }
    });

    root.attributes.retain(|attribute| {
        attribute
            .name
            .strip_prefix("xmlns:")
            .map_or(true, |prefix| used.contains(prefix))
    });
}

fn remove_empty_containers(element: &mut Element) {
    for child in &mut element.children {
        if let Node::Element(child) = child {
            remove_empty_containers(child);
        }
    }
    element.children.retain(|child| match child {
        Node::Element(child) => !is_empty_container(child),
        _ => true,
    });
}

fn is_empty_container(element: &Element) -> bool {
    matches!(element.name.as_str(), "g" | "defs")
        && element.children.is_empty()
        && !element.has_attr("id")
        && !element.has_attr("filter")
}
