//! SVG to React component conversion.
//!
//! The document is parsed once, optimized, reified and only then serialized,
//! so no pass ever sees escaped output from a previous one.

pub mod component;
pub mod optimize;
pub mod reify;
pub mod tree;

pub use component::{component_path, make_default_function_component};
pub use tree::{AttrValue, Attribute, Element, Node};

use crate::error::SvgError;

/// Runs both passes and returns the reified markup.
pub fn reify_markup(svg: &str) -> Result<String, SvgError> {
    let mut root = tree::parse(svg)?;
    optimize::optimize(&mut root);
    reify::reify(&mut root)?;
    Ok(root.to_markup())
}

/// Full pipeline: markup in, component module source out.
pub fn svg_to_component(svg: &str) -> Result<String, SvgError> {
    Ok(make_default_function_component(&reify_markup(svg)?))
}
