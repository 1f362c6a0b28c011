use crate::constants::{JSX_EXTENSION, MARKUP_INDENT, TSX_EXTENSION};
use crate::logger::indent_lines;
use std::path::{Path, PathBuf};

/// Wraps markup in a default-exported arrow function component.
pub fn make_default_function_component(markup: &str) -> String {
    format!(
        "export default () => (\n{});\n",
        indent_lines(markup, MARKUP_INDENT)
    )
}

/// `icons/arrow.svg` -> `icons/arrow.tsx` (or `.jsx`).
pub fn component_path(svg_path: &Path, jsx: bool) -> PathBuf {
    svg_path.with_extension(if jsx { JSX_EXTENSION } else { TSX_EXTENSION })
}
