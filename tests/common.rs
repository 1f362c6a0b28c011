#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const ICON_SVG: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 24 24" class="icon">
  <title>Icon</title>
  <defs><path id="p" d="M0 0h24v24H0z"/></defs>
  <g style="fill-opacity: 0.5; enable-background: new 0 0 24 24;">
    <use xlink:href="#p" stroke-width="2"/>
  </g>
</svg>
"##;

pub const STYLED_SVG: &str = r#"<svg viewBox="0 0 10 10"><style>.st0{fill:none}</style><rect class="st0" width="10" height="10"/></svg>"#;

/// Fails in the style reification step.
pub const BROKEN_STYLE_SVG: &str = r#"<svg viewBox="0 0 10 10"><path style="no-colon-here" d="M0 0"/></svg>"#;

/// PNG signature followed by filler bytes.
pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfiller";

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

pub fn write_file(dir: &Path, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Three SVGs, the last one with an inline style that cannot be parsed.
pub fn create_svg_batch(dir: &Path) -> Vec<PathBuf> {
    vec![
        write_file(dir, "icon.svg", ICON_SVG),
        write_file(dir, "styled.svg", STYLED_SVG),
        write_file(dir, "broken.svg", BROKEN_STYLE_SVG),
    ]
}

pub fn glob_in(dir: &Path, pattern: &str) -> String {
    format!("{}/{}", dir.display(), pattern)
}
