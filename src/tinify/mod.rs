//! Image compression through the Tinify API.

pub mod client;
pub mod command;

pub use client::{CompressedImage, CompressionService, ConvertTarget, TinifyClient};
pub use command::{ensure_api_key, minify_file, output_path, run, KeyPrompt, KeyStatus, TerminalPrompt, TinifyOptions};
