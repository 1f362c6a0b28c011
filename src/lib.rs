pub mod logger;

pub mod batch;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod files;
pub mod isolate;
pub mod react_svg;
pub mod svg;
pub mod tinify;

pub use batch::{resolve_globs, BatchReport};
pub use config::{Config, ConfigRepository, FileConfigRepository, MemoryConfigRepository};
pub use error::{ConversionError, NcliError, Result, SvgError, TinifyClientError, TinifyError};
pub use isolate::{isolate, isolate_sync, IsolateError};
pub use react_svg::ReactSvgOptions;
pub use svg::{reify_markup, svg_to_component};
pub use tinify::{CompressionService, TinifyClient, TinifyOptions};
