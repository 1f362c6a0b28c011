pub const SVG_EXTENSION: &str = "svg";
pub const TINIFY_EXTENSIONS: &[&str] = &["png", "webp", "jpeg", "jpg"];

pub const TSX_EXTENSION: &str = "tsx";
pub const JSX_EXTENSION: &str = "jsx";

/// Indentation used for pretty-printed markup and the component body.
pub const MARKUP_INDENT: usize = 2;
/// Indentation of error messages under their file in batch reports.
pub const REPORT_INDENT: usize = 3;

pub const DEFAULT_POSTFIX: &str = "min";
pub const WEBP_MIME_TYPE: &str = "image/webp";

// Config store location, relative to the home directory.
pub const CONFIG_DIR_ENV: &str = "NCLI_CONFIG_DIR";
pub const CONFIG_PARENT_DIR: &str = ".nobu";
pub const CONFIG_APP_DIR: &str = "cli-tools";
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const TINIFY_API_ENDPOINT: &str = "https://api.tinify.com";
pub const TINIFY_SHRINK_PATH: &str = "/shrink";
pub const TINIFY_AUTH_USER: &str = "api";
pub const TINIFY_COUNT_HEADER: &str = "compression-count";
pub const USER_AGENT: &str = concat!("ncli/", env!("CARGO_PKG_VERSION"));

pub const API_KEY_PROMPT: &str = "Please enter your tinify API key";

pub const PROGRESS_BAR_TEMPLATE: &str = "{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}";

/// Namespaces written by vector editors that carry no rendering information.
pub const EDITOR_NAMESPACES: &[&str] = &[
    "http://inkscape.sourceforge.net/DTD/sodipodi-0.dtd",
    "http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd",
    "http://www.inkscape.org/namespaces/inkscape",
    "http://www.bohemiancoding.com/sketch/ns",
    "http://ns.adobe.com/AdobeIllustrator/10.0/",
    "http://ns.adobe.com/Graphs/1.0/",
    "http://ns.adobe.com/AdobeSVGViewerExtensions/3.0/",
    "http://ns.adobe.com/Variables/1.0/",
    "http://ns.adobe.com/SaveForWeb/1.0/",
    "http://ns.adobe.com/Extensibility/1.0/",
    "http://ns.adobe.com/Flows/1.0/",
    "http://ns.adobe.com/ImageReplacement/1.0/",
    "http://ns.adobe.com/GenericCustomNamespace/1.0/",
    "http://ns.adobe.com/XPath/1.0/",
    "http://schemas.microsoft.com/visio/2003/SVGExtensions/",
    "http://taptrix.com/vectorillustrator/svg_extensions",
    "http://www.figma.com/figma/ns",
    "http://purl.org/dc/elements/1.1/",
    "http://creativecommons.org/ns#",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
    "http://www.serif.com/",
    "http://www.vector.evaxdesign.sk",
    "http://boxy-svg.com",
    "http://vectornator.io",
];

/// Conditional processing attributes keep their meaning even when empty.
pub const CONDITIONAL_ATTRIBUTES: &[&str] = &["requiredExtensions", "requiredFeatures", "systemLanguage"];

/// Elements whose whitespace text is significant.
pub const TEXT_ELEMENTS: &[&str] = &["text", "tspan", "textPath", "style"];
