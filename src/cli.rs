use crate::constants::DEFAULT_POSTFIX;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ncli",
    about = "A small collection of CLI tools for front-end assets",
    long_about = "ncli bundles two utilities: react-svg turns SVG files into React function components, \
                  and tinify compresses PNG, WebP and JPEG images through the Tinify API.",
    version,
    after_help = "EXAMPLES:\n  \
    ncli react-svg \"./icons/*.svg\" --jsx\n  \
    ncli react-svg logo.svg -r\n  \
    ncli tinify \"./images/*\" -i -p small\n  \
    ncli tinify hero.png -r -w"
)]
pub struct Args {
    #[arg(short = 'q', long, global = true, help = "Only print errors")]
    pub quiet: bool,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Print every produced file and extra diagnostics"
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Convert SVG files to React components",
        long_about = "Optimize each SVG, rewrite its attributes for JSX and write a component module \
                      with a default exported function next to the source file."
    )]
    ReactSvg {
        #[arg(
            required = true,
            help = "Array of SVG files to convert. Can be a glob pattern.",
            long_help = "SVG files or glob patterns. Quote patterns to let ncli expand them, \
                         e.g. './icons/**/*.svg'."
        )]
        files: Vec<String>,

        #[arg(short = 'r', long, help = "Remove original files after conversion.")]
        remove: bool,

        #[arg(short = 'i', long, help = "Ignore non SVG files.")]
        ignore: bool,

        #[arg(
            short = 'j',
            long,
            help = "Output JSX files instead of TSX files.",
            long_help = "Write '<name>.jsx' instead of the default '<name>.tsx'."
        )]
        jsx: bool,
    },

    #[command(
        about = "Image optimization using tinify",
        long_about = "Compress PNG, WebP and JPEG images with the Tinify API. The API key is asked for \
                      on first use, validated and cached in the home directory."
    )]
    Tinify {
        #[arg(
            required = true,
            help = "Array of PNG/WEBP/JPEG files to convert. Can be a glob pattern."
        )]
        files: Vec<String>,

        #[arg(
            short = 'r',
            long,
            help = "Remove original files after conversion.",
            long_help = "Write the compressed image as '<name>.<ext>' and delete the source file."
        )]
        remove: bool,

        #[arg(
            short = 'p',
            long,
            default_value = DEFAULT_POSTFIX,
            help = "Postfix to use when --remove is not used.",
            long_help = "Compressed images are written as '<name>.<postfix>.<ext>' unless --remove is given."
        )]
        postfix: String,

        #[arg(short = 'i', long, help = "Ignore non PNG/WEBP/JPEG files.")]
        ignore: bool,

        #[arg(short = 'w', long, help = "Convert input files to WEBP.")]
        webp: bool,
    },
}
