// src/main.rs
//
// squeezehtml — command line front end for the streaming minifier
//
// Reads INPUT (or stdin), writes the minified document to OUTPUT (or stdout).
//
// CLI flags:
//   --in-place                        : overwrite INPUT
//   --preserve-comments               : keep <!-- comments -->
//   --preserve-attribute-whitespace   : keep whitespace inside tag heads as written
//   --preserve NAME / --inline NAME   : extend the preserved / inline element sets
//   --no-default-preserved / --no-default-inline : start those sets empty
//
// Logging goes to stderr; RUST_LOG=debug shows preserved-region tracking.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use log::info;
use squeezehtml::{
    ElementSet, Minifier, MinifyOptions, DEFAULT_INLINE_ELEMENTS, DEFAULT_PRESERVED_ELEMENTS,
};
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// CLI flags
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Keep comments instead of stripping them
    #[arg(long, action = ArgAction::SetTrue)]
    preserve_comments: bool,

    /// Keep whitespace around '=' in tag heads exactly as written
    #[arg(long, action = ArgAction::SetTrue)]
    preserve_attribute_whitespace: bool,

    /// Additional element whose content is copied verbatim (repeatable)
    #[arg(long = "preserve", value_name = "NAME")]
    preserve: Vec<String>,

    /// Additional inline element (repeatable)
    #[arg(long = "inline", value_name = "NAME")]
    inline: Vec<String>,

    /// Do not start from the built-in preserved elements
    #[arg(long = "no-default-preserved", action = ArgAction::SetTrue)]
    no_default_preserved: bool,

    /// Do not start from the built-in inline elements
    #[arg(long = "no-default-inline", action = ArgAction::SetTrue)]
    no_default_inline: bool,

    /// Overwrite the input file
    #[arg(long = "in-place", action = ArgAction::SetTrue)]
    in_place: bool,

    /// Input file (default: stdin)
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    output: Option<PathBuf>,
}

impl Cli {
    fn options(&self) -> MinifyOptions {
        let mut preserved: ElementSet = if self.no_default_preserved {
            ElementSet::new()
        } else {
            DEFAULT_PRESERVED_ELEMENTS.iter().collect()
        };
        preserved.extend(&self.preserve);

        let mut inline: ElementSet = if self.no_default_inline {
            ElementSet::new()
        } else {
            DEFAULT_INLINE_ELEMENTS.iter().collect()
        };
        inline.extend(&self.inline);

        MinifyOptions::builder()
            .preserve_comments(self.preserve_comments)
            .preserve_attribute_whitespace(self.preserve_attribute_whitespace)
            .preserved_elements(preserved.iter())
            .inline_elements(inline.iter())
            .build()
    }
}

/// `-` and absent both mean the standard stream.
fn file_arg(path: Option<&PathBuf>) -> Option<&Path> {
    path.map(PathBuf::as_path).filter(|p| p.as_os_str() != "-")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let options = cli.options();
    let input = file_arg(cli.input.as_ref());

    if cli.in_place {
        let Some(path) = input else {
            bail!("--in-place needs an INPUT file");
        };
        if cli.output.is_some() {
            bail!("--in-place cannot be combined with OUTPUT");
        }
        // Read fully first: the output overwrites the input.
        let src = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let out = squeezehtml::minify_bytes(&src, &options);
        info!("{}: {} -> {} bytes", path.display(), src.len(), out.len());
        fs::write(path, out).with_context(|| format!("writing {}", path.display()))?;
        return Ok(());
    }

    let mut reader: Box<dyn Read> = match input {
        Some(path) => Box::new(
            fs::File::open(path).with_context(|| format!("opening {}", path.display()))?,
        ),
        None => Box::new(io::stdin().lock()),
    };
    let writer: Box<dyn Write> = match file_arg(cli.output.as_ref()) {
        Some(path) => Box::new(
            fs::File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    let mut minifier = Minifier::with_options(BufWriter::new(writer), options);
    let read = io::copy(&mut reader, &mut minifier).context("minifying input")?;
    minifier.finish().context("flushing output")?;
    info!("minified {read} input bytes");
    Ok(())
}
