// src/lib.rs
//
// squeezehtml — single-pass streaming HTML minifier
//
// - Whitespace runs collapse to one space, or to nothing next to block tags.
// - Tag heads are normalized: one space between attributes, none around '=',
//   exactly one '/' on self-closing tags. Quoted values are left alone.
// - Comments are stripped (configurable).
// - Preserved elements (pre, script, style, textarea) pass through verbatim.
//
// The minifier never builds a tree: it decides every byte as it arrives, so it
// works on arbitrarily split input and writes straight into any io::Write.

//! Single-pass streaming HTML minifier.
//!
//! ```
//! assert_eq!(
//!     squeezehtml::minify("<p>  Hello   <b> world </b>  </p>"),
//!     "<p>Hello <b>world</b></p>"
//! );
//! ```
//!
//! For streaming use, wrap a sink in a [`Minifier`] and write into it.
//! Input must be well-formed markup; output for malformed input is
//! unspecified.

mod minifier;
mod options;

pub use minifier::Minifier;
pub use options::{
    ElementSet, MinifyOptions, MinifyOptionsBuilder, DEFAULT_INLINE_ELEMENTS,
    DEFAULT_PRESERVED_ELEMENTS,
};

/// Minifies `input` with the default options.
pub fn minify(input: &str) -> String {
    minify_with(input, &MinifyOptions::default())
}

/// Minifies `input` with `options`.
pub fn minify_with(input: &str, options: &MinifyOptions) -> String {
    // Only ASCII bytes are ever dropped, so valid input stays valid.
    match String::from_utf8(minify_bytes(input.as_bytes(), options)) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// Minifies raw bytes. Non-ASCII bytes are copied through untouched.
pub fn minify_bytes(input: &[u8], options: &MinifyOptions) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut m = Minifier::with_options(&mut out, options.clone());
    // writes into a Vec never fail, and neither does its flush
    let _ = m.feed(input).and_then(|()| m.finish().map(drop));
    out
}
