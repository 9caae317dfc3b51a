// src/minifier.rs
//
// Streaming minifier. One pass, one byte at a time (with memchr fast paths),
// no tree and no backtracking.
//
// - Text: whitespace runs collapse to at most one space. The space is only
//   realized before content, or before an inline opening tag; any other tag
//   boundary swallows it.
// - Tags: the head is re-emitted as `<`, optional `/`, name, attributes,
//   optional canonical `/`, `>`.
//     • Outside quotes: whitespace between attributes collapses to one space,
//       whitespace around '=' and before '>' or '/>' disappears.
//     • Inside quotes: everything is copied as written.
//     • With attribute whitespace preserved, whitespace next to '=' is
//       copied as written too; runs between attributes still collapse.
// - Comments: dropped, unless comments are preserved or we are inside a
//   preserved element.
// - Preserved elements (pre, script, style, textarea by default): content and
//   nested tags are copied verbatim until the closing tag that ends the region.
//
// Input must be well-formed markup. Malformed input is not rejected; the
// output for it is unspecified.

use crate::options::MinifyOptions;
use log::{debug, trace, warn};
use memchr::{memchr, memchr2};
use std::io::{self, Write};

const COMMENT_OPEN: &[u8] = b"!--";

/* ================================ State ================================= */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Text,
    Tag,
    Comment,
}

/// Classification of the tag head currently being scanned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum TagCategory {
    #[default]
    Unknown,
    Opening,
    Closing,
    SelfClosing,
}

/// What the next whitespace run turns into.
///
/// `Pending`: one space is owed before the next token.
/// `Suppressed`: the next whitespace run is dropped entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Whitespace {
    None,
    Pending,
    Suppressed,
}

/// Per-tag scratch, cleared on every `<`.
#[derive(Debug, Default)]
struct TagScan {
    name: Vec<u8>,
    name_done: bool,
    category: TagCategory,
    quote: Option<u8>,
    // unquoted '/' run waiting to see whether '>' follows
    slashes: usize,
    space_before_slash: bool,
    space_after_slash: bool,
    // '=' seen, value not started yet / last emitted byte was an unquoted value
    after_equals: bool,
    unquoted_value: bool,
    // whitespace run held back when attribute whitespace is preserved; kept
    // only if '=' follows
    held: Vec<u8>,
    // set when the tag started inside a preserved region; the raw bytes are
    // kept so the tag can be copied verbatim
    capture: bool,
    raw: Vec<u8>,
}

impl TagScan {
    fn reset(&mut self, capture: bool) {
        self.name.clear();
        self.name_done = false;
        self.category = TagCategory::Unknown;
        self.quote = None;
        self.slashes = 0;
        self.space_before_slash = false;
        self.space_after_slash = false;
        self.after_equals = false;
        self.unquoted_value = false;
        self.held.clear();
        self.capture = capture;
        self.raw.clear();
        if capture {
            self.raw.push(b'<');
        }
    }

    /// Category at '>': a trailing slash run makes an undecided tag
    /// self-closing, anything else still undecided is an opening tag.
    fn resolve(&mut self) -> TagCategory {
        if self.category == TagCategory::Unknown {
            self.category = if self.slashes > 0 {
                TagCategory::SelfClosing
            } else {
                TagCategory::Opening
            };
        }
        self.category
    }
}

/* ============================ Utility predicates ========================= */

/// HTML's ASCII whitespace: space, tab, LF, FF, CR.
#[inline]
fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

/* =============================== Minifier =============================== */

/// A single-pass HTML minifier writing into `W`.
///
/// Feed input through [`io::Write`], [`Minifier::write_str`] or
/// [`Minifier::write_char`]; chunks may be split anywhere, including in the
/// middle of a UTF-8 sequence. The minifier owns `W` and drops it with
/// itself. Pass `&mut W`, or take it back with [`Minifier::finish`] or
/// [`Minifier::into_inner`], to keep the sink open.
///
/// Every byte goes straight to the sink, so wrap unbuffered sinks in a
/// [`io::BufWriter`]. Sink errors are returned as-is; after one, the scan
/// state is only good for [`Minifier::reset`].
pub struct Minifier<W: Write> {
    out: W,
    options: MinifyOptions,
    mode: Mode,
    ws: Whitespace,
    depth: usize,
    dashes: usize,
    emit_comment: bool,
    tag: TagScan,
}

impl<W: Write> Minifier<W> {
    pub fn new(out: W) -> Self {
        Self::with_options(out, MinifyOptions::default())
    }

    pub fn with_options(out: W, options: MinifyOptions) -> Self {
        Self {
            out,
            options,
            mode: Mode::Text,
            ws: Whitespace::Suppressed,
            depth: 0,
            dashes: 0,
            emit_comment: false,
            tag: TagScan::default(),
        }
    }

    pub fn options(&self) -> &MinifyOptions {
        &self.options
    }

    /// Replaces the configuration. Meant to be called between documents;
    /// switching mid-document applies the new sets from the next tag on.
    pub fn set_options(&mut self, options: MinifyOptions) {
        self.options = options;
    }

    /// Number of currently open preserved elements.
    pub fn preserved_depth(&self) -> usize {
        self.depth
    }

    /// Clears all scan state so the next byte starts a fresh document.
    pub fn reset(&mut self) {
        self.mode = Mode::Text;
        self.ws = Whitespace::Suppressed;
        self.depth = 0;
        self.dashes = 0;
        self.emit_comment = false;
        self.tag.reset(false);
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Returns the sink without flushing it.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Ends the document and returns the flushed sink.
    ///
    /// A tag left unterminated inside a preserved region is written out
    /// verbatim; trailing whitespace still pending is dropped.
    pub fn finish(mut self) -> io::Result<W> {
        if self.mode == Mode::Tag && self.tag.capture {
            self.out.write_all(&self.tag.raw)?;
        }
        self.out.flush()?;
        Ok(self.out)
    }

    pub fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.feed(s.as_bytes())
    }

    pub fn write_char(&mut self, c: char) -> io::Result<()> {
        let mut buf = [0u8; 4];
        self.feed(c.encode_utf8(&mut buf).as_bytes())
    }

    /// Runs `input` through the state machine.
    pub fn feed(&mut self, input: &[u8]) -> io::Result<()> {
        let mut i = 0usize;
        while i < input.len() {
            i = match self.mode {
                Mode::Text => self.text(input, i)?,
                Mode::Tag => {
                    self.tag_byte(input[i])?;
                    i + 1
                }
                Mode::Comment => self.comment(input, i)?,
            };
        }
        Ok(())
    }

    /* ============================== Text ================================ */

    fn text(&mut self, input: &[u8], i: usize) -> io::Result<usize> {
        let rest = &input[i..];

        if self.depth > 0 {
            let Some(lt) = memchr(b'<', rest) else {
                self.out.write_all(rest)?;
                return Ok(input.len());
            };
            self.out.write_all(&rest[..lt])?;
            self.begin_tag();
            return Ok(i + lt + 1);
        }

        let b = rest[0];
        if b == b'<' {
            self.begin_tag();
            return Ok(i + 1);
        }
        if is_ws(b) {
            self.defer_space();
            return Ok(i + 1);
        }

        let end = rest
            .iter()
            .position(|&c| c == b'<' || is_ws(c))
            .unwrap_or(rest.len());
        self.flush_space()?;
        self.out.write_all(&rest[..end])?;
        self.ws = Whitespace::None;
        Ok(i + end)
    }

    #[inline]
    fn defer_space(&mut self) {
        if self.ws != Whitespace::Suppressed {
            self.ws = Whitespace::Pending;
        }
    }

    #[inline]
    fn flush_space(&mut self) -> io::Result<()> {
        if self.ws == Whitespace::Pending {
            self.out.write_all(b" ")?;
            self.ws = Whitespace::None;
        }
        Ok(())
    }

    /* ============================== Tags ================================ */

    fn begin_tag(&mut self) {
        self.mode = Mode::Tag;
        self.tag.reset(self.depth > 0);
    }

    fn tag_byte(&mut self, b: u8) -> io::Result<()> {
        if self.tag.capture {
            self.raw_tag_byte(b)
        } else if !self.tag.name_done {
            self.name_byte(b)
        } else {
            self.attr_byte(b)
        }
    }

    fn name_byte(&mut self, b: u8) -> io::Result<()> {
        match b {
            b'>' => {
                self.open_head()?;
                self.finish_tag()
            }
            b'/' if self.tag.name.is_empty() => {
                self.tag.category = TagCategory::Closing;
                Ok(())
            }
            b'/' => {
                self.open_head()?;
                self.attr_byte(b)
            }
            _ if is_ws(b) => {
                if self.tag.name.is_empty() {
                    return Ok(());
                }
                self.open_head()?;
                self.attr_space(b)
            }
            _ => {
                self.tag.name.push(b);
                if self.tag.name == COMMENT_OPEN {
                    self.begin_comment()?;
                }
                Ok(())
            }
        }
    }

    /// Freezes the tag name and writes `<`, `/` for closing tags, and the name.
    /// A space pending from the text before is only kept in front of an
    /// inline opening tag.
    fn open_head(&mut self) -> io::Result<()> {
        self.tag.name_done = true;
        let closing = self.tag.category == TagCategory::Closing;
        if self.ws == Whitespace::Pending && !closing && self.options.is_inline(&self.tag.name) {
            self.out.write_all(b" ")?;
        }
        self.ws = Whitespace::None;
        let open: &[u8] = if closing { b"</" } else { b"<" };
        self.out.write_all(open)?;
        self.out.write_all(&self.tag.name)
    }

    fn attr_space(&mut self, b: u8) -> io::Result<()> {
        if self.tag.quote.is_some() {
            return self.out.write_all(&[b]);
        }
        if self.tag.slashes > 0 {
            self.tag.space_after_slash = true;
            return Ok(());
        }
        if self.options.preserve_attribute_whitespace() {
            if self.tag.after_equals {
                return self.out.write_all(&[b]);
            }
            self.tag.held.push(b);
        }
        self.defer_space();
        Ok(())
    }

    fn attr_byte(&mut self, b: u8) -> io::Result<()> {
        if let Some(q) = self.tag.quote {
            if b == q {
                self.tag.quote = None;
                self.ws = Whitespace::None;
            }
            return self.out.write_all(&[b]);
        }

        match b {
            b'>' => self.finish_tag(),
            b'/' => {
                if self.tag.slashes == 0 {
                    self.tag.space_before_slash = self.ws == Whitespace::Pending;
                }
                self.tag.held.clear();
                self.tag.slashes += 1;
                self.ws = Whitespace::Suppressed;
                Ok(())
            }
            _ if is_ws(b) => self.attr_space(b),
            b'"' | b'\'' | b'=' => {
                self.flush_slashes()?;
                if b == b'=' {
                    self.out.write_all(&self.tag.held)?;
                }
                self.tag.held.clear();
                self.ws = Whitespace::Suppressed;
                self.tag.after_equals = b == b'=';
                self.tag.unquoted_value = false;
                if b != b'=' {
                    self.tag.quote = Some(b);
                }
                self.out.write_all(&[b])
            }
            _ => {
                self.flush_slashes()?;
                self.tag.held.clear();
                self.tag.unquoted_value = self.tag.after_equals
                    || (self.tag.unquoted_value && self.ws != Whitespace::Pending);
                self.tag.after_equals = false;
                self.flush_space()?;
                self.ws = Whitespace::None;
                self.out.write_all(&[b])
            }
        }
    }

    /// The slash run turned out to be content (`href=/a/b`), not the
    /// self-closing marker.
    fn flush_slashes(&mut self) -> io::Result<()> {
        if self.tag.slashes == 0 {
            return Ok(());
        }
        if self.tag.space_before_slash {
            self.out.write_all(b" ")?;
        }
        for _ in 0..self.tag.slashes {
            self.out.write_all(b"/")?;
        }
        self.ws = if self.tag.space_after_slash {
            Whitespace::Pending
        } else {
            Whitespace::None
        };
        self.tag.slashes = 0;
        self.tag.space_before_slash = false;
        self.tag.space_after_slash = false;
        Ok(())
    }

    fn finish_tag(&mut self) -> io::Result<()> {
        let category = self.tag.resolve();
        // `src=a/>` would read as the value "a/"
        let close: &[u8] = match category {
            TagCategory::SelfClosing if self.tag.unquoted_value => b" />",
            TagCategory::SelfClosing => b"/>",
            _ => b">",
        };
        self.out.write_all(close)?;

        trace!(
            "tag {:?} {:?}",
            String::from_utf8_lossy(&self.tag.name),
            category
        );

        if self.options.is_preserved(&self.tag.name) {
            match category {
                TagCategory::Opening => self.enter_preserved(),
                TagCategory::Closing => self.leave_preserved(),
                _ => {}
            }
        }

        // Block tags swallow the whitespace after them; so does any opening
        // tag. Whitespace after an inline closing tag may still be a space.
        self.ws = if category == TagCategory::Opening || !self.options.is_inline(&self.tag.name) {
            Whitespace::Suppressed
        } else {
            Whitespace::None
        };
        self.mode = Mode::Text;
        Ok(())
    }

    fn enter_preserved(&mut self) {
        self.depth += 1;
        debug!(
            "enter preserved <{}>, depth {}",
            String::from_utf8_lossy(&self.tag.name),
            self.depth
        );
    }

    fn leave_preserved(&mut self) {
        if self.depth == 0 {
            warn!(
                "closing </{}> without an open preserved element",
                String::from_utf8_lossy(&self.tag.name)
            );
            return;
        }
        self.depth -= 1;
        debug!(
            "leave preserved </{}>, depth {}",
            String::from_utf8_lossy(&self.tag.name),
            self.depth
        );
    }

    /* ======================== Tags in preserved regions ================== */

    fn raw_tag_byte(&mut self, b: u8) -> io::Result<()> {
        // A bare '<' in raw text (`a<b` in a script) must not hide the real
        // closing tag, so it restarts the capture.
        if b == b'<' {
            self.out.write_all(&self.tag.raw)?;
            self.tag.reset(true);
            return Ok(());
        }
        self.tag.raw.push(b);

        if !self.tag.name_done {
            match b {
                b'>' => return self.finish_raw_tag(),
                b'/' if self.tag.name.is_empty() => self.tag.category = TagCategory::Closing,
                b'/' => {
                    self.tag.name_done = true;
                    self.tag.slashes = 1;
                }
                _ if is_ws(b) => self.tag.name_done = !self.tag.name.is_empty(),
                _ => {
                    self.tag.name.push(b);
                    if self.tag.name == COMMENT_OPEN {
                        return self.begin_comment();
                    }
                }
            }
            return Ok(());
        }

        if let Some(q) = self.tag.quote {
            if b == q {
                self.tag.quote = None;
            }
            return Ok(());
        }
        match b {
            b'>' => return self.finish_raw_tag(),
            b'"' | b'\'' => self.tag.quote = Some(b),
            b'/' => self.tag.slashes += 1,
            _ if is_ws(b) => {}
            _ => self.tag.slashes = 0,
        }
        Ok(())
    }

    fn finish_raw_tag(&mut self) -> io::Result<()> {
        let category = self.tag.resolve();
        let preserved = self.options.is_preserved(&self.tag.name);

        if preserved && category == TagCategory::Closing && self.depth == 1 {
            // end of the region: this tag is outside it and gets normalized
            self.out.write_all(b"</")?;
            self.out.write_all(&self.tag.name)?;
            self.out.write_all(b">")?;
            self.leave_preserved();
            self.ws = if self.options.is_inline(&self.tag.name) {
                Whitespace::None
            } else {
                Whitespace::Suppressed
            };
        } else {
            self.out.write_all(&self.tag.raw)?;
            if preserved {
                match category {
                    TagCategory::Opening => self.enter_preserved(),
                    TagCategory::Closing => self.leave_preserved(),
                    _ => {}
                }
            }
        }

        self.mode = Mode::Text;
        Ok(())
    }

    /* ============================= Comments ============================= */

    fn begin_comment(&mut self) -> io::Result<()> {
        self.mode = Mode::Comment;
        self.dashes = 0;
        self.emit_comment = self.depth > 0 || self.options.preserve_comments();
        if !self.emit_comment {
            return Ok(());
        }
        if self.tag.capture {
            // raw already holds "<!--"
            self.out.write_all(&self.tag.raw)
        } else {
            self.flush_space()?;
            self.out.write_all(b"<!--")
        }
    }

    fn comment(&mut self, input: &[u8], i: usize) -> io::Result<usize> {
        let rest = &input[i..];
        let Some(pos) = memchr2(b'-', b'>', rest) else {
            if self.emit_comment {
                self.out.write_all(rest)?;
            }
            self.dashes = 0;
            return Ok(input.len());
        };

        if self.emit_comment {
            self.out.write_all(&rest[..=pos])?;
        }
        if pos > 0 {
            self.dashes = 0;
        }
        if rest[pos] == b'-' {
            self.dashes += 1;
        } else if self.dashes >= 2 {
            trace!("comment end");
            self.mode = Mode::Text;
        } else {
            self.dashes = 0;
        }
        Ok(i + pos + 1)
    }
}

impl<W: Write> Write for Minifier<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.feed(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
