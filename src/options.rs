// src/options.rs
//
// Minifier configuration: the two element-name sets plus the comment and
// attribute-whitespace switches. Built once, then read-only.

/* =============================== Core sets =============================== */

/// Raw-text and pre-formatted elements whose content is copied verbatim.
pub const DEFAULT_PRESERVED_ELEMENTS: &[&str] = &["pre", "script", "style", "textarea"];

/// Elements that flow with surrounding text, so whitespace next to them
/// can still render as a space.
pub const DEFAULT_INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "acronym", "b", "bdi", "bdo", "big", "br", "button", "cite", "code", "del",
    "dfn", "em", "i", "img", "input", "ins", "kbd", "label", "mark", "q", "s", "samp", "select",
    "small", "span", "strike", "strong", "sub", "sup", "time", "tt", "u", "var",
];

/// A case-insensitive set of element names.
///
/// Names are stored ASCII-lowercased. Lookups compare with
/// `eq_ignore_ascii_case`, so a tag name can be tested straight from the
/// scan buffer without allocating.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementSet {
    names: Vec<Box<[u8]>>,
}

impl ElementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `name`, returning `false` if it was already present.
    pub fn insert(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(name.as_bytes()) {
            return false;
        }
        self.names
            .push(name.as_bytes().to_ascii_lowercase().into_boxed_slice());
        true
    }

    /// Case-insensitive membership test against raw tag-name bytes.
    #[inline]
    pub fn contains(&self, name: &[u8]) -> bool {
        self.names.iter().any(|n| name.eq_ignore_ascii_case(n))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Lowercased names, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        // Inserted from &str and only ASCII bytes were changed.
        self.names
            .iter()
            .filter_map(|n| std::str::from_utf8(n).ok())
    }
}

impl<S: AsRef<str>> FromIterator<S> for ElementSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<S: AsRef<str>> Extend<S> for ElementSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for name in iter {
            self.insert(name.as_ref());
        }
    }
}

/* ============================== Options ================================= */

/// Immutable minifier configuration. Use [`MinifyOptions::builder`] to
/// change anything from the defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinifyOptions {
    preserve_comments: bool,
    preserve_attribute_whitespace: bool,
    preserved: ElementSet,
    inline: ElementSet,
}

impl Default for MinifyOptions {
    fn default() -> Self {
        Self {
            preserve_comments: false,
            preserve_attribute_whitespace: false,
            preserved: DEFAULT_PRESERVED_ELEMENTS.iter().collect(),
            inline: DEFAULT_INLINE_ELEMENTS.iter().collect(),
        }
    }
}

impl MinifyOptions {
    pub fn builder() -> MinifyOptionsBuilder {
        MinifyOptionsBuilder::default()
    }

    /// Emit comments (with delimiters) instead of dropping them.
    pub fn preserve_comments(&self) -> bool {
        self.preserve_comments
    }

    /// Keep whitespace around `=` in tag heads as written.
    pub fn preserve_attribute_whitespace(&self) -> bool {
        self.preserve_attribute_whitespace
    }

    pub fn preserved_elements(&self) -> &ElementSet {
        &self.preserved
    }

    pub fn inline_elements(&self) -> &ElementSet {
        &self.inline
    }

    #[inline]
    pub fn is_preserved(&self, name: &[u8]) -> bool {
        self.preserved.contains(name)
    }

    #[inline]
    pub fn is_inline(&self, name: &[u8]) -> bool {
        self.inline.contains(name)
    }
}

/// Builder for [`MinifyOptions`]; starts from the defaults.
#[derive(Clone, Debug, Default)]
pub struct MinifyOptionsBuilder {
    options: MinifyOptions,
}

impl MinifyOptionsBuilder {
    pub fn preserve_comments(mut self, yes: bool) -> Self {
        self.options.preserve_comments = yes;
        self
    }

    pub fn preserve_attribute_whitespace(mut self, yes: bool) -> Self {
        self.options.preserve_attribute_whitespace = yes;
        self
    }

    /// Replaces the preserved-element set.
    pub fn preserved_elements<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.options.preserved = names.into_iter().collect();
        self
    }

    /// Replaces the inline-element set.
    pub fn inline_elements<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.options.inline = names.into_iter().collect();
        self
    }

    pub fn add_preserved_element(mut self, name: &str) -> Self {
        self.options.preserved.insert(name);
        self
    }

    pub fn add_inline_element(mut self, name: &str) -> Self {
        self.options.inline.insert(name);
        self
    }

    pub fn build(self) -> MinifyOptions {
        self.options
    }
}
