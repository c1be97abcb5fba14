//! Ordered, round-trippable model of the rclone config file.
//!
//! [`ConfigDocument::parse`] never fails.  The file is shared with rclone and
//! may contain lines this panel does not understand, so anything that is not
//! a section header or a `key = value` line inside a section is skipped.
//!
//! Order matters in both directions: sections come out in the order they were
//! first seen and keys in the order they were first set.  Serializing a freshly
//! parsed document therefore reproduces the file, apart from whitespace around
//! `=` which is normalized to a single space on each side.

use std::fmt;

/// One `[name]` block with its ordered key/value entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    /// Creates an empty section.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets `key` to `value`.
    ///
    /// An existing key keeps its position; a new key is appended.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Removes `key`, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The whole config file as an ordered list of sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    sections: Vec<Section>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses config text.  Never fails.
    ///
    /// - A trimmed line of the form `[name]` selects section `name`, creating
    ///   it at the end of the document if it is new.  A repeated header
    ///   re-selects the existing section, so its keys coalesce.
    /// - Any other line containing `=` while a section is selected is split
    ///   on the first `=`; key and value are trimmed.  The last value wins.
    /// - Everything else (text before the first header, lines without `=`)
    ///   is ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use backup_core::ConfigDocument;
    ///
    /// let doc = ConfigDocument::parse("[remote1]\ntype = onedrive\ntoken = secret123\n");
    /// let section = doc.section("remote1").unwrap();
    /// assert_eq!(section.get("type"), Some("onedrive"));
    /// assert_eq!(section.get("token"), Some("secret123"));
    /// ```
    pub fn parse(text: &str) -> Self {
        let mut doc = Self::new();
        // Index of the currently selected section, if any.
        let mut current: Option<usize> = None;

        for raw in text.lines() {
            let line = raw.trim();

            if let Some(name) = header_name(line) {
                let index = match doc.position(name) {
                    Some(index) => index,
                    None => {
                        doc.sections.push(Section::new(name));
                        doc.sections.len() - 1
                    }
                };
                current = Some(index);
                continue;
            }

            let Some(index) = current else {
                continue;
            };
            if let Some((key, value)) = line.split_once('=') {
                doc.sections[index].set(key.trim(), value.trim());
            }
        }

        doc
    }

    /// Renders the document in the shape rclone reads.
    ///
    /// Each section is `[name]` followed by one `key = value` line per entry.
    /// Sections are separated by exactly one blank line and there is no blank
    /// line after the last one.  An empty document renders as `""`.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push('[');
            out.push_str(&section.name);
            out.push_str("]\n");
            for (key, value) in &section.entries {
                out.push_str(key);
                out.push_str(" = ");
                out.push_str(value);
                out.push('\n');
            }
        }
        out
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Appends `section` at the end of the document.
    ///
    /// Callers check for duplicates first; see [`crate::config::remote`].
    pub fn push_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Removes the named section.  Other sections keep their order.
    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        let index = self.position(name)?;
        Some(self.sections.remove(index))
    }

    /// Iterates sections in document order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Section names in document order.
    pub fn names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.name == name)
    }
}

impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

/// Returns the section name if `line` (already trimmed) is a `[name]` header.
fn header_name(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    if inner.is_empty() {
        None
    } else {
        Some(inner)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_REMOTES: &str = "[remote1]\ntype = onedrive\ntoken = secret123\n\n[nas]\ntype = sftp\nhost = 10.0.0.2\n";

    // ── parse ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_single_section_scenario() {
        // Arrange
        let text = "[remote1]\ntype = onedrive\ntoken = secret123\n";

        // Act
        let doc = ConfigDocument::parse(text);

        // Assert
        assert_eq!(doc.names(), vec!["remote1"]);
        let section = doc.section("remote1").unwrap();
        let pairs: Vec<_> = section.iter().collect();
        assert_eq!(pairs, vec![("type", "onedrive"), ("token", "secret123")]);
    }

    #[test]
    fn test_parse_empty_text_yields_empty_document() {
        assert!(ConfigDocument::parse("").is_empty());
    }

    #[test]
    fn test_parse_ignores_lines_before_first_header() {
        let doc = ConfigDocument::parse("orphan = 1\n# comment\n[a]\nk = v\n");
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.section("a").unwrap().len(), 1);
    }

    #[test]
    fn test_parse_ignores_lines_without_equals() {
        let doc = ConfigDocument::parse("[a]\nthis line has no separator\nk = v\n");
        let pairs: Vec<_> = doc.section("a").unwrap().iter().collect();
        assert_eq!(pairs, vec![("k", "v")]);
    }

    #[test]
    fn test_parse_splits_on_first_equals_only() {
        // Tokens and URLs routinely contain `=`.
        let doc = ConfigDocument::parse("[a]\nurl = https://host/?a=1&b=2\n");
        assert_eq!(
            doc.section("a").unwrap().get("url"),
            Some("https://host/?a=1&b=2")
        );
    }

    #[test]
    fn test_parse_trims_key_value_and_header_whitespace() {
        let doc = ConfigDocument::parse("   [a]   \n  key=value  \n");
        assert_eq!(doc.section("a").unwrap().get("key"), Some("value"));
    }

    #[test]
    fn test_parse_last_duplicate_key_wins_and_keeps_first_position() {
        let doc = ConfigDocument::parse("[a]\nx = 1\ny = 2\nx = 3\n");
        let pairs: Vec<_> = doc.section("a").unwrap().iter().collect();
        assert_eq!(pairs, vec![("x", "3"), ("y", "2")]);
    }

    #[test]
    fn test_parse_repeated_header_coalesces_keys() {
        // Arrange: `a` appears twice, separated by `b`
        let text = "[a]\nx = 1\n\n[b]\ny = 2\n\n[a]\nz = 3\n";

        // Act
        let doc = ConfigDocument::parse(text);

        // Assert: one `a`, still first, holding both keys
        assert_eq!(doc.names(), vec!["a", "b"]);
        let pairs: Vec<_> = doc.section("a").unwrap().iter().collect();
        assert_eq!(pairs, vec![("x", "1"), ("z", "3")]);
    }

    #[test]
    fn test_parse_rejects_empty_brackets_as_header() {
        let doc = ConfigDocument::parse("[]\nk = v\n");
        assert!(doc.is_empty());
    }

    #[test]
    fn test_parse_handles_crlf_line_endings() {
        let doc = ConfigDocument::parse("[a]\r\nk = v\r\n");
        assert_eq!(doc.section("a").unwrap().get("k"), Some("v"));
    }

    // ── serialize ─────────────────────────────────────────────────────────────

    #[test]
    fn test_serialize_reproduces_well_formed_text() {
        let doc = ConfigDocument::parse(TWO_REMOTES);
        assert_eq!(doc.serialize(), TWO_REMOTES);
    }

    #[test]
    fn test_serialize_normalizes_whitespace_around_equals() {
        let doc = ConfigDocument::parse("[a]\nk=v\nk2   =    v2\n");
        assert_eq!(doc.serialize(), "[a]\nk = v\nk2 = v2\n");
    }

    #[test]
    fn test_serialize_empty_document_is_empty_string() {
        assert_eq!(ConfigDocument::new().serialize(), "");
    }

    #[test]
    fn test_serialize_section_without_keys() {
        let mut doc = ConfigDocument::new();
        doc.push_section(Section::new("bare"));
        doc.push_section(Section::new("other"));
        assert_eq!(doc.serialize(), "[bare]\n\n[other]\n");
    }

    #[test]
    fn test_display_matches_serialize() {
        let doc = ConfigDocument::parse(TWO_REMOTES);
        assert_eq!(doc.to_string(), doc.serialize());
    }

    #[test]
    fn test_reparse_of_serialized_document_is_equal() {
        let messy = "junk\n[a]\n k=1 \nnoise\n[b]\n[a]\nz= 2\n";
        let doc = ConfigDocument::parse(messy);
        assert_eq!(ConfigDocument::parse(&doc.serialize()), doc);
    }

    // ── section editing ───────────────────────────────────────────────────────

    #[test]
    fn test_remove_section_keeps_order_of_others() {
        let mut doc = ConfigDocument::parse("[a]\n[b]\n[c]\n");
        let removed = doc.remove_section("b");
        assert!(removed.is_some());
        assert_eq!(doc.names(), vec!["a", "c"]);
    }

    #[test]
    fn test_remove_missing_section_returns_none() {
        let mut doc = ConfigDocument::parse("[a]\n");
        assert!(doc.remove_section("zzz").is_none());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_section_set_appends_new_key() {
        let mut section = Section::new("s");
        section.set("a", "1");
        section.set("b", "2");
        section.set("a", "3");
        let pairs: Vec<_> = section.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_section_remove_returns_old_value() {
        let mut section = Section::new("s");
        section.set("a", "1");
        assert_eq!(section.remove("a").as_deref(), Some("1"));
        assert!(section.is_empty());
        assert!(section.remove("a").is_none());
    }
}
