//! Versioned in-memory documents.

use std::time::SystemTime;

use javelin_core::{LineIndex, Range};

/// One editor-protocol content change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChange {
    /// The range to replace. `None` replaces the entire document.
    pub range: Option<Range>,
    /// How many UTF-16 code units the range covers, when the client sends
    /// it; used verbatim, not recomputed.
    pub range_length: Option<u32>,
    /// Replacement text.
    pub text: String,
}

impl ContentChange {
    pub fn full(text: impl Into<String>) -> Self {
        Self {
            range: None,
            range_length: None,
            text: text.into(),
        }
    }

    pub fn replace(range: Range, text: impl Into<String>) -> Self {
        Self {
            range: Some(range),
            range_length: None,
            text: text.into(),
        }
    }
}

/// An open editor buffer with version and in-memory modification time.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    version: i32,
    modified: SystemTime,
}

impl Document {
    pub fn new(text: impl Into<String>, version: i32) -> Self {
        Self {
            text: text.into(),
            version,
            modified: SystemTime::now(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// Applies an ordered list of changes and bumps the version.
    ///
    /// The caller has already checked that `new_version` is newer than the
    /// stored one.
    pub fn apply_changes(&mut self, new_version: i32, changes: &[ContentChange]) {
        for change in changes {
            self.apply_change(change);
        }
        self.version = new_version;
        self.modified = SystemTime::now();
    }

    fn apply_change(&mut self, change: &ContentChange) {
        let Some(range) = change.range else {
            self.text = change.text.clone();
            return;
        };
        let index = LineIndex::new(&self.text);
        let start = index.offset_of_position(&self.text, range.start);
        let end = index.offset_of_position(&self.text, range.end).max(start);
        self.text.replace_range(start..end, &change.text);
    }
}
