//! Name types and dotted-name helpers.

use smol_str::SmolStr;

/// A lightweight owned identifier.
///
/// Backed by [`smol_str::SmolStr`], which stores short strings inline and
/// avoids heap allocation for typical Java identifiers.
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct Name(SmolStr);

impl Name {
    #[inline]
    pub fn new(text: impl Into<SmolStr>) -> Self {
        Self(text.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Name").field(&self.0.as_str()).finish()
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// The segment after the final dot: `last_name("java.util.List") == "List"`.
///
/// A name without dots is returned unchanged.
pub fn last_name(qualified: &str) -> &str {
    match qualified.rfind('.') {
        Some(dot) => &qualified[dot + 1..],
        None => qualified,
    }
}

/// Everything before the final dot: `most_name("java.util.List") == "java.util"`.
///
/// Empty when there is no dot.
pub fn most_name(qualified: &str) -> &str {
    match qualified.rfind('.') {
        Some(dot) => &qualified[..dot],
        None => "",
    }
}

/// Case-sensitive character-prefix match used throughout completion.
pub fn matches_partial_name(candidate: &str, prefix: &str) -> bool {
    candidate.starts_with(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_qualified_names() {
        assert_eq!(last_name("java.util.List"), "List");
        assert_eq!(most_name("java.util.List"), "java.util");
        assert_eq!(last_name("List"), "List");
        assert_eq!(most_name("List"), "");
    }

    #[test]
    fn partial_name_is_a_prefix_match() {
        assert!(matches_partial_name("foobar", "foo"));
        assert!(matches_partial_name("foo", "foo"));
        assert!(matches_partial_name("foo", ""));
        assert!(!matches_partial_name("foo", "foobar"));
        assert!(!matches_partial_name("Foo", "foo"));
    }
}
