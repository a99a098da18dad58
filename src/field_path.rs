#![deny(missing_docs)]

//! # Field Paths
//!
//! Locates a value inside a document tree using dot/bracket notation,
//! e.g. `paths[2].get.parameters[0]` or `content["application/json"].example`.

use std::fmt;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A named field or map key.
    Key(String),
    /// A position in a list.
    Index(usize),
}

/// Location of a field relative to the entity (or document) being validated.
///
/// Paths are immutable: `field` and `index` return a new, longer path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    /// The empty path, pointing at the entity itself.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Appends a named field or map key.
    pub fn field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Key(name.into()));
        Self(segments)
    }

    /// Appends a list position.
    pub fn index(&self, idx: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Index(idx));
        Self(segments)
    }

    /// Prepends `prefix`, turning a path relative to a child into one relative to its parent.
    pub fn within(&self, prefix: &FieldPath) -> Self {
        let mut segments = prefix.0.clone();
        segments.extend(self.0.iter().cloned());
        Self(segments)
    }

    /// The individual segments, outermost first.
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// True for the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for FieldPath {
    fn from(name: &str) -> Self {
        FieldPath::root().field(name)
    }
}

impl From<String> for FieldPath {
    fn from(name: String) -> Self {
        FieldPath::root().field(name)
    }
}

fn is_plain_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '$')
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for (pos, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(key) if is_plain_key(key) => {
                    if pos > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", key)?;
                }
                Segment::Key(key) => write!(f, "[{:?}]", key)?,
                Segment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}
