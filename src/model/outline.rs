//! Outline output types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Title reported when no title can be detected.
pub const UNTITLED: &str = "Untitled Document";

/// Heading hierarchy depth.
///
/// Ordering follows rank: `H1 < H2 < H3`, so a "smaller" level outranks a
/// larger one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Numeric rank (1 = H1).
    pub fn rank(&self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }

    /// Level for a numbering depth ("1" → H1, "1.2" → H2, "1.2.3" → H3).
    pub fn from_depth(depth: usize) -> Option<Self> {
        match depth {
            1 => Some(HeadingLevel::H1),
            2 => Some(HeadingLevel::H2),
            3 => Some(HeadingLevel::H3),
            _ => None,
        }
    }

    /// Whether this level sits strictly higher in the hierarchy than `other`.
    pub fn outranks(&self, other: HeadingLevel) -> bool {
        self.rank() < other.rank()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An accepted heading with its page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingCandidate {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
}

impl HeadingCandidate {
    /// Create a new heading candidate.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// The final artifact: a title plus an ordered, leveled outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineDocument {
    pub title: String,
    pub outline: Vec<HeadingCandidate>,
}

impl OutlineDocument {
    /// Create a new outline document.
    pub fn new(title: impl Into<String>, outline: Vec<HeadingCandidate>) -> Self {
        Self {
            title: title.into(),
            outline,
        }
    }

    /// Result for a document with no usable content.
    pub fn untitled() -> Self {
        Self::new(UNTITLED, Vec::new())
    }

    /// Number of headings per level, as `[H1, H2, H3]`.
    pub fn level_counts(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for heading in &self.outline {
            counts[(heading.level.rank() - 1) as usize] += 1;
        }
        counts
    }
}
