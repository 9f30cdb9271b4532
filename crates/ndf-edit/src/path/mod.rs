//! Addressing values inside an NDF tree.
//!
//! Two schemes address the same tree:
//!
//! - **Positional** paths name properties separated by dots, each optionally
//!   followed by bracketed array indices: `ModulesDescriptors[2].TagSet[0]`.
//!   `NAME.[i]` is accepted as an alias of `NAME[i]`.
//! - **Type-qualified** module paths start with a module type name and
//!   address the first module of that type, wherever it sits in the modules
//!   array: `TTagsModuleDescriptor.TagSet[0]`.
//!
//! Resolution never panics; anything that does not line up is "not found".

pub mod mutate;
pub mod resolve;

use std::fmt;

pub use mutate::NumericOp;
pub use resolve::{resolve, resolve_mut, PathEngine};

/// One step of a positional path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// Object property access.
    Property(String),
    /// Array index access.
    Index(usize),
}

impl Step {
    pub fn as_property(&self) -> Option<&str> {
        match self {
            Step::Property(name) => Some(name),
            Step::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Step::Property(_) => None,
            Step::Index(i) => Some(*i),
        }
    }
}

/// A parsed positional path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PropertyPath(Vec<Step>);

impl PropertyPath {
    /// Creates an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `A.B[1].C`; returns `None` for malformed text (empty
    /// segments, unbalanced brackets, non-numeric or negative indices).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        let mut steps = Vec::new();
        for segment in s.split('.') {
            let (name, mut rest) = match segment.find('[') {
                Some(i) => (&segment[..i], &segment[i..]),
                None => (segment, ""),
            };
            if name.contains(']') || (name.is_empty() && rest.is_empty()) {
                return None;
            }
            if !name.is_empty() {
                steps.push(Step::Property(name.to_string()));
            }
            while !rest.is_empty() {
                let inner = rest.strip_prefix('[')?;
                let close = inner.find(']')?;
                let digits = &inner[..close];
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                steps.push(Step::Index(digits.parse().ok()?));
                rest = &inner[close + 1..];
            }
        }
        Some(Self(steps))
    }

    /// Builds a path from steps.
    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self(steps)
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends a property step (builder style).
    pub fn property(mut self, name: impl Into<String>) -> Self {
        self.0.push(Step::Property(name.into()));
        self
    }

    /// Appends an index step (builder style).
    pub fn index(mut self, index: usize) -> Self {
        self.0.push(Step::Index(index));
        self
    }

    /// Name of the first step, if it is a property.
    pub fn first_property(&self) -> Option<&str> {
        self.0.first().and_then(Step::as_property)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            match step {
                Step::Property(name) if i == 0 => f.write_str(name)?,
                Step::Property(name) => write!(f, ".{name}")?,
                Step::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Rewrites `NAME.[i]` to `NAME[i]` so equivalent paths compare equal.
pub fn normalize_path(path: &str) -> String {
    path.trim().replace(".[", "[")
}

/// Replaces every concrete `[i]` with `[*]`.
pub fn wildcard_indices(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..=open]);
        let after = &rest[open + 1..];
        match after.find(']') {
            Some(close)
                if close > 0 && after[..close].bytes().all(|b| b.is_ascii_digit()) =>
            {
                out.push('*');
                rest = &after[close..];
            }
            _ => rest = after,
        }
    }
    out.push_str(rest);
    out
}

/// Returns true if `path` equals `ancestor` or lies below it, comparing
/// normalized forms on step boundaries. An empty ancestor covers everything.
pub fn is_same_or_descendant(path: &str, ancestor: &str) -> bool {
    let path = normalize_path(path);
    let ancestor = normalize_path(ancestor);
    if ancestor.is_empty() {
        return true;
    }
    match path.strip_prefix(ancestor.as_str()) {
        Some("") => true,
        Some(rest) => rest.starts_with('.') || rest.starts_with('['),
        None => false,
    }
}
