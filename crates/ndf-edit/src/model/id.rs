//! Identifiers in the NDF `GUID:{...}` convention.
//!
//! NDF descriptors carry a `DescriptorId = GUID:{xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx}`
//! that must be unique across the loaded corpus. [`IdGenerator`] mints
//! random UUIDv4 identifiers and keeps a registry of everything seen or
//! minted so no identifier is handed out twice.

use std::fmt;

use rustc_hash::FxHashSet;
use uuid::Uuid;

/// Prefix of an identifier literal.
pub const GUID_PREFIX: &str = "GUID:";

/// Marker stored in templates in place of a real identifier.
pub const PLACEHOLDER_GUID: &str = "GUID:{00000000-0000-0000-0000-000000000000}";

/// Formats a UUID as an identifier literal (lowercase, hyphenated).
pub fn format_guid(uuid: &Uuid) -> String {
    format!("{GUID_PREFIX}{{{}}}", uuid.hyphenated())
}

/// Parses an identifier literal, with or without the `GUID:` prefix and braces.
pub fn parse_guid(s: &str) -> Option<Uuid> {
    Uuid::parse_str(strip_guid(s)).ok()
}

/// Returns true for text of the form `GUID:{...}`.
pub fn is_guid_literal(s: &str) -> bool {
    s.starts_with("GUID:{") && s.ends_with('}')
}

/// Registry key for an identifier: bare, upper-cased.
pub fn normalize_id(s: &str) -> String {
    strip_guid(s).to_ascii_uppercase()
}

fn strip_guid(s: &str) -> &str {
    let s = s.trim();
    let s = s.strip_prefix(GUID_PREFIX).unwrap_or(s);
    let s = s.strip_prefix('{').unwrap_or(s);
    s.strip_suffix('}').unwrap_or(s).trim()
}

type UuidSource = Box<dyn FnMut() -> Uuid + Send>;

/// Collision-free identifier generator.
///
/// The registry only grows, except through [`IdGenerator::clear`].
pub struct IdGenerator {
    registry: FxHashSet<String>,
    source: UuidSource,
}

impl IdGenerator {
    /// Creates a generator backed by random UUIDv4 values.
    pub fn new() -> Self {
        Self::with_source(Uuid::new_v4)
    }

    /// Creates a generator drawing candidates from `source`.
    pub fn with_source(source: impl FnMut() -> Uuid + Send + 'static) -> Self {
        Self {
            registry: FxHashSet::default(),
            source: Box::new(source),
        }
    }

    /// Mints an identifier absent (case-insensitively) from the registry,
    /// registers it and returns it.
    pub fn generate(&mut self) -> String {
        loop {
            let candidate = format_guid(&(self.source)());
            if self.registry.insert(normalize_id(&candidate)) {
                return candidate;
            }
            tracing::debug!(candidate = %candidate, "identifier collision, drawing again");
        }
    }

    /// Seeds the registry with an identifier found in the corpus.
    ///
    /// Returns false if it was already known.
    pub fn register_existing(&mut self, id: &str) -> bool {
        let key = normalize_id(id);
        if key.is_empty() {
            return false;
        }
        self.registry.insert(key)
    }

    /// Returns true if `id` was seen or minted.
    pub fn contains(&self, id: &str) -> bool {
        self.registry.contains(&normalize_id(id))
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Forgets every identifier (file switch).
    pub fn clear(&mut self) {
        self.registry.clear();
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator")
            .field("registered", &self.registry.len())
            .finish()
    }
}
