//! Immutable modification records.

use std::fmt;

use crate::model::Value;

/// What a modification did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModificationKind {
    /// A value was replaced through a path.
    ValueChanged,
    /// A number was set, offset or scaled.
    NumericAdjusted,
    /// A top-level object was created.
    ObjectAdded,
    /// A module was appended to the modules array.
    ModuleAdded,
    /// A module was removed from the modules array.
    ModuleRemoved,
    /// A property was added to an object.
    PropertyAdded,
    /// An element was appended to an array.
    ElementAdded,
    /// An element was removed from an array.
    ElementRemoved,
}

impl ModificationKind {
    /// Returns a stable kebab-case tag.
    pub fn tag(&self) -> &'static str {
        match self {
            ModificationKind::ValueChanged => "value-changed",
            ModificationKind::NumericAdjusted => "numeric-adjusted",
            ModificationKind::ObjectAdded => "object-added",
            ModificationKind::ModuleAdded => "module-added",
            ModificationKind::ModuleRemoved => "module-removed",
            ModificationKind::PropertyAdded => "property-added",
            ModificationKind::ElementAdded => "element-added",
            ModificationKind::ElementRemoved => "element-removed",
        }
    }

    /// Returns true for kinds that change the shape of the tree.
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            ModificationKind::ValueChanged | ModificationKind::NumericAdjusted
        )
    }
}

impl fmt::Display for ModificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One logged change, keyed by (object name, path).
///
/// The sequence number is unique per tracker and identifies the record for
/// removal.
#[derive(Debug, Clone, PartialEq)]
pub struct ModificationRecord {
    pub(crate) object: String,
    pub(crate) path: String,
    pub(crate) old_value: Option<Value>,
    pub(crate) new_value: Value,
    pub(crate) kind: ModificationKind,
    pub(crate) description: String,
    pub(crate) sequence: u64,
}

impl ModificationRecord {
    /// Name of the top-level object that was changed.
    pub fn object(&self) -> &str {
        &self.object
    }

    /// Path within the object; empty for whole-object records.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Value before the change; `None` for additions.
    pub fn old_value(&self) -> Option<&Value> {
        self.old_value.as_ref()
    }

    pub fn new_value(&self) -> &Value {
        &self.new_value
    }

    pub fn kind(&self) -> ModificationKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl fmt::Display for ModificationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} [{}] {}: {}",
            self.sequence, self.kind, self.object, self.description
        )
    }
}
