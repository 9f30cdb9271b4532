//! NDF structural editing core.
//!
//! This crate edits parsed NDF descriptor trees in place: it learns what
//! descriptors look like from a loaded corpus, creates new objects and
//! modules from those learned templates, reads and writes values through
//! paths, and keeps an observable log of every change.
//!
//! # Overview
//!
//! NDF has no published schema, so everything structural is inferred:
//! - **Learned, not declared**: templates and value variants come from the
//!   files themselves and are only ever advisory
//! - **Layout-preserving**: values carry the raw whitespace around them so
//!   an edited file re-serializes with minimal diff
//! - **Observable**: every successful edit produces one modification record
//!   and notifies listeners synchronously
//!
//! # Quick Start
//!
//! ```rust
//! use ndf_edit::{ModificationTracker, NumericOp, Object, PathEngine, Value};
//!
//! let mut weapon = Object::new("TWeaponManagerModuleDescriptor");
//! weapon.insert("Salves", Value::array(vec![Value::integer(4), Value::integer(2)]));
//! let mut unit = Object::named("TEntityDescriptor", "Unit_A");
//! unit.insert("ModulesDescriptors", Value::array(vec![Value::object(weapon)]));
//!
//! let paths = PathEngine::new();
//! let tracker = ModificationTracker::new();
//!
//! // Positional and type-qualified paths reach the same value
//! let positional = "ModulesDescriptors[0].Salves[1]";
//! let qualified = "TWeaponManagerModuleDescriptor.Salves[1]";
//! assert_eq!(paths.get(&unit, positional), paths.get(&unit, qualified));
//!
//! paths.apply_numeric(&mut unit, qualified, NumericOp::Add, 3.0, Some(&tracker)).unwrap();
//! assert_eq!(paths.get(&unit, positional), Some(&Value::integer(5)));
//! assert!(tracker.has_modification("Unit_A", qualified));
//! ```
//!
//! # Modules
//!
//! - [`model`]: Value tree, documents and identifiers
//! - [`schema`]: Schema and template inference
//! - [`path`]: Path resolution and in-place mutation
//! - [`additive`]: Template-based structural additions
//! - [`tracker`]: Modification log and listeners
//! - [`config`]: Options and conventional property names
//! - [`error`]: Error types
//!
//! # Logging
//!
//! Operations emit `tracing` events (refusals at `warn`, edits at `debug`).
//! The crate never installs a subscriber.

pub mod additive;
pub mod config;
pub mod error;
pub mod model;
pub mod path;
pub mod schema;
pub mod tracker;

// Re-export commonly used types at crate root
pub use additive::{AdditiveManager, Overrides};
pub use config::{EditOptions, SchemaOptions};
pub use error::{EditError, ErrorKind, ValidationError};
pub use model::{
    Array, ArrayItem, Document, Entry, IdGenerator, Layout, NativeValue, Object, QuoteStyle, Value,
    ValueKind, ValueType, PLACEHOLDER_GUID,
};
pub use path::{NumericOp, PathEngine, PropertyPath};
pub use schema::{validate_object, validate_property, SchemaEngine};
pub use tracker::{
    ListenerId, ModificationKind, ModificationListener, ModificationRecord, ModificationStats,
    ModificationTracker,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
