//! Data model types for NDF trees.
//!
//! This module contains the core types for representing parsed NDF data:
//! - Values (tagged variants with layout metadata)
//! - Documents (the top-level declaration list)
//! - Identifiers (`GUID:{...}` generation)

pub mod document;
pub mod id;
pub mod value;

pub use document::Document;
pub use id::{format_guid, is_guid_literal, normalize_id, parse_guid, IdGenerator, PLACEHOLDER_GUID};
pub use value::{
    Array, ArrayItem, Entry, Layout, NativeValue, Object, QuoteStyle, Value, ValueKind, ValueType,
};
