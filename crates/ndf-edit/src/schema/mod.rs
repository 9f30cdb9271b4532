//! Observational schema and template inference.
//!
//! NDF has no authoritative schema, so this module learns one from a
//! loaded corpus: which properties each type carries, which value variants
//! each property has been seen with, which enum literals exist, and what a
//! fresh instance of each type should look like.
//!
//! **Note:** Everything here is advisory. Unknown types, properties and
//! variants are always accepted; only structurally impossible input (an
//! object without a type name, a property without a name) is rejected.

pub mod template;

use std::collections::BTreeSet;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::SchemaOptions;
use crate::error::ValidationError;
use crate::model::{Entry, Object, Value, ValueKind, ValueType};

/// What has been observed for one property of one type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertySchema {
    /// Variants the property was seen with.
    pub variants: BTreeSet<ValueType>,
    /// Number of objects carrying the property.
    pub occurrences: usize,
    /// Enum literals seen directly as this property's value or its elements.
    pub enums: BTreeSet<String>,
}

/// What has been observed for one type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeSchema {
    /// Number of objects of this type.
    pub occurrences: usize,
    /// Properties in first-seen order.
    pub properties: IndexMap<String, PropertySchema>,
}

impl TypeSchema {
    fn observe(&mut self, name: &str, value: &Value) {
        let property = self.properties.entry(name.to_string()).or_default();
        property.variants.insert(value.value_type());
        property.occurrences += 1;
        match &value.kind {
            ValueKind::Array(array) => {
                property.enums.extend(array.iter().filter_map(enum_literal).map(str::to_string));
            }
            _ => {
                if let Some(text) = enum_literal(value) {
                    property.enums.insert(text.to_string());
                }
            }
        }
    }
}

/// Outcome of one [`SchemaEngine::learn`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LearnSummary {
    /// Top-level objects scanned.
    pub objects: usize,
    /// Malformed objects (top-level or nested) skipped.
    pub skipped: usize,
    /// Distinct types learned.
    pub types: usize,
    pub object_templates: usize,
    pub module_templates: usize,
}

/// Learns types, variants, enums and templates from example objects.
///
/// State is built by [`SchemaEngine::learn`] and is read-only afterwards;
/// edits made later are not relearned.
#[derive(Debug, Clone)]
pub struct SchemaEngine {
    options: SchemaOptions,
    types: FxHashMap<String, TypeSchema>,
    module_schemas: FxHashMap<String, TypeSchema>,
    examples: FxHashMap<String, IndexMap<String, Entry>>,
    top_level: FxHashSet<String>,
    enum_values: BTreeSet<String>,
    object_templates: FxHashMap<String, Object>,
    module_templates: FxHashMap<String, Object>,
}

impl SchemaEngine {
    /// Creates an engine with default options and only bootstrap enums.
    pub fn new() -> Self {
        Self::with_options(SchemaOptions::default())
    }

    pub fn with_options(options: SchemaOptions) -> Self {
        let mut engine = Self {
            options,
            types: FxHashMap::default(),
            module_schemas: FxHashMap::default(),
            examples: FxHashMap::default(),
            top_level: FxHashSet::default(),
            enum_values: BTreeSet::new(),
            object_templates: FxHashMap::default(),
            module_templates: FxHashMap::default(),
        };
        engine.reset();
        engine
    }

    pub fn options(&self) -> &SchemaOptions {
        &self.options
    }

    /// Drops everything learned, keeping only the bootstrap enums.
    pub fn reset(&mut self) {
        self.types.clear();
        self.module_schemas.clear();
        self.examples.clear();
        self.top_level.clear();
        self.object_templates.clear();
        self.module_templates.clear();
        self.enum_values = self.options.bootstrap_enums.iter().cloned().collect();
    }

    /// Scans a corpus of top-level objects and rebuilds every template.
    ///
    /// Replaces anything learned before. Malformed objects are logged and
    /// skipped; the rest of the pass continues.
    pub fn learn(&mut self, objects: &[Object]) -> LearnSummary {
        self.reset();
        let mut summary = LearnSummary {
            objects: objects.len(),
            ..LearnSummary::default()
        };

        for (index, object) in objects.iter().enumerate() {
            if let Err(err) = validate_object(object) {
                tracing::warn!(index, error = %err, "skipping malformed top-level object");
                summary.skipped += 1;
                continue;
            }
            self.top_level.insert(object.type_name.clone());
            summary.skipped += self.observe_object(object, false);
        }

        // Reaching a type through the top-level list overrides its name.
        let top_level = &self.top_level;
        self.module_schemas.retain(|type_name, _| !top_level.contains(type_name));

        self.synthesize_templates();

        summary.types = self.types.len();
        summary.object_templates = self.object_templates.len();
        summary.module_templates = self.module_templates.len();
        tracing::info!(
            objects = summary.objects,
            skipped = summary.skipped,
            types = summary.types,
            object_templates = summary.object_templates,
            module_templates = summary.module_templates,
            enums = self.enum_values.len(),
            "schema learned"
        );
        summary
    }

    /// Records one object and everything below it; returns the number of
    /// malformed nested objects skipped.
    fn observe_object(&mut self, object: &Object, nested: bool) -> usize {
        let type_name = object.type_name.as_str();
        let is_module = nested && self.options.matches_module_name(type_name);
        let mut skipped = 0;

        self.types.entry(type_name.to_string()).or_default().occurrences += 1;
        if is_module {
            self.module_schemas
                .entry(type_name.to_string())
                .or_default()
                .occurrences += 1;
        }

        for (name, entry) in &object.properties {
            if name.trim().is_empty() {
                tracing::warn!(type_name, "skipping property without a name");
                continue;
            }
            if let Some(schema) = self.types.get_mut(type_name) {
                schema.observe(name, &entry.value);
            }
            if is_module {
                if let Some(schema) = self.module_schemas.get_mut(type_name) {
                    schema.observe(name, &entry.value);
                }
            }
            self.examples
                .entry(type_name.to_string())
                .or_default()
                .entry(name.clone())
                .or_insert_with(|| entry.clone());
            skipped += self.observe_value(&entry.value);
        }
        skipped
    }

    fn observe_value(&mut self, value: &Value) -> usize {
        match &value.kind {
            ValueKind::Enum(text) => {
                self.enum_values.insert(text.clone());
                0
            }
            ValueKind::String { value: text, .. } => {
                if template::looks_like_enum(text) {
                    self.enum_values.insert(text.clone());
                }
                0
            }
            ValueKind::Array(array) => array.iter().map(|item| self.observe_value(item)).sum(),
            ValueKind::Object(object) => match validate_object(object) {
                Ok(()) => self.observe_object(object, true),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping malformed nested object");
                    1
                }
            },
            ValueKind::Number { .. }
            | ValueKind::Boolean(_)
            | ValueKind::TemplateRef(_)
            | ValueKind::ResourceRef(_)
            | ValueKind::Guid(_) => 0,
        }
    }

    fn synthesize_templates(&mut self) {
        for (type_name, examples) in &self.examples {
            let built = template::synthesize(type_name, examples);
            if self.top_level.contains(type_name) {
                self.object_templates.insert(type_name.clone(), built);
            } else if self.module_schemas.contains_key(type_name) {
                self.module_templates.insert(type_name.clone(), built);
            }
        }
        // Types seen without any property still get an (empty) template.
        for type_name in self.types.keys() {
            if self.examples.contains_key(type_name) {
                continue;
            }
            if self.top_level.contains(type_name) {
                self.object_templates
                    .insert(type_name.clone(), Object::new(type_name.clone()));
            } else if self.module_schemas.contains_key(type_name) {
                self.module_templates
                    .insert(type_name.clone(), Object::new(type_name.clone()));
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Types seen at the top level, sorted.
    pub fn object_types(&self) -> Vec<&str> {
        sorted(self.object_templates.keys())
    }

    /// Module types (nested only, module-like name), sorted.
    pub fn module_types(&self) -> Vec<&str> {
        sorted(self.module_templates.keys())
    }

    /// Every type observed anywhere, sorted.
    pub fn learned_types(&self) -> Vec<&str> {
        sorted(self.types.keys())
    }

    pub fn type_schema(&self, type_name: &str) -> Option<&TypeSchema> {
        self.types.get(type_name)
    }

    /// Properties of a type in first-seen order; empty for unknown types.
    pub fn properties_of(&self, type_name: &str) -> Vec<&str> {
        property_names(self.types.get(type_name))
    }

    /// Properties recorded in the module namespace for a module type.
    pub fn module_properties_of(&self, type_name: &str) -> Vec<&str> {
        property_names(self.module_schemas.get(type_name))
    }

    pub fn property_schema(&self, type_name: &str, property: &str) -> Option<&PropertySchema> {
        self.types.get(type_name)?.properties.get(property)
    }

    /// Variants a property has been seen with.
    pub fn property_variants(&self, type_name: &str, property: &str) -> Option<&BTreeSet<ValueType>> {
        self.property_schema(type_name, property).map(|p| &p.variants)
    }

    /// Number of objects of a type seen; 0 for unknown types.
    pub fn occurrences(&self, type_name: &str) -> usize {
        self.types.get(type_name).map_or(0, |t| t.occurrences)
    }

    /// Every known enum literal (bootstrap plus learned), sorted.
    pub fn enum_values(&self) -> impl Iterator<Item = &str> {
        self.enum_values.iter().map(String::as_str)
    }

    pub fn is_enum_value(&self, literal: &str) -> bool {
        self.enum_values.contains(literal)
    }

    /// Enum literals observed on one property of one type, sorted.
    pub fn observed_enums_for(&self, type_name: &str, property: &str) -> Vec<&str> {
        self.property_schema(type_name, property)
            .map(|p| p.enums.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn is_top_level_type(&self, type_name: &str) -> bool {
        self.top_level.contains(type_name)
    }

    pub fn is_module_type(&self, type_name: &str) -> bool {
        self.module_templates.contains_key(type_name)
    }

    /// Template for a top-level object type.
    pub fn object_template(&self, type_name: &str) -> Option<&Object> {
        self.object_templates.get(type_name)
    }

    /// Template for a module type.
    pub fn module_template(&self, type_name: &str) -> Option<&Object> {
        self.module_templates.get(type_name)
    }

    /// Template from either namespace, top-level first.
    pub fn template(&self, type_name: &str) -> Option<&Object> {
        self.object_template(type_name)
            .or_else(|| self.module_template(type_name))
    }

    /// Returns true if the (type, property, variant) triple has been seen.
    ///
    /// Advisory only: `false` never means the value is invalid.
    pub fn is_familiar(&self, type_name: &str, property: &str, variant: ValueType) -> bool {
        self.property_variants(type_name, property)
            .is_some_and(|variants| variants.contains(&variant))
    }
}

impl Default for SchemaEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Enum tag carried by `value`: an Enum, or text that reads as one.
fn enum_literal(value: &Value) -> Option<&str> {
    match &value.kind {
        ValueKind::Enum(text) => Some(text.as_str()),
        ValueKind::String { value: text, .. } if template::looks_like_enum(text) => Some(text.as_str()),
        _ => None,
    }
}

fn sorted<'a>(keys: impl Iterator<Item = &'a String>) -> Vec<&'a str> {
    let mut keys: Vec<&str> = keys.map(String::as_str).collect();
    keys.sort_unstable();
    keys
}

fn property_names(schema: Option<&TypeSchema>) -> Vec<&str> {
    schema
        .map(|s| s.properties.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

/// Validates the structure of one object (not its nested content).
///
/// Rejects a missing type name and empty property names. Everything else,
/// including types and properties never seen before, passes.
pub fn validate_object(object: &Object) -> Result<(), ValidationError> {
    if object.type_name.trim().is_empty() {
        return Err(ValidationError::MissingTypeName);
    }
    if object.properties.keys().any(|name| name.trim().is_empty()) {
        return Err(ValidationError::EmptyPropertyName {
            type_name: object.type_name.clone(),
        });
    }
    Ok(())
}

/// Validates one (type, property, value) triple.
///
/// Any value variant is accepted for any property.
pub fn validate_property(type_name: &str, property: &str, _value: &Value) -> Result<(), ValidationError> {
    if type_name.trim().is_empty() {
        return Err(ValidationError::MissingTypeName);
    }
    if property.trim().is_empty() {
        return Err(ValidationError::EmptyPropertyName {
            type_name: type_name.to_string(),
        });
    }
    Ok(())
}
