//! Structural additions: new objects, modules, properties and elements.
//!
//! Every operation checks everything it needs and builds the complete new
//! value before touching the tree, so a refused operation leaves the tree
//! exactly as it was. Each success appends one record to the shared
//! [`ModificationTracker`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ndf_edit::{AdditiveManager, Document, ModificationTracker, Object, Overrides, SchemaEngine, Value};
//!
//! let mut unit = Object::named("TEntityDescriptor", "Unit_A");
//! unit.insert("DescriptorId", Value::guid("GUID:{00000000-0000-0000-0000-00000000000a}"));
//! unit.insert("Cost", Value::integer(10));
//!
//! let mut schema = SchemaEngine::new();
//! schema.learn(std::slice::from_ref(&unit));
//!
//! let tracker = Arc::new(ModificationTracker::new());
//! let mut manager = AdditiveManager::new(Arc::new(schema), Arc::clone(&tracker));
//! let mut document = Document::from_objects(vec![unit]);
//!
//! let mut overrides = Overrides::new();
//! overrides.insert("Cost".to_string(), 25.into());
//! let added = manager
//!     .add_object(&mut document, "TEntityDescriptor", "Unit_B", &overrides, None)
//!     .unwrap();
//! assert_eq!(added.get("Cost"), Some(&Value::integer(25)));
//! assert_eq!(document.objects[0].name.as_deref(), Some("Unit_B"));
//! assert_eq!(tracker.len(), 1);
//! ```

pub mod format;

use std::sync::Arc;

use indexmap::IndexMap;

use crate::config::EditOptions;
use crate::error::EditError;
use crate::model::{Array, Document, IdGenerator, NativeValue, Object, Value, ValueKind};
use crate::path::{normalize_path, resolve_mut, PathEngine, PropertyPath};
use crate::schema::{self, SchemaEngine};
use crate::tracker::{ModificationKind, ModificationTracker};

/// Property overrides applied to a freshly cloned template, in order.
///
/// A plain key sets or inserts that property. A dotted or bracketed key is
/// a path that must already resolve inside the clone.
pub type Overrides = IndexMap<String, NativeValue>;

/// Performs additive edits against learned templates.
#[derive(Debug)]
pub struct AdditiveManager {
    schema: Arc<SchemaEngine>,
    ids: IdGenerator,
    tracker: Arc<ModificationTracker>,
    paths: PathEngine,
    options: EditOptions,
}

impl AdditiveManager {
    /// Creates a manager with default options and an empty identifier
    /// registry.
    pub fn new(schema: Arc<SchemaEngine>, tracker: Arc<ModificationTracker>) -> Self {
        Self::with_options(schema, tracker, EditOptions::default())
    }

    pub fn with_options(
        schema: Arc<SchemaEngine>,
        tracker: Arc<ModificationTracker>,
        options: EditOptions,
    ) -> Self {
        Self {
            schema,
            ids: IdGenerator::new(),
            tracker,
            paths: PathEngine::from_options(&options),
            options,
        }
    }

    /// Replaces the identifier generator.
    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    pub fn schema(&self) -> &SchemaEngine {
        &self.schema
    }

    pub fn tracker(&self) -> &Arc<ModificationTracker> {
        &self.tracker
    }

    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    /// Mutable access to the registry, e.g. to clear it on a file switch.
    pub fn ids_mut(&mut self) -> &mut IdGenerator {
        &mut self.ids
    }

    pub fn paths(&self) -> &PathEngine {
        &self.paths
    }

    pub fn options(&self) -> &EditOptions {
        &self.options
    }

    /// Registers every identifier already present in `document`.
    ///
    /// Returns the number of identifiers not registered before.
    pub fn seed_identifiers(&mut self, document: &Document) -> usize {
        let mut seeded = 0;
        for object in &document.objects {
            object.visit_values(&mut |value| {
                if let ValueKind::Guid(id) = &value.kind {
                    if self.ids.register_existing(id) {
                        seeded += 1;
                    }
                }
            });
        }
        tracing::debug!(seeded, registry = self.ids.len(), "identifiers seeded");
        seeded
    }

    /// Creates a new top-level object from a template and inserts it first.
    ///
    /// Uses `template` when given, else the learned object template of
    /// `type_name`. The new object is exported when at least half of the
    /// existing objects are, and every `DescriptorId` in it is regenerated.
    pub fn add_object<'d>(
        &mut self,
        document: &'d mut Document,
        type_name: &str,
        name: &str,
        overrides: &Overrides,
        template: Option<&Object>,
    ) -> Result<&'d Object, EditError> {
        if name.trim().is_empty() {
            tracing::warn!(type_name, "add_object refused: empty name");
            return Err(EditError::invalid("object name must not be empty"));
        }
        if document.contains(name) {
            tracing::warn!(type_name, name, "add_object refused: name taken");
            return Err(EditError::Collision {
                name: name.to_string(),
            });
        }
        let Some(template) = template.or_else(|| self.schema.object_template(type_name)) else {
            tracing::warn!(type_name, name, "add_object refused: no template");
            return Err(EditError::MissingTemplate {
                type_name: type_name.to_string(),
            });
        };

        let mut object = template.deep_copy();
        object.type_name = type_name.to_string();
        object.name = Some(name.to_string());
        object.exported = exported_majority(document);
        // Fresh identifiers first so an explicit DescriptorId override wins.
        let regenerated = self.regenerate_ids(&mut object);
        apply_overrides(&self.paths, &mut object, name, overrides).inspect_err(|err| {
            tracing::warn!(type_name, name, error = %err, "add_object refused: override failed");
        })?;
        let exported = object.exported;

        let value = Value::object(object.clone());
        document.insert(0, object);

        tracing::debug!(type_name, name, regenerated, exported, "object added");
        self.tracker.record(
            name,
            "",
            None,
            value,
            ModificationKind::ObjectAdded,
            format!("added {type_name} {name}"),
        );
        Ok(&document.objects[0])
    }

    /// Appends a module cloned from the learned module template of
    /// `module_type` to `target`'s modules array. Returns its index.
    pub fn add_module(
        &mut self,
        target: &mut Object,
        module_type: &str,
        overrides: &Overrides,
    ) -> Result<usize, EditError> {
        let object = target.display_name().to_string();
        let modules_property = self.options.modules_property.clone();
        check_array(target, &object, &modules_property).inspect_err(|err| {
            tracing::warn!(object = %object, module_type, error = %err, "add_module refused");
        })?;
        let Some(template) = self.schema.module_template(module_type) else {
            tracing::warn!(object = %object, module_type, "add_module refused: no module template");
            return Err(EditError::MissingTemplate {
                type_name: module_type.to_string(),
            });
        };

        let mut module = template.deep_copy();
        self.regenerate_ids(&mut module);
        apply_overrides(&self.paths, &mut module, &object, overrides).inspect_err(|err| {
            tracing::warn!(object = %object, module_type, error = %err, "add_module refused: override failed");
        })?;
        let value = Value::object(module);

        let Some(modules) = target.get_mut(&modules_property).and_then(Value::as_array_mut) else {
            return Err(EditError::not_found(object, modules_property));
        };
        let index = format::append_element(modules, value, &self.options);
        let new = modules.items[index].value.clone();

        let path = format!("{modules_property}[{index}]");
        tracing::debug!(object = %object, module_type, path = %path, "module added");
        self.tracker.record(
            object,
            path.clone(),
            None,
            new,
            ModificationKind::ModuleAdded,
            format!("added {module_type} at {path}"),
        );
        Ok(index)
    }

    /// Removes the first module of type `module_type`, returning it.
    pub fn remove_module(&mut self, target: &mut Object, module_type: &str) -> Result<Value, EditError> {
        let object = target.display_name().to_string();
        let modules_property = self.options.modules_property.clone();
        let Some((index, _)) = self.paths.find_module(target, module_type) else {
            tracing::warn!(object = %object, module_type, "remove_module refused: no such module");
            return Err(EditError::not_found(object, module_type));
        };
        let Some(modules) = target.get_mut(&modules_property) else {
            return Err(EditError::not_found(object, modules_property));
        };
        let before = modules.clone();
        let Some(removed) = modules.as_array_mut().and_then(|a| format::remove_element(a, index)) else {
            return Err(EditError::not_found(object, format!("{modules_property}[{index}]")));
        };
        let after = modules.clone();

        tracing::debug!(object = %object, module_type, index, "module removed");
        self.tracker.record(
            object,
            modules_property.clone(),
            Some(before),
            after,
            ModificationKind::ModuleRemoved,
            format!("removed {module_type} from {modules_property}[{index}]"),
        );
        Ok(removed)
    }

    /// Adds or replaces a comma-terminated property on `target`.
    ///
    /// Returns the replaced value, if any. Replacing keeps the property's
    /// position and, for a value without layout, its layout.
    pub fn add_property(
        &mut self,
        target: &mut Object,
        name: &str,
        value: impl Into<NativeValue>,
    ) -> Result<Option<Value>, EditError> {
        let object = target.display_name().to_string();
        let mut value = value.into().into_value();
        schema::validate_property(&target.type_name, name, &value).inspect_err(|err| {
            tracing::warn!(object = %object, property = name, error = %err, "add_property refused");
        })?;
        if let Some(old) = target.get(name) {
            if value.layout.is_empty() {
                value.layout = old.layout.clone();
            }
        }

        let new = value.clone();
        let old = target.insert_entry(name, value, true).map(|entry| entry.value);

        tracing::debug!(object = %object, property = name, replaced = old.is_some(), "property added");
        let description = match &old {
            Some(old) => format!("{name}: {old} -> {new}"),
            None => format!("added {name} = {new}"),
        };
        self.tracker.record(
            object,
            name,
            old.clone(),
            new,
            ModificationKind::PropertyAdded,
            description,
        );
        Ok(old)
    }

    /// Appends `value` to the array at positional `array_path`, returning
    /// the new element's index.
    pub fn add_array_element(
        &mut self,
        target: &mut Object,
        array_path: &str,
        value: impl Into<NativeValue>,
    ) -> Result<usize, EditError> {
        let object = target.display_name().to_string();
        let value = value.into().into_value();
        let array = locate_array(target, &object, array_path).inspect_err(|err| {
            tracing::warn!(object = %object, path = array_path, error = %err, "add_array_element refused");
        })?;

        let index = format::append_element(array, value, &self.options);
        let new = array.items[index].value.clone();

        let path = format!("{}[{index}]", normalize_path(array_path));
        tracing::debug!(object = %object, path = %path, "element added");
        self.tracker.record(
            object,
            path.clone(),
            None,
            new.clone(),
            ModificationKind::ElementAdded,
            format!("added {path} = {new}"),
        );
        Ok(index)
    }

    /// Removes the element at `index` of the array at positional
    /// `array_path`, returning it.
    pub fn remove_array_element(
        &mut self,
        target: &mut Object,
        array_path: &str,
        index: usize,
    ) -> Result<Value, EditError> {
        let object = target.display_name().to_string();
        let array = locate_array(target, &object, array_path).inspect_err(|err| {
            tracing::warn!(object = %object, path = array_path, index, error = %err, "remove_array_element refused");
        })?;
        let before = array.clone();
        let Some(removed) = format::remove_element(array, index) else {
            tracing::warn!(object = %object, path = array_path, index, len = array.len(), "remove_array_element refused: index out of range");
            return Err(EditError::not_found(object, format!("{array_path}[{index}]")));
        };
        let after = array.clone();

        let path = normalize_path(array_path);
        tracing::debug!(object = %object, path = %path, index, "element removed");
        self.tracker.record(
            object,
            path.clone(),
            Some(Value::new(ValueKind::Array(before))),
            Value::new(ValueKind::Array(after)),
            ModificationKind::ElementRemoved,
            format!("removed {path}[{index}] = {removed}"),
        );
        Ok(removed)
    }

    /// Assigns a fresh identifier to every identifier property below `object`.
    fn regenerate_ids(&mut self, object: &mut Object) -> usize {
        let property = self.options.descriptor_id_property.as_str();
        let ids = &mut self.ids;
        let mut regenerated = 0;
        object.visit_properties_mut(&mut |name, value| {
            if name == property {
                *value = Value::with_layout(ValueKind::Guid(ids.generate()), value.layout.clone());
                regenerated += 1;
            }
        });
        regenerated
    }
}

/// True when at least half of the existing objects are exported.
fn exported_majority(document: &Document) -> bool {
    let exported = document.objects.iter().filter(|o| o.exported).count();
    exported >= document.len() - exported
}

fn check_array(target: &Object, object: &str, property: &str) -> Result<(), EditError> {
    match target.get(property) {
        None => Err(EditError::not_found(object, property)),
        Some(value) if value.as_array().is_none() => Err(EditError::TypeMismatch {
            path: property.to_string(),
            expected: "array",
            actual: value.value_type(),
        }),
        Some(_) => Ok(()),
    }
}

fn locate_array<'a>(
    target: &'a mut Object,
    object: &str,
    array_path: &str,
) -> Result<&'a mut Array, EditError> {
    let Some(path) = PropertyPath::parse(array_path) else {
        return Err(EditError::not_found(object, array_path));
    };
    let Some(value) = resolve_mut(target, &path) else {
        return Err(EditError::not_found(object, array_path));
    };
    let actual = value.value_type();
    value.as_array_mut().ok_or_else(|| EditError::TypeMismatch {
        path: array_path.to_string(),
        expected: "array",
        actual,
    })
}

/// Applies overrides in order to a detached clone.
fn apply_overrides(
    paths: &PathEngine,
    target: &mut Object,
    object: &str,
    overrides: &Overrides,
) -> Result<(), EditError> {
    for (key, native) in overrides {
        let value = native.clone().into_value();
        if key.contains(['.', '[']) {
            let Some(slot) = paths.get_mut(target, key) else {
                return Err(EditError::not_found(object, key.as_str()));
            };
            let replacement = format::conform(slot, value);
            *slot = replacement;
        } else if let Some(slot) = target.get_mut(key) {
            let replacement = format::conform(slot, value);
            *slot = replacement;
        } else {
            schema::validate_property(&target.type_name, key, &value)?;
            target.insert_entry(key.as_str(), value, true);
        }
    }
    Ok(())
}
