//! Path resolution over one shared tree-walk primitive.

use indexmap::IndexMap;

use crate::config::{EditOptions, MODULES_DESCRIPTORS};
use crate::model::{Object, Value, ValueKind};
use crate::path::{PropertyPath, Step};

/// Follows `steps` downward from `value`.
fn walk<'a>(value: &'a Value, steps: &[Step]) -> Option<&'a Value> {
    let mut current = value;
    for step in steps {
        current = match (step, &current.kind) {
            (Step::Property(name), ValueKind::Object(object)) => object.get(name)?,
            (Step::Index(index), ValueKind::Array(array)) => array.get(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

fn walk_mut<'a>(value: &'a mut Value, steps: &[Step]) -> Option<&'a mut Value> {
    let mut current = value;
    for step in steps {
        current = match (step, &mut current.kind) {
            (Step::Property(name), ValueKind::Object(object)) => object.get_mut(name)?,
            (Step::Index(index), ValueKind::Array(array)) => array.get_mut(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Resolves a positional path whose first step names a property of `root`.
pub fn resolve<'a>(root: &'a Object, path: &PropertyPath) -> Option<&'a Value> {
    let (first, rest) = path.steps().split_first()?;
    let start = root.get(first.as_property()?)?;
    walk(start, rest)
}

/// Mutable counterpart of [`resolve`].
pub fn resolve_mut<'a>(root: &'a mut Object, path: &PropertyPath) -> Option<&'a mut Value> {
    let (first, rest) = path.steps().split_first()?;
    let start = root.get_mut(first.as_property()?)?;
    walk_mut(start, rest)
}

/// Resolves positional and type-qualified paths against one object.
///
/// String-addressed lookups try the positional scheme first and fall back
/// to the type-qualified module scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEngine {
    modules_property: String,
}

impl PathEngine {
    /// Creates an engine using the conventional `ModulesDescriptors` array.
    pub fn new() -> Self {
        Self::with_modules_property(MODULES_DESCRIPTORS)
    }

    pub fn with_modules_property(name: impl Into<String>) -> Self {
        Self {
            modules_property: name.into(),
        }
    }

    pub fn from_options(options: &EditOptions) -> Self {
        Self::with_modules_property(options.modules_property.as_str())
    }

    /// Name of the array property holding modules.
    pub fn modules_property(&self) -> &str {
        &self.modules_property
    }

    /// Reads the value at `path`.
    pub fn get<'a>(&self, root: &'a Object, path: &str) -> Option<&'a Value> {
        if let Some(value) = PropertyPath::parse(path).and_then(|p| resolve(root, &p)) {
            return Some(value);
        }
        let found = self.resolve_module_path(root, path);
        if found.is_none() {
            tracing::trace!(object = root.display_name(), path, "path did not resolve");
        }
        found
    }

    /// Mutable counterpart of [`PathEngine::get`].
    pub fn get_mut<'a>(&self, root: &'a mut Object, path: &str) -> Option<&'a mut Value> {
        if let Some(positional) = PropertyPath::parse(path) {
            if resolve(root, &positional).is_some() {
                return resolve_mut(root, &positional);
            }
        }
        self.resolve_module_path_mut(root, path)
    }

    /// Finds the first module of type `module_type` and its index.
    pub fn find_module<'a>(&self, root: &'a Object, module_type: &str) -> Option<(usize, &'a Object)> {
        let modules = root.get(&self.modules_property)?.as_array()?;
        modules.iter().enumerate().find_map(|(i, value)| match value.as_object() {
            Some(module) if module.type_name == module_type => Some((i, module)),
            _ => None,
        })
    }

    /// Resolves `<ModuleType>.<rest>`; with no rest, returns the module itself.
    pub fn resolve_module_path<'a>(&self, root: &'a Object, path: &str) -> Option<&'a Value> {
        let (module_type, rest) = split_module_path(path)?;
        let (index, _) = self.find_module(root, module_type)?;
        let module = root.get(&self.modules_property)?.as_array()?.get(index)?;
        match rest {
            Some(rest) => walk(module, PropertyPath::parse(rest)?.steps()),
            None => Some(module),
        }
    }

    /// Mutable counterpart of [`PathEngine::resolve_module_path`].
    pub fn resolve_module_path_mut<'a>(
        &self,
        root: &'a mut Object,
        path: &str,
    ) -> Option<&'a mut Value> {
        let (module_type, rest) = split_module_path(path)?;
        let (index, _) = self.find_module(root, module_type)?;
        let rest = match rest {
            Some(rest) => Some(PropertyPath::parse(rest)?),
            None => None,
        };
        let module = root
            .get_mut(&self.modules_property)?
            .as_array_mut()?
            .get_mut(index)?;
        match rest {
            Some(rest) => walk_mut(module, rest.steps()),
            None => Some(module),
        }
    }

    /// Converts `ModulesDescriptors[i].rest` into `<ModuleType>.rest`.
    ///
    /// Returns `None` when the path does not point into a module, or when an
    /// earlier module shares the type (the type-qualified form would then
    /// address a different module).
    pub fn to_module_path(&self, root: &Object, positional: &str) -> Option<String> {
        let path = PropertyPath::parse(positional)?;
        let (index, rest) = match path.steps() {
            [Step::Property(name), Step::Index(index), rest @ ..] if *name == self.modules_property => {
                (*index, rest)
            }
            _ => return None,
        };
        let module = root
            .get(&self.modules_property)?
            .as_array()?
            .get(index)?
            .as_object()?;
        let (first_index, _) = self.find_module(root, &module.type_name)?;
        if first_index != index {
            return None;
        }
        if rest.is_empty() {
            return Some(module.type_name.clone());
        }
        let rest = PropertyPath::from_steps(rest.to_vec());
        match rest.steps().first() {
            Some(Step::Index(_)) => Some(format!("{}{}", module.type_name, rest)),
            _ => Some(format!("{}.{}", module.type_name, rest)),
        }
    }

    /// Every module type of `root` mapped to its first instance, in array order.
    pub fn modules<'a>(&self, root: &'a Object) -> IndexMap<String, &'a Object> {
        let mut found = IndexMap::new();
        let Some(modules) = root.get(&self.modules_property).and_then(Value::as_array) else {
            return found;
        };
        for module in modules.iter().filter_map(Value::as_object) {
            found.entry(module.type_name.clone()).or_insert(module);
        }
        found
    }
}

impl Default for PathEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn split_module_path(path: &str) -> Option<(&str, Option<&str>)> {
    let path = path.trim();
    let (module_type, rest) = match path.split_once('.') {
        Some((module_type, rest)) => (module_type, Some(rest)),
        None => (path, None),
    };
    if module_type.is_empty() || module_type.contains('[') || module_type.contains(']') {
        return None;
    }
    Some((module_type, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Array;

    fn module(type_name: &str, speed: i64) -> Value {
        let mut module = Object::new(type_name);
        module.insert("MaxSpeed", Value::integer(speed));
        module.insert("TagSet", Value::array(vec![Value::string("A"), Value::string("B")]));
        Value::object(module)
    }

    fn unit() -> Object {
        let mut unit = Object::named("TEntityDescriptor", "Descriptor_Unit_Tank");
        unit.insert("ClassNameForDebug", Value::string("Unit_Tank"));
        unit.insert(
            "ModulesDescriptors",
            Value::array(vec![
                module("TTagsModuleDescriptor", 1),
                module("TMobilityModuleDescriptor", 2),
                module("TTagsModuleDescriptor", 3),
                Value::template_ref("~/SharedModule"),
            ]),
        );
        unit
    }

    #[test]
    fn test_positional_resolution() {
        let unit = unit();
        let engine = PathEngine::new();
        assert_eq!(engine.get(&unit, "ClassNameForDebug"), Some(&Value::string("Unit_Tank")));
        assert_eq!(
            engine.get(&unit, "ModulesDescriptors[1].MaxSpeed"),
            Some(&Value::integer(2))
        );
        assert_eq!(
            engine.get(&unit, "ModulesDescriptors.[2].TagSet[1]"),
            Some(&Value::string("B"))
        );
    }

    #[test]
    fn test_positional_misses_are_not_found() {
        let unit = unit();
        let engine = PathEngine::new();
        for path in [
            "Missing",
            "ModulesDescriptors[9].MaxSpeed",
            "ClassNameForDebug[0]",
            "ModulesDescriptors[3].MaxSpeed",
            "ModulesDescriptors[0].TagSet.Name",
            "A..B",
        ] {
            assert!(engine.get(&unit, path).is_none(), "{path} should not resolve");
        }
    }

    #[test]
    fn test_type_qualified_resolution_uses_first_match() {
        let unit = unit();
        let engine = PathEngine::new();
        assert_eq!(
            engine.get(&unit, "TTagsModuleDescriptor.MaxSpeed"),
            Some(&Value::integer(1))
        );
        assert_eq!(
            engine.get(&unit, "TMobilityModuleDescriptor.TagSet[0]"),
            Some(&Value::string("A"))
        );
        let whole = engine.get(&unit, "TMobilityModuleDescriptor").unwrap();
        assert_eq!(whole.as_object().unwrap().type_name, "TMobilityModuleDescriptor");
        assert!(engine.get(&unit, "TUnknownModuleDescriptor.MaxSpeed").is_none());
    }

    #[test]
    fn test_type_qualified_survives_reordering() {
        let mut unit = unit();
        let engine = PathEngine::new();
        let modules = unit.get_mut("ModulesDescriptors").unwrap().as_array_mut().unwrap();
        modules.items.swap(0, 1);
        assert_eq!(
            engine.get(&unit, "TMobilityModuleDescriptor.MaxSpeed"),
            Some(&Value::integer(2))
        );
        assert_eq!(
            engine.get(&unit, "ModulesDescriptors[0].MaxSpeed"),
            Some(&Value::integer(2))
        );
    }

    #[test]
    fn test_get_mut_both_schemes() {
        let mut unit = unit();
        let engine = PathEngine::new();
        *engine.get_mut(&mut unit, "TMobilityModuleDescriptor.MaxSpeed").unwrap() = Value::integer(7);
        assert_eq!(
            engine.get(&unit, "ModulesDescriptors[1].MaxSpeed"),
            Some(&Value::integer(7))
        );
        assert!(engine.get_mut(&mut unit, "Nope.Nope").is_none());
    }

    #[test]
    fn test_to_module_path() {
        let unit = unit();
        let engine = PathEngine::new();
        assert_eq!(
            engine.to_module_path(&unit, "ModulesDescriptors[1].TagSet[0]").as_deref(),
            Some("TMobilityModuleDescriptor.TagSet[0]")
        );
        assert_eq!(
            engine.to_module_path(&unit, "ModulesDescriptors[0]").as_deref(),
            Some("TTagsModuleDescriptor")
        );
        // second module of its type is not addressable by type
        assert!(engine.to_module_path(&unit, "ModulesDescriptors[2].MaxSpeed").is_none());
        assert!(engine.to_module_path(&unit, "ModulesDescriptors[3]").is_none());
        assert!(engine.to_module_path(&unit, "ClassNameForDebug").is_none());
    }

    #[test]
    fn test_modules_first_per_type() {
        let unit = unit();
        let modules = PathEngine::new().modules(&unit);
        let types: Vec<&str> = modules.keys().map(String::as_str).collect();
        assert_eq!(types, vec!["TTagsModuleDescriptor", "TMobilityModuleDescriptor"]);
        assert_eq!(modules["TTagsModuleDescriptor"].get("MaxSpeed"), Some(&Value::integer(1)));

        let bare = Object::new("TEntityDescriptor");
        assert!(PathEngine::new().modules(&bare).is_empty());
    }

    #[test]
    fn test_custom_modules_property() {
        let mut object = Object::new("TDepictionDescriptor");
        let mut array = Array::new();
        array.push(module("TSubDepictionModule", 4), false);
        object.insert("Operators", Value::new(ValueKind::Array(array)));
        let engine = PathEngine::with_modules_property("Operators");
        assert_eq!(engine.get(&object, "TSubDepictionModule.MaxSpeed"), Some(&Value::integer(4)));
        assert!(PathEngine::new().get(&object, "TSubDepictionModule.MaxSpeed").is_none());
    }
}
