//! Editing and inference options, plus the conventional property names.

use lazy_static::lazy_static;
use rustc_hash::FxHashSet;

/// Property holding a descriptor's unique identifier; regenerated on clone.
pub const DESCRIPTOR_ID: &str = "DescriptorId";

/// Array property holding an object's modules.
pub const MODULES_DESCRIPTORS: &str = "ModulesDescriptors";

lazy_static! {
    /// Property names that carry meaning across the corpus. They are not
    /// validated specially; callers use them to highlight or sort.
    static ref CONVENTIONAL_PROPERTIES: FxHashSet<&'static str> = [
        DESCRIPTOR_ID,
        MODULES_DESCRIPTORS,
        "Name",
        "ClassNameForDebug",
        "TagSet",
        "Coalition",
        "Factory",
    ]
    .into_iter()
    .collect();
}

/// Returns true for conventionally significant property names.
pub fn is_conventional_property(name: &str) -> bool {
    CONVENTIONAL_PROPERTIES.contains(name)
}

/// Enum literals known before any corpus is loaded.
pub const BOOTSTRAP_ENUMS: &[&str] = &[
    "ECoalition/Allied",
    "ECoalition/Axis",
    "ECoalition/None",
    "EFactory/Logistic",
    "EFactory/Infantry",
    "EFactory/Art",
    "EFactory/Tanks",
    "EFactory/Recons",
    "EFactory/AT",
    "EFactory/Helis",
    "EFactory/Planes",
    "EFactory/DCA",
    "EProjectileType/Balle",
    "EProjectileType/Obus",
    "EProjectileType/Roquette",
    "EProjectileType/Missile",
    "EProjectileType/Bombe",
    "EMovementType/Wheel",
    "EMovementType/Track",
    "EMovementType/Foot",
    "EMovementType/Helicopter",
    "EMovementType/Airplane",
    "True",
    "False",
];

/// Options for the schema/template inference engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaOptions {
    /// A nested type whose name contains any of these markers, and which
    /// never appears at the top level, is treated as a module type.
    pub module_markers: Vec<String>,
    /// Enum literals seeded before learning.
    pub bootstrap_enums: Vec<String>,
}

impl SchemaOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the module-name markers.
    pub fn with_module_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.module_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Returns true if `type_name` looks like a module type by name alone.
    pub fn matches_module_name(&self, type_name: &str) -> bool {
        self.module_markers
            .iter()
            .any(|marker| !marker.is_empty() && type_name.contains(marker.as_str()))
    }
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            module_markers: vec!["ModuleDescriptor".to_string(), "Module".to_string()],
            bootstrap_enums: BOOTSTRAP_ENUMS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Options for path resolution and additive operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOptions {
    /// Array property holding modules.
    pub modules_property: String,
    /// Property regenerated with a fresh identifier on every clone.
    pub descriptor_id_property: String,
    /// Arrays with more elements than this get appended elements on their
    /// own line even when written single-line.
    pub multiline_threshold: usize,
    /// Indentation written after the newline of a multi-line element.
    pub element_indent: String,
}

impl EditOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation used for multi-line array elements.
    pub fn with_element_indent(mut self, indent: impl Into<String>) -> Self {
        self.element_indent = indent.into();
        self
    }
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            modules_property: MODULES_DESCRIPTORS.to_string(),
            descriptor_id_property: DESCRIPTOR_ID.to_string(),
            multiline_threshold: 3,
            element_indent: "        ".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conventional_properties() {
        assert!(is_conventional_property("DescriptorId"));
        assert!(is_conventional_property("TagSet"));
        assert!(!is_conventional_property("MaxSpeed"));
    }

    #[test]
    fn test_module_markers_configurable() {
        let options = SchemaOptions::default();
        assert!(options.matches_module_name("TTagsModuleDescriptor"));
        assert!(options.matches_module_name("TDamageModule"));
        assert!(!options.matches_module_name("TEntityDescriptor"));

        let custom = SchemaOptions::new().with_module_markers(["Facet"]);
        assert!(custom.matches_module_name("TMobilityFacet"));
        assert!(!custom.matches_module_name("TTagsModuleDescriptor"));

        let none = SchemaOptions::new().with_module_markers(Vec::<String>::new());
        assert!(!none.matches_module_name("TTagsModuleDescriptor"));
    }

    #[test]
    fn test_edit_defaults() {
        let options = EditOptions::default();
        assert_eq!(options.modules_property, MODULES_DESCRIPTORS);
        assert_eq!(options.multiline_threshold, 3);
        assert_eq!(EditOptions::new().with_element_indent("\t").element_indent, "\t");
    }
}
