//! The top-level declaration list of one NDF file.

use crate::model::Object;

/// Ordered top-level objects of a file, as handed over by the parser.
///
/// Order is significant: it is the order the writer emits declarations in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub objects: Vec<Object>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing declaration list.
    pub fn from_objects(objects: Vec<Object>) -> Self {
        Self { objects }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Index of the object whose instance name matches exactly.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.objects
            .iter()
            .position(|object| object.name.as_deref() == Some(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn find(&self, name: &str) -> Option<&Object> {
        self.objects
            .iter()
            .find(|object| object.name.as_deref() == Some(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Object> {
        self.objects
            .iter_mut()
            .find(|object| object.name.as_deref() == Some(name))
    }

    /// Inserts an object at `index`, clamped to the end of the list.
    pub fn insert(&mut self, index: usize, object: Object) {
        let index = index.min(self.objects.len());
        self.objects.insert(index, object);
    }

    /// Instance names in file order; anonymous objects are skipped.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.objects.iter().filter_map(|object| object.name.as_deref())
    }

    /// Objects of the given type, in file order.
    pub fn objects_of_type<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a Object> {
        self.objects
            .iter()
            .filter(move |object| object.type_name == type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::from_objects(vec![
            Object::named("TEntityDescriptor", "Descriptor_Unit_A"),
            Object::named("TWeaponManagerModuleDescriptor", "WeaponDescriptor_A"),
            Object::named("TEntityDescriptor", "Descriptor_Unit_B"),
        ])
    }

    #[test]
    fn test_lookup_by_exact_name() {
        let doc = doc();
        assert_eq!(doc.position("Descriptor_Unit_B"), Some(2));
        assert!(doc.contains("WeaponDescriptor_A"));
        assert!(!doc.contains("descriptor_unit_a"));
        assert_eq!(doc.find("Descriptor_Unit_A").unwrap().type_name, "TEntityDescriptor");
    }

    #[test]
    fn test_insert_front_and_clamped() {
        let mut doc = doc();
        doc.insert(0, Object::named("TEntityDescriptor", "First"));
        doc.insert(99, Object::named("TEntityDescriptor", "Last"));
        let names: Vec<&str> = doc.names().collect();
        assert_eq!(names.first(), Some(&"First"));
        assert_eq!(names.last(), Some(&"Last"));
        assert_eq!(doc.objects_of_type("TEntityDescriptor").count(), 4);
    }
}
