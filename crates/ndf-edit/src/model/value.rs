//! Value types for NDF trees.
//!
//! Every node carries its own [`Layout`] and every container slot its own
//! trailing-comma flag, so structural edits set formatting explicitly
//! instead of the writer having to guess it.

use std::fmt;

use indexmap::IndexMap;

/// Raw text emitted verbatim before and after a value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Layout {
    /// Text written before the value (whitespace, line breaks, comments).
    pub prefix: String,
    /// Text written after the value, before any comma.
    pub suffix: String,
}

impl Layout {
    /// Creates a layout from a prefix and a suffix.
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Creates a layout with only a prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self::new(prefix, "")
    }

    /// Returns true if neither prefix nor suffix carries text.
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.suffix.is_empty()
    }
}

/// Discriminant of [`ValueKind`], used as the observed "variant" in schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Array,
    Object,
    TemplateRef,
    ResourceRef,
    Guid,
    Enum,
}

impl ValueType {
    /// Returns a lowercase name for messages.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::Array => "array",
            ValueType::Object => "object",
            ValueType::TemplateRef => "template reference",
            ValueType::ResourceRef => "resource reference",
            ValueType::Guid => "guid",
            ValueType::Enum => "enum",
        }
    }
}

/// Quoting used by a string literal in the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuoteStyle {
    /// `'text'`
    #[default]
    Single,
    /// `"text"`
    Double,
}

impl QuoteStyle {
    /// Returns the quote character.
    pub fn quote(self) -> char {
        match self {
            QuoteStyle::Single => '\'',
            QuoteStyle::Double => '"',
        }
    }
}

/// The payload of a value.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    /// Quoted text.
    String { value: String, quote: QuoteStyle },

    /// Numeric literal; `is_int` records whether it was written without a
    /// fractional part.
    Number { value: f64, is_int: bool },

    /// `True` / `False`.
    Boolean(bool),

    /// `[ ... ]`
    Array(Array),

    /// `TType ( ... )`
    Object(Object),

    /// Reference to another declaration, e.g. `~/Descriptor_Unit_Foo`.
    TemplateRef(String),

    /// Reference to an external resource, e.g. `$/GFX/Unit/Foo`.
    ResourceRef(String),

    /// Identifier literal, e.g. `GUID:{...}`.
    Guid(String),

    /// Enumeration tag, e.g. `ECoalition/Allied`.
    Enum(String),
}

/// A node of the NDF tree: payload plus layout.
#[derive(Debug, Clone, Default)]
pub struct Value {
    pub kind: ValueKind,
    pub layout: Layout,
}

impl Default for ValueKind {
    fn default() -> Self {
        ValueKind::Boolean(false)
    }
}

/// Equality ignores layout: two values are equal when their payloads are.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Value {
    /// Creates a value with an empty layout.
    pub fn new(kind: ValueKind) -> Self {
        Self {
            kind,
            layout: Layout::default(),
        }
    }

    /// Creates a value with the given layout.
    pub fn with_layout(kind: ValueKind, layout: Layout) -> Self {
        Self { kind, layout }
    }

    /// Single-quoted string.
    pub fn string(value: impl Into<String>) -> Self {
        Self::quoted(value, QuoteStyle::Single)
    }

    /// String with explicit quoting.
    pub fn quoted(value: impl Into<String>, quote: QuoteStyle) -> Self {
        Self::new(ValueKind::String {
            value: value.into(),
            quote,
        })
    }

    /// Floating point number.
    pub fn number(value: f64) -> Self {
        Self::new(ValueKind::Number {
            value,
            is_int: false,
        })
    }

    /// Integer number.
    pub fn integer(value: i64) -> Self {
        Self::new(ValueKind::Number {
            value: value as f64,
            is_int: true,
        })
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(ValueKind::Boolean(value))
    }

    pub fn guid(value: impl Into<String>) -> Self {
        Self::new(ValueKind::Guid(value.into()))
    }

    pub fn enumeration(value: impl Into<String>) -> Self {
        Self::new(ValueKind::Enum(value.into()))
    }

    pub fn template_ref(value: impl Into<String>) -> Self {
        Self::new(ValueKind::TemplateRef(value.into()))
    }

    pub fn resource_ref(value: impl Into<String>) -> Self {
        Self::new(ValueKind::ResourceRef(value.into()))
    }

    /// Single-line array; every element but the last is comma-terminated and
    /// every element after the first is separated by one space.
    pub fn array(values: Vec<Value>) -> Self {
        Self::new(ValueKind::Array(Array::from_values(values)))
    }

    pub fn object(object: Object) -> Self {
        Self::new(ValueKind::Object(object))
    }

    /// Returns the discriminant of this value.
    pub fn value_type(&self) -> ValueType {
        match &self.kind {
            ValueKind::String { .. } => ValueType::String,
            ValueKind::Number { .. } => ValueType::Number,
            ValueKind::Boolean(_) => ValueType::Boolean,
            ValueKind::Array(_) => ValueType::Array,
            ValueKind::Object(_) => ValueType::Object,
            ValueKind::TemplateRef(_) => ValueType::TemplateRef,
            ValueKind::ResourceRef(_) => ValueType::ResourceRef,
            ValueKind::Guid(_) => ValueType::Guid,
            ValueKind::Enum(_) => ValueType::Enum,
        }
    }

    /// Returns the numeric payload, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self.kind {
            ValueKind::Number { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.kind {
            ValueKind::Boolean(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the textual payload of string, reference, guid and enum values.
    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::String { value, .. }
            | ValueKind::TemplateRef(value)
            | ValueKind::ResourceRef(value)
            | ValueKind::Guid(value)
            | ValueKind::Enum(value) => Some(value),
            ValueKind::Number { .. }
            | ValueKind::Boolean(_)
            | ValueKind::Array(_)
            | ValueKind::Object(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match &self.kind {
            ValueKind::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match &mut self.kind {
            ValueKind::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match &self.kind {
            ValueKind::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match &mut self.kind {
            ValueKind::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Duplicates this value and everything below it.
    ///
    /// The copy shares nothing with the source. The root's layout is reset
    /// to empty so the caller places the copy explicitly; nested layout and
    /// comma flags are kept so the copy stays well-formed.
    pub fn deep_copy(&self) -> Value {
        let kind = match &self.kind {
            ValueKind::Array(array) => ValueKind::Array(array.deep_copy()),
            ValueKind::Object(object) => ValueKind::Object(object.deep_copy()),
            leaf => leaf.clone(),
        };
        Value::new(kind)
    }

    /// Calls `f` on this value and every value nested below it, depth first.
    pub fn visit<F: FnMut(&Value)>(&self, f: &mut F) {
        f(self);
        match &self.kind {
            ValueKind::Array(array) => {
                for item in &array.items {
                    item.value.visit(f);
                }
            }
            ValueKind::Object(object) => object.visit_values(f),
            _ => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValueKind::String { value, quote } => {
                let q = quote.quote();
                write!(f, "{q}{value}{q}")
            }
            ValueKind::Number { value, is_int } => {
                if *is_int && value.fract() == 0.0 && value.is_finite() {
                    write!(f, "{}", *value as i64)
                } else {
                    write!(f, "{value}")
                }
            }
            ValueKind::Boolean(true) => f.write_str("True"),
            ValueKind::Boolean(false) => f.write_str("False"),
            ValueKind::Array(array) => {
                f.write_str("[")?;
                for (i, item) in array.items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item.value)?;
                }
                f.write_str("]")
            }
            ValueKind::Object(object) => {
                write!(f, "{}(", object.type_name)?;
                for (i, (name, entry)) in object.properties.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name} = {}", entry.value)?;
                }
                f.write_str(")")
            }
            ValueKind::TemplateRef(text)
            | ValueKind::ResourceRef(text)
            | ValueKind::Guid(text)
            | ValueKind::Enum(text) => f.write_str(text),
        }
    }
}

/// One array slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayItem {
    pub value: Value,
    /// Whether a comma follows this element.
    pub comma: bool,
}

/// An ordered list of values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array {
    pub items: Vec<ArrayItem>,
    /// Whether the source wrote one element per line.
    pub multiline: bool,
}

impl Array {
    /// Creates an empty single-line array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a single-line array: commas after all but the last element,
    /// one space before every element but the first.
    pub fn from_values(values: Vec<Value>) -> Self {
        let count = values.len();
        let items = values
            .into_iter()
            .enumerate()
            .map(|(i, mut value)| {
                if i > 0 && value.layout.prefix.is_empty() {
                    value.layout.prefix = " ".to_string();
                }
                ArrayItem {
                    value,
                    comma: i + 1 < count,
                }
            })
            .collect();
        Self {
            items,
            multiline: false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index).map(|item| &item.value)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index).map(|item| &mut item.value)
    }

    /// Appends a raw slot without touching the formatting of other elements.
    pub fn push(&mut self, value: Value, comma: bool) {
        self.items.push(ArrayItem { value, comma });
    }

    pub fn last(&self) -> Option<&ArrayItem> {
        self.items.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter().map(|item| &item.value)
    }

    /// Duplicates every element; see [`Value::deep_copy`].
    pub fn deep_copy(&self) -> Array {
        Array {
            items: self
                .items
                .iter()
                .map(|item| ArrayItem {
                    value: copy_keeping_layout(&item.value),
                    comma: item.comma,
                })
                .collect(),
            multiline: self.multiline,
        }
    }
}

/// One object property slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub value: Value,
    /// Whether a comma follows this property.
    pub comma: bool,
}

/// A typed declaration: `[export] Name is TType ( ... )` at the top level,
/// or `TType ( ... )` when nested.
///
/// Equality is order-sensitive over properties.
#[derive(Debug, Clone)]
pub struct Object {
    pub type_name: String,
    /// Instance name; present for top-level declarations.
    pub name: Option<String>,
    pub exported: bool,
    /// Properties in source order.
    pub properties: IndexMap<String, Entry>,
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
            && self.name == other.name
            && self.exported == other.exported
            && self.properties.iter().eq(other.properties.iter())
    }
}

impl Object {
    /// Creates an anonymous, unexported object with no properties.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: None,
            exported: false,
            properties: IndexMap::new(),
        }
    }

    /// Creates a named object.
    pub fn named(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        let mut object = Self::new(type_name);
        object.name = Some(name.into());
        object
    }

    /// Name used to key modification records: the instance name, or the
    /// type name for anonymous objects.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.type_name)
    }

    pub fn get(&self, property: &str) -> Option<&Value> {
        self.properties.get(property).map(|entry| &entry.value)
    }

    pub fn get_mut(&mut self, property: &str) -> Option<&mut Value> {
        self.properties.get_mut(property).map(|entry| &mut entry.value)
    }

    pub fn contains(&self, property: &str) -> bool {
        self.properties.contains_key(property)
    }

    /// Sets a property without a trailing comma, returning the previous entry.
    ///
    /// Replacing keeps the property's position.
    pub fn insert(&mut self, property: impl Into<String>, value: Value) -> Option<Entry> {
        self.insert_entry(property, value, false)
    }

    /// Sets a property with an explicit comma flag, returning the previous entry.
    pub fn insert_entry(
        &mut self,
        property: impl Into<String>,
        value: Value,
        comma: bool,
    ) -> Option<Entry> {
        self.properties
            .insert(property.into(), Entry { value, comma })
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Duplicates every property; see [`Value::deep_copy`].
    pub fn deep_copy(&self) -> Object {
        Object {
            type_name: self.type_name.clone(),
            name: self.name.clone(),
            exported: self.exported,
            properties: self
                .properties
                .iter()
                .map(|(name, entry)| {
                    (
                        name.clone(),
                        Entry {
                            value: copy_keeping_layout(&entry.value),
                            comma: entry.comma,
                        },
                    )
                })
                .collect(),
        }
    }

    /// Calls `f` on every property value and everything below it.
    pub fn visit_values<F: FnMut(&Value)>(&self, f: &mut F) {
        for entry in self.properties.values() {
            entry.value.visit(f);
        }
    }

    /// Calls `f` on every property of this object and of every object nested
    /// below it, with mutable access to the value.
    pub fn visit_properties_mut<F: FnMut(&str, &mut Value)>(&mut self, f: &mut F) {
        for (name, entry) in self.properties.iter_mut() {
            f(name, &mut entry.value);
            visit_nested_mut(&mut entry.value, f);
        }
    }
}

fn visit_nested_mut<F: FnMut(&str, &mut Value)>(value: &mut Value, f: &mut F) {
    match &mut value.kind {
        ValueKind::Array(array) => {
            for item in &mut array.items {
                visit_nested_mut(&mut item.value, f);
            }
        }
        ValueKind::Object(object) => object.visit_properties_mut(f),
        _ => {}
    }
}

fn copy_keeping_layout(value: &Value) -> Value {
    let mut copy = value.deep_copy();
    copy.layout = value.layout.clone();
    copy
}

/// A plain Rust value supplied by a caller, converted into the matching
/// NDF variant by [`NativeValue::into_value`].
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Text(String),
    Number(f64),
    Integer(i64),
    Bool(bool),
    /// Homogeneous list of text, becomes an array of double-quoted strings.
    TextList(Vec<String>),
    /// An already-built value, used as is.
    Value(Value),
}

impl NativeValue {
    /// Maps to the NDF variant: text to String, numbers to Number, booleans
    /// to Boolean, text lists to a single-line Array of String.
    pub fn into_value(self) -> Value {
        match self {
            NativeValue::Text(text) => Value::string(text),
            NativeValue::Number(n) => Value::number(n),
            NativeValue::Integer(n) => Value::integer(n),
            NativeValue::Bool(b) => Value::boolean(b),
            NativeValue::TextList(list) => Value::array(
                list.into_iter()
                    .map(|text| Value::quoted(text, QuoteStyle::Double))
                    .collect(),
            ),
            NativeValue::Value(value) => value,
        }
    }
}

impl From<&str> for NativeValue {
    fn from(s: &str) -> Self {
        NativeValue::Text(s.to_string())
    }
}

impl From<String> for NativeValue {
    fn from(s: String) -> Self {
        NativeValue::Text(s)
    }
}

impl From<f64> for NativeValue {
    fn from(n: f64) -> Self {
        NativeValue::Number(n)
    }
}

impl From<i64> for NativeValue {
    fn from(n: i64) -> Self {
        NativeValue::Integer(n)
    }
}

impl From<i32> for NativeValue {
    fn from(n: i32) -> Self {
        NativeValue::Integer(i64::from(n))
    }
}

impl From<bool> for NativeValue {
    fn from(b: bool) -> Self {
        NativeValue::Bool(b)
    }
}

impl From<Vec<String>> for NativeValue {
    fn from(list: Vec<String>) -> Self {
        NativeValue::TextList(list)
    }
}

impl From<Vec<&str>> for NativeValue {
    fn from(list: Vec<&str>) -> Self {
        NativeValue::TextList(list.into_iter().map(str::to_string).collect())
    }
}

impl From<Value> for NativeValue {
    fn from(value: Value) -> Self {
        NativeValue::Value(value)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn sample_object() -> Object {
        let mut tags = Value::array(vec![
            Value::quoted("Infantry", QuoteStyle::Double),
            Value::quoted("Elite", QuoteStyle::Double),
        ]);
        tags.layout = Layout::with_prefix(" ");
        let mut object = Object::named("TEntityDescriptor", "Descriptor_Unit_Rifles");
        object.insert_entry("ClassNameForDebug", Value::string("Unit_Rifles"), false);
        object.insert_entry("TagSet", tags, false);
        object
    }

    #[test]
    fn test_value_type_discriminants() {
        assert_eq!(Value::string("a").value_type(), ValueType::String);
        assert_eq!(Value::integer(3).value_type(), ValueType::Number);
        assert_eq!(Value::enumeration("ECoalition/Allied").value_type(), ValueType::Enum);
        assert_eq!(Value::object(Object::new("T")).value_type(), ValueType::Object);
        assert_eq!(ValueType::TemplateRef.name(), "template reference");
    }

    #[test]
    fn test_array_from_values_commas() {
        let array = Array::from_values(vec![Value::integer(1), Value::integer(2), Value::integer(3)]);
        let commas: Vec<bool> = array.items.iter().map(|i| i.comma).collect();
        assert_eq!(commas, vec![true, true, false]);
        assert_eq!(array.items[0].value.layout.prefix, "");
        assert_eq!(array.items[1].value.layout.prefix, " ");
        assert!(!array.multiline);
    }

    #[test]
    fn test_deep_copy_resets_root_layout_only() {
        let mut value = Value::object(sample_object());
        value.layout = Layout::new("\n    ", "\n");

        let copy = value.deep_copy();
        assert!(copy.layout.is_empty());
        assert_eq!(copy, value);

        let tags = copy.as_object().unwrap().get("TagSet").unwrap();
        assert_eq!(tags.layout.prefix, " ");
    }

    #[test]
    fn test_equality_ignores_layout() {
        let a = Value::with_layout(ValueKind::Boolean(true), Layout::with_prefix(" "));
        let b = Value::boolean(true);
        assert_eq!(a, b);
        assert_ne!(Value::integer(1), Value::boolean(true));
    }

    #[test]
    fn test_equality_sees_property_order() {
        let mut first = Object::new("TThing");
        first.insert("A", Value::integer(1));
        first.insert("B", Value::integer(2));
        let mut second = Object::new("TThing");
        second.insert("B", Value::integer(2));
        second.insert("A", Value::integer(1));
        assert_ne!(first, second);
        assert_ne!(Value::object(first.clone()), Value::object(second));
        assert_eq!(first.clone(), first);
    }

    #[test]
    fn test_insert_keeps_position() {
        let mut object = sample_object();
        object.insert("Extra", Value::integer(1));
        let previous = object.insert("ClassNameForDebug", Value::string("Renamed"));
        assert_eq!(previous.unwrap().value, Value::string("Unit_Rifles"));
        let names: Vec<&str> = object.property_names().collect();
        assert_eq!(names, vec!["ClassNameForDebug", "TagSet", "Extra"]);
    }

    #[test]
    fn test_native_conversion() {
        assert_eq!(NativeValue::from("x").into_value(), Value::string("x"));
        assert_eq!(NativeValue::from(4).into_value(), Value::integer(4));
        assert_eq!(NativeValue::from(2.5).into_value(), Value::number(2.5));
        assert_eq!(NativeValue::from(true).into_value(), Value::boolean(true));

        let list = NativeValue::from(vec!["A", "B", "C"]).into_value();
        let array = list.as_array().unwrap();
        assert_eq!(array.len(), 3);
        assert!(array.items[0].comma && array.items[1].comma && !array.items[2].comma);
        assert_eq!(array.get(0), Some(&Value::quoted("A", QuoteStyle::Double)));
    }

    #[test]
    fn test_display_literals() {
        assert_eq!(Value::integer(12).to_string(), "12");
        assert_eq!(Value::number(0.5).to_string(), "0.5");
        assert_eq!(Value::boolean(false).to_string(), "False");
        assert_eq!(Value::string("Tank").to_string(), "'Tank'");
        assert_eq!(
            NativeValue::from(vec!["a", "b"]).into_value().to_string(),
            "[\"a\", \"b\"]"
        );
        let mut object = Object::new("TModule");
        object.insert("Speed", Value::integer(3));
        assert_eq!(Value::object(object).to_string(), "TModule(Speed = 3)");
    }

    #[test]
    fn test_visit_properties_mut_reaches_nested() {
        let mut module = Object::new("TInnerModuleDescriptor");
        module.insert("DescriptorId", Value::guid("GUID:{a}"));
        let mut object = sample_object();
        object.insert("DescriptorId", Value::guid("GUID:{b}"));
        object.insert("ModulesDescriptors", Value::array(vec![Value::object(module)]));

        let mut seen = Vec::new();
        object.visit_properties_mut(&mut |name, value| {
            if name == "DescriptorId" {
                seen.push(value.to_string());
            }
        });
        assert_eq!(seen, vec!["GUID:{b}", "GUID:{a}"]);
    }

    fn leaf_strategy() -> impl Strategy<Value = Value> {
        prop_oneof![
            "[a-z]{0,8}".prop_map(Value::string),
            any::<i32>().prop_map(|n| Value::integer(i64::from(n))),
            any::<bool>().prop_map(Value::boolean),
            "E[A-Z][a-z]{1,6}/[A-Z][a-z]{1,6}".prop_map(Value::enumeration),
        ]
    }

    fn value_strategy() -> impl Strategy<Value = Value> {
        leaf_strategy().prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::array),
                prop::collection::vec(("[A-Z][a-z]{1,6}", inner), 0..4).prop_map(|props| {
                    let mut object = Object::new("TThing");
                    for (name, value) in props {
                        object.insert(name, value);
                    }
                    Value::object(object)
                }),
            ]
        })
    }

    fn mutate_containers(value: &mut Value) {
        match &mut value.kind {
            ValueKind::Array(array) => {
                for item in &mut array.items {
                    mutate_containers(&mut item.value);
                }
                array.push(Value::string("added"), false);
            }
            ValueKind::Object(object) => {
                for entry in object.properties.values_mut() {
                    mutate_containers(&mut entry.value);
                }
                object.insert("AddedByTest", Value::integer(-1));
            }
            _ => {}
        }
    }

    proptest! {
        #[test]
        fn deep_copy_is_isolated_from_source(source in value_strategy()) {
            let snapshot = source.clone();
            let mut copy = source.deep_copy();
            prop_assert_eq!(&copy, &source);

            mutate_containers(&mut copy);

            prop_assert_eq!(&source, &snapshot);
            if matches!(source.kind, ValueKind::Array(_) | ValueKind::Object(_)) {
                prop_assert_ne!(&copy, &source);
            }
        }
    }
}
