//! Template synthesis from first-seen examples.
//!
//! A template is an Object holding every property ever observed on a type,
//! each with a representative value taken from the first example. Values
//! are generalized so that cloning a template never copies a live
//! identifier and textual references keep their reference kind.

use indexmap::IndexMap;

use crate::model::{is_guid_literal, Array, ArrayItem, Entry, Object, Value, ValueKind, PLACEHOLDER_GUID};

/// Builds the template object of `type_name` from its first-seen entries.
pub fn synthesize(type_name: &str, examples: &IndexMap<String, Entry>) -> Object {
    let mut template = Object::new(type_name);
    for (name, entry) in examples {
        template.insert_entry(name.clone(), representative(&entry.value), entry.comma);
    }
    template
}

/// Generalizes one example value, keeping its layout.
pub fn representative(value: &Value) -> Value {
    let kind = match &value.kind {
        ValueKind::Guid(_) => ValueKind::Guid(PLACEHOLDER_GUID.to_string()),
        ValueKind::String { value: text, .. } if is_guid_literal(text) => {
            ValueKind::Guid(PLACEHOLDER_GUID.to_string())
        }
        ValueKind::String { value: text, .. } => {
            classify_text(text).unwrap_or_else(|| value.kind.clone())
        }
        ValueKind::Array(array) => ValueKind::Array(Array {
            items: array
                .items
                .iter()
                .map(|item| ArrayItem {
                    value: representative(&item.value),
                    comma: item.comma,
                })
                .collect(),
            multiline: array.multiline,
        }),
        ValueKind::Object(object) => {
            let mut nested = Object::new(object.type_name.clone());
            nested.name = object.name.clone();
            nested.exported = object.exported;
            for (name, entry) in &object.properties {
                nested.insert_entry(name.clone(), representative(&entry.value), entry.comma);
            }
            ValueKind::Object(nested)
        }
        ValueKind::Number { .. }
        | ValueKind::Boolean(_)
        | ValueKind::TemplateRef(_)
        | ValueKind::ResourceRef(_)
        | ValueKind::Enum(_) => value.kind.clone(),
    };
    Value::with_layout(kind, value.layout.clone())
}

/// Reinterprets text that is really a reference or an enum tag.
///
/// `~/` and `./` mark template references, `$/` resource references.
pub fn classify_text(text: &str) -> Option<ValueKind> {
    if text.starts_with("~/") || text.starts_with("./") {
        return Some(ValueKind::TemplateRef(text.to_string()));
    }
    if text.starts_with("$/") {
        return Some(ValueKind::ResourceRef(text.to_string()));
    }
    if looks_like_enum(text) {
        return Some(ValueKind::Enum(text.to_string()));
    }
    None
}

/// An enum tag contains a `/` and either starts with the enum sigil
/// (`E` followed by an upper-case letter) or names a `Family`.
pub fn looks_like_enum(text: &str) -> bool {
    text.contains('/') && (has_enum_sigil(text) || text.contains("Family"))
}

fn has_enum_sigil(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('E'), Some(c)) if c.is_ascii_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Layout, QuoteStyle, ValueType};

    #[test]
    fn test_identifiers_become_placeholders() {
        let guid = representative(&Value::guid("GUID:{12345678-aaaa-bbbb-cccc-1234567890ab}"));
        assert_eq!(guid, Value::guid(PLACEHOLDER_GUID));

        let text = representative(&Value::string("GUID:{12345678-aaaa-bbbb-cccc-1234567890ab}"));
        assert_eq!(text.value_type(), ValueType::Guid);
        assert_eq!(text.as_str(), Some(PLACEHOLDER_GUID));
    }

    #[test]
    fn test_reference_and_enum_text_reclassified() {
        assert_eq!(
            representative(&Value::string("~/Descriptor_Unit_X")).value_type(),
            ValueType::TemplateRef
        );
        assert_eq!(
            representative(&Value::quoted("$/GFX/Unit/X", QuoteStyle::Double)).value_type(),
            ValueType::ResourceRef
        );
        assert_eq!(
            representative(&Value::string("ECoalition/Allied")).value_type(),
            ValueType::Enum
        );
        assert_eq!(
            representative(&Value::string("WeaponFamily/Rifle")).value_type(),
            ValueType::Enum
        );
        assert_eq!(representative(&Value::string("Unit_X")).value_type(), ValueType::String);
        assert_eq!(representative(&Value::string("Eastern/Front")).value_type(), ValueType::String);
        assert_eq!(representative(&Value::string("EFactory")).value_type(), ValueType::String);
    }

    #[test]
    fn test_representative_recurses_and_keeps_layout() {
        let mut inner = Object::new("TDamageDescriptor");
        inner.insert("Id", Value::guid("GUID:{1}"));
        let mut list = Value::array(vec![Value::string("~/A"), Value::object(inner)]);
        list.layout = Layout::with_prefix(" ");

        let result = representative(&list);
        assert_eq!(result.layout.prefix, " ");
        let array = result.as_array().unwrap();
        assert_eq!(array.get(0).unwrap().value_type(), ValueType::TemplateRef);
        assert_eq!(array.items[1].value.layout.prefix, " ");
        let nested = array.get(1).unwrap().as_object().unwrap();
        assert_eq!(nested.get("Id"), Some(&Value::guid(PLACEHOLDER_GUID)));
    }

    #[test]
    fn test_synthesize_keeps_order_and_commas() {
        let mut examples = IndexMap::new();
        examples.insert("B".to_string(), Entry { value: Value::integer(2), comma: true });
        examples.insert("A".to_string(), Entry { value: Value::boolean(true), comma: false });
        let template = synthesize("TThing", &examples);
        assert_eq!(template.type_name, "TThing");
        assert!(template.name.is_none());
        let names: Vec<&str> = template.property_names().collect();
        assert_eq!(names, vec!["B", "A"]);
        assert!(template.properties["B"].comma);
    }
}
