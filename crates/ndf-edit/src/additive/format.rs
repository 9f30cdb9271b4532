//! Layout rules for values spliced into an existing tree.
//!
//! Appended elements follow the shape of the array they land in: one per
//! line for multi-line or long arrays, space-separated otherwise. Commas are
//! kept consistent so the writer never emits `a b` or a trailing `c,`.

use crate::config::EditOptions;
use crate::model::{Array, ArrayItem, Value, ValueKind};

/// Prefix for an element appended to `array`.
///
/// On its own line the element reuses the last element's line break and
/// indentation, falling back to the configured indent. The first element
/// of an empty single-line array gets no prefix.
pub fn element_prefix(array: &Array, options: &EditOptions) -> String {
    if array.multiline || array.len() > options.multiline_threshold {
        match array.last() {
            Some(last) if last.value.layout.prefix.starts_with('\n') => {
                last.value.layout.prefix.clone()
            }
            _ => format!("\n{}", options.element_indent),
        }
    } else if array.is_empty() {
        String::new()
    } else {
        " ".to_string()
    }
}

/// Appends `value` as the new last element and returns its index.
///
/// The element's prefix is replaced by [`element_prefix`]; its suffix is
/// kept. The previous last element becomes comma-terminated.
pub fn append_element(array: &mut Array, value: Value, options: &EditOptions) -> usize {
    let mut value = value;
    value.layout.prefix = element_prefix(array, options);
    if let Some(last) = array.items.last_mut() {
        last.comma = true;
    }
    array.items.push(ArrayItem { value, comma: false });
    array.items.len() - 1
}

/// Removes the element at `index`, returning it.
///
/// The new last element loses its comma, and a removed first element hands
/// its prefix to its successor.
pub fn remove_element(array: &mut Array, index: usize) -> Option<Value> {
    if index >= array.items.len() {
        return None;
    }
    let removed = array.items.remove(index);
    if index == 0 {
        if let Some(first) = array.items.first_mut() {
            first.value.layout.prefix = removed.value.layout.prefix.clone();
        }
    }
    if let Some(last) = array.items.last_mut() {
        last.comma = false;
    }
    Some(removed.value)
}

/// Makes a replacement text look like the text it replaces.
///
/// A String replacing a String keeps the old quote style. A value without
/// layout inherits the old layout.
pub fn conform(old: &Value, new: Value) -> Value {
    let mut new = new;
    if let (
        ValueKind::String { quote: old_quote, .. },
        ValueKind::String { quote: new_quote, .. },
    ) = (&old.kind, &mut new.kind)
    {
        *new_quote = *old_quote;
        new.layout = old.layout.clone();
    }
    if new.layout.is_empty() {
        new.layout = old.layout.clone();
    }
    new
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Layout, QuoteStyle};

    fn options() -> EditOptions {
        EditOptions::default().with_element_indent("    ")
    }

    #[test]
    fn test_short_single_line_append() {
        let mut array = Array::from_values(vec![Value::integer(1), Value::integer(2)]);
        let index = append_element(&mut array, Value::integer(3), &options());
        assert_eq!(index, 2);
        assert_eq!(array.items[2].value.layout.prefix, " ");
        assert!(array.items[1].comma);
        assert!(!array.items[2].comma);
    }

    #[test]
    fn test_long_array_append_goes_on_new_line() {
        let mut array = Array::from_values((0..4).map(Value::integer).collect());
        append_element(&mut array, Value::integer(4), &options());
        assert_eq!(array.items[4].value.layout.prefix, "\n    ");
        assert!(array.items[3].comma);
    }

    #[test]
    fn test_multiline_array_append_goes_on_new_line() {
        let mut array = Array::from_values(vec![Value::integer(1)]);
        array.multiline = true;
        append_element(&mut array, Value::integer(2), &options());
        assert_eq!(array.items[1].value.layout.prefix, "\n    ");
    }

    #[test]
    fn test_multiline_append_follows_sibling_indent() {
        let mut array = Array::from_values(vec![Value::integer(1), Value::integer(2)]);
        array.multiline = true;
        for item in &mut array.items {
            item.value.layout.prefix = "\n\t\t".to_string();
        }
        append_element(&mut array, Value::integer(3), &options());
        assert_eq!(array.items[2].value.layout.prefix, "\n\t\t");
    }

    #[test]
    fn test_empty_array_append() {
        let mut array = Array::new();
        let index = append_element(&mut array, Value::string("x"), &options());
        assert_eq!(index, 0);
        assert_eq!(array.items[0].value.layout.prefix, "");
        assert!(!array.items[0].comma);
    }

    #[test]
    fn test_remove_last_clears_comma() {
        let mut array = Array::from_values(vec![Value::integer(1), Value::integer(2), Value::integer(3)]);
        assert_eq!(remove_element(&mut array, 2), Some(Value::integer(3)));
        assert_eq!(array.len(), 2);
        assert!(!array.items[1].comma);
        assert!(array.items[0].comma);
        assert_eq!(remove_element(&mut array, 5), None);
    }

    #[test]
    fn test_remove_first_hands_over_prefix() {
        let mut array = Array::from_values(vec![Value::integer(1), Value::integer(2)]);
        remove_element(&mut array, 0);
        assert_eq!(array.items[0].value.layout.prefix, "");
        assert!(!array.items[0].comma);
    }

    #[test]
    fn test_conform_keeps_quote_and_layout() {
        let old = Value::with_layout(
            ValueKind::String {
                value: "Old".into(),
                quote: QuoteStyle::Double,
            },
            Layout::with_prefix(" "),
        );
        let new = conform(&old, Value::string("New"));
        assert_eq!(new, Value::quoted("New", QuoteStyle::Double));
        assert_eq!(new.layout.prefix, " ");

        let number = conform(&old, Value::integer(4));
        assert_eq!(number.layout.prefix, " ");
    }
}
