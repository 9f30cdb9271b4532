//! Writes through resolved paths.

use std::fmt;

use crate::error::EditError;
use crate::model::{Object, Value, ValueKind};
use crate::path::{normalize_path, PathEngine};
use crate::tracker::{ModificationKind, ModificationTracker};

/// Arithmetic applied by [`PathEngine::apply_numeric`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericOp {
    /// Replace with the operand.
    Set,
    /// Add the operand.
    Add,
    /// Multiply by the operand.
    Multiply,
}

impl NumericOp {
    /// Computes the new value from the current one.
    pub fn apply(self, current: f64, operand: f64) -> f64 {
        match self {
            NumericOp::Set => operand,
            NumericOp::Add => current + operand,
            NumericOp::Multiply => current * operand,
        }
    }
}

impl fmt::Display for NumericOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NumericOp::Set => "set",
            NumericOp::Add => "add",
            NumericOp::Multiply => "multiply",
        })
    }
}

impl PathEngine {
    /// Replaces the value at an existing location, returning the old value.
    ///
    /// A value with an empty layout inherits the layout of the value it
    /// replaces. Every call appends a record when a tracker is given, even
    /// when the new value equals the old one.
    pub fn set(
        &self,
        root: &mut Object,
        path: &str,
        value: Value,
        tracker: Option<&ModificationTracker>,
    ) -> Result<Value, EditError> {
        let object = root.display_name().to_string();
        let Some(target) = self.get_mut(root, path) else {
            tracing::warn!(object = %object, path, "set refused: path does not resolve");
            return Err(EditError::not_found(object, path));
        };

        let mut value = value;
        if value.layout.is_empty() {
            value.layout = target.layout.clone();
        }
        let old = std::mem::replace(target, value);
        let new = target.clone();

        tracing::debug!(object = %object, path, old = %old, new = %new, "value set");
        if let Some(tracker) = tracker {
            let description = format!("{path}: {old} -> {new}");
            tracker.record(
                object,
                normalize_path(path),
                Some(old.clone()),
                new,
                ModificationKind::ValueChanged,
                description,
            );
        }
        Ok(old)
    }

    /// Applies `op` with `operand` to the number at `path`, returning the
    /// new number.
    ///
    /// The literal stays an integer when it was one and the result is
    /// integral.
    pub fn apply_numeric(
        &self,
        root: &mut Object,
        path: &str,
        op: NumericOp,
        operand: f64,
        tracker: Option<&ModificationTracker>,
    ) -> Result<f64, EditError> {
        let object = root.display_name().to_string();
        let Some(target) = self.get_mut(root, path) else {
            tracing::warn!(object = %object, path, op = %op, "numeric update refused: path does not resolve");
            return Err(EditError::not_found(object, path));
        };

        let old = target.clone();
        let ValueKind::Number { value, is_int } = &mut target.kind else {
            tracing::warn!(object = %object, path, actual = ?old.value_type(), "numeric update refused: not a number");
            return Err(EditError::TypeMismatch {
                path: path.to_string(),
                expected: "number",
                actual: old.value_type(),
            });
        };

        let result = op.apply(*value, operand);
        if !result.is_finite() {
            return Err(EditError::invalid(format!(
                "{op} {operand} on {path} gives a non-finite result"
            )));
        }
        *value = result;
        *is_int = *is_int && result.fract() == 0.0;
        let new = target.clone();

        tracing::debug!(object = %object, path, op = %op, operand, old = %old, new = %new, "numeric update");
        if let Some(tracker) = tracker {
            let description = format!("{path}: {op} {operand} ({old} -> {new})");
            tracker.record(
                object,
                normalize_path(path),
                Some(old),
                new,
                ModificationKind::NumericAdjusted,
                description,
            );
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::{Layout, ValueType};

    fn unit() -> Object {
        let mut mobility = Object::new("TMobilityModuleDescriptor");
        mobility.insert(
            "MaxSpeed",
            Value::with_layout(
                ValueKind::Number { value: 60.0, is_int: true },
                Layout::with_prefix(" "),
            ),
        );
        mobility.insert("Factor", Value::number(1.5));
        let mut unit = Object::named("TEntityDescriptor", "Descriptor_Unit_Jeep");
        unit.insert("ClassNameForDebug", Value::string("Unit_Jeep"));
        unit.insert("ModulesDescriptors", Value::array(vec![Value::object(mobility)]));
        unit
    }

    #[test]
    fn test_set_then_get_roundtrip() {
        let mut unit = unit();
        let engine = PathEngine::new();
        let tracker = ModificationTracker::new();

        let old = engine
            .set(&mut unit, "ModulesDescriptors[0].MaxSpeed", Value::integer(80), Some(&tracker))
            .unwrap();
        assert_eq!(old, Value::integer(60));
        assert_eq!(engine.get(&unit, "ModulesDescriptors[0].MaxSpeed"), Some(&Value::integer(80)));

        let stored = engine.get(&unit, "ModulesDescriptors[0].MaxSpeed").unwrap();
        assert_eq!(stored.layout.prefix, " ");

        let record = tracker.latest("Descriptor_Unit_Jeep", "ModulesDescriptors[0].MaxSpeed").unwrap();
        assert_eq!(record.old_value(), Some(&Value::integer(60)));
        assert_eq!(record.new_value(), &Value::integer(80));
        assert_eq!(record.kind(), ModificationKind::ValueChanged);
    }

    #[test]
    fn test_set_via_module_path_and_variant_change() {
        let mut unit = unit();
        let engine = PathEngine::new();
        engine
            .set(&mut unit, "TMobilityModuleDescriptor.Factor", Value::string("fast"), None)
            .unwrap();
        assert_eq!(
            engine.get(&unit, "ModulesDescriptors[0].Factor"),
            Some(&Value::string("fast"))
        );
    }

    #[test]
    fn test_set_missing_path_fails_without_record() {
        let mut unit = unit();
        let before = unit.clone();
        let tracker = ModificationTracker::new();
        let err = PathEngine::new()
            .set(&mut unit, "ModulesDescriptors[4].MaxSpeed", Value::integer(1), Some(&tracker))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(unit, before);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_repeated_set_appends_each_time() {
        let mut unit = unit();
        let engine = PathEngine::new();
        let tracker = ModificationTracker::new();
        for _ in 0..3 {
            engine
                .set(&mut unit, "ClassNameForDebug", Value::string("Same"), Some(&tracker))
                .unwrap();
        }
        assert_eq!(tracker.len(), 3);
        assert_eq!(tracker.latest_records().len(), 1);
    }

    #[test]
    fn test_apply_numeric_ops() {
        let mut unit = unit();
        let engine = PathEngine::new();
        let path = "ModulesDescriptors[0].MaxSpeed";

        assert_eq!(engine.apply_numeric(&mut unit, path, NumericOp::Add, 5.0, None).unwrap(), 65.0);
        assert_eq!(engine.apply_numeric(&mut unit, path, NumericOp::Multiply, 2.0, None).unwrap(), 130.0);
        assert_eq!(engine.apply_numeric(&mut unit, path, NumericOp::Set, 10.0, None).unwrap(), 10.0);
        assert_eq!(engine.get(&unit, path).unwrap().to_string(), "10");

        engine.apply_numeric(&mut unit, path, NumericOp::Multiply, 0.25, None).unwrap();
        assert_eq!(
            engine.get(&unit, path).unwrap().kind,
            ValueKind::Number { value: 2.5, is_int: false }
        );
    }

    #[test]
    fn test_apply_numeric_records_change() {
        let mut unit = unit();
        let engine = PathEngine::new();
        let tracker = ModificationTracker::new();
        engine
            .apply_numeric(&mut unit, "TMobilityModuleDescriptor.Factor", NumericOp::Multiply, 2.0, Some(&tracker))
            .unwrap();
        let record = tracker.latest("Descriptor_Unit_Jeep", "TMobilityModuleDescriptor.Factor").unwrap();
        assert_eq!(record.kind(), ModificationKind::NumericAdjusted);
        assert_eq!(record.old_value(), Some(&Value::number(1.5)));
        assert_eq!(record.new_value().as_number(), Some(3.0));
    }

    #[test]
    fn test_apply_numeric_type_mismatch() {
        let mut unit = unit();
        let before = unit.clone();
        let err = PathEngine::new()
            .apply_numeric(&mut unit, "ClassNameForDebug", NumericOp::Add, 1.0, None)
            .unwrap_err();
        assert!(matches!(
            err,
            EditError::TypeMismatch { actual: ValueType::String, .. }
        ));
        assert_eq!(unit, before);
    }

    #[test]
    fn test_apply_numeric_rejects_non_finite() {
        let mut unit = unit();
        let err = PathEngine::new()
            .apply_numeric(&mut unit, "ModulesDescriptors[0].Factor", NumericOp::Multiply, f64::INFINITY, None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(
            PathEngine::new().get(&unit, "ModulesDescriptors[0].Factor"),
            Some(&Value::number(1.5))
        );
    }
}
