use crate::record::{FieldValue, Record};
use crate::rules::RuleSet;

/// Evaluates decoded records against a [`RuleSet`].
///
/// All applicable checks run on every record; violations accumulate rather
/// than short-circuiting. Each violation is logged as a warning tagged with
/// the record number.
#[derive(Debug, Clone)]
pub struct Validator {
    rules: RuleSet,
}

impl Validator {
    pub fn new(rules: RuleSet) -> Validator {
        Validator { rules }
    }

    /// Returns every rule violation for `record`; valid records return an
    /// empty list.
    pub fn validate(&self, record: &Record) -> Vec<String> {
        let mut violations = Vec::new();

        for field in &self.rules.required_fields {
            if record.get(field).is_none() {
                violations.push(format!("missing required field: {}", field));
            }
        }

        if let Some(id) = record.get("id").and_then(FieldValue::as_i64) {
            if let Some(min) = self.rules.min_id {
                if id < min {
                    violations.push(format!("id {} below minimum ({})", id, min));
                }
            }
            if let Some(max) = self.rules.max_id {
                if id > max {
                    violations.push(format!("id {} above maximum ({})", id, max));
                }
            }
        }

        if let Some(value) = record.get("value").and_then(FieldValue::as_f64) {
            if let Some(min) = self.rules.min_value {
                if value < min {
                    violations.push(format!("value {} below minimum ({})", value, min));
                }
            }
            if let Some(max) = self.rules.max_value {
                if value > max {
                    violations.push(format!("value {} above maximum ({})", value, max));
                }
            }
        }

        if let (Some(code), Some(pattern)) = (
            record.get("code").and_then(FieldValue::as_text),
            self.rules.code_pattern.as_ref(),
        ) {
            if !pattern.is_match(code) {
                violations.push(format!(
                    "code '{}' does not match pattern '{}'",
                    code,
                    pattern.as_str()
                ));
            }
        }

        for violation in &violations {
            tracing::warn!(record_number = record.record_number(), "{}", violation);
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn record(id: i32, value: f64, code: &str) -> Record {
        Record::new(
            1,
            0,
            vec![
                ("id".into(), FieldValue::Int32(id)),
                ("value".into(), FieldValue::Float64(value)),
                ("code".into(), FieldValue::Text(code.into())),
            ],
        )
    }

    fn rules() -> RuleSet {
        RuleSet {
            min_id: Some(1),
            max_id: Some(999_999),
            min_value: Some(-1_000_000.0),
            max_value: Some(1_000_000.0),
            code_pattern: Some(Regex::new(r"^[A-Z]{2}\d{3}$").unwrap()),
            required_fields: vec!["id".into(), "value".into(), "code".into()],
        }
    }

    #[test]
    fn valid_record_has_no_violations() {
        let validator = Validator::new(rules());
        assert!(validator.validate(&record(101, 250.75, "AB123")).is_empty());
    }

    #[test]
    fn violations_accumulate_without_short_circuiting() {
        let validator = Validator::new(rules());
        let violations = validator.validate(&record(-5, 2_000_000.0, "nope"));
        assert_eq!(violations.len(), 3);
        assert!(violations[0].contains("id -5 below minimum"));
        assert!(violations[1].contains("value 2000000 above maximum"));
        assert!(violations[2].contains("does not match pattern"));
    }

    #[test]
    fn missing_required_field_is_a_violation() {
        let validator = Validator::new(RuleSet {
            required_fields: vec!["id".into(), "status".into()],
            ..RuleSet::default()
        });
        let violations = validator.validate(&record(1, 0.0, "AB123"));
        assert_eq!(violations, vec!["missing required field: status".to_string()]);
    }

    #[test]
    fn bounds_do_not_apply_without_the_field() {
        let validator = Validator::new(RuleSet {
            min_id: Some(1),
            ..RuleSet::default()
        });
        let no_id = Record::new(1, 0, vec![("value".into(), FieldValue::Float64(1.0))]);
        assert!(validator.validate(&no_id).is_empty());
    }

    #[test]
    fn empty_rule_set_accepts_anything() {
        let validator = Validator::new(RuleSet::default());
        assert!(validator.validate(&record(-1, f64::MAX, "")).is_empty());
    }
}
