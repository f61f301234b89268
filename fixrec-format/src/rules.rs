use regex::Regex;

/// Declarative per-field validation constraints.
///
/// Bounds apply to the fields literally named `id` and `value`, and the
/// pattern to the field named `code`, when they are present; a rule whose
/// field is absent simply does not apply. Supplied once at construction and
/// never mutated.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub min_id: Option<i64>,
    pub max_id: Option<i64>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub code_pattern: Option<Regex>,
    pub required_fields: Vec<String>,
}
