use super::dataset::ValueKind;

/// Type used for any kind without an explicit mapping.
pub const DEFAULT_SQL_TYPE: &str = "VARCHAR(255)";

/// The explicit entries of the mapping. `Unknown` is deliberately absent.
pub const TYPE_MAPPING: [(ValueKind, &str); 5] = [
    (ValueKind::Text, "VARCHAR(255)"),
    (ValueKind::Integer, "INT"),
    (ValueKind::Float, "FLOAT"),
    (ValueKind::Timestamp, "DATETIME"),
    (ValueKind::Boolean, "BOOLEAN"),
];

/// SQL column type for a value kind. Never fails.
pub fn sql_type_for(kind: ValueKind) -> &'static str {
    TYPE_MAPPING
        .iter()
        .find(|(k, _)| *k == kind)
        .map_or(DEFAULT_SQL_TYPE, |(_, sql_type)| sql_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_mappings() {
        assert_eq!(sql_type_for(ValueKind::Integer), "INT");
        assert_eq!(sql_type_for(ValueKind::Float), "FLOAT");
        assert_eq!(sql_type_for(ValueKind::Timestamp), "DATETIME");
        assert_eq!(sql_type_for(ValueKind::Boolean), "BOOLEAN");
        assert_eq!(sql_type_for(ValueKind::Text), "VARCHAR(255)");
    }

    #[test]
    fn test_unknown_falls_back() {
        assert_eq!(sql_type_for(ValueKind::Unknown), DEFAULT_SQL_TYPE);
    }
}
