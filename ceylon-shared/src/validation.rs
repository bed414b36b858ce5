use validator::ValidationErrors;

/// Flattens `validator` output into a sorted list of offending field names,
/// which is what API callers get back in a 400 body.
pub fn invalid_fields(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|name| name.to_string())
        .collect();
    fields.sort();
    fields
}
