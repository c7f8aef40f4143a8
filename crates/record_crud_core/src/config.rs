pub const DEFAULT_TABLE_NAME: &str = "StudentRecords";
pub const DEFAULT_KEY_FIELD: &str = "student_id";

/// Settings resolved once at process start and shared by every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    pub table_name: String,
    pub key_field: String,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            key_field: DEFAULT_KEY_FIELD.to_string(),
        }
    }
}

impl HandlerConfig {
    /// Explicit overrides win over the defaults; blank overrides are ignored.
    pub fn resolve(table_name: Option<String>, key_field: Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            table_name: non_blank(table_name).unwrap_or(defaults.table_name),
            key_field: non_blank(key_field).unwrap_or(defaults.key_field),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
