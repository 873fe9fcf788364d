use std::path::Path;
use std::sync::Arc;

/// Logical address of the category resource.
pub const CATEGORIES_URI: &str = "expense:///categories";

const DEFAULT_BODY: &str = r#"{
  "categories": [
    "Food & Dining",
    "Transportation",
    "Shopping",
    "Entertainment",
    "Bills & Utilities",
    "Healthcare",
    "Travel",
    "Education",
    "Business",
    "Other"
  ]
}"#;

/// The advisory category list served at [`CATEGORIES_URI`].
///
/// Resolved once at startup: the configured file's verbatim contents when
/// readable, otherwise the built-in default list. Advisory only; the
/// store accepts any category text regardless of this document.
#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    body: Arc<str>,
}

impl CategoryCatalog {
    pub fn load(path: Option<&Path>) -> Self {
        let body = match path {
            Some(path) => match std::fs::read_to_string(path) {
                Ok(contents) => contents,
                Err(err) => {
                    tracing::debug!(
                        path = %path.display(),
                        %err,
                        "categories file unavailable, serving built-in list"
                    );
                    DEFAULT_BODY.to_string()
                }
            },
            None => DEFAULT_BODY.to_string(),
        };
        Self { body: body.into() }
    }

    /// The JSON document body, verbatim.
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self {
            body: DEFAULT_BODY.into(),
        }
    }
}
