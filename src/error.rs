use thiserror::Error;

#[derive(Error, Debug)]
pub enum CmsError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Integration error: {0}")]
    Integration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CmsError>;

// Command output reports errors as plain strings
impl serde::Serialize for CmsError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_joins_messages() {
        let err = CmsError::Validation(vec![
            "Title is required".to_string(),
            "Button Link must be a valid URL".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: Title is required; Button Link must be a valid URL"
        );
    }

    #[test]
    fn test_error_serializes_as_string() {
        let err = CmsError::NotFound("Section abc not found".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Not found: Section abc not found\"");
    }
}
