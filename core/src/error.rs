use thiserror::Error;

/// Layerpack error types
#[derive(Error, Debug)]
pub enum PackError {
    /// A requested reference did not resolve to any image
    #[error("Reference error: {0}")]
    ReferenceError(String),

    /// Staging directory creation or file write failure
    #[error("Staging error: {0}")]
    StagingError(String),

    /// Metadata or layer retrieval failure from the backing store
    #[error("Store error: {0}")]
    StoreError(String),

    /// Image ID unknown to the backing store
    #[error("Image not found: {0}")]
    ImageNotFound(String),

    /// Archive packaging or output-stream write failure
    #[error("Archive error: {0}")]
    ArchiveError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PackError {
    fn from(err: serde_json::Error) -> Self {
        PackError::SerializationError(err.to_string())
    }
}

/// Result type alias for layerpack operations
pub type Result<T> = std::result::Result<T, PackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_error_display() {
        let error = PackError::ReferenceError("no such image: busybox".to_string());
        assert_eq!(error.to_string(), "Reference error: no such image: busybox");
    }

    #[test]
    fn test_staging_error_display() {
        let error = PackError::StagingError("disk full".to_string());
        assert_eq!(error.to_string(), "Staging error: disk full");
    }

    #[test]
    fn test_store_error_display() {
        let error = PackError::StoreError("index unreadable".to_string());
        assert_eq!(error.to_string(), "Store error: index unreadable");
    }

    #[test]
    fn test_image_not_found_display() {
        let error = PackError::ImageNotFound("abc123".to_string());
        assert_eq!(error.to_string(), "Image not found: abc123");
    }

    #[test]
    fn test_archive_error_display() {
        let error = PackError::ArchiveError("broken pipe".to_string());
        assert_eq!(error.to_string(), "Archive error: broken pipe");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let pack_error: PackError = io_error.into();
        assert!(matches!(pack_error, PackError::IoError(_)));
        assert!(pack_error.to_string().contains("file not found"));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_str = "{ invalid json }";
        let result: std::result::Result<serde_json::Value, _> = serde_json::from_str(json_str);
        let json_error = result.unwrap_err();
        let pack_error: PackError = json_error.into();
        assert!(matches!(pack_error, PackError::SerializationError(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(PackError::StoreError("test error".to_string()))
        }

        assert_eq!(returns_ok().unwrap(), 42);
        assert!(returns_err().is_err());
    }

    #[test]
    fn test_error_is_debug() {
        let error = PackError::ReferenceError("test".to_string());
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("ReferenceError"));
    }
}
