//! Error types for the attendance engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during scheduling and compliance
//! computation.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for the attendance engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A group referenced by a query or calculation does not exist.
    #[error("Group not found: {id}")]
    GroupNotFound {
        /// The ID of the missing group.
        id: Uuid,
    },

    /// A child referenced by a schedule or calculation does not exist.
    #[error("Child not found: {id}")]
    ChildNotFound {
        /// The ID of the missing child.
        id: Uuid,
    },

    /// A time slot referenced by a schedule rule does not exist.
    #[error("Time slot not found: {id}")]
    TimeSlotNotFound {
        /// The ID of the missing time slot.
        id: Uuid,
    },

    /// A date range query was given with the start after the end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// The start of the requested range.
        start: NaiveDate,
        /// The end of the requested range.
        end: NaiveDate,
    },

    /// An underlying data store operation failed.
    #[error("Storage error: {message}")]
    StorageError {
        /// A description of the storage failure.
        message: String,
    },

    /// An event payload could not be serialized for publishing.
    #[error("Failed to encode event payload: {message}")]
    EventEncodingError {
        /// A description of the serialization failure.
        message: String,
    },

    /// An event payload could not be deserialized by a consumer.
    #[error("Failed to decode event payload for topic '{topic}': {message}")]
    EventDecodingError {
        /// The topic of the event that failed to decode.
        topic: String,
        /// A description of the deserialization failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_group_not_found_displays_id() {
        let id = Uuid::parse_str("7f1b3a54-9d0e-4d2b-8a3c-2f6f0a1b9c8d").unwrap();
        let error = EngineError::GroupNotFound { id };
        assert_eq!(
            error.to_string(),
            "Group not found: 7f1b3a54-9d0e-4d2b-8a3c-2f6f0a1b9c8d"
        );
    }

    #[test]
    fn test_child_not_found_displays_id() {
        let id = Uuid::parse_str("3d9c2a10-5b4f-4e8d-9c7a-1e2f3a4b5c6d").unwrap();
        let error = EngineError::ChildNotFound { id };
        assert_eq!(
            error.to_string(),
            "Child not found: 3d9c2a10-5b4f-4e8d-9c7a-1e2f3a4b5c6d"
        );
    }

    #[test]
    fn test_invalid_date_range_displays_both_dates() {
        let error = EngineError::InvalidDateRange {
            start: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid date range: start 2025-03-10 is after end 2025-03-01"
        );
    }

    #[test]
    fn test_storage_error_displays_message() {
        let error = EngineError::StorageError {
            message: "connection reset".to_string(),
        };
        assert_eq!(error.to_string(), "Storage error: connection reset");
    }

    #[test]
    fn test_event_decoding_error_displays_topic_and_message() {
        let error = EngineError::EventDecodingError {
            topic: "child.schedule_status_changed".to_string(),
            message: "missing field `child_id`".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to decode event payload for topic 'child.schedule_status_changed': missing field `child_id`"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_config_not_found() -> EngineResult<()> {
            Err(EngineError::ConfigNotFound {
                path: "/test".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_config_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
