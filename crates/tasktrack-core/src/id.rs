use uuid::Uuid;

use crate::TasktrackError;

/// Generate a fresh record id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Check that `id` has the shape of a record id before it reaches the store.
pub fn validate_id(id: &str) -> Result<(), TasktrackError> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| TasktrackError::InvalidInput(format!("malformed id: {id}")))
}
