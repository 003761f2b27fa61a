//! Input validation utilities.
//!
//! Startup config validation and the size gate applied to events submitted
//! by relay clients.

use validator::Validate;

use crate::error::FedstrError;
use crate::event::Event;

/// Default upper bound on a client-submitted event's serialized size.
pub const DEFAULT_MAX_EVENT_BYTES: usize = 10_000;

/// Validate a config section (or any validated value), returning a
/// `FedstrError::Validation` on failure.
pub fn validate_config<T: Validate>(value: &T) -> Result<(), FedstrError> {
    value.validate().map_err(|e| FedstrError::Validation {
        message: format_validation_errors(&e),
    })
}

/// Format validation errors into a human-readable string.
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    // Nested structs report as `server.name: ...`; the Display impl already
    // walks them in a stable order.
    errors.to_string().replace('\n', "; ")
}

/// Whether a client-submitted event is small enough to be admitted.
///
/// The bound is inclusive: an event of exactly `max_bytes` is accepted.
pub fn admit_event(event: &Event, max_bytes: usize) -> bool {
    event.serialized_len() <= max_bytes
}
