//! Type definitions for the validation system

mod date_input;
mod record_id;
mod text_input;

// Re-export commonly used types and functions
pub use date_input::parse_date;
pub use record_id::RecordId;
pub use text_input::TextInput;
