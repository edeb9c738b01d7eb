pub mod layout;
pub mod occurrences;
