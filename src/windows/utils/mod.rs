//! Windows utility helpers

pub mod error_codes;
pub mod string_conv;

pub use error_codes::last_error_code;
pub use string_conv::{extract_filename, string_to_wide, wide_to_string};
