//! Output artifact rendering.

mod json;

pub use json::{to_json, JsonFormat};
