mod json;

pub use json::extract_structured_block;
