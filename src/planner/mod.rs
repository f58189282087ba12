//! Planning module: the initial review worklist
//!
//! The decision service reads the regulation summary and the user's request
//! and names the documents to inspect first. The execution loop extends the
//! list later through replanning, using the same task parser.

pub mod initial;
pub mod parser;
pub mod types;

pub use initial::generate_init_plan;
pub use parser::parse_tasks;
pub use types::{task_schema, Task};
