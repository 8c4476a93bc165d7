//! Natural-language tool intake pipeline

pub mod parser;
pub mod schema;

pub use parser::{IntakeError, IntakeFailure, IntakeParser};
pub use schema::tool_response_schema;
