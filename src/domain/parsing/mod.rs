//! Parsers for the statement placeholder grammar: field tokens, the
//! `RETURNS(...)` clause, and the `CONNECT <name>;` directive.

mod placeholders;
mod statement;

pub use placeholders::{extract_field_ids, field_token, substitute_fields};
pub use statement::{parse_connect, parse_returns, strip_returns};
