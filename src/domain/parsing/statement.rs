//! Statement-level directives: the `RETURNS(...)` clause and the leading
//! `CONNECT <name>;` directive. Keywords are case-insensitive.

use super::placeholders::extract_field_ids;
use crate::domain::foundation::ModuleId;

const RETURNS_KEYWORD: &[u8] = b"returns";
const CONNECT_KEYWORD: &[u8] = b"connect";

/// Parses the field ids listed by the statement's `RETURNS(...)` clause, in
/// the order a result row should populate them. Empty when no clause exists.
pub fn parse_returns(statement: &str) -> Vec<ModuleId> {
    match find_returns_clause(statement) {
        Some((_, _, inner)) => extract_field_ids(inner),
        None => Vec::new(),
    }
}

/// Removes the `RETURNS(...)` clause from the statement, leaving the bare
/// SQL, trimmed.
pub fn strip_returns(statement: &str) -> String {
    match find_returns_clause(statement) {
        Some((start, close, _)) => {
            let mut out = String::with_capacity(statement.len());
            out.push_str(&statement[..start]);
            out.push_str(&statement[close + 1..]);
            out.trim().to_string()
        }
        None => statement.trim().to_string(),
    }
}

/// Parses a leading `CONNECT <name>;` directive.
///
/// Returns the database name and the remaining statement text after the
/// semicolon, trimmed. `None` when the statement does not begin with a
/// well-formed directive.
pub fn parse_connect(statement: &str) -> Option<(String, String)> {
    let trimmed = statement.trim_start();
    let bytes = trimmed.as_bytes();
    if bytes.len() < CONNECT_KEYWORD.len()
        || !bytes[..CONNECT_KEYWORD.len()].eq_ignore_ascii_case(CONNECT_KEYWORD)
    {
        return None;
    }

    let rest = &trimmed[CONNECT_KEYWORD.len()..];
    let after_ws = rest.trim_start();
    if after_ws.len() == rest.len() {
        // keyword must be followed by whitespace, not more identifier text
        return None;
    }

    let name_len = after_ws
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count();
    if name_len == 0 {
        return None;
    }

    let name = &after_ws[..name_len];
    let tail = after_ws[name_len..].trim_start().strip_prefix(';')?;
    Some((name.to_string(), tail.trim().to_string()))
}

/// Locates the first `RETURNS ( ... )` clause: returns the byte offset of the
/// keyword, the offset of the closing parenthesis, and the inner text.
fn find_returns_clause(statement: &str) -> Option<(usize, usize, &str)> {
    let bytes = statement.as_bytes();
    let kw = RETURNS_KEYWORD.len();
    let mut i = 0;
    while i + kw <= bytes.len() {
        if bytes[i..i + kw].eq_ignore_ascii_case(RETURNS_KEYWORD) {
            let mut j = i + kw;
            while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            if j < bytes.len() && bytes[j] == b'(' {
                if let Some(rel) = statement[j + 1..].find(')') {
                    let close = j + 1 + rel;
                    return Some((i, close, &statement[j + 1..close]));
                }
            }
        }
        i += 1;
    }
    None
}
