//! Field placeholder tokens embedded in statement text.
//!
//! A token has the exact shape `::#5#<uuid>#::` where `<uuid>` is a standard
//! 36-character hyphenated UUID. Anything that starts like a token but does
//! not parse is left untouched.

use uuid::Uuid;

use crate::domain::foundation::ModuleId;

const TOKEN_PREFIX: &str = "::#5#";
const TOKEN_SUFFIX: &str = "#::";
const UUID_LEN: usize = 36;

/// Renders the placeholder token for a field, for building statement text.
pub fn field_token(field_id: ModuleId) -> String {
    format!("{TOKEN_PREFIX}{field_id}{TOKEN_SUFFIX}")
}

/// One piece of a scanned statement: literal text, or a well-formed field
/// token.
enum Segment<'a> {
    Literal(&'a str),
    Token(ModuleId),
}

/// Collects every field id referenced by a placeholder token, in order of
/// appearance.
pub fn extract_field_ids(text: &str) -> Vec<ModuleId> {
    segments(text)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Token(id) => Some(id),
            Segment::Literal(_) => None,
        })
        .collect()
}

/// Replaces every well-formed placeholder token with the text the resolver
/// produces for its field id. Malformed tokens pass through verbatim.
pub fn substitute_fields<F>(text: &str, mut resolve: F) -> String
where
    F: FnMut(ModuleId) -> String,
{
    let mut out = String::with_capacity(text.len());
    for segment in segments(text) {
        match segment {
            Segment::Literal(literal) => out.push_str(literal),
            Segment::Token(id) => out.push_str(&resolve(id)),
        }
    }
    out
}

/// Walks the text once, splitting it into literal runs and well-formed
/// placeholder tokens.
fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(TOKEN_PREFIX) {
        let body = &rest[start + TOKEN_PREFIX.len()..];
        let parsed = body
            .get(..UUID_LEN)
            .and_then(|candidate| Uuid::parse_str(candidate).ok())
            .filter(|_| body.get(UUID_LEN..UUID_LEN + TOKEN_SUFFIX.len()) == Some(TOKEN_SUFFIX));

        match parsed {
            Some(uuid) => {
                segments.push(Segment::Literal(&rest[..start]));
                segments.push(Segment::Token(ModuleId::from_uuid(uuid)));
                rest = &body[UUID_LEN + TOKEN_SUFFIX.len()..];
            }
            None => {
                let keep = start + TOKEN_PREFIX.len();
                segments.push(Segment::Literal(&rest[..keep]));
                rest = &rest[keep..];
            }
        }
    }
    segments.push(Segment::Literal(rest));
    segments
}
