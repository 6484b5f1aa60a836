//! Status code lookup table.

/// Fallback message for codes outside the table.
pub const UNSPECIFIED_CONDITION: &str = "Unspecified condition.";

/// The status table. Fixed for the process lifetime; codes outside it fall
/// back to [`UNSPECIFIED_CONDITION`] when a message is needed.
pub const STATUS_TABLE: [(u16, &str); 6] = [
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (403, "Forbidden"),
    (404, "Not Found"),
    (405, "Method Not Allowed"),
    (406, "Not Acceptable"),
];

/// The table text for `code`, absent for codes outside the table.
#[must_use]
pub fn status_text(code: u16) -> Option<&'static str> {
    STATUS_TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, text)| *text)
}

/// `code` if it is in the table, `fallback` otherwise.
#[must_use]
pub fn validate_status(code: u16, fallback: u16) -> u16 {
    if STATUS_TABLE.iter().any(|(c, _)| *c == code) {
        code
    } else {
        fallback
    }
}
