//! Regex-based PII scrubbing.
//!
//! This is the weaker of the two redaction paths: the model handles names
//! and free-form identifiers, while these patterns only catch long digit
//! runs (student IDs, phone numbers) and email addresses. It is used
//! whenever the model cannot classify an item.

use std::sync::LazyLock;

use regex::Regex;

/// Replacement token for every redacted span.
pub const REDACTED: &str = "[REDACTED]";

static LONG_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{6,}").expect("digit-run pattern is valid"));

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").expect("email pattern is valid")
});

/// Replace long digit runs, then email addresses, with [`REDACTED`].
///
/// Every non-overlapping match is replaced. Text without matches comes
/// back unchanged, and applying `redact` twice gives the same result as
/// applying it once.
pub fn redact(text: &str) -> String {
    let without_digits = LONG_DIGITS.replace_all(text, REDACTED);
    EMAIL.replace_all(&without_digits, REDACTED).into_owned()
}
