//! Well-known pointer names and pointer name validation.
//!
//! Valid pointer names:
//! - Must be non-empty
//! - Must consist of ASCII letters, digits, `-`, `_` and `.`
//! - Must not start with `.` or `-`

use crate::error::{RefError, Result};

/// Index pointer of the current (keyring) scheme.
pub const INDEX: &str = "index";

/// Index pointer of the legacy passphrase scheme.
pub const LEGACY_INDEX: &str = "luna-pass";

/// Passphrase-sealed keyring.
pub const KEYRING: &str = "keyring";

/// Free-text note.
pub const NOTE: &str = "note";

/// Validate a pointer name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use luna_refs::names::validate_pointer_name;
///
/// assert!(validate_pointer_name("index").is_ok());
/// assert!(validate_pointer_name("").is_err());
/// assert!(validate_pointer_name("has space").is_err());
/// ```
pub fn validate_pointer_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| RefError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("pointer name must not be empty"));
    }

    if let Some(ch) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(invalid(&format!("contains forbidden character: {ch:?}")));
    }

    if name.starts_with('.') || name.starts_with('-') {
        return Err(invalid("must not start with '.' or '-'"));
    }

    Ok(())
}
