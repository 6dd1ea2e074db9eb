//! Field validation helpers shared by the API handlers.
//!
//! The forms driving this API enforce presence ad hoc; the server is the
//! real gate. Helpers return [`CoreError::Validation`] with the offending
//! field name so the message can go straight into an error banner.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum length accepted for code fields.
pub const MAX_CODE_LEN: usize = 40;
/// Maximum length accepted for name/title fields.
pub const MAX_NAME_LEN: usize = 160;

fn hex_color_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("static regex"))
}

/// Require a non-empty trimmed string no longer than `max_len`.
///
/// Returns the trimmed value so callers can persist the canonical form.
pub fn require_trimmed<'a>(
    field: &str,
    value: &'a str,
    max_len: usize,
) -> Result<&'a str, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if trimmed.len() > max_len {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(trimmed)
}

/// Require a positive database id.
pub fn require_positive_id(field: &str, id: DbId) -> Result<(), CoreError> {
    if id <= 0 {
        return Err(CoreError::Validation(format!(
            "{field} must be a positive id"
        )));
    }
    Ok(())
}

/// Require a `#rrggbb` hex color, as stored for society branding.
pub fn require_hex_color(field: &str, value: &str) -> Result<(), CoreError> {
    if !hex_color_re().is_match(value) {
        return Err(CoreError::Validation(format!(
            "{field} must be a #rrggbb hex color"
        )));
    }
    Ok(())
}

/// Require a non-negative quantity (stock counts, movement quantities).
pub fn require_non_negative(field: &str, qty: f64) -> Result<(), CoreError> {
    if !qty.is_finite() || qty < 0.0 {
        return Err(CoreError::Validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}

/// Require a strictly positive quantity.
pub fn require_positive(field: &str, qty: f64) -> Result<(), CoreError> {
    if !qty.is_finite() || qty <= 0.0 {
        return Err(CoreError::Validation(format!(
            "{field} must be a positive number"
        )));
    }
    Ok(())
}

/// Require that an optional publish window is ordered.
pub fn require_ordered_window(
    from: Option<crate::types::Timestamp>,
    until: Option<crate::types::Timestamp>,
) -> Result<(), CoreError> {
    if let (Some(from), Some(until)) = (from, until) {
        if until < from {
            return Err(CoreError::Validation(
                "publish_until must not precede publish_from".into(),
            ));
        }
    }
    Ok(())
}
