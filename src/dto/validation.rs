//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::dao::models::ITEM_TEXT_MAX_LEN;

/// Validates that an item text is non-blank and at most 200 characters.
pub fn validate_item_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        let mut err = ValidationError::new("item_text_blank");
        err.message = Some("Item text must not be blank".into());
        return Err(err);
    }

    let length = text.chars().count();
    if length > ITEM_TEXT_MAX_LEN {
        let mut err = ValidationError::new("item_text_length");
        err.message = Some(
            format!("Item text must be at most {ITEM_TEXT_MAX_LEN} characters (got {length})")
                .into(),
        );
        return Err(err);
    }

    Ok(())
}

/// Validates that an item point value is not negative.
pub fn validate_item_points(points: i64) -> Result<(), ValidationError> {
    if points < 0 {
        let mut err = ValidationError::new("item_points_negative");
        err.message = Some(format!("Item points must not be negative (got {points})").into());
        return Err(err);
    }

    Ok(())
}
