// ── Guest portal login form validation ──
//
// The guest-facing login form is a separate, much simpler flow than the
// operator dashboard: two fields, validated locally before any network
// call. Validation failures identify the offending field so the caller
// can focus it. The room-number field doubles as a password for
// non-guest accounts, so it is length-capped but otherwise free-form.

use thiserror::Error;

/// Mobile numbers are digits only, at most 15 characters (ITU E.164).
pub const MOBILE_NUMBER_MAX_LEN: usize = 15;
/// Room numbers are free-form, at most 10 characters.
pub const ROOM_NUMBER_MAX_LEN: usize = 10;

/// Which input field a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    MobileNumber,
    RoomNumber,
}

/// A local validation failure. No network call is made when one occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct InvalidLogin {
    /// The field the caller should focus.
    pub field: LoginField,
    pub message: String,
}

/// Strip everything but digits and cap the length, as the field's input
/// filter does on every keystroke.
pub fn sanitize_mobile_number(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(MOBILE_NUMBER_MAX_LEN)
        .collect()
}

/// Cap the room-number length. No character filter (see module note).
pub fn sanitize_room_number(raw: &str) -> String {
    raw.chars().take(ROOM_NUMBER_MAX_LEN).collect()
}

/// The guest login form as submitted.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub mobile_number: String,
    pub room_number: String,
}

impl LoginForm {
    /// Build a form from raw input, applying both field sanitizers.
    pub fn from_raw(mobile_number: &str, room_number: &str) -> Self {
        Self {
            mobile_number: sanitize_mobile_number(mobile_number),
            room_number: sanitize_room_number(room_number),
        }
    }

    /// Validate before submission: both fields are required (after
    /// trimming). The first failing field is reported for focus.
    pub fn validate(&self) -> Result<(), InvalidLogin> {
        if self.mobile_number.trim().is_empty() {
            return Err(InvalidLogin {
                field: LoginField::MobileNumber,
                message: "Please enter your mobile number".into(),
            });
        }
        if self.room_number.trim().is_empty() {
            return Err(InvalidLogin {
                field: LoginField::RoomNumber,
                message: "Please enter your room number".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mobile_number_keeps_digits_only() {
        assert_eq!(sanitize_mobile_number("+46 (70) 123-45x67"), "46701234567");
    }

    #[test]
    fn mobile_number_is_capped_at_fifteen_digits() {
        assert_eq!(sanitize_mobile_number("12345678901234567890").len(), 15);
    }

    #[test]
    fn room_number_is_capped_but_not_digit_filtered() {
        assert_eq!(sanitize_room_number("A-204"), "A-204");
        assert_eq!(sanitize_room_number("12345678901234"), "1234567890");
    }

    #[test]
    fn empty_mobile_number_is_reported_first() {
        let form = LoginForm::from_raw("  ", "204");
        let err = form.validate().unwrap_err();
        assert_eq!(err.field, LoginField::MobileNumber);
    }

    #[test]
    fn empty_room_number_is_reported() {
        let form = LoginForm::from_raw("5551234", "   ");
        let err = form.validate().unwrap_err();
        assert_eq!(err.field, LoginField::RoomNumber);
    }

    #[test]
    fn complete_form_passes() {
        let form = LoginForm::from_raw("5551234", "A-204");
        assert!(form.validate().is_ok());
    }
}
