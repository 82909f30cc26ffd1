//! Pure field validation for the authentication drafts.
//!
//! Each validator maps a draft to a `FieldErrors` map; an empty map means the
//! draft is valid. Validators never touch the network or any storage and are
//! idempotent, so callers may re-run them on every keystroke.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::config::{PASSWORD_MIN_LENGTH, PASSWORD_REQUIRE_MIXED};

/// Field name → human-readable reason. Empty means valid.
pub type FieldErrors = HashMap<String, String>;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("invalid email regex"));

static OTP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}$").expect("invalid otp regex"));

/// Login form values: email, password, and the authenticator OTP.
#[derive(Debug, Clone, Default)]
pub struct LoginDraft {
    pub email: String,
    pub password: String,
    pub otp: String,
}

/// Registration form values, validated before any network call.
#[derive(Debug, Clone, Default)]
pub struct RegistrationDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Password strength settings, snapshotted from the environment so the
/// validators themselves stay pure functions of their arguments.
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_mixed: bool,
}

impl PasswordPolicy {
    pub fn from_env() -> Self {
        Self {
            min_length: *PASSWORD_MIN_LENGTH,
            require_mixed: *PASSWORD_REQUIRE_MIXED,
        }
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_mixed: true,
        }
    }
}

fn check_email(email: &str, errors: &mut FieldErrors) {
    if email.is_empty() {
        errors.insert("email".to_string(), "Email is required".to_string());
    } else if !EMAIL_RE.is_match(email) {
        errors.insert("email".to_string(), "Email is invalid".to_string());
    }
}

fn check_otp(otp: &str, errors: &mut FieldErrors) {
    if otp.is_empty() {
        errors.insert("otp".to_string(), "OTP is required".to_string());
    } else if !OTP_RE.is_match(otp) {
        errors.insert("otp".to_string(), "OTP must be a 6-digit number".to_string());
    }
}

fn check_password_strength(password: &str, policy: &PasswordPolicy, errors: &mut FieldErrors) {
    if password.is_empty() {
        errors.insert("password".to_string(), "Password is required".to_string());
        return;
    }
    if password.len() < policy.min_length {
        errors.insert(
            "password".to_string(),
            format!("Password must be at least {} characters", policy.min_length),
        );
        return;
    }
    if policy.require_mixed {
        let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
        let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        let has_special = password.chars().any(|c| !c.is_ascii_alphanumeric());
        if !(has_upper && has_lower && has_digit && has_special) {
            errors.insert(
                "password".to_string(),
                "Password must contain uppercase, lowercase, digit, and special character"
                    .to_string(),
            );
        }
    }
}

/// Validates the login draft: email shape, password presence, 6-digit OTP.
/// Login passwords are never strength-checked.
pub fn validate_login(draft: &LoginDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_email(&draft.email, &mut errors);
    if draft.password.is_empty() {
        errors.insert("password".to_string(), "Password is required".to_string());
    }
    check_otp(&draft.otp, &mut errors);
    errors
}

/// Validates the registration draft against the given password policy.
pub fn validate_registration(draft: &RegistrationDraft, policy: &PasswordPolicy) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if draft.first_name.is_empty() {
        errors.insert(
            "first_name".to_string(),
            "First name is required".to_string(),
        );
    }
    if draft.last_name.is_empty() {
        errors.insert("last_name".to_string(), "Last name is required".to_string());
    }
    check_email(&draft.email, &mut errors);
    check_password_strength(&draft.password, policy, &mut errors);
    if draft.password != draft.confirm_password {
        errors.insert(
            "confirm_password".to_string(),
            "Passwords do not match".to_string(),
        );
    }
    errors
}

/// Validates a lone email field (forgot-password and lost-authenticator
/// phase one).
pub fn validate_email_only(email: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_email(email, &mut errors);
    errors
}

/// Validates an OTP code entry (phase two of the recovery flows).
pub fn validate_otp_code(otp: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_otp(otp, &mut errors);
    errors
}

/// Validates a reset password pair (forgot-password phase three).
pub fn validate_new_password(
    password: &str,
    confirm_password: &str,
    policy: &PasswordPolicy,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_password_strength(password, policy, &mut errors);
    if password != confirm_password {
        errors.insert(
            "confirm_password".to_string(),
            "Passwords do not match".to_string(),
        );
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_draft(email: &str, password: &str, otp: &str) -> LoginDraft {
        LoginDraft {
            email: email.to_string(),
            password: password.to_string(),
            otp: otp.to_string(),
        }
    }

    /// Test that malformed emails are rejected and well-formed ones accepted
    #[test]
    fn test_email_shapes() {
        for bad in ["", "plain", "missing@domain", "@no.local", "a b@c.d"] {
            let errors = validate_email_only(bad);
            assert!(errors.contains_key("email"), "expected error for {bad:?}");
        }
        for good in ["x@y.z", "user@example.com", "a.b@mail.example.org"] {
            let errors = validate_email_only(good);
            assert!(!errors.contains_key("email"), "unexpected error for {good:?}");
        }
    }

    /// Test OTP acceptance: exactly 6 digits
    #[test]
    fn test_otp_six_digits() {
        assert!(validate_otp_code("12345").contains_key("otp"));
        assert!(!validate_otp_code("123456").contains_key("otp"));
        assert!(validate_otp_code("1234a6").contains_key("otp"));
        assert!(validate_otp_code("1234567").contains_key("otp"));
        assert!(validate_otp_code("").contains_key("otp"));
    }

    /// Test that login requires all three fields but no password strength
    #[test]
    fn test_login_required_fields() {
        let errors = validate_login(&login_draft("", "", ""));
        assert_eq!(errors.get("email").unwrap(), "Email is required");
        assert_eq!(errors.get("password").unwrap(), "Password is required");
        assert_eq!(errors.get("otp").unwrap(), "OTP is required");

        // A weak password is fine at login time.
        let errors = validate_login(&login_draft("x@y.z", "abc", "123456"));
        assert!(errors.is_empty());
    }

    /// Test registration password policy enforcement
    #[test]
    fn test_registration_password_policy() {
        let policy = PasswordPolicy {
            min_length: 8,
            require_mixed: true,
        };
        let mut draft = RegistrationDraft {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "short".to_string(),
            confirm_password: "short".to_string(),
        };
        let errors = validate_registration(&draft, &policy);
        assert_eq!(
            errors.get("password").unwrap(),
            "Password must be at least 8 characters"
        );

        draft.password = "alllowercase1!".to_string();
        draft.confirm_password = draft.password.clone();
        let errors = validate_registration(&draft, &policy);
        assert!(errors.contains_key("password"));

        draft.password = "Sufficient1!".to_string();
        draft.confirm_password = draft.password.clone();
        let errors = validate_registration(&draft, &policy);
        assert!(errors.is_empty());
    }

    /// Test the relaxed 6-character policy without composition rules
    #[test]
    fn test_registration_relaxed_policy() {
        let policy = PasswordPolicy {
            min_length: 6,
            require_mixed: false,
        };
        let draft = RegistrationDraft {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "simple".to_string(),
            confirm_password: "simple".to_string(),
        };
        assert!(validate_registration(&draft, &policy).is_empty());
    }

    /// Test that mismatched confirmation is reported on confirm_password
    #[test]
    fn test_confirm_password_mismatch() {
        let policy = PasswordPolicy::default();
        let draft = RegistrationDraft {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "Sufficient1!".to_string(),
            confirm_password: "Different1!".to_string(),
        };
        let errors = validate_registration(&draft, &policy);
        assert_eq!(
            errors.get("confirm_password").unwrap(),
            "Passwords do not match"
        );
    }

    /// Test validator idempotence on an unchanged draft
    #[test]
    fn test_validator_idempotence() {
        let draft = login_draft("broken", "", "12");
        let first = validate_login(&draft);
        let second = validate_login(&draft);
        assert_eq!(first, second);
    }
}
