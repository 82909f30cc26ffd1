//! Central configuration for the encdec-client crate

use std::{env, sync::LazyLock};

/// Base URL of the backend API
///
/// Default: "http://localhost:8000"
pub static ENCDEC_API_BASE: LazyLock<String> = LazyLock::new(|| {
    env::var("ENCDEC_API_BASE").unwrap_or_else(|_| "http://localhost:8000".to_string())
});

/// Validity window of a requested OTP, in seconds
///
/// Default: 120
pub static OTP_WINDOW_SECS: LazyLock<u32> = LazyLock::new(|| {
    env::var("OTP_WINDOW_SECS")
        .map(|v| {
            v.parse::<u32>().unwrap_or_else(|_| {
                tracing::warn!("Invalid OTP_WINDOW_SECS: {}. Using default 120", v);
                120
            })
        })
        .unwrap_or(120)
});

/// Delay after which field errors are cleared automatically, in seconds
///
/// Default: 5. Zero disables the auto-clear timer.
pub static FIELD_ERROR_CLEAR_SECS: LazyLock<u32> = LazyLock::new(|| {
    env::var("FIELD_ERROR_CLEAR_SECS")
        .map(|v| {
            v.parse::<u32>().unwrap_or_else(|_| {
                tracing::warn!("Invalid FIELD_ERROR_CLEAR_SECS: {}. Using default 5", v);
                5
            })
        })
        .unwrap_or(5)
});

/// HTTP request timeout for backend calls, in seconds
///
/// Default: 30
pub static HTTP_TIMEOUT_SECS: LazyLock<u64> = LazyLock::new(|| {
    env::var("HTTP_TIMEOUT_SECS")
        .map(|v| v.parse::<u64>().unwrap_or(30))
        .unwrap_or(30)
});

pub(crate) static PASSWORD_MIN_LENGTH: LazyLock<usize> = LazyLock::new(|| {
    env::var("PASSWORD_MIN_LENGTH")
        .map(|v| {
            v.parse::<usize>().unwrap_or_else(|_| {
                tracing::warn!("Invalid PASSWORD_MIN_LENGTH: {}. Using default 8", v);
                8
            })
        })
        .unwrap_or(8)
});

pub(crate) static PASSWORD_REQUIRE_MIXED: LazyLock<bool> = LazyLock::new(|| {
    env::var("PASSWORD_REQUIRE_MIXED").map_or(true, |v| match v.to_lowercase().as_str() {
        "true" => true,
        "false" => false,
        invalid => {
            tracing::warn!(
                "Invalid PASSWORD_REQUIRE_MIXED: {}. Using default 'true'",
                invalid
            );
            true
        }
    })
});

#[cfg(test)]
mod tests {
    use serial_test::serial;
    use std::env;

    /// Test the default API base used when the variable is unset
    ///
    /// The LazyLock may already be initialized by another test, so this
    /// exercises the same logic the static uses.
    #[test]
    #[serial]
    fn test_api_base_default() {
        let original = env::var("ENCDEC_API_BASE").ok();

        unsafe {
            env::remove_var("ENCDEC_API_BASE");
        }

        let base =
            env::var("ENCDEC_API_BASE").unwrap_or_else(|_| "http://localhost:8000".to_string());
        assert_eq!(base, "http://localhost:8000");

        if let Some(value) = original {
            unsafe {
                env::set_var("ENCDEC_API_BASE", value);
            }
        }
    }

    /// Test that an invalid OTP window falls back to the default
    #[test]
    #[serial]
    fn test_otp_window_invalid_falls_back() {
        let original = env::var("OTP_WINDOW_SECS").ok();

        unsafe {
            env::set_var("OTP_WINDOW_SECS", "not-a-number");
        }

        let window = env::var("OTP_WINDOW_SECS")
            .map(|v| v.parse::<u32>().unwrap_or(120))
            .unwrap_or(120);
        assert_eq!(window, 120);

        unsafe {
            if let Some(value) = original {
                env::set_var("OTP_WINDOW_SECS", value);
            } else {
                env::remove_var("OTP_WINDOW_SECS");
            }
        }
    }

    /// Test custom password minimum length parsing
    #[test]
    #[serial]
    fn test_password_min_length_custom() {
        let original = env::var("PASSWORD_MIN_LENGTH").ok();

        unsafe {
            env::set_var("PASSWORD_MIN_LENGTH", "6");
        }

        let min = env::var("PASSWORD_MIN_LENGTH")
            .map(|v| v.parse::<usize>().unwrap_or(8))
            .unwrap_or(8);
        assert_eq!(min, 6);

        unsafe {
            if let Some(value) = original {
                env::set_var("PASSWORD_MIN_LENGTH", value);
            } else {
                env::remove_var("PASSWORD_MIN_LENGTH");
            }
        }
    }
}
