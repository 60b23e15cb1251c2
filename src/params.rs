//! Validation of user-supplied parameters before any work starts.

use std::net::SocketAddr;
use std::ops::RangeInclusive;

use crate::logo::LogoSpec;

/// Accepted edge length of the square mark.
pub const SQUARE_SIZES: RangeInclusive<u32> = 32..=8192;

/// Accepted lockup width and height.
pub const LOCKUP_SIZES: RangeInclusive<u32> = 64..=8192;

/// Validate the initials drawn in the center plate.
///
/// # Errors
///
/// Returns an error if the initials are empty or only whitespace.
pub fn validate_initials(initials: &str) -> Result<(), String> {
    if initials.trim().is_empty() {
        Err("Initials must not be empty".to_string())
    } else {
        Ok(())
    }
}

/// Validate the square mark size.
///
/// # Errors
///
/// Returns an error if the size is out of range.
pub fn validate_square_size(size: u32) -> Result<(), String> {
    if SQUARE_SIZES.contains(&size) {
        Ok(())
    } else {
        Err(format!(
            "Unsupported size {size}. Valid: {}..={}",
            SQUARE_SIZES.start(),
            SQUARE_SIZES.end()
        ))
    }
}

/// Validate the lockup dimensions.
///
/// # Errors
///
/// Returns an error if either side is out of range or the lockup is not wider than tall.
pub fn validate_lockup(width: u32, height: u32) -> Result<(), String> {
    for (label, value) in [("width", width), ("height", height)] {
        if !LOCKUP_SIZES.contains(&value) {
            return Err(format!(
                "Unsupported lockup {label} {value}. Valid: {}..={}",
                LOCKUP_SIZES.start(),
                LOCKUP_SIZES.end()
            ));
        }
    }
    if width <= height {
        return Err(format!("Lockup must be wider than tall, got {width}x{height}"));
    }
    Ok(())
}

/// Validate everything the generator needs.
///
/// # Errors
///
/// Returns the first failing check.
pub fn validate_logo(spec: &LogoSpec) -> Result<(), String> {
    validate_initials(&spec.initials)?;
    validate_square_size(spec.size)?;
    validate_lockup(spec.lockup_width, spec.lockup_height)
}

/// Parse the listen address.
///
/// # Errors
///
/// Returns an error if the value is not an `ip:port` socket address.
pub fn validate_bind(bind: &str) -> Result<SocketAddr, String> {
    bind.parse()
        .map_err(|e| format!("Invalid bind address '{bind}': {e}. Expected ip:port, e.g. 127.0.0.1:5000"))
}

/// Validate the form endpoint path.
///
/// # Errors
///
/// Returns an error if the route does not start with `/`.
pub fn validate_route(route: &str) -> Result<(), String> {
    if route.starts_with('/') {
        Ok(())
    } else {
        Err(format!("Invalid route '{route}'. It must start with '/'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_must_have_content() {
        assert!(validate_initials("IGP").is_ok());
        assert!(validate_initials("").is_err());
        assert!(validate_initials("   ").is_err());
    }

    #[test]
    fn square_size_bounds() {
        assert!(validate_square_size(32).is_ok());
        assert!(validate_square_size(1024).is_ok());
        assert!(validate_square_size(8192).is_ok());
        assert!(validate_square_size(31).is_err());
        assert!(validate_square_size(8193).is_err());
    }

    #[test]
    fn lockup_must_be_landscape() {
        assert!(validate_lockup(1400, 420).is_ok());
        assert!(validate_lockup(420, 420).is_err());
        assert!(validate_lockup(300, 1400).is_err());
    }

    #[test]
    fn lockup_bounds() {
        assert!(validate_lockup(64, 63).is_err());
        assert!(validate_lockup(9000, 420).is_err());
    }

    #[test]
    fn default_logo_is_valid() {
        assert!(validate_logo(&LogoSpec::default()).is_ok());
    }

    #[test]
    fn logo_reports_first_failure() {
        let spec = LogoSpec { initials: String::new(), size: 1, ..LogoSpec::default() };
        assert_eq!(validate_logo(&spec).unwrap_err(), "Initials must not be empty");
    }

    #[test]
    fn bind_parses_socket_address() {
        assert_eq!(validate_bind("127.0.0.1:5000").unwrap().port(), 5000);
        assert!(validate_bind("[::1]:8080").is_ok());
        assert!(validate_bind("localhost").is_err());
        assert!(validate_bind("127.0.0.1").is_err());
    }

    #[test]
    fn route_needs_leading_slash() {
        assert!(validate_route("/procesar_formulario").is_ok());
        assert!(validate_route("procesar_formulario").is_err());
        assert!(validate_route("").is_err());
    }
}
