//! Field invariants shared by the generator and the contract scenarios.
//!
//! The generator runs every produced username and email through these checks
//! before handing a fixture out, so a scenario can compare echoed fields
//! without re-validating them.
//!
//! # Rules
//!
//! - Usernames: non-empty, ASCII letters and digits only (`^[A-Za-z0-9]+$`)
//! - Emails: exactly one `@`, non-empty local part, a domain containing a dot
//!   that neither starts nor ends the domain, no whitespace

/// Returns `true` if the username is non-empty and ASCII alphanumeric.
///
/// # Examples
///
/// ```
/// use fixtures::is_valid_username;
///
/// assert!(is_valid_username("leanne42"));
/// assert!(!is_valid_username("leanne.graham"));
/// assert!(!is_valid_username(""));
/// ```
#[must_use]
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty() && username.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Strips every character outside `[A-Za-z0-9]` from a raw person name.
///
/// Diacritics are dropped rather than transliterated, so `"Zoë O'Brien"`
/// becomes `"ZoOBrien"`. The result may be empty for names written entirely
/// in a non-Latin script; callers must check [`is_valid_username`].
///
/// # Examples
///
/// ```
/// use fixtures::sanitize_username;
///
/// assert_eq!(sanitize_username("Marie-Claire Dubois"), "MarieClaireDubois");
/// assert_eq!(sanitize_username("山田 太郎"), "");
/// ```
#[must_use]
pub fn sanitize_username(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Returns `true` if the address has `local@domain` shape.
///
/// This is a syntax check only; it does not resolve the domain.
///
/// # Examples
///
/// ```
/// use fixtures::is_valid_email;
///
/// assert!(is_valid_email("Sincere@april.biz"));
/// assert!(!is_valid_email("no-at-sign.example.com"));
/// assert!(!is_valid_email("@example.com"));
/// assert!(!is_valid_email("user@localhost"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    //! Covers username sanitisation and email syntax checks.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Bret", true)]
    #[case("user123", true)]
    #[case("ABC", true)]
    #[case("", false)]
    #[case("john.doe", false)]
    #[case("john_doe", false)]
    #[case("john doe", false)]
    #[case("Zoë", false)]
    fn username_validity(#[case] username: &str, #[case] expected: bool) {
        assert_eq!(is_valid_username(username), expected);
    }

    #[rstest]
    #[case("Leanne Graham", "LeanneGraham")]
    #[case("O'Brien", "OBrien")]
    #[case("Zoë Saldaña", "ZoSaldaa")]
    #[case("a-b'c@d!e", "abcde")]
    #[case("!!!", "")]
    fn sanitize_strips_non_alphanumerics(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(sanitize_username(raw), expected);
    }

    #[test]
    fn sanitized_output_is_valid_when_non_empty() {
        let cleaned = sanitize_username("Dr. José-María Núñez III");
        assert!(is_valid_username(&cleaned), "unexpected: {cleaned}");
    }

    #[rstest]
    #[case("Sincere@april.biz", true)]
    #[case("john.doe@example.com", true)]
    #[case("a@b.co", true)]
    #[case("", false)]
    #[case("plainaddress", false)]
    #[case("@example.com", false)]
    #[case("user@", false)]
    #[case("user@localhost", false)]
    #[case("user@.example.com", false)]
    #[case("user@example.com.", false)]
    #[case("us er@example.com", false)]
    #[case("a@b@example.com", false)]
    fn email_validity(#[case] email: &str, #[case] expected: bool) {
        assert_eq!(is_valid_email(email), expected);
    }
}
