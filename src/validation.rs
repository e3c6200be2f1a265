//! Email address validation.
//!
//! Accepts a plain `local@domain` address in dot-atom form:
//!
//! - local part: printable `atext` characters separated by single dots
//! - domain: one or more labels of letters, digits and inner hyphens
//! - no display names, comments, quoted strings or address literals
//!
//! Single-label domains such as `sanae@x` are accepted.

/// Maximum total length of an address.
pub const EMAIL_MAX: usize = 254;

/// Maximum length of the local part.
const LOCAL_PART_MAX: usize = 64;

/// Maximum length of a domain label.
const LABEL_MAX: usize = 63;

/// Returns true if `email` is a syntactically valid address.
///
/// # Examples
///
/// ```
/// use connectfour::is_valid_email;
///
/// assert!(is_valid_email("sanae@evilnerd.nl"));
/// assert!(!is_valid_email("sanae"));
/// assert!(!is_valid_email("sanae@@evilnerd.nl"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > EMAIL_MAX {
        return false;
    }
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    is_valid_local_part(local) && is_valid_domain(domain)
}

fn is_valid_local_part(local: &str) -> bool {
    local.len() <= LOCAL_PART_MAX
        && local
            .split('.')
            .all(|atom| !atom.is_empty() && atom.chars().all(is_atext))
}

fn is_valid_domain(domain: &str) -> bool {
    !domain.is_empty() && domain.split('.').all(is_valid_label)
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= LABEL_MAX
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

const fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '#'
                | '$'
                | '%'
                | '&'
                | '\''
                | '*'
                | '+'
                | '-'
                | '/'
                | '='
                | '?'
                | '^'
                | '_'
                | '`'
                | '{'
                | '|'
                | '}'
                | '~'
        )
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("sanae@evilnerd.nl")]
    #[case("sanae@x")]
    #[case("dick.van.dyke@example.co.uk")]
    #[case("first+tag@example.com")]
    #[case("o'brien@example.com")]
    #[case("UPPER@EXAMPLE.COM")]
    #[case("a@b-c.d")]
    fn accepts(#[case] email: &str) {
        assert!(is_valid_email(email), "{email} should be valid");
    }

    #[rstest]
    #[case("")]
    #[case("sanae")]
    #[case("@evilnerd.nl")]
    #[case("sanae@")]
    #[case("sanae@@evilnerd.nl")]
    #[case(".sanae@evilnerd.nl")]
    #[case("sanae.@evilnerd.nl")]
    #[case("sa..nae@evilnerd.nl")]
    #[case("sanae@evilnerd..nl")]
    #[case("sanae@-evilnerd.nl")]
    #[case("sanae@evilnerd-.nl")]
    #[case("sanae@evil nerd.nl")]
    #[case("sa nae@evilnerd.nl")]
    #[case("Sanae <sanae@evilnerd.nl>")]
    fn rejects(#[case] email: &str) {
        assert!(!is_valid_email(email), "{email} should be invalid");
    }

    #[test]
    fn rejects_overlong_local_part() {
        let email = format!("{}@example.com", "a".repeat(LOCAL_PART_MAX + 1));
        assert!(!is_valid_email(&email));
    }

    #[test]
    fn rejects_overlong_address() {
        let domain = vec!["a".repeat(LABEL_MAX); 4].join(".");
        let email = format!("sanae@{domain}");
        assert!(email.len() > EMAIL_MAX);
        assert!(!is_valid_email(&email));
    }
}
