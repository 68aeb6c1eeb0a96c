//! Role and email-domain policy.
//!
//! Corporate addresses belong to staff, every other address belongs to
//! customers. The same check runs for registration, admin creation, the
//! superadmin bootstrap and every email change.

use srrobot_core::{Email, Role};

use super::AuthError;

/// Central access policy.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    corporate_domain: String,
}

impl AccessPolicy {
    /// Create a policy for `corporate_domain` (with or without a leading `@`).
    #[must_use]
    pub fn new(corporate_domain: &str) -> Self {
        Self {
            corporate_domain: corporate_domain
                .trim()
                .trim_start_matches('@')
                .to_ascii_lowercase(),
        }
    }

    /// The corporate domain, without `@`.
    #[must_use]
    pub fn corporate_domain(&self) -> &str {
        &self.corporate_domain
    }

    /// Whether `email` is a corporate address.
    #[must_use]
    pub fn is_corporate(&self, email: &Email) -> bool {
        email.has_domain(&self.corporate_domain)
    }

    /// Check that `email` may hold `role`.
    ///
    /// # Errors
    ///
    /// Returns `CorporateEmailRequired` for a staff role with a non-corporate
    /// email and `CorporateEmailReserved` for a customer with a corporate one.
    pub fn check_email(&self, email: &Email, role: Role) -> Result<(), AuthError> {
        match (role.is_staff(), self.is_corporate(email)) {
            (true, false) => Err(AuthError::CorporateEmailRequired(
                self.corporate_domain.clone(),
            )),
            (false, true) => Err(AuthError::CorporateEmailReserved),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    #[test]
    fn test_domain_normalization() {
        assert_eq!(AccessPolicy::new("@SrRobot.com").corporate_domain(), "srrobot.com");
        assert_eq!(AccessPolicy::new(" srrobot.com ").corporate_domain(), "srrobot.com");
    }

    #[test]
    fn test_staff_requires_corporate_email() {
        let policy = AccessPolicy::new("srrobot.com");
        assert!(policy.check_email(&email("ana@srrobot.com"), Role::Admin).is_ok());
        assert!(policy.check_email(&email("ANA@SRROBOT.COM"), Role::Superadmin).is_ok());
        assert!(matches!(
            policy.check_email(&email("ana@gmail.com"), Role::Admin),
            Err(AuthError::CorporateEmailRequired(d)) if d == "srrobot.com"
        ));
    }

    #[test]
    fn test_customers_cannot_use_corporate_email() {
        let policy = AccessPolicy::new("srrobot.com");
        assert!(policy.check_email(&email("ana@gmail.com"), Role::User).is_ok());
        assert!(matches!(
            policy.check_email(&email("ana@srrobot.com"), Role::User),
            Err(AuthError::CorporateEmailReserved)
        ));
    }

    #[test]
    fn test_lookalike_domains_are_not_corporate() {
        let policy = AccessPolicy::new("srrobot.com");
        assert!(!policy.is_corporate(&email("ana@notsrrobot.com")));
        assert!(!policy.is_corporate(&email("ana@srrobot.com.evil.io")));
        assert!(!policy.is_corporate(&email("srrobot.com@gmail.com")));
    }
}
