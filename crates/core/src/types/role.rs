//! Principal roles and role sets.
//!
//! Roles form a strict hierarchy: `user` < `admin` < `superadmin`. Routes are
//! gated by a [`RoleSet`] rather than by a minimum level so that a route can
//! name exactly who may call it.

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown role name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0}")]
pub struct RoleParseError(pub String);

/// Role of an authenticated principal.
///
/// Serialized in lowercase (`"user"`, `"admin"`, `"superadmin"`) both on the
/// wire and in token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.principal_role", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A customer.
    User,
    /// Store staff: manages the product catalog.
    Admin,
    /// The single owner account: manages categories and admins.
    Superadmin,
}

impl Role {
    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Superadmin => "superadmin",
        }
    }

    /// Whether this is a staff role (`admin` or `superadmin`).
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Admin | Self::Superadmin)
    }

    /// Whether the role is at least as privileged as `other`.
    #[must_use]
    pub fn at_least(self, other: Self) -> bool {
        self >= other
    }

    const fn bit(self) -> u8 {
        match self {
            Self::User => 0b001,
            Self::Admin => 0b010,
            Self::Superadmin => 0b100,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "superadmin" => Ok(Self::Superadmin),
            _ => Err(RoleParseError(s.to_owned())),
        }
    }
}

/// A set of roles permitted to call an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleSet(u8);

impl RoleSet {
    /// Every role, i.e. any authenticated principal.
    pub const ANY: Self = Self(0b111);
    /// Admins and the superadmin.
    pub const STAFF: Self = Self(0b110);
    /// Only the superadmin.
    pub const SUPERADMIN: Self = Self(0b100);

    /// Build a set from a list of roles.
    #[must_use]
    pub const fn of(roles: &[Role]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < roles.len() {
            bits |= roles[i].bit();
            i += 1;
        }
        Self(bits)
    }

    /// Whether `role` belongs to the set.
    #[must_use]
    pub const fn contains(self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_hierarchy() {
        assert!(Role::User < Role::Admin);
        assert!(Role::Admin < Role::Superadmin);
        assert!(Role::Superadmin.at_least(Role::Admin));
        assert!(!Role::User.at_least(Role::Admin));
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Superadmin).unwrap(), "\"superadmin\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("super_admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_is_staff() {
        assert!(!Role::User.is_staff());
        assert!(Role::Admin.is_staff());
        assert!(Role::Superadmin.is_staff());
    }

    #[test]
    fn test_role_sets() {
        assert!(RoleSet::ANY.contains(Role::User));
        assert!(RoleSet::STAFF.contains(Role::Admin));
        assert!(RoleSet::STAFF.contains(Role::Superadmin));
        assert!(!RoleSet::STAFF.contains(Role::User));
        assert!(RoleSet::SUPERADMIN.contains(Role::Superadmin));
        assert!(!RoleSet::SUPERADMIN.contains(Role::Admin));
        assert_eq!(RoleSet::of(&[Role::Admin, Role::Superadmin]), RoleSet::STAFF);
    }
}
