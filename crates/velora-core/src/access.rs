//! # Access Module
//!
//! The permission model consumed by admin operations.
//!
//! Permissions are `(action, resource)` pairs from creation. There is no
//! string parsing of permission names anywhere; grouping by resource is a
//! field access, not a prefix strip. Storage and editing of role grants
//! live outside this workspace; services only ask a [`PermissionSet`]
//! "does the acting user hold this pair".

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// What a permission allows doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
}

/// What a permission applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Products,
    Orders,
    Users,
    Roles,
}

/// One grantable capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    pub action: Action,
    pub resource: Resource,
}

impl Permission {
    pub const fn new(action: Action, resource: Resource) -> Self {
        Permission { action, resource }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?}", self.action, self.resource)
    }
}

/// The set of permissions held by an acting user.
///
/// Supplied by the session/identity provider per request; services treat
/// it as read-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionSet {
    grants: HashSet<Permission>,
}

impl PermissionSet {
    /// An empty set (a plain customer).
    pub fn new() -> Self {
        PermissionSet {
            grants: HashSet::new(),
        }
    }

    /// Adds a grant. Idempotent.
    pub fn grant(&mut self, permission: Permission) {
        self.grants.insert(permission);
    }

    /// Checks whether the set holds the exact `(action, resource)` pair.
    pub fn allows(&self, permission: Permission) -> bool {
        self.grants.contains(&permission)
    }

    /// Returns all grants touching the given resource, for admin screens
    /// that group capabilities per resource.
    pub fn for_resource(&self, resource: Resource) -> Vec<Permission> {
        self.grants
            .iter()
            .copied()
            .filter(|p| p.resource == resource)
            .collect()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        PermissionSet {
            grants: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_exact_pair_only() {
        let set: PermissionSet =
            [Permission::new(Action::Edit, Resource::Products)].into_iter().collect();

        assert!(set.allows(Permission::new(Action::Edit, Resource::Products)));
        assert!(!set.allows(Permission::new(Action::Delete, Resource::Products)));
        assert!(!set.allows(Permission::new(Action::Edit, Resource::Orders)));
    }

    #[test]
    fn test_grant_is_idempotent() {
        let mut set = PermissionSet::new();
        let p = Permission::new(Action::View, Resource::Orders);
        set.grant(p);
        set.grant(p);

        assert_eq!(set.for_resource(Resource::Orders).len(), 1);
    }

    #[test]
    fn test_for_resource_filters() {
        let set: PermissionSet = [
            Permission::new(Action::View, Resource::Products),
            Permission::new(Action::Edit, Resource::Products),
            Permission::new(Action::View, Resource::Users),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.for_resource(Resource::Products).len(), 2);
        assert_eq!(set.for_resource(Resource::Roles).len(), 0);
    }
}
