use crate::model::common::Role;

/// An access level a route can demand via [`super::AuthToken`].
///
/// Implementors are zero-sized markers; the predicate decides which roles
/// pass the request guard.
pub trait Access {
    /// Does the given role satisfy this access level?
    fn permits(role: Role) -> bool;
}

/// Any authenticated member, regardless of role.
pub struct Member;

impl Access for Member {
    fn permits(_role: Role) -> bool {
        true
    }
}

/// Super-admin access: election lifecycle, candidate approval, moderation.
pub struct Admin;

impl Access for Admin {
    fn permits(role: Role) -> bool {
        role.can_moderate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_access_permits_all_roles() {
        for role in [Role::Voter, Role::Candidate, Role::Executive, Role::SuperAdmin] {
            assert!(Member::permits(role));
        }
    }

    #[test]
    fn admin_access_permits_super_admins_only() {
        assert!(Admin::permits(Role::SuperAdmin));
        assert!(!Admin::permits(Role::Voter));
        assert!(!Admin::permits(Role::Candidate));
        assert!(!Admin::permits(Role::Executive));
    }
}
