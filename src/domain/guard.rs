//! Ownership-based authorization decisions.
//!
//! One decision function is applied uniformly to update and delete on
//! bootcamps, courses and reviews: admins may do anything; everyone else
//! must own the resource and hold one of the roles required by the route.
//! Denials always surface as `Forbidden` errors with a readable reason,
//! never as silent no-ops.

use super::{ApiError, Role, UserId};

/// The authenticated identity performing a request.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Pure decision function for resource mutations.
pub struct OwnershipGuard;

impl OwnershipGuard {
    /// Allows iff the actor is an admin, or owns the resource and holds one
    /// of `required_roles`.
    ///
    /// `resource` names the resource kind for the denial message.
    pub fn authorize(
        actor: &Actor,
        resource_owner: &UserId,
        required_roles: &[Role],
        resource: &str,
    ) -> Result<(), ApiError> {
        if actor.is_admin() {
            return Ok(());
        }
        if &actor.id == resource_owner && required_roles.contains(&actor.role) {
            return Ok(());
        }

        Err(ApiError::forbidden(format!(
            "User {} is not authorized to modify this {}",
            actor.id, resource
        ))
        .with_detail("owner_id", resource_owner.to_string())
        .with_detail("requested_by", actor.id.to_string()))
    }

    /// Route-level role check, independent of any resource instance.
    pub fn require_role(actor: &Actor, required_roles: &[Role]) -> Result<(), ApiError> {
        if actor.is_admin() || required_roles.contains(&actor.role) {
            return Ok(());
        }
        Err(ApiError::forbidden(format!(
            "User role {} is not authorized to access this route",
            actor.role
        )))
    }

    /// One-bootcamp-per-publisher cap: a non-admin actor that already owns a
    /// bootcamp may not publish another.
    pub fn enforce_bootcamp_cap(actor: &Actor, already_owns_one: bool) -> Result<(), ApiError> {
        if already_owns_one && !actor.is_admin() {
            return Err(ApiError::bad_request(format!(
                "The user with ID {} has already published a bootcamp",
                actor.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;

    fn actor(role: Role) -> Actor {
        Actor::new(UserId::new(), role)
    }

    #[test]
    fn owner_with_matching_role_is_allowed() {
        let publisher = actor(Role::Publisher);
        let result = OwnershipGuard::authorize(
            &publisher,
            &publisher.id,
            &[Role::Publisher, Role::Admin],
            "bootcamp",
        );
        assert!(result.is_ok());
    }

    #[test]
    fn owner_with_wrong_role_is_denied() {
        let user = actor(Role::User);
        let result =
            OwnershipGuard::authorize(&user, &user.id, &[Role::Publisher, Role::Admin], "bootcamp");
        assert_eq!(result.unwrap_err().code, ErrorCode::Forbidden);
    }

    #[test]
    fn non_owner_is_denied_regardless_of_role() {
        let publisher = actor(Role::Publisher);
        let other_owner = UserId::new();
        let err = OwnershipGuard::authorize(
            &publisher,
            &other_owner,
            &[Role::Publisher, Role::Admin],
            "course",
        )
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::Forbidden);
        assert!(err.message.contains("not authorized"));
        assert_eq!(err.details.get("owner_id"), Some(&other_owner.to_string()));
    }

    #[test]
    fn admin_is_always_allowed() {
        let admin = actor(Role::Admin);
        let result = OwnershipGuard::authorize(&admin, &UserId::new(), &[Role::Publisher], "review");
        assert!(result.is_ok());
    }

    #[test]
    fn bootcamp_cap_blocks_non_admin_second_bootcamp() {
        let publisher = actor(Role::Publisher);
        assert!(OwnershipGuard::enforce_bootcamp_cap(&publisher, false).is_ok());

        let err = OwnershipGuard::enforce_bootcamp_cap(&publisher, true).unwrap_err();
        assert_eq!(err.code, ErrorCode::BadRequest);
    }

    #[test]
    fn bootcamp_cap_exempts_admin() {
        let admin = actor(Role::Admin);
        assert!(OwnershipGuard::enforce_bootcamp_cap(&admin, true).is_ok());
    }

    #[test]
    fn require_role_rejects_unprivileged_actor() {
        let user = actor(Role::User);
        assert!(OwnershipGuard::require_role(&user, &[Role::Publisher]).is_err());
        assert!(OwnershipGuard::require_role(&user, &[Role::User]).is_ok());
        assert!(OwnershipGuard::require_role(&actor(Role::Admin), &[Role::Publisher]).is_ok());
    }
}
