//! Admin-only user management service.

use std::sync::Arc;

use crate::domain::{
    validate_password, Actor, ApiError, ListParams, ListResult, OwnershipGuard, Role, User, UserId,
};
use crate::ports::{PasswordHasher, UserRepository};

/// Fields clients may filter, sort or select on for user lists.
pub const USER_QUERY_FIELDS: &[&str] = &["name", "email", "role", "createdAt"];

/// User CRUD reserved for administrators. Every operation checks the
/// actor's role; there is no ownership escape hatch here.
pub struct UserAdminService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserAdminService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    pub async fn list(
        &self,
        actor: &Actor,
        params: &ListParams,
    ) -> Result<ListResult<User>, ApiError> {
        require_admin(actor)?;
        self.users.list(params).await
    }

    pub async fn get(&self, actor: &Actor, id: &UserId) -> Result<User, ApiError> {
        require_admin(actor)?;
        self.require_user(id).await
    }

    /// Creates an account with any role, including admin.
    pub async fn create(
        &self,
        actor: &Actor,
        name: String,
        email: String,
        password: String,
        role: Role,
    ) -> Result<User, ApiError> {
        require_admin(actor)?;
        validate_password(&password)?;

        let password_hash = self.hasher.hash(&password)?;
        let user = User::new(UserId::new(), name, email, password_hash, role)?;
        self.users.insert(&user).await?;
        Ok(user)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &UserId,
        name: Option<String>,
        email: Option<String>,
        role: Option<Role>,
        password: Option<String>,
    ) -> Result<User, ApiError> {
        require_admin(actor)?;
        let mut user = self.require_user(id).await?;

        user.update_details(name, email)?;
        if let Some(role) = role {
            user.set_role(role);
        }
        if let Some(password) = password {
            validate_password(&password)?;
            user.set_password_hash(self.hasher.hash(&password)?);
        }

        self.users.update(&user).await?;
        Ok(user)
    }

    pub async fn delete(&self, actor: &Actor, id: &UserId) -> Result<(), ApiError> {
        require_admin(actor)?;
        if !self.users.delete(id).await? {
            return Err(ApiError::not_found("No user found"));
        }
        Ok(())
    }

    async fn require_user(&self, id: &UserId) -> Result<User, ApiError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("No user found"))
    }
}

fn require_admin(actor: &Actor) -> Result<(), ApiError> {
    OwnershipGuard::require_role(actor, &[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryUserRepository;
    use crate::domain::ErrorCode;

    struct FakeHasher;

    impl PasswordHasher for FakeHasher {
        fn hash(&self, plain: &str) -> Result<String, ApiError> {
            Ok(format!("hashed:{}", plain))
        }

        fn verify(&self, plain: &str, hash: &str) -> Result<bool, ApiError> {
            Ok(hash == format!("hashed:{}", plain))
        }
    }

    fn service() -> UserAdminService {
        UserAdminService::new(Arc::new(MemoryUserRepository::new()), Arc::new(FakeHasher))
    }

    fn admin() -> Actor {
        Actor::new(UserId::new(), Role::Admin)
    }

    #[tokio::test]
    async fn non_admin_is_rejected_everywhere() {
        let svc = service();
        let user = Actor::new(UserId::new(), Role::Publisher);

        let err = svc.list(&user, &ListParams::default()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let err = svc
            .create(
                &user,
                "X".into(),
                "x@y.com".into(),
                "secret123".into(),
                Role::User,
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn admin_can_manage_accounts() {
        let svc = service();
        let root = admin();

        let created = svc
            .create(
                &root,
                "Jane".into(),
                "jane@x.com".into(),
                "secret123".into(),
                Role::Publisher,
            )
            .await
            .unwrap();

        let promoted = svc
            .update(&root, created.id(), None, None, Some(Role::Admin), None)
            .await
            .unwrap();
        assert_eq!(promoted.role(), Role::Admin);

        svc.delete(&root, created.id()).await.unwrap();
        assert_eq!(
            svc.get(&root, created.id()).await.unwrap_err().code,
            ErrorCode::NotFound
        );
    }
}
