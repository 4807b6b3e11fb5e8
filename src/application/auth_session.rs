//! Authentication session service.
//!
//! Drives registration, login, credential verification and the
//! password-reset flow. Passwords are one-way hashed before storage and
//! never compared in plaintext after the initial save; reset tokens are
//! stored only as SHA-256 hashes of the raw value transmitted to the user.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::domain::{validate_password, ApiError, Role, User, UserId};
use crate::ports::{Mailer, PasswordHasher, TokenService, UserRepository};

/// How long a password-reset token stays valid.
const RESET_TOKEN_TTL_MINUTES: i64 = 10;

/// Raw reset-token length in bytes before hex encoding.
const RESET_TOKEN_BYTES: usize = 20;

/// Login failures use one message for unknown email and wrong password so
/// responses cannot be used to enumerate accounts.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Registration request.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// A successfully authenticated user plus their freshly signed credential.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub user: User,
    pub token: String,
}

/// Session lifecycle service.
pub struct AuthSession {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
    mailer: Arc<dyn Mailer>,
}

impl AuthSession {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            mailer,
        }
    }

    /// Registers a new account and signs a first credential.
    pub async fn register(&self, input: RegisterInput) -> Result<AuthOutcome, ApiError> {
        if !input.role.assignable_at_registration() {
            return Err(ApiError::bad_request(format!(
                "Role {} cannot be chosen at registration",
                input.role
            )));
        }
        validate_password(&input.password)?;

        let password_hash = self.hasher.hash(&input.password)?;
        let user = User::new(
            UserId::new(),
            input.name,
            input.email,
            password_hash,
            input.role,
        )?;

        self.users.insert(&user).await?;

        let token = self.tokens.sign(user.id())?;
        Ok(AuthOutcome { user, token })
    }

    /// Authenticates by email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, ApiError> {
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::bad_request("Please provide an email and password"));
        }

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIALS))?;

        if !self.hasher.verify(password, user.password_hash())? {
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self.tokens.sign(user.id())?;
        Ok(AuthOutcome { user, token })
    }

    /// Validates a bearer credential and resolves the current user record.
    ///
    /// The record is fetched fresh on every call; a session never caches a
    /// stale copy of role or identity beyond one request.
    pub async fn verify(&self, token: &str) -> Result<User, ApiError> {
        let user_id = self.tokens.verify(token)?;
        self.users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Not authorized to access this route"))
    }

    /// Updates name and/or email on the authenticated account.
    pub async fn update_details(
        &self,
        user_id: &UserId,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<User, ApiError> {
        let mut user = self.require_user(user_id).await?;
        user.update_details(name, email)?;
        self.users.update(&user).await?;
        Ok(user)
    }

    /// Changes the password, requiring the current one to match.
    pub async fn change_password(
        &self,
        user_id: &UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<AuthOutcome, ApiError> {
        let mut user = self.require_user(user_id).await?;

        if !self.hasher.verify(current_password, user.password_hash())? {
            return Err(ApiError::unauthorized("Password is incorrect"));
        }
        validate_password(new_password)?;

        user.set_password_hash(self.hasher.hash(new_password)?);
        self.users.update(&user).await?;

        let token = self.tokens.sign(user.id())?;
        Ok(AuthOutcome { user, token })
    }

    /// Issues a password-reset token and emails the reset link.
    ///
    /// Only the SHA-256 hash of the token is persisted; the raw value is
    /// transmitted in the email and returned for the caller's link. When
    /// the email cannot be sent the stored token is cleared again.
    pub async fn forgot_password(
        &self,
        email: &str,
        reset_url_base: &str,
    ) -> Result<String, ApiError> {
        let mut user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| ApiError::not_found("There is no user with that email"))?;

        let raw_token = generate_reset_token();
        let expire = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
        user.set_reset_token(hash_reset_token(&raw_token), expire);
        self.users.update(&user).await?;

        let reset_url = format!("{}/{}", reset_url_base.trim_end_matches('/'), raw_token);
        let message = format!(
            "You are receiving this email because a password reset was requested. \
             Please make a PUT request to: {}",
            reset_url
        );

        if let Err(err) = self
            .mailer
            .send(user.email(), "Password reset token", &message)
            .await
        {
            tracing::error!(error = %err, "reset email could not be sent");
            user.clear_reset_token();
            self.users.update(&user).await?;
            return Err(ApiError::internal("Email could not be sent"));
        }

        Ok(raw_token)
    }

    /// Consumes a reset token: single use, denied once expired.
    pub async fn reset_password(
        &self,
        raw_token: &str,
        new_password: &str,
    ) -> Result<AuthOutcome, ApiError> {
        let mut user = self
            .users
            .find_by_reset_token(&hash_reset_token(raw_token))
            .await?
            .ok_or_else(|| ApiError::unauthorized("Invalid token"))?;

        if !user.reset_token_valid_at(Utc::now()) {
            return Err(ApiError::unauthorized("Invalid token"));
        }
        validate_password(new_password)?;

        user.set_password_hash(self.hasher.hash(new_password)?);
        user.clear_reset_token();
        self.users.update(&user).await?;

        let token = self.tokens.sign(user.id())?;
        Ok(AuthOutcome { user, token })
    }

    async fn require_user(&self, user_id: &UserId) -> Result<User, ApiError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("No user found"))
    }
}

/// Random hex token transmitted to the user; never persisted raw.
fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// One-way hash stored in place of the raw reset token.
fn hash_reset_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryUserRepository;
    use crate::domain::ErrorCode;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Reversible stand-in for bcrypt; fast and deterministic.
    struct FakeHasher;

    impl PasswordHasher for FakeHasher {
        fn hash(&self, plain: &str) -> Result<String, ApiError> {
            Ok(format!("hashed:{}", plain))
        }

        fn verify(&self, plain: &str, hash: &str) -> Result<bool, ApiError> {
            Ok(hash == format!("hashed:{}", plain))
        }
    }

    /// Token service that encodes the user id directly.
    struct FakeTokens;

    impl TokenService for FakeTokens {
        fn sign(&self, user_id: &UserId) -> Result<String, ApiError> {
            Ok(user_id.to_string())
        }

        fn verify(&self, token: &str) -> Result<UserId, ApiError> {
            token
                .parse()
                .map_err(|_| ApiError::unauthorized("Not authorized to access this route"))
        }
    }

    struct RecordingMailer {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl RecordingMailer {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, to: &str, _subject: &str, body: &str) -> Result<(), ApiError> {
            if self.fail {
                return Err(ApiError::internal("smtp down"));
            }
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), body.to_string()));
            Ok(())
        }
    }

    struct Fixture {
        users: Arc<MemoryUserRepository>,
        session: AuthSession,
    }

    fn fixture_with_mailer(mailer: RecordingMailer) -> Fixture {
        let users = Arc::new(MemoryUserRepository::new());
        let session = AuthSession::new(
            users.clone(),
            Arc::new(FakeHasher),
            Arc::new(FakeTokens),
            Arc::new(mailer),
        );
        Fixture { users, session }
    }

    fn fixture() -> Fixture {
        fixture_with_mailer(RecordingMailer::new())
    }

    fn register_input(email: &str) -> RegisterInput {
        RegisterInput {
            name: "John".into(),
            email: email.into(),
            password: "secret123".into(),
            role: Role::Publisher,
        }
    }

    #[tokio::test]
    async fn register_then_login_round_trips() {
        let fx = fixture();
        let registered = fx.session.register(register_input("j@d.com")).await.unwrap();

        let logged_in = fx.session.login("j@d.com", "secret123").await.unwrap();
        assert_eq!(logged_in.user.id(), registered.user.id());

        // Credential resolves a fresh user record.
        let verified = fx.session.verify(&logged_in.token).await.unwrap();
        assert_eq!(verified.id(), registered.user.id());
    }

    #[tokio::test]
    async fn register_rejects_admin_role_and_duplicate_email() {
        let fx = fixture();
        let mut input = register_input("a@b.com");
        input.role = Role::Admin;
        assert_eq!(
            fx.session.register(input).await.unwrap_err().code,
            ErrorCode::BadRequest
        );

        fx.session.register(register_input("a@b.com")).await.unwrap();
        assert_eq!(
            fx.session
                .register(register_input("a@b.com"))
                .await
                .unwrap_err()
                .code,
            ErrorCode::DuplicateKey
        );
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let fx = fixture();
        fx.session.register(register_input("a@b.com")).await.unwrap();

        let unknown = fx.session.login("ghost@b.com", "secret123").await.unwrap_err();
        let wrong = fx.session.login("a@b.com", "wrongpass").await.unwrap_err();

        assert_eq!(unknown.code, ErrorCode::Unauthorized);
        assert_eq!(wrong.code, ErrorCode::Unauthorized);
        assert_eq!(unknown.message, wrong.message);
    }

    #[tokio::test]
    async fn reset_token_is_single_use() {
        let fx = fixture();
        fx.session.register(register_input("a@b.com")).await.unwrap();

        let raw = fx
            .session
            .forgot_password("a@b.com", "http://localhost/api/v1/auth/resetpassword")
            .await
            .unwrap();

        // Raw token is never stored verbatim.
        let stored = fx.users.find_by_email("a@b.com").await.unwrap().unwrap();
        assert_ne!(stored.reset_password_token().unwrap(), raw);

        let outcome = fx.session.reset_password(&raw, "newsecret").await.unwrap();
        assert_eq!(outcome.user.email(), "a@b.com");

        // Replay with the same raw token is denied.
        let replay = fx.session.reset_password(&raw, "again123").await.unwrap_err();
        assert_eq!(replay.code, ErrorCode::Unauthorized);

        // And the new password works.
        assert!(fx.session.login("a@b.com", "newsecret").await.is_ok());
    }

    #[tokio::test]
    async fn failed_email_clears_the_stored_token() {
        let fx = fixture_with_mailer(RecordingMailer::failing());
        fx.session.register(register_input("a@b.com")).await.unwrap();

        let err = fx
            .session
            .forgot_password("a@b.com", "http://localhost/reset")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalError);

        let stored = fx.users.find_by_email("a@b.com").await.unwrap().unwrap();
        assert!(stored.reset_password_token().is_none());
        assert!(stored.reset_password_expire().is_none());
    }

    #[tokio::test]
    async fn change_password_requires_current_password() {
        let fx = fixture();
        let registered = fx.session.register(register_input("a@b.com")).await.unwrap();

        let err = fx
            .session
            .change_password(registered.user.id(), "wrong", "newsecret")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);

        fx.session
            .change_password(registered.user.id(), "secret123", "newsecret")
            .await
            .unwrap();
        assert!(fx.session.login("a@b.com", "newsecret").await.is_ok());
    }
}
