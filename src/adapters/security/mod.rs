//! Credential adapters: password hashing and bearer-token signing.

mod bcrypt;
mod jwt;

pub use self::bcrypt::BcryptHasher;
pub use self::jwt::JwtTokenService;
