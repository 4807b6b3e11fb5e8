//! Ports - trait boundaries between the application core and its
//! collaborators (stores, hashing, tokens, email, geocoding, file storage).

mod bootcamp_repository;
mod course_repository;
mod geocoder;
mod mailer;
mod password_hasher;
mod photo_storage;
mod review_repository;
mod token_service;
mod user_repository;

pub use bootcamp_repository::BootcampRepository;
pub use course_repository::CourseRepository;
pub use geocoder::Geocoder;
pub use mailer::Mailer;
pub use password_hasher::PasswordHasher;
pub use photo_storage::PhotoStorage;
pub use review_repository::ReviewRepository;
pub use token_service::TokenService;
pub use user_repository::UserRepository;
