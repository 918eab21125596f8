pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::Deserialize;
use validator::Validate;

pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};

/// Payload for the login endpoint.
///
/// The email must be syntactically valid; the password only has to be
/// present. Whether the pair matches an account is decided later, and a
/// mismatch answers the same way no matter which half was wrong.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "The email field must be a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, message = "The password field is required."))]
    pub password: String,
}

/// Payload for the register endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "The name field is required."
    ))]
    pub name: String,
    #[validate(email(message = "The email field must be a valid email address."))]
    pub email: String,
    #[validate(length(
        min = 8,
        message = "The password field must be at least 8 characters."
    ))]
    pub password: String,
}
