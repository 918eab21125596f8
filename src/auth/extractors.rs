use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};

use crate::error::AppError;
use crate::models::User;

/// The caller identity resolved by `AuthMiddleware`.
///
/// Handlers take this as an argument and pass the inner `User` explicitly
/// into every task service operation. If the middleware did not run (or
/// failed to attach a user) extraction answers 401 rather than panicking.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<User>().cloned() {
            Some(user) => ready(Ok(AuthenticatedUser(user))),
            None => ready(Err(
                AppError::Unauthenticated("Unauthenticated.".into()).into()
            )),
        }
    }
}
