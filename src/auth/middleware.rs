use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::PgPool;

use crate::auth::token;
use crate::error::AppError;

/// Bearer-token guard for the `/api` scope.
///
/// Pulls the `Authorization: Bearer` header, resolves the token against the
/// store, and attaches the resolved `User` to request extensions for the
/// `AuthenticatedUser` extractor. Requests without a resolvable token are
/// rejected before any handler runs.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    // Rc because the token lookup awaits the database inside the boxed
    // future, which needs its own handle on the inner service.
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Credential exchange endpoints stay reachable without a token.
        let path = req.path();
        if path.starts_with("/api/login") || path.starts_with("/api/register") {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let Some(pool) = req.app_data::<web::Data<PgPool>>().cloned() else {
                return Err(
                    AppError::Internal("Database pool missing from app data".into()).into(),
                );
            };

            let bearer = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(str::to_string);

            let Some(bearer) = bearer else {
                return Err(AppError::Unauthenticated("Unauthenticated.".into()).into());
            };

            match token::resolve(pool.get_ref(), &bearer).await? {
                Some(user) => {
                    req.extensions_mut().insert(user);
                    service.call(req).await
                }
                None => Err(AppError::Unauthenticated("Unauthenticated.".into()).into()),
            }
        })
    }
}
