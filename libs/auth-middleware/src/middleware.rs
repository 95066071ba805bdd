use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, HttpResponse,
};
use api_response::ProblemDetails;
use futures::future::{ready, Ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use crate::claims::{parse_jwt, JwtError};

/// Validated token claims, inserted into the request extensions by
/// [`RequireRole`] and extractable in handlers via `FromRequest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserData {
    pub user_id: String,
    pub role: String,
    pub email: String,
    pub user_name: String,
}

/// Role-gating JWT middleware.
///
/// Rejections carry a `ProblemDetails` JSON body: 401 for anything wrong
/// with the token itself, 403 when the token is fine but the caller is not
/// allowed through. With `id_required` set, routes must carry an `id_user`
/// path segment and it has to match the token subject.
///
/// `id_required` reads the matched path parameters, which are only populated
/// once routing has resolved the pattern. Wrap the `Resource` or `Scope`
/// that declares `{id_user}` (not the whole `App`), or every request is
/// rejected for the missing segment.
pub struct RequireRole {
    inner: Rc<RequireRoleInner>,
}

struct RequireRoleInner {
    secret: String,
    id_required: bool,
    allowed_roles: Vec<String>,
}

impl RequireRole {
    pub fn new(
        secret: impl Into<String>,
        id_required: bool,
        allowed_roles: &[&str],
    ) -> Self {
        Self {
            inner: Rc::new(RequireRoleInner {
                secret: secret.into(),
                id_required,
                allowed_roles: allowed_roles.iter().map(|r| r.to_string()).collect(),
            }),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RequireRoleService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleService {
            service: Rc::new(service),
            inner: self.inner.clone(),
        }))
    }
}

pub struct RequireRoleService<S> {
    service: Rc<S>,
    inner: Rc<RequireRoleInner>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let inner = self.inner.clone();

        Box::pin(async move {
            let claims = match bearer_token(&req).and_then(|token| {
                parse_jwt(token, &inner.secret).map_err(|e| match e {
                    JwtError::Expired => Rejection::unauthorized("Token expired"),
                    _ => {
                        tracing::warn!(error = %e, "token validation failed");
                        Rejection::unauthorized("Invalid token")
                    }
                })
            }) {
                Ok(claims) => claims,
                Err(rejection) => return Ok(rejection.into_response(req)),
            };

            if !inner.allowed_roles.iter().any(|r| *r == claims.role) {
                return Ok(Rejection::forbidden("Role not allowed").into_response(req));
            }

            if inner.id_required {
                match req.match_info().get("id_user") {
                    Some(id) if id == claims.user_id => {}
                    Some(_) => {
                        return Ok(
                            Rejection::forbidden("Cannot act on another user").into_response(req)
                        )
                    }
                    None => {
                        return Ok(
                            Rejection::forbidden("Missing id_user path segment").into_response(req)
                        )
                    }
                }
            }

            req.extensions_mut().insert(UserData {
                user_id: claims.user_id,
                role: claims.role,
                email: claims.email,
                user_name: claims.user_name,
            });

            service.call(req).await.map(|res| res.map_into_left_body())
        })
    }
}

fn bearer_token(req: &ServiceRequest) -> Result<&str, Rejection> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| Rejection::unauthorized("Missing Authorization header"))?;

    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| Rejection::unauthorized("Invalid Authorization header format"))
}

struct Rejection {
    status: u16,
    detail: &'static str,
}

impl Rejection {
    fn unauthorized(detail: &'static str) -> Self {
        Self { status: 401, detail }
    }

    fn forbidden(detail: &'static str) -> Self {
        Self { status: 403, detail }
    }

    fn into_response<B>(self, req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        let instance = req.path().to_string();
        let problem = ProblemDetails::from_status(self.status, self.detail, instance);
        let response = HttpResponse::build(
            actix_web::http::StatusCode::from_u16(self.status)
                .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR),
        )
        .json(problem);
        req.into_response(response).map_into_right_body()
    }
}

impl actix_web::FromRequest for UserData {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        match req.extensions().get::<UserData>() {
            Some(data) => ready(Ok(data.clone())),
            None => ready(Err(actix_web::error::ErrorUnauthorized(
                "User not authenticated",
            ))),
        }
    }
}
