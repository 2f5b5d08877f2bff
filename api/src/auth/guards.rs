//! Role guards, applied with `route_layer(from_fn(..))`.
//!
//! Each guard authenticates the bearer token, stores the [`AuthUser`] in the
//! request extensions and checks the role. No token is `401`, a token for
//! another role is `403`.

use crate::auth::claims::AuthUser;
use crate::response::{Failure, failure};
use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use db::models::user::UserRole;

async fn extract_and_insert_authuser(req: Request<Body>) -> Result<(Request<Body>, AuthUser), Failure> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|(status, msg)| failure(status, msg))?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

async fn allow_role(req: Request<Body>, next: Next, role: UserRole) -> Result<Response, Failure> {
    let (req, user) = extract_and_insert_authuser(req).await?;

    if user.0.role != role {
        tracing::debug!(user = user.0.sub, have = %user.0.role, need = %role, "role check failed");
        return Err(failure(StatusCode::FORBIDDEN, format!("{role} access required")));
    }
    if role != UserRole::SuperAdmin && user.0.company_id.is_none() {
        return Err(failure(StatusCode::FORBIDDEN, "Login is not attached to a company"));
    }

    Ok(next.run(req).await)
}

pub async fn allow_super_admin(req: Request<Body>, next: Next) -> Result<Response, Failure> {
    allow_role(req, next, UserRole::SuperAdmin).await
}

pub async fn allow_company_admin(req: Request<Body>, next: Next) -> Result<Response, Failure> {
    allow_role(req, next, UserRole::CompanyAdmin).await
}

pub async fn allow_trainer(req: Request<Body>, next: Next) -> Result<Response, Failure> {
    allow_role(req, next, UserRole::Trainer).await
}
