//! Capability guard for routes that need more than a valid identity.
//!
//! Must sit inside [`JwtAuth`](super::auth::JwtAuth): it reads the
//! `AuthContext` the authentication middleware attached and asks the
//! permission gate for a decision. Denials become 403 responses.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use scribe_core::{
    domain::{Capability, Decision},
    errors::{AuthError, DomainError, TokenError},
    repositories::PermissionRepository,
    services::PermissionGate,
};

use super::auth::AuthContext;
use crate::handlers::error::handle_domain_error;

pub struct RequireCapability<P: PermissionRepository> {
    gate: Arc<PermissionGate<P>>,
    capability: Capability,
}

impl<P: PermissionRepository> RequireCapability<P> {
    pub fn new(gate: Arc<PermissionGate<P>>, capability: Capability) -> Self {
        Self { gate, capability }
    }
}

impl<S, B, P> Transform<S, ServiceRequest> for RequireCapability<P>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    P: PermissionRepository + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireCapabilityMiddleware<S, P>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireCapabilityMiddleware {
            service: Rc::new(service),
            gate: Arc::clone(&self.gate),
            capability: self.capability.clone(),
        }))
    }
}

pub struct RequireCapabilityMiddleware<S, P: PermissionRepository> {
    service: Rc<S>,
    gate: Arc<PermissionGate<P>>,
    capability: Capability,
}

impl<S, B, P> Service<ServiceRequest> for RequireCapabilityMiddleware<S, P>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    P: PermissionRepository + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let gate = Arc::clone(&self.gate);
        let capability = self.capability.clone();

        Box::pin(async move {
            let user_id = req.extensions().get::<AuthContext>().map(|ctx| ctx.user_id);

            let denial: DomainError = match user_id {
                None => TokenError::MissingToken.into(),
                Some(user_id) => match gate.authorize(user_id, &capability).await {
                    Decision::Allowed => {
                        let res = service.call(req).await?;
                        return Ok(res.map_into_left_body());
                    }
                    Decision::Denied => AuthError::Denied {
                        capability: capability.to_string(),
                    }
                    .into(),
                },
            };

            let response = handle_domain_error(&denial);
            Ok(req.into_response(response).map_into_right_body())
        })
    }
}
