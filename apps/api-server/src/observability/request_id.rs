//! Per-request correlation IDs.

use std::future::{Future, Ready, ready};
use std::pin::Pin;

use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use tracing::Instrument;
use uuid::Uuid;

use quill_core::RequestContext;

const X_REQUEST_ID: &str = "x-request-id";

/// Longest inbound ID kept verbatim; anything longer is replaced.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Correlation ID of the current request, available to handlers and the
/// auth extractor through request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// Reuse the inbound `X-Request-ID` when it is a short visible-ASCII
    /// value, otherwise mint a UUID.
    fn resolve(headers: &HeaderMap) -> Self {
        let inbound = headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN);

        match inbound {
            Some(id) => Self(id.to_string()),
            None => Self::generate(),
        }
    }

    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Context for an unauthenticated service call.
    pub fn context(&self) -> RequestContext {
        RequestContext::new(self.0.clone())
    }
}

impl FromRequest for RequestId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let id = req
            .extensions()
            .get::<RequestId>()
            .cloned()
            .unwrap_or_else(RequestId::generate);
        ready(Ok(id))
    }
}

/// Tags every request with a [`RequestId`], runs the rest of the chain
/// inside a `request` span carrying it, and echoes it as `X-Request-ID`.
pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestIdService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdService { service }))
    }
}

pub struct RequestIdService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestIdService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let id = RequestId::resolve(req.headers());
        let span = tracing::info_span!("request", request_id = %id.as_str());
        let header = HeaderValue::from_str(id.as_str()).ok();

        req.extensions_mut().insert(id);
        let fut = span.in_scope(|| self.service.call(req));

        Box::pin(
            async move {
                let mut res = fut.await?;
                if let Some(value) = header {
                    res.headers_mut()
                        .insert(HeaderName::from_static(X_REQUEST_ID), value);
                }
                Ok(res)
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static(X_REQUEST_ID),
            HeaderValue::from_str(value).unwrap(),
        );
        map
    }

    #[test]
    fn test_inbound_id_is_reused() {
        assert_eq!(RequestId::resolve(&headers(" abc-123 ")).as_str(), "abc-123");
    }

    #[test]
    fn test_blank_or_oversized_id_is_replaced() {
        let blank = RequestId::resolve(&headers(""));
        assert!(Uuid::parse_str(blank.as_str()).is_ok());

        let long = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        let replaced = RequestId::resolve(&headers(&long));
        assert_ne!(replaced.as_str(), long);
        assert!(Uuid::parse_str(replaced.as_str()).is_ok());
    }

    #[test]
    fn test_missing_id_is_generated() {
        let id = RequestId::resolve(&HeaderMap::new());
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }
}
