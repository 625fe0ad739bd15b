//! HTTP middleware.
//!
//! A small tower layer that stamps the daemon's Content-Security-Policy
//! onto every response, replacing whatever a handler may have set.

use std::{
    pin::Pin,
    task::{Context, Poll},
};

use axum::{
    extract::Request,
    http::{HeaderValue, header},
    response::Response,
};
use tower::{Layer, Service};

/// The policy served with every response: same-origin everything, plus
/// data: URIs for images.
pub const DEFAULT_CSP_VALUE: &str = "default-src 'self'; img-src 'self' data:;";

#[derive(Debug, Clone)]
pub struct CspService<S> {
    inner: S,
}

impl<S> CspService<S> {
    pub fn new(inner: S) -> Self {
        CspService { inner }
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for CspService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Send + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    // Boxed because the future type changes once we post-process the
    // response.
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let future = self.inner.call(req);
        Box::pin(async move {
            let mut response = future.await?;
            response.headers_mut().insert(
                header::CONTENT_SECURITY_POLICY,
                HeaderValue::from_static(DEFAULT_CSP_VALUE),
            );
            Ok(response)
        })
    }
}

#[derive(Debug, Clone)]
pub struct CspLayer {}

impl CspLayer {
    pub fn new() -> Self {
        CspLayer {}
    }
}

impl Default for CspLayer {
    fn default() -> Self {
        CspLayer::new()
    }
}

impl<S> Layer<S> for CspLayer {
    type Service = CspService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CspService::new(inner)
    }
}
