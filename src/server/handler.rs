// src/server/handler.rs
use hyper::{Body, Method, Request, Response, StatusCode};
use std::convert::Infallible;
use tower::Service;

use crate::endpoint::{EndpointError, ProbeResponse, SharedEndpoints};

/// Routes incoming requests to the endpoint table by path. Probe endpoints
/// answer GET and HEAD; everything else is 405, unknown paths are 404.
#[derive(Clone)]
pub struct ProbeHandler {
    endpoints: SharedEndpoints,
}

impl ProbeHandler {
    pub fn new(endpoints: SharedEndpoints) -> Self {
        Self { endpoints }
    }

    async fn respond(endpoints: SharedEndpoints, req: Request<Body>) -> Response<Body> {
        if req.method() != Method::GET && req.method() != Method::HEAD {
            return plain(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
        }

        let head_only = req.method() == Method::HEAD;
        match endpoints.handle(req.uri().path()).await {
            Ok(probe) => render(probe, head_only),
            Err(EndpointError::UnknownTag(_)) => plain(StatusCode::NOT_FOUND, "Not Found"),
            Err(err) => {
                tracing::error!(%err, "endpoint dispatch failed");
                plain(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }
}

fn render(probe: ProbeResponse, head_only: bool) -> Response<Body> {
    let body = if head_only {
        Body::empty()
    } else {
        Body::from(probe.body)
    };
    Response::builder()
        .status(probe.status_code)
        .header("Content-Type", probe.content_type)
        .body(body)
        .unwrap_or_else(|_| Response::new(Body::empty()))
}

fn plain(status: StatusCode, message: &'static str) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Body::from(message))
        .unwrap_or_else(|_| Response::new(Body::empty()))
}

impl Service<Request<Body>> for ProbeHandler {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let endpoints = self.endpoints.clone();
        Box::pin(async move { Ok(Self::respond(endpoints, req).await) })
    }
}
