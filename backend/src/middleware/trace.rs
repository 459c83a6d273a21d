//! Request tracing middleware.
//!
//! Each request runs inside a fresh [`TraceId`] scope, is logged on entry and
//! exit with its latency, and gets a `trace-id` response header. Errors built
//! while handling the request pick the identifier up automatically.

use std::future::Future;
use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{error, info, warn};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Tracing middleware.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use callback_desk::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service wrapper produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

fn traced<F, B>(
    trace_id: TraceId,
    method: String,
    path: String,
    fut: F,
) -> impl Future<Output = Result<ServiceResponse<B>, Error>>
where
    F: Future<Output = Result<ServiceResponse<B>, Error>>,
{
    TraceId::scope(trace_id, async move {
        let started = Instant::now();
        info!(%trace_id, %method, %path, "request started");
        let mut res = match fut.await {
            Ok(res) => res,
            Err(err) => {
                warn!(
                    %trace_id,
                    %method,
                    %path,
                    error = %err,
                    latency_ms = started.elapsed().as_millis(),
                    "request failed before a response was built"
                );
                return Err(err);
            }
        };
        match HeaderValue::from_str(&trace_id.to_string()) {
            Ok(value) => {
                res.response_mut()
                    .headers_mut()
                    .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
            }
            Err(err) => {
                error!(error = %err, %trace_id, "failed to encode trace identifier header");
            }
        }
        info!(
            %trace_id,
            %method,
            %path,
            status = res.status().as_u16(),
            latency_ms = started.elapsed().as_millis(),
            "request finished"
        );
        Ok(res)
    })
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = TraceId::generate();
        let method = req.method().to_string();
        let path = req.path().to_owned();
        let fut = self.service.call(req);
        Box::pin(traced(trace_id, method, path, fut))
    }
}
