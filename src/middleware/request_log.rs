use std::task::{Context, Poll};
use std::time::Instant;

use axum::http::{HeaderValue, Request, Response};
use tower::{Layer, Service};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Emits one structured event per request (id, method, path, status,
/// latency) and stamps the generated id on the response. The sink is plain
/// `tracing`, so where the events go is decided once at startup.
#[derive(Clone, Copy, Default)]
pub struct RequestLogLayer;

impl RequestLogLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestLogLayer {
    type Service = RequestLogService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLogService { inner }
    }
}

#[derive(Clone)]
pub struct RequestLogService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestLogService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = RequestLogFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let request_id = Uuid::new_v4().to_string();
        let method = request.method().to_string();
        let path = request.uri().path().to_string();

        RequestLogFuture {
            future: self.inner.call(request),
            started: Instant::now(),
            request_id,
            method,
            path,
        }
    }
}

#[pin_project::pin_project]
pub struct RequestLogFuture<F> {
    #[pin]
    future: F,
    started: Instant,
    request_id: String,
    method: String,
    path: String,
}

impl<F, ResBody, E> std::future::Future for RequestLogFuture<F>
where
    F: std::future::Future<Output = Result<Response<ResBody>, E>>,
{
    type Output = Result<Response<ResBody>, E>;

    fn poll(self: std::pin::Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        match this.future.poll(cx) {
            Poll::Ready(Ok(mut response)) => {
                tracing::info!(
                    request_id = %this.request_id,
                    method = %this.method,
                    path = %this.path,
                    status = response.status().as_u16(),
                    latency_ms = this.started.elapsed().as_millis() as u64,
                    "request completed"
                );

                // A v4 uuid is always a valid header value.
                if let Ok(value) = HeaderValue::from_str(this.request_id.as_str()) {
                    response.headers_mut().insert(REQUEST_ID_HEADER, value);
                }

                Poll::Ready(Ok(response))
            }
            Poll::Ready(Err(e)) => Poll::Ready(Err(e)),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use axum::body::Body;
    use tower::{ServiceBuilder, ServiceExt};

    use super::*;

    #[tokio::test]
    async fn responses_carry_a_request_id() {
        let service = ServiceBuilder::new()
            .layer(RequestLogLayer::new())
            .service(tower::service_fn(|_request: Request<Body>| async {
                Ok::<_, Infallible>(Response::new(Body::empty()))
            }));

        let response = service
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let header = response.headers().get(REQUEST_ID_HEADER);
        assert!(header.is_some());
        assert!(!header.unwrap().to_str().unwrap().is_empty());
    }
}
