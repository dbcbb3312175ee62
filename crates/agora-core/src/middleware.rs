use axum::http::{HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

#[derive(Clone, Default)]
pub struct MakeUuidRequestId;

impl MakeRequestId for MakeUuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        // A hyphenated UUID is always a valid header value.
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Assign an `x-request-id` to requests that arrive without one.
/// Apply outermost so the trace layer sees the id.
pub fn request_id_layer() -> SetRequestIdLayer<MakeUuidRequestId> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeUuidRequestId)
}

/// Copy the request's `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}
