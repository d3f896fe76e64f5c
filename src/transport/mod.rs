//! Transport helpers for the gRPC server and its outbound clients.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tonic::metadata::MetadataMap;
use tonic::service::Routes;
use tonic::transport::server::Router;
use tonic::transport::{Channel, Endpoint};
use tower::Layer;
use tower::Service;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Header carrying the caller's deadline.
pub const GRPC_TIMEOUT_HEADER: &str = "grpc-timeout";

/// How far ahead of the caller's deadline a handler stops waiting.
pub const DEADLINE_HEADROOM: Duration = Duration::from_millis(20);

/// Header carrying the caller's correlation id, recorded on the request span.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Serve a gRPC router over TCP until `signal` completes.
pub async fn serve_with_shutdown<L, ResBody, F>(
    router: Router<L>,
    addr: SocketAddr,
    service_name: &str,
    signal: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    L: Layer<Routes> + Clone,
    L::Service: Service<http::Request<tonic::body::BoxBody>, Response = http::Response<ResBody>>
        + Clone
        + Send
        + 'static,
    <L::Service as Service<http::Request<tonic::body::BoxBody>>>::Future: Send + 'static,
    <L::Service as Service<http::Request<tonic::body::BoxBody>>>::Error:
        Into<Box<dyn std::error::Error + Send + Sync>> + Send,
    ResBody: http_body::Body<Data = bytes::Bytes> + Send + 'static,
    ResBody::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    F: Future<Output = ()> + Send,
{
    info!(
        service = %service_name,
        address = %addr,
        transport = "tcp",
        "Server listening"
    );
    router.serve_with_shutdown(addr, signal).await?;
    info!(service = %service_name, "Server stopped");
    Ok(())
}

/// Build a lazily connecting channel to `address`.
///
/// Accepts `host:port` or a full `http(s)://` URI. No connection is made
/// until the first call, so a peer that is down at startup shows up as an
/// unavailable call rather than a startup failure.
pub fn connect_lazy(address: &str) -> Result<Channel, tonic::transport::Error> {
    let uri = if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else {
        format!("http://{}", address)
    };

    info!(address = %address, transport = "tcp", "Configured lazy channel");
    Ok(Endpoint::from_shared(uri)?.connect_lazy())
}

/// Caller deadline from the `grpc-timeout` header, if present and valid.
pub fn request_timeout(metadata: &MetadataMap) -> Option<Duration> {
    metadata
        .get(GRPC_TIMEOUT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_grpc_timeout)
}

/// Time a handler may spend on a call carrying `grpc-timeout`.
///
/// tonic's server enforces the same header and answers `CANCELLED` when it
/// fires, so handlers give up [`DEADLINE_HEADROOM`] earlier and report
/// `DEADLINE_EXCEEDED` themselves.
pub fn handler_timeout(metadata: &MetadataMap) -> Option<Duration> {
    request_timeout(metadata).map(|timeout| timeout.saturating_sub(DEADLINE_HEADROOM))
}

/// Parse a `grpc-timeout` value: up to 8 digits followed by one unit of
/// `H`, `M`, `S`, `m` (millis), `u` (micros) or `n` (nanos).
pub fn parse_grpc_timeout(value: &str) -> Option<Duration> {
    if value.len() < 2 {
        return None;
    }
    let (digits, unit) = value.split_at(value.len() - 1);
    if digits.len() > 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let amount: u64 = digits.parse().ok()?;

    match unit {
        "H" => Some(Duration::from_secs(amount * 3600)),
        "M" => Some(Duration::from_secs(amount * 60)),
        "S" => Some(Duration::from_secs(amount)),
        "m" => Some(Duration::from_millis(amount)),
        "u" => Some(Duration::from_micros(amount)),
        "n" => Some(Duration::from_nanos(amount)),
        _ => None,
    }
}

/// Create a gRPC trace layer that records the correlation id and path on
/// every request span.
pub fn grpc_trace_layer() -> TraceLayer<
    tower_http::classify::SharedClassifier<tower_http::classify::GrpcErrorsAsFailures>,
    impl Fn(&http::Request<tonic::body::BoxBody>) -> tracing::Span + Clone,
> {
    TraceLayer::new_for_grpc().make_span_with(|request: &http::Request<tonic::body::BoxBody>| {
        let correlation_id = request
            .headers()
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        let path = request.uri().path();
        tracing::info_span!("grpc", %correlation_id, %path)
    })
}
