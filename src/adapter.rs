//! Runs a tower `Service` as an AWS Lambda HTTP handler.
//!
//! `lambda_http` owns the event schema (API Gateway, ALB, Function URLs);
//! this module only moves bodies between `lambda_http::Body` and hyper,
//! strips an optional base path and decides how response bodies are
//! encoded on the way back.

use bytes::buf::Buf;
use http::header::{CONTENT_ENCODING, CONTENT_TYPE};
use http::uri::{PathAndQuery, Uri};
use http::{HeaderMap, Request, Response};
use lambda_http::Body;
use tower_service::Service;

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use crate::Error;

/// Content-type prefixes whose bodies are returned as text rather than base64.
pub const DEFAULT_TEXT_MIME_TYPES: &[&str] = &[
    "text/",
    "application/json",
    "application/javascript",
    "application/xml",
    "application/vnd.api+json",
    "application/vnd.oai.openapi",
];

/// Translation options for the adapter.
#[derive(Debug, Clone)]
pub struct Options {
    base_path: String,
    text_mime_types: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            base_path: "/".to_owned(),
            text_mime_types: DEFAULT_TEXT_MIME_TYPES
                .iter()
                .map(|mime| (*mime).to_owned())
                .collect(),
        }
    }
}

impl Options {
    /// Prefix removed from incoming paths, e.g. an API Gateway stage name.
    ///
    /// `prod`, `/prod` and `/prod/` are equivalent.
    pub fn base_path(mut self, base_path: impl AsRef<str>) -> Self {
        self.base_path = normalize_base_path(base_path.as_ref());
        self
    }

    /// Adds a content-type prefix to be treated as text.
    pub fn text_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.text_mime_types.push(mime.into());
        self
    }
}

pub async fn run<S, B>(service: S) -> Result<(), Error>
where
    S: Service<Request<hyper::Body>, Response = Response<B>> + Send + Clone + 'static,
    S::Error: Into<Error>,
    S::Future: Send + 'static,
    B: hyper::body::HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<Error>,
{
    run_with(service, Options::default()).await
}

pub async fn run_with<S, B>(service: S, options: Options) -> Result<(), Error>
where
    S: Service<Request<hyper::Body>, Response = Response<B>> + Send + Clone + 'static,
    S::Error: Into<Error>,
    S::Future: Send + 'static,
    B: hyper::body::HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<Error>,
{
    tracing::info!(base_path = %options.base_path, "starting lambda runtime");

    let handler = lambda_http::handler(ServiceHandler {
        service,
        options: Arc::new(options),
        _body: PhantomData,
    });
    lambda_runtime::run(handler).await
}

struct ServiceHandler<S, B> {
    service: S,
    options: Arc<Options>,
    _body: PhantomData<fn() -> B>,
}

impl<S, B> lambda_http::Handler<'static> for ServiceHandler<S, B>
where
    S: Service<Request<hyper::Body>, Response = Response<B>> + Send + Clone + 'static,
    S::Error: Into<Error>,
    S::Future: Send + 'static,
    B: hyper::body::HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<Error>,
{
    type Error = Error;
    type Response = Response<Body>;
    type Fut = Pin<Box<dyn Future<Output = Result<Self::Response, Error>> + Send>>;

    fn call(&self, request: lambda_http::Request, _context: lambda_http::Context) -> Self::Fut {
        let service = self.service.clone();
        let options = self.options.clone();

        Box::pin(async move { dispatch(service, request, &options).await })
    }
}

/// Handles a single Lambda HTTP request with `service`.
pub async fn dispatch<S, B>(
    mut service: S,
    request: lambda_http::Request,
    options: &Options,
) -> Result<Response<Body>, Error>
where
    S: Service<Request<hyper::Body>, Response = Response<B>>,
    S::Error: Into<Error>,
    B: hyper::body::HttpBody,
    B::Error: Into<Error>,
{
    // Map body types
    let (mut parts, body) = request.into_parts();
    parts.uri = strip_base_path(parts.uri, &options.base_path)?;
    let request = Request::from_parts(parts, hyper::Body::from(body.as_ref().to_vec()));

    tracing::debug!(method = %request.method(), uri = %request.uri(), "dispatching lambda request");

    std::future::poll_fn(|cx| service.poll_ready(cx))
        .await
        .map_err(Into::<Error>::into)?;

    // Call the Tower service
    let response = service.call(request).await.map_err(Into::<Error>::into)?;

    let (head, body) = response.into_parts();

    let mut body = hyper::body::aggregate(body)
        .await
        .map_err(Into::<Error>::into)?;
    let body = body.copy_to_bytes(body.remaining());

    tracing::debug!(status = %head.status, bytes = body.len(), "service responded");

    let body = encode_body(&head.headers, body.to_vec(), &options.text_mime_types);
    Ok(Response::from_parts(head, body))
}

/// Leading slash, no trailing slash; blank input is the root `/`.
pub(crate) fn normalize_base_path(value: &str) -> String {
    let trimmed = value.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else {
        format!("/{}", trimmed)
    }
}

fn strip_base_path(uri: Uri, base_path: &str) -> Result<Uri, Error> {
    if base_path.is_empty() || base_path == "/" {
        return Ok(uri);
    }

    let rest = uri
        .path()
        .strip_prefix(base_path)
        .filter(|rest| rest.is_empty() || rest.starts_with('/'))
        .map(str::to_owned);
    let mut path_and_query = match rest {
        Some(rest) if rest.is_empty() => "/".to_owned(),
        Some(rest) => rest,
        None => return Ok(uri),
    };
    if let Some(query) = uri.query() {
        path_and_query.push('?');
        path_and_query.push_str(query);
    }

    let mut parts = uri.into_parts();
    parts.path_and_query = Some(path_and_query.parse::<PathAndQuery>()?);
    Ok(Uri::from_parts(parts)?)
}

fn encode_body(headers: &HeaderMap, body: Vec<u8>, text_mime_types: &[String]) -> Body {
    if body.is_empty() {
        return Body::Empty;
    }
    if !is_text(headers, text_mime_types) {
        return Body::Binary(body);
    }
    match String::from_utf8(body) {
        Ok(text) => Body::Text(text),
        Err(e) => Body::Binary(e.into_bytes()),
    }
}

fn is_text(headers: &HeaderMap, text_mime_types: &[String]) -> bool {
    // Compressed payloads must survive as bytes.
    if headers.contains_key(CONTENT_ENCODING) {
        return false;
    }
    match headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok()) {
        Some(content_type) => text_mime_types
            .iter()
            .any(|mime| content_type.starts_with(mime.as_str())),
        None => false,
    }
}
