use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use colored::*;
use serde::Deserialize;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::error::LensError;
use crate::render::html;
use crate::session::Session;

/// Largest request body accepted by `POST /api/analyze`.
pub const MAX_BODY_BYTES: usize = 64 * 1024;
const MAX_HEAD_BYTES: usize = 16 * 1024;
const MAX_HEADERS: usize = 32;
/// How long a client gets to deliver a complete request.
pub const REQUEST_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Simple percent-decoding for URL query parameters and form bodies.
pub fn url_decode(s: &str) -> String {
    let mut bytes = Vec::with_capacity(s.len());
    let mut iter = s.bytes();
    while let Some(b) = iter.next() {
        match b {
            b'+' => bytes.push(b' '),
            b'%' => {
                let hex: Vec<u8> = iter.by_ref().take(2).collect();
                let decoded = std::str::from_utf8(&hex)
                    .ok()
                    .filter(|h| h.len() == 2)
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                if let Some(byte) = decoded {
                    bytes.push(byte);
                }
            }
            _ => bytes.push(b),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Parse `a=1&b=2` into key-value pairs. Later duplicates win.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next()?;
            let val = parts.next().unwrap_or("");
            Some((url_decode(key), url_decode(val)))
        })
        .collect()
}

/// A parsed HTTP request. Any query string is dropped; no route reads one.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Request {
    pub fn new(method: &str, target: &str) -> Self {
        let path = target.split_once('?').map_or(target, |(path, _)| path);
        Request {
            method: method.to_ascii_uppercase(),
            path: path.to_string(),
            ..Default::default()
        }
    }

    pub fn with_body(mut self, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        self.content_type = Some(content_type.to_string());
        self.body = body.into();
        self
    }

    fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("application/json"))
    }
}

/// A response ready to be written to the socket.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn html(status: u16, body: String) -> Self {
        Response {
            status,
            content_type: Some("text/html; charset=utf-8"),
            body: body.into_bytes(),
        }
    }

    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Response {
            status,
            content_type: Some("application/json"),
            body: value.to_string().into_bytes(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Response {
            status,
            content_type: Some("text/plain; charset=utf-8"),
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn empty(status: u16) -> Self {
        Response {
            status,
            content_type: None,
            body: Vec::new(),
        }
    }

    pub fn body_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {} {}\r\n", self.status, reason(self.status));
        if let Some(ct) = self.content_type {
            head.push_str(&format!("Content-Type: {ct}\r\n"));
        }
        head.push_str(&format!(
            "Content-Length: {}\r\nCache-Control: no-store\r\nConnection: close\r\n\r\n",
            self.body.len()
        ));
        let mut out = head.into_bytes();
        out.extend_from_slice(&self.body);
        out
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        413 => "Payload Too Large",
        408 => "Request Timeout",
        422 => "Unprocessable Entity",
        431 => "Request Header Fields Too Large",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "Unknown",
    }
}

/// Why a request could not be read off the wire.
#[derive(Debug, Error)]
pub enum ReadError {
    /// Peer closed before sending a full request head.
    #[error("connection closed before a full request arrived")]
    Closed,
    #[error("malformed request: {0}")]
    Malformed(String),
    #[error("request head exceeds {max} bytes", max = MAX_HEAD_BYTES)]
    HeadTooLarge,
    #[error("request body of {0} bytes exceeds {max} bytes", max = MAX_BODY_BYTES)]
    BodyTooLarge(usize),
    #[error("request not received within {0:?}")]
    TimedOut(Duration),
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ReadError {
    fn response(&self) -> Option<Response> {
        match self {
            ReadError::Closed | ReadError::Io(_) => None,
            ReadError::Malformed(_) => Some(Response::text(400, "Bad Request")),
            ReadError::TimedOut(_) => Some(Response::text(408, "Request Timeout")),
            ReadError::HeadTooLarge => Some(Response::text(431, "Request Header Fields Too Large")),
            ReadError::BodyTooLarge(_) => Some(Response::text(413, "Payload Too Large")),
        }
    }
}

/// Read one request head with `httparse`, then its `Content-Length` body.
pub async fn read_request<R: AsyncRead + Unpin>(stream: &mut R) -> Result<Request, ReadError> {
    let mut buf: Vec<u8> = Vec::with_capacity(4096);
    let mut chunk = [0u8; 4096];

    let (mut request, content_length, head_len) = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(ReadError::Closed);
        }
        buf.extend_from_slice(&chunk[..n]);

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
        let mut parsed = httparse::Request::new(&mut headers);
        match parsed.parse(&buf) {
            Ok(httparse::Status::Complete(head_len)) => {
                let method = parsed.method.unwrap_or("GET");
                let target = parsed.path.unwrap_or("/");
                let mut request = Request::new(method, target);
                let mut content_length = 0usize;
                for h in parsed.headers.iter() {
                    let value = String::from_utf8_lossy(h.value).trim().to_string();
                    if h.name.eq_ignore_ascii_case("content-length") {
                        content_length = value
                            .parse()
                            .map_err(|_| ReadError::Malformed(format!("bad content-length {value:?}")))?;
                    } else if h.name.eq_ignore_ascii_case("content-type") {
                        request.content_type = Some(value);
                    }
                }
                break (request, content_length, head_len);
            }
            Ok(httparse::Status::Partial) => {
                if buf.len() > MAX_HEAD_BYTES {
                    return Err(ReadError::HeadTooLarge);
                }
            }
            Err(e) => return Err(ReadError::Malformed(e.to_string())),
        }
    };

    if content_length > MAX_BODY_BYTES {
        return Err(ReadError::BodyTooLarge(content_length));
    }

    let mut body = buf.split_off(head_len);
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(ReadError::Malformed("body shorter than content-length".into()));
        }
        body.extend_from_slice(&chunk[..n]);
    }
    body.truncate(content_length);
    request.body = body;
    Ok(request)
}

/// [`read_request`], giving up with [`ReadError::TimedOut`] after `limit`.
pub async fn read_request_within<R: AsyncRead + Unpin>(
    stream: &mut R,
    limit: Duration,
) -> Result<Request, ReadError> {
    tokio::time::timeout(limit, read_request(stream))
        .await
        .unwrap_or(Err(ReadError::TimedOut(limit)))
}

#[derive(Deserialize)]
struct AnalyzeBody {
    #[serde(default)]
    text: String,
}

fn analyze_text(req: &Request) -> Result<String, Response> {
    if req.is_json() {
        serde_json::from_slice::<AnalyzeBody>(&req.body)
            .map(|b| b.text)
            .map_err(|e| {
                debug!(error = %e, "rejecting malformed analyze body");
                Response::text(400, "Bad Request")
            })
    } else {
        let form = String::from_utf8_lossy(&req.body);
        Ok(parse_query(&form).remove("text").unwrap_or_default())
    }
}

fn render_failure(e: askama::Error) -> Response {
    error!(error = %e, "template rendering failed");
    Response::text(500, "Internal Server Error")
}

fn message_fragment(status: u16, text: &str) -> Response {
    match html::render_error(text) {
        Ok(body) => Response::html(status, body),
        Err(e) => render_failure(e),
    }
}

async fn handle_analyze(session: &Session, req: &Request) -> Response {
    let text = match analyze_text(req) {
        Ok(text) => text,
        Err(resp) => return resp,
    };
    let locale = session.locale();
    match session.analyze(&text).await {
        Ok(result) => match html::render_result(&result, locale) {
            Ok(body) => Response::html(200, body),
            Err(e) => render_failure(e),
        },
        Err(e) => {
            let status = match &e {
                LensError::Validation(_) => 422,
                LensError::Busy => 409,
                LensError::Network(_) => 502,
                _ => 500,
            };
            message_fragment(status, e.user_message(locale))
        }
    }
}

async fn handle_health(session: &Session) -> Response {
    match session.client().check_health().await {
        Ok(health) => Response::json(
            200,
            &serde_json::json!({ "status": health.status, "api_base": session.client().base_url() }),
        ),
        Err(e) => Response::json(
            502,
            &serde_json::json!({ "status": "unreachable", "error": e.to_string() }),
        ),
    }
}

/// Dispatch one request. Pure with respect to the socket, so it can be
/// driven directly in tests.
pub async fn route(session: &Session, req: &Request) -> Response {
    let locale = session.locale();
    match (req.method.as_str(), req.path.as_str()) {
        ("GET", "/") => match html::render_page(locale) {
            Ok(body) => Response::html(200, body),
            Err(e) => render_failure(e),
        },
        ("POST", "/api/analyze") => handle_analyze(session, req).await,
        ("GET", "/api/history") => {
            let panel = session.history_panel().await;
            match html::render_history_panel(&panel, locale) {
                Ok(body) => Response::html(200, body),
                Err(e) => render_failure(e),
            }
        }
        ("GET", "/api/result") => match session.current() {
            Some(result) => match html::render_result(&result, locale) {
                Ok(body) => Response::html(200, body),
                Err(e) => render_failure(e),
            },
            None => Response::empty(204),
        },
        ("POST", "/api/reset") => {
            session.reset();
            Response::empty(204)
        }
        ("GET", "/api/health") => handle_health(session).await,
        (_, "/" | "/api/analyze" | "/api/history" | "/api/result" | "/api/reset" | "/api/health") => {
            Response::text(405, "Method Not Allowed")
        }
        _ => Response::text(404, "Not Found"),
    }
}

async fn handle_connection(mut stream: TcpStream, session: Arc<Session>) -> std::io::Result<()> {
    let response = match read_request_within(&mut stream, REQUEST_READ_TIMEOUT).await {
        Ok(req) => {
            let resp = route(&session, &req).await;
            debug!(method = %req.method, path = %req.path, status = resp.status, "request handled");
            resp
        }
        Err(ReadError::Io(e)) => return Err(e),
        Err(e) => match e.response() {
            Some(resp) => {
                warn!(error = %e, status = resp.status, "rejecting request");
                resp
            }
            None => return Ok(()),
        },
    };
    stream.write_all(&response.to_bytes()).await?;
    stream.shutdown().await
}

/// Accept connections on an already-bound listener until an accept error.
pub async fn serve_on(listener: TcpListener, session: Arc<Session>) -> std::io::Result<()> {
    loop {
        let (stream, addr) = listener.accept().await?;
        let session = Arc::clone(&session);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, session).await {
                warn!(peer = %addr, error = %e, "connection error");
            }
        });
    }
}

/// Start the web front end on `127.0.0.1:port`.
pub async fn serve(port: u16, session: Arc<Session>) -> std::io::Result<()> {
    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    let addr = listener.local_addr()?;

    eprintln!(
        "{}",
        format!("  Hoax Lens running at http://localhost:{}", addr.port()).bright_green()
    );
    eprintln!(
        "{}",
        format!("  Analysis API: {}", session.client().base_url()).bright_cyan()
    );
    eprintln!("{}", "  Press Ctrl+C to stop.".bright_blue());
    info!(%addr, api_base = %session.client().base_url(), "web front end listening");

    serve_on(listener, session).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AnalysisClient;
    use crate::locale::Locale;
    use crate::testing::canned_api;

    const FAKE_RESULT: &str = r#"{"prediction":"Fake","confidence":0.75,"decision_basis":"<b>ML</b>","analysis":{"word_count":7,"sentiment":"Negative","suspicious_indicators":2}}"#;

    fn offline_session(locale: Locale) -> Session {
        Session::new(AnalysisClient::new("http://127.0.0.1:9/api"), locale)
    }

    // -- url helpers --

    #[test]
    fn url_decode_plus_and_percent() {
        assert_eq!(url_decode("Banjir+di%20Jakarta"), "Banjir di Jakarta");
    }

    #[test]
    fn url_decode_multibyte_utf8() {
        assert_eq!(url_decode("caf%C3%A9"), "café");
    }

    #[test]
    fn url_decode_truncated_escape_dropped() {
        assert_eq!(url_decode("abc%4"), "abc");
    }

    #[test]
    fn parse_query_form_body() {
        let params = parse_query("text=Hoaks+vaksin%21&lang=id");
        assert_eq!(params.get("text").map(String::as_str), Some("Hoaks vaksin!"));
        assert_eq!(params.get("lang").map(String::as_str), Some("id"));
    }

    #[test]
    fn parse_query_empty() {
        assert!(parse_query("").is_empty());
    }

    // -- wire parsing --

    #[tokio::test]
    async fn read_request_with_body() {
        let raw = b"POST /api/analyze?x=1 HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: 15\r\n\r\n{\"text\":\"halo\"}";
        let mut input: &[u8] = raw;
        let req = read_request(&mut input).await.unwrap();
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/api/analyze");
        assert!(req.is_json());
        assert_eq!(req.body, br#"{"text":"halo"}"#);
    }

    #[tokio::test]
    async fn read_request_rejects_oversized_body() {
        let raw = format!(
            "POST /api/analyze HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
            MAX_BODY_BYTES + 1
        );
        let mut input: &[u8] = raw.as_bytes();
        let err = read_request(&mut input).await.unwrap_err();
        assert!(matches!(err, ReadError::BodyTooLarge(_)));
        assert_eq!(err.response().map(|r| r.status), Some(413));
    }

    #[tokio::test]
    async fn read_request_garbage_is_malformed() {
        let mut input: &[u8] = b"\x00\x01 nonsense\r\n\r\n";
        let err = read_request(&mut input).await.unwrap_err();
        assert!(matches!(err, ReadError::Malformed(_)));
    }

    #[tokio::test]
    async fn read_request_eof_is_closed() {
        let mut input: &[u8] = b"";
        assert!(matches!(read_request(&mut input).await, Err(ReadError::Closed)));
    }

    #[test]
    fn request_target_query_is_ignored() {
        let req = Request::new("get", "/api/history?lang=en&x=1");
        assert_eq!(req.method, "GET");
        assert_eq!(req.path, "/api/history");
    }

    #[tokio::test]
    async fn silent_peer_times_out_with_408() {
        let (_client, mut server) = tokio::io::duplex(64);
        let err = read_request_within(&mut server, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, ReadError::TimedOut(_)));
        assert_eq!(err.response().map(|r| r.status), Some(408));
    }

    #[tokio::test]
    async fn partial_head_times_out() {
        let (mut client, mut server) = tokio::io::duplex(64);
        client.write_all(b"GET / HTTP/1.1\r\nHost: loc").await.unwrap();
        let err = read_request_within(&mut server, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, ReadError::TimedOut(_)));
    }

    #[test]
    fn read_errors_display_their_cause() {
        assert_eq!(
            ReadError::BodyTooLarge(70_000).to_string(),
            "request body of 70000 bytes exceeds 65536 bytes"
        );
        assert_eq!(
            ReadError::Malformed("bad content-length \"x\"".into()).to_string(),
            "malformed request: bad content-length \"x\""
        );
        assert_eq!(
            ReadError::TimedOut(Duration::from_secs(10)).to_string(),
            "request not received within 10s"
        );
        let io = ReadError::from(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset"));
        assert_eq!(io.to_string(), "read failed: reset");
    }

    #[test]
    fn response_serializes_head() {
        let bytes = Response::text(404, "Not Found").to_bytes();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(text.contains("Content-Length: 9\r\n"));
        assert!(text.ends_with("\r\n\r\nNot Found"));
    }

    // -- routing --

    #[tokio::test]
    async fn index_serves_page() {
        let session = offline_session(Locale::Id);
        let resp = route(&session, &Request::new("GET", "/")).await;
        assert_eq!(resp.status, 200);
        assert!(resp.body_str().contains("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let session = offline_session(Locale::Id);
        assert_eq!(route(&session, &Request::new("GET", "/admin")).await.status, 404);
    }

    #[tokio::test]
    async fn wrong_method_is_405() {
        let session = offline_session(Locale::Id);
        assert_eq!(route(&session, &Request::new("GET", "/api/analyze")).await.status, 405);
    }

    #[tokio::test]
    async fn empty_text_is_422_with_message() {
        let session = offline_session(Locale::En);
        let req = Request::new("POST", "/api/analyze").with_body("application/json", r#"{"text":"  "}"#);
        let resp = route(&session, &req).await;
        assert_eq!(resp.status, 422);
        assert!(resp.body_str().contains("Please enter some news text first."));
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let session = offline_session(Locale::En);
        let req = Request::new("POST", "/api/analyze").with_body("application/json", "{text");
        assert_eq!(route(&session, &req).await.status, 400);
    }

    #[tokio::test]
    async fn upstream_failure_is_502() {
        let base = canned_api("500 Internal Server Error", "{}", 0).await;
        let session = Session::new(AnalysisClient::new(base), Locale::Id);
        let req = Request::new("POST", "/api/analyze")
            .with_body("application/x-www-form-urlencoded", "text=berita+palsu");
        let resp = route(&session, &req).await;
        assert_eq!(resp.status, 502);
        assert!(resp.body_str().contains("Pastikan server backend berjalan."));
        assert!(!session.is_submitting());
    }

    #[tokio::test]
    async fn analyze_then_result_then_reset() {
        let base = canned_api("200 OK", FAKE_RESULT, 0).await;
        let session = Session::new(AnalysisClient::new(base), Locale::Id);

        let req = Request::new("POST", "/api/analyze").with_body("application/json", r#"{"text":"x"}"#);
        let resp = route(&session, &req).await;
        assert_eq!(resp.status, 200);
        let body = resp.body_str();
        assert!(body.contains("HOAX"));
        assert!(body.contains("&lt;b&gt;ML&lt;/b&gt;"), "decision basis must be escaped");

        assert_eq!(route(&session, &Request::new("GET", "/api/result")).await.status, 200);
        assert_eq!(route(&session, &Request::new("POST", "/api/reset")).await.status, 204);
        assert_eq!(route(&session, &Request::new("GET", "/api/result")).await.status, 204);
    }

    #[tokio::test]
    async fn history_unreachable_shows_placeholder() {
        let session = offline_session(Locale::Id);
        let resp = route(&session, &Request::new("GET", "/api/history")).await;
        assert_eq!(resp.status, 200);
        assert!(resp.body_str().contains("Tidak dapat memuat riwayat analisis."));
    }

    #[tokio::test]
    async fn health_proxies_status() {
        let base = canned_api("200 OK", r#"{"status":"healthy"}"#, 0).await;
        let session = Session::new(AnalysisClient::new(base), Locale::Id);
        let resp = route(&session, &Request::new("GET", "/api/health")).await;
        assert_eq!(resp.status, 200);
        let v: serde_json::Value = serde_json::from_slice(&resp.body).unwrap();
        assert_eq!(v["status"], "healthy");
    }

    #[tokio::test]
    async fn serve_on_answers_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let session = Arc::new(offline_session(Locale::En));
        tokio::spawn(serve_on(listener, session));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /api/result HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();
        let mut out = String::new();
        stream.read_to_string(&mut out).await.unwrap();
        assert!(out.starts_with("HTTP/1.1 204 No Content\r\n"), "{out}");
    }
}
