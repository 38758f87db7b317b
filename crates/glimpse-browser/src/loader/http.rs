//! Minimal HTTP/1.0 GET client.
//!
//! One request per connection: connect, optionally upgrade to TLS through
//! the configured [`TlsProvider`], write the request, read until the peer
//! closes. Redirects and chunked bodies are not supported.

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Read, Write};

use glimpse_net::TlsProvider;
use glimpse_types::backend::NetworkStream;
use glimpse_types::error::{GlimpseError, Result};

use crate::url::{ParsedUrl, Scheme};

/// Parsed first line of a response, e.g. `HTTP/1.0 200 OK`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub version: String,
    pub code: u16,
    pub reason: String,
}

/// Response headers keyed by case-folded name.
///
/// Never contains `transfer-encoding`: [`read_response`] rejects such a
/// response before the map is handed out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    map: HashMap<String, String>,
}

impl ResponseHeaders {
    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Parse and store one `Name: value` line. Repeated names keep the
    /// last value.
    fn insert_line(&mut self, line: &str) -> Result<()> {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| GlimpseError::MalformedResponse(format!("bad header line {line:?}")))?;
        let name = name.trim().to_lowercase();
        let value = value.trim().to_string();
        if name == "transfer-encoding" {
            return Err(GlimpseError::UnsupportedTransferEncoding(value));
        }
        self.map.insert(name, value);
        Ok(())
    }
}

/// A complete response with its body decoded to text.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusLine,
    pub headers: ResponseHeaders,
    pub body: String,
}

/// Fetch `url` (http or https) and return the decoded response.
///
/// The connection is closed before returning, whether or not the
/// exchange succeeded.
pub fn http_get(url: &ParsedUrl, tls: Option<&dyn TlsProvider>) -> Result<Response> {
    let scheme = url.scheme();
    let port = match (scheme, url.port()) {
        (Scheme::Http | Scheme::Https, Some(port)) => port,
        _ => {
            return Err(GlimpseError::UnsupportedScheme(format!(
                "{scheme} is not fetched over HTTP"
            )));
        },
    };

    let mut stream = connect(url.host(), port, scheme == Scheme::Https, tls)?;
    let result = exchange(&mut *stream, url);
    if let Err(e) = stream.close() {
        log::debug!("closing connection to {}: {e}", url.host());
    }

    if let Ok(resp) = &result {
        log::debug!(
            "{url} -> {} {} ({} bytes)",
            resp.status.code,
            resp.status.reason,
            resp.body.len()
        );
    }
    result
}

/// Open the TCP connection and, for https, finish the TLS handshake
/// before any request bytes are written.
fn connect(
    host: &str,
    port: u16,
    https: bool,
    tls: Option<&dyn TlsProvider>,
) -> Result<Box<dyn NetworkStream>> {
    let mut tcp = glimpse_net::tcp_connect(host, port)?;
    if !https {
        return Ok(Box::new(tcp));
    }

    let Some(provider) = tls else {
        let _ = tcp.close();
        return Err(GlimpseError::TlsHandshakeFailure(format!(
            "no TLS provider available for {host}"
        )));
    };
    provider.connect_tls(Box::new(tcp), host)
}

/// Write the request and read the response on an open stream.
fn exchange(stream: &mut dyn NetworkStream, url: &ParsedUrl) -> Result<Response> {
    let mut io = NetworkStreamAdapter(stream);
    io.write_all(serialize_request(url).as_bytes())
        .and_then(|()| io.flush())
        .map_err(|e| GlimpseError::ConnectionFailure(format!("send request: {e}")))?;

    read_response(&mut BufReader::new(io))
}

/// Serialize `GET {path} HTTP/1.0` followed by the URL's headers in
/// insertion order and a blank line.
pub fn serialize_request(url: &ParsedUrl) -> String {
    let mut request = format!("GET {} HTTP/1.0\r\n", url.path());
    for (key, value) in url.headers() {
        request.push_str(key);
        request.push(':');
        request.push_str(value);
        request.push_str("\r\n");
    }
    request.push_str("\r\n");
    request
}

/// Read a status line, headers up to the blank line, and the rest of the
/// stream as the body.
///
/// A `transfer-encoding` header aborts with
/// [`GlimpseError::UnsupportedTransferEncoding`] before any body byte is
/// read. A `content-encoding: gzip` body is decompressed before UTF-8
/// decoding.
pub fn read_response(reader: &mut impl BufRead) -> Result<Response> {
    let status_line = read_line(reader)?
        .ok_or_else(|| GlimpseError::MalformedResponse("empty response".to_string()))?;
    let status = parse_status_line(&status_line)?;

    let mut headers = ResponseHeaders::default();
    loop {
        let line = read_line(reader)?.ok_or_else(|| {
            GlimpseError::MalformedResponse("connection closed inside headers".to_string())
        })?;
        if line.is_empty() {
            break;
        }
        headers.insert_line(&line)?;
    }

    let mut raw = Vec::new();
    reader
        .read_to_end(&mut raw)
        .map_err(|e| GlimpseError::ConnectionFailure(format!("read body: {e}")))?;

    let body = decode_body(&raw, headers.get("content-encoding"))?;
    Ok(Response {
        status,
        headers,
        body,
    })
}

/// Parse `VERSION CODE [REASON]`.
pub fn parse_status_line(line: &str) -> Result<StatusLine> {
    let mut parts = line.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/") {
        return Err(GlimpseError::MalformedResponse(format!(
            "bad status line {line:?}"
        )));
    }
    let code = parts
        .next()
        .and_then(|c| c.parse::<u16>().ok())
        .ok_or_else(|| GlimpseError::MalformedResponse(format!("bad status code in {line:?}")))?;
    let reason = parts.next().unwrap_or_default().trim().to_string();

    Ok(StatusLine {
        version: version.to_string(),
        code,
        reason,
    })
}

/// Turn the raw body into text, gunzipping first when the server says
/// so.
pub fn decode_body(raw: &[u8], content_encoding: Option<&str>) -> Result<String> {
    let bytes = match content_encoding {
        Some(enc) if enc.eq_ignore_ascii_case("gzip") => gunzip(raw)?,
        Some(enc) if !enc.eq_ignore_ascii_case("identity") => {
            log::warn!("ignoring unknown content-encoding {enc:?}");
            raw.to_vec()
        },
        _ => raw.to_vec(),
    };
    String::from_utf8(bytes).map_err(|e| GlimpseError::DecodeFailure(format!("body: {e}")))
}

fn gunzip(raw: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(raw.len() * 4);
    flate2::read::GzDecoder::new(raw)
        .read_to_end(&mut out)
        .map_err(|e| GlimpseError::DecodeFailure(format!("gzip: {e}")))?;
    Ok(out)
}

/// Read one CRLF-terminated line without its terminator. `None` at EOF.
fn read_line(reader: &mut impl BufRead) -> Result<Option<String>> {
    let mut buf = Vec::new();
    let n = reader
        .read_until(b'\n', &mut buf)
        .map_err(|e| GlimpseError::ConnectionFailure(format!("read response: {e}")))?;
    if n == 0 {
        return Ok(None);
    }
    if buf.ends_with(b"\n") {
        buf.pop();
        if buf.ends_with(b"\r") {
            buf.pop();
        }
    }
    String::from_utf8(buf)
        .map(Some)
        .map_err(|_| GlimpseError::MalformedResponse("non-UTF-8 response head".to_string()))
}

// -------------------------------------------------------------------
// NetworkStream → Read + Write adapter
// -------------------------------------------------------------------

/// Adapts a `&mut dyn NetworkStream` to `std::io::Read` + `std::io::Write`
/// so it can sit under a `BufReader`.
struct NetworkStreamAdapter<'a>(&'a mut dyn NetworkStream);

impl Read for NetworkStreamAdapter<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf).map_err(glimpse_err_to_io)
    }
}

impl Write for NetworkStreamAdapter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf).map_err(glimpse_err_to_io)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush().map_err(glimpse_err_to_io)
    }
}

/// Convert a [`GlimpseError`] to [`io::Error`], preserving the original
/// `io::Error` when the variant is `GlimpseError::Io`.
fn glimpse_err_to_io(e: GlimpseError) -> io::Error {
    match e {
        GlimpseError::Io(io_err) => io_err,
        other => io::Error::other(other.to_string()),
    }
}
