//! Resource locator: URL tokenizing and default request headers.
//!
//! Accepted forms:
//!
//! - `http://host[:port][/path]` and `https://host[:port][/path]`
//! - `file://<path>`
//! - `data://[media-type],<payload>`

use std::fmt;

use glimpse_types::error::{GlimpseError, Result};

/// Value of the default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = "glimpse";

/// Transport selected by the URL prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
    File,
    Data,
}

impl Scheme {
    /// Recognize a scheme name (ASCII case-insensitive).
    pub fn parse(name: &str) -> Result<Self> {
        const SCHEMES: [(&str, Scheme); 4] = [
            ("http", Scheme::Http),
            ("https", Scheme::Https),
            ("file", Scheme::File),
            ("data", Scheme::Data),
        ];
        SCHEMES
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|&(_, scheme)| scheme)
            .ok_or_else(|| GlimpseError::UnsupportedScheme(name.to_string()))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::File => "file",
            Scheme::Data => "data",
        }
    }

    /// Port used when the URL does not name one. Only network schemes
    /// have ports.
    pub fn default_port(self) -> Option<u16> {
        match self {
            Scheme::Http => Some(80),
            Scheme::Https => Some(443),
            Scheme::File | Scheme::Data => None,
        }
    }

    /// Whether this scheme is fetched over a socket.
    pub fn is_network(self) -> bool {
        self.default_port().is_some()
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

/// Lexical pieces of a URL, borrowed from the input string.
#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Scheme(&'a str),
    Host(&'a str),
    Port(&'a str),
    Path(&'a str),
}

/// Splits a URL string into [`Token`]s.
///
/// The scheme picks the grammar for the remainder (authority + path for
/// network schemes, a bare path otherwise). Port digits are not checked
/// here.
struct Tokenizer<'a> {
    input: &'a str,
    rest: &'a str,
    tokens: Vec<Token<'a>>,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            rest: input,
            tokens: Vec::with_capacity(4),
        }
    }

    fn run(mut self) -> Result<Vec<Token<'a>>> {
        let scheme = self.scheme()?;
        match Scheme::parse(scheme)? {
            // The whole remainder names a local path or inline payload.
            Scheme::File | Scheme::Data => {
                self.tokens.push(Token::Path(self.rest));
            },
            Scheme::Http | Scheme::Https => {
                self.authority()?;
                self.tokens.push(Token::Path(self.rest));
            },
        }
        Ok(self.tokens)
    }

    /// Consume `scheme://`.
    fn scheme(&mut self) -> Result<&'a str> {
        let end = self
            .rest
            .find("://")
            .ok_or_else(|| GlimpseError::MalformedUrl(format!("missing \"://\" in {:?}", self.input)))?;
        let scheme = &self.rest[..end];
        if scheme.is_empty() {
            return Err(GlimpseError::MalformedUrl(format!(
                "empty scheme in {:?}",
                self.input
            )));
        }
        self.tokens.push(Token::Scheme(scheme));
        self.rest = &self.rest[end + 3..];
        Ok(scheme)
    }

    /// Consume `host[:port]`, stopping before the first `/`.
    fn authority(&mut self) -> Result<()> {
        let end = self.rest.find('/').unwrap_or(self.rest.len());
        let authority = &self.rest[..end];
        self.rest = &self.rest[end..];

        let (host, port) = match authority.split_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (authority, None),
        };
        if host.is_empty() {
            return Err(GlimpseError::MalformedUrl(format!(
                "missing host in {:?}",
                self.input
            )));
        }
        self.tokens.push(Token::Host(host));
        if let Some(port) = port {
            self.tokens.push(Token::Port(port));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ParsedUrl
// ---------------------------------------------------------------------------

/// A URL broken into the pieces the transport needs, plus the request
/// headers that will be sent with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    scheme: Scheme,
    host: String,
    port: Option<u16>,
    path: String,
    /// Insertion-ordered; names keep their original case for the wire.
    headers: Vec<(String, String)>,
}

impl ParsedUrl {
    /// Parse a URL string.
    ///
    /// Fails with [`GlimpseError::UnsupportedScheme`] for schemes other
    /// than http, https, file and data, and with
    /// [`GlimpseError::MalformedUrl`] for strings without `://`, network
    /// URLs without a host, bad ports, and data URLs without a `,`.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let mut scheme = None;
        let mut host = "";
        let mut port = None;
        let mut path = "";

        for token in Tokenizer::new(input).run()? {
            match token {
                Token::Scheme(s) => scheme = Some(Scheme::parse(s)?),
                Token::Host(h) => host = h,
                Token::Port(p) => port = Some(parse_port(p, input)?),
                Token::Path(p) => path = p,
            }
        }
        let scheme =
            scheme.ok_or_else(|| GlimpseError::MalformedUrl(format!("no scheme in {input:?}")))?;

        let (host, port, path) = match scheme {
            Scheme::Http | Scheme::Https => (
                host.to_string(),
                port.or(scheme.default_port()),
                rooted(path),
            ),
            Scheme::File => (String::new(), None, rooted(path)),
            Scheme::Data => {
                let (media_type, payload) = path.split_once(',').ok_or_else(|| {
                    GlimpseError::MalformedUrl(format!("data URL without ',' in {input:?}"))
                })?;
                let media_type = if media_type.is_empty() {
                    "text/plain"
                } else {
                    media_type
                };
                (media_type.to_string(), None, format!("/{payload}"))
            },
        };

        let mut url = Self {
            scheme,
            host,
            port,
            path,
            headers: Vec::with_capacity(4),
        };
        url.seed_default_headers();
        Ok(url)
    }

    fn seed_default_headers(&mut self) {
        // A data URL's host slot holds its media type, not a server name.
        let host = if self.scheme.is_network() {
            self.host.clone()
        } else {
            String::new()
        };
        self.add_header("Host", &host);
        self.add_header("Connection", "close");
        self.add_header("User-Agent", DEFAULT_USER_AGENT);
        self.add_header("Accept-Encoding", "gzip");
    }

    /// Set a request header, replacing any existing value for the same
    /// name (compared case-insensitively). A replaced header keeps its
    /// position in the request.
    pub fn add_header(&mut self, key: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
        {
            Some(entry) => *entry = (key.to_string(), value.to_string()),
            None => self.headers.push((key.to_string(), value.to_string())),
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Request headers in the order they go on the wire.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Network host, the media type of a data URL, or empty for files.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Always begins with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.scheme, self.port) {
            (Scheme::File, _) => write!(f, "file://{}", self.path),
            (Scheme::Data, _) => write!(f, "data://{},{}", self.host, &self.path[1..]),
            (_, Some(port)) => write!(f, "{}://{}:{}{}", self.scheme, self.host, port, self.path),
            (_, None) => write!(f, "{}://{}{}", self.scheme, self.host, self.path),
        }
    }
}

fn parse_port(port: &str, input: &str) -> Result<u16> {
    port.parse::<u16>()
        .map_err(|_| GlimpseError::MalformedUrl(format!("bad port {port:?} in {input:?}")))
}

/// Prefix `/` unless already present.
fn rooted(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
