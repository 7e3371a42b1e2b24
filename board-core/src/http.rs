//! Minimaler HTTP/1.1 Client-Codec
//!
//! Nur was der Poller braucht: `POST` ohne Body, Antwort mit
//! `Content-Length` oder `Transfer-Encoding: chunked`, Verbindung wird
//! nach jeder Antwort geschlossen.

use core::fmt::Write as _;
use core::net::Ipv4Addr;
use core::str::FromStr;

use heapless::String;

/// Kapazität für den Request-Header
const REQUEST_HEAD_CAPACITY: usize = 256;

const USER_AGENT: &str = "light-board/1.0";
const HTTP_DEFAULT_PORT: u16 = 80;

/// Fehler beim Parsen einer Server-URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UrlError {
    UnsupportedScheme,
    EmptyHost,
    InvalidPort,
}

/// Fehler bei einem HTTP-Request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HttpError {
    /// TCP-Verbindung konnte nicht aufgebaut werden
    Connect,
    /// Lesen oder Schreiben auf dem Socket fehlgeschlagen
    Io,
    /// Server hat nicht rechtzeitig geantwortet
    Timeout,
    /// Antwort passt nicht in den Buffer
    BufferFull,
    /// Status-Zeile, Header oder Chunks ungültig
    Malformed,
    /// Verbindung geschlossen bevor die Antwort vollständig war
    Truncated,
}

/// Zerlegte `http://` URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HttpUrl<'a> {
    host: &'a str,
    port: u16,
    path: &'a str,
}

impl<'a> HttpUrl<'a> {
    /// Parst `http://host[:port][/path]`
    ///
    /// ```
    /// # use board_core::http::HttpUrl;
    /// let url = HttpUrl::parse("http://192.168.4.2:8001/api/show/getBrightness").unwrap();
    /// assert_eq!(url.host(), "192.168.4.2");
    /// assert_eq!(url.port(), 8001);
    /// assert_eq!(url.path(), "/api/show/getBrightness");
    /// ```
    pub fn parse(url: &'a str) -> Result<Self, UrlError> {
        let rest = url
            .strip_prefix("http://")
            .ok_or(UrlError::UnsupportedScheme)?;

        let (authority, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, "/"),
        };

        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| UrlError::InvalidPort)?;
                (host, port)
            }
            None => (authority, HTTP_DEFAULT_PORT),
        };

        if host.is_empty() {
            return Err(UrlError::EmptyHost);
        }
        if port == 0 {
            return Err(UrlError::InvalidPort);
        }

        Ok(Self { host, port, path })
    }

    pub fn host(&self) -> &'a str {
        self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn path(&self) -> &'a str {
        self.path
    }

    /// Host als IPv4-Adresse (im AP-Netz gibt es kein DNS)
    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        Ipv4Addr::from_str(self.host).ok()
    }
}

/// HTTP-Antwort, `body` zeigt in den Empfangs-Buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response<'a> {
    pub status: u16,
    pub body: &'a [u8],
}

impl Response<'_> {
    /// Nur 200 zählt als Erfolg
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Erzeugt den Request-Header für `POST` mit leerem Body
pub fn post_request(url: &HttpUrl<'_>) -> Result<String<REQUEST_HEAD_CAPACITY>, HttpError> {
    let mut head = String::new();

    write!(head, "POST {} HTTP/1.1\r\n", url.path).map_err(|_| HttpError::BufferFull)?;
    let host_line = if url.port == HTTP_DEFAULT_PORT {
        write!(head, "Host: {}\r\n", url.host)
    } else {
        write!(head, "Host: {}:{}\r\n", url.host, url.port)
    };
    host_line.map_err(|_| HttpError::BufferFull)?;
    write!(
        head,
        "User-Agent: {}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: 0\r\n\
         Connection: close\r\n\
         \r\n",
        USER_AGENT
    )
    .map_err(|_| HttpError::BufferFull)?;

    Ok(head)
}

/// Prüft ob eine gepufferte Antwort vollständig ist
///
/// Vollständig heißt: Header komplett und entweder `Content-Length` Bytes
/// Body oder der abschließende 0-Chunk empfangen. Ohne Längenangabe
/// endet die Antwort erst mit dem Schließen der Verbindung.
pub fn response_complete(data: &[u8]) -> bool {
    let Some(head_end) = find_head_end(data) else {
        return false;
    };
    let Ok(head) = parse_head(&data[..head_end]) else {
        // Kaputter Header: weiterlesen bringt nichts, parse_response meldet den Fehler
        return true;
    };

    let body = &data[head_end..];
    if head.chunked {
        chunks_complete(body).unwrap_or(true)
    } else if let Some(len) = head.content_length {
        body.len() >= len
    } else {
        false
    }
}

/// Parst eine komplette Antwort
///
/// Chunked Bodies werden direkt im Buffer dekodiert.
pub fn parse_response(data: &mut [u8]) -> Result<Response<'_>, HttpError> {
    let head_end = find_head_end(data).ok_or(HttpError::Truncated)?;
    let head = parse_head(&data[..head_end])?;

    let body_len = if head.chunked {
        decode_chunked(&mut data[head_end..])?
    } else if let Some(len) = head.content_length {
        if data.len() - head_end < len {
            return Err(HttpError::Truncated);
        }
        len
    } else {
        data.len() - head_end
    };

    let data: &[u8] = data;
    Ok(Response {
        status: head.status,
        body: &data[head_end..head_end + body_len],
    })
}

/// Dekodiert einen chunked Body in place, gibt die Nutzdaten-Länge zurück
pub fn decode_chunked(body: &mut [u8]) -> Result<usize, HttpError> {
    let mut read = 0;
    let mut write = 0;

    loop {
        let (size, start) = chunk_header(body, read)?.ok_or(HttpError::Truncated)?;
        if size == 0 {
            return Ok(write);
        }

        let end = start.checked_add(size).ok_or(HttpError::Malformed)?;
        if end + 2 > body.len() {
            return Err(HttpError::Truncated);
        }
        if &body[end..end + 2] != b"\r\n" {
            return Err(HttpError::Malformed);
        }

        body.copy_within(start..end, write);
        write += size;
        read = end + 2;
    }
}

struct Head {
    status: u16,
    content_length: Option<usize>,
    chunked: bool,
}

fn find_head_end(data: &[u8]) -> Option<usize> {
    data.windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|idx| idx + 4)
}

fn parse_head(head: &[u8]) -> Result<Head, HttpError> {
    let text = core::str::from_utf8(head).map_err(|_| HttpError::Malformed)?;
    let mut lines = text.split("\r\n");

    let status_line = lines.next().ok_or(HttpError::Malformed)?;
    let mut parts = status_line.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/1.") {
        return Err(HttpError::Malformed);
    }
    let status = parts
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .filter(|code| (100..=999).contains(code))
        .ok_or(HttpError::Malformed)?;

    let mut content_length = None;
    let mut chunked = false;

    for line in lines.filter(|line| !line.is_empty()) {
        let (name, value) = line.split_once(':').ok_or(HttpError::Malformed)?;
        let name = name.trim();
        let value = value.trim();

        if name.eq_ignore_ascii_case("content-length") {
            content_length = Some(value.parse::<usize>().map_err(|_| HttpError::Malformed)?);
        } else if name.eq_ignore_ascii_case("transfer-encoding") {
            chunked = value
                .split(',')
                .any(|coding| coding.trim().eq_ignore_ascii_case("chunked"));
        }
    }

    Ok(Head {
        status,
        content_length,
        chunked,
    })
}

/// Liest eine Chunk-Größenzeile ab `pos`
///
/// `Ok(None)` wenn die Zeile noch nicht vollständig empfangen wurde.
fn chunk_header(body: &[u8], pos: usize) -> Result<Option<(usize, usize)>, HttpError> {
    let rest = body.get(pos..).ok_or(HttpError::Malformed)?;
    let Some(line_end) = rest.windows(2).position(|window| window == b"\r\n") else {
        return Ok(None);
    };

    let line = core::str::from_utf8(&rest[..line_end]).map_err(|_| HttpError::Malformed)?;
    // Chunk-Extensions nach ';' werden ignoriert
    let size = line.split(';').next().unwrap_or_default().trim();
    let size = usize::from_str_radix(size, 16).map_err(|_| HttpError::Malformed)?;

    Ok(Some((size, pos + line_end + 2)))
}

fn chunks_complete(body: &[u8]) -> Result<bool, HttpError> {
    let mut read = 0;

    loop {
        let Some((size, start)) = chunk_header(body, read)? else {
            return Ok(false);
        };
        if size == 0 {
            return Ok(body[start..].ends_with(b"\r\n"));
        }

        let end = start.checked_add(size).ok_or(HttpError::Malformed)?;
        if end + 2 > body.len() {
            return Ok(false);
        }
        read = end + 2;
    }
}
