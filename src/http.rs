//! The HTTP adapter: request parsing, routing, and plaintext response
//! rendering. Deliberately thin — every route does one [`UserStore`] call
//! and converts the result to a fixed message string.

use std::convert::TryFrom;
use std::io::BufRead;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde_json::Value;

use crate::error::Error;
use crate::record::Record;
use crate::store::UserStore;

lazy_static! {
    static ref UID_RE: Regex = Regex::new(r"uid=(\d+)").unwrap();
}

const CORS_HEADERS: &str = "Access-Control-Allow-Origin: *\r\n\
Access-Control-Allow-Methods: POST, GET, OPTIONS\r\n\
Access-Control-Allow-Credentials: true\r\n\
Access-Control-Allow-Headers: *\r\n";

pub struct Request {
    pub method: String,
    pub path: String,
    pub query: String,
    pub body: Vec<u8>,
}

impl Request {
    /// Read and parse one HTTP request off `reader`. Returns `None` on a
    /// malformed request line or an I/O error; the caller drops the
    /// connection without a response in that case, per the transport error
    /// policy.
    pub fn read<R: BufRead>(reader: &mut R) -> Option<Request> {
        let mut line = String::new();
        if reader.read_line(&mut line).ok()? == 0 {
            return None;
        }
        let mut parts = line.trim_end().splitn(3, ' ');
        let method = parts.next()?.to_string();
        let target = parts.next()?.to_string();
        let _version = parts.next()?;

        let mut content_length = 0usize;
        loop {
            let mut header_line = String::new();
            if reader.read_line(&mut header_line).ok()? == 0 {
                break;
            }
            let header_line = header_line.trim_end();
            if header_line.is_empty() {
                break;
            }
            if let Some((name, value)) = header_line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
        }

        let mut body = vec![0u8; content_length];
        if content_length > 0 {
            reader.read_exact(&mut body).ok()?;
        }

        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path.to_string(), query.to_string()),
            None => (target, String::new()),
        };

        Some(Request {
            method,
            path,
            query,
            body,
        })
    }
}

pub struct Response {
    body: String,
}

impl Response {
    fn new(body: impl Into<String>) -> Response {
        Response { body: body.into() }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        format!(
            "HTTP/1.1 200 OK\r\n\
Content-Length: {}\r\n\
{}\
\r\n\
{}",
            self.body.len(),
            CORS_HEADERS,
            self.body
        )
        .into_bytes()
    }
}

/// Dispatch one parsed request against `store`. Matches the fixed table in
/// the order it's declared: a literal `(method, path)` lookup for every
/// route except the uid suffix, which is pulled out of the query string by
/// [`UID_RE`].
pub fn handle(store: &UserStore, request: &Request) -> Response {
    let uid = UID_RE
        .captures(&request.query)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok());

    match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/info") => Response::new(handle_info(store, uid)),
        ("POST", "/put") => Response::new(handle_put(store, &request.body)),
        ("GET", "/remove") => Response::new(handle_remove(store, uid)),
        ("GET", "/get_exp_pers") => Response::new(handle_rank(store, uid, "exp_pers", "Exp_Pers")),
        ("GET", "/get_active") => Response::new(handle_rank(store, uid, "active", "Active")),
        ("GET", "/get_exp_gang") => Response::new(handle_rank(store, uid, "exp_gang", "Exp_Gang")),
        ("OPTIONS", _) => Response::new("<h1>OPTIONS</h1>"),
        ("GET", _) => Response::new("<h1>Bad GET</h1>"),
        (method, path) => {
            debug!("unmatched route: {} {}", method, path);
            Response::new("<h1>Bad GET</h1>")
        }
    }
}

fn not_found_message(uid: u32) -> String {
    Error::UnknownUid(uid).to_string()
}

fn handle_info(store: &UserStore, uid: Option<u32>) -> String {
    let uid = match uid {
        Some(uid) => uid,
        None => return "Bad Param".to_string(),
    };
    match store.get(uid) {
        Ok(record) => format!(
            "uid={} name={} exp_pers={} active={} exp_gang={}",
            record.uid, record.name, record.exp_pers, record.active, record.exp_gang
        ),
        Err(_) => not_found_message(uid),
    }
}

fn handle_remove(store: &UserStore, uid: Option<u32>) -> String {
    let uid = match uid {
        Some(uid) => uid,
        None => return "Bad Param".to_string(),
    };
    match store.erase(uid) {
        Ok(()) => "Remove Successfully".to_string(),
        Err(_) => not_found_message(uid),
    }
}

fn handle_rank(store: &UserStore, uid: Option<u32>, view: &str, label: &str) -> String {
    let uid = match uid {
        Some(uid) => uid,
        None => return "Bad Param".to_string(),
    };
    match store.rank(view, uid) {
        Ok(rank) => format!("{} Rank: {}", label, rank),
        Err(_) => not_found_message(uid),
    }
}

const PUT_FIELDS: [&str; 5] = ["uid", "name", "exp_pers", "active", "exp_gang"];

/// Render a store/parse-level [`Error`] as the fixed plaintext body for
/// `POST /put`, per the propagation policy in `SPEC_FULL.md` §7: the typed
/// error, not a string literal, is the source of truth for the response.
fn put_error_body(err: Error) -> String {
    match err {
        Error::MalformedRequest => "Bad Put".to_string(),
        Error::DuplicateUid(_) => "Bad Put".to_string(),
        Error::BadParam => "Bad Param".to_string(),
        other => other.to_string(),
    }
}

fn handle_put(store: &UserStore, body: &[u8]) -> String {
    match parse_put_request(body).and_then(|record| store.put(record)) {
        Ok(()) => "Put Successfully".to_string(),
        Err(err) => put_error_body(err),
    }
}

/// Decode and validate a `POST /put` body into a [`Record`], failing with
/// [`Error::MalformedRequest`] on anything that isn't exactly the five
/// expected fields in the expected order, or [`Error::BadParam`] once the
/// shape is right but a value doesn't decode as the expected integer type.
fn parse_put_request(body: &[u8]) -> Result<Record, Error> {
    let text = std::str::from_utf8(body).map_err(|_| Error::MalformedRequest)?;
    let value: Value = serde_json::from_str(text).map_err(|_| Error::MalformedRequest)?;
    let map = value.as_object().ok_or(Error::MalformedRequest)?;

    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    if keys != PUT_FIELDS {
        return Err(Error::MalformedRequest);
    }

    parse_record(map).ok_or(Error::BadParam)
}

fn parse_record(map: &serde_json::Map<String, Value>) -> Option<Record> {
    let uid = map.get("uid")?.as_u64()?;
    let name = map.get("name")?.as_str()?.to_string();
    let exp_pers = map.get("exp_pers")?.as_u64()?;
    let active = map.get("active")?.as_u64()?;
    let exp_gang = map.get("exp_gang")?.as_u64()?;

    Some(Record::new(
        u32::try_from(uid).ok()?,
        name,
        u32::try_from(exp_pers).ok()?,
        u32::try_from(active).ok()?,
        u32::try_from(exp_gang).ok()?,
    ))
}

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;
