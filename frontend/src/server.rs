//! Web DSKY: a minimal HTTP/1.1 responder, one connection at a time.
//!
//! - `GET /`, `GET /index.html`: the DSKY page (also releases the start gate)
//! - `GET /status`: the display snapshot as JSON
//! - `GET /button/<c>`: a key press, `c` one of `0-9 a s v n c p z k e r`

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::sync::mpsc::Sender;
use std::time::Duration;

use agc_core::device::SharedDsky;
use serde::Serialize;

use crate::emulator::Control;
use crate::input::{InputEvent, KeyMap};

/// Longest request line read; the rest of an overlong line is ignored.
const MAX_REQUEST_LINE: u64 = 1024;

/// A client that sends nothing for this long is dropped.
const READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Served when the configured page cannot be read.
const BUILTIN_PAGE: &str = include_str!("../assets/index.html");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Index,
    Status,
    Button(char),
    BadRequest,
}

/// Route a request by its request line (`GET <path> HTTP/x.y`).
pub fn parse_request(request: &str) -> Route {
    let line = request.lines().next().unwrap_or("");
    let mut parts = line.split_whitespace();
    let (Some("GET"), Some(path), Some(version)) = (parts.next(), parts.next(), parts.next())
    else {
        return Route::BadRequest;
    };
    if !version.starts_with("HTTP/") {
        return Route::BadRequest;
    }

    match path {
        "/" | "/index.html" => Route::Index,
        "/status" => Route::Status,
        _ => {
            let Some(key) = path.strip_prefix("/button/") else {
                return Route::BadRequest;
            };
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_lowercase() || c.is_ascii_digit() => {
                    Route::Button(c)
                }
                _ => Route::BadRequest,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl Response {
    fn ok(content_type: &'static str, body: String) -> Self {
        Self {
            status: "200 OK",
            content_type,
            body,
        }
    }

    fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self::ok("application/json", body),
            Err(e) => {
                log::error!("status serialization failed: {e}");
                Self {
                    status: "500 Internal Server Error",
                    content_type: "text/plain",
                    body: "Error".to_string(),
                }
            }
        }
    }

    fn bad_request() -> Self {
        Self {
            status: "400 Bad Request",
            content_type: "text/plain",
            body: "Error".to_string(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status,
            self.content_type,
            self.body.len(),
            self.body
        )
        .into_bytes()
    }
}

#[derive(Debug, Serialize)]
struct KeyReply {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<u8>,
    message: String,
}

/// Everything a request can touch: the display, the key channel to the
/// CPU thread and the start gate.
pub struct Handler {
    index: PathBuf,
    keys: KeyMap,
    display: SharedDsky,
    events: Sender<InputEvent>,
    control: Arc<Control>,
}

impl Handler {
    pub fn new(
        index: PathBuf,
        keys: KeyMap,
        display: SharedDsky,
        events: Sender<InputEvent>,
        control: Arc<Control>,
    ) -> Self {
        Self {
            index,
            keys,
            display,
            events,
            control,
        }
    }

    pub fn respond(&self, route: Route) -> Response {
        match route {
            Route::Index => {
                if !self.control.ready.swap(true, Ordering::AcqRel) {
                    log::info!("DSKY client connected");
                }
                Response::ok("text/html", self.page())
            }
            Route::Status => {
                let status = self
                    .display
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .status();
                Response::json(&status)
            }
            Route::Button(c) => Response::json(&self.press(c)),
            Route::BadRequest => Response::bad_request(),
        }
    }

    fn page(&self) -> String {
        match std::fs::read_to_string(&self.index) {
            Ok(page) => page,
            Err(e) => {
                log::debug!("{}: {e}, serving built-in page", self.index.display());
                BUILTIN_PAGE.to_string()
            }
        }
    }

    fn press(&self, c: char) -> KeyReply {
        let Some(binding) = self.keys.get(c) else {
            return KeyReply {
                success: false,
                key: None,
                message: "Bad key event".to_string(),
            };
        };
        if self.events.send(binding.into()).is_err() {
            log::warn!("CPU thread gone, dropping key {}", binding.name);
        }
        let edge = if binding.pressed { "pressed" } else { "released" };
        KeyReply {
            success: true,
            key: Some(binding.button),
            message: format!("Key {} {}", binding.name, edge),
        }
    }
}

/// Read the request line, at most [`MAX_REQUEST_LINE`] bytes of it.
fn read_request_line<R: Read>(reader: R) -> io::Result<String> {
    let mut line = String::new();
    BufReader::new(reader.take(MAX_REQUEST_LINE)).read_line(&mut line)?;
    Ok(line)
}

pub struct Server {
    listener: TcpListener,
    handler: Handler,
}

impl Server {
    pub fn bind(addr: &str, handler: Handler) -> io::Result<Self> {
        let listener = TcpListener::bind(addr)?;
        log::info!("DSKY server listening on {}", listener.local_addr()?);
        Ok(Self { listener, handler })
    }

    /// Serve forever. A failed connection is logged and dropped.
    pub fn serve(self) {
        for stream in self.listener.incoming() {
            let result = stream.and_then(|stream| self.handle(stream));
            if let Err(e) = result {
                log::warn!("DSKY connection: {e}");
            }
        }
    }

    fn handle(&self, mut stream: TcpStream) -> io::Result<()> {
        stream.set_read_timeout(Some(READ_TIMEOUT))?;
        let line = read_request_line(&stream)?;
        let route = parse_request(&line);
        log::trace!("{} -> {:?}", line.trim_end(), route);
        let response = self.handler.respond(route);
        stream.write_all(&response.to_bytes())?;
        stream.flush()
    }
}
