#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{mpsc as std_mpsc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use fetchpool::{Callbacks, EngineBuilder};

/// How long a test waits for a task to end before giving up.
pub const TERMINAL_TIMEOUT: Duration = Duration::from_secs(20);

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates a temporary file with the given content
pub fn create_temp_file(dir: &Path, filename: &str, content: &[u8]) -> PathBuf {
    let file_path = dir.join(filename);
    fs::write(&file_path, content).expect("Failed to write temporary file");
    file_path
}

/// Creates test file content of specified size
pub fn create_test_content(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 251) as u8).collect()
}

/// Asserts that a file has the expected size
pub fn assert_file_size(path: &Path, expected_size: u64) {
    let metadata = fs::metadata(path).expect("Failed to get file metadata");
    assert_eq!(
        metadata.len(),
        expected_size,
        "File size mismatch at path: {:?}",
        path
    );
}

/// Creates an engine saving into `dir` with small chunks and a short timeout
pub fn create_test_engine_builder(dir: &Path) -> EngineBuilder {
    EngineBuilder::new()
        .directory(dir.to_path_buf())
        .chunk_size(8192)
        .timeout(Duration::from_secs(5))
}

// === Callback Recording ===

/// Everything a task can report.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Progress(f64),
    Status(String),
    Finish {
        filename: String,
        path: PathBuf,
        total: u64,
    },
    Error(String),
    Pause,
    Cancel,
}

impl Event {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Event::Finish { .. } | Event::Error(_) | Event::Pause | Event::Cancel
        )
    }
}

/// Callbacks forwarding every event into a channel.
#[derive(Debug, Clone)]
pub struct Recorder {
    tx: UnboundedSender<Event>,
}

impl Recorder {
    fn send(&self, event: Event) {
        // The test may have stopped listening.
        let _ = self.tx.send(event);
    }
}

impl Callbacks for Recorder {
    fn on_progress(&self, percent: f64) {
        self.send(Event::Progress(percent));
    }

    fn on_status(&self, text: &str) {
        self.send(Event::Status(text.to_string()));
    }

    fn on_finish(&self, filename: &str, path: &Path, total_bytes: u64) {
        self.send(Event::Finish {
            filename: filename.to_string(),
            path: path.to_path_buf(),
            total: total_bytes,
        });
    }

    fn on_error(&self, message: &str) {
        self.send(Event::Error(message.to_string()));
    }

    fn on_pause(&self) {
        self.send(Event::Pause);
    }

    fn on_cancel(&self) {
        self.send(Event::Cancel);
    }
}

pub fn recorder() -> (Recorder, UnboundedReceiver<Event>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Recorder { tx }, rx)
}

/// Recorder that holds the worker inside its first progress report until the
/// test releases it, so commands can land between two chunks.
#[derive(Debug)]
pub struct GatedRecorder {
    inner: Recorder,
    gate: Mutex<Option<std_mpsc::Receiver<()>>>,
}

impl Callbacks for GatedRecorder {
    fn on_progress(&self, percent: f64) {
        self.inner.on_progress(percent);
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.recv_timeout(TERMINAL_TIMEOUT);
        }
    }

    fn on_status(&self, text: &str) {
        self.inner.on_status(text);
    }

    fn on_finish(&self, filename: &str, path: &Path, total_bytes: u64) {
        self.inner.on_finish(filename, path, total_bytes);
    }

    fn on_error(&self, message: &str) {
        self.inner.on_error(message);
    }

    fn on_pause(&self) {
        self.inner.on_pause();
    }

    fn on_cancel(&self) {
        self.inner.on_cancel();
    }
}

/// A [`GatedRecorder`], its event stream and the sender that releases it.
pub fn gated_recorder() -> (GatedRecorder, UnboundedReceiver<Event>, std_mpsc::Sender<()>) {
    let (inner, rx) = recorder();
    let (release, gate) = std_mpsc::channel();
    let callbacks = GatedRecorder {
        inner,
        gate: Mutex::new(Some(gate)),
    };
    (callbacks, rx, release)
}

/// Collect events up to and including the first progress report.
pub async fn wait_first_progress(rx: &mut UnboundedReceiver<Event>) -> Vec<Event> {
    let mut seen = Vec::new();
    let collect = async {
        while let Some(event) = rx.recv().await {
            assert!(!event.is_terminal(), "task ended before any progress: {event:?}");
            let is_progress = matches!(event, Event::Progress(_));
            seen.push(event);
            if is_progress {
                return;
            }
        }
        panic!("callbacks dropped before any progress");
    };
    tokio::time::timeout(TERMINAL_TIMEOUT, collect)
        .await
        .expect("no progress in time");
    seen
}

/// Collect events until the terminal one. Returns the terminal event and
/// everything before it.
pub async fn wait_terminal(rx: &mut UnboundedReceiver<Event>) -> (Event, Vec<Event>) {
    let mut seen = Vec::new();
    let collect = async {
        while let Some(event) = rx.recv().await {
            if event.is_terminal() {
                return event;
            }
            seen.push(event);
        }
        panic!("callbacks dropped before a terminal event");
    };
    let terminal = tokio::time::timeout(TERMINAL_TIMEOUT, collect)
        .await
        .expect("task did not end in time");
    (terminal, seen)
}

/// Progress values in the order they were reported.
pub fn progress_values(events: &[Event]) -> Vec<f64> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Progress(p) => Some(*p),
            _ => None,
        })
        .collect()
}

/// Asserts progress never goes backwards and stays in [0, 100]
pub fn assert_progress_well_formed(values: &[f64]) {
    for pair in values.windows(2) {
        assert!(pair[0] <= pair[1], "progress went from {} to {}", pair[0], pair[1]);
    }
    for v in values {
        assert!((0.0..=100.0).contains(v), "progress {} out of bounds", v);
    }
}

// === Mock Server ===

/// Serves `body`, honouring `Range: bytes=N-` like a resume-capable server.
pub struct RangedBody {
    pub body: Vec<u8>,
    pub delay: Option<Duration>,
}

impl Respond for RangedBody {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let len = self.body.len();
        let start = request
            .headers
            .get("range")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("bytes="))
            .and_then(|v| v.strip_suffix('-'))
            .and_then(|v| v.parse::<usize>().ok());

        let template = match start {
            Some(start) if start >= len => ResponseTemplate::new(416)
                .insert_header("Content-Range", format!("bytes */{}", len).as_str()),
            Some(start) => ResponseTemplate::new(206)
                .insert_header(
                    "Content-Range",
                    format!("bytes {}-{}/{}", start, len - 1, len).as_str(),
                )
                .set_body_bytes(self.body[start..].to_vec()),
            None => ResponseTemplate::new(200).set_body_bytes(self.body.clone()),
        };

        match self.delay {
            Some(delay) => template.set_delay(delay),
            None => template,
        }
    }
}

/// Mount a range-capable resource at `route`.
pub async fn mount_ranged(server: &MockServer, route: &str, body: Vec<u8>, delay: Option<Duration>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(RangedBody { body, delay })
        .mount(server)
        .await;
}

/// Mount a resource at `route` that always answers with a fixed response.
pub async fn mount_fixed(server: &MockServer, route: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .mount(server)
        .await;
}

/// Range headers of every request the server received, in order.
pub async fn received_ranges(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|r| r.headers.get("range"))
        .filter_map(|v| v.to_str().ok())
        .map(String::from)
        .collect()
}

/// Serve `body` once with `Transfer-Encoding: chunked` and no Content-Length.
/// Returns the base URL.
pub async fn serve_chunked_once(body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read listener address");

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => return,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }

        let mut response = b"HTTP/1.1 200 OK\r\n\
            Content-Type: application/octet-stream\r\n\
            Transfer-Encoding: chunked\r\n\
            Connection: close\r\n\r\n"
            .to_vec();
        for piece in body.chunks(3_000) {
            response.extend_from_slice(format!("{:x}\r\n", piece.len()).as_bytes());
            response.extend_from_slice(piece);
            response.extend_from_slice(b"\r\n");
        }
        response.extend_from_slice(b"0\r\n\r\n");

        let _ = socket.write_all(&response).await;
        let _ = socket.shutdown().await;
    });

    format!("http://{}", addr)
}
