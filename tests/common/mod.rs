//! Shared test infrastructure for integration tests.
//!
//! Runs the built binary against a throwaway HTTP stub so no test touches
//! the real API.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::Path;
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};
use std::thread;

/// Minimal HTTP/1.1 server answering every request with one canned response.
pub struct StubServer {
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub fn start(status: u16, reason: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let addr = listener.local_addr().expect("stub address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let response = format!(
            "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else {
                    continue;
                };
                let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
                let mut request_line = String::new();
                if reader.read_line(&mut request_line).is_err() {
                    continue;
                }
                // Drain headers up to the blank line.
                let mut line = String::new();
                while reader.read_line(&mut line).map(|n| n > 2).unwrap_or(false) {
                    line.clear();
                }
                seen.lock()
                    .expect("lock requests")
                    .push(request_line.trim_end().to_string());
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });

        Self {
            url: format!("http://{addr}/youtube/v3/videos"),
            requests,
        }
    }

    /// Respond with a `videos.list` payload holding one video.
    pub fn with_video(views: u64, likes: u64, comments: u64) -> Self {
        let body = format!(
            r#"{{"kind":"youtube#videoListResponse","items":[{{"id":"vid123","snippet":{{"title":"Launch day"}},"statistics":{{"viewCount":"{views}","likeCount":"{likes}","commentCount":"{comments}"}}}}]}}"#
        );
        Self::start(200, "OK", &body)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("lock requests").clone()
    }
}

/// Run the binary in `workdir` with only the given environment.
pub fn run_cli(workdir: &Path, env: &[(&str, &str)], args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_yt-metrics"));
    command.current_dir(workdir).env_clear().args(args);
    for (key, value) in env {
        command.env(key, value);
    }
    command.output().expect("run yt-metrics")
}

/// Environment for a normal run against `server`, writing to `data_file`.
pub fn base_env<'a>(server: &'a StubServer, data_file: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("YT_API_KEY", "test-key"),
        ("VIDEO_ID", "vid123"),
        ("YT_API_URL", server.url.as_str()),
        ("DATA_FILE", data_file),
    ]
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
