use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

pub const PROFILE_PATH: &str = "/jane-doe/";
pub const CONTENTS_PATH: &str = "/repos/octo/site/contents/brand.html";

pub const JANE_DOE_PAGE: &str = r##"<!doctype html>
<html>
<body>
  <div class="c-s-speaker-info">
    <h1 class="c-s-speaker-info__name">Jane Doe</h1>
    <p class="c-s-speaker-info__tagline">Platform engineer</p>
    <div class="c-s-speaker-info__avatar"><img src="https://cdn.example.com/jane.jpg"></div>
    <p class="c-s-speaker-info__location">Remote</p>
    <div v-if="activeLanguage.speaker == 'en'">Builds `platforms`.<br>Speaks often.</div>
    <div v-if="activeLanguage.speaker == 'pl'">Buduje platformy.</div>
    <div class="c-s-speaker-info__group c-s-speaker-info__group--links">
      <h3 class="c-s-speaker-info__group-title">Links</h3>
      <a class="c-s-links__link" href="https://github.com/jane">
        <svg><use xlink:href="#icon-twitter"></use></svg><span class="o-label">GitHub</span>
      </a>
    </div>
    <div class="c-s-speaker-info__group">
      <h3 class="c-s-speaker-info__group-title">Area of Expertise</h3>
      <ul><li>Cloud</li><li>Security</li></ul>
    </div>
    <div class="c-s-speaker-info__group">
      <h3 class="c-s-speaker-info__group-title">Topics</h3>
      <ul><li>DevOps</li></ul>
    </div>
  </div>
</body>
</html>
"##;

#[derive(Debug, Clone)]
pub struct StubConfig {
    pub profile_status: u16,
    /// Initial remote file; `None` makes the contents endpoint answer 404.
    pub remote_text: Option<String>,
    pub put_status: u16,
    /// Answer reads with `encoding: none` and no content, the way the API
    /// reports files over 1 MB.
    pub oversized: bool,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            profile_status: 200,
            remote_text: None,
            put_status: 200,
            oversized: false,
        }
    }
}

#[derive(Debug, Default)]
struct StubState {
    remote: Option<(String, String)>,
    revision: u32,
    gets: Vec<String>,
    puts: Vec<Value>,
    authorizations: Vec<Option<String>>,
}

pub struct Stub {
    pub base_url: String,
    state: Arc<Mutex<StubState>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Stub {
    pub fn spawn(config: StubConfig) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");

        let state = Arc::new(Mutex::new(StubState {
            remote: config
                .remote_text
                .clone()
                .map(|text| (text, "sha-0".to_owned())),
            ..StubState::default()
        }));

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let thread_state = Arc::clone(&state);

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let mut request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let url = request.url().to_string();
                let path = url.split('?').next().unwrap_or(&url).to_owned();

                if path == PROFILE_PATH {
                    let response = if config.profile_status == 200 {
                        tiny_http::Response::from_string(JANE_DOE_PAGE).with_header(
                            tiny_http::Header::from_bytes(
                                &b"Content-Type"[..],
                                &b"text/html; charset=utf-8"[..],
                            )
                            .expect("build header"),
                        )
                    } else {
                        tiny_http::Response::from_string("boom")
                    };
                    let _ = request.respond(response.with_status_code(config.profile_status));
                    continue;
                }

                if path != CONTENTS_PATH {
                    let _ = request.respond(
                        tiny_http::Response::from_string("not found").with_status_code(404),
                    );
                    continue;
                }

                let authorization = request
                    .headers()
                    .iter()
                    .find(|header| header.field.equiv("Authorization"))
                    .map(|header| header.value.as_str().to_owned());

                let mut state = thread_state.lock().expect("lock stub state");
                state.authorizations.push(authorization);

                match request.method() {
                    tiny_http::Method::Get => {
                        state.gets.push(url.clone());
                        let Some((text, sha)) = state.remote.clone() else {
                            drop(state);
                            let _ = request.respond(
                                tiny_http::Response::from_string(r#"{"message":"Not Found"}"#)
                                    .with_status_code(404),
                            );
                            continue;
                        };
                        drop(state);

                        if config.oversized {
                            let body = serde_json::json!({
                                "sha": sha,
                                "content": "",
                                "encoding": "none",
                            });
                            let _ = request
                                .respond(tiny_http::Response::from_string(body.to_string()));
                            continue;
                        }

                        let encoded = STANDARD.encode(text.as_bytes());
                        // Wrap like the real API does.
                        let wrapped = encoded
                            .as_bytes()
                            .chunks(60)
                            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
                            .collect::<Vec<_>>()
                            .join("\n");
                        let body = serde_json::json!({
                            "sha": sha,
                            "content": wrapped,
                            "encoding": "base64",
                        });
                        let _ = request.respond(tiny_http::Response::from_string(body.to_string()));
                    }
                    tiny_http::Method::Put => {
                        let mut raw = String::new();
                        if request.as_reader().read_to_string(&mut raw).is_err() {
                            drop(state);
                            let _ = request.respond(
                                tiny_http::Response::from_string("invalid body")
                                    .with_status_code(400),
                            );
                            continue;
                        }
                        let body: Value = serde_json::from_str(&raw).unwrap_or(Value::Null);
                        state.puts.push(body.clone());

                        if config.put_status != 200 {
                            drop(state);
                            let _ = request.respond(
                                tiny_http::Response::from_string(
                                    r#"{"message":"sha does not match"}"#,
                                )
                                .with_status_code(config.put_status),
                            );
                            continue;
                        }

                        let current_sha = state.remote.as_ref().map(|(_, sha)| sha.clone());
                        let sent_sha = body.get("sha").and_then(Value::as_str).map(str::to_owned);
                        if current_sha != sent_sha {
                            drop(state);
                            let _ = request.respond(
                                tiny_http::Response::from_string(
                                    r#"{"message":"sha does not match"}"#,
                                )
                                .with_status_code(409),
                            );
                            continue;
                        }

                        let content = body
                            .get("content")
                            .and_then(Value::as_str)
                            .and_then(|content| STANDARD.decode(content).ok())
                            .and_then(|bytes| String::from_utf8(bytes).ok())
                            .unwrap_or_default();
                        state.revision += 1;
                        let sha = format!("sha-{}", state.revision);
                        state.remote = Some((content, sha));
                        drop(state);

                        let _ = request.respond(tiny_http::Response::from_string(r#"{}"#));
                    }
                    _ => {
                        drop(state);
                        let _ = request.respond(
                            tiny_http::Response::from_string("method not allowed")
                                .with_status_code(405),
                        );
                    }
                }
            }
        });

        Self {
            base_url,
            state,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn profile_url(&self) -> String {
        format!("{}{PROFILE_PATH}", self.base_url)
    }

    pub fn remote_text(&self) -> Option<String> {
        let state = self.state.lock().expect("lock stub state");
        state.remote.as_ref().map(|(text, _)| text.clone())
    }

    pub fn get_urls(&self) -> Vec<String> {
        self.state.lock().expect("lock stub state").gets.clone()
    }

    pub fn puts(&self) -> Vec<Value> {
        self.state.lock().expect("lock stub state").puts.clone()
    }

    pub fn authorizations(&self) -> Vec<Option<String>> {
        self.state
            .lock()
            .expect("lock stub state")
            .authorizations
            .clone()
    }
}

impl Drop for Stub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
