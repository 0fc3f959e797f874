//! Shared test infrastructure for integration tests.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;

/// Environment the binary would otherwise pick up from a CI runner.
const AMBIENT_ENV: &[&str] = &[
    "INPUT_WORKFLOW",
    "INPUT_BRANCH",
    "INPUT_VERIFY",
    "INPUT_TOKEN",
    "GITHUB_REPOSITORY",
    "GITHUB_SHA",
    "GITHUB_API_URL",
    "GITHUB_WORKSPACE",
    "GITHUB_OUTPUT",
    "RUST_LOG",
];

/// A canned response for requests whose path (without query) matches.
pub struct Route {
    pub path: String,
    pub status: u16,
    pub body: String,
}

impl Route {
    pub fn json(path: &str, body: serde_json::Value) -> Self {
        Self {
            path: path.to_string(),
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn status(path: &str, status: u16) -> Self {
        Self {
            path: path.to_string(),
            status,
            body: r#"{"message":"Bad credentials"}"#.to_string(),
        }
    }
}

/// Minimal HTTP/1.1 responder standing in for the GitHub REST API.
///
/// Serves one request per connection and answers `Connection: close`, which
/// is all a blocking client needs. Unknown paths get a 404.
pub struct CannedApi {
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CannedApi {
    pub fn serve(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind canned api");
        let url = format!("http://{}", listener.local_addr().expect("local addr"));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                respond(stream, &routes, &seen);
            }
        });
        Self { url, requests }
    }

    /// Request targets received so far, including query strings.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }
}

fn respond(mut stream: TcpStream, routes: &[Route], seen: &Mutex<Vec<String>>) {
    let Ok(clone) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(clone);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    loop {
        let mut header = String::new();
        match reader.read_line(&mut header) {
            Ok(0) => break,
            Ok(_) if header == "\r\n" || header == "\n" => break,
            Ok(_) => continue,
            Err(_) => return,
        }
    }

    let target = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string();
    seen.lock().expect("requests lock").push(target.clone());
    let path = target.split('?').next().unwrap_or_default();

    let (status, body) = routes
        .iter()
        .find(|route| route.path == path)
        .map(|route| (route.status, route.body.clone()))
        .unwrap_or((404, r#"{"message":"Not Found"}"#.to_string()));
    let reason = match status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        _ => "Error",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).ok();
    stream.flush().ok();
}

pub fn workflows(entries: &[(u64, &str)]) -> serde_json::Value {
    let workflows: Vec<serde_json::Value> = entries
        .iter()
        .map(|(id, name)| {
            serde_json::json!({
                "id": id,
                "name": name,
                "path": format!(".github/workflows/{id}.yml"),
                "state": "active"
            })
        })
        .collect();
    serde_json::json!({ "total_count": workflows.len(), "workflows": workflows })
}

/// Runs as (sha, branch, conclusion, created_at); ids and urls follow order.
pub fn runs(entries: &[(&str, &str, &str, &str)]) -> serde_json::Value {
    let runs: Vec<serde_json::Value> = entries
        .iter()
        .enumerate()
        .map(|(index, (sha, branch, conclusion, created_at))| {
            serde_json::json!({
                "id": index + 1,
                "head_sha": sha,
                "head_branch": branch,
                "status": "completed",
                "conclusion": conclusion,
                "created_at": created_at,
                "html_url": format!("https://github.com/octo/app/actions/runs/{}", index + 1)
            })
        })
        .collect();
    serde_json::json!({ "total_count": runs.len(), "workflow_runs": runs })
}

/// Scratch space holding the `GITHUB_OUTPUT` file for one invocation.
pub struct Invocation {
    _dir: TempDir,
    pub output_file: PathBuf,
}

impl Invocation {
    pub fn in_tempdir() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let output_file = dir.path().join("github_output");
        Self {
            _dir: dir,
            output_file,
        }
    }

    /// Run the binary with explicit flags only; runner env is scrubbed.
    pub fn run(&self, api: &CannedApi, args: &[&str]) -> Output {
        let mut command = Command::new(env!("CARGO_BIN_EXE_last-green"));
        for name in AMBIENT_ENV {
            command.env_remove(name);
        }
        command
            .arg("--api-url")
            .arg(&api.url)
            .arg("--output-file")
            .arg(&self.output_file)
            .arg("--timeout-secs")
            .arg("10")
            .args(args)
            .output()
            .expect("run last-green")
    }

    /// Contents of the output file, empty when nothing was written.
    pub fn outputs(&self) -> String {
        std::fs::read_to_string(&self.output_file).unwrap_or_default()
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Create a repository with one empty commit and return its id.
pub fn init_repo_with_commit(dir: &Path) -> Option<String> {
    let git = |args: &[&str]| {
        Command::new("git")
            .args(args)
            .current_dir(dir)
            .env("GIT_AUTHOR_NAME", "test")
            .env("GIT_AUTHOR_EMAIL", "test@example.com")
            .env("GIT_COMMITTER_NAME", "test")
            .env("GIT_COMMITTER_EMAIL", "test@example.com")
            .output()
            .ok()
            .filter(|output| output.status.success())
    };
    git(&["init", "-q"])?;
    git(&["-c", "commit.gpgsign=false", "commit", "-q", "--allow-empty", "-m", "baseline"])?;
    let head = git(&["rev-parse", "HEAD"])?;
    Some(String::from_utf8_lossy(&head.stdout).trim().to_string())
}
