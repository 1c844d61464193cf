//! End-to-end runs of the `docsnaps` binary against a local HTTP server.

use std::path::Path;
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};
use std::thread;

use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::TempDir;
use tiny_http::{Response, Server};

/// Serves `/terms` with a body that tests can swap; every other path is 404.
struct Site {
    base: String,
    terms: Arc<Mutex<String>>,
}

impl Site {
    fn start(body: &str) -> Self {
        let server = Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let terms = Arc::new(Mutex::new(body.to_string()));
        let shared = Arc::clone(&terms);
        thread::spawn(move || {
            for request in server.incoming_requests() {
                let response = if request.url() == "/terms" {
                    Response::from_string(shared.lock().unwrap().clone())
                } else {
                    Response::from_string("not here").with_status_code(404)
                };
                let _ = request.respond(response);
            }
        });
        Self {
            base: format!("http://127.0.0.1:{port}"),
            terms,
        }
    }

    fn serve(&self, body: &str) {
        *self.terms.lock().unwrap() = body.to_string();
    }
}

fn docsnaps(project: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_docsnaps"))
        .args(["--project", project.to_str().unwrap(), "--format", "json"])
        .args(args)
        .env("XDG_CONFIG_HOME", project.join("xdg"))
        .env("DOCSNAPS_FETCH__MAX_ATTEMPTS", "1")
        .env_remove("DOCSNAPS_DATABASE__PATH")
        .env_remove("DOCSNAPS_LOG")
        .output()
        .unwrap()
}

fn json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn write_manifest(dir: &Path, site: &Site, company_website: &str) -> String {
    let path = dir.join("acme.toml");
    std::fs::write(
        &path,
        format!(
            r#"
name = "acme.legal"

[[transforms]]
kind = "select"
selector = "article"

[[transforms]]
kind = "strip_tags"

[[jobs]]
company = "Acme"
company_website = "{company_website}"
service = "Acme Cloud"
document = "Terms of Use"
language_code = "en"
language_name = "English"
url = "{base}/terms"

[[jobs]]
company = "Acme"
service = "Acme Cloud"
document = "Terms of Use"
language_code = "fr"
language_name = "French"
url = "{base}/fr/terms"
"#,
            base = site.base
        ),
    )
    .unwrap();
    path.to_string_lossy().into_owned()
}

fn outcomes(report: &Value) -> Vec<String> {
    report["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["outcome"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn commands_outside_a_project_fail() {
    let temp = TempDir::new().unwrap();
    let output = docsnaps(temp.path(), &["list"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("docsnaps init"), "{stderr}");
}

#[test]
fn install_run_update_uninstall() {
    let temp = TempDir::new().unwrap();
    let project = temp.path();
    let site = Site::start("<nav>Menu</nav><article><p>Terms v1</p></article>");

    let init = json(&docsnaps(project, &["init"]));
    assert_eq!(init["created"], true);
    assert!(project.join(".docsnaps/docsnaps.db").exists());

    let manifest = write_manifest(project, &site, "https://acme.test");
    let install = json(&docsnaps(project, &["install", &manifest]));
    assert_eq!(install["module"], "acme.legal");
    assert_eq!(install["jobs_created"], 2);

    // The French page is missing: one failure, the run itself succeeds.
    let first = json(&docsnaps(project, &["run"]));
    assert_eq!(outcomes(&first), vec!["first_snapshot", "failed"]);
    assert_eq!(first["results"][1]["status"], 404);

    let failing = docsnaps(project, &["run", "--fail-on-error"]);
    assert_eq!(failing.status.code(), Some(2));

    site.serve("<nav>New menu</nav><article><p>Terms v1</p></article>");
    let unchanged = json(&docsnaps(project, &["run", "--job", "1"]));
    assert_eq!(outcomes(&unchanged), vec!["unchanged"]);

    site.serve("<article><p>Terms v2</p></article>");
    let dry = json(&docsnaps(project, &["run", "--job", "1", "--dry-run"]));
    assert_eq!(outcomes(&dry), vec!["would_save"]);
    let changed = json(&docsnaps(project, &["run", "--job", "1"]));
    assert_eq!(outcomes(&changed), vec!["changed"]);

    let history = json(&docsnaps(project, &["history", "1"]));
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    let newest = history[0]["snapshot_id"].as_i64().unwrap().to_string();
    let snapshot = json(&docsnaps(project, &["show", &newest]));
    assert_eq!(snapshot["text"], "Terms v2");

    let disabled = json(&docsnaps(project, &["disable", "2"]));
    assert_eq!(disabled["is_enabled"], false);
    let listed = json(&docsnaps(project, &["list", "--enabled"]));
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let manifest = write_manifest(project, &site, "https://acme.example");
    let update = json(&docsnaps(project, &["update", &manifest]));
    assert_eq!(update["jobs_created"], 0);
    let changes = update["changes"].as_array().unwrap();
    assert_eq!(changes.len(), 2, "{changes:?}");
    assert!(changes[1].as_str().unwrap().starts_with("job #2 is listed but stays disabled"));

    let uninstall = json(&docsnaps(project, &["uninstall", "acme.legal"]));
    assert_eq!(uninstall["jobs_removed"], 1);
    assert_eq!(uninstall["jobs_disabled"], serde_json::json!([1]));

    let again = docsnaps(project, &["uninstall", "acme.legal"]);
    assert!(!again.status.success());
}

#[test]
fn empty_project_reports_no_active_jobs_in_table_mode() {
    let temp = TempDir::new().unwrap();
    json(&docsnaps(temp.path(), &["init"]));

    let output = Command::new(env!("CARGO_BIN_EXE_docsnaps"))
        .args(["--project", temp.path().to_str().unwrap(), "run"])
        .env("XDG_CONFIG_HOME", temp.path().join("xdg"))
        .env_remove("DOCSNAPS_DATABASE__PATH")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "No active jobs found."
    );
}
