//! End-to-end runs against fake `python` and `chroma` executables.
//!
//! The fake server only records its pid and sleeps; an httpmock server on the
//! configured port stands in for the heartbeat endpoint.
#![cfg(unix)]
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

const PYTHON_OK: &str = "echo 1.0.21";
const PYTHON_MISSING: &str =
    "echo \"ModuleNotFoundError: No module named 'chromadb'\" >&2\nexit 1";

struct Fixture {
    temp: TempDir,
}

impl Fixture {
    fn new(python_body: &str) -> Self {
        let temp = TempDir::new().unwrap();
        let fixture = Self { temp };
        fixture.script("python", python_body);
        fixture.script(
            "chroma",
            &format!(
                "echo $$ > '{}'\necho \"$@\" > '{}'\nexec sleep 30",
                fixture.pid_file().display(),
                fixture.args_file().display()
            ),
        );
        fixture
    }

    fn script(&self, name: &str, body: &str) {
        let path = self.temp.path().join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn path(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }

    fn pid_file(&self) -> PathBuf {
        self.path("server.pid")
    }

    fn args_file(&self) -> PathBuf {
        self.path("server.args")
    }

    fn data_dir(&self) -> PathBuf {
        self.path("test_chromadb_data")
    }

    fn command(&self, port: u16) -> Command {
        let mut cmd = Command::new(cargo_bin("chroma-check"));
        cmd.current_dir(self.temp.path())
            .env("NO_COLOR", "1")
            .args([
                "--python",
                path_str(&self.path("python")).as_str(),
                "--server",
                path_str(&self.path("chroma")).as_str(),
                "--port",
                port.to_string().as_str(),
                "--startup-wait",
                "1",
                "--kill-grace-ms",
                "500",
                "--no-launcher",
            ]);
        cmd
    }

    fn server_pid(&self) -> i32 {
        fs::read_to_string(self.pid_file())
            .unwrap()
            .trim()
            .parse()
            .unwrap()
    }
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn is_alive(pid: i32) -> bool {
    // SAFETY: signal 0 only checks for existence.
    unsafe { libc::kill(pid, 0) == 0 }
}

#[test]
fn healthy_install_passes() {
    let fixture = Fixture::new(PYTHON_OK);
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v2/heartbeat");
        then.status(200);
    });

    fixture
        .command(server.port())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "ChromaDB Installation and Functionality Test",
        ))
        .stdout(predicate::str::contains(
            "[OK] ChromaDB module found: version 1.0.21",
        ))
        .stdout(predicate::str::contains(
            "[OK] ChromaDB server is running and responding",
        ))
        .stdout(predicate::str::contains("Stopping test server..."))
        .stdout(predicate::str::contains(
            "[SUCCESS] All tests passed! ChromaDB is working correctly.",
        ));

    let args = fs::read_to_string(fixture.args_file()).unwrap();
    assert_eq!(
        args.trim(),
        format!(
            "run --path test_chromadb_data --host 127.0.0.1 --port {}",
            server.port()
        )
    );
}

#[test]
fn server_and_scratch_dir_are_gone_after_run() {
    let fixture = Fixture::new(PYTHON_OK);
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v2/heartbeat");
        then.status(200);
    });

    fixture.command(server.port()).assert().success();

    thread::sleep(Duration::from_millis(100));
    assert!(!is_alive(fixture.server_pid()));
    assert!(!fixture.data_dir().exists());
}

#[test]
fn existing_data_dir_is_left_in_place() {
    let fixture = Fixture::new(PYTHON_OK);
    let project = fixture.path("my_project");
    fs::create_dir_all(&project).unwrap();
    fs::write(project.join("important.txt"), "keep me").unwrap();

    fixture
        .command(1)
        .args(["--data-dir", "my_project"])
        .assert()
        .code(1);

    assert!(project.join("important.txt").is_file());
}

#[test]
fn v1_heartbeat_fallback_passes() {
    let fixture = Fixture::new(PYTHON_OK);
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v2/heartbeat");
        then.status(404);
    });
    let v1 = server.mock(|when, then| {
        when.method(GET).path("/api/v1/heartbeat");
        then.status(200);
    });

    fixture.command(server.port()).assert().success();
    v1.assert();
}

#[test]
fn server_errors_fail_the_run() {
    let fixture = Fixture::new(PYTHON_OK);
    let server = MockServer::start();
    for path in ["/api/v2/heartbeat", "/api/v1/heartbeat"] {
        server.mock(|when, then| {
            when.method(GET).path(path);
            then.status(500);
        });
    }

    fixture
        .command(server.port())
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "[FAIL] Server responded with status code: 500",
        ))
        .stdout(predicate::str::contains(
            "[FAIL] Some tests failed. Please check the errors above.",
        ));

    thread::sleep(Duration::from_millis(100));
    assert!(!is_alive(fixture.server_pid()));
    assert!(!fixture.data_dir().exists());
}

#[test]
fn missing_module_never_starts_server() {
    let fixture = Fixture::new(PYTHON_MISSING);
    let server = MockServer::start();

    fixture
        .command(server.port())
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "[FAIL] ChromaDB module not found: ModuleNotFoundError: No module named 'chromadb'",
        ))
        .stdout(predicate::str::contains(
            "[WARNING] ChromaDB module not installed. The application will not be able to use semantic search features.",
        ));

    assert!(!fixture.pid_file().exists());
    assert!(!fixture.data_dir().exists());
}

#[test]
fn launcher_failure_is_only_a_warning() {
    let fixture = Fixture::new(PYTHON_OK);
    fixture.script("py", "echo 'No installed Python found!' >&2\nexit 1");
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v2/heartbeat");
        then.status(200);
    });

    Command::new(cargo_bin("chroma-check"))
        .current_dir(fixture.temp.path())
        .env("NO_COLOR", "1")
        .env(
            "CHROMA_CHECK_LAUNCHER",
            format!("{} -3", path_str(&fixture.path("py"))),
        )
        .args([
            "--python",
            path_str(&fixture.path("python")).as_str(),
            "--server",
            path_str(&fixture.path("chroma")).as_str(),
            "--port",
            server.port().to_string().as_str(),
            "--startup-wait",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "launcher failed: No installed Python found!",
        ))
        .stdout(predicate::str::contains(
            "launcher may have issues, but direct python execution works",
        ));
}

#[test]
fn json_output_replaces_report() {
    let fixture = Fixture::new(PYTHON_OK);
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v2/heartbeat");
        then.status(200);
    });

    let assert = fixture
        .command(server.port())
        .arg("--json")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(!stdout.contains("[OK]"));
    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(summary["passed"], true);
    assert_eq!(summary["exit_code"], 0);
    assert_eq!(summary["module"]["version"], "1.0.21");
    assert_eq!(summary["server"]["path"], "/api/v2/heartbeat");
    assert_eq!(summary["launcher"]["status"], "not_applicable");
}

#[test]
fn config_file_supplies_settings() {
    let fixture = Fixture::new(PYTHON_OK);
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v2/heartbeat");
        then.status(200);
    });
    fs::write(
        fixture.path("chroma-check.yml"),
        format!(
            "python: {}\nserver_command: {}\nport: {}\nstartup_wait_secs: 1\nlauncher: []\n",
            path_str(&fixture.path("python")),
            path_str(&fixture.path("chroma")),
            server.port()
        ),
    )
    .unwrap();

    Command::new(cargo_bin("chroma-check"))
        .current_dir(fixture.temp.path())
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("[SUCCESS]"));
}
