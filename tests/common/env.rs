//! Test environment builder for isolated Swarmform testing.
//!
//! `TestEnv` owns a temporary working directory plus a directory of fake
//! `ssh` and `scp` scripts placed first on `PATH`. The fakes append every
//! invocation to a log file and keep a copy of every file sent with scp,
//! so tests can assert on remote traffic without a cluster.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Result of running a Swarmform CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

const FAKE_SSH: &str = r#"#!/bin/sh
printf 'ssh %s\n' "$*" >> "$SWARMFORM_TEST_LOG"
for last; do :; done
if [ -n "$SWARMFORM_TEST_UNREACHABLE" ]; then
  case "$*" in
    *"$SWARMFORM_TEST_UNREACHABLE"*)
      echo "ssh: connect to host: Connection refused" >&2
      exit 255
      ;;
  esac
fi
case "$last" in
  *"docker node ls"*) echo x1y2z3 ;;
  *"docker service logs"*)
    echo "agent: Synced node info"
    echo "acme: Server responded with a certificate"
    ;;
esac
exit 0
"#;

const FAKE_SCP: &str = r#"#!/bin/sh
printf 'scp %s\n' "$*" >> "$SWARMFORM_TEST_LOG"
src=""
for last; do src="$prev"; prev="$last"; done
name=$(basename "${last#*:}")
cp "$src" "$SWARMFORM_TEST_STAGED/$name"
exit 0
"#;

/// Isolated working directory with recording ssh/scp fakes
pub struct TestEnv {
    pub workdir: TempDir,
    bin_dir: TempDir,
    staged_dir: TempDir,
    log_path: PathBuf,
    swarmform_bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let workdir = tempfile::tempdir().unwrap();
        let bin_dir = tempfile::tempdir().unwrap();
        let staged_dir = tempfile::tempdir().unwrap();
        let log_path = bin_dir.path().join("remote.log");
        fs::write(&log_path, "").unwrap();

        write_script(&bin_dir.path().join("ssh"), FAKE_SSH);
        write_script(&bin_dir.path().join("scp"), FAKE_SCP);

        Self {
            workdir,
            bin_dir,
            staged_dir,
            log_path,
            swarmform_bin: PathBuf::from(env!("CARGO_BIN_EXE_swarmform")),
        }
    }

    /// Environment with `nodes.yml` and `swarmform.yml` in place
    pub fn with_cluster(nodes: &str, descriptor: &str) -> Self {
        let env = Self::new();
        env.write("nodes.yml", nodes);
        env.write("swarmform.yml", descriptor);
        env
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.workdir.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }

    /// Every ssh/scp invocation so far, one per line
    pub fn remote_log(&self) -> Vec<String> {
        fs::read_to_string(&self.log_path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn ssh_calls(&self) -> Vec<String> {
        self.remote_log()
            .into_iter()
            .filter(|l| l.starts_with("ssh "))
            .collect()
    }

    pub fn scp_calls(&self) -> Vec<String> {
        self.remote_log()
            .into_iter()
            .filter(|l| l.starts_with("scp "))
            .collect()
    }

    /// Content scp delivered under `file_name`
    pub fn staged(&self, file_name: &str) -> String {
        fs::read_to_string(self.staged_dir.path().join(file_name)).unwrap()
    }

    /// Run swarmform in the working directory against the shipped sources
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let sources = Path::new(env!("CARGO_MANIFEST_DIR")).join("sources");
        let path = match std::env::var_os("PATH") {
            Some(existing) => {
                let mut paths = vec![self.bin_dir.path().to_path_buf()];
                paths.extend(std::env::split_paths(&existing));
                std::env::join_paths(paths).unwrap()
            }
            None => self.bin_dir.path().as_os_str().to_owned(),
        };

        let mut cmd = Command::new(&self.swarmform_bin);
        cmd.current_dir(self.workdir.path())
            .args(args)
            .arg("--sources")
            .arg(&sources)
            .env("PATH", path)
            .env("SWARMFORM_TEST_LOG", &self.log_path)
            .env("SWARMFORM_TEST_STAGED", self.staged_dir.path())
            .env_remove("RUST_LOG");
        for secret in [
            "SWARMFORM_GRAFANA_PASSWORD",
            "SWARMFORM_WEBHOOK_URL",
            "SWARMFORM_KIBANA_USER",
            "SWARMFORM_KIBANA_PASSWORD",
            "SWARMFORM_ACME_ENABLED",
            "SWARMFORM_SOURCES_DIR",
            "SWARMFORM_ENCRYPT_NETWORKS",
            "SWARMFORM_PROBE_INTERVAL_SECS",
            "SWARMFORM_SSH_USER",
        ] {
            cmd.env_remove(secret);
        }
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        output_to_result(cmd.output().expect("Failed to execute swarmform"))
    }
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

#[cfg(unix)]
fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    fs::write(path, body).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(not(unix))]
fn write_script(path: &Path, body: &str) {
    fs::write(path, body).unwrap();
}
