use crate::config::VerifierConfig;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// Verifier stdout for an accepted plan, after non-printable characters
/// are dropped. Tied to the pandaPIparser release the harness targets.
pub const PANDA_VERIFY_SUCCESS_OUTPUT: &str = "IDs of subtasks used in the plan exist: trueTasks declared in plan actually exist and can be instantiated as given: trueMethods don't contain duplicate subtasks: trueMethods don't contain orphaned tasks: trueMethods can be instantiated: trueOrder induced by methods is present in plan: truePlan is executable: truePlan verification result: true";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verification {
    #[serde(rename = "True")]
    Verified,
    #[serde(rename = "False")]
    Rejected,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl Verification {
    pub fn as_str(self) -> &'static str {
        match self {
            Verification::Verified => "True",
            Verification::Rejected => "False",
            Verification::NotApplicable => "N/A",
        }
    }
}

pub fn host_supports_verification() -> bool {
    !cfg!(windows)
}

pub fn strip_non_printable(raw: &[u8]) -> String {
    raw.iter()
        .filter(|b| **b > 31 && **b < 126)
        .map(|b| *b as char)
        .collect()
}

#[derive(Debug, Clone)]
pub struct Verifier {
    program: PathBuf,
    timeout: Duration,
    success_marker: String,
}

impl Verifier {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration, success_marker: &str) -> Self {
        Self {
            program: program.into(),
            timeout,
            success_marker: success_marker.to_string(),
        }
    }

    pub fn from_config(config: &VerifierConfig) -> Self {
        Self::new(
            config.program.clone(),
            Duration::from_secs(config.timeout_secs),
            &config.success_marker,
        )
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn verify(&self, domain_file: &Path, problem_file: &Path, plan_file: &Path) -> Verification {
        match self.run(domain_file, problem_file, plan_file) {
            Ok(true) => Verification::Verified,
            Ok(false) => {
                debug!(plan = %plan_file.display(), "verifier output lacks success marker");
                Verification::Rejected
            }
            Err(err) => {
                warn!(plan = %plan_file.display(), error = %format!("{:#}", err), "plan verification failed");
                Verification::Rejected
            }
        }
    }

    fn run(&self, domain_file: &Path, problem_file: &Path, plan_file: &Path) -> Result<bool> {
        let mut child = Command::new(&self.program)
            .arg("-C")
            .arg("--verify")
            .arg(domain_file)
            .arg(problem_file)
            .arg(plan_file)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("spawn verifier {}", self.program.display()))?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("verifier stdout not captured"))?;
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = tx.send(stdout.read_to_end(&mut buf).map(|_| buf));
        });

        let deadline = Instant::now() + self.timeout;
        let status = match child.wait_timeout(self.timeout)? {
            Some(status) => status,
            None => {
                child.kill().ok();
                let _ = child.wait();
                return Err(anyhow!(
                    "verifier timed out after {}s",
                    self.timeout.as_secs_f64()
                ));
            }
        };
        // A forked descendant can keep the pipe open after the verifier exits.
        let raw = match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok(read) => read.context("read verifier output")?,
            Err(RecvTimeoutError::Timeout) => {
                return Err(anyhow!(
                    "verifier output still open after {}s",
                    self.timeout.as_secs_f64()
                ))
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(anyhow!("verifier output reader panicked"))
            }
        };
        debug!(code = ?status.code(), bytes = raw.len(), "verifier exited");

        Ok(strip_non_printable(&raw).contains(&self.success_marker))
    }
}
