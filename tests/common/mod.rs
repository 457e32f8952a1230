// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed manifest builder plus recording
// executor and scripted prompter doubles, so each integration test can run
// the engine end to end without repeating setup boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use gene_system::commands::apply::{Context, RunOptions};
use gene_system::error::PromptError;
use gene_system::exec::{CommandRunner, Executor, SystemExecutor};
use gene_system::logging::{Log, Logger};
use gene_system::platform::{Os, Platform};
use gene_system::prompt::Prompter;
use gene_system::template::Policy;
use semver::Version;
use serde_json::{Value, json};

/// Engine version used by tests unless they need a specific one.
pub fn engine() -> Version {
    Version::new(1, 0, 0)
}

/// A Debian host; every test host is POSIX.
pub fn host() -> Platform {
    Platform::new(Os::Linux, true)
}

/// Logger that records step results but writes no log file.
pub fn quiet_logger() -> Logger {
    Logger::with_log_file(None)
}

/// The manifest used throughout the documentation: one `hello` step.
pub fn dev_manifest() -> Value {
    json!({
        "name": "dev",
        "version": "0.1.0",
        "metadata": {"gene_system": {"version": "0.0.1"}},
        "steps": [{
            "name": "hello",
            "exe": {"install": {"cmd": ["echo hi"]}, "remove": {"cmd": ["echo bye"]}}
        }]
    })
}

/// A manifest file inside a [`tempfile::TempDir`].
///
/// The directory is deleted when dropped.
pub struct ManifestFixture {
    /// Temporary directory holding the manifest and any marker files.
    pub dir: tempfile::TempDir,
    /// Path of the written manifest.
    pub path: PathBuf,
}

impl ManifestFixture {
    /// Run options pointing at this manifest.
    pub fn options(&self) -> RunOptions {
        RunOptions {
            manifest_path: self.path.clone(),
            ..RunOptions::default()
        }
    }
}

/// Fluent builder for [`ManifestFixture`].
pub struct ManifestBuilder {
    doc: Value,
}

impl ManifestBuilder {
    /// Begin from an empty `dev v0.1.0` manifest compatible with [`engine`].
    pub fn new() -> Self {
        Self {
            doc: json!({
                "name": "dev",
                "version": "0.1.0",
                "metadata": {"gene_system": {"version": "0.0.1"}},
                "steps": []
            }),
        }
    }

    /// Begin from an arbitrary document.
    pub fn from_document(doc: Value) -> Self {
        Self { doc }
    }

    /// Set a top-level field.
    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        self.doc[key] = value;
        self
    }

    /// Append a step.
    pub fn with_step(mut self, step: Value) -> Self {
        if let Some(steps) = self.doc["steps"].as_array_mut() {
            steps.push(step);
        }
        self
    }

    /// Write the manifest to `manifest.json` in a fresh temporary directory.
    pub fn build(self) -> ManifestFixture {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("manifest.json");
        std::fs::write(&path, self.doc.to_string()).expect("write manifest");
        ManifestFixture { dir, path }
    }
}

/// [`Executor`] that records every command and returns scripted exit codes.
///
/// Commands without a scripted code exit zero. With [`Self::passthrough`]
/// unscripted commands are run through the real shell instead.
#[derive(Default)]
pub struct RecordingExecutor {
    codes: HashMap<String, i32>,
    passthrough: Option<SystemExecutor>,
    calls: RefCell<Vec<String>>,
}

impl RecordingExecutor {
    /// Executor where every command succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executor that runs unscripted commands on the host shell.
    pub fn passthrough() -> Self {
        Self {
            passthrough: Some(SystemExecutor::locate().expect("locate sh")),
            ..Self::default()
        }
    }

    /// Make `command` exit with `code`.
    pub fn with_code(mut self, command: &str, code: i32) -> Self {
        self.codes.insert(command.to_string(), code);
        self
    }

    /// Commands run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Executor for RecordingExecutor {
    fn run_shell(&self, command: &str) -> std::io::Result<i32> {
        self.calls.borrow_mut().push(command.to_string());
        if let Some(code) = self.codes.get(command) {
            return Ok(*code);
        }
        match &self.passthrough {
            Some(shell) => shell.run_shell(command),
            None => Ok(0),
        }
    }
}

/// [`Prompter`] answering from a fixed list, in order.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: RefCell<Vec<String>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    /// Prompter that gives `answers` in order and fails once they run out.
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().rev().map(|a| (*a).to_string()).collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    /// Prompt texts asked so far, in order.
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&self, text: &str, _default: Option<&str>) -> Result<String, PromptError> {
        self.asked.borrow_mut().push(text.to_string());
        self.answers.borrow_mut().pop().ok_or_else(|| PromptError::Failed {
            prompt: text.to_string(),
            message: "no scripted answer left".to_string(),
        })
    }
}

/// Build an orchestration context from test doubles.
pub fn context<'a>(
    executor: &'a dyn Executor,
    prompter: &'a dyn Prompter,
    log: &'a dyn Log,
    engine: Version,
) -> Context<'a> {
    let host = host();
    Context {
        runner: CommandRunner::new(&host, executor, Policy::Strict, log).expect("posix host"),
        prompter,
        log,
        engine,
        host,
    }
}
