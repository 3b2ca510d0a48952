//! In-memory connector and session for orchestrator tests.

use hostaudit_domain::model::{CommandResult, RuleDefinition};
use hostaudit_session::{
    CommandSession, ConnectError, Connector, DEFAULT_SSH_PORT, HostTarget, RenderedCommand,
    TransportError,
};
use hostaudit_types::RuleKind;
use std::collections::{BTreeMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn rule(id: &str, kind: RuleKind, command: &str, expected: &str) -> RuleDefinition {
    RuleDefinition {
        id: id.to_string(),
        name: format!("rule {id}"),
        kind,
        command: command.to_string(),
        expected: expected.to_string(),
    }
}

pub fn target(label: &str) -> HostTarget {
    HostTarget::parse(label, DEFAULT_SSH_PORT).expect("valid target")
}

#[derive(Clone, Debug)]
pub enum Reply {
    Output {
        stdout: String,
        stderr: String,
        exit_status: Option<i32>,
    },
    Broken,
    Timeout,
}

impl Reply {
    pub fn out(stdout: &str) -> Self {
        Reply::Output {
            stdout: stdout.to_string(),
            stderr: String::new(),
            exit_status: Some(0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HostScript {
    refuse: bool,
    replies: Vec<Reply>,
    delay: Duration,
}

impl HostScript {
    pub fn refuse() -> Self {
        Self {
            refuse: true,
            replies: Vec::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn replies(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            refuse: false,
            replies: replies.into_iter().collect(),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// What a fake session observed, per host label.
#[derive(Debug, Default)]
struct Journal {
    commands: Vec<String>,
    stdin: Vec<String>,
    timeouts: Vec<Option<Duration>>,
    closes: usize,
}

type Journals = Arc<Mutex<BTreeMap<String, Journal>>>;

#[derive(Default)]
pub struct FakeConnector {
    scripts: BTreeMap<String, HostScript>,
    journals: Journals,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, label: &str, script: HostScript) -> Self {
        self.scripts.insert(label.to_string(), script);
        self
    }

    fn with_journal<T>(&self, label: &str, f: impl FnOnce(&Journal) -> T) -> T {
        let journals = self.journals.lock().expect("journal lock");
        match journals.get(label) {
            Some(journal) => f(journal),
            None => f(&Journal::default()),
        }
    }

    pub fn commands(&self, label: &str) -> Vec<String> {
        self.with_journal(label, |j| j.commands.clone())
    }

    pub fn stdin(&self, label: &str) -> Vec<String> {
        self.with_journal(label, |j| j.stdin.clone())
    }

    pub fn timeouts(&self, label: &str) -> Vec<Option<Duration>> {
        self.with_journal(label, |j| j.timeouts.clone())
    }

    pub fn closes(&self, label: &str) -> usize {
        self.with_journal(label, |j| j.closes)
    }
}

impl Connector for FakeConnector {
    type Session = FakeSession;

    fn open(&self, target: &HostTarget) -> Result<FakeSession, ConnectError> {
        let script = self
            .scripts
            .get(&target.label)
            .cloned()
            .unwrap_or_else(HostScript::refuse);
        std::thread::sleep(script.delay);

        if script.refuse {
            return Err(ConnectError::Io {
                target: target.label.clone(),
                source: io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"),
            });
        }

        self.journals
            .lock()
            .expect("journal lock")
            .entry(target.label.clone())
            .or_default();
        Ok(FakeSession {
            label: target.label.clone(),
            replies: script.replies.into(),
            journals: Arc::clone(&self.journals),
        })
    }
}

pub struct FakeSession {
    label: String,
    replies: VecDeque<Reply>,
    journals: Journals,
}

impl FakeSession {
    fn record(&self, f: impl FnOnce(&mut Journal)) {
        let mut journals = self.journals.lock().expect("journal lock");
        f(journals.entry(self.label.clone()).or_default());
    }
}

impl CommandSession for FakeSession {
    fn run(&mut self, command: &RenderedCommand) -> Result<CommandResult, TransportError> {
        self.record(|j| {
            j.commands.push(command.command.clone());
            if let Some(stdin) = &command.stdin {
                j.stdin.push(stdin.expose().to_string());
            }
        });
        match self.replies.pop_front() {
            Some(Reply::Output {
                stdout,
                stderr,
                exit_status,
            }) => Ok(CommandResult::new(&stdout, &stderr, exit_status)),
            Some(Reply::Broken) => Err(TransportError::Channel("channel closed".to_string())),
            Some(Reply::Timeout) => Err(TransportError::Timeout),
            None => Ok(CommandResult::default()),
        }
    }

    fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.record(|j| j.timeouts.push(timeout));
    }

    fn close(&mut self) {
        self.record(|j| j.closes += 1);
    }
}
