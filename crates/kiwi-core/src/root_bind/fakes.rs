//! In-memory collaborators for bind manager tests.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use kiwi_common::error::{KiwiError, Result};

use crate::command::{CommandOutput, CommandRunner};
use crate::host::HostFs;
use crate::sink::WarningSink;

type FailWhen = Rc<dyn Fn(&[String]) -> bool>;

/// Records every argv and fails the ones matching a predicate.
#[derive(Clone)]
pub(crate) struct RecordingRunner {
    calls: Rc<RefCell<Vec<Vec<String>>>>,
    fail_when: FailWhen,
}

impl RecordingRunner {
    pub(crate) fn new() -> Self {
        Self::failing_when(|_| false)
    }

    pub(crate) fn failing_when(predicate: impl Fn(&[String]) -> bool + 'static) -> Self {
        Self {
            calls: Rc::default(),
            fail_when: Rc::new(predicate),
        }
    }

    pub(crate) fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, argv: &[String]) -> Result<CommandOutput> {
        self.calls.borrow_mut().push(argv.to_vec());
        if (self.fail_when)(argv) {
            return Err(KiwiError::Command {
                command: argv.join(" "),
                code: 1,
                stderr: format!("{} failed", argv[0]),
            });
        }
        Ok(CommandOutput::default())
    }
}

/// Answers every existence query the same way.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FakeHostFs {
    exists: bool,
}

impl FakeHostFs {
    pub(crate) const fn all_present() -> Self {
        Self { exists: true }
    }

    pub(crate) const fn nothing_present() -> Self {
        Self { exists: false }
    }
}

impl HostFs for FakeHostFs {
    fn exists(&self, _path: &Path) -> bool {
        self.exists
    }
}

/// Keeps every warning for later inspection.
#[derive(Debug, Clone, Default)]
pub(crate) struct CollectingSink {
    messages: Rc<RefCell<Vec<String>>>,
}

impl CollectingSink {
    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl WarningSink for CollectingSink {
    fn warning(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_owned());
    }
}
