#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rox::lox::{Lox, RunStatus};

/// An in‑memory sink that can be handed to the interpreter and read back.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A session wired to capture buffers.
pub struct Session {
    pub lox: Lox,
    pub out: SharedBuffer,
    pub err: SharedBuffer,
}

impl Session {
    pub fn new() -> Self {
        let out = SharedBuffer::default();
        let err = SharedBuffer::default();
        let lox = Lox::with_sinks(Box::new(out.clone()), Box::new(err.clone()));

        Self { lox, out, err }
    }

    pub fn run(&mut self, source: &str) -> RunStatus {
        self.lox.run(source)
    }
}

pub struct Outcome {
    pub status: RunStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Runs `source` in a fresh session.
pub fn run(source: &str) -> Outcome {
    let mut session = Session::new();
    let status = session.run(source);

    Outcome {
        status,
        stdout: session.out.contents(),
        stderr: session.err.contents(),
    }
}

/// Runs `source`, asserting it succeeds, and returns what it printed.
pub fn output_of(source: &str) -> String {
    let outcome = run(source);

    assert_eq!(
        outcome.status,
        RunStatus::Success,
        "program failed:\n{}",
        outcome.stderr
    );

    outcome.stdout
}
