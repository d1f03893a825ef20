//! Program output sinks.
//!
//! `print` is the language's only output channel. Routing it through a
//! trait lets the driver write to the real stdout while library callers
//! and tests capture the lines instead of scraping the process's output.

use std::cell::RefCell;
use std::rc::Rc;

/// Destination for `print` output.
pub trait PrintSink {
    /// Write one line of program output.
    fn writeln(&mut self, text: &str);
}

/// Writes to the process stdout.
pub struct StdPrint;

impl PrintSink for StdPrint {
    fn writeln(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// Accumulates output lines in memory.
///
/// Cloning shares the buffer, so a test can hand one clone to the
/// interpreter and keep another to read the lines back.
#[derive(Clone, Default)]
pub struct CollectPrint {
    lines: Rc<RefCell<Vec<String>>>,
}

impl CollectPrint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything printed so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Drains the captured lines.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.borrow_mut())
    }
}

impl PrintSink for CollectPrint {
    fn writeln(&mut self, text: &str) {
        self.lines.borrow_mut().push(text.to_string());
    }
}
