// User-facing output.
// URLs go to stdout one per line, errors go to stderr as
// `{program}: error: {message}`. Both are written as soon as a file is
// done so they interleave in input order.

use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;

const DEFAULT_PROGRAM: &str = "up";

/// Name used to prefix error lines: the file name of `argv[0]`.
pub fn program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .and_then(|arg| Path::new(arg).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_PROGRAM.to_string())
}

pub struct Console<O, E> {
    program: String,
    out: O,
    err: E,
}

impl Console<io::Stdout, io::Stderr> {
    /// Console bound to the process streams.
    pub fn stdio() -> Self {
        Self::new(program_name(), io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> Console<O, E> {
    pub fn new(program: impl Into<String>, out: O, err: E) -> Self {
        Self {
            program: program.into(),
            out,
            err,
        }
    }

    pub fn url(&mut self, url: &str) -> io::Result<()> {
        writeln!(self.out, "{url}")?;
        self.out.flush()
    }

    pub fn error(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.err, "{}: error: {message}", self.program)?;
        self.err.flush()
    }

    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}
