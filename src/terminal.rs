//! Terminal input.

use std::io::{self, IsTerminal};

use console::Term;

/// Capability to inspect stdin and read secrets from it.
pub trait Reader: Send + Sync {
    /// Whether stdin is an interactive terminal.
    fn is_terminal(&self) -> bool;

    /// Read one line without echoing it.
    fn read_secret(&self) -> io::Result<String>;
}

/// Reads from the process stdin.
///
/// Secret input switches the terminal to raw mode for the duration of the
/// read and restores it afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinReader;

impl Reader for StdinReader {
    fn is_terminal(&self) -> bool {
        io::stdin().is_terminal()
    }

    fn read_secret(&self) -> io::Result<String> {
        if !self.is_terminal() {
            let mut line = String::new();
            io::stdin().read_line(&mut line)?;
            return Ok(line.trim_end_matches(['\r', '\n']).to_string());
        }
        Term::stderr().read_secure_line()
    }
}
