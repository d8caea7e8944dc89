//! Output sink that renders markup before writing.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::EngineConfig;

use super::strip::strip_color;
use super::tags::TagTable;

type Sink = Mutex<Box<dyn Write + Send>>;

/// Renders tagged text and writes it to stdout/stderr sinks.
///
/// When color is disabled every escape sequence is removed after tag
/// substitution, so renderers that always emit escapes still produce plain
/// text.
pub struct Writer {
    color: bool,
    debug: bool,
    tags: TagTable,
    stdout: Sink,
    stderr: Sink,
    terminal: bool,
}

impl Writer {
    /// A writer over arbitrary sinks.
    pub fn new(
        stdout: Box<dyn Write + Send>,
        stderr: Box<dyn Write + Send>,
        tags: TagTable,
        color: bool,
    ) -> Self {
        Self {
            color,
            debug: false,
            tags,
            stdout: Mutex::new(stdout),
            stderr: Mutex::new(stderr),
            terminal: false,
        }
    }

    /// A writer over the process stdout/stderr using the standard tags.
    pub fn stdio(config: &EngineConfig) -> Self {
        let mut writer = Self::new(
            Box::new(io::stdout()),
            Box::new(io::stderr()),
            TagTable::standard(),
            config.color,
        );
        writer.debug = config.debug;
        writer.terminal = console::Term::stdout().is_term();
        writer
    }

    /// A writer whose output is captured in memory, with color off.
    ///
    /// Returns the writer plus handles to what it wrote to stdout and stderr.
    pub fn capture(tags: TagTable) -> (Self, Capture, Capture) {
        let out = Capture::default();
        let err = Capture::default();
        let writer = Self::new(Box::new(out.clone()), Box::new(err.clone()), tags, false);
        (writer, out, err)
    }

    /// Enable printing of error source chains.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn color(&self) -> bool {
        self.color
    }

    pub fn tags(&self) -> &TagTable {
        &self.tags
    }

    /// Whether stdout is an interactive terminal.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Render markup to its final display form.
    pub fn render(&self, s: &str) -> String {
        let rendered = self.tags.render(s);
        self.finish(rendered)
    }

    fn finish(&self, s: String) -> String {
        if self.color {
            s
        } else {
            strip_color(&s)
        }
    }

    /// Render `s` and write it to stdout. Returns the rendered byte count.
    pub fn write(&self, s: &str) -> io::Result<usize> {
        let rendered = self.render(s);
        write_to(&self.stdout, rendered.as_bytes())?;
        Ok(rendered.len())
    }

    /// Write bytes to stdout with no markup processing.
    pub fn write_plain(&self, data: &[u8]) -> io::Result<()> {
        write_to(&self.stdout, data)
    }

    /// An `io::Write` over stdout that bypasses markup processing.
    pub fn plain(&self) -> PlainOut<'_> {
        PlainOut { writer: self }
    }

    /// Write an `ERROR:` line for `err` to stderr.
    ///
    /// The message is treated as literal text. With debug enabled each
    /// `source()` in the chain follows on its own indented line.
    pub fn error(&self, err: &(dyn std::error::Error + 'static)) -> io::Result<()> {
        let mut out = self.finish(self.tags.render_as("error", &err.to_string()));
        out.push('\n');

        if self.debug {
            let mut source = err.source();
            while let Some(cause) = source {
                let frame = self.tags.render_as("info", &format!("  {}", cause));
                out.push_str(&self.finish(frame));
                out.push('\n');
                source = cause.source();
            }
        }

        write_to(&self.stderr, out.as_bytes())
    }
}

impl fmt::Debug for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer")
            .field("color", &self.color)
            .field("debug", &self.debug)
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

fn lock(sink: &Sink) -> MutexGuard<'_, Box<dyn Write + Send>> {
    sink.lock().unwrap_or_else(PoisonError::into_inner)
}

fn write_to(sink: &Sink, data: &[u8]) -> io::Result<()> {
    let mut guard = lock(sink);
    guard.write_all(data)?;
    guard.flush()
}

/// Stdout of a [`Writer`] as a byte sink, used for subprocess output.
#[derive(Debug)]
pub struct PlainOut<'w> {
    writer: &'w Writer,
}

impl Write for PlainOut<'_> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.writer.write_plain(data)?;
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Shared in-memory sink, cloneable so tests can read what was written.
#[derive(Debug, Clone, Default)]
pub struct Capture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl Capture {
    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Write for Capture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
