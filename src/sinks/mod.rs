//! Sink implementations
//!
//! A [`Sink`] is a cloneable handle to a writer. Loggers copy the handle when
//! they fork, so a parent and its children keep writing to the same
//! destination while owning their configuration independently.

pub mod console;
pub mod file;
pub mod memory;

pub use memory::MemorySink;

use crate::core::Result;
use parking_lot::Mutex;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Destination for rendered log lines
#[derive(Clone)]
pub struct Sink {
    name: Arc<str>,
    writer: SharedWriter,
}

impl Sink {
    /// Wrap any writer under a descriptive name
    pub fn new<W>(name: impl Into<Arc<str>>, writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            name: name.into(),
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Wrap an arbitrary writer
    pub fn from_writer<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self::new("writer", writer)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Write one rendered line
    ///
    /// The whole line goes out under the sink's lock, so lines from threads
    /// sharing this sink never interleave.
    pub fn write_line(&self, line: &str) -> Result<()> {
        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes())?;
        Ok(())
    }

    pub fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    /// Whether two handles point at the same writer
    pub fn same_as(&self, other: &Sink) -> bool {
        Arc::ptr_eq(&self.writer, &other.writer)
    }
}

impl Default for Sink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink").field("name", &self.name).finish()
    }
}
