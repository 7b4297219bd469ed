//! File sink implementation

use super::Sink;
use crate::core::Result;
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::Path;

impl Sink {
    /// Append to the file at `path`, creating it if needed
    ///
    /// Writes are buffered; call `Logger::flush` to push them to disk. The
    /// buffer is also flushed when the last handle to the sink is dropped.
    pub fn file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Sink::new(path.display().to_string(), BufWriter::new(file)))
    }
}
