//! Standard stream sinks

use super::Sink;

impl Sink {
    /// Sink writing to standard output, the logger default
    pub fn stdout() -> Self {
        Sink::new("stdout", std::io::stdout())
    }

    /// Sink writing to standard error
    pub fn stderr() -> Self {
        Sink::new("stderr", std::io::stderr())
    }
}
