/// Destination for non-fatal crawl warnings. Crawl correctness never
/// depends on it.
pub trait DiagnosticSink: Send + Sync {
    fn warn(&self, message: &str);
}

/// Forwards warnings to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn warn(&self, message: &str) {
        log::warn!("{message}");
    }
}
