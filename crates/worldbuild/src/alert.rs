use tracing::warn;

/// User-facing, blocking error surface (a modal in the UI, stderr in the CLI).
pub trait Alert: Send + Sync {
    fn alert(&self, message: &str);
}

/// Headless sink: alerts only go to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlert;

impl Alert for LogAlert {
    fn alert(&self, message: &str) {
        warn!(alert = %message, "world builder alert");
    }
}

impl<F> Alert for F
where
    F: Fn(&str) + Send + Sync,
{
    fn alert(&self, message: &str) {
        self(message)
    }
}
