use std::io::Write;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("alert output unavailable: {0}")]
    Io(#[from] std::io::Error),
}

/// Best-effort "play a short alert" capability used on timer expiry.
pub trait AlertSink: Send + Sync {
    fn play(&self) -> Result<(), AlertError>;
}

/// Rings the terminal bell on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl AlertSink for TerminalBell {
    fn play(&self) -> Result<(), AlertError> {
        let mut stderr = std::io::stderr().lock();
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        Ok(())
    }
}

/// Plays the alert and drops any failure.
pub fn ring(sink: &dyn AlertSink) {
    if let Err(err) = sink.play() {
        debug!("alert sound skipped: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Broken(AtomicUsize);

    impl AlertSink for Broken {
        fn play(&self) -> Result<(), AlertError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(std::io::Error::other("no audio device").into())
        }
    }

    #[test]
    fn failing_sink_is_swallowed() {
        let sink = Broken(AtomicUsize::new(0));
        ring(&sink);
        assert_eq!(sink.0.load(Ordering::SeqCst), 1);
    }
}
