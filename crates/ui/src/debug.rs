use std::{fmt, thread};

use once_cell::sync::Lazy;
use smol::channel::{Receiver, Sender};

use crate::progress_button::ButtonState;

/// A progress update, recorded when the button debug flag is on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugRecord {
    pub state: ButtonState,
    pub progress: f32,
}

impl fmt::Display for DebugRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[update_circle_progress] state: {}, progress: {}",
            self.state, self.progress
        )
    }
}

static GLOBAL_SINK: Lazy<DebugSink> = Lazy::new(|| {
    let (tx, rx) = smol::channel::unbounded::<DebugRecord>();
    if let Err(err) = thread::Builder::new()
        .name("circle-progress-button-debug".into())
        .spawn(move || drain(rx))
    {
        tracing::error!("failed to start debug trace thread: {}", err);
    }
    DebugSink { tx }
});

fn drain(rx: Receiver<DebugRecord>) {
    while let Ok(record) = rx.recv_blocking() {
        tracing::debug!(target: "circle_progress_button", "{}", record);
    }
}

/// Where debug records go.
///
/// Sending never blocks the caller, records are written by a dedicated background thread.
#[derive(Clone)]
pub struct DebugSink {
    tx: Sender<DebugRecord>,
}

impl DebugSink {
    /// The process wide sink, started on first use.
    pub fn global() -> Self {
        GLOBAL_SINK.clone()
    }

    /// A sink that forwards records into the given channel.
    pub fn with_sender(tx: Sender<DebugRecord>) -> Self {
        Self { tx }
    }

    pub fn trace(&self, record: DebugRecord) {
        // A closed or full channel drops the record.
        _ = self.tx.try_send(record);
    }
}

impl fmt::Debug for DebugSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugSink")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_display() {
        let record = DebugRecord {
            state: ButtonState::Suspended,
            progress: 42.,
        };
        assert_eq!(
            record.to_string(),
            "[update_circle_progress] state: suspended, progress: 42"
        );
    }

    #[test]
    fn test_trace_does_not_block() {
        let (tx, rx) = smol::channel::bounded(1);
        let sink = DebugSink::with_sender(tx);
        let record = DebugRecord {
            state: ButtonState::InProgress,
            progress: 1.,
        };

        sink.trace(record);
        // The channel is full, the second record is dropped instead of blocking.
        sink.trace(DebugRecord {
            progress: 2.,
            ..record
        });

        assert_eq!(rx.try_recv().unwrap(), record);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_global_sink_accepts_records() {
        let sink = DebugSink::global();
        sink.trace(DebugRecord {
            state: ButtonState::Default,
            progress: 0.,
        });
    }
}
