use std::sync::Mutex;

#[cfg(feature = "emitter")]
use event_emitter_rs::EventEmitter;

/// Severity of a user-facing notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Info => "info",
            NoticeKind::Warning => "warning",
            NoticeKind::Error => "error",
        }
    }
}

/// A transient, auto-dismissing notification for the user. Nothing in the
/// crate blocks on notices; they are advisory output.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Collects notices for the UI layer.
///
/// Notices always land in a drainable buffer so headless callers and tests
/// can observe them. With the `emitter` feature each notice is also emitted
/// on its kind's channel, so a UI can register toast listeners.
pub struct NoticeCenter {
    buffer: Mutex<Vec<Notice>>,
    #[cfg(feature = "emitter")]
    emitter: Mutex<EventEmitter>,
}

impl Default for NoticeCenter {
    fn default() -> Self {
        NoticeCenter::new()
    }
}

impl NoticeCenter {
    pub fn new() -> Self {
        NoticeCenter {
            buffer: Mutex::new(Vec::new()),
            #[cfg(feature = "emitter")]
            emitter: Mutex::new(EventEmitter::new()),
        }
    }

    pub fn push(&self, kind: NoticeKind, message: impl Into<String>) {
        let message = message.into();

        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push(Notice {
                kind,
                message: message.clone(),
            });
        }

        #[cfg(feature = "emitter")]
        if let Ok(mut emitter) = self.emitter.lock() {
            emitter.emit(kind.as_str(), message);
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(NoticeKind::Success, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(NoticeKind::Info, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.push(NoticeKind::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeKind::Error, message);
    }

    /// Drain and return all buffered notices, oldest first.
    pub fn take_all(&self) -> Vec<Notice> {
        self.buffer
            .lock()
            .map(|mut buffer| buffer.drain(..).collect())
            .unwrap_or_default()
    }

    /// Register a listener for one notice kind.
    #[cfg(feature = "emitter")]
    pub fn on<F>(&self, kind: NoticeKind, listener: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        if let Ok(mut emitter) = self.emitter.lock() {
            emitter.on(kind.as_str(), listener);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_take_all() {
        let notices = NoticeCenter::new();
        notices.success("paid");
        notices.error("failed");

        let drained = notices.take_all();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].kind, NoticeKind::Success);
        assert_eq!(drained[0].message, "paid");
        assert_eq!(drained[1].kind, NoticeKind::Error);

        assert!(notices.take_all().is_empty());
    }

    #[cfg(feature = "emitter")]
    #[test]
    fn emits_on_kind_channel() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;
        use std::thread;
        use std::time::Duration;

        let notices = NoticeCenter::new();
        let seen = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&seen);

        notices.on(NoticeKind::Warning, move |message: String| {
            assert_eq!(message, "slow down");
            flag.store(true, Ordering::SeqCst);
        });

        notices.warning("slow down");

        // EventEmitter delivers asynchronously, give it time
        thread::sleep(Duration::from_millis(50));
        assert!(seen.load(Ordering::SeqCst));
    }
}
