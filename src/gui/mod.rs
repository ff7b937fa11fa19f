//! Single GUI thread dispatcher
//!
//! All listener callbacks and exercise-provider notifications run on one thread, the GUI
//! thread. The runtime thread posts work here and usually waits for it to finish.
//!
//! - [`GuiQueue`] is owned by the GUI thread. A host with its own event loop calls
//!   [`GuiQueue::pump`] every iteration; headless hosts and tests use [`spawn`], which
//!   dedicates a thread to [`GuiQueue::run`].
//! - [`GuiHandle`] is the cloneable sending side. [`GuiHandle::invoke_and_wait`] runs the
//!   job inline when called on the GUI thread itself, so GUI code can call into the runtime
//!   without deadlocking on its own queue.

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, OnceLock};
use std::thread::{self, ThreadId};
use tracing::{error, warn};

type Job = Box<dyn FnOnce() + Send>;

/// Errors from posting work to the GUI thread
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuiError {
    #[error("the GUI thread is no longer processing jobs")]
    Disconnected,
}

/// Sending side of the GUI queue
#[derive(Clone)]
pub struct GuiHandle {
    tx: Sender<Job>,
    gui_thread: Arc<OnceLock<ThreadId>>,
}

/// Receiving side of the GUI queue, owned by the GUI thread
pub struct GuiQueue {
    rx: Receiver<Job>,
    gui_thread: Arc<OnceLock<ThreadId>>,
}

impl GuiQueue {
    /// Create a queue and its handle. The first thread to pump the queue becomes the GUI
    /// thread.
    pub fn new() -> (GuiQueue, GuiHandle) {
        let (tx, rx) = mpsc::channel();
        let gui_thread = Arc::new(OnceLock::new());
        (
            GuiQueue {
                rx,
                gui_thread: Arc::clone(&gui_thread),
            },
            GuiHandle { tx, gui_thread },
        )
    }

    fn claim_current_thread(&self) {
        let id = *self.gui_thread.get_or_init(|| thread::current().id());
        if id != thread::current().id() {
            warn!("GUI queue pumped from a thread other than the GUI thread");
        }
    }

    /// Run every job queued so far and return how many ran
    pub fn pump(&self) -> usize {
        self.claim_current_thread();
        let mut count = 0;
        while let Ok(job) = self.rx.try_recv() {
            run_job(job);
            count += 1;
        }
        count
    }

    /// Run jobs until every [`GuiHandle`] has been dropped
    pub fn run(self) {
        self.claim_current_thread();
        while let Ok(job) = self.rx.recv() {
            run_job(job);
        }
    }
}

fn run_job(job: Job) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
        error!("GUI job panicked: {}", panic_message(payload.as_ref()));
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Spawn a dedicated GUI thread and return its handle.
///
/// The thread exits once every clone of the handle is dropped.
pub fn spawn(name: &str) -> io::Result<GuiHandle> {
    let (queue, handle) = GuiQueue::new();
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || queue.run())?;
    Ok(handle)
}

impl GuiHandle {
    /// Whether the calling thread is the GUI thread
    pub fn is_gui_thread(&self) -> bool {
        self.gui_thread.get() == Some(&thread::current().id())
    }

    /// Queue a job without waiting for it
    pub fn invoke_later<F>(&self, job: F) -> Result<(), GuiError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.tx
            .send(Box::new(job))
            .map_err(|_| GuiError::Disconnected)
    }

    /// Run a job on the GUI thread and wait for its result
    pub fn invoke_and_wait<R, F>(&self, job: F) -> Result<R, GuiError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        if self.is_gui_thread() {
            return Ok(job());
        }
        let (reply_tx, reply_rx) = mpsc::sync_channel(1);
        self.invoke_later(move || {
            let _ = reply_tx.send(job());
        })?;
        // A dropped reply sender means the job never ran or panicked
        reply_rx.recv().map_err(|_| GuiError::Disconnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_invoke_and_wait_returns_value() {
        let gui = spawn("gui-test").unwrap();
        let on_gui = gui.clone();
        let result = gui.invoke_and_wait(move || (on_gui.is_gui_thread(), 6 * 7));
        assert_eq!(result, Ok((true, 42)));
        assert!(!gui.is_gui_thread());
    }

    #[test]
    fn test_pump_runs_queued_jobs_in_order() {
        let (queue, gui) = GuiQueue::new();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        for i in 0..3 {
            let seen = Arc::clone(&seen);
            gui.invoke_later(move || seen.lock().push(i)).unwrap();
        }
        assert_eq!(queue.pump(), 3);
        assert_eq!(*seen.lock(), vec![0, 1, 2]);
        assert!(gui.is_gui_thread());
    }

    #[test]
    fn test_inline_on_gui_thread() {
        let (queue, gui) = GuiQueue::new();
        queue.pump();
        // Would block forever if it were queued instead of run inline
        assert_eq!(gui.invoke_and_wait(|| 1), Ok(1));
    }

    #[test]
    fn test_panicking_job_is_contained() {
        let gui = spawn("gui-panic").unwrap();
        assert_eq!(
            gui.invoke_and_wait(|| -> u32 { panic!("boom") }),
            Err(GuiError::Disconnected)
        );

        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        gui.invoke_and_wait(move || c.fetch_add(1, Ordering::SeqCst))
            .unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disconnected_queue() {
        let (queue, gui) = GuiQueue::new();
        drop(queue);
        assert_eq!(gui.invoke_later(|| {}), Err(GuiError::Disconnected));
    }
}
