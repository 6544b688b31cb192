//! Hands results from worker tasks back to the thread that owns the UI.
//!
//! Workers hold a [`UiHandle`] and post closures; the UI thread owns the
//! matching [`UiQueue`] and runs them against its state once per frame.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

type Job<T> = Box<dyn FnOnce(&mut T) + Send>;
type Waker = Arc<dyn Fn() + Send + Sync>;

pub struct UiHandle<T> {
    tx: Sender<Job<T>>,
    waker: Option<Waker>,
}

// Manual impl so `T` itself need not be Clone
impl<T> Clone for UiHandle<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            waker: self.waker.clone(),
        }
    }
}

impl<T> UiHandle<T> {
    /// Calls `waker` after every post, e.g. to request a repaint.
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }

    pub fn post(&self, job: impl FnOnce(&mut T) + Send + 'static) {
        if self.tx.send(Box::new(job)).is_err() {
            tracing::debug!("UI queue closed, dropping completion");
            return;
        }
        if let Some(wake) = &self.waker {
            wake();
        }
    }
}

pub struct UiQueue<T> {
    rx: Receiver<Job<T>>,
}

impl<T> UiQueue<T> {
    /// Runs every job posted so far. Returns how many ran.
    pub fn drain(&self, target: &mut T) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job(target);
            ran += 1;
        }
        ran
    }
}

pub fn ui_queue<T>() -> (UiHandle<T>, UiQueue<T>) {
    let (tx, rx) = mpsc::channel();
    (UiHandle { tx, waker: None }, UiQueue { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn jobs_run_in_order_on_drain() {
        let (handle, queue) = ui_queue::<Vec<u32>>();
        handle.post(|v| v.push(1));
        handle.post(|v| v.push(2));

        let mut state = Vec::new();
        assert_eq!(queue.drain(&mut state), 2);
        assert_eq!(state, vec![1, 2]);
        assert_eq!(queue.drain(&mut state), 0);
    }

    #[test]
    fn jobs_posted_from_another_thread_run_on_drain_thread() {
        let (handle, queue) = ui_queue::<Option<std::thread::ThreadId>>();
        let worker = handle.clone();
        std::thread::spawn(move || {
            worker.post(|slot| *slot = Some(std::thread::current().id()));
        })
        .join()
        .unwrap();

        let mut ran_on = None;
        queue.drain(&mut ran_on);
        assert_eq!(ran_on, Some(std::thread::current().id()));
    }

    #[test]
    fn waker_fires_per_post() {
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = wakes.clone();
        let (handle, _queue) = ui_queue::<()>();
        let handle = handle.with_waker(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        handle.post(|_| {});
        handle.post(|_| {});
        assert_eq!(wakes.load(Ordering::SeqCst), 2);
    }
}
