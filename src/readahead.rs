//! Background materialisation of records ahead of the viewport.

use crate::error::StoreError;
use crate::store::RecordStore;
use crossbeam::channel::{self, Sender};
use std::io::{Read, Seek};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

/// How many records the worker parses per hold of the store lock.
const CHUNK: usize = 64;

pub type SharedStore<R> = Arc<Mutex<RecordStore<R>>>;

/// Locks the store. A panic on another thread while holding the lock leaves the store in a
/// consistent state, as records are only ever appended whole, so poisoning is ignored.
pub fn lock<R>(store: &Mutex<RecordStore<R>>) -> MutexGuard<'_, RecordStore<R>> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A worker thread which keeps the store materialised some distance past the most recently
/// viewed record.
///
/// All reads go through the store's mutex, so the worker and the foreground never append to
/// the store at the same time. Dropping the `ReadAhead` stops and joins the worker.
pub struct ReadAhead {
    tx: Option<Sender<usize>>,
    worker: Option<JoinHandle<()>>,
}

impl ReadAhead {
    pub fn spawn<R>(store: SharedStore<R>, distance: usize) -> std::io::Result<Self>
    where
        R: Read + Seek + Send + 'static,
    {
        let (tx, rx) = channel::unbounded::<usize>();

        let worker = thread::Builder::new()
            .name("readahead".to_string())
            .spawn(move || {
                while let Ok(mut target) = rx.recv() {
                    // only the furthest outstanding request matters
                    while let Ok(newer) = rx.try_recv() {
                        target = target.max(newer);
                    }
                    fill_to(&store, target.saturating_add(distance));
                }
                debug!("Read-ahead worker stopped");
            })?;

        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
        })
    }

    /// Asks the worker to read ahead of `record`. Never blocks.
    pub fn request(&self, record: usize) {
        if let Some(tx) = &self.tx {
            // the worker only exits once the sender is dropped
            let _ = tx.send(record);
        }
    }
}

fn fill_to<R: Read + Seek>(store: &Mutex<RecordStore<R>>, wanted: usize) {
    loop {
        let mut guard = lock(store);
        if guard.total_records().is_some()
            || guard.is_closed()
            || guard.len() > wanted
            || guard.len() >= guard.max_records()
        {
            return;
        }

        let step = (guard.len() + CHUNK - 1)
            .min(wanted)
            .min(guard.max_records().saturating_sub(1));
        match guard.ensure(step as isize) {
            Ok(()) => (),
            Err(StoreError::Exhausted { .. }) => return,
            Err(e) => {
                debug!("Read-ahead stopped at record {step}: {e}");
                return;
            }
        }
        if step == wanted {
            return;
        }
    }
}

impl Drop for ReadAhead {
    fn drop(&mut self) {
        // disconnecting the channel ends the worker's loop
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Read-ahead worker panicked");
            }
        }
    }
}
