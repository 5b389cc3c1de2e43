use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::JoinHandle;

use tileworld_common::RegionCoord;
use tileworld_region::{Region, RegionError, RegionStore};

/// Single background thread servicing region loads.
///
/// Submit/poll only; the worker never touches manager state. Cancellation is
/// best-effort: a load that already started still completes, and its result
/// is discarded by the manager when polled.
pub(crate) struct LoadWorker {
    submit_tx: Option<Sender<RegionCoord>>,
    result_rx: Receiver<(RegionCoord, Result<Region, RegionError>)>,
    handle: Option<JoinHandle<()>>,
}

impl LoadWorker {
    pub(crate) fn spawn(store: RegionStore) -> Self {
        let (submit_tx, submit_rx) = channel::<RegionCoord>();
        let (result_tx, result_rx) = channel();
        let handle = std::thread::Builder::new()
            .name("region-loader".into())
            .spawn(move || {
                for coord in submit_rx {
                    let result = store.load(coord.rx, coord.ry);
                    if result_tx.send((coord, result)).is_err() {
                        break;
                    }
                }
            })
            .expect("failed to spawn region loader thread");
        Self {
            submit_tx: Some(submit_tx),
            result_rx,
            handle: Some(handle),
        }
    }

    pub(crate) fn submit(&self, coord: RegionCoord) {
        if let Some(tx) = &self.submit_tx {
            // The worker only disappears on shutdown, which drops the channel.
            let _ = tx.send(coord);
        }
    }

    /// Drain all completed loads without blocking.
    pub(crate) fn poll(&self) -> Vec<(RegionCoord, Result<Region, RegionError>)> {
        self.result_rx.try_iter().collect()
    }

    /// Stop the worker and wait for it to exit. No loads are serviced after
    /// this returns.
    pub(crate) fn shutdown(&mut self) {
        self.submit_tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for LoadWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
