//! Frame-driven polling of pending model and image loads.

use std::sync::Arc;
use std::task::{Context, Poll, Wake, Waker};

use rigscope_structures::{FinishedAsset, PendingAsset};

/// Waker that does nothing: the queue is polled every frame anyway.
struct FrameWaker;

impl Wake for FrameWaker {
    fn wake(self: Arc<Self>) {}
}

/// Loads waiting to be attached to their devices.
pub struct AssetQueue {
    pending: Vec<PendingAsset>,
    waker: Waker,
}

impl Default for AssetQueue {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            waker: Waker::from(Arc::new(FrameWaker)),
        }
    }
}

impl AssetQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, asset: PendingAsset) {
        self.pending.push(asset);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drops loads whose device is gone.
    ///
    /// Dropping a load tells the renderer nobody is waiting for it.
    pub fn drop_cancelled(&mut self) {
        self.pending.retain(|p| !p.token().is_cancelled());
    }

    /// Polls every load once and returns the ones that finished.
    pub fn poll_ready(&mut self) -> Vec<FinishedAsset> {
        let mut cx = Context::from_waker(&self.waker);
        let mut finished = Vec::new();
        let mut still_pending = Vec::with_capacity(self.pending.len());
        for mut asset in self.pending.drain(..) {
            match asset.poll(&mut cx) {
                Poll::Ready(result) => finished.push(asset.finish(result)),
                Poll::Pending => still_pending.push(asset),
            }
        }
        self.pending = still_pending;
        finished
    }
}

impl std::fmt::Debug for AssetQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetQueue")
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigscope_render::{asset_channel, ObjectHandle};
    use rigscope_structures::{AssetSlot, CancelToken};

    #[test]
    fn test_poll_ready_splits_finished() {
        let mut queue = AssetQueue::new();
        let (done, done_future) = asset_channel();
        let (_waiting, waiting_future) = asset_channel();
        queue.push(PendingAsset::new("1", AssetSlot::Model, CancelToken::new(), done_future));
        queue.push(PendingAsset::new("2", AssetSlot::Image, CancelToken::new(), waiting_future));

        assert!(queue.poll_ready().is_empty());
        assert!(done.complete(Ok(ObjectHandle::from_raw(9))));

        let finished = queue.poll_ready();
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].cam_id, "1");
        assert_eq!(finished[0].result, Ok(ObjectHandle::from_raw(9)));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_drop_cancelled() {
        let mut queue = AssetQueue::new();
        let token = CancelToken::new();
        let (_c, future) = asset_channel();
        queue.push(PendingAsset::new("1", AssetSlot::Model, token.clone(), future));
        token.cancel();
        queue.drop_cancelled();
        assert!(queue.is_empty());
    }
}
