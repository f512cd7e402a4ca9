//! Pending model and image loads owned by a camera device.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use rigscope_core::RigError;
use rigscope_render::{AssetFuture, AssetResult, ObjectHandle};

/// Which asynchronous visual an asset fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetSlot {
    /// The camera body model.
    Model,
    /// The textured image in front of the camera.
    Image,
}

impl std::fmt::Display for AssetSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Model => f.write_str("model"),
            Self::Image => f.write_str("image"),
        }
    }
}

/// Shared flag that tells in-flight loads their device is gone.
///
/// Clones observe the same flag. A fresh token is live.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a live token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the token cancelled. Cannot be undone.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns true once [`CancelToken::cancel`] was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Returns true if both tokens share the same flag.
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// An asset load that has been requested but not yet applied.
pub struct PendingAsset {
    cam_id: String,
    slot: AssetSlot,
    token: CancelToken,
    future: AssetFuture,
}

impl PendingAsset {
    pub fn new(
        cam_id: impl Into<String>,
        slot: AssetSlot,
        token: CancelToken,
        future: AssetFuture,
    ) -> Self {
        Self {
            cam_id: cam_id.into(),
            slot,
            token,
            future,
        }
    }

    /// The camera this asset belongs to.
    pub fn cam_id(&self) -> &str {
        &self.cam_id
    }

    pub fn slot(&self) -> AssetSlot {
        self.slot
    }

    /// The owning device's cancellation token.
    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Polls the underlying load once.
    pub fn poll(&mut self, cx: &mut Context<'_>) -> Poll<AssetResult<ObjectHandle>> {
        self.future.as_mut().poll(cx)
    }

    /// Pairs a finished load result with this request's identity.
    pub fn finish(self, result: AssetResult<ObjectHandle>) -> FinishedAsset {
        FinishedAsset {
            cam_id: self.cam_id,
            slot: self.slot,
            token: self.token,
            result,
        }
    }

    /// Waits for the load to finish.
    pub async fn resolve(mut self) -> FinishedAsset {
        let result = (&mut self.future).await;
        self.finish(result)
    }
}

impl std::fmt::Debug for PendingAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingAsset")
            .field("cam_id", &self.cam_id)
            .field("slot", &self.slot)
            .field("cancelled", &self.token.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// A load that has finished, successfully or not, and awaits attachment.
#[derive(Debug)]
pub struct FinishedAsset {
    pub cam_id: String,
    pub slot: AssetSlot,
    pub token: CancelToken,
    pub result: AssetResult<ObjectHandle>,
}

/// What happened when a finished load was offered to its device.
#[derive(Debug)]
pub enum AssetOutcome {
    /// The object was placed and added to the scene.
    Attached(ObjectHandle),
    /// The device was disposed; any delivered object was released.
    Discarded,
    /// The load failed; the slot stays empty.
    Failed(RigError),
}

impl AssetOutcome {
    /// Returns true for [`AssetOutcome::Attached`].
    pub fn is_attached(&self) -> bool {
        matches!(self, Self::Attached(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigscope_render::{ready_asset, AssetError};

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
        assert!(token.same_as(&clone));
        assert!(!token.same_as(&CancelToken::new()));
    }

    #[test]
    fn test_resolve_carries_identity() {
        let pending = PendingAsset::new(
            "3",
            AssetSlot::Image,
            CancelToken::new(),
            ready_asset(Err(AssetError::NotFound("x.jpg".into()))),
        );
        let finished = pollster::block_on(pending.resolve());
        assert_eq!(finished.cam_id, "3");
        assert_eq!(finished.slot, AssetSlot::Image);
        assert!(finished.result.is_err());
    }
}
