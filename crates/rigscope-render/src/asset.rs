//! Asynchronous asset delivery.
//!
//! A renderer answers `load_model` / `load_image_plane` with an [`AssetFuture`]
//! and later fulfils it through the matching [`AssetCompleter`]. The object
//! behind a delivered handle exists in the renderer but is not in the scene;
//! whoever awaits the future decides whether to add it or release it.

use std::future::Future;
use std::pin::Pin;

use futures_intrusive::channel::shared::{oneshot_channel, OneshotSender};

use crate::error::{AssetError, AssetResult};
use crate::handle::ObjectHandle;

/// A pending model or image load.
pub type AssetFuture = Pin<Box<dyn Future<Output = AssetResult<ObjectHandle>>>>;

/// The sending half of an asset request.
pub struct AssetCompleter {
    sender: OneshotSender<AssetResult<ObjectHandle>>,
}

impl AssetCompleter {
    /// Delivers the result.
    ///
    /// Returns `false` if the future was dropped; the caller still owns any
    /// object it created for this request and should release it.
    pub fn complete(self, result: AssetResult<ObjectHandle>) -> bool {
        self.sender.send(result).is_ok()
    }
}

/// Creates a linked completer and future.
///
/// Dropping the completer without calling [`AssetCompleter::complete`]
/// resolves the future to [`AssetError::Abandoned`].
#[must_use]
pub fn asset_channel() -> (AssetCompleter, AssetFuture) {
    let (sender, receiver) = oneshot_channel();
    let future = Box::pin(async move {
        receiver
            .receive()
            .await
            .unwrap_or(Err(AssetError::Abandoned))
    });
    (AssetCompleter { sender }, future)
}

/// An already-finished asset future.
#[must_use]
pub fn ready_asset(result: AssetResult<ObjectHandle>) -> AssetFuture {
    Box::pin(std::future::ready(result))
}
