//! Renderer interface for rigscope.
//!
//! Camera devices never talk to a graphics API directly. They create, place
//! and remove objects through the [`Renderer`] trait and receive models and
//! images through [`AssetFuture`]s. [`HeadlessScene`] implements the trait in
//! memory for tests and batch tools.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod asset;
pub mod error;
pub mod handle;
pub mod headless;
pub mod renderer;

pub use asset::{asset_channel, ready_asset, AssetCompleter, AssetFuture};
pub use error::{AssetError, AssetResult};
pub use handle::{ObjectHandle, ObjectKind};
pub use headless::{AssetKind, HeadlessScene, LoadRequest, SceneObject};
pub use renderer::{Appearance, Renderer};
