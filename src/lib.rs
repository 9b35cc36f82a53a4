//! Bindings to the native VR runtime.
//!
//! [`Runtime`] loads the library and resolves its entry points, [`Context`]
//! initializes it and [`Session`] opens a session on it. Every native call goes
//! through the [`Ovr`] trait, implemented once per process pointer width.

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
compile_error!("the VR runtime only ships 32-bit and 64-bit builds");

pub mod api;
pub mod config;
pub mod dispatch;
pub mod entry;
pub mod fetch;
pub mod ffi;
pub mod log_bridge;
pub mod result;
pub mod runtime;
pub mod session;
pub mod texture;

pub use api::{Layer, MirrorTexture, Ovr, SessionHandle, TextureSwapChain};
pub use config::{InitConfig, RuntimeConfig};
pub use dispatch::{create_api, create_api_for, Api32, Api64, PointerWidth};
pub use entry::EntryPoints;
pub use fetch::{FetchError, Fetched, PinObserver, PinnedBuffer};
pub use result::{BindingError, OvrError, OvrResult};
pub use runtime::Runtime;
pub use session::{Context, Session};
