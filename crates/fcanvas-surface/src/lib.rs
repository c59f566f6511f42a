#![forbid(unsafe_code)]

//! Surface kernel: pixel buffers, the host contract, and the test fake.
//!
//! The real device context lives in a host compositor; this crate defines
//! the capability set a host must provide ([`SurfaceHost`]), client-side
//! wrappers over it ([`Canvas`], [`ImageData`]), and an in-memory fake
//! ([`FakeHost`]) faithful enough to run the conformance suite standalone.

pub mod client;
pub mod fake;
pub mod host;
pub mod pixels;
pub mod pump;

pub use client::{Canvas, ImageData};
pub use fake::{FakeHost, MAX_DIMENSION};
pub use host::{
    FlushCallback, FlushStatus, HostHandle, ImageInfo, ResourceId, SurfaceHost, SurfaceInfo,
};
pub use pixels::{PixelFormat, PixelGrid};
pub use pump::{LoopError, LoopSignal, run_message_loop};
