#![forbid(unsafe_code)]

//! The host capability set the conformance suite is written against.
//!
//! A real implementation lives inside a host compositor; resources are
//! opaque handles and every misuse is reported by value (a `false` return,
//! a null handle, or a failing [`FlushStatus`]), never by panic. That
//! reporting discipline is itself the contract the suite verifies.
//!
//! The trait is object-safe on purpose: clients hold an
//! `Rc<RefCell<dyn SurfaceHost>>` (one logical thread of control, see the
//! pump module) and stay agnostic of the backing implementation.

use std::cell::RefCell;
use std::rc::Rc;

use fcanvas_core::{Point, Rect, Size};

use crate::pixels::PixelFormat;

/// Opaque handle to a host-owned resource.
///
/// `NULL` is never a live resource. The host allocates non-zero ids and
/// never reuses one within its lifetime, so a stale handle stays invalid
/// instead of aliasing a newer resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ResourceId(u64);

impl ResourceId {
    /// The null handle.
    pub const NULL: Self = Self(0);

    /// Construct from a raw id value.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id value.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Check for the null handle.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Surface metadata reported by [`SurfaceHost::describe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceInfo {
    /// Exact creation dimensions.
    pub size: Size,
    /// The opacity hint passed at creation.
    pub always_opaque: bool,
}

/// Image buffer metadata reported by [`SurfaceHost::image_info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    /// Pixel memory layout.
    pub format: PixelFormat,
    /// Exact creation dimensions.
    pub size: Size,
    /// Row byte length.
    pub stride_bytes: usize,
}

/// Outcome of a flush request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushStatus {
    /// Every queued operation committed before the call returned.
    Done,
    /// The commit pends; the completion callback fires from the message
    /// loop exactly once.
    WouldBlock,
    /// The handle is not a valid surface.
    BadResource,
    /// A previous flush on this surface has not completed yet.
    InProgress,
    /// No callback was supplied, and blocking is not allowed on the thread
    /// that owns the surface's event loop.
    NoCallback,
}

impl FlushStatus {
    /// True for the two success cases (`Done`, `WouldBlock`).
    #[inline]
    pub const fn accepted(self) -> bool {
        matches!(self, Self::Done | Self::WouldBlock)
    }
}

/// Completion callback for a flush. Invoked exactly once, from the message
/// loop, after the queued operations have committed. Never invoked from
/// inside `flush` itself.
pub type FlushCallback = Box<dyn FnOnce()>;

/// Shared handle to a host implementation.
pub type HostHandle = Rc<RefCell<dyn SurfaceHost>>;

/// The device-context capability set.
///
/// All operations validate their handles: a null handle or a handle of the
/// wrong resource kind is rejected the same way as any other invalid
/// argument. Mutating operations on a surface (`paint_image`, `scroll`,
/// `replace_contents`) queue work; nothing becomes externally observable
/// until a flush commits.
pub trait SurfaceHost {
    // --- Image buffers ---

    /// Allocate a pixel buffer. Returns [`ResourceId::NULL`] when either
    /// dimension is non-positive or exceeds the host's limit. `zero_init`
    /// pre-zeroes the pixels; otherwise the content is unspecified.
    fn create_image(
        &mut self,
        format: PixelFormat,
        width: i32,
        height: i32,
        zero_init: bool,
    ) -> ResourceId;

    /// Metadata for an image handle, or `None` for anything that is not a
    /// live image.
    fn image_info(&self, image: ResourceId) -> Option<ImageInfo>;

    /// Read one pixel of an image. `None` for invalid handles or
    /// out-of-bounds coordinates.
    fn image_pixel(&self, image: ResourceId, at: Point) -> Option<u32>;

    /// Write one pixel of an image. False for invalid handles or
    /// out-of-bounds coordinates.
    fn set_image_pixel(&mut self, image: ResourceId, at: Point, value: u32) -> bool;

    // --- Surfaces ---

    /// Create a device-context surface with an atomically zero-filled
    /// back buffer. Returns [`ResourceId::NULL`] when either dimension is
    /// non-positive or exceeds the host's limit.
    fn create_surface(&mut self, width: i32, height: i32, always_opaque: bool) -> ResourceId;

    /// Metadata for a surface handle, or `None` for anything that is not a
    /// live surface.
    fn describe(&self, surface: ResourceId) -> Option<SurfaceInfo>;

    /// Queue a paint of `image` with its origin at `dest`.
    ///
    /// `dirty`, when given, restricts the paint to a sub-rectangle in
    /// *source* coordinates; it must lie fully inside the source bounds.
    /// The dirty rect translated by `dest` must lie fully inside the
    /// surface. The source is read at commit time, so mutations between
    /// queue and flush affect the committed pixels (last content wins).
    fn paint_image(
        &mut self,
        surface: ResourceId,
        image: ResourceId,
        dest: Point,
        dirty: Option<Rect>,
    ) -> bool;

    /// Queue an intra-surface blit of `clip` (default: the whole surface)
    /// by `delta`. The clip and its translation must both lie fully inside
    /// the surface; rejection has no partial effect.
    fn scroll(&mut self, surface: ResourceId, clip: Option<Rect>, delta: Point) -> bool;

    /// Queue a whole-buffer swap. The image's dimensions must exactly match
    /// the surface's. On success the image resource is consumed (ownership
    /// transfers to the surface) and its handle becomes invalid; on failure
    /// the image is untouched.
    fn replace_contents(&mut self, surface: ResourceId, image: ResourceId) -> bool;

    /// Request a commit of all queued operations.
    ///
    /// At most one flush may be in flight per surface. A flush of an empty
    /// queue still completes (the callback must fire).
    fn flush(&mut self, surface: ResourceId, callback: Option<FlushCallback>) -> FlushStatus;

    // --- Test-only capabilities ---

    /// Synchronously copy committed pixels into `image`, starting at
    /// `origin` in surface coordinates. Overwrites every pixel of the
    /// target. Fails on invalid handles or a region not fully inside the
    /// surface.
    fn read_back(&mut self, surface: ResourceId, image: ResourceId, origin: Point) -> bool;

    /// Commit every surface whose flush is ready and hand the completion
    /// callbacks to the caller, which must invoke them. This is the
    /// single-step pump primitive behind
    /// [`run_message_loop`](crate::pump::run_message_loop).
    fn take_ready_completions(&mut self) -> Vec<FlushCallback>;

    /// True while at least one flush awaits a pump step.
    fn has_pending_flush(&self) -> bool;

    /// Drop a resource. Pending flush completions tied to it are abandoned
    /// (their callbacks never fire). Unknown handles are ignored.
    fn release(&mut self, id: ResourceId);
}
