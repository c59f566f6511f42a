#![forbid(unsafe_code)]

//! In-memory fake compositor.
//!
//! `FakeHost` implements the full [`SurfaceHost`] contract so the
//! conformance suite can run without a real host. It is deliberately
//! minimal: one resource table, one front buffer per surface, queued
//! operations applied in order when a flush commits.
//!
//! # Scope
//!
//! This is NOT a compositor. There is no damage tracking, no vsync, no
//! format conversion. A flush never completes synchronously: a valid
//! request pends and its callback fires from the next pump step, which
//! keeps the nested-wait path, double-flush rejection, and completion
//! liveness deterministic to test.
//!
//! # Invariants
//!
//! 1. Resource ids are non-zero and never reused within a host's lifetime
//! 2. At most one flush pends per surface
//! 3. Queued operations never touch the front buffer before commit
//! 4. Rejected operations have no effect at all

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use smallvec::SmallVec;
use tracing::{debug, trace};

use fcanvas_core::{Point, Rect, Size};

use crate::host::{
    FlushCallback, FlushStatus, HostHandle, ImageInfo, ResourceId, SurfaceHost, SurfaceInfo,
};
use crate::pixels::{PixelFormat, PixelGrid};

/// Largest accepted surface or image dimension, a stand-in for a real
/// compositor's texture limit.
pub const MAX_DIMENSION: i32 = 4096;

/// Fill pattern for images created without `zero_init`. Safe Rust cannot
/// hand out uninitialized memory; a loud pattern makes use-before-init
/// observable instead.
const UNINIT_PATTERN: u32 = 0xCDCD_CDCD;

struct ImageResource {
    format: PixelFormat,
    grid: PixelGrid,
}

/// An operation queued on a surface, applied at commit in queue order.
enum QueuedOp {
    /// Copy the dirty sub-rectangle of `source` to `dest + dirty.origin()`.
    /// The source is read at commit time, not snapshot at queue time.
    Paint {
        source: ResourceId,
        dest: Point,
        dirty: Rect,
    },
    /// Intra-surface blit of `clip` by `delta`.
    Scroll { clip: Rect, delta: Point },
    /// Whole-buffer swap with a consumed image's pixels.
    Replace { pixels: PixelGrid },
}

struct SurfaceResource {
    size: Size,
    always_opaque: bool,
    /// Committed, externally readable content.
    front: PixelGrid,
    queue: SmallVec<[QueuedOp; 4]>,
    flush_pending: bool,
}

enum Resource {
    Image(ImageResource),
    Surface(SurfaceResource),
}

/// In-memory [`SurfaceHost`] implementation.
pub struct FakeHost {
    resources: BTreeMap<u64, Resource>,
    next_id: u64,
    /// Accepted flushes awaiting a pump step, in request order.
    pending: Vec<(u64, FlushCallback)>,
}

impl FakeHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self {
            resources: BTreeMap::new(),
            next_id: 1,
            pending: Vec::new(),
        }
    }

    /// Wrap this host in the shared handle clients expect.
    pub fn into_handle(self) -> HostHandle {
        Rc::new(RefCell::new(self))
    }

    /// Number of live resources, for leak checks in tests.
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    fn alloc_id(&mut self) -> ResourceId {
        let id = self.next_id;
        self.next_id += 1;
        ResourceId::from_raw(id)
    }

    fn dimensions_ok(width: i32, height: i32) -> bool {
        width > 0 && height > 0 && width <= MAX_DIMENSION && height <= MAX_DIMENSION
    }

    fn image(&self, id: ResourceId) -> Option<&ImageResource> {
        match self.resources.get(&id.raw()) {
            Some(Resource::Image(img)) => Some(img),
            _ => None,
        }
    }

    fn image_mut(&mut self, id: ResourceId) -> Option<&mut ImageResource> {
        match self.resources.get_mut(&id.raw()) {
            Some(Resource::Image(img)) => Some(img),
            _ => None,
        }
    }

    fn surface(&self, id: ResourceId) -> Option<&SurfaceResource> {
        match self.resources.get(&id.raw()) {
            Some(Resource::Surface(s)) => Some(s),
            _ => None,
        }
    }

    fn surface_mut(&mut self, id: ResourceId) -> Option<&mut SurfaceResource> {
        match self.resources.get_mut(&id.raw()) {
            Some(Resource::Surface(s)) => Some(s),
            _ => None,
        }
    }

    /// Apply a surface's queued operations to its front buffer, in order.
    fn commit_surface(&mut self, sid: u64) {
        let ops = match self.resources.get_mut(&sid) {
            Some(Resource::Surface(s)) => std::mem::take(&mut s.queue),
            _ => return,
        };
        debug!(surface = sid, ops = ops.len(), "committing queued operations");
        for op in ops {
            match op {
                QueuedOp::Paint {
                    source,
                    dest,
                    dirty,
                } => {
                    // Source released or consumed since queueing: skip.
                    let Some(src) = self.image(source).map(|img| img.grid.crop(dirty)) else {
                        trace!(
                            surface = sid,
                            source = source.raw(),
                            "paint source gone before commit; skipped"
                        );
                        continue;
                    };
                    if let Some(Resource::Surface(s)) = self.resources.get_mut(&sid) {
                        s.front
                            .copy_rect_from(&src, src.bounds(), dest.offset(dirty.origin()));
                    }
                }
                QueuedOp::Scroll { clip, delta } => {
                    if let Some(Resource::Surface(s)) = self.resources.get_mut(&sid) {
                        let temp = s.front.crop(clip);
                        s.front
                            .copy_rect_from(&temp, temp.bounds(), clip.origin().offset(delta));
                    }
                }
                QueuedOp::Replace { pixels } => {
                    if let Some(Resource::Surface(s)) = self.resources.get_mut(&sid) {
                        s.front = pixels;
                    }
                }
            }
        }
    }
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceHost for FakeHost {
    fn create_image(
        &mut self,
        format: PixelFormat,
        width: i32,
        height: i32,
        zero_init: bool,
    ) -> ResourceId {
        if !Self::dimensions_ok(width, height) {
            debug!(width, height, "image creation rejected");
            return ResourceId::NULL;
        }
        let size = Size::new(width, height);
        let grid = if zero_init {
            PixelGrid::new(size)
        } else {
            PixelGrid::filled(size, UNINIT_PATTERN)
        };
        let id = self.alloc_id();
        self.resources
            .insert(id.raw(), Resource::Image(ImageResource { format, grid }));
        debug!(id = id.raw(), width, height, zero_init, "created image");
        id
    }

    fn image_info(&self, image: ResourceId) -> Option<ImageInfo> {
        self.image(image).map(|img| ImageInfo {
            format: img.format,
            size: img.grid.size(),
            stride_bytes: img.grid.stride_bytes(),
        })
    }

    fn image_pixel(&self, image: ResourceId, at: Point) -> Option<u32> {
        self.image(image)?.grid.pixel(at)
    }

    fn set_image_pixel(&mut self, image: ResourceId, at: Point, value: u32) -> bool {
        match self.image_mut(image) {
            Some(img) => img.grid.set_pixel(at, value),
            None => false,
        }
    }

    fn create_surface(&mut self, width: i32, height: i32, always_opaque: bool) -> ResourceId {
        if !Self::dimensions_ok(width, height) {
            debug!(width, height, "surface creation rejected");
            return ResourceId::NULL;
        }
        let size = Size::new(width, height);
        let id = self.alloc_id();
        self.resources.insert(
            id.raw(),
            Resource::Surface(SurfaceResource {
                size,
                always_opaque,
                front: PixelGrid::new(size),
                queue: SmallVec::new(),
                flush_pending: false,
            }),
        );
        debug!(id = id.raw(), width, height, always_opaque, "created surface");
        id
    }

    fn describe(&self, surface: ResourceId) -> Option<SurfaceInfo> {
        self.surface(surface).map(|s| SurfaceInfo {
            size: s.size,
            always_opaque: s.always_opaque,
        })
    }

    fn paint_image(
        &mut self,
        surface: ResourceId,
        image: ResourceId,
        dest: Point,
        dirty: Option<Rect>,
    ) -> bool {
        let Some(surface_size) = self.surface(surface).map(|s| s.size) else {
            return false;
        };
        let Some(source_bounds) = self.image(image).map(|img| img.grid.bounds()) else {
            return false;
        };
        let dirty = dirty.unwrap_or(source_bounds);
        if !source_bounds.contains_rect(&dirty) {
            trace!(?dirty, ?source_bounds, "paint rejected: dirty rect outside source");
            return false;
        }
        let target = dirty.translate(dest);
        if !Rect::from_size(surface_size).contains_rect(&target) {
            trace!(?target, "paint rejected: target region outside surface");
            return false;
        }
        if let Some(s) = self.surface_mut(surface) {
            s.queue.push(QueuedOp::Paint {
                source: image,
                dest,
                dirty,
            });
        }
        trace!(surface = surface.raw(), source = image.raw(), "queued paint");
        true
    }

    fn scroll(&mut self, surface: ResourceId, clip: Option<Rect>, delta: Point) -> bool {
        let Some(surface_size) = self.surface(surface).map(|s| s.size) else {
            return false;
        };
        let bounds = Rect::from_size(surface_size);
        let clip = clip.unwrap_or(bounds);
        if clip.is_empty() || !bounds.contains_rect(&clip) {
            trace!(?clip, "scroll rejected: bad clip");
            return false;
        }
        if !bounds.contains_rect(&clip.translate(delta)) {
            trace!(?clip, ?delta, "scroll rejected: destination outside surface");
            return false;
        }
        if let Some(s) = self.surface_mut(surface) {
            s.queue.push(QueuedOp::Scroll { clip, delta });
        }
        trace!(surface = surface.raw(), ?clip, ?delta, "queued scroll");
        true
    }

    fn replace_contents(&mut self, surface: ResourceId, image: ResourceId) -> bool {
        let Some(surface_size) = self.surface(surface).map(|s| s.size) else {
            return false;
        };
        let Some(image_size) = self.image(image).map(|img| img.grid.size()) else {
            return false;
        };
        if image_size != surface_size {
            trace!(?image_size, ?surface_size, "replace rejected: size mismatch");
            return false;
        }
        // Ownership transfer: the image resource is consumed here; its
        // handle is invalid from now on.
        let Some(Resource::Image(img)) = self.resources.remove(&image.raw()) else {
            return false;
        };
        if let Some(s) = self.surface_mut(surface) {
            s.queue.push(QueuedOp::Replace { pixels: img.grid });
        }
        debug!(
            surface = surface.raw(),
            consumed = image.raw(),
            "queued replace-contents"
        );
        true
    }

    fn flush(&mut self, surface: ResourceId, callback: Option<FlushCallback>) -> FlushStatus {
        let Some(s) = self.surface_mut(surface) else {
            return FlushStatus::BadResource;
        };
        let Some(callback) = callback else {
            trace!(surface = surface.raw(), "flush rejected: no callback");
            return FlushStatus::NoCallback;
        };
        if s.flush_pending {
            trace!(surface = surface.raw(), "flush rejected: already in flight");
            return FlushStatus::InProgress;
        }
        s.flush_pending = true;
        self.pending.push((surface.raw(), callback));
        debug!(surface = surface.raw(), "flush pending");
        FlushStatus::WouldBlock
    }

    fn read_back(&mut self, surface: ResourceId, image: ResourceId, origin: Point) -> bool {
        let Some(image_size) = self.image(image).map(|img| img.grid.size()) else {
            return false;
        };
        let snapshot = {
            let Some(s) = self.surface(surface) else {
                return false;
            };
            let wanted = Rect::at(origin, image_size);
            if wanted.is_empty() || !Rect::from_size(s.size).contains_rect(&wanted) {
                trace!(?wanted, "read-back rejected: region outside surface");
                return false;
            }
            s.front.crop(wanted)
        };
        if let Some(img) = self.image_mut(image) {
            img.grid
                .copy_rect_from(&snapshot, snapshot.bounds(), Point::ZERO);
        }
        true
    }

    fn take_ready_completions(&mut self) -> Vec<FlushCallback> {
        let pending = std::mem::take(&mut self.pending);
        let mut callbacks = Vec::with_capacity(pending.len());
        for (sid, callback) in pending {
            self.commit_surface(sid);
            if let Some(Resource::Surface(s)) = self.resources.get_mut(&sid) {
                s.flush_pending = false;
            }
            callbacks.push(callback);
        }
        callbacks
    }

    fn has_pending_flush(&self) -> bool {
        !self.pending.is_empty()
    }

    fn release(&mut self, id: ResourceId) {
        if self.resources.remove(&id.raw()).is_some() {
            trace!(id = id.raw(), "released resource");
        }
        // Abandon any pending flush tied to the released surface; its
        // callback will never fire.
        self.pending.retain(|(sid, _)| *sid != id.raw());
    }
}
