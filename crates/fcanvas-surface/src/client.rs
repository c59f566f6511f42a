#![forbid(unsafe_code)]

//! Client-side wrappers over the host capability set.
//!
//! `ImageData` and `Canvas` are the safe layer a plugin would use: they
//! hold a shared host handle plus a resource id, clamp sizes on the way in,
//! release their resource on drop, and reset themselves when ownership
//! transfers to the host (replace-contents).
//!
//! A wrapper can be *null*: construction failures hand back a wrapper whose
//! id is [`ResourceId::NULL`] rather than an error, mirroring the
//! handle-or-null host contract. Every operation on a null wrapper fails by
//! value, which is exactly what the conformance suite pokes at.

use std::rc::Rc;

use fcanvas_core::{Point, Rect, Size};

use crate::host::{FlushCallback, FlushStatus, HostHandle, ResourceId, SurfaceInfo};
use crate::pixels::PixelFormat;

/// An owned pixel buffer resource.
pub struct ImageData {
    host: HostHandle,
    id: ResourceId,
}

impl ImageData {
    /// Allocate a buffer. The returned wrapper is null when the host
    /// rejects the dimensions.
    pub fn create(host: &HostHandle, format: PixelFormat, size: Size, zero_init: bool) -> Self {
        let id = host
            .borrow_mut()
            .create_image(format, size.width(), size.height(), zero_init);
        Self {
            host: Rc::clone(host),
            id,
        }
    }

    /// A wrapper holding no resource.
    pub fn null(host: &HostHandle) -> Self {
        Self {
            host: Rc::clone(host),
            id: ResourceId::NULL,
        }
    }

    /// The underlying resource handle.
    #[inline]
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// True when no resource is held.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.id.is_null()
    }

    /// Buffer dimensions; `Size::ZERO` once the handle is invalid.
    pub fn size(&self) -> Size {
        self.host
            .borrow()
            .image_info(self.id)
            .map(|info| info.size)
            .unwrap_or(Size::ZERO)
    }

    /// Row byte length; zero once the handle is invalid.
    pub fn stride_bytes(&self) -> usize {
        self.host
            .borrow()
            .image_info(self.id)
            .map(|info| info.stride_bytes)
            .unwrap_or(0)
    }

    /// Total pixel data length in bytes; zero once the handle is invalid.
    pub fn byte_len(&self) -> usize {
        self.host
            .borrow()
            .image_info(self.id)
            .map(|info| info.stride_bytes * info.size.height() as usize)
            .unwrap_or(0)
    }

    /// Read one pixel.
    pub fn pixel(&self, at: Point) -> Option<u32> {
        self.host.borrow().image_pixel(self.id, at)
    }

    /// Write one pixel.
    pub fn set_pixel(&self, at: Point, value: u32) -> bool {
        self.host.borrow_mut().set_image_pixel(self.id, at, value)
    }

    /// Forget the resource without releasing it: ownership moved to the
    /// host. The wrapper reports null/zero from here on.
    pub(crate) fn detach(&mut self) {
        self.id = ResourceId::NULL;
    }
}

impl Drop for ImageData {
    fn drop(&mut self) {
        if !self.id.is_null() {
            self.host.borrow_mut().release(self.id);
        }
    }
}

/// An owned device-context surface resource.
pub struct Canvas {
    host: HostHandle,
    id: ResourceId,
}

impl Canvas {
    /// Create a surface. The returned wrapper is null when the host rejects
    /// the dimensions.
    pub fn create(host: &HostHandle, size: Size, always_opaque: bool) -> Self {
        let id = host
            .borrow_mut()
            .create_surface(size.width(), size.height(), always_opaque);
        Self {
            host: Rc::clone(host),
            id,
        }
    }

    /// A wrapper holding no resource.
    pub fn null(host: &HostHandle) -> Self {
        Self {
            host: Rc::clone(host),
            id: ResourceId::NULL,
        }
    }

    /// The underlying resource handle.
    #[inline]
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// True when no resource is held.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.id.is_null()
    }

    /// Surface metadata, or `None` when the handle is invalid.
    pub fn describe(&self) -> Option<SurfaceInfo> {
        self.host.borrow().describe(self.id)
    }

    /// Surface dimensions; `Size::ZERO` when the handle is invalid.
    pub fn size(&self) -> Size {
        self.describe().map(|info| info.size).unwrap_or(Size::ZERO)
    }

    /// Queue a paint of `image` at `dest`, optionally restricted to a dirty
    /// sub-rectangle of the source.
    pub fn paint_image(&self, image: &ImageData, dest: Point, dirty: Option<Rect>) -> bool {
        self.host
            .borrow_mut()
            .paint_image(self.id, image.id(), dest, dirty)
    }

    /// Queue an intra-surface blit of `clip` by `delta`.
    pub fn scroll(&self, clip: Rect, delta: Point) -> bool {
        self.host.borrow_mut().scroll(self.id, Some(clip), delta)
    }

    /// Queue a whole-buffer swap. On success the image's resource transfers
    /// to the surface and the wrapper resets to null/zero.
    pub fn replace_contents(&self, image: &mut ImageData) -> bool {
        let ok = self
            .host
            .borrow_mut()
            .replace_contents(self.id, image.id());
        if ok {
            image.detach();
        }
        ok
    }

    /// Request a commit of all queued operations.
    pub fn flush(&self, callback: Option<FlushCallback>) -> FlushStatus {
        self.host.borrow_mut().flush(self.id, callback)
    }
}

impl Drop for Canvas {
    fn drop(&mut self) {
        if !self.id.is_null() {
            self.host.borrow_mut().release(self.id);
        }
    }
}
