#![forbid(unsafe_code)]

//! Device-context conformance case.
//!
//! Exercises the full surface contract: handle validity, creation limits,
//! zero initialization, metadata, deferred paint/scroll/replace commits,
//! and flush completion semantics. Each scenario builds its own surfaces
//! and buffers and returns a diagnostic on the first broken expectation;
//! the case runner collects every outcome instead of aborting.

use std::time::Duration;

use tracing::{debug, warn};

use fcanvas_core::{Point, Rect, Size};
use fcanvas_surface::{
    Canvas, FlushCallback, FlushStatus, HostHandle, ImageData, LoopSignal, PixelFormat,
    ResourceId, run_message_loop,
};

use crate::case::{CaseReport, ScenarioResult, TestCase};

/// Registry name of this case.
pub const CASE_NAME: &str = "Canvas2D";

/// Upper bound on any single nested flush wait. Converts a completion that
/// never fires into a scenario failure instead of a hung run.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

type Scenario = fn(&mut Canvas2DCase) -> Result<(), String>;

/// Fixed execution order. Names are unique within the case.
const SCENARIOS: &[(&str, Scenario)] = &[
    ("InvalidResource", Canvas2DCase::invalid_resource),
    ("InvalidSize", Canvas2DCase::invalid_size),
    ("Humongous", Canvas2DCase::humongous),
    ("InitToZero", Canvas2DCase::init_to_zero),
    ("Describe", Canvas2DCase::describe),
    ("Paint", Canvas2DCase::paint),
    ("Scroll", Canvas2DCase::scroll),
    ("Replace", Canvas2DCase::replace),
    ("Flush", Canvas2DCase::flush),
];

/// The device-context conformance case.
pub struct Canvas2DCase {
    host: HostHandle,
}

impl Canvas2DCase {
    /// Bind the case to a host.
    pub fn new(host: HostHandle) -> Self {
        Self { host }
    }

    /// Registry factory.
    pub fn factory(host: HostHandle) -> Box<dyn TestCase> {
        Box::new(Self::new(host))
    }

    // --- Shared helpers ---

    /// Synchronous read-back of committed surface content into `image`,
    /// starting at `top_left` in surface coordinates.
    fn read_image(&self, canvas: &Canvas, image: &ImageData, top_left: Point) -> bool {
        self.host
            .borrow_mut()
            .read_back(canvas.id(), image.id(), top_left)
    }

    /// True when the whole committed surface reads back as `color`.
    fn is_uniform_color(&self, canvas: &Canvas, color: u32) -> bool {
        let readback = ImageData::create(&self.host, PixelFormat::BgraPremul, canvas.size(), false);
        if readback.is_null() {
            return false;
        }
        if !self.read_image(canvas, &readback, Point::ZERO) {
            return false;
        }
        is_square_in_image(&readback, color, Rect::from_size(readback.size()), color)
    }

    /// True when the committed surface is `square_color` inside `square`
    /// and `background` everywhere else.
    fn is_square_in_canvas(
        &self,
        canvas: &Canvas,
        background: u32,
        square: Rect,
        square_color: u32,
    ) -> bool {
        let readback = ImageData::create(&self.host, PixelFormat::BgraPremul, canvas.size(), false);
        if readback.is_null() {
            return false;
        }
        if !self.read_image(canvas, &readback, Point::ZERO) {
            return false;
        }
        is_square_in_image(&readback, background, square, square_color)
    }

    /// Flush and wait for the completion callback, bounded by
    /// [`FLUSH_TIMEOUT`].
    fn flush_and_wait(&self, canvas: &Canvas) -> Result<(), String> {
        let signal = LoopSignal::new();
        let callback: FlushCallback = {
            let signal = signal.clone();
            Box::new(move || signal.quit())
        };
        match canvas.flush(Some(callback)) {
            FlushStatus::Done => Ok(()),
            FlushStatus::WouldBlock => run_message_loop(&self.host, &signal, FLUSH_TIMEOUT)
                .map_err(|err| err.to_string()),
            status => Err(format!("flush rejected: {status:?}")),
        }
    }

    // --- Scenarios ---

    /// Every operation must reject a null handle or a handle of the wrong
    /// resource kind; any success here is a contract violation.
    fn invalid_resource(&mut self) -> Result<(), String> {
        let null_canvas = Canvas::null(&self.host);
        let image = ImageData::create(&self.host, PixelFormat::BgraPremul, Size::new(16, 16), true);
        if image.is_null() {
            return Err("failed to allocate the probe image".into());
        }

        let mut host = self.host.borrow_mut();

        // Describe.
        if host.describe(image.id()).is_some() {
            return Err("describe answered for an image handle".into());
        }
        if host.describe(null_canvas.id()).is_some() {
            return Err("describe answered for a null handle".into());
        }

        // Paint.
        if host.paint_image(image.id(), image.id(), Point::ZERO, None) {
            return Err("paint accepted an image handle as the surface".into());
        }
        if host.paint_image(ResourceId::NULL, image.id(), Point::ZERO, None) {
            return Err("paint accepted a null surface handle".into());
        }

        // Scroll.
        if host.scroll(image.id(), None, Point::new(0, 10)) {
            return Err("scroll accepted an image handle as the surface".into());
        }
        if host.scroll(ResourceId::NULL, None, Point::new(0, 10)) {
            return Err("scroll accepted a null surface handle".into());
        }

        // Replace contents.
        if host.replace_contents(image.id(), image.id()) {
            return Err("replace accepted an image handle as the surface".into());
        }
        if host.replace_contents(ResourceId::NULL, image.id()) {
            return Err("replace accepted a null surface handle".into());
        }

        // Flush.
        if host.flush(image.id(), Some(Box::new(|| {}))).accepted() {
            return Err("flush accepted an image handle as the surface".into());
        }
        if host
            .flush(ResourceId::NULL, Some(Box::new(|| {})))
            .accepted()
        {
            return Err("flush accepted a null surface handle".into());
        }

        // Read-back.
        if host.read_back(image.id(), image.id(), Point::ZERO) {
            return Err("read-back accepted an image handle as the surface".into());
        }
        if host.read_back(ResourceId::NULL, image.id(), Point::ZERO) {
            return Err("read-back accepted a null surface handle".into());
        }

        Ok(())
    }

    /// Zero and negative dimensions must never construct a surface.
    fn invalid_size(&mut self) -> Result<(), String> {
        let a = Canvas::create(&self.host, Size::new(16, 0), false);
        if !a.is_null() {
            return Err("zero height accepted".into());
        }

        let b = Canvas::create(&self.host, Size::new(0, 16), false);
        if !b.is_null() {
            return Err("zero width accepted".into());
        }

        // The safe Size wrapper clamps negatives away, so go through the
        // host entry point directly.
        let mut host = self.host.borrow_mut();
        if !host.create_surface(16, -16, false).is_null() {
            return Err("negative height accepted".into());
        }
        if !host.create_surface(-16, 16, false).is_null() {
            return Err("negative width accepted".into());
        }

        Ok(())
    }

    /// Resource limits: an extreme allocation must fail cleanly, not crash
    /// or hang.
    fn humongous(&mut self) -> Result<(), String> {
        let canvas = Canvas::create(&self.host, Size::new(100_000, 100_000), false);
        if !canvas.is_null() {
            return Err("a 100000x100000 surface was created".into());
        }
        Ok(())
    }

    /// A fresh surface reads back as all-zero pixels. The read-back target
    /// is pre-filled with a sentinel so a no-op read path cannot pass.
    fn init_to_zero(&mut self) -> Result<(), String> {
        let size = Size::new(15, 17);
        let canvas = Canvas::create(&self.host, size, false);
        if canvas.is_null() {
            return Err("failure creating a plain surface".into());
        }

        let image = ImageData::create(&self.host, PixelFormat::BgraPremul, size, true);
        if image.is_null() {
            return Err("failure allocating the read-back image".into());
        }
        fill_rect_in_image(&image, Rect::from_size(size), 0xFFFF_FFFF);

        if !self.read_image(&canvas, &image, Point::ZERO) {
            return Err("could not read back the fresh surface".into());
        }
        if !is_square_in_image(&image, 0, Rect::from_size(size), 0) {
            return Err("got a nonzero pixel from a fresh surface".into());
        }

        Ok(())
    }

    /// Metadata reports the exact creation dimensions and opacity hint.
    fn describe(&mut self) -> Result<(), String> {
        let size = Size::new(15, 17);
        let canvas = Canvas::create(&self.host, size, false);
        if canvas.is_null() {
            return Err("failure creating a plain surface".into());
        }

        let Some(info) = self.host.borrow().describe(canvas.id()) else {
            return Err("describe failed for a live surface".into());
        };
        if info.size != size || info.always_opaque {
            return Err(format!(
                "metadata mismatch: got {}x{} opaque={}",
                info.size.width(),
                info.size.height(),
                info.always_opaque
            ));
        }

        Ok(())
    }

    /// The core paint contract: deferred commit, dirty-rect validation,
    /// last-write-wins sources, offscreen placement via dirty rects, and
    /// strict-subset paints.
    fn paint(&mut self) -> Result<(), String> {
        let (w, h) = (15, 17);
        let canvas = Canvas::create(&self.host, Size::new(w, h), false);
        if canvas.is_null() {
            return Err("failure creating a plain surface".into());
        }

        if !self.is_uniform_color(&canvas, 0) {
            return Err("bad initial color".into());
        }

        // Fill the whole surface with white.
        const BACKGROUND: u32 = 0xFFFF_FFFF;
        let background =
            ImageData::create(&self.host, PixelFormat::BgraPremul, Size::new(w, h), false);
        if background.is_null() {
            return Err("failure allocating the background image".into());
        }
        fill_rect_in_image(&background, Rect::new(0, 0, w, h), BACKGROUND);
        if !canvas.paint_image(&background, Point::ZERO, None) {
            return Err("could not paint the background".into());
        }
        self.flush_and_wait(&canvas)
            .map_err(|err| format!("could not flush the background: {err}"))?;

        // A dirty rect outside the source bounds must be rejected.
        let (fill_w, fill_h) = (2, 3);
        let invalid_clip = ImageData::create(
            &self.host,
            PixelFormat::BgraPremul,
            Size::new(fill_w, fill_h),
            false,
        );
        if invalid_clip.is_null() {
            return Err("failure allocating the clip probe image".into());
        }
        if canvas.paint_image(
            &invalid_clip,
            Point::ZERO,
            Some(Rect::new(-1, 0, fill_w, fill_h)),
        ) {
            return Err("a dirty rect with a negative origin was accepted".into());
        }
        if canvas.paint_image(
            &invalid_clip,
            Point::ZERO,
            Some(Rect::new(0, 0, fill_w, fill_h + 1)),
        ) {
            return Err("an oversized dirty rect was accepted".into());
        }

        // Queue a small opaque-white paint.
        let fill = ImageData::create(
            &self.host,
            PixelFormat::BgraPremul,
            Size::new(fill_w, fill_h),
            true,
        );
        if fill.is_null() {
            return Err("failure allocating the fill image".into());
        }
        fill_rect_in_image(&fill, Rect::new(0, 0, fill_w, fill_h), BACKGROUND);
        let paint_at = Point::new(4, 5);
        if !canvas.paint_image(&fill, paint_at, None) {
            return Err("could not paint the fill image".into());
        }

        // Nothing may be observable before the flush.
        if !self.is_uniform_color(&canvas, BACKGROUND) {
            return Err("content changed before flush (or read-back failed)".into());
        }

        // The paint has not committed, so refilling the source changes what
        // lands: the later content wins, and it replaces rather than blends.
        const FILL: u32 = 0x8000_0080;
        fill_rect_in_image(&fill, Rect::new(0, 0, fill_w, fill_h), FILL);
        self.flush_and_wait(&canvas)
            .map_err(|err| format!("could not flush the refilled paint: {err}"))?;

        if !self.is_square_in_canvas(
            &canvas,
            BACKGROUND,
            Rect::new(paint_at.x, paint_at.y, fill_w, fill_h),
            FILL,
        ) {
            return Err("fill rectangle not committed correctly".into());
        }

        // Reset to white, then place the image partially off the surface.
        // Without a dirty rect that must fail; with an in-bounds dirty rect
        // it must succeed and commit only the sub-rectangle.
        if !canvas.paint_image(&background, Point::ZERO, None) {
            return Err("could not repaint the background".into());
        }
        let offscreen = Point::new(-1, -2);
        if canvas.paint_image(&fill, offscreen, None) {
            return Err("a paint reaching outside the surface was accepted".into());
        }
        if !canvas.paint_image(&fill, offscreen, Some(Rect::new(1, 2, 1, 1))) {
            return Err("an offscreen paint with an in-bounds dirty rect failed".into());
        }
        self.flush_and_wait(&canvas)
            .map_err(|err| format!("could not flush the offscreen paint: {err}"))?;

        // One pixel of the fill peeks out at the top-left corner.
        if !self.is_square_in_canvas(&canvas, BACKGROUND, Rect::new(0, 0, 1, 1), FILL) {
            return Err("partially offscreen paint committed incorrectly".into());
        }

        // Repaint that pixel from a strict sub-rectangle of a larger image.
        let subset = ImageData::create(&self.host, PixelFormat::BgraPremul, Size::new(w, h), false);
        if subset.is_null() {
            return Err("failure allocating the subset image".into());
        }
        const SUBSET: u32 = 0x8080_8080;
        let subset_at = Point::new(2, 1);
        subset.set_pixel(subset_at, SUBSET);
        if !canvas.paint_image(
            &subset,
            Point::new(-subset_at.x, -subset_at.y),
            Some(Rect::at(subset_at, Size::new(1, 1))),
        ) {
            return Err("could not paint the subset".into());
        }
        self.flush_and_wait(&canvas)
            .map_err(|err| format!("could not flush the subset paint: {err}"))?;
        if !self.is_square_in_canvas(&canvas, BACKGROUND, Rect::new(0, 0, 1, 1), SUBSET) {
            return Err("subset paint committed incorrectly".into());
        }

        Ok(())
    }

    /// Scroll contract: exact intra-surface blits for disjoint and
    /// overlapping destinations; out-of-bounds destinations rejected with
    /// no partial effect.
    fn scroll(&mut self) -> Result<(), String> {
        let (w, h) = (115, 117);
        let canvas = Canvas::create(&self.host, Size::new(w, h), false);
        if canvas.is_null() {
            return Err("failure creating a plain surface".into());
        }

        if !self.is_uniform_color(&canvas, 0) {
            return Err("bad initial color".into());
        }

        let (image_w, image_h) = (15, 23);
        let test_image = ImageData::create(
            &self.host,
            PixelFormat::BgraPremul,
            Size::new(image_w, image_h),
            false,
        );
        if test_image.is_null() {
            return Err("failure allocating the gradient image".into());
        }
        fill_image_with_gradient(&test_image);

        let (mut image_x, mut image_y) = (51, 72);
        if !canvas.paint_image(&test_image, Point::new(image_x, image_y), None) {
            return Err("could not paint the gradient image".into());
        }
        self.flush_and_wait(&canvas)
            .map_err(|err| format!("could not flush the gradient paint: {err}"))?;

        // Scroll to a disjoint free space.
        let (mut dx, mut dy) = (-40, -48);
        let mut clip = Rect::new(image_x, image_y, image_w, image_h);
        if !canvas.scroll(clip, Point::new(dx, dy)) {
            return Err("could not scroll to a free space".into());
        }
        self.flush_and_wait(&canvas)
            .map_err(|err| format!("could not flush the disjoint scroll: {err}"))?;
        image_x += dx;
        image_y += dy;

        let readback = ImageData::create(
            &self.host,
            PixelFormat::BgraPremul,
            Size::new(image_w, image_h),
            false,
        );
        if readback.is_null() {
            return Err("failure allocating the read-back image".into());
        }
        if !self.read_image(&canvas, &readback, Point::new(image_x, image_y)) {
            return Err("could not read back after the disjoint scroll".into());
        }
        if !compare_images(&test_image, &readback) {
            return Err("disjoint scroll did not preserve the image".into());
        }

        // Scroll to an overlapping space.
        dx = 6;
        dy = 9;
        clip = Rect::new(image_x, image_y, image_w, image_h);
        if !canvas.scroll(clip, Point::new(dx, dy)) {
            return Err("could not scroll to an overlapping space".into());
        }
        self.flush_and_wait(&canvas)
            .map_err(|err| format!("could not flush the overlapping scroll: {err}"))?;
        image_x += dx;
        image_y += dy;

        if !self.read_image(&canvas, &readback, Point::new(image_x, image_y)) {
            return Err("could not read back after the overlapping scroll".into());
        }
        if !compare_images(&test_image, &readback) {
            return Err("overlapping scroll did not preserve the image".into());
        }

        // A destination partially outside the surface must be rejected.
        dx = -image_x - 5;
        dy = -image_y - 7;
        clip = Rect::new(image_x, image_y, image_w, image_h);
        if canvas.scroll(clip, Point::new(dx, dy)) {
            return Err("a scroll partially outside the surface was accepted".into());
        }

        // A destination completely outside the surface must be rejected.
        clip = Rect::new(0, 0, -image_x - dx, -image_y - dy);
        if canvas.scroll(clip, Point::new(dx, dy)) {
            return Err("a scroll completely outside the surface was accepted".into());
        }

        Ok(())
    }

    /// Replace-contents contract: exact-size requirement, deferred commit,
    /// and ownership transfer that invalidates the caller's buffer.
    fn replace(&mut self) -> Result<(), String> {
        let (w, h) = (15, 17);
        let canvas = Canvas::create(&self.host, Size::new(w, h), false);
        if canvas.is_null() {
            return Err("failure creating a plain surface".into());
        }

        // A replacement of mismatched size is rejected and leaves the
        // buffer untouched.
        let mut weird_size =
            ImageData::create(&self.host, PixelFormat::BgraPremul, Size::new(w - 1, h), true);
        if weird_size.is_null() {
            return Err("failure allocating the odd-sized image".into());
        }
        if canvas.replace_contents(&mut weird_size) {
            return Err("replace accepted a mismatched size".into());
        }
        if weird_size.is_null() || weird_size.size() != Size::new(w - 1, h) {
            return Err("a failed replace disturbed the image".into());
        }

        // Paint blue but do not flush.
        const PAINTED: u32 = 0xFF00_00FF;
        let background =
            ImageData::create(&self.host, PixelFormat::BgraPremul, Size::new(w, h), true);
        if background.is_null() {
            return Err("failure allocating the background image".into());
        }
        fill_rect_in_image(&background, Rect::new(0, 0, w, h), PAINTED);
        if !canvas.paint_image(&background, Point::ZERO, None) {
            return Err("could not paint the background".into());
        }

        // Replace with green, also without flushing.
        const SWAPPED: u32 = 0xFF00_FF00;
        let mut swapped =
            ImageData::create(&self.host, PixelFormat::BgraPremul, Size::new(w, h), true);
        if swapped.is_null() {
            return Err("failure allocating the replacement image".into());
        }
        fill_rect_in_image(&swapped, Rect::new(0, 0, w, h), SWAPPED);
        if !canvas.replace_contents(&mut swapped) {
            return Err("could not replace the surface contents".into());
        }

        // Still nothing committed.
        if !self.is_uniform_color(&canvas, 0) {
            return Err("content changed before flush (or read-back failed)".into());
        }

        // Ownership moved to the surface: the wrapper reports empty.
        if !swapped.id().is_null() || swapped.size() != Size::ZERO || swapped.byte_len() != 0 {
            return Err("the consumed image should report as empty".into());
        }

        // Painting with the consumed image must fail.
        if canvas.paint_image(&swapped, Point::ZERO, None) {
            return Err("painting with the consumed image succeeded".into());
        }

        self.flush_and_wait(&canvas)
            .map_err(|err| format!("could not flush the replace: {err}"))?;

        // The queued paint was superseded by the replacement.
        if !self.is_uniform_color(&canvas, SWAPPED) {
            return Err("replacement content not visible after flush".into());
        }

        Ok(())
    }

    /// Flush contract: no blocking waits on the loop thread, completion for
    /// empty queues, and one flush in flight at a time.
    fn flush(&mut self) -> Result<(), String> {
        let size = Size::new(15, 17);
        let canvas = Canvas::create(&self.host, size, false);
        if canvas.is_null() {
            return Err("failure creating a plain surface".into());
        }

        let background = ImageData::create(&self.host, PixelFormat::BgraPremul, size, true);
        if background.is_null() {
            return Err("failure allocating the background image".into());
        }
        if !canvas.paint_image(&background, Point::ZERO, None) {
            return Err("could not paint the background".into());
        }

        // A flush with no completion callback cannot block the thread that
        // owns the surface's loop, so it must fail synchronously.
        if canvas.flush(None).accepted() {
            return Err("a flush without a callback was accepted on the loop thread".into());
        }

        // A flush with zero queued operations must still complete.
        let quiet = Canvas::create(&self.host, size, false);
        if quiet.is_null() {
            return Err("failure creating the no-op surface".into());
        }
        self.flush_and_wait(&quiet)
            .map_err(|err| format!("a flush with no queued operations did not complete: {err}"))?;

        // Only one flush may be in flight per surface.
        let first = quiet.flush(Some(Box::new(|| {})));
        if !first.accepted() {
            return Err("could not start the first of two flushes".into());
        }
        if first == FlushStatus::WouldBlock {
            let second = quiet.flush(Some(Box::new(|| {})));
            if second.accepted() {
                return Err("a second flush was accepted before the first completed".into());
            }
        }

        Ok(())
    }
}

impl TestCase for Canvas2DCase {
    fn name(&self) -> &'static str {
        CASE_NAME
    }

    fn init(&mut self) -> Result<(), String> {
        // Probe for the read-back test capability; without it no scenario
        // can verify anything.
        let canvas = Canvas::create(&self.host, Size::new(1, 1), false);
        let image = ImageData::create(&self.host, PixelFormat::BgraPremul, Size::new(1, 1), true);
        if canvas.is_null() || image.is_null() {
            return Err("host could not allocate probe resources".into());
        }
        if !self.read_image(&canvas, &image, Point::ZERO) {
            return Err("host does not provide the read-back test capability".into());
        }
        Ok(())
    }

    fn run(&mut self) -> CaseReport {
        let mut report = CaseReport::new(CASE_NAME);
        for (name, scenario) in SCENARIOS {
            debug!(scenario = name, "running scenario");
            let outcome = scenario(self);
            if let Err(message) = &outcome {
                warn!(scenario = name, message = %message, "scenario failed");
            }
            report
                .scenarios
                .push(ScenarioResult::from_outcome(name, outcome));
        }
        report
    }
}

// --- Image helpers ---

/// Fill a rectangle of `image` with `color`. Out-of-bounds pixels are
/// skipped, matching per-pixel addressing.
fn fill_rect_in_image(image: &ImageData, rect: Rect, color: u32) {
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            image.set_pixel(Point::new(x, y), color);
        }
    }
}

/// Fill `image` with a position-dependent gradient so every pixel is
/// distinguishable under blits.
fn fill_image_with_gradient(image: &ImageData) {
    let size = image.size();
    for y in 0..size.height() {
        let red = ((y * 256) / size.height()) as u32 & 0xFF;
        for x in 0..size.width() {
            let green = ((x * 256) / size.width()) as u32 & 0xFF;
            let blue = (red + green) / 2 & 0xFF;
            image.set_pixel(Point::new(x, y), (blue << 24) | (green << 16) | (red << 8));
        }
    }
}

/// Compare `rc1` of `image1` against `rc2` of `image2`, pixel-exact.
fn compare_image_rect(image1: &ImageData, rc1: Rect, image2: &ImageData, rc2: Rect) -> bool {
    if rc1.width != rc2.width || rc1.height != rc2.height {
        return false;
    }
    for y in 0..rc1.height {
        for x in 0..rc1.width {
            let a = image1.pixel(Point::new(rc1.x + x, rc1.y + y));
            let b = image2.pixel(Point::new(rc2.x + x, rc2.y + y));
            if a.is_none() || a != b {
                return false;
            }
        }
    }
    true
}

/// Compare two whole images, pixel-exact.
fn compare_images(image1: &ImageData, image2: &ImageData) -> bool {
    compare_image_rect(
        image1,
        Rect::from_size(image1.size()),
        image2,
        Rect::from_size(image2.size()),
    )
}

/// True when `image` is `square_color` inside `square` and `background`
/// everywhere else.
fn is_square_in_image(image: &ImageData, background: u32, square: Rect, square_color: u32) -> bool {
    let size = image.size();
    for y in 0..size.height() {
        for x in 0..size.width() {
            let expected = if square.contains(x, y) {
                square_color
            } else {
                background
            };
            if image.pixel(Point::new(x, y)) != Some(expected) {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcanvas_surface::FakeHost;

    fn case() -> Canvas2DCase {
        Canvas2DCase::new(FakeHost::new().into_handle())
    }

    #[test]
    fn init_probe_succeeds_against_fake() {
        assert_eq!(case().init(), Ok(()));
    }

    // Each scenario gets its own test so a contract regression names the
    // scenario directly in the test output.

    #[test]
    fn invalid_resource_passes() {
        assert_eq!(case().invalid_resource(), Ok(()));
    }

    #[test]
    fn invalid_size_passes() {
        assert_eq!(case().invalid_size(), Ok(()));
    }

    #[test]
    fn humongous_passes() {
        assert_eq!(case().humongous(), Ok(()));
    }

    #[test]
    fn init_to_zero_passes() {
        assert_eq!(case().init_to_zero(), Ok(()));
    }

    #[test]
    fn describe_passes() {
        assert_eq!(case().describe(), Ok(()));
    }

    #[test]
    fn paint_passes() {
        assert_eq!(case().paint(), Ok(()));
    }

    #[test]
    fn scroll_passes() {
        assert_eq!(case().scroll(), Ok(()));
    }

    #[test]
    fn replace_passes() {
        assert_eq!(case().replace(), Ok(()));
    }

    #[test]
    fn flush_passes() {
        assert_eq!(case().flush(), Ok(()));
    }

    #[test]
    fn run_reports_every_scenario_in_order() {
        let mut c = case();
        assert_eq!(c.init(), Ok(()));
        let report = c.run();
        let names: Vec<_> = report.scenarios.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "InvalidResource",
                "InvalidSize",
                "Humongous",
                "InitToZero",
                "Describe",
                "Paint",
                "Scroll",
                "Replace",
                "Flush",
            ]
        );
        assert!(report.passed(), "failures: {:?}", report.failures().collect::<Vec<_>>());
    }

    // --- Helper sanity ---

    #[test]
    fn gradient_pixels_are_position_dependent() {
        let host = FakeHost::new().into_handle();
        let image = ImageData::create(&host, PixelFormat::BgraPremul, Size::new(15, 23), false);
        fill_image_with_gradient(&image);
        assert_ne!(
            image.pixel(Point::new(0, 0)),
            image.pixel(Point::new(14, 22))
        );
        assert!(compare_images(&image, &image));
    }

    #[test]
    fn is_square_in_image_detects_mismatch() {
        let host = FakeHost::new().into_handle();
        let image = ImageData::create(&host, PixelFormat::BgraPremul, Size::new(4, 4), true);
        fill_rect_in_image(&image, Rect::new(1, 1, 2, 2), 7);
        assert!(is_square_in_image(&image, 0, Rect::new(1, 1, 2, 2), 7));
        assert!(!is_square_in_image(&image, 0, Rect::new(0, 0, 2, 2), 7));
    }
}
