//! Fixed-size grayscale pixel buffers.
//!
//! [`ImageView`] / [`ImageViewMut`] are thin, non-owning views over an
//! existing byte buffer; [`StaticImage`] owns a buffer sized once at
//! construction (`W * H` bytes, zeroed) and never reallocated. All three
//! share the [`PixelGrid`] read contract, with caller-checked `at` and a
//! padded variant ([`PixelGrid::at_padded`]) that is the only sanctioned
//! out-of-bounds read in this crate.

use crate::error::CoreError;

/// Read-only access to a `width x height` grid of grayscale bytes in
/// row-major order.
pub trait PixelGrid {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Reads the pixel at `(row, col)`. The caller must ensure
    /// `row < height()` and `col < width()` — this is the "caller-checked"
    /// access point; out-of-range coordinates panic via the underlying
    /// slice index, which is the intended "surfaced loudly" behavior for a
    /// precondition violation.
    fn at(&self, row: u32, col: u32) -> u8;

    /// Reads `(row, col)` for any `(row, col) in Z^2`, returning `pad_value`
    /// when the coordinate falls outside `[0, height) x [0, width)`. This is
    /// the only sanctioned out-of-bounds read.
    fn at_padded(&self, row: i64, col: i64, pad_value: u8) -> u8 {
        if row < 0 || col < 0 || row >= self.height() as i64 || col >= self.width() as i64 {
            pad_value
        } else {
            self.at(row as u32, col as u32)
        }
    }
}

/// A [`PixelGrid`] backed by one contiguous, row-major byte slice.
///
/// Implemented by every owning/borrowing pixel buffer in this crate so that
/// whole-buffer operations (deep copy, `absdiff`, `threshold`) can work over
/// the flat byte slice rather than pixel-by-pixel through [`PixelGrid::at`].
pub trait PixelBuffer: PixelGrid {
    fn as_bytes(&self) -> &[u8];
}

/// The mutable counterpart of [`PixelBuffer`].
pub trait PixelBufferMut: PixelBuffer {
    fn as_bytes_mut(&mut self) -> &mut [u8];

    /// Writes the pixel at `(row, col)`, caller-checked like [`PixelGrid::at`].
    fn set(&mut self, row: u32, col: u32, value: u8) {
        let width = self.width();
        self.as_bytes_mut()[(row * width + col) as usize] = value;
    }

    /// Deep, byte-for-byte copy from `src` into `self`. Panics if the two
    /// buffers' shapes differ — copy-assignment between differently shaped
    /// images is a precondition violation, never a silent truncation.
    fn copy_from(&mut self, src: &dyn PixelBuffer) {
        if self.width() != src.width() || self.height() != src.height() {
            CoreError::ShapeMismatch {
                operation: "copy_from",
                expected: (self.width(), self.height()),
                actual: (src.width(), src.height()),
            }
            .panic();
        }
        self.as_bytes_mut().copy_from_slice(src.as_bytes());
    }
}

fn check_dims(width: u32, height: u32, data_len: usize, op: &'static str) {
    if width == 0 || height == 0 {
        CoreError::InvalidConstruction {
            reason: "width and height must both be > 0",
        }
        .panic();
    }
    let required = width as usize * height as usize;
    if data_len < required {
        CoreError::ShapeMismatch {
            operation: op,
            expected: (width, height),
            actual: (width, (data_len / width.max(1) as usize) as u32),
        }
        .panic();
    }
}

/// A borrowed, read-only view over `width * height` contiguous bytes.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> ImageView<'a> {
    /// Wraps `data` as a `width x height` grayscale view.
    ///
    /// Panics if `width == 0`, `height == 0`, or `data` is shorter than
    /// `width * height` bytes.
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Self {
        check_dims(width, height, data.len(), "ImageView::new");
        Self {
            data,
            width,
            height,
        }
    }
}

impl PixelGrid for ImageView<'_> {
    fn width(&self) -> u32 {
        self.width
    }
    fn height(&self) -> u32 {
        self.height
    }
    fn at(&self, row: u32, col: u32) -> u8 {
        self.data[(row * self.width + col) as usize]
    }
}

impl PixelBuffer for ImageView<'_> {
    fn as_bytes(&self) -> &[u8] {
        self.data
    }
}

/// A borrowed, mutable view over `width * height` contiguous bytes.
pub struct ImageViewMut<'a> {
    data: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> ImageViewMut<'a> {
    /// Wraps `data` as a mutable `width x height` grayscale view.
    ///
    /// Panics under the same conditions as [`ImageView::new`].
    pub fn new(data: &'a mut [u8], width: u32, height: u32) -> Self {
        check_dims(width, height, data.len(), "ImageViewMut::new");
        Self {
            data,
            width,
            height,
        }
    }

    pub fn as_view(&self) -> ImageView<'_> {
        ImageView {
            data: self.data,
            width: self.width,
            height: self.height,
        }
    }
}

impl PixelGrid for ImageViewMut<'_> {
    fn width(&self) -> u32 {
        self.width
    }
    fn height(&self) -> u32 {
        self.height
    }
    fn at(&self, row: u32, col: u32) -> u8 {
        self.data[(row * self.width + col) as usize]
    }
}

impl PixelBuffer for ImageViewMut<'_> {
    fn as_bytes(&self) -> &[u8] {
        self.data
    }
}

impl PixelBufferMut for ImageViewMut<'_> {
    fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.data
    }
}

/// An owning `width x height` grayscale buffer, allocated once at
/// construction and zeroed. `W` and `H` are compile-time constants so
/// `StaticImage<640, 480>` and `StaticImage<320, 240>` are distinct types;
/// storage is a boxed slice (heap-allocated once, never resized) rather
/// than a true stack array, since `[u8; W * H]` is not expressible with
/// stable const generics — the allocate-once, reuse-forever discipline is
/// what the spec actually requires, not literal stack storage.
#[derive(Debug, Clone)]
pub struct StaticImage<const W: usize, const H: usize> {
    data: Box<[u8]>,
}

impl<const W: usize, const H: usize> Default for StaticImage<W, H> {
    fn default() -> Self {
        assert!(W > 0 && H > 0, "StaticImage dimensions must both be > 0");
        Self {
            data: vec![0u8; W * H].into_boxed_slice(),
        }
    }
}

impl<const W: usize, const H: usize> StaticImage<W, H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> ImageView<'_> {
        ImageView::new(&self.data, W as u32, H as u32)
    }

    pub fn view_mut(&mut self) -> ImageViewMut<'_> {
        ImageViewMut::new(&mut self.data, W as u32, H as u32)
    }
}

impl<const W: usize, const H: usize> PixelGrid for StaticImage<W, H> {
    fn width(&self) -> u32 {
        W as u32
    }
    fn height(&self) -> u32 {
        H as u32
    }
    fn at(&self, row: u32, col: u32) -> u8 {
        self.data[(row * W as u32 + col) as usize]
    }
}

impl<const W: usize, const H: usize> PixelBuffer for StaticImage<W, H> {
    fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl<const W: usize, const H: usize> PixelBufferMut for StaticImage<W, H> {
    fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
