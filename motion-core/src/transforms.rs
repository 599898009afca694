//! Primitive per-frame transforms: `absdiff`, `threshold`, `downscale`,
//! `dilate`/`erode`, and `pad`. Each is a thin wrapper that either walks the
//! two buffers element-wise or drives [`crate::kernel::Kernel`] with a
//! postprocessing recipe; none of them allocate.

use crate::error::CoreError;
use crate::image::{PixelBuffer, PixelBufferMut, PixelGrid};
use crate::kernel::{structuring_element, Kernel};

fn require_same_shape(a: &dyn PixelGrid, b: &dyn PixelGrid, op: &'static str) {
    if a.width() != b.width() || a.height() != b.height() {
        CoreError::ShapeMismatch {
            operation: op,
            expected: (a.width(), a.height()),
            actual: (b.width(), b.height()),
        }
        .panic();
    }
}

/// Writes `|a[i] - b[i]|` into `dst` for every pixel. `dst` must share `a`
/// and `b`'s shape; `a` and `b` may be the same buffer (reads only).
pub fn absdiff(dst: &mut dyn PixelBufferMut, a: &dyn PixelBuffer, b: &dyn PixelBuffer) {
    require_same_shape(a, b, "absdiff");
    require_same_shape(a, dst, "absdiff");
    for (d, (x, y)) in dst
        .as_bytes_mut()
        .iter_mut()
        .zip(a.as_bytes().iter().zip(b.as_bytes().iter()))
    {
        *d = x.abs_diff(*y);
    }
}

/// Writes `0` for every pixel `<= t`, `255` otherwise. Each output only
/// depends on the co-located input pixel, so a caller holding a single
/// owned buffer can threshold it in place by reading bytes through
/// [`PixelBufferMut::as_bytes_mut`] directly instead of going through this
/// two-buffer signature.
pub fn threshold(dst: &mut dyn PixelBufferMut, src: &dyn PixelBuffer, t: u8) {
    require_same_shape(dst, src, "threshold");
    for (d, s) in dst.as_bytes_mut().iter_mut().zip(src.as_bytes().iter()) {
        *d = if *s <= t { 0 } else { 255 };
    }
}

/// Shrinks `src` by an integer `factor` in both dimensions, averaging each
/// `factor x factor` block of `src` into one pixel of `dst`. `dst`'s shape
/// must equal `src.width() / factor, src.height() / factor`; `src`'s
/// dimensions must be exact multiples of `factor`.
pub fn downscale(dst: &mut dyn PixelBufferMut, src: &dyn PixelGrid, factor: u32) {
    if factor == 0 {
        CoreError::InvalidConstruction {
            reason: "downscale factor must be > 0",
        }
        .panic();
    }
    if src.width() % factor != 0 || src.height() % factor != 0 {
        CoreError::InvalidConstruction {
            reason: "downscale factor must evenly divide both dimensions",
        }
        .panic();
    }
    let expected = (src.width() / factor, src.height() / factor);
    if (dst.width(), dst.height()) != expected {
        CoreError::ShapeMismatch {
            operation: "downscale",
            expected,
            actual: (dst.width(), dst.height()),
        }
        .panic();
    }
    let divisor = (factor * factor) as i32;
    let kernel = Kernel::<i32>::homogeneous(1, factor, factor, 0, 0, factor, factor);
    kernel.convolve(src, dst, 0, |acc| (acc / divisor) as u8);
}

/// Flat `granularity x granularity` dilation: every output pixel is `255`
/// if any pixel in its `granularity`-sized neighborhood is nonzero, else
/// `0`. `dst` must not alias `src` — the original implementation's
/// single-buffer overlap trick (see `JpegMotionDetector` in the lineage
/// this crate is built from) is deliberately not reproduced here; two
/// disjoint buffers are simpler and the spec leaves that optimization out
/// of scope.
pub fn dilate(dst: &mut dyn PixelBufferMut, src: &dyn PixelGrid, granularity: u32) {
    if granularity == 0 {
        CoreError::InvalidConstruction {
            reason: "dilation granularity must be > 0",
        }
        .panic();
    }
    require_same_shape(dst, src, "dilate");
    let anchor = granularity / 2;
    let kernel = Kernel::<i32>::homogeneous(1, granularity, granularity, anchor, anchor, 1, 1);
    kernel.convolve(src, dst, 0, |acc| if acc == 0 { 0 } else { 255 });
}

/// Dilation with the exact 13x13 round structuring element reproduced from
/// the original implementation's fixture data, rather than a flat square.
pub fn dilate_round_13x13(dst: &mut dyn PixelBufferMut, src: &dyn PixelGrid) {
    require_same_shape(dst, src, "dilate_round_13x13");
    let elements: Vec<i32> = structuring_element::ROUND_13X13.iter().map(|&b| b as i32).collect();
    let (ax, ay) = structuring_element::ROUND_13X13_ANCHOR;
    let kernel = Kernel::<i32>::heterogeneous(elements, 13, 13, ax, ay, 1, 1);
    kernel.convolve(src, dst, 0, |acc| if acc == 0 { 0 } else { 255 });
}

/// Erosion with the exact 13x13 round structuring element: an output pixel
/// stays `255` only if at least `120` of the `169` covered cells are `255`
/// (matching the `120 * max` postprocess threshold in the original fixture
/// data, where `max` here is the per-pixel `255` rather than `1`).
pub fn erode_round_13x13(dst: &mut dyn PixelBufferMut, src: &dyn PixelGrid) {
    require_same_shape(dst, src, "erode_round_13x13");
    let elements: Vec<i32> = structuring_element::ROUND_13X13.iter().map(|&b| b as i32).collect();
    let (ax, ay) = structuring_element::ROUND_13X13_ANCHOR;
    let kernel = Kernel::<i32>::heterogeneous(elements, 13, 13, ax, ay, 1, 1);
    let floor = 120 * 255;
    kernel.convolve(src, dst, 0, move |acc| if acc < floor { 0 } else { 255 });
}

/// Copies `src` into the center of `dst`, which must be exactly `2 * margin`
/// pixels larger in each dimension; the surrounding ring is filled with
/// `pad_value`.
pub fn pad(dst: &mut dyn PixelBufferMut, src: &dyn PixelGrid, margin: u32, pad_value: u8) {
    let expected = (src.width() + 2 * margin, src.height() + 2 * margin);
    if (dst.width(), dst.height()) != expected {
        CoreError::ShapeMismatch {
            operation: "pad",
            expected,
            actual: (dst.width(), dst.height()),
        }
        .panic();
    }
    for row in 0..dst.height() {
        for col in 0..dst.width() {
            let src_row = row as i64 - margin as i64;
            let src_col = col as i64 - margin as i64;
            dst.set(row, col, src.at_padded(src_row, src_col, pad_value));
        }
    }
}
