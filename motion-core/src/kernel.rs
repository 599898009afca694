//! 2D convolution engine: heterogeneous and homogeneous kernels applied to a
//! [`PixelGrid`] with configurable anchor, stride, and a postprocessing
//! callable mapping the accumulator to an output byte.

use crate::error::CoreError;
use crate::image::{PixelBufferMut, PixelGrid};

/// Shared geometry for both kernel variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct KernelShape {
    width: u32,
    height: u32,
    anchor_x: u32,
    anchor_y: u32,
    stride_x: u32,
    stride_y: u32,
}

impl KernelShape {
    fn new(width: u32, height: u32, anchor_x: u32, anchor_y: u32, stride_x: u32, stride_y: u32) -> Self {
        if anchor_x >= width || anchor_y >= height {
            CoreError::InvalidKernel {
                reason: "anchor must lie within the kernel",
            }
            .panic();
        }
        if stride_x == 0 || stride_y == 0 {
            CoreError::InvalidKernel {
                reason: "stride must be >= 1",
            }
            .panic();
        }
        Self {
            width,
            height,
            anchor_x,
            anchor_y,
            stride_x,
            stride_y,
        }
    }
}

/// A 2D kernel applied at every destination cell via [`Kernel::convolve`].
///
/// `Heterogeneous` stamps by multiplying each kernel cell against the
/// overlaid image cell; `Homogeneous` degenerates that into summing the
/// overlaid cells once and multiplying by the single repeating element,
/// which is both cheaper and exactly equivalent when every kernel cell
/// shares the same weight (the flat structuring elements used for
/// dilation, and the box filter used for downscaling).
pub enum Kernel<T> {
    Heterogeneous { shape_: KernelShapeHandle, elements: Vec<T> },
    Homogeneous { shape_: KernelShapeHandle, element: T },
}

/// Opaque handle so the shape validation lives in one place regardless of
/// which `Kernel` variant is constructed.
#[derive(Debug, Clone, Copy)]
pub struct KernelShapeHandle(KernelShape);

impl<T: Copy + Default + std::ops::Add<Output = T> + std::ops::Mul<Output = T> + From<u8>> Kernel<T> {
    /// Builds a heterogeneous kernel. `elements` must have exactly
    /// `width * height` entries in row-major order.
    ///
    /// Panics if `anchor_x >= width`, `anchor_y >= height`, or either
    /// stride is `0` — these are construction-time precondition
    /// violations per the design's error taxonomy.
    pub fn heterogeneous(
        elements: Vec<T>,
        width: u32,
        height: u32,
        anchor_x: u32,
        anchor_y: u32,
        stride_x: u32,
        stride_y: u32,
    ) -> Self {
        assert_eq!(
            elements.len(),
            (width * height) as usize,
            "kernel element count must equal width * height"
        );
        let shape = KernelShape::new(width, height, anchor_x, anchor_y, stride_x, stride_y);
        Kernel::Heterogeneous {
            shape_: KernelShapeHandle(shape),
            elements,
        }
    }

    /// Builds a kernel whose every cell shares the same weight `element`.
    pub fn homogeneous(
        element: T,
        width: u32,
        height: u32,
        anchor_x: u32,
        anchor_y: u32,
        stride_x: u32,
        stride_y: u32,
    ) -> Self {
        let shape = KernelShape::new(width, height, anchor_x, anchor_y, stride_x, stride_y);
        Kernel::Homogeneous {
            shape_: KernelShapeHandle(shape),
            element,
        }
    }

    fn shape(&self) -> KernelShape {
        match self {
            Kernel::Heterogeneous { shape_, .. } => shape_.0,
            Kernel::Homogeneous { shape_, .. } => shape_.0,
        }
    }

    fn stamp(&self, src: &dyn PixelGrid, src_row: i64, src_col: i64, pad_value: u8) -> T {
        let shape = self.shape();
        match self {
            Kernel::Heterogeneous { elements, .. } => {
                let mut acc = T::default();
                let mut idx = 0usize;
                for kr in 0..shape.height {
                    let row = src_row - shape.anchor_y as i64 + kr as i64;
                    for kc in 0..shape.width {
                        let col = src_col - shape.anchor_x as i64 + kc as i64;
                        let pixel = src.at_padded(row, col, pad_value);
                        acc = acc + elements[idx] * T::from(pixel);
                        idx += 1;
                    }
                }
                acc
            }
            Kernel::Homogeneous { element, .. } => {
                let mut sum = T::default();
                for kr in 0..shape.height {
                    let row = src_row - shape.anchor_y as i64 + kr as i64;
                    for kc in 0..shape.width {
                        let col = src_col - shape.anchor_x as i64 + kc as i64;
                        let pixel = src.at_padded(row, col, pad_value);
                        sum = sum + T::from(pixel);
                    }
                }
                sum * *element
            }
        }
    }

    /// Applies this kernel over `src`, writing `postprocess(stamp)` into
    /// every cell of `dst`. The destination's shape is chosen by the
    /// caller and determines how far the convolution proceeds; reads past
    /// the edges of `src` go through [`crate::image::PixelGrid::at_padded`]
    /// with `pad_value`, never an out-of-bounds read.
    pub fn convolve(
        &self,
        src: &dyn PixelGrid,
        dst: &mut dyn PixelBufferMut,
        pad_value: u8,
        postprocess: impl Fn(T) -> u8,
    ) {
        let shape = self.shape();
        for dst_row in 0..dst.height() {
            let src_row = dst_row as i64 * shape.stride_y as i64;
            for dst_col in 0..dst.width() {
                let src_col = dst_col as i64 * shape.stride_x as i64;
                let acc = self.stamp(src, src_row, src_col, pad_value);
                dst.set(dst_row, dst_col, postprocess(acc));
            }
        }
    }
}

/// Structuring elements reproduced verbatim from the original
/// implementation's fixture data (`examples/original_source/src/filters.h`)
/// since the spec leaves the exact disk-approximation bitmap to "whatever
/// the test fixtures use".
pub mod structuring_element {
    /// A 13x13 mask approximating a disk, anchor (6, 6). `1` = inside the
    /// disk, `0` = outside. Row-major.
    #[rustfmt::skip]
    pub const ROUND_13X13: [u8; 169] = [
        0,0,0,0,0,1,1,1,0,0,0,0,0,
        0,0,0,1,1,1,1,1,1,1,0,0,0,
        0,0,1,1,1,1,1,1,1,1,1,0,0,
        0,1,1,1,1,1,1,1,1,1,1,1,0,
        0,1,1,1,1,1,1,1,1,1,1,1,0,
        1,1,1,1,1,1,1,1,1,1,1,1,1,
        1,1,1,1,1,1,1,1,1,1,1,1,1,
        1,1,1,1,1,1,1,1,1,1,1,1,1,
        0,1,1,1,1,1,1,1,1,1,1,1,0,
        0,1,1,1,1,1,1,1,1,1,1,1,0,
        0,0,1,1,1,1,1,1,1,1,1,0,0,
        0,0,0,1,1,1,1,1,1,1,0,0,0,
        0,0,0,0,0,1,1,1,0,0,0,0,0,
    ];

    pub const ROUND_13X13_ANCHOR: (u32, u32) = (6, 6);
    pub const ROUND_13X13_ONES: i32 = {
        let mut sum = 0i32;
        let mut i = 0;
        while i < ROUND_13X13.len() {
            sum += ROUND_13X13[i] as i32;
            i += 1;
        }
        sum
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ImageView, StaticImage};

    #[test]
    fn homogeneous_box_filter_sums_then_scales() {
        let data = [1u8, 2, 3, 4];
        let src = ImageView::new(&data, 2, 2);
        let kernel = Kernel::<i32>::homogeneous(1, 2, 2, 0, 0, 2, 2);
        let mut dst = StaticImage::<1, 1>::new();
        kernel.convolve(&src, &mut dst.view_mut(), 0, |acc| (acc / 4) as u8);
        // sum = 1+2+3+4 = 10, /4 = 2 (floor)
        assert_eq!(dst.view().at(0, 0), 2);
    }

    #[test]
    fn heterogeneous_kernel_weights_each_cell() {
        let data = [1u8, 1, 1, 1];
        let src = ImageView::new(&data, 2, 2);
        let kernel = Kernel::<i32>::heterogeneous(vec![1, 0, 0, 1], 2, 2, 0, 0, 1, 1);
        let mut dst = StaticImage::<1, 1>::new();
        kernel.convolve(&src, &mut dst.view_mut(), 0, |acc| acc as u8);
        assert_eq!(dst.view().at(0, 0), 2);
    }

    #[test]
    #[should_panic(expected = "anchor must lie within")]
    fn anchor_outside_kernel_panics() {
        let _ = Kernel::<i32>::homogeneous(1, 3, 3, 3, 0, 1, 1);
    }

    #[test]
    #[should_panic(expected = "stride must be >= 1")]
    fn zero_stride_panics() {
        let _ = Kernel::<i32>::homogeneous(1, 3, 3, 0, 0, 0, 1);
    }

    #[test]
    fn padded_reads_supply_pad_value_at_edges() {
        let data = [5u8, 5, 5, 5];
        let src = ImageView::new(&data, 2, 2);
        // 3x3 all-ones kernel anchored at center reads one ring of padding.
        let kernel = Kernel::<i32>::homogeneous(1, 3, 3, 1, 1, 1, 1);
        let mut dst = StaticImage::<2, 2>::new();
        kernel.convolve(&src, &mut dst.view_mut(), 0, |acc| acc.min(255) as u8);
        // Top-left destination cell only overlaps the single src cell (0,0)
        // with value 5; the rest of its 3x3 window is padding (0).
        assert_eq!(dst.view().at(0, 0), 5);
    }
}
