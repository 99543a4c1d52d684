use clap::builder::PossibleValue;
use clap::ValueEnum;

use super::{Image, PixelPlane};
use crate::error::Error;
use crate::Result;

/// A square kernel with an odd side length, stored row by row.
#[derive(Clone, Copy, Debug)]
pub struct Kernel<'a> {
    weights: &'a [f32],
    dim: usize,
}

impl<'a> Kernel<'a> {
    pub fn new(weights: &'a [f32]) -> Result<Self> {
        let length = weights.len();
        let dim = (length as f64).sqrt().round() as usize;
        if length <= 1 || dim * dim != length || dim % 2 == 0 {
            log::warn!("Rejecting kernel with {} weights", length);
            return Err(Error::InvalidKernelLength(length));
        }
        Ok(Kernel { weights, dim })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn pad(&self) -> usize {
        (self.dim - 1) / 2
    }

    /// Never zero, [`Kernel::new`] rejects short weight slices.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Weighted sum of the window centred on the given dot.
    fn convolve_at(&self, plane: &PixelPlane, column_index: usize, row_index: usize) -> f32 {
        let pad = self.pad() as isize;
        let mut sum = 0.0;
        for (ky, kernel_row) in self.weights.chunks_exact(self.dim).enumerate() {
            let source_row_index = row_index as isize + ky as isize - pad;
            for (kx, &weight) in kernel_row.iter().enumerate() {
                let source_column_index = column_index as isize + kx as isize - pad;
                let dot = plane
                    .clamped_dot(source_column_index, source_row_index)
                    .unwrap_or_default();
                sum += weight * dot as f32;
            }
        }
        sum
    }
}

fn clamp_to_byte(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

#[rustfmt::skip]
const IDENTITY: [f32; 9] = [
    0.0, 0.0, 0.0,
    0.0, 1.0, 0.0,
    0.0, 0.0, 0.0,
];

const BOX_BLUR: [f32; 9] = [1.0 / 9.0; 9];

#[rustfmt::skip]
const SHARPEN: [f32; 9] = [
     0.0, -1.0,  0.0,
    -1.0,  5.0, -1.0,
     0.0, -1.0,  0.0,
];

#[rustfmt::skip]
const LAPLACIAN: [f32; 9] = [
     0.0, -2.0,  0.0,
    -2.0,  8.0, -2.0,
     0.0, -2.0,  0.0,
];

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum KernelPreset {
    Identity,
    BoxBlur,
    Sharpen,
    #[default]
    Laplacian,
}

impl ValueEnum for KernelPreset {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Identity, Self::BoxBlur, Self::Sharpen, Self::Laplacian]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Self::Identity => Some(PossibleValue::new("identity")),
            Self::BoxBlur => Some(PossibleValue::new("box-blur")),
            Self::Sharpen => Some(PossibleValue::new("sharpen")),
            Self::Laplacian => Some(PossibleValue::new("laplacian")),
        }
    }
}

impl KernelPreset {
    pub fn weights(&self) -> &'static [f32] {
        match self {
            KernelPreset::Identity => &IDENTITY,
            KernelPreset::BoxBlur => &BOX_BLUR,
            KernelPreset::Sharpen => &SHARPEN,
            KernelPreset::Laplacian => &LAPLACIAN,
        }
    }
}

/// Single channel floating point output of [`Image::apply_kernel`].
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureMap {
    values: Vec<f32>,
    width: i32,
    height: i32,
}

impl FeatureMap {
    pub fn new(width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidDimensions(width, height));
        }
        let length = width as usize * height as usize;
        let mut values = Vec::new();
        values
            .try_reserve_exact(length)
            .map_err(|_| Error::AllocationFailed(length * std::mem::size_of::<f32>()))?;
        values.resize(length, 0.0);
        Ok(FeatureMap {
            values,
            width,
            height,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn value(&self, column_index: usize, row_index: usize) -> f32 {
        self.values[column_index + row_index * self.width as usize]
    }
}

impl Image {
    /// Convolves every channel with `kernel`, sampling past the borders from
    /// the nearest edge pixel. Results are clamped to `0..=255` and truncated.
    pub fn apply_filter(&self, kernel: &[f32]) -> Result<Image> {
        self.ensure_valid()?;
        let kernel = Kernel::new(kernel)?;
        let mut output = self.allocate_like()?;
        for y in 0..self.red.height {
            for x in 0..self.red.width {
                let red = kernel.convolve_at(&self.red, x, y);
                let green = kernel.convolve_at(&self.green, x, y);
                let blue = kernel.convolve_at(&self.blue, x, y);
                output.red.set_dot(x, y, clamp_to_byte(red));
                output.green.set_dot(x, y, clamp_to_byte(green));
                output.blue.set_dot(x, y, clamp_to_byte(blue));
            }
        }
        log::debug!(
            "Applied {0}x{0} filter to {1}x{2} image",
            kernel.dim(),
            self.red.width,
            self.red.height
        );
        Ok(output)
    }

    /// Sums the red, green and blue windows weighted by their own kernel into
    /// one value per pixel, clamped to `0.0..=255.0` but not truncated.
    ///
    /// `output` must already have the size of the image.
    pub fn apply_kernel(&self, weights: [&[f32]; 3], output: &mut FeatureMap) -> Result<()> {
        self.ensure_valid()?;
        if output.width != self.width() || output.height != self.height() {
            log::warn!("Rejecting feature map of mismatching size");
            return Err(Error::FeatureMapSizeMismatch {
                expected: (self.width(), self.height()),
                actual: (output.width, output.height),
            });
        }
        let [red_weights, green_weights, blue_weights] = weights;
        let red = Kernel::new(red_weights)?;
        let green = Self::matching_kernel(&red, green_weights)?;
        let blue = Self::matching_kernel(&red, blue_weights)?;
        let width = self.red.width;
        for y in 0..self.red.height {
            for x in 0..width {
                let sum = red.convolve_at(&self.red, x, y)
                    + green.convolve_at(&self.green, x, y)
                    + blue.convolve_at(&self.blue, x, y);
                output.values[x + y * width] = sum.clamp(0.0, 255.0);
            }
        }
        Ok(())
    }

    fn matching_kernel<'a>(reference: &Kernel<'_>, weights: &'a [f32]) -> Result<Kernel<'a>> {
        if weights.len() != reference.len() {
            log::warn!("Rejecting channel kernels of different sizes");
            return Err(Error::KernelLengthMismatch(reference.len(), weights.len()));
        }
        Kernel::new(weights)
    }
}
