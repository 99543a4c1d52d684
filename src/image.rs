use std::io::{BufReader, BufWriter};
use std::path::Path;

use header::{headers_for_dimensions, BitmapFileHeader, DibHeader};
use reader::bmp::BmpImageReader;
use writer::bmp::BmpImageWriter;

use crate::color::Color;
use crate::error::Error;
use crate::{open_input_file, open_output_file, Result};

pub mod filter;
pub mod header;
pub mod reader;
pub mod selection;
pub mod writer;

pub trait ImageReader {
    fn read_image(&mut self) -> Result<Image>;
}

pub trait ImageWriter {
    fn write_image(&mut self) -> Result<()>;
}

/// A single 8 bit channel, row-major and top-down.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelPlane {
    dots: Vec<u8>,
    width: usize,
    height: usize,
}

impl PixelPlane {
    fn allocate(width: usize, height: usize) -> Result<Self> {
        let length = width * height;
        let mut dots = Vec::new();
        dots.try_reserve_exact(length)
            .map_err(|_| Error::AllocationFailed(length))?;
        dots.resize(length, 0);
        Ok(PixelPlane {
            dots,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dots(&self) -> &[u8] {
        &self.dots
    }

    pub fn dot(&self, column_index: usize, row_index: usize) -> u8 {
        self.dots[column_index + row_index * self.width]
    }

    /// Reads a dot, moving coordinates outside of the plane onto its nearest edge.
    /// An empty plane has no edge to move onto and yields `None`.
    pub fn clamped_dot(&self, column_index: isize, row_index: isize) -> Option<u8> {
        if self.dots.is_empty() {
            return None;
        }
        let last_column_index = self.width as isize - 1;
        let last_row_index = self.height as isize - 1;
        Some(self.dot(
            column_index.clamp(0, last_column_index) as usize,
            row_index.clamp(0, last_row_index) as usize,
        ))
    }

    fn set_dot(&mut self, column_index: usize, row_index: usize, value: u8) {
        self.dots[column_index + row_index * self.width] = value;
    }

    pub fn row(&self, row_index: usize) -> &[u8] {
        let start = row_index * self.width;
        &self.dots[start..start + self.width]
    }

    fn row_mut(&mut self, row_index: usize) -> &mut [u8] {
        let start = row_index * self.width;
        &mut self.dots[start..start + self.width]
    }
}

/// Three equally sized color planes together with the headers describing
/// them on disk.
///
/// An image starts out empty. It only becomes valid through [`Image::initialize`]
/// or [`Image::decode`], and every processing operation refuses to run on an
/// image that is not valid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Image {
    red: PixelPlane,
    green: PixelPlane,
    blue: PixelPlane,
    file_header: BitmapFileHeader,
    dib_header: DibHeader,
    valid: bool,
}

impl Image {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dimensions(width: i32, height: i32) -> Result<Self> {
        let mut image = Image::new();
        image.initialize(width, height)?;
        Ok(image)
    }

    /// Releases the current planes and allocates black planes of the given size.
    ///
    /// On failure the image is left empty.
    pub fn initialize(&mut self, width: i32, height: i32) -> Result<()> {
        self.destroy();
        let (file_header, dib_header) = headers_for_dimensions(width, height)
            .inspect_err(|e| log::warn!("Refusing to initialize image: {}", e))?;
        let (width, height) = (width as usize, height as usize);
        let red = PixelPlane::allocate(width, height)?;
        let green = PixelPlane::allocate(width, height)?;
        let blue = PixelPlane::allocate(width, height)?;
        *self = Image {
            red,
            green,
            blue,
            file_header,
            dib_header,
            valid: true,
        };
        log::debug!("Initialized {}x{} image", width, height);
        Ok(())
    }

    pub fn destroy(&mut self) {
        if self.valid {
            log::debug!("Releasing {}x{} image", self.red.width, self.red.height);
        }
        *self = Image::default();
    }

    /// Replaces the image with the bitmap stored at `path`.
    ///
    /// The current content is kept when the file cannot be opened. Any later
    /// failure leaves the image empty.
    pub fn decode<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let file = open_input_file(path.as_ref())?;
        self.destroy();
        let mut reader = BmpImageReader::new(BufReader::new(file));
        *self = reader
            .read_image()
            .inspect_err(|e| log::warn!("Decoding {} failed: {}", path.as_ref().display(), e))?;
        Ok(())
    }

    pub fn encode<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.ensure_valid()?;
        let file = open_output_file(path.as_ref())?;
        let mut writer = BmpImageWriter::new(BufWriter::new(file), self);
        writer
            .write_image()
            .inspect_err(|e| log::warn!("Encoding {} failed: {}", path.as_ref().display(), e))
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn width(&self) -> i32 {
        if self.valid {
            self.red.width as i32
        } else {
            0
        }
    }

    pub fn height(&self) -> i32 {
        if self.valid {
            self.red.height as i32
        } else {
            0
        }
    }

    pub fn red(&self) -> &PixelPlane {
        &self.red
    }

    pub fn green(&self) -> &PixelPlane {
        &self.green
    }

    pub fn blue(&self) -> &PixelPlane {
        &self.blue
    }

    pub fn file_header(&self) -> &BitmapFileHeader {
        &self.file_header
    }

    pub fn dib_header(&self) -> &DibHeader {
        &self.dib_header
    }

    pub fn pixel(&self, column_index: usize, row_index: usize) -> Option<Color> {
        if !self.contains(column_index, row_index) {
            return None;
        }
        Some(Color {
            red: self.red.dot(column_index, row_index),
            green: self.green.dot(column_index, row_index),
            blue: self.blue.dot(column_index, row_index),
        })
    }

    pub fn set_pixel(&mut self, column_index: usize, row_index: usize, color: Color) -> Result<()> {
        self.ensure_valid()?;
        if !self.contains(column_index, row_index) {
            return Err(Error::PixelOutOfBounds(column_index, row_index));
        }
        self.red.set_dot(column_index, row_index, color.red);
        self.green.set_dot(column_index, row_index, color.green);
        self.blue.set_dot(column_index, row_index, color.blue);
        Ok(())
    }

    pub fn fill(&mut self, color: Color) -> Result<()> {
        self.ensure_valid()?;
        self.red.dots.fill(color.red);
        self.green.dots.fill(color.green);
        self.blue.dots.fill(color.blue);
        Ok(())
    }

    /// Turns every pixel into the gray of equal luminance, in place.
    pub fn to_grayscale(&mut self) -> Result<()> {
        self.ensure_valid()?;
        let dots = self
            .red
            .dots
            .iter_mut()
            .zip(self.green.dots.iter_mut())
            .zip(self.blue.dots.iter_mut());
        for ((red, green), blue) in dots {
            let gray = Color::new(*red, *green, *blue).luminance();
            *red = gray;
            *green = gray;
            *blue = gray;
        }
        Ok(())
    }

    fn contains(&self, column_index: usize, row_index: usize) -> bool {
        self.valid && column_index < self.red.width && row_index < self.red.height
    }

    fn ensure_valid(&self) -> Result<()> {
        if self.valid {
            return Ok(());
        }
        log::warn!("Rejecting operation on an uninitialized image");
        Err(Error::ImageNotInitialized)
    }

    /// A fresh black image of the same size.
    fn allocate_like(&self) -> Result<Image> {
        Image::with_dimensions(self.width(), self.height())
    }

    fn color_at(&self, index: usize) -> Color {
        Color {
            red: self.red.dots[index],
            green: self.green.dots[index],
            blue: self.blue.dots[index],
        }
    }

    fn set_color_at(&mut self, index: usize, color: Color) {
        self.red.dots[index] = color.red;
        self.green.dots[index] = color.green;
        self.blue.dots[index] = color.blue;
    }
}

#[cfg(test)]
mod test {
    use crate::color::Color;
    use crate::error::Error;

    use super::Image;

    fn gradient_image(width: i32, height: i32) -> Image {
        let mut image = Image::with_dimensions(width, height).unwrap();
        for y in 0..height as usize {
            for x in 0..width as usize {
                let color = Color::new((x * 37 % 256) as u8, (y * 53 % 256) as u8, ((x + y) * 11) as u8);
                image.set_pixel(x, y, color).unwrap();
            }
        }
        image
    }

    #[test]
    fn new_image_is_empty() {
        let image = Image::new();
        assert!(!image.is_valid());
        assert_eq!(image.width(), 0);
        assert_eq!(image.height(), 0);
        assert!(image.pixel(0, 0).is_none());
    }

    #[test]
    fn initialize_allocates_black_planes() {
        let image = Image::with_dimensions(5, 3).unwrap();
        assert!(image.is_valid());
        assert_eq!(image.width(), 5);
        assert_eq!(image.height(), 3);
        for plane in [image.red(), image.green(), image.blue()] {
            assert_eq!(plane.dots().len(), 15);
            assert_eq!(plane.width(), 5);
            assert_eq!(plane.height(), 3);
            assert!(plane.dots().iter().all(|&dot| dot == 0));
        }
        assert_eq!(image.dib_header().width, 5);
        assert_eq!(image.dib_header().image_size, 48);
        assert_eq!(image.file_header().size, 102);
    }

    #[test]
    fn initialize_rejects_non_positive_dimensions() {
        let mut image = Image::with_dimensions(2, 2).unwrap();
        for (width, height) in [(0, 4), (4, 0), (-1, 4), (4, -1)] {
            let result = image.initialize(width, height);
            assert!(
                matches!(result, Err(Error::InvalidDimensions(_, _))),
                "{}x{} was accepted",
                width,
                height
            );
            assert!(!image.is_valid(), "failed initialization left image valid");
        }
    }

    #[test]
    fn reinitialize_replaces_previous_planes() {
        let mut image = gradient_image(4, 4);
        image.initialize(2, 3).unwrap();
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 3);
        assert_eq!(image.pixel(1, 1), Some(Color::BLACK));
    }

    #[test]
    fn destroy_is_idempotent() {
        let mut image = gradient_image(3, 3);
        image.destroy();
        assert_eq!(image, Image::new());
        image.destroy();
        assert_eq!(image, Image::new());
    }

    #[test]
    fn pixel_access_checks_bounds() {
        let mut image = Image::with_dimensions(2, 2).unwrap();
        let color = Color::new(1, 2, 3);
        image.set_pixel(1, 0, color).unwrap();
        assert_eq!(image.pixel(1, 0), Some(color));
        assert_eq!(image.red().dot(1, 0), 1);
        assert!(image.pixel(2, 0).is_none());
        assert!(matches!(
            image.set_pixel(0, 2, color),
            Err(Error::PixelOutOfBounds(0, 2))
        ));
    }

    #[test]
    fn clamped_dot_repeats_border() {
        let image = gradient_image(4, 3);
        let plane = image.red();
        assert_eq!(plane.clamped_dot(-5, -5), Some(plane.dot(0, 0)));
        assert_eq!(plane.clamped_dot(10, 1), Some(plane.dot(3, 1)));
        assert_eq!(plane.clamped_dot(2, 7), Some(plane.dot(2, 2)));
        assert_eq!(plane.clamped_dot(2, 1), Some(plane.dot(2, 1)));
        assert_eq!(plane.row(1), &plane.dots()[4..8]);
    }

    #[test]
    fn clamped_dot_on_empty_plane_is_none() {
        let image = Image::new();
        assert_eq!(image.red().clamped_dot(0, 0), None);
        assert_eq!(image.blue().clamped_dot(-1, 3), None);
    }

    #[test]
    fn operations_on_empty_image_fail() {
        let mut image = Image::new();
        assert!(matches!(image.to_grayscale(), Err(Error::ImageNotInitialized)));
        assert!(matches!(image.fill(Color::BLACK), Err(Error::ImageNotInitialized)));
        assert!(matches!(
            image.set_pixel(0, 0, Color::BLACK),
            Err(Error::ImageNotInitialized)
        ));
        assert!(matches!(
            image.encode("never-written.bmp"),
            Err(Error::ImageNotInitialized)
        ));
    }

    #[test]
    fn grayscale_uses_luminance() {
        let mut image = Image::with_dimensions(2, 1).unwrap();
        image.set_pixel(0, 0, Color::new(255, 0, 0)).unwrap();
        image.set_pixel(1, 0, Color::new(10, 20, 30)).unwrap();
        image.to_grayscale().unwrap();
        assert_eq!(image.pixel(0, 0), Some(Color::new(76, 76, 76)));
        assert_eq!(image.pixel(1, 0), Some(Color::new(18, 18, 18)));
    }

    #[test]
    fn grayscale_is_idempotent() {
        let mut once = gradient_image(7, 5);
        once.to_grayscale().unwrap();
        let mut twice = once.clone();
        twice.to_grayscale().unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn grayscale_keeps_row_order() {
        let mut image = Image::with_dimensions(1, 3).unwrap();
        image.set_pixel(0, 0, Color::new(200, 200, 200)).unwrap();
        image.set_pixel(0, 2, Color::new(10, 10, 10)).unwrap();
        image.to_grayscale().unwrap();
        assert_eq!(image.pixel(0, 0), Some(Color::new(200, 200, 200)), "top row moved");
        assert_eq!(image.pixel(0, 1), Some(Color::BLACK));
        assert_eq!(image.pixel(0, 2), Some(Color::new(10, 10, 10)), "bottom row moved");
    }
}
