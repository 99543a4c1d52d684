use std::io::Write;

use super::super::header::{row_size, BitmapFileHeader, DibHeader, BYTES_PER_PIXEL};
use super::super::{Image, ImageWriter};
use crate::error::Error;
use crate::logger;
use crate::Result;

/// Encodes an image as an uncompressed 24 bit bitmap.
pub struct BmpImageWriter<'a, W: Write> {
    writer: W,
    image: &'a Image,
}

impl<'a, W: Write> BmpImageWriter<'a, W> {
    pub fn new(writer: W, image: &'a Image) -> Self {
        Self { writer, image }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_headers(&mut self) -> Result<()> {
        self.image
            .file_header
            .write_to(&mut self.writer)
            .map_err(|e| Error::FailedToWriteHeader(BitmapFileHeader::NAME, e))?;
        self.image
            .dib_header
            .write_to(&mut self.writer)
            .map_err(|e| Error::FailedToWriteHeader(DibHeader::NAME, e))
    }

    /// Mirrors the reader: the last image row is stored first.
    fn write_pixel_rows(&mut self) -> Result<()> {
        let width = self.image.red.width;
        let height = self.image.red.height;
        let mut buffer = vec![0; row_size(width)];
        for stored_row_index in 0..height {
            let row_index = height - 1 - stored_row_index;
            self.interleave_row(row_index, &mut buffer);
            self.writer
                .write_all(&buffer)
                .map_err(|e| Error::FailedToWritePixelRow(stored_row_index, e))?;
        }
        Ok(())
    }

    /// Padding bytes at the end of `buffer` are never touched and stay zero.
    fn interleave_row(&self, row_index: usize, buffer: &mut [u8]) {
        let red = self.image.red.row(row_index);
        let green = self.image.green.row(row_index);
        let blue = self.image.blue.row(row_index);
        let dots = red.iter().zip(green).zip(blue);
        for (bgr, ((&red, &green), &blue)) in buffer.chunks_exact_mut(BYTES_PER_PIXEL).zip(dots) {
            bgr[0] = blue;
            bgr[1] = green;
            bgr[2] = red;
        }
    }
}

impl<W: Write> ImageWriter for BmpImageWriter<'_, W> {
    fn write_image(&mut self) -> Result<()> {
        self.image.ensure_valid()?;
        logger::log_headers(
            "Encoding",
            &self.image.file_header,
            &self.image.dib_header,
        );
        self.write_headers()?;
        self.write_pixel_rows()?;
        self.writer.flush().map_err(Error::FailedToFlushOutput)
    }
}

#[cfg(test)]
mod test {
    use std::io::{self, Write};

    use crate::color::Color;
    use crate::error::Error;
    use crate::image::reader::bmp::BmpImageReader;
    use crate::image::{Image, ImageReader, ImageWriter};

    use super::BmpImageWriter;

    /// Accepts a fixed number of bytes and then reports a full device.
    struct LimitedWriter {
        remaining: usize,
    }

    impl Write for LimitedWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.remaining == 0 {
                return Ok(0);
            }
            let written = buf.len().min(self.remaining);
            self.remaining -= written;
            Ok(written)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn encode(image: &Image) -> crate::Result<Vec<u8>> {
        let mut writer = BmpImageWriter::new(Vec::new(), image);
        writer.write_image()?;
        Ok(writer.into_inner())
    }

    fn patterned_image(width: i32, height: i32) -> Image {
        let mut image = Image::with_dimensions(width, height).unwrap();
        for y in 0..height as usize {
            for x in 0..width as usize {
                let color = Color::new((x * 40) as u8, (y * 40) as u8, (x * y + 7) as u8);
                image.set_pixel(x, y, color).unwrap();
            }
        }
        image
    }

    #[test]
    fn encoded_rows_are_padded() {
        let five_wide = encode(&patterned_image(5, 2)).unwrap();
        assert_eq!(five_wide.len(), 54 + 2 * 16, "15 byte rows pad to 16");
        assert_eq!(five_wide[54 + 15], 0, "padding byte must be zero");
        assert_eq!(five_wide[54 + 31], 0, "padding byte must be zero");

        let four_wide = encode(&patterned_image(4, 2)).unwrap();
        assert_eq!(four_wide.len(), 54 + 2 * 12, "12 byte rows need no padding");
    }

    #[test]
    fn encoded_rows_are_bottom_up_bgr() {
        let mut image = Image::with_dimensions(1, 2).unwrap();
        image.set_pixel(0, 0, Color::new(1, 2, 3)).unwrap();
        image.set_pixel(0, 1, Color::new(4, 5, 6)).unwrap();
        let bytes = encode(&image).unwrap();
        assert_eq!(&bytes[54..58], &[6, 5, 4, 0], "bottom row comes first");
        assert_eq!(&bytes[58..62], &[3, 2, 1, 0], "top row comes last");
    }

    #[test]
    fn encode_then_decode_keeps_pixels() {
        for (width, height) in [(1, 1), (2, 3), (3, 2), (4, 4), (5, 1), (7, 6)] {
            let image = patterned_image(width, height);
            let bytes = encode(&image).unwrap();
            let decoded = BmpImageReader::new(bytes.as_slice()).read_image().unwrap();
            assert_eq!(decoded, image, "{}x{} image changed", width, height);
        }
    }

    #[test]
    fn encode_empty_image_fails() {
        assert!(matches!(
            encode(&Image::new()),
            Err(Error::ImageNotInitialized)
        ));
    }

    #[test]
    fn short_write_aborts() {
        let image = patterned_image(3, 3);
        let mut writer = BmpImageWriter::new(LimitedWriter { remaining: 20 }, &image);
        assert!(matches!(
            writer.write_image(),
            Err(Error::FailedToWriteHeader(_, _))
        ));

        let mut writer = BmpImageWriter::new(LimitedWriter { remaining: 54 + 12 + 5 }, &image);
        match writer.write_image() {
            Err(Error::FailedToWritePixelRow(row_index, _)) => assert_eq!(row_index, 1),
            other => panic!("Short pixel write not detected: {:?}", other),
        }
    }
}
