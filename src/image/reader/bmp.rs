use std::io::{self, Read};

use super::super::header::{
    headers_for_dimensions, row_size, BitmapFileHeader, DibHeader, BYTES_PER_PIXEL, HEADERS_SIZE,
};
use super::super::{Image, ImageReader};
use crate::error::Error;
use crate::logger;
use crate::Result;

/// Decodes an uncompressed 24 bit bitmap from any byte stream.
pub struct BmpImageReader<R: Read> {
    reader: R,
}

impl<R: Read> BmpImageReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    fn read_file_header(&mut self) -> Result<BitmapFileHeader> {
        BitmapFileHeader::read_from(&mut self.reader)
            .map_err(|e| Error::FailedToReadHeader(BitmapFileHeader::NAME, e))
    }

    fn read_dib_header(&mut self) -> Result<DibHeader> {
        DibHeader::read_from(&mut self.reader)
            .map_err(|e| Error::FailedToReadHeader(DibHeader::NAME, e))
    }

    fn skip_to_pixel_data(&mut self, offset: u32) -> Result<()> {
        let gap = (offset - HEADERS_SIZE) as u64;
        if gap == 0 {
            return Ok(());
        }
        log::debug!("Skipping {} bytes between headers and pixel data", gap);
        let skipped = io::copy(&mut self.reader.by_ref().take(gap), &mut io::sink())
            .map_err(Error::FailedToSkipToPixelData)?;
        if skipped != gap {
            return Err(Error::FailedToSkipToPixelData(io::Error::from(
                io::ErrorKind::UnexpectedEof,
            )));
        }
        Ok(())
    }

    /// Collects the stored rows before any plane is allocated, so a short
    /// stream fails without committing memory for the claimed dimensions.
    fn read_pixel_data(&mut self, width: i32, height: i32) -> Result<Vec<u8>> {
        let (_, expected) = headers_for_dimensions(width, height)?;
        let length = expected.image_size as usize;
        let stride = row_size(width as usize);
        let mut pixel_data = Vec::new();
        let result = self
            .reader
            .by_ref()
            .take(length as u64)
            .read_to_end(&mut pixel_data);
        if result.is_err() || pixel_data.len() < length {
            return Err(Error::TruncatedPixelRow(pixel_data.len() / stride));
        }
        Ok(pixel_data)
    }

    /// Rows are stored bottom-up, so the first stored row is the last image row.
    fn split_rows(image: &mut Image, pixel_data: &[u8]) {
        let height = image.red.height;
        let stride = row_size(image.red.width);
        for (stored_row_index, buffer) in pixel_data.chunks_exact(stride).enumerate() {
            let row_index = height - 1 - stored_row_index;
            Self::split_row(image, row_index, buffer);
        }
    }

    fn split_row(image: &mut Image, row_index: usize, buffer: &[u8]) {
        let red = image.red.row_mut(row_index);
        let green = image.green.row_mut(row_index);
        let blue = image.blue.row_mut(row_index);
        let dots = red.iter_mut().zip(green.iter_mut()).zip(blue.iter_mut());
        for (bgr, ((red, green), blue)) in buffer.chunks_exact(BYTES_PER_PIXEL).zip(dots) {
            *blue = bgr[0];
            *green = bgr[1];
            *red = bgr[2];
        }
    }
}

impl<R: Read> ImageReader for BmpImageReader<R> {
    fn read_image(&mut self) -> Result<Image> {
        let file_header = self.read_file_header()?;
        let dib_header = self.read_dib_header()?;
        logger::log_headers("Decoding", &file_header, &dib_header);
        file_header.check_supported()?;
        dib_header.check_supported()?;
        self.skip_to_pixel_data(file_header.offset)?;
        let pixel_data = self.read_pixel_data(dib_header.width, dib_header.height)?;
        let mut image = Image::with_dimensions(dib_header.width, dib_header.height)?;
        Self::split_rows(&mut image, &pixel_data);
        Ok(image)
    }
}
