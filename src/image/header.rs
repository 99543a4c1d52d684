use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::Error;
use crate::Result;

/// "BM" read as a little endian `u16`.
pub const BITMAP_MAGIC: u16 = 0x4D42;
pub const BITS_PER_PIXEL: u16 = 24;
pub const BYTES_PER_PIXEL: usize = 3;
/// 72 DPI
const PIXELS_PER_METER: i32 = 2835;

/// Length of a stored pixel row in bytes, padded to a multiple of 4.
pub fn row_size(width: usize) -> usize {
    (BITS_PER_PIXEL as usize * width).div_ceil(32) * 4
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitmapFileHeader {
    pub magic: u16,
    pub size: u32,
    pub reserved_1: u16,
    pub reserved_2: u16,
    pub offset: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DibHeader {
    pub size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bits: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_resolution: i32,
    pub y_resolution: i32,
    pub colors: u32,
    pub important_colors: u32,
}

pub const HEADERS_SIZE: u32 = BitmapFileHeader::SIZE + DibHeader::SIZE;

/// Builds both headers for an uncompressed 24 bit image of the given size.
pub fn headers_for_dimensions(width: i32, height: i32) -> Result<(BitmapFileHeader, DibHeader)> {
    if width <= 0 || height <= 0 {
        return Err(Error::InvalidDimensions(width, height));
    }
    let image_size = (row_size(width as usize) as u64)
        .checked_mul(height as u64)
        .and_then(|size| u32::try_from(size).ok())
        .filter(|size| size.checked_add(HEADERS_SIZE).is_some())
        .ok_or(Error::InvalidDimensions(width, height))?;
    let file_header = BitmapFileHeader {
        magic: BITMAP_MAGIC,
        size: HEADERS_SIZE + image_size,
        reserved_1: 0,
        reserved_2: 0,
        offset: HEADERS_SIZE,
    };
    let dib_header = DibHeader {
        size: DibHeader::SIZE,
        width,
        height,
        planes: 1,
        bits: BITS_PER_PIXEL,
        compression: 0,
        image_size,
        x_resolution: PIXELS_PER_METER,
        y_resolution: PIXELS_PER_METER,
        colors: 0,
        important_colors: 0,
    };
    Ok((file_header, dib_header))
}

impl BitmapFileHeader {
    pub const SIZE: u32 = 14;
    pub const NAME: &'static str = "bitmap file header";

    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(BitmapFileHeader {
            magic: reader.read_u16::<LittleEndian>()?,
            size: reader.read_u32::<LittleEndian>()?,
            reserved_1: reader.read_u16::<LittleEndian>()?,
            reserved_2: reader.read_u16::<LittleEndian>()?,
            offset: reader.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u16::<LittleEndian>(self.magic)?;
        writer.write_u32::<LittleEndian>(self.size)?;
        writer.write_u16::<LittleEndian>(self.reserved_1)?;
        writer.write_u16::<LittleEndian>(self.reserved_2)?;
        writer.write_u32::<LittleEndian>(self.offset)
    }

    pub fn check_supported(&self) -> Result<()> {
        if self.magic != BITMAP_MAGIC {
            return Err(Error::InvalidMagic(self.magic));
        }
        if self.offset < HEADERS_SIZE {
            return Err(Error::InvalidPixelDataOffset(self.offset));
        }
        Ok(())
    }
}

impl DibHeader {
    pub const SIZE: u32 = 40;
    pub const NAME: &'static str = "DIB header";

    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(DibHeader {
            size: reader.read_u32::<LittleEndian>()?,
            width: reader.read_i32::<LittleEndian>()?,
            height: reader.read_i32::<LittleEndian>()?,
            planes: reader.read_u16::<LittleEndian>()?,
            bits: reader.read_u16::<LittleEndian>()?,
            compression: reader.read_u32::<LittleEndian>()?,
            image_size: reader.read_u32::<LittleEndian>()?,
            x_resolution: reader.read_i32::<LittleEndian>()?,
            y_resolution: reader.read_i32::<LittleEndian>()?,
            colors: reader.read_u32::<LittleEndian>()?,
            important_colors: reader.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.size)?;
        writer.write_i32::<LittleEndian>(self.width)?;
        writer.write_i32::<LittleEndian>(self.height)?;
        writer.write_u16::<LittleEndian>(self.planes)?;
        writer.write_u16::<LittleEndian>(self.bits)?;
        writer.write_u32::<LittleEndian>(self.compression)?;
        writer.write_u32::<LittleEndian>(self.image_size)?;
        writer.write_i32::<LittleEndian>(self.x_resolution)?;
        writer.write_i32::<LittleEndian>(self.y_resolution)?;
        writer.write_u32::<LittleEndian>(self.colors)?;
        writer.write_u32::<LittleEndian>(self.important_colors)
    }

    pub fn check_supported(&self) -> Result<()> {
        if self.planes != 1 {
            return Err(Error::UnsupportedColorPlanes(self.planes));
        }
        if self.bits != BITS_PER_PIXEL {
            return Err(Error::UnsupportedBitsPerPixel(self.bits));
        }
        if self.compression != 0 {
            return Err(Error::UnsupportedCompression(self.compression));
        }
        Ok(())
    }
}
