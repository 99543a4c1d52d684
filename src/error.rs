use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    InvalidDimensions(i32, i32),
    AllocationFailed(usize),
    ImageNotInitialized,
    PixelOutOfBounds(usize, usize),
    InvalidKernelLength(usize),
    KernelLengthMismatch(usize, usize),
    FeatureMapSizeMismatch {
        expected: (i32, i32),
        actual: (i32, i32),
    },
    UnableToOpenInputFileForReading(String, std::io::Error),
    UnableToOpenOutputFileForWriting(String, std::io::Error),
    FailedToReadHeader(&'static str, std::io::Error),
    FailedToWriteHeader(&'static str, std::io::Error),
    FailedToSkipToPixelData(std::io::Error),
    TruncatedPixelRow(usize),
    FailedToWritePixelRow(usize, std::io::Error),
    FailedToFlushOutput(std::io::Error),
    InvalidMagic(u16),
    UnsupportedColorPlanes(u16),
    UnsupportedBitsPerPixel(u16),
    UnsupportedCompression(u32),
    InvalidPixelDataOffset(u32),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDimensions(width, height) => {
                write!(
                    f,
                    "Invalid image dimensions {}x{}. Width and height must be positive.",
                    width, height
                )
            }
            Self::AllocationFailed(bytes) => {
                write!(f, "Unable to allocate {} bytes for a pixel plane", bytes)
            }
            Self::ImageNotInitialized => write!(f, "Image is not initialized"),
            Self::PixelOutOfBounds(x, y) => {
                write!(f, "Pixel ({}, {}) lies outside of the image", x, y)
            }
            Self::InvalidKernelLength(length) => {
                write!(
                    f,
                    "Kernel of length {} is not an odd square greater than one",
                    length
                )
            }
            Self::KernelLengthMismatch(expected, actual) => {
                write!(
                    f,
                    "Channel kernels differ in length. Expected {}, but got {}.",
                    expected, actual
                )
            }
            Self::FeatureMapSizeMismatch { expected, actual } => {
                write!(
                    f,
                    "Feature map has size {}x{}, but the image is {}x{}",
                    actual.0, actual.1, expected.0, expected.1
                )
            }
            Self::UnableToOpenInputFileForReading(path, error) => {
                write!(
                    f,
                    "Unable to open input file '{}' for reading: {}",
                    path, error
                )
            }
            Self::UnableToOpenOutputFileForWriting(path, error) => {
                write!(
                    f,
                    "Unable to open output file '{}' for writing: {}",
                    path, error
                )
            }
            Self::FailedToReadHeader(header_name, error) => {
                write!(f, "Failed to read {}: {}", header_name, error)
            }
            Self::FailedToWriteHeader(header_name, error) => {
                write!(f, "Failed to write {}: {}", header_name, error)
            }
            Self::FailedToSkipToPixelData(error) => {
                write!(f, "Failed to skip to the pixel data: {}", error)
            }
            Self::TruncatedPixelRow(row) => {
                write!(f, "Pixel row {} is truncated", row)
            }
            Self::FailedToWritePixelRow(row, error) => {
                write!(f, "Failed to write pixel row {}: {}", row, error)
            }
            Self::FailedToFlushOutput(error) => {
                write!(f, "Failed to flush the output: {}", error)
            }
            Self::InvalidMagic(magic) => {
                write!(f, "File does not start with 'BM', found {:#06X}", magic)
            }
            Self::UnsupportedBitsPerPixel(bits) => {
                write!(
                    f,
                    "Only 24 bits per pixel are supported, but the file uses {}",
                    bits
                )
            }
            Self::UnsupportedColorPlanes(planes) => {
                write!(f, "Bitmaps must have exactly 1 color plane, found {}", planes)
            }
            Self::UnsupportedCompression(method) => {
                write!(
                    f,
                    "Only uncompressed bitmaps are supported, but the file uses compression method {}",
                    method
                )
            }
            Self::InvalidPixelDataOffset(offset) => {
                write!(f, "Pixel data offset {} points into the headers", offset)
            }
        }
    }
}

impl std::error::Error for Error {}
