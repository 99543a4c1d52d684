use std::{
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
};

pub use cli::CLIParser;
pub use color::{Color, HsiColor, HsiRange};
pub use error::Error;
pub use image::{
    filter::{FeatureMap, Kernel, KernelPreset},
    header::{BitmapFileHeader, DibHeader},
    reader::bmp::BmpImageReader,
    writer::bmp::BmpImageWriter,
    Image, ImageReader, ImageWriter, PixelPlane,
};

mod cli;
mod color;
mod error;
mod image;
mod logger;

pub type Result<T> = std::result::Result<T, error::Error>;

pub struct Arguments {
    input_file: PathBuf,
    output_file: PathBuf,
    operation: Operation,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    Copy,
    Grayscale,
    Filter(Vec<f32>),
    SelectColor { color: Color, tolerance: HsiColor },
    SelectColorRange { from: Color, to: Color },
}

fn open_input_file(file_path: &Path) -> Result<File> {
    File::open(file_path).map_err(|e| {
        Error::UnableToOpenInputFileForReading(file_path.display().to_string(), e)
    })
}

fn open_output_file(file_path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(file_path)
        .map_err(|e| {
            Error::UnableToOpenOutputFileForWriting(file_path.display().to_string(), e)
        })
}

fn apply_operation(mut image: Image, operation: &Operation) -> Result<Image> {
    match operation {
        Operation::Copy => Ok(image),
        Operation::Grayscale => {
            image.to_grayscale()?;
            Ok(image)
        }
        Operation::Filter(kernel) => image.apply_filter(kernel),
        Operation::SelectColor { color, tolerance } => image.select_color(color, tolerance),
        Operation::SelectColorRange { from, to } => image.select_color_range(from, to),
    }
}

pub fn process_bitmap(arguments: &Arguments) -> Result<()> {
    let mut image = Image::new();
    image.decode(&arguments.input_file)?;
    log::info!(
        "Read {}x{} bitmap from {}",
        image.width(),
        image.height(),
        arguments.input_file.display()
    );
    let output_image = apply_operation(image, &arguments.operation)?;
    output_image.encode(&arguments.output_file)?;
    log::info!("Wrote {}", arguments.output_file.display());
    Ok(())
}
