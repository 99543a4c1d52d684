use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};

use crate::image::header::{BitmapFileHeader, DibHeader};

const CONFIG_FILE: &str = "log4rs.yaml";
const FALLBACK_APPENDER: &str = "stderr";

#[ctor::ctor]
fn init() {
    if log4rs::init_file(CONFIG_FILE, Default::default()).is_ok() {
        return;
    }
    if let Err(e) = init_fallback() {
        eprintln!("Unable to initialize logging: {}", e);
    }
}

fn init_fallback() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let stderr = ConsoleAppender::builder().target(Target::Stderr).build();
    let config = Config::builder()
        .appender(Appender::builder().build(FALLBACK_APPENDER, Box::new(stderr)))
        .build(
            Root::builder()
                .appender(FALLBACK_APPENDER)
                .build(LevelFilter::Warn),
        )?;
    log4rs::init_config(config)?;
    Ok(())
}

pub fn log_headers(action: &str, file_header: &BitmapFileHeader, dib_header: &DibHeader) {
    log::debug!(
        "{} bitmap {}x{}, {} bpp, file size {} bytes, pixel data at {:#06X} ({} bytes)",
        action,
        dib_header.width,
        dib_header.height,
        dib_header.bits,
        file_header.size,
        file_header.offset,
        dib_header.image_size
    );
}
