use std::env::args_os;
use std::process::ExitCode;

use bitmap_toolkit::{process_bitmap, CLIParser};

fn main() -> ExitCode {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    match process_bitmap(&arguments) {
        Ok(_) => {
            println!("Processing successful");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Processing failed because of: {}", e);
            ExitCode::FAILURE
        }
    }
}
