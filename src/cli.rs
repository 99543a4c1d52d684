use crate::color::{Color, HsiColor};
use crate::image::filter::KernelPreset;
use crate::{Arguments, Operation};
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg,
    ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;

const COPY_SUBCOMMAND: &str = "copy";
const GRAYSCALE_SUBCOMMAND: &str = "grayscale";
const FILTER_SUBCOMMAND: &str = "filter";
const SELECT_COLOR_SUBCOMMAND: &str = "select-color";
const SELECT_RANGE_SUBCOMMAND: &str = "select-range";

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_subcommands(command);
        CLIParser { command }
    }

    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| e.exit());
        Self::extract_arguments(&matches)
    }

    fn register_subcommands(command: Command) -> Command {
        command
            .subcommand_required(true)
            .arg_required_else_help(true)
            .subcommand(Self::create_copy_subcommand())
            .subcommand(Self::create_grayscale_subcommand())
            .subcommand(Self::create_filter_subcommand())
            .subcommand(Self::create_select_color_subcommand())
            .subcommand(Self::create_select_range_subcommand())
    }

    fn register_file_arguments(command: Command) -> Command {
        let command = Self::register_input_file_argument(command);
        Self::register_output_file_argument(command)
    }

    fn register_input_file_argument(command: Command) -> Command {
        command.arg(Self::create_input_file_argument())
    }

    fn register_output_file_argument(command: Command) -> Command {
        command.arg(Self::create_output_file_argument())
    }

    fn register_kernel_preset_argument(command: Command) -> Command {
        command.arg(Self::create_kernel_preset_argument())
    }

    fn register_weights_argument(command: Command) -> Command {
        command.arg(Self::create_weights_argument())
    }

    fn register_color_argument(command: Command) -> Command {
        command.arg(Self::create_color_argument())
    }

    fn register_tolerance_argument(command: Command) -> Command {
        command.arg(Self::create_tolerance_argument())
    }

    fn register_range_arguments(command: Command) -> Command {
        command
            .arg(Self::create_range_color_argument("from", "First color of the range"))
            .arg(Self::create_range_color_argument("to", "Second color of the range"))
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_copy_subcommand() -> Command {
        let command = Command::new(COPY_SUBCOMMAND).about("Decode and re-encode a bitmap");
        Self::register_file_arguments(command)
    }

    fn create_grayscale_subcommand() -> Command {
        let command = Command::new(GRAYSCALE_SUBCOMMAND).about("Convert a bitmap to grayscale");
        Self::register_file_arguments(command)
    }

    fn create_filter_subcommand() -> Command {
        let command = Command::new(FILTER_SUBCOMMAND).about("Convolve a bitmap with a kernel");
        let command = Self::register_file_arguments(command);
        let command = Self::register_kernel_preset_argument(command);
        Self::register_weights_argument(command)
    }

    fn create_select_color_subcommand() -> Command {
        let command = Command::new(SELECT_COLOR_SUBCOMMAND)
            .about("Keep pixels close to a reference color in HSI space");
        let command = Self::register_file_arguments(command);
        let command = Self::register_color_argument(command);
        Self::register_tolerance_argument(command)
    }

    fn create_select_range_subcommand() -> Command {
        let command = Command::new(SELECT_RANGE_SUBCOMMAND)
            .about("Keep pixels inside the HSI box spanned by two colors");
        let command = Self::register_file_arguments(command);
        Self::register_range_arguments(command)
    }

    fn create_input_file_argument() -> Arg {
        Arg::new("input_file")
            .help("Path to bitmap input file")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_output_file_argument() -> Arg {
        Arg::new("output_file")
            .help("Path to bitmap output file")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_kernel_preset_argument() -> Arg {
        arg!(kernel: -k --kernel <PRESET> "Kernel preset, laplacian if no weights are given")
            .required(false)
            .value_parser(value_parser!(KernelPreset))
            .conflicts_with("weights")
    }

    fn create_weights_argument() -> Arg {
        arg!(weights: -w --weights <WEIGHTS> "Comma separated square kernel, row by row")
            .required(false)
            .allow_hyphen_values(true)
            .value_parser(parse_weights)
    }

    fn create_color_argument() -> Arg {
        arg!(color: -c --color <RGB> "Reference color as R,G,B")
            .default_value("254,254,183")
            .value_parser(Color::from_str)
    }

    fn create_tolerance_argument() -> Arg {
        arg!(tolerance: -t --tolerance <HSI> "Hue, saturation and intensity tolerance as H,S,I")
            .default_value("0.8,0.1,0.5")
            .value_parser(HsiColor::from_str)
    }

    fn create_range_color_argument(name: &'static str, help: &'static str) -> Arg {
        Arg::new(name)
            .long(name)
            .value_name("RGB")
            .help(help)
            .required(true)
            .value_parser(Color::from_str)
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        let (name, matches) = matches
            .subcommand()
            .expect("A subcommand is required, but none was provided");
        Arguments {
            input_file: Self::extract_input_file_argument(matches),
            output_file: Self::extract_output_file_argument(matches),
            operation: Self::extract_operation(name, matches),
        }
    }

    fn extract_operation(name: &str, matches: &ArgMatches) -> Operation {
        match name {
            COPY_SUBCOMMAND => Operation::Copy,
            GRAYSCALE_SUBCOMMAND => Operation::Grayscale,
            FILTER_SUBCOMMAND => Operation::Filter(Self::extract_kernel_arguments(matches)),
            SELECT_COLOR_SUBCOMMAND => Operation::SelectColor {
                color: Self::extract_color_argument(matches, "color"),
                tolerance: Self::extract_tolerance_argument(matches),
            },
            SELECT_RANGE_SUBCOMMAND => Operation::SelectColorRange {
                from: Self::extract_color_argument(matches, "from"),
                to: Self::extract_color_argument(matches, "to"),
            },
            other => unreachable!("Subcommand '{}' is not registered", other),
        }
    }

    fn extract_input_file_argument(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("input_file")
            .expect("Required argument input_file not provided")
            .clone()
    }

    fn extract_output_file_argument(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("output_file")
            .expect("Required argument output_file not provided")
            .clone()
    }

    fn extract_kernel_arguments(matches: &ArgMatches) -> Vec<f32> {
        if let Some(weights) = matches.get_one::<Vec<f32>>("weights") {
            return weights.clone();
        }
        matches
            .get_one::<KernelPreset>("kernel")
            .copied()
            .unwrap_or_default()
            .weights()
            .to_vec()
    }

    fn extract_color_argument(matches: &ArgMatches, name: &str) -> Color {
        matches
            .get_one::<Color>(name)
            .expect("Color must be provided, but was unset.")
            .to_owned()
    }

    fn extract_tolerance_argument(matches: &ArgMatches) -> HsiColor {
        matches
            .get_one::<HsiColor>("tolerance")
            .expect("Tolerance must be provided, but was unset.")
            .to_owned()
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_weights(value: &str) -> Result<Vec<f32>, String> {
    value
        .split(',')
        .map(|weight| {
            weight
                .trim()
                .parse::<f32>()
                .map_err(|_| format!("'{}' is not a valid kernel weight", weight))
        })
        .collect()
}
