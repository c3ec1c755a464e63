use crate::stretch::filter::FilterKind;
use crate::Arguments;
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg,
    ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::PathBuf;
use std::{io, thread};

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_arguments(command);
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

    fn register_arguments(command: Command) -> Command {
        let command = Self::register_input_file_argument(command);
        let command = Self::register_output_file_argument(command);
        let command = Self::register_width_argument(command);
        let command = Self::register_height_argument(command);
        let command = Self::register_filter_argument(command);
        Self::register_threads_argument(command)
    }

    fn register_input_file_argument(command: Command) -> Command {
        command.arg(Self::create_input_file_argument())
    }

    fn register_output_file_argument(command: Command) -> Command {
        command.arg(Self::create_output_file_argument())
    }

    fn register_width_argument(command: Command) -> Command {
        command.arg(Self::create_width_argument())
    }

    fn register_height_argument(command: Command) -> Command {
        command.arg(Self::create_height_argument())
    }

    fn register_filter_argument(command: Command) -> Command {
        command.arg(Self::create_filter_argument())
    }

    fn register_threads_argument(command: Command) -> Command {
        command.arg(Self::create_threads_argument())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_input_file_argument() -> Arg {
        Arg::new("input_file")
            .help("Path to PPM input file")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_output_file_argument() -> Arg {
        Arg::new("output_file")
            .help("Path to PPM output file")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_width_argument() -> Arg {
        arg!(width: -W --width <WIDTH> "Target width in pixels")
            .required(true)
            .value_parser(value_parser!(u32))
    }

    fn create_height_argument() -> Arg {
        arg!(height: -H --height <HEIGHT> "Target height in pixels")
            .required(true)
            .value_parser(value_parser!(u32))
    }

    fn create_filter_argument() -> Arg {
        arg!(filter: -f --filter <FILTER> "Resampling filter")
            .default_value("Antialias")
            .value_parser(value_parser!(FilterKind))
    }

    fn create_threads_argument() -> Arg {
        arg!(-t --threads <THREADS> "Number of Threads")
            .default_value(get_number_of_threads().unwrap_or(1).to_string())
            .required(false)
            .value_parser(value_parser!(usize))
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        Arguments {
            input_file: Self::extract_input_file_argument(matches),
            output_file: Self::extract_output_file_argument(matches),
            width: Self::extract_width_argument(matches),
            height: Self::extract_height_argument(matches),
            filter: Self::extract_filter_argument(matches),
            number_of_threads: Self::extract_threads_argument(matches),
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

    fn extract_width_argument(matches: &ArgMatches) -> u32 {
        matches
            .get_one::<u32>("width")
            .expect("Required argument width not provided")
            .to_owned()
    }

    fn extract_height_argument(matches: &ArgMatches) -> u32 {
        matches
            .get_one::<u32>("height")
            .expect("Required argument height not provided")
            .to_owned()
    }

    fn extract_filter_argument(matches: &ArgMatches) -> FilterKind {
        matches
            .get_one::<FilterKind>("filter")
            .expect("Filter must be provided, but was unset.")
            .to_owned()
    }

    fn extract_threads_argument(matches: &ArgMatches) -> usize {
        matches
            .get_one::<usize>("threads")
            .expect("Required argument threads not provided")
            .to_owned()
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}

fn get_number_of_threads() -> io::Result<usize> {
    Ok(thread::available_parallelism()?.get())
}

#[cfg(test)]
mod tests {
    use clap::{error::ErrorKind, Command};

    use super::{CLIParser, FilterKind};

    const PROGRAM_NAME_ARGUMENT: &str = "test_program_name";

    #[test]
    fn parse_input_file_argument() {
        let input_file_name = "testfile.ppm";
        let command = Command::new("test");
        let command = CLIParser::register_input_file_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, input_file_name]);
        let input_file = CLIParser::extract_input_file_argument(&matches);
        assert_eq!(input_file.file_name().unwrap(), input_file_name);
    }

    #[test]
    fn parse_width_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_width_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--width", "640"]);
        let width = CLIParser::extract_width_argument(&matches);
        assert_eq!(width, 640);
    }

    #[test]
    fn parse_width_illegal_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_width_argument(command);
        let result =
            command.try_get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--width", "not_a_number"]);
        if let Err(error) = result {
            assert_eq!(error.kind(), ErrorKind::ValueValidation);
        } else {
            panic!("Illegal value for width not detected");
        }
    }

    #[test]
    fn parse_filter_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_filter_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--filter", "Bicubic"]);
        let actual_filter = CLIParser::extract_filter_argument(&matches);
        assert_eq!(actual_filter, FilterKind::Bicubic);
    }

    #[test]
    fn parse_filter_illegal_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_filter_argument(command);
        let result =
            command.try_get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--filter", "Gaussian"]);
        if let Err(error) = result {
            assert_eq!(error.kind(), ErrorKind::InvalidValue);
        } else {
            panic!("Illegal value for filter not detected");
        }
    }

    #[test]
    fn parse_filter_defaults_to_antialias() {
        let command = Command::new("test");
        let command = CLIParser::register_filter_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT]);
        let actual_filter = CLIParser::extract_filter_argument(&matches);
        assert_eq!(actual_filter, FilterKind::Antialias);
    }

    #[test]
    fn parse_number_of_threads_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_threads_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--threads", "5"]);
        let actual = CLIParser::extract_threads_argument(&matches);
        let expected = 5;
        assert_eq!(actual, expected);
    }

    #[test]
    fn parse_required_arguments_only() {
        let input_file_name = "inputfile.ppm";
        let input_file_path = format!("/input_directory/{}", input_file_name);
        let output_file_name = "outputfile.ppm";
        let output_file_path = format!("/output_directory/{}", output_file_name);
        let mut cli_parser = CLIParser::default();
        let arguments = cli_parser.parse(vec![
            PROGRAM_NAME_ARGUMENT,
            &input_file_path,
            &output_file_path,
            "--width",
            "32",
            "--height",
            "24",
            "-t",
            "8",
        ]);
        assert_eq!(
            arguments.input_file.file_name().unwrap(),
            input_file_name,
            "input file does not match"
        );
        assert_eq!(
            arguments.output_file.file_name().unwrap(),
            output_file_name,
            "output file does not match"
        );
        assert_eq!(arguments.width, 32, "width does not match");
        assert_eq!(arguments.height, 24, "height does not match");
        assert_eq!(
            arguments.filter,
            FilterKind::Antialias,
            "filter does not match"
        );
        assert_eq!(
            arguments.number_of_threads, 8,
            "number_of_threads does not match"
        );
    }
}
