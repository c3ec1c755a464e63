use std::env::args_os;

use imgstretch::{resize_ppm_image, CLIParser};

fn main() {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    match resize_ppm_image(&arguments) {
        Ok(_) => println!("Resize successful"),
        Err(e) => eprintln!("Resize failed because of: {}", e),
    }
}
