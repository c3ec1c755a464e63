use std::{
    fs::{File, OpenOptions},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use threadpool::ThreadPool;

pub use cli::CLIParser;
use error::Error;
use image::{ImageAllocator, SystemAllocator};
use ppm::{PPMImageReader, PPMImageWriter};
use stretch::{filter::FilterKind, Stretcher};

mod cli;
pub mod error;
pub mod image;
mod logger;
pub mod ppm;
pub mod stretch;

pub type Result<T> = std::result::Result<T, error::Error>;

pub struct Arguments {
    input_file: PathBuf,
    output_file: PathBuf,
    width: u32,
    height: u32,
    filter: FilterKind,
    number_of_threads: usize,
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

pub fn resize_ppm_image(arguments: &Arguments) -> Result<()> {
    let input_file = open_input_file(&arguments.input_file)?;
    let output_file = open_output_file(&arguments.output_file)?;
    let source = PPMImageReader::new(BufReader::new(&input_file)).read_image()?;
    let allocator = SystemAllocator;
    let mut destination = allocator.allocate(source.mode(), arguments.width, arguments.height)?;
    let threadpool = ThreadPool::new(arguments.number_of_threads.max(1));
    let stretcher = Stretcher::new(arguments.filter, &threadpool);
    stretcher.stretch(&mut destination, &source, &allocator)?;
    let mut output_file_writer = PPMImageWriter::new(BufWriter::new(&output_file));
    output_file_writer.write_image(&destination)?;
    allocator.release(destination);
    Ok(())
}
