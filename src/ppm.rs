use std::io::{Read, Write};
use std::str;

use crate::error::Error;
use crate::image::{Image, ImageMode, PixelBuffer, SLOTS_PER_PIXEL};
use crate::Result;

const HEADER_VERSION_TOKEN_NAME: &str = "Header Version";
const WIDTH_HEADER_TOKEN_NAME: &str = "Width Header";
const HEIGHT_HEADER_TOKEN_NAME: &str = "Height Header";
const MAX_VALUE_HEADER_TOKEN_NAME: &str = "Max Value Header";
const SAMPLE_VALUE_TOKEN_NAME: &str = "Sample Value";

/// Splits a PPM stream into whitespace separated tokens, skipping comment
/// lines introduced by '#'.
pub struct PPMTokenizer<R: Read> {
    reader: R,
    buffer: Vec<u8>,
}

impl<R: Read> PPMTokenizer<R> {
    pub fn new(reader: R) -> Self {
        PPMTokenizer {
            reader,
            buffer: Vec::new(),
        }
    }
}

impl<R: Read> Iterator for PPMTokenizer<R> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();
        let mut byte = [0; 1];
        let mut in_comment = false;

        while self.reader.read(&mut byte).unwrap_or(0) > 0 {
            if in_comment {
                if byte[0] == b'\n' {
                    in_comment = false;
                }
                continue;
            }
            if byte[0] == b'#' {
                in_comment = true;
                continue;
            }
            if byte[0].is_ascii_whitespace() {
                if !self.buffer.is_empty() {
                    break;
                }
            } else {
                self.buffer.push(byte[0]);
            }
        }

        if self.buffer.is_empty() {
            return None;
        }

        str::from_utf8(&self.buffer).ok().map(str::to_owned)
    }
}

/// Reads ASCII PPM files: P2 becomes an 8-bit single channel image, P3 an
/// 8-bit three band image. Sample values are rescaled to the 0..=255 range.
pub struct PPMImageReader<R: Read> {
    reader: R,
}

impl<R: Read> PPMImageReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn read_image(&mut self) -> Result<Image> {
        let mut tokenizer = PPMTokenizer::new(&mut self.reader);
        let version = next_token(&mut tokenizer, HEADER_VERSION_TOKEN_NAME)?;
        let samples_per_pixel = match version.as_str() {
            "P2" => 1,
            "P3" => 3,
            _ => return Err(Error::UnsupportedPPMHeaderVersion(version)),
        };
        let width = parse_token::<u32>(&mut tokenizer, WIDTH_HEADER_TOKEN_NAME)?;
        let height = parse_token::<u32>(&mut tokenizer, HEIGHT_HEADER_TOKEN_NAME)?;
        let max_value = parse_token::<u32>(&mut tokenizer, MAX_VALUE_HEADER_TOKEN_NAME)?;
        if !(1..=65535).contains(&max_value) {
            return Err(Error::MaxValueOfPPMFileOutOfRange(max_value));
        }
        let expected_samples = width as usize * height as usize * samples_per_pixel;
        let mut samples: Vec<u8> = Vec::with_capacity(expected_samples);
        for token in tokenizer.by_ref() {
            let value: u32 = token
                .parse()
                .map_err(|_| Error::ParsingOfTokenFailed(SAMPLE_VALUE_TOKEN_NAME))?;
            if value > max_value {
                return Err(Error::ParsingOfTokenFailed(SAMPLE_VALUE_TOKEN_NAME));
            }
            samples.push((value * 255 / max_value) as u8);
        }
        if samples.len() != expected_samples {
            return Err(Error::MismatchOfSizeBetweenHeaderAndValues);
        }
        if samples_per_pixel == 1 {
            return Image::from_gray8(width, height, samples);
        }
        let mut image = Image::new(ImageMode::Multi8 { bands: 3 }, width, height)?;
        if let PixelBuffer::Multi8(slots) = image.buffer_mut() {
            for (pixel, sample_triple) in samples.chunks_exact(3).enumerate() {
                slots[pixel * SLOTS_PER_PIXEL..pixel * SLOTS_PER_PIXEL + 3]
                    .copy_from_slice(sample_triple);
            }
        }
        Ok(image)
    }
}

fn next_token(
    tokenizer: &mut impl Iterator<Item = String>,
    token_name: &'static str,
) -> Result<String> {
    tokenizer
        .next()
        .ok_or(Error::PPMFileDoesNotContainRequiredToken(token_name))
}

fn parse_token<T: str::FromStr>(
    tokenizer: &mut impl Iterator<Item = String>,
    token_name: &'static str,
) -> Result<T> {
    next_token(tokenizer, token_name)?
        .parse()
        .map_err(|_| Error::ParsingOfTokenFailed(token_name))
}

/// Writes 8-bit single channel and three band images as ASCII PPM files.
pub struct PPMImageWriter<W: Write> {
    writer: W,
}

impl<W: Write> PPMImageWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_image(&mut self, image: &Image) -> Result<()> {
        match image.buffer() {
            PixelBuffer::Gray8(dots) => {
                self.write_header("P2", image.width(), image.height())?;
                self.write_samples(dots.iter().copied(), image.width() as usize)
            }
            PixelBuffer::Multi8(slots) if image.mode() == (ImageMode::Multi8 { bands: 3 }) => {
                self.write_header("P3", image.width(), image.height())?;
                let samples = slots
                    .chunks_exact(SLOTS_PER_PIXEL)
                    .flat_map(|pixel| pixel[0..3].iter().copied());
                self.write_samples(samples, image.width() as usize * 3)
            }
            _ => Err(Error::ImageModeNotWritableAsPPM(image.mode())),
        }
    }

    fn write_header(&mut self, version: &str, width: u32, height: u32) -> Result<()> {
        writeln!(self.writer, "{}\n{} {}\n255", version, width, height)
            .map_err(Error::FailedToWriteImageData)
    }

    fn write_samples(
        &mut self,
        samples: impl Iterator<Item = u8>,
        samples_per_row: usize,
    ) -> Result<()> {
        for (index, sample) in samples.enumerate() {
            let separator = if samples_per_row == 0 || (index + 1) % samples_per_row == 0 {
                '\n'
            } else {
                ' '
            };
            write!(self.writer, "{}{}", sample, separator).map_err(Error::FailedToWriteImageData)?;
        }
        self.writer.flush().map_err(Error::FailedToWriteImageData)
    }
}
