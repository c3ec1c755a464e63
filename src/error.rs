use std::fmt::Display;

use crate::image::ImageMode;

#[derive(Debug)]
pub enum Error {
    SourceAndDestinationModesDiffer(ImageMode, ImageMode),
    ResamplingUnsupportedForMode(ImageMode),
    HeightsOfSourceAndDestinationDiffer(u32, u32),
    TransposedDimensionsDoNotMatch,
    UnsupportedBandCount(u8),
    ImageBufferTooLarge(u32, u32),
    AllocationOfImageFailed,
    PPMFileDoesNotContainRequiredToken(&'static str),
    ParsingOfTokenFailed(&'static str),
    UnsupportedPPMHeaderVersion(String),
    MaxValueOfPPMFileOutOfRange(u32),
    MismatchOfSizeBetweenHeaderAndValues,
    ImageModeNotWritableAsPPM(ImageMode),
    UnableToOpenInputFileForReading(String, std::io::Error),
    UnableToOpenOutputFileForWriting(String, std::io::Error),
    FailedToWriteImageData(std::io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceAndDestinationModesDiffer(source_mode, destination_mode) => {
                write!(
                    f,
                    "Source image mode {:?} does not match destination image mode {:?}",
                    source_mode, destination_mode
                )
            }
            Self::ResamplingUnsupportedForMode(mode) => {
                write!(f, "Resampling is not supported for image mode {:?}", mode)
            }
            Self::HeightsOfSourceAndDestinationDiffer(source_height, destination_height) => {
                write!(
                    f,
                    "Horizontal stretch requires equal heights, but source height is {} and destination height is {}",
                    source_height, destination_height
                )
            }
            Self::TransposedDimensionsDoNotMatch => {
                write!(
                    f,
                    "Transpose requires the destination dimensions to be the swapped source dimensions"
                )
            }
            Self::UnsupportedBandCount(bands) => {
                write!(
                    f,
                    "Multi band images must have 1 to 4 bands, but {} were requested",
                    bands
                )
            }
            Self::ImageBufferTooLarge(width, height) => {
                write!(
                    f,
                    "Pixel buffer for a {}x{} image exceeds the addressable size",
                    width, height
                )
            }
            Self::AllocationOfImageFailed => {
                write!(f, "Allocation of an intermediate image failed")
            }
            Self::PPMFileDoesNotContainRequiredToken(token_name) => {
                write!(f, "Expected token '{}' not found in PPM file", token_name)
            }
            Self::ParsingOfTokenFailed(token_name) => {
                write!(f, "Parsing of token '{}' failed", token_name)
            }
            Self::UnsupportedPPMHeaderVersion(header) => {
                write!(
                    f,
                    "PPM header version '{}' is not supported, expected P2 or P3",
                    header
                )
            }
            Self::MaxValueOfPPMFileOutOfRange(max_value) => {
                write!(
                    f,
                    "Max value {} of PPM file is outside the range 1 to 65535",
                    max_value
                )
            }
            Self::MismatchOfSizeBetweenHeaderAndValues => {
                write!(
                    f,
                    "Number of pixel values does not match the size provided in the header"
                )
            }
            Self::ImageModeNotWritableAsPPM(mode) => {
                write!(f, "Image mode {:?} cannot be written as a PPM file", mode)
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
            Self::FailedToWriteImageData(error) => {
                write!(f, "Failed to write image data: {}", error)
            }
        }
    }
}

impl std::error::Error for Error {}
