use crate::error::Error;
use crate::Result;

/// Number of 8-bit slots a multi band pixel occupies, regardless of how many
/// bands are actually in use.
pub const SLOTS_PER_PIXEL: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageMode {
    /// 8-bit single channel
    Gray8,
    /// 8-bit multi channel, 1 to 4 bands packed into 4 slots per pixel
    Multi8 { bands: u8 },
    /// 32-bit signed integer per pixel
    Int32,
    /// 32-bit float per pixel
    Float32,
    /// 8-bit palette index per pixel
    Palette,
    /// bi-level, one byte per pixel holding 0 or 255
    Bilevel,
}

impl ImageMode {
    /// Whether pixels of this mode can take part in a weighted average.
    /// Palette indices and bi-level values cannot.
    pub fn supports_resampling(&self) -> bool {
        !matches!(self, Self::Palette | Self::Bilevel)
    }

    /// Maps logical band indices to physical slot offsets within a packed
    /// pixel. Two band images are stored as luminance plus alpha, with the
    /// alpha band living in the last slot.
    pub fn band_offsets(&self) -> &'static [usize] {
        match self {
            Self::Multi8 { bands: 1 } => &[0],
            Self::Multi8 { bands: 2 } => &[0, 3],
            Self::Multi8 { bands: 3 } => &[0, 1, 2],
            Self::Multi8 { bands: 4 } => &[0, 1, 2, 3],
            _ => &[0],
        }
    }
}

pub enum PixelBuffer {
    Gray8(Vec<u8>),
    Multi8(Vec<u8>),
    Int32(Vec<i32>),
    Float32(Vec<f32>),
    Palette(Vec<u8>),
    Bilevel(Vec<u8>),
}

pub struct Image {
    width: u32,
    height: u32,
    mode: ImageMode,
    buffer: PixelBuffer,
}

impl Image {
    /// Allocates a zero filled image of the given mode and dimensions.
    pub fn new(mode: ImageMode, width: u32, height: u32) -> Result<Self> {
        let pixel_count = (width as usize)
            .checked_mul(height as usize)
            .ok_or(Error::ImageBufferTooLarge(width, height))?;
        let buffer = match mode {
            ImageMode::Gray8 => PixelBuffer::Gray8(vec![0; pixel_count]),
            ImageMode::Multi8 { bands } => {
                if !(1..=4).contains(&bands) {
                    return Err(Error::UnsupportedBandCount(bands));
                }
                let slot_count = pixel_count
                    .checked_mul(SLOTS_PER_PIXEL)
                    .ok_or(Error::ImageBufferTooLarge(width, height))?;
                PixelBuffer::Multi8(vec![0; slot_count])
            }
            ImageMode::Int32 => PixelBuffer::Int32(vec![0; pixel_count]),
            ImageMode::Float32 => PixelBuffer::Float32(vec![0.0; pixel_count]),
            ImageMode::Palette => PixelBuffer::Palette(vec![0; pixel_count]),
            ImageMode::Bilevel => PixelBuffer::Bilevel(vec![0; pixel_count]),
        };
        Ok(Self {
            width,
            height,
            mode,
            buffer,
        })
    }

    pub fn from_gray8(width: u32, height: u32, dots: Vec<u8>) -> Result<Self> {
        let mut image = Self::new(ImageMode::Gray8, width, height)?;
        match &mut image.buffer {
            PixelBuffer::Gray8(buffer) => {
                if buffer.len() != dots.len() {
                    return Err(Error::MismatchOfSizeBetweenHeaderAndValues);
                }
                *buffer = dots;
            }
            _ => unreachable!(),
        }
        Ok(image)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn mode(&self) -> ImageMode {
        self.mode
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }
}

/// Writes the transpose of `source` into `destination`. The destination must
/// share the source mode and carry the swapped dimensions.
pub fn transpose(destination: &mut Image, source: &Image) -> Result<()> {
    if destination.mode != source.mode {
        return Err(Error::SourceAndDestinationModesDiffer(
            source.mode,
            destination.mode,
        ));
    }
    if destination.width != source.height || destination.height != source.width {
        return Err(Error::TransposedDimensionsDoNotMatch);
    }
    let width = source.width as usize;
    let height = source.height as usize;
    match (&source.buffer, &mut destination.buffer) {
        (PixelBuffer::Gray8(source_dots), PixelBuffer::Gray8(destination_dots))
        | (PixelBuffer::Palette(source_dots), PixelBuffer::Palette(destination_dots))
        | (PixelBuffer::Bilevel(source_dots), PixelBuffer::Bilevel(destination_dots)) => {
            transpose_dots(source_dots, destination_dots, width, height);
        }
        (PixelBuffer::Int32(source_dots), PixelBuffer::Int32(destination_dots)) => {
            transpose_dots(source_dots, destination_dots, width, height);
        }
        (PixelBuffer::Float32(source_dots), PixelBuffer::Float32(destination_dots)) => {
            transpose_dots(source_dots, destination_dots, width, height);
        }
        (PixelBuffer::Multi8(source_slots), PixelBuffer::Multi8(destination_slots)) => {
            for y in 0..height {
                for x in 0..width {
                    let source_start = (y * width + x) * SLOTS_PER_PIXEL;
                    let destination_start = (x * height + y) * SLOTS_PER_PIXEL;
                    destination_slots[destination_start..destination_start + SLOTS_PER_PIXEL]
                        .copy_from_slice(&source_slots[source_start..source_start + SLOTS_PER_PIXEL]);
                }
            }
        }
        _ => unreachable!("buffers of equal modes must carry equal representations"),
    }
    Ok(())
}

fn transpose_dots<T: Copy>(source: &[T], destination: &mut [T], width: usize, height: usize) {
    for y in 0..height {
        for x in 0..width {
            destination[x * height + y] = source[y * width + x];
        }
    }
}

/// Source of intermediate images for the two pass stretch pipeline. The
/// pipeline returns every image it obtained through `allocate` back through
/// `release`, on success and on every failure path.
pub trait ImageAllocator {
    fn allocate(&self, mode: ImageMode, width: u32, height: u32) -> Result<Image>;
    fn release(&self, image: Image);
}

pub struct SystemAllocator;

impl ImageAllocator for SystemAllocator {
    fn allocate(&self, mode: ImageMode, width: u32, height: u32) -> Result<Image> {
        Image::new(mode, width, height)
    }

    fn release(&self, image: Image) {
        drop(image);
    }
}

#[cfg(test)]
mod test {
    use super::{transpose, Image, ImageMode, PixelBuffer, SLOTS_PER_PIXEL};

    #[rustfmt::skip]
    const TEST_DOTS: &[u8] = &[
        1, 2, 3,
        4, 5, 6,
    ];

    #[rustfmt::skip]
    const TEST_DOTS_TRANSPOSED: &[u8] = &[
        1, 4,
        2, 5,
        3, 6,
    ];

    #[test]
    fn new_image_is_zero_filled() {
        let image = Image::new(ImageMode::Float32, 3, 2).expect("allocation must succeed");
        match image.buffer() {
            PixelBuffer::Float32(dots) => {
                assert_eq!(dots.len(), 6, "buffer must hold one dot per pixel");
                assert!(dots.iter().all(|&dot| dot == 0.0), "buffer must be zeroed");
            }
            _ => panic!("float image must carry a float buffer"),
        }
    }

    #[test]
    fn multi_band_image_packs_four_slots_per_pixel() {
        let image =
            Image::new(ImageMode::Multi8 { bands: 3 }, 2, 2).expect("allocation must succeed");
        match image.buffer() {
            PixelBuffer::Multi8(slots) => {
                assert_eq!(slots.len(), 4 * SLOTS_PER_PIXEL, "4 slots per pixel expected");
            }
            _ => panic!("multi band image must carry a slot buffer"),
        }
    }

    #[test]
    fn zero_band_image_is_rejected() {
        let result = Image::new(ImageMode::Multi8 { bands: 0 }, 2, 2);
        assert!(result.is_err(), "band count 0 must be rejected");
    }

    #[test]
    fn five_band_image_is_rejected() {
        let result = Image::new(ImageMode::Multi8 { bands: 5 }, 2, 2);
        assert!(result.is_err(), "band count 5 must be rejected");
    }

    #[test]
    fn two_band_mode_maps_alpha_to_last_slot() {
        let mode = ImageMode::Multi8 { bands: 2 };
        assert_eq!(mode.band_offsets(), &[0, 3]);
    }

    #[test]
    fn three_band_mode_maps_bands_in_order() {
        let mode = ImageMode::Multi8 { bands: 3 };
        assert_eq!(mode.band_offsets(), &[0, 1, 2]);
    }

    #[test]
    fn palette_and_bilevel_do_not_support_resampling() {
        assert!(!ImageMode::Palette.supports_resampling());
        assert!(!ImageMode::Bilevel.supports_resampling());
        assert!(ImageMode::Gray8.supports_resampling());
        assert!(ImageMode::Float32.supports_resampling());
    }

    #[test]
    fn transpose_gray_image() {
        let source = Image::from_gray8(3, 2, Vec::from(TEST_DOTS)).expect("valid image");
        let mut destination =
            Image::new(ImageMode::Gray8, 2, 3).expect("allocation must succeed");
        transpose(&mut destination, &source).expect("transpose must succeed");
        match destination.buffer() {
            PixelBuffer::Gray8(dots) => assert_eq!(dots.as_slice(), TEST_DOTS_TRANSPOSED),
            _ => panic!("gray image must carry a gray buffer"),
        }
    }

    #[test]
    fn transpose_multi_band_image_moves_whole_pixels() {
        let mut source =
            Image::new(ImageMode::Multi8 { bands: 4 }, 2, 1).expect("allocation must succeed");
        if let PixelBuffer::Multi8(slots) = source.buffer_mut() {
            slots.copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        }
        let mut destination =
            Image::new(ImageMode::Multi8 { bands: 4 }, 1, 2).expect("allocation must succeed");
        transpose(&mut destination, &source).expect("transpose must succeed");
        match destination.buffer() {
            PixelBuffer::Multi8(slots) => {
                assert_eq!(slots.as_slice(), &[1, 2, 3, 4, 5, 6, 7, 8]);
            }
            _ => panic!("multi band image must carry a slot buffer"),
        }
    }

    #[test]
    fn transpose_rejects_unswapped_dimensions() {
        let source = Image::new(ImageMode::Gray8, 3, 2).expect("allocation must succeed");
        let mut destination = Image::new(ImageMode::Gray8, 3, 2).expect("allocation must succeed");
        let result = transpose(&mut destination, &source);
        assert!(result.is_err(), "unswapped dimensions must be rejected");
    }

    #[test]
    fn transpose_rejects_differing_modes() {
        let source = Image::new(ImageMode::Gray8, 3, 2).expect("allocation must succeed");
        let mut destination = Image::new(ImageMode::Int32, 2, 3).expect("allocation must succeed");
        let result = transpose(&mut destination, &source);
        assert!(result.is_err(), "differing modes must be rejected");
    }
}
