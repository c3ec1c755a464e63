use super::plan::ResamplePlan;
use crate::image::SLOTS_PER_PIXEL;

/// Applies a resample plan to one row of a pixel representation. One
/// implementation exists per supported representation, each owning its write
/// back rule.
pub trait RowResampler<T> {
    fn resample_row(&self, source_row: &[T], destination_row: &mut [T], plan: &ResamplePlan);
}

/// Scales the weighted sum, applies the rounding bias and clamps into the
/// 8-bit range.
fn write_back_u8(weighted_sum: f32, norm: f32) -> u8 {
    let value = weighted_sum * norm + 0.5;
    if value < 0.5 {
        0
    } else if value >= 255.0 {
        255
    } else {
        value as u8
    }
}

/// 8-bit single channel rows.
#[derive(Clone, Copy)]
pub struct Gray8RowResampler;

impl RowResampler<u8> for Gray8RowResampler {
    fn resample_row(&self, source_row: &[u8], destination_row: &mut [u8], plan: &ResamplePlan) {
        for (index, window) in plan.windows().iter().enumerate() {
            let mut weighted_sum = 0.0_f32;
            for (tap, &weight) in window.weights.iter().enumerate() {
                weighted_sum += source_row[window.xmin + tap] as f32 * weight;
            }
            destination_row[index] = write_back_u8(weighted_sum, window.norm);
        }
    }
}

/// 8-bit multi channel rows, packed four slots per pixel. Only the physical
/// slots named in `band_offsets` are convolved; the remaining slots keep
/// their zero fill.
#[derive(Clone, Copy)]
pub struct Multi8RowResampler {
    band_offsets: &'static [usize],
}

impl Multi8RowResampler {
    pub fn new(band_offsets: &'static [usize]) -> Self {
        Self { band_offsets }
    }
}

impl RowResampler<u8> for Multi8RowResampler {
    fn resample_row(&self, source_row: &[u8], destination_row: &mut [u8], plan: &ResamplePlan) {
        for (index, window) in plan.windows().iter().enumerate() {
            for &band in self.band_offsets {
                let mut weighted_sum = 0.0_f32;
                for (tap, &weight) in window.weights.iter().enumerate() {
                    let slot = (window.xmin + tap) * SLOTS_PER_PIXEL + band;
                    weighted_sum += source_row[slot] as f32 * weight;
                }
                destination_row[index * SLOTS_PER_PIXEL + band] =
                    write_back_u8(weighted_sum, window.norm);
            }
        }
    }
}

/// 32-bit integer rows. The scaled sum is truncated, without bias or clamp.
#[derive(Clone, Copy)]
pub struct Int32RowResampler;

impl RowResampler<i32> for Int32RowResampler {
    fn resample_row(&self, source_row: &[i32], destination_row: &mut [i32], plan: &ResamplePlan) {
        for (index, window) in plan.windows().iter().enumerate() {
            let mut weighted_sum = 0.0_f32;
            for (tap, &weight) in window.weights.iter().enumerate() {
                weighted_sum += source_row[window.xmin + tap] as f32 * weight;
            }
            destination_row[index] = (weighted_sum * window.norm) as i32;
        }
    }
}

/// 32-bit float rows. The scaled sum is stored as is.
#[derive(Clone, Copy)]
pub struct Float32RowResampler;

impl RowResampler<f32> for Float32RowResampler {
    fn resample_row(&self, source_row: &[f32], destination_row: &mut [f32], plan: &ResamplePlan) {
        for (index, window) in plan.windows().iter().enumerate() {
            let mut weighted_sum = 0.0_f32;
            for (tap, &weight) in window.weights.iter().enumerate() {
                weighted_sum += source_row[window.xmin + tap] * weight;
            }
            destination_row[index] = weighted_sum * window.norm;
        }
    }
}
