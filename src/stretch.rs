use std::sync::{mpsc, Arc};

use threadpool::ThreadPool;

pub mod convolve;
pub mod filter;
pub mod plan;

use convolve::{
    Float32RowResampler, Gray8RowResampler, Int32RowResampler, Multi8RowResampler, RowResampler,
};
use filter::FilterKind;
use plan::{plan_axis, ResamplePlan};

use crate::error::Error;
use crate::image::{transpose, Image, ImageAllocator, PixelBuffer, SLOTS_PER_PIXEL};
use crate::Result;

/// Resamples images with a fixed reconstruction filter. Rows are independent
/// of each other, so the per row convolution fans out over the thread pool.
pub struct Stretcher<'a> {
    filter: FilterKind,
    threadpool: &'a ThreadPool,
}

impl<'a> Stretcher<'a> {
    pub fn new(filter: FilterKind, threadpool: &'a ThreadPool) -> Self {
        Self { filter, threadpool }
    }

    /// Resamples the width of `source` to the width of `destination`. Both
    /// images must share mode and height; the plan for the output axis is
    /// computed once and applied to every row.
    pub fn stretch_horizontal(&self, destination: &mut Image, source: &Image) -> Result<()> {
        if source.mode() != destination.mode() {
            return Err(Error::SourceAndDestinationModesDiffer(
                source.mode(),
                destination.mode(),
            ));
        }
        if source.height() != destination.height() {
            return Err(Error::HeightsOfSourceAndDestinationDiffer(
                source.height(),
                destination.height(),
            ));
        }
        if !source.mode().supports_resampling() {
            return Err(Error::ResamplingUnsupportedForMode(source.mode()));
        }
        let mode = source.mode();
        let source_width = source.width() as usize;
        let destination_width = destination.width() as usize;
        let height = source.height() as usize;
        let plan = Arc::new(plan_axis(source_width, destination_width, self.filter));
        log::debug!(
            "horizontal stretch {}x{} -> {}x{} with {:?}, at most {} taps per window",
            source_width,
            height,
            destination_width,
            height,
            self.filter,
            plan.max_taps()
        );
        match (source.buffer(), destination.buffer_mut()) {
            (PixelBuffer::Gray8(source_dots), PixelBuffer::Gray8(destination_dots)) => {
                self.resample_rows(
                    &plan,
                    source_dots,
                    source_width,
                    destination_width,
                    height,
                    Gray8RowResampler,
                    destination_dots,
                );
            }
            (PixelBuffer::Multi8(source_slots), PixelBuffer::Multi8(destination_slots)) => {
                self.resample_rows(
                    &plan,
                    source_slots,
                    source_width * SLOTS_PER_PIXEL,
                    destination_width * SLOTS_PER_PIXEL,
                    height,
                    Multi8RowResampler::new(mode.band_offsets()),
                    destination_slots,
                );
            }
            (PixelBuffer::Int32(source_dots), PixelBuffer::Int32(destination_dots)) => {
                self.resample_rows(
                    &plan,
                    source_dots,
                    source_width,
                    destination_width,
                    height,
                    Int32RowResampler,
                    destination_dots,
                );
            }
            (PixelBuffer::Float32(source_dots), PixelBuffer::Float32(destination_dots)) => {
                self.resample_rows(
                    &plan,
                    source_dots,
                    source_width,
                    destination_width,
                    height,
                    Float32RowResampler,
                    destination_dots,
                );
            }
            _ => unreachable!("resampling support was checked against the mode"),
        }
        Ok(())
    }

    /// Resamples both axes of `source` to the dimensions of `destination`:
    /// horizontal pass, transpose, horizontal pass on the former height axis,
    /// transpose back. Every intermediate obtained from the allocator is
    /// released once consumed, on failure paths before the error propagates.
    pub fn stretch<A: ImageAllocator>(
        &self,
        destination: &mut Image,
        source: &Image,
        allocator: &A,
    ) -> Result<()> {
        if !source.mode().supports_resampling() {
            return Err(Error::ResamplingUnsupportedForMode(source.mode()));
        }
        let mode = source.mode();
        let target_width = destination.width();
        let target_height = destination.height();
        log::debug!(
            "stretch {}x{} -> {}x{} with {:?}",
            source.width(),
            source.height(),
            target_width,
            target_height,
            self.filter
        );
        let mut first_pass = allocator.allocate(mode, target_width, source.height())?;
        if let Err(error) = self.stretch_horizontal(&mut first_pass, source) {
            allocator.release(first_pass);
            return Err(error);
        }
        let mut transposed = match allocator.allocate(mode, source.height(), target_width) {
            Ok(image) => image,
            Err(error) => {
                allocator.release(first_pass);
                return Err(error);
            }
        };
        if let Err(error) = transpose(&mut transposed, &first_pass) {
            allocator.release(first_pass);
            allocator.release(transposed);
            return Err(error);
        }
        allocator.release(first_pass);
        let mut second_pass = match allocator.allocate(mode, target_height, target_width) {
            Ok(image) => image,
            Err(error) => {
                allocator.release(transposed);
                return Err(error);
            }
        };
        if let Err(error) = self.stretch_horizontal(&mut second_pass, &transposed) {
            allocator.release(transposed);
            allocator.release(second_pass);
            return Err(error);
        }
        allocator.release(transposed);
        if let Err(error) = transpose(destination, &second_pass) {
            allocator.release(second_pass);
            return Err(error);
        }
        allocator.release(second_pass);
        Ok(())
    }

    /// Applies the plan to every row, fanning the rows out over the thread
    /// pool in contiguous chunks and joining the results over a channel.
    /// Falls back to a plain loop when only one worker is available.
    #[allow(clippy::too_many_arguments)]
    fn resample_rows<T, R>(
        &self,
        plan: &Arc<ResamplePlan>,
        source: &[T],
        source_row_len: usize,
        destination_row_len: usize,
        height: usize,
        resampler: R,
        destination: &mut [T],
    ) where
        T: Copy + Default + Send + 'static,
        R: RowResampler<T> + Copy + Send + 'static,
    {
        let worker_count = self.threadpool.max_count().max(1);
        if worker_count == 1 || height <= 1 {
            for row in 0..height {
                resampler.resample_row(
                    &source[row * source_row_len..(row + 1) * source_row_len],
                    &mut destination[row * destination_row_len..(row + 1) * destination_row_len],
                    plan,
                );
            }
            return;
        }
        let rows_per_job = height.div_ceil(worker_count);
        let (sender, receiver) = mpsc::channel();
        for (job_index, row_start) in (0..height).step_by(rows_per_job).enumerate() {
            let row_count = rows_per_job.min(height - row_start);
            let source_chunk =
                source[row_start * source_row_len..(row_start + row_count) * source_row_len]
                    .to_vec();
            let plan = Arc::clone(plan);
            let sender = sender.clone();
            self.threadpool.execute(move || {
                let mut destination_chunk = vec![T::default(); row_count * destination_row_len];
                for row in 0..row_count {
                    resampler.resample_row(
                        &source_chunk[row * source_row_len..(row + 1) * source_row_len],
                        &mut destination_chunk
                            [row * destination_row_len..(row + 1) * destination_row_len],
                        &plan,
                    );
                }
                let _ = sender.send((job_index, destination_chunk));
            });
        }
        drop(sender);
        for (job_index, destination_chunk) in receiver {
            let destination_start = job_index * rows_per_job * destination_row_len;
            destination[destination_start..destination_start + destination_chunk.len()]
                .copy_from_slice(&destination_chunk);
        }
    }
}
