use super::filter::FilterKind;

/// Convolution window for one output index: the half open source range
/// starting at `xmin`, one weight per tap, and the normalization factor the
/// write back multiplies the tap sum with.
pub struct TapWindow {
    pub xmin: usize,
    pub weights: Vec<f32>,
    pub norm: f32,
}

impl TapWindow {
    pub fn xmax(&self) -> usize {
        self.xmin + self.weights.len()
    }
}

/// Precomputed convolution windows for every output index of one axis.
/// Computed once per axis pass and discarded afterwards.
pub struct ResamplePlan {
    windows: Vec<TapWindow>,
    max_taps: usize,
}

impl ResamplePlan {
    pub fn windows(&self) -> &[TapWindow] {
        &self.windows
    }

    /// Largest tap count observed while planning. Bounded by
    /// `2 * ceil(support) + 1`.
    pub fn max_taps(&self) -> usize {
        self.max_taps
    }

    #[cfg(test)]
    pub fn from_windows(windows: Vec<TapWindow>) -> Self {
        let max_taps = windows.iter().map(|w| w.weights.len()).max().unwrap_or(0);
        Self { windows, max_taps }
    }
}

/// Plans the resampling of an axis of length `n_in` to length `n_out`.
///
/// When downscaling, the filter footprint widens by the scale factor to avoid
/// aliasing, and each weight carries a matching density correction so the tap
/// sum keeps approximating the continuous integral. Windows are clipped to
/// the source range; normalization compensates for mass lost at the edges.
pub fn plan_axis(n_in: usize, n_out: usize, filter: FilterKind) -> ResamplePlan {
    let scale = n_in as f32 / n_out as f32;
    let filterscale = scale.max(1.0);
    let support = filter.support() * filterscale;
    let inverse_filterscale = 1.0 / filterscale;
    let mut windows = Vec::with_capacity(n_out);
    let mut max_taps = 0;
    for index in 0..n_out {
        let center = (index as f32 + 0.5) * scale;
        let xmin = (center - support).floor().max(0.0) as usize;
        let xmax = ((center + support).ceil().min(n_in as f32) as usize).max(xmin);
        let mut weights = Vec::with_capacity(xmax - xmin);
        let mut weight_sum = 0.0_f32;
        for x in xmin..xmax {
            let weight =
                filter.weight((x as f32 - center + 0.5) * inverse_filterscale) * inverse_filterscale;
            weights.push(weight);
            weight_sum += weight;
        }
        let norm = if weight_sum == 0.0 {
            1.0
        } else {
            1.0 / weight_sum
        };
        max_taps = max_taps.max(weights.len());
        windows.push(TapWindow {
            xmin,
            weights,
            norm,
        });
    }
    ResamplePlan { windows, max_taps }
}
