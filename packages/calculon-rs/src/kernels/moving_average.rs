//! Trailing-window moving average.

use std::collections::VecDeque;

/// Write the moving average of `src` into `dst`.
///
/// `dst[i]` is the mean of `src[i + 1 - window ..= i]` for `i >= window - 1`;
/// the first `window - 1` samples are copied through. A range shorter than
/// `window` is copied through unchanged.
pub fn apply(src: &[f64], dst: &mut [f64], window: usize) {
    debug_assert!(window >= 1);
    let lead = window.saturating_sub(1).min(src.len());
    dst[..lead].copy_from_slice(&src[..lead]);

    if src.len() < window {
        dst[lead..].copy_from_slice(&src[lead..]);
        return;
    }

    let scale = window as f64;
    for (out, samples) in dst[lead..].iter_mut().zip(src.windows(window)) {
        *out = samples.iter().sum::<f64>() / scale;
    }
}

/// In-place moving average.
///
/// Averages are taken over the original samples, so a history of the last
/// `window` inputs is kept alongside the overwritten range.
pub fn apply_in_place(range: &mut [f64], window: usize) {
    debug_assert!(window >= 1);
    if range.len() < window {
        return;
    }

    let scale = window as f64;
    let mut history: VecDeque<f64> = VecDeque::with_capacity(window + 1);
    for sample in range.iter_mut() {
        history.push_back(*sample);
        if history.len() > window {
            history.pop_front();
        }
        if history.len() == window {
            *sample = history.iter().sum::<f64>() / scale;
        }
    }
}
