//! Forward-window median.
//!
//! Output `i` is the median of `src[i .. i + window]` for every `i` with
//! `i + window < len`; the trailing `window` samples pass through unchanged.
//!
//! Odd windows select the sorted element just past the centre (index
//! `window / 2 + 1`, or the only element for a window of one). Even windows
//! average sorted indices `window / 2 - 1` and `window / 2`.

pub fn apply(src: &[f64], dst: &mut [f64], window: usize) {
    debug_assert!(window >= 1);
    let filtered = src.len().saturating_sub(window);
    if filtered > 0 {
        let mut scratch = vec![0.0; window];
        for (i, out) in dst[..filtered].iter_mut().enumerate() {
            scratch.copy_from_slice(&src[i..i + window]);
            *out = select_median(&mut scratch);
        }
    }
    dst[filtered..].copy_from_slice(&src[filtered..]);
}

/// In-place forward median.
///
/// Window `i` only reads samples at `i` and later, none of which has been
/// overwritten yet.
pub fn apply_in_place(range: &mut [f64], window: usize) {
    debug_assert!(window >= 1);
    let filtered = range.len().saturating_sub(window);
    if filtered == 0 {
        return;
    }

    let mut scratch = vec![0.0; window];
    for i in 0..filtered {
        scratch.copy_from_slice(&range[i..i + window]);
        range[i] = select_median(&mut scratch);
    }
}

fn select_median(scratch: &mut [f64]) -> f64 {
    scratch.sort_unstable_by(f64::total_cmp);
    let len = scratch.len();
    let mid = len / 2;
    if len % 2 == 1 {
        scratch[(mid + 1).min(len - 1)]
    } else {
        (scratch[mid - 1] + scratch[mid]) / 2.0
    }
}
