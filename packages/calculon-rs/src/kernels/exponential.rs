//! Exponential smoothing.
//!
//! The carried term is `(1 - a)` times the previous *input* sample, not the
//! previous output, so each output depends on two inputs only.

pub fn apply(src: &[f64], dst: &mut [f64], alpha: f64) {
    let Some((&first, rest)) = src.split_first() else {
        return;
    };

    dst[0] = first;
    let mut memory = (1.0 - alpha) * first;
    for (out, &sample) in dst[1..].iter_mut().zip(rest) {
        *out = alpha * sample + memory;
        memory = (1.0 - alpha) * sample;
    }
}

pub fn apply_in_place(range: &mut [f64], alpha: f64) {
    let Some((first, rest)) = range.split_first_mut() else {
        return;
    };

    let mut memory = (1.0 - alpha) * *first;
    for sample in rest.iter_mut() {
        let input = *sample;
        *sample = alpha * input + memory;
        memory = (1.0 - alpha) * input;
    }
}
