use calculon_rs::{
    apply_filter, apply_filter_in_place, FilterError, Kernel, ParameterTable, BLOCK_SIZE,
    DAMPING_COEFF,
};

const TOLERANCE: f64 = 1e-9;

fn ramp(len: usize) -> Vec<f64> {
    (1..=len).map(|i| i as f64).collect()
}

fn noisy_sine(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let t = i as f64 * 0.05;
            t.sin() + 0.1 * ((i * 7919) % 13) as f64 - 0.6
        })
        .collect()
}

fn block_size(k: usize) -> ParameterTable {
    ParameterTable::new().with(BLOCK_SIZE, k as f64)
}

#[test]
fn test_moving_average_example() {
    let output = apply_filter(
        &[1.0, 2.0, 3.0, 4.0, 5.0],
        1,
        Kernel::MovingAverage,
        &block_size(3),
    )
    .unwrap();
    assert_eq!(output, vec![1.0, 2.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_moving_average_properties() {
    let signal = noisy_sine(500);
    for k in [1, 2, 5, 16] {
        let output = apply_filter(&signal, 1, Kernel::MovingAverage, &block_size(k)).unwrap();
        assert_eq!(output.len(), signal.len());
        assert_eq!(&output[..k - 1], &signal[..k - 1]);
        for i in k - 1..signal.len() {
            let mean = signal[i + 1 - k..=i].iter().sum::<f64>() / k as f64;
            assert!((output[i] - mean).abs() < TOLERANCE, "k={} i={}", k, i);
        }
    }
}

#[test]
fn test_moving_average_window_one_twice_is_identity() {
    let signal = noisy_sine(64);
    let once = apply_filter(&signal, 4, Kernel::MovingAverage, &block_size(1)).unwrap();
    let twice = apply_filter(&once, 4, Kernel::MovingAverage, &block_size(1)).unwrap();
    assert_eq!(twice, signal);
}

#[test]
fn test_exponential_properties() {
    let signal = noisy_sine(300);
    for a in [0.0, 0.1, 0.5, 0.9, 1.0] {
        let params = ParameterTable::new().with(DAMPING_COEFF, a);
        let output = apply_filter(&signal, 1, Kernel::Exponential, &params).unwrap();
        assert_eq!(output[0], signal[0]);
        for i in 1..signal.len() {
            let expected = a * signal[i] + (1.0 - a) * signal[i - 1];
            assert!((output[i] - expected).abs() < TOLERANCE, "a={} i={}", a, i);
        }
    }
}

#[test]
fn test_median_properties() {
    let signal = noisy_sine(200);
    for k in [1, 2, 3, 4, 7] {
        let output = apply_filter(&signal, 1, Kernel::Median, &block_size(k)).unwrap();
        let n = signal.len();
        assert_eq!(&output[n - k..], &signal[n - k..]);
        for i in 0..n - k {
            let mut sorted = signal[i..i + k].to_vec();
            sorted.sort_by(f64::total_cmp);
            let expected = if k % 2 == 1 {
                sorted[(k / 2 + 1).min(k - 1)]
            } else {
                (sorted[k / 2 - 1] + sorted[k / 2]) / 2.0
            };
            assert_eq!(output[i], expected, "k={} i={}", k, i);
        }
    }
}

#[test]
fn test_missing_parameters() {
    let signal = ramp(40);
    let exp_only = ParameterTable::new().with(DAMPING_COEFF, 0.4);
    let window_only = block_size(3);

    for (kernel, params, name) in [
        (Kernel::MovingAverage, &exp_only, "block-size"),
        (Kernel::Median, &exp_only, "block-size"),
        (Kernel::Exponential, &window_only, "damping-coeff"),
    ] {
        match apply_filter(&signal, 4, kernel, params) {
            Err(FilterError::MissingParameter(msg)) => assert!(msg.contains(name), "{}", msg),
            other => panic!("{} should fail with MissingParameter, got {:?}", kernel, other),
        }

        let mut buffer = signal.clone();
        assert!(apply_filter_in_place(&mut buffer, 4, kernel, params).is_err());
        assert_eq!(buffer, signal);
    }
}

#[test]
fn test_block_edges_restart_windows() {
    let signal = ramp(100);
    let params = block_size(3);

    let single = apply_filter(&signal, 1, Kernel::MovingAverage, &params).unwrap();
    let split = apply_filter(&signal, 4, Kernel::MovingAverage, &params).unwrap();

    // One block: samples 25 and 26 are window means.
    assert_eq!(single[25], 25.0);
    assert_eq!(single[26], 26.0);

    // Four blocks of 25: samples 25 and 26 start a new block and pass through.
    assert_eq!(split[25], signal[25]);
    assert_eq!(split[26], signal[26]);
    assert_ne!(split[25], single[25]);

    for i in 0..signal.len() {
        if i % 25 >= 2 {
            assert_eq!(split[i], single[i], "sample {}", i);
        }
    }
}

#[test]
fn test_remainder_left_unfiltered() {
    let signal = noisy_sine(103);
    let params = block_size(4);
    let output = apply_filter(&signal, 5, Kernel::Median, &params).unwrap();
    // 5 blocks of 20 cover 0..100
    assert_eq!(&output[100..], &signal[100..]);

    let mut in_place = signal.clone();
    apply_filter_in_place(&mut in_place, 5, Kernel::Median, &params).unwrap();
    assert_eq!(in_place, output);
}

#[test]
fn test_thread_count_only_affects_block_edges() {
    let signal = noisy_sine(1200);
    let params = ParameterTable::new().with(DAMPING_COEFF, 0.3);
    let single = apply_filter(&signal, 1, Kernel::Exponential, &params).unwrap();
    let split = apply_filter(&signal, 6, Kernel::Exponential, &params).unwrap();

    for (i, (a, b)) in single.iter().zip(&split).enumerate() {
        if i % 200 == 0 {
            assert_eq!(*b, signal[i]);
        } else {
            assert_eq!(a, b, "sample {}", i);
        }
    }
}
