use ember_core::RngHandle;
use ember_move::CumulativeTable;

const DRAWS: usize = 20_000;

fn chi_square(observed: &[usize], probabilities: &[f64], draws: usize) -> f64 {
    observed
        .iter()
        .zip(probabilities)
        .map(|(&o, &p)| {
            let expected = p * draws as f64;
            (o as f64 - expected).powi(2) / expected
        })
        .sum()
}

#[test]
fn two_kinds_follow_their_weights() {
    let table = CumulativeTable::from_weights(vec![("a", 0.2), ("b", 0.8)]).unwrap();
    let mut rng = RngHandle::from_seed(0x5EED);
    let mut counts = [0usize; 2];
    for _ in 0..DRAWS {
        counts[table.sample(&mut rng)] += 1;
    }
    let freq_a = counts[0] as f64 / DRAWS as f64;
    assert!((freq_a - 0.2).abs() < 0.02, "frequency of a was {freq_a}");
    // 1 degree of freedom, 99.9% critical value.
    assert!(chi_square(&counts, &[0.2, 0.8], DRAWS) < 10.83);
}

#[test]
fn unnormalised_weights_select_proportionally() {
    let table = CumulativeTable::from_weights(vec![("a", 1.0), ("b", 2.0), ("c", 5.0)]).unwrap();
    let mut rng = RngHandle::from_seed(2024);
    let mut counts = [0usize; 3];
    for _ in 0..DRAWS {
        counts[table.sample(&mut rng)] += 1;
    }
    // 2 degrees of freedom, 99.9% critical value.
    assert!(chi_square(&counts, &[0.125, 0.25, 0.625], DRAWS) < 13.82);
}

#[test]
fn same_seed_selects_same_sequence() {
    let table = CumulativeTable::from_weights(vec![("a", 0.2), ("b", 0.8)]).unwrap();
    let mut rng_a = RngHandle::from_seed(11);
    let mut rng_b = RngHandle::from_seed(11);
    let seq_a: Vec<usize> = (0..256).map(|_| table.sample(&mut rng_a)).collect();
    let seq_b: Vec<usize> = (0..256).map(|_| table.sample(&mut rng_b)).collect();
    assert_eq!(seq_a, seq_b);
}
