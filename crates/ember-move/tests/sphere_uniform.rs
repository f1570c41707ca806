use ember_core::{
    uniform_on_sphere, LatticeDescriptor, LatticeType, RngHandle, SpinField, SpinLattice,
};
use ember_move::{MoveSelector, MoveWeights};

const DRAWS: usize = 50_000;

fn selector() -> MoveSelector {
    let mut weights = MoveWeights::new();
    weights.insert("spin_flip_3d".into(), 1.0);
    let descriptor = LatticeDescriptor::diagonal(LatticeType::SimpleCubic, [4, 5, 6]);
    MoveSelector::new(&weights, &descriptor).unwrap()
}

#[test]
fn proposed_spins_are_unit_vectors() {
    let mut selector = selector();
    let lattice = SpinLattice::new(selector.shape());
    let mut rng = RngHandle::from_seed(99);
    for _ in 0..10_000 {
        let proposal = selector.propose(&lattice, &mut rng);
        let [sx, sy, sz] = proposal.event.after.spin;
        assert!((sx * sx + sy * sy + sz * sz - 1.0).abs() < 1e-12);
        assert!(selector.shape().contains(proposal.event.after.position));
    }
}

#[test]
fn proposal_records_the_old_spin_and_does_not_mutate() {
    let mut selector = selector();
    let mut rng = RngHandle::from_seed(7);
    let lattice = SpinLattice::random(selector.shape(), &mut rng);
    let snapshot = lattice.clone();
    for _ in 0..500 {
        let proposal = selector.propose(&lattice, &mut rng);
        assert_eq!(proposal.event.before.position, proposal.event.after.position);
        assert_eq!(
            proposal.event.before.spin,
            lattice.spin(proposal.event.before.position)
        );
    }
    assert_eq!(lattice, snapshot);
}

#[test]
fn sz_marginal_is_uniform() {
    let mut rng = RngHandle::from_seed(1234);
    let bins = 10usize;
    let mut counts = vec![0usize; bins];
    let mut mean = [0.0f64; 3];
    for _ in 0..DRAWS {
        let s = uniform_on_sphere(&mut rng);
        let bin = (((s[2] + 1.0) / 2.0) * bins as f64) as usize;
        counts[bin.min(bins - 1)] += 1;
        for axis in 0..3 {
            mean[axis] += s[axis] / DRAWS as f64;
        }
    }
    let expected = DRAWS as f64 / bins as f64;
    let chi2: f64 = counts
        .iter()
        .map(|&c| (c as f64 - expected).powi(2) / expected)
        .sum();
    // 9 degrees of freedom, 99.9% critical value.
    assert!(chi2 < 27.88, "chi-square {chi2} for counts {counts:?}");
    for component in mean {
        assert!(component.abs() < 0.02, "mean component {component}");
    }
}

#[test]
fn proposed_sites_cover_the_box() {
    let mut selector = selector();
    let lattice = SpinLattice::new(selector.shape());
    let mut rng = RngHandle::from_seed(5);
    let mut seen = vec![false; selector.shape().sites()];
    for _ in 0..20_000 {
        let proposal = selector.propose(&lattice, &mut rng);
        seen[selector.shape().linear_index(proposal.event.after.position)] = true;
    }
    assert!(seen.iter().all(|&hit| hit));
}
