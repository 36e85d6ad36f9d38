//! Property and scenario tests for the cut-scan routines

use cutscan_stats::{
    cut_value_for_best_s_over_sqrt_b, cut_value_for_efficiency, eff_graph, eff_vs_cut_graph,
    efficiency_for_cut_value, roc_curve, s_over_sqrt_b_graph, Histogram, RocOptions,
    ScanDirection,
};
use proptest::prelude::*;
use rstest::rstest;

const TOLERANCE: f64 = 1e-12;

/// Histograms with 1..40 bins, integer counts and at least one entry
fn populated_counts() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0u32..50, 1..40)
        .prop_filter("needs entries", |c| c.iter().any(|&n| n > 0))
        .prop_map(|c| c.into_iter().map(f64::from).collect())
}

/// Regular-bin counts plus underflow and overflow entries
fn counts_with_outliers() -> impl Strategy<Value = (Vec<f64>, f64, f64)> {
    (prop::collection::vec(0u32..50, 1..40), 0u32..20, 0u32..20)
        .prop_filter("needs entries", |(c, u, o)| u + o > 0 || c.iter().any(|&n| n > 0))
        .prop_map(|(c, u, o)| (c.into_iter().map(f64::from).collect(), f64::from(u), f64::from(o)))
}

fn direction() -> impl Strategy<Value = ScanDirection> {
    prop_oneof![Just(ScanDirection::Forward), Just(ScanDirection::Reversed)]
}

fn hist(name: &str, counts: &[f64]) -> Histogram {
    Histogram::from_counts(name, 0.0, 1.0, counts).unwrap()
}

fn hist_with_outliers(name: &str, counts: &[f64], underflow: f64, overflow: f64) -> Histogram {
    let mut h = hist(name, counts);
    h.set_bin_content(0, underflow);
    h.set_bin_content(counts.len() + 1, overflow);
    h
}

/// Pass count at scan position `i`, summed directly over the histogram
fn direct_pass(h: &Histogram, position: usize, dir: ScanDirection) -> f64 {
    match dir {
        ScanDirection::Forward => h.integral(position, h.nbins() + 1),
        ScanDirection::Reversed => h.integral(0, position),
    }
}

proptest! {
    #[test]
    fn efficiency_is_monotonic_and_forward_starts_at_one(
        (counts, underflow, overflow) in counts_with_outliers(),
    ) {
        let h = hist_with_outliers("h", &counts, underflow, overflow);
        let total = h.total();

        let forward = eff_vs_cut_graph(&h, ScanDirection::Forward).unwrap().ys();
        prop_assert!((forward[0] - 1.0).abs() < TOLERANCE);
        for pair in forward.windows(2) {
            prop_assert!(pair[1] <= pair[0] + TOLERANCE);
        }

        // The last reversed position stops short of the last bin and the overflow
        let reversed = eff_vs_cut_graph(&h, ScanDirection::Reversed).unwrap().ys();
        let excluded = h.bin_content(counts.len()) + overflow;
        prop_assert!((reversed[reversed.len() - 1] - (1.0 - excluded / total)).abs() < TOLERANCE);
        prop_assert!((reversed[0] - underflow / total).abs() < TOLERANCE);
        for pair in reversed.windows(2) {
            prop_assert!(pair[1] + TOLERANCE >= pair[0]);
        }
    }

    #[test]
    fn scans_match_direct_integrals(
        (counts, underflow, overflow) in counts_with_outliers(),
        (bkg_counts, bkg_underflow, bkg_overflow) in counts_with_outliers(),
        dir in direction(),
    ) {
        let nbins = counts.len();
        let sig = hist_with_outliers("sig", &counts, underflow, overflow);
        let bkg_counts: Vec<f64> = bkg_counts.iter().cycle().take(nbins).copied().collect();
        let bkg = hist_with_outliers("bkg", &bkg_counts, bkg_underflow, bkg_overflow + 1.0);

        let eff = eff_vs_cut_graph(&sig, dir).unwrap();
        let roc = roc_curve(&sig, &bkg, "", RocOptions::new(dir)).unwrap();
        let significance = s_over_sqrt_b_graph(&sig, &bkg, "", dir).unwrap();

        for position in 0..nbins {
            let eff_sig = direct_pass(&sig, position, dir) / sig.total();
            let eff_bkg = direct_pass(&bkg, position, dir) / bkg.total();

            prop_assert_eq!(eff.points[position].x, sig.bin_low_edge(position + 1));
            prop_assert!((eff.points[position].y - eff_sig).abs() < TOLERANCE);
            prop_assert!((roc.points[position].x - eff_sig).abs() < TOLERANCE);
            prop_assert!((roc.points[position].y - eff_bkg).abs() < TOLERANCE);

            let expected = if eff_bkg > 0.0 { eff_sig / eff_bkg.sqrt() } else { 0.0 };
            prop_assert_eq!(significance.points[position].x, sig.bin_center(position + 1));
            prop_assert!((significance.points[position].y - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn efficiencies_stay_in_unit_interval(counts in populated_counts(), dir in direction()) {
        let graph = eff_vs_cut_graph(&hist("h", &counts), dir).unwrap();
        for y in graph.ys() {
            prop_assert!((0.0..=1.0 + TOLERANCE).contains(&y));
        }
    }

    #[test]
    fn cut_lookup_round_trips(
        counts in populated_counts(),
        target in 0.01f64..0.99,
        dir in direction(),
    ) {
        let h = hist("h", &counts);
        let cut = cut_value_for_efficiency(&h, target, dir).unwrap();
        let back = efficiency_for_cut_value(&h, cut.cut_value, dir).unwrap();

        prop_assert_eq!(back.cut_value, cut.cut_value);
        prop_assert!((back.efficiency - cut.metric).abs() < TOLERANCE);
    }

    #[test]
    fn identical_distributions_give_diagonal_roc(counts in populated_counts(), dir in direction()) {
        let sig = hist("sig", &counts);
        let bkg = hist("bkg", &counts);
        let roc = roc_curve(&sig, &bkg, "", RocOptions::new(dir)).unwrap();
        for point in &roc.points {
            prop_assert!((point.x - point.y).abs() < TOLERANCE);
        }
    }

    #[test]
    fn s_over_sqrt_b_vanishes_without_background(
        sig_counts in populated_counts(),
        dir in direction(),
    ) {
        let nbins = sig_counts.len();
        // Background only in the first bin: every forward cut past it keeps nothing
        let mut bkg_counts = vec![0.0; nbins];
        bkg_counts[0] = 10.0;

        let sig = hist("sig", &sig_counts);
        let bkg = hist("bkg", &bkg_counts);
        let graph = s_over_sqrt_b_graph(&sig, &bkg, "", dir).unwrap();
        let bkg_eff = eff_vs_cut_graph(&bkg, dir).unwrap();

        for (point, eff) in graph.points.iter().zip(bkg_eff.points.iter()) {
            if eff.y == 0.0 {
                prop_assert_eq!(point.y, 0.0);
            }
        }
    }

    #[test]
    fn measured_efficiency_errors_stay_bounded(
        totals in prop::collection::vec(0u32..200, 1..20),
        fractions in prop::collection::vec(0.0f64..=1.0, 20),
    ) {
        let pass_counts: Vec<f64> = totals
            .iter()
            .zip(fractions.iter())
            .map(|(&n, &f)| (n as f64 * f).floor())
            .collect();
        let total_counts: Vec<f64> = totals.iter().map(|&n| n as f64).collect();

        let graph = eff_graph(&hist("pass", &pass_counts), &hist("total", &total_counts)).unwrap();
        for point in &graph.points {
            let errors = point.errors.unwrap();
            prop_assert!(point.y - errors.y_low >= -TOLERANCE);
            prop_assert!(point.y + errors.y_high <= 1.0 + TOLERANCE);
            prop_assert!(errors.y_low >= -TOLERANCE && errors.y_high >= -TOLERANCE);
        }
    }
}

#[rstest]
#[case(ScanDirection::Forward, &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0])]
#[case(ScanDirection::Reversed, &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.1])]
fn tail_heavy_signal_scan(#[case] dir: ScanDirection, #[case] expected: &[f64]) {
    let sig = hist("sig", &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 10.0, 90.0]);
    let graph = eff_vs_cut_graph(&sig, dir).unwrap();

    for (i, (point, want)) in graph.points.iter().zip(expected).enumerate() {
        assert!((point.x - i as f64 * 0.1).abs() < TOLERANCE);
        assert!((point.y - want).abs() < TOLERANCE, "bin {}: {} != {}", i, point.y, want);
    }
}

#[rstest]
#[case(5)]
#[case(10)]
#[case(100)]
fn best_cut_is_last_bin_for_concentrated_signal(#[case] nbins: usize) {
    let mut sig_counts = vec![0.0; nbins];
    sig_counts[nbins - 1] = 100.0;
    let sig = hist("sig", &sig_counts);
    let bkg = hist("bkg", &vec![7.0; nbins]);

    let best = cut_value_for_best_s_over_sqrt_b(&sig, &bkg, ScanDirection::Forward).unwrap();
    // The last position keeps the last two background bins
    assert!((best.cut_value - sig.bin_low_edge(nbins)).abs() < TOLERANCE);
    assert!((best.metric - (nbins as f64 / 2.0).sqrt()).abs() < 1e-9);
}

#[rstest]
#[case(10)]
#[case(250)]
fn full_efficiency_bins_have_bounded_errors(#[case] n: u32) {
    let counts = [n as f64, 0.0];
    let total = hist("total", &counts);
    let pass = hist("pass", &counts);

    let graph = eff_graph(&pass, &total).unwrap();
    let full = graph.points[0];
    let errors = full.errors.unwrap();
    assert_eq!(full.y, 1.0);
    assert!((0.0..=1.0).contains(&errors.y_low));
    assert!((0.0..=1.0).contains(&errors.y_high));

    let empty = graph.points[1];
    assert_eq!(empty.y, 0.0);
    assert_eq!(empty.errors.unwrap().y_low, 0.0);
}
