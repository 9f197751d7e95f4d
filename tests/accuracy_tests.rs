use dartstrat::accuracy::AccuracyModel;
use dartstrat::geometry::{
    BoardPosition, INNER_BULL_RADIUS, INSIDE_DOUBLE_RADIUS, INSIDE_TREBLE_RADIUS,
    OUTER_BULL_RADIUS, OUTSIDE_TREBLE_RADIUS,
};
use dartstrat::search::average_score;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rstest::rstest;

const SAMPLES: usize = 20_000;

fn offsets(model: &AccuracyModel, target: BoardPosition, seed: u64) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let (tx, ty) = target.to_cartesian();
    (0..SAMPLES)
        .map(|_| {
            let (x, y) = model.throw(target, &mut rng).unwrap().to_cartesian();
            (x - tx, y - ty)
        })
        .collect()
}

fn fraction(values: &[(f64, f64)], keep: impl Fn(&(f64, f64)) -> bool) -> f64 {
    values.iter().filter(|v| keep(v)).count() as f64 / values.len() as f64
}

#[rstest]
#[case::centre(BoardPosition::CENTRE)]
#[case::treble_20(BoardPosition::from_polar(0.6, 0.0))]
#[case::off_board(BoardPosition::from_polar(1.1, 250.0))]
fn test_uniform_stays_inside_cep(#[case] target: BoardPosition) {
    let model = AccuracyModel::uniform(0.4).unwrap();
    let hits = offsets(&model, target, 1);
    assert!(hits.iter().all(|(dx, dy)| dx.hypot(*dy) <= 0.4 + 1e-9));
}

#[test]
fn test_uniform_is_uniform_over_area() {
    let model = AccuracyModel::uniform(0.5).unwrap();
    let hits = offsets(&model, BoardPosition::CENTRE, 2);

    // Half the radius holds a quarter of the area
    let inner = fraction(&hits, |(dx, dy)| dx.hypot(*dy) <= 0.25);
    assert!((inner - 0.25).abs() < 0.02, "inner fraction {}", inner);

    // Eight equal angular sectors, chi-square with 7 degrees of freedom
    let mut bins = [0usize; 8];
    for (dx, dy) in &hits {
        let angle = dx.atan2(*dy).to_degrees().rem_euclid(360.0);
        bins[((angle / 45.0) as usize).min(7)] += 1;
    }
    let expected = SAMPLES as f64 / 8.0;
    let chi2: f64 = bins
        .iter()
        .map(|&n| (n as f64 - expected).powi(2) / expected)
        .sum();
    assert!(chi2 < 30.0, "chi-square {} for bins {:?}", chi2, bins);
}

#[test]
fn test_normal_per_axis_sigma_fractions() {
    let model = AccuracyModel::normal(0.1).unwrap();
    let one = model.sigma_radius(1.0).unwrap();
    let two = model.sigma_radius(2.0).unwrap();
    let hits = offsets(&model, BoardPosition::from_polar(0.5, 45.0), 3);

    for axis in [0usize, 1] {
        let pick = |v: &(f64, f64)| if axis == 0 { v.0 } else { v.1 };
        let within_one = fraction(&hits, |v| pick(v).abs() <= one);
        let within_two = fraction(&hits, |v| pick(v).abs() <= two);
        assert!((within_one - 0.6827).abs() < 0.02, "axis {} 1 sigma {}", axis, within_one);
        assert!((within_two - 0.9545).abs() < 0.01, "axis {} 2 sigma {}", axis, within_two);
    }

    // Radially a 2-D Gaussian keeps 1 - e^(-1/2) inside one sigma
    let radial = fraction(&hits, |(dx, dy)| dx.hypot(*dy) <= one);
    assert!((radial - 0.3935).abs() < 0.02, "radial {}", radial);
}

#[test]
fn test_perfect_is_deterministic() {
    let model = AccuracyModel::perfect();
    let hits = offsets(&model, BoardPosition::from_polar(0.8, 123.0), 4);
    assert!(hits.iter().all(|&(dx, dy)| dx.abs() < 1e-12 && dy.abs() < 1e-12));
}

/// Area-weighted average score of the whole scoring area.
fn board_mean() -> f64 {
    let single = 210.0 / 20.0;
    let bands = [
        (0.0, INNER_BULL_RADIUS, 50.0),
        (INNER_BULL_RADIUS, OUTER_BULL_RADIUS, 25.0),
        (OUTER_BULL_RADIUS, INSIDE_TREBLE_RADIUS, single),
        (INSIDE_TREBLE_RADIUS, OUTSIDE_TREBLE_RADIUS, single * 3.0),
        (OUTSIDE_TREBLE_RADIUS, INSIDE_DOUBLE_RADIUS, single),
        (INSIDE_DOUBLE_RADIUS, 1.0, single * 2.0),
    ];
    bands
        .iter()
        .map(|(inner, outer, value): &(f64, f64, f64)| (outer * outer - inner * inner) * value)
        .sum()
}

#[test]
fn test_uniform_full_board_matches_area_weighted_mean() {
    let model = AccuracyModel::uniform(1.0).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let avg = average_score(BoardPosition::CENTRE, &model, 20_000, &mut rng).unwrap();
    let expected = board_mean();
    assert!((expected - 13.2).abs() < 0.1, "board mean {}", expected);
    assert!((avg - expected).abs() < 0.5, "average {} vs {}", avg, expected);
    // Clearly not the double-ring mean
    assert!(avg < 18.0);
}

#[test]
fn test_tight_normal_at_treble_20_beats_bull() {
    let model = AccuracyModel::normal(0.01).unwrap();
    let mut rng = StdRng::seed_from_u64(6);
    let t20 = BoardPosition::from_polar(0.6, 0.0);
    let treble = average_score(t20, &model, 2000, &mut rng).unwrap();
    let bull = average_score(BoardPosition::CENTRE, &model, 2000, &mut rng).unwrap();
    assert!(treble > bull, "treble {} bull {}", treble, bull);
}
