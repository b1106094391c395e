use proptest::prelude::{any, prop_assert, prop_assert_eq, proptest};
use proptest::collection::vec;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use wage_core::{
    Grid, Level, RaiseOverride, Snapshot, Track, WageGrid, WageModel, Year,
};

const FIRST_YEAR: Year = 2020;
const YEAR_COUNT: usize = 8;
const TOLERANCE: Decimal = dec!(0.000001);

fn years() -> Vec<Year> {
    (FIRST_YEAR..FIRST_YEAR + YEAR_COUNT as Year).collect()
}

fn grid(cents: &[i64]) -> WageGrid {
    Grid::from_fn(years(), |level, year| {
        Decimal::new(cents[level.index() * YEAR_COUNT + (year - FIRST_YEAR) as usize], 2)
    })
}

fn model(
    base: &[i64],
    astro: &[i64],
) -> WageModel {
    WageModel::new(grid(base), grid(astro)).unwrap()
}

fn close(
    actual: Decimal,
    expected: Decimal,
) -> bool {
    (actual - expected).abs() <= TOLERANCE
}

fn raise(
    astro: bool,
    level: usize,
    year: Year,
    basis_points: i64,
) -> RaiseOverride {
    let track = if astro { Track::Astro } else { Track::Base };
    RaiseOverride::from_percentages(track, Level::ALL[level], [(year, Decimal::new(basis_points, 2))])
}

fn check_ratio_consistency(snapshot: &Snapshot) -> bool {
    [
        (&snapshot.base_wages, &snapshot.base_gross_increase),
        (&snapshot.astro_wages, &snapshot.astro_gross_increase),
    ]
    .iter()
    .all(|(wages, gross)| {
        gross.cells().all(|(level, year, ratio)| {
            let prior = wages.get(level, year - 1).unwrap();
            close(ratio * prior, wages.get(level, year).unwrap())
        })
    })
}

fn check_real_chain(snapshot: &Snapshot) -> bool {
    let base_year = snapshot.base_year;
    [
        (&snapshot.base_real_wages, &snapshot.base_net_increase, &snapshot.base_wages),
        (&snapshot.astro_real_wages, &snapshot.astro_net_increase, &snapshot.astro_wages),
        (&snapshot.fte60_real_wages, &snapshot.base_net_increase, &snapshot.astro_wages_fte60),
    ]
    .iter()
    .all(|(real, net, seed)| {
        real.cells().all(|(level, year, value)| {
            if year == base_year {
                value == seed.get(level, year).unwrap()
            } else {
                value == real.get(level, year - 1).unwrap() * net.get(level, year).unwrap()
            }
        })
    })
}

// =============================================================================
// Pipeline invariants
// =============================================================================

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(48))]

    #[test]
    fn prop_gross_increases_reproduce_wages(
        base in vec(100_000i64..1_000_000, 3 * YEAR_COUNT),
        astro in vec(100_000i64..1_000_000, 3 * YEAR_COUNT),
    ) {
        let model = model(&base, &astro);

        prop_assert!(check_ratio_consistency(model.snapshot()));
    }

    #[test]
    fn prop_net_increases_divide_out_inflation(
        base in vec(100_000i64..1_000_000, 3 * YEAR_COUNT),
        astro in vec(100_000i64..1_000_000, 3 * YEAR_COUNT),
        inflation in vec(-200i64..1_500, YEAR_COUNT - 1),
    ) {
        let mut model = model(&base, &astro);
        let rates: Vec<Decimal> = inflation.iter().map(|&bp| Decimal::new(bp, 2)).collect();
        model.set_inflation(&years()[1..], &rates).unwrap();

        for (level, year, net) in model.base_net_increase().cells() {
            let factor = Decimal::ONE + model.inflation().rate(year).unwrap() / Decimal::ONE_HUNDRED;
            let gross = model.base_gross_increase().get(level, year).unwrap();
            prop_assert_eq!(net, gross / factor);
        }
    }

    #[test]
    fn prop_real_wages_chain_from_base_year(
        base in vec(100_000i64..1_000_000, 3 * YEAR_COUNT),
        astro in vec(100_000i64..1_000_000, 3 * YEAR_COUNT),
        astro_track in any::<bool>(),
        level in 0usize..3,
        year in 2021..2028,
        basis_points in -3_000i64..3_000,
    ) {
        let mut model = model(&base, &astro);
        prop_assert!(check_real_chain(model.snapshot()));

        model.apply_raise(&raise(astro_track, level, year, basis_points)).unwrap();
        prop_assert!(check_real_chain(model.snapshot()));
        prop_assert!(check_ratio_consistency(model.snapshot()));
    }

    #[test]
    fn prop_astro_never_below_base_after_raise(
        base in vec(100_000i64..1_000_000, 3 * YEAR_COUNT),
        astro in vec(100_000i64..1_000_000, 3 * YEAR_COUNT),
        edits in vec((any::<bool>(), 0usize..3, 2021..2028, -5_000i64..5_000), 1..6),
    ) {
        let mut model = model(&base, &astro);

        for (astro_track, level, year, basis_points) in edits {
            model.apply_raise(&raise(astro_track, level, year, basis_points)).unwrap();

            for (level, year, astro) in model.astro_wages().cells() {
                prop_assert!(astro >= model.base_wages().get(level, year).unwrap());
            }
        }
    }

    #[test]
    fn prop_recompute_is_idempotent(
        base in vec(100_000i64..1_000_000, 3 * YEAR_COUNT),
        astro in vec(100_000i64..1_000_000, 3 * YEAR_COUNT),
        inflation in -200i64..1_500,
    ) {
        let mut model = model(&base, &astro);
        model.set_inflation(&[2024], &[Decimal::new(inflation, 2)]).unwrap();
        let snapshot = model.snapshot();

        let again = snapshot.recompute().unwrap();

        prop_assert_eq!(&again, snapshot);
        prop_assert_eq!(again.recompute().unwrap(), again);
    }

    #[test]
    fn prop_fte60_frozen_after_overrides(
        base in vec(100_000i64..1_000_000, 3 * YEAR_COUNT),
        astro in vec(100_000i64..1_000_000, 3 * YEAR_COUNT),
        edits in vec((any::<bool>(), 0usize..3, 2021..2028, -3_000i64..3_000), 1..4),
    ) {
        let mut model = model(&base, &astro);
        let loaded = grid(&base);
        for (level, year, fte60) in model.astro_wages_fte60().cells() {
            prop_assert_eq!(fte60, (loaded.get(level, year).unwrap() * dec!(1.2)).floor());
        }
        let frozen = model.astro_wages_fte60().clone();

        for (astro_track, level, year, basis_points) in edits {
            model.apply_raise(&raise(astro_track, level, year, basis_points)).unwrap();
            model.set_inflation(&[year], &[Decimal::new(basis_points / 10, 2)]).unwrap();
        }

        prop_assert_eq!(model.astro_wages_fte60(), &frozen);
    }

    /// Recomputing the whole year range after an edit gives the same base
    /// wages as recomputing only from the edited year forward.
    #[test]
    fn prop_full_range_recompute_matches_forward_only(
        base in vec(100_000i64..1_000_000, 3 * YEAR_COUNT),
        astro in vec(100_000i64..1_000_000, 3 * YEAR_COUNT),
        edits in vec((0usize..3, 2021..2028, -3_000i64..3_000), 1..6),
    ) {
        let mut model = model(&base, &astro);
        let mut expected = model.base_wages().clone();

        for (level, edit_year, basis_points) in edits {
            model.apply_raise(&raise(false, level, edit_year, basis_points)).unwrap();

            let gross = model.base_gross_increase();
            for &year in years().iter().filter(|&&year| year >= edit_year) {
                for level in Level::ALL {
                    let prior = expected.get(level, year - 1).unwrap();
                    expected.set(level, year, prior * gross.get(level, year).unwrap());
                }
            }

            for (level, year, wage) in model.base_wages().cells() {
                prop_assert!(close(wage, expected.get(level, year).unwrap()));
            }
        }
    }
}

// =============================================================================
// Documented behavior
// =============================================================================

fn flat_model() -> WageModel {
    let base = Grid::from_fn(years(), |_, _| dec!(1000));
    let astro = Grid::from_fn(years(), |_, _| dec!(2000));
    WageModel::new(base, astro).unwrap()
}

#[test]
fn fte60_real_wages_follow_base_net_increases() {
    let mut model = flat_model();

    model.set_raise_rate("astro", "premaster", &[(2022, "50")]).unwrap();

    // The astro raise moves astro real wages but not the FTE60 series.
    let fte60 = model.fte60_real_wages();
    let base_net = model.base_net_increase();
    assert_eq!(fte60.get(Level::Premaster, 2021), Some(dec!(1200)));
    assert_eq!(
        fte60.get(Level::Premaster, 2022),
        Some(dec!(1200) * base_net.get(Level::Premaster, 2022).unwrap())
    );
    assert!(model.astro_real_wages().get(Level::Premaster, 2022) > Some(dec!(2000)));
}

#[test]
fn fte60_nominal_grid_ignores_base_raises() {
    let mut model = flat_model();

    model.set_raise_rate("base", "candidate", &[(2021, "10"), (2022, "10")]).unwrap();

    assert_eq!(model.astro_wages_fte60().get(Level::Candidate, 2022), Some(dec!(1200)));
    // The projection steps each year from the frozen prior year, without compounding.
    assert_eq!(model.fte60_projection().get(Level::Candidate, 2022), Some(dec!(1320)));
    assert_eq!(model.base_wages().get(Level::Candidate, 2022), Some(dec!(1210)));
}

#[test]
fn raise_below_base_is_clamped_and_increase_recomputed() {
    let base = Grid::from_fn(vec![2020, 2021], |_, year| {
        if year == 2020 { dec!(800) } else { dec!(1030) }
    });
    let astro = Grid::from_fn(vec![2020, 2021], |level, _| {
        if level == Level::Premaster { dec!(900) } else { dec!(1500) }
    });
    let mut model = WageModel::new(base, astro).unwrap();

    let clamped = model.set_raise_rate("astro", "premaster", &[(2021, "5")]).unwrap();

    // 900 * 1.05 = 945 is below base, so it is clamped to 1030.
    assert_eq!(clamped.len(), 1);
    assert_eq!(clamped[0].astro, dec!(945));
    assert_eq!(model.astro_wages().get(Level::Premaster, 2021), Some(dec!(1030)));
    assert_eq!(
        model.astro_gross_increase().get(Level::Premaster, 2021),
        Some(dec!(1030) / dec!(900))
    );
}
