use niederdonk_core::pro_forma::base_case::ProFormaBaseCase;
use niederdonk_core::pro_forma::engine::{
    compute_pro_forma, debt_share, ProFormaAssumptions, ProFormaEngine,
};
use niederdonk_core::NiederdonkError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn engine() -> ProFormaEngine {
    ProFormaEngine::new(ProFormaBaseCase::niederdonk()).unwrap()
}

// ---------------------------------------------------------------------------
// Base-case identity
// ---------------------------------------------------------------------------

#[test]
fn test_base_case_identity_reproduces_gki_without_financing() {
    let base = ProFormaBaseCase::niederdonk();
    let a = ProFormaAssumptions::at_base_case(&base);
    let r = engine().compute(&a);

    // Scaling ratio is 1, so the construction line is unchanged
    assert_eq!(r.non_financing_cost, base.base_non_financing_cost());
    assert_eq!(
        r.non_financing_cost + base.base_financing_cost,
        base.base_total_investment
    );
    assert_eq!(r.revenue, base.base_revenue());
}

#[test]
fn test_project_defaults_worked_example() {
    let r = compute_pro_forma(
        &ProFormaBaseCase::niederdonk(),
        &ProFormaAssumptions {
            sale_price_per_m2: dec!(6500),
            build_cost_per_m2: dec!(2800),
            equity_ratio_pct: dec!(30),
            interest_rate_pct: dec!(3.5),
            duration_years: dec!(2.0),
        },
    )
    .unwrap();

    assert_eq!(r.revenue, dec!(22325000));
    assert_eq!(r.non_financing_cost, dec!(15944000));
    assert_eq!(r.financing_cost, dec!(390628));
    assert_eq!(r.total_investment, dec!(16334628));
    assert_eq!(r.ebt, dec!(5990372));
    assert!(
        (r.roi_pct - dec!(36.67)).abs() < dec!(0.01),
        "Expected ROI ~36.67%, got {}",
        r.roi_pct
    );
}

// ---------------------------------------------------------------------------
// Guards and clamps
// ---------------------------------------------------------------------------

/// Base case whose whole GKI is construction, so build cost 0 zeroes it.
fn construction_only_base() -> ProFormaBaseCase {
    ProFormaBaseCase {
        base_total_investment: dec!(1000000),
        base_construction_total: dec!(1000000),
        base_financing_cost: Decimal::ZERO,
        ..ProFormaBaseCase::niederdonk()
    }
}

#[test]
fn test_roi_zero_when_investment_is_zero() {
    let engine = ProFormaEngine::new(construction_only_base()).unwrap();
    let r = engine.compute(&ProFormaAssumptions {
        build_cost_per_m2: Decimal::ZERO,
        ..Default::default()
    });
    assert_eq!(r.total_investment, Decimal::ZERO);
    assert_eq!(r.roi_pct, Decimal::ZERO);
}

#[test]
fn test_roi_zero_when_investment_is_negative() {
    let engine = ProFormaEngine::new(construction_only_base()).unwrap();
    let r = engine.compute(&ProFormaAssumptions {
        build_cost_per_m2: dec!(-500),
        ..Default::default()
    });
    assert!(r.total_investment < Decimal::ZERO);
    assert_eq!(r.roi_pct, Decimal::ZERO);
    assert!(r.ebt > Decimal::ZERO);
}

#[test]
fn test_debt_share_floor_and_ceiling() {
    assert_eq!(debt_share(dec!(0)), dec!(0.95));
    assert_eq!(debt_share(dec!(150)), Decimal::ZERO);

    let zero_equity = engine().compute(&ProFormaAssumptions {
        equity_ratio_pct: Decimal::ZERO,
        ..Default::default()
    });
    let five_pct_equity = engine().compute(&ProFormaAssumptions {
        equity_ratio_pct: dec!(5),
        ..Default::default()
    });
    assert_eq!(zero_equity.financing_cost, five_pct_equity.financing_cost);

    let over_equity = engine().compute(&ProFormaAssumptions {
        equity_ratio_pct: dec!(150),
        ..Default::default()
    });
    assert_eq!(over_equity.financing_cost, Decimal::ZERO);
}

#[test]
fn test_configuration_errors() {
    for base in [
        ProFormaBaseCase {
            base_construction_per_m2: Decimal::ZERO,
            ..ProFormaBaseCase::niederdonk()
        },
        ProFormaBaseCase {
            living_area_m2: Decimal::ZERO,
            ..ProFormaBaseCase::niederdonk()
        },
    ] {
        let err = compute_pro_forma(&base, &ProFormaAssumptions::default()).unwrap_err();
        assert!(matches!(err, NiederdonkError::Configuration { .. }));
    }
}

// ---------------------------------------------------------------------------
// Break-even and monotonicity
// ---------------------------------------------------------------------------

#[test]
fn test_break_even_price_zeroes_ebt() {
    let scenarios = [
        ProFormaAssumptions::default(),
        ProFormaAssumptions {
            build_cost_per_m2: dec!(3400),
            equity_ratio_pct: dec!(10),
            interest_rate_pct: dec!(7.0),
            duration_years: dec!(4.0),
            ..Default::default()
        },
        ProFormaAssumptions {
            build_cost_per_m2: dec!(2400),
            equity_ratio_pct: dec!(50),
            interest_rate_pct: dec!(2.0),
            duration_years: dec!(1.0),
            ..Default::default()
        },
    ];

    for a in scenarios {
        let first = engine().compute(&a);
        let at_break_even = engine().compute(&ProFormaAssumptions {
            sale_price_per_m2: first.break_even_price_per_m2,
            ..a.clone()
        });
        assert!(
            at_break_even.ebt.abs() < dec!(0.0001),
            "Expected EBT ~0 at break-even, got {}",
            at_break_even.ebt
        );
        assert!(at_break_even.buffer_per_m2.abs() < dec!(0.0000001));
    }
}

#[test]
fn test_higher_build_cost_lowers_ebt_and_roi() {
    let mut previous = engine().compute(&ProFormaAssumptions {
        build_cost_per_m2: dec!(2400),
        ..Default::default()
    });
    for cost in [dec!(2600), dec!(2800), dec!(3000), dec!(3400)] {
        let r = engine().compute(&ProFormaAssumptions {
            build_cost_per_m2: cost,
            ..Default::default()
        });
        assert!(r.ebt < previous.ebt, "EBT not decreasing at {cost}");
        assert!(r.roi_pct < previous.roi_pct, "ROI not decreasing at {cost}");
        previous = r;
    }
}

#[test]
fn test_higher_sale_price_raises_ebt_and_roi() {
    let mut previous = engine().compute(&ProFormaAssumptions {
        sale_price_per_m2: dec!(5000),
        ..Default::default()
    });
    for price in [dec!(5500), dec!(6500), dec!(7200), dec!(8000)] {
        let r = engine().compute(&ProFormaAssumptions {
            sale_price_per_m2: price,
            ..Default::default()
        });
        assert!(r.ebt > previous.ebt, "EBT not increasing at {price}");
        assert!(r.roi_pct > previous.roi_pct, "ROI not increasing at {price}");
        previous = r;
    }
}

#[test]
fn test_compute_is_deterministic() {
    let a = ProFormaAssumptions {
        sale_price_per_m2: dec!(7100),
        build_cost_per_m2: dec!(3150),
        equity_ratio_pct: dec!(22),
        interest_rate_pct: dec!(4.8),
        duration_years: dec!(2.5),
    };
    let e = engine();
    // Intermediate slider positions must not leak into the final result
    let _ = e.compute(&ProFormaAssumptions::default());
    assert_eq!(e.compute(&a), e.compute(&a));
}

#[test]
fn test_confidence_in_unit_interval() {
    for price in [dec!(3000), dec!(5000), dec!(6500), dec!(8000), dec!(12000)] {
        let r = engine().compute(&ProFormaAssumptions {
            sale_price_per_m2: price,
            ..Default::default()
        });
        assert!(r.confidence >= Decimal::ZERO && r.confidence <= Decimal::ONE);
    }
}
