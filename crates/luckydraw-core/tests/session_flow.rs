// Integration tests for the lottery session.
//
// These drive a `Session` through whole evenings of rounds via the public
// API only: draw, mark absent, redraw, confirm, reset.

use std::collections::BTreeSet;

use chrono::{Local, TimeZone};
use luckydraw_core::config::{ConfigField, DrawConfig};
use luckydraw_core::{LotteryError, Phase, Session};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ===========================================================================
// Test helpers
// ===========================================================================

fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

fn stamp(minute: u32) -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(2026, 2, 1, 20, minute, 0).unwrap()
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[test]
fn one_absent_then_confirm_grows_winners_by_draw_count() {
    let mut rng = rng(1);
    let mut session = Session::new(DrawConfig::new(1, 10, 3));

    let drawn = session.draw(&mut rng).unwrap();
    assert_eq!(drawn.len(), 3);
    assert!(drawn.windows(2).all(|w| w[0] < w[1]));
    assert!(drawn.iter().all(|n| (1..=10).contains(n)));

    let absent = drawn[1];
    assert_eq!(session.mark_absent(absent), Ok(true));

    let round = session.confirm_round(stamp(0)).unwrap();
    assert_eq!(round.numbers.len(), 2);
    assert_eq!(round.absent_numbers, vec![absent]);
    assert_eq!(session.winning_count(), 3);
    assert!(session.winning().contains(&absent));
}

#[test]
fn absent_number_never_comes_back_after_confirmation() {
    let mut rng = rng(2);
    let mut session = Session::new(DrawConfig::new(1, 12, 3));

    session.draw(&mut rng).unwrap();
    let absent = *session.current_draw().iter().next().unwrap();
    session.mark_absent(absent).unwrap();
    session.redraw_absent(&mut rng).unwrap();
    session.confirm_round(stamp(1)).unwrap();

    // Drain the rest of the pool; the absent number must never reappear.
    while session.remaining_count() >= 3 {
        let numbers = session.draw(&mut rng).unwrap();
        assert!(!numbers.contains(&absent));
        session.confirm_round(stamp(2)).unwrap();
    }
    assert_eq!(session.history()[0].absent_numbers, vec![absent]);
}

#[test]
fn redraw_returns_numbers_disjoint_from_everything_seen() {
    let mut rng = rng(3);
    let mut session = Session::new(DrawConfig::new(1, 40, 6));

    session.draw(&mut rng).unwrap();
    session.confirm_round(stamp(3)).unwrap();
    session.draw(&mut rng).unwrap();

    let marked: Vec<i64> = session.current_draw().iter().take(3).copied().collect();
    for n in &marked {
        session.mark_absent(*n).unwrap();
    }
    let mut before: BTreeSet<i64> = session.winning().clone();
    before.extend(session.current_draw());
    before.extend(session.absent());

    let fresh = session.redraw_absent(&mut rng).unwrap();
    assert_eq!(fresh.len(), 3);
    assert!(fresh.iter().all(|n| !before.contains(n)));
    assert_eq!(session.current_draw().len(), 6);
}

#[test]
fn boundary_pool_equal_to_count_then_one_short() {
    let mut rng = rng(4);
    let mut session = Session::new(DrawConfig::new(1, 5, 2));
    session.draw(&mut rng).unwrap();
    session.confirm_round(stamp(4)).unwrap();

    // Three left, ask for three: succeeds with exactly the remainder.
    session
        .apply_field_input(ConfigField::DrawCount, "3")
        .unwrap();
    let rest = session.draw(&mut rng).unwrap();
    let expected: Vec<i64> = (1..=5).filter(|n| !session.winning().contains(n)).collect();
    assert_eq!(rest, expected);
    session.confirm_round(stamp(5)).unwrap();

    // Widen by two, ask for three: one short.
    session.apply_field_input(ConfigField::Max, "7").unwrap();
    let err = session.draw(&mut rng).unwrap_err();
    assert_eq!(
        err,
        LotteryError::InsufficientPool {
            remaining: 2,
            requested: 3
        }
    );
    assert_eq!(session.phase(), Phase::Idle);
}

#[test]
fn bad_settings_abort_without_touching_state() {
    let mut rng = rng(5);
    let mut session = Session::new(DrawConfig::new(1, 10, 2));

    let err = session.apply_field_input(ConfigField::Min, "twelve").unwrap_err();
    assert!(matches!(err, LotteryError::InvalidNumericInput { .. }));
    assert_eq!(session.config().min, 1);

    session.apply_field_input(ConfigField::Min, "10").unwrap();
    let err = session.draw(&mut rng).unwrap_err();
    assert!(matches!(err, LotteryError::InvalidConfiguration { .. }));
    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.current_draw().is_empty());
}

#[test]
fn shrinking_count_mid_round_cannot_oversize_the_confirmed_round() {
    let mut rng = rng(8);
    let mut session = Session::new(DrawConfig::new(1, 10, 6));
    session.draw(&mut rng).unwrap();

    let err = session
        .apply_field_input(ConfigField::DrawCount, "2")
        .unwrap_err();
    assert!(matches!(
        err,
        LotteryError::InvalidTransition {
            phase: Phase::Reviewing,
            ..
        }
    ));
    assert_eq!(session.config().draw_count, 6);

    let round = session.confirm_round(stamp(6)).unwrap();
    assert_eq!(round.numbers.len(), 6);
}

#[test]
fn moving_range_mid_round_cannot_mix_ranges_on_redraw() {
    let mut rng = rng(9);
    let mut session = Session::new(DrawConfig::new(1, 10, 3));
    session.draw(&mut rng).unwrap();
    let absent = *session.current_draw().iter().next().unwrap();
    session.mark_absent(absent).unwrap();

    assert!(session.apply_field_input(ConfigField::Max, "500").is_err());
    assert!(session.apply_field_input(ConfigField::Min, "400").is_err());
    assert_eq!(session.config(), &DrawConfig::new(1, 10, 3));

    session.redraw_absent(&mut rng).unwrap();
    assert_eq!(session.current_draw().len(), 3);
    assert!(session.current_draw().iter().all(|n| (1..=10).contains(n)));

    // The new range applies from the next round on.
    session.confirm_round(stamp(7)).unwrap();
    session.apply_field_input(ConfigField::Max, "500").unwrap();
    session.apply_field_input(ConfigField::Min, "400").unwrap();
    let next = session.draw(&mut rng).unwrap();
    assert!(next.iter().all(|n| (400..=500).contains(n)));
}

#[test]
fn reset_after_several_rounds() {
    let mut rng = rng(6);
    let mut session = Session::new(DrawConfig::new(1, 100, 5));
    for minute in 0..4 {
        session.draw(&mut rng).unwrap();
        session.confirm_round(stamp(minute)).unwrap();
    }
    assert_eq!(session.current_round(), 5);
    assert_eq!(session.winning_count(), 20);

    session.reset_all().unwrap();
    assert_eq!(session.current_round(), 1);
    assert!(session.winning().is_empty());
    assert!(session.history().is_empty());
    assert_eq!(session.remaining_count(), 100);
}

#[test]
fn history_is_in_round_order_and_serializable() {
    let mut rng = rng(7);
    let mut session = Session::new(DrawConfig::new(1, 50, 2));
    for minute in 0..3 {
        session.draw(&mut rng).unwrap();
        session.confirm_round(stamp(minute)).unwrap();
    }

    let indices: Vec<u32> = session.history().iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![1, 2, 3]);

    let json = serde_json::to_value(&session.history()[0]).unwrap();
    assert_eq!(json["index"], 1);
    assert_eq!(json["numbers"].as_array().unwrap().len(), 2);
    assert!(json["absent_numbers"].as_array().unwrap().is_empty());
    assert!(json["timestamp"].is_string());
}
