use super::*;

const ALL: [Ease; 9] = [
    Ease::Linear,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::OutCubic,
    Ease::InOutCubic,
    Ease::OutBack,
    Ease::OutBounce,
    Ease::OutElastic,
];

#[test]
fn endpoints_are_fixed() {
    for ease in ALL {
        assert!(ease.apply(0.0).abs() < 1e-9, "{ease:?} at 0");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-9, "{ease:?} at 1");
    }
}

#[test]
fn input_is_clamped() {
    for ease in ALL {
        assert_eq!(ease.apply(-5.0), ease.apply(0.0));
        assert_eq!(ease.apply(5.0), ease.apply(1.0));
        assert_eq!(ease.apply(f64::NAN), ease.apply(0.0));
    }
}

#[test]
fn out_back_overshoots() {
    let peak = (1..100)
        .map(|i| Ease::OutBack.apply(f64::from(i) / 100.0))
        .fold(f64::MIN, f64::max);
    assert!(peak > 1.0);
}
