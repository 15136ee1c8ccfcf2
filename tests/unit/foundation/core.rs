use super::*;

#[test]
fn channels_unpack_in_rgba_order() {
    let c = PackedColor::from_rgba8(0x11, 0x22, 0x33, 0x44);
    assert_eq!(c.0, 0x1122_3344);
    assert_eq!((c.r(), c.g(), c.b(), c.a()), (0x11, 0x22, 0x33, 0x44));
}

#[test]
fn lerp_clamps_t_and_hits_endpoints() {
    let a = PackedColor::BLACK;
    let b = PackedColor::WHITE;
    assert_eq!(PackedColor::lerp(a, b, -3.0), a);
    assert_eq!(PackedColor::lerp(a, b, 9.0), b);
    let mid = PackedColor::lerp(a, b, 0.5);
    assert_eq!(mid.r(), 128);
    assert_eq!(mid.a(), 255);
}

#[test]
fn serde_accepts_hex_and_integer() {
    let c: PackedColor = serde_json::from_str("\"#ff000080\"").unwrap();
    assert_eq!(c, PackedColor(0xFF00_0080));
    let c: PackedColor = serde_json::from_str("4278190335").unwrap();
    assert_eq!(c, PackedColor(0xFF00_00FF));
    assert_eq!(serde_json::to_string(&c).unwrap(), "\"#FF0000FF\"");
    assert!(serde_json::from_str::<PackedColor>("\"#12\"").is_err());
}

#[test]
fn with_alpha_keeps_rgb() {
    let c = PackedColor(0x1020_30FF).with_alpha(0.0);
    assert_eq!(c, PackedColor(0x1020_3000));
}
