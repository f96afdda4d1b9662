use super::*;
use lexpose_core::models::{MeteringMode, Preference};
use lexpose_core::scenes::SceneKind;

#[test]
fn test_parse_ev_forms() {
    assert_eq!(parse_ev("1.5").unwrap(), 1.5);
    assert_eq!(parse_ev("+2").unwrap(), 2.0);
    assert_eq!(parse_ev("-1").unwrap(), -1.0);
    assert!((parse_ev("-2/3").unwrap() + 2.0 / 3.0).abs() < 1e-12);
    assert!((parse_ev(" 1/3 ").unwrap() - 1.0 / 3.0).abs() < 1e-12);

    for bad in ["", "abc", "1/0", "nan", "inf", "1/x"] {
        assert!(parse_ev(bad).is_err(), "accepted {:?}", bad);
    }
}

#[test]
fn test_parse_shutter_forms() {
    assert!((parse_shutter("1/125").unwrap() - 0.008).abs() < 1e-12);
    assert_eq!(parse_shutter("2s").unwrap(), 2.0);
    assert_eq!(parse_shutter("0.5").unwrap(), 0.5);
    assert!(parse_shutter("0").is_err());
    assert!(parse_shutter("-1/60").is_err());
}

#[test]
fn test_parse_aperture_and_iso() {
    assert_eq!(parse_aperture("f/5.6").unwrap(), 5.6);
    assert_eq!(parse_aperture("F8").unwrap(), 8.0);
    assert_eq!(parse_aperture("11").unwrap(), 11.0);
    assert!(parse_aperture("f/").is_err());

    assert_eq!(parse_iso("400").unwrap(), 400.0);
    assert_eq!(parse_iso("ISO800").unwrap(), 800.0);
    assert!(parse_iso("-100").is_err());
}

#[test]
fn test_parse_reference() {
    let captured = parse_reference("1/125,f/8,400").unwrap();
    assert!((captured.shutter_seconds - 0.008).abs() < 1e-12);
    assert_eq!(captured.aperture, 8.0);
    assert_eq!(captured.iso, 400.0);

    let err = parse_reference("1/125,8").unwrap_err();
    assert!(err.contains("SHUTTER,APERTURE,ISO"));
    assert!(parse_reference("fast,8,400").is_err());
}

#[test]
fn test_parse_metering() {
    assert_eq!(parse_metering("matrix").unwrap(), MeteringMode::Matrix);
    assert_eq!(
        parse_metering("center:0.4").unwrap(),
        MeteringMode::CenterWeighted { sigma: 0.4 }
    );
    assert_eq!(
        parse_metering("spot:0.25,0.75").unwrap(),
        MeteringMode::Spot {
            center_x: 0.25,
            center_y: 0.75,
            radius: 0.05
        }
    );
    assert_eq!(
        parse_metering("spot:0.5,0.5,0.2").unwrap(),
        MeteringMode::Spot {
            center_x: 0.5,
            center_y: 0.5,
            radius: 0.2
        }
    );

    assert!(parse_metering("matrix:1").is_err());
    assert!(parse_metering("center:0").is_err());
    assert!(parse_metering("spot:a,b").is_err());
    assert!(parse_metering("zone").is_err());
}

#[test]
fn test_parse_names() {
    assert_eq!(parse_preference("Tv").unwrap(), Preference::Shutter);
    assert_eq!(parse_preference("balanced").unwrap(), Preference::Balanced);
    assert!(parse_preference("manual").is_err());

    assert_eq!(parse_scene("dark").unwrap(), SceneKind::Dark);
    assert!(parse_scene("night").is_err());
}
