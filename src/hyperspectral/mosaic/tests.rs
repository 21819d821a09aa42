use std::io::Write;

use crate::hyperspectral::common::error::HyperspectralError;
use crate::hyperspectral::mosaic::{DefaultMosaic, Mosaic, TiledMosaic, parse_id_list};

#[test]
fn test_default_lookup() {
    let mosaic = TiledMosaic::from_default_id(2).unwrap();
    assert_eq!(mosaic.tile_width(), 2);
    assert_eq!(mosaic.tile_height(), 2);
    assert_eq!(mosaic.mosaic().wavelengths(), &[440, 530, 531, 630]);

    let generic = TiledMosaic::from_default(DefaultMosaic::Generic5x5);
    assert_eq!(generic.mosaic().len(), 25);
    assert_eq!(generic.mosaic().get(0), Some(739));
    assert_eq!(generic.mosaic().get(24), Some(673));
}

#[test]
fn test_default_unknown_id() {
    assert!(matches!(
        TiledMosaic::from_default_id(0),
        Err(HyperspectralError::UnknownDefault(0))
    ));
    assert!(matches!(
        TiledMosaic::from_default_id(42),
        Err(HyperspectralError::UnknownDefault(42))
    ));
}

#[test]
fn test_every_default_is_consistent() {
    for default in DefaultMosaic::ALL {
        let (w, h) = default.tile_size();
        assert_eq!(default.wavelengths().len(), w * h);
        assert_eq!(DefaultMosaic::from_id(default.id()).unwrap(), default);
    }
}

#[test]
fn test_parse_text() {
    let mosaic: TiledMosaic = "2,2=1,2:3,4".parse().unwrap();
    assert_eq!(mosaic.tile_width(), 2);
    assert_eq!(mosaic.tile_height(), 2);
    assert_eq!(mosaic.mosaic().wavelengths(), &[1, 2, 3, 4]);
    assert_eq!(mosaic.slot_at(1, 1), 3);
    assert_eq!(mosaic.slot_at(2, 1), 2);
}

#[test]
fn test_parse_text_non_square_with_whitespace() {
    let mosaic = TiledMosaic::parse_text("3,1= 10, 20 ,30:\n").unwrap();
    assert_eq!(mosaic.tile_width(), 3);
    assert_eq!(mosaic.tile_height(), 1);
    assert_eq!(mosaic.mosaic().wavelengths(), &[10, 20, 30]);
}

#[test]
fn test_parse_text_short_row() {
    let result = TiledMosaic::parse_text("2,2=1,2:3");
    assert!(matches!(result, Err(HyperspectralError::ParseError { .. })));
}

#[test]
fn test_parse_text_rejects_malformed() {
    for input in [
        "",
        "2,2",
        "2=1,2:3,4",
        "2,2=1,2:3,4:5,6",
        "2,2=1,2,3:4,5",
        "2,2=1,x:3,4",
        "2,2=1,-2:3,4",
        "2,2=1,00:3,4",
        "2,2=1,99999999999:3,4",
        "2,2=1,2147483648:3,4",
        "0,2=:",
    ] {
        assert!(
            matches!(TiledMosaic::parse_text(input), Err(HyperspectralError::ParseError { .. })),
            "expected parse failure for {:?}",
            input
        );
    }
}

#[test]
fn test_parse_text_huge_header_fails_cleanly() {
    let input = format!("2147483647,1000000={}", ":".repeat(1_000_000));
    let result = TiledMosaic::parse_text(&input);
    assert!(matches!(result, Err(HyperspectralError::ParseError { .. })));
}

#[test]
fn test_parse_text_accepts_literal_zero_and_max() {
    let mosaic = TiledMosaic::parse_text("2,1=0,2147483647").unwrap();
    assert_eq!(mosaic.mosaic().wavelengths(), &[0, 2147483647]);
}

#[test]
fn test_display_round_trips_grammar() {
    let mosaic = TiledMosaic::from_default(DefaultMosaic::Rggb);
    assert_eq!(mosaic.to_string(), "2,2=630,531:530,440");
    assert_eq!(mosaic.to_string().parse::<TiledMosaic>().unwrap(), mosaic);
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "3,2=1,2,3:4,5,6:").unwrap();

    let mosaic = TiledMosaic::from_file(file.path()).unwrap();
    assert_eq!(mosaic.tile_width(), 3);
    assert_eq!(mosaic.tile_height(), 2);
    assert_eq!(mosaic.mosaic().wavelengths(), &[1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = TiledMosaic::from_file(dir.path().join("missing.txt"));
    assert!(matches!(result, Err(HyperspectralError::ParseError { .. })));
}

#[test]
fn test_from_wavelength_list() {
    let mosaic = Mosaic::from_wavelength_list(&[440, 530, 630], 3).unwrap();
    assert_eq!(mosaic.wavelengths(), &[440, 530, 630]);
    assert_eq!(mosaic.slot_of(630), Some(2));
    assert_eq!(mosaic.slot_of(700), None);
}

#[test]
fn test_from_wavelength_list_errors() {
    assert!(matches!(
        Mosaic::from_wavelength_list(&[1, 2], 3),
        Err(HyperspectralError::SizeMismatch { expected: 3, actual: 2 })
    ));
    assert!(matches!(
        Mosaic::from_wavelength_list(&[1, -2, 3], 3),
        Err(HyperspectralError::TypeMismatch { index: 1, value: -2 })
    ));
    assert!(matches!(
        Mosaic::from_wavelength_list(&[1, 2, 1 << 40], 3),
        Err(HyperspectralError::TypeMismatch { index: 2, .. })
    ));
}

#[test]
fn test_parse_id_list() {
    assert_eq!(parse_id_list("530, 630,440").unwrap(), vec![530, 630, 440]);
    assert_eq!(parse_id_list("0").unwrap(), vec![0]);
    assert_eq!(parse_id_list("1,2,").unwrap(), vec![1, 2]);
    assert!(parse_id_list("").is_err());
    assert!(parse_id_list("1;2").is_err());
    assert!(parse_id_list("1,,2").is_err());
    assert!(parse_id_list("-1").is_err());
}
