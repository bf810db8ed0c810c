// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::clock::Clock;
use common::error::SampleError;
use common::position::{Coordinates, PositionError, PositionSample, parse_coordinate};
use common::test_helper::test_clock::{TestClock, set_now};

fn get_position_sample_as_json<'a>() -> &'a str {
    r#"
    {
        "coords": {
            "latitude": 59.9139,
            "longitude": 10.7522
        },
        "timestamp": 1700000000000,
        "captureTime": 1700000000250
    }
    "#
}

fn get_position_sample() -> PositionSample {
    PositionSample::new(
        Coordinates::new(59.9139, 10.7522),
        1_700_000_000_000,
        1_700_000_000_250,
    )
}

#[test]
pub fn deserialize_position_sample_from_json() {
    let sample = PositionSample::from_json(get_position_sample_as_json())
        .unwrap_or_else(|e| panic!("Failed to deserialize the raw json. Reason: {e}"));
    assert_eq!(sample, get_position_sample());
}

#[test]
pub fn serialize_keeps_declaration_order_and_camel_case() {
    let json = serde_json::to_string(&get_position_sample()).unwrap();
    assert_eq!(
        json,
        r#"{"coords":{"latitude":59.9139,"longitude":10.7522},"timestamp":1700000000000,"captureTime":1700000000250}"#
    );
}

#[test]
pub fn serialize_accuracy_when_present() {
    let sample = PositionSample::new(Coordinates::new(1.5, 2.5).with_accuracy(12.0), 0, 0);
    let json = serde_json::to_value(sample).unwrap();
    assert_eq!(json["coords"]["accuracy"], serde_json::json!(12.0));
}

#[test]
pub fn finite_coordinates_are_accepted() {
    assert_eq!(
        get_position_sample().finite_coordinates(),
        Ok((59.9139, 10.7522))
    );
}

#[test]
pub fn non_finite_coordinates_are_rejected() {
    let nan_lat = PositionSample::new(Coordinates::new(f64::NAN, 10.0), 0, 0);
    assert!(matches!(
        nan_lat.finite_coordinates(),
        Err(SampleError::NotFinite(_))
    ));
    let inf_lon = PositionSample::new(Coordinates::new(60.0, f64::INFINITY), 0, 0);
    assert_eq!(
        inf_lon.finite_coordinates(),
        Err(SampleError::NotFinite(f64::INFINITY))
    );
}

#[test]
pub fn parse_coordinate_text() {
    assert_eq!(parse_coordinate("60.01"), Ok(60.01));
    assert_eq!(parse_coordinate("  -10.5\t"), Ok(-10.5));
    assert_eq!(parse_coordinate(""), Err(SampleError::Empty));
    assert_eq!(parse_coordinate("   "), Err(SampleError::Empty));
    assert_eq!(
        parse_coordinate("north"),
        Err(SampleError::NotANumber("north".to_string()))
    );
    assert!(matches!(
        parse_coordinate("NaN"),
        Err(SampleError::NotFinite(_))
    ));
    assert!(matches!(
        parse_coordinate("-inf"),
        Err(SampleError::NotFinite(_))
    ));
}

#[test]
pub fn position_error_messages() {
    assert_eq!(
        PositionError::new(1).message(),
        "Error occurred. Error code: 1: permission denied (you didn't enable positioning)"
    );
    assert_eq!(PositionError::new(0).phrase(), "unknown error");
    assert_eq!(PositionError::new(2).phrase(), "position unavailable");
    assert_eq!(PositionError::new(3).phrase(), "timed out");
    assert_eq!(
        PositionError::new(7).message(),
        "Error occurred. Error code: 7: unknown error"
    );
}

#[test]
pub fn test_clock_reports_latest_time() {
    let clock = TestClock::starting_at(1_000);
    assert_eq!(clock.now_millis(), 1_000);
    let sender = clock.sender();
    set_now(&sender, 2_000);
    set_now(&sender, 3_500);
    assert_eq!(clock.now_millis(), 3_500);
    assert_eq!(clock.now_millis(), 3_500);
}
