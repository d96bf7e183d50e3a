use pihome_core::sensors::{DhtReading, Reading, Sensor, TempHumiditySensor, decode_frame};
use pihome_core::sim::{NoopDelay, ScriptedDhtLine, encode_frame};

fn reading(temperature_c: f32, humidity_percent: f32) -> DhtReading {
    DhtReading {
        temperature_c,
        humidity_percent,
    }
}

fn assert_close(actual: DhtReading, expected: DhtReading) {
    assert!(
        (actual.temperature_c - expected.temperature_c).abs() < 0.05
            && (actual.humidity_percent - expected.humidity_percent).abs() < 0.05,
        "{actual:?} != {expected:?}"
    );
}

#[test]
fn waveform_decodes_to_encoded_values() {
    let line = ScriptedDhtLine::default();
    let mut sensor = TempHumiditySensor::new("dht", line.clone(), NoopDelay, 85);

    for expected in [reading(21.3, 48.2), reading(-7.5, 91.0), reading(0.0, 0.0)] {
        line.set_reading(expected);
        sensor.update();
        assert_close(sensor.reading().unwrap(), expected);
    }
    assert_eq!(line.start_signals(), 3);
}

#[test]
fn snapshot_waits_for_first_valid_frame() {
    let line = ScriptedDhtLine::default();
    line.set_stuck(true);
    let mut sensor = TempHumiditySensor::new("dht", line.clone(), NoopDelay, 85);

    sensor.update();
    assert_eq!(sensor.snapshot().reading, Reading::TempHumidity(None));
    assert!(!sensor.warning());

    line.set_stuck(false);
    line.set_reading(reading(23.0, 55.0));
    sensor.update();
    let Reading::TempHumidity(Some(value)) = sensor.snapshot().reading else {
        panic!("no reading after a valid frame");
    };
    assert_close(value, reading(23.0, 55.0));
}

#[test]
fn failures_keep_last_good_reading() {
    let line = ScriptedDhtLine::default();
    line.set_reading(reading(19.9, 60.1));
    let mut sensor = TempHumiditySensor::new("dht", line.clone(), NoopDelay, 85);
    sensor.update();
    let good = sensor.reading();

    // Corrupt checksum.
    let mut frame = encode_frame(reading(30.0, 20.0));
    frame[4] = frame[4].wrapping_add(1);
    line.set_frame(frame);
    sensor.update();
    assert_eq!(sensor.reading(), good);

    // Line never answers.
    line.set_stuck(true);
    sensor.update();
    assert_eq!(sensor.reading(), good);
}

#[test]
fn short_budget_truncates_the_frame() {
    let line = ScriptedDhtLine::new(encode_frame(reading(25.0, 50.0)));
    let mut sensor = TempHumiditySensor::new("dht", line, NoopDelay, 40);
    sensor.update();
    assert_eq!(sensor.reading(), None);
}

#[test]
fn dht11_frames_use_integral_bytes() {
    // 52 %, 24 C with a zero fractional byte.
    let value = decode_frame(&[52, 0, 24, 0, 76]).unwrap();
    assert_eq!(value, reading(24.0, 52.0));
}
