//! Gas, motion and camera wired the way the stock build registers them.

use pihome_core::SensorRegistry;
use pihome_core::gpio::Polarity;
use pihome_core::sensors::{
    CameraSensor, DhtReading, GasSensor, MotionSensor, Reading, Sensor, SensorKind, SensorWrapper,
    TempHumiditySensor,
};
use pihome_core::sim::{
    NoopDelay, ScriptedDhtLine, SimCamera, SimHardware, SimInput, encode_frame,
};

struct Rig {
    gas: SimInput,
    motion: SimInput,
    camera: SimCamera,
    registry: SensorRegistry<SimHardware>,
}

fn rig() -> Rig {
    let gas = SimInput::new(true);
    let motion = SimInput::new(false);
    let camera = SimCamera::new(32, 24);

    let mut registry = SensorRegistry::new();
    registry.register(SensorWrapper::Gas(GasSensor::new(
        "Raspberry Pi MQ-135 Gas sensor",
        gas.clone(),
        Polarity::ActiveLow,
    )));
    registry.register(SensorWrapper::Motion(MotionSensor::new(
        "Raspberry Pi PIR Motion decetor sensor",
        motion.clone(),
        Polarity::ActiveHigh,
    )));
    registry.register(SensorWrapper::Camera(CameraSensor::new(
        "Raspberry Pi Camera sensor",
        camera.clone(),
    )));

    Rig {
        gas,
        motion,
        camera,
        registry,
    }
}

#[test]
fn stock_scenario() {
    let mut rig = rig();

    // Gas output pulled low: detected.
    rig.gas.set_level(false);
    // Motion edge, then held.
    rig.motion.set_level(true);
    rig.registry.update_all();
    rig.registry.update_all();

    let snapshots = rig.registry.snapshots();
    assert!(snapshots[0].warning);
    assert!(rig.registry.get(0).unwrap().warning());

    match &snapshots[1].reading {
        Reading::Motion(data) => {
            assert_eq!(data.count, 1);
            assert!(data.detected);
            assert!(data.last_detected.is_some());
        }
        other => panic!("expected motion reading, got {other:?}"),
    }

    match &snapshots[2].reading {
        Reading::Camera(image) => assert!(image.is_empty()),
        other => panic!("expected camera reading, got {other:?}"),
    }
    assert_eq!(rig.camera.captures(), 0);
}

#[test]
fn capture_matches_stated_size() {
    let mut rig = rig();
    assert!(rig.registry.take_picture(2));

    let Some(SensorWrapper::Camera(camera)) = rig.registry.get(2) else {
        panic!("index 2 is not the camera");
    };
    let image = camera.image();
    assert_eq!(
        image.width as usize * image.height as usize * 3,
        image.data.len()
    );
    assert_eq!(image.pixel_count(), 32 * 24);
}

#[test]
fn failed_reads_leave_every_sensor_unchanged() {
    let mut rig = rig();
    let line = ScriptedDhtLine::new(encode_frame(DhtReading {
        temperature_c: 21.5,
        humidity_percent: 40.0,
    }));
    rig.registry
        .register(SensorWrapper::TempHumidity(TempHumiditySensor::new(
            "dht",
            line.clone(),
            NoopDelay,
            85,
        )));

    rig.gas.set_level(false);
    rig.motion.set_level(true);
    rig.registry.update_all();
    rig.registry.take_picture(2);
    let before = rig.registry.snapshots();

    rig.gas.set_failing(true);
    rig.gas.set_level(true);
    rig.motion.set_failing(true);
    rig.motion.set_level(false);
    rig.camera.set_failing(true);
    line.set_stuck(true);

    rig.registry.update_all();
    rig.registry.take_picture(2);
    assert_eq!(rig.registry.snapshots(), before);
}

#[test]
fn gas_warning_tracks_detection_every_update() {
    let mut rig = rig();
    for level in [true, false, false, true, false, true] {
        rig.gas.set_level(level);
        rig.registry.update_all();
        let snapshot = &rig.registry.snapshots()[0];
        assert_eq!(snapshot.kind(), SensorKind::Gas);
        assert_eq!(snapshot.reading, Reading::Gas { detected: !level });
        assert_eq!(snapshot.warning, !level);
    }
}
