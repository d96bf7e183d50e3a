use proptest::prelude::*;

use pihome_core::SensorRegistry;
use pihome_core::gpio::Polarity;
use pihome_core::sensors::{
    CameraSensor, GasSensor, MotionSensor, Sensor, SensorKind, SensorWrapper, TempHumiditySensor,
};
use pihome_core::sim::{NoopDelay, ScriptedDhtLine, SimCamera, SimHardware, SimInput};

fn sensor(kind: SensorKind, name: &str) -> SensorWrapper<SimHardware> {
    match kind {
        SensorKind::Gas => {
            SensorWrapper::Gas(GasSensor::new(name, SimInput::new(true), Polarity::ActiveLow))
        }
        SensorKind::Motion => SensorWrapper::Motion(MotionSensor::new(
            name,
            SimInput::new(false),
            Polarity::ActiveHigh,
        )),
        SensorKind::Camera => SensorWrapper::Camera(CameraSensor::new(name, SimCamera::new(4, 3))),
        SensorKind::TempHumidity => SensorWrapper::TempHumidity(TempHumiditySensor::new(
            name,
            ScriptedDhtLine::default(),
            NoopDelay,
            85,
        )),
    }
}

fn any_kind() -> impl Strategy<Value = SensorKind> {
    prop_oneof![
        Just(SensorKind::Gas),
        Just(SensorKind::Motion),
        Just(SensorKind::Camera),
        Just(SensorKind::TempHumidity),
    ]
}

proptest! {
    #[test]
    fn motion_counter_counts_rising_edges(levels in prop::collection::vec(any::<bool>(), 0..200)) {
        let line = SimInput::new(false);
        let mut motion = MotionSensor::new("pir", line.clone(), Polarity::ActiveHigh);

        let mut previous = false;
        let mut expected = 0u32;
        let mut last_count = 0u32;
        for level in levels {
            line.set_level(level);
            motion.update();
            if level && !previous {
                expected += 1;
            }
            previous = level;

            let count = motion.data().count;
            prop_assert!(count >= last_count);
            prop_assert_eq!(count, expected);
            prop_assert_eq!(motion.warning(), level);
            last_count = count;
        }
        prop_assert_eq!(motion.data().last_detected.is_some(), expected > 0);
    }

    #[test]
    fn registry_keeps_insertion_order(kinds in prop::collection::vec(any_kind(), 0..8), rounds in 0usize..4) {
        let names: Vec<String> = (0..kinds.len()).map(|i| format!("sensor-{i}")).collect();
        let mut registry = SensorRegistry::<SimHardware>::new();
        for (kind, name) in kinds.iter().zip(&names) {
            registry.register(sensor(*kind, name));
        }
        for _ in 0..rounds {
            registry.update_all();
        }

        let expected: Vec<&str> = names.iter().map(String::as_str).collect();
        prop_assert_eq!(registry.names(), expected.clone());

        let snapshots = registry.snapshots();
        let snapshot_names: Vec<&str> = snapshots.iter().map(|s| &*s.name).collect();
        prop_assert_eq!(snapshot_names, expected);
        let snapshot_kinds: Vec<SensorKind> = snapshots.iter().map(|s| s.kind()).collect();
        prop_assert_eq!(snapshot_kinds, kinds);
    }
}
