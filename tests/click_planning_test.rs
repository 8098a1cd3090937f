//! Synthesized-click writes against a recorded fake window

use memsync::config::Config;
use memsync::input::calibration::{Calibration, CalibrationPoint};
use memsync::input::geometry::{ClientRect, Point};
use memsync::input::planner::{NotchPlanner, SliderPlanner};
use memsync::roster::{self, LevelHandle};
use memsync::sync::{
    PollIntervals, RemoteProperty, SyncService, SynthesizedInputWrite, WritableRemoteProperty,
    WriteStrategy,
};
use memsync::target::fake::{FakeTarget, FakeWindow};
use memsync::MemoryAddress;
use pretty_assertions::assert_eq;
use std::sync::Arc;

const MAIN_BASE: u64 = 0x400000;

fn slider_planner() -> SliderPlanner {
    SliderPlanner {
        x_inset: 50.0,
        bottom: Calibration::new(vec![
            CalibrationPoint::new(600, 15.0),
            CalibrationPoint::new(1440, 36.0),
        ]),
        top: Calibration::new(vec![
            CalibrationPoint::new(600, 198.0),
            CalibrationPoint::new(1440, 534.0),
        ]),
    }
}

fn notch_planner() -> NotchPlanner {
    NotchPlanner {
        max_notches: 8,
        x_scale: 0.0037,
        x_inset: 87.695,
        bottom: Calibration::new(vec![
            CalibrationPoint::new(600, 39.889),
            CalibrationPoint::new(1440, 59.881),
        ]),
        top: Calibration::new(vec![
            CalibrationPoint::new(600, 149.0),
            CalibrationPoint::new(1440, 464.0),
        ]),
    }
}

fn windowed_target(rect: ClientRect) -> (Arc<FakeTarget>, Arc<FakeWindow>) {
    let window = FakeWindow::new(rect);
    let target = Arc::new(FakeTarget::new(MAIN_BASE).with_window(window.clone()));
    (target, window)
}

fn writable_slider(
    target: &Arc<FakeTarget>,
    column: usize,
) -> Arc<WritableRemoteProperty<f32>> {
    let cell = memsync::target::TargetCell::default();
    cell.set(target.clone());
    WritableRemoteProperty::new(
        RemoteProperty::new("Power", MemoryAddress::fixed(0x1000)),
        Box::new(SynthesizedInputWrite::new(slider_planner(), column, 8, 24.0)),
        0.0,
        1.0,
        cell,
    )
}

#[test]
fn test_slider_click_hits_calibrated_track() {
    let (target, window) = windowed_target(ClientRect::new(1024, 600));
    let power = writable_slider(&target, 0);

    // Full power clicks the top of the travel range, zero the bottom.
    power.set(1.0).unwrap();
    power.set(0.0).unwrap();
    assert_eq!(
        window.clicks(),
        vec![Point::new(50, 402), Point::new(50, 585)]
    );
}

#[test]
fn test_slider_geometry_tracks_window_resize() {
    let (target, window) = windowed_target(ClientRect::new(1024, 600));
    let power = writable_slider(&target, 1);

    power.set(0.5).unwrap();
    window.resize(ClientRect::new(1440, 720));
    power.set(0.5).unwrap();

    // Same value, different window: both the column and the calibrated
    // travel limits move with it.
    assert_eq!(
        window.clicks(),
        vec![Point::new(175, 493), Point::new(227, 588)]
    );
}

#[test]
fn test_notch_click_selects_dot() {
    let (target, window) = windowed_target(ClientRect::new(1024, 600));
    let cell = memsync::target::TargetCell::default();
    cell.set(target.clone());

    let coolant = WritableRemoteProperty::new(
        RemoteProperty::new("Coolant", MemoryAddress::fixed(0x1000)),
        Box::new(SynthesizedInputWrite::new(notch_planner(), 4, 8, 24.0)),
        0u8,
        8u8,
        cell,
    );

    coolant.set(5).unwrap();
    assert_eq!(window.clicks(), vec![Point::new(588, 500)]);
}

#[test]
fn test_notch_zero_from_high_steps_down_first() {
    let (target, window) = windowed_target(ClientRect::new(1024, 600));
    target.load_bytes(0x1000, &[5]);
    let cell = memsync::target::TargetCell::default();
    cell.set(target.clone());

    let coolant = WritableRemoteProperty::new(
        RemoteProperty::new("Coolant", MemoryAddress::fixed(0x1000)),
        Box::new(SynthesizedInputWrite::new(notch_planner(), 4, 8, 24.0)),
        0u8,
        8u8,
        cell,
    );
    // Seed the cached value so the strategy knows where the control is.
    use memsync::sync::Monitored;
    coolant.recompute(target.as_ref()).unwrap();
    window.clear();

    coolant.set(0).unwrap();
    // Dot for level one, then the decrement arrow at the window bottom.
    assert_eq!(
        window.clicks(),
        vec![Point::new(588, 560), Point::new(588, 600)]
    );
}

#[test]
fn test_write_fails_without_window() {
    let target = Arc::new(FakeTarget::new(MAIN_BASE));
    let strategy = SynthesizedInputWrite::new(slider_planner(), 0, 8, 24.0);
    let err = strategy
        .write(target.as_ref(), &MemoryAddress::fixed(0x1000), None, 0.5f32)
        .unwrap_err();
    assert!(matches!(err, memsync::SyncError::WindowUnavailable));
}

#[test]
fn test_default_roster_clicks_impulse_power_column() {
    let config = Config::default();
    let service = SyncService::new(PollIntervals::default());
    let roster = roster::build(&config, &service).unwrap();

    let (target, window) = windowed_target(ClientRect::new(1024, 600));
    service.target_cell().set(target);

    let handle = &roster
        .entity("Impulse")
        .expect("Impulse entity")
        .level("Power")
        .expect("Power level")
        .handle;
    match handle {
        LevelHandle::WritableFloat(power) => power.set(1.0).unwrap(),
        _ => panic!("Expected a writable float level"),
    }

    // Impulse is the fifth column; full power lands at the top of its slider.
    assert_eq!(window.clicks(), vec![Point::new(550, 402)]);
}
