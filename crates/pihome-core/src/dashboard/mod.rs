//! The dashboard: one status panel plus one panel per sensor
//!
//! Each frame is drawn from scratch from a slice of [`SensorSnapshot`]s in
//! registry order. Panels of warning sensors get a pulsating red body and
//! title bar. Presses are hit-tested against the same layout the frame was
//! drawn with.

pub mod layout;
pub mod panels;
pub mod pulse;
pub mod stats;

use std::time::Instant;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

pub use layout::{DashboardLayout, PanelLayout};
pub use pulse::WarningPulse;
pub use stats::FrameStats;

use crate::sensors::{SensorKind, SensorSnapshot};
use crate::ui::{Action, Button, ColorPalette, TouchEvent, TouchPoint, TouchResult, Touchable};

pub struct Dashboard {
    screen: Rectangle,
    palette: ColorPalette,
    pulse: WarningPulse,
    stats: FrameStats,
    kinds: Vec<SensorKind>,
    layout: DashboardLayout,
}

impl Dashboard {
    pub fn new(screen: Rectangle) -> Self {
        Self {
            screen,
            palette: ColorPalette::default(),
            pulse: WarningPulse::new(),
            stats: FrameStats::new(),
            kinds: Vec::new(),
            layout: DashboardLayout::compute(screen, &[]),
        }
    }

    pub fn with_palette(mut self, palette: ColorPalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn layout(&self) -> &DashboardLayout {
        &self.layout
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn pulse(&self) -> WarningPulse {
        self.pulse
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    /// Recompute the layout if the set of sensor kinds changed.
    fn sync_layout(&mut self, snapshots: &[SensorSnapshot]) {
        let unchanged = self.kinds.len() == snapshots.len()
            && self
                .kinds
                .iter()
                .zip(snapshots)
                .all(|(kind, snapshot)| *kind == snapshot.kind());
        if unchanged {
            return;
        }

        self.kinds = snapshots.iter().map(SensorSnapshot::kind).collect();
        self.layout = DashboardLayout::compute(self.screen, &self.kinds);
        debug!(
            "Dashboard layout: {} panels on {}x{}",
            self.layout.panels.len(),
            self.screen.size.width,
            self.screen.size.height
        );
    }

    /// Render one frame. `now` marks the frame for the statistics.
    pub fn draw<D>(
        &mut self,
        display: &mut D,
        snapshots: &[SensorSnapshot],
        now: Instant,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.stats.tick(now);
        self.pulse.advance();
        self.sync_layout(snapshots);

        display.clear(self.palette.clear)?;
        panels::draw_status(
            display,
            &self.layout,
            &self.stats.status_line(),
            &self.palette,
        )?;

        let alert = self.pulse.color_over(self.palette.clear);
        for (panel, snapshot) in self.layout.panels.iter().zip(snapshots) {
            let alert = snapshot.warning.then_some(alert);
            panels::draw_panel(display, panel, snapshot, &self.palette, alert)?;
        }
        Ok(())
    }

    /// Map a press at `point` to the control under it.
    pub fn hit_test(&mut self, point: TouchPoint, snapshots: &[SensorSnapshot]) -> Option<Action> {
        self.sync_layout(snapshots);
        let press = TouchEvent::Press(point);

        let mut exit = Button::new(self.layout.exit_button, "Exit", Action::Exit);
        if let TouchResult::Action(action) = exit.handle_touch(press) {
            return Some(action);
        }

        self.layout.panels.iter().find_map(|panel| {
            let bounds = panel.picture_button?;
            let mut button = Button::new(bounds, "Take picture", Action::TakePicture(panel.index));
            match button.handle_touch(press) {
                TouchResult::Action(action) => Some(action),
                _ => None,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::camera::CameraImage;
    use crate::framebuffer::FrameBuffer;
    use crate::sensors::{MotionData, Reading};

    fn snapshot(name: &str, warning: bool, reading: Reading) -> SensorSnapshot {
        SensorSnapshot {
            name: Arc::from(name),
            warning,
            reading,
        }
    }

    fn scenario() -> Vec<SensorSnapshot> {
        vec![
            snapshot("gas", true, Reading::Gas { detected: true }),
            snapshot("pir", false, Reading::Motion(MotionData::default())),
            snapshot("cam", false, Reading::Camera(Arc::new(CameraImage::default()))),
        ]
    }

    fn screen() -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(800, 480))
    }

    #[test]
    fn warning_panel_is_drawn_red() {
        let mut fb = FrameBuffer::new(screen().size);
        let mut dashboard = Dashboard::new(screen());
        let snapshots = scenario();
        dashboard.draw(&mut fb, &snapshots, Instant::now()).unwrap();

        let alert = dashboard.pulse().color_over(dashboard.palette().clear);
        let gas = &dashboard.layout().panels[0];
        let motion = &dashboard.layout().panels[1];
        assert!(fb.count_color(&gas.title_bar, alert) > 0);
        assert_eq!(fb.count_color(&motion.bounds, alert), 0);
    }

    #[test]
    fn screen_is_cleared_to_background() {
        let mut fb = FrameBuffer::new(screen().size);
        let mut dashboard = Dashboard::new(screen());
        dashboard.draw(&mut fb, &scenario(), Instant::now()).unwrap();

        let bottom_right = Point::new(799, 479);
        assert_eq!(fb.pixel(bottom_right), Some(dashboard.palette().clear));
    }

    #[test]
    fn pulse_advances_once_per_frame() {
        let mut fb = FrameBuffer::new(screen().size);
        let mut dashboard = Dashboard::new(screen());
        let snapshots = scenario();
        for _ in 0..3 {
            dashboard.draw(&mut fb, &snapshots, Instant::now()).unwrap();
        }
        assert_eq!(dashboard.pulse().step(), 3);
    }

    #[test]
    fn presses_map_to_controls() {
        let mut dashboard = Dashboard::new(screen());
        let snapshots = scenario();
        dashboard.hit_test(TouchPoint::new(0, 0), &snapshots);

        let exit = dashboard.layout().exit_button.center();
        assert_eq!(
            dashboard.hit_test(exit.into(), &snapshots),
            Some(Action::Exit)
        );

        let button = dashboard.layout().panels[2].picture_button.unwrap().center();
        assert_eq!(
            dashboard.hit_test(button.into(), &snapshots),
            Some(Action::TakePicture(2))
        );

        let body = dashboard.layout().panels[0].body.center();
        assert_eq!(dashboard.hit_test(body.into(), &snapshots), None);
    }
}
