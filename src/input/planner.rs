//! Pure click planners: value changes to ordered click points
//!
//! Planners never dispatch anything; they map a requested value (and the
//! previous one, when the control needs it) to an ordered sequence of points
//! inside one entity column. All geometry comes in as arguments, so a
//! planner called twice with identical inputs yields an identical plan.

use super::calibration::Calibration;
use super::geometry::{ClientRect, ColumnRect, Point};

/// Maps a value change to the clicks that effect it inside one column.
pub trait ClickPlanner<T>: Send + Sync {
    fn plan(&self, client: ClientRect, column: ColumnRect, previous: Option<T>, value: T) -> Vec<Point>;
}

/// Planner for a continuous vertical slider control (value in `0.0..=1.0`).
///
/// One click lands on the slider track at the position proportional to the
/// requested value, between the calibrated bottom and top travel limits.
#[derive(Debug, Clone)]
pub struct SliderPlanner {
    /// Horizontal inset of the slider track from the column's left edge.
    pub x_inset: f64,
    /// Track bottom, in pixels up from the window bottom, by window height.
    pub bottom: Calibration,
    /// Track top, in pixels up from the window bottom, by window height.
    pub top: Calibration,
}

impl ClickPlanner<f32> for SliderPlanner {
    fn plan(
        &self,
        client: ClientRect,
        column: ColumnRect,
        _previous: Option<f32>,
        value: f32,
    ) -> Vec<Point> {
        let lowest = self.bottom.sample(client.height).round();
        let highest = self.top.sample(client.height).round();
        let x = column.left as f64 + self.x_inset;
        let y = column.bottom as f64 - lowest - (highest - lowest) * value as f64;
        vec![Point::new(x as i32, y as i32)]
    }
}

/// Planner for a discrete notch control (`0..=max_notches` filled dots with
/// a decrement arrow at the very bottom of the column).
///
/// Setting a non-zero level clicks the dot for that level. Setting zero
/// clicks the decrement arrow; when the previous level was above one, the
/// dot for level one is clicked first so a single arrow click reaches zero.
#[derive(Debug, Clone)]
pub struct NotchPlanner {
    /// Highest selectable notch.
    pub max_notches: u8,
    /// Horizontal dot position: `column.left + column.width * x_scale + x_inset`.
    pub x_scale: f64,
    pub x_inset: f64,
    /// Lowest dot center, in pixels up from the window bottom, by height.
    pub bottom: Calibration,
    /// Highest dot center, in pixels up from the window bottom, by height.
    pub top: Calibration,
}

impl ClickPlanner<u8> for NotchPlanner {
    fn plan(
        &self,
        client: ClientRect,
        column: ColumnRect,
        previous: Option<u8>,
        value: u8,
    ) -> Vec<Point> {
        let mut points = Vec::with_capacity(2);
        let x = (column.left as f64 + column.width() as f64 * self.x_scale + self.x_inset) as i32;

        if value != 0 || previous.is_some_and(|p| p > 1) {
            let lowest = (self.bottom.sample(client.height)).round() as i32;
            let highest = self.top.sample(client.height).round() as i32;
            let steps = (self.max_notches.max(2) - 1) as i32;
            let notch = value.saturating_sub(1) as i32;
            let y = column.bottom - lowest - (highest - lowest) / steps * notch;
            points.push(Point::new(x, y));
        }

        if value == 0 {
            // The decrement arrow responds to the lowest pixel row of the window.
            points.push(Point::new(x, column.bottom));
        }

        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::calibration::CalibrationPoint;
    use crate::input::geometry::column_rect;

    fn slider() -> SliderPlanner {
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

    fn notch() -> NotchPlanner {
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

    #[test]
    fn test_slider_full_and_empty_hit_travel_limits() {
        let client = ClientRect::new(1624, 600);
        let column = column_rect(client, 8, 24.0, 0);
        let planner = slider();

        let at_zero = planner.plan(client, column, None, 0.0);
        assert_eq!(at_zero, vec![Point::new(50, 600 - 15)]);

        let at_full = planner.plan(client, column, None, 1.0);
        assert_eq!(at_full, vec![Point::new(50, 600 - 198)]);
    }

    #[test]
    fn test_slider_is_pure() {
        let client = ClientRect::new(1024, 768);
        let column = column_rect(client, 8, 24.0, 4);
        let planner = slider();
        assert_eq!(
            planner.plan(client, column, Some(0.25), 0.75),
            planner.plan(client, column, Some(0.25), 0.75)
        );
    }

    #[test]
    fn test_notch_nonzero_is_single_click() {
        let client = ClientRect::new(1624, 600);
        let column = column_rect(client, 8, 24.0, 2);
        let plan = notch().plan(client, column, Some(3), 4);
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_notch_zero_from_high_needs_two_clicks() {
        let client = ClientRect::new(1624, 600);
        let column = column_rect(client, 8, 24.0, 2);

        // Previous level above one: click notch one, then the arrow.
        let plan = notch().plan(client, column, Some(5), 0);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[1].y, column.bottom);

        // Previous level of one (or unknown): the arrow alone suffices.
        let plan = notch().plan(client, column, Some(1), 0);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].y, column.bottom);

        let plan = notch().plan(client, column, None, 0);
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_notch_levels_descend_monotonically() {
        let client = ClientRect::new(1624, 900);
        let column = column_rect(client, 8, 24.0, 0);
        let planner = notch();
        let ys: Vec<i32> = (1..=8)
            .map(|level| planner.plan(client, column, None, level)[0].y)
            .collect();
        // Higher levels sit higher on screen (smaller y).
        assert!(ys.windows(2).all(|pair| pair[1] < pair[0]));
    }
}
