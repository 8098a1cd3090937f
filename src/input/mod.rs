//! Synthesized-input planning and delivery
//!
//! Some target values cannot be written directly to memory because the
//! target recomputes them every frame; the only way to change them is to
//! drive the target's own UI. This module turns a desired value into a
//! sequence of client-area click points ([`planner`]) and delivers them to
//! the target window under a process-wide lock ([`dispatch`]).

pub mod calibration;
pub mod dispatch;
pub mod geometry;
pub mod planner;

pub use calibration::{Calibration, CalibrationPoint};
pub use dispatch::dispatch;
pub use geometry::{column_rect, ClientRect, ColumnRect, Point};
pub use planner::{ClickPlanner, NotchPlanner, SliderPlanner};
