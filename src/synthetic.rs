use chrono::{SecondsFormat, Utc};

use crate::channel::{Point, PointOrigin};

pub const DEFAULT_CENTER: (f64, f64) = (10.7769, 106.7009);

const RADIUS_DEG: f64 = 0.0025;
const STEP_RAD: f64 = 0.35;

/// Deterministic pseudo-trajectory for demo and offline use: each call
/// advances a tick and places the point on a fixed-radius circle around the
/// center. Interchangeable with the live channel at the poller's call site.
#[derive(Debug)]
pub struct SyntheticGenerator {
    center: (f64, f64),
    radius: f64,
    tick: u64,
}

impl Default for SyntheticGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER)
    }
}

impl SyntheticGenerator {
    pub fn new(center: (f64, f64)) -> Self {
        Self {
            center,
            radius: RADIUS_DEG,
            tick: 0,
        }
    }

    pub fn next_point(&mut self) -> Point {
        self.tick += 1;
        let angle = self.tick as f64 * STEP_RAD;
        Point {
            source: PointOrigin::Synthetic,
            created_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            lat: round6(self.center.0 + angle.sin() * self.radius),
            lng: round6(self.center.1 + angle.cos() * self.radius),
        }
    }

    /// A history batch is n consecutive points, presented newest-first.
    /// The shared tick keeps advancing, so a later `next_point` call does
    /// not continue the batch's trajectory.
    pub fn history(&mut self, results: usize) -> Vec<Point> {
        let mut points: Vec<Point> = (0..results).map(|_| self.next_point()).collect();
        points.reverse();
        points
    }
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}
