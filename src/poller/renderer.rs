use crate::channel::Point;

use super::trail::Trail;

/// Display seam for the poller. Implementations own marker, trail, and table
/// presentation; the state machine stays independent of any UI toolkit.
pub trait Renderer: Send {
    /// Visual run indicator.
    fn set_running(&mut self, running: bool);
    /// Current-position readout.
    fn show_position(&mut self, point: &Point);
    fn clear_position(&mut self);
    /// Replace the displayed history wholesale, newest-first.
    fn show_history(&mut self, points: &[Point]);
    fn clear_history(&mut self);
    /// Move the marker to `point` and redraw the trail behind it.
    fn update_trail(&mut self, point: &Point, trail: &Trail);
    /// Re-center the view, dropping any drawn trail.
    fn reset_view(&mut self, lat: f64, lng: f64);
}

/// Renderer for the `poll` subcommand: one line per update on stdout.
#[derive(Debug, Default)]
pub struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn set_running(&mut self, running: bool) {
        println!("[{}]", if running { "running" } else { "stopped" });
    }

    fn show_position(&mut self, point: &Point) {
        println!(
            "position {:.6}, {:.6} @ {}",
            point.lat,
            point.lng,
            point.created_at.as_deref().unwrap_or("-")
        );
    }

    fn clear_position(&mut self) {
        println!("position -");
    }

    fn show_history(&mut self, points: &[Point]) {
        println!("history ({} points)", points.len());
        for point in points {
            println!(
                "  {} {:.6}, {:.6}",
                point.created_at.as_deref().unwrap_or("-"),
                point.lat,
                point.lng
            );
        }
    }

    fn clear_history(&mut self) {
        println!("history cleared");
    }

    fn update_trail(&mut self, point: &Point, trail: &Trail) {
        println!(
            "trail {} points, head {:.6}, {:.6}",
            trail.len(),
            point.lat,
            point.lng
        );
    }

    fn reset_view(&mut self, lat: f64, lng: f64) {
        println!("view reset to {:.6}, {:.6}", lat, lng);
    }
}
