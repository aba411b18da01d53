use std::collections::VecDeque;

pub const TRAIL_CAPACITY: usize = 200;

/// Bounded FIFO of recent positions for path drawing. Appending beyond the
/// capacity evicts exactly the oldest entry.
#[derive(Debug, Default)]
pub struct Trail {
    coords: VecDeque<(f64, f64)>,
}

impl Trail {
    pub fn push(&mut self, lat: f64, lng: f64) {
        self.coords.push_back((lat, lng));
        if self.coords.len() > TRAIL_CAPACITY {
            self.coords.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.coords.clear();
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.coords.iter().copied()
    }

    pub fn newest(&self) -> Option<(f64, f64)> {
        self.coords.back().copied()
    }
}
