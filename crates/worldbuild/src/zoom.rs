use worldproto::Map;

/// Scale multipliers, smallest first. Each step doubles (give or take the first).
pub const ZOOM_LEVELS: [f64; 17] = [
    0.00775, 0.015, 0.03, 0.06, 0.125, 0.25, 0.5, 1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0, 128.0,
    256.0, 512.0,
];

/// Index of multiplier `1`.
pub const DEFAULT_ZOOM_INDEX: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom {
    index: usize,
    at_min_zoom: bool,
    at_max_zoom: bool,
}

impl Default for Zoom {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOM_INDEX, None)
    }
}

impl Zoom {
    pub fn new(index: usize, map: Option<&Map>) -> Self {
        let mut z = Self {
            index: index.min(ZOOM_LEVELS.len() - 1),
            at_min_zoom: false,
            at_max_zoom: false,
        };
        z.update_bounds(map);
        z
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn multiplier(&self) -> f64 {
        ZOOM_LEVELS[self.index]
    }

    pub fn at_min_zoom(&self) -> bool {
        self.at_min_zoom
    }

    pub fn at_max_zoom(&self) -> bool {
        self.at_max_zoom
    }

    /// Step toward index 0. Returns false (and changes nothing) at the first level.
    pub fn zoom_in(&mut self, map: Option<&Map>) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.update_bounds(map);
        true
    }

    /// Step toward the last level. Returns false (and changes nothing) there.
    pub fn zoom_out(&mut self, map: Option<&Map>) -> bool {
        if self.index + 1 >= ZOOM_LEVELS.len() {
            return false;
        }
        self.index += 1;
        self.update_bounds(map);
        true
    }

    /// Recompute the boundary flags against the map's configured range, or the
    /// sequence ends when no map is selected.
    pub fn update_bounds(&mut self, map: Option<&Map>) {
        let (min, max) = match map {
            Some(m) => (m.minimum_zoom_index, m.maximum_zoom_index),
            None => (0, ZOOM_LEVELS.len() - 1),
        };
        self.at_min_zoom = self.index <= min;
        self.at_max_zoom = self.index >= max;
    }
}
