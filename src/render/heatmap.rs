use crate::types::{HeatmapGrid, HEATMAP_DAYS, HEATMAP_HOURS};
use serde::Serialize;

pub const DAY_LABELS: [&str; HEATMAP_DAYS] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Gap left between neighbouring cells, in pixels.
const CELL_GAP: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub day: usize,
    pub hour: usize,
    pub value: u64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// `value / max_value`, 0 for an empty grid.
    pub intensity: f64,
}

impl HeatmapCell {
    pub fn label(&self) -> String {
        let day = DAY_LABELS.get(self.day).copied().unwrap_or("?");
        let plural = if self.value == 1 { "" } else { "s" };
        format!("{}, {}:00: {} track{} played", day, self.hour, self.value, plural)
    }
}

/// Lay the 7x24 grid out over a `width` x `height` plot area. Hours run along x.
pub fn heatmap_cells(grid: &HeatmapGrid, width: f64, height: f64) -> Vec<HeatmapCell> {
    let cell_w = width / HEATMAP_HOURS as f64;
    let cell_h = height / HEATMAP_DAYS as f64;
    let max = grid.max_value;

    let mut cells = Vec::with_capacity(HEATMAP_DAYS * HEATMAP_HOURS);
    for day in 0..HEATMAP_DAYS {
        for hour in 0..HEATMAP_HOURS {
            let value = grid.get(day, hour);
            cells.push(HeatmapCell {
                day,
                hour,
                value,
                x: hour as f64 * cell_w,
                y: day as f64 * cell_h,
                width: (cell_w - CELL_GAP).max(0.0),
                height: (cell_h - CELL_GAP).max(0.0),
                intensity: if max == 0 { 0.0 } else { (value as f64 / max as f64).min(1.0) },
            });
        }
    }
    cells
}

/// Cell under a point in plot coordinates.
pub fn cell_at(x: f64, y: f64, width: f64, height: f64) -> Option<(usize, usize)> {
    if x < 0.0 || y < 0.0 || x >= width || y >= height {
        return None;
    }
    let hour = (x / (width / HEATMAP_HOURS as f64)) as usize;
    let day = (y / (height / HEATMAP_DAYS as f64)) as usize;
    Some((day.min(HEATMAP_DAYS - 1), hour.min(HEATMAP_HOURS - 1)))
}
