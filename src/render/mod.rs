//! Geometry for the charts. Everything here is a pure function of aggregated data.

pub mod heatmap;
pub mod stack;
pub mod tooltip;

pub use heatmap::{cell_at, heatmap_cells, HeatmapCell};
pub use stack::{band_share, point_positions, LinearScale, StackLayout, StackOffset};
pub use tooltip::{HoverState, Point, Rect, Size, Tooltip};
