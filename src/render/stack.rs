//! Stacked-area layout for the genre streamgraph.
//!
//! Bands are stacked in key order. The wiggle baseline shifts each column so the
//! weighted slope of all bands is minimised (Byron & Wattenberg), which is what gives a
//! streamgraph its centred, flowing look.

use crate::aggregation::FrameGenres;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StackOffset {
    Zero,
    Wiggle,
}

/// One key's band: `(lower, upper)` per column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Band {
    pub key: String,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackLayout {
    pub bands: Vec<Band>,
    pub columns: usize,
}

/// Maps a data interval onto a pixel interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = if d1 - d0 == 0.0 { 0.5 } else { (value - d0) / (d1 - d0) };
        r0 + t * (r1 - r0)
    }
}

/// Evenly spaced x positions across `width` with `padding` steps of outer margin.
pub fn point_positions(count: usize, width: f64, padding: f64) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let step = width / f64::max(1.0, count as f64 - 1.0 + padding * 2.0);
    let start = (width - step * (count as f64 - 1.0)) / 2.0;
    (0..count).map(|i| start + step * i as f64).collect()
}

impl StackLayout {
    /// `values[column][key]`, keys in stacking order.
    pub fn new(keys: &[String], values: &[Vec<f64>], offset: StackOffset) -> Self {
        let columns = values.len();
        let baseline = match offset {
            StackOffset::Zero => vec![0.0; columns],
            StackOffset::Wiggle => wiggle_baseline(keys.len(), values),
        };

        let mut floor = baseline;
        let bands = keys
            .iter()
            .enumerate()
            .map(|(k, key)| {
                let points = (0..columns)
                    .map(|j| {
                        let value = values[j].get(k).copied().unwrap_or(0.0);
                        let lower = floor[j];
                        floor[j] = lower + value;
                        (lower, lower + value)
                    })
                    .collect();
                Band {
                    key: key.clone(),
                    points,
                }
            })
            .collect();

        Self { bands, columns }
    }

    /// Wiggle-offset stack of every frame's genre counts.
    pub fn streamgraph(frames: &[FrameGenres], keys: &[String]) -> Self {
        let values: Vec<Vec<f64>> = frames
            .iter()
            .map(|frame| keys.iter().map(|k| frame.count_of(k) as f64).collect())
            .collect();
        Self::new(keys, &values, StackOffset::Wiggle)
    }

    pub fn band(&self, key: &str) -> Option<&Band> {
        self.bands.iter().find(|b| b.key == key)
    }

    /// Lowest and highest edge over all bands; `(0, 0)` when empty.
    pub fn extent(&self) -> (f64, f64) {
        let mut edges = self.bands.iter().flat_map(|b| b.points.iter());
        let Some(&(lo, hi)) = edges.next() else {
            return (0.0, 0.0);
        };
        edges.fold((lo, hi), |(min, max), &(l, u)| (min.min(l), max.max(u)))
    }

    /// Data values to SVG y, with the top of the extent at 0.
    pub fn y_scale(&self, height: f64) -> LinearScale {
        LinearScale::new(self.extent(), (height, 0.0))
    }
}

fn wiggle_baseline(keys: usize, values: &[Vec<f64>]) -> Vec<f64> {
    let v = |j: usize, i: usize| values[j].get(i).copied().unwrap_or(0.0);
    let mut baseline = Vec::with_capacity(values.len());
    let mut y = 0.0;
    if values.is_empty() {
        return baseline;
    }
    baseline.push(y);

    for j in 1..values.len() {
        let mut s1 = 0.0;
        let mut s2 = 0.0;
        let mut below = 0.0;
        for i in 0..keys {
            let delta = v(j, i) - v(j - 1, i);
            let s3 = delta / 2.0 + below;
            below += delta;
            s1 += v(j, i);
            s2 += s3 * v(j, i);
        }
        if s1 != 0.0 {
            y -= s2 / s1;
        }
        baseline.push(y);
    }
    baseline
}

/// Share of the column a band takes up on screen, in percent.
///
/// Measured from rendered pixel heights so the tooltip agrees with what is drawn.
pub fn band_share(layout: &StackLayout, key: &str, column: usize, height: f64) -> f64 {
    let scale = layout.y_scale(height);
    let pixels = |band: &Band| {
        band.points
            .get(column)
            .map_or(0.0, |&(lo, hi)| (scale.apply(lo) - scale.apply(hi)).abs())
    };
    let total: f64 = layout.bands.iter().map(pixels).sum();
    if total == 0.0 {
        return 0.0;
    }
    layout.band(key).map_or(0.0, |b| pixels(b) / total * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_zero_offset_stacks_from_zero() {
        let columns = [vec![2.0, 3.0], vec![1.0, 0.0]];
        let layout = StackLayout::new(&keys(&["rock", "pop"]), &columns, StackOffset::Zero);
        assert_eq!(layout.band("rock").unwrap().points, vec![(0.0, 2.0), (0.0, 1.0)]);
        assert_eq!(layout.band("pop").unwrap().points, vec![(2.0, 5.0), (1.0, 1.0)]);
        assert_eq!(layout.extent(), (0.0, 5.0));
    }

    #[test]
    fn test_wiggle_single_band() {
        // growth of 2 from column 0 to 1 moves the baseline down by half of it
        let columns = [vec![1.0], vec![3.0]];
        let layout = StackLayout::new(&keys(&["rock"]), &columns, StackOffset::Wiggle);
        assert_eq!(layout.bands[0].points, vec![(0.0, 1.0), (-1.0, 2.0)]);
    }

    #[test]
    fn test_wiggle_is_flat_for_constant_values() {
        let values = vec![vec![4.0, 2.0]; 3];
        let layout = StackLayout::new(&keys(&["a", "b"]), &values, StackOffset::Wiggle);
        for band in &layout.bands {
            let lows: Vec<f64> = band.points.iter().map(|p| p.0).collect();
            assert!(lows.windows(2).all(|w| w[0] == w[1]));
        }
    }

    #[test]
    fn test_band_heights_equal_values_under_wiggle() {
        let values = vec![vec![5.0, 1.0, 0.0], vec![2.0, 4.0, 3.0], vec![0.0, 0.0, 6.0]];
        let layout = StackLayout::new(&keys(&["a", "b", "c"]), &values, StackOffset::Wiggle);
        for (k, band) in layout.bands.iter().enumerate() {
            for (j, (lo, hi)) in band.points.iter().enumerate() {
                assert!((hi - lo - values[j][k]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_y_scale_inverts_for_svg() {
        let layout = StackLayout::new(&keys(&["a"]), &[vec![10.0]], StackOffset::Zero);
        let y = layout.y_scale(200.0);
        assert_eq!(y.apply(0.0), 200.0);
        assert_eq!(y.apply(10.0), 0.0);
        assert_eq!(y.apply(5.0), 100.0);
    }

    #[test]
    fn test_band_share_matches_pixel_heights() {
        let values = vec![vec![3.0, 1.0], vec![1.0, 1.0]];
        let layout = StackLayout::new(&keys(&["rock", "pop"]), &values, StackOffset::Wiggle);
        assert!((band_share(&layout, "rock", 0, 260.0) - 75.0).abs() < 1e-9);
        assert!((band_share(&layout, "pop", 1, 260.0) - 50.0).abs() < 1e-9);
        assert_eq!(band_share(&layout, "jazz", 0, 260.0), 0.0);
    }

    #[test]
    fn test_empty_column_share_is_zero() {
        let layout = StackLayout::new(&keys(&["rock"]), &[vec![0.0]], StackOffset::Zero);
        assert_eq!(band_share(&layout, "rock", 0, 100.0), 0.0);
    }

    #[test]
    fn test_point_positions() {
        let xs = point_positions(3, 220.0, 0.1);
        assert_eq!(xs.len(), 3);
        assert!((xs[0] - 10.0).abs() < 1e-9);
        assert!((xs[1] - 110.0).abs() < 1e-9);
        assert!((xs[2] - 210.0).abs() < 1e-9);
        assert_eq!(point_positions(1, 100.0, 0.1), vec![50.0]);
    }
}
