//! Genre evolution across the three Spotify time frames.
//!
//! Each frame's ranked artist list is folded into per-genre counts, then every frame is
//! projected onto the same global top-N genre list so stacked charts get a stable domain.

use crate::constants::TOP_GENRE_COUNT;
use crate::types::{RankedArtist, TimeFrame};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Raw per-genre tally for one time frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreAggregate {
    pub count: u32,
    /// Sum of the 1-indexed ranks of every contributing occurrence.
    pub total_rank: u32,
    pub unique_artists: HashSet<String>,
}

impl GenreAggregate {
    pub fn avg_rank(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_rank as f64 / self.count as f64
        }
    }
}

/// Genre tallies for one frame, keeping first-seen order of genres.
#[derive(Debug, Clone, Default)]
pub struct FrameTally {
    order: Vec<String>,
    genres: HashMap<String, GenreAggregate>,
}

impl FrameTally {
    pub fn get(&self, genre: &str) -> Option<&GenreAggregate> {
        self.genres.get(genre)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Genres in the order they were first seen.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GenreAggregate)> {
        self.order
            .iter()
            .filter_map(|g| self.genres.get(g).map(|agg| (g.as_str(), agg)))
    }
}

/// Fold a ranked artist list (index 0 = rank 1) into per-genre tallies.
pub fn tally_genres(artists: &[RankedArtist]) -> FrameTally {
    let mut tally = FrameTally::default();
    for (idx, artist) in artists.iter().enumerate() {
        let rank = idx as u32 + 1;
        for genre in &artist.genres {
            let entry = tally.genres.entry(genre.clone()).or_insert_with(|| {
                tally.order.push(genre.clone());
                GenreAggregate::default()
            });
            entry.count += 1;
            entry.total_rank += rank;
            entry.unique_artists.insert(artist.identity().to_string());
        }
    }
    tally
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenreMeta {
    pub avg_rank: f64,
    pub num_artists: usize,
}

/// One genre's value in one frame, plus the stats shown on hover.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreShare {
    pub genre: String,
    pub count: u32,
    pub meta: GenreMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameGenres {
    pub time_frame: TimeFrame,
    pub label: &'static str,
    /// Exactly the top genres, in top-genre order, zero-filled.
    pub shares: Vec<GenreShare>,
}

impl FrameGenres {
    pub fn count_of(&self, genre: &str) -> u32 {
        self.shares
            .iter()
            .find(|s| s.genre == genre)
            .map_or(0, |s| s.count)
    }

    pub fn total(&self) -> u32 {
        self.shares.iter().map(|s| s.count).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenreEvolution {
    pub top_genres: Vec<String>,
    pub frames: Vec<FrameGenres>,
}

/// Top `n` genres by count summed over all frames. Ties keep first-seen order.
pub fn top_genres(tallies: &[FrameTally], n: usize) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<&str, u32> = HashMap::new();
    for tally in tallies {
        for (genre, agg) in tally.iter() {
            if !totals.contains_key(genre) {
                order.push(genre.to_string());
            }
            *totals.entry(genre).or_insert(0) += agg.count;
        }
    }

    let mut ranked: Vec<(usize, String, u32)> = order
        .into_iter()
        .enumerate()
        .map(|(pos, g)| {
            let total = totals.get(g.as_str()).copied().unwrap_or(0);
            (pos, g, total)
        })
        .collect();
    ranked.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));
    ranked.into_iter().take(n).map(|(_, g, _)| g).collect()
}

/// Build the streamgraph input from each frame's ranked artists.
pub fn genre_evolution(frames: &[(TimeFrame, Vec<RankedArtist>)]) -> GenreEvolution {
    genre_evolution_top_n(frames, TOP_GENRE_COUNT)
}

pub fn genre_evolution_top_n(
    frames: &[(TimeFrame, Vec<RankedArtist>)],
    n: usize,
) -> GenreEvolution {
    let tallies: Vec<FrameTally> = frames
        .iter()
        .map(|(_, artists)| tally_genres(artists))
        .collect();
    let top = top_genres(&tallies, n);

    let frames = frames
        .iter()
        .zip(tallies.iter())
        .map(|((time_frame, _), tally)| FrameGenres {
            time_frame: *time_frame,
            label: time_frame.label(),
            shares: top
                .iter()
                .map(|genre| {
                    let (count, meta) = match tally.get(genre) {
                        Some(agg) => (
                            agg.count,
                            GenreMeta {
                                avg_rank: agg.avg_rank(),
                                num_artists: agg.unique_artists.len(),
                            },
                        ),
                        None => (
                            0,
                            GenreMeta {
                                avg_rank: 0.0,
                                num_artists: 0,
                            },
                        ),
                    };
                    GenreShare {
                        genre: genre.clone(),
                        count,
                        meta,
                    }
                })
                .collect(),
        })
        .collect();

    GenreEvolution {
        top_genres: top,
        frames,
    }
}
