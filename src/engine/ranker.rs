use crate::engine::scorer::ScoredDestination;
use crate::error::{AppError, AppResult};

/// Cutoff and truncation controls for a ranking pass
#[derive(Debug, Clone, Copy)]
pub struct RankOptions {
    /// Keep at most this many entries after the cutoff; `None` keeps all
    pub top_k: Option<usize>,
    /// Drop entries scoring below this value
    pub min_score: f64,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            top_k: None,
            min_score: 0.0,
        }
    }
}

/// An ordered recommendation list that can be walked more than once
///
/// Owns the sorted entries; `iter` and `page` hand out fresh lazy
/// iterators, `into_vec` gives up ownership for serialization.
#[derive(Debug, Clone)]
pub struct Ranking {
    entries: Vec<ScoredDestination>,
}

impl Ranking {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoredDestination> {
        self.entries.iter()
    }

    /// Lazy window over the ranking, for paged responses
    pub fn page(&self, offset: usize, limit: usize) -> impl Iterator<Item = &ScoredDestination> {
        self.entries.iter().skip(offset).take(limit)
    }

    pub fn into_vec(self) -> Vec<ScoredDestination> {
        self.entries
    }
}

/// Sorts scored destinations into a deterministic total order
///
/// Order: score descending (`total_cmp`, so equal bit patterns compare
/// equal), then popularity descending, then id ascending. The same
/// input always produces the same output. An empty scored set means
/// the catalog itself was empty, since scoring is total over it; an
/// empty result after the cutoff is returned as an empty ranking.
pub fn rank(scored: Vec<ScoredDestination>, options: &RankOptions) -> AppResult<Ranking> {
    if scored.is_empty() {
        return Err(AppError::EmptyCatalog);
    }

    let mut entries = scored;
    entries.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| {
                b.destination
                    .popularity
                    .total_cmp(&a.destination.popularity)
            })
            .then_with(|| a.destination.id.cmp(&b.destination.id))
    });

    entries.retain(|entry| entry.score >= options.min_score);
    if let Some(top_k) = options.top_k {
        entries.truncate(top_k);
    }

    Ok(Ranking { entries })
}
