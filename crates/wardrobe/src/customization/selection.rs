use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

/// Candidates gathered from the best and second-best score tiers.
pub const SHORTLIST_POOL: usize = 5;
/// Candidates handed to the weighted draw.
pub const SHORTLIST_SIZE: usize = 3;

/// An item paired with its tallied score. Lower is better.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored<T> {
    pub item: T,
    pub score: u32,
}

/// Best-tier candidates, backfilled from the next distinct score up to
/// [`SHORTLIST_POOL`]. A third tier is never consulted.
///
/// Ties are put in random order before the stable sort, so a truncated second
/// tier does not always keep the same leading candidates.
pub(crate) fn tiered_pool<T, R>(mut scored: Vec<Scored<T>>, rng: &mut R) -> Vec<Scored<T>>
where
    R: Rng + ?Sized,
{
    scored.shuffle(rng);
    scored.sort_by_key(|candidate| candidate.score);

    let Some(best) = scored.first().map(|candidate| candidate.score) else {
        return scored;
    };
    let best_count = scored
        .iter()
        .take_while(|candidate| candidate.score == best)
        .count();

    let keep = if best_count < SHORTLIST_POOL {
        match scored.get(best_count).map(|candidate| candidate.score) {
            Some(second) => {
                let second_count = scored[best_count..]
                    .iter()
                    .take_while(|candidate| candidate.score == second)
                    .count();
                best_count + second_count.min(SHORTLIST_POOL - best_count)
            }
            None => best_count,
        }
    } else {
        best_count
    };

    scored.truncate(keep);
    scored
}

/// Shuffle the tiered pool and keep at most [`SHORTLIST_SIZE`] candidates.
pub fn top_options<T, R>(scored: Vec<Scored<T>>, rng: &mut R) -> Vec<Scored<T>>
where
    R: Rng + ?Sized,
{
    let mut pool = tiered_pool(scored, &mut *rng);
    pool.shuffle(rng);
    pool.truncate(SHORTLIST_SIZE);
    pool
}

/// Draw one candidate with weight `1 + sum(scores) - score`, favoring low scores.
///
/// Every weight is at least 1, so a shortlist of all-zero scores draws uniformly.
pub fn weighted_pick<'a, T, R>(shortlist: &'a [Scored<T>], rng: &mut R) -> Option<&'a Scored<T>>
where
    R: Rng + ?Sized,
{
    let total: u64 = 1 + shortlist
        .iter()
        .map(|candidate| u64::from(candidate.score))
        .sum::<u64>();
    let weights = shortlist
        .iter()
        .map(|candidate| total - u64::from(candidate.score));

    let distribution = WeightedIndex::new(weights).ok()?;
    shortlist.get(distribution.sample(rng))
}
