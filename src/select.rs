// src/select.rs
use crate::model::PromotionCandidate;
use crate::store::SeenSet;

/// Pick the one item to post this run.
///
/// Force mode ignores history and takes the first candidate. Otherwise the
/// first candidate (extraction order) not already in `seen`. `None` is the
/// normal "already up to date" answer. Never more than one: one post per run.
pub fn select<'a>(
    candidates: &'a [PromotionCandidate],
    seen: &SeenSet,
    force: bool,
) -> Option<&'a PromotionCandidate> {
    if force {
        return candidates.first();
    }
    candidates.iter().find(|c| !seen.contains(&c.id))
}

/// How many candidates have not been posted yet (for progress lines).
pub fn fresh_count(candidates: &[PromotionCandidate], seen: &SeenSet) -> usize {
    candidates.iter().filter(|c| !seen.contains(&c.id)).count()
}
