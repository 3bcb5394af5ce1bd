//! Local session selection over an exercise library.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use super::SessionRequest;
use crate::body::Category;
use crate::exercise::Exercise;

/// Round-robin visits before giving up on per-part picks.
pub const MAX_VISITS: usize = 200;

/// Standing-capable exercises a session should contain.
pub fn min_standing(count: usize) -> usize {
    if count >= 3 {
        2
    } else {
        1
    }
}

/// Pick up to `request.count` unique exercises from `library`.
///
/// Returns fewer when the compatible pool is too small; never fails.
pub fn select_local<R: Rng + ?Sized>(
    library: &[Exercise],
    request: &SessionRequest,
    rng: &mut R,
) -> Vec<Exercise> {
    let count = request.count;
    if count == 0 {
        return Vec::new();
    }

    let mut pool: Vec<&Exercise> = library
        .iter()
        .filter(|ex| ex.suits(request.environment))
        .collect();

    if !request.exclude_names.is_empty() {
        let excluded: HashSet<&str> = request.exclude_names.iter().map(String::as_str).collect();
        let fresh: Vec<&Exercise> = pool
            .iter()
            .copied()
            .filter(|ex| !excluded.contains(ex.name.as_str()))
            .collect();
        // Repeats beat a short session.
        if fresh.len() >= count {
            pool = fresh;
        }
    }

    let targets: Vec<Category> = if request.priorities.is_empty() {
        let mut parts = Category::CANONICAL.to_vec();
        parts.shuffle(rng);
        parts
    } else {
        request.priorities.clone()
    };

    let mut session: Vec<&Exercise> = Vec::with_capacity(count.min(pool.len()));
    let mut chosen: HashSet<&str> = HashSet::new();
    let mut standing = 0;
    let standing_quota = min_standing(count);

    let mut visits = 0;
    while session.len() < count && visits < MAX_VISITS {
        let part = targets[visits % targets.len()];
        visits += 1;

        let mut candidates: Vec<&Exercise> = pool
            .iter()
            .copied()
            .filter(|ex| ex.category == part && !chosen.contains(ex.name.as_str()))
            .collect();

        if standing < standing_quota {
            let standing_only: Vec<&Exercise> = candidates
                .iter()
                .copied()
                .filter(|ex| ex.is_standing_capable())
                .collect();
            if !standing_only.is_empty() {
                candidates = standing_only;
            }
        }

        if let Some(picked) = candidates.choose(rng).copied() {
            if picked.is_standing_capable() {
                standing += 1;
            }
            chosen.insert(picked.name.as_str());
            session.push(picked);
        }
    }

    if session.len() < count {
        let mut rest: Vec<&Exercise> = pool
            .iter()
            .copied()
            .filter(|ex| !chosen.contains(ex.name.as_str()))
            .collect();
        rest.shuffle(rng);
        for ex in rest {
            if session.len() >= count {
                break;
            }
            if chosen.insert(ex.name.as_str()) {
                session.push(ex);
            }
        }
    }

    if session.len() < count {
        tracing::debug!(
            requested = count,
            selected = session.len(),
            "exercise pool exhausted"
        );
    }

    session.sort_by_key(|ex| ex.category.sort_rank());
    session.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::{Environment, Posture};
    use crate::library;
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    fn request(count: usize) -> SessionRequest {
        SessionRequest {
            count,
            priorities: vec![],
            environment: Environment::Office,
            exclude_names: vec![],
            custom_instructions: None,
        }
    }

    fn rng(seed: u64) -> Mcg128Xsl64 {
        Mcg128Xsl64::seed_from_u64(seed)
    }

    #[test]
    fn returns_requested_count_with_unique_names() {
        for seed in 0..50 {
            let picked = select_local(library::builtin(), &request(5), &mut rng(seed));
            assert_eq!(picked.len(), 5);
            let names: HashSet<_> = picked.iter().map(|e| e.name.as_str()).collect();
            assert_eq!(names.len(), 5);
        }
    }

    #[test]
    fn oversized_request_returns_whole_pool() {
        let picked = select_local(library::builtin(), &request(usize::MAX), &mut rng(3));
        assert_eq!(picked.len(), 15);
        let names: HashSet<_> = picked.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names.len(), 15);
    }

    #[test]
    fn office_never_gets_home_only_exercises() {
        let mut req = request(15);
        req.priorities = vec![Category::Shoulders];
        for seed in 0..20 {
            let picked = select_local(library::builtin(), &req, &mut rng(seed));
            assert!(picked.iter().all(|e| e.name != "Desk Wall Slides"));
            assert_eq!(picked.len(), 15);
        }
    }

    #[test]
    fn sorted_top_to_bottom() {
        let picked = select_local(library::builtin(), &request(9), &mut rng(7));
        let ranks: Vec<_> = picked.iter().map(|e| e.category.sort_rank()).collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted);
    }

    #[test]
    fn meets_standing_quota_when_possible() {
        for seed in 0..50 {
            let picked = select_local(library::builtin(), &request(3), &mut rng(seed));
            let standing = picked.iter().filter(|e| e.is_standing_capable()).count();
            assert!(standing >= 2, "seed {seed}: only {standing} standing");
        }
    }

    #[test]
    fn priorities_are_visited_first() {
        let mut req = request(2);
        req.priorities = vec![Category::Wrists];
        let picked = select_local(library::builtin(), &req, &mut rng(1));
        assert!(picked.iter().all(|e| e.category == Category::Wrists));
    }

    #[test]
    fn single_priority_short_pool_is_filled_from_rest() {
        let mut req = request(4);
        req.priorities = vec![Category::Knees];
        let picked = select_local(library::builtin(), &req, &mut rng(3));
        assert_eq!(picked.len(), 4);
        assert_eq!(
            picked.iter().filter(|e| e.category == Category::Knees).count(),
            1
        );
    }

    #[test]
    fn exclusion_dropped_when_it_would_starve() {
        let office: Vec<String> = library::builtin()
            .iter()
            .filter(|e| e.suits(Environment::Office))
            .map(|e| e.name.clone())
            .collect();

        let mut req = request(5);
        req.exclude_names = office[..12].to_vec();
        let picked = select_local(library::builtin(), &req, &mut rng(11));
        assert_eq!(picked.len(), 5);

        req.exclude_names = office[..10].to_vec();
        let picked = select_local(library::builtin(), &req, &mut rng(11));
        assert_eq!(picked.len(), 5);
        assert!(picked.iter().all(|e| !req.exclude_names.contains(&e.name)));
    }

    #[test]
    fn exhausted_pool_returns_short_result() {
        let tiny: Vec<Exercise> = library::builtin()
            .iter()
            .filter(|e| e.category == Category::Eyes)
            .cloned()
            .collect();
        let picked = select_local(&tiny, &request(5), &mut rng(2));
        assert_eq!(picked.len(), tiny.len());
        assert!(select_local(&[], &request(5), &mut rng(2)).is_empty());
    }

    #[test]
    fn general_category_sorts_last() {
        let mut extra = library::builtin()[0].clone();
        extra.name = "Deep Breathing".into();
        extra.category = Category::General;
        extra.posture = Posture::Seated;
        let lib = vec![extra, library::builtin()[2].clone()];
        let picked = select_local(&lib, &request(2), &mut rng(0));
        assert_eq!(picked.last().map(|e| e.category), Some(Category::General));
    }

    #[test]
    fn same_seed_same_session() {
        let a = select_local(library::builtin(), &request(5), &mut rng(42));
        let b = select_local(library::builtin(), &request(5), &mut rng(42));
        assert_eq!(a, b);
    }
}
