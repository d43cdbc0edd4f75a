//! Score-based post-processing of a collected batch.

use crate::types::Item;

/// Keep the items scoring at least `threshold`, in their original order.
///
/// Compacts `items` in place rather than allocating a new vector.
pub fn filter_by_score(mut items: Vec<Item>, threshold: i64) -> Vec<Item> {
    items.retain(|item| item.score >= threshold);
    items
}

/// Sort ascending by score; equal scores are ordered by identifier.
pub fn sort_by_score(items: &mut [Item]) {
    items.sort_by(|a, b| a.score.cmp(&b.score).then(a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn item(id: u64, score: i64) -> Item {
        Item {
            id,
            score,
            title: format!("Story {id}"),
            ..Item::default()
        }
    }

    fn random_items(rng: &mut StdRng) -> Vec<Item> {
        let len = rng.gen_range(0..40);
        (0..len)
            .map(|id| item(id, rng.gen_range(-5..30)))
            .collect()
    }

    #[test]
    fn filter_keeps_inclusive_threshold() {
        let items = vec![item(1, 10), item(2, 9), item(3, 11), item(4, 10)];
        let kept: Vec<u64> = filter_by_score(items, 10).iter().map(|i| i.id).collect();
        assert_eq!(kept, vec![1, 3, 4]);
    }

    #[test]
    fn filter_on_empty_input_is_empty() {
        assert!(filter_by_score(Vec::new(), 0).is_empty());
    }

    #[test]
    fn filter_matches_order_preserving_subsequence() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let items = random_items(&mut rng);
            let threshold = rng.gen_range(-5..30);
            let expected: Vec<Item> = items
                .iter()
                .filter(|i| i.score >= threshold)
                .cloned()
                .collect();

            let len_before = items.len();
            let filtered = filter_by_score(items, threshold);
            assert!(filtered.len() <= len_before);
            assert_eq!(filtered, expected);
        }
    }

    #[test]
    fn sort_orders_scores_ascending() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let mut items = random_items(&mut rng);
            sort_by_score(&mut items);
            assert!(items.windows(2).all(|w| w[0].score <= w[1].score));
        }
    }

    #[test]
    fn sort_breaks_ties_by_identifier() {
        let mut items = vec![item(9, 5), item(2, 1), item(4, 5), item(1, 5)];
        sort_by_score(&mut items);
        let ids: Vec<u64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 1, 4, 9]);
    }

    #[test]
    fn sort_then_filter_composes() {
        let mut items = vec![item(1, 3), item(2, 40), item(3, 12), item(4, 7)];
        sort_by_score(&mut items);
        let ids: Vec<u64> = filter_by_score(items, 7).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![4, 3, 2]);
    }
}
