//! Standings derived from distance
//!
//! Ranks are a total order: furthest first, ties go to the earlier gate slot.
//! Every caller re-sorts the whole field; there is no incremental patching.

/// Rank (1-based) for each slot in `distances`
pub fn rank_by_distance(distances: &[u32]) -> Vec<u32> {
    let mut order: Vec<usize> = (0..distances.len()).collect();
    // Stable sort keeps gate order among equal distances
    order.sort_by(|&a, &b| distances[b].cmp(&distances[a]));

    let mut ranks = vec![0; distances.len()];
    for (i, slot) in order.into_iter().enumerate() {
        ranks[slot] = i as u32 + 1;
    }
    ranks
}

/// Slot holding rank 1
pub fn leader(ranks: &[u32]) -> Option<usize> {
    ranks.iter().position(|&r| r == 1)
}

/// Slots in finishing order
pub fn order_by_rank(ranks: &[u32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..ranks.len()).collect();
    order.sort_by_key(|&slot| ranks[slot]);
    order
}
