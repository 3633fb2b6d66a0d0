//! Tier partitioning of search results for segmented display.

use crate::model::{Creator, Tier};

/// Search results split by tier, relative order preserved within each.
#[derive(Debug, Clone, Default)]
pub struct TierPartition {
    pub established: Vec<Creator>,
    pub emerging: Vec<Creator>,
}

/// Partitions creators into established and emerging sequences. Total: no
/// creator is dropped or duplicated, so the two lengths always sum to the
/// input length. Both sequences are returned even when empty; rendering of
/// empty sections is a presentation decision.
pub fn partition_by_tier(creators: Vec<Creator>) -> TierPartition {
    let mut partition = TierPartition::default();
    for creator in creators {
        match creator.tier() {
            Tier::Established => partition.established.push(creator),
            Tier::Emerging => partition.emerging.push(creator),
        }
    }
    partition
}
