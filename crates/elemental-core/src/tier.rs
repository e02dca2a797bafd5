//! Tier ranks and the progression rule that gates recipes

use serde::{Deserialize, Serialize};

/// Label the catalog uses for the seed elements
pub const STARTING_TIER_LABEL: &str = "Starting elements";

/// Rank given to labels that cannot be parsed. Sorts last and never passes
/// a strictly-less-than gate as an ingredient.
pub const UNRANKED_TIER: u32 = 999;

/// Parse a tier label into its rank.
///
/// `"Starting elements"` is 0, `"Tier N ..."` is N, anything else is
/// [`UNRANKED_TIER`].
pub fn parse_tier(label: &str) -> u32 {
    if let Some(rest) = label.strip_prefix("Tier ") {
        if let Some(rank) = rest.split(' ').next().and_then(|n| n.parse::<u32>().ok()) {
            return rank;
        }
    }
    if label == STARTING_TIER_LABEL {
        return 0;
    }
    UNRANKED_TIER
}

/// Which ingredient/result tier combinations a search may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPolicy {
    /// Permit same-tier combinations among low tiers (e.g. two tier-1
    /// elements producing another tier-1 element)
    #[serde(default = "default_low_tier_peers")]
    pub low_tier_peers: bool,

    /// Highest rank covered by `low_tier_peers`
    #[serde(default = "default_low_tier_ceiling")]
    pub low_tier_ceiling: u32,
}

fn default_low_tier_peers() -> bool {
    true
}

fn default_low_tier_ceiling() -> u32 {
    1
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            low_tier_peers: default_low_tier_peers(),
            low_tier_ceiling: default_low_tier_ceiling(),
        }
    }
}

impl TierPolicy {
    /// Ingredients must always rank strictly below the result
    pub fn strict() -> Self {
        Self {
            low_tier_peers: false,
            ..Self::default()
        }
    }

    /// Whether `first + second -> result` is a legal step under this policy
    pub fn allows(&self, first: u32, second: u32, result: u32) -> bool {
        if first < result && second < result {
            return true;
        }
        self.low_tier_peers
            && first <= self.low_tier_ceiling
            && second <= self.low_tier_ceiling
            && result <= self.low_tier_ceiling
    }
}
