use serde::{Deserialize, Serialize};

/// Page size for a standard search.
pub const STANDARD_PAGE_SIZE: u32 = 50;
/// Page size for a deep search: maximal volume per request, latency traded for coverage.
pub const DEEP_SEARCH_PAGE_SIZE: u32 = 200;

/// Coarse creator classification for segmented display.
///
/// This is a closed two-way split, not an enumerated set: the literal
/// `"established"` is established, anything else (including a missing tier)
/// is emerging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Established,
    Emerging,
}

impl Tier {
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("established") => Tier::Established,
            _ => Tier::Emerging,
        }
    }
}

/// One discovered account, as returned by the search API.
///
/// `id` is the internal numeric identifier and is absent until the backend
/// has persisted the creator; only persisted creators can be assigned to
/// campaigns. Scores are conventionally in [0, 100] but not clamped here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creator {
    #[serde(default)]
    pub id: Option<i64>,
    pub external_id: String,
    #[serde(default)]
    pub name: String,
    pub platform: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub profile_url: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub follower_count: u64,
    #[serde(default)]
    pub engagement_rate: f64,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub niche_tags: Vec<String>,
    #[serde(default)]
    pub estimated_age_range: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub demographic_confidence: Option<String>,
    #[serde(default)]
    pub engagement_score: f64,
    #[serde(default)]
    pub quality_score: f64,
    #[serde(default)]
    pub relevance_score: f64,
    #[serde(default)]
    pub overall_score: f64,
    #[serde(default)]
    pub tier: Option<String>,
}

impl Creator {
    pub fn tier(&self) -> Tier {
        Tier::from_label(self.tier.as_deref())
    }
}

/// Sparse search configuration: absent fields mean "no constraint" and are
/// never transmitted. Built from raw selections by [`crate::params`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub niche: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_followers: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_followers: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_engagement: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_max: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_demographics: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_search: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_seen: Option<bool>,
}

impl SearchParams {
    /// Flatten into query pairs, one per defined field. Unset fields are
    /// omitted entirely, never encoded as empty or "null" values.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> = Vec::new();
        if let Some(v) = &self.platform {
            pairs.push(("platform", v.clone()));
        }
        if let Some(v) = &self.niche {
            pairs.push(("niche", v.clone()));
        }
        if let Some(v) = self.min_followers {
            pairs.push(("min_followers", v.to_string()));
        }
        if let Some(v) = self.max_followers {
            pairs.push(("max_followers", v.to_string()));
        }
        if let Some(v) = self.min_engagement {
            pairs.push(("min_engagement", v.to_string()));
        }
        if let Some(v) = &self.gender {
            pairs.push(("gender", v.clone()));
        }
        if let Some(v) = self.age_min {
            pairs.push(("age_min", v.to_string()));
        }
        if let Some(v) = self.age_max {
            pairs.push(("age_max", v.to_string()));
        }
        if let Some(v) = &self.country {
            pairs.push(("country", v.clone()));
        }
        if let Some(v) = self.strict_demographics {
            pairs.push(("strict_demographics", v.to_string()));
        }
        if let Some(v) = &self.sort_by {
            pairs.push(("sort_by", v.clone()));
        }
        if let Some(v) = self.page {
            pairs.push(("page", v.to_string()));
        }
        if let Some(v) = self.page_size {
            pairs.push(("page_size", v.to_string()));
        }
        if let Some(v) = self.deep_search {
            pairs.push(("deep_search", v.to_string()));
        }
        if let Some(v) = self.exclude_seen {
            pairs.push(("exclude_seen", v.to_string()));
        }
        pairs
    }
}

/// Outcome of one search: creators in backend sort order, the count for the
/// applied filters, and the unfiltered total across the whole store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub creators: Vec<Creator>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub db_total: u64,
    #[serde(default)]
    pub page: u32,
}

/// A named collection of creators. `filters_json` is an opaque snapshot of
/// the filters active when the campaign was created; this client records it
/// but never interprets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub filters_json: serde_json::Value,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub creator_count: Option<u64>,
    #[serde(default)]
    pub creators: Option<Vec<CampaignMember>>,
}

/// One creator as a member of a campaign, carrying per-membership fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignMember {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub follower_count: u64,
    #[serde(default)]
    pub engagement_rate: f64,
    #[serde(default)]
    pub overall_score: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub added_at: String,
}

/// Response to a seen-history reset.
#[derive(Debug, Clone, Deserialize)]
pub struct ResetResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Events emitted by controllers and consumed by presentation layers.
#[derive(Debug, Clone)]
pub enum ScoutEvent {
    SearchStarted {
        deep: bool,
    },
    /// Cosmetic once-per-second progress tick while a search is running.
    SearchTick {
        elapsed_secs: u64,
    },
    SearchCompleted {
        // Box to keep ScoutEvent small; a deep-search result is large.
        result: Box<SearchResult>,
    },
    SearchFailed {
        message: String,
    },
    /// Advisory update of the whole-database creator count.
    TotalsUpdated {
        db_total: u64,
    },
    Info(String),
}
