//! Filter selections and their normalization into sparse search parameters.

use crate::model::{SearchParams, DEEP_SEARCH_PAGE_SIZE, STANDARD_PAGE_SIZE};

/// Raw operator filter selections, with unset sentinels: empty string for
/// text fields, `None` for numeric fields, `false` for flags.
#[derive(Debug, Clone, Default)]
pub struct FilterSelections {
    pub platform: String,
    pub niche: String,
    pub gender: String,
    pub country: String,
    pub sort_by: String,
    pub min_followers: Option<u64>,
    pub max_followers: Option<u64>,
    pub min_engagement: Option<f64>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub page: Option<u32>,
    pub strict_demographics: bool,
    pub exclude_seen: bool,
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_owned())
    }
}

// Boolean flags are only meaningful when true; false is the unset sentinel.
fn flag(b: bool) -> Option<bool> {
    b.then_some(true)
}

/// Normalizes raw selections into a [`SearchParams`], omitting every field
/// left at its unset sentinel. Page size is fixed by mode: deep search always
/// requests [`DEEP_SEARCH_PAGE_SIZE`], standard search [`STANDARD_PAGE_SIZE`].
/// Pure transformation; no network or state side effects.
pub fn build_search_params(selections: &FilterSelections, deep: bool) -> SearchParams {
    SearchParams {
        platform: non_empty(&selections.platform),
        niche: non_empty(&selections.niche),
        min_followers: selections.min_followers,
        max_followers: selections.max_followers,
        min_engagement: selections.min_engagement,
        gender: non_empty(&selections.gender),
        age_min: selections.age_min,
        age_max: selections.age_max,
        country: non_empty(&selections.country),
        strict_demographics: flag(selections.strict_demographics),
        sort_by: non_empty(&selections.sort_by),
        page: selections.page,
        page_size: Some(if deep {
            DEEP_SEARCH_PAGE_SIZE
        } else {
            STANDARD_PAGE_SIZE
        }),
        deep_search: flag(deep),
        exclude_seen: flag(selections.exclude_seen),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_sentinels_are_omitted() {
        let params = build_search_params(&FilterSelections::default(), false);
        let keys: Vec<&str> = params.to_query_pairs().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["page_size"]);
    }

    #[test]
    fn standard_search_uses_standard_page_size() {
        let params = build_search_params(&FilterSelections::default(), false);
        assert_eq!(params.page_size, Some(STANDARD_PAGE_SIZE));
        assert_eq!(params.deep_search, None);
    }

    #[test]
    fn deep_search_uses_deep_page_size_and_flag() {
        let params = build_search_params(&FilterSelections::default(), true);
        assert_eq!(params.page_size, Some(DEEP_SEARCH_PAGE_SIZE));
        assert_eq!(params.deep_search, Some(true));
    }

    #[test]
    fn false_flags_are_omitted_true_flags_kept() {
        let selections = FilterSelections {
            strict_demographics: true,
            exclude_seen: false,
            ..Default::default()
        };
        let params = build_search_params(&selections, false);
        assert_eq!(params.strict_demographics, Some(true));
        assert_eq!(params.exclude_seen, None);
    }

    #[test]
    fn whitespace_only_text_is_unset() {
        let selections = FilterSelections {
            niche: "   ".into(),
            ..Default::default()
        };
        let params = build_search_params(&selections, false);
        assert_eq!(params.niche, None);
    }

    #[test]
    fn set_fields_become_query_keys() {
        let selections = FilterSelections {
            platform: "tiktok".into(),
            niche: String::new(),
            min_followers: Some(1000),
            ..Default::default()
        };
        let params = build_search_params(&selections, false);
        let pairs = params.to_query_pairs();
        assert!(pairs.contains(&("platform", "tiktok".into())));
        assert!(pairs.contains(&("min_followers", "1000".into())));
        assert!(pairs.iter().all(|(k, _)| *k != "niche"));
        // No value ever encodes as a literal null/empty string.
        assert!(pairs.iter().all(|(_, v)| !v.is_empty() && v != "null"));
    }
}
