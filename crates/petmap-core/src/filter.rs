//! Client-side facility filtering.
//!
//! A facility is visible iff every active predicate of the selection holds:
//! district (exact match on the district key, or on its display name when
//! one is attached), category (membership in the
//! expanded category set) and free text (case-insensitive substring of name,
//! district or address). Inactive predicates are skipped.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::category::{Category, CategoryGroups, CategoryKey};
use crate::facility::Facility;

/// Transient filter panel state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    /// Stable district key; `None` means all districts.
    pub district: Option<String>,
    pub categories: BTreeSet<CategoryKey>,
    pub query: String,
}

impl FilterSelection {
    /// Adds `key` if absent, removes it otherwise. Returns whether it is now selected.
    pub fn toggle_category(&mut self, key: CategoryKey) -> bool {
        if self.categories.remove(&key) {
            false
        } else {
            self.categories.insert(key);
            true
        }
    }

    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.district.is_none() && self.categories.is_empty() && self.query.trim().is_empty()
    }
}

/// A selection resolved against a category table, ready to test facilities.
#[derive(Debug, Clone)]
pub struct CompiledFilter<'a> {
    district: Option<&'a str>,
    district_name: Option<&'a str>,
    categories: Option<BTreeSet<Category>>,
    needle: Option<String>,
}

impl<'a> CompiledFilter<'a> {
    #[must_use]
    pub fn new(selection: &'a FilterSelection, groups: &CategoryGroups) -> Self {
        let categories =
            (!selection.categories.is_empty()).then(|| groups.expand(&selection.categories));
        let query = selection.query.trim();
        Self {
            district: selection.district.as_deref(),
            district_name: None,
            categories,
            needle: (!query.is_empty()).then(|| query.to_lowercase()),
        }
    }

    /// Also accepts facilities labelled with the selected district's display
    /// name. The backend filters by key but labels records by name.
    #[must_use]
    pub fn with_district_name(mut self, name: Option<&'a str>) -> Self {
        self.district_name = name;
        self
    }

    #[must_use]
    pub fn matches(&self, facility: &Facility) -> bool {
        if let Some(district) = self.district {
            let by_name = self.district_name == Some(facility.district.as_str());
            if facility.district != district && !by_name {
                return false;
            }
        }
        if let Some(categories) = &self.categories {
            if !categories.contains(&facility.category) {
                return false;
            }
        }
        if let Some(needle) = &self.needle {
            let hit = [&facility.name, &facility.district, &facility.address]
                .into_iter()
                .any(|field| field.to_lowercase().contains(needle.as_str()));
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Returns the facilities that satisfy `selection`, preserving input order.
#[must_use]
pub fn filter_facilities<'f>(
    facilities: &'f [Facility],
    selection: &FilterSelection,
    groups: &CategoryGroups,
) -> Vec<&'f Facility> {
    let compiled = CompiledFilter::new(selection, groups);
    facilities.iter().filter(|f| compiled.matches(f)).collect()
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
