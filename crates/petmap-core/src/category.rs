//! Facility categories and the user-facing category groups that expand into them.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ConfigError;

/// Backend category value stored on every facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "veterinary hospital", alias = "hospital")]
    VeterinaryHospital,
    #[serde(rename = "pharmacy")]
    Pharmacy,
    #[serde(rename = "grooming")]
    Grooming,
    #[serde(rename = "culture_center")]
    CultureCenter,
    #[serde(rename = "museum")]
    Museum,
    #[serde(rename = "art_gallery")]
    ArtGallery,
    #[serde(rename = "travel")]
    Travel,
    #[serde(rename = "care_service")]
    CareService,
    #[serde(rename = "pension")]
    Pension,
    #[serde(rename = "pet_supplies")]
    PetSupplies,
    #[serde(rename = "restaurant")]
    Restaurant,
    #[serde(rename = "cafe")]
    Cafe,
}

impl Category {
    /// The wire value the backend expects in filter requests.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::VeterinaryHospital => "veterinary hospital",
            Category::Pharmacy => "pharmacy",
            Category::Grooming => "grooming",
            Category::CultureCenter => "culture_center",
            Category::Museum => "museum",
            Category::ArtGallery => "art_gallery",
            Category::Travel => "travel",
            Category::CareService => "care_service",
            Category::Pension => "pension",
            Category::PetSupplies => "pet_supplies",
            Category::Restaurant => "restaurant",
            Category::Cafe => "cafe",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category choice offered in the filter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKey {
    Hospital,
    Pharmacy,
    Grooming,
    CultureCenter,
    Travel,
    CareService,
    Pension,
    PetSupplies,
    Restaurant,
}

impl CategoryKey {
    /// Panel order.
    pub const ALL: [CategoryKey; 9] = [
        CategoryKey::Hospital,
        CategoryKey::Pharmacy,
        CategoryKey::Grooming,
        CategoryKey::CultureCenter,
        CategoryKey::Travel,
        CategoryKey::CareService,
        CategoryKey::Pension,
        CategoryKey::PetSupplies,
        CategoryKey::Restaurant,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryKey::Hospital => "hospital",
            CategoryKey::Pharmacy => "pharmacy",
            CategoryKey::Grooming => "grooming",
            CategoryKey::CultureCenter => "culture_center",
            CategoryKey::Travel => "travel",
            CategoryKey::CareService => "care_service",
            CategoryKey::Pension => "pension",
            CategoryKey::PetSupplies => "pet_supplies",
            CategoryKey::Restaurant => "restaurant",
        }
    }

    /// Korean label shown on the category toggle.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CategoryKey::Hospital => "병원",
            CategoryKey::Pharmacy => "약국",
            CategoryKey::Grooming => "미용샵",
            CategoryKey::CultureCenter => "문화센터",
            CategoryKey::Travel => "여행지",
            CategoryKey::CareService => "위탁관리",
            CategoryKey::Pension => "펜션",
            CategoryKey::PetSupplies => "동물용품",
            CategoryKey::Restaurant => "식당",
        }
    }
}

impl std::fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category key \"{0}\"")]
pub struct ParseCategoryKeyError(pub String);

impl FromStr for CategoryKey {
    type Err = ParseCategoryKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace(['-', ' '], "_");
        CategoryKey::ALL
            .into_iter()
            .find(|key| key.as_str() == needle)
            .ok_or_else(|| ParseCategoryKeyError(s.to_string()))
    }
}

/// Mapping from each [`CategoryKey`] to the backend categories it selects.
///
/// Every key maps to a non-empty group and no backend category belongs to two
/// groups, so [`CategoryGroups::key_for`] is well defined and expansion is
/// idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroups {
    groups: BTreeMap<CategoryKey, BTreeSet<Category>>,
}

impl Default for CategoryGroups {
    fn default() -> Self {
        let groups = CategoryKey::ALL
            .into_iter()
            .map(|key| {
                let members: &[Category] = match key {
                    CategoryKey::Hospital => &[Category::VeterinaryHospital],
                    CategoryKey::Pharmacy => &[Category::Pharmacy],
                    CategoryKey::Grooming => &[Category::Grooming],
                    CategoryKey::CultureCenter => &[
                        Category::CultureCenter,
                        Category::Museum,
                        Category::ArtGallery,
                    ],
                    CategoryKey::Travel => &[Category::Travel],
                    CategoryKey::CareService => &[Category::CareService],
                    CategoryKey::Pension => &[Category::Pension],
                    CategoryKey::PetSupplies => &[Category::PetSupplies],
                    CategoryKey::Restaurant => &[Category::Restaurant, Category::Cafe],
                };
                (key, members.iter().copied().collect())
            })
            .collect();
        Self { groups }
    }
}

impl CategoryGroups {
    /// Backend categories selected by a single key.
    #[must_use]
    pub fn group(&self, key: CategoryKey) -> Option<&BTreeSet<Category>> {
        self.groups.get(&key)
    }

    /// Expands keys into the deduplicated set of backend categories.
    pub fn expand<'a, I>(&self, keys: I) -> BTreeSet<Category>
    where
        I: IntoIterator<Item = &'a CategoryKey>,
    {
        keys.into_iter()
            .filter_map(|key| self.groups.get(key))
            .flatten()
            .copied()
            .collect()
    }

    /// The key whose group contains `category`.
    #[must_use]
    pub fn key_for(&self, category: Category) -> Option<CategoryKey> {
        self.groups
            .iter()
            .find(|(_, members)| members.contains(&category))
            .map(|(key, _)| *key)
    }

    /// Maps an already-expanded category set back through its groups.
    ///
    /// For any set produced by [`CategoryGroups::expand`] the result is the
    /// same set.
    #[must_use]
    pub fn expand_categories(&self, categories: &BTreeSet<Category>) -> BTreeSet<Category> {
        let keys: BTreeSet<CategoryKey> = categories
            .iter()
            .filter_map(|category| self.key_for(*category))
            .collect();
        self.expand(&keys)
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryGroupsFile {
    pub groups: BTreeMap<CategoryKey, Vec<Category>>,
}

/// Load and validate a category group table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_category_groups(path: &Path) -> Result<CategoryGroups, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CategoriesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: CategoryGroupsFile = serde_yaml::from_str(&content)?;
    build_category_groups(file)
}

fn build_category_groups(file: CategoryGroupsFile) -> Result<CategoryGroups, ConfigError> {
    let mut owner: BTreeMap<Category, CategoryKey> = BTreeMap::new();
    let mut groups = BTreeMap::new();

    for key in CategoryKey::ALL {
        let Some(members) = file.groups.get(&key) else {
            return Err(ConfigError::Validation(format!(
                "category key '{key}' has no group"
            )));
        };
        if members.is_empty() {
            return Err(ConfigError::Validation(format!(
                "category key '{key}' has an empty group"
            )));
        }
        for category in members {
            if let Some(previous) = owner.insert(*category, key) {
                if previous != key {
                    return Err(ConfigError::Validation(format!(
                        "category '{category}' is listed under both '{previous}' and '{key}'"
                    )));
                }
            }
        }
        groups.insert(key, members.iter().copied().collect());
    }

    Ok(CategoryGroups { groups })
}

#[cfg(test)]
#[path = "category_test.rs"]
mod tests;
