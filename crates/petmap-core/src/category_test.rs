use std::collections::BTreeSet;

use super::*;

fn file_from_yaml(yaml: &str) -> CategoryGroupsFile {
    serde_yaml::from_str(yaml).expect("test yaml should parse")
}

const DEFAULT_YAML: &str = r#"
groups:
  hospital: ["veterinary hospital"]
  pharmacy: [pharmacy]
  grooming: [grooming]
  culture_center: [culture_center, museum, art_gallery]
  travel: [travel]
  care_service: [care_service]
  pension: [pension]
  pet_supplies: [pet_supplies]
  restaurant: [restaurant, cafe]
"#;

#[test]
fn restaurant_expands_to_restaurant_and_cafe() {
    let groups = CategoryGroups::default();
    let expanded = groups.expand(&[CategoryKey::Restaurant]);
    assert_eq!(
        expanded,
        BTreeSet::from([Category::Restaurant, Category::Cafe])
    );
}

#[test]
fn culture_center_expands_to_three_categories() {
    let groups = CategoryGroups::default();
    let expanded = groups.expand(&[CategoryKey::CultureCenter]);
    assert_eq!(expanded.len(), 3);
    assert!(expanded.contains(&Category::Museum));
    assert!(expanded.contains(&Category::ArtGallery));
}

#[test]
fn expansion_deduplicates_repeated_keys() {
    let groups = CategoryGroups::default();
    let expanded = groups.expand(&[
        CategoryKey::Restaurant,
        CategoryKey::Restaurant,
        CategoryKey::Pharmacy,
    ]);
    assert_eq!(expanded.len(), 3);
}

#[test]
fn expansion_is_order_independent() {
    let groups = CategoryGroups::default();
    let a = groups.expand(&[CategoryKey::Pension, CategoryKey::CultureCenter]);
    let b = groups.expand(&[CategoryKey::CultureCenter, CategoryKey::Pension]);
    assert_eq!(a, b);
}

#[test]
fn expanding_an_expanded_set_is_a_no_op() {
    let groups = CategoryGroups::default();
    for key in CategoryKey::ALL {
        let once = groups.expand(&[key]);
        assert_eq!(groups.expand_categories(&once), once, "key {key}");
    }
    let all = groups.expand(&CategoryKey::ALL);
    assert_eq!(groups.expand_categories(&all), all);
}

#[test]
fn key_for_finds_owning_group() {
    let groups = CategoryGroups::default();
    assert_eq!(
        groups.key_for(Category::Cafe),
        Some(CategoryKey::Restaurant)
    );
    assert_eq!(
        groups.key_for(Category::VeterinaryHospital),
        Some(CategoryKey::Hospital)
    );
}

#[test]
fn category_wire_names_round_trip_through_serde() {
    let parsed: Category = serde_json::from_str("\"veterinary hospital\"").unwrap();
    assert_eq!(parsed, Category::VeterinaryHospital);
    let legacy: Category = serde_json::from_str("\"hospital\"").unwrap();
    assert_eq!(legacy, Category::VeterinaryHospital);
    assert_eq!(
        serde_json::to_string(&Category::ArtGallery).unwrap(),
        "\"art_gallery\""
    );
}

#[test]
fn category_key_parses_loose_spellings() {
    assert_eq!(
        "culture-center".parse::<CategoryKey>(),
        Ok(CategoryKey::CultureCenter)
    );
    assert_eq!(
        "Pet Supplies".parse::<CategoryKey>(),
        Ok(CategoryKey::PetSupplies)
    );
    assert!("zoo".parse::<CategoryKey>().is_err());
}

#[test]
fn yaml_table_matching_defaults_builds_default_groups() {
    let groups = build_category_groups(file_from_yaml(DEFAULT_YAML)).unwrap();
    assert_eq!(groups, CategoryGroups::default());
}

#[test]
fn yaml_table_missing_key_fails_validation() {
    let yaml = DEFAULT_YAML.replace("  pension: [pension]\n", "");
    let result = build_category_groups(file_from_yaml(&yaml));
    assert!(
        matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("pension")),
        "expected missing pension group, got: {result:?}"
    );
}

#[test]
fn yaml_table_empty_group_fails_validation() {
    let yaml = DEFAULT_YAML.replace("travel: [travel]", "travel: []");
    let result = build_category_groups(file_from_yaml(&yaml));
    assert!(matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("empty")));
}

#[test]
fn yaml_table_shared_category_fails_validation() {
    let yaml = DEFAULT_YAML.replace("pension: [pension]", "pension: [pension, cafe]");
    let result = build_category_groups(file_from_yaml(&yaml));
    assert!(matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("cafe")));
}

#[test]
fn load_category_groups_reports_missing_file() {
    let result = load_category_groups(Path::new("/nonexistent/petmap-categories.yaml"));
    assert!(matches!(result, Err(ConfigError::CategoriesFileIo { .. })));
}
