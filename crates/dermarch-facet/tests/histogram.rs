//! Tests for the faceted histogram engine.

use dermarch_facet::{DatasetVisibility, FacetKind, FacetSpec, IMAGE_FACETS, histogram};
use dermarch_model::{ImageRecord, MetadataValue};

fn record(name: &str, dataset: &str) -> ImageRecord {
    ImageRecord::new(name, dataset)
}

fn with_clinical(mut record: ImageRecord, field: &str, value: MetadataValue) -> ImageRecord {
    record.metadata.clinical.insert(field, value);
    record
}

fn accept_all(_: &ImageRecord) -> bool {
    true
}

#[test]
fn total_count_tracks_filtered_records_only() {
    let records = vec![
        with_clinical(
            record("ISIC_1", "alpha"),
            "sex",
            MetadataValue::Text("male".to_string()),
        ),
        record("ISIC_2", "alpha"),
        record("ISIC_3", "beta"),
    ];

    let result = histogram(
        &records,
        &DatasetVisibility::All,
        |record| record.dataset == "alpha",
        IMAGE_FACETS,
    );

    assert_eq!(result.count, 2);
    // The facet map is fully keyed regardless of how many bins filled.
    assert_eq!(result.facets.len(), IMAGE_FACETS.len());
}

#[test]
fn visibility_excludes_datasets_before_counting() {
    let records = vec![
        record("ISIC_1", "alpha"),
        record("ISIC_2", "beta"),
        record("ISIC_3", "beta"),
    ];

    let visibility = DatasetVisibility::only(["beta"]);
    let result = histogram(&records, &visibility, accept_all, IMAGE_FACETS);

    assert_eq!(result.count, 2);
    let dataset_bins = &result.facets["dataset"];
    assert_eq!(dataset_bins.len(), 1);
    assert_eq!(dataset_bins[0].label, MetadataValue::Text("beta".to_string()));
    assert_eq!(dataset_bins[0].count, 2);
}

#[test]
fn ordinal_values_land_in_half_open_intervals() {
    let records = vec![
        with_clinical(record("ISIC_1", "alpha"), "age_approx", MetadataValue::Integer(47)),
        with_clinical(record("ISIC_2", "alpha"), "age_approx", MetadataValue::Integer(45)),
        with_clinical(record("ISIC_3", "alpha"), "age_approx", MetadataValue::Integer(90)),
        with_clinical(record("ISIC_4", "alpha"), "age_approx", MetadataValue::Missing),
        record("ISIC_5", "alpha"),
    ];

    let result = histogram(&records, &DatasetVisibility::All, accept_all, IMAGE_FACETS);
    let bins = &result.facets["clinical.age_approx"];

    // One interval bin plus the default bin; 90 is outside [0, 90).
    assert_eq!(bins.len(), 2);
    assert_eq!(bins[0].label, MetadataValue::Text("[40 - 50)".to_string()));
    assert_eq!(bins[0].low_bound, Some(40.0));
    assert_eq!(bins[0].high_bound, Some(50.0));
    assert_eq!(bins[0].count, 2);
    assert_eq!(bins[1].label, MetadataValue::Missing);
    assert_eq!(bins[1].count, 3);
}

#[test]
fn categorical_bins_sort_by_value_with_null_last() {
    let records = vec![
        with_clinical(
            record("ISIC_1", "alpha"),
            "benign_malignant",
            MetadataValue::Text("malignant".to_string()),
        ),
        with_clinical(
            record("ISIC_2", "alpha"),
            "benign_malignant",
            MetadataValue::Text("benign".to_string()),
        ),
        with_clinical(
            record("ISIC_3", "alpha"),
            "benign_malignant",
            MetadataValue::Text("benign".to_string()),
        ),
        record("ISIC_4", "alpha"),
    ];

    let result = histogram(&records, &DatasetVisibility::All, accept_all, IMAGE_FACETS);
    let bins = &result.facets["clinical.benign_malignant"];

    let labels: Vec<_> = bins.iter().map(|bin| bin.label.clone()).collect();
    assert_eq!(
        labels,
        vec![
            MetadataValue::Text("benign".to_string()),
            MetadataValue::Text("malignant".to_string()),
            MetadataValue::Missing,
        ]
    );
    assert_eq!(bins[0].count, 2);
    assert_eq!(bins[2].count, 1);
}

#[test]
fn flag_bins_order_false_then_true() {
    let records = vec![
        with_clinical(record("ISIC_1", "alpha"), "melanocytic", MetadataValue::Flag(true)),
        with_clinical(record("ISIC_2", "alpha"), "melanocytic", MetadataValue::Flag(false)),
        with_clinical(record("ISIC_3", "alpha"), "melanocytic", MetadataValue::Flag(true)),
    ];

    let result = histogram(&records, &DatasetVisibility::All, accept_all, IMAGE_FACETS);
    let bins = &result.facets["clinical.melanocytic"];

    assert_eq!(bins[0].label, MetadataValue::Flag(false));
    assert_eq!(bins[0].count, 1);
    assert_eq!(bins[1].label, MetadataValue::Flag(true));
    assert_eq!(bins[1].count, 2);
}

#[test]
fn tag_facet_counts_occurrences_and_untagged_records() {
    let mut tagged = record("ISIC_1", "alpha");
    tagged.tags = vec!["reviewed".to_string(), "public".to_string()];
    let mut also_tagged = record("ISIC_2", "alpha");
    also_tagged.tags = vec!["reviewed".to_string()];
    let untagged = record("ISIC_3", "alpha");

    let result = histogram(
        [&tagged, &also_tagged, &untagged],
        &DatasetVisibility::All,
        accept_all,
        IMAGE_FACETS,
    );
    let bins = &result.facets["tags"];

    assert_eq!(bins.len(), 3);
    assert_eq!(bins[0].label, MetadataValue::Text("public".to_string()));
    assert_eq!(bins[0].count, 1);
    assert_eq!(bins[1].label, MetadataValue::Text("reviewed".to_string()));
    assert_eq!(bins[1].count, 2);
    assert_eq!(bins[2].label, MetadataValue::Missing);
    assert_eq!(bins[2].count, 1);
}

#[test]
fn empty_filter_result_still_reports_zero_count() {
    let records = vec![record("ISIC_1", "alpha")];

    let result = histogram(
        &records,
        &DatasetVisibility::only(["nothing"]),
        accept_all,
        IMAGE_FACETS,
    );

    assert_eq!(result.count, 0);
    assert_eq!(result.facets.len(), IMAGE_FACETS.len());
    assert!(result.facets.values().all(Vec::is_empty));
}

#[test]
fn non_numeric_ordinal_values_fall_into_the_default_bin() {
    let records = vec![with_clinical(
        record("ISIC_1", "alpha"),
        "clin_size_long_diam_mm",
        MetadataValue::Text("large".to_string()),
    )];

    let result = histogram(&records, &DatasetVisibility::All, accept_all, IMAGE_FACETS);
    let bins = &result.facets["clinical.clin_size_long_diam_mm"];

    assert_eq!(bins.len(), 1);
    assert_eq!(bins[0].label, MetadataValue::Missing);
    assert_eq!(bins[0].count, 1);
}

#[test]
fn histogram_serializes_as_a_response_payload() {
    let records = vec![
        with_clinical(record("ISIC_1", "alpha"), "age_approx", MetadataValue::Integer(45)),
        with_clinical(
            record("ISIC_2", "alpha"),
            "sex",
            MetadataValue::Text("female".to_string()),
        ),
    ];

    let result = histogram(&records, &DatasetVisibility::All, accept_all, IMAGE_FACETS);
    let json = serde_json::to_value(&result).expect("serialize histogram");

    assert_eq!(json["count"], 2);
    let age_bins = json["facets"]["clinical.age_approx"]
        .as_array()
        .expect("age facet");
    assert_eq!(age_bins[0]["label"], "[40 - 50)");
    assert_eq!(age_bins[0]["low_bound"], 40.0);
    assert_eq!(age_bins[0]["high_bound"], 50.0);
    assert_eq!(age_bins[0]["count"], 1);

    let sex_bins = json["facets"]["clinical.sex"].as_array().expect("sex facet");
    // Value bins omit interval bounds entirely.
    assert_eq!(sex_bins[0]["label"], "female");
    assert!(sex_bins[0].get("low_bound").is_none());
}

#[test]
fn custom_facet_lists_are_respected() {
    let sex_only = [FacetSpec {
        field: "clinical.sex",
        kind: FacetKind::Categorical,
    }];
    let records = vec![with_clinical(
        record("ISIC_1", "alpha"),
        "sex",
        MetadataValue::Text("male".to_string()),
    )];

    let result = histogram(&records, &DatasetVisibility::All, accept_all, &sex_only);

    assert_eq!(result.facets.len(), 1);
    assert!(result.facets.contains_key("clinical.sex"));
}
