use super::*;
use std::sync::Arc;

fn pb_system() -> IsotopeSystem {
    IsotopeSystem::new(
        "Pb-Pb",
        vec![
            IsotopeRatio::new("206Pb", "204Pb"),
            IsotopeRatio::new("207Pb", "206Pb"),
        ],
        Some(PeakStripSettings {
            target_isotope: "204Pb".to_string(),
            known_isotope_ratio: IsotopeRatio::new("204Hg", "202Hg"),
            known_isotope_ratio_value: 0.2299,
        }),
    )
    .unwrap()
}

#[test]
fn test_ratio_name() {
    let ratio = IsotopeRatio::new("206Pb", "204Pb");
    assert_eq!(ratio.name(), "206Pb_204Pb");
    assert_eq!(ratio.to_string(), "206Pb/204Pb");
}

#[test]
fn test_empty_isotope_system_rejected() {
    let err = IsotopeSystem::new("empty", vec![], None).unwrap_err();
    assert!(matches!(err, ModelError::EmptyIsotopeSystem(name) if name == "empty"));
}

#[test]
fn test_intensity_columns_deduplicated_in_order() {
    let system = pb_system();
    assert_eq!(system.intensity_columns(), vec!["206Pb", "204Pb", "207Pb"]);
    assert_eq!(
        system.required_columns(),
        vec!["206Pb", "204Pb", "207Pb", "202Hg"]
    );
}

#[test]
fn test_check_columns_names_missing_isotope() {
    let system = Arc::new(pb_system());
    let ts = TimeSeries::from_columns([
        ("206Pb", vec![1.0]),
        ("204Pb", vec![1.0]),
        ("207Pb", vec![1.0]),
    ])
    .unwrap();
    let sample = Sample::new("S-001", SampleType::Sample, system, ts);

    match sample.check_columns() {
        Err(ModelError::MissingIsotopeColumn { sample, column }) => {
            assert_eq!(sample, "S-001");
            assert_eq!(column, "202Hg");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_reference_lookup_fails_loudly() {
    let material = ReferenceMaterial::new("NIST SRM 610")
        .with_value("206Pb_204Pb", ReferenceValue::new(17.052, "Baker et al 2004"));

    assert_eq!(material.get_value("206Pb_204Pb").unwrap().value, 17.052);
    let err = material.get_value("208Pb_204Pb").unwrap_err();
    assert_eq!(
        err.to_string(),
        "An entry for '208Pb_204Pb' not found in 'NIST SRM 610'"
    );
}

#[test]
fn test_sample_type_parsing() {
    assert_eq!("standard".parse::<SampleType>().unwrap(), SampleType::Standard);
    assert_eq!(" Control ".parse::<SampleType>().unwrap(), SampleType::Control);
    assert_eq!("sample".parse::<SampleType>().unwrap(), SampleType::Sample);
    assert!("blank".parse::<SampleType>().is_err());
    assert_eq!(SampleType::Control.to_string(), "control");
}

#[test]
fn test_reduced_data_flat_columns() {
    let mut reduced = ReducedData::new();
    reduced.insert("206Pb_204Pb", 17.0, 0.01);
    reduced.insert("207Pb_206Pb", 0.91, 0.001);

    assert_eq!(
        reduced.column_names(),
        vec!["206Pb_204Pb", "206Pb_204Pb_err", "207Pb_206Pb", "207Pb_206Pb_err"]
    );
    assert_eq!(reduced.value("206Pb_204Pb"), Some(17.0));
    assert_eq!(reduced.value("206Pb_204Pb_err"), Some(0.01));
    assert_eq!(reduced.value("208Pb_204Pb"), None);

    reduced.insert("206Pb_204Pb", 18.0, 0.02);
    assert_eq!(reduced.len(), 2);
    assert_eq!(reduced.mean("206Pb_204Pb"), Some(18.0));
}

#[test]
fn test_reduced_data_average_skips_missing() {
    let mut a = ReducedData::new();
    a.insert("206Pb_204Pb", 16.0, 0.02);
    a.insert("207Pb_204Pb", 15.0, 0.01);
    let mut b = ReducedData::new();
    b.insert("206Pb_204Pb", 18.0, 0.04);
    b.insert("208Pb_204Pb", 36.0, 0.03);

    let avg = a.average_with(&b);
    assert_eq!(avg.mean("206Pb_204Pb"), Some(17.0));
    assert!((avg.std_err("206Pb_204Pb").unwrap() - 0.03).abs() < 1e-12);
    assert_eq!(avg.mean("207Pb_204Pb"), Some(15.0));
    assert_eq!(avg.mean("208Pb_204Pb"), Some(36.0));
}

#[test]
fn test_isotope_system_serde_roundtrip() {
    let system = pb_system();
    let json = serde_json::to_string(&system).unwrap();
    let restored: IsotopeSystem = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, system);
}
