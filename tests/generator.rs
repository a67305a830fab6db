mod common;
use std::sync::Arc;

use aamva_dl_record::{
    license::Field, BuildError, Config, Error, Generator, Registry, SequenceIdentifiers,
    Violation,
};
use common::*;

const CROOMS_SUBFILE: &str = "DLDAQ091076664\nDCSCROOMS\nDACSTANLEY\nDADM\nDBB04151988\nDBA07282033\nDBD07282025\nDBCD\nDAU069 in\nDAYHAZ\nDAG2110 OLD MAPLE LN\nDAIDURHAM\nDAJTN\nDAK37745\nDCF252090372892550101\nDCK110250728203364\r";

#[test]
fn crooms_record() {
    let generated = generator().generate(&crooms()).unwrap();
    let metadata = generated.metadata();

    assert_eq!(metadata.state_iin, "636053");
    assert!(metadata.compliant);
    assert_eq!(metadata.data_length, 217);
    assert_eq!(metadata.aamva_version, 6);
    assert!(generated.real_id);

    let text = generated.text();
    assert!(text.contains("DAU069"));
    assert!(text.contains("DADM"));
    assert_eq!(
        text,
        format!("@\n\x1e\rANSI 636053060001DL00310186{CROOMS_SUBFILE}")
    );
    assert_eq!(
        hex::encode(&generated.document.as_bytes()[..9]),
        "400a1e0d414e534920"
    );
}

#[test]
fn stanley_crooms_record() {
    let input = stanley_crooms();

    let generated = Generator::default().generate(&input).unwrap();
    let metadata = generated.metadata();
    assert_eq!(metadata.state_iin, "636053");
    assert!(metadata.compliant);
    assert!(generated.real_id);

    let subfile = std::str::from_utf8(generated.document.subfile_bytes()).unwrap();
    assert!(subfile.starts_with("DLDAQ091076664\n"));
    assert!(subfile.contains("\nDAU069 in\n"));
    assert!(subfile.contains("\nDADM\n"));
    assert!(!subfile.contains("DDF"));

    let generated = generator().generate(&input).unwrap();
    assert!(generated.metadata().compliant);
    assert_eq!(generated.document.subfile_bytes(), CROOMS_SUBFILE.as_bytes());
}

#[test]
fn designator_selects_subfile() {
    let generated = generator().generate(&crooms()).unwrap();
    let metadata = generated.metadata();
    let bytes = generated.document.as_bytes();

    assert_eq!(metadata.subfile_offset, generated.document.header().len());
    assert_eq!(metadata.subfile_offset, 31);

    let start = metadata.subfile_offset as usize;
    let end = start + metadata.subfile_length as usize;
    assert_eq!(&bytes[start..end], CROOMS_SUBFILE.as_bytes());
    assert_eq!(end, bytes.len());
}

#[test]
fn generation_is_idempotent() {
    let generator = generator();
    let a = generator.generate(&crooms()).unwrap();
    let b = generator.generate(&crooms()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn generated_identifiers() {
    let mut input = crooms();
    input.icn = None;
    input.dd = None;

    let generator = Generator::default().with_identifiers(SequenceIdentifiers::new());
    let a = generator.generate(&input).unwrap();
    let b = generator.generate(&input).unwrap();
    assert!(a.metadata().compliant);
    assert_ne!(a.text(), b.text());

    let dd = &a.document.subfile().elements().mandatory.inventory_control_number;
    assert_eq!(dd.len(), 15);
    assert!(dd.starts_with(b"250728"));
}

#[test]
fn feet_and_inches() {
    for height in ["6'0", "6'0\"", "72", " 72 "] {
        let mut input = crooms();
        input.height_inches = Some(height.to_owned());
        let generated = generator().generate(&input).unwrap();
        assert!(generated.text().contains("DAU072 in\n"), "{height}");
    }
}

#[test]
fn height_bounds() {
    for (height, valid) in [("35", false), ("36", true), ("96", true), ("97", false)] {
        let mut input = crooms();
        input.height_inches = Some(height.to_owned());
        match generator().generate(&input) {
            Ok(_) => assert!(valid, "{height}"),
            Err(Error::Validation(e)) => {
                assert!(!valid, "{height}");
                assert!(e.contains_field(Field::HeightInches));
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}

#[test]
fn invalid_dates() {
    for date in ["13011990", "01321990", "01011899", "1011990", "0101199O"] {
        let mut input = crooms();
        input.birth_date = Some(date.to_owned());
        match generator().generate(&input) {
            Err(Error::Validation(e)) => {
                assert_eq!(e.violations().len(), 1, "{date}");
                assert!(e.contains_field(Field::BirthDate), "{date}");
            }
            other => panic!("{date} was accepted: {other:?}"),
        }
    }
}

#[test]
fn unknown_jurisdiction() {
    let mut input = crooms();
    input.state = Some("ZZ".to_owned());
    match generator().generate(&input) {
        Err(Error::Validation(e)) => assert_eq!(
            e.violations(),
            [Violation::UnknownJurisdiction {
                code: "ZZ".to_owned()
            }]
        ),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn middle_name() {
    let generated = generator().generate(&crooms()).unwrap();
    assert!(!generated.text().contains("DDF"));

    let mut input = crooms();
    input.middle_name = Some("David".to_owned());
    let generated = generator().generate(&input).unwrap();
    assert_eq!(generated.text().matches("DDF").count(), 1);
    assert!(generated.text().contains("DDFDAVID\r"));
    assert!(generated.text().contains("DCK110250728203364\nDDFDAVID"));
}

#[test]
fn optional_elements_order() {
    let mut input = crooms();
    input.endorsements = Some("m".to_owned());
    input.weight_lbs = Some("180".to_owned());
    input.donor = Some("Yes".to_owned());
    input.veteran = Some("N".to_owned());

    let generated = generator().generate(&input).unwrap();
    assert!(generated
        .text()
        .ends_with("DCK110250728203364\nDAW180\nDDAM\nDDK1\r"));
    assert!(!generated.text().contains("DDL"));
}

#[test]
fn every_violation_is_reported() {
    let mut input = crooms();
    input.first_name = Some(" ".to_owned());
    input.zip_code = Some("3774".to_owned());
    input.sex = Some("Q".to_owned());
    input.eye_color = None;
    input.weight_lbs = Some("12".to_owned());

    match generator().generate(&input) {
        Err(Error::Validation(e)) => {
            let fields: Vec<_> = e.violations().iter().map(Violation::field).collect();
            assert_eq!(
                fields,
                ["first_name", "zip_code", "sex", "weight_lbs", "eye_color"]
            );
            assert!(matches!(
                e.violations()[0],
                Violation::MissingField { field: "first_name" }
            ));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn overlong_value() {
    let mut input = crooms();
    input.address = Some("1".repeat(36));

    match generator().generate(&input) {
        Err(Error::Build(BuildError::EncodingOverflow {
            element,
            length,
            max,
        })) => {
            assert_eq!(element, "DAG");
            assert_eq!(length, 36);
            assert_eq!(max, 35);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn custom_registry_and_versions() {
    let registry =
        Registry::from_reader("code,name,iin\nTN,Tennessee,636999\n".as_bytes()).unwrap();
    let config = Config::from_json_str(r#"{"aamva_version": 10, "jurisdiction_version": 1}"#)
        .unwrap();
    let generator = Generator::new(config)
        .with_registry(Arc::new(registry))
        .with_identifiers(aamva_dl_record::FixedIdentifiers::new(ICN, DD));

    let generated = generator.generate(&crooms()).unwrap();
    assert!(generated.text().starts_with("@\n\x1e\rANSI 636999100101DL0031"));
    assert_eq!(generated.metadata().state_iin, "636999");

    let mut input = crooms();
    input.state = Some("NC".to_owned());
    assert!(matches!(
        generator.generate(&input),
        Err(Error::Validation(_))
    ));
}

#[test]
fn metadata_serialization() {
    let generated = generator().generate(&crooms()).unwrap();
    let json = serde_json::to_value(generated.metadata()).unwrap();
    assert_eq!(json["state_iin"], "636053");
    assert_eq!(json["data_length"], 217);
    assert_eq!(json["compliant"], true);
}
