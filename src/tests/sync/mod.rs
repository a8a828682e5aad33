use crate::{
    ErrorDetail,
    deploy::local::memory,
    job::{self, Converted},
    material::{self, MaterialDatabase, TargetDevice},
    profile::MetadataError,
    progress::NullReporter,
};

use super::{VERSION, baseline_pipeline, find, profile};

#[tokio::test]
async fn converts_and_uploads() {
    let mut pipeline = baseline_pipeline();
    let summary = pipeline
        .process_files(
            &[
                profile("acme_silk_pla.json"),
                profile("generic_petg_hf.json"),
            ],
            &NullReporter,
        )
        .await;
    assert!(summary.failed.is_empty(), "{:?}", summary.failed);
    assert_eq!(
        summary.converted,
        vec![
            Converted {
                id: "F1".into(),
                name: "Silk Red".into(),
                replaced: false,
            },
            Converted {
                id: "GFSG99".into(),
                name: "Generic PETG HF".into(),
                replaced: true,
            },
        ]
    );

    let documents = pipeline.into_documents().unwrap();
    let client = memory::Client::default();
    job::upload(&client, &documents, &NullReporter)
        .await
        .unwrap();
    assert_eq!(
        client.names().await,
        vec![
            material::DATABASE_FILE_NAME.to_owned(),
            material::OPTIONS_FILE_NAME.to_owned(),
        ]
    );

    let uploaded = client.get(material::DATABASE_FILE_NAME).await.unwrap();
    assert!(uploaded.starts_with(b"{\n\t\"code\": 0"));
    let database = MaterialDatabase::from_slice(&uploaded).unwrap();
    assert_eq!(database.result.count, 3);
    assert_eq!(database.result.list.len(), 3);
    assert_eq!(database.result.version, VERSION);

    let acme = find(&database, "F1");
    assert_eq!(acme.engine_version, "2.0.0.1");
    assert_eq!(acme.printer_int_name, "F008");
    assert_eq!(acme.nozzle_diameter, vec!["0.4".to_owned()]);
    assert_eq!(acme.base.brand, "Acme");
    assert_eq!(acme.base.name, "Silk Red");
    assert_eq!(acme.base.material_type, "PLA");
    assert_eq!(acme.base.density, 1.24);
    assert_eq!(acme.base.diameter, "1.75");
    assert_eq!(acme.base.cost_per_meter, 20);
    assert_eq!((acme.base.min_temp, acme.base.max_temp), (190, 230));
    assert_eq!(acme.base.shrinkage_rate, 12);
    assert_eq!(acme.base.drying_temp, 60);
    assert!(!acme.base.is_soluble && !acme.base.is_support);
    assert_eq!(acme.kv_param.get("filament_vendor"), Some("Acme"));
    assert_eq!(acme.kv_param.get("filament_density"), Some("1.24"));
    assert_eq!(
        acme.kv_param.get("filament_notes"),
        Some(r#""{\"id\":\"F1\",\"vendor\":\"Acme\",\"type\":\"PLA\",\"name\":\"Silk Red\"}""#)
    );

    // Replaced in place, after the baseline PLA entry.
    assert_eq!(database.result.list[1].base.id, "GFSG99");
    let petg = &database.result.list[1];
    assert_eq!(petg.base.name, "Generic PETG HF");
    assert_eq!(petg.base.drying_time, 8);
    assert_eq!(petg.kv_param.get("filament_max_volumetric_speed"), Some("21.5"));

    let options =
        material::options_from_slice(&client.get(material::OPTIONS_FILE_NAME).await.unwrap())
            .unwrap();
    assert_eq!(options["Acme"]["PLA"], "Silk Red");
    assert_eq!(options["Generic"]["PETG"], "Generic PETG\nGeneric PETG HF");
    assert_eq!(options["Generic"]["PLA"], "Generic PLA");
}

#[tokio::test]
async fn profile_without_identity_is_skipped() {
    let mut pipeline = baseline_pipeline();
    let summary = pipeline
        .process_files(&[profile("no_identity.json")], &NullReporter)
        .await;
    assert!(summary.converted.is_empty());
    assert_eq!(summary.failed.len(), 1);
    assert!(matches!(
        *summary.failed[0].detail,
        ErrorDetail::MissingMetadata(MetadataError::Empty)
    ));
    assert_eq!(summary.failed[0].context.id, None);

    assert_eq!(pipeline.database(), &MaterialDatabase::baseline().unwrap());
    assert_eq!(pipeline.options(), &material::baseline_options().unwrap());
}

#[tokio::test]
async fn unreadable_file_does_not_stop_the_run() {
    let mut pipeline = baseline_pipeline();
    let summary = pipeline
        .process_files(
            &[profile("missing.json"), profile("acme_silk_pla.json")],
            &NullReporter,
        )
        .await;
    assert_eq!(summary.converted.len(), 1);
    assert!(matches!(
        *summary.failed[0].detail,
        ErrorDetail::ReadDocument(_)
    ));
}

#[tokio::test]
async fn merging_twice_is_idempotent() {
    let mut once = baseline_pipeline();
    once.process_file(&profile("acme_silk_pla.json"))
        .await
        .unwrap();

    let mut twice = baseline_pipeline();
    twice
        .process_file(&profile("acme_silk_pla.json"))
        .await
        .unwrap();
    let second = twice
        .process_file(&profile("acme_silk_pla.json"))
        .await
        .unwrap();
    assert!(second.replaced);

    assert_eq!(once.into_documents().unwrap(), twice.into_documents().unwrap());
}

#[test]
fn malformed_document_is_a_parse_error() {
    let mut pipeline = baseline_pipeline();
    let error = pipeline
        .process(&profile("broken.json"), br#"{"name": "x", "#)
        .unwrap_err();
    assert!(matches!(*error.detail, ErrorDetail::Parse(_)));
    assert_eq!(pipeline.database().result.list.len(), 2);
}

#[tokio::test]
async fn target_device_is_stamped_on_entries() {
    let mut pipeline = baseline_pipeline().with_device(TargetDevice {
        printer_int_name: "F012".into(),
        nozzle_diameter: "0.6".into(),
    });
    pipeline
        .process_file(&profile("acme_silk_pla.json"))
        .await
        .unwrap();
    let entry = find(pipeline.database(), "F1");
    assert_eq!(entry.printer_int_name, "F012");
    assert_eq!(entry.nozzle_diameter, vec!["0.6".to_owned()]);
}
