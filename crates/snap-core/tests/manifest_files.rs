//! Manifest loading from disk and JsonSchema agreement.

use std::io::Write;

use pretty_assertions::assert_eq;
use schemars::schema_for;
use snap_core::CoreError;
use snap_core::entities::TransformStep;
use snap_core::manifest::ModuleManifest;

const ACME: &str = r#"
name = "acme.legal"
description = "Acme legal documents"

[[transforms]]
kind = "select"
selector = "article"

[[transforms]]
kind = "strip_tags"

[[transforms]]
kind = "replace"
pattern = "Last updated: .*"
replacement = ""

[[jobs]]
company = "Acme"
company_website = "https://acme.test"
service = "Acme Cloud"
document = "Terms of Use"
language_code = "en"
language_name = "English"
url = "https://acme.test/legal/terms"

[[jobs]]
company = "Acme"
service = "Acme Cloud"
document = "Terms of Use"
language_code = "fr"
language_name = "French"
url = "acme.test/fr/legal/terms"
"#;

fn write_manifest(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn loads_and_validates_file() {
    let file = write_manifest(ACME);
    let manifest = ModuleManifest::load(file.path()).unwrap();

    assert_eq!(manifest.name, "acme.legal");
    assert_eq!(manifest.transforms.len(), 3);
    assert_eq!(manifest.transforms[1], TransformStep::StripTags);
    assert_eq!(manifest.jobs.len(), 2);
    assert_eq!(manifest.jobs[1].url, "https://acme.test/fr/legal/terms");
    assert!(manifest.jobs.iter().all(|job| job.enabled));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ModuleManifest::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, CoreError::Io { .. }), "{err:?}");
}

#[test]
fn invalid_file_reports_module_name() {
    let file = write_manifest("name = \"acme.empty\"\n");
    let err = ModuleManifest::load(file.path()).unwrap_err();
    assert!(
        err.to_string().starts_with("Invalid module 'acme.empty'"),
        "{err}"
    );
}

#[test]
fn manifest_matches_its_json_schema() {
    let manifest = ModuleManifest::from_toml_str(ACME).unwrap();
    let schema = serde_json::to_value(schema_for!(ModuleManifest)).unwrap();
    let instance = serde_json::to_value(&manifest).unwrap();

    let validator = jsonschema::validator_for(&schema).expect("schema should be valid");
    let errors: Vec<String> = validator
        .iter_errors(&instance)
        .map(|e| format!("{e}"))
        .collect();
    assert!(errors.is_empty(), "schema validation failed: {errors:?}");
}
