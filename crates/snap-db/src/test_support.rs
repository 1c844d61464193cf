//! Shared test utilities for snap-db unit tests.

use snap_core::manifest::ModuleManifest;

use crate::SnapDb;
use crate::service::SnapService;

/// Create an in-memory `SnapService`.
pub async fn test_service() -> SnapService {
    let db = SnapDb::open_local(":memory:").await.unwrap();
    SnapService::from_db(db)
}

/// Manifest with one document in English and French.
pub fn acme_manifest() -> ModuleManifest {
    ModuleManifest::from_toml_str(
        r#"
name = "acme.legal"

[[transforms]]
kind = "strip_tags"

[[jobs]]
company = "Acme"
company_website = "https://acme.test"
service = "Acme Cloud"
document = "Terms of Use"
language_code = "en"
language_name = "English"
url = "https://acme.test/terms"

[[jobs]]
company = "Acme"
service = "Acme Cloud"
document = "Terms of Use"
language_code = "fr"
language_name = "French"
url = "https://acme.test/fr/terms"
"#,
    )
    .unwrap()
}
