//! Install / update / uninstall through the public `SnapService` API.

use pretty_assertions::assert_eq;
use snap_core::SnapshotTime;
use snap_core::entities::TransformStep;
use snap_core::manifest::ModuleManifest;
use snap_db::error::DatabaseError;
use snap_db::service::SnapService;

const ACME: &str = r#"
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
company_website = "https://acme.test"
service = "Acme Cloud"
document = "Privacy Policy"
language_code = "en"
language_name = "English"
url = "https://acme.test/privacy"
"#;

async fn service() -> SnapService {
    SnapService::new_local(":memory:").await.unwrap()
}

fn manifest(text: &str) -> ModuleManifest {
    ModuleManifest::from_toml_str(text)
        .unwrap()
        .into_validated()
        .unwrap()
}

async fn row_count(svc: &SnapService, table: &str) -> i64 {
    let mut rows = svc
        .db()
        .conn()
        .query(&format!("SELECT COUNT(*) FROM {table}"), ())
        .await
        .unwrap();
    rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap()
}

async fn snapshot(svc: &SnapService, job_id: i64) {
    svc.save_snapshot(job_id, &SnapshotTime::now(), "text")
        .await
        .unwrap();
}

#[tokio::test]
async fn install_creates_full_hierarchy() {
    let svc = service().await;
    let report = svc.install_module(&manifest(ACME), false).await.unwrap();

    assert_eq!(report.module, "acme.legal");
    assert_eq!(report.jobs_created, 2);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(row_count(&svc, "company").await, 1);
    assert_eq!(row_count(&svc, "service").await, 1);
    assert_eq!(row_count(&svc, "document").await, 2);
    assert_eq!(row_count(&svc, "language").await, 1);
    assert_eq!(row_count(&svc, "snapshot_job").await, 2);
    assert_eq!(row_count(&svc, "transform").await, 2);
}

#[tokio::test]
async fn repeated_install_is_side_effect_free() {
    let svc = service().await;
    let first = svc.install_module(&manifest(ACME), false).await.unwrap();
    let second = svc.install_module(&manifest(ACME), false).await.unwrap();

    assert_eq!(second.job_ids, first.job_ids);
    assert_eq!(second.jobs_created, 0);
    assert_eq!(row_count(&svc, "snapshot_job").await, 2);
    assert_eq!(row_count(&svc, "transform").await, 2);
    let transform_warnings = second
        .warnings
        .iter()
        .filter(|w| w.contains("already registered a transform"))
        .count();
    assert_eq!(transform_warnings, 2);
}

#[tokio::test]
async fn install_keeps_existing_website_and_warns() {
    let svc = service().await;
    svc.install_module(&manifest(ACME), false).await.unwrap();

    let changed = ACME.replace("https://acme.test\"", "https://acme.example\"");
    let report = svc.install_module(&manifest(&changed), false).await.unwrap();

    assert_eq!(
        svc.get_company("Acme").await.unwrap().website.as_deref(),
        Some("https://acme.test")
    );
    assert!(report.warnings.iter().any(|w| w.starts_with(
        "Existing company 'Acme' found with different field values. Existing record will not be updated."
    )));
    assert!(report.changes.is_empty());
}

#[tokio::test]
async fn install_disabled_creates_disabled_jobs() {
    let svc = service().await;
    svc.install_module(&manifest(ACME), true).await.unwrap();

    assert!(svc.list_active_jobs(&[]).await.unwrap().is_empty());
    assert!(svc.list_jobs().await.unwrap().iter().all(|j| !j.is_enabled));
}

#[tokio::test]
async fn failed_write_rolls_back_install() {
    let svc = service().await;
    svc.db()
        .conn()
        .execute_batch(
            "CREATE TRIGGER reject_privacy BEFORE INSERT ON snapshot_job
             WHEN NEW.url LIKE '%privacy%'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .await
        .unwrap();

    let result = svc.install_module(&manifest(ACME), false).await;
    assert!(result.is_err());
    for table in ["company", "service", "document", "language", "snapshot_job", "transform"] {
        assert_eq!(row_count(&svc, table).await, 0, "{table} should be empty");
    }
}

#[tokio::test]
async fn update_overwrites_and_reports_changes() {
    let svc = service().await;
    svc.install_module(&manifest(ACME), false).await.unwrap();

    let changed = ACME
        .replace("https://acme.test\"", "https://acme.example\"")
        .replace("https://acme.test/terms", "https://acme.example/terms")
        .replace("kind = \"strip_tags\"", "kind = \"trim\"");
    let report = svc.update_module(&manifest(&changed)).await.unwrap();

    assert_eq!(
        svc.get_company("Acme").await.unwrap().website.as_deref(),
        Some("https://acme.example")
    );
    let jobs = svc.list_jobs().await.unwrap();
    assert_eq!(jobs[0].url, "https://acme.example/terms");
    let transforms = svc.list_transforms("acme.legal").await.unwrap();
    assert!(transforms.iter().all(|t| t.steps == [TransformStep::Trim]));
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    // company website, job url, and two transforms
    assert_eq!(report.changes.len(), 4, "{:?}", report.changes);
}

#[tokio::test]
async fn update_disables_dropped_jobs_and_keeps_user_flag() {
    let svc = service().await;
    let installed = svc.install_module(&manifest(ACME), false).await.unwrap();
    let (terms, privacy) = (installed.job_ids[0], installed.job_ids[1]);
    svc.set_job_enabled(terms, false).await.unwrap();

    let only_terms = ACME[..ACME.rfind("[[jobs]]").unwrap()].to_string();
    let report = svc.update_module(&manifest(&only_terms)).await.unwrap();

    assert_eq!(report.job_ids, [terms]);
    assert_eq!(report.jobs_disabled, [privacy]);
    assert!(!svc.get_job(privacy).await.unwrap().is_enabled);
    assert!(!svc.get_job(terms).await.unwrap().is_enabled);
}

#[tokio::test]
async fn relisted_job_stays_disabled_and_is_reported() {
    let svc = service().await;
    let installed = svc.install_module(&manifest(ACME), false).await.unwrap();
    let privacy = installed.job_ids[1];

    let only_terms = ACME[..ACME.rfind("[[jobs]]").unwrap()].to_string();
    let dropped = svc.update_module(&manifest(&only_terms)).await.unwrap();
    assert_eq!(dropped.jobs_disabled, [privacy]);

    let relisted = svc.update_module(&manifest(ACME)).await.unwrap();
    assert_eq!(relisted.jobs_created, 0);
    assert!(relisted.jobs_disabled.is_empty());
    assert_eq!(
        relisted.changes,
        [format!(
            "job #{privacy} is listed but stays disabled (run 'docsnaps enable {privacy}' to resume it)"
        )]
    );
    assert!(!svc.get_job(privacy).await.unwrap().is_enabled);
}

#[tokio::test]
async fn uninstall_removes_unsnapshotted_module() {
    let svc = service().await;
    svc.install_module(&manifest(ACME), false).await.unwrap();

    let report = svc.uninstall_module("acme.legal", false).await.unwrap();

    assert_eq!(report.jobs_removed, 2);
    assert_eq!(report.documents_removed, 2);
    assert_eq!(report.transforms_removed, 2);
    assert_eq!(report.services_removed, 1);
    assert_eq!(report.companies_removed, 1);
    assert_eq!(row_count(&svc, "company").await, 0);
    // Languages are shared reference data.
    assert_eq!(row_count(&svc, "language").await, 1);
}

#[tokio::test]
async fn uninstall_keeps_snapshotted_jobs_disabled() {
    let svc = service().await;
    let installed = svc.install_module(&manifest(ACME), false).await.unwrap();
    let terms = installed.job_ids[0];
    snapshot(&svc, terms).await;

    let report = svc.uninstall_module("acme.legal", false).await.unwrap();

    assert_eq!(report.jobs_disabled, [terms]);
    assert_eq!(report.jobs_removed, 1);
    assert_eq!(report.documents_removed, 1);
    assert_eq!(report.services_removed, 0);
    assert!(!svc.get_job(terms).await.unwrap().is_enabled);
    assert_eq!(row_count(&svc, "snapshot").await, 1);
    assert_eq!(row_count(&svc, "transform").await, 0);
}

#[tokio::test]
async fn uninstall_purge_deletes_snapshots() {
    let svc = service().await;
    let installed = svc.install_module(&manifest(ACME), false).await.unwrap();
    snapshot(&svc, installed.job_ids[0]).await;
    snapshot(&svc, installed.job_ids[1]).await;

    let report = svc.uninstall_module("acme.legal", true).await.unwrap();

    assert_eq!(report.snapshots_removed, 2);
    assert_eq!(report.jobs_removed, 2);
    assert!(report.jobs_disabled.is_empty());
    assert_eq!(row_count(&svc, "snapshot").await, 0);
    assert_eq!(row_count(&svc, "company").await, 0);
}

#[tokio::test]
async fn uninstall_unknown_module_is_not_found() {
    let svc = service().await;
    let err = svc.uninstall_module("nobody.here", false).await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)), "{err:?}");
    assert_eq!(err.to_string(), "module 'nobody.here' is not installed");
}

#[tokio::test]
async fn uninstall_keeps_companies_shared_with_other_modules() {
    let svc = service().await;
    svc.install_module(&manifest(ACME), false).await.unwrap();
    let other = r#"
name = "acme.mail"

[[jobs]]
company = "Acme"
service = "Acme Mail"
document = "Terms of Use"
language_code = "en"
language_name = "English"
url = "https://mail.acme.test/terms"
"#;
    svc.install_module(&manifest(other), false).await.unwrap();

    let report = svc.uninstall_module("acme.mail", false).await.unwrap();

    assert_eq!(report.services_removed, 1);
    assert_eq!(report.companies_removed, 0);
    assert_eq!(row_count(&svc, "company").await, 1);
    assert_eq!(svc.list_modules().await.unwrap(), ["acme.legal"]);
}
