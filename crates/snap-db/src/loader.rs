//! Plugin module loader: install, update, and uninstall.
//!
//! A module is a validated [`ModuleManifest`]. Loading walks every job's
//! company → service → document → language hierarchy, getting or creating
//! each record, then the job itself and the module's transform registration
//! for the document. Each operation runs in one transaction.
//!
//! Install never modifies existing rows: a supplied value that disagrees with
//! the stored one produces a warning. Update overwrites such values and
//! reports each change.

use std::collections::HashSet;

use snap_core::entities::Document;
use snap_core::manifest::{JobSpec, ModuleManifest};
use snap_core::responses::{InstallReport, UninstallReport};
use tracing::{debug, info, warn};

use crate::error::DatabaseError;
use crate::repos::{company, document, job, language, service, snapshot, transform};
use crate::service::SnapService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadMode {
    Install { force_disabled: bool },
    Update,
}

fn display(value: Option<&str>) -> String {
    value.map_or_else(|| "none".to_string(), |v| format!("\"{v}\""))
}

struct Loader<'a> {
    conn: &'a libsql::Connection,
    manifest: &'a ModuleManifest,
    mode: LoadMode,
    report: InstallReport,
    /// Documents whose transform registration has been handled.
    registered: HashSet<i64>,
    /// Documents owned by another module that were already warned about.
    foreign: HashSet<i64>,
}

impl<'a> Loader<'a> {
    fn new(conn: &'a libsql::Connection, manifest: &'a ModuleManifest, mode: LoadMode) -> Self {
        Self {
            conn,
            manifest,
            mode,
            report: InstallReport {
                module: manifest.name.clone(),
                ..InstallReport::default()
            },
            registered: HashSet::new(),
            foreign: HashSet::new(),
        }
    }

    /// Compare one stored non-key value with the supplied one. Returns `true`
    /// when the caller must write the supplied value.
    ///
    /// An omitted optional value (`None`) leaves the stored one alone, so a
    /// company's website only needs to appear on one of its jobs.
    fn reconcile(
        &mut self,
        entity: &str,
        field: &str,
        stored: Option<&str>,
        supplied: Option<&str>,
    ) -> bool {
        if supplied.is_none() || stored == supplied {
            return false;
        }
        let (stored, supplied) = (display(stored), display(supplied));
        if self.mode == LoadMode::Update {
            info!(entity, field, %stored, %supplied, "updating field");
            self.report
                .changes
                .push(format!("{entity}: {field} changed from {stored} to {supplied}"));
            true
        } else {
            warn!(entity, field, %stored, %supplied, "keeping existing value");
            self.report.warnings.push(format!(
                "Existing {entity} found with different field values. Existing record will \
                 not be updated. Existing \"{field}\" value: {stored}. Discarded \"{field}\" \
                 value: {supplied}."
            ));
            false
        }
    }

    async fn load(mut self) -> Result<InstallReport, DatabaseError> {
        let manifest = self.manifest;
        for spec in &manifest.jobs {
            let job_id = self.load_job(spec).await?;
            self.report.job_ids.push(job_id);
        }
        if self.mode == LoadMode::Update {
            self.disable_dropped_jobs().await?;
        }
        Ok(self.report)
    }

    async fn load_job(&mut self, spec: &JobSpec) -> Result<i64, DatabaseError> {
        let company_id = self.company(spec).await?;
        let service_id = self.service(spec, company_id).await?;
        let document = self.document(spec, service_id).await?;
        let language_id = self.language(spec).await?;
        let job_id = self.job(spec, document.document_id, language_id).await?;
        if self.registered.insert(document.document_id) {
            self.transform(&document).await?;
        }
        Ok(job_id)
    }

    async fn company(&mut self, spec: &JobSpec) -> Result<i64, DatabaseError> {
        let website = spec.company_website.as_deref();
        let Some(existing) = company::find_company(self.conn, &spec.company).await? else {
            let created = company::insert_company(self.conn, &spec.company, website).await?;
            debug!(company_id = created.company_id, name = %spec.company, "created company");
            return Ok(created.company_id);
        };
        let entity = format!("company '{}'", spec.company);
        if self.reconcile(&entity, "website", existing.website.as_deref(), website) {
            company::set_company_website(self.conn, existing.company_id, website).await?;
        }
        Ok(existing.company_id)
    }

    async fn service(&mut self, spec: &JobSpec, company_id: i64) -> Result<i64, DatabaseError> {
        let website = spec.service_website.as_deref();
        let Some(existing) = service::find_service(self.conn, company_id, &spec.service).await?
        else {
            let created =
                service::insert_service(self.conn, company_id, &spec.service, website).await?;
            debug!(service_id = created.service_id, name = %spec.service, "created service");
            return Ok(created.service_id);
        };
        let entity = format!("service '{} / {}'", spec.company, spec.service);
        if self.reconcile(&entity, "website", existing.website.as_deref(), website) {
            service::set_service_website(self.conn, existing.service_id, website).await?;
        }
        Ok(existing.service_id)
    }

    async fn document(&mut self, spec: &JobSpec, service_id: i64) -> Result<Document, DatabaseError> {
        let manifest = self.manifest;
        let module = &manifest.name;
        let Some(existing) = document::find_document(self.conn, service_id, &spec.document).await?
        else {
            let created =
                document::insert_document(self.conn, service_id, module, &spec.document).await?;
            debug!(document_id = created.document_id, name = %spec.document, "created document");
            return Ok(created);
        };
        if existing.module != *module && self.foreign.insert(existing.document_id) {
            self.report.warnings.push(format!(
                "Document '{}' of service '{}' belongs to module '{}'. It stays with that module.",
                spec.document, spec.service, existing.module
            ));
        }
        Ok(existing)
    }

    async fn language(&mut self, spec: &JobSpec) -> Result<i64, DatabaseError> {
        let Some(existing) = language::find_language(self.conn, &spec.language_code).await? else {
            let created =
                language::insert_language(self.conn, &spec.language_name, &spec.language_code)
                    .await?;
            return Ok(created.language_id);
        };
        let entity = format!("language '{}'", spec.language_code);
        if self.reconcile(
            &entity,
            "name",
            Some(&existing.name),
            Some(&spec.language_name),
        ) {
            language::set_language_name(self.conn, existing.language_id, &spec.language_name)
                .await?;
        }
        Ok(existing.language_id)
    }

    async fn job(
        &mut self,
        spec: &JobSpec,
        document_id: i64,
        language_id: i64,
    ) -> Result<i64, DatabaseError> {
        let enabled = match self.mode {
            LoadMode::Install { force_disabled } => spec.enabled && !force_disabled,
            LoadMode::Update => spec.enabled,
        };
        let Some(existing) = job::find_job(self.conn, document_id, language_id).await? else {
            let created =
                job::insert_job(self.conn, document_id, language_id, &spec.url, enabled).await?;
            info!(job_id = created.job_id, url = %spec.url, "created snapshot job");
            self.report.jobs_created += 1;
            return Ok(created.job_id);
        };
        let entity = format!("job {} ({})", existing.job_id, spec.describe());
        if self.reconcile(&entity, "url", Some(&existing.url), Some(&spec.url)) {
            job::set_job_url(self.conn, existing.job_id, &spec.url).await?;
        }
        // The enabled flag belongs to the user once a job exists.
        match self.mode {
            LoadMode::Install { .. } => {
                let (stored, supplied) = (existing.is_enabled.to_string(), enabled.to_string());
                self.reconcile(&entity, "is_enabled", Some(&stored), Some(&supplied));
            }
            LoadMode::Update if enabled && !existing.is_enabled => {
                self.report.changes.push(format!(
                    "job #{} is listed but stays disabled (run 'docsnaps enable {}' to resume it)",
                    existing.job_id, existing.job_id
                ));
            }
            LoadMode::Update => {}
        }
        Ok(existing.job_id)
    }

    async fn transform(&mut self, document: &Document) -> Result<(), DatabaseError> {
        let manifest = self.manifest;
        let module = &manifest.name;
        let priority = manifest.priority;
        let steps = &manifest.transforms;
        let Some(existing) =
            transform::find_transform(self.conn, document.document_id, module).await?
        else {
            transform::insert_transform(self.conn, document.document_id, module, priority, steps)
                .await?;
            return Ok(());
        };
        match self.mode {
            LoadMode::Install { .. } => {
                self.report.warnings.push(format!(
                    "Module '{module}' already registered a transform for document '{}'. \
                     Existing registration will not be updated.",
                    document.name
                ));
            }
            LoadMode::Update => {
                if existing.execution_priority != priority || existing.steps != *steps {
                    transform::set_transform(self.conn, existing.transform_id, priority, steps)
                        .await?;
                    self.report.changes.push(format!(
                        "transform of module '{module}' on document '{}': {} step(s) at priority {priority}",
                        document.name,
                        steps.len()
                    ));
                }
            }
        }
        Ok(())
    }

    async fn disable_dropped_jobs(&mut self) -> Result<(), DatabaseError> {
        let kept: HashSet<i64> = self.report.job_ids.iter().copied().collect();
        for stale in job::jobs_for_module(self.conn, &self.manifest.name).await? {
            if kept.contains(&stale.job_id) || !stale.is_enabled {
                continue;
            }
            job::set_enabled(self.conn, stale.job_id, false).await?;
            info!(job_id = stale.job_id, "disabled job no longer in manifest");
            self.report.jobs_disabled.push(stale.job_id);
        }
        Ok(())
    }
}

async fn uninstall(
    conn: &libsql::Connection,
    module: &str,
    purge: bool,
) -> Result<UninstallReport, DatabaseError> {
    let documents = document::documents_for_module(conn, module).await?;
    if documents.is_empty() && transform::count_transforms_for_module(conn, module).await? == 0 {
        return Err(DatabaseError::NotFound(format!(
            "module '{module}' is not installed"
        )));
    }

    let mut report = UninstallReport {
        module: module.to_string(),
        ..UninstallReport::default()
    };
    report.transforms_removed = transform::delete_transforms_for_module(conn, module).await?;

    let mut services = Vec::new();
    for doc in &documents {
        let mut remaining = 0_u32;
        for snapshot_job in job::jobs_for_document(conn, doc.document_id).await? {
            let snapshots = snapshot::count_snapshots(conn, snapshot_job.job_id).await?;
            if snapshots > 0 && !purge {
                if snapshot_job.is_enabled {
                    job::set_enabled(conn, snapshot_job.job_id, false).await?;
                }
                report.jobs_disabled.push(snapshot_job.job_id);
                remaining += 1;
                continue;
            }
            report.snapshots_removed += snapshot::delete_snapshots(conn, snapshot_job.job_id).await?;
            job::delete_job(conn, snapshot_job.job_id).await?;
            report.jobs_removed += 1;
        }
        if remaining == 0 {
            report.transforms_removed +=
                transform::delete_transforms_for_document(conn, doc.document_id).await?;
            document::delete_document(conn, doc.document_id).await?;
            report.documents_removed += 1;
            if !services.contains(&doc.service_id) {
                services.push(doc.service_id);
            }
        }
    }

    let mut companies = Vec::new();
    for service_id in services {
        let owner = service::get_service_by_id(conn, service_id).await?.company_id;
        if service::delete_service_if_orphan(conn, service_id).await? {
            report.services_removed += 1;
            if !companies.contains(&owner) {
                companies.push(owner);
            }
        }
    }
    for company_id in companies {
        if company::delete_company_if_orphan(conn, company_id).await? {
            report.companies_removed += 1;
        }
    }
    Ok(report)
}

impl SnapService {
    /// Install a validated module. Existing records are left untouched and
    /// disagreements are reported as warnings. With `force_disabled`, new
    /// jobs are created disabled regardless of the manifest.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any write fails; nothing is committed then.
    pub async fn install_module(
        &self,
        manifest: &ModuleManifest,
        force_disabled: bool,
    ) -> Result<InstallReport, DatabaseError> {
        let tx = self.db().conn().transaction().await?;
        let result = Loader::new(&tx, manifest, LoadMode::Install { force_disabled })
            .load()
            .await;
        Self::finish(tx, result).await
    }

    /// Re-load a module, overwriting differing values and disabling jobs the
    /// manifest no longer lists.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any write fails; nothing is committed then.
    pub async fn update_module(
        &self,
        manifest: &ModuleManifest,
    ) -> Result<InstallReport, DatabaseError> {
        let tx = self.db().conn().transaction().await?;
        let result = Loader::new(&tx, manifest, LoadMode::Update).load().await;
        Self::finish(tx, result).await
    }

    /// Remove a module's transforms, jobs, and documents. Jobs holding
    /// snapshots are disabled and kept unless `purge` is set.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for a module that is not installed.
    pub async fn uninstall_module(
        &self,
        module: &str,
        purge: bool,
    ) -> Result<UninstallReport, DatabaseError> {
        let tx = self.db().conn().transaction().await?;
        let result = uninstall(&tx, module, purge).await;
        Self::finish(tx, result).await
    }
}
