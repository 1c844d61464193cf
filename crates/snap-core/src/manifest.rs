//! Plugin module manifests.
//!
//! A plugin module is a TOML file that registers one or more snapshot jobs
//! and the transform pipeline applied to their documents. Validation happens
//! before anything is written so that module authors get every problem in one
//! explicit message instead of a half-installed module.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use scraper::Selector;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::entities::TransformStep;
use crate::errors::CoreError;

static MODULE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+(\.[A-Za-z0-9_]+)*$").expect("module name regex is valid")
});

const fn default_enabled() -> bool {
    true
}

/// A plugin module: its name, transform pipeline, and snapshot jobs.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ModuleManifest {
    /// Dotted module name, e.g. `acme.legal`. Recorded on every document the
    /// module installs.
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Execution priority of this module's transforms relative to other
    /// modules registered for the same document. Lower runs first.
    #[serde(default)]
    pub priority: i64,

    /// Transform steps applied, in order, to every document of this module.
    #[serde(default)]
    pub transforms: Vec<TransformStep>,

    #[serde(default)]
    pub jobs: Vec<JobSpec>,
}

/// One snapshot job with its full company → service → document → language
/// hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct JobSpec {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub company_website: Option<String>,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub service_website: Option<String>,
    #[serde(default)]
    pub document: String,
    /// ISO 639-1 code, two lowercase letters.
    #[serde(default)]
    pub language_code: String,
    #[serde(default)]
    pub language_name: String,
    /// Absolute `http(s)` URL. A URL without a scheme is taken as `https`.
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl JobSpec {
    /// Human-readable identity used in validation messages and warnings.
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "{} / {} / {} [{}]",
            self.company, self.service, self.document, self.language_code
        )
    }

    fn key(&self) -> (String, String, String, String) {
        (
            self.company.clone(),
            self.service.clone(),
            self.document.clone(),
            self.language_code.clone(),
        )
    }
}

impl ModuleManifest {
    /// Parse a manifest from TOML text. Does not validate.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Parse` if the text is not a well-formed manifest.
    pub fn from_toml_str(text: &str) -> Result<Self, CoreError> {
        Ok(toml::from_str(text)?)
    }

    /// Read, parse, and validate a manifest file.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Io` if the file cannot be read, `CoreError::Parse`
    /// if it is malformed, or `CoreError::InvalidModule` if validation fails.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)?.into_validated()
    }

    /// Validate the manifest and return it with names trimmed and URLs
    /// normalized.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidModule` listing every problem found.
    pub fn into_validated(mut self) -> Result<Self, CoreError> {
        self.name = self.name.trim().to_string();
        for job in &mut self.jobs {
            job.company = job.company.trim().to_string();
            job.service = job.service.trim().to_string();
            job.document = job.document.trim().to_string();
            job.language_name = job.language_name.trim().to_string();
            job.language_code = job.language_code.trim().to_string();
            job.company_website = trimmed_optional(job.company_website.take());
            job.service_website = trimmed_optional(job.service_website.take());
            if let Ok(url) = normalize_url(&job.url) {
                job.url = url;
            }
        }

        let problems = self.problems();
        if problems.is_empty() {
            Ok(self)
        } else {
            Err(CoreError::InvalidModule {
                module: if self.name.is_empty() {
                    "<unnamed>".to_string()
                } else {
                    self.name.clone()
                },
                problems,
            })
        }
    }

    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.name.is_empty() {
            problems.push("module name is empty".to_string());
        } else if !MODULE_NAME.is_match(&self.name) {
            problems.push(format!(
                "module name '{}' must be dotted identifiers (letters, digits, underscores)",
                self.name
            ));
        }

        if self.jobs.is_empty() {
            problems.push("module declares no jobs".to_string());
        }

        for (index, step) in self.transforms.iter().enumerate() {
            match step {
                TransformStep::Replace { pattern, .. } => {
                    if let Err(e) = Regex::new(pattern) {
                        problems.push(format!("transform {index} (replace): invalid pattern: {e}"));
                    }
                }
                TransformStep::Select { selector } if selector.trim().is_empty() => {
                    problems.push(format!("transform {index} (select): selector is empty"));
                }
                TransformStep::Select { selector } => {
                    if let Err(e) = Selector::parse(selector) {
                        problems.push(format!(
                            "transform {index} (select): invalid selector '{selector}': {e}"
                        ));
                    }
                }
                _ => {}
            }
        }

        let mut seen = HashSet::new();
        for (index, job) in self.jobs.iter().enumerate() {
            let missing: Vec<&str> = [
                ("company", job.company.as_str()),
                ("service", job.service.as_str()),
                ("document", job.document.as_str()),
                ("language_code", job.language_code.as_str()),
                ("language_name", job.language_name.as_str()),
                ("url", job.url.as_str()),
            ]
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field)
            .collect();
            if !missing.is_empty() {
                problems.push(format!(
                    "job {index} is missing part of its hierarchy: {}",
                    missing.join(", ")
                ));
                continue;
            }

            if !is_iso_639_1(&job.language_code) {
                problems.push(format!(
                    "job {index}: language code '{}' is not a two-letter lowercase ISO 639-1 code",
                    job.language_code
                ));
            }
            if let Err(reason) = normalize_url(&job.url) {
                problems.push(format!("job {index}: {reason}"));
            }
            for (field, website) in [
                ("company_website", &job.company_website),
                ("service_website", &job.service_website),
            ] {
                if let Some(website) = website {
                    if let Err(reason) = normalize_url(website) {
                        problems.push(format!("job {index}: {field}: {reason}"));
                    }
                }
            }
            if !seen.insert(job.key()) {
                problems.push(format!("job {index} duplicates {}", job.describe()));
            }
        }

        problems
    }
}

fn trimmed_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_iso_639_1(code: &str) -> bool {
    code.len() == 2 && code.bytes().all(|b| b.is_ascii_lowercase())
}

/// Normalize a document URL.
///
/// URLs without a scheme are fetched over HTTPS. Only `http` and `https` are
/// accepted.
///
/// # Errors
///
/// Returns a description of the problem when the URL cannot be used.
pub fn normalize_url(raw: &str) -> Result<String, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("url is empty".to_string());
    }
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };
    let parsed = Url::parse(&candidate).map_err(|e| format!("url '{raw}' is invalid: {e}"))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(format!("url '{raw}' has unsupported scheme '{other}'")),
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(format!("url '{raw}' has no host"));
    }
    Ok(parsed.to_string())
}
