use snap_config::SnapConfig;

/// Config sections that can be set from `DOCSNAPS_<SECTION>__<KEY>`.
const SECTIONS: [&str; 3] = ["DATABASE", "FETCH", "GENERAL"];

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &SnapConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &SnapConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut warnings = Vec::new();

    for (key, _) in env {
        let Some(rest) = key.strip_prefix("DOCSNAPS_") else {
            continue;
        };
        if rest == "LOG" {
            continue;
        }
        let Some(section) = SECTIONS.iter().find(|section| rest.starts_with(*section)) else {
            continue;
        };
        if rest[section.len()..].starts_with("__") {
            continue;
        }
        let suggestion = format!(
            "DOCSNAPS_{section}__{}",
            rest[section.len()..].trim_start_matches('_')
        );
        warnings.push(format!(
            "{key} is ignored. Use double underscores between section and key (example: {suggestion})."
        ));
    }

    if config.database.is_memory() {
        warnings.push(
            "database.path is ':memory:'; snapshots will not outlive this process.".to_string(),
        );
    }

    warnings
}
