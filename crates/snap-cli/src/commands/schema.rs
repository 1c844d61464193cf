use schemars::schema_for;
use snap_core::manifest::ModuleManifest;
use snap_core::responses::{InstallReport, RunReport, UninstallReport};

use crate::cli::root_commands::{SchemaArgs, SchemaType};
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::output;

/// Handle `docsnaps schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = schema_json(args.type_name)?;
    // Table mode prints pretty JSON.
    let format = match flags.format {
        OutputFormat::Raw => OutputFormat::Raw,
        OutputFormat::Json | OutputFormat::Table => OutputFormat::Json,
    };
    output(&schema, format)
}

fn schema_json(type_name: SchemaType) -> anyhow::Result<serde_json::Value> {
    let schema = match type_name {
        SchemaType::Manifest => schema_for!(ModuleManifest),
        SchemaType::InstallReport => schema_for!(InstallReport),
        SchemaType::UninstallReport => schema_for!(UninstallReport),
        SchemaType::RunReport => schema_for!(RunReport),
    };
    Ok(serde_json::to_value(schema)?)
}
