use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output_rows;

#[derive(Debug, Serialize)]
struct ModuleRow {
    module: String,
    documents: usize,
    transforms: usize,
}

/// Handle `docsnaps modules`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut rows = Vec::new();
    for module in ctx.service.list_modules().await? {
        let documents = ctx.service.list_documents(Some(&module)).await?.len();
        let transforms = ctx.service.list_transforms(&module).await?.len();
        rows.push(ModuleRow {
            module,
            documents,
            transforms,
        });
    }

    output_rows(
        &rows,
        &["module", "documents", "transforms"],
        |row| {
            vec![
                row.module.clone(),
                row.documents.to_string(),
                row.transforms.to_string(),
            ]
        },
        flags.format,
    )
}
