use anyhow::Context;
use noces_core::responses::FileUploadResponse;
use noces_integrations::cloudinary::CloudinaryClient;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::FileCommands;
use crate::cli::subcommands::file::FileUploadArgs;
use crate::commands::doc::parse_collection;
use crate::context::AppContext;
use crate::output::output;

/// Handle `noces file`.
pub async fn handle(action: &FileCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        FileCommands::Upload(args) => upload(args, ctx, flags).await,
    }
}

/// Upload a PDF and, when a document is named, write its URL into `--field`.
async fn upload(args: &FileUploadArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let target = match (args.collection.as_deref(), args.id.as_deref()) {
        (Some(collection), Some(id)) => Some((parse_collection(collection)?, id)),
        _ => None,
    };
    let field = args.field.trim();
    if target.is_some() && field.is_empty() {
        anyhow::bail!("--field must not be empty");
    }

    let pdf = std::fs::read(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    let cloudinary = CloudinaryClient::from_config(&ctx.config.cloudinary)?;
    let uploaded = cloudinary.upload_pdf(&pdf, args.public_id.as_deref()).await?;
    tracing::debug!(public_id = %uploaded.public_id, "file uploaded");

    if let Some((collection, id)) = target {
        let mut patch = serde_json::Map::new();
        patch.insert(field.to_string(), uploaded.secure_url.clone().into());
        ctx.service
            .update_document(collection, id, patch.into())
            .await
            .with_context(|| {
                format!("uploaded to {} but failed to update {collection}/{id}", uploaded.secure_url)
            })?;
    }

    output(
        &FileUploadResponse {
            secure_url: uploaded.secure_url,
            public_id: uploaded.public_id,
            collection: target.map(|(collection, _)| collection.to_string()),
            document_id: target.map(|(_, id)| id.to_string()),
            field: target.map(|_| field.to_string()),
        },
        flags.format,
    )
}
