//! Generic document access, bypassing the typed repositories.

use noces_core::collections::Collection;
use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::DocCommands;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{build_query, read_json_data};
use crate::commands::shared::responses::Deleted;
use crate::context::AppContext;
use crate::output::output;

/// Handle `noces doc`.
pub async fn handle(action: &DocCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        DocCommands::List { collection, list } => {
            let collection = parse_collection(collection)?;
            let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
            let docs = ctx
                .service
                .get_documents(collection, &build_query(list, limit)?)
                .await?;
            let docs: Vec<Value> = docs.iter().map(|doc| doc.to_json()).collect();
            output(&docs, flags.format)
        }
        DocCommands::Get { collection, id } => {
            let collection = parse_collection(collection)?;
            let doc = ctx
                .service
                .get_document(collection, id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("document {collection}/{id} not found"))?;
            output(&doc.to_json(), flags.format)
        }
        DocCommands::Add { collection, data } => {
            let collection = parse_collection(collection)?;
            let doc = ctx
                .service
                .add_document(collection, read_json_data(data)?)
                .await?;
            output(&doc.to_json(), flags.format)
        }
        DocCommands::Set {
            collection,
            id,
            data,
            merge,
        } => {
            let collection = parse_collection(collection)?;
            let doc = ctx
                .service
                .set_document(collection, id, read_json_data(data)?, *merge)
                .await?;
            output(&doc.to_json(), flags.format)
        }
        DocCommands::Update {
            collection,
            id,
            data,
        } => {
            let collection = parse_collection(collection)?;
            let doc = ctx
                .service
                .update_document(collection, id, read_json_data(data)?)
                .await?;
            output(&doc.to_json(), flags.format)
        }
        DocCommands::Delete { collection, id } => {
            let collection = parse_collection(collection)?;
            ctx.service.delete_document(collection, id).await?;
            output(&Deleted::new(collection, id), flags.format)
        }
    }
}

pub(crate) fn parse_collection(raw: &str) -> anyhow::Result<Collection> {
    Ok(raw.parse::<Collection>()?)
}

#[cfg(test)]
mod tests {
    use super::parse_collection;
    use noces_core::collections::Collection;

    #[test]
    fn collection_aliases_parse() {
        assert_eq!(parse_collection("postit").expect("alias"), Collection::PostIts);
        assert_eq!(parse_collection("Invoices").expect("case"), Collection::Invoices);
        assert!(parse_collection("weddings").is_err());
    }
}
