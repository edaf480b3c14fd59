//! `noces article`, `noces composition` and `noces warehouse`.

use noces_core::collections::Collection;
use noces_db::updates::stock::{
    ArticleUpdate, CompositionUpdate, NewArticle, NewComposition, NewWarehouse, WarehouseUpdate,
};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::stock::{ArticleUpdateArgs, CompositionUpdateArgs};
use crate::cli::subcommands::{ArticleCommands, CompositionCommands, WarehouseCommands};
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{
    build_query, clearable_text, parse_amount, parse_composition_item, require_changes,
};
use crate::commands::shared::responses::Deleted;
use crate::context::AppContext;
use crate::output::output;

/// Handle `noces article`.
pub async fn handle_article(
    action: &ArticleCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ArticleCommands::Create(args) => {
            let article = ctx
                .service
                .create_article(NewArticle {
                    name: args.name.clone(),
                    category: args.category.clone(),
                    unit_price_cents: parse_amount(&args.price, "price")?,
                    stock: args.stock,
                    warehouse_id: args.warehouse.clone(),
                })
                .await?;
            output(&article, flags.format)
        }
        ArticleCommands::Get(args) => {
            output(&ctx.service.get_article(&args.id).await?, flags.format)
        }
        ArticleCommands::List(list) => {
            let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
            output(&ctx.service.list_articles(&build_query(list, limit)?).await?, flags.format)
        }
        ArticleCommands::Update(args) => {
            let article = ctx
                .service
                .update_article(&args.id, article_update(args)?)
                .await?;
            output(&article, flags.format)
        }
        ArticleCommands::Delete(args) => {
            ctx.service.delete_article(&args.id).await?;
            output(&Deleted::new(Collection::Articles, &args.id), flags.format)
        }
        ArticleCommands::Stock { id, delta } => {
            output(&ctx.service.adjust_stock(id, *delta).await?, flags.format)
        }
    }
}

/// Handle `noces composition`.
pub async fn handle_composition(
    action: &CompositionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CompositionCommands::Create(args) => {
            let composition = ctx
                .service
                .create_composition(NewComposition {
                    name: args.name.clone(),
                    description: args.description.clone(),
                    items: args
                        .articles
                        .iter()
                        .map(|raw| parse_composition_item(raw))
                        .collect::<anyhow::Result<_>>()?,
                })
                .await?;
            output(&composition, flags.format)
        }
        CompositionCommands::Get(args) => {
            output(&ctx.service.get_composition(&args.id).await?, flags.format)
        }
        CompositionCommands::List(list) => {
            let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
            let compositions = ctx.service.list_compositions(&build_query(list, limit)?).await?;
            output(&compositions, flags.format)
        }
        CompositionCommands::Update(args) => {
            let composition = ctx
                .service
                .update_composition(&args.id, composition_update(args)?)
                .await?;
            output(&composition, flags.format)
        }
        CompositionCommands::Delete(args) => {
            ctx.service.delete_composition(&args.id).await?;
            output(&Deleted::new(Collection::Compositions, &args.id), flags.format)
        }
        CompositionCommands::Cost(args) => {
            output(&ctx.service.composition_cost(&args.id).await?, flags.format)
        }
    }
}

/// Handle `noces warehouse`.
pub async fn handle_warehouse(
    action: &WarehouseCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        WarehouseCommands::Create { name, address } => {
            let warehouse = ctx
                .service
                .create_warehouse(NewWarehouse {
                    name: name.clone(),
                    address: address.clone(),
                })
                .await?;
            output(&warehouse, flags.format)
        }
        WarehouseCommands::Get(args) => {
            output(&ctx.service.get_warehouse(&args.id).await?, flags.format)
        }
        WarehouseCommands::List(list) => {
            let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
            let warehouses = ctx.service.list_warehouses(&build_query(list, limit)?).await?;
            output(&warehouses, flags.format)
        }
        WarehouseCommands::Update { id, name, address } => {
            let update = WarehouseUpdate {
                name: name.clone(),
                address: clearable_text(address.as_deref()),
            };
            require_changes(&update, "--name or --address")?;
            output(&ctx.service.update_warehouse(id, update).await?, flags.format)
        }
        WarehouseCommands::Delete(args) => {
            ctx.service.delete_warehouse(&args.id).await?;
            output(&Deleted::new(Collection::Warehouses, &args.id), flags.format)
        }
        WarehouseCommands::Articles(args) => {
            output(&ctx.service.list_articles_in_warehouse(&args.id).await?, flags.format)
        }
    }
}

fn article_update(args: &ArticleUpdateArgs) -> anyhow::Result<ArticleUpdate> {
    let update = ArticleUpdate {
        name: args.name.clone(),
        category: clearable_text(args.category.as_deref()),
        unit_price_cents: args
            .price
            .as_deref()
            .map(|raw| parse_amount(raw, "price"))
            .transpose()?,
        warehouse_id: clearable_text(args.warehouse.as_deref()),
    };
    require_changes(&update, "--name, --category, --price or --warehouse")?;
    Ok(update)
}

/// `--article` replaces the whole item list when given.
fn composition_update(args: &CompositionUpdateArgs) -> anyhow::Result<CompositionUpdate> {
    let items = if args.articles.is_empty() {
        None
    } else {
        Some(
            args.articles
                .iter()
                .map(|raw| parse_composition_item(raw))
                .collect::<anyhow::Result<Vec<_>>>()?,
        )
    };
    let update = CompositionUpdate {
        name: args.name.clone(),
        description: clearable_text(args.description.as_deref()),
        items,
    };
    require_changes(&update, "--name, --description or --article")?;
    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_price_is_parsed() {
        let update = article_update(&ArticleUpdateArgs {
            id: "art-1".into(),
            name: None,
            category: None,
            price: Some("4,90".into()),
            warehouse: Some(String::new()),
        })
        .expect("update should build");
        assert_eq!(update.unit_price_cents, Some(490));
        assert_eq!(update.warehouse_id, Some(None));
    }

    #[test]
    fn composition_articles_replace_items() {
        let update = composition_update(&CompositionUpdateArgs {
            id: "cmp-1".into(),
            name: None,
            description: None,
            articles: vec!["art-1:10".into(), "art-2".into()],
        })
        .expect("update should build");
        let items = update.items.expect("items should be set");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].quantity, 10);
        assert_eq!(items[1].quantity, 1);
    }

    #[test]
    fn composition_update_requires_a_change() {
        assert!(composition_update(&CompositionUpdateArgs {
            id: "cmp-1".into(),
            name: None,
            description: None,
            articles: Vec::new(),
        })
        .is_err());
    }
}
