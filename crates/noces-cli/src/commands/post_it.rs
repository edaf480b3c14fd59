use noces_core::collections::Collection;
use noces_core::enums::PostItColor;
use noces_db::updates::post_it::{NewPostIt, PostItUpdate};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::PostItCommands;
use crate::cli::subcommands::post_it::PostItUpdateArgs;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{build_query, clearable_text, parse_enum, require_changes};
use crate::commands::shared::responses::Deleted;
use crate::context::AppContext;
use crate::output::output;

/// Handle `noces postit`.
pub async fn handle(
    action: &PostItCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        PostItCommands::Create(args) => {
            let color = args
                .color
                .as_deref()
                .map(|raw| parse_enum::<PostItColor>(raw, "color"))
                .transpose()?
                .unwrap_or_default();
            let post_it = ctx
                .service
                .create_post_it(NewPostIt {
                    content: args.content.clone(),
                    color,
                    client_id: args.client.clone(),
                    pinned: args.pinned,
                })
                .await?;
            output(&post_it, flags.format)
        }
        PostItCommands::Get(args) => {
            output(&ctx.service.get_post_it(&args.id).await?, flags.format)
        }
        PostItCommands::List(list) => {
            let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
            output(&ctx.service.list_post_its(&build_query(list, limit)?).await?, flags.format)
        }
        PostItCommands::Update(args) => {
            let post_it = ctx
                .service
                .update_post_it(&args.id, post_it_update(args)?)
                .await?;
            output(&post_it, flags.format)
        }
        PostItCommands::Delete(args) => {
            ctx.service.delete_post_it(&args.id).await?;
            output(&Deleted::new(Collection::PostIts, &args.id), flags.format)
        }
    }
}

fn post_it_update(args: &PostItUpdateArgs) -> anyhow::Result<PostItUpdate> {
    let update = PostItUpdate {
        content: args.content.clone(),
        color: args
            .color
            .as_deref()
            .map(|raw| parse_enum::<PostItColor>(raw, "color"))
            .transpose()?,
        client_id: clearable_text(args.client.as_deref()),
        pinned: args.pinned,
    };
    require_changes(&update, "--content, --color, --client or --pinned")?;
    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_parses_color_and_unpins() {
        let update = post_it_update(&PostItUpdateArgs {
            id: "pst-1".into(),
            content: None,
            color: Some("pink".into()),
            client: None,
            pinned: Some(false),
        })
        .expect("update should build");
        assert_eq!(update.color, Some(PostItColor::Pink));
        assert_eq!(update.pinned, Some(false));
    }

    #[test]
    fn rejects_unknown_color() {
        let err = post_it_update(&PostItUpdateArgs {
            id: "pst-1".into(),
            content: None,
            color: Some("orange".into()),
            client: None,
            pinned: None,
        })
        .expect_err("should fail");
        assert!(err.to_string().contains("invalid color 'orange'"));
    }
}
