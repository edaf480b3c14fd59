use noces_core::collections::Collection;
use noces_core::enums::EventStatus;
use noces_db::updates::event::{EventUpdate, NewEvent};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::EventCommands;
use crate::cli::subcommands::event::EventUpdateArgs;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{
    build_query, clearable, clearable_text, parse_date, parse_enum, require_changes,
};
use crate::commands::shared::responses::Deleted;
use crate::context::AppContext;
use crate::output::output;

/// Handle `noces event`.
pub async fn handle(
    action: &EventCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        EventCommands::Create(args) => {
            let event = ctx
                .service
                .create_event(NewEvent {
                    client_id: args.client.clone(),
                    title: args.title.clone(),
                    date: args.date,
                    venue: args.venue.clone(),
                    guest_count: args.guests,
                    notes: args.notes.clone(),
                })
                .await?;
            output(&event, flags.format)
        }
        EventCommands::Get(args) => output(&ctx.service.get_event(&args.id).await?, flags.format),
        EventCommands::List(list) => {
            let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
            output(&ctx.service.list_events(&build_query(list, limit)?).await?, flags.format)
        }
        EventCommands::Update(args) => {
            let event = ctx.service.update_event(&args.id, event_update(args)?).await?;
            output(&event, flags.format)
        }
        EventCommands::Delete(args) => {
            ctx.service.delete_event(&args.id).await?;
            output(&Deleted::new(Collection::Events, &args.id), flags.format)
        }
        EventCommands::Status { id, status } => {
            let status = parse_enum::<EventStatus>(status, "status")?;
            output(&ctx.service.transition_event(id, status).await?, flags.format)
        }
    }
}

fn event_update(args: &EventUpdateArgs) -> anyhow::Result<EventUpdate> {
    let update = EventUpdate {
        title: args.title.clone(),
        date: clearable(args.date.as_deref(), |raw| parse_date(raw, "date"))?,
        venue: clearable_text(args.venue.as_deref()),
        guest_count: clearable(args.guests.as_deref(), |raw| {
            raw.parse::<u32>()
                .map_err(|error| anyhow::anyhow!("invalid guests '{raw}': {error}"))
        })?,
        notes: clearable_text(args.notes.as_deref()),
    };
    require_changes(&update, "--title, --date, --venue, --guests or --notes")?;
    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> EventUpdateArgs {
        EventUpdateArgs {
            id: "evt-1".into(),
            title: None,
            date: None,
            venue: None,
            guests: None,
            notes: None,
        }
    }

    #[test]
    fn guests_can_be_cleared_or_set() {
        let cleared = event_update(&EventUpdateArgs {
            guests: Some(String::new()),
            ..args()
        })
        .expect("update should build");
        assert_eq!(cleared.guest_count, Some(None));

        let set = event_update(&EventUpdateArgs {
            guests: Some("120".into()),
            ..args()
        })
        .expect("update should build");
        assert_eq!(set.guest_count, Some(Some(120)));
    }

    #[test]
    fn rejects_bad_date_and_noop() {
        assert!(event_update(&EventUpdateArgs {
            date: Some("12/06/2027".into()),
            ..args()
        })
        .is_err());
        assert!(event_update(&args()).is_err());
    }
}
