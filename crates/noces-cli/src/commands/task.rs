use noces_core::collections::Collection;
use noces_core::enums::{TaskPriority, TaskStatus};
use noces_db::updates::task::{NewTask, TaskUpdate, TaskUpdateBuilder};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TaskCommands;
use crate::cli::subcommands::task::{TaskCreateArgs, TaskUpdateArgs};
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{
    build_query, clearable, clearable_text, parse_date, parse_enum, require_changes,
};
use crate::commands::shared::responses::Deleted;
use crate::context::AppContext;
use crate::output::output;

/// Handle `noces task`.
pub async fn handle(
    action: &TaskCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        TaskCommands::Create(args) => {
            output(&ctx.service.create_task(new_task(args)?).await?, flags.format)
        }
        TaskCommands::Get(args) => output(&ctx.service.get_task(&args.id).await?, flags.format),
        TaskCommands::List(list) => {
            let limit = effective_limit(flags.limit, ctx.config.general.default_limit);
            output(&ctx.service.list_tasks(&build_query(list, limit)?).await?, flags.format)
        }
        TaskCommands::Update(args) => {
            let task = ctx.service.update_task(&args.id, task_update(args)?).await?;
            output(&task, flags.format)
        }
        TaskCommands::Delete(args) => {
            ctx.service.delete_task(&args.id).await?;
            output(&Deleted::new(Collection::Tasks, &args.id), flags.format)
        }
        TaskCommands::Status { id, status } => {
            let status = parse_enum::<TaskStatus>(status, "status")?;
            output(&ctx.service.transition_task(id, status).await?, flags.format)
        }
        TaskCommands::Complete(args) => {
            output(&ctx.service.complete_task(&args.id).await?, flags.format)
        }
    }
}

fn new_task(args: &TaskCreateArgs) -> anyhow::Result<NewTask> {
    Ok(NewTask {
        title: args.title.clone(),
        description: args.description.clone(),
        client_id: args.client.clone(),
        event_id: args.event.clone(),
        due_date: args.due,
        priority: args
            .priority
            .as_deref()
            .map(|raw| parse_enum::<TaskPriority>(raw, "priority"))
            .transpose()?
            .unwrap_or_default(),
    })
}

fn task_update(args: &TaskUpdateArgs) -> anyhow::Result<TaskUpdate> {
    let mut builder = TaskUpdateBuilder::new();
    if let Some(title) = args.title.as_deref() {
        builder = builder.title(title);
    }
    if let Some(description) = clearable_text(args.description.as_deref()) {
        builder = builder.description(description);
    }
    if let Some(client) = clearable_text(args.client.as_deref()) {
        builder = builder.client_id(client);
    }
    if let Some(event) = clearable_text(args.event.as_deref()) {
        builder = builder.event_id(event);
    }
    if let Some(due) = clearable(args.due.as_deref(), |raw| parse_date(raw, "due date"))? {
        builder = builder.due_date(due);
    }
    if let Some(priority) = args.priority.as_deref() {
        builder = builder.priority(parse_enum::<TaskPriority>(priority, "priority")?);
    }

    let update = builder.build();
    require_changes(
        &update,
        "--title, --description, --client, --event, --due or --priority",
    )?;
    Ok(update)
}
