//! # Entity Command Handler
//!
//! This module handles the per-kind commands: listing, the create/edit form, saving and
//! deleting.  Every kind shares the same handlers, instantiated for its record type.

use crate::cli_utils::{OutputFormat, format_options, format_records, format_value};
use crate::commands::console::Console;
use crate::commands::errors::{UserError, to_user_error};
use crate::commands::navigation::{ScreenSlot, ensure_open, on_kind_async, open_screen};
use crate::commands::shared::{
    dispatch_command, parse_assignments, parse_record_id, validate_args_count,
};
use crate::edit_state::EditState;
use crate::screen::SubmitOutcome;
use crate::store::EntityLists;
use crate::{EntityKind, Form};

/// Handles `<kind> <subcommand> [args...]`.
pub async fn handle_entity_command(
    kind: EntityKind,
    args: &[String],
    console: &mut Console,
) -> Result<(), UserError> {
    on_kind_async!(kind, handle_kind(args, console))
}

async fn handle_kind<R: ScreenSlot>(args: &[String], console: &mut Console) -> Result<(), UserError> {
    let usage = format!(
        "Usage: {} <list|refresh|new|edit|set|show|save|cancel|delete|options> [args...]",
        R::KIND.command()
    );
    if args.is_empty() {
        return handle_list::<R>(&["list".to_string()], console).await;
    }
    dispatch_command!(R::KIND.command(), usage.as_str(), args, console, {
        "list" => handle_list::<R>,
        "refresh" => handle_refresh::<R>,
        "new" => handle_new::<R>,
        "edit" => handle_edit::<R>,
        "set" => handle_set::<R>,
        "show" => handle_show::<R>,
        "save" => handle_save::<R>,
        "cancel" => handle_cancel::<R>,
        "delete" => handle_delete::<R>,
        "options" => handle_options::<R>,
    })
}

/// Handles record listing.
async fn handle_list<R: ScreenSlot>(args: &[String], console: &mut Console) -> Result<(), UserError> {
    validate_args_count(args, 1, 1, "list", &format!("Usage: {} list", R::KIND.command()))?;
    ensure_open::<R>(console).await;
    print_list::<R>(console)
}

/// Handles re-fetching the list.
async fn handle_refresh<R: ScreenSlot>(
    args: &[String],
    console: &mut Console,
) -> Result<(), UserError> {
    validate_args_count(args, 1, 1, "refresh", &format!("Usage: {} refresh", R::KIND.command()))?;
    let (api, screen) = open_screen::<R>(console).await?;
    screen.refresh(api).await;
    print_list::<R>(console)
}

fn print_list<R: ScreenSlot>(console: &mut Console) -> Result<(), UserError> {
    let output = console.output;
    let Some(screen) = console.screens.screen::<R>() else {
        return Ok(());
    };
    if let Some(error) = screen.list().error() {
        return Err(UserError::new(error));
    }
    let text = if screen.list().items().is_empty() && output == OutputFormat::Table {
        format!("No {} found", R::KIND.plural())
    } else {
        format_records(screen.list().items(), output).map_err(UserError::new)?
    };
    console.say(text);
    Ok(())
}

/// Handles starting a new record.
async fn handle_new<R: ScreenSlot>(args: &[String], console: &mut Console) -> Result<(), UserError> {
    let (_, screen) = open_screen::<R>(console).await?;
    screen.start_create();
    for (field, value) in parse_assignments(&args[1..])? {
        screen.set_field(&field, &value).map_err(to_user_error)?;
    }
    print_draft::<R>(console)
}

/// Handles starting an edit of a listed record.
async fn handle_edit<R: ScreenSlot>(args: &[String], console: &mut Console) -> Result<(), UserError> {
    let usage = format!("Usage: {} edit <id> [field=value...]", R::KIND.command());
    validate_args_count(args, 2, usize::MAX, "edit", &usage)?;
    let id = parse_record_id(&args[1])?;
    let (_, screen) = open_screen::<R>(console).await?;
    screen.start_edit(id).map_err(to_user_error)?;
    for (field, value) in parse_assignments(&args[2..])? {
        screen.set_field(&field, &value).map_err(to_user_error)?;
    }
    print_draft::<R>(console)
}

/// Handles changing fields of the open form.
async fn handle_set<R: ScreenSlot>(args: &[String], console: &mut Console) -> Result<(), UserError> {
    let usage = format!("Usage: {} set field=value...", R::KIND.command());
    validate_args_count(args, 2, usize::MAX, "set", &usage)?;
    let (_, screen) = open_screen::<R>(console).await?;
    if screen.edit_state().is_empty() {
        return Err(UserError::with_usage(
            format!("No {} form is open", R::KIND.noun()),
            format!("Start one with '{} new' or '{} edit <id>'", R::KIND.command(), R::KIND.command()),
        ));
    }
    for (field, value) in parse_assignments(&args[1..])? {
        screen.set_field(&field, &value).map_err(to_user_error)?;
    }
    print_draft::<R>(console)
}

/// Handles showing the open form.
async fn handle_show<R: ScreenSlot>(args: &[String], console: &mut Console) -> Result<(), UserError> {
    validate_args_count(args, 1, 1, "show", &format!("Usage: {} show", R::KIND.command()))?;
    ensure_open::<R>(console).await;
    print_draft::<R>(console)
}

fn print_draft<R: ScreenSlot>(console: &mut Console) -> Result<(), UserError> {
    let output = console.output;
    let Some(screen) = console.screens.screen::<R>() else {
        return Ok(());
    };
    let (heading, draft) = match screen.edit_state() {
        EditState::Empty => {
            console.say(format!("No {} form is open", R::KIND.noun()));
            return Ok(());
        }
        EditState::Creating(draft) => (format!("New {}", R::KIND.noun()), draft),
        EditState::Editing { id, draft } => (format!("Editing {} {}", R::KIND.noun(), id), draft),
    };
    let body = match output {
        OutputFormat::Table => {
            let references = console.screens.references();
            <R::Draft as Form>::FIELDS
                .iter()
                .map(|field| {
                    let value = draft.field(field).unwrap_or_default();
                    match reference_label(references, field, &value) {
                        Some(label) => format!("  {}: {} ({})", field, value, label),
                        None => format!("  {}: {}", field, value),
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
        _ => format_value(draft, output).map_err(UserError::new)?,
    };
    console.say(format!("{}\n{}", heading, body));
    Ok(())
}

/// The kind a foreign-key field of a form refers to.
fn reference_kind(field: &str) -> Option<EntityKind> {
    if field == "policyTypeId" {
        return Some(EntityKind::LoanType);
    }
    EntityKind::ALL
        .into_iter()
        .find(|kind| kind.id_field() == field)
}

fn reference_label(references: &EntityLists, field: &str, value: &str) -> Option<String> {
    let kind = reference_kind(field)?;
    let id = value.parse().ok()?;
    references.label(kind, id)
}

/// Handles submitting the open form.
async fn handle_save<R: ScreenSlot>(args: &[String], console: &mut Console) -> Result<(), UserError> {
    validate_args_count(args, 1, 1, "save", &format!("Usage: {} save", R::KIND.command()))?;
    let (api, screen) = open_screen::<R>(console).await?;
    let outcome = screen.submit(api).await;
    if matches!(outcome, SubmitOutcome::NoDraft) {
        return Err(UserError::with_usage(
            format!("No {} form is open", R::KIND.noun()),
            format!("Start one with '{} new' or '{} edit <id>'", R::KIND.command(), R::KIND.command()),
        ));
    }
    console.say_banner();
    Ok(())
}

/// Handles discarding the open form.
async fn handle_cancel<R: ScreenSlot>(
    args: &[String],
    console: &mut Console,
) -> Result<(), UserError> {
    validate_args_count(args, 1, 1, "cancel", &format!("Usage: {} cancel", R::KIND.command()))?;
    let (_, screen) = open_screen::<R>(console).await?;
    screen.cancel();
    console.say(format!("{} form discarded", capitalize(R::KIND.noun())));
    Ok(())
}

/// Handles record deletion, which waits for a confirmation.
async fn handle_delete<R: ScreenSlot>(
    args: &[String],
    console: &mut Console,
) -> Result<(), UserError> {
    validate_args_count(args, 2, 2, "delete", &format!("Usage: {} delete <id>", R::KIND.command()))?;
    let id = parse_record_id(&args[1])?;
    let (_, screen) = open_screen::<R>(console).await?;
    let question = screen.request_delete(id).message();
    console.say(format!("{} [y/N]", question));
    Ok(())
}

/// Handles listing the choices of the form's reference fields.
async fn handle_options<R: ScreenSlot>(
    args: &[String],
    console: &mut Console,
) -> Result<(), UserError> {
    validate_args_count(args, 1, 1, "options", &format!("Usage: {} options", R::KIND.command()))?;
    ensure_open::<R>(console).await;
    let kinds = EntityLists::references(R::KIND);
    if kinds.is_empty() {
        console.say(format!("{} forms have no reference fields", capitalize(R::KIND.noun())));
        return Ok(());
    }
    let references = console.screens.references();
    let sections: Vec<String> = kinds
        .iter()
        .map(|kind| match references.error(*kind) {
            Some(error) => format!("{}:\n  {}", kind.plural(), error),
            None => format!("{}:\n{}", kind.plural(), format_options(&references.options(*kind))),
        })
        .collect();
    let text = sections.join("\n");
    console.say(text);
    Ok(())
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
