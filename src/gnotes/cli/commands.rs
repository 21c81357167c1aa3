//! # CLI Layer
//!
//! One of two front ends, the other being the full-screen session in
//! `tui`. This is the only place that:
//! - parses arguments
//! - prints to stdout/stderr
//! - decides to save after a command
//!
//! Every subcommand maps to a `gnotes::commands` function returning a
//! `CmdResult`; the result is printed and, if it reports a change, the
//! collection is uploaded.

use super::print::{print_config, print_full_notes, print_messages, print_notes, print_tags};
use super::setup::{print_help, Cli, Commands, ListArgs, NoteCommands};
use crate::tui;
use clap::Parser;
use console::Term;
use gnotes::commands::{
    add, clear, config, done, due, edit, list, priority, remove, show, tags, urls, CmdResult,
    Listing,
};
use gnotes::config::AppPaths;
use gnotes::editor::SystemEditor;
use gnotes::error::{NotesError, Result};
use gnotes::logging::{init_logging, LogTarget};
use gnotes::presenter::Presenter;
use gnotes::store::dir::{open_store, DirNoteStore};

const LINE_WIDTH: usize = 100;

struct AppContext {
    store: DirNoteStore,
    editor: SystemEditor,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }
    let paths = AppPaths::discover()?;

    let command = match cli.command {
        None => {
            init_logging(LogTarget::File(&paths.cache_dir))?;
            return tui::run(&paths);
        }
        Some(command) => command,
    };
    init_logging(LogTarget::Stderr)?;

    match command {
        Commands::Help { command } => print_help(command.as_deref()),
        Commands::Config { key, value } => handle_config(&paths, key, value),
        Commands::Notes(command) => run_note_command(&paths, command),
    }
}

fn run_note_command(paths: &AppPaths, command: NoteCommands) -> Result<()> {
    let mut ctx = init_context(paths)?;
    if !ctx.store.config().use_color {
        colored::control::set_override(false);
    }

    let result = match command {
        NoteCommands::Qa { content } => add::run(&mut ctx.store, &content.join(" "))?,
        NoteCommands::Add => add::run_with_editor(&mut ctx.store, &mut ctx.editor)?,
        NoteCommands::Edit { id } => edit::run(&mut ctx.store, &mut ctx.editor, id)?,
        NoteCommands::Done { id } => done::run(&mut ctx.store, id, true)?,
        NoteCommands::Undone { id } => done::run(&mut ctx.store, id, false)?,
        NoteCommands::Prio { id, priority } => priority::run(&mut ctx.store, id, &priority)?,
        NoteCommands::Show { id } => show::run(&ctx.store, id)?,
        NoteCommands::Remove { id } => remove::run(&mut ctx.store, id)?,
        NoteCommands::Clear { yes } => handle_clear(&mut ctx, yes)?,
        NoteCommands::List(args) => list::run(&ctx.store, &list_options(args, false))?,
        NoteCommands::Todo(args) => list::run(&ctx.store, &list_options(args, true))?,
        NoteCommands::Tag { id, tag } => tags::tag(&mut ctx.store, id, &tag)?,
        NoteCommands::Rtag { id, tag } => tags::untag(&mut ctx.store, id, &tag)?,
        NoteCommands::Ctags { id } => tags::clear(&mut ctx.store, id)?,
        NoteCommands::Tags => tags::list(&ctx.store)?,
        NoteCommands::Due { id, date } => {
            let date = date.join(" ");
            let date = Some(date.as_str()).filter(|d| !d.trim().is_empty());
            due::run(&mut ctx.store, id, date)?
        }
        NoteCommands::Urls { id } => {
            urls::run(&ctx.store, id, |url| webbrowser::open(url).map_err(NotesError::Io))?
        }
    };

    finish(&mut ctx, result)
}

fn init_context(paths: &AppPaths) -> Result<AppContext> {
    Ok(AppContext {
        store: open_store(paths)?,
        editor: SystemEditor::new(),
    })
}

fn list_options(args: ListArgs, skip_done: bool) -> list::ListOptions {
    list::ListOptions {
        order: args.order,
        search: args.search,
        min_priority: args.prio,
        tag: args.tag,
        skip_done,
        long: args.long,
    }
}

fn terminal_width() -> usize {
    Term::stdout()
        .size_checked()
        .map(|(_, cols)| cols as usize)
        .unwrap_or(LINE_WIDTH)
}

/// Prints the result and saves if the command changed anything.
fn finish(ctx: &mut AppContext, result: CmdResult) -> Result<()> {
    let mut presenter = Presenter::new(ctx.store.config(), terminal_width());
    for key in &result.sort_keys {
        presenter.columns.reveal(key.column);
    }

    let notes: Vec<_> = result.listed_notes.iter().collect();
    match result.listing {
        Listing::Full if !notes.is_empty() => print_full_notes(&presenter, &notes),
        _ if result.tags.is_empty() && result.messages.is_empty() => {
            print_notes(&presenter, &notes, ctx.store.max_id())
        }
        _ => {}
    }
    print_tags(&result.tags);
    print_messages(&result.messages);

    if result.changed {
        ctx.store.save_notes()?;
    }
    Ok(())
}

fn handle_config(paths: &AppPaths, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => config::ConfigAction::ShowAll,
        (Some(key), None) => config::ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => config::ConfigAction::Set(key, value),
    };
    let result = config::run(&paths.config_dir, action)?;
    if let Some(config) = &result.config {
        if result.messages.is_empty() {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_clear(ctx: &mut AppContext, yes: bool) -> Result<CmdResult> {
    if !yes && !ctx.store.is_empty() {
        let term = Term::stdout();
        term.write_str(&format!(
            "Remove all {} notes? This cannot be undone. [y/N] ",
            ctx.store.len()
        ))?;
        let answer = term.read_line()?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            let mut result = CmdResult::default();
            result.add_message(gnotes::commands::CmdMessage::info("Nothing removed"));
            return Ok(result);
        }
    }
    clear::run(&mut ctx.store)
}
