use colored::{ColoredString, Colorize};
use gnotes::commands::{CmdMessage, MessageLevel};
use gnotes::config::{Config, CONFIG_KEYS};
use gnotes::model::{Note, NoteId};
use gnotes::presenter::{Cell, Field, Presenter, PriorityClass, Row, NO_NOTES};

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

fn paint(text: &str, class: PriorityClass) -> ColoredString {
    match class {
        PriorityClass::High => text.red(),
        PriorityClass::Mid => text.yellow(),
        PriorityClass::Low => text.normal(),
    }
}

fn paint_cell(cell: &Cell, row: &Row) -> ColoredString {
    let styled = match (cell.field, cell.class) {
        (Field::Id, _) => cell.text.cyan(),
        (Field::Done, _) => cell.text.green(),
        (_, Some(class)) => paint(&cell.text, class),
        _ => cell.text.normal(),
    };
    if row.done {
        styled.dimmed()
    } else {
        styled
    }
}

pub(super) fn print_notes(presenter: &Presenter, notes: &[&Note], max_id: NoteId) {
    if notes.is_empty() {
        println!("{}", NO_NOTES);
        return;
    }

    let header = presenter
        .header(max_id)
        .iter()
        .map(|c| c.text.bold().to_string())
        .collect::<Vec<_>>()
        .join(" ");
    println!("{}", header.trim_end());

    for row in presenter.rows(notes, max_id) {
        let line = row
            .cells
            .iter()
            .map(|c| paint_cell(c, &row).to_string())
            .collect::<Vec<_>>()
            .join(" ");
        println!("{}", line.trim_end());
    }
}

pub(super) fn print_full_notes(presenter: &Presenter, notes: &[&Note]) {
    for (i, note) in notes.iter().enumerate() {
        if i > 0 {
            println!("\n================================\n");
        }
        let detail = presenter.render_detail(note);
        println!(
            "{} {}",
            note.id.to_string().cyan(),
            paint(&detail.title, detail.class).bold()
        );
        for (label, value) in &detail.fields {
            println!("{:>8}: {}", label.dimmed(), value);
        }
        println!("--------------------------------");
        println!("{}", detail.content);
    }
}

pub(super) fn print_tags(tags: &[(String, usize)]) {
    for (tag, count) in tags {
        println!("{} {}", tag.bold(), format!("({})", count).dimmed());
    }
}

pub(super) fn print_config(config: &Config) {
    let width = CONFIG_KEYS.iter().map(|k| k.len()).max().unwrap_or(0);
    for key in CONFIG_KEYS {
        let value = config.get(key).unwrap_or_default();
        let key = format!("{:<width$}", key, width = width);
        println!("{}  {}", key.cyan(), value);
    }
}
