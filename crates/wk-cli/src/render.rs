//! Terminal rendering of game responses.

use colored::{ColoredString, Colorize};
use comfy_table::{ContentArrangement, Table};

use wk_engine::{Response, Standing, View};
use wk_models::{EntitySpan, segments};

/// Print a response: notes first, then the main view.
pub fn response(response: &Response) {
    for note in &response.notes {
        println!("{}", note.blue());
    }
    view(&response.view);
    println!();
}

fn view(view: &View) {
    match view {
        View::Page {
            position,
            title,
            summary,
            standing,
            won_in,
        } => {
            println!();
            println!("{}", by_standing(&format!("({position}) {title}"), *standing).bold());
            println!("{summary}");
            if let Some(moves) = won_in {
                println!();
                println!(
                    "{}",
                    format!("You've reached the end point in {moves} moves!")
                        .green()
                        .bold()
                );
            }
        }
        View::Message(text) => println!("{text}"),
        View::List(items) => {
            for item in items {
                println!("  {item}");
            }
        }
        View::Ranked(ranked) => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Link", "Similarity"]);
            for (link, score) in ranked {
                table.add_row(vec![link.clone(), format!("{score:.3}")]);
            }
            println!("{table}");
        }
        View::Trail(entries) => {
            let items: Vec<String> = entries
                .iter()
                .enumerate()
                .map(|(i, (title, standing))| {
                    by_standing(&format!("({}) {title}", i + 1), *standing).to_string()
                })
                .collect();
            println!("{}", items.join(" > "));
        }
        View::Annotated { text, spans } => println!("{}", highlight(text, spans)),
        View::Samples {
            prompt,
            continuations,
        } => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            for continuation in continuations {
                table.add_row(vec![format!("{prompt} {}", continuation.blue())]);
            }
            println!("{table}");
        }
        View::Confirm(_) => println!("{}", view.to_string().yellow()),
        View::Rejected { .. } => println!("{}", view.to_string().red()),
    }
}

fn by_standing(text: &str, standing: Standing) -> ColoredString {
    match standing {
        Standing::OnPath => text.yellow(),
        Standing::Reached => text.green(),
        Standing::Invalid => text.red(),
    }
}

fn highlight(text: &str, spans: &[EntitySpan]) -> String {
    segments(text, spans)
        .into_iter()
        .map(|(piece, span)| match span {
            Some(span) => format!("{} {}", piece.blue().bold(), format!("({})", span.label).blue()),
            None => piece.to_string(),
        })
        .collect()
}

/// Shorten `text` to at most `max` characters, marking the cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}
