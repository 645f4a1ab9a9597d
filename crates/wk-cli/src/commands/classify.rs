use std::path::Path;

use colored::Colorize;

use wk_engine::{Argument, CommandResolver, CommandSource, EngineConfig};

pub fn run(text: &str, classifier: Option<&Path>) -> Result<(), String> {
    let classifier = super::load_classifier(classifier)?;
    let resolver = CommandResolver::new(Box::new(classifier), &EngineConfig::default())
        .map_err(|e| e.to_string())?;

    let command = resolver.resolve(text, &[]).map_err(|e| e.to_string())?;
    match command.source {
        CommandSource::Shorthand => {
            println!("Shorthand for {}.", command.intent.label().bold().blue());
        }
        CommandSource::FreeText(c) => println!(
            "Classifying command as {} with {} confidence.",
            c.intent.label().bold().blue(),
            format!("{:.2}%", c.confidence * 100.0).bold().blue()
        ),
    }

    match command.argument {
        Some(Argument::Title(title)) => println!("Detected title: {}", title.blue()),
        Some(Argument::Count(n)) => println!("Pages back: {n}"),
        Some(Argument::Position(k)) => println!("Back to page: {k}"),
        None => {}
    }

    Ok(())
}
