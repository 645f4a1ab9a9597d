use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rand::SeedableRng;
use rand::rngs::StdRng;

use wk_core::{ArticleSource, LinkGraph, titles_eq};
use wk_engine::{Capabilities, EngineConfig, GameSession};
use wk_models::WordVectors;

use crate::render;

pub struct PlayOptions {
    pub graph: PathBuf,
    pub start: Option<String>,
    pub end: Option<String>,
    pub seed: Option<u64>,
    pub config: Option<PathBuf>,
    pub classifier: Option<PathBuf>,
    pub vectors: Option<PathBuf>,
}

pub fn run(opts: PlayOptions) -> Result<(), String> {
    let graph = super::load_graph(&opts.graph)?;
    let config = match &opts.config {
        Some(path) => EngineConfig::load(path)
            .map_err(|e| format!("failed to load config {}: {e}", path.display()))?,
        None => EngineConfig::default(),
    };
    let classifier = super::load_classifier(opts.classifier.as_deref())?;

    let mut capabilities = Capabilities::defaults(&config.generator).map_err(|e| e.to_string())?;
    if let Some(path) = &opts.vectors {
        let vectors = WordVectors::load(path)
            .map_err(|e| format!("failed to load vectors {}: {e}", path.display()))?;
        capabilities = capabilities.with_similarity(Box::new(vectors));
    }

    let (start, end) = endpoints(&graph, opts.start, opts.end, opts.seed)?;
    print_endpoints(&graph, &start, &end);

    let mut game = GameSession::new(
        graph,
        &start,
        &end,
        Box::new(classifier),
        capabilities,
        config,
    )
    .map_err(|e| format!("failed to start game: {e}"))?;

    println!("  Type 'h' for commands, 'q' to quit.");
    render::response(&game.intro());

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match game.process(input) {
            Ok(response) => {
                render::response(&response);
                if response.status.is_final() {
                    break;
                }
            }
            Err(e) => {
                println!("{}\n", e.to_string().red());
            }
        }
    }

    Ok(())
}

/// Fill in whichever endpoints were not given with a random pair.
fn endpoints(
    graph: &LinkGraph,
    start: Option<String>,
    end: Option<String>,
    seed: Option<u64>,
) -> Result<(String, String), String> {
    if let (Some(start), Some(end)) = (&start, &end) {
        return Ok((start.clone(), end.clone()));
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let (a, b) = graph.random_pair(&mut rng).map_err(|e| e.to_string())?;

    Ok(match (start, end) {
        (Some(start), None) => {
            let end = if titles_eq(&start, &a) { b } else { a };
            (start, end)
        }
        (None, Some(end)) => {
            let start = if titles_eq(&end, &b) { a } else { b };
            (start, end)
        }
        _ => (a, b),
    })
}

fn print_endpoints(graph: &LinkGraph, start: &str, end: &str) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", "Title", "Summary"]);

    for (label, title) in [("Start", start), ("End", end)] {
        let summary = graph
            .fetch(title)
            .map(|a| render::truncate(a.body().trim(), 60))
            .unwrap_or_default();
        table.add_row(vec![label, title, summary.as_str()]);
    }

    println!("{table}");
}
