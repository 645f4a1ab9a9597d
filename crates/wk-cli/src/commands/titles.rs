use std::path::Path;

pub fn run(graph: &Path) -> Result<(), String> {
    let graph = super::load_graph(graph)?;

    let mut titles: Vec<&str> = graph.titles().collect();
    titles.sort_unstable_by_key(|t| t.to_lowercase());
    for title in &titles {
        println!("{title}");
    }
    println!();
    println!("  {} articles", titles.len());

    Ok(())
}
