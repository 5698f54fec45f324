// cli/src/cli/handlers.rs

use log::info;
use rolling_degree_lib::{format_median, StreamProcessor, StreamStats};

const TOP_NODES: usize = 5;

/// Logs the end-of-stream state of the window and the graph.
pub fn log_summary(processor: &StreamProcessor, stats: &StreamStats) {
    let engine = processor.engine();
    let ledger = engine.ledger();
    let graph = engine.graph();

    info!("Stream: {}", stats);
    match (ledger.oldest(), ledger.high_water_mark()) {
        (Some(oldest), Some(newest)) => info!(
            "Window ({}s): {} events from {} to {}",
            ledger.window().num_seconds(),
            ledger.len(),
            oldest,
            newest
        ),
        _ => info!("Window ({}s): empty", ledger.window().num_seconds()),
    }
    info!("Graph: {} nodes, {} edges", graph.node_count(), graph.edge_count());
    if let Ok(median) = engine.median() {
        info!("Median degree: {}", format_median(median));
    }
    for (degree, id) in graph.ranked_degrees().iter().rev().take(TOP_NODES) {
        info!("  {} (degree {})", id, degree);
    }
}
