use component_sssp_core::{EdgeLookupMode, Engine};

/// Parse an engine name. Accepts "dense" or "heap" (case-insensitive).
pub fn parse_engine(s: &str) -> Result<Engine, String> {
    match s.to_lowercase().as_str() {
        "dense" => Ok(Engine::Dense),
        "heap" => Ok(Engine::Heap),
        other => Err(format!("invalid engine '{other}', use 'dense' or 'heap'")),
    }
}

/// Parse an edge lookup mode. Accepts "scan" or "index" (case-insensitive).
pub fn parse_edge_lookup(s: &str) -> Result<EdgeLookupMode, String> {
    match s.to_lowercase().as_str() {
        "scan" => Ok(EdgeLookupMode::Scan),
        "index" | "indexed" => Ok(EdgeLookupMode::Index),
        other => Err(format!("invalid edge lookup '{other}', use 'scan' or 'index'")),
    }
}

/// Log filter directive for a `-v` count.
pub fn verbosity_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}
