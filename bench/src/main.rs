use std::path::Path;
use std::time::Instant;

use component_sssp_core::{
    build_weight_matrix, load_vertex_index, reconstruct_path, write_int, AttrType, Attribute,
    Component, ComponentWriter, EdgeIndex, EdgeScan, Engine, Error, Manifest, Result, Schema,
    VertexId, WeightAttribute,
};

/// Writes one synthetic component; vertex ids are 0..n in file order.
type Generator = fn(&mut Sink, u64) -> Result<()>;

/// Above this many vertices the per-pair edge-file scan is skipped; it is O(n²·e).
const SCAN_LIMIT: u64 = 300;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mode = args.get(1).map(|s| s.as_str()).unwrap_or("all");
    let node_count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1_000);

    if mode == "help" || mode == "--help" {
        println!("Usage: component-sssp-bench [mode] [node_count]");
        println!();
        println!("Modes:");
        println!("  all      Run all generators and benchmark each (default)");
        println!("  chain    Single directed chain (longest possible path)");
        println!("  random   Erdos-Renyi uniform random weighted edges");
        println!("  grid     Square lattice with right/down edges");
        println!("  star     Hub with spokes out and back");
        println!();
        println!("Default node_count: 1000");
        return;
    }

    println!("component-sssp-bench");
    println!("====================");
    println!();

    let generators: Vec<(&str, Generator)> = match mode {
        "chain" => vec![("Chain", gen_chain)],
        "random" => vec![("Erdos-Renyi random", gen_random)],
        "grid" => vec![("Grid lattice", gen_grid)],
        "star" => vec![("Star", gen_star)],
        "all" => vec![
            ("Chain", gen_chain as Generator),
            ("Erdos-Renyi random", gen_random),
            ("Grid lattice", gen_grid),
            ("Star", gen_star),
        ],
        _ => {
            eprintln!("Unknown mode: {}. Use --help for options.", mode);
            return;
        }
    };

    let tmp = match tempfile::tempdir() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("cannot create scratch directory: {}", e);
            return;
        }
    };

    for (i, (name, generator)) in generators.into_iter().enumerate() {
        let dir = tmp.path().join(format!("component-{}", i));
        if let Err(e) = run_benchmark(&dir, name, generator, node_count) {
            eprintln!("{} failed: {}", name, e);
        }
    }
}

fn manifest() -> Manifest {
    Manifest {
        vertex_schema: Some(Schema::new(vec![Attribute::new("name", AttrType::Varchar)])),
        edge_schema: Schema::new(vec![
            Attribute::new("kind", AttrType::Enum),
            Attribute::new("weight", AttrType::Int),
        ]),
    }
}

/// Name of the edge attribute the generators write weights into.
const WEIGHT_ATTRIBUTE: &str = "weight";

/// Component writer that lays out edge tuples from the manifest's edge schema.
struct Sink {
    writer: ComponentWriter,
    edge_schema: Schema,
    weight_offset: usize,
}

impl Sink {
    fn create(dir: &Path, manifest: Manifest) -> Result<Self> {
        let edge_schema = manifest.edge_schema.clone();
        let weight_offset = edge_schema
            .offset(WEIGHT_ATTRIBUTE)
            .ok_or_else(|| Error::UnknownAttribute(WEIGHT_ATTRIBUTE.to_string()))?;
        Ok(Self {
            writer: ComponentWriter::create(dir, manifest)?,
            edge_schema,
            weight_offset,
        })
    }

    fn vertices(&mut self, n: u64) -> Result<()> {
        for id in 0..n {
            self.writer.add_vertex(id)?;
        }
        Ok(())
    }

    fn edge(&mut self, from: VertexId, to: VertexId, weight: i32) -> Result<()> {
        let mut tuple = self.edge_schema.new_tuple();
        write_int(&mut tuple, self.weight_offset, weight)?;
        self.writer.add_edge(from, to, &tuple)
    }

    fn finish(self) -> Result<Component> {
        self.writer.finish()
    }
}

fn run_benchmark(
    dir: &Path,
    name: &str,
    generator: Generator,
    node_count: u64,
) -> Result<()> {
    println!("--- {} ---", name);
    println!("Target: {} vertices", node_count);

    let t = Instant::now();
    let mut sink = Sink::create(dir, manifest())?;
    generator(&mut sink, node_count)?;
    let component = sink.finish()?;
    println!("Generated in {:.2}s", t.elapsed().as_secs_f64());

    let t = Instant::now();
    let index = load_vertex_index(&component)?;
    println!(
        "Enumerated {} vertices in {:.1}ms",
        index.len(),
        t.elapsed().as_secs_f64() * 1000.0
    );
    if index.is_empty() {
        println!();
        return Ok(());
    }

    let field = component
        .edge_schema()
        .weight_field(&WeightAttribute::FirstInteger)?;
    let tuple_size = component.edge_schema().size();

    let t = Instant::now();
    let mut edges = EdgeIndex::from_reader(&mut component.open_edges()?, tuple_size)?;
    let matrix = build_weight_matrix(&index, &mut edges, &field)?;
    println!(
        "Matrix (indexed lookup): {} edges in {:.1}ms",
        matrix.edge_count(),
        t.elapsed().as_secs_f64() * 1000.0
    );

    if (index.len() as u64) <= SCAN_LIMIT {
        let t = Instant::now();
        let mut scan = EdgeScan::new(component.open_edges()?, tuple_size);
        build_weight_matrix(&index, &mut scan, &field)?;
        println!(
            "Matrix (file scan):      {:.1}ms",
            t.elapsed().as_secs_f64() * 1000.0
        );
    }

    println!();
    println!("{:>8} {:>10} {:>10} {:>10}", "engine", "target", "hops", "time");
    println!("{:->8} {:->10} {:->10} {:->10}", "", "", "", "");

    let far = index.len() - 1;
    for engine in [Engine::Dense, Engine::Heap] {
        let t = Instant::now();
        let tree = engine.run(&matrix, 0)?;
        let path = reconstruct_path(&tree, &index, far);
        let elapsed = t.elapsed();
        let hops = match &path {
            Ok(p) => (p.length - 1).to_string(),
            Err(_) => "none".to_string(),
        };
        println!(
            "{:>8} {:>10} {:>10} {:>8.1}ms",
            format!("{:?}", engine).to_lowercase(),
            index.id_at(far).unwrap_or_default(),
            hops,
            elapsed.as_secs_f64() * 1000.0
        );
    }
    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// Generators: deterministic, vertex ids 0..n in file order
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
}

/// 0→1→…→n-1, unit weights. Reconstruction walks every vertex.
fn gen_chain(sink: &mut Sink, n: u64) -> Result<()> {
    sink.vertices(n)?;
    for i in 1..n {
        sink.edge(i - 1, i, 1)?;
    }
    Ok(())
}

/// Each vertex gets ~4 outgoing edges to random targets, weights 0..100.
fn gen_random(sink: &mut Sink, n: u64) -> Result<()> {
    let mut rng = FastRng::new(12345);
    sink.vertices(n)?;
    for from in 0..n {
        for _ in 0..4 {
            let to = rng.next(n);
            let weight = rng.next(100) as i32;
            sink.edge(from, to, weight)?;
        }
    }
    Ok(())
}

/// sqrt(n) × sqrt(n) lattice, edges right and down with random weights.
fn gen_grid(sink: &mut Sink, n: u64) -> Result<()> {
    let side = ((n as f64).sqrt() as u64).max(1);
    let mut rng = FastRng::new(67890);
    sink.vertices(side * side)?;
    for r in 0..side {
        for c in 0..side {
            let id = r * side + c;
            if c + 1 < side {
                sink.edge(id, id + 1, 1 + rng.next(9) as i32)?;
            }
            if r + 1 < side {
                sink.edge(id, id + side, 1 + rng.next(9) as i32)?;
            }
        }
    }
    Ok(())
}

/// Hub 0 with an edge to and from every other vertex.
fn gen_star(sink: &mut Sink, n: u64) -> Result<()> {
    let mut rng = FastRng::new(42);
    sink.vertices(n)?;
    for leaf in 1..n {
        sink.edge(0, leaf, 1 + rng.next(50) as i32)?;
        sink.edge(leaf, 0, 1 + rng.next(50) as i32)?;
    }
    Ok(())
}
