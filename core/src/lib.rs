//! component-sssp-core: shortest paths over fixed-record component files.
//!
//! Reads a component's vertex and edge files, lays the edges out as a dense
//! weight matrix keyed by enumeration position, runs Dijkstra from the source
//! and walks the predecessor chain back from the target.
//!
//! The pipeline is single-threaded and read-only. Every stage fully consumes
//! the previous one:
//!
//! ```text
//! vertices.dat ─► VertexIndex ─► WeightMatrix ─► ShortestPathTree ─► PathResult
//!                     edges.dat ─┘
//! ```

mod dijkstra;
mod enumerate;
mod error;
mod matrix;
mod path;
mod schema;
mod sssp;
mod storage;

pub use dijkstra::{dijkstra, dijkstra_heap, Engine, ShortestPathTree, INFINITE};
pub use enumerate::{count_vertices, enumerate_vertices, VertexIndex};
pub use error::{Endpoint, Error, Result};
pub use matrix::{build_weight_matrix, WeightMatrix, NO_EDGE};
pub use path::{reconstruct_path, PathResult};
pub use schema::{
    read_int, write_int, AttrType, Attribute, Schema, WeightAttribute, WeightField, VARCHAR_WIDTH,
};
pub use sssp::{
    component_sssp, compute_shortest_path, load_vertex_index, load_weight_matrix,
    EdgeLookupMode, SsspOptions,
};
pub use storage::{
    component_dir, Component, ComponentWriter, EdgeIndex, EdgeLookup, EdgeRecord, EdgeScan,
    Manifest, VertexId, EDGE_FILE, ID_WIDTH, MANIFEST_FILE, VERTEX_FILE,
};
