use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use crate::dijkstra::Engine;
use crate::enumerate::VertexIndex;
use crate::error::{Endpoint, Error, Result};
use crate::matrix::{build_weight_matrix, WeightMatrix};
use crate::path::{reconstruct_path, PathResult};
use crate::schema::WeightAttribute;
use crate::storage::{Component, EdgeIndex, EdgeScan, VertexId};

/// How edges are looked up while the weight matrix is filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeLookupMode {
    /// Rescan the edge file for every vertex pair.
    Scan,
    /// Read the edge file once into a hash map.
    #[default]
    Index,
}

/// Tunables for a shortest-path query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SsspOptions {
    pub weight_attribute: WeightAttribute,
    pub engine: Engine,
    pub edge_lookup: EdgeLookupMode,
    /// Refuse components with more vertices than this.
    pub max_vertices: Option<usize>,
}

/// Enumerate the component's vertices.
pub fn load_vertex_index(component: &Component) -> Result<VertexIndex> {
    let mut reader = component.open_vertices()?;
    VertexIndex::load(&mut reader, component.vertex_payload_size())
}

/// Build the weight matrix for an already enumerated component.
pub fn load_weight_matrix(
    component: &Component,
    index: &VertexIndex,
    options: &SsspOptions,
) -> Result<WeightMatrix> {
    if let Some(limit) = options.max_vertices {
        if index.len() > limit {
            return Err(Error::TooManyVertices {
                vertices: index.len(),
                limit,
            });
        }
    }

    let schema = component.edge_schema();
    let field = schema.weight_field(&options.weight_attribute)?;
    let tuple_size = schema.size();

    match options.edge_lookup {
        EdgeLookupMode::Scan => {
            let mut scan = EdgeScan::new(component.open_edges()?, tuple_size);
            build_weight_matrix(index, &mut scan, &field)
        }
        EdgeLookupMode::Index => {
            let mut edges = EdgeIndex::from_reader(&mut component.open_edges()?, tuple_size)?;
            build_weight_matrix(index, &mut edges, &field)
        }
    }
}

/// Shortest path from `source` to `target` with default options.
pub fn compute_shortest_path(
    component: &Component,
    source: VertexId,
    target: VertexId,
) -> Result<PathResult> {
    component_sssp(component, source, target, &SsspOptions::default())
}

/// Shortest path from `source` to `target` within one component.
///
/// Both endpoints are checked against the vertex file before the edge file
/// is opened. The vertex index, matrix and engine state are dropped before
/// returning; only the path is handed back.
pub fn component_sssp(
    component: &Component,
    source: VertexId,
    target: VertexId,
    options: &SsspOptions,
) -> Result<PathResult> {
    let _span = debug_span!("component_sssp", source, target).entered();

    let index = load_vertex_index(component)?;
    let source_index = index.position(source).ok_or(Error::VertexNotFound {
        endpoint: Endpoint::Source,
        id: source,
    })?;
    let target_index = index.position(target).ok_or(Error::VertexNotFound {
        endpoint: Endpoint::Target,
        id: target,
    })?;

    let matrix = load_weight_matrix(component, &index, options)?;

    debug!(engine = ?options.engine, "running shortest path engine");
    let tree = options.engine.run(&matrix, source_index)?;
    let result = reconstruct_path(&tree, &index, target_index)?;

    debug!(
        length = result.length,
        weight = result.weight,
        "shortest path found"
    );
    Ok(result)
}
