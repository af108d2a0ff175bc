use tracing::debug;

use crate::enumerate::VertexIndex;
use crate::error::{Error, Result};
use crate::schema::{read_int, WeightField};
use crate::storage::EdgeLookup;

/// Cell value for "no edge". Zero is a legal weight, so absence needs its own marker.
pub const NO_EDGE: u64 = u64::MAX;

/// Dense n×n edge-cost matrix keyed by enumeration position.
#[derive(Debug, Clone)]
pub struct WeightMatrix {
    size: usize,
    cells: Vec<u64>,
}

impl WeightMatrix {
    /// An n×n matrix with every cell set to [`NO_EDGE`].
    ///
    /// Fails with `MatrixTooLarge` instead of aborting when n² cells cannot
    /// be sized or allocated.
    pub fn new(size: usize) -> Result<Self> {
        let too_large = || Error::MatrixTooLarge { vertices: size };
        let len = size.checked_mul(size).ok_or_else(too_large)?;
        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| too_large())?;
        cells.resize(len, NO_EDGE);
        Ok(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Raw cell, [`NO_EDGE`] when absent. Panics when out of range.
    pub fn raw(&self, from: usize, to: usize) -> u64 {
        self.cells[from * self.size + to]
    }

    /// Edge weight from `from` to `to`, or None when no edge exists.
    pub fn get(&self, from: usize, to: usize) -> Option<u64> {
        if from >= self.size || to >= self.size {
            return None;
        }
        match self.raw(from, to) {
            NO_EDGE => None,
            w => Some(w),
        }
    }

    pub fn set(&mut self, from: usize, to: usize, weight: u64) {
        self.cells[from * self.size + to] = weight;
    }

    /// Finite entries of row `from` as (to, weight).
    pub fn row(&self, from: usize) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.cells[from * self.size..(from + 1) * self.size]
            .iter()
            .enumerate()
            .filter(|(_, &w)| w != NO_EDGE)
            .map(|(to, &w)| (to, w))
    }

    /// Number of cells holding an edge.
    pub fn edge_count(&self) -> usize {
        self.cells.iter().filter(|&&w| w != NO_EDGE).count()
    }
}

/// Fill a weight matrix by querying every ordered vertex pair, self-pairs included.
pub fn build_weight_matrix<L: EdgeLookup>(
    index: &VertexIndex,
    edges: &mut L,
    weight: &WeightField,
) -> Result<WeightMatrix> {
    let n = index.len();
    let mut matrix = WeightMatrix::new(n)?;

    for (i, &start) in index.ids().iter().enumerate() {
        for (j, &end) in index.ids().iter().enumerate() {
            let Some(edge) = edges.find_edge(start, end)? else {
                continue;
            };
            let raw = read_int(&edge.tuple, weight.offset)?;
            let w = u64::try_from(raw).map_err(|_| Error::NegativeWeight {
                start,
                end,
                weight: raw,
            })?;
            matrix.set(i, j, w);
        }
    }

    debug!(
        vertices = n,
        edges = matrix.edge_count(),
        attribute = %weight.name,
        "built weight matrix"
    );
    Ok(matrix)
}
