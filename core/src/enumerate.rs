use std::collections::HashMap;
use std::io::Read;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::storage::{decode_id, read_record, VertexId, ID_WIDTH};

/// Walk fixed-size vertex records, calling `f` with each identifier.
/// A short or empty read is end of data.
fn scan_vertices<R: Read>(
    reader: &mut R,
    payload_size: usize,
    mut f: impl FnMut(VertexId),
) -> Result<()> {
    let mut buf = vec![0u8; ID_WIDTH + payload_size];
    loop {
        let n = read_record(reader, &mut buf)?;
        if n < buf.len() {
            return Ok(());
        }
        f(decode_id(&buf));
    }
}

/// Number of whole vertex records in the stream.
pub fn count_vertices<R: Read>(reader: &mut R, payload_size: usize) -> Result<usize> {
    let mut count = 0;
    scan_vertices(reader, payload_size, |_| count += 1)?;
    Ok(count)
}

/// Vertex identifiers in file order.
pub fn enumerate_vertices<R: Read>(reader: &mut R, payload_size: usize) -> Result<Vec<VertexId>> {
    let mut ids = Vec::new();
    scan_vertices(reader, payload_size, |id| ids.push(id))?;
    debug!(vertices = ids.len(), "enumerated vertices");
    trace!(?ids, "vertex list");
    Ok(ids)
}

/// Dense enumeration of a component's vertices.
///
/// Position `i` is the row/column of vertex `ids[i]` in the weight matrix and
/// in every working array of the engine.
#[derive(Debug, Clone, Default)]
pub struct VertexIndex {
    ids: Vec<VertexId>,
    positions: HashMap<VertexId, usize>,
}

impl VertexIndex {
    /// Build the mapping. Identifiers must be unique.
    pub fn from_ids(ids: Vec<VertexId>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(ids.len());
        for (i, &id) in ids.iter().enumerate() {
            if positions.insert(id, i).is_some() {
                return Err(Error::DuplicateVertex(id));
            }
        }
        Ok(Self { ids, positions })
    }

    /// Read and index every vertex record from `reader`.
    pub fn load<R: Read>(reader: &mut R, payload_size: usize) -> Result<Self> {
        Self::from_ids(enumerate_vertices(reader, payload_size)?)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[VertexId] {
        &self.ids
    }

    /// Identifier at an enumeration position.
    pub fn id_at(&self, index: usize) -> Option<VertexId> {
        self.ids.get(index).copied()
    }

    /// Enumeration position of an identifier.
    pub fn position(&self, id: VertexId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Same as [`position`](Self::position) but by linear scan; no hashing.
    pub fn position_by_scan(&self, id: VertexId) -> Option<usize> {
        self.ids.iter().position(|&v| v == id)
    }

    pub fn contains(&self, id: VertexId) -> bool {
        self.positions.contains_key(&id)
    }
}
