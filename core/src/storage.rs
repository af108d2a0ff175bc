//! Component files: manifest, fixed-length vertex and edge records.
//!
//! A component lives in its own directory:
//!
//! ```text
//! component.json   manifest: vertex schema (optional) + edge schema
//! vertices.dat     [id: u64 LE][payload: vertex schema size]...
//! edges.dat        [start: u64 LE][end: u64 LE][tuple: edge schema size]...
//! ```
//!
//! Records carry no delimiters; boundaries are computed from the schema sizes.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::schema::Schema;

/// Stable vertex identifier assigned by the storage layer.
pub type VertexId = u64;

/// Bytes an identifier occupies on disk.
pub const ID_WIDTH: usize = std::mem::size_of::<VertexId>();

pub const MANIFEST_FILE: &str = "component.json";
pub const VERTEX_FILE: &str = "vertices.dat";
pub const EDGE_FILE: &str = "edges.dat";

/// Schemas shared by every record of a component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub vertex_schema: Option<Schema>,
    pub edge_schema: Schema,
}

/// Handle to one component's files. Passed explicitly into every operation.
#[derive(Debug, Clone)]
pub struct Component {
    dir: PathBuf,
    manifest: Manifest,
}

impl Component {
    /// Open the component stored in `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let raw = fs::read(dir.join(MANIFEST_FILE))?;
        let manifest: Manifest = serde_json::from_slice(&raw)?;
        debug!(dir = %dir.display(), "opened component");
        Ok(Self { dir, manifest })
    }

    /// Open component `component_no` of graph `graph_no` under `root`.
    pub fn locate(root: &Path, graph_no: u32, component_no: u32) -> Result<Self> {
        Self::open(component_dir(root, graph_no, component_no))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn vertex_schema(&self) -> Option<&Schema> {
        self.manifest.vertex_schema.as_ref()
    }

    pub fn edge_schema(&self) -> &Schema {
        &self.manifest.edge_schema
    }

    /// Payload bytes after each vertex identifier (0 without a vertex schema).
    pub fn vertex_payload_size(&self) -> usize {
        self.vertex_schema().map(Schema::size).unwrap_or(0)
    }

    pub fn vertex_path(&self) -> PathBuf {
        self.dir.join(VERTEX_FILE)
    }

    pub fn edge_path(&self) -> PathBuf {
        self.dir.join(EDGE_FILE)
    }

    pub fn open_vertices(&self) -> Result<BufReader<File>> {
        Ok(BufReader::new(File::open(self.vertex_path())?))
    }

    pub fn open_edges(&self) -> Result<BufReader<File>> {
        Ok(BufReader::new(File::open(self.edge_path())?))
    }
}

/// Directory of a component within a graph root.
pub fn component_dir(root: &Path, graph_no: u32, component_no: u32) -> PathBuf {
    root.join(format!("graph-{graph_no}"))
        .join(format!("component-{component_no}"))
}

/// Fill `buf` from `reader`, stopping early only at end of data.
/// Returns the number of bytes read; less than `buf.len()` means a short record.
pub(crate) fn read_record<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

pub(crate) fn decode_id(bytes: &[u8]) -> VertexId {
    let mut raw = [0u8; ID_WIDTH];
    raw.copy_from_slice(&bytes[..ID_WIDTH]);
    VertexId::from_le_bytes(raw)
}

/// A stored directed edge with its attribute tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRecord {
    pub start: VertexId,
    pub end: VertexId,
    pub tuple: Vec<u8>,
}

impl EdgeRecord {
    fn decode(buf: &[u8]) -> Self {
        Self {
            start: decode_id(&buf[..ID_WIDTH]),
            end: decode_id(&buf[ID_WIDTH..2 * ID_WIDTH]),
            tuple: buf[2 * ID_WIDTH..].to_vec(),
        }
    }
}

/// Iterate whole edge records from the current reader position.
fn for_each_edge<R: Read>(
    reader: &mut R,
    tuple_size: usize,
    mut f: impl FnMut(&[u8]) -> bool,
) -> Result<()> {
    let mut buf = vec![0u8; 2 * ID_WIDTH + tuple_size];
    loop {
        let n = read_record(reader, &mut buf)?;
        if n < buf.len() {
            return Ok(());
        }
        if !f(&buf) {
            return Ok(());
        }
    }
}

/// Edge existence lookup by (start, end) identifier pair.
pub trait EdgeLookup {
    fn find_edge(&mut self, start: VertexId, end: VertexId) -> Result<Option<EdgeRecord>>;
}

/// Looks edges up by rescanning the edge file on every query.
pub struct EdgeScan<R> {
    reader: R,
    tuple_size: usize,
}

impl<R: Read + Seek> EdgeScan<R> {
    pub fn new(reader: R, tuple_size: usize) -> Self {
        Self { reader, tuple_size }
    }
}

impl<R: Read + Seek> EdgeLookup for EdgeScan<R> {
    fn find_edge(&mut self, start: VertexId, end: VertexId) -> Result<Option<EdgeRecord>> {
        self.reader.seek(SeekFrom::Start(0))?;
        let mut found = None;
        for_each_edge(&mut self.reader, self.tuple_size, |buf| {
            if decode_id(buf) == start && decode_id(&buf[ID_WIDTH..]) == end {
                found = Some(EdgeRecord::decode(buf));
                false
            } else {
                true
            }
        })?;
        Ok(found)
    }
}

/// In-memory (start, end) → edge map built with a single pass over the file.
#[derive(Debug, Default)]
pub struct EdgeIndex {
    edges: HashMap<(VertexId, VertexId), EdgeRecord>,
}

impl EdgeIndex {
    /// Index every edge record. When a pair is stored twice the first record
    /// wins, matching what a scan would find.
    pub fn from_reader<R: Read>(reader: &mut R, tuple_size: usize) -> Result<Self> {
        let mut edges = HashMap::new();
        for_each_edge(reader, tuple_size, |buf| {
            let record = EdgeRecord::decode(buf);
            let key = (record.start, record.end);
            if edges.contains_key(&key) {
                warn!(start = key.0, end = key.1, "duplicate edge record ignored");
            } else {
                edges.insert(key, record);
            }
            true
        })?;
        debug!(edges = edges.len(), "indexed edge file");
        Ok(Self { edges })
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl EdgeLookup for EdgeIndex {
    fn find_edge(&mut self, start: VertexId, end: VertexId) -> Result<Option<EdgeRecord>> {
        Ok(self.edges.get(&(start, end)).cloned())
    }
}

/// Appends records to a new component directory. Used to produce fixtures
/// and benchmark inputs; the query path never writes.
pub struct ComponentWriter {
    dir: PathBuf,
    manifest: Manifest,
    vertices: BufWriter<File>,
    edges: BufWriter<File>,
}

impl ComponentWriter {
    /// Create `dir` (and parents) with an empty component using `manifest`.
    pub fn create(dir: impl Into<PathBuf>, manifest: Manifest) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(MANIFEST_FILE), serde_json::to_vec_pretty(&manifest)?)?;
        let vertices = BufWriter::new(File::create(dir.join(VERTEX_FILE))?);
        let edges = BufWriter::new(File::create(dir.join(EDGE_FILE))?);
        Ok(Self {
            dir,
            manifest,
            vertices,
            edges,
        })
    }

    /// Append a vertex with a zeroed payload.
    pub fn add_vertex(&mut self, id: VertexId) -> Result<()> {
        let payload = vec![0u8; self.vertex_payload_size()];
        self.add_vertex_with_payload(id, &payload)
    }

    pub fn add_vertex_with_payload(&mut self, id: VertexId, payload: &[u8]) -> Result<()> {
        let expected = self.vertex_payload_size();
        if payload.len() != expected {
            return Err(Error::corrupt(format!(
                "vertex {id} payload is {} bytes, schema needs {expected}",
                payload.len()
            )));
        }
        self.vertices.write_all(&id.to_le_bytes())?;
        self.vertices.write_all(payload)?;
        Ok(())
    }

    pub fn add_edge(&mut self, start: VertexId, end: VertexId, tuple: &[u8]) -> Result<()> {
        let expected = self.manifest.edge_schema.size();
        if tuple.len() != expected {
            return Err(Error::corrupt(format!(
                "edge {start} -> {end} tuple is {} bytes, schema needs {expected}",
                tuple.len()
            )));
        }
        self.edges.write_all(&start.to_le_bytes())?;
        self.edges.write_all(&end.to_le_bytes())?;
        self.edges.write_all(tuple)?;
        Ok(())
    }

    /// Flush both record files and reopen the result as a [`Component`].
    pub fn finish(mut self) -> Result<Component> {
        self.vertices.flush()?;
        self.edges.flush()?;
        Ok(Component {
            dir: self.dir,
            manifest: self.manifest,
        })
    }

    fn vertex_payload_size(&self) -> usize {
        self.manifest.vertex_schema.as_ref().map(Schema::size).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::schema::{write_int, AttrType, Attribute};

    fn weighted_manifest() -> Manifest {
        Manifest {
            vertex_schema: None,
            edge_schema: Schema::new(vec![
                Attribute::new("flag", AttrType::Bool),
                Attribute::new("weight", AttrType::Int),
            ]),
        }
    }

    fn edge_bytes(start: VertexId, end: VertexId, weight: i32) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&start.to_le_bytes());
        out.extend_from_slice(&end.to_le_bytes());
        let mut tuple = vec![0u8; 5];
        write_int(&mut tuple, 1, weight).unwrap();
        out.extend_from_slice(&tuple);
        out
    }

    #[test]
    fn test_scan_finds_edge() {
        let mut raw = edge_bytes(1, 2, 5);
        raw.extend(edge_bytes(2, 3, 2));
        let mut scan = EdgeScan::new(Cursor::new(raw), 5);

        let e = scan.find_edge(2, 3).unwrap().unwrap();
        assert_eq!((e.start, e.end), (2, 3));
        assert_eq!(crate::schema::read_int(&e.tuple, 1).unwrap(), 2);

        // Lookups rewind, so order of queries does not matter
        assert!(scan.find_edge(1, 2).unwrap().is_some());
        assert!(scan.find_edge(2, 1).unwrap().is_none());
    }

    #[test]
    fn test_scan_ignores_trailing_partial_record() {
        let mut raw = edge_bytes(1, 2, 5);
        raw.extend_from_slice(&[7, 7, 7]);
        let mut scan = EdgeScan::new(Cursor::new(raw), 5);
        assert!(scan.find_edge(1, 2).unwrap().is_some());
        assert!(scan.find_edge(7, 7).unwrap().is_none());
    }

    #[test]
    fn test_index_first_duplicate_wins() {
        let mut raw = edge_bytes(1, 2, 5);
        raw.extend(edge_bytes(1, 2, 9));
        raw.extend(edge_bytes(3, 3, 1));
        let mut index = EdgeIndex::from_reader(&mut Cursor::new(raw), 5).unwrap();
        assert_eq!(index.len(), 2);
        let e = index.find_edge(1, 2).unwrap().unwrap();
        assert_eq!(crate::schema::read_int(&e.tuple, 1).unwrap(), 5);
        assert!(index.find_edge(3, 3).unwrap().is_some());
    }

    #[test]
    fn test_index_empty() {
        let index = EdgeIndex::from_reader(&mut Cursor::new(Vec::new()), 5).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_writer_roundtrip_through_open() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = component_dir(tmp.path(), 0, 3);
        let mut w = ComponentWriter::create(&dir, weighted_manifest()).unwrap();
        w.add_vertex(10).unwrap();
        w.add_vertex(20).unwrap();
        let mut tuple = vec![0u8; 5];
        write_int(&mut tuple, 1, 4).unwrap();
        w.add_edge(10, 20, &tuple).unwrap();
        w.finish().unwrap();

        let c = Component::locate(tmp.path(), 0, 3).unwrap();
        assert_eq!(c.manifest(), &weighted_manifest());
        assert_eq!(c.vertex_payload_size(), 0);
        assert_eq!(fs::metadata(c.vertex_path()).unwrap().len(), 16);
        assert_eq!(fs::metadata(c.edge_path()).unwrap().len(), 21);
    }

    #[test]
    fn test_writer_rejects_wrong_tuple_size() {
        let tmp = tempfile::tempdir().unwrap();
        let mut w = ComponentWriter::create(tmp.path(), weighted_manifest()).unwrap();
        assert!(matches!(w.add_edge(1, 2, &[0; 4]), Err(Error::CorruptRecord(_))));
        assert!(w.add_vertex_with_payload(1, &[0]).is_err());
    }

    #[test]
    fn test_open_missing_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(Component::open(tmp.path()), Err(Error::Io(_))));
    }

    #[test]
    fn test_open_bad_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(MANIFEST_FILE), b"{ not json").unwrap();
        assert!(matches!(Component::open(tmp.path()), Err(Error::Manifest(_))));
    }
}
