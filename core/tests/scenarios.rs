use std::fs;

use component_sssp_core::{
    compute_shortest_path, load_vertex_index, load_weight_matrix, write_int, AttrType, Attribute,
    Component, ComponentWriter, Endpoint, Error, Manifest, Schema, SsspOptions, VertexId, NO_EDGE,
};
use tempfile::TempDir;

fn manifest() -> Manifest {
    Manifest {
        vertex_schema: None,
        edge_schema: Schema::new(vec![
            Attribute::new("label", AttrType::Varchar),
            Attribute::new("weight", AttrType::Int),
        ]),
    }
}

fn component(vertices: &[VertexId], edges: &[(VertexId, VertexId, i32)]) -> (TempDir, Component) {
    let tmp = tempfile::tempdir().unwrap();
    let schema = manifest().edge_schema;
    let offset = schema.offset("weight").unwrap();
    let mut w = ComponentWriter::create(tmp.path(), manifest()).unwrap();
    for &v in vertices {
        w.add_vertex(v).unwrap();
    }
    for &(a, b, weight) in edges {
        let mut tuple = schema.new_tuple();
        write_int(&mut tuple, offset, weight).unwrap();
        w.add_edge(a, b, &tuple).unwrap();
    }
    let c = w.finish().unwrap();
    (tmp, c)
}

fn two_hop() -> (TempDir, Component) {
    component(&[1, 2, 3], &[(1, 2, 5), (2, 3, 2)])
}

/// Sum the weights of consecutive path edges straight from the component.
fn path_weight(c: &Component, path: &[VertexId]) -> u64 {
    let index = load_vertex_index(c).unwrap();
    let matrix = load_weight_matrix(c, &index, &SsspOptions::default()).unwrap();
    path.windows(2)
        .map(|w| {
            let a = index.position(w[0]).unwrap();
            let b = index.position(w[1]).unwrap();
            matrix.get(a, b).expect("path uses a missing edge")
        })
        .sum()
}

#[test]
fn test_two_hop_path() {
    let (_tmp, c) = two_hop();
    let p = compute_shortest_path(&c, 1, 3).unwrap();
    assert_eq!(p.path, vec![1, 2, 3]);
    assert_eq!(p.length, 3);
    assert_eq!(p.weight, 7);
}

#[test]
fn test_reverse_has_no_path() {
    let (_tmp, c) = two_hop();
    let err = compute_shortest_path(&c, 3, 1).unwrap_err();
    assert!(matches!(
        err,
        Error::NoPathExists {
            source_id: 3,
            target_id: 1
        }
    ));
}

#[test]
fn test_direct_edge_beats_two_hops() {
    let (_tmp, c) = component(&[1, 2, 3], &[(1, 2, 5), (2, 3, 2), (1, 3, 1)]);
    let p = compute_shortest_path(&c, 1, 3).unwrap();
    assert_eq!(p.path, vec![1, 3]);
    assert_eq!(p.length, 2);
    assert_eq!(p.weight, 1);
}

#[test]
fn test_source_equals_target() {
    let (_tmp, c) = two_hop();
    for v in [1, 2, 3] {
        let p = compute_shortest_path(&c, v, v).unwrap();
        assert_eq!(p.path, vec![v]);
        assert_eq!(p.length, 1);
        assert_eq!(p.weight, 0);
    }
}

#[test]
fn test_isolated_vertex_unreachable() {
    let (_tmp, c) = component(&[1, 2, 3, 4], &[(1, 2, 5), (2, 3, 2)]);
    assert!(matches!(
        compute_shortest_path(&c, 1, 4),
        Err(Error::NoPathExists { .. })
    ));
}

#[test]
fn test_missing_endpoint_reported_before_edges_read() {
    let (_tmp, c) = two_hop();
    // Without an edge file any matrix construction would fail with Io
    fs::remove_file(c.edge_path()).unwrap();

    let err = compute_shortest_path(&c, 9, 1).unwrap_err();
    assert!(matches!(
        err,
        Error::VertexNotFound {
            endpoint: Endpoint::Source,
            id: 9
        }
    ));

    let err = compute_shortest_path(&c, 1, 9).unwrap_err();
    assert!(matches!(
        err,
        Error::VertexNotFound {
            endpoint: Endpoint::Target,
            id: 9
        }
    ));
    assert_eq!(err.to_string(), "the ending vertex 9 is not in the component");

    assert!(matches!(compute_shortest_path(&c, 1, 3), Err(Error::Io(_))));
}

#[test]
fn test_empty_component() {
    let (_tmp, c) = component(&[], &[]);
    assert!(load_vertex_index(&c).unwrap().is_empty());
    assert!(matches!(
        compute_shortest_path(&c, 1, 1),
        Err(Error::VertexNotFound { .. })
    ));
}

#[test]
fn test_no_edges_matrix_is_all_sentinel() {
    let (_tmp, c) = component(&[4, 5, 6], &[]);
    let index = load_vertex_index(&c).unwrap();
    let m = load_weight_matrix(&c, &index, &SsspOptions::default()).unwrap();
    assert_eq!(m.size(), 3);
    for i in 0..3 {
        for j in 0..3 {
            assert_eq!(m.raw(i, j), NO_EDGE);
        }
    }
}

#[test]
fn test_path_weight_matches_edges() {
    // Grid-ish component with several competing routes
    let edges = [
        (10, 11, 3),
        (11, 12, 3),
        (10, 20, 1),
        (20, 21, 1),
        (21, 12, 10),
        (21, 22, 1),
        (22, 12, 1),
        (11, 21, 0),
    ];
    let (_tmp, c) = component(&[10, 11, 12, 20, 21, 22], &edges);
    for (s, t) in [(10, 12), (10, 22), (11, 12), (20, 12)] {
        let p = compute_shortest_path(&c, s, t).unwrap();
        assert_eq!(p.path.first(), Some(&s));
        assert_eq!(p.path.last(), Some(&t));
        assert_eq!(p.length, p.path.len());
        assert_eq!(path_weight(&c, &p.path), p.weight);
    }
    assert_eq!(compute_shortest_path(&c, 10, 12).unwrap().weight, 4);
}

#[test]
fn test_vertex_payload_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let mut m = manifest();
    m.vertex_schema = Some(Schema::new(vec![
        Attribute::new("name", AttrType::Varchar),
        Attribute::new("age", AttrType::Int),
    ]));
    let schema = m.edge_schema.clone();
    let mut w = ComponentWriter::create(tmp.path(), m).unwrap();
    for v in [100, 200] {
        w.add_vertex(v).unwrap();
    }
    let mut tuple = schema.new_tuple();
    write_int(&mut tuple, schema.offset("weight").unwrap(), 9).unwrap();
    w.add_edge(100, 200, &tuple).unwrap();
    let c = w.finish().unwrap();

    let reopened = Component::open(c.dir()).unwrap();
    let p = compute_shortest_path(&reopened, 100, 200).unwrap();
    assert_eq!(p.path, vec![100, 200]);
    assert_eq!(p.weight, 9);
}

#[test]
fn test_duplicate_vertex_rejected() {
    let (_tmp, c) = component(&[1, 2, 1], &[]);
    assert!(matches!(
        compute_shortest_path(&c, 1, 2),
        Err(Error::DuplicateVertex(1))
    ));
}
