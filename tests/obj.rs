use ctm_weld::io::{self, arrays, obj};
use ctm_weld::prelude::*;

#[test]
fn cube_quads() {
    let corners = obj::load_obj("tests/data/cube_quads.obj", &ExportOptions::default()).unwrap();
    assert_eq!(corners.len(), 36);

    let mesh = deduplicate(&corners).unwrap();
    assert_eq!(mesh.num_vertices(), 8);
    assert_eq!(mesh.num_triangles(), 12);
    assert_eq!(mesh.get_channels(), Channels::POSITION_ONLY);
    // First face `f 1 4 3 2`, split into (1 4 3) and (1 3 2).
    assert_eq!(&mesh.get_indices()[..6], &[0, 1, 2, 0, 2, 3]);
}

#[test]
fn split_normals_keep_first_face() {
    let corners = obj::load_obj("tests/data/cube_split_normals.obj", &ExportOptions::default()).unwrap();
    assert_eq!(corners.len(), 36);
    assert!(corners.iter().all(|c| c.normal.is_some()));

    let mesh = deduplicate(&corners).unwrap();
    assert_eq!(mesh.num_vertices(), 8);
    let normals = mesh.get_vertices().iter().map(|v| v.normal).collect::<Vec<_>>();
    assert!(normals[..4].iter().all(|n| *n == Some([0.0, 0.0, -1.0])));
    assert!(normals[4..].iter().all(|n| *n == Some([0.0, 0.0, 1.0])));

    let options = ExportOptions { normals: false, ..ExportOptions::default() };
    let corners = obj::load_obj("tests/data/cube_split_normals.obj", &options).unwrap();
    assert!(corners.iter().all(|c| c.normal.is_none()));
}

#[test]
fn missing_file() {
    assert!(obj::load_obj("tests/data/does_not_exist.obj", &ExportOptions::default()).is_err());
}

#[test]
fn export_then_reload() {
    let corners = obj::load_obj("tests/data/cube_split_normals.obj", &ExportOptions::default()).unwrap();

    let mut sink = ObjSink::new(Vec::new());
    let info = io::export(&corners, &mut sink, Some("cube")).unwrap();
    assert_eq!(info.vertex_count, 8);
    assert_eq!(info.corner_count, 36);
    assert!(info.has_normals);

    let text = sink.into_inner();
    assert!(text.starts_with(b"# cube\n"));
    let reloaded = obj::load_obj_buf(&mut text.as_slice(), &ExportOptions::default()).unwrap();
    let rewelded = deduplicate(&reloaded).unwrap();
    assert_eq!(rewelded, deduplicate(&corners).unwrap());
}

#[test]
fn json_arrays_weld() {
    let corners = obj::load_obj("tests/data/cube_quads.obj", &ExportOptions::default()).unwrap();
    // Store the stream unwelded, one vertex per corner, like the exporters do.
    let unwelded = IndexedMesh::from_parts(
        corners.iter().copied().map(UniqueVertex::from).collect(),
        (0..corners.len() as u32).collect(),
        Channels::POSITION_ONLY,
    ).unwrap();

    let mut sink = JsonSink::new(Vec::new());
    sink.define_mesh(&unwelded.to_arrays(), None).unwrap();
    let doc = arrays::read_json(sink.into_inner().as_slice()).unwrap();
    assert_eq!(doc.mesh.num_vertices(), 36);

    let welded = arrays::weld_arrays(&doc.mesh).unwrap();
    assert_eq!(welded, deduplicate(&corners).unwrap());
}
