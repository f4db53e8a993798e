use std::io::Read;

use thiserror::Error;

use crate::core::corner::Corner;
use crate::core::mesh::{self, IndexedMesh, MeshArrays};
use crate::dedup::{self, expand::expand, InvalidInputError};
use super::sink::MeshDocument;

/// Turns flat mesh arrays, as read back from an OpenCTM file, into a corner stream.
/// Each index contributes one corner carrying the attributes of the vertex it references.
pub fn corners_from_arrays(arrays: &MeshArrays) -> Result<Vec<Corner>, Err> {
    let mesh = IndexedMesh::try_from(arrays)?;
    Ok(expand(&mesh))
}

/// Welds flat mesh arrays. Vertices that the file stores more than once at the
/// same position collapse into one, with the attributes of the first one referenced.
pub fn weld_arrays(arrays: &MeshArrays) -> Result<IndexedMesh, Err> {
    let corners = corners_from_arrays(arrays)?;
    let mesh = dedup::deduplicate(&corners)?;
    tracing::debug!(
        stored = arrays.num_vertices(),
        unique = mesh.num_vertices(),
        "welded mesh arrays"
    );
    Ok(mesh)
}

/// Reads a document written by [`super::sink::JsonSink`].
pub fn read_json<R: Read>(reader: R) -> Result<MeshDocument, Err> {
    let doc: MeshDocument = serde_json::from_reader(reader)?;
    doc.mesh.validate()?;
    Ok(doc)
}


#[remain::sorted]
#[derive(Error, Debug)]
pub enum Err {
    #[error("Invalid mesh arrays: {0}")]
    ArraysError(#[from] mesh::Err),
    #[error("Invalid corner stream: {0}")]
    InvalidInput(#[from] InvalidInputError),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}


#[cfg(test)]
mod tests {
    use super::*;

    // An unwelded quad, the way the exporters store it: one vertex per corner.
    fn unwelded_quad() -> MeshArrays {
        MeshArrays {
            positions: vec![
                0.0, 0.0, 0.0,  1.0, 0.0, 0.0,  1.0, 1.0, 0.0,
                0.0, 0.0, 0.0,  1.0, 1.0, 0.0,  0.0, 1.0, 0.0,
            ],
            normals: None,
            uvs: None,
            colors: Some(vec![
                1.0, 0.0, 0.0, 1.0,  0.0, 1.0, 0.0, 1.0,  0.0, 0.0, 1.0, 1.0,
                0.5, 0.5, 0.5, 1.0,  0.0, 0.0, 1.0, 1.0,  1.0, 1.0, 1.0, 1.0,
            ]),
            indices: vec![0, 1, 2, 3, 4, 5],
        }
    }

    #[test]
    fn corners_follow_indices() {
        let mut arrays = unwelded_quad();
        arrays.indices = vec![2, 1, 0];
        let corners = corners_from_arrays(&arrays).unwrap();
        assert_eq!(corners.len(), 3);
        assert_eq!(corners[0].position, [1.0, 1.0, 0.0]);
        assert_eq!(corners[0].color, Some([0.0, 0.0, 1.0, 1.0]));
        assert_eq!(corners[2].position, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn weld_unwelded_quad() {
        let mesh = weld_arrays(&unwelded_quad()).unwrap();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.get_indices(), &[0, 1, 2, 0, 2, 3]);
        // Vertex 3 of the file is dropped in favour of vertex 0.
        assert_eq!(mesh.get_vertices()[0].color, Some([1.0, 0.0, 0.0, 1.0]));
        assert_eq!(mesh.get_vertices()[3].color, Some([1.0, 1.0, 1.0, 1.0]));
    }

    #[test]
    fn malformed_arrays() {
        let mut arrays = unwelded_quad();
        arrays.indices.truncate(4);
        assert!(matches!(
            weld_arrays(&arrays),
            Err(Err::ArraysError(mesh::Err::IndexCountNotTriangular(4)))
        ));
    }

    #[test]
    fn json_input() {
        let json = r#"{
            "comment": "two triangles",
            "positions": [0, 0, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0],
            "indices": [0, 1, 2, 0, 2, 3]
        }"#;
        let doc = read_json(json.as_bytes()).unwrap();
        assert_eq!(doc.comment.as_deref(), Some("two triangles"));
        assert_eq!(doc.mesh.num_vertices(), 4);
        assert_eq!(doc.mesh.normals, None);

        let bad = r#"{ "positions": [0, 0, 0], "indices": [0, 0, 1] }"#;
        assert!(matches!(read_json(bad.as_bytes()), Err(Err::ArraysError(_))));
    }
}
