use std::io::Write;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::mesh::{self, MeshArrays};
use crate::core::shared::{COLOR_COMPONENTS, NORMAL_COMPONENTS, POSITION_COMPONENTS, UV_COMPONENTS};

/// Serialization boundary. Receives a welded mesh in struct-of-arrays form,
/// the same data the OpenCTM mesh-definition call takes, plus an optional file comment.
pub trait MeshSink {
    fn define_mesh(&mut self, mesh: &MeshArrays, comment: Option<&str>) -> Result<(), Err>;
}


/// Writes Wavefront OBJ text.
///
/// Vertex colors go on the `v` lines as `v x y z r g b`; alpha has no place in OBJ and is dropped.
pub struct ObjSink<W: Write> {
    writer: W,
}

impl<W: Write> ObjSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MeshSink for ObjSink<W> {
    fn define_mesh(&mut self, mesh: &MeshArrays, comment: Option<&str>) -> Result<(), Err> {
        mesh.validate()?;
        let w = &mut self.writer;

        if let Some(comment) = comment {
            for line in comment.lines() {
                writeln!(w, "# {}", line)?;
            }
        }

        let positions = mesh.positions.chunks_exact(POSITION_COMPONENTS);
        match &mesh.colors {
            Some(colors) => {
                for (p, c) in positions.zip(colors.chunks_exact(COLOR_COMPONENTS)) {
                    writeln!(w, "v {} {} {} {} {} {}", p[0], p[1], p[2], c[0], c[1], c[2])?;
                }
            }
            None => {
                for p in positions {
                    writeln!(w, "v {} {} {}", p[0], p[1], p[2])?;
                }
            }
        }
        if let Some(uvs) = &mesh.uvs {
            for uv in uvs.chunks_exact(UV_COMPONENTS) {
                writeln!(w, "vt {} {}", uv[0], uv[1])?;
            }
        }
        if let Some(normals) = &mesh.normals {
            for n in normals.chunks_exact(NORMAL_COMPONENTS) {
                writeln!(w, "vn {} {} {}", n[0], n[1], n[2])?;
            }
        }

        // OBJ indices are 1-based; uv and normal share the position index.
        let corner = |i: u32| {
            let i = i as u64 + 1;
            match (mesh.uvs.is_some(), mesh.normals.is_some()) {
                (true, true) => format!("{i}/{i}/{i}"),
                (true, false) => format!("{i}/{i}"),
                (false, true) => format!("{i}//{i}"),
                (false, false) => format!("{i}"),
            }
        };
        for t in mesh.indices.chunks_exact(3) {
            writeln!(w, "f {} {} {}", corner(t[0]), corner(t[1]), corner(t[2]))?;
        }
        w.flush()?;
        Ok(())
    }
}


/// A mesh as stored by [`JsonSink`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(flatten)]
    pub mesh: MeshArrays,
}

/// Writes the mesh arrays as a JSON document.
pub struct JsonSink<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, pretty: false }
    }

    pub fn pretty(writer: W) -> Self {
        Self { writer, pretty: true }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MeshSink for JsonSink<W> {
    fn define_mesh(&mut self, mesh: &MeshArrays, comment: Option<&str>) -> Result<(), Err> {
        mesh.validate()?;
        let doc = MeshDocument {
            comment: comment.map(str::to_owned),
            mesh: mesh.clone(),
        };
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &doc)?;
        } else {
            serde_json::to_writer(&mut self.writer, &doc)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}


#[remain::sorted]
#[derive(Error, Debug)]
pub enum Err {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid mesh arrays: {0}")]
    MeshError(#[from] mesh::Err),
}


#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshArrays {
        MeshArrays {
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.5, 0.0],
            normals: Some(vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]),
            uvs: None,
            colors: Some(vec![1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.5]),
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn obj_text() {
        let mut sink = ObjSink::new(Vec::new());
        sink.define_mesh(&triangle(), Some("Exported with ctm-weld")).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text, "\
# Exported with ctm-weld
v 0 0 0 1 0 0
v 1 0 0 0 1 0
v 0 1.5 0 0 0 1
vn 0 0 1
vn 0 0 1
vn 0 0 1
f 1//1 2//2 3//3
");
    }

    #[test]
    fn obj_face_formats() {
        let mut mesh = triangle();
        mesh.normals = None;
        mesh.colors = None;
        mesh.uvs = Some(vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        let mut sink = ObjSink::new(Vec::new());
        sink.define_mesh(&mesh, None).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert!(text.starts_with("v 0 0 0\n"));
        assert!(text.ends_with("f 1/1 2/2 3/3\n"));
    }

    #[test]
    fn json_document() {
        let mut sink = JsonSink::new(Vec::new());
        sink.define_mesh(&triangle(), Some("hello")).unwrap();
        let doc: MeshDocument = serde_json::from_slice(&sink.into_inner()).unwrap();
        assert_eq!(doc.comment.as_deref(), Some("hello"));
        assert_eq!(doc.mesh, triangle());
    }

    #[test]
    fn sinks_reject_invalid_arrays() {
        let mut mesh = triangle();
        mesh.indices = vec![0, 1, 3];
        let mut sink = ObjSink::new(Vec::new());
        assert!(matches!(
            sink.define_mesh(&mesh, None),
            Err(Err::MeshError(mesh::Err::IndexOutOfRange { at: 2, index: 3, num_vertices: 3 }))
        ));
        assert!(sink.into_inner().is_empty());
    }
}
