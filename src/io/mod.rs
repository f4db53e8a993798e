pub mod arrays;
pub mod obj;
pub mod sink;

use thiserror::Error;

use crate::core::corner::{Channels, Corner};
use crate::core::mesh::MeshInfo;
use crate::core::shared::ConfigType;
use crate::dedup::{self, InvalidInputError};
use sink::MeshSink;

/// Selects which optional channels survive into the exported mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub normals: bool,
    pub uvs: bool,
    pub colors: bool,
}

impl ConfigType for ExportOptions {
    fn default() -> Self {
        Self {
            normals: true,
            uvs: true,
            colors: true,
        }
    }
}

impl ExportOptions {
    pub fn channels(&self) -> Channels {
        Channels {
            normal: self.normals,
            uv: self.uvs,
            color: self.colors,
        }
    }

    /// Drops the disabled channels from every corner.
    pub fn apply(&self, corners: &mut [Corner]) {
        let channels = self.channels();
        for c in corners.iter_mut() {
            *c = c.masked(channels);
        }
    }
}


/// Welds `corners` and hands the result to `sink`.
pub fn export<S>(corners: &[Corner], sink: &mut S, comment: Option<&str>) -> Result<MeshInfo, Err>
    where S: MeshSink + ?Sized
{
    let mesh = dedup::deduplicate(corners)?;
    let info = mesh.info();
    sink.define_mesh(&mesh.to_arrays(), comment)?;
    tracing::debug!(vertices = info.vertex_count, triangles = info.triangle_count, "mesh exported");
    Ok(info)
}


#[remain::sorted]
#[derive(Error, Debug)]
pub enum Err {
    #[error("Invalid corner stream: {0}")]
    InvalidInput(#[from] InvalidInputError),
    #[error("Sink error: {0}")]
    SinkError(#[from] sink::Err),
}
