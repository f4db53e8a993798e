pub mod builder;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::corner::{Channels, Corner};
use crate::core::shared::{
    VertexIdx, COLOR_COMPONENTS, NORMAL_COMPONENTS, POSITION_COMPONENTS, UV_COMPONENTS
};

/// One emitted vertex. Carries the attributes of the first corner that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniqueVertex {
    pub position: [f32; 3],
    pub normal: Option<[f32; 3]>,
    pub uv: Option<[f32; 2]>,
    pub color: Option<[f32; 4]>,
}

impl UniqueVertex {
    pub fn channels(&self) -> Channels {
        self.to_corner().channels()
    }

    pub fn to_corner(&self) -> Corner {
        Corner {
            position: self.position,
            normal: self.normal,
            uv: self.uv,
            color: self.color,
        }
    }
}

impl From<Corner> for UniqueVertex {
    fn from(c: Corner) -> Self {
        Self {
            position: c.position,
            normal: c.normal,
            uv: c.uv,
            color: c.color,
        }
    }
}


/// A vertex list and a triangle index buffer referencing it.
///
/// Every index is in range and the index count is a multiple of 3. When the mesh
/// comes out of [`crate::dedup::deduplicate`], vertex positions are also pairwise distinct.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexedMesh {
    pub(crate) vertices: Vec<UniqueVertex>,
    pub(crate) indices: Vec<VertexIdx>,
    pub(crate) channels: Channels,
}

impl IndexedMesh {
    /// Builds a mesh from its parts, checking that the index buffer is made of whole
    /// triangles, that every index is in range, and that every vertex carries `channels`.
    pub fn from_parts(vertices: Vec<UniqueVertex>, indices: Vec<VertexIdx>, channels: Channels) -> Result<Self, Err> {
        check_indices(&indices, vertices.len())?;
        if let Some((idx, v)) = vertices.iter()
            .enumerate()
            .find(|(_, v)| v.channels() != channels)
        {
            return Err(Err::VertexChannelMismatch { vertex: idx, expected: channels, found: v.channels() });
        }
        Ok(Self { vertices, indices, channels })
    }

    pub fn get_vertices(&self) -> &[UniqueVertex] {
        &self.vertices
    }

    pub fn get_indices(&self) -> &[VertexIdx] {
        &self.indices
    }

    pub fn get_channels(&self) -> Channels {
        self.channels
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [VertexIdx; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    pub fn into_parts(self) -> (Vec<UniqueVertex>, Vec<VertexIdx>) {
        (self.vertices, self.indices)
    }

    pub fn info(&self) -> MeshInfo {
        MeshInfo {
            corner_count: self.indices.len(),
            vertex_count: self.vertices.len(),
            triangle_count: self.num_triangles(),
            has_normals: self.channels.normal,
            has_uvs: self.channels.uv,
            has_colors: self.channels.color,
        }
    }

    /// Flattens the mesh into one array per channel, parallel-indexed,
    /// in the shape the OpenCTM mesh-definition call takes.
    pub fn to_arrays(&self) -> MeshArrays {
        let n = self.vertices.len();
        let mut positions = Vec::with_capacity(n * POSITION_COMPONENTS);
        let mut normals = self.channels.normal.then(|| Vec::with_capacity(n * NORMAL_COMPONENTS));
        let mut uvs = self.channels.uv.then(|| Vec::with_capacity(n * UV_COMPONENTS));
        let mut colors = self.channels.color.then(|| Vec::with_capacity(n * COLOR_COMPONENTS));

        for v in &self.vertices {
            positions.extend_from_slice(&v.position);
            // `from_parts` and the deduplicator guarantee that each vertex
            // carries exactly the mesh channels.
            if let (Some(out), Some(normal)) = (normals.as_mut(), v.normal) {
                out.extend_from_slice(&normal);
            }
            if let (Some(out), Some(uv)) = (uvs.as_mut(), v.uv) {
                out.extend_from_slice(&uv);
            }
            if let (Some(out), Some(c)) = (colors.as_mut(), v.color) {
                out.extend_from_slice(&c);
            }
        }

        MeshArrays {
            positions,
            normals,
            uvs,
            colors,
            indices: self.indices.clone(),
        }
    }
}

impl TryFrom<&MeshArrays> for IndexedMesh {
    type Error = Err;

    fn try_from(arrays: &MeshArrays) -> Result<Self, Self::Error> {
        arrays.validate()?;

        let vertices = (0..arrays.num_vertices())
            .map(|i| UniqueVertex {
                position: fixed(&arrays.positions, i),
                normal: arrays.normals.as_deref().map(|a| fixed(a, i)),
                uv: arrays.uvs.as_deref().map(|a| fixed(a, i)),
                color: arrays.colors.as_deref().map(|a| fixed(a, i)),
            })
            .collect();

        Ok(Self {
            vertices,
            indices: arrays.indices.clone(),
            channels: arrays.channels(),
        })
    }
}

// The caller has validated the array length.
fn fixed<const N: usize>(array: &[f32], i: usize) -> [f32; N] {
    let mut out = [0.0; N];
    out.copy_from_slice(&array[i * N..(i + 1) * N]);
    out
}

fn check_indices(indices: &[VertexIdx], num_vertices: usize) -> Result<(), Err> {
    if indices.len() % 3 != 0 {
        return Err(Err::IndexCountNotTriangular(indices.len()));
    }
    if let Some((at, &index)) = indices.iter()
        .enumerate()
        .find(|&(_, &i)| i as usize >= num_vertices)
    {
        return Err(Err::IndexOutOfRange { at, index, num_vertices });
    }
    Ok(())
}


/// Struct-of-arrays form of a mesh: one flat `f32` array per channel and a flat
/// index array, 3 indices per triangle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshArrays {
    /// 3 values per vertex.
    pub positions: Vec<f32>,
    /// 3 values per vertex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normals: Option<Vec<f32>>,
    /// 2 values per vertex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uvs: Option<Vec<f32>>,
    /// RGBA, 4 values per vertex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<f32>>,
    pub indices: Vec<VertexIdx>,
}

impl MeshArrays {
    pub fn num_vertices(&self) -> usize {
        self.positions.len() / POSITION_COMPONENTS
    }

    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn channels(&self) -> Channels {
        Channels {
            normal: self.normals.is_some(),
            uv: self.uvs.is_some(),
            color: self.colors.is_some(),
        }
    }

    pub fn validate(&self) -> Result<(), Err> {
        if self.positions.len() % POSITION_COMPONENTS != 0 {
            return Err(Err::PositionLengthNotMultipleOfThree(self.positions.len()));
        }
        let num_vertices = self.num_vertices();
        let channels = [
            ("normal", self.normals.as_ref(), NORMAL_COMPONENTS),
            ("uv", self.uvs.as_ref(), UV_COMPONENTS),
            ("color", self.colors.as_ref(), COLOR_COMPONENTS),
        ];
        for (channel, array, components) in channels {
            if let Some(array) = array {
                if array.len() != num_vertices * components {
                    return Err(Err::ChannelLengthMismatch {
                        channel,
                        len: array.len(),
                        expected: num_vertices * components,
                        num_vertices,
                    });
                }
            }
        }
        check_indices(&self.indices, num_vertices)
    }
}


/// Summary of a welded mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshInfo {
    pub corner_count: usize,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub has_normals: bool,
    pub has_uvs: bool,
    pub has_colors: bool,
}

impl fmt::Display for MeshInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Corner count: {}", self.corner_count)?;
        writeln!(f, "Unique vertex count: {}", self.vertex_count)?;
        writeln!(f, "Triangle count: {}", self.triangle_count)?;
        writeln!(f, "Has normals: {}", self.has_normals)?;
        writeln!(f, "Has UVs: {}", self.has_uvs)?;
        write!(f, "Has vertex colors: {}", self.has_colors)
    }
}


#[remain::sorted]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Err {
    #[error("The {channel} array has {len} values, but {expected} are expected for {num_vertices} vertices.")]
    ChannelLengthMismatch { channel: &'static str, len: usize, expected: usize, num_vertices: usize },

    #[error("The index array has {0} entries, which is not a multiple of 3.")]
    IndexCountNotTriangular(usize),

    #[error("Index {index} at position {at} is out of range for {num_vertices} vertices.")]
    IndexOutOfRange { at: usize, index: VertexIdx, num_vertices: usize },

    #[error("The position array has {0} values, which is not a multiple of 3.")]
    PositionLengthNotMultipleOfThree(usize),

    #[error("Vertex {vertex} carries channels {found}, but the mesh carries {expected}.")]
    VertexChannelMismatch { vertex: usize, expected: Channels, found: Channels },
}
