pub mod expand;

use std::collections::HashMap;

use thiserror::Error;

use crate::core::corner::{Channels, Corner, VertexKey};
use crate::core::mesh::{IndexedMesh, UniqueVertex};
use crate::core::shared::VertexIdx;

/// Welds a corner stream into a unique vertex list and a triangle index buffer.
///
/// Corners with bitwise-identical positions are merged into one vertex. The first
/// corner seen at a position decides the normal, uv and color of the vertex; later
/// corners at the same position only contribute their index. Vertices are emitted in
/// first-seen order, so the output depends only on the input order.
///
/// Fails without a partial result if the corner count is not a multiple of 3, or if
/// the corners do not all carry the same optional channels.
pub fn deduplicate(corners: &[Corner]) -> Result<IndexedMesh, InvalidInputError> {
    validate(corners)?;

    let mut deduplicator = VertexDeduplicator::with_capacity(corners.len());
    for triangle in corners.chunks_exact(3) {
        deduplicator.push_triangle([triangle[0], triangle[1], triangle[2]])?;
    }
    let mesh = deduplicator.finish();

    tracing::debug!(
        corners = corners.len(),
        unique = mesh.num_vertices(),
        channels = %mesh.get_channels(),
        "welded corner stream"
    );
    Ok(mesh)
}

fn validate(corners: &[Corner]) -> Result<(), InvalidInputError> {
    if corners.len() % 3 != 0 {
        return Err(InvalidInputError::CornerCountNotTriangular(corners.len()));
    }
    let Some(first) = corners.first() else {
        return Ok(());
    };
    let expected = first.channels();
    if let Some((corner, c)) = corners.iter()
        .enumerate()
        .find(|(_, c)| c.channels() != expected)
    {
        return Err(InvalidInputError::InconsistentChannels { corner, expected, found: c.channels() });
    }
    Ok(())
}


/// Incremental form of [`deduplicate`], for hosts that walk their faces one
/// triangle at a time.
pub struct VertexDeduplicator {
    lookup: HashMap<VertexKey, VertexIdx>,
    vertices: Vec<UniqueVertex>,
    indices: Vec<VertexIdx>,
    // Channels of the first corner pushed.
    channels: Option<Channels>,
}

impl VertexDeduplicator {
    pub fn new() -> Self {
        Self {
            lookup: HashMap::new(),
            vertices: Vec::new(),
            indices: Vec::new(),
            channels: None,
        }
    }

    pub fn with_capacity(num_corners: usize) -> Self {
        Self {
            lookup: HashMap::with_capacity(num_corners),
            vertices: Vec::with_capacity(num_corners),
            indices: Vec::with_capacity(num_corners),
            channels: None,
        }
    }

    pub fn num_corners(&self) -> usize {
        self.indices.len()
    }

    pub fn num_unique(&self) -> usize {
        self.vertices.len()
    }

    /// Adds one triangle and returns the indices its corners resolved to.
    /// A rejected triangle leaves the deduplicator unchanged.
    pub fn push_triangle(&mut self, triangle: [Corner; 3]) -> Result<[VertexIdx; 3], InvalidInputError> {
        let expected = self.channels.unwrap_or_else(|| triangle[0].channels());
        if let Some((i, c)) = triangle.iter()
            .enumerate()
            .find(|(_, c)| c.channels() != expected)
        {
            return Err(InvalidInputError::InconsistentChannels {
                corner: self.indices.len() + i,
                expected,
                found: c.channels(),
            });
        }
        check_capacity(self.vertices.len(), self.new_vertex_count(&triangle))?;
        self.channels = Some(expected);

        Ok(triangle.map(|c| self.resolve(c)))
    }

    /// Distinct keys of `triangle` not seen yet.
    fn new_vertex_count(&self, triangle: &[Corner; 3]) -> usize {
        let keys = triangle.map(|c| c.key());
        keys.iter()
            .enumerate()
            .filter(|&(i, k)| !self.lookup.contains_key(k) && !keys[..i].contains(k))
            .count()
    }

    fn resolve(&mut self, corner: Corner) -> VertexIdx {
        let idx = *self.lookup.entry(corner.key()).or_insert_with(|| {
            // `check_capacity` in `push_triangle` keeps this in range.
            let idx = self.vertices.len() as VertexIdx;
            self.vertices.push(UniqueVertex::from(corner));
            idx
        });
        self.indices.push(idx);
        idx
    }

    pub fn finish(self) -> IndexedMesh {
        IndexedMesh {
            vertices: self.vertices,
            indices: self.indices,
            channels: self.channels.unwrap_or(Channels::POSITION_ONLY),
        }
    }
}

/// Fails if adding `new` vertices to `len` would push an index past `VertexIdx::MAX`.
fn check_capacity(len: usize, new: usize) -> Result<(), InvalidInputError> {
    if new == 0 {
        return Ok(());
    }
    match VertexIdx::try_from(len + new - 1) {
        Ok(_) => Ok(()),
        Err(_) => Err(InvalidInputError::TooManyVertices(len + new)),
    }
}

impl Default for VertexDeduplicator {
    fn default() -> Self {
        Self::new()
    }
}


#[remain::sorted]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidInputError {
    #[error("{0} corners do not form whole triangles; the corner count must be a multiple of 3.")]
    CornerCountNotTriangular(usize),

    #[error("Corner {corner} carries channels {found}, but the first corner carries {expected}.")]
    InconsistentChannels { corner: usize, expected: Channels, found: Channels },

    #[error("{0} unique vertices do not fit in a 32-bit index buffer.")]
    TooManyVertices(usize),
}
