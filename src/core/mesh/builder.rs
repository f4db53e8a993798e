use thiserror::Error;

use crate::core::corner::{Channels, Corner};

/// Collects polygons from a host mesh and turns them into a corner stream,
/// three corners per triangle.
///
/// Polygons with more than three corners are fan-triangulated around their first
/// corner, so a quad `[a, b, c, d]` becomes the triangles `[a, b, c]` and `[a, c, d]`.
/// Non-convex polygons must be triangulated by the host before they are pushed.
pub struct CornerStreamBuilder {
    channels: Channels,
    corners: Vec<Corner>,
    num_polygons: usize,
}

impl CornerStreamBuilder {
    pub fn new(channels: Channels) -> Self {
        Self {
            channels,
            corners: Vec::new(),
            num_polygons: 0,
        }
    }

    pub fn with_capacity(channels: Channels, num_triangles: usize) -> Self {
        Self {
            channels,
            corners: Vec::with_capacity(num_triangles * 3),
            num_polygons: 0,
        }
    }

    pub fn get_channels(&self) -> Channels {
        self.channels
    }

    pub fn triangle_count(&self) -> usize {
        self.corners.len() / 3
    }

    pub fn polygon_count(&self) -> usize {
        self.num_polygons
    }

    /// Adds one polygon. Nothing is added if the polygon is rejected.
    pub fn push_polygon(&mut self, polygon: &[Corner]) -> Result<(), Err> {
        if polygon.len() < 3 {
            return Err(Err::DegeneratePolygon { polygon: self.num_polygons, len: polygon.len() });
        }
        if let Some((corner, c)) = polygon.iter()
            .enumerate()
            .find(|(_, c)| c.channels() != self.channels)
        {
            return Err(Err::ChannelMismatch {
                polygon: self.num_polygons,
                corner,
                expected: self.channels,
                found: c.channels(),
            });
        }

        let first = polygon[0];
        for pair in polygon[1..].windows(2) {
            self.corners.extend_from_slice(&[first, pair[0], pair[1]]);
        }
        self.num_polygons += 1;
        Ok(())
    }

    /// Adds a polygon given by indices into per-vertex data, the layout hosts such as
    /// Blender expose (`mesh.verts` plus `face.v[i].index`).
    pub fn push_indexed_polygon<F>(&mut self, face: &[usize], mut vertex: F) -> Result<(), Err>
        where F: FnMut(usize) -> Corner
    {
        let polygon = face.iter()
            .map(|&i| vertex(i))
            .collect::<Vec<_>>();
        self.push_polygon(&polygon)
    }

    pub fn build(self) -> Vec<Corner> {
        self.corners
    }
}


#[remain::sorted]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Err {
    #[error("Corner {corner} of polygon {polygon} carries channels {found}, but the stream carries {expected}.")]
    ChannelMismatch { polygon: usize, corner: usize, expected: Channels, found: Channels },

    #[error("Polygon {polygon} has {len} corners; at least 3 are required.")]
    DegeneratePolygon { polygon: usize, len: usize },
}
