use crate::core::corner::Corner;
use crate::core::mesh::IndexedMesh;

/// Re-expands an indexed mesh into a corner stream, one corner per index.
///
/// This is the layout the OpenCTM exporters emit (one vertex per triangle corner).
/// Deduplicating the result again gives back the same vertices and indices when the
/// mesh came out of [`super::deduplicate`].
pub fn expand(mesh: &IndexedMesh) -> Vec<Corner> {
    // `IndexedMesh` keeps every index in range.
    mesh.get_indices()
        .iter()
        .map(|&i| mesh.get_vertices()[i as usize].to_corner())
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::deduplicate;

    fn grid_corners(n: usize) -> Vec<Corner> {
        // Two triangles per cell of an n x n grid, with per-corner uv.
        let p = |x: usize, y: usize| Corner::new([x as f32, y as f32, 0.0])
            .with_uv([x as f32 / n as f32, y as f32 / n as f32]);
        let mut corners = Vec::new();
        for y in 0..n {
            for x in 0..n {
                corners.extend_from_slice(&[p(x, y), p(x + 1, y), p(x + 1, y + 1)]);
                corners.extend_from_slice(&[p(x, y), p(x + 1, y + 1), p(x, y + 1)]);
            }
        }
        corners
    }

    #[test]
    fn expansion_has_one_corner_per_index() {
        let corners = grid_corners(3);
        let mesh = deduplicate(&corners).unwrap();
        let expanded = expand(&mesh);
        assert_eq!(expanded.len(), mesh.get_indices().len());
        assert_eq!(expanded, corners);
    }

    #[test]
    fn deduplication_is_idempotent() {
        let mesh = deduplicate(&grid_corners(4)).unwrap();
        assert_eq!(mesh.num_vertices(), 25);

        let again = deduplicate(&expand(&mesh)).unwrap();
        assert_eq!(again.num_vertices(), mesh.num_vertices());
        assert_eq!(again.get_indices(), mesh.get_indices());
        assert_eq!(again, mesh);
    }
}
