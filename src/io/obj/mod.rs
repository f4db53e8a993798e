// use tobj to load the obj file and convert it to a corner stream
use std::fmt::Debug;
use std::io::BufRead;
use std::path::Path;

use crate::core::corner::{Channels, Corner};
use crate::io::ExportOptions;

#[remain::sorted]
#[derive(Debug, thiserror::Error)]
pub enum Err {
    #[error("Failed to load OBJ file: {0}")]
    LoadError(#[from] tobj::LoadError),
    #[error("Model '{model}' has no {channel} data for vertex {index}.")]
    MissingVertexData { model: String, channel: &'static str, index: usize },
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

/// Loads every model of an OBJ file as one corner stream, three corners per triangle.
/// Polygons are triangulated by `tobj`.
pub fn load_obj<P: AsRef<Path> + Debug>(path: P, options: &ExportOptions) -> Result<Vec<Corner>, Err> {
    let (models, _materials) = tobj::load_obj(path.as_ref(), &load_options())?;
    tracing::debug!(path = ?path, models = models.len(), "loaded obj");
    corners_from_models(&models, options)
}

/// Same as [`load_obj`], reading from memory. Material libraries are not loaded.
pub fn load_obj_buf<R: BufRead>(reader: &mut R, options: &ExportOptions) -> Result<Vec<Corner>, Err> {
    let (models, _materials) = tobj::load_obj_buf(
        reader,
        &load_options(),
        |_| Err(tobj::LoadError::OpenFileFailed),
    )?;
    corners_from_models(&models, options)
}

fn corners_from_models(models: &[tobj::Model], options: &ExportOptions) -> Result<Vec<Corner>, Err> {
    let channels = stream_channels(models, options);

    let num_corners = models.iter().map(|m| m.mesh.indices.len()).sum();
    let mut corners = Vec::with_capacity(num_corners);
    for model in models {
        let mesh = &model.mesh;
        let missing = |channel: &'static str, index: usize| Err::MissingVertexData {
            model: model.name.clone(),
            channel,
            index,
        };
        for &i in &mesh.indices {
            let i = i as usize;
            let mut corner = Corner::new(
                vertex_data(&mesh.positions, i).ok_or_else(|| missing("position", i))?
            );
            if channels.normal {
                corner = corner.with_normal(
                    vertex_data(&mesh.normals, i).ok_or_else(|| missing("normal", i))?
                );
            }
            if channels.uv {
                corner = corner.with_uv(
                    vertex_data(&mesh.texcoords, i).ok_or_else(|| missing("uv", i))?
                );
            }
            if channels.color {
                let [r, g, b] = vertex_data(&mesh.vertex_color, i).ok_or_else(|| missing("color", i))?;
                corner = corner.with_color([r, g, b, 1.0]);
            }
            corners.push(corner);
        }
    }
    Ok(corners)
}

/// The `N` values of vertex `i`, if the array holds them.
fn vertex_data<const N: usize>(array: &[f32], i: usize) -> Option<[f32; N]> {
    let start = i.checked_mul(N)?;
    array.get(start..start.checked_add(N)?)?.try_into().ok()
}

/// A channel is loaded only if it is enabled and every model carries it for
/// every vertex, so that all corners of the stream share the same channels.
fn stream_channels(models: &[tobj::Model], options: &ExportOptions) -> Channels {
    let meshes = || models.iter().filter(|m| !m.mesh.indices.is_empty()).map(|m| &m.mesh);
    let all = |has: fn(&tobj::Mesh) -> bool| meshes().all(has);
    let any = |has: fn(&tobj::Mesh) -> bool| meshes().any(has);

    // Short when only some faces reference the channel.
    let full_normals: fn(&tobj::Mesh) -> bool = |m| m.normals.len() == m.positions.len();
    let full_uvs: fn(&tobj::Mesh) -> bool = |m| m.texcoords.len() * 3 == m.positions.len() * 2;
    let full_colors: fn(&tobj::Mesh) -> bool = |m| m.vertex_color.len() == m.positions.len();

    let has_normals: fn(&tobj::Mesh) -> bool = |m| !m.normals.is_empty();
    let has_uvs: fn(&tobj::Mesh) -> bool = |m| !m.texcoords.is_empty();
    let has_colors: fn(&tobj::Mesh) -> bool = |m| !m.vertex_color.is_empty();

    let present = Channels {
        normal: all(full_normals),
        uv: all(full_uvs),
        color: all(full_colors),
    };
    let partial = Channels {
        normal: !present.normal && any(has_normals),
        uv: !present.uv && any(has_uvs),
        color: !present.color && any(has_colors),
    };
    if partial != Channels::POSITION_ONLY {
        tracing::warn!(dropped = %partial, "channels missing on some faces or models; dropping them");
    }

    present.intersection(options.channels())
}
