// lib.rs

/// Contains the shared definitions: corners, vertex keys and the indexed mesh.
pub mod core;

/// Defines the vertex deduplicator and its inverse.
pub mod dedup;

/// Contains the interface between corner streams and mesh files or serializers
/// such as obj and json.
pub mod io;


/// Contains the most commonly used traits, types, and objects.
pub mod prelude {
    pub use crate::core::corner::{Channels, Corner, VertexKey};
    pub use crate::core::mesh::{IndexedMesh, MeshArrays, MeshInfo, UniqueVertex};
    pub use crate::core::mesh::builder::CornerStreamBuilder;
    pub use crate::core::shared::{ConfigType, VertexIdx};
    pub use crate::dedup::{self, deduplicate, expand::expand, InvalidInputError, VertexDeduplicator};
    pub use crate::io::{ExportOptions, sink::{JsonSink, MeshSink, ObjSink}};
}
