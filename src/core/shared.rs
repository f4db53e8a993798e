/// Index of a vertex in an index buffer. Matches the unsigned 32-bit
/// index type of the OpenCTM mesh-definition call.
pub type VertexIdx = u32;

pub trait ConfigType {
    fn default()-> Self;
}

/// Number of components of each per-vertex channel.
pub const POSITION_COMPONENTS: usize = 3;
pub const NORMAL_COMPONENTS: usize = 3;
pub const UV_COMPONENTS: usize = 2;
pub const COLOR_COMPONENTS: usize = 4;
