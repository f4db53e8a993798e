pub mod corner;
pub mod mesh;
pub mod shared;
