use std::fmt;

use serde::{Deserialize, Serialize};

/// Presence mask of the optional per-corner channels.
/// Every corner of a single deduplication call must carry the same mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Channels {
    pub normal: bool,
    pub uv: bool,
    pub color: bool,
}

impl Channels {
    pub const POSITION_ONLY: Self = Self { normal: false, uv: false, color: false };
    pub const ALL: Self = Self { normal: true, uv: true, color: true };

    /// Channels present in both masks.
    pub fn intersection(self, other: Self) -> Self {
        Self {
            normal: self.normal && other.normal,
            uv: self.uv && other.uv,
            color: self.color && other.color,
        }
    }
}

impl fmt::Display for Channels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "position")?;
        if self.normal {
            write!(f, "+normal")?;
        }
        if self.uv {
            write!(f, "+uv")?;
        }
        if self.color {
            write!(f, "+color")?;
        }
        Ok(())
    }
}


/// One face-vertex occurrence. A triangle contributes three consecutive corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corner {
    pub position: [f32; 3],
    pub normal: Option<[f32; 3]>,
    pub uv: Option<[f32; 2]>,
    /// RGBA
    pub color: Option<[f32; 4]>,
}

impl Corner {
    pub fn new(position: [f32; 3]) -> Self {
        Self {
            position,
            normal: None,
            uv: None,
            color: None,
        }
    }

    pub fn with_normal(mut self, normal: [f32; 3]) -> Self {
        self.normal = Some(normal);
        self
    }

    pub fn with_uv(mut self, uv: [f32; 2]) -> Self {
        self.uv = Some(uv);
        self
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = Some(color);
        self
    }

    pub fn channels(&self) -> Channels {
        Channels {
            normal: self.normal.is_some(),
            uv: self.uv.is_some(),
            color: self.color.is_some(),
        }
    }

    pub fn key(&self) -> VertexKey {
        VertexKey::from(self.position)
    }

    /// Drops every optional channel that is not part of `channels`.
    /// Channels absent from the corner stay absent.
    pub fn masked(self, channels: Channels) -> Self {
        Self {
            position: self.position,
            normal: self.normal.filter(|_| channels.normal),
            uv: self.uv.filter(|_| channels.uv),
            color: self.color.filter(|_| channels.color),
        }
    }
}


/// Deduplication key of a corner: the bit patterns of its position.
///
/// Two keys are equal only if every coordinate is bit-for-bit identical,
/// so `0.0` and `-0.0` are distinct keys, while two NaNs with the same
/// payload are the same key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VertexKey([u32; 3]);

impl VertexKey {
    pub fn position(&self) -> [f32; 3] {
        self.0.map(f32::from_bits)
    }
}

impl From<[f32; 3]> for VertexKey {
    fn from(position: [f32; 3]) -> Self {
        Self(position.map(f32::to_bits))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_compare_bitwise() {
        assert_eq!(VertexKey::from([1.0, 2.0, 3.0]), VertexKey::from([1.0, 2.0, 3.0]));
        assert_ne!(VertexKey::from([0.0, 0.0, 0.0]), VertexKey::from([-0.0, 0.0, 0.0]));
        assert_ne!(VertexKey::from([0.1, 0.0, 0.0]), VertexKey::from([0.1 + f32::EPSILON, 0.0, 0.0]));
        assert_eq!(VertexKey::from([f32::NAN, 0.0, 0.0]), VertexKey::from([f32::NAN, 0.0, 0.0]));
    }

    #[test]
    fn key_round_trips_position() {
        let p = [0.25, -7.5, 1e-7];
        assert_eq!(VertexKey::from(p).position(), p);
    }

    #[test]
    fn channels_of_corner() {
        let c = Corner::new([0.0; 3]).with_uv([0.5, 0.5]);
        assert_eq!(c.channels(), Channels { normal: false, uv: true, color: false });
        assert_eq!(c.channels().to_string(), "position+uv");

        let c = c.with_normal([0.0, 0.0, 1.0]).with_color([1.0; 4]);
        assert_eq!(c.channels(), Channels::ALL);
        assert_eq!(c.channels().to_string(), "position+normal+uv+color");
    }

    #[test]
    fn masking_drops_channels() {
        let c = Corner::new([1.0, 2.0, 3.0])
            .with_normal([0.0, 1.0, 0.0])
            .with_uv([0.0, 1.0]);
        let masked = c.masked(Channels { normal: false, uv: true, color: true });
        assert_eq!(masked.normal, None);
        assert_eq!(masked.uv, Some([0.0, 1.0]));
        assert_eq!(masked.color, None);
        assert_eq!(masked.position, c.position);
    }
}
