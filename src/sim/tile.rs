//! Tile identifiers, shape classification, and the per-cell record
//!
//! A tile's collision behavior is fully determined by its [`TileId`]: the
//! id selects one of ten [`ShapeClass`]es plus an orientation. The
//! orientation is stored as a pair of signs describing which quadrant the
//! solid mass occupies, together with the unit surface normal for sloped
//! shapes. All derived fields are recomputed atomically whenever the id
//! changes, so they can never go stale between a grid edit and the next
//! collision scan.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use std::f32::consts::SQRT_2;

use super::edge::Edges;

/// The 34 discrete tile identifiers.
///
/// Orientation suffixes encode the sign pair `(sign_x, sign_y)` of the
/// surface normal / solid quadrant: `Pn` = (+,-), `Nn` = (-,-),
/// `Np` = (-,+), `Pp` = (+,+). Slopes come in `S`mall and `B`ig variants
/// (the small variant occupies less than half the cell). Half tiles are
/// named for the cell half they fill (down/right/up/left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileId {
    #[default]
    Empty = 0,
    Full = 1,
    Slope45Pn = 2,
    Slope45Nn = 3,
    Slope45Np = 4,
    Slope45Pp = 5,
    ConcavePn = 6,
    ConcaveNn = 7,
    ConcaveNp = 8,
    ConcavePp = 9,
    ConvexPn = 10,
    ConvexNn = 11,
    ConvexNp = 12,
    ConvexPp = 13,
    Slope22PnS = 14,
    Slope22NnS = 15,
    Slope22NpS = 16,
    Slope22PpS = 17,
    Slope22PnB = 18,
    Slope22NnB = 19,
    Slope22NpB = 20,
    Slope22PpB = 21,
    Slope67PnS = 22,
    Slope67NnS = 23,
    Slope67NpS = 24,
    Slope67PpS = 25,
    Slope67PnB = 26,
    Slope67NnB = 27,
    Slope67NpB = 28,
    Slope67PpB = 29,
    HalfD = 30,
    HalfR = 31,
    HalfU = 32,
    HalfL = 33,
}

impl TileId {
    /// All ids in code order; `ALL[i] as u8 == i`.
    pub const ALL: [TileId; 34] = [
        TileId::Empty,
        TileId::Full,
        TileId::Slope45Pn,
        TileId::Slope45Nn,
        TileId::Slope45Np,
        TileId::Slope45Pp,
        TileId::ConcavePn,
        TileId::ConcaveNn,
        TileId::ConcaveNp,
        TileId::ConcavePp,
        TileId::ConvexPn,
        TileId::ConvexNn,
        TileId::ConvexNp,
        TileId::ConvexPp,
        TileId::Slope22PnS,
        TileId::Slope22NnS,
        TileId::Slope22NpS,
        TileId::Slope22PpS,
        TileId::Slope22PnB,
        TileId::Slope22NnB,
        TileId::Slope22NpB,
        TileId::Slope22PpB,
        TileId::Slope67PnS,
        TileId::Slope67NnS,
        TileId::Slope67NpS,
        TileId::Slope67PpS,
        TileId::Slope67PnB,
        TileId::Slope67NnB,
        TileId::Slope67NpB,
        TileId::Slope67PpB,
        TileId::HalfD,
        TileId::HalfR,
        TileId::HalfU,
        TileId::HalfL,
    ];

    /// Decode a raw level code (0..=33)
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Raw level code of this id
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Collision shape class this id belongs to
    pub fn shape_class(self) -> ShapeClass {
        match self.code() {
            0 => ShapeClass::Empty,
            1 => ShapeClass::Full,
            2..=5 => ShapeClass::Slope45,
            6..=9 => ShapeClass::Concave,
            10..=13 => ShapeClass::Convex,
            14..=17 => ShapeClass::Slope22Small,
            18..=21 => ShapeClass::Slope22Big,
            22..=25 => ShapeClass::Slope67Small,
            26..=29 => ShapeClass::Slope67Big,
            _ => ShapeClass::Half,
        }
    }

    /// Orientation signs: which quadrant (or half) the solid mass faces.
    /// Zero on both axes for empty/full tiles.
    pub fn orientation(self) -> IVec2 {
        use TileId::*;
        match self {
            Empty | Full => IVec2::ZERO,
            Slope45Pn | ConcavePn | ConvexPn | Slope22PnS | Slope22PnB | Slope67PnS
            | Slope67PnB => IVec2::new(1, -1),
            Slope45Nn | ConcaveNn | ConvexNn | Slope22NnS | Slope22NnB | Slope67NnS
            | Slope67NnB => IVec2::new(-1, -1),
            Slope45Np | ConcaveNp | ConvexNp | Slope22NpS | Slope22NpB | Slope67NpS
            | Slope67NpB => IVec2::new(-1, 1),
            Slope45Pp | ConcavePp | ConvexPp | Slope22PpS | Slope22PpB | Slope67PpS
            | Slope67PpB => IVec2::new(1, 1),
            HalfD => IVec2::new(0, -1),
            HalfU => IVec2::new(0, 1),
            HalfL => IVec2::new(1, 0),
            HalfR => IVec2::new(-1, 0),
        }
    }

    /// Unit surface normal for sloped shapes; zero for shapes whose
    /// contact normal is position-dependent (arcs) or axis-derived
    /// (empty/full).
    pub fn surface_normal(self) -> Vec2 {
        let sign = self.orientation().as_vec2();
        // raw (un-normalized) slope normals: 45° is (±1, ±1),
        // 22.5° is (±1, ±2), 67.5° is (±2, ±1)
        let sqrt5 = 5.0_f32.sqrt();
        match self.shape_class() {
            ShapeClass::Slope45 => sign / SQRT_2,
            ShapeClass::Slope22Small | ShapeClass::Slope22Big => {
                Vec2::new(sign.x, sign.y * 2.0) / sqrt5
            }
            ShapeClass::Slope67Small | ShapeClass::Slope67Big => {
                Vec2::new(sign.x * 2.0, sign.y) / sqrt5
            }
            ShapeClass::Half => sign,
            _ => Vec2::ZERO,
        }
    }
}

/// Collision shape classes; one narrow-phase resolver exists per
/// non-empty class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeClass {
    #[default]
    Empty,
    Full,
    Slope45,
    Concave,
    Convex,
    Slope22Small,
    Slope22Big,
    Slope67Small,
    Slope67Big,
    Half,
}

/// Color class rolled together with hit points when a tile is set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileColor {
    #[default]
    Gold,
    Crimson,
    Cobalt,
}

/// One grid cell: fixed geometry plus the mutable shape state and the
/// edge classifications against its four neighbors.
#[derive(Debug, Clone, Copy)]
pub struct Tile {
    pub id: TileId,
    pub shape: ShapeClass,
    /// World-space cell center; fixed at grid build
    pub center: Vec2,
    /// Half extents; fixed at grid build
    pub half: Vec2,
    /// Orientation signs derived from `id`
    pub sign: IVec2,
    /// Unit slope normal derived from `id` (zero where not applicable)
    pub normal: Vec2,
    pub edges: Edges,
    pub hp: u8,
    pub breakable: bool,
    pub color: TileColor,
}

impl Tile {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self {
            id: TileId::Empty,
            shape: ShapeClass::Empty,
            center,
            half,
            sign: IVec2::ZERO,
            normal: Vec2::ZERO,
            edges: Edges::default(),
            hp: 0,
            breakable: true,
            color: TileColor::default(),
        }
    }

    /// Install a new id and rederive shape class, orientation and normal.
    /// The empty id also resets the gameplay metadata.
    pub fn classify(&mut self, id: TileId) {
        self.id = id;
        self.shape = id.shape_class();
        self.sign = id.orientation();
        self.normal = id.surface_normal();
        if id == TileId::Empty {
            self.hp = 0;
            self.color = TileColor::default();
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shape == ShapeClass::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for (i, id) in TileId::ALL.iter().enumerate() {
            assert_eq!(id.code() as usize, i);
            assert_eq!(TileId::from_code(i as u8), Some(*id));
        }
        assert_eq!(TileId::from_code(34), None);
    }

    #[test]
    fn test_slope_normals_are_unit() {
        for id in TileId::ALL {
            let n = id.surface_normal();
            if n != Vec2::ZERO {
                assert!((n.length() - 1.0).abs() < 1e-6, "{id:?}: {n:?}");
            }
        }
    }

    #[test]
    fn test_classification_is_idempotent() {
        let mut tile = Tile::new(Vec2::new(60.0, 60.0), Vec2::splat(20.0));
        tile.classify(TileId::Slope22NpB);
        let (s1, g1, n1) = (tile.shape, tile.sign, tile.normal);
        tile.classify(TileId::Slope22NpB);
        assert_eq!((tile.shape, tile.sign, tile.normal), (s1, g1, n1));
    }

    #[test]
    fn test_empty_clears_derived_fields_and_metadata() {
        let mut tile = Tile::new(Vec2::ZERO, Vec2::splat(20.0));
        tile.classify(TileId::Slope45Pn);
        tile.hp = 4;
        tile.color = TileColor::Cobalt;
        tile.classify(TileId::Empty);
        assert_eq!(tile.shape, ShapeClass::Empty);
        assert_eq!(tile.sign, IVec2::ZERO);
        assert_eq!(tile.normal, Vec2::ZERO);
        assert_eq!(tile.hp, 0);
        assert_eq!(tile.color, TileColor::Gold);
    }

    #[test]
    fn test_45_normal_orientation() {
        // Pn slope: solid mass lower-left, normal up-right in screen coords
        let n = TileId::Slope45Pn.surface_normal();
        assert!(n.x > 0.0 && n.y < 0.0);
        assert_eq!(TileId::Slope45Pn.orientation(), IVec2::new(1, -1));
    }

    #[test]
    fn test_half_normals_axis_aligned() {
        assert_eq!(TileId::HalfD.surface_normal(), Vec2::new(0.0, -1.0));
        assert_eq!(TileId::HalfU.surface_normal(), Vec2::new(0.0, 1.0));
        assert_eq!(TileId::HalfL.surface_normal(), Vec2::new(1.0, 0.0));
        assert_eq!(TileId::HalfR.surface_normal(), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_shape_class_ranges() {
        assert_eq!(TileId::Full.shape_class(), ShapeClass::Full);
        assert_eq!(TileId::Slope45Pp.shape_class(), ShapeClass::Slope45);
        assert_eq!(TileId::ConcaveNp.shape_class(), ShapeClass::Concave);
        assert_eq!(TileId::ConvexPn.shape_class(), ShapeClass::Convex);
        assert_eq!(TileId::Slope22PpS.shape_class(), ShapeClass::Slope22Small);
        assert_eq!(TileId::Slope22PnB.shape_class(), ShapeClass::Slope22Big);
        assert_eq!(TileId::Slope67NnS.shape_class(), ShapeClass::Slope67Small);
        assert_eq!(TileId::Slope67PpB.shape_class(), ShapeClass::Slope67Big);
        assert_eq!(TileId::HalfL.shape_class(), ShapeClass::Half);
    }
}
