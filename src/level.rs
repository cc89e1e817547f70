//! Level descriptors and level sets
//!
//! A level descriptor is a flat string of printable single-character
//! codes, one per interior grid cell. Each character's code point minus a
//! fixed padding constant is the tile id (0..=33); the padding keeps the
//! codes in the printable ASCII range. Traversal order is outer loop =
//! column, inner loop = row, with index `column * rows + row` — the same
//! order for encode and decode, so a grid round-trips exactly.
//!
//! A [`LevelSet`] bundles named stages and loads from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::TileId;

/// Offset added to tile codes so descriptors stay in printable ASCII
/// ('0' encodes the empty tile)
pub const CHAR_PAD: u8 = b'0';

/// Descriptor and level-set errors. All of these are raised before any
/// grid cell mutates.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("descriptor holds {got} cells, grid needs {expected}")]
    BadLength { expected: usize, got: usize },
    #[error("descriptor char {code:?} at cell {index} is not a tile code")]
    BadCode { index: usize, code: char },
    #[error("level set: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode one descriptor character
pub fn decode_code(ch: char) -> Option<TileId> {
    let raw = (ch as u32).checked_sub(CHAR_PAD as u32)?;
    u8::try_from(raw).ok().and_then(TileId::from_code)
}

/// Encode one tile id as a descriptor character
pub fn encode_code(id: TileId) -> char {
    (id.code() + CHAR_PAD) as char
}

/// Validate and decode a full descriptor for a `rows x cols` grid.
/// Length and every code are checked up front; the result is ordered
/// `column * rows + row`.
pub fn parse_descriptor(
    descriptor: &str,
    rows: usize,
    cols: usize,
) -> Result<Vec<TileId>, LevelError> {
    let expected = rows * cols;
    let got = descriptor.chars().count();
    if got != expected {
        return Err(LevelError::BadLength { expected, got });
    }
    descriptor
        .chars()
        .enumerate()
        .map(|(index, code)| decode_code(code).ok_or(LevelError::BadCode { index, code }))
        .collect()
}

/// One named stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    /// Interior grid dimensions the descriptor was authored for
    pub rows: usize,
    pub cols: usize,
    pub map: String,
}

impl Level {
    /// Check the descriptor against its own declared dimensions
    pub fn validate(&self) -> Result<(), LevelError> {
        parse_descriptor(&self.map, self.rows, self.cols).map(|_| ())
    }
}

/// An ordered collection of stages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelSet {
    pub levels: Vec<Level>,
}

impl LevelSet {
    /// Parse a level set from JSON and validate every stage descriptor
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let set: LevelSet = serde_json::from_str(json)?;
        for level in &set.levels {
            level.validate()?;
        }
        Ok(set)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The four 8x8 demo stages
pub const DEMO_STAGES: [&str; 4] = [
    "0000000000000000000000000000000000000000000000000000000000000000",
    "A6E00002000?E000000NA0070C0N00;10B0N00:10>0>L0060000F000@0GH0003",
    "A3C0002100;?FNN00000000000000273692ACDEFGHI0000000000000@?:;0088",
    "B0000012000;HHJKAAABB390000000000000083502030420000BBCCDDEEFF000",
];

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_code_round_trip() {
        for id in TileId::ALL {
            assert_eq!(decode_code(encode_code(id)), Some(id));
        }
    }

    #[test]
    fn test_decode_rejects_out_of_range() {
        assert_eq!(decode_code('R'), None); // code 34
        assert_eq!(decode_code(' '), None); // below the pad
        assert_eq!(decode_code('Q'), Some(TileId::HalfL)); // code 33
    }

    #[test]
    fn test_demo_stages_parse() {
        for stage in DEMO_STAGES {
            parse_descriptor(stage, 8, 8).unwrap();
        }
    }

    #[test]
    fn test_length_checked_before_codes() {
        let err = parse_descriptor("00", 8, 8).unwrap_err();
        assert!(matches!(err, LevelError::BadLength { expected: 64, got: 2 }));
    }

    #[test]
    fn test_bad_code_reports_position() {
        let err = parse_descriptor("00 0", 2, 2).unwrap_err();
        assert!(matches!(err, LevelError::BadCode { index: 2, code: ' ' }));
    }

    #[test]
    fn test_level_set_json_round_trip() {
        let set = LevelSet {
            levels: vec![Level {
                name: "stage 1".into(),
                rows: 8,
                cols: 8,
                map: DEMO_STAGES[1].into(),
            }],
        };
        let json = set.to_json().unwrap();
        let back = LevelSet::from_json(&json).unwrap();
        assert_eq!(back.levels.len(), 1);
        assert_eq!(back.levels[0].map, DEMO_STAGES[1]);
    }

    #[test]
    fn test_level_set_rejects_bad_stage() {
        let json = r#"{"levels":[{"name":"x","rows":8,"cols":8,"map":"00"}]}"#;
        assert!(LevelSet::from_json(json).is_err());
    }

    proptest! {
        #[test]
        fn prop_descriptor_round_trip(codes in proptest::collection::vec(0u8..34, 24)) {
            let descriptor: String = codes
                .iter()
                .map(|&c| encode_code(TileId::from_code(c).unwrap()))
                .collect();
            let ids = parse_descriptor(&descriptor, 4, 6).unwrap();
            let back: String = ids.iter().map(|&id| encode_code(id)).collect();
            prop_assert_eq!(descriptor, back);
        }
    }
}
