//! Placeable kinds and the layer definition table
//!
//! Every kind of positioned object a scene can hold, together with the
//! geometry transform that maps it into a scene tile.

use serde::{Deserialize, Serialize};

/// The category of a positioned object
///
/// Variant order is the order in which kinds are copied. Tiles come last so the
/// synthesized foreground tile sees the final stacking of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlaceableKind {
    #[serde(rename = "drawings")]
    Drawing,
    #[serde(rename = "walls")]
    Wall,
    #[serde(rename = "templates")]
    Template,
    #[serde(rename = "notes")]
    Note,
    #[serde(rename = "tokens")]
    Token,
    #[serde(rename = "sounds")]
    Sound,
    #[serde(rename = "lights")]
    Light,
    #[serde(rename = "tiles")]
    Tile,
}

/// Which composite transform a kind is moved with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    /// A single point, optionally facing a direction
    Point,
    /// A box whose `x, y` is the top-left corner and whose size is in pixels
    PointWidth,
    /// A box sized in grid cells rather than pixels
    PointWidthGrids,
    /// A flat list of polyline coordinates
    Wall,
}

/// Static description of one placeable layer
#[derive(Debug)]
pub struct LayerDef {
    pub kind: PlaceableKind,
    /// Name of the collection on a scene document
    pub collection: &'static str,
    /// Name of the embedded document class in the host store
    pub document_name: &'static str,
    pub transform: TransformKind,
    pub label: &'static str,
}

pub const LAYER_DEFS: [LayerDef; 8] = [
    LayerDef {
        kind: PlaceableKind::Drawing,
        collection: "drawings",
        document_name: "Drawing",
        transform: TransformKind::PointWidth,
        label: "Drawings",
    },
    LayerDef {
        kind: PlaceableKind::Wall,
        collection: "walls",
        document_name: "Wall",
        transform: TransformKind::Wall,
        label: "Walls",
    },
    // Templates only get the point transform; their cone angle and length are
    // copied untouched.
    LayerDef {
        kind: PlaceableKind::Template,
        collection: "templates",
        document_name: "MeasuredTemplate",
        transform: TransformKind::Point,
        label: "Measured Templates",
    },
    LayerDef {
        kind: PlaceableKind::Note,
        collection: "notes",
        document_name: "Note",
        transform: TransformKind::Point,
        label: "Journal Notes",
    },
    LayerDef {
        kind: PlaceableKind::Token,
        collection: "tokens",
        document_name: "Token",
        transform: TransformKind::PointWidthGrids,
        label: "Tokens",
    },
    LayerDef {
        kind: PlaceableKind::Sound,
        collection: "sounds",
        document_name: "AmbientSound",
        transform: TransformKind::Point,
        label: "Ambient Sounds",
    },
    LayerDef {
        kind: PlaceableKind::Light,
        collection: "lights",
        document_name: "AmbientLight",
        transform: TransformKind::Point,
        label: "Ambient Lights",
    },
    LayerDef {
        kind: PlaceableKind::Tile,
        collection: "tiles",
        document_name: "Tile",
        transform: TransformKind::PointWidth,
        label: "Tiles",
    },
];

impl PlaceableKind {
    pub const ALL: [PlaceableKind; 8] = [
        PlaceableKind::Drawing,
        PlaceableKind::Wall,
        PlaceableKind::Template,
        PlaceableKind::Note,
        PlaceableKind::Token,
        PlaceableKind::Sound,
        PlaceableKind::Light,
        PlaceableKind::Tile,
    ];

    /// The layer definition of this kind
    pub fn def(self) -> &'static LayerDef {
        &LAYER_DEFS[self as usize]
    }

    pub fn transform(self) -> TransformKind {
        self.def().transform
    }

    pub fn collection(self) -> &'static str {
        self.def().collection
    }
}

impl std::fmt::Display for PlaceableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.collection())
    }
}

impl std::str::FromStr for PlaceableKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LAYER_DEFS
            .iter()
            .find(|def| def.collection == s || def.document_name == s)
            .map(|def| def.kind)
            .ok_or_else(|| anyhow::anyhow!("Invalid placeable kind: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_defs_indexed_by_kind() {
        for kind in PlaceableKind::ALL {
            assert_eq!(kind.def().kind, kind);
        }
    }

    #[test]
    fn test_dispatch_table() {
        assert_eq!(PlaceableKind::Light.transform(), TransformKind::Point);
        assert_eq!(PlaceableKind::Template.transform(), TransformKind::Point);
        assert_eq!(PlaceableKind::Tile.transform(), TransformKind::PointWidth);
        assert_eq!(PlaceableKind::Drawing.transform(), TransformKind::PointWidth);
        assert_eq!(PlaceableKind::Token.transform(), TransformKind::PointWidthGrids);
        assert_eq!(PlaceableKind::Wall.transform(), TransformKind::Wall);
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("walls".parse::<PlaceableKind>().unwrap(), PlaceableKind::Wall);
        assert_eq!("AmbientLight".parse::<PlaceableKind>().unwrap(), PlaceableKind::Light);
        assert!("actors".parse::<PlaceableKind>().is_err());
    }

    #[test]
    fn test_kind_serializes_as_collection_name() {
        let json = serde_json::to_string(&PlaceableKind::Sound).unwrap();
        assert_eq!(json, "\"sounds\"");
    }
}
