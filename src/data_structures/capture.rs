//! Captured room documents and the merged structure built from them.
//!
//! The types in here mirror the JSON a room-scanning session writes out: one
//! [`CapturedRoom`] per scan, each holding raw [`Surface`] detections grouped by
//! category. A [`CapturedStructure`] is the merged view over one or more rooms
//! and is what the scene builder consumes.
//!
//! Only the fields the viewer reads are typed. Everything else a document
//! carries (objects, sections, edge lists, ...) is kept verbatim in an `extra`
//! map so that decoding and re-encoding a document does not lose anything.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// What a surface is. Encoded as a single-key object, e.g. `{"wall":{}}` or
/// `{"door":{"isOpen":true}}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Wall {},
    Door {
        #[serde(rename = "isOpen", default)]
        is_open: bool,
    },
    Window {},
    Opening {},
    Floor {},
}

impl Category {
    pub fn kind(&self) -> SurfaceKind {
        match self {
            Category::Wall {} => SurfaceKind::Wall,
            Category::Door { .. } => SurfaceKind::Door,
            Category::Window {} => SurfaceKind::Window,
            Category::Opening {} => SurfaceKind::Opening,
            Category::Floor {} => SurfaceKind::Floor,
        }
    }
}

/// Category without its payload. Used as a key for styling and batching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SurfaceKind {
    Floor,
    Wall,
    Door,
    Opening,
    Window,
}

impl SurfaceKind {
    /// All kinds in the order the scene builder emits them.
    pub const ALL: [SurfaceKind; 5] = [
        SurfaceKind::Floor,
        SurfaceKind::Wall,
        SurfaceKind::Door,
        SurfaceKind::Opening,
        SurfaceKind::Window,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SurfaceKind::Floor => "floor",
            SurfaceKind::Wall => "wall",
            SurfaceKind::Door => "door",
            SurfaceKind::Opening => "opening",
            SurfaceKind::Window => "window",
        }
    }
}

impl std::fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Confidence {
    High {},
    Medium {},
    Low {},
}

/// A categorized planar element of a scan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Surface {
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    /// `x` is the width, `y` the height and `z` the (usually zero) depth.
    pub dimensions: [f32; 3],
    /// 4x4 matrix, column by column.
    pub transform: [f32; 16],
    #[serde(with = "uppercase_uuid")]
    pub identifier: Uuid,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "uppercase_uuid::option"
    )]
    pub parent_identifier: Option<Uuid>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Surface {
    pub fn new(category: Category, dimensions: [f32; 3], transform: [f32; 16]) -> Self {
        Self {
            category,
            confidence: None,
            dimensions,
            transform,
            identifier: Uuid::new_v4(),
            parent_identifier: None,
            extra: Map::new(),
        }
    }

    pub fn kind(&self) -> SurfaceKind {
        self.category.kind()
    }

    pub fn matrix(&self) -> cgmath::Matrix4<f32> {
        let t = &self.transform;
        cgmath::Matrix4::new(
            t[0], t[1], t[2], t[3], t[4], t[5], t[6], t[7], t[8], t[9], t[10], t[11], t[12],
            t[13], t[14], t[15],
        )
    }

    /// The identifier the way the capture framework prints it (upper-case, hyphenated).
    pub fn identifier_string(&self) -> String {
        self.identifier
            .hyphenated()
            .encode_upper(&mut Uuid::encode_buffer())
            .to_string()
    }
}

/// One scan as written by the capture framework.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedRoom {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "uppercase_uuid::option"
    )]
    pub identifier: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default)]
    pub walls: Vec<Surface>,
    #[serde(default)]
    pub doors: Vec<Surface>,
    #[serde(default)]
    pub windows: Vec<Surface>,
    #[serde(default)]
    pub openings: Vec<Surface>,
    /// Older documents don't carry floors at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floors: Option<Vec<Surface>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CapturedRoom {
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    pub fn to_vec(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn floors(&self) -> &[Surface] {
        self.floors.as_deref().unwrap_or_default()
    }

    pub fn surface_count(&self) -> usize {
        self.walls.len()
            + self.doors.len()
            + self.windows.len()
            + self.openings.len()
            + self.floors().len()
    }
}

/// Merged structure over one or more captured rooms.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CapturedStructure {
    pub walls: Vec<Surface>,
    pub doors: Vec<Surface>,
    pub windows: Vec<Surface>,
    pub openings: Vec<Surface>,
    pub floors: Vec<Surface>,
}

impl CapturedStructure {
    pub fn surfaces(&self, kind: SurfaceKind) -> &[Surface] {
        match kind {
            SurfaceKind::Floor => &self.floors,
            SurfaceKind::Wall => &self.walls,
            SurfaceKind::Door => &self.doors,
            SurfaceKind::Opening => &self.openings,
            SurfaceKind::Window => &self.windows,
        }
    }

    pub(crate) fn surfaces_mut(&mut self, kind: SurfaceKind) -> &mut Vec<Surface> {
        match kind {
            SurfaceKind::Floor => &mut self.floors,
            SurfaceKind::Wall => &mut self.walls,
            SurfaceKind::Door => &mut self.doors,
            SurfaceKind::Opening => &mut self.openings,
            SurfaceKind::Window => &mut self.windows,
        }
    }

    pub fn surface_count(&self) -> usize {
        SurfaceKind::ALL
            .iter()
            .map(|kind| self.surfaces(*kind).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.surface_count() == 0
    }
}

/// The capture framework writes identifiers upper-case; `uuid` would write them lower-case.
mod uppercase_uuid {
    use serde::{Deserialize, Deserializer, Serializer};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(id: &Uuid, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(id.hyphenated().encode_upper(&mut Uuid::encode_buffer()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
        Uuid::deserialize(deserializer)
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use uuid::Uuid;

        pub fn serialize<S: Serializer>(id: &Option<Uuid>, serializer: S) -> Result<S::Ok, S::Error> {
            match id {
                Some(id) => super::serialize(id, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Uuid>, D::Error> {
            Option::<Uuid>::deserialize(deserializer)
        }
    }
}
