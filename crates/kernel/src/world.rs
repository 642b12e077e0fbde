use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use worldforge_common::Position;

/// The authoritative mapping of placed structures.
///
/// Each occupied position holds exactly one structure name. All mutations go
/// through [`World::place`] and [`World::remove`].
///
/// Uses BTreeMap so serialization order is stable: flushing the same world
/// twice produces identical bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct World {
    structures: BTreeMap<Position, String>,
}

impl World {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of placed structures.
    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    /// Place a structure, replacing whatever was at `position`.
    /// Returns the replaced structure name, if any.
    pub fn place(&mut self, position: Position, structure: impl Into<String>) -> Option<String> {
        self.structures.insert(position, structure.into())
    }

    /// Remove the structure at `position`. Returns its name if it existed.
    pub fn remove(&mut self, position: Position) -> Option<String> {
        self.structures.remove(&position)
    }

    pub fn get(&self, position: Position) -> Option<&str> {
        self.structures.get(&position).map(String::as_str)
    }
}

/// A document that names the same position twice is rejected rather than
/// letting the later entry silently replace the earlier one.
impl<'de> Deserialize<'de> for World {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(WorldVisitor)
    }
}

struct WorldVisitor;

impl<'de> Visitor<'de> for WorldVisitor {
    type Value = World;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of \"x,y,z\" keys to structure names")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<World, A::Error> {
        let mut structures = BTreeMap::new();
        while let Some((position, structure)) = map.next_entry::<Position, String>()? {
            if structures.insert(position, structure).is_some() {
                return Err(de::Error::custom(format_args!(
                    "duplicate position {position}"
                )));
            }
        }
        Ok(World { structures })
    }
}
