//! Teaching-group taxonomy.
//!
//! # Responsibility
//! - Define the fixed macro-group -> room-group -> turn-group hierarchy and
//!   its canonical enumeration order.
//! - Provide the authoritative override table mapping identifiers to
//!   expected macro-groups.
//!
//! # Invariants
//! - Enumeration order is stable: macro-group order, then room, then turn.
//! - `TurnGroup::index` is dense over `0..TurnGroup::COUNT`.
//! - An override entry always wins over the modular default rule.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use crate::model::student::{parse_identifier, StudentId, StudentRowError};

/// Rooms available to every macro-group.
pub const ROOMS_PER_MACRO_GROUP: u8 = 3;
/// Turns scheduled in every room.
pub const TURNS_PER_ROOM_GROUP: u8 = 2;
/// Leaf groups under one macro-group.
pub const TURN_GROUPS_PER_MACRO_GROUP: usize =
    (ROOMS_PER_MACRO_GROUP * TURNS_PER_ROOM_GROUP) as usize;

/// Top-level cohort label.
///
/// Declaration order is the canonical enumeration order used for
/// deterministic tie-breaking during assignment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum MacroGroup {
    A1,
    B1,
    A2,
    B2,
}

impl MacroGroup {
    /// Cohort labels in canonical enumeration order.
    pub const ALL: [MacroGroup; 4] = [
        MacroGroup::A1,
        MacroGroup::B1,
        MacroGroup::A2,
        MacroGroup::B2,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::B1 => "B1",
            Self::A2 => "A2",
            Self::B2 => "B2",
        }
    }

    pub fn parse(value: &str) -> Option<MacroGroup> {
        match value.trim() {
            "A1" => Some(Self::A1),
            "B1" => Some(Self::B1),
            "A2" => Some(Self::A2),
            "B2" => Some(Self::B2),
            _ => None,
        }
    }

    /// Expected cohort for an identifier with no override entry.
    pub fn default_for(identifier: StudentId) -> MacroGroup {
        Self::ALL[(identifier % Self::ALL.len() as StudentId) as usize]
    }

    fn position(self) -> usize {
        self as usize
    }

    /// The room-groups under this cohort, in enumeration order.
    pub fn room_groups(self) -> [RoomGroup; ROOMS_PER_MACRO_GROUP as usize] {
        let mut groups = [RoomGroup {
            macro_group: self,
            room: 1,
        }; ROOMS_PER_MACRO_GROUP as usize];
        for (offset, group) in groups.iter_mut().enumerate() {
            group.room = offset as u8 + 1;
        }
        groups
    }

    /// The turn-groups under this cohort, in enumeration order.
    pub fn turn_groups(self) -> [TurnGroup; TURN_GROUPS_PER_MACRO_GROUP] {
        let mut groups = [TurnGroup {
            macro_group: self,
            room: 1,
            turn: 1,
        }; TURN_GROUPS_PER_MACRO_GROUP];
        for (offset, group) in groups.iter_mut().enumerate() {
            group.room = (offset / TURNS_PER_ROOM_GROUP as usize) as u8 + 1;
            group.turn = (offset % TURNS_PER_ROOM_GROUP as usize) as u8 + 1;
        }
        groups
    }
}

impl Display for MacroGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A macro-group subdivided by physical room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomGroup {
    macro_group: MacroGroup,
    room: u8,
}

impl RoomGroup {
    /// All room-groups in canonical enumeration order.
    pub fn all() -> impl Iterator<Item = RoomGroup> {
        MacroGroup::ALL.into_iter().flat_map(MacroGroup::room_groups)
    }

    pub fn macro_group(self) -> MacroGroup {
        self.macro_group
    }

    pub fn room(self) -> u8 {
        self.room
    }

    /// The two turn-groups under this room, in enumeration order.
    pub fn turn_groups(self) -> [TurnGroup; TURNS_PER_ROOM_GROUP as usize] {
        let mut groups = [TurnGroup {
            macro_group: self.macro_group,
            room: self.room,
            turn: 1,
        }; TURNS_PER_ROOM_GROUP as usize];
        for (offset, group) in groups.iter_mut().enumerate() {
            group.turn = offset as u8 + 1;
        }
        groups
    }
}

impl Display for RoomGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.macro_group, self.room)
    }
}

/// A room-group subdivided by time slot; the final assignment unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurnGroup {
    macro_group: MacroGroup,
    room: u8,
    turn: u8,
}

impl TurnGroup {
    /// Total number of leaf groups in the taxonomy.
    pub const COUNT: usize = MacroGroup::ALL.len() * TURN_GROUPS_PER_MACRO_GROUP;

    /// Builds a turn-group from explicit coordinates.
    ///
    /// Returns `None` when room or turn fall outside the fixed hierarchy.
    pub fn new(macro_group: MacroGroup, room: u8, turn: u8) -> Option<TurnGroup> {
        if room < 1 || room > ROOMS_PER_MACRO_GROUP || turn < 1 || turn > TURNS_PER_ROOM_GROUP {
            return None;
        }
        Some(TurnGroup {
            macro_group,
            room,
            turn,
        })
    }

    /// All turn-groups in canonical enumeration order.
    pub fn all() -> impl Iterator<Item = TurnGroup> {
        MacroGroup::ALL.into_iter().flat_map(MacroGroup::turn_groups)
    }

    pub fn macro_group(self) -> MacroGroup {
        self.macro_group
    }

    pub fn room_group(self) -> RoomGroup {
        RoomGroup {
            macro_group: self.macro_group,
            room: self.room,
        }
    }

    pub fn turn(self) -> u8 {
        self.turn
    }

    /// Dense position in canonical enumeration order.
    pub fn index(self) -> usize {
        self.macro_group.position() * TURN_GROUPS_PER_MACRO_GROUP
            + (self.room - 1) as usize * TURNS_PER_ROOM_GROUP as usize
            + (self.turn - 1) as usize
    }

    /// Parses a `{macro}-{room}-{turn}` label.
    pub fn parse(value: &str) -> Option<TurnGroup> {
        let mut parts = value.trim().split('-');
        let macro_group = MacroGroup::parse(parts.next()?)?;
        let room = parts.next()?.parse().ok()?;
        let turn = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Self::new(macro_group, room, turn)
    }
}

impl Display for TurnGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.macro_group, self.room, self.turn)
    }
}

impl Serialize for TurnGroup {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TurnGroup {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        TurnGroup::parse(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid turn-group label `{label}`")))
    }
}

/// Raw override row as supplied by the tabular adapter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawOverrideRow {
    #[serde(deserialize_with = "crate::model::student::identifier_text")]
    pub identifier: String,
    pub group: String,
}

/// Authoritative identifier -> expected cohort table.
///
/// Passed explicitly into roster construction; its lifecycle is one run and
/// there is no process-wide table.
#[derive(Debug, Clone, Default)]
pub struct GroupOverrides {
    entries: HashMap<StudentId, MacroGroup>,
}

impl GroupOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table from raw adapter rows.
    ///
    /// # Errors
    /// - `StudentRowError` when an identifier or group label cannot be
    ///   parsed; the table is authoritative input and a malformed entry is
    ///   fatal.
    pub fn from_rows(
        rows: impl IntoIterator<Item = RawOverrideRow>,
    ) -> Result<Self, StudentRowError> {
        let mut overrides = Self::new();
        for row in rows {
            let identifier = parse_identifier(&row.identifier)?;
            let group = MacroGroup::parse(&row.group)
                .ok_or_else(|| StudentRowError::UnknownMacroGroup(row.group.clone()))?;
            overrides.insert(identifier, group);
        }
        Ok(overrides)
    }

    pub fn insert(&mut self, identifier: StudentId, group: MacroGroup) {
        self.entries.insert(identifier, group);
    }

    pub fn get(&self, identifier: StudentId) -> Option<MacroGroup> {
        self.entries.get(&identifier).copied()
    }

    /// Expected cohort: the override when present, else the modular default.
    pub fn expected_group(&self, identifier: StudentId) -> MacroGroup {
        self.get(identifier)
            .unwrap_or_else(|| MacroGroup::default_for(identifier))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
