//! Scene description: the level data consumed by the simulation
//!
//! Levels are drawn in a vector editor and converted to JSON before they get
//! here. Coordinates are already in screen space (origin top-left, y down).
//!
//! ```json
//! {
//!   "orbs":  [{"pos": [640, 400], "charge": 1, "mass": 2,
//!              "is_fixed": true, "is_player": false}],
//!   "marks": [{"pos": [200, 400], "mark": "box", "stroke": "blue", "size": "normal"}],
//!   "goals": [[1000, 350, 80, 100]]
//! }
//! ```
//!
//! `orbs` carry explicit physical values. `marks` carry the drawing's category
//! tags (marker shape, stroke colour, marker size) and are resolved through
//! fixed tables. Both end up as the same orb list, explicit orbs first.

use std::fmt;
use std::io::Read;

use glam::Vec2;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Rect;

/// Errors raised while turning scene data into a simulation
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("malformed scene description: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("orb {index}: unknown {field} tag '{value}'")]
    UnknownTag {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("orb {index}: {reason}")]
    InvalidOrb { index: usize, reason: String },

    #[error("goal {index}: {reason}")]
    InvalidGoal { index: usize, reason: String },

    #[error("tick rate must be positive and finite, got {0}")]
    InvalidTickRate(f32),

    #[error("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f32 },
}

/// One orb with explicit physical values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbRecord {
    #[serde(alias = "position")]
    pub pos: Vec2,
    pub charge: f32,
    pub mass: f32,
    pub is_fixed: bool,
    pub is_player: bool,
    /// The level converter never writes velocities, so orbs start at rest
    #[serde(default)]
    pub velocity: Vec2,
}

impl OrbRecord {
    pub fn new(pos: Vec2, charge: f32, mass: f32, is_fixed: bool, is_player: bool) -> Self {
        Self {
            pos,
            charge,
            mass,
            is_fixed,
            is_player,
            velocity: Vec2::ZERO,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    fn validate(&self, index: usize) -> Result<(), SceneError> {
        let invalid = |reason: &str| SceneError::InvalidOrb {
            index,
            reason: reason.to_string(),
        };
        if !self.pos.is_finite() {
            return Err(invalid("position is not finite"));
        }
        if !self.velocity.is_finite() {
            return Err(invalid("velocity is not finite"));
        }
        if !self.charge.is_finite() {
            return Err(invalid("charge is not finite"));
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(invalid("mass must be positive and finite"));
        }
        Ok(())
    }
}

/// An orb described by the drawing's category tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkedOrb {
    #[serde(alias = "position")]
    pub pos: Vec2,
    /// Marker shape: decides the fixed and player flags
    pub mark: String,
    /// Stroke colour: decides the charge
    pub stroke: String,
    /// Marker size: decides the mass
    pub size: String,
    #[serde(default)]
    pub velocity: Vec2,
}

/// Marker shape -> (is_fixed, is_player)
pub fn mark_flags(mark: &str) -> Option<(bool, bool)> {
    match mark {
        "box" => Some((false, true)),
        "square" => Some((true, true)),
        "circle" => Some((false, false)),
        "disk" => Some((true, false)),
        _ => None,
    }
}

/// Stroke colour -> charge
pub fn stroke_charge(stroke: &str) -> Option<f32> {
    match stroke {
        "darkblue" => Some(-2.0),
        "blue" => Some(-1.0),
        "lightblue" => Some(-0.5),
        "pink" => Some(0.5),
        "red" => Some(1.0),
        "darkred" => Some(2.0),
        _ => None,
    }
}

/// Marker size -> mass
pub fn size_mass(size: &str) -> Option<f32> {
    match size {
        "large" => Some(2.0),
        "normal" => Some(1.0),
        "small" => Some(0.5),
        "tiny" => Some(0.25),
        _ => None,
    }
}

impl MarkedOrb {
    /// Resolve tags into an explicit record. `index` is the orb's position
    /// in the resolved list, used for error reporting.
    pub fn resolve(&self, index: usize) -> Result<OrbRecord, SceneError> {
        let unknown = |field: &'static str, value: &str| SceneError::UnknownTag {
            index,
            field,
            value: value.to_string(),
        };

        // Editors write marker names with a path prefix and a suffix,
        // e.g. "mark/box(sx)"
        let shape = self
            .mark
            .strip_prefix("mark/")
            .unwrap_or(&self.mark)
            .split('(')
            .next()
            .unwrap_or_default();

        let (is_fixed, is_player) =
            mark_flags(shape).ok_or_else(|| unknown("mark", self.mark.as_str()))?;
        let charge =
            stroke_charge(&self.stroke).ok_or_else(|| unknown("stroke", self.stroke.as_str()))?;
        let mass = size_mass(&self.size).ok_or_else(|| unknown("size", self.size.as_str()))?;

        Ok(OrbRecord {
            pos: self.pos,
            charge,
            mass,
            is_fixed,
            is_player,
            velocity: self.velocity,
        })
    }
}

/// A goal rectangle, either `[x, y, w, h]` or `{x, y, width, height}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GoalRecord {
    Corners([f32; 4]),
    Named(Rect),
}

// Picks the shape from the JSON itself so errors name the problem, rather
// than the generic "did not match any variant" of an untagged derive
impl<'de> Deserialize<'de> for GoalRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(GoalVisitor)
    }
}

struct GoalVisitor;

impl<'de> Visitor<'de> for GoalVisitor {
    type Value = GoalRecord;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a goal as [x, y, width, height] or {x, y, width, height}")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<GoalRecord, A::Error> {
        let mut corners = [0.0f32; 4];
        for (i, slot) in corners.iter_mut().enumerate() {
            *slot = seq
                .next_element()?
                .ok_or_else(|| de::Error::invalid_length(i, &self))?;
        }
        let mut len = corners.len();
        while seq.next_element::<de::IgnoredAny>()?.is_some() {
            len += 1;
        }
        if len != corners.len() {
            return Err(de::Error::invalid_length(len, &self));
        }
        Ok(GoalRecord::Corners(corners))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<GoalRecord, A::Error> {
        Rect::deserialize(de::value::MapAccessDeserializer::new(map)).map(GoalRecord::Named)
    }
}

impl From<GoalRecord> for Rect {
    fn from(goal: GoalRecord) -> Self {
        match goal {
            GoalRecord::Corners([x, y, w, h]) => Rect::new(x, y, w, h),
            GoalRecord::Named(rect) => rect,
        }
    }
}

/// A complete level: orbs and goals in screen space
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub orbs: Vec<OrbRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<MarkedOrb>,
    pub goals: Vec<GoalRecord>,
}

impl SceneDescription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orb(mut self, orb: OrbRecord) -> Self {
        self.orbs.push(orb);
        self
    }

    pub fn with_mark(mut self, mark: MarkedOrb) -> Self {
        self.marks.push(mark);
        self
    }

    pub fn with_goal(mut self, rect: Rect) -> Self {
        self.goals.push(GoalRecord::Named(rect));
        self
    }

    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SceneError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Every orb as an explicit record, explicit orbs first, then marks.
    /// Fails on the first unknown tag or invalid value. Errors number orbs by
    /// their position in this combined list.
    pub fn resolve_orbs(&self) -> Result<Vec<OrbRecord>, SceneError> {
        let mut records = self.orbs.clone();
        for mark in &self.marks {
            records.push(mark.resolve(records.len())?);
        }
        for (i, record) in records.iter().enumerate() {
            record.validate(i)?;
        }
        Ok(records)
    }

    /// Goal rectangles, checked for finite coordinates and non-negative extent
    pub fn goal_rects(&self) -> Result<Vec<Rect>, SceneError> {
        self.goals
            .iter()
            .enumerate()
            .map(|(index, goal)| {
                let rect = Rect::from(*goal);
                if rect.is_well_formed() {
                    Ok(rect)
                } else {
                    Err(SceneError::InvalidGoal {
                        index,
                        reason: format!("malformed rectangle {:?}", rect),
                    })
                }
            })
            .collect()
    }

    /// Check the whole scene without building anything
    pub fn validate(&self) -> Result<(), SceneError> {
        self.resolve_orbs()?;
        self.goal_rects()?;
        Ok(())
    }
}
