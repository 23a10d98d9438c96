//! Slicing game state and entity types
//!
//! Everything a frame needs to draw lives here; the engine is the only writer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::gesture::GestureTrail;

/// Current phase of a slicing round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlicePhase {
    /// Active gameplay
    Playing,
    /// Round ended; only an explicit reset starts a new one
    Over,
}

/// Why the round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    Time,
    Hazard,
}

/// Entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Slicing it ends the round
    Hazard,
    /// Slicing it scores
    Target,
    /// Visual-only fragments, never collidable
    Debris,
}

impl ObjectKind {
    pub fn is_sliceable(&self) -> bool {
        !matches!(self, ObjectKind::Debris)
    }
}

/// A simulated object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimObject {
    pub id: u32,
    pub kind: ObjectKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Sliced this pass; culled before the next physics step
    pub consumed: bool,
    /// Engine clock (ms) at creation
    pub spawn_ms: f64,
}

impl SimObject {
    pub fn new(
        id: u32,
        kind: ObjectKind,
        pos: Vec2,
        vel: Vec2,
        radius: f32,
        spawn_ms: f64,
    ) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            radius,
            consumed: false,
            spawn_ms,
        }
    }

    /// Still a candidate for swipe collision
    pub fn is_live_sliceable(&self) -> bool {
        self.kind.is_sliceable() && !self.consumed
    }
}

/// Complete round state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliceState {
    pub phase: SlicePhase,
    pub score: u64,
    /// Whole seconds left on the round clock
    pub time_remaining: u32,
    /// Set once the round is over
    pub end_reason: Option<EndReason>,
    /// Active objects (sorted by id)
    pub objects: Vec<SimObject>,
    /// Pointer stroke (visual trail + collision segment)
    pub trail: GestureTrail,
    /// Play area (pixels)
    pub width: f32,
    pub height: f32,
    /// Next entity ID
    next_id: u32,
}

impl SliceState {
    pub fn new(round_seconds: u32, width: f32, height: f32) -> Self {
        Self {
            phase: SlicePhase::Playing,
            score: 0,
            time_remaining: round_seconds,
            end_reason: None,
            objects: Vec::new(),
            trail: GestureTrail::default(),
            width,
            height,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_playing(&self) -> bool {
        self.phase == SlicePhase::Playing
    }

    /// Number of objects of one kind
    pub fn count(&self, kind: ObjectKind) -> usize {
        self.objects.iter().filter(|o| o.kind == kind).count()
    }
}
