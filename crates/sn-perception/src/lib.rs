//! `sn-perception`: can this guard see the target right now?
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`sampler`]   | `VisibilitySampler`, `Samples`, `SpacedSamples`           |
//! | [`strategy`]  | `PerceptionStrategy` and its parameter structs            |
//! | [`head_turn`] | `HeadTurn` oscillation state, `HeadTurnConfig`            |
//! | [`sight`]     | `SightCone`: deterministic peer / resource detection      |
//! | [`engine`]    | `PerceptionEngine`, `PerceptionResult`, `process_samples` |
//!
//! The engine writes its verdict into the agent's `AgentMemory`, so the
//! controller reads the same three signals (`target_visible`,
//! `visible_confidence`, suspicion) whichever strategy is active.

pub mod engine;
pub mod head_turn;
pub mod sampler;
pub mod sight;
pub mod strategy;


pub use engine::{
    PerceptionContext, PerceptionEngine, PerceptionResult, SampleOutcome, Target, process_samples,
};
pub use head_turn::{HeadTurn, HeadTurnConfig};
pub use sampler::{SPACING_ATTEMPTS, Sample, Samples, SpacedSamples, VisibilitySampler, confidence_at};
pub use sight::SightCone;
pub use strategy::{PerceptionStrategy, ProbabilisticParams, SimpleRadiusParams, VisionConeParams};
