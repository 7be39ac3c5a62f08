//! Campaign module for picoscale-emu.
//!
//! Expands a campaign configuration into the ordered move/dwell actions of a
//! bidirectional multi-pass measurement sweep.

mod plan;

pub use plan::{Action, CampaignPlan, DwellKind, Pass, POINT_TOLERANCE};
