//! Planner Module
//!
//! Turns subjects and a planning window into study sessions:
//! - Hour distribution by difficulty
//! - Exam-aware day-by-day session placement
//! - Timeline views (per-day grouping, progress, cascading removal)

mod distributor;
mod session;
pub mod timeline;

pub use distributor::{distribute_hours, distribute_weighted};
pub use session::{
    generate_schedule, DistributedPlacement, PlanError, PlanRequest, PlannerConfig, Result,
    SessionPlanner,
};
pub use timeline::ScheduleProgress;
