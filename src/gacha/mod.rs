pub mod builder;
pub mod catalogue;
pub mod engine;
pub mod item;
pub mod session;

pub use builder::{TierCounts, build_pool, build_pool_with_noun};
pub use catalogue::{TemplateDefinition, find_system_template, system_templates};
pub use engine::{DrawResult, draw, draw_with_rng, draw_with_unit, reset, sampling_weight};
pub use item::{PrizeItem, PrizePool, Tier};
pub use session::{Session, SessionState, deserialize, serialize};
