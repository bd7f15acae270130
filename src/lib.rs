pub mod api;
pub mod config;
pub mod engine;
pub mod util;

pub use engine::action::ScorerAction;
pub use engine::bases::{BaseAdvancementTracker, BaseSet};
pub use engine::count::{CountState, StrikeKind};
pub use engine::outcome::{canonical_code, classify, Category, Color, Outcome, WhyCode};
pub use engine::record::{PlateAppearanceKey, PlateAppearanceRecord, Snapshot};
