pub mod tier_ctx;
pub mod tier_generation;
pub mod tier_selection;

pub use tier_ctx::TierCtx;
pub use tier_generation::TierGeneration;
pub use tier_selection::{sample_without_replacement, TierSelection};
