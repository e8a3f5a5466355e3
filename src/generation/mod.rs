//! Generation module - rarity draw and the generate pipeline

pub mod pipeline;
pub mod rarity;

pub use pipeline::{GeneratedCard, GenerationPipeline};
pub use rarity::{assign_rarity, Rarity};
