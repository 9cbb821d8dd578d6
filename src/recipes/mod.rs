pub mod dto;
pub mod normalize;
pub mod raw;

pub use dto::{CategoryCard, Recipe};
pub use normalize::{normalize, normalize_all, split_instructions};
pub use raw::{RawCategory, RawMealRecord};
