//! Elemental Core - catalog model for the recipe path finder
//!
//! This crate provides the element/recipe model, the tier progression
//! rule, path types, and the progress and cancellation primitives shared
//! by every search.

pub mod cancel;
pub mod database;
pub mod element;
pub mod error;
pub mod limits;
pub mod path;
pub mod progress;
pub mod tier;

pub use cancel::{CancelGuard, CancelToken};
pub use database::{ElementId, ElementsDatabase, Producer};
pub use element::{
    default_start_elements, is_basic_name, normalize_pair, Element, Recipe, RecipeStep,
    StepSignature, BASIC_ELEMENTS,
};
pub use error::{Error, Result};
pub use limits::ValidationError;
pub use path::{Gap, Path};
pub use progress::{ProgressSink, SearchProgress};
pub use tier::{parse_tier, TierPolicy, STARTING_TIER_LABEL, UNRANKED_TIER};
