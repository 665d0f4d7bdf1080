mod batch;
mod collision;
mod executor;
mod name_builder;
mod types;

pub use batch::{rename_targets, RenameJob};
pub use collision::{disambiguate, numbered_path, resolve_target, ClaimedPaths, MAX_DISAMBIGUATION};
pub use executor::{RenameError, RenameOptions, Renamer};
pub use name_builder::{
    compose, render_episode_number, Field, FieldToken, FieldValues, OutputSpec, DEFAULT_PADDING,
    FILLER_MARKER,
};
pub use types::{FileError, RenameOperation, RenameResult, RenameStatus};
