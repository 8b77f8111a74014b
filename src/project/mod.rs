//! Translation of a resolved content table into stage and sprite targets.

pub mod target;
pub mod translate;

pub use target::{RotationStyle, ScalarValue, Script, Target, Variable, VariableKind};
pub use translate::ProjectTranslator;
