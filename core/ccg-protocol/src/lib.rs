#![no_std] // Shared by the engine and the offline tools

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(feature = "std")]
extern crate std;

pub mod ids;
pub mod preposition;
pub mod roles;

// Re-export core types for convenience
pub use ids::{SemanticRole, VarId, WordIndex};
pub use preposition::Preposition;
pub use roles::{RoleRegistry, RoleTable};

pub mod model;
pub use model::*;
