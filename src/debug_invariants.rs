//! Structural self-checks for mutable mesh state.
//!
//! Checks run automatically after mutations in debug builds and whenever the
//! `check-invariants` feature is enabled; release builds skip them unless a
//! caller invokes [`DebugInvariants::validate_invariants`] explicitly.

use crate::mesh_error::MeshError;

/// Trait for validating data structure invariants.
pub trait DebugInvariants {
    /// Validate invariants and return the first violation found.
    fn validate_invariants(&self) -> Result<(), MeshError>;

    /// Panic on the first violation when invariant checking is compiled in.
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(
            self.validate_invariants(),
            std::any::type_name::<Self>()
        );
    }
}

/// Run a fallible check and panic with context when invariant checking is
/// enabled. Expands to nothing otherwise.
#[macro_export]
macro_rules! debug_invariants {
    ($check:expr, $what:expr) => {
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        if let Err(e) = $check {
            panic!("[invariants] {} invalid: {}", $what, e);
        }
    };
}
