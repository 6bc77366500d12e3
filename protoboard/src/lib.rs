use ark_ff::Field;

pub mod constraint_system;
pub mod error;
pub mod linear_combination;
pub mod matrices;
pub mod protoboard;
pub mod variable;

pub use constraint_system::{Constraint, ConstraintSystem};
pub use error::{ProtoboardError, Result};
pub use linear_combination::{LcIndex, LinearCombination};
pub use protoboard::Protoboard;
pub use variable::{VarIndex, Variable};

/// A reusable circuit-construction routine. Gadgets allocate variables
/// and constraints on a shared protoboard to express one sub-computation.
pub trait Circuit<F: Field> {
    fn synthesize(&self, pb: &mut Protoboard<F>) -> Result<()>;
}
