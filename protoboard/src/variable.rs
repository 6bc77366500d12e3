use ark_std::ops::*;

use ark_ff::Field;

use crate::linear_combination::LinearCombination;

/// Variable index
pub type VarIndex = usize;

/// A handle to one wire of the circuit. Index 0 is the reserved constant-1
/// wire; allocated variables carry indices starting at 1. Only the
/// protoboard mints non-constant variables.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Variable(VarIndex);

impl Variable {
    /// The constant-1 wire.
    pub const ONE: Variable = Variable(0);

    pub(crate) fn new(index: VarIndex) -> Self {
        Variable(index)
    }

    #[inline]
    pub fn index(&self) -> VarIndex {
        self.0
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        self.0 == 0
    }
}

impl<F: Field> Add<LinearCombination<F>> for Variable {
    type Output = LinearCombination<F>;

    #[inline]
    fn add(self, rhs: LinearCombination<F>) -> Self::Output {
        LinearCombination::from(self) + rhs
    }
}

impl<F: Field> Sub<LinearCombination<F>> for Variable {
    type Output = LinearCombination<F>;

    fn sub(self, rhs: LinearCombination<F>) -> Self::Output {
        LinearCombination::from(self) - rhs
    }
}

impl<F: Field> Mul<F> for Variable {
    type Output = LinearCombination<F>;

    #[inline]
    fn mul(self, coeff: F) -> Self::Output {
        LinearCombination::from_terms(vec![(self, coeff)])
    }
}
