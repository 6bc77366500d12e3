use ark_std::collections::BTreeMap;
use ark_std::string::String;
use ark_std::vec::Vec;

use ark_ff::Field;

use crate::error::{ProtoboardError, Result};
use crate::linear_combination::LinearCombination;
use crate::matrices::{R1CSMatrices, SparseMatrices};
use crate::variable::VarIndex;

/// A single rank-1 constraint `a * b = c`.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint<F: Field> {
    pub a: LinearCombination<F>,
    pub b: LinearCombination<F>,
    pub c: LinearCombination<F>,
    // Diagnostic only, never affects satisfaction.
    pub annotation: String,
}

impl<F: Field> Constraint<F> {
    pub fn new(
        a: impl Into<LinearCombination<F>>,
        b: impl Into<LinearCombination<F>>,
        c: impl Into<LinearCombination<F>>,
    ) -> Self {
        Constraint {
            a: a.into(),
            b: b.into(),
            c: c.into(),
            annotation: String::new(),
        }
    }
}

/// The accumulated constraint system: an ordered list of constraints plus
/// the primary/auxiliary split point over the allocated variables.
/// Variables `1..=primary_input_size` are the primary (public) input, the
/// rest are auxiliary.
#[derive(Clone, Debug)]
pub struct ConstraintSystem<F: Field> {
    // The constraints, in insertion order.
    pub constraints: Vec<Constraint<F>>,
    // The number of primary input variables.
    pub primary_input_size: usize,
    // The number of allocated variables, excluding the constant wire.
    pub num_variables: usize,
    // Per-variable annotations, diagnostic only.
    pub variable_annotations: BTreeMap<VarIndex, String>,
}

impl<F: Field> ConstraintSystem<F> {
    pub fn new() -> Self {
        ConstraintSystem {
            constraints: vec![],
            primary_input_size: 0,
            num_variables: 0,
            variable_annotations: BTreeMap::new(),
        }
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn set_input_sizes(&mut self, primary_input_size: usize) -> Result<()> {
        if primary_input_size > self.num_variables {
            return Err(ProtoboardError::InvalidOperation(
                "primary input size exceeds the number of allocated variables",
            ));
        }

        self.primary_input_size = primary_input_size;
        Ok(())
    }

    /// Checks every constraint against a full variable assignment (the
    /// constant wire excluded). Returns `Ok(false)` on the first failing
    /// constraint; a term referencing an unallocated variable is an error.
    pub fn is_satisfied(&self, full_assignment: &[F]) -> Result<bool> {
        for constraint in self.constraints.iter() {
            let a = constraint.a.eval(full_assignment)?;
            let b = constraint.b.eval(full_assignment)?;
            let c = constraint.c.eval(full_assignment)?;

            if a * b != c {
                tracing::debug!(
                    annotation = constraint.annotation.as_str(),
                    "constraint not satisfied"
                );
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Exports the constraints as sparse A, B, C matrices over the vector
    /// `[1] ++ full_assignment`: column 0 is the constant wire, column `i`
    /// the variable with index `i`.
    pub fn to_sparse_matrices(&self) -> R1CSMatrices<SparseMatrices<F>> {
        let columns = self.num_variables + 1;

        let flatten = |lc: &LinearCombination<F>| -> Vec<(VarIndex, F)> {
            lc.terms()
                .iter()
                .map(|(var, coeff)| (var.index(), *coeff))
                .collect()
        };

        let mut a = vec![];
        let mut b = vec![];
        let mut c = vec![];

        for constraint in self.constraints.iter() {
            a.push(flatten(&constraint.a));
            b.push(flatten(&constraint.b));
            c.push(flatten(&constraint.c));
        }

        R1CSMatrices {
            a: SparseMatrices(a),
            b: SparseMatrices(b),
            c: SparseMatrices(c),
            num_columns: columns,
        }
    }
}

impl<F: Field> Default for ConstraintSystem<F> {
    fn default() -> Self {
        Self::new()
    }
}
