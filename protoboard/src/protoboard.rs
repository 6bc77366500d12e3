use ark_std::string::{String, ToString};
use ark_std::vec::Vec;

use ark_ff::Field;

use crate::constraint_system::{Constraint, ConstraintSystem};
use crate::error::{ProtoboardError, Result};
use crate::linear_combination::{LcIndex, LinearCombination};
use crate::variable::Variable;

/// The circuit builder and evaluator. Gadgets share one protoboard: they
/// allocate variables on it, assign witness values, and append rank-1
/// constraints; at the end the finished constraint system and the
/// primary/auxiliary assignment views are extracted for the proving
/// system.
///
/// Variable indices are external and 1-based; `values[0]` holds the first
/// allocated variable, not the constant 1, which lives outside the array.
pub struct Protoboard<F: Field> {
    // Always one. Kept so val(ONE) has something to return.
    constant_term: F,
    values: Vec<F>,
    next_free_variable_index: usize,
    next_free_linear_combination_index: usize,
    // Memoized values of cached linear combinations, indexed by cache tag.
    linear_combination_values: Vec<F>,
    constraint_system: ConstraintSystem<F>,
}

impl<F: Field> Protoboard<F> {
    pub fn new() -> Self {
        Protoboard {
            constant_term: F::one(),
            values: vec![],
            next_free_variable_index: 1,
            next_free_linear_combination_index: 0,
            linear_combination_values: vec![],
            constraint_system: ConstraintSystem::new(),
        }
    }

    /// Mints a fresh variable. Indices are issued strictly increasing and
    /// never reused, so earlier-built linear combinations stay valid
    /// across later allocations. The new slot starts at zero.
    pub fn allocate_variable(&mut self, annotation: &str) -> Variable {
        let index = self.next_free_variable_index;
        self.next_free_variable_index += 1;
        self.values.push(F::zero());
        self.constraint_system.num_variables += 1;

        if !annotation.is_empty() {
            self.constraint_system
                .variable_annotations
                .insert(index, annotation.to_string());
        }

        Variable::new(index)
    }

    fn allocate_linear_combination_index(&mut self) -> LcIndex {
        let index = self.next_free_linear_combination_index;
        self.next_free_linear_combination_index += 1;
        self.linear_combination_values.push(F::zero());

        index
    }

    /// Tags `lc` with a slot of the evaluation cache. The tag is assigned
    /// once; calling this again on an already-cached combination returns
    /// the existing tag.
    pub fn cache_linear_combination(&mut self, lc: &mut LinearCombination<F>) -> LcIndex {
        match lc.cache_index() {
            Some(index) => index,
            None => {
                let index = self.allocate_linear_combination_index();
                lc.set_cache_index(index);
                index
            }
        }
    }

    /// Evaluates a cached combination on demand and stores the result in
    /// its cache slot.
    pub fn evaluate_linear_combination(&mut self, lc: &LinearCombination<F>) -> Result<()> {
        let index = lc.cache_index().ok_or(ProtoboardError::InvalidOperation(
            "cannot evaluate an uncached linear combination into the cache",
        ))?;
        let value = lc.eval(&self.values)?;

        self.set_cache_slot(index, value)
    }

    // The single external-index to storage-slot translation. Index 0 is
    // the constant wire and has no slot.
    fn storage_slot(&self, var: Variable) -> Result<usize> {
        let index = var.index();
        if index >= self.next_free_variable_index {
            return Err(ProtoboardError::OutOfRange {
                index,
                allocated: self.num_variables(),
            });
        }

        debug_assert!(index >= 1);
        Ok(index - 1)
    }

    fn set_cache_slot(&mut self, index: LcIndex, value: F) -> Result<()> {
        if index >= self.next_free_linear_combination_index {
            return Err(ProtoboardError::OutOfRange {
                index,
                allocated: self.next_free_linear_combination_index,
            });
        }

        self.linear_combination_values[index] = value;
        Ok(())
    }

    /// Reads the value of a variable. The constant wire always reads as
    /// one.
    pub fn val(&self, var: Variable) -> Result<F> {
        if var.is_constant() {
            return Ok(self.constant_term);
        }

        let slot = self.storage_slot(var)?;
        Ok(self.values[slot])
    }

    /// Assigns a value to a variable. Writing the constant wire is a
    /// usage error.
    pub fn set_val(&mut self, var: Variable, value: F) -> Result<()> {
        if var.is_constant() {
            return Err(ProtoboardError::InvalidOperation(
                "the constant variable is read-only",
            ));
        }

        let slot = self.storage_slot(var)?;
        self.values[slot] = value;
        Ok(())
    }

    /// Reads the value of a linear combination. A cached combination reads
    /// its cache slot directly, trusting the caller to have populated it;
    /// an uncached one is evaluated on demand against the current
    /// assignment.
    pub fn lc_val(&self, lc: &LinearCombination<F>) -> Result<F> {
        match lc.cache_index() {
            Some(index) => {
                if index >= self.next_free_linear_combination_index {
                    return Err(ProtoboardError::OutOfRange {
                        index,
                        allocated: self.next_free_linear_combination_index,
                    });
                }
                Ok(self.linear_combination_values[index])
            }
            None => lc.eval(&self.values),
        }
    }

    /// Writes the cache slot of a cached combination. An uncached
    /// combination has nowhere durable to store the value and is rejected.
    pub fn set_lc_val(&mut self, lc: &LinearCombination<F>, value: F) -> Result<()> {
        let index = lc.cache_index().ok_or(ProtoboardError::InvalidOperation(
            "only cached linear combinations are writable",
        ))?;

        self.set_cache_slot(index, value)
    }

    /// Zeroes every variable slot, keeping allocation counters, the cache
    /// and the constraint system intact. Lets one board's structure be
    /// reused across witness evaluations.
    pub fn clear_values(&mut self) {
        for v in self.values.iter_mut() {
            *v = F::zero();
        }
    }

    /// Appends a constraint. Term indices are not validated here;
    /// references to variables that are never allocated surface as errors
    /// at satisfaction-check time.
    pub fn add_r1cs_constraint(&mut self, mut constraint: Constraint<F>, annotation: &str) {
        constraint.annotation = annotation.to_string();
        self.constraint_system.constraints.push(constraint);
    }

    pub fn augment_variable_annotation(&mut self, var: Variable, postfix: &str) {
        self.constraint_system
            .variable_annotations
            .entry(var.index())
            .or_default()
            .push_str(postfix);
    }

    /// Sets the primary/auxiliary split point. Call after all primary
    /// input variables are allocated.
    pub fn set_input_sizes(&mut self, primary_input_size: usize) -> Result<()> {
        self.constraint_system.set_input_sizes(primary_input_size)
    }

    /// Evaluates every constraint, in insertion order, against the current
    /// assignment. `Ok(false)` on the first failing constraint; the cache
    /// is never consulted, each combination is evaluated from its terms.
    pub fn is_satisfied(&self) -> Result<bool> {
        self.constraint_system.is_satisfied(&self.values)
    }

    /// Logs every variable with its annotation and current value.
    /// Diagnostic only.
    pub fn dump_variables(&self) {
        for (i, value) in self.values.iter().enumerate() {
            let index = i + 1;
            let annotation = self
                .constraint_system
                .variable_annotations
                .get(&index)
                .map(String::as_str)
                .unwrap_or("");
            tracing::debug!(index, annotation, %value, "variable");
        }
    }

    pub fn num_constraints(&self) -> usize {
        self.constraint_system.num_constraints()
    }

    pub fn num_inputs(&self) -> usize {
        self.constraint_system.primary_input_size
    }

    pub fn num_variables(&self) -> usize {
        self.next_free_variable_index - 1
    }

    /// The full assignment in allocation order, the constant wire
    /// excluded.
    pub fn full_variable_assignment(&self) -> Vec<F> {
        self.values.clone()
    }

    pub fn primary_input(&self) -> Vec<F> {
        self.values[..self.constraint_system.primary_input_size].to_vec()
    }

    pub fn auxiliary_input(&self) -> Vec<F> {
        self.values[self.constraint_system.primary_input_size..].to_vec()
    }

    /// Read-only structural export for the downstream proving system.
    pub fn constraint_system(&self) -> &ConstraintSystem<F> {
        &self.constraint_system
    }
}

impl<F: Field> Default for Protoboard<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::{One, Zero};
    use sample_field::{BN254Fr, F101};

    #[test]
    fn test_index_monotonicity() {
        let mut pb = Protoboard::<BN254Fr>::new();
        assert_eq!(pb.num_variables(), 0);

        let mut last = 0;
        for n in 1..=100 {
            let var = pb.allocate_variable("");
            assert!(var.index() > last);
            last = var.index();
            assert_eq!(pb.num_variables(), n);
        }
    }

    #[test]
    fn test_constant_immutability() {
        let mut pb = Protoboard::<F101>::new();
        assert_eq!(pb.val(Variable::ONE).unwrap(), F101::one());

        assert_eq!(
            pb.set_val(Variable::ONE, F101::from(3u8)),
            Err(ProtoboardError::InvalidOperation(
                "the constant variable is read-only"
            ))
        );
        assert_eq!(pb.val(Variable::ONE).unwrap(), F101::one());
    }

    #[test]
    fn test_val_out_of_range() {
        let mut pb = Protoboard::<F101>::new();
        let x = pb.allocate_variable("x");
        pb.set_val(x, F101::from(7u8)).unwrap();
        assert_eq!(pb.val(x).unwrap(), F101::from(7u8));

        let stray = Variable::new(2);
        assert_eq!(
            pb.val(stray),
            Err(ProtoboardError::OutOfRange {
                index: 2,
                allocated: 1
            })
        );
    }

    #[test]
    fn test_partition_invariant() {
        let mut pb = Protoboard::<BN254Fr>::new();
        let vars: Vec<_> = (0..6).map(|_| pb.allocate_variable("")).collect();
        for (k, var) in vars.iter().enumerate() {
            pb.set_val(*var, BN254Fr::from(k as u64 + 10)).unwrap();
        }

        for split in 0..=6 {
            pb.set_input_sizes(split).unwrap();
            assert_eq!(pb.num_inputs(), split);

            let mut rebuilt = pb.primary_input();
            rebuilt.extend(pb.auxiliary_input());
            assert_eq!(rebuilt, pb.full_variable_assignment());
        }

        assert!(pb.set_input_sizes(7).is_err());
    }

    #[test]
    fn test_reset_idempotence() {
        let mut pb = Protoboard::<F101>::new();
        let x = pb.allocate_variable("x");
        let y = pb.allocate_variable("y");
        pb.set_val(x, F101::from(5u8)).unwrap();
        pb.set_val(y, F101::from(6u8)).unwrap();
        pb.add_r1cs_constraint(Constraint::new(x, y, x), "x * y = x");

        pb.clear_values();
        assert_eq!(pb.full_variable_assignment(), vec![F101::zero(); 2]);
        pb.clear_values();
        assert_eq!(pb.full_variable_assignment(), vec![F101::zero(); 2]);

        assert_eq!(pb.num_variables(), 2);
        assert_eq!(pb.num_constraints(), 1);
    }

    #[test]
    fn test_satisfaction_soundness() {
        let mut pb = Protoboard::<BN254Fr>::new();
        let x = pb.allocate_variable("x");
        let y = pb.allocate_variable("y");
        let z = pb.allocate_variable("z");
        pb.add_r1cs_constraint(Constraint::new(x, y, z), "x * y = z");

        pb.set_val(x, BN254Fr::from(2u8)).unwrap();
        pb.set_val(y, BN254Fr::from(3u8)).unwrap();
        pb.set_val(z, BN254Fr::from(6u8)).unwrap();
        assert!(pb.is_satisfied().unwrap());

        pb.set_val(z, BN254Fr::from(7u8)).unwrap();
        assert!(!pb.is_satisfied().unwrap());
    }

    #[test]
    fn test_constraint_order_does_not_mask_failures() {
        let build = |satisfied_first: bool| {
            let mut pb = Protoboard::<F101>::new();
            let x = pb.allocate_variable("x");
            pb.set_val(x, F101::from(2u8)).unwrap();

            let good = Constraint::new(x, Variable::ONE, x);
            let bad = Constraint::new(x, x, x);
            if satisfied_first {
                pb.add_r1cs_constraint(good, "good");
                pb.add_r1cs_constraint(bad, "bad");
            } else {
                pb.add_r1cs_constraint(bad, "bad");
                pb.add_r1cs_constraint(good, "good");
            }
            pb
        };

        assert!(!build(true).is_satisfied().unwrap());
        assert!(!build(false).is_satisfied().unwrap());
    }

    #[test]
    fn test_cache_consistency() {
        let mut pb = Protoboard::<BN254Fr>::new();
        let x = pb.allocate_variable("x");
        let y = pb.allocate_variable("y");
        pb.set_val(x, BN254Fr::from(4u8)).unwrap();
        pb.set_val(y, BN254Fr::from(5u8)).unwrap();

        let mut lc: LinearCombination<BN254Fr> = x + LinearCombination::from(y);
        let tag = pb.cache_linear_combination(&mut lc);
        assert_eq!(pb.cache_linear_combination(&mut lc), tag);

        // The cached read returns exactly what was written, not the value
        // of the underlying terms.
        pb.set_lc_val(&lc, BN254Fr::from(42u8)).unwrap();
        assert_eq!(pb.lc_val(&lc).unwrap(), BN254Fr::from(42u8));

        pb.evaluate_linear_combination(&lc).unwrap();
        assert_eq!(pb.lc_val(&lc).unwrap(), BN254Fr::from(9u8));
    }

    #[test]
    fn test_uncached_lc_is_not_writable() {
        let mut pb = Protoboard::<F101>::new();
        let x = pb.allocate_variable("x");
        pb.set_val(x, F101::from(3u8)).unwrap();

        let lc: LinearCombination<F101> = x * F101::from(2u8);
        assert_eq!(pb.lc_val(&lc).unwrap(), F101::from(6u8));
        assert_eq!(
            pb.set_lc_val(&lc, F101::one()),
            Err(ProtoboardError::InvalidOperation(
                "only cached linear combinations are writable"
            ))
        );
    }

    #[test]
    fn test_forward_reference_surfaces_at_satisfaction_time() {
        let mut pb = Protoboard::<F101>::new();
        let x = pb.allocate_variable("x");
        pb.set_val(x, F101::one()).unwrap();

        // Points at a variable that is never allocated. Insertion is
        // accepted, the check reports it.
        let never = Variable::new(5);
        pb.add_r1cs_constraint(Constraint::new(never, Variable::ONE, x), "forward ref");

        assert_eq!(
            pb.is_satisfied(),
            Err(ProtoboardError::OutOfRange {
                index: 5,
                allocated: 1
            })
        );
    }

    #[test]
    fn test_annotations_do_not_interfere() {
        let mut pb = Protoboard::<BN254Fr>::new();
        let x = pb.allocate_variable("x");
        let y = pb.allocate_variable("y");
        pb.set_val(x, BN254Fr::from(3u8)).unwrap();
        pb.set_val(y, BN254Fr::from(9u8)).unwrap();
        pb.add_r1cs_constraint(Constraint::new(x, x, y), "x squared");

        let before = (
            pb.is_satisfied().unwrap(),
            pb.num_constraints(),
            pb.num_variables(),
            pb.full_variable_assignment(),
        );

        pb.augment_variable_annotation(x, " (renamed)");
        pb.augment_variable_annotation(y, " (renamed)");
        pb.dump_variables();

        let after = (
            pb.is_satisfied().unwrap(),
            pb.num_constraints(),
            pb.num_variables(),
            pb.full_variable_assignment(),
        );
        assert_eq!(before, after);
    }
}
