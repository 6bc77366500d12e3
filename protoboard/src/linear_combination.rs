use ark_std::ops::*;

use ark_ff::Field;

use crate::error::{ProtoboardError, Result};
use crate::variable::Variable;

/// Index into the protoboard's cache of evaluated linear combinations.
pub type LcIndex = usize;

/// A weighted sum of variables. The additive constant is an ordinary term
/// on `Variable::ONE`. Terms are kept in insertion order; duplicates by
/// variable index are not merged.
///
/// A combination may carry a cache tag, handed out once by the protoboard.
/// Untagged combinations are evaluated on demand; tagged ones read and
/// write one slot of the protoboard's cache.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearCombination<F: Field> {
    terms: Vec<(Variable, F)>,
    cache_index: Option<LcIndex>,
}

impl<F: Field> LinearCombination<F> {
    pub fn zero() -> Self {
        LinearCombination {
            terms: vec![],
            cache_index: None,
        }
    }

    pub fn from_terms(terms: Vec<(Variable, F)>) -> Self {
        LinearCombination {
            terms,
            cache_index: None,
        }
    }

    /// A constant: one term on the reserved constant-1 wire.
    pub fn constant(value: F) -> Self {
        LinearCombination::from_terms(vec![(Variable::ONE, value)])
    }

    #[inline]
    pub fn terms(&self) -> &[(Variable, F)] {
        &self.terms
    }

    #[inline]
    pub fn cache_index(&self) -> Option<LcIndex> {
        self.cache_index
    }

    #[inline]
    pub fn is_cached(&self) -> bool {
        self.cache_index.is_some()
    }

    pub(crate) fn set_cache_index(&mut self, index: LcIndex) {
        self.cache_index = Some(index);
    }

    /// Evaluates the combination against a variable assignment that does
    /// not include the constant wire: `assignment[0]` holds the value of
    /// the variable at index 1. A term referencing a variable beyond the
    /// assignment fails with `OutOfRange`.
    pub fn eval(&self, assignment: &[F]) -> Result<F> {
        let mut res = F::zero();

        for (var, coeff) in self.terms.iter() {
            let value = match var.index() {
                0 => F::one(),
                i if i <= assignment.len() => assignment[i - 1],
                i => {
                    return Err(ProtoboardError::OutOfRange {
                        index: i,
                        allocated: assignment.len(),
                    })
                }
            };

            res += value * coeff;
        }

        Ok(res)
    }
}

impl<F: Field> From<Variable> for LinearCombination<F> {
    fn from(v: Variable) -> LinearCombination<F> {
        LinearCombination::from_terms(vec![(v, F::one())])
    }
}

impl<F: Field, L: Into<LinearCombination<F>>> Add<L> for LinearCombination<F> {
    type Output = Self;

    #[inline]
    fn add(mut self, rhs: L) -> Self::Output {
        self.terms.extend_from_slice(&rhs.into().terms);
        self.cache_index = None;
        self
    }
}

impl<F: Field, L: Into<LinearCombination<F>>> Sub<L> for LinearCombination<F> {
    type Output = Self;

    fn sub(mut self, rhs: L) -> Self::Output {
        let tmp = rhs.into().neg();
        self.terms.extend_from_slice(&tmp.terms);
        self.cache_index = None;
        self
    }
}

impl<F: Field> Neg for LinearCombination<F> {
    type Output = Self;

    #[inline]
    fn neg(mut self) -> Self::Output {
        for (_, coeff) in self.terms.iter_mut() {
            *coeff = -*coeff
        }
        self.cache_index = None;

        self
    }
}

impl<F: Field> Mul<F> for LinearCombination<F> {
    type Output = Self;

    fn mul(mut self, scalar: F) -> Self::Output {
        for (_, coeff) in self.terms.iter_mut() {
            *coeff *= scalar
        }
        self.cache_index = None;

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::One;
    use sample_field::BN254Fr;

    #[test]
    fn test_lc_ops() {
        let var1 = Variable::new(1);
        let var2 = Variable::new(2);
        let lc: LinearCombination<BN254Fr> = var1 + LinearCombination::from(var2);
        assert_eq!(
            lc.terms(),
            &[(var1, BN254Fr::one()), (var2, BN254Fr::one())]
        );

        let diff = lc.clone() - LinearCombination::from(var1);
        let sum_of_neg = lc + LinearCombination::from(var1).neg();
        assert_eq!(diff, sum_of_neg);

        let scaled = var1 * BN254Fr::from(4u8);
        assert_eq!(scaled.terms(), &[(var1, BN254Fr::from(4u8))]);
    }

    #[test]
    fn test_eval() {
        // assignment for variables 1..=7
        let assignment = [
            BN254Fr::from(3u8),
            BN254Fr::from(7u8),
            BN254Fr::from(21u8),
            BN254Fr::from(9u8),
            BN254Fr::from(27u8),
            BN254Fr::from(14u8),
            BN254Fr::from(9u8),
        ];

        let lc: LinearCombination<BN254Fr> = LinearCombination::from_terms(vec![
            (Variable::new(5), BN254Fr::one()),
            (Variable::new(3), -BN254Fr::one()),
            (Variable::new(1), -BN254Fr::one()),
            (Variable::new(6), BN254Fr::one()),
            (Variable::ONE, -BN254Fr::from(8u8)),
        ]);

        // = 27 - 21 - 3 + 14 - 8
        assert_eq!(lc.eval(&assignment).unwrap(), BN254Fr::from(9u8));
    }

    #[test]
    fn test_eval_out_of_range() {
        let assignment = [BN254Fr::one()];
        let lc: LinearCombination<BN254Fr> = Variable::new(5) * BN254Fr::one();

        assert!(matches!(
            lc.eval(&assignment),
            Err(crate::error::ProtoboardError::OutOfRange { index: 5, .. })
        ));
    }

    #[test]
    fn test_duplicate_terms_sum_in_order() {
        let assignment = [BN254Fr::from(2u8)];
        let var = Variable::new(1);
        let lc: LinearCombination<BN254Fr> =
            var * BN254Fr::from(3u8) + var * BN254Fr::from(4u8);

        assert_eq!(lc.terms().len(), 2);
        assert_eq!(lc.eval(&assignment).unwrap(), BN254Fr::from(14u8));
    }
}
