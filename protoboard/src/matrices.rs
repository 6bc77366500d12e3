use ark_std::ops::Mul;
use ark_std::vec::Vec;

use ark_ff::Field;

use crate::variable::VarIndex;

/// Row-sparse constraint matrices: each row lists `(column, coefficient)`
/// pairs. Column 0 is the constant wire.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseMatrices<F: Field>(pub Vec<Vec<(VarIndex, F)>>);

impl<'a, F: Field> Mul<&'a [F]> for SparseMatrices<F> {
    type Output = DenseMatrices<F>;

    #[inline]
    fn mul(self, rhs: &[F]) -> Self::Output {
        let mut r: Vec<F> = vec![];

        for row in self.0.iter() {
            let tmp = row.iter().map(|(i, v)| rhs[*i].mul(v)).sum();
            r.push(tmp);
        }

        DenseMatrices(vec![r])
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DenseMatrices<F: Field>(pub Vec<Vec<F>>);

impl<'a, F: Field> Mul<&'a [F]> for DenseMatrices<F> {
    type Output = DenseMatrices<F>;

    #[inline]
    fn mul(self, rhs: &[F]) -> Self::Output {
        assert!(rhs.len() == self.0[0].len());

        let mut r = Vec::with_capacity(self.0.len());

        for row in self.0.iter() {
            let tmp = row.iter().zip(rhs.iter()).map(|(a, b)| a.mul(b)).sum();
            r.push(tmp);
        }

        DenseMatrices(vec![r])
    }
}

/// element-wise product
impl<F: Field> Mul for DenseMatrices<F> {
    type Output = DenseMatrices<F>;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        let mut r = vec![];

        for (x, y) in self.0.iter().zip(rhs.0.iter()) {
            let tmp = x.iter().zip(y.iter()).map(|(a, b)| a.mul(b)).collect();
            r.push(tmp)
        }

        DenseMatrices(r)
    }
}

/// The A, B, C matrices of a constraint system, multiplied against the
/// vector `[1] ++ full_variable_assignment`.
#[derive(Clone, Debug, PartialEq)]
pub struct R1CSMatrices<M: Matrices> {
    pub a: M,
    pub b: M,
    pub c: M,
    pub num_columns: usize,
}

pub trait Matrices: Clone + for<'a> Mul<&'a [Self::F], Output = DenseMatrices<Self::F>> {
    type F: Field;
}
impl<F: Field> Matrices for SparseMatrices<F> {
    type F = F;
}
impl<F: Field> Matrices for DenseMatrices<F> {
    type F = F;
}

impl<F: Field> From<R1CSMatrices<SparseMatrices<F>>> for R1CSMatrices<DenseMatrices<F>> {
    fn from(v: R1CSMatrices<SparseMatrices<F>>) -> R1CSMatrices<DenseMatrices<F>> {
        let densify = |m: &SparseMatrices<F>| -> DenseMatrices<F> {
            let mut rows = vec![];
            for row in m.0.iter() {
                let mut tmp = vec![F::zero(); v.num_columns];
                for (i, coeff) in row.iter() {
                    tmp[*i] += coeff
                }
                rows.push(tmp);
            }
            DenseMatrices(rows)
        };

        R1CSMatrices {
            a: densify(&v.a),
            b: densify(&v.b),
            c: densify(&v.c),
            num_columns: v.num_columns,
        }
    }
}

impl<M: Matrices> R1CSMatrices<M> {
    /// Checks `(A·z) ∘ (B·z) == C·z` for `z = [1] ++ assignment`.
    pub fn verify(&self, z: &[M::F]) -> bool {
        let left: DenseMatrices<M::F> = self.a.clone().mul(z);
        let right: DenseMatrices<M::F> = self.b.clone().mul(z);
        let out: DenseMatrices<M::F> = self.c.clone().mul(z);

        left * right == out
    }
}
