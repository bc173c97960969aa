pub mod nist;

use std::fmt::Debug;

use digest::Digest;
use elliptic_curve::{Curve, FieldBytes};
use num_bigint::BigUint;
use subtle::ConstantTimeEq;

use crate::errors::Result;

/// The `PrimeOrderGroup` trait defines the behaviour expected from an additive
/// group of prime order. `Element` is the type of group elements that are
/// used (affine curve points for the NIST groups), and `Hash` defines the
/// hash function paired with the group by the ciphersuite.
///
/// # Example functionality (using P-384):
/// ```
/// use oprf_poc::oprf::groups::{PrimeOrderGroup, nist::P384};
/// let pog = P384;
///
/// // fixed group generator
/// let g = pog.generator();
///
/// // hash bytes deterministically to an element of the group without revealing
/// // the discrete logarithm of the output element relative to the generator
/// let m = pog.encode_to_group(b"some_input_bytes").unwrap();
///
/// // sample a scalar uniformly from [1, order-1]
/// let mut r: Vec<u8> = Vec::new();
/// pog.uniform_bytes(&mut r).unwrap();
///
/// // r*m, and (1/r)*(r*m)
/// let rm = pog.scalar_mult(&m, &r).unwrap();
/// let back = pog.inverse_mult(&rm, &r).unwrap();
/// assert!(pog.is_equal(&back, &m));
///
/// // SEC1 octet strings, compressed or not
/// let mut ser: Vec<u8> = Vec::new();
/// pog.serialize(&g, true, &mut ser);
/// assert!(pog.is_equal(&pog.deserialize(&ser).unwrap(), &g));
/// ```
///
/// Every arithmetic operation checks that its point operands lie on the
/// curve and fails with [`crate::errors::Error::InvalidGroupElement`]
/// otherwise. Scalars are passed as fixed-width big-endian octet strings and
/// must be reduced modulo `order`.
pub trait PrimeOrderGroup: Clone + Send + Sync + 'static {
    /// Group elements.
    type Element: Clone + Debug + PartialEq + Send + Sync;
    /// Hash function paired with the group.
    type Hash: Digest;

    /// Human readable group name, e.g. `P-384`.
    fn name(&self) -> &'static str;

    /// Short group identifier used inside ciphersuite names, e.g. `P384`.
    fn id(&self) -> &'static str;

    /// The (prime) number of elements in the group.
    fn order(&self) -> BigUint;

    /// The fixed generator, of order `order()`.
    fn generator(&self) -> Self::Element;

    /// Byte length of field elements and scalars.
    fn byte_length(&self) -> usize;

    /// Effective cofactor used when clearing the cofactor of mapped points.
    fn h_eff(&self) -> &'static [u8];

    /// A fresh instance of the paired hash function.
    fn hash(&self) -> Self::Hash {
        Self::Hash::new()
    }

    /// Deterministically hashes `buf` to a group element.
    fn encode_to_group(&self, buf: &[u8]) -> Result<Self::Element>;

    /// Whether `p` lies on the curve.
    fn is_valid(&self, p: &Self::Element) -> bool;

    /// Constant-time equality.
    fn is_equal(&self, p1: &Self::Element, p2: &Self::Element) -> bool;

    /// `p1 + p2`. Both operands are validated.
    fn add(&self, p1: &Self::Element, p2: &Self::Element) -> Result<Self::Element>;

    /// `r * p`.
    fn scalar_mult(&self, p: &Self::Element, r: &[u8]) -> Result<Self::Element>;

    /// `(1/r) * p`, with the inverse taken modulo `order`.
    fn inverse_mult(&self, p: &Self::Element, r: &[u8]) -> Result<Self::Element>;

    /// `h_eff * p`.
    fn clear_cofactor(&self, p: &Self::Element, h_eff: &[u8]) -> Result<Self::Element> {
        self.scalar_mult(p, h_eff)
    }

    /// Writes a uniformly random scalar in `[1, order-1]` to `out`.
    fn uniform_bytes(&self, out: &mut Vec<u8>) -> Result<()>;

    /// A uniformly random group element.
    fn random_element(&self) -> Result<Self::Element> {
        let mut alpha = Vec::new();
        self.uniform_bytes(&mut alpha)?;
        self.encode_to_group(&alpha)
    }

    /// SEC1 encoding of `p` written to `out`.
    fn serialize(&self, p: &Self::Element, compress: bool, out: &mut Vec<u8>);

    /// Parses a SEC1 encoding, compressed or uncompressed.
    fn deserialize(&self, buf: &[u8]) -> Result<Self::Element>;
}

/// An affine point `(x, y)` on the curve `C`, with both coordinates held as
/// fixed-width big-endian field elements.
///
/// A `Point` is a plain value: it can be built from any pair of coordinates,
/// and is only checked against the curve equation when it is used.
/// The point at infinity is represented by `(0, 0)`, which is not on any of
/// the supported curves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Point<C: Curve> {
    pub x: FieldBytes<C>,
    pub y: FieldBytes<C>,
}

impl<C: Curve> Point<C> {
    pub fn new(x: FieldBytes<C>, y: FieldBytes<C>) -> Self {
        Point { x, y }
    }

    pub fn identity() -> Self {
        Point {
            x: FieldBytes::<C>::default(),
            y: FieldBytes::<C>::default(),
        }
    }

    pub fn is_identity(&self) -> bool {
        let zero = FieldBytes::<C>::default();
        (self.x.as_slice().ct_eq(zero.as_slice()) & self.y.as_slice().ct_eq(zero.as_slice()))
            .into()
    }

    pub(crate) fn ct_eq(&self, other: &Self) -> bool {
        (self.x.as_slice().ct_eq(other.x.as_slice()) & self.y.as_slice().ct_eq(other.y.as_slice()))
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::Point;
    use p384::NistP384;

    #[test]
    fn identity_is_all_zero() {
        let id = Point::<NistP384>::identity();
        assert!(id.is_identity());
        assert!(id.x.iter().chain(id.y.iter()).all(|b| *b == 0));
    }

    #[test]
    fn nonzero_point_is_not_identity() {
        let mut p = Point::<NistP384>::identity();
        p.y[47] = 1;
        assert!(!p.is_identity());
        assert!(!p.ct_eq(&Point::identity()));
    }
}
