//! The `nist` module provides `PrimeOrderGroup` instantiations for the NIST
//! P-384 and P-521 curves, in short Weierstrass form.
//!
//! # Example
//!
//! ```
//! use oprf_poc::oprf::groups::PrimeOrderGroup;
//! use oprf_poc::oprf::groups::nist::{P384, P521};
//! assert_eq!(P384.name(), "P-384");
//! assert_eq!(P521.byte_length(), 66);
//! ```
//!
//! Points are carried around as raw affine coordinates and only lifted into
//! the curve library's types after passing the on-curve check, so that an
//! invalid point can never reach the group law.
use elliptic_curve::hash2curve::{ExpandMsgXmd, GroupDigest};
use elliptic_curve::point::DecompressPoint;
use elliptic_curve::sec1::{Coordinates, EncodedPoint, FromEncodedPoint, ToEncodedPoint};
use elliptic_curve::{AffinePoint, Field, FieldBytes, Group, PrimeField, ProjectivePoint, Scalar};
use num_bigint::BigUint;
use p384::NistP384;
use p521::NistP521;
use sha2::Sha512;
use subtle::{Choice, ConditionallySelectable};

use super::{Point, PrimeOrderGroup};
use crate::errors::{err_internal, Error, Result};
use crate::utils::{copy_into, left_pad, rand_bytes};

/// Calculated by performing (modulus_bits+7)/8
const P384_BYTE_LENGTH: usize = 48;
const P521_BYTE_LENGTH: usize = 66;

/// Masks applied to the most significant byte of sampled scalars, indexed by
/// `modulus_bits % 8`.
const CURVE_BITMASK: &[u8] = &[0xff, 0x1, 0x3, 0x7, 0xf, 0x1f, 0x3f, 0x7f];

/// RFC 9380 suite identifiers, used as the hash-to-curve DST.
const P384_H2C_DST: &[u8] = b"P384_XMD:SHA-512_SSWU_RO_";
const P521_H2C_DST: &[u8] = b"P521_XMD:SHA-512_SSWU_RO_";

/// SEC1 octet-string tags.
const TAG_IDENTITY: u8 = 0x00;
const TAG_COMPRESSED_EVEN: u8 = 0x02;
const TAG_COMPRESSED_ODD: u8 = 0x03;
const TAG_UNCOMPRESSED: u8 = 0x04;

/// Both NIST curves have cofactor 1.
const NIST_H_EFF: &[u8] = &[1];

/// Expands to a unit struct implementing `PrimeOrderGroup` over `$curve`,
/// with `Point<$curve>` elements and SHA-512 as the paired hash.
macro_rules! nist_group {
    (
        $(#[$meta:meta])*
        $group:ident, $curve:ty, name: $name:expr, id: $id:expr,
        byte_length: $byte_length:expr, modulus_bits: $bits:expr, dst: $dst:expr
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $group;

        impl $group {
            // lifts a point into the curve library after the on-curve check
            fn to_affine(p: &Point<$curve>) -> Result<AffinePoint<$curve>> {
                let encoded = EncodedPoint::<$curve>::from_affine_coordinates(&p.x, &p.y, false);
                Option::from(AffinePoint::<$curve>::from_encoded_point(&encoded))
                    .ok_or(Error::InvalidGroupElement)
            }

            fn from_projective(p: ProjectivePoint<$curve>) -> Point<$curve> {
                let encoded = p.to_affine().to_encoded_point(false);
                match encoded.coordinates() {
                    Coordinates::Uncompressed { x, y } => Point::new(x.clone(), y.clone()),
                    _ => Point::identity(),
                }
            }

            // scalars must already be reduced modulo the order
            fn to_scalar(r: &[u8]) -> Result<Scalar<$curve>> {
                let padded =
                    left_pad(r, $byte_length).ok_or_else(|| err_internal("scalar is too wide"))?;
                let repr = FieldBytes::<$curve>::clone_from_slice(&padded);
                Option::from(Scalar::<$curve>::from_repr(repr))
                    .ok_or_else(|| err_internal("scalar is not reduced modulo the group order"))
            }

            fn check(p: &Point<$curve>) -> Result<ProjectivePoint<$curve>> {
                Ok(ProjectivePoint::<$curve>::from(Self::to_affine(p)?))
            }
        }

        impl PrimeOrderGroup for $group {
            type Element = Point<$curve>;
            type Hash = Sha512;

            fn name(&self) -> &'static str {
                $name
            }

            fn id(&self) -> &'static str {
                $id
            }

            fn order(&self) -> BigUint {
                let n_minus_one = -Scalar::<$curve>::ONE;
                BigUint::from_bytes_be(&n_minus_one.to_repr()) + 1u32
            }

            fn generator(&self) -> Point<$curve> {
                Self::from_projective(ProjectivePoint::<$curve>::generator())
            }

            fn byte_length(&self) -> usize {
                $byte_length
            }

            fn h_eff(&self) -> &'static [u8] {
                NIST_H_EFF
            }

            fn encode_to_group(&self, buf: &[u8]) -> Result<Point<$curve>> {
                let p = <$curve as GroupDigest>::hash_from_bytes::<ExpandMsgXmd<Sha512>>(
                    &[buf],
                    &[$dst],
                )
                .map_err(|_| err_internal(format!("hash-to-curve failed for {}", $name)))?;
                self.clear_cofactor(&Self::from_projective(p), self.h_eff())
            }

            fn is_valid(&self, p: &Point<$curve>) -> bool {
                Self::to_affine(p).is_ok()
            }

            fn is_equal(&self, p1: &Point<$curve>, p2: &Point<$curve>) -> bool {
                p1.ct_eq(p2)
            }

            fn add(&self, p1: &Point<$curve>, p2: &Point<$curve>) -> Result<Point<$curve>> {
                let a = Self::check(p1)?;
                let b = Self::check(p2)?;
                Ok(Self::from_projective(a + b))
            }

            fn scalar_mult(&self, p: &Point<$curve>, r: &[u8]) -> Result<Point<$curve>> {
                let a = Self::check(p)?;
                let k = Self::to_scalar(r)?;
                Ok(Self::from_projective(a * k))
            }

            fn inverse_mult(&self, p: &Point<$curve>, r: &[u8]) -> Result<Point<$curve>> {
                let a = Self::check(p)?;
                let k = Self::to_scalar(r)?;
                let inv: Scalar<$curve> = Option::from(k.invert())
                    .ok_or_else(|| err_internal("scalar is not invertible"))?;
                Ok(Self::from_projective(a * inv))
            }

            fn uniform_bytes(&self, out: &mut Vec<u8>) -> Result<()> {
                let mask = CURVE_BITMASK[$bits % 8];
                let mut alpha: Vec<u8> = Vec::new();
                loop {
                    rand_bytes($byte_length, &mut alpha)?;
                    alpha[0] &= mask;
                    let repr = FieldBytes::<$curve>::clone_from_slice(&alpha);
                    let candidate: Option<Scalar<$curve>> =
                        Option::from(Scalar::<$curve>::from_repr(repr));
                    if let Some(s) = candidate {
                        if !bool::from(s.is_zero()) {
                            copy_into(&alpha, out);
                            return Ok(());
                        }
                    }
                }
            }

            fn serialize(&self, p: &Point<$curve>, compress: bool, out: &mut Vec<u8>) {
                if p.is_identity() {
                    copy_into(&[TAG_IDENTITY], out);
                    return;
                }
                let mut buf = Vec::with_capacity(1 + 2 * $byte_length);
                if compress {
                    let y_is_odd = Choice::from(p.y[$byte_length - 1] & 1);
                    buf.push(u8::conditional_select(
                        &TAG_COMPRESSED_EVEN,
                        &TAG_COMPRESSED_ODD,
                        y_is_odd,
                    ));
                    buf.extend_from_slice(&p.x);
                } else {
                    buf.push(TAG_UNCOMPRESSED);
                    buf.extend_from_slice(&p.x);
                    buf.extend_from_slice(&p.y);
                }
                copy_into(&buf, out);
            }

            fn deserialize(&self, buf: &[u8]) -> Result<Point<$curve>> {
                let (tag, rest) = buf
                    .split_first()
                    .ok_or_else(|| err_internal("empty octet string"))?;
                match *tag {
                    TAG_UNCOMPRESSED => {
                        if rest.len() != 2 * $byte_length {
                            return Err(err_internal("wrong length for uncompressed point"));
                        }
                        let (x, y) = rest.split_at($byte_length);
                        let p = Point::new(
                            FieldBytes::<$curve>::clone_from_slice(x),
                            FieldBytes::<$curve>::clone_from_slice(y),
                        );
                        Self::to_affine(&p)?;
                        Ok(p)
                    }
                    TAG_COMPRESSED_EVEN | TAG_COMPRESSED_ODD => {
                        if rest.len() != $byte_length {
                            return Err(err_internal("wrong length for compressed point"));
                        }
                        let x = FieldBytes::<$curve>::clone_from_slice(rest);
                        let y_is_odd = Choice::from(*tag & 1);
                        let affine: Option<AffinePoint<$curve>> =
                            Option::from(AffinePoint::<$curve>::decompress(&x, y_is_odd));
                        let affine = affine.ok_or(Error::InvalidGroupElement)?;
                        Ok(Self::from_projective(ProjectivePoint::<$curve>::from(affine)))
                    }
                    _ => Err(err_internal("unrecognized point tag")),
                }
            }
        }
    };
}

nist_group!(
    /// The prime-order group of the NIST P-384 curve, paired with SHA-512.
    P384, NistP384, name: "P-384", id: "P384",
    byte_length: P384_BYTE_LENGTH, modulus_bits: 384, dst: P384_H2C_DST
);

nist_group!(
    /// The prime-order group of the NIST P-521 curve, paired with SHA-512.
    P521, NistP521, name: "P-521", id: "P521",
    byte_length: P521_BYTE_LENGTH, modulus_bits: 521, dst: P521_H2C_DST
);
