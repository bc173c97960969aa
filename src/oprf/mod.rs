pub mod ciphersuite;
pub mod groups;

use std::fmt;

use ciphersuite::Ciphersuite;
use groups::PrimeOrderGroup;
use zeroize::Zeroize;

use crate::errors::{err_internal, err_unsupported, Error, Result};

/// Blinded and evaluated elements are exchanged, and finalized, in
/// compressed SEC1 form.
const COMPRESS_ELEMENTS: bool = true;

/// The scalar used to blind one input, as a fixed-width big-endian octet
/// string in `[1, order-1]`. Wiped from memory when dropped.
pub struct Blind(Vec<u8>);

impl Blind {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Blind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Blind(..)")
    }
}

impl Drop for Blind {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// One client input within a round: the original bytes, the blinded group
/// element sent to the server and the blind needed to undo it. A round owns
/// a `Vec<Input<_>>` and pairs it positionally with the server's answer.
#[derive(Debug)]
pub struct Input<T> {
    pub data: Vec<u8>,
    pub elem: T,
    pub blind: Blind,
}

/// The client side of the OPRF protocol: `blind`, then `unblind` the
/// server's evaluation, then `finalize`.
///
/// ```
/// use oprf_poc::oprf::Client;
/// use oprf_poc::oprf::ciphersuite::Ciphersuite;
/// use oprf_poc::oprf::groups::{PrimeOrderGroup, nist::P384};
///
/// let cli = Client::setup(Ciphersuite::new(P384, false)).unwrap();
/// let (blinded, blind) = cli.blind(b"some input").unwrap();
///
/// // the server would evaluate `blinded` with its key, here k = 1
/// let evaluated = P384.scalar_mult(&blinded, &[1]).unwrap();
///
/// let unblinded = cli.unblind(&evaluated, &blind).unwrap();
/// let out = cli.finalize(&unblinded, b"some input", b"aux").unwrap();
/// assert_eq!(out.len(), 64);
/// ```
#[derive(Clone, Debug)]
pub struct Client<G: PrimeOrderGroup> {
    ciph: Ciphersuite<G>,
}

impl<G: PrimeOrderGroup> Client<G> {
    /// Verifiable ciphersuites are rejected: the evaluation envelope does not
    /// carry a proof that could be checked.
    pub fn setup(ciph: Ciphersuite<G>) -> Result<Self> {
        if ciph.verifiable {
            return Err(err_unsupported(format!(
                "verifiable mode is not supported: {}",
                ciph.name
            )));
        }
        Ok(Client { ciph })
    }

    pub fn ciphersuite(&self) -> &Ciphersuite<G> {
        &self.ciph
    }

    /// Encodes `x` to the group and masks it with a fresh random scalar.
    pub fn blind(&self, x: &[u8]) -> Result<(G::Element, Blind)> {
        let pog = &self.ciph.pog;
        let t = self.ciph.h1(x)?;
        let mut r: Vec<u8> = Vec::new();
        pog.uniform_bytes(&mut r)?;
        let blind = Blind(r);
        let p = pog.scalar_mult(&t, blind.as_bytes())?;
        Ok((p, blind))
    }

    /// Blinds every input, each with its own scalar.
    pub fn blind_batch(&self, inputs: &[Vec<u8>]) -> Result<Vec<Input<G::Element>>> {
        inputs
            .iter()
            .map(|x| {
                let (elem, blind) = self.blind(x)?;
                Ok(Input {
                    data: x.clone(),
                    elem,
                    blind,
                })
            })
            .collect()
    }

    /// Removes the blind from an evaluated element. `r` must be the blind
    /// produced for the same input; a mismatched pair silently yields a
    /// wrong element.
    pub fn unblind(&self, z: &G::Element, r: &Blind) -> Result<G::Element> {
        self.ciph.pog.inverse_mult(z, r.as_bytes())
    }

    /// Unblinds `evals[i]` with `inputs[i].blind`.
    pub fn unblind_batch(
        &self,
        inputs: &[Input<G::Element>],
        evals: &[G::Element],
    ) -> Result<Vec<G::Element>> {
        if inputs.len() != evals.len() {
            return Err(err_internal(format!(
                "expected {} evaluated elements, got {}",
                inputs.len(),
                evals.len()
            )));
        }
        inputs
            .iter()
            .zip(evals)
            .map(|(input, z)| self.unblind(z, &input.blind))
            .collect()
    }

    /// Derives the PRF output `H(x || serialize(n) || aux)`.
    pub fn finalize(&self, n: &G::Element, x: &[u8], aux: &[u8]) -> Result<Vec<u8>> {
        let pog = &self.ciph.pog;
        if !pog.is_valid(n) {
            return Err(Error::InvalidGroupElement);
        }
        let ser = self.serialize_element(n);
        let mut out: Vec<u8> = Vec::new();
        self.ciph.h3(&[x, ser.as_slice(), aux], &mut out);
        Ok(out)
    }

    /// Wire encoding of a group element.
    pub fn serialize_element(&self, e: &G::Element) -> Vec<u8> {
        let mut ser: Vec<u8> = Vec::new();
        self.ciph.pog.serialize(e, COMPRESS_ELEMENTS, &mut ser);
        ser
    }

    /// Parses a wire encoding back into a group element.
    pub fn deserialize_element(&self, buf: &[u8]) -> Result<G::Element> {
        self.ciph.pog.deserialize(buf)
    }
}
