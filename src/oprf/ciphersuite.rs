use digest::Digest;

use super::groups::PrimeOrderGroup;
use crate::errors::{err_unsupported, Result};
use crate::utils::copy_into;

const OPRF_MODE: &str = "OPRF";
const VOPRF_MODE: &str = "VOPRF";
/// Everything that follows the group identifier in a ciphersuite name.
const SUITE_SUFFIX: &str = "HKDF-SHA512-SSWU-RO";

/// The Ciphersuite struct binds a `PrimeOrderGroup` instantiation to a named
/// (V)OPRF ciphersuite, along with the ancillary hash functions used by the
/// protocol. Names have the form `<MODE>-<GROUP>-HKDF-SHA512-SSWU-RO`, e.g.
/// `OPRF-P384-HKDF-SHA512-SSWU-RO`.
///
/// A `Ciphersuite` is immutable after construction.
#[derive(Clone, Debug)]
pub struct Ciphersuite<G: PrimeOrderGroup> {
    pub name: String,
    pub verifiable: bool,
    pub pog: G,
}

impl<G: PrimeOrderGroup> Ciphersuite<G> {
    // constructor for the ciphersuite
    pub fn new(pog: G, verifiable: bool) -> Ciphersuite<G> {
        let mode = if verifiable { VOPRF_MODE } else { OPRF_MODE };
        Ciphersuite {
            name: format!("{}-{}-{}", mode, pog.id(), SUITE_SUFFIX),
            verifiable,
            pog,
        }
    }

    /// Parses a ciphersuite name and checks that it names `pog`.
    pub fn from_name(name: &str, pog: G) -> Result<Ciphersuite<G>> {
        let (mode, rest) = name
            .split_once('-')
            .ok_or_else(|| err_unsupported(format!("malformed ciphersuite name: {name}")))?;
        let verifiable = match mode {
            OPRF_MODE => false,
            VOPRF_MODE => true,
            _ => return Err(err_unsupported(format!("unknown protocol mode: {mode}"))),
        };
        let (group, suffix) = rest
            .split_once('-')
            .ok_or_else(|| err_unsupported(format!("malformed ciphersuite name: {name}")))?;
        if group != pog.id() {
            return Err(err_unsupported(format!(
                "ciphersuite group {group} does not match {}",
                pog.name()
            )));
        }
        if suffix != SUITE_SUFFIX {
            return Err(err_unsupported(format!("unsupported ciphersuite: {name}")));
        }
        Ok(Ciphersuite::new(pog, verifiable))
    }

    // h1
    pub fn h1(&self, buf: &[u8]) -> Result<G::Element> {
        self.pog.encode_to_group(buf)
    }

    // h3, the finalization hash over every chunk in order
    pub fn h3(&self, chunks: &[&[u8]], out: &mut Vec<u8>) {
        let mut hash_fn = self.pog.hash();
        for chunk in chunks {
            hash_fn.update(chunk);
        }
        copy_into(&hash_fn.finalize(), out);
    }
}

#[cfg(test)]
mod tests {
    use super::Ciphersuite;
    use crate::errors::Error;
    use crate::oprf::groups::nist::{P384, P521};
    use crate::oprf::groups::PrimeOrderGroup;

    #[test]
    fn p384_oprf_ciphersuite() {
        let ciph = Ciphersuite::new(P384, false);
        assert_eq!(ciph.name, String::from("OPRF-P384-HKDF-SHA512-SSWU-RO"));
        assert!(!ciph.verifiable);
    }

    #[test]
    fn p521_voprf_ciphersuite() {
        let ciph = Ciphersuite::new(P521, true);
        assert_eq!(ciph.name, String::from("VOPRF-P521-HKDF-SHA512-SSWU-RO"));
        assert!(ciph.verifiable);
    }

    #[test]
    fn parse_names() {
        let ciph = Ciphersuite::from_name("OPRF-P521-HKDF-SHA512-SSWU-RO", P521).unwrap();
        assert!(!ciph.verifiable);
        let ciph = Ciphersuite::from_name("VOPRF-P384-HKDF-SHA512-SSWU-RO", P384).unwrap();
        assert!(ciph.verifiable);
    }

    #[test]
    fn reject_bad_names() {
        for name in [
            "",
            "OPRF",
            "XOPRF-P384-HKDF-SHA512-SSWU-RO",
            "OPRF-P521-HKDF-SHA512-SSWU-RO",
            "OPRF-P384-HKDF-SHA256-SSWU-RO",
            "OPRF-P384",
        ] {
            assert!(
                matches!(Ciphersuite::from_name(name, P384), Err(Error::UnsupportedParameter(_))),
                "{name}"
            );
        }
    }

    #[test]
    fn p384_h1() {
        let ciph = Ciphersuite::new(P384, false);
        let ge = ciph.h1(&[0; 32]).unwrap();
        assert!(ciph.pog.is_valid(&ge));
    }

    #[test]
    fn h3_is_sha512_over_chunks() {
        let ciph = Ciphersuite::new(P384, false);
        let mut split: Vec<u8> = Vec::new();
        let mut joined: Vec<u8> = Vec::new();
        ciph.h3(&[&b"ab"[..], &b"cd"[..]], &mut split);
        ciph.h3(&[&b"abcd"[..]], &mut joined);
        assert_eq!(split.len(), 64);
        assert_eq!(split, joined);
    }
}
