use crate::Signature;
use hex_simd::AsciiCase;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;

type HmacSha1 = Hmac<Sha1>;

/// Length of a hex-encoded signature
pub const SIGNATURE_LEN: usize = 40;

/// Keyed digest binding an identifier to a subject name
///
/// The output only depends on the key, the identifier and the subject.
/// Two signers constructed from the same key always agree with each other.
#[derive(Clone)]
pub struct HashSigner {
    mac: HmacSha1,
}

impl HashSigner {
    #[must_use]
    pub fn new(key: &[u8]) -> Self {
        let mac = <HmacSha1 as Mac>::new_from_slice(key).expect("HMAC accepts keys of any length");
        Self { mac }
    }

    /// Sign an identifier for a subject
    ///
    /// The separator can't appear inside the identifier half of a tracking ID,
    /// so no two `(original_id, subject)` pairs feed the same bytes into the MAC.
    #[must_use]
    pub fn sign(&self, original_id: &str, subject: &str) -> Signature {
        let mut mac = self.mac.clone();
        mac.update(original_id.as_bytes());
        mac.update(b"_");
        mac.update(subject.as_bytes());

        let digest = mac.finalize().into_bytes();
        hex_simd::encode_to_string(digest, AsciiCase::Lower).into()
    }

    /// Check a claimed signature against the one we would produce
    ///
    /// Exact, case-sensitive comparison. Runs in constant time for equal-length inputs.
    #[must_use]
    pub fn verify(&self, original_id: &str, subject: &str, claimed: &str) -> bool {
        let expected = self.sign(original_id, subject);
        expected.as_str().as_bytes().ct_eq(claimed.as_bytes()).into()
    }
}
