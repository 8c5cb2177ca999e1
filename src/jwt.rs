//! Compact JSON Web Token encoding, RS256 signing and verification.
//!
//! Tokens are handled as three base64url segments. Nothing in this module
//! performs I/O: keys are always provided by the caller.

use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// URL-safe base64 that accepts input with or without padding.
pub(crate) const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub const ALG_RS256: &str = "RS256";
pub const ALG_NONE: &str = "none";

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("The token is malformed: {0}")]
    Malformed(String),
    #[error("Unable to encode token segment: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("Invalid private key: {0}")]
    InvalidKey(String),
}

/// The JOSE header of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    pub alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

impl JwtHeader {
    pub fn rs256() -> Self {
        Self {
            typ: Some("JWT".to_string()),
            alg: ALG_RS256.to_string(),
            kid: None,
        }
    }

    pub fn unsigned() -> Self {
        Self {
            typ: Some("JWT".to_string()),
            alg: ALG_NONE.to_string(),
            kid: None,
        }
    }
}

/// JSON-encodes a header or payload and base64url-encodes it without padding.
pub fn encode_segment<T: Serialize + ?Sized>(value: &T) -> Result<String, JwtError> {
    Ok(URL_SAFE_NO_PAD.encode(serde_json::to_vec(value)?))
}

/// Inverse of [`encode_segment`].
pub fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, JwtError> {
    let bytes = URL_SAFE_LENIENT
        .decode(segment)
        .map_err(|e| JwtError::Malformed(format!("invalid base64url segment: {}", e)))?;

    serde_json::from_slice(&bytes).map_err(|e| JwtError::Malformed(format!("invalid JSON segment: {}", e)))
}

/// Loads an RS256 signing key from a PKCS#8 or PKCS#1 PEM.
pub fn signing_key_from_pem(pem: &str) -> Result<SigningKey<Sha256>, JwtError> {
    let key = RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .map_err(|e| JwtError::InvalidKey(e.to_string()))?;

    Ok(SigningKey::new(key))
}

/// Computes the base64url RS256 signature over `header.payload`.
pub fn sign(header_b64: &str, payload_b64: &str, key: &SigningKey<Sha256>) -> String {
    let input = format!("{}.{}", header_b64, payload_b64);
    URL_SAFE_NO_PAD.encode(key.sign(input.as_bytes()).to_vec())
}

/// Checks the RS256 signature of `token` against `key`.
pub fn verify(token: &CompactToken, key: &RsaPublicKey) -> bool {
    let Ok(signature) = token.signature_bytes() else {
        return false;
    };
    let Ok(signature) = Signature::try_from(signature.as_slice()) else {
        return false;
    };

    VerifyingKey::<Sha256>::new(key.clone())
        .verify(token.signing_input().as_bytes(), &signature)
        .is_ok()
}

/// A token in compact serialization: `header.payload.signature`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompactToken {
    raw: String,
    payload_end: usize,
}

impl CompactToken {
    /// Splits a compact token into its segments.
    ///
    /// The header and payload segments must be non-empty; the signature may be
    /// empty for unsigned tokens.
    pub fn parse(token: &str) -> Result<Self, JwtError> {
        let token = token.trim();
        let segments: Vec<&str> = token.split('.').collect();

        if segments.len() != 3 {
            return Err(JwtError::Malformed(format!(
                "expected 3 segments, found {}",
                segments.len()
            )));
        }
        if segments[0].is_empty() || segments[1].is_empty() {
            return Err(JwtError::Malformed("empty header or payload segment".to_string()));
        }

        Ok(Self {
            raw: token.to_string(),
            payload_end: segments[0].len() + 1 + segments[1].len(),
        })
    }

    pub fn from_parts(header_b64: &str, payload_b64: &str, signature_b64: &str) -> Self {
        Self {
            raw: format!("{}.{}.{}", header_b64, payload_b64, signature_b64),
            payload_end: header_b64.len() + 1 + payload_b64.len(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// `header.payload`, the bytes covered by the signature.
    pub fn signing_input(&self) -> &str {
        &self.raw[..self.payload_end]
    }

    pub fn header_segment(&self) -> &str {
        self.signing_input().split('.').next().unwrap_or_default()
    }

    pub fn payload_segment(&self) -> &str {
        self.signing_input().split('.').nth(1).unwrap_or_default()
    }

    pub fn signature_segment(&self) -> &str {
        &self.raw[self.payload_end + 1..]
    }

    pub fn header(&self) -> Result<JwtHeader, JwtError> {
        decode_segment(self.header_segment())
    }

    /// Decodes the payload. This does not verify anything.
    pub fn claims<T: DeserializeOwned>(&self) -> Result<T, JwtError> {
        decode_segment(self.payload_segment())
    }

    pub fn signature_bytes(&self) -> Result<Vec<u8>, JwtError> {
        URL_SAFE_LENIENT
            .decode(self.signature_segment())
            .map_err(|e| JwtError::Malformed(format!("invalid signature segment: {}", e)))
    }

    pub fn into_string(self) -> String {
        self.raw
    }
}

impl fmt::Display for CompactToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for CompactToken {
    type Err = JwtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for CompactToken {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use serde_json::{json, Map, Value};

    fn signed_token(claims: &Value) -> CompactToken {
        let header = encode_segment(&JwtHeader::rs256()).unwrap();
        let payload = encode_segment(claims).unwrap();
        let signature = sign(&header, &payload, &testing::signing_key());
        CompactToken::from_parts(&header, &payload, &signature)
    }

    #[test]
    fn test_segment_round_trip() {
        let claims = json!({"iss": "a", "nested": {"list": [1, 2, 3]}, "n": null});
        let encoded = encode_segment(&claims).unwrap();

        assert!(!encoded.contains('='));
        assert_eq!(decode_segment::<Value>(&encoded).unwrap(), claims);
    }

    #[test]
    fn test_header_serialization_order() {
        let encoded = encode_segment(&JwtHeader::rs256()).unwrap();
        let bytes = URL_SAFE_NO_PAD.decode(encoded).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), r#"{"typ":"JWT","alg":"RS256"}"#);
    }

    #[test]
    fn test_decode_segment_rejects_garbage() {
        assert!(matches!(decode_segment::<Value>("%%%"), Err(JwtError::Malformed(_))));

        let not_json = URL_SAFE_NO_PAD.encode("not json");
        assert!(matches!(decode_segment::<Value>(&not_json), Err(JwtError::Malformed(_))));
    }

    #[test]
    fn test_parse_requires_three_segments() {
        assert!(CompactToken::parse("a.b").is_err());
        assert!(CompactToken::parse("a.b.c.d").is_err());
        assert!(CompactToken::parse(".b.c").is_err());

        let token = CompactToken::parse("aaa.bbb.ccc").unwrap();
        assert_eq!(token.header_segment(), "aaa");
        assert_eq!(token.payload_segment(), "bbb");
        assert_eq!(token.signature_segment(), "ccc");
        assert_eq!(token.signing_input(), "aaa.bbb");

        let unsigned = CompactToken::parse("aaa.bbb.").unwrap();
        assert_eq!(unsigned.signature_segment(), "");
    }

    #[test]
    fn test_signing_key_from_pem() {
        let key = signing_key_from_pem(testing::PRIVATE_KEY_PEM).unwrap();
        let token = CompactToken::from_parts("aaa", "bbb", &sign("aaa", "bbb", &key));
        assert!(verify(&token, &testing::public_key()));

        assert!(matches!(signing_key_from_pem("not a key"), Err(JwtError::InvalidKey(_))));
    }

    #[test]
    fn test_signature_is_deterministic() {
        let header = encode_segment(&JwtHeader::rs256()).unwrap();
        let payload = encode_segment(&json!({"uid": "alice"})).unwrap();

        let first = sign(&header, &payload, &testing::signing_key());
        let second = sign(&header, &payload, &testing::signing_key());
        assert_eq!(first, second);
    }

    #[test]
    fn test_verify_accepts_valid_signature() {
        let token = signed_token(&json!({"uid": "alice"}));
        assert!(verify(&token, &testing::public_key()));
        assert!(!verify(&token, &testing::other_public_key()));
    }

    #[test]
    fn test_verify_rejects_tampered_payload() {
        let token = signed_token(&json!({"uid": "alice", "admin": false}));
        let payload = token.payload_segment().to_string();

        for i in 0..payload.len() {
            let mut bytes = payload.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered_payload = String::from_utf8(bytes).unwrap();
            if tampered_payload == payload {
                continue;
            }

            let tampered = CompactToken::from_parts(
                token.header_segment(),
                &tampered_payload,
                token.signature_segment(),
            );
            assert!(!verify(&tampered, &testing::public_key()), "byte {} was not detected", i);
        }
    }

    #[test]
    fn test_claims_decode_without_verification() {
        let token = signed_token(&json!({"uid": "alice", "claims": {"role": "admin"}}));
        let claims: Map<String, Value> = token.claims().unwrap();
        assert_eq!(claims["uid"], "alice");
        assert_eq!(token.header().unwrap(), JwtHeader::rs256());
    }
}
