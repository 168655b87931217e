//! Manifest signing with operator-supplied keys.
//!
//! Signatures are RSA PKCS#1 v1.5 over SHA-256 of the manifest bytes,
//! base64-encoded. When no usable key can be recovered from the stored
//! material the signer degrades to [`PLACEHOLDER_SIGNATURE`] rather than
//! failing the whole manifest request; launchers surface the broken
//! signature while players can still read the mod list.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use rsa::RsaPrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use sha2::Sha256;

use crate::error::CryptoError;
use crate::pem::{KeyFormat, strip_pem};

/// Signature value served when no usable key could be recovered.
pub const PLACEHOLDER_SIGNATURE: &str = "INVALID_SIGNATURE";

/// Sign `payload` with a key re-armored under one specific wrapper.
///
/// `body` must already be bare base64 (see [`strip_pem`]).
pub fn sign_manifest(format: KeyFormat, payload: &[u8], body: &str) -> Result<String, CryptoError> {
    let pem = format.rebuild(body);
    let key = if format.is_pkcs1() {
        RsaPrivateKey::from_pkcs1_pem(&pem).map_err(|e| CryptoError::InvalidKey(e.to_string()))?
    } else {
        RsaPrivateKey::from_pkcs8_pem(&pem).map_err(|e| CryptoError::InvalidKey(e.to_string()))?
    };
    let signing_key = SigningKey::<Sha256>::new(key);
    let signature = signing_key
        .try_sign(payload)
        .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
    Ok(BASE64.encode(signature.to_bytes()))
}

/// Sign `payload` with stored key material, trying each candidate wrapper
/// in order. Returns [`PLACEHOLDER_SIGNATURE`] when every attempt fails.
pub fn sign_or_placeholder(payload: &[u8], key_material: &str) -> String {
    let body = strip_pem(key_material);
    for format in KeyFormat::ALL {
        if let Ok(signature) = sign_manifest(format, payload, &body) {
            return signature;
        }
    }
    PLACEHOLDER_SIGNATURE.to_string()
}
