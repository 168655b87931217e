//! Netherlink Manifest Signing Library
//!
//! Launcher manifests are served with a detached RSA signature so clients can
//! verify that the mod list was not tampered with in transit. Keys arrive
//! through the admin API in whatever shape an operator pasted them in; this
//! crate recovers a usable key from that material and signs manifest bytes.
//!
//! ## Primitives
//!
//! - **Key recovery**: PEM normalization plus a fixed list of candidate
//!   wrappers (PKCS#8 and PKCS#1) tried in order
//! - **Signing**: RSA PKCS#1 v1.5 over SHA-256, base64-encoded output

pub mod error;
pub mod pem;
pub mod signer;

pub use error::CryptoError;
pub use pem::{KeyFormat, strip_pem};
pub use signer::{PLACEHOLDER_SIGNATURE, sign_manifest, sign_or_placeholder};
