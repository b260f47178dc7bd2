#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # Usage
//!
//! Build a handle from DER key material and a padding configuration, then
//! drive the four operations through it:
//!
//! ```
//! use rsa_backend::{KeyKind, Padding, RsaHandle, RsaKeyParameters};
//!
//! // Toy 12-bit key, for illustration only: n = 3233, e = 17, d = 413.
//! let params = RsaKeyParameters::private(&[0x0c, 0xa1], &[0x11], &[0x01, 0x9d]);
//! let handle = RsaHandle::from_parameters(KeyKind::Private, &params, Padding::Raw)?;
//!
//! let mut ciphertext = [0u8; 2];
//! handle.encrypt(&[0x41], &mut ciphertext)?;
//! assert_eq!(ciphertext, [0x0a, 0xe6]);
//!
//! let mut plaintext = [0u8; 2];
//! handle.decrypt(&ciphertext, &mut plaintext)?;
//! assert_eq!(plaintext, [0x00, 0x41]);
//! # Ok::<(), rsa_backend::Error>(())
//! ```
//!
//! Handles built from serialized keys go through [`build`], which parses
//! bare PKCS#1 as well as PKCS#8/SPKI containers.

#[macro_use]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use pkcs1;
pub use pkcs8;

mod backend;
mod encoding;
pub mod engine;
pub mod errors;
mod hash;
mod key;
mod ops;
mod padding;

pub use crate::backend::{build, supports, Algorithm};
pub use crate::errors::{Error, Result};
pub use crate::hash::HashAlg;
pub use crate::key::{KeyKind, RsaHandle, RsaKeyParameters};
pub use crate::padding::Padding;
