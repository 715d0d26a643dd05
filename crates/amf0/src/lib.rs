//! AMF0 value model and decoder.
//!
//! Only the read side is implemented. Decoded values borrow from the input
//! buffer; call [`Amf0Value::into_owned`] to detach them.
//!
//! Reference: amf0_spec_121207.pdf
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]

mod decode;
mod define;
mod errors;

pub use crate::decode::{Amf0Decoder, MAX_NESTING_DEPTH};
pub use crate::define::{Amf0Marker, Amf0Property, Amf0Value};
pub use crate::errors::Amf0ReadError;
