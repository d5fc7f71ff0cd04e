//! Kernel export classification for the veld compiler front end.
//!
//! Given an exported function declaration, this crate decides which special
//! role the function plays (graphics entry point, compute kernel candidate,
//! lifecycle hook), binds a kernel's parameters to the five fixed runtime
//! roles (input buffer, output buffer, user data, X and Y coordinates),
//! encodes the signature presence mask consumed by runtime argument
//! marshaling, and validates the result against the module's declared
//! target API level.
//!
//! The pass never stops at the first violation: every broken rule is
//! reported, so one compile surfaces every defect in a signature. The only
//! fatal condition is a user-data payload that reflection cannot express,
//! which drops that one function and leaves the rest of the module alone.

pub mod compat;
mod error;
pub mod export;
pub mod signature;
pub mod special;

/// Declaration builders and stub exporters for tests.
///
/// Only available when compiling this crate's own tests or with the
/// `test-utils` feature enabled; not part of the stable API.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod tests_signature;

pub use crate::error::KernelError;
pub use crate::export::{DescriptorClass, TypeDescriptor, TypeExporter};
pub use crate::signature::{classify_kernel, create_dummy_root, KernelSignature, SignatureBits};
pub use crate::special::{
    classify_special_function, is_graphics_root, is_kernel_candidate, validate_special_form,
    SpecialFunctionKind,
};
