//! Derived read-only views over the flat record collections.
//!
//! Everything in this module is pure, synchronous computation over
//! already-fetched collections: no I/O, no logging, no mutation of inputs.
//! Handlers fetch the flat collections from the repository and pass them in
//! as slices; the functions here reconstruct the nested views and orderings
//! the frontend renders.

mod aggregate;
mod join;

pub use aggregate::*;
pub use join::*;
