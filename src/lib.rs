//! Optimal Ate pairing over the BN254 curve
//!
//! The arithmetic tower Fp -> Fp2 -> Fp4 -> Fp12 is built on fixed-width
//! radix-2^24 integers with constant-time reduction, carrying G1 and its
//! sextic twist G2 up to the pairing e: G1 x G2 -> GT, with GLV and
//! Galbraith-Scott scalar decompositions on the three groups.

pub mod arch;
pub mod big;
pub mod ecp;
pub mod ecp2;
pub mod fp;
pub mod fp12;
pub mod fp2;
pub mod fp4;
pub mod pair;
pub mod rom;

// For public consumption
pub use big::{Big, DBig};
pub use ecp::Ecp;
pub use ecp2::Ecp2;
pub use fp::Fp;
pub use fp12::{Fp12, Sparsity};
pub use fp2::Fp2;
pub use fp4::Fp4;
