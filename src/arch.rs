//! Limb representation parameters for the 254-bit field arithmetic

/// Limb type. Limbs hold 24-bit digits but keep signed headroom so that
/// lazy (carry-free) additions and subtractions never overflow.
pub type Chunk = i64;

/// Accumulator type for limb products.
pub type DChunk = i64;

/// Bits per limb digit.
pub const BASEBITS: usize = 24;

/// Limbs per 256-bit integer: ceil(256/24).
pub const NLEN: usize = 11;

/// Limbs per double-width integer.
pub const DNLEN: usize = 2 * NLEN;

/// Digit mask, 2^24 - 1.
pub const BMASK: Chunk = (1 << BASEBITS) - 1;

/// Bytes in the external (big-endian) encoding of a field element.
pub const MODBYTES: usize = 32;

/// Bit length of the modulus.
pub const MODBITS: usize = 254;

/// MODBITS mod BASEBITS, used by the quotient estimate in reduction.
pub const TBITS: usize = MODBITS % BASEBITS;

/// Largest tolerated excess factor of an unreduced field element: the
/// representation has 264 bits of room above the 254-bit modulus.
pub const FEXCESS: i32 = (1 << 10) - 1;
