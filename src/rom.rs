//! BN254 field and curve constant tables
//!
//! All values are functions of the curve parameter x = -(2^62 + 2^55 + 1):
//! p = 36x^4 + 36x^3 + 24x^2 + 6x + 1, r = p - 6x^2, t = 6x^2 + 1.
//! Limb tables are little-endian in radix 2^24.

use crate::arch::{Chunk, NLEN};

/// The 254-bit field modulus p.
pub const MODULUS: [Chunk; NLEN] =
    [0x13, 0x0, 0x13A700, 0x0, 0x210000, 0x861, 0x800000, 0xBA344D, 0x1, 0x648240, 0x2523];

/// R^2 mod p for conversion into Montgomery form, R = 2^264.
pub const R2MODP: [Chunk; NLEN] = [
    0x2F2AA7, 0x537047, 0xF8F174, 0xC3E364, 0xAB8C1C, 0x3C2035, 0x69549, 0x379287, 0x3BE629,
    0x75617A, 0x1F47,
];

/// -p^-1 mod 2^24, the Montgomery reduction constant.
pub const MCONST: Chunk = 0x9435E5;

/// Real part of the Frobenius constant (1+i)^((p-1)/6).
pub const FRA: [Chunk; NLEN] = [
    0x2A6DE9, 0xE6C06F, 0xC2E17D, 0x4D3F77, 0x97492, 0x953F85, 0x50A846, 0xB6499B, 0x2E7C8C,
    0x761921, 0x1B37,
];

/// Imaginary part of the Frobenius constant.
pub const FRB: [Chunk; NLEN] = [
    0xD5922A, 0x193F90, 0x50C582, 0xB2C088, 0x178B6D, 0x6AC8DC, 0x2F57B9, 0x3EAB2, 0xD18375,
    0xEE691E, 0x9EB,
];

/// The curve b-coefficient, y^2 = x^3 + 2.
pub const CURVE_B_I: isize = 2;

/// The prime group order r.
pub const CURVE_ORDER: [Chunk; NLEN] =
    [0xD, 0x0, 0x10A100, 0x0, 0x9F8000, 0x7FF, 0x800000, 0xBA344D, 0x1, 0x648240, 0x2523];

/// G1 generator (p-1, 1).
pub const CURVE_GX: [Chunk; NLEN] =
    [0x12, 0x0, 0x13A700, 0x0, 0x210000, 0x861, 0x800000, 0xBA344D, 0x1, 0x648240, 0x2523];
pub const CURVE_GY: [Chunk; NLEN] = [0x1, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0];

/// |x|, the absolute value of the (negative) BN parameter.
pub const CURVE_BNX: [Chunk; NLEN] = [0x1, 0x0, 0x4080, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0];

/// G1 cofactor.
pub const CURVE_COF: [Chunk; NLEN] = [0x1, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0];

/// Cube root of unity realizing the G1 endomorphism (x, y) -> (beta*x, y).
pub const CURVE_CRU: [Chunk; NLEN] =
    [0x7, 0x0, 0x6CD80, 0x0, 0x90000, 0x249, 0x400000, 0x49B362, 0x0, 0x0, 0x0];

/// G2 generator on the sextic twist, X = (PXA + i*PXB), Y = (PYA + i*PYB).
pub const CURVE_PXA: [Chunk; NLEN] = [
    0x125ABC, 0x20C523, 0x6A9AF0, 0x884281, 0xB9CFF3, 0xB965C2, 0xCAE975, 0x95A7C6, 0x31C519,
    0xC054C4, 0x13A5,
];
pub const CURVE_PXB: [Chunk; NLEN] = [
    0x340F2A, 0x7C2954, 0x8E9DA4, 0x486B92, 0xFC296D, 0xAC575D, 0x3F1680, 0x1F78B6, 0xEAFAFD,
    0x5302DE, 0x123C,
];
pub const CURVE_PYA: [Chunk; NLEN] = [
    0x4D453B, 0x3BACA3, 0xDFF3BC, 0xA22CA4, 0x3F6190, 0xDBE171, 0xC2A915, 0x8C34E, 0xA47B42,
    0x506035, 0x22E4,
];
pub const CURVE_PYB: [Chunk; NLEN] = [
    0x885C1, 0x1E1BC5, 0x2C9C18, 0xB80E0E, 0xEB2C1E, 0x1088C6, 0x8EB1EC, 0x96EF71, 0x4D9FDC,
    0x5D84C4, 0x16C,
];

/// GLV decomposition: Babai rounding multipliers ...
pub const CURVE_W: [[Chunk; NLEN]; 2] = [
    [0x1, 0x0, 0x8100, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0],
    [0x3, 0x0, 0x20400, 0x0, 0x818000, 0x61, 0x0, 0x0, 0x0, 0x0, 0x0],
];

/// ... and lattice basis rows, stored negated mod r so the decomposition
/// only accumulates.
pub const CURVE_SB: [[[Chunk; NLEN]; 2]; 2] = [
    [
        [0xC, 0x0, 0x102000, 0x0, 0x9F8000, 0x7FF, 0x800000, 0xBA344D, 0x1, 0x648240, 0x2523],
        [0x3, 0x0, 0x20400, 0x0, 0x818000, 0x61, 0x0, 0x0, 0x0, 0x0, 0x0],
    ],
    [
        [0x9, 0x0, 0xE1C00, 0x0, 0x1E0000, 0x79E, 0x800000, 0xBA344D, 0x1, 0x648240, 0x2523],
        [0xC, 0x0, 0x102000, 0x0, 0x9F8000, 0x7FF, 0x800000, 0xBA344D, 0x1, 0x648240, 0x2523],
    ],
];

/// Galbraith-Scott 4-dimensional multipliers for G2 and GT ...
pub const CURVE_WB: [[Chunk; NLEN]; 4] = [
    [0x3, 0x0, 0x28500, 0x0, 0x30000, 0xC3, 0xC00000, 0x189120, 0x0, 0x0, 0x0],
    [0x1, 0x0, 0x1C380, 0x0, 0x30000, 0xC3, 0xC00000, 0x189120, 0x0, 0x0, 0x0],
    [0x1, 0x0, 0x8100, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0],
    [0x5, 0x0, 0x44880, 0x0, 0x848000, 0x124, 0xC00000, 0x189120, 0x0, 0x0, 0x0],
];

/// ... and basis rows, same negated-mod-r storage as CURVE_SB.
pub const CURVE_BB: [[[Chunk; NLEN]; 4]; 4] = [
    [
        [0xC, 0x0, 0x102000, 0x0, 0x9F8000, 0x7FF, 0x800000, 0xBA344D, 0x1, 0x648240, 0x2523],
        [0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0],
        [0xB, 0x0, 0x102000, 0x0, 0x9F8000, 0x7FF, 0x800000, 0xBA344D, 0x1, 0x648240, 0x2523],
        [0x1, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0],
    ],
    [
        [0xC, 0x0, 0x102000, 0x0, 0x9F8000, 0x7FF, 0x800000, 0xBA344D, 0x1, 0x648240, 0x2523],
        [0x1, 0x0, 0x4080, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0],
        [0x0, 0x0, 0x4080, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0],
        [0x1, 0x0, 0x4080, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0],
    ],
    [
        [0x1, 0x0, 0x4080, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0],
        [0xC, 0x0, 0x106080, 0x0, 0x9F8000, 0x7FF, 0x800000, 0xBA344D, 0x1, 0x648240, 0x2523],
        [0x1, 0x0, 0x4080, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0],
        [0x1, 0x0, 0x8100, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0],
    ],
    [
        [0xB, 0x0, 0x102000, 0x0, 0x9F8000, 0x7FF, 0x800000, 0xBA344D, 0x1, 0x648240, 0x2523],
        [0xD, 0x0, 0x106080, 0x0, 0x9F8000, 0x7FF, 0x800000, 0xBA344D, 0x1, 0x648240, 0x2523],
        [0x1, 0x0, 0x4080, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0],
        [0xC, 0x0, 0x106080, 0x0, 0x9F8000, 0x7FF, 0x800000, 0xBA344D, 0x1, 0x648240, 0x2523],
    ],
];

/// Scalar decomposition switches: GLV on G1, Galbraith-Scott on G2 and GT.
pub const USE_GLV: bool = true;
pub const USE_GS_G2: bool = true;
pub const USE_GS_GT: bool = true;

/// Compressed-trace GT exponentiation; off for BN254.
pub const GT_STRONG: bool = false;

/// The sign of the BN parameter x.
pub const SIGN_OF_X_NEGATIVE: bool = true;

/// Upper bound on the Miller loop length, bits of 3*(6|x|-2).
pub const ATE_BITS: usize = 66;
