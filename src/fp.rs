//! Field arithmetic mod p in Montgomery form with lazy reduction

use crate::arch::{Chunk, NLEN, FEXCESS, TBITS};
use crate::big::{Big, DBig};
use crate::rom;

/// An element of Fp. `x` holds the Montgomery representative (value * R
/// mod p, R = 2^264) in normalized limb form; `xes` bounds how far the
/// value may exceed a fully reduced one (1 = reduced).
#[derive(Clone, Copy, Debug)]
pub struct Fp {
    pub x: Big,
    pub xes: i32,
}

/// Base-256 digits of (p-3)/4 expressed as sums of the `fpow` chain
/// exponents [1, 2, 3, 6, 12, 15, 30, 60, 120, 240, 255],
/// most significant digit first; -1 pads short rows.
const FPOW_SCRIPT: [[i8; 6]; 32] = [
    [3, 2, -1, -1, -1, -1],
    [7, 4, -1, -1, -1, -1],
    [8, 7, 6, 3, 0, -1],
    [6, 1, -1, -1, -1, -1],
    [8, 5, 3, 2, -1, -1],
    [-1, -1, -1, -1, -1, -1],
    [-1, -1, -1, -1, -1, -1],
    [-1, -1, -1, -1, -1, -1],
    [7, 6, 5, 2, 1, -1],
    [8, 5, 3, -1, -1, -1],
    [5, 2, 0, -1, -1, -1],
    [7, 6, 3, -1, -1, -1],
    [-1, -1, -1, -1, -1, -1],
    [-1, -1, -1, -1, -1, -1],
    [-1, -1, -1, -1, -1, -1],
    [1, -1, -1, -1, -1, -1],
    [5, 3, 2, -1, -1, -1],
    [7, 4, -1, -1, -1, -1],
    [7, 2, 0, -1, -1, -1],
    [-1, -1, -1, -1, -1, -1],
    [-1, -1, -1, -1, -1, -1],
    [-1, -1, -1, -1, -1, -1],
    [-1, -1, -1, -1, -1, -1],
    [2, 0, -1, -1, -1, -1],
    [8, 7, 6, 5, 3, 1],
    [8, 7, 4, -1, -1, -1],
    [-1, -1, -1, -1, -1, -1],
    [-1, -1, -1, -1, -1, -1],
    [-1, -1, -1, -1, -1, -1],
    [-1, -1, -1, -1, -1, -1],
    [-1, -1, -1, -1, -1, -1],
    [2, 0, -1, -1, -1, -1],
];

fn logb2(w: u32) -> usize {
    (32 - w.leading_zeros()) as usize
}

impl Fp {
    pub fn new() -> Fp {
        Fp { x: Big::new(), xes: 1 }
    }

    /// Convert a plain big integer into Montgomery form.
    pub fn from_big(a: &Big) -> Fp {
        let mut x = *a;
        x.norm();
        let d = Big::mul(&x, &Big::from_limbs(&rom::R2MODP));
        let m = Big::from_limbs(&rom::MODULUS);
        Fp { x: Big::monty(&m, rom::MCONST, &d), xes: 2 }
    }

    pub fn from_rom(a: &[Chunk; NLEN]) -> Fp {
        Fp::from_big(&Big::from_limbs(a))
    }

    pub fn from_int(a: isize) -> Fp {
        if a < 0 {
            return Fp::from_int(-a).neg();
        }
        Fp::from_big(&Big::from_int(a))
    }

    pub fn one() -> Fp {
        Fp::from_int(1)
    }

    /// Convert back out of Montgomery form.
    pub fn redc(&self) -> Big {
        let mut r = *self;
        r.reduce();
        let d = DBig::from_big(&r.x);
        let m = Big::from_limbs(&rom::MODULUS);
        Big::monty(&m, rom::MCONST, &d)
    }

    /// Estimate the quotient of self by the modulus from the top two limbs.
    fn quo(n: &Big, m: &Big) -> isize {
        let hb = 16;
        let sh = hb - TBITS;
        let num = (n.w[NLEN - 1] << sh) | (n.w[NLEN - 2] >> (crate::arch::BASEBITS - sh));
        let den = (m.w[NLEN - 1] << sh) | (m.w[NLEN - 2] >> (crate::arch::BASEBITS - sh));
        (num / (den + 1)) as isize
    }

    /// Fully reduce in constant time, leaving xes = 1.
    pub fn reduce(&mut self) {
        let m = Big::from_limbs(&rom::MODULUS);
        self.x.norm();
        let sb = if self.xes > 16 {
            // knock the excess down with a top-limb quotient estimate first
            let q = Fp::quo(&self.x, &m);
            let mut t = m;
            let carry = t.pmul(q);
            t.w[NLEN - 1] += carry << crate::arch::BASEBITS;
            self.x.sub(&t);
            self.x.norm();
            2
        } else {
            logb2((self.xes - 1) as u32)
        };
        let mut sm = m;
        sm.shl(sb + 1);
        let mut r = Big::new();
        for _ in 0..sb + 1 {
            let sr = Big::ssn(&mut r, &self.x, &mut sm);
            self.x.cmove(&r, 1 - sr);
        }
        self.xes = 1;
    }

    pub fn is_zero(&self) -> bool {
        let mut r = *self;
        r.reduce();
        r.x.is_zero()
    }

    pub fn equals(&self, b: &Fp) -> bool {
        let mut f = *self;
        let mut g = *b;
        f.reduce();
        g.reduce();
        Big::comp(&f.x, &g.x) == 0
    }

    /// Lazy addition; forces a reduction when the excess headroom is spent.
    pub fn add(&self, b: &Fp) -> Fp {
        let mut r = *self;
        r.x.add(&b.x);
        r.xes += b.xes;
        if r.xes > FEXCESS {
            r.reduce();
        }
        r.x.norm();
        r
    }

    pub fn dbl(&self) -> Fp {
        self.add(self)
    }

    pub fn neg(&self) -> Fp {
        let mut r = *self;
        let mut m = Big::from_limbs(&rom::MODULUS);
        let sb = logb2((r.xes - 1) as u32);
        m.fshl(sb);
        r.x.rsub(&m);
        r.xes = (1 << sb) + 1;
        if r.xes > FEXCESS {
            r.reduce();
        }
        r.x.norm();
        r
    }

    pub fn sub(&self, b: &Fp) -> Fp {
        self.add(&b.neg())
    }

    pub fn mul(&self, b: &Fp) -> Fp {
        let mut f = *self;
        let mut g = *b;
        if (f.xes as i64) * (g.xes as i64) > FEXCESS as i64 {
            if f.xes > 1 {
                f.reduce();
            }
            if g.xes > 1 {
                g.reduce();
            }
        }
        let d = Big::mul(&f.x, &g.x);
        let m = Big::from_limbs(&rom::MODULUS);
        Fp { x: Big::monty(&m, rom::MCONST, &d), xes: 2 }
    }

    pub fn sqr(&self) -> Fp {
        let mut f = *self;
        if (f.xes as i64) * (f.xes as i64) > FEXCESS as i64 {
            f.reduce();
        }
        let d = Big::sqr(&f.x);
        let m = Big::from_limbs(&rom::MODULUS);
        Fp { x: Big::monty(&m, rom::MCONST, &d), xes: 2 }
    }

    /// Multiply by a small integer.
    pub fn imul(&self, c: isize) -> Fp {
        let mut r = *self;
        let mut cc = c;
        let mut s = false;
        if cc < 0 {
            cc = -cc;
            s = true;
        }
        debug_assert!(cc <= FEXCESS as isize);
        if (r.xes as i64) * (cc as i64) > FEXCESS as i64 {
            r.reduce();
        }
        r.x.pmul(cc);
        r.xes *= cc as i32;
        if s {
            r = r.neg();
        }
        r
    }

    /// Halve, using the parity trick (x+p)/2 for odd x.
    pub fn half(&self) -> Fp {
        let mut r = *self;
        r.reduce();
        if r.x.parity() == 1 {
            r.x.add(&Big::from_limbs(&rom::MODULUS));
            r.x.norm();
        }
        r.x.fshr(1);
        r.xes = 2;
        r
    }

    /// Raise to a public exponent with a 4-bit window. Not constant-time.
    pub fn pow(&self, e: &Big) -> Fp {
        let mut tb = [Fp::one(); 16];
        let mut f = *self;
        f.reduce();
        for i in 1..16 {
            tb[i] = tb[i - 1].mul(&f);
        }
        let mut t = *e;
        t.norm();
        let nb = 1 + (t.nbits() + 3) / 4;
        let mut r = Fp::one();
        for i in (0..nb).rev() {
            for _ in 0..4 {
                r = r.sqr();
            }
            let mut w = t;
            w.shr(4 * i);
            let d = w.lastbits(4) as usize;
            r = r.mul(&tb[d]);
        }
        r.reduce();
        r
    }

    /// x^((p-3)/4) by a two-phase addition chain: a short power table
    /// up to x^255 followed by a fixed squaring ladder over the byte
    /// digits of the exponent. See https://eprint.iacr.org/2018/1038.
    pub fn fpow(&self) -> Fp {
        let mut xp = [*self; 11];
        xp[1] = self.sqr();
        xp[2] = xp[1].mul(self);
        xp[3] = xp[2].sqr();
        xp[4] = xp[3].sqr();
        xp[5] = xp[4].mul(&xp[2]);
        xp[6] = xp[5].sqr();
        xp[7] = xp[6].sqr();
        xp[8] = xp[7].sqr();
        xp[9] = xp[8].sqr();
        xp[10] = xp[9].mul(&xp[5]);
        let mut r = Fp::one();
        for row in FPOW_SCRIPT.iter() {
            for _ in 0..8 {
                r = r.sqr();
            }
            for &t in row.iter() {
                if t >= 0 {
                    r = r.mul(&xp[t as usize]);
                }
            }
        }
        r
    }

    /// Inverse by Fermat: x^(p-2) = fpow(x)^4 * x.
    pub fn inverse(&self) -> Fp {
        let f = self.fpow();
        let mut r = f.sqr().sqr();
        r = r.mul(self);
        r.reduce();
        r
    }

    /// Square root for p = 3 mod 4: x^((p+1)/4) = fpow(x) * x.
    /// The result squares to x only when x is a quadratic residue.
    pub fn sqrt(&self) -> Fp {
        let mut r = self.fpow().mul(self);
        r.reduce();
        r
    }

    pub fn jacobi(&self) -> isize {
        let m = Big::from_limbs(&rom::MODULUS);
        self.redc().jacobi(&m)
    }

    /// Parity of the plain (non-Montgomery) value.
    pub fn parity(&self) -> isize {
        self.redc().parity()
    }

    /// Constant-time conditional move gated by d in {0,1}.
    pub fn cmove(&mut self, b: &Fp, d: isize) {
        self.x.cmove(&b.x, d);
        let mask = -(d as i32);
        self.xes ^= (self.xes ^ b.xes) & mask;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;
    use num_bigint::BigUint;
    use num_traits::Num;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    lazy_static! {
        static ref P: BigUint = BigUint::from_str_radix(
            "2523648240000001ba344d80000000086121000000000013a700000000000013",
            16
        )
        .unwrap();
    }

    fn oracle(b: &Big) -> BigUint {
        let mut bytes = [0u8; 32];
        b.to_bytes(&mut bytes);
        BigUint::from_bytes_be(&bytes)
    }

    fn rand_fp(rng: &mut StdRng) -> (Fp, BigUint) {
        let mut bytes = [0u8; 32];
        rng.fill(&mut bytes);
        bytes[0] &= 0x1f;
        let b = Big::from_bytes(&bytes);
        let v = oracle(&b) % &*P;
        let mut r = b;
        r.rmod(&Big::from_limbs(&rom::MODULUS));
        (Fp::from_big(&r), v)
    }

    #[test]
    fn montgomery_round_trip() {
        let mut rng = StdRng::seed_from_u64(31);
        for _ in 0..100 {
            let (f, v) = rand_fp(&mut rng);
            assert_eq!(oracle(&f.redc()), v);
        }
    }

    #[test]
    fn ring_laws_against_oracle() {
        let mut rng = StdRng::seed_from_u64(32);
        for _ in 0..100 {
            let (a, va) = rand_fp(&mut rng);
            let (b, vb) = rand_fp(&mut rng);
            let (c, vc) = rand_fp(&mut rng);
            assert_eq!(oracle(&a.mul(&b).redc()), &va * &vb % &*P);
            assert_eq!(oracle(&a.add(&b).redc()), (&va + &vb) % &*P);
            assert_eq!(oracle(&a.sub(&b).redc()), ((&*P + &va) - &vb) % &*P);
            assert_eq!(oracle(&a.sqr().redc()), &va * &va % &*P);
            // distributivity exercises lazy excess tracking
            let lhs = a.add(&b).mul(&c);
            let rhs = a.mul(&c).add(&b.mul(&c));
            assert!(lhs.equals(&rhs));
        }
    }

    #[test]
    fn deep_lazy_chains_reduce_correctly() {
        let mut rng = StdRng::seed_from_u64(33);
        let (a, va) = rand_fp(&mut rng);
        let mut acc = a;
        let mut vacc = va.clone();
        for _ in 0..5000 {
            acc = acc.add(&a);
            vacc = (&vacc + &va) % &*P;
        }
        assert_eq!(oracle(&acc.redc()), vacc);
    }

    #[test]
    fn negation_and_imul() {
        let mut rng = StdRng::seed_from_u64(34);
        for _ in 0..50 {
            let (a, va) = rand_fp(&mut rng);
            assert_eq!(oracle(&a.neg().redc()), (&*P - &va) % &*P);
            assert_eq!(oracle(&a.imul(9).redc()), &va * 9u32 % &*P);
            assert_eq!(oracle(&a.imul(-7).redc()), (&*P - (&va * 7u32 % &*P)) % &*P);
            assert!(a.half().dbl().equals(&a));
        }
    }

    #[test]
    fn inverse_and_fpow() {
        let mut rng = StdRng::seed_from_u64(35);
        for _ in 0..20 {
            let (a, _) = rand_fp(&mut rng);
            if a.is_zero() {
                continue;
            }
            let i = a.inverse();
            assert!(a.mul(&i).equals(&Fp::one()));
            // fpow agrees with the generic window power
            let mut e = Big::from_limbs(&rom::MODULUS);
            e.dec(3);
            e.norm();
            e.shr(2);
            assert!(a.fpow().equals(&a.pow(&e)));
        }
    }

    #[test]
    fn sqrt_of_residues() {
        let mut rng = StdRng::seed_from_u64(36);
        let mut nonres = 0;
        for _ in 0..40 {
            let (a, _) = rand_fp(&mut rng);
            if a.is_zero() {
                continue;
            }
            let s = a.sqr();
            assert_eq!(s.jacobi(), 1);
            let r = s.sqrt();
            assert!(r.sqr().equals(&s));
            if a.jacobi() == -1 {
                nonres += 1;
                assert!(!a.sqrt().sqr().equals(&a));
            }
        }
        assert!(nonres > 0);
    }

    #[test]
    fn reduce_from_maximum_excess() {
        let mut rng = StdRng::seed_from_u64(37);
        let (a, va) = rand_fp(&mut rng);
        // drive xes close to FEXCESS, then force both reduce paths
        let mut f = a;
        let mut v = va;
        while f.xes < 300 {
            f = f.add(&f);
            v = (&v + &v) % &*P;
        }
        let mut g = f;
        g.reduce();
        assert_eq!(g.xes, 1);
        assert_eq!(oracle(&g.redc()), v);
    }
}
