//! G2: projective points on the sextic twist y^2 = x^3 + 2/(1+i) over Fp2

use crate::arch::MODBYTES;
use crate::big::{teq, Big};
use crate::fp2::Fp2;
use crate::rom;

/// A projective twist point; the identity is z = 0.
#[derive(Clone, Copy, Debug)]
pub struct Ecp2 {
    pub x: Fp2,
    pub y: Fp2,
    pub z: Fp2,
}

impl Ecp2 {
    pub fn new() -> Ecp2 {
        Ecp2 { x: Fp2::new(), y: Fp2::one(), z: Fp2::new() }
    }

    /// Install an affine point, verifying the twist equation; off-curve
    /// coordinates yield the point at infinity.
    pub fn from_fp2s(ix: &Fp2, iy: &Fp2) -> Ecp2 {
        if iy.sqr().equals(&Ecp2::rhs(ix)) {
            Ecp2 { x: *ix, y: *iy, z: Fp2::one() }
        } else {
            Ecp2::new()
        }
    }

    pub fn generator() -> Ecp2 {
        Ecp2::from_fp2s(
            &Fp2::from_bigs(&Big::from_limbs(&rom::CURVE_PXA), &Big::from_limbs(&rom::CURVE_PXB)),
            &Fp2::from_bigs(&Big::from_limbs(&rom::CURVE_PYA), &Big::from_limbs(&rom::CURVE_PYB)),
        )
    }

    /// The twist b-coefficient b/(1+i).
    pub fn twist_b() -> Fp2 {
        Fp2::from_int(rom::CURVE_B_I).div_ip()
    }

    /// Twist right-hand side x^3 + b/(1+i).
    pub fn rhs(x: &Fp2) -> Fp2 {
        x.sqr().mul(x).add(&Ecp2::twist_b())
    }

    pub fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    pub fn equals(&self, o: &Ecp2) -> bool {
        let a = self.x.mul(&o.z);
        let b = o.x.mul(&self.z);
        let c = self.y.mul(&o.z);
        let d = o.y.mul(&self.z);
        a.equals(&b) && c.equals(&d)
    }

    pub fn neg(&self) -> Ecp2 {
        Ecp2 { x: self.x, y: self.y.neg(), z: self.z }
    }

    /// Complete addition over Fp2; 3b is a full Fp2 constant here.
    pub fn add(&self, o: &Ecp2) -> Ecp2 {
        let b3 = Ecp2::twist_b().imul(3);
        let t0 = self.x.mul(&o.x);
        let t1 = self.y.mul(&o.y);
        let t2 = self.z.mul(&o.z);
        let t3 = self
            .x
            .add(&self.y)
            .mul(&o.x.add(&o.y))
            .sub(&t0.add(&t1));
        let t4 = self
            .y
            .add(&self.z)
            .mul(&o.y.add(&o.z))
            .sub(&t1.add(&t2));
        let y3 = self
            .x
            .add(&self.z)
            .mul(&o.x.add(&o.z))
            .sub(&t0.add(&t2));
        let t0 = t0.imul(3);
        let t2 = t2.mul(&b3);
        let z3 = t1.add(&t2);
        let t1 = t1.sub(&t2);
        let y3 = y3.mul(&b3);
        let x3 = t3.mul(&t1).sub(&t4.mul(&y3));
        let ry = y3.mul(&t0).add(&t1.mul(&z3));
        let rz = z3.mul(&t4).add(&t0.mul(&t3));
        Ecp2 { x: x3, y: ry, z: rz }
    }

    pub fn dbl(&self) -> Ecp2 {
        let b3 = Ecp2::twist_b().imul(3);
        let t0 = self.y.sqr();
        let z3 = t0.imul(8);
        let t1 = self.y.mul(&self.z);
        let t2 = self.z.sqr().mul(&b3);
        let x3 = t2.mul(&z3);
        let y3 = t0.add(&t2);
        let rz = t1.mul(&z3);
        let t2 = t2.imul(3);
        let t0 = t0.sub(&t2);
        let ry = t0.mul(&y3).add(&x3);
        let rx = t0.mul(&self.x.mul(&self.y)).dbl();
        Ecp2 { x: rx, y: ry, z: rz }
    }

    pub fn sub(&self, o: &Ecp2) -> Ecp2 {
        self.add(&o.neg())
    }

    pub fn affine(&mut self) {
        if self.is_infinity() {
            return;
        }
        let zi = self.z.inverse();
        self.x = self.x.mul(&zi);
        self.y = self.y.mul(&zi);
        self.z = Fp2::one();
        self.x.reduce();
        self.y.reduce();
    }

    /// Frobenius endomorphism: x <- conj(x) X^2, y <- conj(y) X^3 where
    /// X is the ROM Frobenius constant. Acts as multiplication by 6x^2
    /// on the order-r subgroup.
    pub fn frob(&self, x: &Fp2) -> Ecp2 {
        let x2 = x.sqr();
        let x3 = x2.mul(x);
        Ecp2 {
            x: self.x.conj().mul(&x2),
            y: self.y.conj().mul(&x3),
            z: self.z.conj(),
        }
    }

    pub fn cmove(&mut self, o: &Ecp2, d: isize) {
        self.x.cmove(&o.x, d);
        self.y.cmove(&o.y, d);
        self.z.cmove(&o.z, d);
    }

    fn selector(w: &[Ecp2; 8], b: isize) -> Ecp2 {
        let m = b >> (isize::BITS - 1);
        let babs = ((b ^ m) - m - 1) / 2;
        let mut p = w[0];
        for (i, wi) in w.iter().enumerate() {
            p.cmove(wi, teq(babs, i as isize));
        }
        let mp = p.neg();
        p.cmove(&mp, (m & 1) as isize);
        p
    }

    /// Constant-time signed 4-bit window multiplication, same shape as
    /// the G1 ladder.
    pub fn mul(&self, e: &Big) -> Ecp2 {
        let mut t = *e;
        t.norm();
        let s = t.parity();
        t.inc(1);
        t.norm();
        let ns = t.parity();
        let mut mt = t;
        mt.inc(1);
        mt.norm();
        t.cmove(&mt, s);
        let q = self.dbl();
        let mut c = q;
        c.cmove(self, ns);
        let mut w = [*self; 8];
        for i in 1..8 {
            w[i] = w[i - 1].add(&q);
        }
        let nb = 1 + (t.nbits() + 3) / 4;
        let mut wd = [0isize; 67];
        for d in wd.iter_mut().take(nb) {
            *d = t.lastbits(5) - 16;
            t.dec(*d);
            t.norm();
            t.fshr(4);
        }
        wd[nb] = t.lastbits(5);
        let mut p = Ecp2::selector(&w, wd[nb]);
        for i in (0..nb).rev() {
            let sel = Ecp2::selector(&w, wd[i]);
            p = p.dbl().dbl().dbl().dbl();
            p = p.add(&sel);
        }
        let mut p = p.sub(&c);
        p.affine();
        p
    }

    /// Constant-time u0*q0 + u1*q1 + u2*q2 + u3*q3 with the sign-aligned
    /// recoding used after Galbraith-Scott decomposition.
    pub fn mul4(q: &[Ecp2; 4], u: &[Big; 4]) -> Ecp2 {
        const CT: usize = 265;
        let mut t = [u[0], u[1], u[2], u[3]];
        for ti in t.iter_mut() {
            ti.norm();
        }
        let mut nb = 0;
        for ti in t.iter() {
            let n = ti.nbits();
            if n > nb {
                nb = n;
            }
        }
        nb += 1;
        debug_assert!(nb < CT);
        let pf = 1 - t[0].parity();
        t[0].inc(pf);
        t[0].norm();
        let mut s = [0i8; CT];
        for i in 0..nb - 1 {
            s[i] = (2 * t[0].bit(i + 1) - 1) as i8;
        }
        s[nb - 1] = 1;
        let mut w = [[0i8; CT]; 3];
        for j in 0..3 {
            let mut a = t[j + 1];
            for i in 0..nb {
                if a.parity() == 1 {
                    w[j][i] = 1;
                    a.dec(s[i] as isize);
                    a.norm();
                }
                a.fshr(1);
            }
            debug_assert!(a.is_zero());
        }
        let mut g = [Ecp2::new(); 8];
        g[0] = q[0];
        g[1] = g[0].add(&q[1]);
        g[2] = g[0].add(&q[2]);
        g[3] = g[1].add(&q[2]);
        g[4] = g[0].add(&q[3]);
        g[5] = g[1].add(&q[3]);
        g[6] = g[2].add(&q[3]);
        g[7] = g[3].add(&q[3]);
        let mut p = Ecp2::new();
        for i in (0..nb).rev() {
            p = p.dbl();
            let k = (w[0][i] | (w[1][i] << 1) | (w[2][i] << 2)) as isize;
            let mut sel = g[0];
            for (m, gm) in g.iter().enumerate() {
                sel.cmove(gm, teq(k, m as isize));
            }
            let neg = sel.neg();
            sel.cmove(&neg, ((1 - s[i]) / 2) as isize);
            p = p.add(&sel);
        }
        let fix = p.sub(&q[0]);
        p.cmove(&fix, pf);
        p.affine();
        p
    }

    /// True when the point has the full group order.
    pub fn in_subgroup(&self) -> bool {
        if self.is_infinity() {
            return false;
        }
        self.mul(&Big::from_limbs(&rom::CURVE_ORDER)).is_infinity()
    }

    /// 128-byte encoding X.a | X.b | Y.a | Y.b, each 32 bytes big-endian.
    pub fn to_bytes(&self, b: &mut [u8; 4 * MODBYTES]) {
        let mut w = *self;
        w.affine();
        let mut chunk = [0u8; MODBYTES];
        let parts = [&w.x.a, &w.x.b, &w.y.a, &w.y.b];
        for (i, f) in parts.iter().enumerate() {
            f.redc().to_bytes(&mut chunk);
            b[i * MODBYTES..(i + 1) * MODBYTES].copy_from_slice(&chunk);
        }
    }

    /// Decode; out-of-range coordinates or off-curve points yield the
    /// point at infinity.
    pub fn from_bytes(b: &[u8; 4 * MODBYTES]) -> Ecp2 {
        let m = Big::from_limbs(&rom::MODULUS);
        let mut parts = [Big::new(); 4];
        for (i, f) in parts.iter_mut().enumerate() {
            *f = Big::from_bytes(&b[i * MODBYTES..(i + 1) * MODBYTES]);
            if Big::comp(f, &m) >= 0 {
                return Ecp2::new();
            }
        }
        let x = Fp2::from_bigs(&parts[0], &parts[1]);
        let y = Fp2::from_bigs(&parts[2], &parts[3]);
        Ecp2::from_fp2s(&x, &y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn rand_scalar(rng: &mut StdRng) -> Big {
        let mut bytes = [0u8; 32];
        rng.fill(&mut bytes);
        let mut b = Big::from_bytes(&bytes);
        b.rmod(&Big::from_limbs(&rom::CURVE_ORDER));
        b
    }

    #[test]
    fn generator_is_on_twist() {
        let g = Ecp2::generator();
        assert!(!g.is_infinity());
        assert!(g.y.sqr().equals(&Ecp2::rhs(&g.x)));
        assert!(g.in_subgroup());
    }

    #[test]
    fn group_laws() {
        let g = Ecp2::generator();
        assert!(g.add(&g).equals(&g.dbl()));
        assert!(g.sub(&g).is_infinity());
        let g2 = g.dbl();
        assert!(g2.add(&g).sub(&g2).equals(&g));
        assert!(Ecp2::new().dbl().is_infinity());
        assert!(g.add(&Ecp2::new()).equals(&g));
    }

    #[test]
    fn window_mul_matches_double_and_add() {
        let g = Ecp2::generator();
        let mut acc = Ecp2::new();
        for k in 0..20isize {
            assert!(g.mul(&Big::from_int(k)).equals(&acc), "k = {}", k);
            acc = acc.add(&g);
        }
    }

    #[test]
    fn order_annihilates() {
        let g = Ecp2::generator();
        assert!(g.mul(&Big::from_limbs(&rom::CURVE_ORDER)).is_infinity());
    }

    #[test]
    fn frob_is_multiplication_by_trace_minus_one() {
        let g = Ecp2::generator();
        let f = Fp2::from_bigs(&Big::from_limbs(&rom::FRA), &Big::from_limbs(&rom::FRB));
        // 6x^2 = t - 1
        let bnx = Big::from_limbs(&rom::CURVE_BNX);
        let mut tm1 = Big::mul(&bnx, &bnx).dmod(&Big::from_limbs(&rom::CURVE_ORDER));
        tm1.pmul(6);
        tm1.norm();
        assert!(g.frob(&f).equals(&g.mul(&tm1)));
    }

    #[test]
    fn mul4_matches_separate(){
        let mut rng = StdRng::seed_from_u64(81);
        let g = Ecp2::generator();
        let q = [
            g,
            g.mul(&Big::from_int(3)),
            g.mul(&Big::from_int(5)),
            g.mul(&Big::from_int(11)),
        ];
        for _ in 0..3 {
            let mut u = [Big::new(); 4];
            for ui in u.iter_mut() {
                let mut s = rand_scalar(&mut rng);
                s.mod2m(64);
                *ui = s;
            }
            let want = q[0]
                .mul(&u[0])
                .add(&q[1].mul(&u[1]))
                .add(&q[2].mul(&u[2]))
                .add(&q[3].mul(&u[3]));
            assert!(Ecp2::mul4(&q, &u).equals(&want));
        }
        // even pivot and zero limbs exercise the parity fixup
        let u = [Big::from_int(6), Big::from_int(0), Big::from_int(1), Big::from_int(4)];
        let want = q[0].mul(&u[0]).add(&q[2]).add(&q[3].mul(&u[3]));
        assert!(Ecp2::mul4(&q, &u).equals(&want));
    }

    #[test]
    fn codec_round_trips() {
        let mut rng = StdRng::seed_from_u64(82);
        let g = Ecp2::generator();
        for _ in 0..3 {
            let p = g.mul(&rand_scalar(&mut rng));
            let mut b = [0u8; 128];
            p.to_bytes(&mut b);
            assert!(Ecp2::from_bytes(&b).equals(&p));
        }
        // out-of-range coordinate
        let mut bad = [0u8; 128];
        Big::from_limbs(&rom::MODULUS).to_bytes(<&mut [u8; 32]>::try_from(&mut bad[0..32]).unwrap());
        assert!(Ecp2::from_bytes(&bad).is_infinity());
        // off-twist point
        let mut off = [0u8; 128];
        off[31] = 1;
        off[63] = 1;
        off[95] = 1;
        off[127] = 1;
        assert!(Ecp2::from_bytes(&off).is_infinity());
    }
}
