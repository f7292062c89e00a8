//! G1: projective points on the base curve y^2 = x^3 + 2 over Fp

use crate::arch::MODBYTES;
use crate::big::{teq, Big};
use crate::fp::Fp;
use crate::rom;

/// A projective point (x, y, z); the identity is z = 0 (with y = 1).
/// The add/dbl formulas are the complete a = 0 ones, so no special
/// casing of doubling or inverses is ever needed.
#[derive(Clone, Copy, Debug)]
pub struct Ecp {
    pub x: Fp,
    pub y: Fp,
    pub z: Fp,
}

impl Ecp {
    /// The point at infinity.
    pub fn new() -> Ecp {
        Ecp { x: Fp::new(), y: Fp::one(), z: Fp::new() }
    }

    /// Install an affine point, verifying the curve equation; off-curve
    /// coordinates yield the point at infinity.
    pub fn from_bigs(ix: &Big, iy: &Big) -> Ecp {
        let x = Fp::from_big(ix);
        let y = Fp::from_big(iy);
        if y.sqr().equals(&Ecp::rhs(&x)) {
            Ecp { x, y, z: Fp::one() }
        } else {
            Ecp::new()
        }
    }

    /// Recover a point from x and the parity bit of y.
    pub fn from_x(ix: &Big, s: isize) -> Ecp {
        let x = Fp::from_big(ix);
        let rhs = Ecp::rhs(&x);
        let mut y = rhs.sqrt();
        if !y.sqr().equals(&rhs) {
            return Ecp::new();
        }
        if y.parity() != s {
            y = y.neg();
        }
        Ecp { x, y, z: Fp::one() }
    }

    pub fn generator() -> Ecp {
        Ecp::from_bigs(&Big::from_limbs(&rom::CURVE_GX), &Big::from_limbs(&rom::CURVE_GY))
    }

    /// The curve right-hand side x^3 + b.
    pub fn rhs(x: &Fp) -> Fp {
        x.sqr().mul(x).add(&Fp::from_int(rom::CURVE_B_I))
    }

    pub fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    pub fn equals(&self, o: &Ecp) -> bool {
        let a = self.x.mul(&o.z);
        let b = o.x.mul(&self.z);
        let c = self.y.mul(&o.z);
        let d = o.y.mul(&self.z);
        a.equals(&b) && c.equals(&d)
    }

    pub fn neg(&self) -> Ecp {
        Ecp { x: self.x, y: self.y.neg(), z: self.z }
    }

    /// Complete addition (Renes-Costello-Batina, a = 0, 3b = 6).
    pub fn add(&self, o: &Ecp) -> Ecp {
        let b3 = 3 * rom::CURVE_B_I;
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
        let t2 = t2.imul(b3);
        let z3 = t1.add(&t2);
        let t1 = t1.sub(&t2);
        let y3 = y3.imul(b3);
        let x3 = t3.mul(&t1).sub(&t4.mul(&y3));
        let ry = y3.mul(&t0).add(&t1.mul(&z3));
        let rz = z3.mul(&t4).add(&t0.mul(&t3));
        Ecp { x: x3, y: ry, z: rz }
    }

    /// Complete doubling.
    pub fn dbl(&self) -> Ecp {
        let b3 = 3 * rom::CURVE_B_I;
        let t0 = self.y.sqr();
        let z3 = t0.imul(8);
        let t1 = self.y.mul(&self.z);
        let t2 = self.z.sqr().imul(b3);
        let x3 = t2.mul(&z3);
        let y3 = t0.add(&t2);
        let rz = t1.mul(&z3);
        let t2 = t2.imul(3);
        let t0 = t0.sub(&t2);
        let ry = t0.mul(&y3).add(&x3);
        let rx = t0.mul(&self.x.mul(&self.y)).dbl();
        Ecp { x: rx, y: ry, z: rz }
    }

    pub fn sub(&self, o: &Ecp) -> Ecp {
        self.add(&o.neg())
    }

    /// Normalize to affine (z = 1).
    pub fn affine(&mut self) {
        if self.is_infinity() {
            return;
        }
        let zi = self.z.inverse();
        self.x = self.x.mul(&zi);
        self.y = self.y.mul(&zi);
        self.z = Fp::one();
        self.x.reduce();
        self.y.reduce();
    }

    /// Constant-time conditional move gated by d in {0,1}.
    pub fn cmove(&mut self, o: &Ecp, d: isize) {
        self.x.cmove(&o.x, d);
        self.y.cmove(&o.y, d);
        self.z.cmove(&o.z, d);
    }

    /// Constant-time select of sign(b) * w[(|b|-1)/2] for odd signed b.
    fn selector(w: &[Ecp; 8], b: isize) -> Ecp {
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

    /// Constant-time scalar multiplication by a fixed signed 4-bit
    /// window over odd multiples, with the usual parity correction.
    pub fn mul(&self, e: &Big) -> Ecp {
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
        // correction point: P if e was even, 2P if odd
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
        let mut p = Ecp::selector(&w, wd[nb]);
        for i in (0..nb).rev() {
            let sel = Ecp::selector(&w, wd[i]);
            p = p.dbl().dbl().dbl().dbl();
            p = p.add(&sel);
        }
        let mut p = p.sub(&c);
        p.affine();
        p
    }

    /// Constant-time joint e*self + f*q by interleaved signed 2-bit
    /// windows over the 16 combinations a*self + b*q, a, b odd in [-3, 3].
    pub fn mul2(&self, e: &Big, q: &Ecp, f: &Big) -> Ecp {
        let mut te = *e;
        let mut tf = *f;
        te.norm();
        tf.norm();
        // make both scalars odd, with correction points
        let s = te.parity();
        te.inc(1);
        te.norm();
        let ns = te.parity();
        let mut mt = te;
        mt.inc(1);
        mt.norm();
        te.cmove(&mt, s);
        let mut cp = self.dbl();
        let t = *self;
        cp.cmove(&t, ns);
        let s = tf.parity();
        tf.inc(1);
        tf.norm();
        let ns = tf.parity();
        let mut mt = tf;
        mt.inc(1);
        mt.norm();
        tf.cmove(&mt, s);
        let mut sq = q.dbl();
        sq.cmove(q, ns);
        // table: a*P + b*Q for a in {1,3}, b in {-3,-1,1,3}
        let q2 = q.dbl();
        let p2 = self.dbl();
        let mut w = [Ecp::new(); 8];
        w[1] = self.sub(q);
        w[0] = w[1].sub(&q2);
        w[2] = self.add(q);
        w[3] = w[2].add(&q2);
        w[4] = w[0].add(&p2);
        w[5] = w[1].add(&p2);
        w[6] = w[2].add(&p2);
        w[7] = w[3].add(&p2);
        let sel = |a: isize, b: isize| -> Ecp {
            let m = a >> (isize::BITS - 1);
            let aa = (a ^ m) - m;
            let bb = (b ^ m) - m;
            let idx = 2 * (aa - 1) + (bb + 3) / 2;
            let mut p = w[0];
            for (i, wi) in w.iter().enumerate() {
                p.cmove(wi, teq(idx, i as isize));
            }
            let mp = p.neg();
            p.cmove(&mp, (m & 1) as isize);
            p
        };
        let nbe = te.nbits();
        let nbf = tf.nbits();
        let nb = 1 + (if nbe > nbf { nbe } else { nbf } + 1) / 2;
        let mut we = [0isize; 131];
        let mut wf = [0isize; 131];
        for i in 0..nb {
            we[i] = te.lastbits(3) - 4;
            te.dec(we[i]);
            te.norm();
            te.fshr(2);
            wf[i] = tf.lastbits(3) - 4;
            tf.dec(wf[i]);
            tf.norm();
            tf.fshr(2);
        }
        we[nb] = te.lastbits(3);
        wf[nb] = tf.lastbits(3);
        let mut p = sel(we[nb], wf[nb]);
        for i in (0..nb).rev() {
            let t = sel(we[i], wf[i]);
            p = p.dbl().dbl();
            p = p.add(&t);
        }
        let mut p = p.sub(&cp).sub(&sq);
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

    /// Encode as 0x04 | X | Y (65 bytes) or 0x02/0x03 | X (33 bytes).
    pub fn to_bytes(&self, b: &mut [u8], compress: bool) {
        let mut w = *self;
        w.affine();
        let mut chunk = [0u8; MODBYTES];
        w.x.redc().to_bytes(&mut chunk);
        b[1..MODBYTES + 1].copy_from_slice(&chunk);
        if compress {
            b[0] = 0x02 + w.y.parity() as u8;
            return;
        }
        b[0] = 0x04;
        w.y.redc().to_bytes(&mut chunk);
        b[MODBYTES + 1..2 * MODBYTES + 1].copy_from_slice(&chunk);
    }

    /// Decode by leading tag; any invalid encoding (bad tag, coordinate
    /// out of range, point off curve) yields the point at infinity.
    pub fn from_bytes(b: &[u8]) -> Ecp {
        let m = Big::from_limbs(&rom::MODULUS);
        let t = b[0];
        let px = Big::from_bytes(&b[1..MODBYTES + 1]);
        if Big::comp(&px, &m) >= 0 {
            return Ecp::new();
        }
        match t {
            0x04 => {
                let py = Big::from_bytes(&b[MODBYTES + 1..2 * MODBYTES + 1]);
                if Big::comp(&py, &m) >= 0 {
                    return Ecp::new();
                }
                Ecp::from_bigs(&px, &py)
            }
            0x02 | 0x03 => Ecp::from_x(&px, (t & 1) as isize),
            _ => Ecp::new(),
        }
    }
}
