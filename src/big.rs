//! Fixed-width multi-precision integers in radix 2^24

use crate::arch::{Chunk, DChunk, BASEBITS, BMASK, DNLEN, MODBYTES, NLEN};

/// A 256-bit (11 x 24-bit limb) non-negative integer.
///
/// Limbs may temporarily exceed the digit range during lazy arithmetic;
/// `norm` redistributes carries. Callers must normalize before comparisons,
/// shifts and multiplications.
#[derive(Clone, Copy, Debug)]
pub struct Big {
    pub w: [Chunk; NLEN],
}

/// A double-width (512-bit capacity) integer holding products before
/// reduction.
#[derive(Clone, Copy, Debug)]
pub struct DBig {
    pub w: [Chunk; DNLEN],
}

impl Big {
    pub const fn new() -> Big {
        Big { w: [0; NLEN] }
    }

    pub fn from_int(x: isize) -> Big {
        let mut s = Big::new();
        s.w[0] = x as Chunk;
        s
    }

    /// Load from a ROM limb table.
    pub const fn from_limbs(a: &[Chunk; NLEN]) -> Big {
        Big { w: *a }
    }

    /// Copy the low half of a double-width integer.
    pub fn from_dbig(d: &DBig) -> Big {
        let mut s = Big::new();
        s.w[..NLEN].copy_from_slice(&d.w[..NLEN]);
        s
    }

    pub fn zero(&mut self) {
        self.w = [0; NLEN];
    }

    pub fn copy(&mut self, x: &Big) {
        self.w = x.w;
    }

    pub fn is_zero(&self) -> bool {
        self.w.iter().all(|&c| c == 0)
    }

    pub fn is_one(&self) -> bool {
        self.w[0] == 1 && self.w[1..].iter().all(|&c| c == 0)
    }

    /// Propagate carries so that every limb is in [0, 2^24). Returns the
    /// excess that ends up above the top digit.
    pub fn norm(&mut self) -> Chunk {
        let mut carry = 0 as Chunk;
        for i in 0..NLEN - 1 {
            let d = self.w[i] + carry;
            self.w[i] = d & BMASK;
            carry = d >> BASEBITS;
        }
        self.w[NLEN - 1] += carry;
        self.w[NLEN - 1] >> BASEBITS
    }

    /// Lazy addition; does not normalize.
    pub fn add(&mut self, y: &Big) {
        for i in 0..NLEN {
            self.w[i] += y.w[i];
        }
    }

    /// Lazy subtraction; does not normalize.
    pub fn sub(&mut self, y: &Big) {
        for i in 0..NLEN {
            self.w[i] -= y.w[i];
        }
    }

    /// Reverse subtraction, self = x - self.
    pub fn rsub(&mut self, x: &Big) {
        for i in 0..NLEN {
            self.w[i] = x.w[i] - self.w[i];
        }
    }

    /// Add a small integer to the bottom limb.
    pub fn inc(&mut self, x: isize) {
        self.w[0] += x as Chunk;
    }

    /// Subtract a small integer from the bottom limb.
    pub fn dec(&mut self, x: isize) {
        self.w[0] -= x as Chunk;
    }

    /// Multiply in place by a small non-negative integer, returning the
    /// overflow above the top limb. Input must be normalized.
    pub fn pmul(&mut self, c: isize) -> Chunk {
        let mut carry = 0 as DChunk;
        for i in 0..NLEN {
            let t = (self.w[i] as DChunk) * (c as DChunk) + carry;
            self.w[i] = (t & (BMASK as DChunk)) as Chunk;
            carry = t >> BASEBITS;
        }
        carry as Chunk
    }

    /// Multiply by a small integer into a double-width result.
    pub fn pxmul(&self, c: isize) -> DBig {
        let mut d = DBig::new();
        let mut carry = 0 as DChunk;
        for i in 0..NLEN {
            let t = (self.w[i] as DChunk) * (c as DChunk) + carry;
            d.w[i] = (t & (BMASK as DChunk)) as Chunk;
            carry = t >> BASEBITS;
        }
        d.w[NLEN] = carry as Chunk;
        d
    }

    /// General left shift. Input must be normalized.
    pub fn shl(&mut self, k: usize) {
        let n = k % BASEBITS;
        let m = k / BASEBITS;
        self.w[NLEN - 1] = self.w[NLEN - 1 - m] << n;
        if NLEN >= m + 2 {
            self.w[NLEN - 1] |= self.w[NLEN - m - 2] >> (BASEBITS - n);
        }
        for i in (m + 1..NLEN - 1).rev() {
            self.w[i] = ((self.w[i - m] << n) & BMASK) | (self.w[i - m - 1] >> (BASEBITS - n));
        }
        if m < NLEN - 1 {
            self.w[m] = (self.w[0] << n) & BMASK;
        }
        for i in 0..m {
            self.w[i] = 0;
        }
    }

    /// Fast left shift by k < BASEBITS; the top limb absorbs the overflow.
    pub fn fshl(&mut self, k: usize) -> Chunk {
        debug_assert!(k < BASEBITS);
        self.w[NLEN - 1] = (self.w[NLEN - 1] << k) | (self.w[NLEN - 2] >> (BASEBITS - k));
        for i in (1..NLEN - 1).rev() {
            self.w[i] = ((self.w[i] << k) & BMASK) | (self.w[i - 1] >> (BASEBITS - k));
        }
        self.w[0] = (self.w[0] << k) & BMASK;
        self.w[NLEN - 1] >> BASEBITS
    }

    /// General right shift. Input must be normalized.
    pub fn shr(&mut self, k: usize) {
        let n = k % BASEBITS;
        let m = k / BASEBITS;
        for i in 0..NLEN - m - 1 {
            self.w[i] = (self.w[m + i] >> n) | ((self.w[m + i + 1] << (BASEBITS - n)) & BMASK);
        }
        self.w[NLEN - 1 - m] = self.w[NLEN - 1] >> n;
        for i in NLEN - m..NLEN {
            self.w[i] = 0;
        }
    }

    /// Fast right shift by k < BASEBITS.
    pub fn fshr(&mut self, k: usize) -> Chunk {
        debug_assert!(k < BASEBITS);
        let r = self.w[0] & ((1 << k) - 1);
        for i in 0..NLEN - 1 {
            self.w[i] = (self.w[i] >> k) | ((self.w[i + 1] << (BASEBITS - k)) & BMASK);
        }
        self.w[NLEN - 1] >>= k;
        r
    }

    /// Constant-time conditional move: self = d == 1 ? b : self.
    pub fn cmove(&mut self, b: &Big, d: isize) {
        let mask = -(d as Chunk);
        for i in 0..NLEN {
            self.w[i] ^= (self.w[i] ^ b.w[i]) & mask;
        }
    }

    /// Constant-time conditional swap gated by d in {0,1}.
    pub fn cswap(&mut self, b: &mut Big, d: isize) {
        let mask = -(d as Chunk);
        for i in 0..NLEN {
            let t = mask & (self.w[i] ^ b.w[i]);
            self.w[i] ^= t;
            b.w[i] ^= t;
        }
    }

    /// Compare normalized inputs; returns -1, 0 or +1.
    pub fn comp(a: &Big, b: &Big) -> isize {
        for i in (0..NLEN).rev() {
            if a.w[i] > b.w[i] {
                return 1;
            }
            if a.w[i] < b.w[i] {
                return -1;
            }
        }
        0
    }

    pub fn parity(&self) -> isize {
        (self.w[0] & 1) as isize
    }

    /// The i-th bit of a normalized value.
    pub fn bit(&self, i: usize) -> isize {
        ((self.w[i / BASEBITS] >> (i % BASEBITS)) & 1) as isize
    }

    /// The bottom n bits (n < BASEBITS) of a normalized value.
    pub fn lastbits(&self, n: usize) -> isize {
        (self.w[0] & ((1 << n) - 1)) as isize
    }

    /// Truncate to the bottom m bits.
    pub fn mod2m(&mut self, m: usize) {
        let n = m % BASEBITS;
        let w = m / BASEBITS;
        self.w[w] &= (1 << n) - 1;
        for i in w + 1..NLEN {
            self.w[i] = 0;
        }
    }

    /// Number of bits; normalizes the value.
    pub fn nbits(&self) -> usize {
        let mut t = *self;
        t.norm();
        let mut k = NLEN - 1;
        while k as isize >= 0 && t.w[k] == 0 {
            if k == 0 {
                return 0;
            }
            k -= 1;
        }
        let mut bts = BASEBITS * k;
        let mut c = t.w[k];
        while c != 0 {
            c >>= 1;
            bts += 1;
        }
        bts
    }

    /// Product of normalized inputs, schoolbook with the Karatsuba
    /// diagonal trick on precomputed limb squares.
    pub fn mul(a: &Big, b: &Big) -> DBig {
        let mut c = DBig::new();
        let mut d = [0 as DChunk; NLEN];
        for i in 0..NLEN {
            d[i] = (a.w[i] as DChunk) * (b.w[i] as DChunk);
        }
        let mut s = d[0];
        let mut t = s;
        c.w[0] = (t & (BMASK as DChunk)) as Chunk;
        let mut co = t >> BASEBITS;
        for k in 1..NLEN {
            s += d[k];
            t = co + s;
            let mut i = 1 + k / 2;
            while i <= k && i > k - i {
                t += ((a.w[i] - a.w[k - i]) as DChunk) * ((b.w[k - i] - b.w[i]) as DChunk);
                i += 1;
            }
            c.w[k] = (t & (BMASK as DChunk)) as Chunk;
            co = t >> BASEBITS;
        }
        for k in NLEN..2 * NLEN - 1 {
            s -= d[k - NLEN];
            t = co + s;
            let mut i = 1 + k / 2;
            while i < NLEN && i > k - i {
                t += ((a.w[i] - a.w[k - i]) as DChunk) * ((b.w[k - i] - b.w[i]) as DChunk);
                i += 1;
            }
            c.w[k] = (t & (BMASK as DChunk)) as Chunk;
            co = t >> BASEBITS;
        }
        c.w[2 * NLEN - 1] = co as Chunk;
        c
    }

    /// Square of a normalized input, exploiting symmetry.
    pub fn sqr(a: &Big) -> DBig {
        let mut c = DBig::new();
        let mut co = 0 as DChunk;
        for k in 0..2 * NLEN - 1 {
            let mut t = co;
            let lo = if k >= NLEN { k - NLEN + 1 } else { 0 };
            for i in lo..(k + 1) / 2 {
                t += 2 * (a.w[i] as DChunk) * (a.w[k - i] as DChunk);
            }
            if k % 2 == 0 {
                t += (a.w[k / 2] as DChunk) * (a.w[k / 2] as DChunk);
            }
            c.w[k] = (t & (BMASK as DChunk)) as Chunk;
            co = t >> BASEBITS;
        }
        c.w[2 * NLEN - 1] = co as Chunk;
        c
    }

    /// Montgomery reduction of d modulo m, with nd = -m^-1 mod 2^24.
    pub fn monty(m: &Big, nd: Chunk, d: &DBig) -> Big {
        let mut dd = d.w;
        for i in 0..NLEN {
            let v = ((dd[i] as DChunk) * (nd as DChunk)) & (BMASK as DChunk);
            let mut carry = 0 as DChunk;
            for j in 0..NLEN {
                let t = (dd[i + j] as DChunk) + v * (m.w[j] as DChunk) + carry;
                dd[i + j] = (t & (BMASK as DChunk)) as Chunk;
                carry = t >> BASEBITS;
            }
            for j in i + NLEN..DNLEN {
                let t = (dd[j] as DChunk) + carry;
                dd[j] = (t & (BMASK as DChunk)) as Chunk;
                carry = t >> BASEBITS;
            }
        }
        let mut b = Big::new();
        b.w[..NLEN].copy_from_slice(&dd[NLEN..DNLEN]);
        b
    }

    /// r = a - (m >> 1) where m is halved in place; returns the borrow bit.
    /// The primitive behind the constant-time reduction cascades. The top
    /// limb of r is left unmasked so oversized moduli are handled exactly.
    pub fn ssn(r: &mut Big, a: &Big, m: &mut Big) -> isize {
        let n = NLEN - 1;
        for i in 0..n {
            m.w[i] = ((m.w[i] >> 1) | (m.w[i + 1] << (BASEBITS - 1))) & BMASK;
        }
        m.w[n] >>= 1;
        let mut carry = 0 as Chunk;
        for i in 0..n {
            let t = a.w[i] - m.w[i] + carry;
            r.w[i] = t & BMASK;
            carry = t >> BASEBITS;
        }
        let t = a.w[n] - m.w[n] + carry;
        r.w[n] = t;
        ((t >> (Chunk::BITS - 1)) & 1) as isize
    }

    /// Reduce modulo m with an unconditional fixed-count subtraction
    /// cascade driven by `ssn`.
    pub fn rmod(&mut self, m: &Big) {
        self.norm();
        let sb = {
            let nb = self.nbits();
            let mb = m.nbits();
            if nb > mb {
                nb - mb
            } else {
                0
            }
        };
        let mut sm = *m;
        sm.shl(sb + 1);
        let mut r = Big::new();
        for _ in 0..sb + 1 {
            let sr = Big::ssn(&mut r, self, &mut sm);
            self.cmove(&r, 1 - sr);
        }
    }

    /// Replace self by the quotient self / m, same fixed cascade as
    /// `rmod` with quotient-bit collection.
    pub fn div(&mut self, m: &Big) {
        self.norm();
        let sb = {
            let nb = self.nbits();
            let mb = m.nbits();
            if nb > mb {
                nb - mb
            } else {
                0
            }
        };
        let mut sm = *m;
        sm.shl(sb + 1);
        let mut e = Big::from_int(1);
        e.shl(sb);
        let mut q = Big::new();
        let mut r = Big::new();
        let mut qa = Big::new();
        for _ in 0..sb + 1 {
            let sr = Big::ssn(&mut r, self, &mut sm);
            self.cmove(&r, 1 - sr);
            qa.copy(&q);
            qa.add(&e);
            qa.norm();
            q.cmove(&qa, 1 - sr);
            e.fshr(1);
        }
        *self = q;
    }

    /// self = -self mod m.
    pub fn modneg(&mut self, m: &Big) {
        self.rmod(m);
        self.rsub(m);
        self.norm();
        self.rmod(m);
    }

    /// a * b mod m for normalized a, b < m.
    pub fn modmul(a: &Big, b: &Big, m: &Big) -> Big {
        let d = Big::mul(a, b);
        d.dmod(m)
    }

    /// Modular inverse by binary extended Euclid; m odd. Not constant-time.
    pub fn invmodp(&mut self, m: &Big) {
        self.rmod(m);
        if self.is_zero() {
            return;
        }
        let mut u = *self;
        let mut v = *m;
        let mut x1 = Big::from_int(1);
        let mut x2 = Big::new();
        let one = Big::from_int(1);
        while Big::comp(&u, &one) != 0 && Big::comp(&v, &one) != 0 {
            while u.parity() == 0 {
                u.fshr(1);
                if x1.parity() != 0 {
                    x1.add(m);
                    x1.norm();
                }
                x1.fshr(1);
            }
            while v.parity() == 0 {
                v.fshr(1);
                if x2.parity() != 0 {
                    x2.add(m);
                    x2.norm();
                }
                x2.fshr(1);
            }
            if Big::comp(&u, &v) >= 0 {
                u.sub(&v);
                u.norm();
                if Big::comp(&x1, &x2) >= 0 {
                    x1.sub(&x2);
                } else {
                    x1.add(m);
                    x1.sub(&x2);
                }
                x1.norm();
            } else {
                v.sub(&u);
                v.norm();
                if Big::comp(&x2, &x1) >= 0 {
                    x2.sub(&x1);
                } else {
                    x2.add(m);
                    x2.sub(&x1);
                }
                x2.norm();
            }
        }
        if Big::comp(&u, &one) == 0 {
            *self = x1;
        } else {
            *self = x2;
        }
    }

    /// Jacobi symbol (self/m) for odd m; returns -1, 0 or 1.
    pub fn jacobi(&self, m: &Big) -> isize {
        let mut a = *self;
        let mut n = *m;
        a.rmod(&n);
        if a.is_zero() {
            return 0;
        }
        let mut s: isize = 1;
        let one = Big::from_int(1);
        while !a.is_zero() {
            while a.parity() == 0 {
                a.fshr(1);
                let n8 = n.lastbits(3);
                if n8 == 3 || n8 == 5 {
                    s = -s;
                }
            }
            core::mem::swap(&mut a, &mut n);
            if a.lastbits(2) == 3 && n.lastbits(2) == 3 {
                s = -s;
            }
            a.rmod(&n);
        }
        if Big::comp(&n, &one) == 0 {
            s
        } else {
            0
        }
    }

    /// Big-endian 32-byte encoding; the value must be normalized.
    pub fn to_bytes(&self, b: &mut [u8; MODBYTES]) {
        let mut c = *self;
        c.norm();
        for i in (0..MODBYTES).rev() {
            b[i] = (c.w[0] & 0xff) as u8;
            c.fshr(8);
        }
    }

    /// Decode a big-endian 32-byte string.
    pub fn from_bytes(b: &[u8]) -> Big {
        debug_assert!(b.len() >= MODBYTES);
        let mut m = Big::new();
        for byte in b.iter().take(MODBYTES) {
            m.fshl(8);
            m.w[0] += *byte as Chunk;
        }
        m
    }
}

/// Branchless equality test: 1 when b == c, else 0.
pub(crate) fn teq(b: isize, c: isize) -> isize {
    let mut x = b ^ c;
    x -= 1; // underflows to -1 only when b == c
    ((x >> (isize::BITS - 1)) & 1) as isize
}

impl DBig {
    pub const fn new() -> DBig {
        DBig { w: [0; DNLEN] }
    }

    /// Widen a single-width integer.
    pub fn from_big(x: &Big) -> DBig {
        let mut d = DBig::new();
        d.w[..NLEN].copy_from_slice(&x.w);
        d
    }

    pub fn norm(&mut self) {
        let mut carry = 0 as Chunk;
        for i in 0..DNLEN - 1 {
            let d = self.w[i] + carry;
            self.w[i] = d & BMASK;
            carry = d >> BASEBITS;
        }
        self.w[DNLEN - 1] += carry;
    }

    fn shl(&mut self, k: usize) {
        let n = k % BASEBITS;
        let m = k / BASEBITS;
        self.w[DNLEN - 1] = self.w[DNLEN - 1 - m] << n;
        if DNLEN >= m + 2 {
            self.w[DNLEN - 1] |= self.w[DNLEN - m - 2] >> (BASEBITS - n);
        }
        for i in (m + 1..DNLEN - 1).rev() {
            self.w[i] = ((self.w[i - m] << n) & BMASK) | (self.w[i - m - 1] >> (BASEBITS - n));
        }
        self.w[m] = (self.w[0] << n) & BMASK;
        for i in 0..m {
            self.w[i] = 0;
        }
    }

    fn cmove(&mut self, b: &DBig, d: isize) {
        let mask = -(d as Chunk);
        for i in 0..DNLEN {
            self.w[i] ^= (self.w[i] ^ b.w[i]) & mask;
        }
    }

    /// Halve m in place and subtract it, double-width version of `ssn`.
    fn dssn(r: &mut DBig, a: &DBig, m: &mut DBig) -> isize {
        let n = DNLEN - 1;
        for i in 0..n {
            m.w[i] = ((m.w[i] >> 1) | (m.w[i + 1] << (BASEBITS - 1))) & BMASK;
        }
        m.w[n] >>= 1;
        let mut carry = 0 as Chunk;
        for i in 0..n {
            let t = a.w[i] - m.w[i] + carry;
            r.w[i] = t & BMASK;
            carry = t >> BASEBITS;
        }
        let t = a.w[n] - m.w[n] + carry;
        r.w[n] = t;
        ((t >> (Chunk::BITS - 1)) & 1) as isize
    }

    pub fn nbits(&self) -> usize {
        let mut t = *self;
        t.norm();
        let mut k = DNLEN - 1;
        while t.w[k] == 0 {
            if k == 0 {
                return 0;
            }
            k -= 1;
        }
        let mut bts = BASEBITS * k;
        let mut c = t.w[k];
        while c != 0 {
            c >>= 1;
            bts += 1;
        }
        bts
    }

    /// Remainder modulo m by a fixed-count conditional-subtraction cascade.
    pub fn dmod(&self, m: &Big) -> Big {
        let mut a = *self;
        a.norm();
        let sb = {
            let nb = a.nbits();
            let mb = m.nbits();
            if nb > mb {
                nb - mb
            } else {
                0
            }
        };
        let mut sm = DBig::from_big(m);
        sm.shl(sb + 1);
        let mut r = DBig::new();
        for _ in 0..sb + 1 {
            let sr = DBig::dssn(&mut r, &a, &mut sm);
            a.cmove(&r, 1 - sr);
        }
        Big::from_dbig(&a)
    }

    /// Quotient by m, same cascade as `dmod` with quotient-bit collection.
    /// The quotient must fit a single-width integer.
    pub fn div(&self, m: &Big) -> Big {
        let mut a = *self;
        a.norm();
        let sb = {
            let nb = a.nbits();
            let mb = m.nbits();
            if nb > mb {
                nb - mb
            } else {
                0
            }
        };
        let mut sm = DBig::from_big(m);
        sm.shl(sb + 1);
        let mut e = Big::from_int(1);
        e.shl(sb);
        let mut q = Big::new();
        let mut r = DBig::new();
        let mut qa = Big::new();
        for _ in 0..sb + 1 {
            let sr = DBig::dssn(&mut r, &a, &mut sm);
            a.cmove(&r, 1 - sr);
            qa.copy(&q);
            qa.add(&e);
            qa.norm();
            q.cmove(&qa, 1 - sr);
            e.fshr(1);
        }
        q
    }

    pub fn split(&self, n: usize) -> (Big, Big) {
        debug_assert_eq!(n % BASEBITS, 0);
        let m = n / BASEBITS;
        let mut lo = Big::new();
        let mut hi = Big::new();
        lo.w[..m].copy_from_slice(&self.w[..m]);
        hi.w[..DNLEN - m].copy_from_slice(&self.w[m..]);
        (lo, hi)
    }
}
