//! 实现标准: [FIPS 180-4](https://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.180-4.pdf)<br>
//!
//! 仅包含SHA-256和SHA-224, 两者共用压缩函数, 初始值和输出长度不同.

use std::ops::{BitAnd, BitXor, Not};

/// 中间摘要值的单词个数
pub(crate) const STATE_WSIZE: usize = 8;

#[inline]
fn f_ch<T>(x: T, y: T, z: T) -> T
where
    T: Not<Output = T> + BitXor<Output = T> + BitAnd<Output = T> + Copy,
{
    (x & y) ^ ((!x) & z)
}

#[inline]
fn f_maj<T>(x: T, y: T, z: T) -> T
where
    T: Not<Output = T> + BitXor<Output = T> + BitAnd<Output = T> + Copy,
{
    (x & y) ^ (x & z) ^ (y & z)
}

/// 基于`HashEngine`生成固定变体的摘要类型<br>
/// <br>
/// $NAME: 结构体的名字<br>
/// $VARIANT: `Variant`变体<br>
/// $DIGEST_BITS: 摘要位长度
macro_rules! sha_common {
    ($NAME: ident, $VARIANT: expr, $DIGEST_BITS: literal) => {
        /// 实现标准: [FIPS 180-4](https://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.180-4.pdf)
        #[derive(Clone)]
        pub struct $NAME {
            engine: HashEngine,
        }

        impl $NAME {
            pub const fn new() -> Self {
                Self {
                    engine: HashEngine::new($VARIANT),
                }
            }

            pub const fn engine(&self) -> &HashEngine {
                &self.engine
            }
        }

        #[cfg(feature = "sec-zeroize")]
        impl Zeroize for $NAME {
            fn zeroize(&mut self) {
                self.engine.zeroize();
            }
        }

        impl Default for $NAME {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Write for $NAME {
            fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
                self.engine.write(data)
            }

            fn flush(&mut self) -> std::io::Result<()> {
                self.engine.flush()
            }
        }

        impl Digest for $NAME {
            const BLOCK_BITS: usize = $crate::sha2::codec::BLOCK_SIZE * 8;
            const WORD_BITS: usize = $crate::sha2::codec::WORD_SIZE * 8;
            const DIGEST_BITS: usize = $DIGEST_BITS;

            fn digest(msg: &[u8]) -> Output<Self> {
                let mut sha = Self::new();
                sha.engine.update(msg);
                sha.finalize()
            }

            fn finalize(&self) -> Output<Self> {
                Output::from_vec(self.engine.sum())
            }

            fn reset(&mut self) {
                self.engine.reset();
            }
        }
    };
}

pub mod codec;
pub mod compress;
pub mod padding;

mod engine;
pub use engine::{HashEngine, Variant};

mod sha256;
pub use sha256::{SHA224, SHA256};
