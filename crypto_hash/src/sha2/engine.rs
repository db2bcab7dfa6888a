use crate::sha2::codec::{self, BLOCK_SIZE, WORD_SIZE};
use crate::sha2::compress::{compress, compress_blocks};
use crate::sha2::padding::Padding;
use crate::sha2::sha256::{INIT_224, INIT_256};
use crate::sha2::STATE_WSIZE;
use crate::HashError;
use std::fmt::Display;
use std::io::Write;
use std::str::FromStr;
#[cfg(feature = "sec-zeroize")]
use zeroize::Zeroize;

macro_rules! impl_variant {
    ($NAME: ident, $([$ITEM: ident = $BITS: literal, $INIT: expr, $DISPLAY: literal, [$($ALIAS: literal),+]]),+) => {
        /// SHA-256族的变体, 判别值为摘要的位长度
        #[repr(u32)]
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        pub enum $NAME {
            $($ITEM = $BITS,)+
        }

        impl $NAME {
            /// 初始摘要值, 参考FIPS 180-4 5.3节
            pub const fn init(&self) -> [u32; STATE_WSIZE] {
                match self {
                    $(Self::$ITEM => $INIT,)+
                }
            }

            pub const fn all() -> &'static [$NAME] {
                &[$(Self::$ITEM,)+]
            }
        }

        impl TryFrom<u32> for $NAME {
            type Error = HashError;

            fn try_from(value: u32) -> Result<Self, Self::Error> {
                match value {
                    $(x if x == Self::$ITEM as u32 => Ok(Self::$ITEM),)+
                    _ => Err(HashError::UnknownVariant(format!("{value} is not valid digest bits"))),
                }
            }
        }

        impl FromStr for $NAME {
            type Err = HashError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($($ALIAS)|+ => Ok(Self::$ITEM),)+
                    _ => Err(HashError::UnknownVariant(s.to_string())),
                }
            }
        }

        impl Display for $NAME {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$ITEM => f.write_str($DISPLAY),)+
                }
            }
        }

    };
}

impl_variant!(
    Variant,
    [SHA224 = 224, INIT_224, "SHA-224", ["sha224", "sha-224", "sha2-224", "s2-224", "224"]],
    [SHA256 = 256, INIT_256, "SHA-256", ["sha256", "sha-256", "sha2-256", "s2-256", "256"]]
);

impl Variant {
    /// 摘要位长度
    pub const fn bits(&self) -> usize {
        *self as usize
    }

    /// 摘要字节长度
    pub const fn size(&self) -> usize {
        self.bits() >> 3
    }

    /// 输出的单词个数, SHA-224截断为7个单词
    const fn digest_wsize(&self) -> usize {
        self.size() / WORD_SIZE
    }
}

/// SHA-256/SHA-224的增量计算状态.
///
/// - 写入数据时, 每凑满一个块立即压缩, 剩余不足一个块的数据缓存在`buf`中;
/// - `sum`在状态副本上完成填充和压缩, 不影响后续写入;
/// - `reset`后等价于新建的同变体实例.
#[derive(Clone)]
pub struct HashEngine {
    variant: Variant,
    digest: [u32; STATE_WSIZE],
    buf: [u8; BLOCK_SIZE],
    // 记录buf下一个可写入位置的索引, 始终小于BLOCK_SIZE
    idx: usize,
    // 自上次重置以来写入数据的总字节长度
    len: u64,
}

impl HashEngine {
    pub const fn new(variant: Variant) -> Self {
        Self {
            variant,
            digest: variant.init(),
            buf: [0; BLOCK_SIZE],
            idx: 0,
            len: 0,
        }
    }

    pub const fn variant(&self) -> Variant {
        self.variant
    }

    /// 摘要字节长度, SHA-256为32, SHA-224为28
    pub const fn size(&self) -> usize {
        self.variant.size()
    }

    pub const fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    /// 自上次重置以来写入的字节数
    pub const fn len(&self) -> u64 {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn update(&mut self, mut data: &[u8]) {
        self.len = self.len.wrapping_add(data.len() as u64);

        if self.idx > 0 {
            let ava_len = data.len().min(BLOCK_SIZE - self.idx);
            self.buf[self.idx..(self.idx + ava_len)].copy_from_slice(&data[..ava_len]);
            self.idx += ava_len;
            data = &data[ava_len..];

            if self.idx < BLOCK_SIZE {
                return;
            }

            self.digest = compress(self.digest, &self.buf);
            self.idx = 0;
        }

        let tail = compress_blocks(&mut self.digest, data);
        self.buf[..tail.len()].copy_from_slice(tail);
        self.idx = tail.len();
    }

    /// 将当前已写入数据的摘要追加到`out`尾部
    pub fn sum_into(&self, out: &mut Vec<u8>) {
        let digest = self.checksum();
        codec::store_words(&digest[..self.variant.digest_wsize()], out);
    }

    /// 当前已写入数据的摘要
    pub fn sum(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size());
        self.sum_into(&mut out);
        out
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.variant);
    }

    fn checksum(&self) -> [u32; STATE_WSIZE] {
        let mut digest = self.digest;
        #[cfg_attr(not(feature = "sec-zeroize"), allow(unused_mut))]
        let mut padding = Padding::new(&self.buf[..self.idx], self.len);

        for block in padding.blocks() {
            digest = compress(digest, block);
        }

        #[cfg(feature = "sec-zeroize")]
        padding.zeroize();

        digest
    }
}

impl Write for HashEngine {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.update(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(feature = "sec-zeroize")]
impl Zeroize for HashEngine {
    fn zeroize(&mut self) {
        self.digest.zeroize();
        self.buf.zeroize();
        self.idx.zeroize();
        self.len.zeroize();
    }
}

#[cfg(feature = "sec-zeroize-drop")]
impl Drop for HashEngine {
    fn drop(&mut self) {
        self.zeroize();
    }
}
