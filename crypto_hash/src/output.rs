use crate::{Digest, HashError};
use std::{
    fmt::{Debug, Display, LowerHex, UpperHex},
    marker::PhantomData,
};
#[cfg(feature = "sec-zeroize")]
use zeroize::Zeroize;

/// 消息哈希摘要输出。 按书写顺序存储, 即大端序.
pub struct Output<T: ?Sized> {
    // Output是由哈希算法生成, 由实现算法保证`self.len() == Self::bytes()`
    pub(crate) data: Vec<u8>,
    pub(crate) digest: PhantomData<T>,
}

impl<T> Output<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, u8> {
        self.data.iter()
    }

    pub(crate) const fn from_vec(digest: Vec<u8>) -> Self {
        Self {
            data: digest,
            digest: PhantomData,
        }
    }

    /// 字节长度
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `Output`字节长度超过`N`会截断输出低`N`字节, `Output`字节长度小于`N`高字节会补0.
    /// 大端序
    pub fn to_array<const N: usize>(&self) -> [u8; N] {
        let mut arr = [0u8; N];

        match self.len().cmp(&N) {
            std::cmp::Ordering::Less => arr[(N - self.len())..].copy_from_slice(self.as_ref()),
            std::cmp::Ordering::Equal => arr.copy_from_slice(self.as_ref()),
            std::cmp::Ordering::Greater => arr.copy_from_slice(&self.as_ref()[(self.len() - N)..]),
        }

        arr
    }
}

impl<T: Digest> Output<T> {
    /// 字节长度
    pub const fn bytes() -> usize {
        (<T>::DIGEST_BITS + 7) >> 3
    }

    /// 位长度
    pub const fn bits() -> usize {
        <T>::DIGEST_BITS
    }

    /// 从十六进制字符串解析摘要, 大小写均可, 可带`0x`前缀. 长度需和`Self::bytes()`匹配.
    pub fn from_hex(s: &str) -> Result<Self, HashError> {
        let h = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if h.len() != Self::bytes() << 1 {
            return Err(HashError::InvalidHex(s.to_string()));
        }

        let data = h
            .as_bytes()
            .chunks_exact(2)
            .map(|x| match (hex_val(x[0]), hex_val(x[1])) {
                (Some(hi), Some(lo)) => Ok((hi << 4) | lo),
                _ => Err(HashError::InvalidHex(s.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_vec(data))
    }
}

const fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl<T: Digest, const N: usize> TryFrom<[u8; N]> for Output<T> {
    type Error = HashError;

    /// `N != Self::bytes()`会返回`HashError`
    fn try_from(value: [u8; N]) -> Result<Self, Self::Error> {
        if N == Self::bytes() {
            Ok(Self::from_vec(value.to_vec()))
        } else {
            Err(HashError::MismatchingByteLen {
                target: Self::bytes(),
                real: N,
            })
        }
    }
}

#[cfg(feature = "sec-zeroize")]
impl<T: Digest> Zeroize for Output<T> {
    fn zeroize(&mut self) {
        self.data.zeroize();
    }
}

impl<T> Clone for Output<T> {
    fn clone(&self) -> Self {
        Self::from_vec(self.data.clone())
    }
}

impl<T> PartialEq for Output<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<T> Eq for Output<T> {}

impl<T> AsRef<[u8]> for Output<T> {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// `N`必须和`Output.len()`匹配, 否则会返回`HashError`.
impl<T: Digest, const N: usize> TryFrom<Output<T>> for [u8; N] {
    type Error = HashError;

    fn try_from(value: Output<T>) -> Result<Self, Self::Error> {
        if N != Output::<T>::bytes() {
            Err(HashError::MismatchingByteLen {
                target: N,
                real: Output::<T>::bytes(),
            })
        } else {
            let mut arr = [0u8; N];
            arr.copy_from_slice(value.as_ref());

            Ok(arr)
        }
    }
}

impl<T> From<Output<T>> for Vec<u8> {
    fn from(value: Output<T>) -> Self {
        value.data
    }
}

impl<T> Display for Output<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        LowerHex::fmt(self, f)
    }
}

impl<T> Debug for Output<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("Output({:x})", self))
    }
}

impl<T> LowerHex for Output<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        LowerHex::fmt(&Hex(self.as_ref()), f)
    }
}

impl<T> UpperHex for Output<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        UpperHex::fmt(&Hex(self.as_ref()), f)
    }
}

/// 字节序列的十六进制格式化, `{:#x}`/`{:#X}`带`0x`/`0X`前缀
#[derive(Clone, Copy)]
pub struct Hex<'a>(pub &'a [u8]);

impl LowerHex for Hex<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }
        for &b in self.0 {
            f.write_fmt(format_args!("{:02x}", b))?;
        }

        Ok(())
    }
}

impl UpperHex for Hex<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            f.write_str("0X")?;
        }
        for &b in self.0 {
            f.write_fmt(format_args!("{:02X}", b))?;
        }

        Ok(())
    }
}

impl Display for Hex<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        LowerHex::fmt(self, f)
    }
}

/// 小写十六进制, 不带前缀
pub fn to_hex(data: &[u8]) -> String {
    format!("{:x}", Hex(data))
}
