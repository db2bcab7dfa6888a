use crate::sha2::codec::{self, BLOCK_SIZE};
#[cfg(feature = "sec-zeroize")]
use zeroize::Zeroize;

/// 位长度字段占用的字节数
const LEN_BYTES: usize = 8;
/// 剩余数据长度不小于该值时, 填充需要两个块
const SPILL_THRESHOLD: usize = BLOCK_SIZE - LEN_BYTES;

/// 消息尾部数据填充后生成的最后1~2个块.
///
/// 填充格式: `tail || 0x80 || 0x00... || (len * 8) as u64 大端序`, 总长度为块长度的整数倍.
/// 填充在独立的缓冲区中完成, 不修改调用者的数据.
#[derive(Clone)]
pub struct Padding {
    data: [u8; 2 * BLOCK_SIZE],
    blocks: usize,
}

impl Padding {
    /// `tail`: 未处理的剩余数据, 长度需小于`BLOCK_SIZE`<br>
    /// `total_len`: 消息的总字节长度
    pub fn new(tail: &[u8], total_len: u64) -> Self {
        debug_assert!(tail.len() < BLOCK_SIZE);

        let mut data = [0u8; 2 * BLOCK_SIZE];
        data[..tail.len()].copy_from_slice(tail);
        data[tail.len()] = 0x80;

        let blocks = if tail.len() < SPILL_THRESHOLD { 1 } else { 2 };
        let end = blocks * BLOCK_SIZE;
        // 超过2^64位的长度未定义, 这里按模2^64处理
        data[(end - LEN_BYTES)..end].copy_from_slice(&(total_len << 3).to_be_bytes());

        Self { data, blocks }
    }

    /// 填充后的字节长度, 64或128
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.blocks * BLOCK_SIZE
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len()]
    }

    pub fn blocks(&self) -> impl Iterator<Item = &[u8; BLOCK_SIZE]> + '_ {
        codec::split_blocks(self.as_slice()).0
    }
}

#[cfg(feature = "sec-zeroize")]
impl Zeroize for Padding {
    fn zeroize(&mut self) {
        self.data.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_empty() {
        let p = Padding::new(&[], 0);
        assert_eq!(p.len(), 64);
        assert_eq!(p.as_slice()[0], 0x80);
        assert!(p.as_slice()[1..].iter().all(|&x| x == 0));
    }

    #[test]
    fn padding_abc() {
        let p = Padding::new(b"abc", 3);
        let mut expect = [0u8; 64];
        expect[..4].copy_from_slice(b"abc\x80");
        expect[63] = 24;
        assert_eq!(p.as_slice(), expect);
        assert_eq!(p.blocks().count(), 1);
    }

    #[test]
    fn padding_boundary() {
        for (tail_len, blocks) in [(0, 1), (1, 1), (54, 1), (55, 1), (56, 2), (57, 2), (63, 2)] {
            let tail = vec![0x5au8; tail_len];
            // 前面已经处理过两个完整的块
            let total = (2 * BLOCK_SIZE + tail_len) as u64;
            let p = Padding::new(&tail, total);
            let s = p.as_slice();

            assert_eq!(p.len(), blocks * BLOCK_SIZE, "tail_len => {tail_len}");
            assert_eq!(p.blocks().count(), blocks, "tail_len => {tail_len}");
            assert_eq!(&s[..tail_len], tail.as_slice());
            assert_eq!(s[tail_len], 0x80);
            assert!(s[(tail_len + 1)..(s.len() - 8)].iter().all(|&x| x == 0));
            assert_eq!(s[(s.len() - 8)..], (total * 8).to_be_bytes());
        }
    }

    #[test]
    fn padding_len_wraps() {
        let p = Padding::new(&[], u64::MAX);
        assert_eq!(p.as_slice()[56..], (u64::MAX << 3).to_be_bytes());
    }
}
