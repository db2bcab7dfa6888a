//! 字节序列与大端序32位单词块之间的转换

/// 块字节长度
pub const BLOCK_SIZE: usize = 64;
/// 单词字节长度
pub const WORD_SIZE: usize = 4;
/// 每个块包含的单词个数
pub const WORD_NUMS: usize = BLOCK_SIZE / WORD_SIZE;

/// 按大端序将一个块解析为16个单词
#[inline]
pub fn load_words(block: &[u8; BLOCK_SIZE]) -> [u32; WORD_NUMS] {
    let mut words = [0u32; WORD_NUMS];
    for (word, bytes) in words.iter_mut().zip(block.chunks_exact(WORD_SIZE)) {
        *word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }

    words
}

/// 按大端序将单词追加到`out`尾部
pub fn store_words(words: &[u32], out: &mut Vec<u8>) {
    out.reserve(words.len() * WORD_SIZE);
    for w in words {
        out.extend_from_slice(&w.to_be_bytes());
    }
}

/// 将`data`划分为完整的块, 返回块迭代器和剩余不足一个块的数据
pub fn split_blocks<'a>(data: &'a [u8]) -> (impl Iterator<Item = &'a [u8; BLOCK_SIZE]>, &'a [u8]) {
    let n = data.len() - data.len() % BLOCK_SIZE;
    let (blocks, tail) = data.split_at(n);
    let blocks = blocks
        .chunks_exact(BLOCK_SIZE)
        .filter_map(|chunk| chunk.first_chunk::<BLOCK_SIZE>());

    (blocks, tail)
}
