use crate::sha2::codec::{self, BLOCK_SIZE, WORD_NUMS};
use crate::sha2::sha256::K;
use crate::sha2::{f_ch, f_maj, STATE_WSIZE};

/// 消息扩展后的单词个数, 和压缩轮数相同
const ROUNDS: usize = 64;

#[inline]
const fn rotate_s0(x: u32) -> u32 {
    x.rotate_right(2) ^ x.rotate_right(13) ^ x.rotate_right(22)
}

#[inline]
const fn rotate_s1(x: u32) -> u32 {
    x.rotate_right(6) ^ x.rotate_right(11) ^ x.rotate_right(25)
}

#[inline]
const fn rotate_d0(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

#[inline]
const fn rotate_d1(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

/// 压缩函数: 处理一个块, 返回新的中间摘要值. 所有加法均为模2^32.
pub fn compress(state: [u32; STATE_WSIZE], block: &[u8; BLOCK_SIZE]) -> [u32; STATE_WSIZE] {
    let mut words = [0u32; ROUNDS];
    words[..WORD_NUMS].copy_from_slice(&codec::load_words(block));

    (WORD_NUMS..ROUNDS).for_each(|j| {
        words[j] = rotate_d1(words[j - 2])
            .wrapping_add(words[j - 7])
            .wrapping_add(rotate_d0(words[j - 15]))
            .wrapping_add(words[j - 16]);
    });

    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = state;

    words.into_iter().zip(K).for_each(|(word, k)| {
        let t1 = h
            .wrapping_add(rotate_s1(e))
            .wrapping_add(f_ch(e, f, g))
            .wrapping_add(k)
            .wrapping_add(word);
        let t2 = rotate_s0(a).wrapping_add(f_maj(a, b, c));
        h = g;
        g = f;
        f = e;
        e = d.wrapping_add(t1);
        d = c;
        c = b;
        b = a;
        a = t1.wrapping_add(t2);
    });

    let mut digest = state;
    for (x, y) in digest.iter_mut().zip([a, b, c, d, e, f, g, h]) {
        *x = x.wrapping_add(y);
    }

    digest
}

/// 依次压缩`data`中所有完整的块, 返回剩余不足一个块的数据
pub fn compress_blocks<'a>(state: &mut [u32; STATE_WSIZE], data: &'a [u8]) -> &'a [u8] {
    let (blocks, tail) = codec::split_blocks(data);
    for block in blocks {
        *state = compress(*state, block);
    }

    tail
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sha2::sha256::{INIT_224, INIT_256};

    fn abc_block() -> [u8; BLOCK_SIZE] {
        let mut block = [0u8; BLOCK_SIZE];
        block[..4].copy_from_slice(b"abc\x80");
        block[63] = 0x18;
        block
    }

    #[test]
    fn compress_abc_block() {
        // FIPS 180-4 附录示例, 单块消息"abc"
        let h = compress(INIT_256, &abc_block());
        assert_eq!(
            h,
            [
                0xba7816bf, 0x8f01cfea, 0x414140de, 0x5dae2223, 0xb00361a3, 0x96177a9c,
                0xb410ff61, 0xf20015ad
            ]
        );

        let h = compress(INIT_224, &abc_block());
        assert_eq!(
            h[..7],
            [0x23097d22, 0x3405d822, 0x8642a477, 0xbda255b3, 0x2aadbce4, 0xbda0b3f7, 0xe36c9da7]
        );
    }

    #[test]
    fn compress_is_pure() {
        let block = abc_block();
        assert_eq!(compress(INIT_256, &block), compress(INIT_256, &block));
        assert_ne!(compress(INIT_256, &block), INIT_256);
    }

    #[test]
    fn compress_blocks_matches_single() {
        let mut data = [0u8; 2 * BLOCK_SIZE + 10];
        data.iter_mut().enumerate().for_each(|(i, x)| *x = i as u8);

        let mut state = INIT_256;
        let tail = compress_blocks(&mut state, &data);
        assert_eq!(tail, &data[2 * BLOCK_SIZE..]);

        let mut expect = INIT_256;
        for chunk in data.chunks_exact(BLOCK_SIZE) {
            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(chunk);
            expect = compress(expect, &block);
        }
        assert_eq!(state, expect);
    }
}
