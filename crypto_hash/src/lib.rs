use std::io::Write;

mod output;
pub use output::{to_hex, Hex, Output};

mod error;
pub use error::HashError;

pub mod sha2;

/// 哈希算法实现该trait, 计算消息的摘要. 可直接调用`Digest::digest(msg)`生成消息的摘要, 或者通过`Write` trait将数据更新
/// 到`self`中后使用`self.finalize()`生成消息摘要.
///
/// `finalize`不改变内部状态, 之后可继续写入数据, 再次`finalize`得到的是全部已写入数据的摘要.
///
/// 可用于如下安全应用中:
/// - 数据一致性验证;
/// - 参与数字签名的生成和验证;
/// - 伪随机数生成;
pub trait Digest: Write {
    /// 哈希算法每次按块处理消息的块的位长度
    const BLOCK_BITS: usize;
    /// 哈希算法将每个块按该位长度划分为若干个单词
    const WORD_BITS: usize;
    /// 哈希算法生成的摘要的位长度
    const DIGEST_BITS: usize;

    /// 生成消息摘要
    fn digest(msg: &[u8]) -> Output<Self>;

    /// 生成当前已写入数据的摘要
    fn finalize(&self) -> Output<Self>;

    /// 重置哈希算法到初始化状态
    fn reset(&mut self);
}

/// `Digest`的对象安全版本, 用于`Box<dyn DigestX>`
pub trait DigestX: Write {
    /// 块字节长度
    fn block_size_x(&self) -> usize;
    /// 摘要字节长度
    fn size_x(&self) -> usize;
    fn write_x(&mut self, data: &[u8]);
    /// 将摘要追加到`out`尾部
    fn sum_x(&self, out: &mut Vec<u8>);
    fn reset_x(&mut self);
}

impl<T> DigestX for T
where
    T: Digest,
{
    fn block_size_x(&self) -> usize {
        <T as Digest>::BLOCK_BITS >> 3
    }

    fn size_x(&self) -> usize {
        Output::<T>::bytes()
    }

    fn write_x(&mut self, data: &[u8]) {
        // 摘要的写入不会失败
        let _ = self.write_all(data);
    }

    fn sum_x(&self, out: &mut Vec<u8>) {
        out.extend(self.finalize().iter());
    }

    fn reset_x(&mut self) {
        self.reset()
    }
}

impl DigestX for sha2::HashEngine {
    fn block_size_x(&self) -> usize {
        self.block_size()
    }

    fn size_x(&self) -> usize {
        self.size()
    }

    fn write_x(&mut self, data: &[u8]) {
        self.update(data)
    }

    fn sum_x(&self, out: &mut Vec<u8>) {
        self.sum_into(out)
    }

    fn reset_x(&mut self) {
        self.reset()
    }
}
