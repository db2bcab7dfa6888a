use std::{error::Error, fmt::Display};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HashError {
    /// 实际字节长度`real`和目标字节长度`target`不匹配
    MismatchingByteLen {
        target: usize,
        real: usize,
    },
    /// 不支持的摘要变体
    UnknownVariant(String),
    /// 非法的十六进制摘要字符串
    InvalidHex(String),
}

impl Display for HashError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashError::MismatchingByteLen { target, real } => f.write_fmt(format_args!(
                "real byte length `{real}` not match to target byte length `{target}`"
            )),
            HashError::UnknownVariant(s) => {
                f.write_fmt(format_args!("unknown SHA-2 variant `{s}`"))
            }
            HashError::InvalidHex(s) => f.write_fmt(format_args!("invalid hex digest `{s}`")),
        }
    }
}

impl Error for HashError {}
