use crate::cmd::{Cmd, SumConfig};
use crate::error::SumError;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use crypto_hash::sha2::{HashEngine, Variant};
use crypto_hash::{to_hex, DigestX};
use rayon::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

/// 标准输入或命令行字符串的摘要在输出中使用的名字
const STDIN_NAME: &str = "-";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub(crate) struct DigestRecord {
    algorithm: String,
    name: String,
    digest: String,
}

impl DigestRecord {
    fn new(variant: Variant, name: String, digest: &[u8]) -> Self {
        Self {
            algorithm: variant.to_string(),
            name,
            digest: to_hex(digest),
        }
    }
}

/// 以`buf`大小分段读取文件并写入`h`
pub(crate) fn hash_file(h: &mut dyn DigestX, path: &Path, buf: &mut [u8]) -> anyhow::Result<()> {
    if !path.exists() {
        return Err(SumError::PathNotExist(path.display().to_string()).into());
    }
    if !path.is_file() {
        return Err(SumError::NotAFile(path.display().to_string()).into());
    }

    let mut f = File::open(path)?;
    loop {
        match f.read(buf) {
            Ok(0) => break,
            Ok(n) => h.write_x(&buf[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

/// 在线程池中并行计算多个文件的摘要, 每个文件使用独立的实例, 结果顺序和`files`一致
pub(crate) fn hash_files<P: AsRef<Path> + Sync>(
    variants: &[Variant],
    files: &[P],
) -> anyhow::Result<Vec<anyhow::Result<Vec<u8>>>> {
    debug_assert_eq!(variants.len(), files.len());
    if files.is_empty() {
        return Ok(Vec::new());
    }

    let config = SumConfig::config();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    Ok(pool.install(|| {
        variants
            .par_iter()
            .zip(files.par_iter())
            .map(|(&variant, f)| -> anyhow::Result<Vec<u8>> {
                let mut h = HashEngine::new(variant);
                let mut buf = config.io_buf();
                hash_file(&mut h, f.as_ref(), buf.as_mut_slice())?;
                Ok(h.sum())
            })
            .collect()
    }))
}

fn common_cmd(name: &str) -> Command {
    Command::new(name.to_string())
        .arg(
            Arg::new("str")
                .value_name("STRING")
                .action(ArgAction::Set)
                .value_parser(value_parser!(String))
                .required(false)
                .help("hash string"),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .action(ArgAction::Append)
                .value_parser(value_parser!(PathBuf))
                .required(false)
                .help("to specified the file path, can be repeated"),
        )
        .arg(
            Arg::new("prefix")
                .long("prefix")
                .required(false)
                .action(ArgAction::SetTrue)
                .help("display prefix with `0x`"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .required(false)
                .action(ArgAction::SetTrue)
                .help("output as json array"),
        )
}

/// 管道数据在前, 字符串在后, 合并为一条消息. 没有任何输入时计算空消息的摘要.
fn message_record(variant: Variant, pipe: &[u8], m: &ArgMatches) -> Option<DigestRecord> {
    let s = m.get_one::<String>("str");
    let has_file = m.contains_id("file");
    if pipe.is_empty() && s.is_none() && has_file {
        return None;
    }

    let mut h = HashEngine::new(variant);
    h.update(pipe);
    if let Some(s) = s {
        h.update(s.as_bytes());
    }

    Some(DigestRecord::new(variant, STDIN_NAME.to_string(), &h.sum()))
}

/// 每个文件单独计算摘要
fn common_run(variant: Variant, pipe: &[u8], m: &ArgMatches) -> anyhow::Result<()> {
    let files = m
        .get_many::<PathBuf>("file")
        .map(|x| x.cloned().collect::<Vec<_>>())
        .unwrap_or_default();

    let mut records = Vec::with_capacity(files.len() + 1);
    records.extend(message_record(variant, pipe, m));

    let mut failed = 0;
    let variants = vec![variant; files.len()];
    for (f, d) in files.iter().zip(hash_files(&variants, &files)?) {
        match d {
            Ok(d) => records.push(DigestRecord::new(variant, f.display().to_string(), &d)),
            Err(e) => {
                log::error!("{}: {e}", f.display());
                failed += 1;
            }
        }
    }

    let out = format_records(&records, m.get_flag("prefix"), m.get_flag("json"))?;
    if !out.is_empty() {
        println!("{out}");
    }
    anyhow::ensure!(failed == 0, "{failed} file(s) could not be read");

    Ok(())
}

fn format_records(records: &[DigestRecord], prefix: bool, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(records)?);
    }

    let prefix = if prefix { "0x" } else { "" };
    Ok(records
        .iter()
        .map(|r| format!("{prefix}{}  {}", r.digest, r.name))
        .collect::<Vec<_>>()
        .join("\n"))
}

macro_rules! impl_hash_cmd {
    ($NAME1: ident, $($NAME2: ident),+) => {
        impl_hash_cmd!($NAME1);
        impl_hash_cmd!($($NAME2),+);
    };
    ($NAME: ident) => {
        #[allow(non_camel_case_types)]
        #[derive(Default)]
        pub struct $NAME {
            pipe: Vec<u8>,
        }

        impl $NAME {
            pub fn new(pipe: &[u8]) -> Self {
                Self {
                    pipe: pipe.to_vec(),
                }
            }
        }
    };
}

impl_hash_cmd!(SHA2_224Cmd, SHA2_256Cmd, CheckCmd);

macro_rules! impl_cmd_for_hashcmd {
    ([$TYPE1: ty, $VARIANT1: expr, $NAME1: literal], $([$TYPE2: ty, $VARIANT2: expr, $NAME2: literal]),+) => {
        impl_cmd_for_hashcmd!([$TYPE1, $VARIANT1, $NAME1]);
        impl_cmd_for_hashcmd!($([$TYPE2, $VARIANT2, $NAME2]),+);
    };
    ([$TYPE: ty, $VARIANT: expr, $NAME: literal]) => {
        impl Cmd for $TYPE {
            const NAME: &'static str = $NAME;

            fn cmd() -> Command {
                common_cmd(Self::NAME).about($VARIANT.to_string())
            }

            fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
                common_run($VARIANT, self.pipe.as_slice(), m)
            }
        }
    };
}

impl_cmd_for_hashcmd!(
    [SHA2_224Cmd, Variant::SHA224, "s2-224"],
    [SHA2_256Cmd, Variant::SHA256, "s2-256"]
);

mod check;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, data: &[u8]) -> PathBuf {
        let f = std::env::temp_dir().join(format!("sha2sum-{}-{name}", std::process::id()));
        let mut h = File::create(&f).unwrap();
        h.write_all(data).unwrap();
        f
    }

    #[test]
    fn record_hex() {
        let r = DigestRecord::new(Variant::SHA256, "x".to_string(), &[0x00, 0xab, 0x10]);
        assert_eq!(r.digest, "00ab10");
        assert_eq!(r.algorithm, "SHA-256");
        assert_eq!(
            serde_json::to_string(&r).unwrap(),
            r#"{"algorithm":"SHA-256","name":"x","digest":"00ab10"}"#
        );
    }

    const ABC_256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
    const EMPTY_256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    fn matches<const N: usize>(args: [&str; N]) -> ArgMatches {
        SHA2_256Cmd::cmd().get_matches_from(args)
    }

    #[test]
    fn message_assembly() {
        // 管道数据在前, 字符串在后
        let m = matches(["s2-256", "c"]);
        let r = message_record(Variant::SHA256, b"ab", &m).unwrap();
        assert_eq!(r.digest, ABC_256);
        assert_eq!(r.name, STDIN_NAME);

        let m = matches(["s2-256", "abc"]);
        let r = message_record(Variant::SHA256, b"", &m).unwrap();
        assert_eq!(r.digest, ABC_256);

        let r = message_record(Variant::SHA256, b"abc", &matches(["s2-256"])).unwrap();
        assert_eq!(r.digest, ABC_256);

        // 没有任何输入
        let r = message_record(Variant::SHA256, b"", &matches(["s2-256"])).unwrap();
        assert_eq!(r.digest, EMPTY_256);

        let m = SHA2_224Cmd::cmd().get_matches_from(["s2-224"]);
        let r = message_record(Variant::SHA224, b"", &m).unwrap();
        assert_eq!(r.digest, "d14a028c2a3a2bc9476102bb288234c415a2b01f828ea62ac5b3e42f");
        assert_eq!(r.algorithm, "SHA-224");

        // 只有文件时不输出消息的摘要
        let m = matches(["s2-256", "-f", "a.txt"]);
        assert!(message_record(Variant::SHA256, b"", &m).is_none());
        let m = matches(["s2-256", "-f", "a.txt", "abc"]);
        assert_eq!(message_record(Variant::SHA256, b"", &m).unwrap().digest, ABC_256);
    }

    #[test]
    fn records_output() {
        let records = vec![
            DigestRecord::new(Variant::SHA256, STDIN_NAME.to_string(), &[0xab, 0x01]),
            DigestRecord::new(Variant::SHA256, "a.txt".to_string(), &[0x00]),
        ];

        assert_eq!(format_records(&records, false, false).unwrap(), "ab01  -\n00  a.txt");
        assert_eq!(format_records(&records, true, false).unwrap(), "0xab01  -\n0x00  a.txt");
        assert_eq!(format_records(&[], false, false).unwrap(), "");

        let v: serde_json::Value =
            serde_json::from_str(&format_records(&records, true, true).unwrap()).unwrap();
        assert_eq!(
            v,
            serde_json::json!([
                {"algorithm": "SHA-256", "name": "-", "digest": "ab01"},
                {"algorithm": "SHA-256", "name": "a.txt", "digest": "00"},
            ])
        );
    }

    #[test]
    fn run_with_files() {
        let f = temp_file("run", b"abc");
        let m = matches(["s2-256", "--json", "-f", f.to_str().unwrap()]);
        assert!(SHA2_256Cmd::new(b"").run(&m).is_ok());

        let missing = std::env::temp_dir().join("sha2sum-not-exist-run");
        let m = matches(["s2-256", "-f", f.to_str().unwrap(), "-f", missing.to_str().unwrap()]);
        assert!(SHA2_256Cmd::new(b"").run(&m).is_err());

        std::fs::remove_file(&f).unwrap();
    }

    #[test]
    fn hash_file_streaming() {
        let data = vec![b'a'; 10_000];
        let f = temp_file("streaming", &data);

        // 缓冲区比块小, 也不是块长度的整数倍
        let mut buf = [0u8; 37];
        let mut h = HashEngine::new(Variant::SHA256);
        hash_file(&mut h, &f, &mut buf).unwrap();

        let mut expect = HashEngine::new(Variant::SHA256);
        expect.update(&data);
        assert_eq!(h.sum(), expect.sum());

        std::fs::remove_file(&f).unwrap();
    }

    #[test]
    fn hash_file_errors() {
        let mut buf = [0u8; 64];
        let mut h = HashEngine::new(Variant::SHA224);
        let missing = std::env::temp_dir().join("sha2sum-not-exist-file");
        let e = hash_file(&mut h, &missing, &mut buf).unwrap_err();
        assert!(matches!(e.downcast_ref::<SumError>(), Some(SumError::PathNotExist(_))));

        let e = hash_file(&mut h, &std::env::temp_dir(), &mut buf).unwrap_err();
        assert!(matches!(e.downcast_ref::<SumError>(), Some(SumError::NotAFile(_))));
    }

    #[test]
    fn hash_files_keeps_order() {
        let f1 = temp_file("order1", b"abc");
        let f2 = temp_file("order2", b"");
        let missing = std::env::temp_dir().join("sha2sum-not-exist-order");
        let files = [f1.clone(), missing, f2.clone()];

        let res = hash_files(&[Variant::SHA256, Variant::SHA256, Variant::SHA224], &files).unwrap();
        assert_eq!(res.len(), 3);
        assert_eq!(
            to_hex(res[0].as_ref().unwrap()),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(res[1].is_err());
        assert_eq!(
            to_hex(res[2].as_ref().unwrap()),
            "d14a028c2a3a2bc9476102bb288234c415a2b01f828ea62ac5b3e42f"
        );

        std::fs::remove_file(&f1).unwrap();
        std::fs::remove_file(&f2).unwrap();
    }
}
