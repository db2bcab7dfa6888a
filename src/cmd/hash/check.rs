use crate::cmd::hash::{hash_files, CheckCmd};
use crate::cmd::Cmd;
use crate::error::SumError;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use crypto_hash::sha2::Variant;
use crypto_hash::to_hex;
use regex::Regex;
use std::path::PathBuf;

/// `<hex digest> <空格>(<空格>|*)<path>`, 和coreutils的sha256sum输出格式一致
const CHECK_LINE_PATTERN: &str = r"^(?:0[xX])?([0-9a-fA-F]+) [ *](.+)$";

#[derive(Debug, Clone, PartialEq, Eq)]
struct CheckLine {
    variant: Variant,
    // 小写
    digest: String,
    path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckStatus {
    Ok,
    Mismatch,
    Unreadable,
}

#[derive(Debug, Default)]
struct CheckReport {
    items: Vec<(PathBuf, CheckStatus)>,
    malformed: usize,
}

impl CheckReport {
    fn count(&self, status: CheckStatus) -> usize {
        self.items.iter().filter(|(_, s)| *s == status).count()
    }

    fn result(&self) -> Result<(), SumError> {
        let (mismatched, unreadable) = (
            self.count(CheckStatus::Mismatch),
            self.count(CheckStatus::Unreadable),
        );

        if mismatched == 0 && unreadable == 0 {
            Ok(())
        } else {
            Err(SumError::CheckFailed {
                mismatched,
                unreadable,
            })
        }
    }
}

/// 未指定`algo`时, 按摘要长度推断变体
fn parse_line(re: &Regex, line: &str, algo: Option<Variant>) -> Option<CheckLine> {
    let caps = re.captures(line)?;
    let digest = caps.get(1)?.as_str().to_ascii_lowercase();
    let path = PathBuf::from(caps.get(2)?.as_str());

    let variant = match algo {
        Some(v) => v,
        None => Variant::all()
            .iter()
            .copied()
            .find(|v| v.size() << 1 == digest.len())?,
    };

    (digest.len() == variant.size() << 1).then_some(CheckLine {
        variant,
        digest,
        path,
    })
}

fn check(content: &str, algo: Option<Variant>) -> anyhow::Result<CheckReport> {
    let re = Regex::new(CHECK_LINE_PATTERN)?;
    let mut report = CheckReport::default();
    let mut lines = Vec::new();

    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_line(&re, line, algo) {
            Some(l) => lines.push(l),
            None => {
                log::warn!(
                    "{}",
                    SumError::MalformedCheckLine {
                        line: i + 1,
                        content: line.to_string()
                    }
                );
                report.malformed += 1;
            }
        }
    }

    anyhow::ensure!(
        !lines.is_empty(),
        "no properly formatted checksum lines found"
    );

    let variants = lines.iter().map(|l| l.variant).collect::<Vec<_>>();
    let paths = lines.iter().map(|l| l.path.as_path()).collect::<Vec<_>>();

    for (l, res) in lines.iter().zip(hash_files(&variants, &paths)?) {
        let status = match res {
            Ok(d) if to_hex(&d) == l.digest => CheckStatus::Ok,
            Ok(_) => CheckStatus::Mismatch,
            Err(e) => {
                log::error!("{}: {e}", l.path.display());
                CheckStatus::Unreadable
            }
        };
        report.items.push((l.path.clone(), status));
    }

    Ok(report)
}

impl Cmd for CheckCmd {
    const NAME: &'static str = "check";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("read checksums from the file and check them")
            .arg(
                Arg::new("checkfile")
                    .value_name("CHECKFILE")
                    .action(ArgAction::Set)
                    .value_parser(value_parser!(PathBuf))
                    .required(false)
                    .help("checksum list, read from the pipe data if not specified"),
            )
            .arg(
                Arg::new("algorithm")
                    .short('a')
                    .long("algorithm")
                    .action(ArgAction::Set)
                    .value_parser(value_parser!(String))
                    .required(false)
                    .help("sha224 or sha256, inferred from the digest length if not specified"),
            )
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let (content, algo) = check_input(self.pipe.as_slice(), m)?;

        let report = check(content.as_str(), algo)?;
        for (p, status) in report.items.iter() {
            match status {
                CheckStatus::Ok => println!("{}: OK", p.display()),
                CheckStatus::Mismatch => println!("{}: FAILED", p.display()),
                CheckStatus::Unreadable => println!("{}: FAILED open or read", p.display()),
            }
        }

        if report.malformed > 0 {
            log::warn!("{} line(s) are improperly formatted", report.malformed);
        }
        match report.count(CheckStatus::Unreadable) {
            0 => {}
            n => log::warn!("{n} listed file(s) could not be read"),
        }
        match report.count(CheckStatus::Mismatch) {
            0 => {}
            n => log::warn!("{n} computed checksum(s) did NOT match"),
        }

        Ok(report.result()?)
    }
}

/// 校验列表来自CHECKFILE, 未指定时来自管道数据; `-a`指定的算法优先于按长度推断
fn check_input(pipe: &[u8], m: &ArgMatches) -> anyhow::Result<(String, Option<Variant>)> {
    let algo = m
        .get_one::<String>("algorithm")
        .map(|s| s.parse::<Variant>())
        .transpose()?;

    let content = match m.get_one::<PathBuf>("checkfile") {
        Some(f) => {
            anyhow::ensure!(f.exists(), SumError::PathNotExist(f.display().to_string()));
            std::fs::read_to_string(f)?
        }
        None => {
            anyhow::ensure!(
                !pipe.is_empty(),
                "need to specified the check file or use `--pipe`"
            );
            String::from_utf8(pipe.to_vec())?
        }
    };

    Ok((content, algo))
}
