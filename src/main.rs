use clap::{value_parser, Arg, ArgAction, Command};
use log::LevelFilter;
use sha2sum::cmd::{CheckCmd, Cmd, SHA2_224Cmd, SHA2_256Cmd, SumConfig};
use sha2sum::log_error;
use std::io::Read;
use std::path::PathBuf;
#[cfg(feature = "sec-zeroize")]
use zeroize::Zeroize;

fn main() {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let version = format!(
        "{} ({})",
        env!("SHA2SUM_VERSION_INFO"),
        env!("SHA2SUM_GIT_INFO")
    );
    let app = Command::new("sha2sum")
        .version(version)
        .about("compute and check SHA-256/SHA-224 message digests")
        .arg(
            Arg::new("pipe")
                .long("pipe")
                .short('p')
                .action(ArgAction::SetTrue)
                .required(false)
                .help("read the message from stdin"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .action(ArgAction::Set)
                .value_parser(value_parser!(PathBuf))
                .required(false)
                .help("config file path, default `~/.sha2sum.json`"),
        )
        .subcommand(SHA2_256Cmd::cmd())
        .subcommand(SHA2_224Cmd::cmd())
        .subcommand(CheckCmd::cmd())
        .get_matches();

    if let Some(f) = app.get_one::<PathBuf>("config") {
        if log_error(SumConfig::init(Some(f.as_path())).map_err(anyhow::Error::from)).is_none() {
            std::process::exit(1);
        }
    }

    let Some((s, m)) = app.subcommand() else {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("SHA2SUM_VERSION_INFO"));
        return;
    };

    let mut pdata = Vec::with_capacity(1024);
    if app.get_flag("pipe") {
        let res = std::io::stdin().lock().read_to_end(&mut pdata);
        if log_error(res.map_err(anyhow::Error::from)).is_none() {
            std::process::exit(1);
        }
    }

    let res = match s {
        SHA2_256Cmd::NAME => SHA2_256Cmd::new(pdata.as_slice()).run(m),
        SHA2_224Cmd::NAME => SHA2_224Cmd::new(pdata.as_slice()).run(m),
        CheckCmd::NAME => CheckCmd::new(pdata.as_slice()).run(m),
        name => Err(anyhow::anyhow!("unsupport for {}", name)),
    };

    #[cfg(feature = "sec-zeroize")]
    pdata.zeroize();

    if log_error(res).is_none() {
        std::process::exit(1);
    }
}
