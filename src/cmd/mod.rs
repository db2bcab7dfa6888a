use clap::{ArgMatches, Command};

pub trait Cmd {
    const NAME: &'static str;

    fn cmd() -> Command;

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()>;
}

pub mod config;
pub use config::SumConfig;

mod hash;
pub use hash::{CheckCmd, SHA2_224Cmd, SHA2_256Cmd};
