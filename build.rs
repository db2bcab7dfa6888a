use chrono::{DateTime, Local};
use std::{process::Command, time::SystemTime};

fn exe_cmd(cmd: &mut Command) -> anyhow::Result<String> {
    let output = cmd.output()?;
    anyhow::ensure!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr).trim()
    );

    Ok(String::from_utf8(output.stdout)?.trim().to_string())
}

/// 获取git信息失败时(如不在git仓库中构建)以`unknown`代替
fn git_info(args: &[&str]) -> String {
    match exe_cmd(Command::new("git").args(args)) {
        Ok(s) if !s.is_empty() => s,
        Ok(_) => "unknown".to_string(),
        Err(e) => {
            println!("cargo:warning=git {} failed: {e}", args.join(" "));
            "unknown".to_string()
        }
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let mut commit = git_info(&["log", "-n", "1", "--pretty=format:%H"]);
    commit.truncate(8);
    let branch = git_info(&["branch", "--show-current"]);

    println!(
        "cargo:rustc-env=SHA2SUM_VERSION_INFO={}-{}",
        env!("CARGO_PKG_VERSION"),
        DateTime::<Local>::from(SystemTime::now()).format("%Y/%m/%d-%H:%M:%S:%Z")
    );

    println!("cargo:rustc-env=SHA2SUM_GIT_INFO={}-{}", branch, commit);
}
