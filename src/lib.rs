pub mod cmd;
pub mod error;

/// 打印错误日志, 返回`None`
pub fn log_error<T>(x: Result<T, anyhow::Error>) -> Option<T> {
    x.map_err(|e| {
        log::error!("{e}");
    })
    .ok()
}
