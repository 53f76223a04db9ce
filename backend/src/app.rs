/// Install the process-wide logger.
///
/// The filter comes from `RUST_LOG` and falls back to `info`. Calling this
/// more than once is harmless.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init();
}
