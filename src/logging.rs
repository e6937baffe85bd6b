use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Initialize the logger with elapsed-time stamps.
///
/// `verbose` selects Info, otherwise Warn; `RUST_LOG` can still raise or
/// lower it per module. Output goes to stderr as `[HH:MM:SS] LEVEL: message`.
pub fn init_logger(verbose: bool) {
    START_TIME.get_or_init(Instant::now);

    let level = if verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            let elapsed = START_TIME.get_or_init(Instant::now).elapsed().as_secs();
            writeln!(
                buf,
                "[{:02}:{:02}:{:02}] {}: {}",
                elapsed / 3600,
                (elapsed % 3600) / 60,
                elapsed % 60,
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr)
        .init();
}
