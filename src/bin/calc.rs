use solids3d::calc::run_session;
use solids3d::logging::{LoggingConfig, init_logging};

fn main() {
    init_logging(LoggingConfig::default());

    let stdin = std::io::stdin();
    if let Err(e) = run_session(stdin.lock(), std::io::stdout()) {
        log::error!("console I/O failed: {e}");
        std::process::exit(1);
    }
}
