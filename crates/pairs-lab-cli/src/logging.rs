use chrono::Local;
use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Install the stderr logger. `RUST_LOG` wins over the `-v` count.
pub fn init(verbose: u8) {
    let default_level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    let mut builder = Builder::new();
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%dT%H:%M:%S%z"),
                record.level(),
                record.args()
            )
        })
        .filter(None, default_level);

    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    // a second init (tests) is harmless
    let _ = builder.try_init();
}
