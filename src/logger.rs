use simplelog::*;
use std::fs::File;
use std::path::Path;

/// File log at Info plus stderr output (Warn, or Debug when `verbose`).
pub fn init(verbose: bool) -> anyhow::Result<()> {
    let log_dir = Path::new("data/logs");
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir)?;
    }

    let log_file = File::create(log_dir.join("terms_in_short.log"))?;
    let term_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    CombinedLogger::init(vec![
        TermLogger::new(
            term_level,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])?;

    Ok(())
}
