use log::LevelFilter;
use simplelog::{Config, SimpleLogger};

/// Install the logger. Called before the configuration is read, so problems
/// with config files are reported.
pub fn init(verbose: bool, enabled: bool) {
    let _ = SimpleLogger::init(level(verbose, enabled), Config::default());
}

/// Re-tune the active level once the configuration is known.
pub fn retune(verbose: bool, enabled: bool) {
    log::set_max_level(level(verbose, enabled));
}

fn level(verbose: bool, enabled: bool) -> LevelFilter {
    match (enabled, verbose) {
        (false, _) => LevelFilter::Off,
        (true, true) => LevelFilter::Info,
        (true, false) => LevelFilter::Warn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level() {
        assert_eq!(level(true, true), LevelFilter::Info);
        assert_eq!(level(false, true), LevelFilter::Warn);
        assert_eq!(level(true, false), LevelFilter::Off);
    }

    #[test]
    fn test_init_before_config_then_retune() {
        init(false, true);
        retune(false, true);
        assert_eq!(log::max_level(), LevelFilter::Warn);
        assert!(log::log_enabled!(log::Level::Warn));

        retune(false, false);
        assert_eq!(log::max_level(), LevelFilter::Off);

        retune(true, true);
        assert_eq!(log::max_level(), LevelFilter::Info);
    }
}
