// Cross platform logger to provide a simple way to start logging,
// with a specified level across Android and the other std targets.

// System:

// <Android>: uses android_logger to log messages to logcat under the "maverick_torch" tag.

// <Linux, iOS and macOS>: uses env_logger for std output logging.

// Level: log::Level sets the maximum logging level. Defaults to Warn if None is used.
// Starting twice keeps the first logger.

pub struct Logger;


impl Logger {
    pub fn start (level: Option<log::Level>) {
        let level = level.unwrap_or(log::Level::Warn);
        #[cfg(target_os="android")]
        {
            android_logger::init_once(
                android_logger::Config::default()
                    .with_max_level(level.to_level_filter())
                    .with_tag("maverick_torch"),
            );
        }

        #[cfg(not(target_os="android"))]
        {
            let _ = env_logger::builder().filter_level(level.to_level_filter()).try_init();
        }
    }
}
