use std::sync::Once;

pub const LOG_TAG: &str = "Axel";

static INIT: Once = Once::new();

/// Route the `log` facade to logcat. Safe to call on every `init`.
pub fn init_logging() {
    INIT.call_once(|| {
        #[cfg(target_os = "android")]
        {
            if let Err(e) = android_log::init(LOG_TAG) {
                eprintln!("[{}] logger already set: {}", LOG_TAG, e);
            }
        }
        log::set_max_level(log::LevelFilter::Debug);
    });
}
