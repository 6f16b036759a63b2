#![no_main]

use libfuzzer_sys::fuzz_target;
use retrocam::config::CameraConfig;

fuzz_target!(|data: &[u8]| {
    // Parsing and validating arbitrary config files must never panic
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = serde_json::from_str::<CameraConfig>(s) {
            let _ = config.validate();
            let _ = config.idle_poll();
        }
    }
});
