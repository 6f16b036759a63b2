#![no_main]

use libfuzzer_sys::fuzz_target;
use retrocam::controller::CameraCommand;
use retrocam::error::get_user_friendly_error;

fuzz_target!(|data: &[u8]| {
    // Every stdin line goes through this parser
    if let Ok(line) = std::str::from_utf8(data) {
        match line.parse::<CameraCommand>() {
            Ok(_) => {}
            Err(e) => {
                let _ = get_user_friendly_error(&e);
            }
        }
    }
});
