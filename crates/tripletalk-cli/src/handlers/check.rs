//! Check command handler.

use tripletalk_core::DriverConfig;
use tripletalk_driver::SynthDriver;

/// Report whether the configured device is ready. Returns the result so the
/// caller can set the exit status.
pub fn execute(config: &DriverConfig) -> bool {
    let ready = SynthDriver::check(&config.device_path);
    if ready {
        println!("{}: ready", config.device_path);
    } else {
        println!("{}: unavailable", config.device_path);
    }
    ready
}
