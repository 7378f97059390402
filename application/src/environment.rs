use log::debug;

use std::env;

/// A process environment variable read by GStreamer or GTK, not by XFB.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnvVar {
    pub key: &'static str,
    pub value: &'static str,
}

pub const ENVIRONMENT: [EnvVar; 2] = [
    // Prefer the PulseAudio sink when GStreamer auto-plugs the audio output
    EnvVar {
        key: "GST_PLUGIN_FEATURE_RANK",
        value: "pulsesink:MAX",
    },
    // Load the AT-SPI bridge even if the session disabled it
    EnvVar {
        key: "NO_AT_BRIDGE",
        value: "0",
    },
];

/// Must be called before GTK or GStreamer are initialized
/// and while the process is still single-threaded.
pub fn init_environment() {
    for var in ENVIRONMENT.iter() {
        debug!("setting {}={}", var.key, var.value);
        env::set_var(var.key, var.value);
    }
}
