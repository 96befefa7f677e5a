//! Built-in capability IDs.
//!
//! These match the peripheral set of the reference gateway firmware.
//! Additional capabilities may be registered under any unused ID.

/// Antenna diagnostics (ADC open/short detection).
pub const ANTENNA: u8 = 1;

/// Electronic-horizon data derived from GPS.
pub const HORIZON: u8 = 2;

/// Antenna switch control.
pub const ANTENNA_SWITCH: u8 = 3;

/// Audio capture/playback.
pub const AUDIO: u8 = 4;

/// Suspend/power control.
pub const SUSPEND: u8 = 5;

/// Returns a human-readable name for a capability ID.
pub fn capability_name(id: u8) -> &'static str {
    match id {
        ANTENNA => "ANTENNA",
        HORIZON => "HORIZON",
        ANTENNA_SWITCH => "ANTENNA_SWITCH",
        AUDIO => "AUDIO",
        SUSPEND => "SUSPEND",
        _ => "USER",
    }
}
