//! Java toolchain selection per game version.

use chisel_targets::GameVersion;

/// Toolchain for game versions up to and including 1.20.4.
pub const JAVA_LOWER: u32 = 17;
/// Toolchain from 1.20.5 onward.
pub const JAVA_HIGHER: u32 = 21;

/// Decide the Java language version required to build a game version.
///
/// Unparsable input degrades to [`JAVA_LOWER`] rather than failing: one
/// odd variant name must not break the whole configuration pass.
pub fn resolve_toolchain(game_version: &str) -> u32 {
    match GameVersion::parse(game_version) {
        Some(v) => java_for(v),
        None => JAVA_LOWER,
    }
}

/// The same policy over an already-parsed version.
pub fn java_for(v: GameVersion) -> u32 {
    if v.major != 1 {
        JAVA_LOWER
    } else if v.minor > 20 || (v.minor == 20 && v.patch >= 5) {
        JAVA_HIGHER
    } else {
        JAVA_LOWER
    }
}
