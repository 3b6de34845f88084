// SPDX-License-Identifier: GPL-3.0-or-later

// The root of the SDK installation, set by the SDK export script.
pub const KEY_SDK__ROOT: &str = "IDF_PATH";
// The prefix of the cross toolchain executables (eg.: `xtensa-esp32-elf-`).
pub const KEY_TOOLCHAIN__PREFIX: &str = "CROSS_COMPILE";

// https://docs.rs/env_logger/latest/env_logger/#enabling-logging
pub const KEY_LOG__FILTER: &str = "RUST_LOG";

pub fn relevant_env(key: &str) -> bool {
    matches!(key, KEY_SDK__ROOT | KEY_TOOLCHAIN__PREFIX | KEY_LOG__FILTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevant_env() {
        assert!(relevant_env("IDF_PATH"));
        assert!(relevant_env("CROSS_COMPILE"));
        assert!(relevant_env("RUST_LOG"));
        assert!(!relevant_env("PATH"));
        assert!(!relevant_env("idf_path"));
    }
}
