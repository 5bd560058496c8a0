//! Store-directory resolution.
//!
//! There is deliberately no configuration file: every runtime setting
//! comes from a CLI flag or an environment variable, resolved with the
//! flag taking precedence. This mirrors the feed-driven, no-daemon shape
//! of the system — there's no long-lived process state that would justify
//! a config file's indirection.

use std::path::PathBuf;

pub const STORE_DIR_ENV: &str = "OBS_STORE_DIR";
const DEFAULT_STORE_DIR: &str = "./data";

/// Resolves the store directory: `cli_flag` if given, else
/// `$OBS_STORE_DIR` if set, else `./data`.
pub fn resolve_store_dir(cli_flag: Option<&str>) -> PathBuf {
    if let Some(flag) = cli_flag {
        return PathBuf::from(flag);
    }
    if let Ok(env_val) = std::env::var(STORE_DIR_ENV) {
        if !env_val.is_empty() {
            return PathBuf::from(env_val);
        }
    }
    PathBuf::from(DEFAULT_STORE_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn cli_flag_wins_over_env() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var(STORE_DIR_ENV, "/from/env");
        assert_eq!(resolve_store_dir(Some("/from/flag")), PathBuf::from("/from/flag"));
        std::env::remove_var(STORE_DIR_ENV);
    }

    #[test]
    fn env_wins_over_default() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var(STORE_DIR_ENV, "/from/env");
        assert_eq!(resolve_store_dir(None), PathBuf::from("/from/env"));
        std::env::remove_var(STORE_DIR_ENV);
    }

    #[test]
    fn falls_back_to_default() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var(STORE_DIR_ENV);
        assert_eq!(resolve_store_dir(None), PathBuf::from(DEFAULT_STORE_DIR));
    }
}
