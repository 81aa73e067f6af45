/// Prefix of environment variables that override configuration (`HARDEN__LIST__BOUND=50`).
pub const ENV_PREFIX: &str = "HARDEN";

/// Largest number of slots a managed list may hold.
pub const DEFAULT_LIST_BOUND: u32 = 99;

/// Location of the Explorer policy list of executables that must not run.
pub const DISALLOW_RUN_PATH: &str =
    r"Software\Microsoft\Windows\CurrentVersion\Policies\Explorer\DisallowRun";

/// Default directory of the filesystem-backed hive.
pub const DEFAULT_DATA_DIR: &str = "hive";

/// Default log file base name.
pub const LOG_FILE_NAME: &str = "hardentools";
