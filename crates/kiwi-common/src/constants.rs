//! System-wide constants and default paths.

/// Binary name for the CLI.
pub const BIN_NAME: &str = "kiwi-bind";

/// Host kernel interfaces bind-mounted into every build root, in mount order.
pub const DEFAULT_BIND_LOCATIONS: &[&str] = &["/proc", "/dev", "/sys"];

/// Host configuration files staged into the build root when present.
pub const DEFAULT_CONFIG_FILES: &[&str] =
    &["/etc/resolv.conf", "/etc/hosts", "/etc/sysconfig/proxy"];

/// Host cache directory shared with the build root.
pub const DEFAULT_SHARED_LOCATION: &str = "/var/cache/kiwi";

/// Marker appended to the file name of staged config copies.
pub const DEFAULT_CONFIG_SUFFIX: &str = ".kiwi";

/// Host tools the bind manager shells out to.
pub const REQUIRED_HOST_TOOLS: &[&str] = &[
    "mount",
    "umount",
    "mountpoint",
    "mkdir",
    "cp",
    "ln",
    "rm",
    "rmdir",
];
