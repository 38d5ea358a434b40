//! Default TOML config template with inline documentation comments.

pub(crate) fn default_config_toml() -> &'static str {
    r##"# Project Hub Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[bridge]
url = "ws://127.0.0.1:12345"
# objects = ["backend"]        # empty or absent: request every published object
# handshake_timeout_ms = 0     # 0-600000, 0 waits forever

[logging]
# level = "info"               # trace | debug | info | warn | error
"##
}
