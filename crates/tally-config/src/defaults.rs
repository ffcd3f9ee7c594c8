//! Default value functions for serde deserialization.
//!
//! These functions forward to constants defined in `tally_core::defaults`.

use tally_core::defaults;

/// Generate default value functions that forward to tally_core::defaults constants.
macro_rules! default_fns {
    // For Copy types (integers, bool, etc.)
    ($($fn_name:ident => $const_name:ident : $ty:ty),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> $ty {
                defaults::$const_name
            }
        )*
    };
}

/// Generate default value functions that return String from &str constants.
macro_rules! default_string_fns {
    ($($fn_name:ident => $const_name:ident),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> String {
                defaults::$const_name.to_string()
            }
        )*
    };
}

default_fns! {
    default_refresh_interval_secs   => DEFAULT_REFRESH_INTERVAL_SECS: u64,
    default_refresh_retry_secs      => DEFAULT_REFRESH_RETRY_SECS: u64,
    default_push_interval_secs      => DEFAULT_PUSH_INTERVAL_SECS: u64,
    default_push_timeout_secs       => DEFAULT_PUSH_TIMEOUT_SECS: u64,
    default_drop_removed_identities => DEFAULT_DROP_REMOVED_IDENTITIES: bool,
}

default_string_fns! {
    default_node_type => DEFAULT_NODE_TYPE,
}
