//! Subscriber installation

use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Output profile, as named in engine configuration (`log_profile = "..."`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Pretty, `cfgtx=debug`
    #[default]
    Development,
    /// JSON lines, `cfgtx=info`
    Production,
    /// No output; pair with `init_test_capture()`
    Test,
}

impl Profile {
    /// Filter used when `RUST_LOG` is unset
    pub fn default_directive(self) -> &'static str {
        match self {
            Profile::Development => "cfgtx=debug",
            Profile::Production => "cfgtx=info",
            Profile::Test => "off",
        }
    }

    fn filter(self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }
}

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Install the global subscriber for `profile`
///
/// Returns `true` only for the call that actually installed it. Later calls,
/// or calls after some other global subscriber was set, return `false`.
pub fn init(profile: Profile) -> bool {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return false;
    }

    let registry = Registry::default().with(profile.filter());
    match profile {
        Profile::Development => registry.with(fmt::layer().pretty()).try_init().is_ok(),
        Profile::Production => registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init()
            .is_ok(),
        Profile::Test => registry.try_init().is_ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_a_noop() {
        init(Profile::Test);
        assert!(!init(Profile::Production));
    }

    #[test]
    fn test_directives_per_profile() {
        assert_eq!(Profile::default(), Profile::Development);
        assert_eq!(Profile::Production.default_directive(), "cfgtx=info");
        assert_eq!(Profile::Test.default_directive(), "off");
    }
}
