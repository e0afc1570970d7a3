//! Host capabilities consulted while lifting.

use std::sync::OnceLock;

use tracing::debug;

/// Host CPU features that change which code the lifter emits.
///
/// Passed by value into every lift call, so translation output depends only
/// on its arguments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostFeatures {
    /// Carry-less multiplication (`PCLMULQDQ`).
    pub pclmulqdq: bool,
}

impl HostFeatures {
    /// No optional features; every instruction takes its fallback path.
    #[must_use]
    pub const fn none() -> Self {
        Self { pclmulqdq: false }
    }

    /// Every feature the lifter knows about.
    #[must_use]
    pub const fn all() -> Self {
        Self { pclmulqdq: true }
    }

    /// Set carry-less multiplication support.
    #[must_use]
    pub const fn with_pclmulqdq(mut self, enabled: bool) -> Self {
        self.pclmulqdq = enabled;
        self
    }

    /// Query the running CPU.
    #[must_use]
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        let pclmulqdq = std::arch::is_x86_feature_detected!("pclmulqdq")
            && std::arch::is_x86_feature_detected!("sse2");
        #[cfg(not(target_arch = "x86_64"))]
        let pclmulqdq = false;

        let features = Self { pclmulqdq };
        debug!(pclmulqdq, "detected host features");
        features
    }

    /// Features of the running CPU, detected once per process.
    #[must_use]
    pub fn host() -> Self {
        static HOST: OnceLock<HostFeatures> = OnceLock::new();
        *HOST.get_or_init(Self::detect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert!(!HostFeatures::none().pclmulqdq);
        assert!(HostFeatures::all().pclmulqdq);
        assert_eq!(HostFeatures::default(), HostFeatures::none());
        assert_eq!(
            HostFeatures::none().with_pclmulqdq(true),
            HostFeatures::all()
        );
    }

    #[test]
    fn test_host_is_stable() {
        assert_eq!(HostFeatures::host(), HostFeatures::host());
        assert_eq!(HostFeatures::host(), HostFeatures::detect());
    }
}
