//! Per-site extraction profiles.
//!
//! Each platform is data only: session setup plus an ordered list of
//! [`FieldRule`]s. All three run through the same [`crate::run_battery`].

mod aliexpress;
mod noon;
mod shein;

use shopgrab_core::Platform;

use crate::extractor::FieldRule;
use crate::page::{Geolocation, SessionOptions};

/// Position reported to every storefront, so prices and shipping are quoted
/// for the same delivery region.
pub(crate) const STOREFRONT_GEOLOCATION: Geolocation = Geolocation {
    latitude: 24.423_12,
    longitude: 105.758_68,
    accuracy: 100.0,
};

/// Session setup and field battery for one platform.
#[derive(Debug, Clone)]
pub struct PlatformProfile {
    pub platform: Platform,
    pub session: SessionOptions,
    pub fields: &'static [FieldRule],
}

#[must_use]
pub fn profile_for(platform: Platform) -> PlatformProfile {
    match platform {
        Platform::Noon => noon::profile(),
        Platform::Aliexpress => aliexpress::profile(),
        Platform::Shein => shein::profile(),
    }
}

/// Session options shared by every platform: no cache, fixed geolocation.
pub(crate) fn base_session() -> SessionOptions {
    SessionOptions {
        disable_cache: true,
        geolocation: Some(STOREFRONT_GEOLOCATION),
        extra_headers: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_platform_has_a_profile() {
        for platform in Platform::ALL {
            let profile = profile_for(platform);
            assert_eq!(profile.platform, platform);
            assert!(!profile.fields.is_empty());
        }
    }

    #[test]
    fn no_profile_extracts_a_field_twice() {
        for platform in Platform::ALL {
            let profile = profile_for(platform);
            let mut seen = HashSet::new();
            for rule in profile.fields {
                assert!(
                    seen.insert(rule.field),
                    "{platform} extracts {:?} twice",
                    rule.field
                );
            }
        }
    }

    #[test]
    fn every_profile_disables_cache_and_sets_geolocation() {
        for platform in Platform::ALL {
            let session = profile_for(platform).session;
            assert!(session.disable_cache);
            assert_eq!(session.geolocation, Some(STOREFRONT_GEOLOCATION));
        }
    }
}
