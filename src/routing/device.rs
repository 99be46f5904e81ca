//! Device classification
//!
//! Coarse mobile detection from request headers, used only to pick which
//! main page to serve.

use crate::config::SiteConfig;

/// User-agent fragments that identify handheld browsers
const MOBILE_UA_TOKENS: &[&str] = &[
    "Mobi",
    "Android",
    "iPhone",
    "iPad",
    "iPod",
    "Windows Phone",
    "IEMobile",
    "BlackBerry",
    "Opera Mini",
];

/// Accept types only WAP browsers advertise
const WAP_ACCEPT_TYPES: &[&str] = &["application/vnd.wap.xhtml+xml", "text/vnd.wap.wml"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Mobile,
    Other,
}

impl DeviceClass {
    pub fn detect(user_agent: Option<&str>, accept: Option<&str>) -> Self {
        let ua_mobile =
            user_agent.is_some_and(|ua| MOBILE_UA_TOKENS.iter().any(|t| ua.contains(t)));
        let wap = accept.is_some_and(|a| WAP_ACCEPT_TYPES.iter().any(|t| a.contains(t)));
        if ua_mobile || wap {
            Self::Mobile
        } else {
            Self::Other
        }
    }
}

/// Resource path of the main page for this device
pub fn select_main_page(site: &SiteConfig, device: DeviceClass) -> &str {
    match (device, site.mobile_page.as_deref()) {
        (DeviceClass::Mobile, Some(mobile)) => mobile,
        _ => &site.main_page,
    }
}
