//! Routing module
//!
//! Decides which resource answers a request path:
//! - Ordered rule list producing a `Classification`
//! - Gist ID recognition and redirect targets
//! - Mobile/desktop main page selection

mod classifier;
pub mod device;
pub mod gist;

pub use classifier::{Classification, Classifier, Rule, FLAT_RULES, SEGMENTED_RULES};
pub use device::{select_main_page, DeviceClass};
