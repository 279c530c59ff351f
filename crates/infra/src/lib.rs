//! Infrastructure layer: runtime settings, the shared dashboard controller
//! and the notification feed.

pub mod dashboard;
pub mod notifications;
pub mod settings;

pub use dashboard::{Dashboard, PendingEnrichment};
pub use notifications::{Notification, NotificationCenter, NotificationKind, NotificationSink};
pub use settings::Settings;
