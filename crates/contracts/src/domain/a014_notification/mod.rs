pub mod aggregate;

pub use aggregate::{Channel, Notification, NotificationPriority};
