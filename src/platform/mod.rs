//! Host seams: cookies, navigation, and user notification.

pub mod cookies;
pub mod navigation;

pub use cookies::{CookieJar, HttpCookieJar, MemoryCookieJar, SESSION_COOKIES, expire_session_cookies};
pub use navigation::{LogNavigator, LogNotifier, Navigator, Notifier, RecordingNavigator, RecordingNotifier};
