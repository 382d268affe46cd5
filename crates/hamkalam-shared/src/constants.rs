use std::time::Duration;

/// Maximum attachment size in bytes (16 MiB)
pub const MAX_ATTACHMENT_SIZE: u64 = 16 * 1024 * 1024;

/// Quiet period before a search query is actually sent
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Queries shorter than this never reach the server
pub const MIN_QUERY_LEN: usize = 2;

/// Shown in place of the content of a deleted message
pub const DELETED_PLACEHOLDER: &str = "این پیام حذف شد";

/// Appended (once) to the content of an edited message
pub const EDITED_BADGE: &str = " (ویرایش شده)";

/// Opacity applied to a deleted message element
pub const DELETED_OPACITY: f32 = 0.5;

/// Shown when a search returns nothing
pub const NO_RESULTS_MESSAGE: &str = "نتیجه‌ای یافت نشد";

/// Fixed cache name; bump the version suffix to invalidate everything
pub const CACHE_NAME: &str = "chat-app-v1";

/// Static assets pre-populated into the cache at worker install
pub const PRECACHED_ASSETS: [&str; 5] = [
    "/",
    "/static/css/style.css",
    "/static/js/chat.js",
    "/static/js/chat-enhanced.js",
    "/static/images/logo.png",
];

/// Where a notification click lands when the payload carries no route
pub const DEFAULT_CLICK_URL: &str = "/inbox";

/// Badge icon shown on every notification (also the icon fallback)
pub const NOTIFICATION_BADGE: &str = "/static/images/logo.png";

/// Vibration pattern for incoming notifications (ms on/off/on)
pub const VIBRATION_PATTERN: [u32; 3] = [200, 100, 200];

/// Worker script path handed to the platform at registration
pub const WORKER_SCRIPT: &str = "/static/js/service-worker.js";
