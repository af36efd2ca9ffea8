use std::sync::Mutex;

use tracing::info;

use scout_app_core::{DesktopNotifyPort, NotifyPermission};

/// Terminal stand-in for OS notifications: permission starts undetermined,
/// the first request grants it, and notifications land in the log.
pub struct TermNotifier {
    permission: Mutex<NotifyPermission>,
}

impl TermNotifier {
    pub fn new() -> Self {
        Self {
            permission: Mutex::new(NotifyPermission::Default),
        }
    }
}

impl Default for TermNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopNotifyPort for TermNotifier {
    fn permission(&self) -> NotifyPermission {
        *self.permission.lock().unwrap()
    }

    fn request_permission(&self) -> NotifyPermission {
        let mut permission = self.permission.lock().unwrap();
        if *permission == NotifyPermission::Default {
            *permission = NotifyPermission::Granted;
        }
        *permission
    }

    fn show(&self, title: &str, body: &str) {
        info!(%title, %body, "notification");
    }
}

/// For headless use: permission is permanently denied, nothing is shown.
pub struct NoopNotifier;

impl DesktopNotifyPort for NoopNotifier {
    fn permission(&self) -> NotifyPermission {
        NotifyPermission::Denied
    }

    fn request_permission(&self) -> NotifyPermission {
        NotifyPermission::Denied
    }

    fn show(&self, _title: &str, _body: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_notifier_grants_on_first_request() {
        let notifier = TermNotifier::new();
        assert_eq!(notifier.permission(), NotifyPermission::Default);
        assert_eq!(notifier.request_permission(), NotifyPermission::Granted);
        assert_eq!(notifier.permission(), NotifyPermission::Granted);
    }

    #[test]
    fn noop_notifier_never_grants() {
        let notifier = NoopNotifier;
        assert_eq!(notifier.request_permission(), NotifyPermission::Denied);
    }
}
