use tokio::sync::watch;

/// Navigation surface of the host application.
///
/// A failed refresh moves the user to the login route through this trait, so
/// callers cannot assume they are still on the same screen afterwards.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);

    fn current(&self) -> String;
}

/// Navigator that tracks the current location and publishes every change
pub struct LocationNavigator {
    location: watch::Sender<String>,
}

impl LocationNavigator {
    pub fn new(initial: &str) -> Self {
        let (location, _) = watch::channel(initial.to_string());
        Self { location }
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.location.subscribe()
    }
}

impl Navigator for LocationNavigator {
    fn navigate(&self, path: &str) {
        let previous = self.location.send_replace(path.to_string());
        if previous != path {
            tracing::info!(from = %previous, to = path, "Navigated");
        }
    }

    fn current(&self) -> String {
        self.location.borrow().clone()
    }
}
