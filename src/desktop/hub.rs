//! Wiring of every registry, the aggregate bus and search
//!
//! The hub is built once at startup and shared as `Arc<Hub>`. Producers
//! (bridges to the compositor, notification daemon, power subsystem,
//! browsers and file watchers) write into its registries; the HTTP layer
//! reads from them.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use super::application::Application;
use super::browser::{Bookmark, Tab};
use super::file::File;
use super::notification::Notification;
use super::power::{Device, PowerAction, POWER_ACTIONS};
use super::window::Window;
use crate::bus::{Aggregator, Event, EventBus};
use crate::entity::{Base, CommandBus};
use crate::registry::{Catalog, Registry};
use crate::search::{Ranked, SearchEngine, SearchSource};
use crate::server::ServerConfig;
use crate::stats::HubStats;

pub const NOTIFICATION_PREFIX: &str = "/notification/";
pub const WINDOW_PREFIX: &str = "/window/";
pub const TAB_PREFIX: &str = "/tab/";
pub const APPLICATION_PREFIX: &str = "/application/";
pub const DEVICE_PREFIX: &str = "/device/";
pub const FILE_PREFIX: &str = "/file/";
pub const BOOKMARK_PREFIX: &str = "/bookmark/";
pub const POWER_ACTION_PREFIX: &str = "/start/";

/// Fixed endpoints offered by completion
pub const ENDPOINTS: [&str; 5] = [
    "/search?term=",
    "/complete?prefix=",
    "/watch",
    "/details?path=",
    "/stats",
];

/// Minimum term length (in characters) before applications are searched
pub const APPLICATION_MIN_TERM: usize = 1;

/// Minimum term length before devices, files, bookmarks and power actions
/// are searched
pub const BROAD_MIN_TERM: usize = 3;

/// All registries of a desktop session
pub struct Hub {
    pub notifications: Arc<Registry<u32, Notification>>,
    pub windows: Arc<Registry<u64, Window>>,
    pub tabs: Arc<Registry<String, Tab>>,
    pub applications: Arc<Registry<String, Application>>,
    pub devices: Arc<Registry<String, Device>>,
    pub files: Arc<Registry<String, File>>,
    pub bookmarks: Arc<Registry<String, Bookmark>>,
    pub power_actions: Arc<Registry<String, PowerAction>>,
    commands: CommandBus,
    catalogs: Vec<Arc<dyn Catalog>>,
    aggregator: Aggregator<Event>,
    search: SearchEngine,
    ignored_windows: HashSet<String>,
    notifications_enabled: bool,
    started_at: Instant,
}

impl Hub {
    /// Build every registry and start the aggregator relays
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: &ServerConfig) -> Self {
        let commands = CommandBus::new();

        let notifications: Arc<Registry<u32, Notification>> =
            Arc::new(Registry::with_prefix(NOTIFICATION_PREFIX));
        let windows: Arc<Registry<u64, Window>> = Arc::new(Registry::with_prefix(WINDOW_PREFIX));
        let tabs: Arc<Registry<String, Tab>> = Arc::new(Registry::with_prefix(TAB_PREFIX));
        let applications: Arc<Registry<String, Application>> =
            Arc::new(Registry::with_prefix(APPLICATION_PREFIX));
        let devices: Arc<Registry<String, Device>> = Arc::new(Registry::with_prefix(DEVICE_PREFIX));
        let files: Arc<Registry<String, File>> = Arc::new(Registry::with_prefix(FILE_PREFIX));
        let bookmarks: Arc<Registry<String, Bookmark>> =
            Arc::new(Registry::with_prefix(BOOKMARK_PREFIX));
        let power_actions: Arc<Registry<String, PowerAction>> =
            Arc::new(Registry::with_prefix(POWER_ACTION_PREFIX));

        for (key, title, icon) in POWER_ACTIONS {
            power_actions.put(key.to_string(), PowerAction::new(title, icon, &commands));
        }

        let mut catalogs: Vec<Arc<dyn Catalog>> = Vec::new();
        if config.notifications {
            catalogs.push(notifications.clone());
        }
        catalogs.push(windows.clone());
        catalogs.push(tabs.clone());
        catalogs.push(applications.clone());
        catalogs.push(devices.clone());
        catalogs.push(files.clone());
        catalogs.push(bookmarks.clone());
        catalogs.push(power_actions.clone());

        let aggregator = Aggregator::new();
        for catalog in &catalogs {
            aggregator.follow(&catalog.prefix(), catalog.events());
        }

        let mut always: Vec<Arc<dyn SearchSource>> = Vec::new();
        if config.notifications {
            always.push(notifications.clone());
        }
        always.push(windows.clone());
        always.push(tabs.clone());

        let apps: Vec<Arc<dyn SearchSource>> = vec![applications.clone()];
        let broad: Vec<Arc<dyn SearchSource>> = vec![
            devices.clone(),
            files.clone(),
            bookmarks.clone(),
            power_actions.clone(),
        ];

        let search = SearchEngine::new()
            .tier(0, always)
            .tier(APPLICATION_MIN_TERM, apps)
            .tier(BROAD_MIN_TERM, broad);

        tracing::info!(
            registries = catalogs.len(),
            notifications = config.notifications,
            ignored_windows = config.ignored_window_app_ids.len(),
            "Hub started"
        );

        Self {
            notifications,
            windows,
            tabs,
            applications,
            devices,
            files,
            bookmarks,
            power_actions,
            commands,
            catalogs,
            aggregator,
            search,
            ignored_windows: config.ignored_window_app_ids.iter().cloned().collect(),
            notifications_enabled: config.notifications,
            started_at: Instant::now(),
        }
    }

    /// The combined change stream of every served registry
    pub fn events(&self) -> &EventBus<Event> {
        self.aggregator.output()
    }

    /// Bus on which capabilities publish their commands
    pub fn commands(&self) -> &CommandBus {
        &self.commands
    }

    /// Whether the notification registry is served
    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled
    }

    /// Whether windows of `app_id` are configured to stay out of search
    pub fn window_ignored(&self, app_id: &str) -> bool {
        self.ignored_windows.contains(app_id)
    }

    /// Store a window, applying the configured ignore list
    pub fn put_window(&self, window: Window) {
        let ignored = self.window_ignored(&window.app_id);
        self.windows.put(window.id, window.with_ignored(ignored));
    }

    /// Ranked search across the registries
    pub fn search(&self, term: &str) -> Vec<Ranked> {
        self.search.search(term)
    }

    /// Fixed endpoints and every entity path starting with `prefix`
    pub fn complete(&self, prefix: &str) -> Vec<String> {
        let mut paths: Vec<String> = ENDPOINTS
            .iter()
            .filter(|endpoint| endpoint.starts_with(prefix))
            .map(|endpoint| endpoint.to_string())
            .collect();

        for catalog in &self.catalogs {
            paths.extend(
                catalog
                    .get_paths()
                    .into_iter()
                    .filter(|path| path.starts_with(prefix)),
            );
        }

        paths
    }

    /// Display record of the searchable entity at `path`
    pub fn details(&self, path: &str) -> Option<Base> {
        let catalog = self
            .catalogs
            .iter()
            .find(|catalog| path.starts_with(&catalog.prefix()))?;

        catalog
            .get_for_search()
            .into_iter()
            .find(|base| base.meta.path == path)
    }

    /// Registries served by this hub, in construction order
    pub fn catalogs(&self) -> &[Arc<dyn Catalog>] {
        &self.catalogs
    }

    /// Current statistics
    pub fn stats(&self) -> HubStats {
        HubStats::new(
            self.started_at.elapsed(),
            self.catalogs.iter().map(|catalog| catalog.stats()).collect(),
            self.events().stats(),
        )
    }

    /// Stop the aggregator relays
    pub fn shutdown(&self) {
        self.aggregator.shutdown();
        tracing::info!("Hub stopped");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;
    use crate::desktop::{DeviceState, DeviceType, WindowState};

    fn hub() -> Hub {
        Hub::new(&ServerConfig::default().ignore_window("panel"))
    }

    #[tokio::test]
    async fn test_power_actions_seeded() {
        let hub = hub();
        let mut titles: Vec<_> = hub
            .power_actions
            .get_all()
            .into_iter()
            .map(|a| a.base.title)
            .collect();
        titles.sort();

        assert_eq!(titles, vec!["Power off", "Reboot", "Suspend"]);
        assert_eq!(
            hub.power_actions.get(&"reboot".to_string()).unwrap().base.meta.path,
            "/start/reboot"
        );
    }

    #[tokio::test]
    async fn test_search_gating() {
        let hub = hub();
        let commands = hub.commands().clone();
        hub.put_window(Window::new(1, "Reboot notes", "", "editor", WindowState::default(), &commands));

        // "Reboot" power action is only searched from three characters on.
        let short: Vec<_> = hub.search("r").into_iter().map(|r| r.base.title).collect();
        assert_eq!(short, vec!["Reboot notes"]);

        let long: Vec<_> = hub.search("reb").into_iter().map(|r| r.base.title).collect();
        assert_eq!(long, vec!["Reboot", "Reboot notes"]);
    }

    #[tokio::test]
    async fn test_ignored_window_not_searchable() {
        let hub = hub();
        let commands = hub.commands().clone();
        hub.put_window(Window::new(1, "Panel", "", "panel", WindowState::default(), &commands));
        hub.put_window(Window::new(2, "Pane", "", "foot", WindowState::default(), &commands));

        let hits: Vec<_> = hub.search("pan").into_iter().map(|r| r.base.title).collect();
        assert_eq!(hits, vec!["Pane"]);
        assert_eq!(hub.windows.len(), 2);
    }

    #[tokio::test]
    async fn test_complete() {
        let hub = hub();
        hub.devices.put(
            "bat0".to_string(),
            Device::new("bat0", DeviceType::Battery, "", DeviceState::Charging, 50.0),
        );

        assert_eq!(hub.complete("/dev"), vec!["/device/bat0".to_string()]);
        let mut s = hub.complete("/s");
        s.sort();
        assert_eq!(
            s,
            vec![
                "/search?term=",
                "/start/reboot",
                "/start/shutdown",
                "/start/suspend",
                "/stats",
            ]
        );
        assert_eq!(hub.complete("").len(), ENDPOINTS.len() + 4);
    }

    #[tokio::test]
    async fn test_details() {
        let hub = hub();
        let base = hub.details("/start/suspend").unwrap();
        assert_eq!(base.title, "Suspend");

        assert!(hub.details("/start/hibernate").is_none());
        assert!(hub.details("/nowhere/x").is_none());
    }

    #[tokio::test]
    async fn test_aggregate_receives_registry_events() {
        let hub = hub();
        let mut sub = hub.events().subscribe();

        let mut files = HashMap::new();
        files.insert(
            "tmp/a.txt".to_string(),
            File::new("/tmp/a.txt", "text/plain", hub.commands()),
        );
        hub.files.replace_all(files);

        let event = tokio::time::timeout(Duration::from_secs(5), sub.next())
            .await
            .unwrap();
        assert_eq!(event, Event::bulk("/file/"));
    }

    #[tokio::test]
    async fn test_notifications_disabled() {
        let hub = Hub::new(&ServerConfig::default().disable_notifications());
        assert!(!hub.notifications_enabled());
        assert!(hub
            .catalogs()
            .iter()
            .all(|catalog| catalog.prefix() != NOTIFICATION_PREFIX));

        hub.notifications
            .put(1, Notification::new(1, "app", "Hello", "", hub.commands()));
        assert!(hub.search("hello").is_empty());
    }

    #[tokio::test]
    async fn test_stats() {
        let hub = hub();
        let stats = hub.stats();

        assert_eq!(stats.registries.len(), 8);
        assert_eq!(stats.registry("/start/").unwrap().entries, 3);
        assert_eq!(stats.total_entries(), 3);
        assert_eq!(stats.aggregate.subscribers, 0);
    }
}
