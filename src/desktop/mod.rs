//! Desktop session entities and the hub that serves them
//!
//! Each entity kind lives in its own registry under a fixed prefix:
//!
//! | Kind          | Prefix            | Key                    |
//! |---------------|-------------------|------------------------|
//! | Notification  | `/notification/`  | notification id        |
//! | Window        | `/window/`        | compositor window id   |
//! | Tab           | `/tab/`           | browser tab id         |
//! | Application   | `/application/`   | desktop file id        |
//! | Device        | `/device/`        | power device id        |
//! | File          | `/file/`          | absolute path          |
//! | Bookmark      | `/bookmark/`      | browser bookmark id    |
//! | PowerAction   | `/start/`         | `shutdown`, `reboot`, `suspend` |
//!
//! Entities never act on the desktop themselves. Posting to or deleting an
//! entity publishes a [`Command`](crate::entity::Command) on the hub's
//! command bus for the owning bridge to carry out.

pub mod application;
pub mod browser;
pub mod file;
pub mod hub;
pub mod notification;
pub mod power;
pub mod window;

pub use application::Application;
pub use browser::{Bookmark, Tab};
pub use file::File;
pub use hub::Hub;
pub use notification::{Notification, Urgency};
pub use power::{Device, DeviceState, DeviceType, PowerAction};
pub use window::{Window, WindowState};
