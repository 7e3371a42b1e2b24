// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Es gibt keine Channels: der Poller besitzt Strip und Frame allein,
// WiFi und DHCP teilen sich nur den Netzwerk-Stack.

pub mod dhcp;
pub mod poller;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use dhcp::dhcp_server_task;
pub use poller::board_poller_task;
pub use wifi::{access_point_task, net_task};
