pub mod r#trait;
pub use r#trait::{FrameHandle, FrameHost};

pub mod simulated_host;
pub use self::simulated_host::SimulatedHost;

pub mod events;
pub use self::events::{EventBus, EventTarget, HostEvent, Subscription};

pub mod page;
pub use self::page::{Container, Page};
