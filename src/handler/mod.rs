pub mod expansion;
pub mod observer;
pub mod session;

pub use expansion::ExpansionController;
pub use observer::GraphObserver;
pub use observer::NoopObserver;
pub use observer::TracingObserver;
pub use session::SessionRoot;
