pub mod anchor;
pub mod app;
pub mod controller;
pub mod dispatcher;
pub mod geometry;
pub mod keybind;
pub mod platform;
pub mod settings;
pub mod store;

#[cfg(test)]
mod test_support;

// 导出主要的公共类型
pub use anchor::{Anchor, AnchorSources};
pub use app::{App, UserEvent};
pub use controller::{ControllerConfig, ControllerError, LifecycleState, WindowController, WindowControllerBuilder};
pub use dispatcher::{DispatchError, Dispatcher};
pub use geometry::{MonitorRect, Point, Rect, WindowSize};
pub use keybind::{CloseKeybindSource, KeybindHub};
pub use platform::{DisplayLayout, EventHub, PlatformWindow, WindowEvent};
pub use settings::OverlaySettings;
pub use store::{JsonFileStore, MemoryStore, PersistedWindowRecord, SizeStore, StoreError};

// 重新导出 winit 相关类型
pub use winit::event_loop::EventLoop;
