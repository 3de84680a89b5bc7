pub mod app;
pub mod error;
pub mod model;
pub mod platform;
pub mod snippet;

pub use app::{
    find_declared, App, AppComponent, AppConfigParam, AppConfigSecret, Declared, ParamType,
    UserConfigEntry,
};
pub use error::{HubError, Result};
pub use model::{DeployConfig, Model};
pub use platform::Platform;
pub use snippet::ContainerEngine;

pub mod telemetry;
