pub mod identity;
pub mod navigator;
pub mod os;

pub use identity::{DisabledIdentity, IdentityProvider, Session};
pub use navigator::{Navigator, ProbeGuard, ProbeHandle, Prober, SystemOpener};
pub use os::{EnvironmentSignals, PlatformTag};
