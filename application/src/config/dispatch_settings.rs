//! Dispatch settings: static inputs of the dispatch use case.

use opsroute_domain::{BackendProfile, HostPolicy};

/// Settings consumed by
/// [`DispatchCommandUseCase`](crate::use_cases::dispatch_command::DispatchCommandUseCase).
#[derive(Debug, Clone, Default)]
pub struct DispatchSettings {
    /// How each backend builds its argument vector.
    pub profile: BackendProfile,
    /// Hosts known to the inventory source.
    pub hosts: HostPolicy,
}

impl DispatchSettings {
    pub fn new(profile: BackendProfile, hosts: HostPolicy) -> Self {
        Self { profile, hosts }
    }

    pub fn with_hosts(mut self, hosts: HostPolicy) -> Self {
        self.hosts = hosts;
        self
    }
}
