//! Application Context
//!
//! Shared services provided via Leptos Context API.

use std::sync::Arc;

use leptos::prelude::*;

use crate::actions::ActionRegistry;
use crate::config::FarmConfig;
use crate::error::{FarmError, FarmResult};
use crate::gateway::{PostgrestClient, SharedGateway};

/// App-wide services provided via context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<FarmConfig>,
    /// `None` when the page carries no usable key
    gateway: Option<SharedGateway>,
    /// Bumped to make views reload from the backend - read
    pub reload_trigger: ReadSignal<u32>,
    /// Bumped to make views reload from the backend - write
    set_reload_trigger: WriteSignal<u32>,
}

impl AppContext {
    pub fn new(config: FarmConfig, admin: bool) -> Self {
        let gateway = PostgrestClient::from_config(&config, admin)
            .map(|client| Arc::new(client) as SharedGateway);
        if gateway.is_none() {
            tracing::warn!("[APP] no Supabase key configured, remote calls disabled");
        }
        let (reload_trigger, set_reload_trigger) = signal(0u32);
        Self {
            config: Arc::new(config),
            gateway,
            reload_trigger,
            set_reload_trigger,
        }
    }

    pub fn gateway(&self) -> FarmResult<SharedGateway> {
        self.gateway.clone().ok_or(FarmError::GatewayUnavailable)
    }

    pub fn actions(&self) -> FarmResult<ActionRegistry> {
        self.gateway().map(ActionRegistry::new)
    }

    /// Trigger a reload of every mounted view
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }
}

pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
