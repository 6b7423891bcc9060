//! Click → action dispatch.
//!
//! The dispatcher owns the action table and the navigation host. It also
//! keeps track of the resource loaded into the overlay so that closing the
//! overlay always releases it.

use std::collections::HashMap;
use url::Url;
use vt_core::{ActionTarget, EntityId, InteractionError, InteractionRegistry, InteractionTable};

/// The page-side collaborator that carries out actions.
pub trait NavigationHost {
    /// Replace the current page address.
    fn navigate(&mut self, address: &str) -> Result<(), InteractionError>;

    /// Open an address in a new browsing context.
    fn open_in_new_context(&mut self, address: &str) -> Result<(), InteractionError>;

    /// Load a resource into the overlay surface and show it.
    fn open_overlay(&mut self, resource_path: &str) -> Result<(), InteractionError>;

    /// Unload `resource_path` from the overlay and hide it.
    fn clear_overlay(&mut self, resource_path: &str) -> Result<(), InteractionError>;

    /// Hand a `mailto:` URI to the mail client.
    fn compose_mail(&mut self, mailto: &str) -> Result<(), InteractionError>;
}

pub struct ActionDispatcher<H: NavigationHost> {
    host: H,
    actions: HashMap<EntityId, ActionTarget>,
    /// Resource currently loaded in the overlay.
    open_modal: Option<String>,
}

impl<H: NavigationHost> ActionDispatcher<H> {
    pub fn new(host: H, table: &InteractionTable) -> Self {
        let actions = table
            .entries
            .iter()
            .filter_map(|(id, entry)| entry.action.clone().map(|a| (*id, a)))
            .collect();
        Self {
            host,
            actions,
            open_modal: None,
        }
    }

    /// Action for a resolved id, falling back to its group root's action.
    pub fn action_for(
        &self,
        id: EntityId,
        registry: &InteractionRegistry,
    ) -> Option<&ActionTarget> {
        self.actions.get(&id).or_else(|| {
            registry
                .lookup_group(id)
                .and_then(|root| self.actions.get(&root))
        })
    }

    /// Look up and execute the action for `id`.
    pub fn dispatch(
        &mut self,
        id: EntityId,
        registry: &InteractionRegistry,
    ) -> Result<ActionTarget, InteractionError> {
        let action = self
            .action_for(id, registry)
            .cloned()
            .ok_or(InteractionError::UnresolvedAction { id })?;
        log::info!("click on {id} → {action:?}");
        self.execute(&action)?;
        Ok(action)
    }

    pub fn execute(&mut self, action: &ActionTarget) -> Result<(), InteractionError> {
        match action {
            ActionTarget::Navigate { address } => {
                if address.trim().is_empty() {
                    return Err(InteractionError::InvalidAddress {
                        address: address.clone(),
                        reason: "empty address".into(),
                    });
                }
                self.host.navigate(address)
            }
            ActionTarget::OpenModal { resource_path } => {
                if let Some(previous) = self.open_modal.take() {
                    self.host.clear_overlay(&previous)?;
                }
                self.host.open_overlay(resource_path)?;
                self.open_modal = Some(resource_path.clone());
                Ok(())
            }
            ActionTarget::ExternalLink {
                address,
                new_context,
            } => {
                let url = Url::parse(address).map_err(|e| InteractionError::InvalidAddress {
                    address: address.clone(),
                    reason: e.to_string(),
                })?;
                if *new_context {
                    self.host.open_in_new_context(url.as_str())
                } else {
                    self.host.navigate(url.as_str())
                }
            }
            ActionTarget::Mail { address } => {
                let mailto = mailto_uri(address)?;
                self.host.compose_mail(mailto.as_str())
            }
        }
    }

    /// Close the overlay, releasing whatever it loaded. Returns `true` if
    /// an overlay was open.
    pub fn close_modal(&mut self) -> Result<bool, InteractionError> {
        match self.open_modal.take() {
            Some(resource) => {
                self.host.clear_overlay(&resource)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn open_modal(&self) -> Option<&str> {
        self.open_modal.as_deref()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

/// Build a `mailto:` URI for a single address.
pub fn mailto_uri(address: &str) -> Result<Url, InteractionError> {
    let address = address.trim();
    let invalid = |reason: &str| InteractionError::InvalidAddress {
        address: address.to_string(),
        reason: reason.to_string(),
    };
    match address.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
        _ => return Err(invalid("expected local@domain")),
    }
    if address.contains(['?', '&', '#', ',']) {
        return Err(invalid("address contains URI delimiters"));
    }
    Url::parse(&format!("mailto:{address}")).map_err(|e| invalid(&e.to_string()))
}
