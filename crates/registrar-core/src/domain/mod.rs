//! Domain facade
//!
//! The single entry point for web, admin, and script collaborators. A
//! `Domain` owns its attribute cache and its lifecycle state and holds the
//! registry client behind an `Arc`; every mutating operation takes
//! `&mut self`, which encodes the at-most-one-in-flight-reconciliation
//! contract (the persistence layer serializes writes per domain record,
//! this engine does not carry its own mutex).
//!
//! ## Operation flow
//!
//! 1. Check the lifecycle table; illegal operations never reach the wire.
//! 2. Validate input; configuration errors never reach the wire either.
//! 3. Read current registry truth through the cache (read-through).
//! 4. Issue the minimal command sequence, one awaited round trip at a time.
//! 5. On success, invalidate the cache so the next read re-fetches truth.
//!
//! A registry failure mid-sequence leaves the previous cache valid and the
//! state unchanged; the partially applied remote steps are converged by
//! the next reconciliation run, which always rebuilds its view from a
//! fresh fetch.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, info};

use crate::cache::DomainCache;
use crate::config::Config;
use crate::contacts::{self, PublicContact};
use crate::dnssec::{self, DnssecData};
use crate::epp::commands::{Command, UpdateDomain};
use crate::epp::types::{ContactRole, DomainContact, DomainStatus};
use crate::epp::Response;
use crate::error::{Error, ErrorCode, Result};
use crate::hosts::{self, DesiredNameserver};
use crate::lifecycle::{Operation, State};
use crate::traits::RegistryClient;

/// The registrar's record of truth for one domain name.
pub struct Domain {
    name: String,
    state: State,
    /// Mirror of the registry expiration date, kept for reporting.
    expiration_date: Option<NaiveDate>,
    cache: DomainCache,
    client: Arc<dyn RegistryClient>,
    config: Config,
}

impl std::fmt::Debug for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Domain")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("expiration_date", &self.expiration_date)
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Domain {
    /// Create a facade for a domain whose registry facts are unknown.
    pub fn new(name: impl Into<String>, client: Arc<dyn RegistryClient>) -> Result<Self> {
        Self::with_state(name, State::Unknown, client)
    }

    pub fn with_state(
        name: impl Into<String>,
        state: State,
        client: Arc<dyn RegistryClient>,
    ) -> Result<Self> {
        Self::with_config(name, state, client, Config::default())
    }

    pub fn with_config(
        name: impl Into<String>,
        state: State,
        client: Arc<dyn RegistryClient>,
        config: Config,
    ) -> Result<Self> {
        let name = name.into().trim().to_ascii_lowercase();
        if !hosts::is_valid_domain(&name) {
            return Err(Error::InvalidDomainName(name));
        }
        config.validate()?;
        Ok(Self {
            name,
            state,
            expiration_date: None,
            cache: DomainCache::default(),
            client,
            config,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// True only when the domain is fully provisioned and resolving.
    /// Pure: no remote calls.
    pub fn is_active(&self) -> bool {
        self.state == State::Ready
    }

    /// Query the registry's existence check for a name. No instance
    /// required; malformed names are rejected before the round trip.
    pub async fn available(name: &str, client: &dyn RegistryClient) -> Result<bool> {
        let name = name.trim().to_ascii_lowercase();
        if !hosts::is_valid_domain(&name) {
            return Err(Error::InvalidDomainName(name));
        }
        let response = client.send(Command::CheckDomain { names: vec![name] }).await?;
        response.into_domain_check()
    }

    // ------------------------------------------------------------------
    // Lazy getters (read-through cache)
    // ------------------------------------------------------------------

    pub async fn creation_date(&mut self) -> Result<Option<DateTime<Utc>>> {
        self.ensure_domain_info().await?;
        Ok(self.cache.created)
    }

    pub async fn expiration_date(&mut self) -> Result<Option<NaiveDate>> {
        self.ensure_domain_info().await?;
        self.expiration_date = self.cache.expiration;
        Ok(self.cache.expiration)
    }

    /// Registry status flags. Advisory: a malformed status list resolves
    /// to empty rather than failing the read.
    pub async fn statuses(&mut self) -> Result<Vec<DomainStatus>> {
        self.ensure_domain_info().await?;
        Ok(self.cache.statuses.clone().unwrap_or_default())
    }

    pub async fn auth_info(&mut self) -> Result<Option<String>> {
        self.ensure_domain_info().await?;
        Ok(self.cache.auth_pw.clone())
    }

    /// Current host map, name → IP list, as the registry reports it.
    pub async fn nameservers(&mut self) -> Result<BTreeMap<String, Vec<IpAddr>>> {
        self.ensure_hosts().await
    }

    pub async fn dnssec_data(&mut self) -> Result<DnssecData> {
        self.ensure_domain_info().await?;
        Ok(self.cache.dnssec.clone().unwrap_or_default())
    }

    /// The contact bound to `role`, fetched from the registry when the
    /// role is linked, `None` when it is not.
    pub async fn contact(&mut self, role: ContactRole) -> Result<Option<PublicContact>> {
        self.ensure_domain_info().await?;
        let Some(id) = self.contact_id(role) else {
            return Ok(None);
        };
        let info = self
            .send(Command::InfoContact { id: id.clone() })
            .await?
            .into_contact_info()?;
        let mapped = contacts::map_contact_info(
            &info,
            info.id.as_deref().or(Some(id.as_str())),
            Some(role),
            self.config.max_registry_id_len,
        )?;
        Ok(Some(mapped))
    }

    // ------------------------------------------------------------------
    // Nameserver reconciliation
    // ------------------------------------------------------------------

    /// Reconcile the registry toward the desired nameserver set.
    ///
    /// Validation and the lifecycle check run before any remote call. An
    /// idempotent desired set (same hosts, same IPs, any order) issues
    /// only the reads needed to verify equality.
    pub async fn set_nameservers(&mut self, desired: &[DesiredNameserver]) -> Result<()> {
        self.guard(Operation::SetNameservers)?;
        let validated =
            hosts::validate_desired(&self.name, desired, self.config.max_nameservers)?;

        // always diff against registry truth; a previous run may have
        // failed mid-sequence with the cache still holding its old view
        self.fetch_domain_info().await?;
        let current = self.ensure_hosts().await?;
        let changes = hosts::diff_hosts(&current, &validated);

        if changes.is_empty() {
            debug!("nameservers for {} already match, nothing to send", self.name);
        } else {
            // all creates happen before the domain-level link update
            for ns in &changes.to_create {
                let create = Command::CreateHost {
                    name: ns.name.clone(),
                    addrs: ns.addrs.clone(),
                };
                match self.send(create).await {
                    Ok(_) => {}
                    // left over from an interrupted run; linking it is
                    // all that remains
                    Err(Error::Registry(err)) if err.code == ErrorCode::ObjectExists => {
                        debug!("host {} already exists, linking it as is", ns.name);
                    }
                    Err(err) => return Err(err),
                }
            }
            for diff in &changes.to_update {
                self.send(Command::UpdateHost {
                    name: diff.name.clone(),
                    add: diff.add.clone(),
                    rem: diff.rem.clone(),
                })
                .await?;
            }

            // one batched link/unlink update for all hosts
            let mut update = UpdateDomain::new(&self.name);
            update.add_hosts = changes.to_create.iter().map(|ns| ns.name.clone()).collect();
            update.rem_hosts = changes.to_delete.clone();
            if !update.is_noop() {
                self.send(Command::UpdateDomain(update)).await?;
            }

            // hosts may only be deleted once unlinked
            for name in &changes.to_delete {
                self.send(Command::DeleteHost { name: name.clone() }).await?;
            }

            info!(
                "reconciled nameservers for {}: {} created, {} updated, {} deleted",
                self.name,
                changes.to_create.len(),
                changes.to_update.len(),
                changes.to_delete.len()
            );
            self.cache.invalidate();
        }

        self.state = self.state.after_nameserver_count(validated.len());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Contact reconciliation
    // ------------------------------------------------------------------

    /// Bind a contact to its role, creating or updating the registry-side
    /// record as needed. Re-submitting identical data issues no write.
    pub async fn set_contact(&mut self, contact: PublicContact) -> Result<()> {
        self.guard(Operation::SetContact)?;

        let mut contact = contact;
        let default = PublicContact::default_for(contact.role, &self.config);

        // a cleared security/technical email falls back to the
        // registrar-operated default contact
        if contact.email.trim().is_empty()
            && matches!(contact.role, ContactRole::Security | ContactRole::Technical)
        {
            debug!("empty {} email for {}, using default contact", contact.role.as_str(), self.name);
            contact = default.clone();
        }

        let disclose = contacts::disclose_email(&contact, &default.email);

        self.ensure_domain_info().await?;
        let existing = self.contact_id(contact.role);

        let wrote = match existing {
            Some(ref id) if *id == contact.registry_id => {
                self.update_contact_in_place(&contact, disclose).await?
            }
            other => {
                if contact.registry_id.is_empty() {
                    contact.registry_id = contacts::generate_registry_id();
                }
                self.create_and_link_contact(&contact, disclose, other.as_deref())
                    .await?;
                true
            }
        };

        if wrote {
            self.cache.invalidate();
        }
        Ok(())
    }

    /// The role already points at this registry id: compare against the
    /// registry's current data and update only when something changed.
    async fn update_contact_in_place(
        &mut self,
        contact: &PublicContact,
        disclose: bool,
    ) -> Result<bool> {
        let info = self
            .send(Command::InfoContact {
                id: contact.registry_id.clone(),
            })
            .await?
            .into_contact_info()?;
        let remote = contacts::map_contact_info(
            &info,
            info.id.as_deref().or(Some(contact.registry_id.as_str())),
            Some(contact.role),
            self.config.max_registry_id_len,
        )?;

        if remote.same_data(contact) {
            debug!(
                "{} contact for {} unchanged, skipping update",
                contact.role.as_str(),
                self.name
            );
            return Ok(false);
        }

        self.send(contact.to_update_command(disclose)).await?;
        info!("updated {} contact for {}", contact.role.as_str(), self.name);
        Ok(true)
    }

    /// Create the contact in the registry and swap the domain's role
    /// linkage over to it in a single domain update.
    async fn create_and_link_contact(
        &mut self,
        contact: &PublicContact,
        disclose: bool,
        previous_id: Option<&str>,
    ) -> Result<()> {
        self.send(contact.to_create_command(disclose)).await?;

        let mut update = UpdateDomain::new(&self.name);
        if contact.role == ContactRole::Registrant {
            update.registrant = Some(contact.registry_id.clone());
        } else {
            update
                .add_contacts
                .push(DomainContact::new(&contact.registry_id, contact.role));
            if let Some(old) = previous_id {
                update.rem_contacts.push(DomainContact::new(old, contact.role));
            }
        }
        self.send(Command::UpdateDomain(update)).await?;
        info!(
            "created and linked {} contact {} for {}",
            contact.role.as_str(),
            contact.registry_id,
            self.name
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // DNSSEC reconciliation
    // ------------------------------------------------------------------

    /// Replace the domain's signing data. `None` (or an empty set) removes
    /// whatever the registry currently holds. The baseline is re-fetched
    /// on every call; the registry is the sole source of truth.
    pub async fn set_dnssec(&mut self, desired: Option<DnssecData>) -> Result<()> {
        self.guard(Operation::SetDnssec)?;

        self.fetch_domain_info().await?;
        let baseline = self.cache.dnssec.clone().unwrap_or_default();

        match dnssec::diff(&baseline, desired.as_ref()) {
            None => {
                debug!("DNSSEC data for {} already matches, nothing to send", self.name);
                Ok(())
            }
            Some(payload) => {
                let adding = payload.add.is_some();
                let mut update = UpdateDomain::new(&self.name);
                update.dnssec = Some(payload);
                self.send(Command::UpdateDomain(update)).await?;
                info!(
                    "{} DNSSEC data for {}",
                    if adding { "replaced" } else { "removed" },
                    self.name
                );
                self.cache.invalidate();
                Ok(())
            }
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle operations
    // ------------------------------------------------------------------

    /// Add the client-hold status, taking the domain off the internet.
    /// A no-op (no remote call, no error) when already on hold.
    pub async fn place_hold(&mut self) -> Result<()> {
        self.guard(Operation::PlaceHold)?;
        if self.state == State::OnHold {
            debug!("{} is already on hold", self.name);
            return Ok(());
        }

        let mut update = UpdateDomain::new(&self.name);
        update.add_statuses.push(DomainStatus::ClientHold);
        self.send(Command::UpdateDomain(update)).await?;
        info!("placed hold on {}", self.name);
        self.cache.invalidate();
        self.state = State::OnHold;
        Ok(())
    }

    /// Remove the client-hold status. A no-op when not on hold.
    pub async fn revert_hold(&mut self) -> Result<()> {
        self.guard(Operation::RevertHold)?;
        if self.state == State::Ready {
            debug!("{} is not on hold", self.name);
            return Ok(());
        }

        let mut update = UpdateDomain::new(&self.name);
        update.rem_statuses.push(DomainStatus::ClientHold);
        self.send(Command::UpdateDomain(update)).await?;
        info!("reverted hold on {}", self.name);
        self.cache.invalidate();
        self.state = State::Ready;
        Ok(())
    }

    /// Delete the domain in the registry. Legal only from on-hold,
    /// DNS-needed, or unknown; a still-associated rejection from the
    /// registry (code 2305) propagates and leaves the state unchanged.
    pub async fn delete(&mut self) -> Result<()> {
        self.guard(Operation::Delete)?;

        self.send(Command::DeleteDomain {
            name: self.name.clone(),
        })
        .await?;
        info!("deleted {} in the registry", self.name);
        self.cache.invalidate();
        self.state = State::Deleted;
        Ok(())
    }

    /// Extend the registration by `years` from the current expiration
    /// date. The new date is written through to the cache and the local
    /// mirror.
    pub async fn renew(&mut self, years: u32) -> Result<NaiveDate> {
        self.guard(Operation::Renew)?;
        self.ensure_domain_info().await?;
        let current = self
            .cache
            .expiration
            .ok_or(Error::UnexpectedResponse { expected: "domain expiration" })?;

        let expiration = self
            .send(Command::RenewDomain {
                name: self.name.clone(),
                current_expiration: current,
                years,
            })
            .await?
            .into_renewal()?;

        info!("renewed {} until {}", self.name, expiration);
        self.cache.expiration = Some(expiration);
        self.expiration_date = Some(expiration);
        Ok(expiration)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn guard(&self, op: Operation) -> Result<()> {
        if self.state.is_deleted() {
            return Err(Error::DomainNotMutable(self.name.clone()));
        }
        if !self.state.allows(op) {
            return Err(Error::TransitionNotAllowed {
                action: op.describe(),
                state: self.state,
            });
        }
        Ok(())
    }

    async fn send(&self, command: Command) -> Result<Response> {
        debug!("sending {:?} for {}", command, self.name);
        Ok(self.client.send(command).await?)
    }

    fn contact_id(&self, role: ContactRole) -> Option<String> {
        self.cache
            .contact_ids
            .as_ref()
            .and_then(|ids| ids.get(&role))
            .cloned()
    }

    async fn ensure_domain_info(&mut self) -> Result<()> {
        if self.cache.has_domain_info() {
            return Ok(());
        }
        self.fetch_domain_info().await
    }

    /// One domain-info round trip, absorbed into the cache. A domain the
    /// registry has never seen is registered on the fly with the default
    /// contact set, then fetched again. Auto-registration only happens
    /// from `Unknown`: once the domain has a known lifecycle (deleted in
    /// particular), a does-not-exist rejection propagates instead.
    async fn fetch_domain_info(&mut self) -> Result<()> {
        let command = Command::InfoDomain {
            name: self.name.clone(),
        };
        let response = match self.client.send(command.clone()).await {
            Ok(response) => response,
            Err(err)
                if err.code == ErrorCode::ObjectDoesNotExist
                    && self.state == State::Unknown =>
            {
                self.register_in_registry().await?;
                self.client.send(command).await?
            }
            Err(err) => return Err(err.into()),
        };
        let info = response.into_domain_info()?;
        self.cache.absorb_domain_info(&info);
        self.expiration_date = self.cache.expiration;
        // registry-reported hold flags override a local ready view
        if self.state == State::Ready
            && self.cache.statuses.iter().flatten().any(|s| s.is_hold())
        {
            self.state = State::OnHold;
        }
        Ok(())
    }

    /// First contact with the registry for this name: create the domain
    /// with a default registrant, then create and link default
    /// administrative, security, and technical contacts. Defaults never
    /// disclose their email.
    async fn register_in_registry(&mut self) -> Result<()> {
        info!("{} not in registry, creating it with default contacts", self.name);

        let mut registrant = PublicContact::default_for(ContactRole::Registrant, &self.config);
        registrant.registry_id = contacts::generate_registry_id();
        self.send(registrant.to_create_command(false)).await?;

        self.send(Command::CreateDomain {
            name: self.name.clone(),
            registrant: registrant.registry_id.clone(),
            auth_pw: self.config.contact_auth_pw.clone(),
        })
        .await?;

        for role in ContactRole::LINKED {
            let mut contact = PublicContact::default_for(role, &self.config);
            contact.registry_id = contacts::generate_registry_id();
            self.send(contact.to_create_command(false)).await?;

            let mut update = UpdateDomain::new(&self.name);
            update
                .add_contacts
                .push(DomainContact::new(&contact.registry_id, role));
            self.send(Command::UpdateDomain(update)).await?;
        }

        if self.state == State::Unknown {
            self.state = State::DnsNeeded;
        }
        Ok(())
    }

    /// Current host map: the domain-info call yields the names, then one
    /// host-info call per name yields the addresses.
    async fn ensure_hosts(&mut self) -> Result<BTreeMap<String, Vec<IpAddr>>> {
        self.ensure_domain_info().await?;
        if let Some(hosts) = &self.cache.hosts {
            return Ok(hosts.clone());
        }

        let names = self.cache.host_names.clone().unwrap_or_default();
        let mut hosts = BTreeMap::new();
        for name in names {
            let info = self
                .send(Command::InfoHost { name: name.clone() })
                .await?
                .into_host_info()?;
            hosts.insert(name, info.addrs);
        }
        self.cache.hosts = Some(hosts.clone());
        Ok(hosts)
    }
}
