use chrono::Utc;

use super::{BillingEngine, case_aware_name_cmp, next_id};
use crate::error::{BillingError, Entity};
use crate::model::{Client, CreateClientParams, Matter, UpdateClientParams};
use crate::store::Collection;

/// Sort orders accepted by [`BillingEngine::get_clients_sorted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientSort {
    Name,
    Created,
}

impl BillingEngine {
    /// Create a client. The client number is the count of clients in
    /// the store at creation time, zero-padded to six digits; it is
    /// count-based rather than max-based, so deleting a client and
    /// creating another can repeat a number.
    pub async fn create_client(&self, input: &CreateClientParams) -> Result<Client, BillingError> {
        if input.name.trim().is_empty() {
            return Err(BillingError::InvalidField {
                field: "name",
                message: "client name is required".to_string(),
            });
        }

        let _guard = self.locks.get(Collection::Clients).lock().await;
        let mut clients: Vec<Client> = self.read_collection(Collection::Clients).await?;

        let client = Client {
            id: next_id(&clients),
            client_number: format!("{:06}", clients.len()),
            name: input.name.clone(),
            description: input.description.clone().unwrap_or_default(),
            address: input.address.clone().unwrap_or_default(),
            contact_name: input.contact_name.clone().unwrap_or_default(),
            contact_phone: input.contact_phone.clone().unwrap_or_default(),
            contact_email: input.contact_email.clone().unwrap_or_default(),
            created_at: Utc::now(),
        };

        clients.push(client.clone());
        self.write_collection(Collection::Clients, &clients).await?;
        tracing::debug!(
            client_id = client.id,
            client_number = %client.client_number,
            "created client"
        );
        Ok(client)
    }

    /// All clients, newest first.
    pub async fn get_clients(&self) -> Result<Vec<Client>, BillingError> {
        let mut clients: Vec<Client> = self.read_collection(Collection::Clients).await?;
        clients.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(clients)
    }

    pub async fn get_client(&self, id: i64) -> Result<Option<Client>, BillingError> {
        let clients: Vec<Client> = self.read_collection(Collection::Clients).await?;
        Ok(clients.into_iter().find(|c| c.id == id))
    }

    /// Merge partial fields into an existing client. The id, client
    /// number, and creation timestamp are immutable.
    pub async fn update_client(
        &self,
        id: i64,
        input: &UpdateClientParams,
    ) -> Result<Client, BillingError> {
        let _guard = self.locks.get(Collection::Clients).lock().await;
        let mut clients: Vec<Client> = self.read_collection(Collection::Clients).await?;

        let client = clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(BillingError::NotFound {
                entity: Entity::Client,
                id,
            })?;

        if let Some(name) = &input.name {
            client.name = name.clone();
        }
        if let Some(description) = &input.description {
            client.description = description.clone();
        }
        if let Some(address) = &input.address {
            client.address = address.clone();
        }
        if let Some(contact_name) = &input.contact_name {
            client.contact_name = contact_name.clone();
        }
        if let Some(contact_phone) = &input.contact_phone {
            client.contact_phone = contact_phone.clone();
        }
        if let Some(contact_email) = &input.contact_email {
            client.contact_email = contact_email.clone();
        }

        let updated = client.clone();
        self.write_collection(Collection::Clients, &clients).await?;
        tracing::debug!(client_id = id, "updated client");
        Ok(updated)
    }

    /// Delete a client and cascade to its matters. Matters are
    /// persisted first so a reader never sees a client gone while its
    /// matters remain. Time entries and matter rates referencing the
    /// removed matters are left in place.
    pub async fn delete_client(&self, id: i64) -> Result<(), BillingError> {
        let _clients_guard = self.locks.get(Collection::Clients).lock().await;
        let mut clients: Vec<Client> = self.read_collection(Collection::Clients).await?;

        let position = clients
            .iter()
            .position(|c| c.id == id)
            .ok_or(BillingError::NotFound {
                entity: Entity::Client,
                id,
            })?;

        let removed_matters;
        {
            let _matters_guard = self.locks.get(Collection::Matters).lock().await;
            let matters: Vec<Matter> = self.read_collection(Collection::Matters).await?;
            let before = matters.len();
            let kept: Vec<Matter> = matters.into_iter().filter(|m| m.client_id != id).collect();
            removed_matters = before - kept.len();
            self.write_collection(Collection::Matters, &kept).await?;
        }

        clients.remove(position);
        self.write_collection(Collection::Clients, &clients).await?;
        tracing::debug!(
            client_id = id,
            cascaded_matters = removed_matters,
            "deleted client"
        );
        Ok(())
    }

    /// Case-insensitive substring search on client name. A blank query
    /// returns every client in storage order.
    pub async fn search_clients(&self, query: &str) -> Result<Vec<Client>, BillingError> {
        let clients: Vec<Client> = self.read_collection(Collection::Clients).await?;
        if query.trim().is_empty() {
            return Ok(clients);
        }

        let needle = query.to_lowercase();
        Ok(clients
            .into_iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .collect())
    }

    /// Exact (case-sensitive) name check, optionally excluding one id.
    /// Callers use this before create/update; the store itself never
    /// enforces name uniqueness.
    pub async fn client_name_exists(
        &self,
        name: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, BillingError> {
        let clients: Vec<Client> = self.read_collection(Collection::Clients).await?;
        Ok(clients
            .iter()
            .any(|c| c.name == name && Some(c.id) != exclude_id))
    }

    pub async fn get_clients_sorted(&self, sort: ClientSort) -> Result<Vec<Client>, BillingError> {
        let mut clients: Vec<Client> = self.read_collection(Collection::Clients).await?;
        match sort {
            ClientSort::Name => clients.sort_by(|a, b| case_aware_name_cmp(&a.name, &b.name)),
            ClientSort::Created => clients.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
        Ok(clients)
    }

    /// All matters belonging to a client, in storage order.
    pub async fn get_matters_for_client(
        &self,
        client_id: i64,
    ) -> Result<Vec<Matter>, BillingError> {
        let matters: Vec<Matter> = self.read_collection(Collection::Matters).await?;
        Ok(matters
            .into_iter()
            .filter(|m| m.client_id == client_id)
            .collect())
    }
}
