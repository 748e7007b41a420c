use crate::application::filter::{compose_atm_predicate, compose_branch_predicate};
use crate::application::schedule::{Reconciliation, ScheduleEngine};
use crate::domain::catalog::{Address, Atm, Branch, Catalog, Entity, Schedulable};
use crate::domain::criteria::{AtmFilterCriteria, BranchSearchCriteria};
use crate::domain::ports::{AtmStoreBox, BranchStoreBox, ClockRef, EntityStore};
use crate::domain::predicate::Predicate;
use crate::domain::schedule::ScheduleMutation;
use crate::domain::update::{AddressUpdate, AtmUpdate, BranchUpdate};
use crate::error::{CatalogError, Result};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A branch as returned by a search, with its schedule-derived open state.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchListing {
    pub branch: Branch,
    pub open_now: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AtmListing {
    pub atm: Atm,
    pub open_now: bool,
}

/// Report line for a branch flagged closed by archival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedBranch {
    pub id: Uuid,
    pub name: String,
    pub address: String,
}

/// Report for an archived ATM: where it stood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedAtm {
    pub id: Uuid,
    pub inventory_number: String,
    pub city: String,
    pub street_type: String,
    pub street: String,
    pub house: String,
}

/// Orchestrates searches, updates and archival over the two stores.
///
/// Schedules live inside their entities, so every write that reads an entity
/// and stores it back holds `entity_writes` from the read to the store. No two
/// writers ever work from the same snapshot.
pub struct CatalogService {
    branches: BranchStoreBox,
    atms: AtmStoreBox,
    schedules: ScheduleEngine,
    entity_writes: Mutex<()>,
}

impl CatalogService {
    pub fn new(branches: BranchStoreBox, atms: AtmStoreBox, clock: ClockRef) -> Self {
        Self {
            branches,
            atms,
            schedules: ScheduleEngine::new(clock),
            entity_writes: Mutex::new(()),
        }
    }

    /// Seeds both stores. Schedules are re-bound to their owners on the way in.
    pub async fn load_catalog(&self, catalog: Catalog) -> Result<()> {
        let mut branches = Vec::with_capacity(catalog.branches.len());
        for mut branch in catalog.branches {
            let schedule =
                ScheduleEngine::bind(branch.owner(), std::mem::take(&mut branch.schedule))?;
            branch.replace_schedule(schedule);
            branches.push(branch);
        }
        let mut atms = Vec::with_capacity(catalog.atms.len());
        for mut atm in catalog.atms {
            let schedule = ScheduleEngine::bind(atm.owner(), std::mem::take(&mut atm.schedule))?;
            atm.replace_schedule(schedule);
            atms.push(atm);
        }

        let _guard = self.entity_writes.lock().await;
        info!(branches = branches.len(), atms = atms.len(), "Loading catalog");
        self.branches.store_all(branches).await?;
        self.atms.store_all(atms).await?;
        Ok(())
    }

    /// Branches matching `criteria`, ordered by name. A closed branch is never
    /// reported open, whatever its schedule says.
    pub async fn search_branches(
        &self,
        criteria: &BranchSearchCriteria,
    ) -> Result<Vec<BranchListing>> {
        let predicate = compose_branch_predicate(criteria);
        debug!(clauses = ?predicate, "Searching branches");

        let mut found = self.branches.find_all(&predicate).await?;
        found.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(count = found.len(), "Branch search finished");

        Ok(found
            .into_iter()
            .map(|branch| self.branch_listing(branch))
            .collect())
    }

    /// ATMs matching `criteria`, ordered by inventory number.
    pub async fn filter_atms(&self, criteria: &AtmFilterCriteria) -> Result<Vec<AtmListing>> {
        let predicate = compose_atm_predicate(criteria);
        debug!(clauses = ?predicate, "Filtering ATMs");

        let mut found = self.atms.find_all(&predicate).await?;
        found.sort_by(|a, b| a.inventory_number.cmp(&b.inventory_number));
        debug!(count = found.len(), "ATM filter finished");

        Ok(found.into_iter().map(|atm| self.atm_listing(atm)).collect())
    }

    pub async fn branch_by_id(&self, id: Uuid) -> Result<BranchListing> {
        let branch = self
            .branches
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("Branch {}", id)))?;
        Ok(self.branch_listing(branch))
    }

    /// The branch with exactly this bank number, address included.
    pub async fn branch_by_bank_number(&self, bank_number: &str) -> Result<BranchListing> {
        let branch = self.find_by_bank_number(bank_number).await?.ok_or_else(|| {
            CatalogError::not_found(format!("Branch with bank number '{}'", bank_number))
        })?;
        Ok(self.branch_listing(branch))
    }

    pub async fn atm_by_id(&self, id: Uuid) -> Result<AtmListing> {
        let atm = self
            .atms
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("ATM {}", id)))?;
        Ok(self.atm_listing(atm))
    }

    pub async fn update_branch_schedule(
        &self,
        id: Uuid,
        mutations: &[ScheduleMutation],
    ) -> Result<Reconciliation> {
        let _guard = self.entity_writes.lock().await;
        update_schedule(&*self.branches, id, mutations).await
    }

    pub async fn update_atm_schedule(
        &self,
        id: Uuid,
        mutations: &[ScheduleMutation],
    ) -> Result<Reconciliation> {
        let _guard = self.entity_writes.lock().await;
        update_schedule(&*self.atms, id, mutations).await
    }

    /// Applies the present fields of `update`. A new name, bank number or phone
    /// number must not belong to another branch; every clash is reported at once.
    pub async fn update_branch_info(
        &self,
        id: Uuid,
        update: &BranchUpdate,
    ) -> Result<BranchListing> {
        if update.is_empty() {
            return Err(CatalogError::invalid("Nothing to update"));
        }

        let _guard = self.entity_writes.lock().await;
        let mut branch = self
            .branches
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("Branch {}", id)))?;

        let others: Vec<Branch> = self
            .branches
            .all()
            .await?
            .into_iter()
            .filter(|other| other.id != id)
            .collect();
        let conflicts = identity_conflicts(
            &others,
            update.bank_number.as_deref(),
            update.phone_number.as_deref(),
            update.name.as_deref(),
        );
        if !conflicts.is_empty() {
            return Err(CatalogError::AlreadyExists(conflicts.join("; ")));
        }

        update.apply_to(&mut branch);
        self.branches.store(branch.clone()).await?;
        info!(%id, name = %branch.name, "Updated branch");
        Ok(self.branch_listing(branch))
    }

    /// Applies the present address fields, creating the address if the branch had none.
    pub async fn update_branch_address(
        &self,
        id: Uuid,
        update: &AddressUpdate,
    ) -> Result<BranchListing> {
        if update.is_empty() {
            return Err(CatalogError::invalid("Nothing to update"));
        }

        let _guard = self.entity_writes.lock().await;
        let mut branch = self
            .branches
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("Branch {}", id)))?;

        update.apply_to(branch.address.get_or_insert_with(Address::blank))?;
        self.branches.store(branch.clone()).await?;
        info!(
            %id,
            address = %branch.address.as_ref().map_or("", |a| a.full_address.as_str()),
            "Updated branch address"
        );
        Ok(self.branch_listing(branch))
    }

    /// Applies the present fields of `update`. A given schedule replaces the
    /// stored one as a whole and a given bank number must name an existing branch.
    pub async fn update_atm(&self, id: Uuid, update: &AtmUpdate) -> Result<AtmListing> {
        if update.is_empty() {
            return Err(CatalogError::invalid("Nothing to update"));
        }

        let _guard = self.entity_writes.lock().await;
        let mut atm = self
            .atms
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(format!("ATM {}", id)))?;

        if let Some(bank_number) = &update.branch_bank_number {
            if self.find_by_bank_number(bank_number).await?.is_none() {
                return Err(CatalogError::not_found(format!(
                    "Branch with bank number '{}'",
                    bank_number
                )));
            }
            atm.branch_bank_number = Some(bank_number.clone());
        }
        update.apply_fields_to(&mut atm)?;
        if let Some(schedule) = &update.schedule {
            let schedule = ScheduleEngine::bind(atm.owner(), schedule.clone())
                .inspect_err(|err| warn!(%id, error = %err, "Rejected ATM schedule"))?;
            atm.replace_schedule(schedule);
        }

        self.atms.store(atm.clone()).await?;
        info!(
            %id,
            schedule_replaced = update.schedule.is_some(),
            "Updated ATM"
        );
        Ok(self.atm_listing(atm))
    }

    /// Flags every listed branch closed, or none of them. Repeated ids count once.
    pub async fn archive_branches(&self, ids: &[Uuid]) -> Result<Vec<ArchivedBranch>> {
        if ids.is_empty() {
            return Err(CatalogError::invalid("No branch ids given"));
        }
        let mut unique: Vec<Uuid> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(id) {
                unique.push(*id);
            }
        }

        let _guard = self.entity_writes.lock().await;
        let mut branches = self.branches.get_many(&unique).await?;
        let missing: Vec<String> = unique
            .iter()
            .filter(|id| !branches.iter().any(|branch| branch.id == **id))
            .map(Uuid::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(CatalogError::not_found(format!(
                "Branches not found: {}",
                missing.join(", ")
            )));
        }

        let already_closed: Vec<String> = branches
            .iter()
            .filter(|branch| branch.is_closed)
            .map(|branch| branch.id.to_string())
            .collect();
        if !already_closed.is_empty() {
            return Err(CatalogError::AlreadyExists(format!(
                "Branches already archived: {}",
                already_closed.join(", ")
            )));
        }

        for branch in &mut branches {
            branch.is_closed = true;
        }
        self.branches.store_all(branches.clone()).await?;
        info!(count = branches.len(), "Archived branches");

        Ok(branches
            .into_iter()
            .map(|branch| ArchivedBranch {
                id: branch.id,
                address: branch
                    .address
                    .map(|address| address.full_address)
                    .unwrap_or_default(),
                name: branch.name,
            })
            .collect())
    }

    pub async fn archive_atm(&self, id: Uuid) -> Result<ArchivedAtm> {
        let _guard = self.entity_writes.lock().await;
        let mut atm = self
            .atms
            .get(id)
            .await?
            .filter(Atm::is_in_service)
            .ok_or_else(|| {
                CatalogError::not_found(format!("ATM {} not found or already archived", id))
            })?;

        atm.is_closed = true;
        self.atms.store(atm.clone()).await?;
        info!(%id, inventory_number = %atm.inventory_number, "Archived ATM");

        let address = atm.address.unwrap_or_default();
        Ok(ArchivedAtm {
            id: atm.id,
            inventory_number: atm.inventory_number,
            city: address.city,
            street_type: address.street_type,
            street: address.street,
            house: address.house,
        })
    }

    /// Flags every existing ATM among `ids` closed; unknown ids are skipped.
    pub async fn soft_delete_atms(&self, ids: &[Uuid]) -> Result<Vec<Atm>> {
        let _guard = self.entity_writes.lock().await;
        let mut atms = self.atms.get_many(ids).await?;
        if atms.is_empty() {
            return Err(CatalogError::not_found("None of the given ATMs exist"));
        }
        for atm in &mut atms {
            atm.is_closed = true;
        }
        self.atms.store_all(atms.clone()).await?;
        info!(requested = ids.len(), closed = atms.len(), "Soft-deleted ATMs");
        Ok(atms)
    }

    /// Distinct bank numbers starting with `prefix`, sorted.
    pub async fn bank_numbers_by_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let needle = prefix.to_string();
        let predicate = Predicate::all().and(
            format!("bank_number starts with '{}'", prefix),
            move |b: &Branch| b.bank_number.starts_with(needle.as_str()),
        );

        let mut numbers: Vec<String> = self
            .branches
            .find_all(&predicate)
            .await?
            .into_iter()
            .map(|branch| branch.bank_number)
            .collect();
        numbers.sort();
        numbers.dedup();

        if numbers.is_empty() {
            return Err(CatalogError::not_found(format!(
                "No bank numbers start with '{}'",
                prefix
            )));
        }
        Ok(numbers)
    }

    /// Stores a new branch after checking its identifying fields are unused.
    pub async fn create_branch(&self, mut branch: Branch) -> Result<Branch> {
        let _guard = self.entity_writes.lock().await;
        let existing = self.branches.all().await?;
        let conflicts = identity_conflicts(
            &existing,
            Some(branch.bank_number.as_str()),
            Some(branch.phone_number.as_str()),
            Some(branch.name.as_str()),
        );
        if !conflicts.is_empty() {
            return Err(CatalogError::AlreadyExists(conflicts.join("; ")));
        }

        let schedule =
            ScheduleEngine::bind(branch.owner(), std::mem::take(&mut branch.schedule))?;
        branch.replace_schedule(schedule);
        self.branches.store(branch.clone()).await?;
        info!(id = %branch.id, name = %branch.name, "Created branch");
        Ok(branch)
    }

    /// Stores a new ATM. Its servicing branch is required and must exist.
    pub async fn create_atm(&self, mut atm: Atm) -> Result<Atm> {
        let Some(bank_number) = atm.branch_bank_number.clone() else {
            return Err(CatalogError::invalid(format!(
                "ATM '{}' names no servicing branch",
                atm.number
            )));
        };

        let _guard = self.entity_writes.lock().await;
        let number = atm.number.clone();
        let duplicate = Predicate::all().and("number", move |a: &Atm| a.number == number);
        if !self.atms.find_all(&duplicate).await?.is_empty() {
            return Err(CatalogError::AlreadyExists(format!(
                "ATM number '{}' is taken",
                atm.number
            )));
        }

        if self.find_by_bank_number(&bank_number).await?.is_none() {
            return Err(CatalogError::not_found(format!(
                "Branch with bank number '{}'",
                bank_number
            )));
        }

        let schedule = ScheduleEngine::bind(atm.owner(), std::mem::take(&mut atm.schedule))?;
        atm.replace_schedule(schedule);
        self.atms.store(atm.clone()).await?;
        info!(id = %atm.id, number = %atm.number, "Created ATM");
        Ok(atm)
    }

    async fn find_by_bank_number(&self, bank_number: &str) -> Result<Option<Branch>> {
        let needle = bank_number.to_string();
        let predicate =
            Predicate::all().and("bank_number", move |b: &Branch| b.bank_number == needle);
        Ok(self.branches.find_all(&predicate).await?.into_iter().next())
    }

    fn branch_listing(&self, branch: Branch) -> BranchListing {
        let open_now = branch.is_in_service() && self.schedules.is_open_now(&branch.schedule);
        BranchListing { branch, open_now }
    }

    fn atm_listing(&self, atm: Atm) -> AtmListing {
        let open_now = atm.is_in_service() && self.schedules.is_open_now(&atm.schedule);
        AtmListing { atm, open_now }
    }
}

/// Every identifying value among the given ones that one of `others` already uses.
fn identity_conflicts(
    others: &[Branch],
    bank_number: Option<&str>,
    phone_number: Option<&str>,
    name: Option<&str>,
) -> Vec<String> {
    let mut conflicts = Vec::new();
    if let Some(bank_number) = bank_number
        && others.iter().any(|b| b.bank_number == bank_number)
    {
        conflicts.push(format!("bank number '{}' is taken", bank_number));
    }
    if let Some(phone_number) = phone_number
        && others.iter().any(|b| b.phone_number == phone_number)
    {
        conflicts.push(format!("phone number '{}' is taken", phone_number));
    }
    if let Some(name) = name
        && others.iter().any(|b| b.name == name)
    {
        conflicts.push(format!("name '{}' is taken", name));
    }
    conflicts
}

/// Reconciles the stored schedule of entity `id` and writes the entity back
/// in one store call. Nothing is written when the batch fails or changes nothing.
async fn update_schedule<T>(
    store: &dyn EntityStore<T>,
    id: Uuid,
    mutations: &[ScheduleMutation],
) -> Result<Reconciliation>
where
    T: Entity + Schedulable,
{
    let mut entity = store
        .get(id)
        .await?
        .ok_or_else(|| CatalogError::not_found(format!("{} {}", T::COLLECTION, id)))?;

    let owner = entity.owner();
    let reconciliation = ScheduleEngine::reconcile(owner, entity.schedule(), mutations)
        .inspect_err(|err| warn!(%owner, error = %err, "Rejected schedule update"))?;
    if reconciliation.is_noop() {
        debug!(%owner, "Schedule update changed nothing");
        return Ok(reconciliation);
    }

    entity.replace_schedule(reconciliation.schedule.clone());
    store.store(entity).await?;
    info!(
        %owner,
        deleted = reconciliation.deleted.len(),
        changed = reconciliation.changed.len(),
        added = reconciliation.added.len(),
        "Updated schedule"
    );
    Ok(reconciliation)
}
