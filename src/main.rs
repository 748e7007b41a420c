use branch_atm_catalog::application::catalog::CatalogService;
use branch_atm_catalog::domain::catalog::BranchType;
use branch_atm_catalog::domain::criteria::{AtmFilterCriteria, BranchSearchCriteria};
use branch_atm_catalog::domain::ports::ClockRef;
use branch_atm_catalog::domain::schedule::{ScheduleMutationRequest, parse_mutations};
use branch_atm_catalog::domain::update::{AddressUpdate, AtmUpdate, BranchUpdate};
use branch_atm_catalog::infrastructure::clock::{FixedClock, SystemClock};
use branch_atm_catalog::infrastructure::open_stores;
use branch_atm_catalog::interfaces::csv::listing_writer::ListingWriter;
use branch_atm_catalog::interfaces::csv::mutation_reader::MutationReader;
use branch_atm_catalog::interfaces::json::catalog_reader::CatalogReader;
use branch_atm_catalog::logging;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Seed catalog (JSON) loaded into storage before the command runs
    #[arg(long, env = "CATALOG_PATH", global = true)]
    catalog: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "CATALOG_DB_PATH", global = true)]
    db_path: Option<PathBuf>,

    /// Evaluate opening hours as of this local time (e.g. 2024-01-01T12:00:00)
    #[arg(long, global = true)]
    at: Option<NaiveDateTime>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search branches
    Branches {
        /// Name prefix, or bank number prefix if the text contains digits
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        currency_exchange: Option<bool>,
        #[arg(long)]
        ramp: Option<bool>,
        #[arg(long)]
        closed: Option<bool>,
        /// Words that must all appear in the full address
        #[arg(long)]
        address: Option<String>,
    },
    /// Filter ATMs
    Atms {
        #[arg(long)]
        inventory_number: Option<String>,
        #[arg(long)]
        hour24: Option<bool>,
        #[arg(long)]
        working_now: Option<bool>,
        #[arg(long)]
        cash_deposit: Option<bool>,
        #[arg(long)]
        nfc: Option<bool>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        street_type: Option<String>,
        #[arg(long)]
        street: Option<String>,
        #[arg(long)]
        house: Option<String>,
    },
    /// Apply a CSV batch of ADD/CHANGE/DELETE rows to one schedule
    Schedule {
        #[arg(long, conflicts_with = "atm", required_unless_present = "atm")]
        branch: Option<Uuid>,
        #[arg(long)]
        atm: Option<Uuid>,
        /// Mutations CSV file (weekDay, openingTime, closingTime, operation)
        mutations: PathBuf,
    },
    /// Flag branches closed
    ArchiveBranches { ids: Vec<Uuid> },
    /// Flag one ATM closed
    ArchiveAtm { id: Uuid },
    /// Flag every existing ATM among the ids closed
    DeleteAtms {
        #[arg(required = true)]
        ids: Vec<Uuid>,
    },
    /// List bank numbers starting with a prefix
    BankNumbers { prefix: String },
    /// Show one branch, by id or by bank number
    Branch {
        #[arg(long, conflicts_with = "bank_number", required_unless_present = "bank_number")]
        id: Option<Uuid>,
        #[arg(long)]
        bank_number: Option<String>,
        /// Print the weekly schedule instead of the branch row
        #[arg(long)]
        schedule: bool,
    },
    /// Show one ATM
    Atm {
        id: Uuid,
        /// Print the weekly schedule instead of the ATM row
        #[arg(long)]
        schedule: bool,
    },
    /// Change a branch's name, numbers, flags or type
    UpdateBranch {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bank_number: Option<String>,
        #[arg(long)]
        phone_number: Option<String>,
        #[arg(long)]
        currency_exchange: Option<bool>,
        #[arg(long)]
        ramp: Option<bool>,
        #[arg(long)]
        closed: Option<bool>,
        /// e.g. HEAD_OFFICE, BRANCH, ADDITIONAL_OFFICE
        #[arg(long = "type")]
        branch_type: Option<BranchType>,
    },
    /// Change parts of a branch's address
    UpdateAddress {
        id: Uuid,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        street_type: Option<String>,
        #[arg(long)]
        street: Option<String>,
        #[arg(long)]
        house: Option<String>,
        #[arg(long)]
        metro_station: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        latitude: Option<Decimal>,
        #[arg(long, allow_hyphen_values = true)]
        longitude: Option<Decimal>,
    },
    /// Update an ATM from a JSON document; a "schedules" list replaces its schedule
    UpdateAtm { id: Uuid, update: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let clock: ClockRef = match cli.at {
        Some(instant) => Arc::new(FixedClock::new(instant)),
        None => Arc::new(SystemClock),
    };
    let (branches, atms) = open_stores(cli.db_path.as_deref())?;
    let service = CatalogService::new(branches, atms, clock);

    if let Some(path) = cli.catalog {
        let catalog = CatalogReader::from_path(path)?.read()?;
        service.load_catalog(catalog).await?;
    }

    let stdout = io::stdout();
    let mut writer = ListingWriter::new(stdout.lock());

    match cli.command {
        Command::Branches {
            query,
            currency_exchange,
            ramp,
            closed,
            address,
        } => {
            let criteria = BranchSearchCriteria {
                name_or_bank_number: query,
                has_currency_exchange: currency_exchange,
                has_ramp: ramp,
                is_closed: closed,
                full_address_query: address,
            };
            let listings = service.search_branches(&criteria).await?;
            writer.write_branches(&listings)?;
        }
        Command::Atms {
            inventory_number,
            hour24,
            working_now,
            cash_deposit,
            nfc,
            city,
            street_type,
            street,
            house,
        } => {
            let criteria = AtmFilterCriteria {
                inventory_number_fragment: inventory_number,
                works_around_clock: hour24,
                working_now,
                accepts_cash_deposit: cash_deposit,
                supports_contactless: nfc,
                city,
                street_type,
                street,
                house,
            };
            let listings = service.filter_atms(&criteria).await?;
            writer.write_atms(&listings)?;
        }
        Command::Schedule {
            branch,
            atm,
            mutations,
        } => {
            let file = File::open(mutations).into_diagnostic()?;
            let requests = MutationReader::new(file)
                .requests()
                .collect::<branch_atm_catalog::error::Result<Vec<ScheduleMutationRequest>>>()?;
            let mutations = parse_mutations(requests)?;

            let reconciliation = match (branch, atm) {
                (Some(id), _) => service.update_branch_schedule(id, &mutations).await?,
                (None, Some(id)) => service.update_atm_schedule(id, &mutations).await?,
                (None, None) => return Err(miette!("Either --branch or --atm is required")),
            };
            writer.write_schedule(&reconciliation.schedule)?;
        }
        Command::ArchiveBranches { ids } => {
            let report = service.archive_branches(&ids).await?;
            writer.write_archived_branches(&report)?;
        }
        Command::ArchiveAtm { id } => {
            let report = service.archive_atm(id).await?;
            writer.write_archived_atm(&report)?;
        }
        Command::DeleteAtms { ids } => {
            let closed = service.soft_delete_atms(&ids).await?;
            writer.write_closed_atms(&closed)?;
        }
        Command::BankNumbers { prefix } => {
            let numbers = service.bank_numbers_by_prefix(&prefix).await?;
            writer.write_bank_numbers(&numbers)?;
        }
        Command::Branch {
            id,
            bank_number,
            schedule,
        } => {
            let listing = match (id, bank_number) {
                (Some(id), _) => service.branch_by_id(id).await?,
                (None, Some(number)) => service.branch_by_bank_number(&number).await?,
                (None, None) => return Err(miette!("Either --id or --bank-number is required")),
            };
            if schedule {
                writer.write_schedule(&listing.branch.schedule)?;
            } else {
                writer.write_branches(&[listing])?;
            }
        }
        Command::Atm { id, schedule } => {
            let listing = service.atm_by_id(id).await?;
            if schedule {
                writer.write_schedule(&listing.atm.schedule)?;
            } else {
                writer.write_atms(&[listing])?;
            }
        }
        Command::UpdateBranch {
            id,
            name,
            bank_number,
            phone_number,
            currency_exchange,
            ramp,
            closed,
            branch_type,
        } => {
            let update = BranchUpdate {
                name,
                bank_number,
                phone_number,
                has_currency_exchange: currency_exchange,
                has_ramp: ramp,
                is_closed: closed,
                branch_type,
            };
            let listing = service.update_branch_info(id, &update).await?;
            writer.write_branches(&[listing])?;
        }
        Command::UpdateAddress {
            id,
            city,
            street_type,
            street,
            house,
            metro_station,
            latitude,
            longitude,
        } => {
            let update = AddressUpdate {
                city,
                street_type,
                street,
                house,
                metro_station,
                latitude,
                longitude,
            };
            let listing = service.update_branch_address(id, &update).await?;
            writer.write_branches(&[listing])?;
        }
        Command::UpdateAtm { id, update } => {
            let file = File::open(update).into_diagnostic()?;
            let update: AtmUpdate = serde_json::from_reader(file).into_diagnostic()?;
            let listing = service.update_atm(id, &update).await?;
            writer.write_atms(&[listing])?;
        }
    }

    Ok(())
}
