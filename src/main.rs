use anyhow::Context;
use api_client::HttpCatalogApi;
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use dental_core::{
    config::timeout_from_env_value,
    constants::{API_TOKEN_ENV, API_URL_ENV, DEFAULT_API_URL, DEFAULT_PORTAL_URL, HTTP_TIMEOUT_ENV, PORTAL_URL_ENV},
    BookingLinks, BookingSession, CatalogApi, ClientConfig, PatientInfo,
};
use tooth_chart::{DecodedNote, ToothChartEditor};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dental")]
#[command(about = "Dental clinic booking console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List clinics
    Clinics,
    /// List services offered by a clinic
    Services {
        /// Clinic id
        clinic: String,
    },
    /// List doctors at a clinic
    Doctors {
        /// Clinic id
        clinic: String,
        /// Only doctors offering this service
        #[arg(long)]
        service: Option<String>,
    },
    /// List free time slots for a doctor on a date
    Slots {
        /// Clinic id
        clinic: String,
        /// Doctor id
        doctor: String,
        /// Date (YYYY-MM-DD)
        date: NaiveDate,
        /// Service id (optional)
        #[arg(long)]
        service: Option<String>,
    },
    /// Book an appointment
    Book(BookArgs),
    /// Inspect or build examination notes
    Note {
        #[command(subcommand)]
        command: NoteCommands,
    },
}

#[derive(clap::Args)]
struct BookArgs {
    #[arg(long)]
    clinic: String,
    #[arg(long)]
    doctor: String,
    #[arg(long)]
    service: Option<String>,
    /// Date (YYYY-MM-DD)
    #[arg(long)]
    date: NaiveDate,
    /// Slot start time (HH:MM:SS)
    #[arg(long)]
    start: NaiveTime,
    /// Patient full name
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    note: Option<String>,
    /// Signed-in patient id (optional)
    #[arg(long)]
    patient_id: Option<String>,
}

#[derive(Subcommand)]
enum NoteCommands {
    /// Show how a stored note is displayed
    Decode {
        /// Raw note text
        text: String,
    },
    /// Build a note carrying a tooth chart
    Encode {
        /// Tooth status as TOOTH=STATUS, e.g. T26=cavity (repeatable)
        #[arg(long = "tooth", value_name = "TOOTH=STATUS")]
        teeth: Vec<String>,
        /// Free text placed before the chart
        #[arg(long, default_value = "")]
        text: String,
    },
}

/// Entry point for the `dental` console.
///
/// # Environment Variables
/// - `DENTAL_API_URL`: backend API base URL (default: "http://localhost:5000/api")
/// - `DENTAL_PORTAL_URL`: patient portal base URL for self-service links (default: "http://localhost:3000")
/// - `DENTAL_API_TOKEN`: bearer token (optional)
/// - `DENTAL_HTTP_TIMEOUT_SECS`: request timeout in seconds (default: 15)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("dental=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Note { command } => run_note(command),
        command => run_backend(command).await,
    }
}

/// Run a command that talks to the backend.
async fn run_backend(command: Commands) -> anyhow::Result<()> {
    let cfg = load_config()?;
    let api = HttpCatalogApi::new(&cfg)?;
    tracing::debug!("-- Using backend at {}", cfg.api_base_url());

    match command {
        Commands::Clinics => {
            for clinic in api.list_clinics().await? {
                println!("{}\t{}", clinic.id, clinic.name);
            }
        }
        Commands::Services { clinic } => {
            for service in api.list_services(&clinic).await? {
                println!("{}\t{}", service.id, service.name);
            }
        }
        Commands::Doctors { clinic, service } => {
            for doctor in api.list_doctors(&clinic, service.as_deref()).await? {
                println!("{}\t{}", doctor.id, doctor.full_name);
            }
        }
        Commands::Slots {
            clinic,
            doctor,
            date,
            service,
        } => {
            let slots = api
                .list_slots(&clinic, &doctor, date, service.as_deref())
                .await?;
            if slots.is_empty() {
                println!("No free slots.");
            }
            for slot in slots {
                println!("{} - {}", slot.start_at.time(), slot.end_at.time());
            }
        }
        Commands::Book(args) => book(api, &cfg, args).await?,
        Commands::Note { command } => run_note(command)?,
    }

    Ok(())
}

fn load_config() -> anyhow::Result<ClientConfig> {
    let api_url = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.into());
    let portal_url = std::env::var(PORTAL_URL_ENV).unwrap_or_else(|_| DEFAULT_PORTAL_URL.into());
    let timeout = timeout_from_env_value(std::env::var(HTTP_TIMEOUT_ENV).ok())?;

    Ok(ClientConfig::new(
        &api_url,
        &portal_url,
        std::env::var(API_TOKEN_ENV).ok(),
        timeout,
    )?)
}

/// Drive the booking wizard from command-line selections.
async fn book(api: HttpCatalogApi, cfg: &ClientConfig, args: BookArgs) -> anyhow::Result<()> {
    let mut session = BookingSession::new(api);
    tracing::debug!(session = %session.id(), "starting booking");
    session.open().await?;

    let clinic = session
        .state()
        .clinics()
        .iter()
        .find(|c| c.id == args.clinic)
        .cloned()
        .with_context(|| format!("unknown clinic: {}", args.clinic))?;
    session.select_clinic(clinic).await?;

    if let Some(service_id) = &args.service {
        let service = session
            .state()
            .services()
            .iter()
            .find(|s| &s.id == service_id)
            .cloned()
            .with_context(|| format!("clinic does not offer service: {service_id}"))?;
        session.select_service(service).await?;
    }

    let doctor = session
        .state()
        .doctors()
        .iter()
        .find(|d| d.id == args.doctor)
        .cloned()
        .with_context(|| format!("doctor not available for this selection: {}", args.doctor))?;
    session.select_doctor(doctor)?;

    session.select_date(args.date).await?;
    let slot = session
        .state()
        .slots()
        .iter()
        .find(|s| s.start_at.time() == args.start)
        .cloned()
        .with_context(|| format!("no free slot at {} on {}", args.start, args.date))?;
    session.select_slot(slot)?;

    session.set_patient_id(args.patient_id);
    session.set_patient_info(PatientInfo {
        full_name: args.name,
        phone: args.phone,
        email: args.email.unwrap_or_default(),
        note: args.note.unwrap_or_default(),
    });

    let confirmation = session.submit().await?;
    let links = BookingLinks::from_config(cfg).for_confirmation(&confirmation);

    println!("Booked appointment {}", confirmation.appointment_id);
    println!("Cancel:     {}", links.cancel);
    println!("Reschedule: {}", links.reschedule);
    Ok(())
}

fn run_note(command: NoteCommands) -> anyhow::Result<()> {
    match command {
        NoteCommands::Decode { text } => {
            let decoded = tooth_chart::decode(&text);
            if let DecodedNote::ToothChart { teeth, .. } = &decoded {
                for cell in tooth_chart::chart_view(teeth) {
                    println!(
                        "{} {}\t{}\t{}",
                        cell.category.symbol(),
                        cell.tooth,
                        cell.category.color(),
                        cell.status
                    );
                }
                println!();
            }
            println!("{}", decoded.render());
        }
        NoteCommands::Encode { teeth, text } => {
            let mut editor = ToothChartEditor::new();
            editor.set_free_text(&text);
            for entry in teeth {
                let (tooth, status) = entry
                    .split_once('=')
                    .with_context(|| format!("expected TOOTH=STATUS, got {entry}"))?;
                editor.set(tooth, status)?;
            }
            println!("{}", editor.to_note());
        }
    }
    Ok(())
}
