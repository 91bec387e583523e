//! fmw-claims - terminal client for the FMW insurance claims portal.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use fmw_claims::config::AppConfig;
use fmw_claims::fallback::Source;
use fmw_claims::format::{
    file_size, money, money_millions, money_thousands, money_whole, optional_money,
    signed_percent, thousands,
};
use fmw_claims::models::{Claim, ClaimStatus, ClaimUpdate, DocumentType, InsuranceDocument};
use fmw_claims::portal::{ClaimsBrowser, Navigator, PatientSearch, Portal, Route};
use fmw_claims::session::{FileStorage, Session};

/// fmw-claims - FMW insurance claims portal
#[derive(Parser, Debug)]
#[command(name = "fmw-claims")]
#[command(version, about, long_about = None)]
struct Cli {
    /// API root, e.g. http://localhost:8000/api (overrides FMW_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory holding session.json (overrides FMW_SESSION_DIR)
    #[arg(long, global = true)]
    session_dir: Option<PathBuf>,

    /// Keep the session in memory for this run only
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Log filter (trace, debug, info, warn, error or a RUST_LOG directive)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    // === Session ===
    /// Sign in and store the session
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami {
        /// Fetch the profile from the API instead of the stored copy
        #[arg(long)]
        refresh: bool,
    },

    // === Pages ===
    /// Headline figures and recent claims
    Dashboard,

    /// List claims
    Claims {
        /// Only claims with this status (e.g. pending, in_review)
        #[arg(short, long, value_parser = filter_status)]
        status: Option<ClaimStatus>,

        /// Page to show
        #[arg(short = 'p', long, default_value = "1")]
        page: u32,
    },

    /// Show one claim
    Claim {
        /// Claim ID
        id: u64,
    },

    /// Record a review decision for a claim
    Review {
        /// Claim ID
        id: u64,

        /// New status (approved, denied, partially_approved, ...)
        #[arg(short, long, value_parser = any_status)]
        status: ClaimStatus,

        /// Approved amount in dollars
        #[arg(long)]
        approved_amount: Option<f64>,

        /// Reason shown to the provider on denial
        #[arg(long)]
        denial_reason: Option<String>,

        /// Internal notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// List documents attached to a claim
    ClaimDocs {
        /// Claim ID
        id: u64,
    },

    /// Search patients by name or member ID
    Patients {
        /// Search text
        query: String,
    },

    /// List documents of a patient
    Documents {
        /// Patient ID
        patient_id: u64,

        /// Filter by file name or description
        #[arg(long)]
        search: Option<String>,

        /// Filter by document type (eob, pre_auth, ...)
        #[arg(long = "type", value_parser = document_type)]
        doc_type: Option<DocumentType>,
    },

    /// Upload a document for a patient
    Upload {
        /// Patient ID
        patient_id: u64,

        /// File to upload
        file: PathBuf,

        /// Document type (eob, pre_auth, coverage_letter, claim_form, superbill, other)
        #[arg(long = "type", value_parser = document_type)]
        doc_type: DocumentType,

        /// Claim the document belongs to
        #[arg(long)]
        claim: Option<u64>,

        /// Free-text description
        #[arg(long)]
        description: Option<String>,
    },

    /// Get download links for documents
    Download {
        /// Document IDs
        #[arg(required = true)]
        ids: Vec<u64>,
    },

    /// Claims and financial analytics
    Analytics,
}

/// Parse one of `values` by its wire name.
fn one_of<T: Copy + fmt::Display>(values: &'static [T], s: &str) -> Result<T, String> {
    values
        .iter()
        .copied()
        .find(|v| v.to_string() == s)
        .ok_or_else(|| {
            let names: Vec<String> = values.iter().map(T::to_string).collect();
            format!("expected one of: {}", names.join(", "))
        })
}

fn filter_status(s: &str) -> Result<ClaimStatus, String> {
    one_of(ClaimStatus::FILTERABLE, s)
}

fn any_status(s: &str) -> Result<ClaimStatus, String> {
    one_of(ClaimStatus::ALL, s)
}

fn document_type(s: &str) -> Result<DocumentType, String> {
    one_of(DocumentType::ALL, s)
}

impl Commands {
    /// Screen the command corresponds to, for the route gate. Logout and
    /// whoami work in any session state.
    fn route(&self) -> Option<Route> {
        match self {
            Commands::Login { .. } => Some(Route::Login),
            Commands::Logout | Commands::Whoami { .. } => None,
            Commands::Dashboard => Some(Route::Dashboard),
            Commands::Claims { .. } => Some(Route::Claims),
            Commands::Claim { id } | Commands::Review { id, .. } | Commands::ClaimDocs { id } => {
                Some(Route::Claim(*id))
            }
            Commands::Patients { .. } => Some(Route::Patients),
            Commands::Documents { .. } | Commands::Upload { .. } | Commands::Download { .. } => {
                Some(Route::Documents)
            }
            Commands::Analytics => Some(Route::Analytics),
        }
    }
}

/// Subcommand that opens `route`.
fn screen_command(route: Route) -> &'static str {
    match route {
        Route::Login => "login --email <email>",
        Route::Dashboard => "dashboard",
        Route::Patients => "patients <query>",
        Route::Claims => "claims",
        Route::Claim(_) => "claim <id>",
        Route::Documents => "documents <patient-id>",
        Route::Analytics => "analytics",
    }
}

/// What a browser would have shown on navigating to `route`.
fn navigation_message(route: Route) -> String {
    match route {
        Route::Login => {
            "Not signed in. Run `fmw-claims login --email <email>` to sign in.".to_string()
        }
        Route::Dashboard => {
            let screens: Vec<String> = Route::NAV
                .iter()
                .map(|r| format!("  {:<10} fmw-claims {}", r.label(), screen_command(*r)))
                .collect();
            format!("Signed in. Screens:\n{}", screens.join("\n"))
        }
        other => format!("-> {}", other.label()),
    }
}

/// Prints what a browser would have done on navigation.
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        eprintln!("{}", navigation_message(route));
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    fmw_claims::init_tracing(cli.log_level.as_deref());

    let mut config = AppConfig::from_env().context("Invalid environment configuration")?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url).context("Invalid --api-url")?;
    }
    if let Some(dir) = cli.session_dir {
        config.session_dir = dir;
    }

    let session = if cli.ephemeral {
        Session::in_memory()
    } else {
        Session::open(FileStorage::new(&config.session_dir))
    };
    tracing::debug!(api = %config.api_url, session_dir = %config.session_dir.display(), "Starting");

    let portal = Portal::new(&config, Arc::new(session), TerminalNavigator)
        .context("Failed to create API client")?;

    run(&portal, cli.command).await
}

async fn run(portal: &Portal, command: Commands) -> Result<ExitCode> {
    if let Some(route) = command.route() {
        if portal.enter(route) != route {
            let code = if route.is_protected() { 2 } else { 0 };
            return Ok(ExitCode::from(code));
        }
    }

    match command {
        Commands::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => read_password()?,
            };
            match portal.login(&email, &password).await {
                Ok(outcome) => {
                    let user = &outcome.value;
                    println!(
                        "Welcome, {} ({}, {})",
                        user.name, user.role.label(), user.insurance_company.name
                    );
                    if outcome.source == Source::Demo {
                        println!("API unavailable: signed in with the demo account.");
                    }
                }
                Err(e) => {
                    eprintln!("Sign-in failed: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }

        Commands::Logout => {
            portal.logout().await.context("Failed to clear session")?;
        }

        Commands::Whoami { refresh } => {
            let user = if refresh {
                Some(portal.profile().await?)
            } else {
                portal.current_user()
            };
            match user {
                Some(user) => {
                    let initial = user.initial().unwrap_or('?');
                    println!("[{initial}] {} <{}>", user.name, user.email);
                    let role = user.role.label();
                    let company = &user.insurance_company;
                    println!("    {role} at {} ({})", company.name, company.code);
                }
                None if portal.session().is_authenticated() => {
                    println!("Signed in (profile not stored). Use --refresh to fetch it.");
                }
                None => {
                    println!("Not signed in.");
                    return Ok(ExitCode::from(2));
                }
            }
        }

        Commands::Dashboard => {
            let dashboard = portal.dashboard().await?;
            banner(dashboard.source);
            let a = &dashboard.analytics;
            println!("Total claims      {}", thousands(a.claims_summary.total));
            println!(
                "Pending review    {}",
                thousands(dashboard.pending_review())
            );
            println!(
                "Approved          {} ({}% approval rate)",
                thousands(a.claims_summary.approved), dashboard.approval_rate()
            );
            println!(
                "Total paid        {} ({} billed this month)",
                money_thousands(a.financial.total_paid),
                money_thousands(a.financial.this_month_billed)
            );
            println!(
                "Avg processing    {:.1} days",
                a.processing.avg_processing_days
            );
            println!(
                "This month        {} claims ({} vs last month)",
                a.processing.claims_this_month, signed_percent(dashboard.month_change_percent())
            );
            println!();
            println!("Recent claims");
            print_claims(&dashboard.recent_claims);
        }

        Commands::Claims { status, page } => {
            let mut browser = ClaimsBrowser::new();
            browser.set_status(status);
            let mut browser = browser.with_page(page);
            portal.load_claims(&mut browser).await?;
            if let Some(source) = browser.source {
                banner(source);
            }
            if browser.claims.is_empty() {
                println!("No claims found.");
            } else {
                print_claims(&browser.claims);
            }
            if browser.show_pagination() {
                println!(
                    "Page {} of {}",
                    browser.current_page(), browser.total_pages()
                );
            }
        }

        Commands::Claim { id } => {
            let review = portal.claim(id).await?;
            banner(review.source);
            let detail = &review.detail;
            let claim = &detail.claim;
            println!("{}  [{}]", claim.claim_number, claim.status.label());
            let patient = &detail.patient;
            println!("Patient     {} <{}>", patient.name, patient.email);
            println!("Therapist   {}", detail.therapist.name);
            println!(
                "Service     {} on {}",
                claim.service_type, claim.service_date
            );
            println!("Billed      {}", money(claim.billed_amount));
            println!("Approved    {}", optional_money(claim.approved_amount));
            if let Some(codes) = &detail.diagnosis_codes {
                println!("Diagnosis   {}", codes.join(", "));
            }
            if let Some(codes) = &detail.procedure_codes {
                println!("Procedure   {}", codes.join(", "));
            }
            if let Some(paid_at) = &detail.paid_at {
                println!("Paid        {paid_at}");
            }
            if let Some(reason) = &detail.denial_reason {
                println!("Denied      {reason}");
            }
            if let Some(notes) = &detail.notes {
                println!("Notes       {notes}");
            }
            for doc in &detail.documents {
                println!(
                    "  #{} {} ({}, {})",
                    doc.id, doc.file_name, doc.doc_type, doc.created_at
                );
            }
            if review.is_open() {
                println!();
                println!("Run `fmw-claims review {id} --status <status>` to record a decision.");
            }
        }

        Commands::Review {
            id,
            status,
            approved_amount,
            denial_reason,
            notes,
        } => {
            let mut update = ClaimUpdate::new(status);
            if let Some(amount) = approved_amount {
                update = update.approved_amount(amount);
            }
            if let Some(reason) = denial_reason {
                update = update.denial_reason(reason);
            }
            if let Some(notes) = notes {
                update = update.notes(notes);
            }
            portal.submit_review(id, &update).await?;
            println!("Claim {id} marked {}.", status.label());
        }

        Commands::ClaimDocs { id } => {
            let docs = portal.claim_documents(id).await?;
            banner(docs.source);
            print_documents(&docs.value);
        }

        Commands::Patients { query } => {
            let mut search = PatientSearch::new();
            if !portal.search_patients(&mut search, &query).await? {
                eprintln!("Enter a name or member ID to search.");
                return Ok(ExitCode::FAILURE);
            }
            banner(search.source);
            for p in &search.patients {
                println!(
                    "#{:<4} {:<20} {:<15} {:<8} {:<18} {} claims",
                    p.id,
                    p.name,
                    p.member_id.as_deref().unwrap_or("-"),
                    p.group_number.as_deref().unwrap_or("-"),
                    p.therapist_name.as_deref().unwrap_or("-"),
                    p.claims_count
                );
            }
        }

        Commands::Documents {
            patient_id,
            search,
            doc_type,
        } => {
            let mut browser = portal.documents(patient_id).await?;
            banner(browser.source);
            browser.search = search.unwrap_or_default();
            browser.type_filter = doc_type;
            let visible: Vec<InsuranceDocument> = browser.filtered().into_iter().cloned().collect();
            print_documents(&visible);
        }

        Commands::Upload {
            patient_id,
            file,
            doc_type,
            claim,
            description,
        } => {
            let created = portal
                .upload_path(patient_id, &file, doc_type, claim, description)
                .await
                .with_context(|| format!("Failed to upload {}", file.display()))?;
            println!(
                "Uploaded {} as document #{}.",
                created.file_name, created.id
            );
        }

        Commands::Download { ids } => {
            let links = portal.download(&ids).await?;
            println!("Downloaded {} documents", links.len());
            for link in links {
                println!("#{:<4} {}  {}", link.id, link.file_name, link.url);
            }
        }

        Commands::Analytics => {
            let report = portal.analytics().await?;
            banner(report.source);
            let a = &report.analytics;
            println!("Total claims       {}", thousands(a.claims_summary.total));
            println!("Approval rate      {}%", report.approval_rate());
            println!("Denial rate        {}%", report.denial_rate());
            println!(
                "Avg processing     {:.1} days",
                a.processing.avg_processing_days
            );
            println!(
                "Total paid         {}",
                money_millions(a.financial.total_paid)
            );
            println!(
                "Month over month   {} claims ({})",
                a.processing.claims_this_month, signed_percent(report.month_change_percent())
            );
            println!();
            println!("Status breakdown");
            for share in report.status_breakdown() {
                println!(
                    "  {:<10} {} ({}%)",
                    share.status.label(), thousands(share.count), share.percent
                );
            }
            let (approved_share, paid_share) = report.financial_shares();
            println!();
            println!("Financial overview");
            println!("  Billed      {}", money_whole(a.financial.total_billed));
            println!(
                "  Approved    {} ({approved_share:.1}% of billed)",
                money_whole(a.financial.total_approved)
            );
            println!(
                "  Paid        {} ({paid_share:.1}% of billed, {}% of approved)",
                money_whole(a.financial.total_paid), report.payment_rate()
            );
            println!(
                "  This month  {} billed",
                money_thousands(a.financial.this_month_billed)
            );
            println!("  Active patients {}", thousands(a.patients.total_active));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn banner(source: Source) {
    if let Some(text) = source.banner() {
        eprintln!("{text}");
    }
}

fn print_claims(claims: &[Claim]) {
    for c in claims {
        println!(
            "#{:<4} {:<20} {:<16} {:<18} {:<10} {:>10} {:>10}  {}",
            c.id,
            c.claim_number,
            c.patient_name,
            c.service_type,
            c.service_date,
            money(c.billed_amount),
            optional_money(c.approved_amount),
            c.status.label()
        );
    }
}

fn print_documents(docs: &[InsuranceDocument]) {
    if docs.is_empty() {
        println!("No documents found.");
        return;
    }
    for d in docs {
        println!(
            "#{:<4} {:<28} {:<18} {:<12} {:>8}  {}",
            d.id,
            d.file_name,
            d.doc_type.label(),
            d.direction.label(),
            file_size(d.file_size),
            d.created_at
        );
    }
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    io::stderr().flush().context("Failed to write prompt")?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
