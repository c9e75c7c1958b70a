//! `campus`: command-line front end for the campus portal.
//!
//! Every subcommand drives the same page controllers the web pages use,
//! against a redb database under `~/.campus`.

mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use campus_core::PortalConfig;
use portal::model::{RequestKind, Role};
use portal::Portal;

/// Campus portal CLI.
#[derive(Parser, Debug)]
#[command(name = "campus", about = "Campus portal CLI")]
struct Cli {
    /// Path to config file (default: ~/.campus/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Data directory (overrides the config file).
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<String>,

    /// Skip the simulated network delay.
    #[arg(long = "no-delay", global = true)]
    no_delay: bool,

    /// Output format.
    #[arg(long = "output", short = 'o', global = true, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
}

fn parse_role(s: &str) -> Result<Role, String> {
    Role::parse(s).ok_or_else(|| format!("unknown role \"{s}\" (student, faculty, admin)"))
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an account through the unified registration form.
    Register {
        #[arg(long, value_parser = parse_role)]
        role: Option<Role>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        roll: Option<String>,
        #[arg(long = "employee-id")]
        employee_id: Option<String>,
        #[arg(long)]
        department: Option<String>,
        /// Password. Prompted for when omitted.
        #[arg(long)]
        password: Option<String>,
        /// Accept the Terms & Conditions.
        #[arg(long)]
        agree: bool,
    },

    /// Create an account through a role's signup page.
    Signup {
        #[arg(value_parser = parse_role)]
        role: Role,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        roll: Option<String>,
        #[arg(long = "employee-id")]
        employee_id: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        agree: bool,
        /// Acknowledge the security responsibilities.
        #[arg(long = "ack-security")]
        ack_security: bool,
    },

    /// Log in with email (or roll number) and password.
    Login {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },

    /// End the current session.
    Logout,

    /// Show the logged-in profile.
    Whoami,

    /// File a complaint.
    Complaint {
        #[arg(long)]
        purpose: String,
        #[arg(long)]
        description: String,
    },

    /// Apply for a bonafide certificate.
    Bonafide {
        #[arg(long)]
        purpose: String,
        #[arg(long)]
        description: String,
    },

    /// List submitted requests.
    Requests,

    /// Approve a request (dev mode only).
    Approve { id: String },

    /// Reject a request (dev mode only).
    Reject {
        id: String,
        /// Rejection reason. Prompted for when omitted.
        #[arg(long)]
        reason: Option<String>,
    },

    /// Turn the dashboard's dev controls on or off.
    Dev {
        #[command(subcommand)]
        state: DevState,
    },

    /// Show the security log.
    Logs {
        /// Only the most recent N entries.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum DevState {
    On,
    Off,
}

/// Open the on-disk store and wire the portal.
fn open_portal(config: &PortalConfig) -> anyhow::Result<Portal> {
    let db_path = config.resolve_db_path();
    debug!(path = %db_path.display(), "opening portal database");
    let kv: Arc<dyn campus_kv::KVStore> = Arc::new(
        campus_kv::RedbStore::open(&db_path)
            .map_err(|e| anyhow::anyhow!("failed to open portal database: {}", e))?,
    );
    Ok(Portal::from_config(kv, config))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(PortalConfig::default_path);
    let mut config = PortalConfig::load(&config_path)?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(PathBuf::from(dir));
        config.db_path = None;
    }
    if cli.no_delay {
        config.latency_ms = 0;
    }
    let json_output = cli.output == OutputFormat::Json;

    let open = || open_portal(&config);

    match cli.command {
        Commands::Register {
            role,
            name,
            email,
            roll,
            employee_id,
            department,
            password,
            agree,
        } => {
            let (password, confirm) = commands::prompt_new_password(password)?;
            commands::account::register(
                &open()?,
                commands::account::RegisterArgs {
                    role,
                    name,
                    email,
                    roll: roll.unwrap_or_default(),
                    employee_id: employee_id.unwrap_or_default(),
                    department: department.unwrap_or_default(),
                    password,
                    confirm,
                    agree,
                },
            )?;
        }

        Commands::Signup {
            role,
            name,
            email,
            roll,
            employee_id,
            department,
            phone,
            password,
            agree,
            ack_security,
        } => {
            let (password, confirm) = commands::prompt_new_password(password)?;
            commands::account::signup(
                &open()?,
                role,
                commands::account::SignupArgs {
                    name,
                    email,
                    roll: roll.unwrap_or_default(),
                    employee_id: employee_id.unwrap_or_default(),
                    department,
                    phone,
                    password,
                    confirm,
                    agree,
                    ack_security,
                },
            )?;
        }

        Commands::Login { email, password } => {
            let email = match email {
                Some(e) => e,
                None => commands::prompt_line("Email or roll number: ")?.unwrap_or_default(),
            };
            let password = match password {
                Some(p) => p,
                None => rpassword::prompt_password("Password: ")?,
            };
            commands::account::login(&open()?, email, password)?;
        }

        Commands::Logout => {
            commands::dashboard::logout(&open()?, config.dev_mode)?;
        }

        Commands::Whoami => {
            commands::account::whoami(&open()?, config.dev_mode, json_output)?;
        }

        Commands::Complaint {
            purpose,
            description,
        } => {
            commands::dashboard::submit(
                &open()?,
                config.dev_mode,
                RequestKind::Complaint,
                &purpose,
                &description,
            )?;
        }

        Commands::Bonafide {
            purpose,
            description,
        } => {
            commands::dashboard::submit(
                &open()?,
                config.dev_mode,
                RequestKind::Bonafide,
                &purpose,
                &description,
            )?;
        }

        Commands::Requests => {
            commands::dashboard::list(&open()?, json_output)?;
        }

        Commands::Approve { id } => {
            commands::dashboard::approve(&open()?, config.dev_mode, &id)?;
        }

        Commands::Reject { id, reason } => {
            let reason = match reason {
                Some(r) => Some(r),
                None => commands::prompt_line("Enter rejection reason [Missing documents]: ")?
                    .map(|r| {
                        if r.is_empty() {
                            "Missing documents".to_string()
                        } else {
                            r
                        }
                    }),
            };
            commands::dashboard::reject(&open()?, config.dev_mode, &id, reason.as_deref())?;
        }

        Commands::Logs { limit } => {
            commands::dashboard::logs(&open()?, limit, json_output)?;
        }

        Commands::Dev { state } => {
            commands::dashboard::set_dev_mode(&config_path, matches!(state, DevState::On))?;
        }

        Commands::Version => {
            println!("campus cli v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
