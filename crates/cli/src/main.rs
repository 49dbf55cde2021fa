use clap::{Parser, Subcommand};
use portal_core::config::{login_path_from_env_value, resolve_route_table};
use portal_core::{
    build_menu, decide_for, Credential, Decision, FileStore, GuardDecision, PortalConfig,
    Presentation, Role, SessionStore, StoredUserData, Theme, UserProfile,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Clinic portal session and access CLI")]
struct Cli {
    /// Session store file
    #[arg(long, global = true, env = "PORTAL_STORE_PATH", default_value = portal_core::DEFAULT_STORE_PATH)]
    store: PathBuf,

    /// YAML route table replacing the built-in one
    #[arg(long, global = true, env = "PORTAL_ROUTES_FILE")]
    routes: Option<PathBuf>,

    /// Login screen path
    #[arg(long, global = true, env = "PORTAL_LOGIN_PATH")]
    login_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the stored session
    Session,
    /// Store a credential issued by the backend
    Login {
        /// `header.payload.signature` token
        token: String,
        /// Profile JSON, either `{"id",...}` or `{"user":{"id",...}}`
        user: String,
    },
    /// Clear the stored session (the theme is kept)
    Logout,
    /// Show the menu for the stored session or a given role
    Menu {
        /// Role to build the menu for instead of the stored session's
        #[arg(long)]
        role: Option<String>,
        /// Build the mobile menu
        #[arg(long)]
        mobile: bool,
    },
    /// Decide what a screen path renders
    Guard {
        /// Screen path, e.g. /dashboard/users
        path: String,
        /// Role to check instead of the stored session's
        #[arg(long)]
        role: Option<String>,
    },
    /// Print the route table as YAML
    Routes,
    /// Show or change the theme preference
    Theme {
        /// `light`, `dark` or `toggle`
        value: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'portal --help' for commands");
        return Ok(());
    };

    let routes = resolve_route_table(cli.routes)?;
    let login_path = login_path_from_env_value(cli.login_path)?;
    let cfg = PortalConfig::new(cli.store, login_path, routes)?;
    let mut sessions = SessionStore::new(FileStore::new(cfg.store_path()));

    match command {
        Commands::Session => {
            let session = sessions.read_session();
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
        Commands::Login { token, user } => {
            let user = parse_profile(&user)?;
            sessions.login(&Credential { token, user })?;
            match sessions.read_session().identity() {
                Some(identity) => println!(
                    "Logged in as {} <{}> ({})",
                    identity.name,
                    identity.email.as_deref().unwrap_or("no email"),
                    identity.role
                ),
                None => println!("Credential stored, but it is already expired."),
            }
        }
        Commands::Logout => {
            sessions.logout()?;
            println!("Logged out.");
        }
        Commands::Menu { role, mobile } => {
            let role = match role {
                Some(tag) => Some(tag.parse::<Role>()?),
                None => sessions.read_session().role(),
            };
            let presentation = if mobile {
                Presentation::Mobile
            } else {
                Presentation::Desktop
            };
            let menu = build_menu(role, presentation);
            for entry in menu.entries {
                println!("{:<34} {}", entry.label, entry.destination);
            }
        }
        Commands::Guard { path, role } => {
            let outcome = match role {
                Some(tag) => {
                    let role = tag.parse::<Role>()?;
                    describe_decision(decide_for(Some(role), &cfg.routes().lookup(&path)?.access))
                }
                None => {
                    let session = sessions.read_session();
                    match cfg.route_guard().check(&path, &session)? {
                        GuardDecision::Allow => "allow".to_owned(),
                        GuardDecision::Forbidden => "forbidden".to_owned(),
                        GuardDecision::Redirect { to } => format!("redirect {to}"),
                    }
                }
            };
            println!("{path}: {outcome}");
        }
        Commands::Routes => {
            print!("{}", cfg.routes().to_yaml()?);
        }
        Commands::Theme { value } => match value.as_deref() {
            None => println!("{}", sessions.theme()),
            Some(value) => {
                let theme = if value == "toggle" {
                    sessions.theme().toggle()
                } else {
                    value.parse::<Theme>()?
                };
                sessions.set_theme(theme)?;
                println!("Theme set to {theme}");
            }
        },
    }

    Ok(())
}

fn parse_profile(raw: &str) -> Result<UserProfile, serde_json::Error> {
    match serde_json::from_str::<StoredUserData>(raw) {
        Ok(data) => Ok(data.user),
        Err(_) => serde_json::from_str::<UserProfile>(raw),
    }
}

fn describe_decision(decision: Decision) -> String {
    match decision {
        Decision::Allow => "allow",
        Decision::Forbidden => "forbidden",
        Decision::Redirect => "redirect to login",
    }
    .to_owned()
}
