//! Portal command-line client.
//!
//! Drives every gateway controller from the terminal. The session is kept in a
//! JSON file so it survives between invocations.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use portal_client::api;
use portal_client::auth::{FileStore, SessionStore};
use portal_client::config::{Config, LogFormat};
use portal_client::models::{
    ActivityFilters, ActivityKind, MeetingFilters, MyActivitiesFilter, MyMeetingsFilters,
    MyMeetingsScope, NewActivity, NewMeeting, SignUpRequest,
};
use portal_client::views::{self, JoinMeetingFlow, Launcher};
use portal_client::{ClientError, Gateway};

/// Collaboration portal client
#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Meetings, activities, team directory and files from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        /// Password (will prompt if not provided)
        #[arg(long)]
        password: Option<String>,
        /// Date of birth, YYYY-MM-DD
        #[arg(long, default_value = "")]
        date_of_birth: String,
        #[arg(long, default_value = "")]
        address: String,
        /// Manager invitation code
        #[arg(long)]
        manager_code: Option<String>,
    },

    /// Sign in
    Login {
        #[arg(long)]
        email: String,
        /// Password (will prompt if not provided)
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the stored session
    Whoami,

    /// Meetings
    #[command(subcommand)]
    Meetings(MeetingCommands),

    /// Events and team activities
    #[command(subcommand)]
    Activities(ActivityCommands),

    /// Team directory
    #[command(subcommand)]
    Team(TeamCommands),

    /// Manager invitation codes
    #[command(subcommand)]
    Manager(ManagerCommands),

    /// Learning resources
    #[command(subcommand)]
    Files(FileCommands),
}

#[derive(Subcommand)]
enum MeetingCommands {
    /// List meetings
    List {
        #[arg(long)]
        user_email: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Meetings you created or were invited to, upcoming and previous
    Mine {
        /// all, created or invited
        #[arg(long, default_value = "all")]
        scope: String,
    },
    /// Your upcoming meetings
    Upcoming,
    /// Create a meeting
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Invited e-mails, comma separated
        #[arg(long)]
        invite: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// Join a password-protected meeting
    Join {
        meeting_id: String,
        /// Password (will prompt if not provided)
        #[arg(long)]
        password: Option<String>,
    },
    /// Start a meeting
    Start { meeting_id: String },
    /// End a meeting
    End { meeting_id: String },
    /// Delete a meeting
    Delete {
        meeting_id: String,
        /// Delete permanently
        #[arg(long)]
        hard: bool,
    },
}

#[derive(Subcommand)]
enum ActivityCommands {
    /// List all activities
    List(ListActivitiesArgs),
    /// Activities you created or joined
    Mine {
        /// all, created, joined or upcoming
        #[arg(long, default_value = "all")]
        filter: String,
    },
    /// Company events, upcoming and past
    Events,
    /// Team activities
    Team,
    /// Create an activity
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Tag without prefix, e.g. team_building
        #[arg(long, default_value = "team_building")]
        kind: String,
        /// Create as a company event instead of a team activity
        #[arg(long)]
        event: bool,
        /// Date, YYYY-MM-DDTHH:MM:SS
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        max_participants: Option<u32>,
        /// Invited e-mails, comma separated
        #[arg(long)]
        invite: Option<String>,
    },
    /// Join an activity
    Join { activity_id: i64 },
    /// Leave an activity
    Leave { activity_id: i64 },
}

#[derive(Args)]
struct ListActivitiesArgs {
    #[arg(long)]
    status: Option<String>,
    #[arg(long = "type")]
    type_tag: Option<String>,
    #[arg(long)]
    creator: Option<String>,
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long)]
    offset: Option<u32>,
}

#[derive(Subcommand)]
enum TeamCommands {
    /// Employees reporting to you
    Employees {
        /// Filter by name, e-mail, role or department
        #[arg(long)]
        search: Option<String>,
    },
    /// Your teammates and manager
    Teammates,
}

#[derive(Subcommand)]
enum ManagerCommands {
    /// Generate an invitation code
    Code,
    /// Redeem a code to become a manager
    Become { code: String },
}

#[derive(Subcommand)]
enum FileCommands {
    /// List shared files
    List,
    /// Upload a file
    Upload { path: PathBuf },
    /// Download a file
    Download {
        filename: String,
        /// Destination (defaults to the file name)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Terminal stand-in for a browser: prints the meeting URL.
struct TerminalLauncher;

impl Launcher for TerminalLauncher {
    fn open_new_context(&mut self, url: &str) -> bool {
        println!("Open the meeting: {}", url);
        true
    }

    fn navigate_current(&mut self, url: &str) {
        println!("Open the meeting: {}", url);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init(),
    }

    let cli = Cli::parse();

    tracing::debug!("Gateway: {}", config.gateway_url);
    tracing::debug!("Session file: {:?}", config.session_path);

    let session = Arc::new(SessionStore::new(FileStore::open(&config.session_path)));
    let gateway = Gateway::from_config(&config, session)?;

    if let Err(e) = run(cli.command, &gateway).await {
        eprintln!("Error: {}", e);
        if matches!(e, ClientError::Unauthorized(_)) {
            eprintln!("Sign in again with `portal login`.");
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: Commands, gateway: &Gateway) -> Result<(), ClientError> {
    match command {
        Commands::Signup {
            first_name,
            last_name,
            email,
            password,
            date_of_birth,
            address,
            manager_code,
        } => {
            let password = password_or_prompt(password)?;
            let user = api::sign_up(
                gateway,
                &SignUpRequest {
                    first_name,
                    last_name,
                    email,
                    password,
                    date_of_birth,
                    address,
                    manager_code,
                },
            )
            .await?;
            println!("Welcome, {} ({})", user.display_name(), user.role);
        }

        Commands::Login { email, password } => {
            let password = password_or_prompt(password)?;
            let user = api::sign_in(gateway, &email, &password).await?;
            println!("Signed in as {} ({})", user.email, user.role);
        }

        Commands::Logout => {
            api::sign_out(gateway);
            println!("Signed out");
        }

        Commands::Whoami => match gateway.session().current() {
            Some(session) => {
                println!("{} {} <{}>", session.first_name, session.last_name, session.email);
                println!("User id: {}", session.user_id);
                println!("Role:    {}", session.role);
            }
            None => println!("Not signed in"),
        },

        Commands::Meetings(command) => {
            require_session(gateway)?;
            run_meetings(command, gateway).await?;
        }

        Commands::Activities(command) => {
            require_session(gateway)?;
            run_activities(command, gateway).await?;
        }

        Commands::Team(command) => {
            require_session(gateway)?;
            match command {
                TeamCommands::Employees { search } => {
                    let page = api::my_employees(gateway, true).await?;
                    println!("{} employees", page.employees_count);
                    for mate in page
                        .employees
                        .iter()
                        .filter(|m| search.as_deref().map_or(true, |s| m.matches(s)))
                    {
                        print_teammate(mate);
                    }
                }
                TeamCommands::Teammates => {
                    let page = api::teammates_for_display(gateway, true, true).await?;
                    if let Some(manager) = &page.manager {
                        print!("Manager: ");
                        print_teammate(manager);
                    }
                    println!("{} teammates", page.teammates_count);
                    for mate in &page.teammates {
                        print_teammate(mate);
                    }
                }
            }
        }

        Commands::Manager(command) => {
            require_session(gateway)?;
            match command {
                ManagerCommands::Code => {
                    let code = api::generate_manager_code(gateway).await?;
                    println!("Code:    {}", code.code);
                    println!("Expires: {}", code.expires_at);
                    println!("Manager: {}", code.manager_email);
                }
                ManagerCommands::Become { code } => {
                    let response = api::become_manager(gateway, &code).await?;
                    println!("{}", response.message);
                }
            }
        }

        Commands::Files(command) => {
            require_session(gateway)?;
            run_files(command, gateway).await?;
        }
    }

    Ok(())
}

async fn run_meetings(command: MeetingCommands, gateway: &Gateway) -> Result<(), ClientError> {
    match command {
        MeetingCommands::List { user_email, active } => {
            let meetings = api::list_meetings(
                gateway,
                &MeetingFilters {
                    user_email,
                    is_active: active,
                },
            )
            .await?;
            for meeting in &meetings {
                print_meeting(meeting);
            }
        }
        MeetingCommands::Mine { scope } => {
            let scope = MyMeetingsScope::from_str(&scope).ok_or_else(|| {
                ClientError::Validation(format!("Unknown meeting scope: {}", scope))
            })?;
            let mine = api::my_meetings(
                gateway,
                &MyMeetingsFilters {
                    scope: Some(scope),
                    include_details: Some(true),
                    ..Default::default()
                },
            )
            .await?;
            let (upcoming, previous) = views::split_meetings(mine.data);
            println!(
                "Created {} / invited {} / total {}",
                mine.statistics.created, mine.statistics.invited, mine.statistics.total
            );
            println!("Upcoming ({})", upcoming.len());
            upcoming.iter().for_each(print_meeting);
            println!("Previous ({})", previous.len());
            previous.iter().for_each(print_meeting);
        }
        MeetingCommands::Upcoming => {
            let upcoming = api::my_upcoming_meetings(gateway).await?;
            println!("{} upcoming", upcoming.total_count);
            upcoming.upcoming_meetings.iter().for_each(print_meeting);
        }
        MeetingCommands::Create {
            title,
            description,
            invite,
            password,
        } => {
            let meeting = api::create_meeting(
                gateway,
                &NewMeeting {
                    description,
                    invited_employees: invite.as_deref().map(api::parse_email_list),
                    password,
                    ..NewMeeting::new(title)
                },
            )
            .await?;
            print_meeting(&meeting);
        }
        MeetingCommands::Join {
            meeting_id,
            password,
        } => {
            let mut flow = JoinMeetingFlow::new();
            let mut launcher = TerminalLauncher;
            flow.prompt(meeting_id);
            let password = password_or_prompt(password)?;
            flow.submit(gateway, &password, &mut launcher).await?;
        }
        MeetingCommands::Start { meeting_id } => {
            api::start_meeting(gateway, &meeting_id).await?;
            println!("Meeting {} started", meeting_id);
        }
        MeetingCommands::End { meeting_id } => {
            api::end_meeting(gateway, &meeting_id).await?;
            println!("Meeting {} ended", meeting_id);
        }
        MeetingCommands::Delete { meeting_id, hard } => {
            let deletion = if hard {
                api::hard_delete_meeting(gateway, &meeting_id).await?
            } else {
                api::delete_meeting(gateway, &meeting_id).await?
            };
            println!("{}", deletion.message);
        }
    }
    Ok(())
}

async fn run_activities(command: ActivityCommands, gateway: &Gateway) -> Result<(), ClientError> {
    let email = gateway.session().current().map(|s| s.email).unwrap_or_default();

    match command {
        ActivityCommands::List(args) => {
            let page = api::list_activities(
                gateway,
                &ActivityFilters {
                    status: args.status,
                    type_tag: args.type_tag,
                    creator: args.creator,
                    limit: args.limit,
                    offset: args.offset,
                    ..Default::default()
                },
            )
            .await?;
            println!("{} activities", page.total);
            for activity in &page.activities {
                print_activity(activity, &email);
            }
        }
        ActivityCommands::Mine { filter } => {
            let filter = MyActivitiesFilter::from_str(&filter).ok_or_else(|| {
                ClientError::Validation(format!("Unknown activity filter: {}", filter))
            })?;
            for activity in &api::my_activities(gateway, filter).await? {
                print_activity(activity, &email);
            }
        }
        ActivityCommands::Events => {
            let events = views::company_events(api::my_activities(gateway, MyActivitiesFilter::All).await?);
            let (upcoming, past) = views::split_by_date(events, chrono::Utc::now());
            println!("Upcoming events ({})", upcoming.len());
            upcoming.iter().for_each(|a| print_activity(a, &email));
            println!("Past events ({})", past.len());
            past.iter().for_each(|a| print_activity(a, &email));
        }
        ActivityCommands::Team => {
            let team = views::team_activities(api::my_activities(gateway, MyActivitiesFilter::All).await?);
            for activity in &team {
                print_activity(activity, &email);
            }
        }
        ActivityCommands::Create {
            title,
            description,
            kind,
            event,
            date,
            location,
            max_participants,
            invite,
        } => {
            let kind = if event {
                ActivityKind::Event(kind)
            } else {
                ActivityKind::Team(kind)
            };
            let date = date
                .map(|d| {
                    views::parse_activity_date(&d)
                        .map(|parsed| portal_client::models::format_activity_date(parsed.naive_utc()))
                        .ok_or_else(|| ClientError::Validation(format!("Invalid date: {}", d)))
                })
                .transpose()?;
            let activity = NewActivity {
                description,
                kind: Some(kind),
                date,
                status: Some("scheduled".to_string()),
                location,
                max_participants,
                ..NewActivity::new(title)
            };
            let emails = invite.as_deref().map(api::parse_email_list).unwrap_or_default();
            let created = api::create_activity_with_participants(gateway, &activity, &emails).await?;
            print_activity(&created, &email);
        }
        ActivityCommands::Join { activity_id } => {
            let message = api::join_activity(gateway, activity_id).await?;
            println!("{}", message.unwrap_or_else(|| "Joined".to_string()));
        }
        ActivityCommands::Leave { activity_id } => {
            let message = api::leave_activity(gateway, activity_id).await?;
            println!("{}", message.unwrap_or_else(|| "Left".to_string()));
        }
    }
    Ok(())
}

async fn run_files(command: FileCommands, gateway: &Gateway) -> Result<(), ClientError> {
    match command {
        FileCommands::List => {
            for file in api::list_files(gateway).await? {
                println!("{}", file.filename);
            }
        }
        FileCommands::Upload { path } => {
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| ClientError::Validation(format!("Not a file: {:?}", path)))?;
            let contents = tokio::fs::read(&path)
                .await
                .map_err(|e| ClientError::Validation(format!("Cannot read {:?}: {}", path, e)))?;
            let file = api::upload_file(gateway, &filename, contents).await?;
            println!("Uploaded {} ({})", file.filename, file.display_size());
        }
        FileCommands::Download { filename, output } => {
            let contents = api::download_file(gateway, &filename).await?;
            let output = output.unwrap_or_else(|| PathBuf::from(&filename));
            tokio::fs::write(&output, &contents)
                .await
                .map_err(|e| ClientError::Validation(format!("Cannot write {:?}: {}", output, e)))?;
            println!("Saved {} bytes to {:?}", contents.len(), output);
        }
    }
    Ok(())
}

fn require_session(gateway: &Gateway) -> Result<(), ClientError> {
    if gateway.session().is_authenticated() {
        Ok(())
    } else {
        Err(ClientError::Unauthorized("Not signed in".to_string()))
    }
}

fn password_or_prompt(password: Option<String>) -> Result<String, ClientError> {
    match password {
        Some(password) => Ok(password),
        None => rpassword::prompt_password("Password: ")
            .map_err(|e| ClientError::Validation(format!("Failed to read password: {}", e))),
    }
}

fn print_meeting(meeting: &portal_client::models::Meeting) {
    let lock = if meeting.has_password { " [password]" } else { "" };
    println!(
        "  {:<12} {}{}  by {}",
        meeting.meeting_id, meeting.title, lock, meeting.created_by
    );
}

fn print_activity(activity: &portal_client::models::Activity, email: &str) {
    let joined = if activity.is_joined_by(email) { "*" } else { " " };
    println!(
        "{} {:>5}  {:<30} {:<16} {}",
        joined,
        activity.id,
        activity.title,
        activity.kind().label(),
        activity.when().unwrap_or("-")
    );
}

fn print_teammate(mate: &portal_client::models::Teammate) {
    println!(
        "  {:<24} {:<32} {} {}",
        mate.full_name(),
        mate.email,
        mate.role,
        mate.department.as_deref().unwrap_or("")
    );
}
