//! `events-cli`: command-line front end for the city events API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, eyre};
use futures_util::future::join;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use events_client::api::handle_api_error;
use events_client::config::ClientSettings;
use events_client::domain::{
    ApiResult, AvatarUpload, EventFilter, EventOrdering, EventSummary, LoginCredentials,
    MyEventsType, NewReview, PasswordChange, ProfileUpdate, RegistrationPayload, Route,
};
use events_client::session::GuardDecision;
use events_client::{ApiClient, AuthService, Connection, connect};

/// `events-cli` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "events-cli",
    about = "Browse, filter, and review city events from the terminal",
    version
)]
struct Cli {
    /// API base URL. Overrides `EVENTS_CLIENT_API_URL`.
    #[arg(long = "api-url", value_name = "url", global = true)]
    api_url: Option<String>,
    /// Session storage directory. Overrides `EVENTS_CLIENT_STORAGE_DIR`.
    #[arg(long = "storage-dir", value_name = "path", global = true)]
    storage_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in with a username or email.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account.
    Register(RegisterArgs),
    /// Sign out and forget the stored session.
    Logout,
    /// Show the signed-in user.
    Whoami {
        /// Fetch the profile from the backend and store it.
        #[arg(long)]
        refresh: bool,
    },
    /// Browse events.
    #[command(subcommand)]
    Events(EventsCommand),
    /// Load events and categories side by side.
    Overview,
    /// List categories.
    Categories,
    /// Read and write reviews.
    #[command(subcommand)]
    Reviews(ReviewsCommand),
    /// Read notifications.
    #[command(subcommand)]
    Notifications(NotificationsCommand),
    /// Edit the signed-in user's profile.
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Change or reset a password.
    #[command(subcommand)]
    Password(PasswordCommand),
}

#[derive(Debug, Args)]
struct RegisterArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    #[arg(long = "password-confirm")]
    password_confirm: String,
    #[arg(long, default_value = "")]
    city: String,
    /// Sign in right after registering.
    #[arg(long)]
    login: bool,
}

#[derive(Debug, Subcommand)]
enum EventsCommand {
    /// Search and filter events.
    List(ListArgs),
    /// Show one event.
    Show { slug: String },
    /// Toggle the "interested" mark.
    Interested { slug: String },
    /// Toggle the "going" mark.
    Going { slug: String },
    /// Events you marked.
    Mine {
        #[arg(long = "type", value_enum, default_value_t = MineType::All)]
        kind: MineType,
    },
    /// Editorial picks.
    Featured,
}

#[derive(Debug, Args)]
struct ListArgs {
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    city: Option<String>,
    /// Category slug.
    #[arg(long)]
    category: Option<String>,
    #[arg(long, value_name = "YYYY-MM-DD")]
    from: Option<NaiveDate>,
    #[arg(long, value_name = "YYYY-MM-DD")]
    to: Option<NaiveDate>,
    #[arg(long, conflicts_with = "paid")]
    free: bool,
    #[arg(long)]
    paid: bool,
    #[arg(long, value_enum)]
    order: Option<Order>,
    /// Include events that already started.
    #[arg(long)]
    past: bool,
    #[arg(long)]
    page: Option<u32>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MineType {
    All,
    Interested,
    Going,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Order {
    Soonest,
    Latest,
    Newest,
    Popular,
}

#[derive(Debug, Subcommand)]
enum ReviewsCommand {
    /// Approved reviews of an event.
    List { event: u64 },
    /// Review an event.
    Add {
        event: u64,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        text: String,
    },
}

#[derive(Debug, Subcommand)]
enum NotificationsCommand {
    /// All notifications.
    List,
    /// Unread counter.
    Unread,
    /// Mark one notification as read.
    Read { id: u64 },
    /// Mark every notification as read.
    ReadAll,
}

#[derive(Debug, Subcommand)]
enum ProfileCommand {
    /// Update profile fields.
    Update {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        city: Option<String>,
        /// Comma-separated interests.
        #[arg(long)]
        interests: Option<String>,
    },
    /// Upload an avatar image.
    Avatar {
        path: PathBuf,
        #[arg(long = "content-type", default_value = "image/png")]
        content_type: String,
    },
}

#[derive(Debug, Subcommand)]
enum PasswordCommand {
    /// Change the signed-in user's password.
    Change {
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
    /// Email a reset link.
    Reset {
        #[arg(long)]
        email: String,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    let mut settings = ClientSettings::load_from_iter([OsString::from("events-cli")])
        .wrap_err("load configuration")?;
    if cli.api_url.is_some() {
        settings.api_url = cli.api_url;
    }
    if cli.storage_dir.is_some() {
        settings.storage_dir = cli.storage_dir;
    }

    let Connection {
        client,
        mut navigation,
    } = connect(&settings).wrap_err("connect to events API")?;
    let outcome = run(&client, cli.command).await;

    while let Ok(route) = navigation.try_recv() {
        if route == Route::Login {
            eprintln!("Your session has ended. Run `events-cli login` to sign in again.");
        }
    }
    outcome
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
    let auth = AuthService::new(client);
    match command {
        Command::Login { username, password } => {
            let credentials = LoginCredentials::try_from_parts(&username, &password)?;
            let outcome = auth
                .login(&credentials)
                .await
                .map_err(|err| eyre!(err.user_message()))?;
            println!("Signed in as {}", outcome.user.username);
        }
        Command::Register(args) => register(&auth, args).await?,
        Command::Logout => {
            auth.logout().await.wrap_err("clear local session")?;
            println!("Signed out");
        }
        Command::Whoami { refresh } => whoami(client, refresh).await?,
        Command::Events(command) => events(client, command).await?,
        Command::Overview => overview(client).await?,
        Command::Categories => {
            for category in api(client.categories().list().await)?.into_items() {
                println!("{:<20} {}", category.slug, category.name);
            }
        }
        Command::Reviews(command) => reviews(client, command).await?,
        Command::Notifications(command) => notifications(client, command).await?,
        Command::Profile(command) => profile(client, command).await?,
        Command::Password(command) => password(client, command).await?,
    }
    Ok(())
}

async fn register(auth: &AuthService, args: RegisterArgs) -> Result<()> {
    let payload = RegistrationPayload::try_new(
        &args.username,
        &args.email,
        &args.password,
        &args.password_confirm,
        &args.city,
    )?;
    if args.login {
        let outcome = auth
            .register_and_login(&payload)
            .await
            .map_err(|err| eyre!(err.user_message()))?;
        println!("Registered and signed in as {}", outcome.user.username);
        return Ok(());
    }
    let response = auth
        .register(&payload)
        .await
        .map_err(|err| eyre!(err.user_message()))?;
    match response.detail {
        Some(detail) => println!("Registered: {detail}"),
        None => println!("Registered. Run `events-cli login` to sign in."),
    }
    Ok(())
}

async fn whoami(client: &ApiClient, refresh: bool) -> Result<()> {
    let session = client.session();
    require_session(client, Route::Profile)?;
    if refresh {
        let user = api(client.users().me().await)?;
        session.update_user(user)?;
    }
    let Some(user) = session.user() else {
        return Err(eyre!("not signed in"));
    };
    println!("{} <{}>", user.username, user.email);
    if !user.city.is_empty() {
        println!("city: {}", user.city);
    }
    let interests = user.interests_list();
    if !interests.is_empty() {
        println!("interests: {}", interests.join(", "));
    }
    Ok(())
}

async fn events(client: &ApiClient, command: EventsCommand) -> Result<()> {
    let events = client.events();
    match command {
        EventsCommand::List(args) => {
            let listing = api(events.list(&filter_from(args)).await)?;
            print_events(listing.items());
            if let Some(page) = listing.page() {
                println!("{} events in total", page.count);
            }
        }
        EventsCommand::Show { slug } => {
            let event = api(events.get(&slug).await)?;
            println!("{}", event.title);
            println!("{} {}", event.start_date, event.venue_name);
            println!("{}, {}", event.address, event.city);
            if !event.description.is_empty() {
                println!();
                println!("{}", event.description);
            }
        }
        EventsCommand::Interested { slug } => {
            require_session(client, Route::MyEvents)?;
            let toggle = api(events.mark_interested(&slug).await)?;
            println!("interested: {toggle:?}");
        }
        EventsCommand::Going { slug } => {
            require_session(client, Route::MyEvents)?;
            let toggle = api(events.mark_going(&slug).await)?;
            println!("going: {toggle:?}");
        }
        EventsCommand::Mine { kind } => {
            require_session(client, Route::MyEvents)?;
            let kind = match kind {
                MineType::All => MyEventsType::All,
                MineType::Interested => MyEventsType::Interested,
                MineType::Going => MyEventsType::Going,
            };
            print_events(api(events.my_events(kind).await)?.items());
        }
        EventsCommand::Featured => print_events(api(events.featured().await)?.items()),
    }
    Ok(())
}

async fn overview(client: &ApiClient) -> Result<()> {
    let filter = EventFilter::default();
    let events_api = client.events();
    let categories_api = client.categories();
    let (events, categories) = join(events_api.list(&filter), categories_api.list()).await;

    match categories {
        Ok(categories) => {
            let names: Vec<_> = categories
                .items()
                .iter()
                .map(|category| category.name.as_str())
                .collect();
            println!("categories: {}", names.join(", "));
        }
        Err(err) => eprintln!("categories unavailable: {}", handle_api_error(&err)),
    }
    match events {
        Ok(events) => print_events(events.items()),
        Err(err) => eprintln!("events unavailable: {}", handle_api_error(&err)),
    }
    Ok(())
}

async fn reviews(client: &ApiClient, command: ReviewsCommand) -> Result<()> {
    match command {
        ReviewsCommand::List { event } => {
            for review in api(client.reviews().list_for_event(event).await)?.into_items() {
                println!("{}/5 {}: {}", review.rating, review.user_username, review.text);
            }
        }
        ReviewsCommand::Add {
            event,
            rating,
            text,
        } => {
            require_session(client, Route::Profile)?;
            let review = NewReview::try_new(event, rating, &text)?;
            api(client.reviews().create(&review).await)?;
            println!("Review submitted for moderation");
        }
    }
    Ok(())
}

async fn notifications(client: &ApiClient, command: NotificationsCommand) -> Result<()> {
    require_session(client, Route::Profile)?;
    let notifications = client.notifications();
    match command {
        NotificationsCommand::List => {
            for notification in api(notifications.list().await)?.into_items() {
                let marker = if notification.is_read { ' ' } else { '*' };
                println!("{marker} [{}] {}", notification.id, notification.title);
            }
        }
        NotificationsCommand::Unread => {
            println!("{}", api(notifications.unread_count().await)?.count);
        }
        NotificationsCommand::Read { id } => {
            api(notifications.mark_as_read(id).await)?;
        }
        NotificationsCommand::ReadAll => api(notifications.mark_all_read().await)?,
    }
    Ok(())
}

async fn profile(client: &ApiClient, command: ProfileCommand) -> Result<()> {
    require_session(client, Route::Profile)?;
    let user = match command {
        ProfileCommand::Update {
            email,
            city,
            interests,
        } => {
            let update = ProfileUpdate {
                email,
                city,
                interests,
                ..ProfileUpdate::default()
            };
            api(client.users().update_profile(&update).await)?
        }
        ProfileCommand::Avatar { path, content_type } => {
            let (bytes, file_name) = read_file(&path)?;
            let avatar = AvatarUpload::try_new(file_name, content_type, bytes)?;
            api(client.users().upload_avatar(avatar).await)?
        }
    };
    client.session().update_user(user)?;
    println!("Profile updated");
    Ok(())
}

async fn password(client: &ApiClient, command: PasswordCommand) -> Result<()> {
    match command {
        PasswordCommand::Change { new, confirm } => {
            require_session(client, Route::Profile)?;
            let change = PasswordChange::try_new(&new, &confirm)?;
            api(client.auth().change_password(&change).await)?;
            println!("Password changed");
        }
        PasswordCommand::Reset { email } => {
            api(client.auth().reset_password(&email).await)?;
            println!("If the address is registered, a reset link is on its way");
        }
    }
    Ok(())
}

fn require_session(client: &ApiClient, route: Route) -> Result<()> {
    match client.session().guard(&route) {
        GuardDecision::Allow => Ok(()),
        GuardDecision::Redirect(Route::Login) => {
            Err(eyre!("sign in first with `events-cli login`"))
        }
        GuardDecision::Redirect(other) => Err(eyre!("not available here; go to {}", other.path())),
    }
}

fn filter_from(args: ListArgs) -> EventFilter {
    let mut filter = EventFilter::default().dates(args.from, args.to);
    if let Some(search) = args.search {
        filter = filter.search(search);
    }
    if let Some(city) = args.city {
        filter = filter.city(city);
    }
    if let Some(category) = args.category {
        filter = filter.category(category);
    }
    if args.free {
        filter = filter.free(true);
    } else if args.paid {
        filter = filter.free(false);
    }
    if let Some(order) = args.order {
        filter = filter.ordering(match order {
            Order::Soonest => EventOrdering::StartDate,
            Order::Latest => EventOrdering::StartDateDesc,
            Order::Newest => EventOrdering::Newest,
            Order::Popular => EventOrdering::MostViewed,
        });
    }
    if args.past {
        filter = filter.include_past();
    }
    if let Some(page) = args.page {
        filter = filter.page(page);
    }
    filter
}

fn print_events(events: &[EventSummary]) {
    if events.is_empty() {
        println!("No events found");
        return;
    }
    for event in events {
        let price = if event.is_free {
            "free".to_owned()
        } else {
            event
                .price_min
                .clone()
                .unwrap_or_else(|| "paid".to_owned())
        };
        println!(
            "{} {:<40} {:<16} {:<8} {}",
            event.start_date, event.title, event.city, price, event.slug
        );
    }
}

fn api<T>(result: ApiResult<T>) -> Result<T> {
    result.map_err(|err| eyre!(handle_api_error(&err)))
}

fn read_file(path: &Path) -> Result<(Vec<u8>, String)> {
    use cap_std::{ambient_authority, fs::Dir};

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| eyre!("{} has no file name", path.display()))?
        .to_owned();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let directory = Dir::open_ambient_dir(parent, ambient_authority())
        .wrap_err_with(|| format!("open {}", parent.display()))?;
    let bytes = directory
        .read(&file_name)
        .wrap_err_with(|| format!("read {}", path.display()))?;
    Ok((bytes, file_name))
}
