use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

use momentum_notify::adapters::{HttpNotificationsApi, LogHost, TokioTimeProvider};
use momentum_notify::config::{self, AppConfig, FileConfig};
use momentum_notify::error::ConfigError;
use momentum_notify::inbox::{InboxPoller, MarkReadFailurePolicy, NotificationInbox, UnreadCounter};
use momentum_notify::push::{self, PushDeliveryAgent};
use momentum_notify::session::Session;
use momentum_notify::types::push::{PushSubscription, SubscriptionKeys};

pub(crate) async fn run() -> i32 {
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return 2;
        }
    };
    let session = Session::from_raw(cli.token.clone());

    match cli.command {
        Command::Init(args) => run_init(args),
        Command::Watch => run_watch(&config, session).await,
        Command::List => run_list(&config, session).await,
        Command::Read(args) => run_read(&config, session, args).await,
        Command::SendTest(args) => run_send_test(&config, args).await,
        Command::PreviewPush(args) => run_preview_push(&config, args).await,
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "momentum-notify",
    version,
    about = "Notification inbox and push tooling for the Momentum portal"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    #[arg(long, global = true, env = "MOMENTUM_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, global = true, env = "MOMENTUM_API_URL")]
    api_url: Option<String>,
    #[arg(long, global = true, env = "MOMENTUM_TOKEN", hide_env_values = true)]
    token: Option<String>,
    #[arg(long, global = true, env = "MOMENTUM_VAPID_PUBLIC_KEY")]
    vapid_public_key: Option<String>,
    #[arg(
        long,
        global = true,
        env = "MOMENTUM_VAPID_PRIVATE_KEY",
        hide_env_values = true
    )]
    vapid_private_key: Option<String>,
    #[arg(long, global = true, env = "MOMENTUM_VAPID_SUBJECT")]
    vapid_subject: Option<String>,
    #[arg(long, global = true, env = "MOMENTUM_POLL_INTERVAL")]
    poll_interval: Option<String>,
    #[arg(long, global = true, env = "MOMENTUM_NOTIFICATION_ICON")]
    notification_icon: Option<String>,
    #[arg(long, global = true, value_enum)]
    mark_read_failure: Option<MarkReadFailurePolicy>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a VAPID key pair.
    Init(InitArgs),
    /// Poll the unread count until interrupted.
    Watch,
    /// Print the notification list.
    List,
    /// Mark one notification as read.
    Read(ReadArgs),
    /// Send a test push to one subscription.
    SendTest(SendTestArgs),
    /// Show how the delivery agent would display a push payload.
    PreviewPush(PreviewPushArgs),
}

#[derive(Args, Debug)]
struct InitArgs {
    #[arg(long)]
    subject: Option<String>,
}

#[derive(Args, Debug)]
struct ReadArgs {
    id: i64,
    redirect_url: String,
}

#[derive(Args, Debug)]
struct SendTestArgs {
    #[arg(long)]
    endpoint: String,
    #[arg(long)]
    p256dh: String,
    #[arg(long)]
    auth: String,
    #[arg(long)]
    message: Option<String>,
    #[arg(long, default_value = "/")]
    url: String,
}

#[derive(Args, Debug)]
struct PreviewPushArgs {
    /// Raw payload; omit to preview a push without data.
    payload: Option<String>,
    /// Also simulate a click on the notification.
    #[arg(long)]
    click: bool,
}

fn resolve_config(cli: &Cli) -> Result<AppConfig, ConfigError> {
    let mut config = AppConfig::default();
    if let Some(path) = cli.config.as_deref() {
        FileConfig::load(path)?.apply(&mut config)?;
    }

    if let Some(api_url) = cli.api_url.as_deref() {
        config.api_url = config::parse_api_url(api_url)?;
    }
    if let Some(key) = cli.vapid_public_key.as_deref() {
        config.vapid_public_key = key.trim().to_string();
    }
    if let Some(key) = cli.vapid_private_key.as_deref() {
        config.vapid_private_key = Some(key.trim().to_string());
    }
    if let Some(subject) = cli.vapid_subject.as_deref() {
        config.vapid_subject = Some(subject.trim().to_string());
    }
    if let Some(raw) = cli.poll_interval.as_deref() {
        config.poll_interval = config::parse_interval(raw)?;
    }
    if let Some(icon) = cli.notification_icon.as_deref() {
        config.notification_icon = icon.to_string();
    }
    if let Some(policy) = cli.mark_read_failure {
        config.mark_read_failure = policy;
    }

    push::vapid::decode_application_server_key(&config.vapid_public_key)
        .map_err(|err| ConfigError::Invalid(format!("invalid VAPID public key: {err}")))?;

    Ok(config)
}

fn run_init(args: InitArgs) -> i32 {
    let credentials = match momentum_notify::generate_vapid_credentials() {
        Ok(credentials) => credentials,
        Err(err) => {
            eprintln!("failed to generate VAPID credentials: {err}");
            return 1;
        }
    };
    let (subject, show_subject_note) = match args.subject {
        Some(subject) => (subject, false),
        None => ("mailto:you@example.com".to_string(), true),
    };

    println!("VAPID credentials generated.");
    println!();
    println!("MOMENTUM_VAPID_PRIVATE_KEY=\"{}\"", credentials.private_key);
    println!("MOMENTUM_VAPID_PUBLIC_KEY=\"{}\"", credentials.public_key);
    println!("MOMENTUM_VAPID_SUBJECT=\"{subject}\"");
    if show_subject_note {
        println!();
        println!("Note: replace MOMENTUM_VAPID_SUBJECT with a contact URI you control.");
    }
    0
}

async fn run_watch(config: &AppConfig, session: Session) -> i32 {
    if session.token().is_none() {
        warn!("no token configured; polling will not reach the backend");
    }

    let counter = UnreadCounter::default();
    let poller = InboxPoller::new(
        HttpNotificationsApi::new(config.api_url.clone()),
        TokioTimeProvider,
        LogHost,
        session,
        counter.clone(),
        config.poll_interval,
    );
    info!(api_url = %config.api_url, interval = ?config.poll_interval, "watching notifications");
    let handle = poller.start();

    if let Err(err) = tokio::signal::ctrl_c().await {
        eprintln!("failed to wait for ctrl-c: {err}");
        return 1;
    }
    handle.stop();
    info!(unread = counter.get(), "stopped watching");
    0
}

fn inbox(config: &AppConfig, session: Session) -> NotificationInbox<HttpNotificationsApi, LogHost> {
    NotificationInbox::new(
        HttpNotificationsApi::new(config.api_url.clone()),
        LogHost,
        session,
        UnreadCounter::default(),
        config.mark_read_failure,
    )
}

async fn run_list(config: &AppConfig, session: Session) -> i32 {
    if session.token().is_none() {
        eprintln!("error: --token is required");
        return 2;
    }

    match inbox(config, session).fetch_list().await {
        Ok(notifications) => {
            if notifications.is_empty() {
                println!("No notifications yet.");
            }
            for notification in notifications {
                let marker = if notification.read { ' ' } else { '*' };
                println!(
                    "{marker} {:>6}  {}  {} -> {}",
                    notification.id,
                    notification.created_at,
                    notification.message,
                    notification.redirect_url
                );
            }
            0
        }
        Err(err) => {
            eprintln!("failed to fetch notifications: {err}");
            1
        }
    }
}

async fn run_read(config: &AppConfig, session: Session, args: ReadArgs) -> i32 {
    if session.token().is_none() {
        eprintln!("error: --token is required");
        return 2;
    }

    let inbox = inbox(config, session);
    if let Some(request) = inbox.mark_read(args.id, &args.redirect_url)
        && let Err(err) = request.await
    {
        eprintln!("mark-read task failed: {err}");
        return 1;
    }
    0
}

async fn run_send_test(config: &AppConfig, args: SendTestArgs) -> i32 {
    if args.endpoint.trim().is_empty() || args.p256dh.trim().is_empty() || args.auth.trim().is_empty()
    {
        eprintln!("error: endpoint, p256dh, and auth are required");
        return 2;
    }

    let message = args
        .message
        .as_deref()
        .unwrap_or("Test notification from Momentum")
        .trim();
    if message.is_empty() {
        eprintln!("error: message must not be empty");
        return 2;
    }

    let Some(dispatcher) = push::web_push_dispatcher(config) else {
        eprintln!("error: push notifications are not configured");
        return 1;
    };

    let subscription = PushSubscription {
        endpoint: args.endpoint,
        expiration_time: None,
        keys: SubscriptionKeys {
            p256dh: args.p256dh,
            auth: args.auth,
        },
    };

    match dispatcher
        .send_notification(std::slice::from_ref(&subscription), message, &args.url)
        .await
    {
        Ok(report) if report.failed == 0 => {
            println!("sent");
            0
        }
        Ok(_) => {
            eprintln!("failed to send test notification");
            1
        }
        Err(err) => {
            eprintln!("failed to encode payload: {err}");
            1
        }
    }
}

async fn run_preview_push(config: &AppConfig, args: PreviewPushArgs) -> i32 {
    let agent = PushDeliveryAgent::new(
        LogHost,
        LogHost,
        config.notification_icon.clone(),
        config.push_title.clone(),
    );

    let data = args.payload.as_deref().map(str::as_bytes);
    let displayed = match agent.handle_push(data).await {
        Ok(displayed) => displayed,
        Err(err) => match err {},
    };
    println!("{}: {}", displayed.title, displayed.options.body);
    println!("opens {}", displayed.options.data.url);

    if args.click {
        match agent.handle_click(&displayed).await {
            Ok(()) => {}
            Err(err) => match err {},
        }
    }
    0
}
