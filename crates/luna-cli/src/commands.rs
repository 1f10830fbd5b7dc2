use colored::Colorize;
use luna_migrate::MigrationOutcome;
use luna_records::{CachingProvider, Props};

use crate::cli::*;
use crate::config::LunaConfig;
use crate::note::{edit_note, NoteOutcome};
use crate::paths;
use crate::prompt::{prompt_secret, TerminalPassphrase};
use crate::props::collect_props;
use crate::session::{self, Session};

pub async fn run_command(cli: Cli, config: LunaConfig) -> anyhow::Result<()> {
    let db_path = paths::resolve_db_path(
        cli.db.as_deref(),
        std::env::var_os(paths::DB_ENV),
        &config,
    )?;
    let provider = CachingProvider::new(TerminalPassphrase);

    // Command-line props are validated, and secrets asked for, before the
    // database is touched.
    let pending = match &cli.command {
        Command::Add(args) => Some(collect_props(&args.props, prompt_secret)?),
        Command::Update(args) => Some(collect_props(&args.props, prompt_secret)?),
        _ => None,
    };

    let session = session::open(&db_path, &provider).await?;
    report_migration(&session);

    match cli.command {
        Command::Add(args) => cmd_add(&session, args, pending.unwrap_or_default()).await,
        Command::Update(args) => cmd_update(&session, args, pending.unwrap_or_default()).await,
        Command::Get(args) => cmd_get(&session, args).await,
        Command::History(args) => cmd_history(&session, args).await,
        Command::List(args) => cmd_list(&session, args).await,
        Command::Rename(args) => cmd_rename(&session, args).await,
        Command::Delete(args) => cmd_delete(&session, args).await,
        Command::Note => cmd_note(&session, &config).await,
        Command::Migrate => cmd_migrate(&session),
    }
}

fn report_migration(session: &Session) {
    if let Some(MigrationOutcome::Migrated(report)) = &session.migration {
        println!("Backup made at {}", report.backup.display().to_string().bold());
        println!(
            "{} Migrated {} entries ({} versions); verification passed",
            "✓".green().bold(),
            report.entries,
            report.versions
        );
    }
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn print_props(props: &Props) {
    for (key, value) in props {
        println!("{}: {}", capitalize(key).bold(), value);
    }
}

async fn cmd_add(session: &Session, args: AddArgs, props: Props) -> anyhow::Result<()> {
    session.store.add(&args.id, props).await?;
    println!("{} Added {}", "✓".green().bold(), args.id.yellow());
    Ok(())
}

async fn cmd_update(session: &Session, args: UpdateArgs, props: Props) -> anyhow::Result<()> {
    session.store.update(&args.id, props, &args.delete).await?;
    println!("{} Updated {}", "✓".green().bold(), args.id.yellow());
    Ok(())
}

async fn cmd_get(session: &Session, args: GetArgs) -> anyhow::Result<()> {
    print_props(&session.store.get_props(&args.id).await?);
    Ok(())
}

async fn cmd_history(session: &Session, args: HistoryArgs) -> anyhow::Result<()> {
    let history = session.store.history(&args.id).await?;
    let total = history.len();
    for (generation, version) in history.iter().enumerate() {
        if generation > 0 {
            println!();
        }
        println!("{}", format!("Version {}/{}", total - generation, total).yellow().bold());
        print_props(&version.props);
    }
    Ok(())
}

async fn cmd_list(session: &Session, args: ListArgs) -> anyhow::Result<()> {
    let search = args.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
    for id in session.store.list(search).await? {
        println!("{id}");
    }
    Ok(())
}

async fn cmd_rename(session: &Session, args: RenameArgs) -> anyhow::Result<()> {
    session.store.rename(&args.id, &args.new_id).await?;
    println!("{} Renamed {} → {}", "✓".green().bold(), args.id.yellow(), args.new_id.yellow());
    Ok(())
}

async fn cmd_delete(session: &Session, args: DeleteArgs) -> anyhow::Result<()> {
    session.store.delete(&args.id).await?;
    println!("{} Deleted {}", "✓".green().bold(), args.id.yellow());
    Ok(())
}

async fn cmd_note(session: &Session, config: &LunaConfig) -> anyhow::Result<()> {
    match edit_note(&session.store, &config.editor()).await? {
        NoteOutcome::Saved => println!("{} Note saved", "✓".green().bold()),
        NoteOutcome::Unchanged => println!("No change"),
    }
    Ok(())
}

fn cmd_migrate(session: &Session) -> anyhow::Result<()> {
    match &session.migration {
        Some(MigrationOutcome::Migrated(_)) => {}
        Some(MigrationOutcome::NothingToMigrate) => println!("Nothing to migrate."),
        Some(MigrationOutcome::AlreadyMigrated) | None => {
            println!("{} is up to date.", session.db_path.display().to_string().bold())
        }
    }
    Ok(())
}
