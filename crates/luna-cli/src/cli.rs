use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "luna-pass",
    about = "Luna Pass -- an encrypted, versioned password store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the database file
    #[arg(long, global = true, value_name = "DB_FILE")]
    pub db: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add an entry
    Add(AddArgs),
    /// Update an existing entry
    Update(UpdateArgs),
    /// Retrieve an entry
    Get(GetArgs),
    /// Show every version of an entry, newest first
    History(HistoryArgs),
    /// List entries
    List(ListArgs),
    /// Assign a new ID to an entry
    Rename(RenameArgs),
    /// Delete an entry and its history
    Delete(DeleteArgs),
    /// Edit the note
    Note,
    /// Migrate a legacy database to the keyring scheme
    Migrate,
}

#[derive(Args)]
pub struct PropertyArgs {
    /// Set properties on the entry, e.g. `-p user=bob`
    #[arg(short = 'p', long = "property", value_name = "KEY=VALUE", num_args = 1..)]
    pub properties: Vec<String>,

    /// Secret property keys to ask for
    #[arg(short = 's', long = "secret", value_name = "KEY", num_args = 1..)]
    pub secrets: Vec<String>,
}

#[derive(Args)]
pub struct AddArgs {
    pub id: String,
    #[command(flatten)]
    pub props: PropertyArgs,
}

#[derive(Args)]
pub struct UpdateArgs {
    pub id: String,
    #[command(flatten)]
    pub props: PropertyArgs,
    /// Keys to delete
    #[arg(short = 'd', long = "delete", value_name = "KEY", num_args = 1..)]
    pub delete: Vec<String>,
}

#[derive(Args)]
pub struct GetArgs {
    pub id: String,
}

#[derive(Args)]
pub struct HistoryArgs {
    pub id: String,
}

#[derive(Args)]
pub struct ListArgs {
    pub search: Option<String>,
}

#[derive(Args)]
pub struct RenameArgs {
    pub id: String,
    pub new_id: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_with_properties_and_secrets() {
        let cli = Cli::try_parse_from([
            "luna-pass", "add", "site", "-p", "user=bob", "url=x.com", "-s", "password",
        ])
        .unwrap();
        let Command::Add(args) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(args.id, "site");
        assert_eq!(args.props.properties, vec!["user=bob", "url=x.com"]);
        assert_eq!(args.props.secrets, vec!["password"]);
    }

    #[test]
    fn parses_update_deletes() {
        let cli = Cli::try_parse_from(["luna-pass", "update", "site", "-d", "pin", "-d", "url"]).unwrap();
        let Command::Update(args) = cli.command else {
            panic!("expected update");
        };
        assert_eq!(args.delete, vec!["pin", "url"]);
    }

    #[test]
    fn global_db_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["luna-pass", "list", "--db", "/tmp/x.db", "-v"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
        assert!(cli.verbose);
    }

    #[test]
    fn rename_needs_two_ids() {
        assert!(Cli::try_parse_from(["luna-pass", "rename", "a"]).is_err());
    }
}
