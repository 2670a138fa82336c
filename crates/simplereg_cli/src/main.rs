//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `simplereg_core` linkage and print the attribute vocabulary.
//! - Optionally apply a JSON attribute bag to a fresh account.
//!
//! Usage: `simplereg [BAG_PATH] [--db PATH]`

use clap::Parser;
use simplereg_core::db::{open_db, open_db_in_memory};
use simplereg_core::{
    core_version, init_logging_with, supported_attribute_keys, AttributeBag, LogConfig,
    RegistrationService, SqliteAccountRepository,
};
use std::error::Error;
use std::path::PathBuf;

/// Applies a simple-registration attribute bag to a fresh account.
#[derive(Debug, Parser)]
#[command(name = "simplereg", version, about, long_about = None)]
struct CliArgs {
    /// JSON object of provider attributes (string or null values).
    bag_path: Option<PathBuf>,
    /// SQLite database file; an in-memory database is used when omitted.
    #[arg(long)]
    db: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    if let Some(config) = LogConfig::from_env()? {
        init_logging_with(&config)?;
    }

    let args = CliArgs::parse();

    println!("simplereg_core version={}", core_version());
    println!("attributes={}", supported_attribute_keys().join(","));

    let Some(bag_path) = args.bag_path else {
        return Ok(());
    };

    let bag: AttributeBag = serde_json::from_str(&std::fs::read_to_string(&bag_path)?)?;
    let conn = match &args.db {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let service = RegistrationService::new(SqliteAccountRepository::new(&conn));

    let fields = service.request_fields()?;
    println!("request={}", serde_json::to_string(&fields)?);

    let outcome = service.register(&bag)?;
    log::info!(
        "event=cli_register module=cli status=ok persisted={}",
        outcome.persisted
    );
    println!("persisted={}", outcome.persisted);
    println!("{}", serde_json::to_string_pretty(&outcome.account)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::CliArgs;
    use clap::error::ErrorKind;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn parses_bag_and_db_path() {
        let parsed =
            CliArgs::try_parse_from(["simplereg", "bag.json", "--db", "/tmp/sreg.db"]).unwrap();
        assert_eq!(parsed.bag_path, Some(PathBuf::from("bag.json")));
        assert_eq!(parsed.db, Some(PathBuf::from("/tmp/sreg.db")));

        let parsed = CliArgs::try_parse_from(["simplereg", "--db=x.db"]).unwrap();
        assert_eq!(parsed.bag_path, None);
        assert_eq!(parsed.db, Some(PathBuf::from("x.db")));
    }

    #[test]
    fn rejects_unknown_flags_and_extra_arguments() {
        assert!(CliArgs::try_parse_from(["simplereg", "--verbose"]).is_err());
        assert!(CliArgs::try_parse_from(["simplereg", "a.json", "b.json"]).is_err());
        assert!(CliArgs::try_parse_from(["simplereg", "--db"]).is_err());
    }

    #[test]
    fn short_help_is_not_read_as_bag_path() {
        let err = CliArgs::try_parse_from(["simplereg", "-h"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }
}
