use crate::commands::Out;
use crate::export::DestinationPolicy;
use crate::{Config, Result};
use std::path::Path;

/// Creates the data directory and:
/// - Creates an initial `config.json` file with the chosen destination policy and defaults
/// - Creates an empty expense database at `expenses.sqlite`
///
/// # Arguments
/// - `expenses_home` - The directory that will be the root of data directory, e.g.
///   `$HOME/expenses`
/// - `destination` - Where exports will be written.
///
/// # Errors
/// - Returns an error if any file operations fail.
/// - Returns an error if the directory already holds an expense database.
pub async fn init(expenses_home: &Path, destination: DestinationPolicy) -> Result<Out<()>> {
    let config = Config::create(expenses_home, destination).await?;
    let message = format!(
        "Successfully created the expenses directory at '{}', exports go to {destination}",
        config.root().display()
    );
    config.db().close().await;
    Ok(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageFault;
    use crate::Error;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_then_load() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("expenses");

        let out = init(&home, DestinationPolicy::Downloads).await.unwrap();
        assert!(out.message().contains("downloads"));

        let config = Config::load(&home).await.unwrap();
        assert_eq!(config.destination_policy(), DestinationPolicy::Downloads);
        assert!(config.db().list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_init_refuses_existing_home() {
        let dir = TempDir::new().unwrap();
        init(dir.path(), DestinationPolicy::Private).await.unwrap();
        let config_before = std::fs::read_to_string(dir.path().join("config.json")).unwrap();

        let result = init(dir.path(), DestinationPolicy::Downloads).await;

        assert!(matches!(
            result,
            Err(Error::Storage(StorageFault::AlreadyExists(_)))
        ));
        let config_after = std::fs::read_to_string(dir.path().join("config.json")).unwrap();
        assert_eq!(config_before, config_after);
    }
}
