//! Subcommand handlers. Each one works against the typed backend or the
//! channel so it can be driven by an in-process host in tests.

mod project;
mod status;
mod watch;

pub use project::{create, open};
pub use status::render_status;
pub use watch::watch;

use hub_bridge::{BackendProxy, Registry};
use hub_common::Result;

use crate::cli::Command;

pub async fn run(command: &Command, registry: &Registry) -> Result<()> {
    match command {
        Command::Status => {
            let backend = BackendProxy::from_registry(registry)?;
            print!("{}", render_status(&backend));
            Ok(())
        }
        Command::Create => {
            let backend = BackendProxy::from_registry(registry)?;
            create(&backend).await?;
            println!("Project creation requested.");
            Ok(())
        }
        Command::Open { index } => {
            let backend = BackendProxy::from_registry(registry)?;
            let opened = open(&backend, *index).await?;
            match opened {
                Some(entry) => println!("Opening {entry}"),
                None => println!("Open requested for project #{index}"),
            }
            Ok(())
        }
        Command::Watch => {
            let channel = registry.channel();
            watch(channel, |line| println!("{line}")).await
        }
        // Handled before connecting.
        Command::Config => Ok(()),
    }
}
