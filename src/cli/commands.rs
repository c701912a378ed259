//! Command dispatch

use std::io;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{NodeId, TreeArena};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see --help".to_string(),
        ));
    };

    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Commands::Config { command } => _config(cli, command),
        Commands::Root { name } | Commands::Child { name, .. } | Commands::Rename { name, .. }
            if name.trim().is_empty() =>
        {
            Err(CliError::InvalidArgs("node name must not be blank".to_string()))
        }
        Commands::Root { name } => mutate(cli, |c| {
            let row = c.nodes.create_root(name).map_err(InfraError::from)?;
            output::success(&format!("created root {}", row));
            Ok(())
        }),
        Commands::Child { name, parent } => mutate(cli, |c| {
            let row = c
                .nodes
                .create_child(name, NodeId(*parent))
                .map_err(InfraError::from)?;
            output::success(&format!("created {}", row));
            Ok(())
        }),
        Commands::Delete { id } => mutate(cli, |c| {
            let removed = c.nodes.delete_subtree(NodeId(*id)).map_err(InfraError::from)?;
            output::success(&format!("deleted {} row(s)", removed));
            Ok(())
        }),
        Commands::Rename { id, name } => mutate(cli, |c| {
            let row = c
                .nodes
                .rename_node(NodeId(*id), name)
                .map_err(InfraError::from)?;
            output::success(&format!("renamed {}", row));
            Ok(())
        }),
        Commands::Show { id } => _show(cli, *id),
        Commands::Children { id } => read(cli, |c| {
            output::rows(&c.nodes.find_immediate_children(NodeId(*id))?);
            Ok(())
        }),
        Commands::Ancestors { id } => read(cli, |c| {
            output::rows(&c.nodes.find_ancestor_chain(NodeId(*id))?);
            Ok(())
        }),
        Commands::Parent { id } => read(cli, |c| {
            match c.nodes.find_parent(NodeId(*id))? {
                Some(parent) => output::row(&parent),
                None => output::info(&format!("{} is a root", id)),
            }
            Ok(())
        }),
        Commands::Leaves { id } => _leaves(cli, *id),
        Commands::List => read(cli, |c| {
            output::rows(&c.nodes.all_rows()?);
            Ok(())
        }),
        Commands::Check => _check(cli),
    }
}

fn settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load().map_err(InfraError::from)?;
    if let Some(store) = &cli.store {
        settings.store_path = store.clone();
    }
    debug!(store = %settings.store_path.display(), "settings loaded");
    Ok(settings)
}

fn container(cli: &Cli) -> CliResult<ServiceContainer> {
    Ok(ServiceContainer::new(settings(cli)?)?)
}

/// Run a mutation and persist the store when it succeeds.
fn mutate(
    cli: &Cli,
    op: impl FnOnce(&ServiceContainer) -> Result<(), InfraError>,
) -> CliResult<()> {
    let container = container(cli)?;
    op(&container)?;
    container.commit()?;
    Ok(())
}

fn read(
    cli: &Cli,
    op: impl FnOnce(&ServiceContainer) -> Result<(), ApplicationError>,
) -> CliResult<()> {
    let container = container(cli)?;
    op(&container).map_err(InfraError::from)?;
    Ok(())
}

/// Subtree of `id`, or every tree in the store.
fn trees(container: &ServiceContainer, id: Option<u64>) -> Result<Vec<TreeArena>, ApplicationError> {
    match id {
        Some(id) => Ok(container
            .nodes
            .descendants_tree(NodeId(id))?
            .into_iter()
            .collect()),
        None => container.nodes.forest(),
    }
}

#[instrument(skip(cli))]
fn _show(cli: &Cli, id: Option<u64>) -> CliResult<()> {
    read(cli, |c| {
        let trees = trees(c, id)?;
        if trees.is_empty() {
            output::info("Empty tree");
        }
        for tree in &trees {
            output::info(&tree.to_tree_string());
        }
        Ok(())
    })
}

#[instrument(skip(cli))]
fn _leaves(cli: &Cli, id: Option<u64>) -> CliResult<()> {
    read(cli, |c| {
        for tree in trees(c, id)? {
            output::rows(&c.nodes.leaves_of(&tree));
        }
        Ok(())
    })
}

#[instrument(skip(cli))]
fn _check(cli: &Cli) -> CliResult<()> {
    let container = container(cli)?;
    let rows = container.nodes.all_rows().map_err(InfraError::from)?;
    match container.nodes.check_invariants() {
        Ok(()) => {
            output::success(&format!("{} row(s) consistent", rows.len()));
            Ok(())
        }
        Err(e) => {
            output::failure(&e);
            Err(InfraError::from(e).into())
        }
    }
}

fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = settings(cli)?;
            output::header("# effective configuration");
            output::info(&settings.to_toml().map_err(InfraError::from)?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}
