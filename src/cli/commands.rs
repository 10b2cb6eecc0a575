//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{
    reconcile_with_policy, reindex, reorder, sorted_by_position, EntityKind, NormalizationPolicy,
};
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Some(command) => {
            let config_dir = resolve_config_dir(cli.config_dir.as_deref())?;
            let settings = Settings::load(Some(config_dir.as_path()))?;
            let container = ServiceContainer::new(settings);
            match command {
                Commands::Tree { file, search } => _tree(&container, file, search.as_deref()),
                Commands::Diff {
                    desired,
                    current,
                    kind,
                    policy,
                } => _diff(&container, desired, current, *kind, *policy),
                Commands::Reindex { file, from, to } => _reindex(&container, file, *from, *to),
                Commands::Config { command } => _config(&container, command, &config_dir),
                Commands::Completion { .. } => Ok(()),
            }
        }
        None => Err(CliError::InvalidArgs(
            "no command given, see --help".to_string(),
        )),
    }
}

fn resolve_config_dir(dir: Option<&Path>) -> CliResult<PathBuf> {
    match dir {
        Some(d) => Ok(d.to_path_buf()),
        None => std::env::current_dir()
            .map_err(|e| crate::infrastructure::InfraError::io("current directory", e).into()),
    }
}

#[instrument(skip(container))]
fn _tree(container: &ServiceContainer, file: &Path, search: Option<&str>) -> CliResult<()> {
    let data = container.record_loader().load(file)?;
    let service = container.hierarchy_service()?;
    let view = service.build(&data.entities, search)?;

    if let Some(kind) = data.kind {
        output::header(&format!("{} ({} of {} shown)", kind, view.shown, view.total));
    }
    for root in &view.roots {
        output::info(&output::to_tree(root));
    }

    let diag = &view.diagnostics;
    for code in &diag.duplicates {
        output::warning(&format!("duplicate code ignored: {}", code));
    }
    for code in &diag.orphans {
        output::warning(&format!("unknown parent, shown as root: {}", code));
    }
    for code in &diag.cycles {
        output::warning(&format!("parent cycle, shown as root: {}", code));
    }
    for code in &view.invalid_codes {
        output::warning(&format!(
            "code does not match {}: {}",
            container.settings.code_pattern, code
        ));
    }
    Ok(())
}

#[instrument(skip(container))]
fn _diff(
    container: &ServiceContainer,
    desired: &[String],
    current: &[String],
    kind: Option<EntityKind>,
    policy: Option<NormalizationPolicy>,
) -> CliResult<()> {
    let policy = policy
        .or_else(|| kind.map(|k| container.settings.policy_for(k)))
        .unwrap_or(container.settings.normalization);
    debug!("policy: {}", policy);

    let diff = reconcile_with_policy(desired, current, policy);
    if diff.is_empty() {
        output::info(&"no changes");
        return Ok(());
    }
    for code in &diff.to_add {
        output::diff_add(code);
    }
    for code in &diff.to_remove {
        output::diff_remove(code);
    }
    Ok(())
}

#[instrument(skip(container))]
fn _reindex(
    container: &ServiceContainer,
    file: &Path,
    from: Option<usize>,
    to: Option<usize>,
) -> CliResult<()> {
    let data = container.record_loader().load(file)?;
    let sorted = sorted_by_position(&data.entities);
    let items = match (from, to) {
        (Some(from), Some(to)) => reorder(&sorted, from, to)
            .map_err(|e| CliError::InvalidArgs(e.to_string()))?,
        _ => reindex(&sorted),
    };
    for item in &items {
        output::info(&format!("{:>4}  {}", item.position, item));
    }
    Ok(())
}

fn _config(container: &ServiceContainer, command: &ConfigCommands, config_dir: &Path) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(p) => output::detail(&format!("global: {}", p.display())),
                None => output::detail(&"global: (no home directory)"),
            }
            output::detail(&format!("local:  {}", local_config_path(config_dir).display()));
        }
    }
    Ok(())
}
