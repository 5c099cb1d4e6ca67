mod cli;

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;

use cli::{CliArgs, CliCommand};
use twinmark::messages::{DocumentMsg, Msg};
use twinmark::model::DocumentId;
use twinmark::runtime::{HeadlessSurface, Runtime};
use twinmark::storage::DirectoryStore;
use twinmark::structured::StructuredDoc;
use twinmark::{config_paths, EditorConfig, Space};

type CliRuntime = Runtime<DirectoryStore, HeadlessSurface>;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    twinmark::tracing::init();

    let config = match &args.config {
        Some(path) => EditorConfig::load_from(path),
        None => EditorConfig::load(),
    };
    if let CliCommand::InitConfig { force } = &args.command {
        return write_config(&config, args.config.as_deref(), *force);
    }

    let data_dir = args.data_dir.clone().or_else(|| config.data_dir.clone());
    let data_dir = config_paths::ensure_data_dir(data_dir.as_deref())
        .context("could not prepare the data directory")?;

    let store = DirectoryStore::new(data_dir);
    let mut runtime = Runtime::load(config, store, HeadlessSurface::new())
        .context("could not load stored documents")?;

    run(&mut runtime, args.command)?;
    runtime.run_until_idle();

    for message in &runtime.surface().messages {
        eprintln!("{}", message);
    }
    Ok(())
}

fn run(runtime: &mut CliRuntime, command: CliCommand) -> Result<()> {
    match command {
        CliCommand::List => {
            let active = runtime.model().documents.active_id();
            for doc in runtime.model().documents.documents() {
                let marker = if Some(doc.id) == active { "*" } else { " " };
                println!("{} {:>3}  {}", marker, doc.id.0, doc.name);
            }
        }

        CliCommand::Show { id } => {
            activate(runtime, id)?;
            print!("{}", runtime.model().active_content());
        }

        CliCommand::New => {
            runtime.dispatch(Msg::Document(DocumentMsg::New));
            if let Some(id) = runtime.model().documents.active_id() {
                println!("{}", id.0);
            }
        }

        CliCommand::Rename { id, name } => {
            let id = existing(runtime, id)?;
            runtime.dispatch(Msg::Document(DocumentMsg::Rename { id, name }));
        }

        CliCommand::Delete { id } => {
            let id = existing(runtime, id)?;
            runtime.dispatch(Msg::Document(DocumentMsg::Delete(id)));
        }

        CliCommand::Replace {
            from,
            to,
            text,
            mode,
            id,
        } => {
            activate(runtime, id)?;
            let space = Space::from(mode);
            runtime.dispatch(Msg::switch_mode(space));
            runtime.dispatch(Msg::select(space, from, to));

            let Some(selection) = runtime.model().selection_snapshot().cloned() else {
                bail!("{}..{} selects no text in {} mode", from, to, space.label());
            };
            runtime.dispatch(Msg::replace(text, selection));
            runtime.run_until_idle();

            if let Some(status) = &runtime.model().status {
                bail!("replacement was not applied: {}", status);
            }
            print!("{}", runtime.model().active_content());
        }

        CliCommand::Normalize { id } => {
            activate(runtime, id)?;
            print!("{}", StructuredDoc::parse(runtime.model().active_content()).to_markdown());
        }

        CliCommand::InitConfig { .. } => bail!("init-config does not open the document store"),
    }
    Ok(())
}

fn write_config(config: &EditorConfig, path: Option<&Path>, force: bool) -> Result<()> {
    let target = match path {
        Some(path) => path.to_path_buf(),
        None => config_paths::config_file().context("no config directory available")?,
    };
    if target.exists() && !force {
        bail!("{} already exists, pass --force to overwrite", target.display());
    }
    match path {
        Some(path) => config.save_to(path)?,
        None => config.save()?,
    }
    println!("{}", target.display());
    Ok(())
}

fn existing(runtime: &CliRuntime, id: u64) -> Result<DocumentId> {
    let id = DocumentId(id);
    if !runtime.model().documents.contains(id) {
        bail!("no document with id {}", id.0);
    }
    Ok(id)
}

fn activate(runtime: &mut CliRuntime, id: Option<u64>) -> Result<()> {
    if let Some(id) = id {
        let id = existing(runtime, id)?;
        runtime.dispatch(Msg::Document(DocumentMsg::Activate(id)));
    }
    Ok(())
}
