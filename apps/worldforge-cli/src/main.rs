use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use worldforge_assets::TemplateStore;
use worldforge_common::Position;
use worldforge_kernel::sample;
use worldforge_persist::WorldStore;

#[derive(Parser)]
#[command(name = "worldforge-cli", about = "CLI tool for worldforge documents")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Backing world document
    #[arg(long, default_value = "world.json")]
    world: PathBuf,

    /// Directory of structure templates
    #[arg(long, default_value = "structures")]
    structures: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty world document if none exists
    Init,
    /// Print the world mapping
    Show,
    /// Place a structure, replacing anything at that position
    Add {
        /// Position as x,y,z
        #[arg(allow_hyphen_values = true)]
        position: Position,
        /// Structure template name
        structure: String,
    },
    /// Remove the structure at a position
    Remove {
        /// Position as x,y,z
        #[arg(allow_hyphen_values = true)]
        position: Position,
    },
    /// Print a structure template
    Structure { name: String },
    /// List structure template names
    Structures,
    /// Print the sample cube points and edges
    Sample,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    run(cli, &mut std::io::stdout().lock())
}

fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let store = WorldStore::new(&cli.world);
    let templates = TemplateStore::new(&cli.structures);

    match cli.command {
        Commands::Init => {
            store.initialize()?;
            writeln!(out, "world ready at {}", store.path().display())?;
        }
        Commands::Show => {
            let world = store.get_world()?;
            writeln!(out, "{}", serde_json::to_string_pretty(&world)?)?;
        }
        Commands::Add {
            position,
            structure,
        } => {
            let placed = store.add_structure(position, structure)?;
            store.try_flush()?;
            writeln!(out, "placed {} at {}", placed.structure, placed.position)?;
        }
        Commands::Remove { position } => {
            let removed = store.remove_structure(position)?;
            store.try_flush()?;
            writeln!(
                out,
                "removed {} from {}",
                removed.removed_structure, removed.position
            )?;
        }
        Commands::Structure { name } => {
            let doc = templates.load(&name)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
        }
        Commands::Structures => {
            for name in templates.list()? {
                writeln!(out, "{name}")?;
            }
        }
        Commands::Sample => {
            let points = sample::cube_points();
            let edges = sample::cube_edges();
            writeln!(
                out,
                "{}",
                serde_json::json!({ "points": points, "edges": edges })
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(dir: &std::path::Path, args: &[&str]) -> anyhow::Result<String> {
        let world = dir.join("world.json");
        let structures = dir.join("structures");
        let mut argv = vec![
            "worldforge-cli".to_string(),
            "--world".into(),
            world.display().to_string(),
            "--structures".into(),
            structures.display().to_string(),
        ];
        argv.extend(args.iter().map(|a| a.to_string()));
        let cli = Cli::try_parse_from(argv)?;
        let mut out = Vec::new();
        run(cli, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn add_requires_initialized_world() {
        let tmp = tempfile::tempdir().unwrap();
        let err = run_args(tmp.path(), &["add", "1,2,3", "tower"]).unwrap_err();
        assert!(err.to_string().contains("not loaded"));
    }

    #[test]
    fn init_add_show_remove() {
        let tmp = tempfile::tempdir().unwrap();
        run_args(tmp.path(), &["init"]).unwrap();

        let out = run_args(tmp.path(), &["add", "-1,2,3", "tower"]).unwrap();
        assert_eq!(out.trim(), "placed tower at -1,2,3");

        let shown: serde_json::Value =
            serde_json::from_str(&run_args(tmp.path(), &["show"]).unwrap()).unwrap();
        assert_eq!(shown, serde_json::json!({ "-1,2,3": "tower" }));

        let out = run_args(tmp.path(), &["remove", "-1,2,3"]).unwrap();
        assert_eq!(out.trim(), "removed tower from -1,2,3");
        assert!(run_args(tmp.path(), &["remove", "-1,2,3"]).is_err());
    }

    #[test]
    fn empty_structure_name_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        run_args(tmp.path(), &["init"]).unwrap();
        let err = run_args(tmp.path(), &["add", "1,2,3", ""]).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
        let shown: serde_json::Value =
            serde_json::from_str(&run_args(tmp.path(), &["show"]).unwrap()).unwrap();
        assert_eq!(shown, serde_json::json!({}));
    }

    #[test]
    fn bad_position_is_a_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(run_args(tmp.path(), &["add", "1,2", "tower"]).is_err());
    }

    #[test]
    fn templates_are_listed_and_printed() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("structures");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("hut.json"), r#"{"size": 2}"#).unwrap();

        assert_eq!(run_args(tmp.path(), &["structures"]).unwrap().trim(), "hut");
        let doc: serde_json::Value =
            serde_json::from_str(&run_args(tmp.path(), &["structure", "hut"]).unwrap()).unwrap();
        assert_eq!(doc["size"], 2);
        assert!(run_args(tmp.path(), &["structure", "castle"]).is_err());
    }
}
