use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, Command};
use std::path::{Path, PathBuf};

use collision_scene::config::Config;
use collision_scene::convert::{export_scene, import_scene, ImportSettings};
use collision_scene::formats::{CsbFile, CtbFile, FormatRevision, Game};
use collision_scene::foundation::logging;
use collision_scene::scene::{IoScene, ObjLoader, ObjWriter};

const ENVELOPE_SUFFIX: &str = ".zst";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SceneFormat {
    Ron,
    Obj,
}

impl SceneFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Ron => "ron",
            Self::Obj => "obj",
        }
    }
}

#[derive(Debug)]
struct ToolConfig {
    files: Vec<PathBuf>,
    big_endian: bool,
    output_dir: Option<PathBuf>,
    export_format: SceneFormat,
    list: bool,
    settings: ImportSettings,
}

impl ToolConfig {
    /// Revision for reading `path`: the envelope suffix decides, else `--big`
    fn input_revision(&self, path: &Path) -> FormatRevision {
        FormatRevision::from_path(path).unwrap_or_else(|| FormatRevision::from_big_endian(self.big_endian))
    }

    fn output_revision(&self) -> FormatRevision {
        if self.big_endian {
            FormatRevision::Legacy
        } else {
            self.settings.revision
        }
    }

    fn output_dir_for(&self, input: &Path) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        })
    }
}

/// File name split into stem and kind, ignoring the envelope suffix
fn split_name(path: &Path) -> Result<(String, String)> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file name: {}", path.display()))?;
    let name = name.strip_suffix(ENVELOPE_SUFFIX).unwrap_or(name);
    let inner = Path::new(name);

    let stem = inner.file_stem().and_then(|s| s.to_str()).unwrap_or(name);
    let extension = inner
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    Ok((stem.to_string(), extension))
}

fn main() -> Result<()> {
    logging::init();

    let matches = Command::new("csb_tool")
        .about("Converts CSB/CTB collision files to and from scene documents")
        .arg(
            Arg::new("files")
                .value_name("FILES")
                .help("Inputs: .csb[.zst] and .ctb[.zst] are decoded, .ron and .obj are imported")
                .required(true)
                .num_args(1..)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("big")
                .long("big")
                .help("Use the big-endian revision for outputs and for inputs without the .zst suffix")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("map-object")
                .long("map-object")
                .help("Store each mesh as its own model (no collision table)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Import settings (.toml or .ron)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_name("FORMAT")
                .help("Scene format written when decoding a .csb")
                .value_parser(["ron", "obj"])
                .default_value("ron"),
        )
        .arg(
            Arg::new("game")
                .long("game")
                .value_name("GAME")
                .help("Tables used to name collision flags and materials")
                .value_parser(Game::ALL.map(Game::id)),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .help("Print every mesh, model and trigger of a decoded .csb with named flags")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory (default: next to each input)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .get_matches();

    let mut settings = match matches.get_one::<PathBuf>("config") {
        Some(path) => ImportSettings::load_from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => ImportSettings::default(),
    };
    settings.map_object |= matches.get_flag("map-object");
    if let Some(game) = matches.get_one::<String>("game").and_then(|id| Game::from_id(id)) {
        settings.game = game;
    }

    let export_format = match matches.get_one::<String>("format").map(String::as_str) {
        Some("obj") => SceneFormat::Obj,
        _ => SceneFormat::Ron,
    };

    let config = ToolConfig {
        files: matches
            .get_many::<PathBuf>("files")
            .map(|files| files.cloned().collect())
            .unwrap_or_default(),
        big_endian: matches.get_flag("big"),
        output_dir: matches.get_one::<PathBuf>("output").cloned(),
        export_format,
        list: matches.get_flag("list"),
        settings,
    };

    if let Some(dir) = &config.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    for file in &config.files {
        process_file(&config, file).with_context(|| format!("Failed to process {}", file.display()))?;
    }
    Ok(())
}

fn process_file(config: &ToolConfig, path: &Path) -> Result<()> {
    let (stem, extension) = split_name(path)?;
    match extension.as_str() {
        "csb" => export_csb(config, path, &stem),
        "ctb" => summarize_ctb(config, path),
        "ron" | "obj" => import_file(config, path, &stem, &extension),
        other => bail!("Unsupported input type '{other}'"),
    }
}

fn export_csb(config: &ToolConfig, path: &Path, stem: &str) -> Result<()> {
    let revision = config.input_revision(path);
    log::info!("Decoding {} ({revision:?})", path.display());

    let csb = CsbFile::read_file(path, revision)?;
    if config.list {
        for line in describe_csb(&csb, config.settings.game) {
            println!("{line}");
        }
    }
    let scene = export_scene(&csb, config.settings.game)?;

    let output = config
        .output_dir_for(path)
        .join(format!("{stem}.{}", config.export_format.extension()));
    match config.export_format {
        SceneFormat::Ron => scene.save_ron(&output)?,
        SceneFormat::Obj => ObjWriter::save_obj(&scene, &output)?,
    }

    println!("Exported {} -> {}", path.display(), output.display());
    Ok(())
}

/// One line per mesh, split model and trigger, with flags and materials named
fn describe_csb(csb: &CsbFile, game: Game) -> Vec<String> {
    let mut lines = vec![format!(
        "{} nodes, {} meshes, {} models, {} triggers ({})",
        csb.nodes.len(),
        csb.meshes.len(),
        csb.models.len(),
        csb.objects.len(),
        game.id()
    )];
    for mesh in csb.meshes.iter().filter(|m| !m.triangles.is_empty()) {
        lines.push(format!(
            "  mesh    {:<24} {:<16} {}",
            mesh.name,
            game.material_label(mesh.material_attribute),
            game.describe_flags(mesh.col_flag)
        ));
    }
    for model in csb.split_models() {
        lines.push(format!(
            "  model   {:<24} {:<16} {}",
            model.name,
            game.material_label(model.material_attribute),
            game.describe_flags(model.col_flag)
        ));
    }
    for object in &csb.objects {
        let shape = if object.is_sphere() { "sphere" } else { "box" };
        lines.push(format!(
            "  trigger {:<24} {:<16} {}",
            object.name,
            shape,
            game.describe_flags(object.col_flag)
        ));
    }
    lines
}

fn summarize_ctb(config: &ToolConfig, path: &Path) -> Result<()> {
    let revision = config.input_revision(path);
    let table = CtbFile::read_file(path, revision)?;
    let summary = table.summary();

    println!("{}", path.display());
    println!("  Nodes:          {}", summary.node_count);
    println!("  Leaves:         {}", summary.leaf_count);
    println!("  Depth:          {}", summary.depth);
    println!("  Root triangles: {}", summary.root_triangle_count);
    Ok(())
}

fn import_file(config: &ToolConfig, path: &Path, stem: &str, extension: &str) -> Result<()> {
    log::info!("Loading {}", path.display());
    let scene = if extension == "obj" {
        ObjLoader::load_obj(path)?
    } else {
        IoScene::load_ron(path)?
    };

    let results = import_scene(&scene, &config.settings)?;
    let written = results.write_to_dir(&config.output_dir_for(path), stem, config.output_revision())?;

    for output in written {
        println!("Imported {} -> {}", path.display(), output.display());
    }
    Ok(())
}
