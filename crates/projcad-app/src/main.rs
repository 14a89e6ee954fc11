//! ProjCAD 命令行程序
//!
//! ```text
//! projcad generate "kind=line length=80 angle_hp=30 angle_vp=45" -o line.json
//! projcad info -i prism.json
//! projcad batch requests/*.txt --out-dir drawings
//! ```

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use projcad_core::emitter::Artifact;
use projcad_core::layout::DrawingConfig;
use projcad_core::request::CanonicalRequest;
use projcad_core::sink::PrimitiveTally;
use projcad_file::{load_config, load_request, parse_request, ArtifactDocument};

#[derive(Parser, Debug)]
#[command(name = "projcad")]
#[command(about = "First-angle orthographic projections of points, lines, laminae and solids", long_about = None)]
struct Cli {
    /// 日志详细程度（-v 调试，-vv 跟踪）
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML 图纸配置
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct RequestSource {
    /// 请求语法，如 `kind=point infront=20 above=30`
    request: Option<String>,

    /// 从文件读取请求（.json 或语法文本）
    #[arg(short, long, conflicts_with = "request")]
    input: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a drawing and write it as a JSON artifact document
    Generate {
        #[command(flatten)]
        source: RequestSource,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the info panel of a request
    Info {
        #[command(flatten)]
        source: RequestSource,
    },
    /// Generate many requests in parallel
    Batch {
        /// Request files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for the artifact documents
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

impl RequestSource {
    fn load(&self) -> Result<CanonicalRequest> {
        match (&self.request, &self.input) {
            (Some(text), _) => Ok(parse_request(text)?),
            (None, Some(path)) => {
                load_request(path).with_context(|| format!("reading {}", path.display()))
            }
            (None, None) => bail!("give a request string or --input <FILE>"),
        }
    }
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn load_drawing_config(path: Option<&Path>) -> Result<DrawingConfig> {
    match path {
        Some(path) => {
            load_config(path).with_context(|| format!("reading config {}", path.display()))
        }
        None => Ok(DrawingConfig::default()),
    }
}

fn summarize(artifact: &Artifact) -> PrimitiveTally {
    let mut tally = PrimitiveTally::default();
    artifact.render_to(&mut tally);
    tally
}

fn generate(source: &RequestSource, output: Option<&Path>, config: DrawingConfig) -> Result<()> {
    let document = ArtifactDocument::generate(source.load()?, config)?;
    let tally = summarize(&document.artifact);
    info!(
        title = %document.metadata.title,
        segments = tally.segments,
        arcs = tally.arcs,
        labels = tally.labels,
        "drawing generated"
    );
    if let Artifact::Diagnostic(diagnostic) = &document.artifact {
        eprintln!("{}", diagnostic.text());
    }

    match output {
        Some(path) => document.save(path)?,
        None => println!("{}", document.to_json()?),
    }
    Ok(())
}

fn show_info(source: &RequestSource, config: &DrawingConfig) -> Result<()> {
    let request = source.load()?;
    match projcad_core::generate(&request, config)? {
        Artifact::Drawing(drawing) => {
            println!("{}", drawing.info.title);
            for line in &drawing.info.lines {
                println!("  {line}");
            }
            println!("  scale: {:.4} px/mm", drawing.scale);
        }
        Artifact::Diagnostic(diagnostic) => println!("{}", diagnostic.text()),
    }
    Ok(())
}

fn artifact_path(input: &Path, out_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("request");
    out_dir.join(format!("{stem}.artifact.json"))
}

fn batch_one(input: &Path, out_dir: &Path, config: &DrawingConfig) -> Result<PathBuf> {
    let request = load_request(input).with_context(|| format!("reading {}", input.display()))?;
    let document = ArtifactDocument::generate(request, config.clone())
        .with_context(|| format!("generating {}", input.display()))?;
    let output = artifact_path(input, out_dir);
    document.save(&output)?;
    Ok(output)
}

fn batch(inputs: &[PathBuf], out_dir: &Path, config: &DrawingConfig) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let results: Vec<_> = inputs
        .par_iter()
        .map(|input| (input, batch_one(input, out_dir, config)))
        .collect();

    let mut failed = 0;
    for (input, result) in &results {
        match result {
            Ok(output) => println!("{} -> {}", input.display(), output.display()),
            Err(e) => {
                failed += 1;
                error!("{}: {:#}", input.display(), e);
            }
        }
    }
    info!(total = results.len(), failed, "batch finished");

    if failed > 0 {
        bail!("{failed} of {} requests failed", results.len());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 日志写到 stderr，stdout 留给 JSON 输出
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(log_level(cli.verbose))
            .with_writer(std::io::stderr)
            .finish(),
    )?;

    let config = load_drawing_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Generate { source, output } => generate(source, output.as_deref(), config),
        Commands::Info { source } => show_info(source, &config),
        Commands::Batch { inputs, out_dir } => batch(inputs, out_dir, &config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use projcad_core::request::EntityKind;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_args() {
        let cli = Cli::try_parse_from([
            "projcad",
            "-vv",
            "generate",
            "kind=line length=80",
            "-o",
            "out.json",
        ])
        .unwrap();
        assert_eq!(log_level(cli.verbose), Level::TRACE);
        let Commands::Generate { source, output } = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(output, Some(PathBuf::from("out.json")));
        assert_eq!(source.load().unwrap().entity_kind, EntityKind::Line);
    }

    #[test]
    fn test_request_and_input_conflict() {
        assert!(Cli::try_parse_from([
            "projcad",
            "info",
            "kind=point",
            "--input",
            "req.json"
        ])
        .is_err());

        let cli = Cli::try_parse_from(["projcad", "info"]).unwrap();
        let Commands::Info { source } = cli.command else {
            panic!("expected info");
        };
        assert!(source.load().is_err());
    }

    #[test]
    fn test_artifact_path() {
        assert_eq!(
            artifact_path(Path::new("requests/prism.txt"), Path::new("out")),
            PathBuf::from("out/prism.artifact.json")
        );
    }

    #[test]
    fn test_batch_writes_documents() {
        let dir = std::env::temp_dir().join(format!("projcad-batch-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let inputs: Vec<PathBuf> = [
            ("point.txt", "kind=point infront=20 above=30"),
            ("prism.txt", "kind=solid type=prism sizes=5,30,80"),
            ("rhombus.txt", "kind=lamina shape=rhombus"),
        ]
        .iter()
        .map(|(name, text)| {
            let path = dir.join(name);
            std::fs::write(&path, text).unwrap();
            path
        })
        .collect();

        let out_dir = dir.join("out");
        batch(&inputs, &out_dir, &DrawingConfig::default()).unwrap();
        for input in &inputs {
            let document = ArtifactDocument::load(artifact_path(input, &out_dir)).unwrap();
            let tally = summarize(&document.artifact);
            assert!(tally.total() > 0);
        }

        std::fs::write(&inputs[0], "kind=line length=-3").unwrap();
        assert!(batch(&inputs, &out_dir, &DrawingConfig::default()).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }
}
