use buildscope::analysis::ChangeAnalyzer;
use buildscope::config::{AnalyzerConfig, ModuleDetection};
use buildscope::graph::cache::CacheStore;
use buildscope::logging;
use buildscope::model::ImpactReport;
use buildscope::vcs::GitCli;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "buildscope",
    version,
    about = "Rebuild-impact analysis for C/C++ workspaces",
    long_about = "Buildscope builds a reverse-dependency graph over #include relationships \
                  and estimates how much of a workspace would recompile if the incoming \
                  commits on the tracked upstream were applied."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the rebuild impact of incoming commits
    Analyze {
        /// Path to the workspace root
        #[arg(value_name = "WORKSPACE")]
        path: PathBuf,

        /// Workspace-relative solution or project file defining the build scope
        #[arg(long, value_name = "FILE")]
        project_file: Option<String>,

        /// Module detection strategy
        #[arg(long, value_enum)]
        module_detection: Option<ModuleDetection>,

        /// Limit scanning to these workspace-relative roots (repeatable)
        #[arg(long = "include-path", value_name = "DIR")]
        include_paths: Vec<String>,

        /// Skip these workspace-relative roots in addition to the built-in list (repeatable)
        #[arg(long = "exclude-path", value_name = "DIR")]
        exclude_paths: Vec<String>,

        /// Emit the full report as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Build or refresh the dependency graph cache without consulting version control
    Index {
        /// Path to the workspace root
        #[arg(value_name = "WORKSPACE")]
        path: PathBuf,
    },
    /// Drop the cached graph for one workspace, or every cache when no path is given
    ClearCache {
        #[arg(value_name = "WORKSPACE")]
        path: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = logging::init_logging("cli");
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            path,
            project_file,
            module_detection,
            include_paths,
            exclude_paths,
            json,
        } => {
            let mut config = AnalyzerConfig::load(&path);
            if let Some(project_file) = project_file {
                config.project_file = project_file;
            }
            if let Some(detection) = module_detection {
                config.module_detection = detection;
            }
            if !include_paths.is_empty() {
                config.include_paths = include_paths;
            }
            if !exclude_paths.is_empty() {
                config.exclude_paths = exclude_paths;
            }

            let analyzer = ChangeAnalyzer::new(&path, config)?;
            let provider = GitCli::new(analyzer.root());
            let report = analyzer.analyze(&provider)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Index { path } => {
            let config = AnalyzerConfig::load(&path);
            let analyzer = ChangeAnalyzer::new(&path, config)?;
            let (graph, stats, _) = analyzer.refresh_graph()?;

            println!("Indexed {}", analyzer.root().display());
            println!("Files:   {}", graph.file_count());
            println!("Edges:   {}", graph.edge_count());
            println!(
                "Parsed {} files ({} removed since last run)",
                stats.parsed, stats.removed
            );

            let mut ranked: Vec<(usize, &String)> = graph
                .file_paths()
                .map(|path| (graph.dependent_count(path), path))
                .filter(|(count, _)| *count > 0)
                .collect();
            ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));

            if !ranked.is_empty() {
                println!("\nMost included headers:");
                for (count, path) in ranked.iter().take(10) {
                    println!("  {:>5}  {}", count, path);
                }
            }
        }
        Commands::ClearCache { path } => match path {
            Some(path) => {
                let root = path.canonicalize()?;
                CacheStore::new(&root).clear()?;
                println!("Cleared cache for {}", root.display());
            }
            None => {
                CacheStore::clear_all()?;
                println!("Cleared all caches");
            }
        },
    }

    Ok(())
}

fn print_report(report: &ImpactReport) {
    println!(
        "Global impact: {:.1}% ({} of {} files) [{}]",
        report.global_impact_pct,
        report.total_affected_files,
        report.total_project_files,
        report.severity.as_str()
    );

    if report.commit_impacts.is_empty() {
        println!("No incoming commits.");
        return;
    }

    println!("\nIncoming commits:");
    for impact in &report.commit_impacts {
        println!(
            "  {}  {:>5.1}%  {} changed, {} to rebuild  {}",
            impact.commit.short_id,
            impact.impact_pct,
            impact.changed_files.len(),
            impact.rebuild_files.len(),
            impact.commit.message
        );
    }

    if !report.module_impacts.is_empty() {
        println!(
            "\nAffected modules ({} of {}):",
            report.affected_module_count, report.total_modules
        );
        for module in report.module_impacts.iter().take(15) {
            println!(
                "  {:<30} {:>4}/{:<4} files  [{}]",
                module.name,
                module.affected_files_count,
                module.total_files,
                module.kind.as_str()
            );
        }
    }
}
