use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use confcmp_align::{diff_configurations, AlignmentReport};
use confcmp_hierarchy::{build_hierarchy, HierarchyBuilder, HierarchyNode};
use confcmp_normalize::{InMemoryTypeDefaults, NormalizeOptions, Normalizer, TypeDefaultsProvider};
use confcmp_refs::infer_types;
use confcmp_report::{compare_configurations, ChangeKind, ComparisonReport, KnownDifferences};
use confcmp_types::{load_configuration, load_configurations, stringify, Configuration};
use serde::Serialize;
use tracing::info;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Diff(args) => cmd_diff(args, format),
        Command::Tree(args) => cmd_tree(args, format),
        Command::Print(args) => cmd_print(args, format),
        Command::Types(args) => cmd_types(args, format),
    }
}

// ---------------------------------------------------------------------------
// Normalization setup
// ---------------------------------------------------------------------------

/// Merge the `--options` file (if any) with the command-line flags.
fn resolve_options(args: &NormalizeArgs) -> anyhow::Result<NormalizeOptions> {
    let mut options = match &args.options {
        Some(path) => NormalizeOptions::load(path)?,
        None => NormalizeOptions::default(),
    };

    options.include.extend(args.include.iter().cloned());
    options.exclude.extend(args.exclude.iter().cloned());
    options.rename.extend(args.rename.iter().cloned());
    options.rename_files.extend(args.rename_file.iter().cloned());
    if let Some(depth) = args.follow_depth {
        options.follow_depth = depth;
    }
    if let Some(list) = &args.ignore_list {
        options.ignore_list = Some(list.clone());
    }
    options.ignore_irrelevant |= args.ignore_irrelevant;
    options.ignore_defaults |= args.ignore_defaults;
    options.ignore_default_named |= args.ignore_default_named;
    options.shorten_default_components |= args.shorten_default_components;
    options.skip_properties |= args.skip_properties;
    Ok(options)
}

fn build_normalizer(args: &NormalizeArgs) -> anyhow::Result<Normalizer> {
    let options = resolve_options(args)?;
    let rules = options.rename_rules()?;
    let defaults: Arc<dyn TypeDefaultsProvider> = match &args.defaults {
        Some(path) => Arc::new(InMemoryTypeDefaults::load(path)?),
        None => Arc::new(InMemoryTypeDefaults::new()),
    };
    if options.ignore_defaults && args.defaults.is_none() {
        info!("no --defaults file given; default elimination will find no defaults");
    }
    let normalizer = Normalizer::from_options(&options, rules, defaults)?;
    info!(stages = ?normalizer.stage_names(), "normalizer ready");
    Ok(normalizer)
}

fn load_normalized(
    normalizer: &Normalizer,
    config: Configuration,
    label: &str,
) -> anyhow::Result<Configuration> {
    let outcome = normalizer
        .run(&config)
        .with_context(|| format!("normalizing {label}"))?;
    info!(
        input = label,
        components = outcome.configuration.len(),
        elapsed_ms = outcome.elapsed.as_millis() as u64,
        "normalized"
    );
    Ok(outcome.configuration)
}

fn load_one(path: &Path) -> anyhow::Result<Configuration> {
    load_configuration(path).with_context(|| format!("loading {}", path.display()))
}

// ---------------------------------------------------------------------------
// diff
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct DiffOutput<'a> {
    alignment: &'a AlignmentReport,
    comparison: &'a ComparisonReport,
}

fn cmd_diff(args: DiffArgs, format: OutputFormat) -> anyhow::Result<()> {
    let normalizer = build_normalizer(&args.normalize)?;
    let known = KnownDifferences::load_all(&args.known_differences)?;

    let left = load_normalized(&normalizer, load_one(&args.left)?, "left")?;
    let right = load_normalized(&normalizer, load_one(&args.right)?, "right")?;

    let diff = diff_configurations(&left, &right, &HierarchyBuilder::new());
    let comparison = compare_configurations(&left, &right, &known);

    match format {
        OutputFormat::Json => {
            let output = DiffOutput {
                alignment: &diff.report,
                comparison: &comparison,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            if args.tree {
                println!("{}", args.left.display().to_string().bold());
                print_tree(&diff.left, false);
                println!("{}", args.right.display().to_string().bold());
                print_tree(&diff.right, false);
                println!();
            }
            for path in &diff.report.left_marked {
                println!("{} {}", "<".red().bold(), path.red());
            }
            for path in &diff.report.right_marked {
                println!("{} {}", ">".green().bold(), path.green());
            }
            print_changes(&comparison);
            print_summary(&diff.report, &comparison);
        }
    }
    Ok(())
}

fn print_changes(comparison: &ComparisonReport) {
    for change in &comparison.changed {
        let key = format!("{}.{}", change.component, change.property);
        let show = |v: &Option<confcmp_types::Value>| {
            v.as_ref().map(stringify).unwrap_or_else(|| "<unset>".to_string())
        };
        match change.kind() {
            ChangeKind::Added => println!("  {} {} = {}", "+".green(), key.bold(), show(&change.right)),
            ChangeKind::Removed => println!("  {} {} = {}", "-".red(), key.bold(), show(&change.left)),
            ChangeKind::Modified => println!(
                "  {} {}: {} {} {}",
                "~".yellow(),
                key.bold(),
                show(&change.left),
                "->".dimmed(),
                show(&change.right)
            ),
        }
    }
}

fn print_summary(report: &AlignmentReport, comparison: &ComparisonReport) {
    if report.is_identical() && comparison.is_empty() {
        println!("{} Configurations match.", "✓".green().bold());
        return;
    }
    println!(
        "{} only left, {} only right, {} property changes ({} known differences hidden)",
        report.left_marked.len().to_string().red(),
        report.right_marked.len().to_string().green(),
        comparison.changed.len().to_string().yellow(),
        comparison.suppressed
    );
}

// ---------------------------------------------------------------------------
// tree / print / types
// ---------------------------------------------------------------------------

fn cmd_tree(args: TreeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let normalizer = build_normalizer(&args.normalize)?;
    let config = load_configurations(&args.files)?;
    let config = load_normalized(&normalizer, config, "input")?;
    let tree = build_hierarchy(&config);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tree)?),
        OutputFormat::Text => print_tree(&tree, args.properties),
    }
    Ok(())
}

fn cmd_print(args: PrintArgs, format: OutputFormat) -> anyhow::Result<()> {
    let normalizer = build_normalizer(&args.normalize)?;
    let config = load_configurations(&args.files)?;
    let config = load_normalized(&normalizer, config, "input")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Text => {
            for (name, properties) in &config {
                println!("{}", name.bold());
                for (property, value) in properties {
                    println!("  {} = {}", property, stringify(value));
                }
            }
        }
    }
    Ok(())
}

fn cmd_types(args: TypesArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_configurations(&args.files)?;
    let types = infer_types(&config);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&types)?),
        OutputFormat::Text => {
            if types.is_empty() {
                println!("No typed references found.");
            }
            for (instance, type_name) in &types {
                println!("{} : {}", instance.bold(), type_name.cyan());
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tree rendering
// ---------------------------------------------------------------------------

/// One printable line of a rendered hierarchy.
#[derive(Debug, PartialEq, Eq)]
struct TreeLine {
    depth: usize,
    text: String,
    marked: bool,
}

fn render_tree(nodes: &[HierarchyNode], properties: bool) -> Vec<TreeLine> {
    let mut lines = Vec::new();
    render_level(nodes, 0, properties, &mut lines);
    lines
}

fn render_level(nodes: &[HierarchyNode], depth: usize, properties: bool, lines: &mut Vec<TreeLine>) {
    for node in nodes {
        let suffix = if node.is_group() { "/" } else { "" };
        lines.push(TreeLine {
            depth,
            text: format!("{}{}", node.name, suffix),
            marked: node.marked,
        });
        if properties {
            for (property, value) in node.properties.iter().flatten() {
                lines.push(TreeLine {
                    depth: depth + 1,
                    text: format!("{} = {}", property, stringify(value)),
                    marked: false,
                });
            }
        }
        render_level(&node.children, depth + 1, properties, lines);
    }
}

fn print_tree(nodes: &[HierarchyNode], properties: bool) {
    for line in render_tree(nodes, properties) {
        let indent = "  ".repeat(line.depth);
        if line.marked {
            println!("{}{}", indent, line.text.red().bold());
        } else {
            println!("{}{}", indent, line.text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &tempfile::TempDir, name: &str, text: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn flags_extend_the_options_file() {
        let dir = tempfile::tempdir().unwrap();
        let options = write(
            &dir,
            "options.toml",
            "include = [\"TopAlg\"]\nfollow_depth = 1\nignore_defaults = true\n",
        );
        let args = NormalizeArgs {
            options: Some(options),
            include: vec!["ToolSvc".into()],
            follow_depth: Some(3),
            skip_properties: true,
            ..Default::default()
        };
        let resolved = resolve_options(&args).unwrap();
        assert_eq!(resolved.include, vec!["TopAlg", "ToolSvc"]);
        assert_eq!(resolved.follow_depth, 3);
        assert!(resolved.ignore_defaults);
        assert!(resolved.skip_properties);
    }

    #[test]
    fn missing_options_file_is_an_error() {
        let args = NormalizeArgs {
            options: Some("/nonexistent/options.toml".into()),
            ..Default::default()
        };
        assert!(resolve_options(&args).is_err());
    }

    #[test]
    fn normalizer_from_flags() {
        let args = NormalizeArgs {
            exclude: vec!["Debug".into()],
            ignore_irrelevant: true,
            ..Default::default()
        };
        let normalizer = build_normalizer(&args).unwrap();
        assert_eq!(normalizer.stage_names(), vec!["include-exclude", "strip-irrelevant"]);
    }

    #[test]
    fn render_marks_and_groups() {
        let config = Configuration::from_json(serde_json::json!({
            "Svc.Tool": {"x": 1},
            "Alg": {}
        }))
        .unwrap();
        let mut tree = build_hierarchy(&config);
        tree[1].marked = true;

        let lines = render_tree(&tree, true);
        let texts: Vec<_> = lines.iter().map(|l| (l.depth, l.text.as_str(), l.marked)).collect();
        assert_eq!(
            texts,
            vec![
                (0, "Svc/", false),
                (1, "Tool", false),
                (2, "x = 1", false),
                (0, "Alg", true),
            ]
        );
    }

    #[test]
    fn diff_command_runs_on_files() {
        let dir = tempfile::tempdir().unwrap();
        let left = write(&dir, "left.json", r#"{"A": {"x": 1}, "B": {}}"#);
        let right = write(&dir, "right.json", r#"{"A": {"x": 2}}"#);
        let args = DiffArgs {
            left,
            right,
            normalize: NormalizeArgs::default(),
            known_differences: Vec::new(),
            tree: true,
        };
        cmd_diff(args, OutputFormat::Text).unwrap();
    }

    #[test]
    fn diff_command_reports_unreadable_input() {
        let dir = tempfile::tempdir().unwrap();
        let right = write(&dir, "right.json", "{}");
        let args = DiffArgs {
            left: dir.path().join("missing.json"),
            right,
            normalize: NormalizeArgs::default(),
            known_differences: Vec::new(),
            tree: false,
        };
        let err = cmd_diff(args, OutputFormat::Json).unwrap_err();
        assert!(format!("{err:#}").contains("missing.json"));
    }
}
