use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "confcmp",
    about = "confcmp: compare component configuration dumps",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two configurations
    Diff(DiffArgs),
    /// Show the component hierarchy of a configuration
    Tree(TreeArgs),
    /// Print a normalized configuration
    Print(PrintArgs),
    /// Show the instance types inferred from references
    Types(TypesArgs),
}

/// Normalization flags shared by every subcommand that normalizes.
///
/// Flags are applied on top of the `--options` file: list flags extend the
/// file's lists, switches turn features on.
#[derive(Args, Clone, Debug, Default)]
pub struct NormalizeArgs {
    /// TOML file with normalization options
    #[arg(long)]
    pub options: Option<PathBuf>,
    /// JSON file with per-type property defaults
    #[arg(long)]
    pub defaults: Option<PathBuf>,
    /// Keep only components matching this pattern (repeatable)
    #[arg(short, long)]
    pub include: Vec<String>,
    /// Drop components matching this pattern (repeatable)
    #[arg(short, long)]
    pub exclude: Vec<String>,
    /// How many reference hops to follow from included components
    #[arg(long)]
    pub follow_depth: Option<usize>,
    /// Drop bookkeeping properties
    #[arg(long)]
    pub ignore_irrelevant: bool,
    /// Comma-separated property names replacing the built-in ignore list
    #[arg(long, value_delimiter = ',')]
    pub ignore_list: Option<Vec<String>>,
    /// Rename rule `Old=New` (repeatable)
    #[arg(long)]
    pub rename: Vec<String>,
    /// File of `Old=New` rename rules (repeatable)
    #[arg(long)]
    pub rename_file: Vec<PathBuf>,
    /// Drop properties set to their type's default
    #[arg(long)]
    pub ignore_defaults: bool,
    /// Also drop `Type/instance` values whose instance is the declared default
    #[arg(long)]
    pub ignore_default_named: bool,
    /// Collapse `Type/Type` references to `Type`
    #[arg(long)]
    pub shorten_default_components: bool,
    /// Keep only reference-valued properties
    #[arg(long)]
    pub skip_properties: bool,
}

#[derive(Args)]
pub struct DiffArgs {
    pub left: PathBuf,
    pub right: PathBuf,
    #[command(flatten)]
    pub normalize: NormalizeArgs,
    /// File of known differences to hide (repeatable)
    #[arg(long)]
    pub known_differences: Vec<PathBuf>,
    /// Also print both hierarchies with marked nodes highlighted
    #[arg(long)]
    pub tree: bool,
}

#[derive(Args)]
pub struct TreeArgs {
    /// Configuration files, merged in order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    #[command(flatten)]
    pub normalize: NormalizeArgs,
    /// Print properties under each node
    #[arg(long)]
    pub properties: bool,
}

#[derive(Args)]
pub struct PrintArgs {
    /// Configuration files, merged in order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    #[command(flatten)]
    pub normalize: NormalizeArgs,
}

#[derive(Args)]
pub struct TypesArgs {
    /// Configuration files, merged in order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_diff() {
        let cli = Cli::try_parse_from(["confcmp", "diff", "a.json", "b.json"]).unwrap();
        if let Command::Diff(args) = cli.command {
            assert_eq!(args.left, PathBuf::from("a.json"));
            assert_eq!(args.right, PathBuf::from("b.json"));
            assert!(args.normalize.include.is_empty());
            assert!(!args.tree);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_diff_with_normalization() {
        let cli = Cli::try_parse_from([
            "confcmp",
            "diff",
            "a.json",
            "b.json",
            "-i",
            "TopAlg",
            "--include",
            "ToolSvc",
            "--exclude",
            "Debug",
            "--follow-depth",
            "2",
            "--rename",
            "old=new",
            "--ignore-defaults",
            "--known-differences",
            "known.txt",
        ])
        .unwrap();
        if let Command::Diff(args) = cli.command {
            assert_eq!(args.normalize.include, vec!["TopAlg", "ToolSvc"]);
            assert_eq!(args.normalize.exclude, vec!["Debug"]);
            assert_eq!(args.normalize.follow_depth, Some(2));
            assert_eq!(args.normalize.rename, vec!["old=new"]);
            assert!(args.normalize.ignore_defaults);
            assert_eq!(args.known_differences, vec![PathBuf::from("known.txt")]);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_ignore_list() {
        let cli = Cli::try_parse_from([
            "confcmp",
            "print",
            "a.json",
            "--ignore-list",
            "OutputLevel,DetStore",
        ])
        .unwrap();
        if let Command::Print(args) = cli.command {
            assert_eq!(
                args.normalize.ignore_list,
                Some(vec!["OutputLevel".to_string(), "DetStore".to_string()])
            );
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_tree_merges_files() {
        let cli = Cli::try_parse_from(["confcmp", "tree", "a.json", "b.json", "--properties"]).unwrap();
        if let Command::Tree(args) = cli.command {
            assert_eq!(args.files.len(), 2);
            assert!(args.properties);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn default_named_help_describes_instance_match() {
        use clap::CommandFactory;

        let cmd = Cli::command();
        let diff = cmd.find_subcommand("diff").unwrap();
        let arg = diff
            .get_arguments()
            .find(|a| a.get_id() == "ignore_default_named")
            .unwrap();
        let help = arg.get_help().unwrap().to_string();
        assert!(help.contains("Type/instance"));
        assert!(!help.contains("Type/Type"));
    }

    #[test]
    fn tree_requires_a_file() {
        assert!(Cli::try_parse_from(["confcmp", "tree"]).is_err());
    }

    #[test]
    fn global_flags() {
        let cli = Cli::try_parse_from(["confcmp", "types", "a.json", "-v", "--format", "json"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Command::Types(_)));
    }
}
