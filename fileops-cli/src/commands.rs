use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

use fileops_core::file::category::FileCategory;
use fileops_core::{
    BulkOptions, FileOpsEngine, FileSelection, MatchOptions, ReplaceRequest, SearchRequest,
};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the directory tree of a project
    Tree {
        project: String,
        /// Directories deeper than this are listed without children
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Search file contents
    Search {
        project: String,
        query: String,
        #[command(flatten)]
        matching: MatchArgs,
        /// Only search files with these extensions
        #[arg(long, value_delimiter = ',')]
        extensions: Vec<String>,
        /// Only search files of these categories (code, text, config, ...)
        #[arg(long, value_delimiter = ',')]
        file_types: Vec<FileCategory>,
        /// Wildcard matched against file names, e.g. "*.test.ts"
        #[arg(long)]
        file_pattern: Option<String>,
    },

    /// Replace text in files, backing up every changed file first
    Replace {
        project: String,
        search: String,
        replace: String,
        #[command(flatten)]
        matching: MatchArgs,
        /// Replace in every text file of the project
        #[arg(long, conflicts_with = "files")]
        all: bool,
        files: Vec<String>,
    },

    /// Apply one operation to many files
    Bulk {
        project: String,
        /// copy, move, delete, duplicate, rename or compress
        operation: String,
        #[arg(required = true)]
        files: Vec<String>,
        /// Regex applied to file names when renaming
        #[arg(long)]
        pattern: Option<String>,
        #[arg(long)]
        replacement: Option<String>,
    },

    /// Compare two files line by line
    Compare {
        project: String,
        left: String,
        right: String,
        /// Print a unified diff instead of line records
        #[arg(long)]
        unified: bool,
        #[arg(long, default_value_t = 3)]
        context: usize,
    },

    /// Show the operation history of a project
    History { project: String },

    /// Delete the operation history of a project
    ClearHistory { project: String },
}

#[derive(Args, Debug, Clone, Copy)]
pub struct MatchArgs {
    /// Treat the query as a regular expression
    #[arg(long)]
    regex: bool,
    #[arg(long)]
    case_sensitive: bool,
    #[arg(long)]
    whole_word: bool,
    /// Skip dependency, build and version-control directories
    #[arg(long)]
    exclude_gitignore: bool,
    #[arg(long)]
    include_hidden: bool,
}

impl From<MatchArgs> for MatchOptions {
    fn from(args: MatchArgs) -> Self {
        MatchOptions {
            regex: args.regex,
            case_sensitive: args.case_sensitive,
            whole_word: args.whole_word,
            exclude_gitignore: args.exclude_gitignore,
            include_hidden: args.include_hidden,
        }
    }
}

/// Runs one command and renders its result for stdout.
pub async fn run(engine: &FileOpsEngine, command: Command) -> Result<String> {
    let output = match command {
        Command::Tree { project, max_depth } => {
            let tree = engine.get_tree(&project, max_depth).await?;
            serde_json::to_string_pretty(&tree)?
        }
        Command::Search {
            project,
            query,
            matching,
            extensions,
            file_types,
            file_pattern,
        } => {
            let request = SearchRequest {
                query,
                options: matching.into(),
                selection: FileSelection {
                    extensions,
                    categories: file_types,
                    file_pattern,
                },
            };
            let outcome = engine.search(&project, &request).await?;
            serde_json::to_string_pretty(&outcome)?
        }
        Command::Replace {
            project,
            search,
            replace,
            matching,
            all,
            files,
        } => {
            let request = ReplaceRequest {
                search_query: search,
                replace_query: replace,
                options: matching.into(),
                replace_all: all,
                files,
            };
            let summary = engine.replace(&project, &request).await?;
            serde_json::to_string_pretty(&summary)?
        }
        Command::Bulk {
            project,
            operation,
            files,
            pattern,
            replacement,
        } => {
            let options = BulkOptions {
                pattern,
                replacement,
            };
            let report = engine.bulk(&project, &operation, &files, &options).await?;
            serde_json::to_string_pretty(&report)?
        }
        Command::Compare {
            project,
            left,
            right,
            unified,
            context,
        } => {
            if unified {
                engine
                    .compare_unified(&project, &left, &right, context)
                    .await?
            } else {
                let report = engine.compare(&project, &left, &right).await?;
                serde_json::to_string_pretty(&report)?
            }
        }
        Command::History { project } => {
            let entries = engine.history(&project).await?;
            serde_json::to_string_pretty(&entries)?
        }
        Command::ClearHistory { project } => {
            engine.clear_history(&project).await?;
            serde_json::to_string_pretty(&json!({ "cleared": project }))?
        }
    };
    Ok(output)
}
