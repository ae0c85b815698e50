use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use strum::VariantArray;
use tokio::fs;

use crate::error::{EngineError, EngineResult};
use crate::file::access::FileAccessManager;
use crate::file::batch::BatchReport;
use crate::file::diff::{diff_lines, unified_patch, CompareReport};
use crate::file::modify::{
    replace_across_files, BulkLayout, BulkOperation, BulkOptions, BulkPlan, ReplaceSummary,
    ReplaceTarget, Replacement,
};
use crate::file::resolver::{DataRootResolver, ProjectResolver};
use crate::file::search::{build_matcher, search_with_matcher, FileSelection, MatchOptions};
use crate::file::search::{SearchLimits, SearchOutcome};
use crate::file::tree::{build_tree, FileNode};
use crate::history::{HistoryEntry, HistoryStore, JsonFileStore, OperationHistoryLog};
use crate::settings::Settings;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    pub options: MatchOptions,
    #[serde(flatten)]
    pub selection: FileSelection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReplaceRequest {
    pub search_query: String,
    pub replace_query: String,
    pub options: MatchOptions,
    /// Replace in every text file of the project; `files` is ignored.
    pub replace_all: bool,
    pub files: Vec<String>,
}

/// Entry point for every file operation on a project.
///
/// Each call resolves the project root itself and passes it down
/// explicitly. The engine keeps no state between calls besides the history
/// documents in its store.
#[derive(Clone)]
pub struct FileOpsEngine {
    resolver: Arc<dyn ProjectResolver>,
    history: OperationHistoryLog,
    settings: Settings,
}

impl FileOpsEngine {
    pub fn new(
        resolver: Arc<dyn ProjectResolver>,
        store: Arc<dyn HistoryStore>,
        settings: Settings,
    ) -> Self {
        let history = OperationHistoryLog::new(store, settings.history.max_entries);
        Self {
            resolver,
            history,
            settings,
        }
    }

    /// Projects under `settings.data_root`, history under `settings.history_dir`.
    pub fn from_settings(settings: Settings) -> Self {
        let resolver = Arc::new(DataRootResolver::new(settings.data_root.clone()));
        let store = Arc::new(JsonFileStore::new(settings.history_dir.clone()));
        Self::new(resolver, store, settings)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    async fn project_root(&self, project: &str) -> EngineResult<PathBuf> {
        let root = self
            .resolver
            .resolve(project)
            .map_err(|e| EngineError::invalid(format!("{e:#}")))?;
        match fs::metadata(&root).await {
            Ok(metadata) if metadata.is_dir() => Ok(root),
            _ => Err(EngineError::not_found(format!("Project not found: {project}"))),
        }
    }

    async fn journal(&self, project: &str, entry: HistoryEntry) {
        if let Err(e) = self.history.append(project, entry).await {
            tracing::warn!("Failed to record history for {project}: {e:#}");
        }
    }

    pub async fn get_tree(&self, project: &str, max_depth: Option<usize>) -> EngineResult<FileNode> {
        let root = self.project_root(project).await?;
        let max_depth = max_depth.unwrap_or(self.settings.tree.max_depth);
        Ok(build_tree(&root, max_depth).await)
    }

    pub async fn search(&self, project: &str, request: &SearchRequest) -> EngineResult<SearchOutcome> {
        let matcher = build_matcher(&request.query, &request.options)
            .map_err(|e| EngineError::invalid(format!("{e:#}")))?;
        let root = self.project_root(project).await?;

        let limits = SearchLimits {
            max_results: self.settings.search.max_results,
            preview_lines: self.settings.search.preview_lines,
        };
        let outcome =
            search_with_matcher(&root, &matcher, &request.options, &request.selection, limits)
                .await?;
        Ok(outcome)
    }

    pub async fn replace(
        &self,
        project: &str,
        request: &ReplaceRequest,
    ) -> EngineResult<ReplaceSummary> {
        let replacement =
            Replacement::new(&request.search_query, &request.replace_query, &request.options)
                .map_err(|e| EngineError::invalid(format!("{e:#}")))?;
        let target = if request.replace_all {
            ReplaceTarget::AllText {
                include_hidden: request.options.include_hidden,
            }
        } else if request.files.is_empty() {
            return Err(EngineError::invalid("No files given to replace in"));
        } else {
            ReplaceTarget::Files(request.files.clone())
        };
        let root = self.project_root(project).await?;

        let access = FileAccessManager::new(root);
        let summary = replace_across_files(
            &access,
            &replacement,
            &target,
            self.settings.bulk.max_reported_errors,
        )
        .await?;

        let entry = HistoryEntry::new("replace", summary.files_modified, summary.errors.is_empty())
            .with_detail("description", replacement.description())
            .with_detail("totalReplacements", summary.total_replacements);
        self.journal(project, entry).await;

        Ok(summary)
    }

    pub async fn bulk(
        &self,
        project: &str,
        operation: &str,
        files: &[String],
        options: &BulkOptions,
    ) -> EngineResult<BatchReport> {
        let operation = BulkOperation::from_str(operation).map_err(|_| {
            let known: Vec<String> = BulkOperation::VARIANTS.iter().map(|o| o.to_string()).collect();
            EngineError::invalid(format!(
                "Unknown bulk operation: {operation} (expected one of {})",
                known.join(", ")
            ))
        })?;
        if files.is_empty() {
            return Err(EngineError::invalid("No files given for bulk operation"));
        }
        let plan =
            BulkPlan::new(operation, options).map_err(|e| EngineError::invalid(format!("{e:#}")))?;
        let root = self.project_root(project).await?;

        let layout = BulkLayout {
            copies_dir: self.settings.bulk.copies_dir.clone(),
            moved_dir: self.settings.bulk.moved_dir.clone(),
            max_reported_errors: self.settings.bulk.max_reported_errors,
        };
        let access = FileAccessManager::new(root);
        let report = plan.execute(&access, files, &layout).await;

        let entry = HistoryEntry::new(
            format!("bulk_{operation}"),
            files.len(),
            report.error_count == 0,
        )
        .with_detail("action", operation.to_string())
        .with_detail("successCount", report.success_count)
        .with_detail("errorCount", report.error_count);
        self.journal(project, entry).await;

        Ok(report)
    }

    async fn read_pair(
        &self,
        project: &str,
        left: &str,
        right: &str,
    ) -> EngineResult<(String, String)> {
        let root = self.project_root(project).await?;
        let access = FileAccessManager::new(root);

        let left_content = read_existing(&access, left).await?;
        let right_content = read_existing(&access, right).await?;
        Ok((left_content, right_content))
    }

    pub async fn compare(&self, project: &str, left: &str, right: &str) -> EngineResult<CompareReport> {
        let (left_content, right_content) = self.read_pair(project, left, right).await?;
        Ok(diff_lines(&left_content, &right_content))
    }

    pub async fn compare_unified(
        &self,
        project: &str,
        left: &str,
        right: &str,
        context_lines: usize,
    ) -> EngineResult<String> {
        let (left_content, right_content) = self.read_pair(project, left, right).await?;
        Ok(unified_patch(
            &left_content,
            &right_content,
            left,
            right,
            context_lines,
        ))
    }

    pub async fn history(&self, project: &str) -> EngineResult<Vec<HistoryEntry>> {
        Ok(self.history.load(project).await?)
    }

    pub async fn clear_history(&self, project: &str) -> EngineResult<()> {
        self.history.clear(project).await?;
        tracing::info!("Cleared history for {project}");
        Ok(())
    }
}

async fn read_existing(access: &FileAccessManager, file: &str) -> EngineResult<String> {
    let exists = access
        .file_exists(file)
        .await
        .map_err(|e| EngineError::invalid(format!("{e:#}")))?;
    if !exists {
        return Err(EngineError::not_found(format!("File not found: {file}")));
    }
    Ok(access.read_file(file).await?)
}
