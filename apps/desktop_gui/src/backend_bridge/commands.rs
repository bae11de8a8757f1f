//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

use analysis_client::AnalysisKind;

pub enum BackendCommand {
    InitializeMap,
    LoadAnalysisPreview {
        kind: AnalysisKind,
        path: PathBuf,
    },
    AnalyzeImage {
        kind: AnalysisKind,
        path: PathBuf,
    },
}
