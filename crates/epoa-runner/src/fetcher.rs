use epoa_core::{EvidenceLocation, FetchOutcome, RoleRow};
use epoa_evidence::EvidenceStore;
use epoa_render::Renderer;

/// Capture one posting. A non-empty posting already on disk is reused; a failed
/// render never leaves a file behind.
pub fn fetch(
    row: &RoleRow,
    location: &EvidenceLocation,
    store: &dyn EvidenceStore,
    renderer: &dyn Renderer,
) -> FetchOutcome {
    if store.posting_present(location) {
        tracing::info!(row = row.row_number, path = %location.posting_pdf_path.display(), "posting already fetched");
        return FetchOutcome::reused(row.clone(), store.posting_digest(location).ok());
    }

    tracing::info!(row = row.row_number, url = %row.role_url, "saving posting to pdf");
    match renderer.render(&row.role_url, &location.posting_pdf_path) {
        Ok(()) => FetchOutcome::fetched(row.clone(), store.posting_digest(location).ok()),
        Err(err) => {
            tracing::warn!(row = row.row_number, error = %err, "fetch failed");
            if let Err(rm) = store.discard_posting(location) {
                tracing::warn!(row = row.row_number, error = %rm, "could not remove partial posting");
            }
            FetchOutcome::failed(row.clone(), &err)
        }
    }
}
