// RAG (Retrieval-Augmented Generation) context pipeline
//
// Turns a similarity search into the evidence text the generation stages read.
//
// Components:
// - Normalize: raw hits -> ranked, typed context items
// - Context: context items -> composed text block
// - Router: report category -> filtered search -> composed text

pub mod normalize;
pub mod context;
pub mod router;

// Re-export key types
pub use normalize::{
    normalize, normalize_hits, ContextItem, MarketingDetails, Record, RecordType, Retrieval,
    SalesDetails, NO_RESULTS,
};
pub use context::ContextComposer;
pub use router::{ReportCategory, RetrievalRouter};
