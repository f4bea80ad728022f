// [libs/domain/models-rs/src/lib.rs]

pub mod errors;
pub mod event;
pub mod geo;
pub mod hashing;
pub mod reports;
pub mod score;

pub use errors::SchemaError;
pub use event::{canonicalize, Event, RawEvent, StoredEvent, MAX_PAYLOAD_BYTES};
pub use geo::{GeoFields, GeoStatus};
pub use hashing::{content_hash, content_hash_hex};
pub use reports::{
    AnalyticsReport, BandHistogram, CountSeriesPoint, DashboardStats, InvestigationReport,
    LabelCount, MapPoint, MlInsightsReport, ScoreSeriesPoint, SourceScore,
};
pub use score::{BandCutoffs, PredictedClass, RiskBand, ScoreVerdict};
