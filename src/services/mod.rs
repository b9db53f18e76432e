pub mod collections;
pub use collections::{AuditReport, CollectionAuditor, CollectionSource, TitleLookup};

pub mod metadata_update;
pub use metadata_update::{MergeStats, MetadataUpdater, UpdateSummary};

pub mod one_pace;
pub use one_pace::{GenerateError, GenerateOptions, GenerateSummary, OnePaceGenerator};

pub mod poster_report;
pub use poster_report::MissingPoster;

pub mod sheets;
pub use sheets::{ExportedSheet, SheetError, export_workbook};
