pub mod clock;
pub mod dates;
pub mod domain;
pub mod plan;
pub mod ports;
pub mod progress;
pub mod schedule;
pub mod transcript;

pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{
    BookDetails, DailyPlan, DailyTask, DomainError, Material, MaterialDraft, MaterialKind,
    ReminderSettings, Section, TaskDetail, VideoDetails, WeeklyPlan, WorkloadEntry,
};
pub use ports::{
    CompletionStore, MaterialPatch, MaterialStore, PortError, PortResult, SettingsStore,
};
pub use transcript::ParsedTranscript;
